// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Structural comparison: product populations grouped by type

use ifc_checker_model::{EntityId, IfcModel, IfcType};
use serde::Serialize;
use std::collections::BTreeMap;

/// Product entities of a model, bucketed by declared type name
///
/// Bucket contents follow file order; type names iterate sorted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct TypeMap(BTreeMap<String, Vec<EntityId>>);

impl TypeMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an instance to its type's bucket
    pub fn push(&mut self, type_name: impl Into<String>, id: EntityId) {
        self.0.entry(type_name.into()).or_default().push(id);
    }

    /// Number of instances of `type_name` (0 when absent)
    pub fn count(&self, type_name: &str) -> usize {
        self.0.get(type_name).map_or(0, Vec::len)
    }

    /// Instances of `type_name` in file order
    pub fn instances(&self, type_name: &str) -> &[EntityId] {
        self.0.get(type_name).map(Vec::as_slice).unwrap_or_default()
    }

    pub fn type_names(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn contains(&self, type_name: &str) -> bool {
        self.0.contains_key(type_name)
    }

    /// Number of distinct types
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Total number of instances across all types
    pub fn total(&self) -> usize {
        self.0.values().map(Vec::len).sum()
    }
}

/// Group every `IfcProduct`-family entity by its declared type
pub fn extract_structure(model: &dyn IfcModel) -> TypeMap {
    let mut map = TypeMap::new();
    for entity in model.resolver().by_type(&IfcType::IfcProduct) {
        map.push(entity.ifc_type.name(), entity.id);
    }
    map
}

/// Score the overlap of two type populations
///
/// Shared types add `min(count_a, count_b)`, types present on one side only
/// subtract 1. The sum is divided by `Σ max(count_a, count_b)`; the result
/// is at most 1.0 and may be negative. Two empty maps score 0.0.
pub fn compare_structure(a: &TypeMap, b: &TypeMap) -> f64 {
    let mut score = 0.0;
    let mut max_score = 0.0;

    let mut names: Vec<&str> = a.type_names().chain(b.type_names()).collect();
    names.sort_unstable();
    names.dedup();

    for name in names {
        let (count_a, count_b) = (a.count(name), b.count(name));
        if count_a > 0 && count_b > 0 {
            score += count_a.min(count_b) as f64;
        } else {
            score -= 1.0;
        }
        max_score += count_a.max(count_b) as f64;
    }

    if max_score > 0.0 {
        score / max_score
    } else {
        0.0
    }
}

/// Extract both models' structure and score it
pub fn compare_models(a: &dyn IfcModel, b: &dyn IfcModel) -> f64 {
    let (map_a, map_b) = (extract_structure(a), extract_structure(b));
    log::debug!(
        "comparing {} product types ({} instances) against {} ({} instances)",
        map_a.len(),
        map_a.total(),
        map_b.len(),
        map_b.total()
    );
    compare_structure(&map_a, &map_b)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ifc_checker_parser::StepModel;

    const TEST_IFC: &str = r#"ISO-10303-21;
HEADER;
FILE_SCHEMA(('IFC4'));
ENDSEC;
DATA;
#1=IFCPROJECT('p',$,'Project',$,$,$,$,$,$);
#2=IFCWALL('w1',$,$,$,$,$,$,$,$);
#3=IFCWALLSTANDARDCASE('w2',$,$,$,$,$,$,$,$);
#4=IFCDOOR('d1',$,$,$,$,$,$,$,$,$,$,$,$);
#5=IFCWALL('w3',$,$,$,$,$,$,$,$);
#6=IFCPROPERTYSET('ps',$,'Pset_WallCommon',$,());
#7=IFCCARTESIANPOINT((0.,0.,0.));
ENDSEC;
END-ISO-10303-21;
"#;

    fn map(counts: &[(&str, u32)]) -> TypeMap {
        let mut map = TypeMap::new();
        let mut next = 1;
        for (name, count) in counts {
            for _ in 0..*count {
                map.push(*name, EntityId(next));
                next += 1;
            }
        }
        map
    }

    #[test]
    fn test_extract_structure_keeps_only_products() {
        let model = StepModel::parse(TEST_IFC).unwrap();
        let structure = extract_structure(&model);

        assert_eq!(structure.len(), 3);
        assert_eq!(structure.instances("IfcWall"), &[EntityId(2), EntityId(5)]);
        assert_eq!(structure.count("IfcWallStandardCase"), 1);
        assert_eq!(structure.count("IfcDoor"), 1);
        assert!(!structure.contains("IfcProject"));
        assert!(!structure.contains("IfcPropertySet"));
        assert_eq!(structure.total(), 4);
    }

    const MEP_IFC: &str = r#"ISO-10303-21;
HEADER;
FILE_SCHEMA(('IFC4'));
ENDSEC;
DATA;
#1=IFCPIPESEGMENT('p1',$,$,$,$,$,$,$,.RIGIDSEGMENT.);
#2=IFCPIPESEGMENT('p2',$,$,$,$,$,$,$,.RIGIDSEGMENT.);
#3=IFCDUCTSEGMENT('d1',$,$,$,$,$,$,$,.RIGIDSEGMENT.);
#4=IFCAIRTERMINAL('a1',$,$,$,$,$,$,$,.DIFFUSER.);
#5=IFCVALVE('v1',$,$,$,$,$,$,$,.ISOLATING.);
#6=IFCSPATIALZONE('z1',$,$,$,$,$,$,$,.USERDEFINED.);
#7=IFCDISTRIBUTIONSYSTEM('s1',$,$,$,$,$,.VENTILATION.);
#8=IFCPIPESEGMENTTYPE('t1',$,$,$,$,$,$,$,$,.RIGIDSEGMENT.);
ENDSEC;
END-ISO-10303-21;
"#;

    fn single(record: &str) -> StepModel {
        let content = format!(
            "ISO-10303-21;\nHEADER;\nFILE_SCHEMA(('IFC4'));\nENDSEC;\nDATA;\n{}\nENDSEC;\nEND-ISO-10303-21;\n",
            record
        );
        StepModel::parse(&content).unwrap()
    }

    #[test]
    fn test_extract_structure_covers_mep_products() {
        let model = StepModel::parse(MEP_IFC).unwrap();
        let structure = extract_structure(&model);

        assert_eq!(
            structure.type_names().collect::<Vec<_>>(),
            vec![
                "IfcAirTerminal",
                "IfcDuctSegment",
                "IfcPipeSegment",
                "IfcSpatialZone",
                "IfcValve"
            ]
        );
        assert_eq!(structure.instances("IfcPipeSegment"), &[EntityId(1), EntityId(2)]);
        // Systems and type objects are not products
        assert_eq!(structure.total(), 6);
    }

    #[test]
    fn test_disjoint_mep_types_score_negative() {
        let pipe = single("#1=IFCPIPESEGMENT('p',$,$,$,$,$,$,$,$);");
        let duct = single("#1=IFCDUCTSEGMENT('d',$,$,$,$,$,$,$,$);");
        assert_eq!(compare_models(&pipe, &duct), -1.0);

        let zone = single("#1=IFCSPATIALZONE('z',$,$,$,$,$,$,$,$);");
        assert_eq!(extract_structure(&zone).count("IfcSpatialZone"), 1);
    }

    #[test]
    fn test_extract_structure_of_empty_model() {
        let model = StepModel::empty("IFC4");
        assert!(extract_structure(&model).is_empty());
    }

    #[test]
    fn test_partial_overlap() {
        let a = map(&[("IfcWall", 3), ("IfcDoor", 2)]);
        let b = map(&[("IfcWall", 2), ("IfcDoor", 2)]);
        assert!((compare_structure(&a, &b) - 0.8).abs() < 1e-12);
    }

    #[test]
    fn test_disjoint_types_score_negative() {
        let a = map(&[("IfcWall", 1)]);
        let b = map(&[("IfcDoor", 1)]);
        assert_eq!(compare_structure(&a, &b), -1.0);
    }

    #[test]
    fn test_symmetry_and_identity() {
        let a = map(&[("IfcWall", 4), ("IfcSlab", 1), ("IfcBeam", 2)]);
        let b = map(&[("IfcWall", 2), ("IfcColumn", 3)]);
        assert_eq!(compare_structure(&a, &b), compare_structure(&b, &a));
        assert_eq!(compare_structure(&a, &a), 1.0);
    }

    #[test]
    fn test_empty_maps() {
        let empty = TypeMap::new();
        let a = map(&[("IfcWall", 2)]);
        assert_eq!(compare_structure(&empty, &empty), 0.0);
        assert!(compare_structure(&empty, &a) < compare_structure(&a, &a));
    }

    #[test]
    fn test_compare_models_against_itself() {
        let model = StepModel::parse(TEST_IFC).unwrap();
        assert_eq!(compare_models(&model, &model), 1.0);
    }

    #[test]
    fn test_type_map_serializes_sorted() {
        let a = map(&[("IfcWall", 1), ("IfcDoor", 1)]);
        let json = serde_json::to_string(&a).unwrap();
        assert_eq!(json, r#"{"IfcDoor":[2],"IfcWall":[1]}"#);
    }
}
