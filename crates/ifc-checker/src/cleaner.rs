// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Model reducer: keeps one instance of each whitelisted element type
//!
//! The reduced model holds the projects (without their context and units),
//! the first instance of every whitelisted type with everything it
//! references, and that instance's property definitions linked through
//! fresh `IfcRelDefinesByProperties` relationships.

use crate::config::CheckerConfig;
use crate::diagnostics::Diagnostics;
use crate::error::{CheckError, Result};
use ifc_checker_model::{AttributeValue, EntityId, IfcModel, IfcType};
use ifc_checker_parser::{ModelBuilder, StepModel};
use serde::Serialize;
use std::collections::BTreeSet;

/// Schema of the result when the source header names none
pub(crate) const FALLBACK_SCHEMA: &str = "IFC4";

/// `GlobalId`, `OwnerHistory`, `Name`, `Description`, `ObjectType`,
/// `LongName`, `Phase`
const PROJECT_KEPT_ATTRIBUTES: usize = 7;

const IFC_BASE64: &[u8; 64] =
    b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz_$";

/// Result of a reduction
pub enum CleanOutcome {
    /// At least one whitelisted type was kept
    Reduced {
        model: StepModel,
        /// Canonical names of the kept types, in whitelist order
        retained: Vec<String>,
    },
    /// The source has none of the whitelisted types
    NoMatchingTypes { model: StepModel },
    /// Loading or copying failed; `model` is empty
    Failed { model: StepModel, error: CheckError },
}

impl CleanOutcome {
    pub fn model(&self) -> &StepModel {
        match self {
            CleanOutcome::Reduced { model, .. }
            | CleanOutcome::NoMatchingTypes { model }
            | CleanOutcome::Failed { model, .. } => model,
        }
    }

    pub fn into_model(self) -> StepModel {
        match self {
            CleanOutcome::Reduced { model, .. }
            | CleanOutcome::NoMatchingTypes { model }
            | CleanOutcome::Failed { model, .. } => model,
        }
    }

    pub fn retained(&self) -> &[String] {
        match self {
            CleanOutcome::Reduced { retained, .. } => retained,
            _ => &[],
        }
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, CleanOutcome::Failed { .. })
    }

    pub fn error(&self) -> Option<&CheckError> {
        match self {
            CleanOutcome::Failed { error, .. } => Some(error),
            _ => None,
        }
    }

    pub fn summary(&self) -> CleanSummary {
        CleanSummary {
            outcome: match self {
                CleanOutcome::Reduced { .. } => "reduced",
                CleanOutcome::NoMatchingTypes { .. } => "no_matching_types",
                CleanOutcome::Failed { .. } => "failed",
            },
            retained: self.retained().to_vec(),
            entities: self.model().resolver().entity_count(),
            error: self.error().map(|e| e.to_string()),
        }
    }
}

impl std::fmt::Debug for CleanOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CleanOutcome")
            .field("outcome", &self.summary().outcome)
            .field("retained", &self.retained())
            .field("error", &self.error())
            .finish()
    }
}

/// Serializable description of a [`CleanOutcome`]
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CleanSummary {
    pub outcome: &'static str,
    pub retained: Vec<String>,
    /// Entity count of the resulting model
    pub entities: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Build the reduced model of `source`
///
/// Copy failures (a dangling reference in the source, for instance) are
/// returned in strict mode and reported as [`CleanOutcome::Failed`] in
/// tolerant mode.
pub fn clean_model(source: &dyn IfcModel, config: &CheckerConfig) -> Result<CleanOutcome> {
    let diagnostics = Diagnostics::new(config.diagnostics);
    let schema = match source.metadata().schema_version.as_str() {
        "" => FALLBACK_SCHEMA,
        schema => schema,
    };

    match reduce(source, schema, &config.whitelist, diagnostics) {
        Ok(outcome) => {
            diagnostics.progress(format!(
                "cleaned model created with types: {:?}",
                outcome.retained()
            ));
            Ok(outcome)
        }
        Err(error) if !config.is_strict() => {
            diagnostics.swallowed("cleaning failed", &error);
            Ok(CleanOutcome::Failed {
                model: StepModel::empty(schema),
                error,
            })
        }
        Err(error) => Err(error),
    }
}

fn reduce(
    source: &dyn IfcModel,
    schema: &str,
    whitelist: &[String],
    diagnostics: Diagnostics,
) -> Result<CleanOutcome> {
    let resolver = source.resolver();
    let mut builder = ModelBuilder::new(schema);

    for project in resolver.entities_by_type(&IfcType::IfcProject) {
        builder.copy_leading(resolver, project.id, PROJECT_KEPT_ATTRIBUTES)?;
    }

    let mut retained = Vec::new();
    let mut attached = BTreeSet::new();
    for type_name in whitelist {
        let ifc_type = IfcType::parse(type_name);
        let Some(first) = resolver.by_type(&ifc_type).into_iter().next() else {
            diagnostics.progress(format!("no {} in source", ifc_type));
            continue;
        };

        let copy = builder.copy_from(resolver, first.id)?;
        if attached.insert(first.id) {
            copy_property_links(source, &mut builder, first.id, copy)?;
        }
        retained.push(ifc_type.name().to_string());
    }

    let model = builder.build()?;
    Ok(if retained.is_empty() {
        CleanOutcome::NoMatchingTypes { model }
    } else {
        CleanOutcome::Reduced { model, retained }
    })
}

/// Re-create the `IfcRelDefinesByProperties` links of `element` on `copy`
///
/// Each new relationship relates the copy alone, so other instances sharing
/// the source relationship are not dragged along.
fn copy_property_links(
    source: &dyn IfcModel,
    builder: &mut ModelBuilder,
    element: EntityId,
    copy: EntityId,
) -> Result<()> {
    let resolver = source.resolver();
    for rel_id in source.properties().defined_by(element) {
        let Some(rel) = resolver.get(rel_id) else {
            continue;
        };

        let owner = match rel.get_ref(1) {
            Some(owner) => AttributeValue::EntityRef(builder.copy_from(resolver, owner)?),
            None => AttributeValue::Null,
        };

        let definitions = match rel.get(5) {
            Some(AttributeValue::EntityRef(id)) => vec![*id],
            Some(AttributeValue::List(items)) => items
                .iter()
                .filter_map(AttributeValue::as_entity_ref)
                .collect(),
            _ => Vec::new(),
        };

        for definition in definitions {
            let definition = builder.copy_from(resolver, definition)?;
            builder.add(
                IfcType::IfcRelDefinesByProperties,
                vec![
                    AttributeValue::String(relationship_guid(copy, definition)),
                    owner.clone(),
                    text_or_null(rel.get(2)),
                    text_or_null(rel.get(3)),
                    AttributeValue::List(vec![AttributeValue::EntityRef(copy)]),
                    AttributeValue::EntityRef(definition),
                ],
            );
        }
    }
    Ok(())
}

fn text_or_null(value: Option<&AttributeValue>) -> AttributeValue {
    match value {
        Some(value @ AttributeValue::String(_)) => value.clone(),
        _ => AttributeValue::Null,
    }
}

/// GlobalId derived from the linked instance numbers, stable across runs
fn relationship_guid(object: EntityId, definition: EntityId) -> String {
    const TAG: u128 = 0x1fc_c4ec << 96;
    compress_guid(TAG | u128::from(object.0) << 32 | u128::from(definition.0))
}

/// Encode 128 bits as the 22-character IFC GlobalId alphabet
pub fn compress_guid(value: u128) -> String {
    (0..22)
        .rev()
        .map(|i| IFC_BASE64[((value >> (6 * i)) & 0x3f) as usize] as char)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::FailureMode;
    use ifc_checker_model::ValueKind;

    const TEST_IFC: &str = r#"ISO-10303-21;
HEADER;
FILE_DESCRIPTION(('ViewDefinition [CoordinationView]'),'2;1');
FILE_NAME('house.ifc','2024-01-01T00:00:00',('Architect'),('Office'),'Exporter','CAD','');
FILE_SCHEMA(('IFC2X3'));
ENDSEC;
DATA;
#1=IFCPERSONANDORGANIZATION($,$,$);
#2=IFCOWNERHISTORY(#1,$,$,.ADDED.,$,$,$,0);
#3=IFCUNITASSIGNMENT(());
#4=IFCPROJECT('0001',#2,'House',$,$,$,$,$,#3);
#5=IFCLOCALPLACEMENT($,$);
#10=IFCWALLSTANDARDCASE('w1',#2,'Wall 1',$,$,#5,$,$);
#11=IFCWALL('w2',#2,'Wall 2',$,$,#5,$,$);
#12=IFCDOOR('d1',#2,'Door 1',$,$,#5,$,$,1.,0.9);
#13=IFCBEAM('b1',#2,'Beam 1',$,$,#5,$,$);
#20=IFCPROPERTYSINGLEVALUE('IsExternal',$,IFCBOOLEAN(.T.),$);
#21=IFCPROPERTYSET('ps1',#2,'Pset_WallCommon',$,(#20));
#22=IFCRELDEFINESBYPROPERTIES('r1',#2,'link',$,(#10,#11),#21);
#23=IFCELEMENTQUANTITY('q1',#2,'Qto_WallBaseQuantities',$,$,());
#24=IFCRELDEFINESBYPROPERTIES('r2',#2,$,$,(#10),#23);
ENDSEC;
END-ISO-10303-21;
"#;

    fn clean(content: &str, config: &CheckerConfig) -> CleanOutcome {
        let source = StepModel::parse(content).unwrap();
        clean_model(&source, config).unwrap()
    }

    #[test]
    fn test_keeps_first_instance_per_type() {
        let outcome = clean(TEST_IFC, &CheckerConfig::default());
        assert_eq!(outcome.retained(), &["IfcWall", "IfcDoor", "IfcBeam"]);

        let model = outcome.model();
        let resolver = model.resolver();
        let walls = resolver.find_by_type_name("IfcWall");
        assert_eq!(walls.len(), 1);
        assert_eq!(walls[0].ifc_type, IfcType::IfcWallStandardCase);
        assert_eq!(walls[0].get_string(2), Some("Wall 1"));
        assert_eq!(resolver.find_by_type_name("IfcDoor").len(), 1);
        assert_eq!(resolver.find_by_type_name("IfcBeam").len(), 1);
        assert_eq!(model.metadata().schema_version, "IFC2X3");
    }

    #[test]
    fn test_project_keeps_leading_attributes() {
        let outcome = clean(TEST_IFC, &CheckerConfig::default());
        let resolver = outcome.model().resolver();
        let projects = resolver.entities_by_type(&IfcType::IfcProject);
        assert_eq!(projects.len(), 1);
        assert_eq!(projects[0].get_string(2), Some("House"));
        assert!(projects[0].get(8).unwrap().is_null());
        assert_eq!(resolver.count_by_type(&IfcType::IfcUnitAssignment), 0);
        // Owner history is shared by the project and every copied element
        assert_eq!(resolver.count_by_type(&IfcType::IfcOwnerHistory), 1);
    }

    #[test]
    fn test_property_sets_follow_the_copy() {
        let outcome = clean(TEST_IFC, &CheckerConfig::default());
        let model = outcome.model();
        let wall = &model.resolver().find_by_type_name("IfcWall")[0];

        let names: Vec<_> = model
            .properties()
            .property_definitions(wall.id)
            .into_iter()
            .filter_map(|def| def.name)
            .collect();
        assert_eq!(names, vec!["Pset_WallCommon", "Qto_WallBaseQuantities"]);

        let prop = model
            .properties()
            .get_property(wall.id, "Pset_WallCommon", "IsExternal")
            .unwrap();
        assert_eq!(prop.kind(), ValueKind::Typed("IFCBOOLEAN".into()));

        // The new relationship relates the copy only
        let rels = model
            .resolver()
            .entities_by_type(&IfcType::IfcRelDefinesByProperties);
        assert_eq!(rels.len(), 2);
        assert_eq!(rels[0].get_refs(4), Some(vec![wall.id]));
        assert_eq!(rels[0].get_string(2), Some("link"));
        assert_eq!(rels[0].get_string(0).map(str::len), Some(22));
    }

    #[test]
    fn test_no_matching_types() {
        let config = CheckerConfig::default().with_whitelist(["IfcRamp"]);
        let outcome = clean(TEST_IFC, &config);
        assert!(matches!(outcome, CleanOutcome::NoMatchingTypes { .. }));
        assert!(outcome.retained().is_empty());
        // The project is still there
        assert_eq!(outcome.summary().entities, 3);
    }

    #[test]
    fn test_repeated_type_attaches_psets_once() {
        let config = CheckerConfig::default().with_whitelist(["IfcWall", "IfcWallStandardCase"]);
        let outcome = clean(TEST_IFC, &config);
        assert_eq!(outcome.retained(), &["IfcWall", "IfcWallStandardCase"]);
        let resolver = outcome.model().resolver();
        assert_eq!(resolver.find_by_type_name("IfcWall").len(), 1);
        assert_eq!(resolver.count_by_type(&IfcType::IfcRelDefinesByProperties), 2);
    }

    const DANGLING_IFC: &str = r#"ISO-10303-21;
HEADER;
FILE_SCHEMA(('IFC4'));
ENDSEC;
DATA;
#1=IFCWALL('w1',#99,$,$,$,$,$,$,$);
ENDSEC;
END-ISO-10303-21;
"#;

    #[test]
    fn test_copy_failure_by_failure_mode() {
        let source = StepModel::parse(DANGLING_IFC).unwrap();

        let outcome = clean_model(&source, &CheckerConfig::default()).unwrap();
        assert!(outcome.is_failed());
        assert_eq!(outcome.model().resolver().entity_count(), 0);
        assert_eq!(outcome.summary().outcome, "failed");
        assert!(matches!(outcome.error(), Some(CheckError::Engine(_))));

        let strict = CheckerConfig::default().with_failure_mode(FailureMode::Strict);
        assert!(clean_model(&source, &strict).is_err());
    }

    #[test]
    fn test_idempotent_and_deterministic() {
        let config = CheckerConfig::default();
        let first = clean(TEST_IFC, &config);
        let text = first.model().to_step();
        assert_eq!(clean(TEST_IFC, &config).model().to_step(), text);

        let second = clean(&text, &config);
        assert_eq!(second.retained(), first.retained());
        assert_eq!(second.model().to_step(), text);
    }

    #[test]
    fn test_compress_guid() {
        assert_eq!(compress_guid(0), "0".repeat(22));
        assert_eq!(compress_guid(u128::MAX), format!("3{}", "$".repeat(21)));
        assert_eq!(compress_guid(64), format!("{}10", "0".repeat(20)));
    }

    #[test]
    fn test_summary_serializes() {
        let outcome = clean(TEST_IFC, &CheckerConfig::default());
        let json = serde_json::to_value(outcome.summary()).unwrap();
        assert_eq!(json["outcome"], "reduced");
        assert_eq!(json["retained"][0], "IfcWall");
        assert!(json.get("error").is_none());
    }
}
