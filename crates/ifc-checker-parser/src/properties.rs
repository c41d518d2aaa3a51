// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! PropertyReader trait implementation

use ifc_checker_model::{
    AttributeValue, DecodedEntity, EntityId, EntityResolver, IfcType, Property,
    PropertyDefinition, PropertyReader,
};
use rustc_hash::FxHashMap;
use std::sync::Arc;

/// Property reader backed by an inverse `IsDefinedBy` index
pub struct PropertyIndex {
    /// Reference to resolver for entity lookups
    resolver: Arc<dyn EntityResolver>,
    /// Object ID -> IfcRelDefinesByProperties IDs, in file order
    defined_by: FxHashMap<EntityId, Vec<EntityId>>,
}

impl PropertyIndex {
    /// Build the inverse index over every `IfcRelDefinesByProperties`
    pub fn new(resolver: Arc<dyn EntityResolver>) -> Self {
        let mut defined_by: FxHashMap<EntityId, Vec<EntityId>> = FxHashMap::default();

        for rel in resolver.entities_by_type(&IfcType::IfcRelDefinesByProperties) {
            // RelatedObjects at index 4
            let Some(related) = rel.get_refs(4) else {
                continue;
            };
            for object in related {
                let rels = defined_by.entry(object).or_default();
                if !rels.contains(&rel.id) {
                    rels.push(rel.id);
                }
            }
        }

        Self {
            resolver,
            defined_by,
        }
    }

    /// Property definitions a relationship points at
    ///
    /// RelatingPropertyDefinition (index 5) is a single reference, or a set of
    /// references in IFC4's `IfcPropertySetDefinitionSet`.
    fn relating_definitions(&self, rel: &DecodedEntity) -> Vec<Arc<DecodedEntity>> {
        match rel.get(5) {
            Some(attr @ AttributeValue::EntityRef(_)) => {
                self.resolver.resolve_ref(attr).into_iter().collect()
            }
            Some(attr @ AttributeValue::List(_)) => self.resolver.resolve_ref_list(attr),
            _ => Vec::new(),
        }
    }

    fn to_definition(&self, def: &DecodedEntity) -> PropertyDefinition {
        let properties = if def.ifc_type == IfcType::IfcPropertySet {
            self.extract_properties(def)
        } else {
            Vec::new()
        };

        PropertyDefinition {
            id: def.id,
            ifc_type: def.ifc_type.clone(),
            // Name at index 2
            name: def.get_string(2).map(str::to_string),
            properties,
        }
    }

    /// Extract properties from a property set entity
    fn extract_properties(&self, pset: &DecodedEntity) -> Vec<Property> {
        // HasProperties at index 4
        let Some(prop_refs) = pset.get(4) else {
            return Vec::new();
        };

        self.resolver
            .resolve_ref_list(prop_refs)
            .iter()
            .filter_map(|prop| extract_single_property(prop))
            .collect()
    }
}

/// Extract a single property from an IfcProperty entity
fn extract_single_property(prop: &DecodedEntity) -> Option<Property> {
    // Name at index 0
    let name = prop.get_string(0)?.to_string();

    let value_index = match prop.ifc_type {
        // PropertyReference / HasProperties
        IfcType::IfcPropertyReferenceValue | IfcType::IfcComplexProperty => 3,
        // NominalValue, EnumerationValues, ListValues, UpperBoundValue, DefiningValues
        _ => 2,
    };

    Some(Property {
        id: prop.id,
        ifc_type: prop.ifc_type.clone(),
        name,
        value: prop.get(value_index).cloned().unwrap_or_default(),
    })
}

impl PropertyReader for PropertyIndex {
    fn defined_by(&self, id: EntityId) -> Vec<EntityId> {
        self.defined_by.get(&id).cloned().unwrap_or_default()
    }

    fn property_definitions(&self, id: EntityId) -> Vec<PropertyDefinition> {
        self.defined_by(id)
            .into_iter()
            .filter_map(|rel_id| self.resolver.get(rel_id))
            .flat_map(|rel| self.relating_definitions(&rel))
            .map(|def| self.to_definition(&def))
            .collect()
    }

    fn property_sets_named(&self, name: &str) -> Vec<PropertyDefinition> {
        let mut sets: Vec<PropertyDefinition> = self
            .resolver
            .entities_by_type(&IfcType::IfcPropertySet)
            .iter()
            .filter(|pset| pset.get_string(2) == Some(name))
            .map(|pset| self.to_definition(pset))
            .collect();
        sets.sort_by_key(|def| def.id);
        sets
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resolver::EntityStore;
    use crate::tokenizer::parse_entity;

    const TEST_RECORDS: &[&str] = &[
        "#1=IFCWALL('w1',$,'Wall',$,$,$,$,$);",
        "#2=IFCWALL('w2',$,'Wall',$,$,$,$,$);",
        "#10=IFCPROPERTYSINGLEVALUE('IsExternal',$,IFCBOOLEAN(.T.),$);",
        "#11=IFCPROPERTYSINGLEVALUE('Width',$,IFCLENGTHMEASURE(0.2),$);",
        "#12=IFCPROPERTYENUMERATEDVALUE('Status',$,(IFCLABEL('New')),$);",
        "#20=IFCPROPERTYSET('p1',$,'Pset_WallCommon',$,(#10,#11,#12));",
        "#21=IFCELEMENTQUANTITY('q1',$,'Qto_WallBaseQuantities',$,$,());",
        "#30=IFCRELDEFINESBYPROPERTIES('r1',$,$,$,(#1,#2),#20);",
        "#31=IFCRELDEFINESBYPROPERTIES('r2',$,$,$,(#1),#21);",
        "#40=IFCPROPERTYSET('p2',$,'Pset_WallCommon',$,());",
    ];

    fn index() -> PropertyIndex {
        let entities = TEST_RECORDS
            .iter()
            .map(|r| parse_entity(r).unwrap())
            .collect();
        PropertyIndex::new(Arc::new(EntityStore::new(entities).unwrap()))
    }

    #[test]
    fn test_defined_by() {
        let index = index();
        assert_eq!(index.defined_by(EntityId(1)), vec![EntityId(30), EntityId(31)]);
        assert_eq!(index.defined_by(EntityId(2)), vec![EntityId(30)]);
        assert!(index.defined_by(EntityId(10)).is_empty());
    }

    #[test]
    fn test_property_definitions() {
        let index = index();
        let defs = index.property_definitions(EntityId(1));
        assert_eq!(defs.len(), 2);

        assert!(defs[0].is_property_set());
        assert_eq!(defs[0].name.as_deref(), Some("Pset_WallCommon"));
        assert_eq!(
            defs[0].property_names(),
            vec!["IsExternal", "Width", "Status"]
        );
        assert_eq!(
            defs[0].get("Width").unwrap().value,
            AttributeValue::TypedValue(
                "IFCLENGTHMEASURE".into(),
                vec![AttributeValue::Float(0.2)]
            )
        );

        assert!(!defs[1].is_property_set());
        assert_eq!(defs[1].name.as_deref(), Some("Qto_WallBaseQuantities"));
        assert!(defs[1].properties.is_empty());
    }

    #[test]
    fn test_get_property() {
        let index = index();
        let prop = index
            .get_property(EntityId(2), "Pset_WallCommon", "IsExternal")
            .unwrap();
        assert_eq!(prop.value.as_bool(), Some(true));
        assert!(index
            .get_property(EntityId(2), "Pset_WallCommon", "Missing")
            .is_none());
    }

    #[test]
    fn test_property_sets_named_orders_by_id() {
        let index = index();
        let sets = index.property_sets_named("Pset_WallCommon");
        let ids: Vec<_> = sets.iter().map(|s| s.id).collect();
        assert_eq!(ids, vec![EntityId(20), EntityId(40)]);
        assert!(index.property_sets_named("Pset_Nothing").is_empty());
    }
}
