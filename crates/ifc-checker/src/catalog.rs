// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Property catalog: element types, their property sets, and the property
//! names each set declares

use ifc_checker_model::IfcModel;
use serde::Serialize;
use std::collections::BTreeSet;

/// One `(type, property set, property)` triple
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct CatalogEntry {
    pub entity_type: String,
    pub pset: String,
    pub property: String,
}

/// Every declared entity type name in the model, products or not
pub fn element_types(model: &dyn IfcModel) -> BTreeSet<String> {
    model
        .resolver()
        .types()
        .iter()
        .map(|t| t.name().to_string())
        .collect()
}

/// Names of the property definitions attached to any instance of
/// `type_name` (subtypes included)
///
/// Quantity sets count as well; unnamed definitions are skipped.
pub fn psets_for_type(model: &dyn IfcModel, type_name: &str) -> BTreeSet<String> {
    let properties = model.properties();
    model
        .resolver()
        .find_by_type_name(type_name)
        .iter()
        .flat_map(|entity| properties.property_definitions(entity.id))
        .filter_map(|def| def.name)
        .collect()
}

/// Property names of the first `IfcPropertySet` named `pset_name`
///
/// When several sets share the name, the one with the lowest instance
/// number wins. Empty when there is no such set.
pub fn properties_in_pset(model: &dyn IfcModel, pset_name: &str) -> Vec<String> {
    model
        .properties()
        .property_sets_named(pset_name)
        .first()
        .map(|pset| pset.property_names())
        .unwrap_or_default()
}

/// Catalog of the whole model, ordered by type, then set, then native
/// property order
pub fn build_catalog(model: &dyn IfcModel) -> Vec<CatalogEntry> {
    let mut entries = Vec::new();
    for entity_type in element_types(model) {
        for pset in psets_for_type(model, &entity_type) {
            for property in properties_in_pset(model, &pset) {
                entries.push(CatalogEntry {
                    entity_type: entity_type.clone(),
                    pset: pset.clone(),
                    property,
                });
            }
        }
    }
    entries
}
