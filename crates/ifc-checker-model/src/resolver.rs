// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Entity resolution trait for looking up and resolving IFC entities

use crate::{AttributeValue, DecodedEntity, EntityId, IfcType};
use std::sync::Arc;

/// Entity lookup and reference resolution
///
/// Implementations should provide O(1) lookup by entity ID and must return
/// entities in file order from every enumeration method, so that "first
/// instance" selections are stable across runs.
///
/// # Example
///
/// ```ignore
/// use ifc_checker_model::{EntityResolver, IfcType};
///
/// fn first_wall_name(resolver: &dyn EntityResolver) -> Option<String> {
///     let walls = resolver.by_type(&IfcType::IfcWall);
///     walls.first()?.get_string(2).map(str::to_string)
/// }
/// ```
pub trait EntityResolver: Send + Sync {
    /// Get entity by ID
    fn get(&self, id: EntityId) -> Option<Arc<DecodedEntity>>;

    /// Resolve an entity reference from an attribute value
    fn resolve_ref(&self, attr: &AttributeValue) -> Option<Arc<DecodedEntity>> {
        match attr {
            AttributeValue::EntityRef(id) => self.get(*id),
            _ => None,
        }
    }

    /// Resolve a list of entity references, skipping anything unresolvable
    fn resolve_ref_list(&self, attr: &AttributeValue) -> Vec<Arc<DecodedEntity>> {
        match attr {
            AttributeValue::List(items) => items
                .iter()
                .filter_map(|item| self.resolve_ref(item))
                .collect(),
            _ => Vec::new(),
        }
    }

    /// Entities whose declared type is exactly `ifc_type`, in file order
    fn entities_by_type(&self, ifc_type: &IfcType) -> Vec<Arc<DecodedEntity>>;

    /// Entities of `ifc_type` or any of its known subtypes, in file order
    ///
    /// `by_type(&IfcType::IfcProduct)` enumerates every product entity.
    fn by_type(&self, ifc_type: &IfcType) -> Vec<Arc<DecodedEntity>>;

    /// Same as [`EntityResolver::by_type`] for a type name string
    ///
    /// Matching is case-insensitive (`"IfcWall"` and `"IFCWALL"` agree).
    fn find_by_type_name(&self, type_name: &str) -> Vec<Arc<DecodedEntity>> {
        self.by_type(&IfcType::parse(type_name))
    }

    /// Count entities whose declared type is exactly `ifc_type`
    fn count_by_type(&self, ifc_type: &IfcType) -> usize {
        self.entities_by_type(ifc_type).len()
    }

    /// Distinct declared types present in the model
    fn types(&self) -> Vec<IfcType>;

    /// All entity IDs in file order
    fn all_ids(&self) -> Vec<EntityId>;

    /// Get total entity count
    fn entity_count(&self) -> usize {
        self.all_ids().len()
    }
}
