// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! EntityResolver trait implementation

use ifc_checker_model::{DecodedEntity, EntityId, EntityResolver, Error, IfcType, Result};
use rustc_hash::FxHashMap;
use std::sync::Arc;

/// Decoded entities held in file order
///
/// Every record is decoded up front, so lookups never fail lazily and the
/// store can be shared between threads without locking.
#[derive(Default)]
pub struct EntityStore {
    /// Entities in file order
    entities: Vec<Arc<DecodedEntity>>,
    /// Entity ID -> position in `entities`
    index: FxHashMap<EntityId, usize>,
    /// Type -> positions in `entities`, ascending
    type_index: FxHashMap<IfcType, Vec<usize>>,
    /// Declared types in order of first appearance
    type_order: Vec<IfcType>,
}

impl EntityStore {
    /// Build a store from entities in file order
    ///
    /// Fails if two records share an instance number.
    pub fn new(entities: Vec<DecodedEntity>) -> Result<Self> {
        let mut index = FxHashMap::default();
        let mut type_index: FxHashMap<IfcType, Vec<usize>> = FxHashMap::default();
        let mut type_order = Vec::new();

        for (pos, entity) in entities.iter().enumerate() {
            if index.insert(entity.id, pos).is_some() {
                return Err(Error::entity_parse(entity.id, "duplicate instance number"));
            }
            let positions = type_index.entry(entity.ifc_type.clone()).or_default();
            if positions.is_empty() {
                type_order.push(entity.ifc_type.clone());
            }
            positions.push(pos);
        }

        Ok(Self {
            entities: entities.into_iter().map(Arc::new).collect(),
            index,
            type_index,
            type_order,
        })
    }

    fn at(&self, positions: impl IntoIterator<Item = usize>) -> Vec<Arc<DecodedEntity>> {
        positions
            .into_iter()
            .map(|pos| Arc::clone(&self.entities[pos]))
            .collect()
    }
}

impl EntityResolver for EntityStore {
    fn get(&self, id: EntityId) -> Option<Arc<DecodedEntity>> {
        self.index
            .get(&id)
            .map(|&pos| Arc::clone(&self.entities[pos]))
    }

    fn entities_by_type(&self, ifc_type: &IfcType) -> Vec<Arc<DecodedEntity>> {
        self.type_index
            .get(ifc_type)
            .map(|positions| self.at(positions.iter().copied()))
            .unwrap_or_default()
    }

    fn by_type(&self, ifc_type: &IfcType) -> Vec<Arc<DecodedEntity>> {
        let mut positions: Vec<usize> = self
            .type_index
            .iter()
            .filter(|(declared, _)| declared.is_a(ifc_type))
            .flat_map(|(_, positions)| positions.iter().copied())
            .collect();
        positions.sort_unstable();
        self.at(positions)
    }

    fn count_by_type(&self, ifc_type: &IfcType) -> usize {
        self.type_index.get(ifc_type).map(|v| v.len()).unwrap_or(0)
    }

    fn types(&self) -> Vec<IfcType> {
        self.type_order.clone()
    }

    fn all_ids(&self) -> Vec<EntityId> {
        self.entities.iter().map(|e| e.id).collect()
    }

    fn entity_count(&self) -> usize {
        self.entities.len()
    }
}
