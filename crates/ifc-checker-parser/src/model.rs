// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! StepModel - in-memory IFC model implementation

use crate::properties::PropertyIndex;
use crate::resolver::EntityStore;
use crate::scanner::{parse_header, EntityScanner};
use crate::tokenizer::parse_entity;

use ifc_checker_model::{
    DecodedEntity, EntityResolver, IfcModel, ModelMetadata, PropertyReader, Result,
};
use std::sync::Arc;

/// Parsed IFC model implementing the `IfcModel` trait
///
/// Immutable once built. Models produced by the parser and by
/// [`ModelBuilder`](crate::ModelBuilder) are the same type.
pub struct StepModel {
    /// Entity store for lookups
    store: Arc<EntityStore>,
    /// Property reader
    properties: Arc<PropertyIndex>,
    /// File metadata
    metadata: ModelMetadata,
}

impl StepModel {
    /// Parse IFC content and create a model
    ///
    /// Fails when the content is not an exchange structure or when any
    /// DATA section record cannot be tokenized.
    pub fn parse(content: &str) -> Result<Self> {
        let mut entities = Vec::new();
        for raw in EntityScanner::new(content)? {
            entities.push(parse_entity(raw?.text)?);
        }

        let metadata = parse_header(content);
        log::debug!(
            "parsed {} entities (schema {:?})",
            entities.len(),
            metadata.schema_version
        );

        Self::from_entities(metadata, entities)
    }

    /// Create a model from decoded entities in file order
    pub fn from_entities(metadata: ModelMetadata, entities: Vec<DecodedEntity>) -> Result<Self> {
        let store = Arc::new(EntityStore::new(entities)?);
        let properties = Arc::new(PropertyIndex::new(store.clone()));

        Ok(Self {
            store,
            properties,
            metadata,
        })
    }

    /// An empty model of the given schema
    pub fn empty(schema_version: &str) -> Self {
        let store = Arc::new(EntityStore::default());
        let properties = Arc::new(PropertyIndex::new(store.clone()));
        Self {
            store,
            properties,
            metadata: ModelMetadata::for_schema(schema_version),
        }
    }

    /// Serialise the model as STEP text
    pub fn to_step(&self) -> String {
        crate::writer::to_step(self)
    }
}

impl IfcModel for StepModel {
    fn resolver(&self) -> &dyn EntityResolver {
        self.store.as_ref()
    }

    fn properties(&self) -> &dyn PropertyReader {
        self.properties.as_ref()
    }

    fn metadata(&self) -> &ModelMetadata {
        &self.metadata
    }
}
