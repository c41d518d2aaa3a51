// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Core traits for IFC parsing
//!
//! These traits define the main abstractions for working with IFC data.

use crate::{EntityResolver, ModelMetadata, PropertyReader, Result};
use std::sync::Arc;

/// Main parsing interface - entry point for loading IFC content
///
/// Implementations turn STEP text into a model that can be queried through
/// [`IfcModel`]. Reading files is left to the backend crate.
///
/// # Example
///
/// ```ignore
/// use ifc_checker_model::IfcParser;
///
/// let model = parser.parse(&content)?;
/// println!("Schema: {}", model.metadata().schema_version);
/// ```
pub trait IfcParser: Send + Sync {
    /// Parse IFC content and return a model
    fn parse(&self, content: &str) -> Result<Arc<dyn IfcModel>>;
}

/// Core model interface - read-only access to a parsed IFC model
///
/// The model is immutable once built, hence `Send + Sync`.
pub trait IfcModel: Send + Sync {
    /// Get entity resolver for entity lookups and type queries
    fn resolver(&self) -> &dyn EntityResolver;

    /// Get property reader for property definitions
    fn properties(&self) -> &dyn PropertyReader;

    /// Get file metadata (schema version, originating system, etc.)
    fn metadata(&self) -> &ModelMetadata;
}
