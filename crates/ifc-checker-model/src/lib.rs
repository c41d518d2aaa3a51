// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! IFC Checker Model - entity types and model traits
//!
//! This crate holds the backend-neutral vocabulary shared by the STEP
//! reader/writer and the comparison engine. The engine only ever talks to
//! a parsed file through the traits defined here, so any backend able to
//! enumerate entities by type and follow property relationships can be
//! plugged in.
//!
//! # Architecture
//!
//! - [`IfcParser`] - Entry point for turning file content into a model
//! - [`IfcModel`] - Read-only access to a parsed IFC model
//! - [`EntityResolver`] - Entity lookup, reference resolution, type queries
//! - [`PropertyReader`] - Property definitions attached to an entity
//!
//! # Example
//!
//! ```ignore
//! use ifc_checker_model::{IfcModel, IfcType};
//!
//! fn count_walls(model: &dyn IfcModel) -> usize {
//!     model.resolver().by_type(&IfcType::IfcWall).len()
//! }
//! ```

pub mod error;
pub mod properties;
pub mod resolver;
pub mod traits;
pub mod types;

mod schema;

pub use error::*;
pub use properties::*;
pub use resolver::*;
pub use traits::*;
pub use types::*;
