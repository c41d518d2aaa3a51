// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! IFC Checker Parser - STEP reader and writer
//!
//! This crate reads IFC STEP Physical Files (ISO 10303-21) into an in-memory
//! [`StepModel`] and writes models back out. It implements the traits
//! defined in `ifc-checker-model`.
//!
//! # Features
//!
//! - **Tokenization** using `nom` combinators
//! - **SIMD-accelerated scanning** using `memchr`
//! - **Eager decoding** - every DATA record is checked at load time
//! - **Model construction** through [`ModelBuilder`] with deep copies
//! - **Deterministic output** from [`to_step`]
//!
//! # Example
//!
//! ```ignore
//! use ifc_checker_model::IfcModel;
//!
//! let model = ifc_checker_parser::load(Path::new("house.ifc"))?;
//!
//! // Access entities
//! let walls = model.resolver().find_by_type_name("IfcWall");
//! println!("Found {} walls", walls.len());
//! ```

mod builder;
mod model;
mod properties;
mod resolver;
mod scanner;
mod tokenizer;
mod writer;

pub use builder::ModelBuilder;
pub use model::StepModel;
pub use properties::PropertyIndex;
pub use resolver::EntityStore;
pub use scanner::{parse_header, EntityScanner, RawEntity};
pub use tokenizer::{decode_string, parse_entity, Token};
pub use writer::{encode_string, format_real, to_step, write_to};

use ifc_checker_model::{Error, IfcModel, IfcParser, Result};
use std::path::Path;
use std::sync::Arc;

/// Main STEP/IFC parser implementing `IfcParser` trait
#[derive(Default, Clone, Copy, Debug)]
pub struct StepParser;

impl StepParser {
    /// Create a new parser
    pub fn new() -> Self {
        Self
    }
}

impl IfcParser for StepParser {
    fn parse(&self, content: &str) -> Result<Arc<dyn IfcModel>> {
        StepModel::parse(content).map(|m| Arc::new(m) as Arc<dyn IfcModel>)
    }
}

/// Quick parse function for simple use cases
pub fn parse(content: &str) -> Result<StepModel> {
    StepModel::parse(content)
}

/// Read and parse the IFC file at `path`
///
/// Fails with [`Error::FileAccess`] when the path cannot be read (missing,
/// a directory, no permission) and with a parse error when the content is
/// not an ISO 10303-21 exchange structure.
pub fn load(path: &Path) -> Result<StepModel> {
    let bytes = std::fs::read(path).map_err(|e| Error::file_access(path, e))?;
    log::debug!("read {} bytes from {}", bytes.len(), path.display());
    StepModel::parse(&String::from_utf8_lossy(&bytes))
}
