// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! # IFC Checker
//!
//! Compares IFC models and reduces them to a representative sample.
//!
//! - **Structure**: [`extract_structure`] groups product entities by type and
//!   [`compare_structure`] scores two populations against each other.
//! - **Properties**: [`build_catalog`] lists `(type, pset, property)`
//!   triples; [`compare_properties`] queries a second model with them and
//!   counts the values whose kind matches.
//! - **Reduction**: [`clean_model`] keeps the first instance of every
//!   whitelisted element type together with its property sets.
//!
//! Model-level functions take any [`IfcModel`]; [`Checker`] wraps them with
//! path-based loading and the configured [`FailureMode`].
//!
//! ## Example
//!
//! ```ignore
//! use ifc_checker::{Checker, CheckerConfig};
//!
//! let checker = Checker::new(CheckerConfig::from_env());
//! let score = checker.compare_files("v1.ifc", "v2.ifc")?;
//! let report = checker.compare_properties("v1.ifc", "v2.ifc")?;
//! println!("{score:.2} / {:.1}%", report.similarity_score);
//!
//! let outcome = checker.clean("v1.ifc")?;
//! ifc_checker_parser::write_to(outcome.model(), Path::new("v1-reduced.ifc"))?;
//! ```

pub mod catalog;
pub mod checker;
pub mod cleaner;
pub mod config;
pub mod diagnostics;
pub mod error;
pub mod resolver;
pub mod similarity;
pub mod structure;

pub use catalog::{build_catalog, element_types, properties_in_pset, psets_for_type, CatalogEntry};
pub use checker::Checker;
pub use cleaner::{clean_model, compress_guid, CleanOutcome, CleanSummary};
pub use config::{CheckerConfig, FailureMode, DEFAULT_WHITELIST};
pub use diagnostics::Diagnostics;
pub use error::{CheckError, Result};
pub use resolver::{resolve, PropertyValue};
pub use similarity::{compare_properties, compare_properties_with, SimilarityReport};
pub use structure::{compare_models, compare_structure, extract_structure, TypeMap};

pub use ifc_checker_model::{IfcModel, ValueKind};
