// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Error types for the checker.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for checker operations
pub type Result<T> = std::result::Result<T, CheckError>;

/// Checker error taxonomy.
#[derive(Error, Debug)]
pub enum CheckError {
    /// The file is missing, unreadable or not a file
    #[error("Cannot open {}: {source}", path.display())]
    FileAccess {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The file is not valid IFC STEP content
    #[error("Parse error: {0}")]
    Parse(String),

    /// No instance of the type carries the requested property
    #[error("Property '{property}' not found in '{pset}' on any {entity_type}")]
    PropertyNotFound {
        entity_type: String,
        pset: String,
        property: String,
    },

    /// Anything else raised by the IFC collaborator
    #[error("Engine error: {0}")]
    Engine(String),
}

impl CheckError {
    pub fn property_not_found(
        entity_type: impl Into<String>,
        pset: impl Into<String>,
        property: impl Into<String>,
    ) -> Self {
        CheckError::PropertyNotFound {
            entity_type: entity_type.into(),
            pset: pset.into(),
            property: property.into(),
        }
    }

    /// Stable short name of the variant, used in reports
    pub fn kind(&self) -> &'static str {
        match self {
            CheckError::FileAccess { .. } => "file_access",
            CheckError::Parse(_) => "parse",
            CheckError::PropertyNotFound { .. } => "property_not_found",
            CheckError::Engine(_) => "engine",
        }
    }
}

impl From<ifc_checker_model::Error> for CheckError {
    fn from(err: ifc_checker_model::Error) -> Self {
        use ifc_checker_model::Error;
        match err {
            Error::FileAccess { path, source } => CheckError::FileAccess { path, source },
            err @ (Error::InvalidFormat(_) | Error::EntityParse(..)) => {
                CheckError::Parse(err.to_string())
            }
            other => CheckError::Engine(other.to_string()),
        }
    }
}
