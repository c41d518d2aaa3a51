// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Error types for IFC reading and writing

use crate::EntityId;
use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for model operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised while loading, parsing or building an IFC model
#[derive(Error, Debug)]
pub enum Error {
    /// The file could not be opened or read
    #[error("Cannot read {}: {source}", path.display())]
    FileAccess {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Content is not an ISO 10303-21 exchange structure
    #[error("Invalid IFC format: {0}")]
    InvalidFormat(String),

    /// A data section record could not be tokenized
    #[error("Failed to parse entity {0}: {1}")]
    EntityParse(EntityId, String),

    /// Entity not found
    #[error("Entity {0} not found")]
    EntityNotFound(EntityId),

    /// An attribute points at an entity that does not exist
    #[error("Entity {entity} references missing entity {target}")]
    DanglingReference { entity: EntityId, target: EntityId },

    /// IO error while writing
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Create a new format error
    pub fn format(msg: impl Into<String>) -> Self {
        Error::InvalidFormat(msg.into())
    }

    /// Create a new entity parse error
    pub fn entity_parse(id: EntityId, msg: impl Into<String>) -> Self {
        Error::EntityParse(id, msg.into())
    }

    /// Create a file access error for `path`
    pub fn file_access(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Error::FileAccess {
            path: path.into(),
            source,
        }
    }

    /// True when the error means the file itself was unreachable
    pub fn is_file_access(&self) -> bool {
        matches!(self, Error::FileAccess { .. })
    }

    /// True when the error comes from malformed content
    pub fn is_parse(&self) -> bool {
        matches!(self, Error::InvalidFormat(_) | Error::EntityParse(..))
    }
}
