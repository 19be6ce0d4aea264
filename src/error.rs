// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Error types for annotation storage.

use std::path::PathBuf;
use thiserror::Error;

/// Failures raised by the annotation store and the session operations
/// built on top of it.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("No video selected, there is no annotation directory to use")]
    NoDirectorySelected,

    #[error("Failed to create annotation directory {path}: {source}")]
    DirectoryCreate {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Annotation not found: {0}")]
    RecordNotFound(String),

    #[error("Annotation {name} is not a valid record: {source}")]
    RecordParse {
        name: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Failed to delete annotation {name}: {source}")]
    Delete {
        name: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to encode record: {0}")]
    Serialize(#[from] serde_json::Error),
}

impl StoreError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, StoreError::RecordNotFound(_))
    }
}

pub type StoreResult<T> = std::result::Result<T, StoreError>;
