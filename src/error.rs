//! Error kinds raised by the catalog engine.
//!
//! Validation failures are local to one package, version parse failures are
//! local to one query and `DuplicateVersion` aborts a single index build.
//! Callers usually carry these inside `anyhow::Error` and downcast when they
//! need to tell them apart.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("invalid version '{input}': {source}")]
    MalformedVersion {
        input: String,
        #[source]
        source: semver::Error,
    },

    #[error("invalid version constraint '{input}': {source}")]
    InvalidConstraint {
        input: String,
        #[source]
        source: semver::Error,
    },

    #[error("dataset name is not allowed to contain `-`: {0}")]
    InvalidIdentifier(String),

    #[error("package contains pipelines which are not used: {files:?}, {dataset}")]
    UnusedPipelines { dataset: String, files: Vec<String> },

    #[error("defined ingest_pipeline does not exist: {}", .dir.join(.pipeline).display())]
    MissingPipeline {
        dataset: String,
        pipeline: String,
        dir: PathBuf,
    },

    #[error("missing required field '{field}' in {context}")]
    MissingField { field: &'static str, context: String },

    #[error("invalid package name '{0}'")]
    InvalidPackageName(String),

    #[error("duplicate package version: {name}@{version}")]
    DuplicateVersion { name: String, version: String },
}
