//! Seed collection loading.
//!
//! The seed file is a JSON array of movie records with ids. Every record is
//! run through full validation before it enters the store; the first bad
//! record aborts startup.

use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::movies::model::MovieId;
use crate::movies::schema::{MovieSchema, ShapeError};
use crate::movies::store::{MovieStore, StoreError};

/// Error type for seed loading.
#[derive(Debug, Error)]
pub enum SeedError {
    #[error("failed to read seed file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("seed file is not valid JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("seed file must contain a JSON array")]
    NotAnArray,

    #[error("seed record {index} has no id")]
    MissingId { index: usize },

    #[error("seed record {index} is invalid: {error:?}")]
    InvalidRecord { index: usize, error: ShapeError },

    #[error("seed record {index}: {source}")]
    Duplicate {
        index: usize,
        #[source]
        source: StoreError,
    },
}

/// Read and validate the seed file at `path`.
pub fn load_seed(path: &Path, schema: &MovieSchema) -> Result<MovieStore, SeedError> {
    let content = fs::read_to_string(path).map_err(|source| SeedError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let store = parse_seed(&content, schema)?;

    tracing::info!(path = %path.display(), records = store.len(), "Seed collection loaded");
    Ok(store)
}

/// Validate a seed collection held in memory.
pub fn parse_seed(content: &str, schema: &MovieSchema) -> Result<MovieStore, SeedError> {
    let Value::Array(records) = serde_json::from_str::<Value>(content)? else {
        return Err(SeedError::NotAnArray);
    };

    let mut store = MovieStore::new();
    for (index, record) in records.iter().enumerate() {
        let id = record
            .get("id")
            .and_then(Value::as_str)
            .filter(|id| !id.trim().is_empty())
            .ok_or(SeedError::MissingId { index })?;

        let draft = schema
            .validate_full(record)
            .map_err(|error| SeedError::InvalidRecord { index, error })?;

        store
            .append(draft.into_movie(MovieId::from(id)))
            .map_err(|source| SeedError::Duplicate { index, source })?;
    }

    Ok(store)
}
