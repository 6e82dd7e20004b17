//! Typed extraction of already-validated value trees.

use serde::de::DeserializeOwned;
use serde_json::Value as J;

use crate::{ConfigError, Result};

/// Extract a typed view of a validated tree. Extraction failures are
/// path-qualified; they indicate a gap between a validator and its typed
/// counterpart rather than bad user input, which `decode` rejects first.
pub fn get<T: DeserializeOwned>(value: &J) -> Result<T> {
    serde_path_to_error::deserialize(value.clone())
        .map_err(|e| ConfigError::Extract(e.to_string()))
}
