// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

//! Validation trust boundary between user-authored config and the engine.

use serde_json::Value as J;
use tracing::error;

use crate::schema::Validator;
use crate::{ConfigError, Result};

/// Validate `value` against `validator`.
///
/// On success the borrowed input is returned unchanged: decoding never
/// coerces or converts. On failure the report names every violated field
/// path on its own bullet line, prefixed by the optional `context`, and the
/// whole step fails hard. No partial results, no default substitution.
pub fn decode<'v>(validator: &Validator, value: &'v J, context: Option<&str>) -> Result<&'v J> {
    let outcome = validator.compiled().validate(value);
    let Err(errors) = outcome else {
        return Ok(value);
    };

    let lines: Vec<String> = errors
        .map(|e| {
            let path = e.instance_path.to_string();
            if path.is_empty() {
                e.to_string()
            } else {
                format!("{path}: {e}")
            }
        })
        .collect();
    let prefix = context.map(|c| format!("{c}\n")).unwrap_or_default();
    let msg = format!(
        "{prefix}Invalid {} value; found the following problems:\n  - {}",
        validator.name(),
        lines.join("\n  - ")
    );
    error!("{msg}");
    Err(ConfigError::Validation(msg))
}
