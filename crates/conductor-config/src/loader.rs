// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

//! Loading instance configs from template files.

use std::fs;
use std::path::{Path, PathBuf};

use ch_config_types::{EitherInstancesConfig, IntermediateConfig};
use serde_json::Value as J;

use crate::seed::{config_seed, ConfigSeed};
use crate::{decode, extract, schema, ConfigError, Result};

/// Read a sugared or dry instances document from a YAML, TOML, or JSON file.
pub fn read_instances_file(path: &Path) -> Result<EitherInstancesConfig> {
    let content = fs::read_to_string(path)?;
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or_default();
    let value = match extension {
        "yaml" | "yml" => parse_yaml_to_json(&content)?,
        "toml" => parse_toml_to_json(&content)?,
        "json" => serde_json::from_str(&content).map_err(|e| ConfigError::Parse(e.to_string()))?,
        other => {
            return Err(ConfigError::Parse(format!(
                "unsupported instances file extension '{other}' ({})",
                path.display()
            )))
        }
    };
    let context = format!("instances file {}", path.display());
    decode::decode(&schema::EITHER_INSTANCES, &value, Some(&context))?;
    extract::get(&value)
}

/// Wrap a template file into a [`ConfigSeed`] that re-reads it per player.
pub fn instances_seed(path: PathBuf) -> ConfigSeed {
    config_seed(move |_args| {
        let path = path.clone();
        async move {
            let instances = read_instances_file(&path)?;
            Ok(IntermediateConfig::from(instances))
        }
    })
}

/// Parse a YAML string to a JSON value for schema validation.
fn parse_yaml_to_json(yaml_str: &str) -> Result<J> {
    let yaml: serde_yaml::Value =
        serde_yaml::from_str(yaml_str).map_err(|e| ConfigError::Parse(e.to_string()))?;
    serde_json::to_value(yaml).map_err(|e| ConfigError::Parse(e.to_string()))
}

/// Parse a TOML string to a JSON value for schema validation.
fn parse_toml_to_json(toml_str: &str) -> Result<J> {
    let toml: toml::Value = toml_str
        .parse::<toml::Value>()
        .map_err(|e| ConfigError::Parse(e.to_string()))?;
    serde_json::to_value(toml).map_err(|e| ConfigError::Parse(e.to_string()))
}
