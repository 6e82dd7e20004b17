// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

//! Sugaring normalizer: lowers either flavor of instances config into the
//! canonical ordered sequence of dry instance configs.

use ch_config_types::{
    AgentConfig, DryInstanceConfig, EitherInstancesConfig, SugaredInstance, SugaredInstanceConfig,
};
use serde_json::Value as J;

use crate::{decode, extract, schema, ConfigError, Result};

/// Normalize into the canonical ordered dry sequence.
///
/// An already-dry sequence passes through element-for-element with its
/// authored order preserved. A sugared mapping is expanded in its insertion
/// order; each value is decoded at this trust boundary before expansion.
/// The resulting order is significant downstream: interfaces reference
/// instances by id, but logs and spawn ordering follow this sequence.
pub fn normalize(config: EitherInstancesConfig) -> Result<Vec<DryInstanceConfig>> {
    match config {
        EitherInstancesConfig::Dry(instances) => {
            for (idx, instance) in instances.iter().enumerate() {
                let value =
                    serde_json::to_value(instance).map_err(|e| ConfigError::Parse(e.to_string()))?;
                decode::decode(
                    &schema::DRY_INSTANCE,
                    &value,
                    Some(&format!("dry instance [{idx}]")),
                )?;
            }
            Ok(instances)
        }
        EitherInstancesConfig::Sugared(entries) => {
            let mut dry = Vec::with_capacity(entries.len());
            for (key, value) in entries {
                let context = format!("instance '{key}'");
                decode::decode(&schema::SUGARED_INSTANCE, &value, Some(&context))?;
                let sugared: SugaredInstanceConfig = extract::get(&value)?;
                dry.push(expand(key, sugared));
            }
            Ok(dry)
        }
    }
}

/// Decode an untyped value as either flavor, then normalize. Entry point for
/// file-backed instance documents.
pub fn normalize_value(value: &J) -> Result<Vec<DryInstanceConfig>> {
    decode::decode(&schema::EITHER_INSTANCES, value, None)?;
    normalize(extract::get(value)?)
}

/// Expand one sugared mapping entry. The instance id is always the mapping
/// key; a bare DNA reference additionally synthesizes a test agent from the
/// key, so each instance by default simulates its own unique participant.
/// DNA identity and instance identity are independent axes: two keys naming
/// the same DNA yield two distinct instances with two distinct agents.
fn expand(id: String, sugared: SugaredInstanceConfig) -> DryInstanceConfig {
    match sugared {
        SugaredInstanceConfig::Dna(dna) => DryInstanceConfig {
            agent: AgentConfig::test_agent(&id),
            dna: dna.into_config(),
            id,
            storage: None,
        },
        SugaredInstanceConfig::Instance(SugaredInstance {
            agent,
            dna,
            storage,
        }) => DryInstanceConfig {
            id,
            agent: agent.into_config(),
            dna: dna.into_config(),
            storage,
        },
    }
}
