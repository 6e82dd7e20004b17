// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

//! Instance configuration along the resolution axis: sugared shorthand,
//! expanded dry form, and the either-flavor wrapper the engine accepts.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::conductor::{AgentConfig, ConductorConfigCommon, DnaConfig, StorageConfig};

/// Fully expanded instance: agent and dna embedded by value rather than by id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DryInstanceConfig {
    pub id: String,
    pub agent: AgentConfig,
    pub dna: DnaConfig,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub storage: Option<StorageConfig>,
}

/// Agent position in a sugared instance: a bare name (a test agent is
/// synthesized from it) or a full embedded config.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AgentSpec {
    Name(String),
    Config(AgentConfig),
}

impl AgentSpec {
    pub fn into_config(self) -> AgentConfig {
        match self {
            AgentSpec::Name(name) => AgentConfig::test_agent(&name),
            AgentSpec::Config(config) => config,
        }
    }
}

/// DNA position in a sugared instance: a bare reference (id and file derive
/// from it) or a full embedded config.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DnaSpec {
    Ref(String),
    Config(DnaConfig),
}

impl DnaSpec {
    pub fn into_config(self) -> DnaConfig {
        match self {
            DnaSpec::Ref(reference) => DnaConfig::from_ref(reference),
            DnaSpec::Config(config) => config,
        }
    }
}

/// Sugared instance body naming agent and dna explicitly. The instance id is
/// always taken from the enclosing mapping key, never from this value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SugaredInstance {
    pub agent: AgentSpec,
    pub dna: DnaSpec,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub storage: Option<StorageConfig>,
}

/// One value in a sugared instances mapping. Alternatives are tried in
/// order; the first structurally matching one wins.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SugaredInstanceConfig {
    /// Bare DNA reference; the agent is synthesized from the mapping key.
    Dna(DnaSpec),
    /// Explicit agent/dna/storage.
    Instance(SugaredInstance),
}

/// Either flavor of instances config accepted by the engine: an
/// already-ordered dry sequence, or a mapping from instance id to sugared
/// description. Mapping values stay untyped here; the engine decodes each one
/// at its trust boundary. Mapping insertion order is significant downstream.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum EitherInstancesConfig {
    Dry(Vec<DryInstanceConfig>),
    Sugared(serde_json::Map<String, Value>),
}

impl EitherInstancesConfig {
    pub fn dry(instances: Vec<DryInstanceConfig>) -> Self {
        EitherInstancesConfig::Dry(instances)
    }

    /// Build a sugared mapping from `(id, value)` pairs, preserving order.
    pub fn sugared<K, I>(entries: I) -> Self
    where
        K: Into<String>,
        I: IntoIterator<Item = (K, Value)>,
    {
        EitherInstancesConfig::Sugared(
            entries.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        )
    }
}

/// What a config seed yields: instance data plus any per-player overrides of
/// the common fragments.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IntermediateConfig {
    pub instances: EitherInstancesConfig,
    #[serde(flatten)]
    pub common: ConductorConfigCommon,
}

impl From<EitherInstancesConfig> for IntermediateConfig {
    fn from(instances: EitherInstancesConfig) -> Self {
        Self {
            instances,
            common: ConductorConfigCommon::default(),
        }
    }
}
