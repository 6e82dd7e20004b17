// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

//! Conductor configuration fragment types.
//!
//! The `Raw*` types mirror the exact tree a spawned conductor consumes. The
//! remaining types are the author-facing forms that the conductor-config
//! engine lowers into that tree.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Storage backing for one instance. Deliberately left unvalidated: the
/// conductor interprets it, this layer passes it through unchanged.
pub type StorageConfig = Value;

/// Identity of one simulated participant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentConfig {
    pub id: String,
    pub name: String,
    pub keystore_file: String,
    pub public_address: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub test_agent: Option<bool>,
}

impl AgentConfig {
    /// Synthesize a throwaway test agent from a bare name. Keystore and
    /// address are derived from the name; the conductor generates real keys
    /// for agents flagged as `test_agent`.
    pub fn test_agent(name: &str) -> Self {
        Self {
            id: name.to_string(),
            name: name.to_string(),
            keystore_file: name.to_string(),
            public_address: name.to_string(),
            test_agent: Some(true),
        }
    }
}

/// Reference to a loadable application package.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DnaConfig {
    pub id: String,
    pub file: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hash: Option<String>,
    /// Distinguishes instances of the same package from each other.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub uuid: Option<String>,
}

impl DnaConfig {
    pub fn new(id: impl Into<String>, file: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            file: file.into(),
            hash: None,
            uuid: None,
        }
    }

    /// Expand a bare DNA reference: the reference doubles as id and file path.
    pub fn from_ref(reference: impl Into<String>) -> Self {
        let reference = reference.into();
        Self::new(reference.clone(), reference)
    }

    pub fn with_uuid(mut self, uuid: impl Into<String>) -> Self {
        self.uuid = Some(uuid.into());
        self
    }
}

/// Instance entry in the raw conductor tree: agent and dna are id references
/// into the sibling `agents` / `dnas` sequences.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawInstanceConfig {
    pub id: String,
    pub agent: String,
    pub dna: String,
    pub storage: StorageConfig,
}

/// Named capability link between two instances. The caller/callee ids are
/// expected to resolve to declared instances, but this layer does not
/// enforce that.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BridgeConfig {
    pub handle: String,
    pub caller_id: String,
    pub callee_id: String,
}

impl BridgeConfig {
    pub fn new(
        handle: impl Into<String>,
        caller_id: impl Into<String>,
        callee_id: impl Into<String>,
    ) -> Self {
        Self {
            handle: handle.into(),
            caller_id: caller_id.into(),
            callee_id: callee_id.into(),
        }
    }
}

/// Distributed public-key-identity subsystem configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DpkiConfig {
    pub instance_id: String,
    pub init_params: String,
}

/// Closed set of named networking modes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NetworkMode {
    N3h,
    Memory,
    Websocket,
}

/// Open, unvalidated network mapping. Intentional escape hatch for forward
/// compatibility with networking backends this layer does not model.
pub type RawNetworkConfig = serde_json::Map<String, Value>;

/// Either a named mode or the open escape hatch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum NetworkConfig {
    Mode(NetworkMode),
    Raw(RawNetworkConfig),
}

impl From<NetworkMode> for NetworkConfig {
    fn from(mode: NetworkMode) -> Self {
        NetworkConfig::Mode(mode)
    }
}

/// Open, unvalidated logger mapping.
pub type RawLoggerConfig = serde_json::Map<String, Value>;

/// Logger toggle or structured logger mapping.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum LoggerConfig {
    Toggle(bool),
    Raw(RawLoggerConfig),
}

/// Cloud-logging destination descriptor.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CloudWatchLogsConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub log_group_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub log_stream_name: Option<String>,
}

/// Bare metric publisher tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MetricPublisherKind {
    Logger,
}

/// Author-facing metric publisher: a bare `"logger"` tag or a cloud-logging
/// descriptor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MetricPublisherConfig {
    Named(MetricPublisherKind),
    CloudWatch(CloudWatchLogsConfig),
}

/// Metric publisher as the conductor consumes it, discriminated by `type`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum RawMetricPublisherConfig {
    #[serde(rename = "cloudwatchlogs")]
    CloudWatchLogs {
        #[serde(skip_serializing_if = "Option::is_none")]
        region: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        log_group_name: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        log_stream_name: Option<String>,
    },
    #[serde(rename = "logger")]
    Logger,
}

impl From<MetricPublisherConfig> for RawMetricPublisherConfig {
    fn from(config: MetricPublisherConfig) -> Self {
        match config {
            MetricPublisherConfig::Named(MetricPublisherKind::Logger) => {
                RawMetricPublisherConfig::Logger
            }
            MetricPublisherConfig::CloudWatch(c) => RawMetricPublisherConfig::CloudWatchLogs {
                region: c.region,
                log_group_name: c.log_group_name,
                log_stream_name: c.log_stream_name,
            },
        }
    }
}

/// Signal emission switches for a spawned conductor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignalsConfig {
    pub trace: bool,
    pub consistency: bool,
}

/// Instance id reference inside an interface definition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InstanceRef {
    pub id: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InterfaceDriver {
    #[serde(rename = "type")]
    pub kind: String,
    pub port: u16,
}

/// One conductor interface, e.g. the admin websocket the orchestrator talks to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InterfaceConfig {
    pub admin: bool,
    pub choose_free_port: bool,
    pub id: String,
    pub driver: InterfaceDriver,
    pub instances: Vec<InstanceRef>,
}

/// Optional configuration fragments shared across players of a scenario.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ConductorConfigCommon {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bridges: Option<Vec<BridgeConfig>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dpki: Option<DpkiConfig>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub network: Option<NetworkConfig>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub logger: Option<LoggerConfig>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metric_publisher: Option<RawMetricPublisherConfig>,
}

/// The root aggregate handed to the process-spawning collaborator. This is
/// the sole bit-exact boundary the config engine guarantees.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawConductorConfig {
    pub agents: Vec<AgentConfig>,
    pub dnas: Vec<DnaConfig>,
    pub instances: Vec<RawInstanceConfig>,
    pub interfaces: Vec<InterfaceConfig>,
    pub signals: SignalsConfig,
    #[serde(flatten)]
    pub common: ConductorConfigCommon,
}
