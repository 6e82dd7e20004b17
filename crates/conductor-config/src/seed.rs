// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

//! Per-player config seed pipeline.
//!
//! Drives one player's resolution end to end: allocates identity and
//! resources, invokes the player's config-producing function, lowers the
//! result into the canonical conductor tree, and validates it at the final
//! trust boundary. A validation failure aborts configuration for the player
//! entirely; no partial players are handed to the spawn collaborator.

use std::future::Future;
use std::path::PathBuf;
use std::sync::Arc;

use ch_config_types::{
    AgentConfig, ConductorConfigCommon, ConfigSeedArgs, DnaConfig, EitherInstancesConfig,
    InstanceRef, InterfaceConfig, InterfaceDriver, IntermediateConfig, RawConductorConfig,
    RawInstanceConfig, SignalsConfig,
};
use futures::future::BoxFuture;
use serde_json::{json, Value as J};
use tracing::debug;
use uuid::Uuid;

use crate::{decode, extract, merge, schema, sugar, ConfigError, Fort, PortAllocator, Result};

/// Id of the admin interface the orchestrator drives each conductor through.
pub const ADMIN_INTERFACE_ID: &str = "admin-interface";

/// A config-producing function resolved once per player, with that player's
/// context. Seeds may perform asynchronous work, e.g. reading template files.
pub type ConfigSeed =
    Box<dyn Fn(ConfigSeedArgs) -> BoxFuture<'static, anyhow::Result<IntermediateConfig>> + Send + Sync>;

/// Box an async closure into a [`ConfigSeed`].
pub fn config_seed<F, Fut>(seed: F) -> ConfigSeed
where
    F: Fn(ConfigSeedArgs) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = anyhow::Result<IntermediateConfig>> + Send + 'static,
{
    Box::new(move |args| Box::pin(seed(args)))
}

/// Any legal way for a player to describe its conductor: a config seed, or
/// an already-resolved instance set.
pub enum AnyConfigBuilder {
    Seed(ConfigSeed),
    Instances(EitherInstancesConfig),
}

impl From<EitherInstancesConfig> for AnyConfigBuilder {
    fn from(instances: EitherInstancesConfig) -> Self {
        AnyConfigBuilder::Instances(instances)
    }
}

/// One player's fully resolved output: the context it was resolved under and
/// the canonical conductor tree.
#[derive(Debug, Clone, PartialEq)]
pub struct PlayerConfig {
    pub args: ConfigSeedArgs,
    pub config: RawConductorConfig,
}

/// Resolves player configurations for one orchestration run.
///
/// The allocator is the run's single shared resource; everything else each
/// `build` call touches is freshly generated or deep-copied, so players may
/// resolve concurrently.
pub struct SeedPipeline {
    allocator: Arc<PortAllocator>,
    base_dir: PathBuf,
}

impl SeedPipeline {
    pub fn new(allocator: Arc<PortAllocator>) -> Self {
        Self {
            allocator,
            base_dir: std::env::temp_dir(),
        }
    }

    /// Place per-player config dirs under `base_dir` instead of the system
    /// temp dir.
    pub fn with_base_dir(allocator: Arc<PortAllocator>, base_dir: impl Into<PathBuf>) -> Self {
        Self {
            allocator,
            base_dir: base_dir.into(),
        }
    }

    /// Allocate identity and resources for one player. The interface port is
    /// allocated here, before any seed runs, so seeds can reference it when
    /// constructing interface definitions or storage paths.
    pub fn seed_args(&self, scenario_name: &str, player_name: &str) -> Result<ConfigSeedArgs> {
        let uuid = Uuid::new_v4().to_string();
        let interface_port = self.allocator.allocate()?;
        let config_dir = tempfile::Builder::new()
            .prefix(&format!("{scenario_name}-{player_name}-"))
            .tempdir_in(&self.base_dir)?
            .keep();
        Ok(ConfigSeedArgs {
            scenario_name: scenario_name.to_string(),
            player_name: player_name.to_string(),
            uuid,
            interface_port,
            config_dir,
        })
    }

    /// Resolve every player of a scenario concurrently. The first failing
    /// player aborts the whole setup; no partial player set is returned.
    pub async fn build_all(
        &self,
        scenario_name: &str,
        players: Vec<(String, AnyConfigBuilder)>,
        common: &Fort<ConductorConfigCommon>,
    ) -> Result<Vec<PlayerConfig>> {
        let builds = players.into_iter().map(|(player_name, builder)| async move {
            self.build(scenario_name, &player_name, builder, common).await
        });
        futures::future::try_join_all(builds).await
    }

    /// Resolve one player's canonical conductor configuration.
    pub async fn build(
        &self,
        scenario_name: &str,
        player_name: &str,
        builder: AnyConfigBuilder,
        common: &Fort<ConductorConfigCommon>,
    ) -> Result<PlayerConfig> {
        let args = self.seed_args(scenario_name, player_name)?;
        debug!(
            scenario = scenario_name,
            player = player_name,
            port = args.interface_port,
            "seeding conductor config"
        );

        let intermediate = match builder {
            AnyConfigBuilder::Seed(seed) => seed(args.clone()).await?,
            AnyConfigBuilder::Instances(instances) => IntermediateConfig::from(instances),
        };
        let run_common = common.resolve(&args).await?;
        let config = canonicalize(&args, intermediate, &run_common)?;
        debug!(player = player_name, "conductor config resolved");
        Ok(PlayerConfig { args, config })
    }
}

/// Lower an intermediate config into the validated canonical tree.
fn canonicalize(
    args: &ConfigSeedArgs,
    intermediate: IntermediateConfig,
    run_common: &ConductorConfigCommon,
) -> Result<RawConductorConfig> {
    let dry = sugar::normalize(intermediate.instances)?;

    let mut agents: Vec<AgentConfig> = Vec::new();
    let mut dnas: Vec<DnaConfig> = Vec::new();
    let mut instances: Vec<RawInstanceConfig> = Vec::new();
    for instance in dry {
        // Agents and DNAs are unique by id; first occurrence wins.
        if !agents.iter().any(|a| a.id == instance.agent.id) {
            agents.push(instance.agent.clone());
        }
        if !dnas.iter().any(|d| d.id == instance.dna.id) {
            dnas.push(instance.dna.clone());
        }
        instances.push(RawInstanceConfig {
            id: instance.id,
            agent: instance.agent.id,
            dna: instance.dna.id,
            storage: instance.storage.unwrap_or_else(default_storage),
        });
    }

    let interfaces = vec![admin_interface(args.interface_port, &instances)];
    let signals = SignalsConfig {
        trace: false,
        consistency: true,
    };

    // Run-level common fragments first, the seed's own fragments layered
    // over them, the assembled core fields last.
    let mut tree = to_tree(run_common)?;
    merge::merge_values(&mut tree, to_tree(&intermediate.common)?);
    merge::merge_values(
        &mut tree,
        json!({
            "agents": agents,
            "dnas": dnas,
            "instances": instances,
            "interfaces": interfaces,
            "signals": signals,
        }),
    );

    let context = format!(
        "conductor config for player '{}' in scenario '{}'",
        args.player_name, args.scenario_name
    );
    decode::decode(&schema::CONDUCTOR, &tree, Some(&context))?;
    extract::get(&tree)
}

fn to_tree<T: serde::Serialize>(value: &T) -> Result<J> {
    serde_json::to_value(value).map_err(|e| ConfigError::Parse(e.to_string()))
}

fn default_storage() -> J {
    json!({"type": "memory"})
}

fn admin_interface(port: u16, instances: &[RawInstanceConfig]) -> InterfaceConfig {
    InterfaceConfig {
        admin: true,
        choose_free_port: false,
        id: ADMIN_INTERFACE_ID.to_string(),
        driver: InterfaceDriver {
            kind: "websocket".to_string(),
            port,
        },
        instances: instances
            .iter()
            .map(|i| InstanceRef { id: i.id.clone() })
            .collect(),
    }
}
