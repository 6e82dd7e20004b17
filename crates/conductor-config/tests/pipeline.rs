// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

//! End-to-end tests for the per-player config seed pipeline.

use std::collections::HashSet;
use std::sync::Arc;

use ch_config_types::{
    BridgeConfig, ConductorConfigCommon, DpkiConfig, EitherInstancesConfig, IntermediateConfig,
    NetworkMode, RawMetricPublisherConfig,
};
use conductor_config::{
    config_seed, loader, persist, sugar, AnyConfigBuilder, ConfigError, Fort, PortAllocator,
    SeedPipeline, ADMIN_INTERFACE_ID,
};
use serde_json::json;
use tempfile::TempDir;

fn pipeline(base: &TempDir) -> SeedPipeline {
    SeedPipeline::with_base_dir(Arc::new(PortAllocator::default()), base.path())
}

#[tokio::test]
async fn seed_resolves_to_canonical_config() {
    let base = TempDir::new().unwrap();
    let seed = config_seed(|_args| async move {
        Ok(IntermediateConfig {
            instances: EitherInstancesConfig::sugared([("alice", json!("chat-app"))]),
            common: ConductorConfigCommon {
                bridges: Some(vec![]),
                ..Default::default()
            },
        })
    });

    let player = pipeline(&base)
        .build("s1", "alice", AnyConfigBuilder::Seed(seed), &Fort::default())
        .await
        .unwrap();

    let config = &player.config;
    assert_eq!(config.instances.len(), 1);
    assert_eq!(config.instances[0].id, "alice");
    assert_eq!(config.instances[0].agent, "alice");
    assert_eq!(config.instances[0].dna, "chat-app");
    assert_eq!(config.instances[0].storage, json!({"type": "memory"}));

    assert_eq!(config.agents.len(), 1);
    assert_eq!(config.agents[0].name, "alice");
    assert_eq!(config.dnas.len(), 1);
    assert_eq!(config.dnas[0].id, "chat-app");

    // Interfaces and signals come from pipeline defaults.
    assert_eq!(config.interfaces.len(), 1);
    let interface = &config.interfaces[0];
    assert!(interface.admin);
    assert!(!interface.choose_free_port);
    assert_eq!(interface.id, ADMIN_INTERFACE_ID);
    assert_eq!(interface.driver.kind, "websocket");
    assert_eq!(interface.driver.port, player.args.interface_port);
    assert_eq!(interface.instances[0].id, "alice");

    assert!(!config.signals.trace);
    assert!(config.signals.consistency);
    assert_eq!(config.common.bridges, Some(vec![]));

    assert_eq!(player.args.scenario_name, "s1");
    assert_eq!(player.args.player_name, "alice");
    assert!(player.args.config_dir.is_dir());
}

#[tokio::test]
async fn instance_set_builder_needs_no_seed() {
    let base = TempDir::new().unwrap();
    let instances = EitherInstancesConfig::sugared([
        ("alice", json!("chat-app")),
        ("bob", json!("chat-app")),
    ]);

    let player = pipeline(&base)
        .build("s1", "node", instances.into(), &Fort::default())
        .await
        .unwrap();

    // Same DNA under two keys: one dna entry, two instances, two agents.
    assert_eq!(player.config.dnas.len(), 1);
    assert_eq!(player.config.instances.len(), 2);
    assert_eq!(player.config.agents.len(), 2);
    let ids: Vec<&str> = player.config.instances.iter().map(|i| i.id.as_str()).collect();
    assert_eq!(ids, vec!["alice", "bob"]);
}

#[tokio::test]
async fn common_fragments_merge_into_every_player() {
    let base = TempDir::new().unwrap();
    let common = Fort::deferred(|args: ch_config_types::ConfigSeedArgs| async move {
        // Per-player common config is legal: the bridge handle sees the uuid.
        Ok(ConductorConfigCommon {
            bridges: Some(vec![BridgeConfig::new(
                format!("bridge-{}", args.uuid),
                "alice",
                "bob",
            )]),
            dpki: Some(DpkiConfig {
                instance_id: "dpki".into(),
                init_params: "{}".into(),
            }),
            network: Some(NetworkMode::Memory.into()),
            metric_publisher: Some(RawMetricPublisherConfig::Logger),
            ..Default::default()
        })
    });

    let instances = EitherInstancesConfig::sugared([
        ("alice", json!("chat-app")),
        ("bob", json!("chat-app")),
    ]);
    let player = pipeline(&base)
        .build("s1", "node", instances.into(), &common)
        .await
        .unwrap();

    let common = &player.config.common;
    let bridges = common.bridges.as_ref().unwrap();
    assert_eq!(bridges.len(), 1);
    assert!(bridges[0].handle.starts_with("bridge-"));
    assert_eq!(common.dpki.as_ref().unwrap().instance_id, "dpki");
    assert_eq!(
        common.network,
        Some(NetworkMode::Memory.into())
    );
    assert_eq!(common.metric_publisher, Some(RawMetricPublisherConfig::Logger));
}

#[tokio::test]
async fn seed_fragments_override_run_level_common() {
    let base = TempDir::new().unwrap();
    let run_common = Fort::literal(ConductorConfigCommon {
        network: Some(NetworkMode::Memory.into()),
        metric_publisher: Some(RawMetricPublisherConfig::Logger),
        ..Default::default()
    });
    let seed = config_seed(|_args| async move {
        Ok(IntermediateConfig {
            instances: EitherInstancesConfig::sugared([("alice", json!("chat-app"))]),
            common: ConductorConfigCommon {
                network: Some(NetworkMode::Websocket.into()),
                ..Default::default()
            },
        })
    });

    let player = pipeline(&base)
        .build("s1", "alice", AnyConfigBuilder::Seed(seed), &run_common)
        .await
        .unwrap();

    // The seed's network wins; untouched fragments fall through from the run.
    assert_eq!(
        player.config.common.network,
        Some(NetworkMode::Websocket.into())
    );
    assert_eq!(
        player.config.common.metric_publisher,
        Some(RawMetricPublisherConfig::Logger)
    );
}

#[tokio::test]
async fn concurrent_players_never_share_a_port() {
    let base = TempDir::new().unwrap();
    let pipeline = Arc::new(pipeline(&base));

    let mut handles = Vec::new();
    for n in 0..8 {
        let pipeline = Arc::clone(&pipeline);
        handles.push(tokio::spawn(async move {
            let instances = EitherInstancesConfig::sugared([("main", json!("app"))]);
            pipeline
                .build("s1", &format!("player-{n}"), instances.into(), &Fort::default())
                .await
                .unwrap()
        }));
    }

    let mut ports = HashSet::new();
    let mut uuids = HashSet::new();
    for handle in handles {
        let player = handle.await.unwrap();
        ports.insert(player.args.interface_port);
        uuids.insert(player.args.uuid);
    }
    assert_eq!(ports.len(), 8);
    assert_eq!(uuids.len(), 8);
}

#[tokio::test]
async fn build_all_resolves_a_whole_scenario() {
    let base = TempDir::new().unwrap();
    let players = vec![
        (
            "alice".to_string(),
            EitherInstancesConfig::sugared([("alice", json!("chat-app"))]).into(),
        ),
        (
            "bob".to_string(),
            EitherInstancesConfig::sugared([("bob", json!("chat-app"))]).into(),
        ),
    ];

    let resolved = pipeline(&base)
        .build_all("s1", players, &Fort::default())
        .await
        .unwrap();
    assert_eq!(resolved.len(), 2);
    assert_eq!(resolved[0].args.player_name, "alice");
    assert_eq!(resolved[1].args.player_name, "bob");
    assert_ne!(
        resolved[0].args.interface_port,
        resolved[1].args.interface_port
    );
    assert_ne!(resolved[0].args.config_dir, resolved[1].args.config_dir);
}

#[tokio::test]
async fn build_all_aborts_on_the_first_invalid_player() {
    let base = TempDir::new().unwrap();
    let players = vec![
        (
            "alice".to_string(),
            EitherInstancesConfig::sugared([("alice", json!("chat-app"))]).into(),
        ),
        (
            "mallory".to_string(),
            EitherInstancesConfig::sugared([("mallory", json!(42))]).into(),
        ),
    ];

    let err = pipeline(&base)
        .build_all("s1", players, &Fort::default())
        .await
        .unwrap_err();
    assert!(matches!(err, ConfigError::Validation(_)));
}

#[tokio::test]
async fn seed_errors_abort_the_player_unmodified() {
    let base = TempDir::new().unwrap();
    let seed = config_seed(|_args| async move { anyhow::bail!("boom") });

    let err = pipeline(&base)
        .build("s1", "alice", AnyConfigBuilder::Seed(seed), &Fort::default())
        .await
        .unwrap_err();
    assert!(matches!(err, ConfigError::Seed(_)));
    assert_eq!(err.to_string(), "boom");
}

#[tokio::test]
async fn invalid_instance_data_aborts_the_player() {
    let base = TempDir::new().unwrap();
    let instances = EitherInstancesConfig::sugared([("alice", json!(42))]);

    let err = pipeline(&base)
        .build("s1", "alice", instances.into(), &Fort::default())
        .await
        .unwrap_err();
    let ConfigError::Validation(msg) = err else {
        panic!("expected validation failure");
    };
    assert!(msg.contains("instance 'alice'"));
}

#[tokio::test]
async fn file_backed_seed_resolves_like_inline_config() {
    let base = TempDir::new().unwrap();
    let template = base.path().join("instances.yaml");
    std::fs::write(&template, "alice: chat-app\nbob:\n  agent: b1\n  dna: other-app\n").unwrap();

    let seed = loader::instances_seed(template);
    let player = pipeline(&base)
        .build("s1", "node", AnyConfigBuilder::Seed(seed), &Fort::default())
        .await
        .unwrap();

    assert_eq!(player.config.instances.len(), 2);
    assert_eq!(player.config.instances[1].agent, "b1");
    assert_eq!(player.config.dnas.len(), 2);
}

#[tokio::test]
async fn written_config_parses_back_bit_exact() {
    let base = TempDir::new().unwrap();
    let instances = EitherInstancesConfig::sugared([("alice", json!("chat-app"))]);
    let player = pipeline(&base)
        .build("s1", "alice", instances.into(), &Fort::default())
        .await
        .unwrap();

    let path = persist::write_conductor_config(&player.args, &player.config).unwrap();
    assert_eq!(path.parent().unwrap(), player.args.config_dir);

    let rendered = std::fs::read_to_string(&path).unwrap();
    let reloaded: ch_config_types::RawConductorConfig = toml::from_str(&rendered).unwrap();
    assert_eq!(reloaded, player.config);
}

#[test]
fn dry_sequence_normalization_is_stable_for_repeat_players() {
    // Resolving the same literal twice must never let one player's output
    // leak into the other's.
    let dry = vec![ch_config_types::DryInstanceConfig {
        id: "main".into(),
        agent: ch_config_types::AgentConfig::test_agent("main"),
        dna: ch_config_types::DnaConfig::from_ref("app"),
        storage: None,
    }];
    let first = sugar::normalize(EitherInstancesConfig::dry(dry.clone())).unwrap();
    let mut second = sugar::normalize(EitherInstancesConfig::dry(dry.clone())).unwrap();
    second[0].id = "mutated".into();
    assert_eq!(first[0].id, "main");
    assert_eq!(dry[0].id, "main");
}
