// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

//! Structural validators for conductor configuration fragments.
//!
//! Validators are plain JSON Schema documents assembled from a small set of
//! combinators and compiled once per process (draft 2020-12). They are pure
//! shape predicates: they never mutate, coerce, or default anything. The
//! open `record<string, any>` escape hatches (network, logger, storage) are
//! expressed as explicitly pass-through schemas rather than invented shapes.

use jsonschema::{Draft, JSONSchema};
use once_cell::sync::Lazy;
use serde_json::{json, Value as J};

/// A named fragment validator: the schema document plus its compiled form.
pub struct Validator {
    name: &'static str,
    schema: &'static J,
    compiled: JSONSchema,
}

impl Validator {
    fn new(name: &'static str, schema: J) -> Self {
        // Validators live for the whole process; leaking the schema gives the
        // compiled form the 'static document it borrows.
        let schema: &'static J = Box::leak(Box::new(schema));
        let compiled = JSONSchema::options()
            .with_draft(Draft::Draft202012)
            .compile(schema)
            .expect("fragment schema compilation should not fail");
        Self {
            name,
            schema,
            compiled,
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn schema(&self) -> &J {
        self.schema
    }

    pub(crate) fn compiled(&self) -> &JSONSchema {
        &self.compiled
    }
}

impl std::fmt::Debug for Validator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Validator").field("name", &self.name).finish()
    }
}

// ---------------------------------------------------------------------------
// Combinators
// ---------------------------------------------------------------------------

pub fn string() -> J {
    json!({"type": "string"})
}

pub fn boolean() -> J {
    json!({"type": "boolean"})
}

pub fn integer() -> J {
    json!({"type": "integer"})
}

/// Exact-value match.
pub fn literal(value: &str) -> J {
    json!({"const": value})
}

pub fn array(items: J) -> J {
    json!({"type": "array", "items": items})
}

/// All named fields must be present and individually valid. Unlisted fields
/// are allowed.
pub fn required(fields: &[(&str, J)]) -> J {
    let names: Vec<&str> = fields.iter().map(|(name, _)| *name).collect();
    let properties: serde_json::Map<String, J> = fields
        .iter()
        .map(|(name, schema)| ((*name).to_string(), schema.clone()))
        .collect();
    json!({"type": "object", "required": names, "properties": properties})
}

/// Fields may be absent, but if present must validate.
pub fn optional(fields: &[(&str, J)]) -> J {
    let properties: serde_json::Map<String, J> = fields
        .iter()
        .map(|(name, schema)| ((*name).to_string(), schema.clone()))
        .collect();
    json!({"type": "object", "properties": properties})
}

/// Intersection of several object shapes.
pub fn all(parts: &[J]) -> J {
    json!({"allOf": parts})
}

/// Ordered union of alternative shapes; the first structurally matching
/// alternative wins.
pub fn any(alternatives: &[J]) -> J {
    json!({"anyOf": alternatives})
}

/// Keyed mapping whose values all satisfy one shape.
pub fn mapping(values: J) -> J {
    json!({"type": "object", "additionalProperties": values})
}

/// Open, unvalidated mapping.
pub fn open_record() -> J {
    json!({"type": "object"})
}

/// Accepts anything. Used for storage payloads the conductor owns.
pub fn any_value() -> J {
    json!(true)
}

// ---------------------------------------------------------------------------
// Fragment validators
// ---------------------------------------------------------------------------

pub static AGENT: Lazy<Validator> = Lazy::new(|| {
    Validator::new(
        "AgentConfig",
        all(&[
            required(&[
                ("id", string()),
                ("name", string()),
                ("keystore_file", string()),
                ("public_address", string()),
            ]),
            optional(&[("test_agent", boolean())]),
        ]),
    )
});

pub static DNA: Lazy<Validator> = Lazy::new(|| {
    Validator::new(
        "DnaConfig",
        all(&[
            required(&[("id", string()), ("file", string())]),
            optional(&[("hash", string()), ("uuid", string())]),
        ]),
    )
});

pub static STORAGE: Lazy<Validator> =
    Lazy::new(|| Validator::new("StorageConfig", any_value()));

pub static DRY_INSTANCE: Lazy<Validator> = Lazy::new(|| {
    Validator::new(
        "DryInstanceConfig",
        all(&[
            required(&[
                ("id", string()),
                ("agent", AGENT.schema().clone()),
                ("dna", DNA.schema().clone()),
            ]),
            optional(&[("storage", STORAGE.schema().clone())]),
        ]),
    )
});

/// Bare DNA position: a reference string or an embedded DNA config.
pub static DNA_REF: Lazy<Validator> = Lazy::new(|| {
    Validator::new("DnaRef", any(&[string(), DNA.schema().clone()]))
});

pub static AGENT_REF: Lazy<Validator> = Lazy::new(|| {
    Validator::new("AgentRef", any(&[string(), AGENT.schema().clone()]))
});

pub static SUGARED_INSTANCE: Lazy<Validator> = Lazy::new(|| {
    Validator::new(
        "SugaredInstanceConfig",
        any(&[
            DNA_REF.schema().clone(),
            all(&[
                required(&[
                    ("agent", AGENT_REF.schema().clone()),
                    ("dna", DNA_REF.schema().clone()),
                ]),
                optional(&[("storage", STORAGE.schema().clone())]),
            ]),
        ]),
    )
});

pub static RAW_INSTANCE: Lazy<Validator> = Lazy::new(|| {
    Validator::new(
        "RawInstanceConfig",
        required(&[
            ("id", string()),
            ("agent", string()),
            ("dna", string()),
            ("storage", STORAGE.schema().clone()),
        ]),
    )
});

pub static EITHER_INSTANCES: Lazy<Validator> = Lazy::new(|| {
    Validator::new(
        "EitherInstancesConfig",
        any(&[
            array(DRY_INSTANCE.schema().clone()),
            mapping(SUGARED_INSTANCE.schema().clone()),
        ]),
    )
});

pub static BRIDGE: Lazy<Validator> = Lazy::new(|| {
    Validator::new(
        "BridgeConfig",
        required(&[
            ("handle", string()),
            ("caller_id", string()),
            ("callee_id", string()),
        ]),
    )
});

pub static DPKI: Lazy<Validator> = Lazy::new(|| {
    Validator::new(
        "DpkiConfig",
        required(&[("instance_id", string()), ("init_params", string())]),
    )
});

pub static NETWORK: Lazy<Validator> = Lazy::new(|| {
    Validator::new(
        "NetworkConfig",
        any(&[
            literal("n3h"),
            literal("memory"),
            literal("websocket"),
            open_record(),
        ]),
    )
});

pub static LOGGER: Lazy<Validator> = Lazy::new(|| {
    Validator::new("LoggerConfig", any(&[boolean(), open_record()]))
});

pub static METRIC_PUBLISHER: Lazy<Validator> = Lazy::new(|| {
    Validator::new(
        "RawMetricPublisherConfig",
        any(&[
            // cloudwatchlogs descriptor
            all(&[
                required(&[("type", literal("cloudwatchlogs"))]),
                optional(&[
                    ("region", string()),
                    ("log_group_name", string()),
                    ("log_stream_name", string()),
                ]),
            ]),
            // bare logger publisher
            required(&[("type", literal("logger"))]),
        ]),
    )
});

pub static INTERFACE: Lazy<Validator> = Lazy::new(|| {
    Validator::new(
        "InterfaceConfig",
        required(&[
            ("admin", boolean()),
            ("choose_free_port", boolean()),
            ("id", string()),
            (
                "driver",
                required(&[("type", string()), ("port", integer())]),
            ),
            ("instances", array(required(&[("id", string())]))),
        ]),
    )
});

pub static SIGNALS: Lazy<Validator> = Lazy::new(|| {
    Validator::new(
        "SignalsConfig",
        required(&[("trace", boolean()), ("consistency", boolean())]),
    )
});

/// The full conductor configuration: the final trust boundary before the
/// tree is handed to the process-spawning collaborator.
pub static CONDUCTOR: Lazy<Validator> = Lazy::new(|| {
    Validator::new(
        "RawConductorConfig",
        all(&[
            required(&[
                ("agents", array(AGENT.schema().clone())),
                ("dnas", array(DNA.schema().clone())),
                ("instances", array(RAW_INSTANCE.schema().clone())),
                ("interfaces", array(INTERFACE.schema().clone())),
                ("signals", SIGNALS.schema().clone()),
            ]),
            optional(&[
                ("bridges", array(BRIDGE.schema().clone())),
                ("dpki", DPKI.schema().clone()),
                ("network", NETWORK.schema().clone()),
                ("logger", LOGGER.schema().clone()),
                ("metric_publisher", METRIC_PUBLISHER.schema().clone()),
            ]),
        ]),
    )
});
