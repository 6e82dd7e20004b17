// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

use thiserror::Error;

/// Convenient result alias for config resolution operations.
pub type Result<T> = std::result::Result<T, ConfigError>;

/// Errors that can occur while resolving or validating conductor configs.
///
/// Every variant is fatal to the configuration-building step for the
/// affected player: there is no local recovery, no default substitution,
/// and no retry at this layer.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A value failed a structural validator. Carries the full aggregated
    /// report, one bullet per violated field path.
    #[error("{0}")]
    Validation(String),

    /// An error raised inside a config seed or fort factory, propagated
    /// unmodified.
    #[error(transparent)]
    Seed(#[from] anyhow::Error),

    /// Typed extraction of an already-validated tree failed.
    #[error("Config extraction error: {0}")]
    Extract(String),

    /// Underlying IO error while allocating player resources or reading
    /// config files.
    #[error("Config IO error: {0}")]
    Io(#[from] std::io::Error),

    /// A config file could not be parsed into a value tree.
    #[error("Config parse error: {0}")]
    Parse(String),

    /// The run-scoped port allocator ran out of interface ports.
    #[error("Interface port range exhausted")]
    PortsExhausted,
}
