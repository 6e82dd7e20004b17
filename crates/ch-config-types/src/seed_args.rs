// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

//! Per-player resolution context.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Identity and resources allocated for one player before its config seed
/// runs. Immutable once constructed; downstream resolution consumes it but
/// never mutates it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConfigSeedArgs {
    pub scenario_name: String,
    pub player_name: String,
    pub uuid: String,
    pub interface_port: u16,
    pub config_dir: PathBuf,
}
