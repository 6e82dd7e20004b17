//! Writing resolved configs into player config dirs.

use std::fs;
use std::path::PathBuf;

use ch_config_types::{ConfigSeedArgs, RawConductorConfig};
use tracing::debug;

use crate::{ConfigError, Result};

/// File name the spawn collaborator expects inside each config dir.
pub const CONDUCTOR_CONFIG_FILENAME: &str = "conductor-config.toml";

/// Serialize the canonical tree as TOML into the player's config dir and
/// return the written path.
pub fn write_conductor_config(
    args: &ConfigSeedArgs,
    config: &RawConductorConfig,
) -> Result<PathBuf> {
    let rendered =
        toml::to_string_pretty(config).map_err(|e| ConfigError::Parse(e.to_string()))?;
    let path = args.config_dir.join(CONDUCTOR_CONFIG_FILENAME);
    fs::write(&path, rendered)?;
    debug!(player = %args.player_name, path = %path.display(), "wrote conductor config");
    Ok(path)
}
