//! Conductor configuration engine with schema validation, sugaring, and
//! per-player seed resolution.
//!
//! This crate turns heterogeneous, user-authored player configuration
//! descriptions into one canonical, fully validated conductor configuration
//! tree per player, ready for the process-spawning collaborator. It
//! reconciles the legal input shapes (explicit vs. shorthand, static values
//! vs. deferred factories, sync vs. async resolution) and fails fast with
//! aggregated, path-qualified validation errors.

pub mod decode;
pub mod error;
pub mod extract;
pub mod fort;
pub mod loader;
pub mod merge;
pub mod persist;
pub mod port;
pub mod schema;
pub mod seed;
pub mod sugar;

pub use error::{ConfigError, Result};
pub use fort::Fort;
pub use port::PortAllocator;
pub use seed::{
    config_seed, AnyConfigBuilder, ConfigSeed, PlayerConfig, SeedPipeline, ADMIN_INTERFACE_ID,
};
