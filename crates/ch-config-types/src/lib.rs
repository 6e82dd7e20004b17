// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

//! Strongly-typed conductor configuration structs for Conductor Harbor modules.
//!
//! This crate provides the configuration fragment types shared between the
//! conductor-config resolution engine and the process-spawning side of the
//! harness. Fragments exist along a resolution axis: author-facing *sugared*
//! forms, internally canonical *dry* forms with agents and DNAs embedded by
//! value, and the *raw* form the spawned conductor ultimately consumes, which
//! references agents and DNAs by id.

pub mod conductor;
pub mod instance;
pub mod seed_args;

pub use conductor::*;
pub use instance::*;
pub use seed_args::ConfigSeedArgs;
