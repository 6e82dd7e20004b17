// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

//! "F or T": config that may be supplied directly or generated per player.

use std::future::Future;

use ch_config_types::ConfigSeedArgs;
use futures::future::BoxFuture;

use crate::Result;

type SyncFactory<T> = Box<dyn Fn(&ConfigSeedArgs) -> anyhow::Result<T> + Send + Sync>;
type AsyncFactory<T> =
    Box<dyn Fn(ConfigSeedArgs) -> BoxFuture<'static, anyhow::Result<T>> + Send + Sync>;

/// A value of type `T`, or a factory (sync or async) from per-player context
/// to `T`. Callers resolve through one uniform asynchronous operation and
/// never need to know which form they hold.
pub enum Fort<T> {
    Literal(T),
    Sync(SyncFactory<T>),
    Async(AsyncFactory<T>),
}

impl<T: Clone> Fort<T> {
    pub fn literal(value: T) -> Self {
        Fort::Literal(value)
    }

    pub fn sync<F>(factory: F) -> Self
    where
        F: Fn(&ConfigSeedArgs) -> anyhow::Result<T> + Send + Sync + 'static,
    {
        Fort::Sync(Box::new(factory))
    }

    pub fn deferred<F, Fut>(factory: F) -> Self
    where
        F: Fn(ConfigSeedArgs) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = anyhow::Result<T>> + Send + 'static,
    {
        Fort::Async(Box::new(move |args| Box::pin(factory(args))))
    }

    /// Resolve to a concrete `T` for one player.
    ///
    /// A literal resolves to an independent copy, so a later step that
    /// mutates the result (e.g. stamping in an allocated port) can never
    /// affect the original or another player's resolution. A factory is
    /// invoked exactly once per call with the supplied context and its
    /// result is returned as-is: each invocation already produces a fresh,
    /// caller-owned value.
    pub async fn resolve(&self, args: &ConfigSeedArgs) -> Result<T> {
        match self {
            Fort::Literal(value) => Ok(value.clone()),
            Fort::Sync(factory) => Ok(factory(args)?),
            Fort::Async(factory) => Ok(factory(args.clone()).await?),
        }
    }
}

impl<T: Clone> From<T> for Fort<T> {
    fn from(value: T) -> Self {
        Fort::Literal(value)
    }
}

impl<T: Clone + Default> Default for Fort<T> {
    fn default() -> Self {
        Fort::Literal(T::default())
    }
}

impl<T> std::fmt::Debug for Fort<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let form = match self {
            Fort::Literal(_) => "Literal",
            Fort::Sync(_) => "Sync",
            Fort::Async(_) => "Async",
        };
        f.debug_tuple("Fort").field(&form).finish()
    }
}
