//! Hook registration API.
//!
//! Callable only from within the dynamic extent of a unit of work running
//! under the coordinator: registrations attach to the emitter of the context
//! in scope for the datasource, so hooks registered at any nesting depth
//! under one physical transaction aggregate onto one emitter and fire
//! exactly once when that transaction settles.

use std::future::Future;
use txscope_context::ContextStore;
use txscope_core::{EngineConfig, Result, TransactionalError};

/// Register a callback fired after the default datasource's transaction
/// commits.
pub fn on_commit<F, Fut>(callback: F) -> Result<()>
where
    F: FnOnce() -> Fut + Send + 'static,
    Fut: Future<Output = ()> + Send + 'static,
{
    on_commit_for(&EngineConfig::get().default_connection_name, callback)
}

/// Register a commit callback for a named datasource.
pub fn on_commit_for<F, Fut>(name: &str, callback: F) -> Result<()>
where
    F: FnOnce() -> Fut + Send + 'static,
    Fut: Future<Output = ()> + Send + 'static,
{
    context(name)?.hooks().on_commit(callback)
}

/// Register a callback fired after the default datasource's transaction
/// rolls back.
pub fn on_rollback<F, Fut>(callback: F) -> Result<()>
where
    F: FnOnce() -> Fut + Send + 'static,
    Fut: Future<Output = ()> + Send + 'static,
{
    on_rollback_for(&EngineConfig::get().default_connection_name, callback)
}

/// Register a rollback callback for a named datasource.
pub fn on_rollback_for<F, Fut>(name: &str, callback: F) -> Result<()>
where
    F: FnOnce() -> Fut + Send + 'static,
    Fut: Future<Output = ()> + Send + 'static,
{
    context(name)?.hooks().on_rollback(callback)
}

fn context(name: &str) -> Result<std::sync::Arc<txscope_context::TransactionContext>> {
    ContextStore::get(name).ok_or_else(|| TransactionalError::NoActiveContext(name.to_owned()))
}
