//! Driver-facing connection contracts.
//!
//! The engine never talks to a database library directly. Drivers are
//! adapted behind [`ConnectionHandle`], an explicit wrapper over the real
//! connection object, and produced on demand by a [`ConnectionFactory`]
//! registered per datasource name.

use crate::error::Result;
use crate::types::IsolationLevel;
use async_trait::async_trait;
use std::any::Any;
use std::sync::Arc;

/// A handle over one physical database connection.
///
/// Handles are depth-aware, matching the drivers the engine targets:
/// calling [`begin`](ConnectionHandle::begin) while a transaction is already
/// open starts a savepoint, and `commit`/`rollback` at savepoint depth
/// release or roll back the innermost savepoint rather than the physical
/// transaction.
///
/// A handle is exclusively owned by the transaction context that created it
/// until [`release`](ConnectionHandle::release) is called; no concurrent
/// logical call chain may hold a reference to it.
#[async_trait]
pub trait ConnectionHandle: Send + Sync + 'static {
    /// Open a physical transaction, or a savepoint when one is already open.
    async fn begin(&self, isolation: IsolationLevel) -> Result<()>;

    /// Commit the innermost transaction level (release the savepoint at
    /// savepoint depth, commit the physical transaction at depth one).
    async fn commit(&self) -> Result<()>;

    /// Roll back the innermost transaction level.
    async fn rollback(&self) -> Result<()>;

    /// Return the connection to its pool or close it. Pending work is
    /// discarded by the driver.
    async fn release(&self) -> Result<()>;

    /// Whether a physical transaction is currently open. Side-effect free.
    fn is_active(&self) -> bool;

    /// Adapter escape hatch for callers that must reach the concrete driver
    /// connection behind the handle.
    fn as_any(&self) -> &dyn Any;
}

impl std::fmt::Debug for dyn ConnectionHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("dyn ConnectionHandle")
    }
}

/// Produces new [`ConnectionHandle`]s for one datasource.
#[async_trait]
pub trait ConnectionFactory: Send + Sync + 'static {
    /// Open a fresh connection handle.
    async fn create(&self) -> Result<Arc<dyn ConnectionHandle>>;
}

impl std::fmt::Debug for dyn ConnectionFactory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("dyn ConnectionFactory")
    }
}
