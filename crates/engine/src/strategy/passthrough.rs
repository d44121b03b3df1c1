//! Pass-through strategies: the unit of work runs without this demarcation
//! level touching the transaction state.

use super::DemarcationStrategy;
use async_trait::async_trait;
use txscope_context::TransactionContext;
use txscope_core::{IsolationLevel, Result};

/// Joins whatever is already in flight, altering nothing.
///
/// Serves `REQUIRED` and `SUPPORTS` when a transaction is active: the work
/// simply runs on the enclosing transaction, and commit, rollback, hooks,
/// and release all belong to the demarcation level that opened it.
pub struct PassThrough;

#[async_trait]
impl DemarcationStrategy for PassThrough {
    fn name(&self) -> &'static str {
        "pass-through"
    }

    async fn begin(&self, _ctx: &TransactionContext, _isolation: IsolationLevel) -> Result<()> {
        Ok(())
    }

    async fn commit(&self, _ctx: &TransactionContext) -> Result<()> {
        Ok(())
    }

    async fn rollback(&self, _ctx: &TransactionContext, error: anyhow::Error) -> anyhow::Error {
        error
    }

    async fn finish(&self, _ctx: &TransactionContext, _key: &str) {}
}

/// Runs the work untransacted but still fires commit hooks on success.
///
/// Serves `SUPPORTS` when no transaction is active: callers registering
/// commit hooks observe the same notification protocol whether or not a
/// physical transaction happened to be in flight.
pub struct PassThroughWithNotify;

#[async_trait]
impl DemarcationStrategy for PassThroughWithNotify {
    fn name(&self) -> &'static str {
        "pass-through-notify"
    }

    async fn begin(&self, _ctx: &TransactionContext, _isolation: IsolationLevel) -> Result<()> {
        Ok(())
    }

    async fn commit(&self, ctx: &TransactionContext) -> Result<()> {
        ctx.hooks().fire_commit().await;
        Ok(())
    }

    async fn rollback(&self, _ctx: &TransactionContext, error: anyhow::Error) -> anyhow::Error {
        error
    }

    async fn finish(&self, _ctx: &TransactionContext, _key: &str) {}
}
