//! Strategy that owns a physical transaction end to end.

use super::{context_connection, DemarcationStrategy};
use crate::signal::SoftRollbackSignal;
use async_trait::async_trait;
use tracing::{trace, warn};
use txscope_context::{ContextStore, TransactionContext};
use txscope_core::{IsolationLevel, Result};

/// Opens a new physical transaction and settles it exactly once.
///
/// Serves `REQUIRED`/`NESTED` when no transaction is active and
/// `REQUIRES_NEW` always. This is the only strategy that fires hooks for its
/// own physical transaction and the only one that releases the handle.
pub struct NewTransaction;

#[async_trait]
impl DemarcationStrategy for NewTransaction {
    fn name(&self) -> &'static str {
        "new"
    }

    async fn begin(&self, ctx: &TransactionContext, isolation: IsolationLevel) -> Result<()> {
        trace!(isolation = %isolation, "opening physical transaction");
        context_connection(ctx)?.begin(isolation).await
    }

    async fn commit(&self, ctx: &TransactionContext) -> Result<()> {
        context_connection(ctx)?.commit().await?;
        ctx.hooks().fire_commit().await;
        Ok(())
    }

    async fn rollback(&self, ctx: &TransactionContext, error: anyhow::Error) -> anyhow::Error {
        // A savepoint one level down already rolled back; the physical
        // transaction must not roll back a second time. Surface the original
        // application error instead.
        let error = match error.downcast::<SoftRollbackSignal>() {
            Ok(signal) => return signal.into_original(),
            Err(error) => error,
        };

        if let Some(connection) = ctx.connection() {
            if connection.is_active() {
                if let Err(rollback_error) = connection.rollback().await {
                    warn!(error = %rollback_error, "physical rollback failed");
                }
            }
        }
        ctx.hooks().fire_rollback().await;
        error
    }

    async fn finish(&self, ctx: &TransactionContext, key: &str) {
        if let Some(connection) = ctx.connection() {
            if let Err(release_error) = connection.release().await {
                // Reported, never allowed to mask the primary outcome.
                warn!(datasource = key, error = %release_error, "connection release failed");
            }
        }
        ctx.clear_connection();
        ContextStore::clear(key);
    }
}
