//! Savepoint strategy for nested demarcation under an active transaction.

use super::{context_connection, DemarcationStrategy};
use crate::signal::SoftRollbackSignal;
use async_trait::async_trait;
use tracing::{trace, warn};
use txscope_context::TransactionContext;
use txscope_core::{IsolationLevel, Result};

/// Nests via savepoint on the handle of the enclosing transaction.
///
/// Serves `NESTED` when a transaction is already active — always one
/// savepoint per nesting level, never direct handle reuse. Hooks are not
/// fired here: registrations made inside the nested extent belong to the
/// enclosing physical transaction. The handle stays owned by the enclosing
/// strategy, so `finish` does nothing.
pub struct WrapInSavepoint;

#[async_trait]
impl DemarcationStrategy for WrapInSavepoint {
    fn name(&self) -> &'static str {
        "savepoint"
    }

    async fn begin(&self, ctx: &TransactionContext, isolation: IsolationLevel) -> Result<()> {
        trace!("opening savepoint on enclosing transaction");
        // The handle is active, so this begin opens a savepoint.
        context_connection(ctx)?.begin(isolation).await
    }

    async fn commit(&self, ctx: &TransactionContext) -> Result<()> {
        context_connection(ctx)?.commit().await
    }

    async fn rollback(&self, ctx: &TransactionContext, error: anyhow::Error) -> anyhow::Error {
        match context_connection(ctx) {
            Ok(connection) => {
                if let Err(rollback_error) = connection.rollback().await {
                    warn!(error = %rollback_error, "savepoint rollback failed");
                }
            }
            Err(missing) => warn!(error = %missing, "savepoint rollback skipped"),
        }
        // A deeper savepoint level may already have marked this error; the
        // marker must never nest, or the unwrap at the physical level would
        // surface the marker instead of the application error.
        let original = match error.downcast::<SoftRollbackSignal>() {
            Ok(signal) => signal.into_original(),
            Err(error) => error,
        };
        SoftRollbackSignal::new(original).into()
    }

    async fn finish(&self, _ctx: &TransactionContext, _key: &str) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn rollback_never_nests_the_marker() {
        let ctx = txscope_context::TransactionContext::hooks_only(10);
        let already_marked: anyhow::Error =
            SoftRollbackSignal::new(anyhow::anyhow!("boom")).into();

        let surfaced = WrapInSavepoint.rollback(&ctx, already_marked).await;

        let signal = surfaced
            .downcast::<SoftRollbackSignal>()
            .expect("marker present");
        // Exactly one layer: unwrapping once yields the application error.
        assert_eq!(signal.into_original().to_string(), "boom");
    }
}
