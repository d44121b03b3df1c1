//! The demarcation strategy family.
//!
//! Each strategy implements the four lifecycle steps the coordinator applies
//! around a unit of work: `begin`, `commit`, `rollback`, `finish`. One
//! strategy instance serves one combination of propagation policy and
//! transaction activity; selection is a pure function in the coordinator's
//! `factory` module.
//!
//! Ownership rule: only the strategy that opened a connection releases it.
//! The savepoint strategy operates on a handle owned by the enclosing
//! new-transaction strategy and therefore leaves `finish` a no-op.

mod new;
mod passthrough;
mod wrap;

pub use new::NewTransaction;
pub use passthrough::{PassThrough, PassThroughWithNotify};
pub use wrap::WrapInSavepoint;

use async_trait::async_trait;
use txscope_context::TransactionContext;
use txscope_core::{IsolationLevel, Result, TransactionalError};

/// One begin/commit/rollback/finish behavior.
#[async_trait]
pub trait DemarcationStrategy: Send + Sync {
    /// Strategy name, for logging.
    fn name(&self) -> &'static str;

    /// Prepare the context before the unit of work runs.
    async fn begin(&self, ctx: &TransactionContext, isolation: IsolationLevel) -> Result<()>;

    /// Settle the transaction after the unit of work succeeded.
    async fn commit(&self, ctx: &TransactionContext) -> Result<()>;

    /// Settle the transaction after the unit of work (or commit) failed.
    ///
    /// Returns the error the caller must observe: usually `error` unchanged,
    /// the unwrapped original for a resolved soft rollback, or a soft
    /// rollback marker raised by the savepoint strategy.
    async fn rollback(&self, ctx: &TransactionContext, error: anyhow::Error) -> anyhow::Error;

    /// Clean up on every exit path, after commit or rollback settled.
    async fn finish(&self, ctx: &TransactionContext, key: &str);
}

/// The connection a strategy operates on, or `ConnectionMissing` when the
/// context slot is unexpectedly empty.
pub(crate) fn context_connection(
    ctx: &TransactionContext,
) -> Result<std::sync::Arc<dyn txscope_core::ConnectionHandle>> {
    ctx.connection().ok_or(TransactionalError::ConnectionMissing)
}
