//! The orchestration entry point: resolve options, pick a strategy, and run
//! the unit of work inside a context-store scope.

use crate::factory;
use crate::strategy::DemarcationStrategy;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use tracing::debug;
use txscope_context::{ContextStore, TransactionContext};
use txscope_core::{
    ConnectionHandle, DataSourceRegistry, EngineConfig, IsolationLevel, Propagation, Result,
    TransactionOptions, TransactionalError,
};

/// Boxed future produced by a wrapped unit of work.
pub type WrappedUnitOfWork<T> = Pin<Box<dyn Future<Output = anyhow::Result<T>> + Send>>;

/// Demarcates units of work against the datasources of one registry.
///
/// The coordinator holds no per-call state; everything scoped to a logical
/// call chain lives in the [`ContextStore`]. One coordinator is shared by
/// all call chains of a process.
pub struct TransactionCoordinator {
    registry: Arc<DataSourceRegistry>,
}

impl TransactionCoordinator {
    /// A coordinator over `registry`.
    pub fn new(registry: Arc<DataSourceRegistry>) -> Self {
        TransactionCoordinator { registry }
    }

    /// The registry this coordinator resolves datasources against.
    pub fn registry(&self) -> &DataSourceRegistry {
        &self.registry
    }

    /// Run `work` under the demarcation described by `options`.
    ///
    /// The outcome of `work` is returned unchanged: a success commits (or
    /// releases the savepoint, or fires notification hooks, depending on the
    /// selected strategy), an error rolls back and is rethrown. The only
    /// error rewriting the engine performs is unwrapping a nested savepoint
    /// rollback back to the application error that caused it.
    pub async fn run_in_transaction<T, F, Fut>(
        &self,
        work: F,
        options: TransactionOptions,
    ) -> anyhow::Result<T>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = anyhow::Result<T>>,
    {
        let config = EngineConfig::get();
        let name = options
            .connection_name
            .unwrap_or_else(|| config.default_connection_name.clone());
        let isolation = options
            .isolation_level
            .unwrap_or(config.default_isolation_level);
        let propagation = options.propagation.unwrap_or(config.default_propagation);

        // Unregistered datasource names are a configuration error even for
        // propagation modes that would not open a connection.
        self.registry.resolve(&name)?;

        let current = ContextStore::get(&name);
        let is_active = current.as_ref().map(|c| c.is_active()).unwrap_or(false);
        let joins_current = is_active && propagation != Propagation::RequiresNew;

        let strategy = factory::select(propagation, joins_current);
        let ctx = if joins_current {
            current
                .clone()
                .ok_or_else(|| TransactionalError::NoActiveContext(name.clone()))?
        } else if propagation == Propagation::Supports {
            // Untransacted work still carries an emitter so commit hooks can
            // fire on success; an enclosing inactive context is reused.
            current
                .clone()
                .unwrap_or_else(|| TransactionContext::hooks_only(config.max_hook_listeners))
        } else {
            let connection = self.registry.connection(&name).await?;
            TransactionContext::with_connection(connection, config.max_hook_listeners)
        };

        debug!(
            datasource = %name,
            propagation = %propagation,
            strategy = strategy.name(),
            joins_current,
            "demarcating unit of work"
        );

        let scoped = Self::execute(strategy, Arc::clone(&ctx), name.clone(), isolation, work);
        ContextStore::run(&name, ctx, scoped).await
    }

    /// Wrap `work` so that invoking the returned closure runs it under the
    /// demarcation described by `options`.
    ///
    /// This is the interception boundary for middleware-style composition:
    /// wrap a callable once at composition time, then register or call the
    /// wrapper in place of the original.
    pub fn wrap_in_transaction<T, F, Fut>(
        self: &Arc<Self>,
        work: F,
        options: TransactionOptions,
    ) -> impl FnOnce() -> WrappedUnitOfWork<T>
    where
        T: Send + 'static,
        F: FnOnce() -> Fut + Send + 'static,
        Fut: Future<Output = anyhow::Result<T>> + Send + 'static,
    {
        let coordinator = Arc::clone(self);
        move || {
            Box::pin(async move { coordinator.run_in_transaction(work, options).await })
                as WrappedUnitOfWork<T>
        }
    }

    /// The four-step lifecycle around one unit of work. `finish` runs on
    /// every exit path; a failed begin or commit takes the rollback path
    /// with the failure as the error.
    async fn execute<T, F, Fut>(
        strategy: &'static dyn DemarcationStrategy,
        ctx: Arc<TransactionContext>,
        key: String,
        isolation: IsolationLevel,
        work: F,
    ) -> anyhow::Result<T>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = anyhow::Result<T>>,
    {
        let attempt = async {
            strategy.begin(&ctx, isolation).await?;
            let value = work().await?;
            strategy.commit(&ctx).await?;
            Ok(value)
        }
        .await;

        let outcome = match attempt {
            Ok(value) => Ok(value),
            Err(error) => Err(strategy.rollback(&ctx, error).await),
        };

        strategy.finish(&ctx, &key).await;
        outcome
    }
}

/// The connection handle of the transaction in flight for `name` in the
/// calling chain.
///
/// This is the context-aware lookup repositories use inside a unit of work:
/// statements issued on the returned handle join the demarcated transaction.
/// Fails outside the dynamic extent of a coordinator run, or when the
/// context in scope runs untransacted.
pub fn current_connection(name: &str) -> Result<Arc<dyn ConnectionHandle>> {
    let ctx = ContextStore::get(name)
        .ok_or_else(|| TransactionalError::NoActiveContext(name.to_owned()))?;
    ctx.connection().ok_or(TransactionalError::ConnectionMissing)
}
