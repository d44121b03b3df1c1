//! Unified error types for the demarcation engine.
//!
//! Every failure the engine itself can raise is a [`TransactionalError`]
//! variant. All of them are fatal configuration or driver conditions; the
//! engine never retries internally. Application errors raised by a unit of
//! work are not represented here — they flow through the coordinator
//! unchanged.

use thiserror::Error;

/// All engine-raised failures.
///
/// This is the canonical error type for every operation in the engine.
/// Application errors thrown by a unit of work are propagated as-is and
/// never wrapped in one of these variants.
#[derive(Debug, Error)]
pub enum TransactionalError {
    /// Resolving a datasource name that was never registered.
    ///
    /// Datasources must be registered through
    /// [`DataSourceRegistry::register`](crate::DataSourceRegistry::register)
    /// before the first transactional call.
    #[error("no registered data source: {0:?} (register it before the first transactional call)")]
    NoRegisteredDataSource(String),

    /// Registering a datasource name that is already taken.
    #[error("data source already registered: {0:?}")]
    DataSourceAlreadyRegistered(String),

    /// A propagation value outside the closed set.
    ///
    /// Raised at the configuration parsing boundary; the engine never
    /// silently falls back to a default propagation.
    #[error("not supported propagation type: {0:?}")]
    UnsupportedPropagation(String),

    /// No transaction context is in scope for the named datasource.
    ///
    /// Raised when hooks are registered or the current connection is looked
    /// up outside the dynamic extent of a coordinator run.
    #[error("no active transaction context for data source: {0:?}")]
    NoActiveContext(String),

    /// A transaction context is in scope but holds no connection handle.
    #[error("transaction context holds no connection handle")]
    ConnectionMissing,

    /// Hook registration past the configured listener cap.
    #[error("hook listener limit exceeded: {limit}")]
    ListenerOverflow {
        /// The configured maximum listener count.
        limit: usize,
    },

    /// [`EngineConfig::init`](crate::EngineConfig::init) called after the
    /// configuration was already fixed.
    #[error("engine configuration already initialized")]
    ConfigAlreadyInitialized,

    /// Failure reported by the underlying connection driver.
    #[error("driver error: {0}")]
    Driver(#[source] Box<dyn std::error::Error + Send + Sync>),
}

/// Result type for engine operations.
pub type Result<T> = std::result::Result<T, TransactionalError>;

impl TransactionalError {
    /// Wrap a driver-level failure.
    pub fn driver<E>(error: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        TransactionalError::Driver(Box::new(error))
    }
}
