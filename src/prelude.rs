//! Convenience re-exports for typical callers.
//!
//! ```ignore
//! use txscope::prelude::*;
//! ```

pub use crate::{
    current_connection, on_commit, on_commit_for, on_rollback, on_rollback_for,
    ConnectionFactory, ConnectionHandle, DataSourceRegistry, EngineConfig, IsolationLevel,
    Propagation, TransactionCoordinator, TransactionOptions, TransactionalError,
};
