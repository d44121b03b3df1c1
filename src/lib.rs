//! # txscope
//!
//! Declarative transaction demarcation for async Rust.
//!
//! A caller marks a unit of work with a propagation policy and an isolation
//! level; the engine decides at invocation time whether to open a new
//! physical transaction, join one already in flight for the same logical
//! call chain, nest via savepoint, or run the work untransacted — then
//! guarantees the connection is committed or rolled back exactly once and
//! that commit/rollback hooks fire exactly once.
//!
//! ## Quick Start
//!
//! ```ignore
//! use txscope::prelude::*;
//!
//! // Register datasources once at startup.
//! let registry = Arc::new(DataSourceRegistry::new());
//! registry.register("default", my_connection_factory)?;
//! let tx = Arc::new(TransactionCoordinator::new(registry));
//!
//! // Demarcate a unit of work.
//! let value = tx
//!     .run_in_transaction(
//!         || async {
//!             let conn = current_connection("default")?;
//!             // ... issue statements on `conn` ...
//!             on_commit(|| async { println!("committed") })?;
//!             Ok(42)
//!         },
//!         TransactionOptions::new().with_propagation(Propagation::Required),
//!     )
//!     .await?;
//! ```
//!
//! ## Propagation
//!
//! - [`Propagation::Required`] — join the active transaction, else open one
//! - [`Propagation::Supports`] — join the active transaction, else run
//!   untransacted (commit hooks still fire on success)
//! - [`Propagation::Nested`] — savepoint inside the active transaction, else
//!   behave like `Required`
//! - [`Propagation::RequiresNew`] — always a fresh transaction; any active
//!   context is suspended until the new one finishes
//!
//! ## Context model
//!
//! State is continuation-scoped: each logical call chain sees its own
//! context per datasource name, across every `.await`, with no global
//! mutable state. Concurrently interleaved chains — even joined branches on
//! a single-threaded runtime — never observe each other's connection or
//! hooks. Note that `tokio::spawn` starts a fresh chain: spawned tasks do
//! not inherit the caller's transaction.

#![warn(missing_docs)]

pub mod prelude;

pub use txscope_core::{
    ConnectionFactory, ConnectionHandle, DataSourceRegistry, EngineConfig, IsolationLevel,
    Propagation, Result, TransactionOptions, TransactionalError, DEFAULT_DATA_SOURCE_NAME,
    DEFAULT_MAX_HOOK_LISTENERS,
};

pub use txscope_context::{ContextStore, HookEmitter, HookFuture, TransactionContext};

pub use txscope_engine::{
    current_connection, on_commit, on_commit_for, on_rollback, on_rollback_for,
    TransactionCoordinator, WrappedUnitOfWork,
};
