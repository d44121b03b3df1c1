//! Continuation-scoped transaction contexts
//!
//! This crate implements the state model that lets the demarcation engine
//! attach a transaction to an implicit logical call chain instead of an
//! explicit parameter:
//! - [`ContextStore`]: task-local slots, one per logical datasource name,
//!   isolated across interleaved async call chains
//! - [`TransactionContext`]: the per-chain slot contents (connection handle
//!   plus hook emitter)
//! - [`HookEmitter`]: fire-once commit/rollback notification
//!
//! No global mutable state is involved: slots are installed by scoping a
//! future and disappear when the scope exits.

#![warn(missing_docs)]
#![warn(clippy::all)]

mod context;
mod hooks;
mod store;

pub use context::TransactionContext;
pub use hooks::{HookEmitter, HookFuture};
pub use store::ContextStore;
