//! The demarcation engine
//!
//! This crate implements the propagation state machine on top of
//! `txscope-context` and `txscope-core`:
//! - The four [`strategy`] implementations (new transaction, savepoint wrap,
//!   pass-through, pass-through with commit notification)
//! - Pure strategy selection from (propagation, activity)
//! - The [`TransactionCoordinator`] orchestrating begin → work →
//!   commit/rollback → finish inside a context-store scope
//! - The hook registration API ([`on_commit`], [`on_rollback`])
//!
//! Application errors flow through the coordinator as `anyhow::Error` and
//! reach the caller unchanged; the engine only inspects them to decide
//! commit versus rollback and to resolve nested savepoint rollbacks.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod coordinator;
pub mod hooks;
pub mod strategy;

mod factory;
mod signal;

pub use coordinator::{current_connection, TransactionCoordinator, WrappedUnitOfWork};
pub use hooks::{on_commit, on_commit_for, on_rollback, on_rollback_for};
