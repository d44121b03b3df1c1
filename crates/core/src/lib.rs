//! Core contracts for the txscope demarcation engine
//!
//! This crate defines the leaf layer everything else builds on:
//! - Error taxonomy ([`TransactionalError`])
//! - Demarcation vocabulary ([`Propagation`], [`IsolationLevel`],
//!   [`TransactionOptions`])
//! - The driver-facing [`ConnectionHandle`] / [`ConnectionFactory`] contracts
//! - The [`DataSourceRegistry`] mapping logical datasource names to factories
//! - Process-wide [`EngineConfig`]
//!
//! Nothing here knows about the context store or the propagation state
//! machine; those layers live in `txscope-context` and `txscope-engine`.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod config;
pub mod connection;
pub mod error;
pub mod registry;
pub mod types;

pub use config::{EngineConfig, DEFAULT_DATA_SOURCE_NAME, DEFAULT_MAX_HOOK_LISTENERS};
pub use connection::{ConnectionFactory, ConnectionHandle};
pub use error::{Result, TransactionalError};
pub use registry::DataSourceRegistry;
pub use types::{IsolationLevel, Propagation, TransactionOptions};
