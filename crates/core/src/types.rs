//! Demarcation vocabulary: propagation policies, isolation levels, and the
//! per-call option block.

use crate::error::TransactionalError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Transaction propagation policy.
///
/// Decides, at invocation time, how a unit of work relates to a transaction
/// that may already be in flight for the same datasource in the same logical
/// call chain. The set is closed: configuration values outside it fail with
/// [`TransactionalError::UnsupportedPropagation`] instead of defaulting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Propagation {
    /// Join the active transaction; open a new one if none is active.
    Required,
    /// Join the active transaction; run untransacted if none is active.
    Supports,
    /// Nest via savepoint inside the active transaction; behave like
    /// `Required` if none is active.
    Nested,
    /// Always open a fresh, fully independent transaction, suspending any
    /// active context for the datasource until the new one finishes.
    RequiresNew,
}

impl Default for Propagation {
    fn default() -> Self {
        Propagation::Required
    }
}

impl fmt::Display for Propagation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Propagation::Required => "REQUIRED",
            Propagation::Supports => "SUPPORTS",
            Propagation::Nested => "NESTED",
            Propagation::RequiresNew => "REQUIRES_NEW",
        };
        f.write_str(name)
    }
}

impl FromStr for Propagation {
    type Err = TransactionalError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "REQUIRED" => Ok(Propagation::Required),
            "SUPPORTS" => Ok(Propagation::Supports),
            "NESTED" => Ok(Propagation::Nested),
            "REQUIRES_NEW" => Ok(Propagation::RequiresNew),
            other => Err(TransactionalError::UnsupportedPropagation(other.into())),
        }
    }
}

/// Standard SQL transaction isolation level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum IsolationLevel {
    /// Dirty reads allowed.
    ReadUncommitted,
    /// Only committed data is visible. The engine default.
    ReadCommitted,
    /// Reads repeat within the transaction.
    RepeatableRead,
    /// Full serializability.
    Serializable,
}

impl Default for IsolationLevel {
    fn default() -> Self {
        IsolationLevel::ReadCommitted
    }
}

impl IsolationLevel {
    /// The standard SQL spelling, as passed to drivers.
    pub fn as_sql(&self) -> &'static str {
        match self {
            IsolationLevel::ReadUncommitted => "READ UNCOMMITTED",
            IsolationLevel::ReadCommitted => "READ COMMITTED",
            IsolationLevel::RepeatableRead => "REPEATABLE READ",
            IsolationLevel::Serializable => "SERIALIZABLE",
        }
    }
}

impl fmt::Display for IsolationLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_sql())
    }
}

/// Per-call demarcation options.
///
/// All fields are optional; unset fields resolve against
/// [`EngineConfig`](crate::EngineConfig) defaults at invocation time.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TransactionOptions {
    /// Logical datasource name. Defaults to the configured default name.
    pub connection_name: Option<String>,
    /// Isolation level for a newly opened physical transaction.
    pub isolation_level: Option<IsolationLevel>,
    /// Propagation policy. Defaults to `REQUIRED`.
    pub propagation: Option<Propagation>,
}

impl TransactionOptions {
    /// Options with every field left to its default.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the datasource name.
    pub fn with_connection_name(mut self, name: impl Into<String>) -> Self {
        self.connection_name = Some(name.into());
        self
    }

    /// Set the isolation level.
    pub fn with_isolation_level(mut self, isolation: IsolationLevel) -> Self {
        self.isolation_level = Some(isolation);
        self
    }

    /// Set the propagation policy.
    pub fn with_propagation(mut self, propagation: Propagation) -> Self {
        self.propagation = Some(propagation);
        self
    }
}
