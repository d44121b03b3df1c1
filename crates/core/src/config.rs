//! Process-wide engine configuration.
//!
//! The configuration is fixed once: either explicitly through
//! [`EngineConfig::init`] before the first transactional call, or implicitly
//! with built-in defaults on first read. Changing it afterwards is not
//! supported; in particular, the hook listener cap is captured by each hook
//! emitter at creation time.

use crate::types::{IsolationLevel, Propagation};
use crate::{Result, TransactionalError};
use once_cell::sync::OnceCell;

/// The datasource name used when options leave `connection_name` unset.
pub const DEFAULT_DATA_SOURCE_NAME: &str = "default";

/// Default cap on commit/rollback listeners per emitter.
pub const DEFAULT_MAX_HOOK_LISTENERS: usize = 100;

static CONFIG: OnceCell<EngineConfig> = OnceCell::new();

/// Process-wide defaults for the demarcation engine.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Datasource name used when a call does not name one.
    pub default_connection_name: String,
    /// Isolation level used when a call does not name one.
    pub default_isolation_level: IsolationLevel,
    /// Propagation policy used when a call does not name one.
    pub default_propagation: Propagation,
    /// Maximum commit/rollback listeners per hook emitter.
    pub max_hook_listeners: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        EngineConfig {
            default_connection_name: DEFAULT_DATA_SOURCE_NAME.to_owned(),
            default_isolation_level: IsolationLevel::ReadCommitted,
            default_propagation: Propagation::Required,
            max_hook_listeners: DEFAULT_MAX_HOOK_LISTENERS,
        }
    }
}

impl EngineConfig {
    /// Install this configuration as the process-wide one.
    ///
    /// Must run before the first transactional call; fails with
    /// [`TransactionalError::ConfigAlreadyInitialized`] once the
    /// configuration has been fixed (explicitly or by first use).
    pub fn init(self) -> Result<()> {
        CONFIG
            .set(self)
            .map_err(|_| TransactionalError::ConfigAlreadyInitialized)
    }

    /// The active configuration, fixing built-in defaults on first read.
    pub fn get() -> &'static EngineConfig {
        CONFIG.get_or_init(EngineConfig::default)
    }
}
