//! The per-chain, per-datasource context slot.

use crate::hooks::HookEmitter;
use parking_lot::Mutex;
use std::sync::Arc;
use txscope_core::ConnectionHandle;

/// State attached to one logical call chain for one datasource name.
///
/// Holds the connection handle of the in-flight transaction (if any) and the
/// hook emitter notified when that transaction commits or rolls back. The
/// connection slot may be empty: untransacted work under `SUPPORTS` still
/// carries an emitter so commit hooks can fire on success.
pub struct TransactionContext {
    connection: Mutex<Option<Arc<dyn ConnectionHandle>>>,
    hooks: HookEmitter,
}

impl TransactionContext {
    /// A context owning `connection`, with a hook emitter capped at
    /// `max_hook_listeners`.
    pub fn with_connection(
        connection: Arc<dyn ConnectionHandle>,
        max_hook_listeners: usize,
    ) -> Arc<Self> {
        Arc::new(TransactionContext {
            connection: Mutex::new(Some(connection)),
            hooks: HookEmitter::new(max_hook_listeners),
        })
    }

    /// A context with no connection, for untransacted work that still wants
    /// commit notification.
    pub fn hooks_only(max_hook_listeners: usize) -> Arc<Self> {
        Arc::new(TransactionContext {
            connection: Mutex::new(None),
            hooks: HookEmitter::new(max_hook_listeners),
        })
    }

    /// The connection handle currently held by this context.
    pub fn connection(&self) -> Option<Arc<dyn ConnectionHandle>> {
        self.connection.lock().clone()
    }

    /// Drop the connection handle from the slot. Called once the owning
    /// strategy has released it.
    pub fn clear_connection(&self) {
        *self.connection.lock() = None;
    }

    /// Whether this context holds a connection with an open physical
    /// transaction.
    pub fn is_active(&self) -> bool {
        self.connection().map(|c| c.is_active()).unwrap_or(false)
    }

    /// The hook emitter for this context's transaction.
    pub fn hooks(&self) -> &HookEmitter {
        &self.hooks
    }
}

impl std::fmt::Debug for TransactionContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TransactionContext")
            .field("has_connection", &self.connection.lock().is_some())
            .field("hooks", &self.hooks)
            .finish()
    }
}
