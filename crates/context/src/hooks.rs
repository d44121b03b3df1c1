//! Fire-once commit/rollback notification.

use parking_lot::Mutex;
use std::future::Future;
use std::pin::Pin;
use txscope_core::{Result, TransactionalError};

/// Boxed future returned by a hook callback.
pub type HookFuture = Pin<Box<dyn Future<Output = ()> + Send>>;

type Hook = Box<dyn FnOnce() -> HookFuture + Send>;

/// Commit/rollback listener registry for one transaction context.
///
/// Listeners fire at most once per physical commit or rollback event, in
/// registration order: firing drains the listener list, so a second fire is
/// a no-op and a listener can never run twice. The listener cap is captured
/// at emitter creation and cannot be raised afterwards.
pub struct HookEmitter {
    commit: Mutex<Vec<Hook>>,
    rollback: Mutex<Vec<Hook>>,
    max_listeners: usize,
}

impl HookEmitter {
    /// An emitter capped at `max_listeners` per event kind.
    pub fn new(max_listeners: usize) -> Self {
        HookEmitter {
            commit: Mutex::new(Vec::new()),
            rollback: Mutex::new(Vec::new()),
            max_listeners,
        }
    }

    /// Register a callback fired after the physical commit.
    pub fn on_commit<F, Fut>(&self, callback: F) -> Result<()>
    where
        F: FnOnce() -> Fut + Send + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        Self::push(&self.commit, self.max_listeners, callback)
    }

    /// Register a callback fired after the physical rollback.
    pub fn on_rollback<F, Fut>(&self, callback: F) -> Result<()>
    where
        F: FnOnce() -> Fut + Send + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        Self::push(&self.rollback, self.max_listeners, callback)
    }

    /// Fire all commit listeners registered so far, in registration order.
    pub async fn fire_commit(&self) {
        Self::fire(&self.commit).await;
    }

    /// Fire all rollback listeners registered so far, in registration order.
    pub async fn fire_rollback(&self) {
        Self::fire(&self.rollback).await;
    }

    fn push<F, Fut>(listeners: &Mutex<Vec<Hook>>, limit: usize, callback: F) -> Result<()>
    where
        F: FnOnce() -> Fut + Send + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        let mut listeners = listeners.lock();
        if listeners.len() >= limit {
            return Err(TransactionalError::ListenerOverflow { limit });
        }
        listeners.push(Box::new(move || Box::pin(callback()) as HookFuture));
        Ok(())
    }

    async fn fire(listeners: &Mutex<Vec<Hook>>) {
        // Drain under the lock, await outside it.
        let drained: Vec<Hook> = std::mem::take(&mut *listeners.lock());
        for hook in drained {
            hook().await;
        }
    }
}

impl std::fmt::Debug for HookEmitter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HookEmitter")
            .field("commit_listeners", &self.commit.lock().len())
            .field("rollback_listeners", &self.rollback.lock().len())
            .field("max_listeners", &self.max_listeners)
            .finish()
    }
}
