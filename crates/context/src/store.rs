//! Task-local context slots, one per logical datasource name.
//!
//! Slots are installed by scoping a future ([`ContextStore::run`]) and are
//! visible to everything that future transitively awaits. Each scope entry
//! clones the current slot map, so sibling branches of a `join!` — even on a
//! single-threaded runtime — never observe each other's slots, and the prior
//! value is restored structurally when the scope exits.

use crate::context::TransactionContext;
use std::cell::RefCell;
use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;

type ContextMap = HashMap<String, Arc<TransactionContext>>;

tokio::task_local! {
    static CONTEXTS: RefCell<ContextMap>;
}

/// Continuation-scoped storage for transaction contexts.
///
/// All methods operate on the calling continuation only. Reading or clearing
/// a key that was never installed is not an error; deciding whether a
/// datasource name is legitimate is the coordinator's job.
pub struct ContextStore;

impl ContextStore {
    /// Run `fut` with `context` installed as the slot for `key`.
    ///
    /// The slot is visible for the dynamic extent of `fut`, across all its
    /// suspension points; any previously installed slot for `key` is
    /// shadowed for that extent and restored afterwards. This shadowing is
    /// also how `REQUIRES_NEW` suspends an outer transaction: the inner
    /// scope simply replaces the slot, and the outer context reappears when
    /// the inner future completes.
    pub async fn run<F>(key: &str, context: Arc<TransactionContext>, fut: F) -> F::Output
    where
        F: Future,
    {
        let mut map = CONTEXTS
            .try_with(|m| m.borrow().clone())
            .unwrap_or_default();
        map.insert(key.to_owned(), context);
        CONTEXTS.scope(RefCell::new(map), fut).await
    }

    /// The slot currently installed for `key`, if any.
    pub fn get(key: &str) -> Option<Arc<TransactionContext>> {
        CONTEXTS
            .try_with(|m| m.borrow().get(key).cloned())
            .ok()
            .flatten()
    }

    /// Remove the slot for `key` for the remainder of the current
    /// continuation. No-op outside any scope.
    pub fn clear(key: &str) {
        let _ = CONTEXTS.try_with(|m| {
            m.borrow_mut().remove(key);
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ctx() -> Arc<TransactionContext> {
        TransactionContext::hooks_only(10)
    }

    #[tokio::test]
    async fn absent_outside_any_scope() {
        assert!(ContextStore::get("default").is_none());
        // Clearing outside a scope must not panic.
        ContextStore::clear("default");
    }

    #[tokio::test]
    async fn slot_visible_inside_scope_and_gone_after() {
        let context = ctx();
        let inner = Arc::clone(&context);
        ContextStore::run("default", context, async move {
            let seen = ContextStore::get("default").expect("slot installed");
            assert!(Arc::ptr_eq(&seen, &inner));
        })
        .await;
        assert!(ContextStore::get("default").is_none());
    }

    #[tokio::test]
    async fn keys_are_independent() {
        ContextStore::run("primary", ctx(), async {
            assert!(ContextStore::get("primary").is_some());
            assert!(ContextStore::get("reporting").is_none());
        })
        .await;
    }

    #[tokio::test]
    async fn nested_scope_shadows_and_restores() {
        let outer = ctx();
        let outer_probe = Arc::clone(&outer);
        ContextStore::run("default", outer, async move {
            let inner = ctx();
            let inner_probe = Arc::clone(&inner);
            ContextStore::run("default", inner, async move {
                let seen = ContextStore::get("default").unwrap();
                assert!(Arc::ptr_eq(&seen, &inner_probe));
            })
            .await;
            let seen = ContextStore::get("default").unwrap();
            assert!(Arc::ptr_eq(&seen, &outer_probe));
        })
        .await;
    }

    #[tokio::test]
    async fn clear_lasts_for_the_remaining_continuation() {
        ContextStore::run("default", ctx(), async {
            ContextStore::clear("default");
            assert!(ContextStore::get("default").is_none());
            tokio::task::yield_now().await;
            assert!(ContextStore::get("default").is_none());
        })
        .await;
    }

    #[tokio::test]
    async fn interleaved_chains_never_share_slots() {
        // Two branches joined in one task: each installs its own slot and
        // yields at every step, forcing interleaving on the current thread.
        let chain = |label: &'static str| async move {
            ContextStore::run("default", ctx(), async move {
                let mine = ContextStore::get("default").unwrap();
                for _ in 0..5 {
                    tokio::task::yield_now().await;
                    let seen = ContextStore::get("default").unwrap();
                    assert!(Arc::ptr_eq(&mine, &seen), "chain {label} lost its slot");
                }
                Arc::as_ptr(&mine) as usize
            })
            .await
        };
        let (a, b) = tokio::join!(chain("a"), chain("b"));
        assert_ne!(a, b);
    }
}
