//! In-memory mock driver for demarcation tests.
//!
//! `MockDb` plays the database server: committed rows land in one shared
//! list. `MockConnection` models a depth-aware driver connection — pending
//! rows are buffered in savepoint frames, `begin` while active pushes a
//! frame, `commit`/`rollback` at depth merge or drop the innermost frame,
//! and releasing an active connection discards everything pending.

// Each integration test binary compiles its own copy of this module and
// uses a different subset of the helpers.
#![allow(dead_code)]

use async_trait::async_trait;
use parking_lot::Mutex;
use std::any::Any;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use txscope::{
    current_connection, ConnectionFactory, ConnectionHandle, DataSourceRegistry, IsolationLevel,
    Result, TransactionCoordinator, TransactionalError,
};

/// Shared in-memory "server" state.
pub struct MockDb {
    committed: Mutex<Vec<String>>,
    next_txn_id: AtomicU64,
}

impl MockDb {
    pub fn new() -> Arc<Self> {
        Arc::new(MockDb {
            committed: Mutex::new(Vec::new()),
            next_txn_id: AtomicU64::new(1),
        })
    }

    /// Rows visible outside any transaction.
    pub fn committed_rows(&self) -> Vec<String> {
        self.committed.lock().clone()
    }

    pub fn factory(self: &Arc<Self>) -> Arc<dyn ConnectionFactory> {
        Arc::new(MockFactory {
            db: Arc::clone(self),
        })
    }
}

struct MockFactory {
    db: Arc<MockDb>,
}

#[async_trait]
impl ConnectionFactory for MockFactory {
    async fn create(&self) -> Result<Arc<dyn ConnectionHandle>> {
        let txn_id = self.db.next_txn_id.fetch_add(1, Ordering::SeqCst);
        Ok(Arc::new(MockConnection {
            db: Arc::clone(&self.db),
            txn_id,
            state: Mutex::new(ConnState {
                active: false,
                released: false,
                frames: Vec::new(),
            }),
        }))
    }
}

struct ConnState {
    active: bool,
    released: bool,
    /// Pending rows, one frame per open transaction level.
    frames: Vec<Vec<String>>,
}

pub struct MockConnection {
    db: Arc<MockDb>,
    txn_id: u64,
    state: Mutex<ConnState>,
}

impl MockConnection {
    pub fn txn_id(&self) -> u64 {
        self.txn_id
    }

    /// Buffer a row on the innermost open transaction level.
    pub fn insert(&self, row: &str) {
        let mut state = self.state.lock();
        assert!(state.active, "insert outside an open transaction");
        state.frames.last_mut().unwrap().push(row.to_owned());
    }

    fn driver_error(message: &str) -> TransactionalError {
        TransactionalError::driver(std::io::Error::new(std::io::ErrorKind::Other, message))
    }
}

#[async_trait]
impl ConnectionHandle for MockConnection {
    async fn begin(&self, _isolation: IsolationLevel) -> Result<()> {
        let mut state = self.state.lock();
        if state.released {
            return Err(Self::driver_error("begin on released connection"));
        }
        if state.active {
            // Savepoint.
            state.frames.push(Vec::new());
        } else {
            state.active = true;
            state.frames = vec![Vec::new()];
        }
        Ok(())
    }

    async fn commit(&self) -> Result<()> {
        let mut state = self.state.lock();
        if !state.active {
            return Err(Self::driver_error("commit without open transaction"));
        }
        if state.frames.len() > 1 {
            // Release savepoint: pending rows survive into the parent frame.
            let merged = state.frames.pop().unwrap();
            state.frames.last_mut().unwrap().extend(merged);
        } else {
            let rows = state.frames.pop().unwrap();
            self.db.committed.lock().extend(rows);
            state.active = false;
        }
        Ok(())
    }

    async fn rollback(&self) -> Result<()> {
        let mut state = self.state.lock();
        if !state.active {
            return Err(Self::driver_error("rollback without open transaction"));
        }
        if state.frames.len() > 1 {
            state.frames.pop();
        } else {
            state.frames.clear();
            state.active = false;
        }
        Ok(())
    }

    async fn release(&self) -> Result<()> {
        let mut state = self.state.lock();
        state.released = true;
        // Drivers discard pending work on release.
        state.frames.clear();
        state.active = false;
        Ok(())
    }

    fn is_active(&self) -> bool {
        let state = self.state.lock();
        state.active && !state.released
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// One registered datasource plus a coordinator over it.
pub struct Harness {
    pub db: Arc<MockDb>,
    pub tx: Arc<TransactionCoordinator>,
}

pub fn harness() -> Harness {
    harness_with(&["default"])
}

pub fn harness_with(names: &[&str]) -> Harness {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();
    let db = MockDb::new();
    let registry = Arc::new(DataSourceRegistry::new());
    for name in names {
        registry.register(*name, db.factory()).unwrap();
    }
    Harness {
        db,
        tx: Arc::new(TransactionCoordinator::new(registry)),
    }
}

/// Insert a row on the transaction currently in flight for `name`.
pub fn insert(name: &str, row: &str) {
    let connection = current_connection(name).expect("active transaction");
    connection
        .as_any()
        .downcast_ref::<MockConnection>()
        .expect("mock connection")
        .insert(row);
}

/// The transaction id of the connection currently in flight for `name`.
pub fn current_txn_id(name: &str) -> u64 {
    let connection = current_connection(name).expect("active transaction");
    connection
        .as_any()
        .downcast_ref::<MockConnection>()
        .expect("mock connection")
        .txn_id()
}
