//! Datasource registry: logical name to connection factory.
//!
//! The registry is write-once per name and read-only afterwards; there is no
//! runtime re-registration. Lookup of an unregistered name is a fatal
//! configuration error.

use crate::connection::{ConnectionFactory, ConnectionHandle};
use crate::error::{Result, TransactionalError};
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;

/// Maps logical datasource names to connection factories.
#[derive(Default)]
pub struct DataSourceRegistry {
    factories: RwLock<HashMap<String, Arc<dyn ConnectionFactory>>>,
}

impl DataSourceRegistry {
    /// An empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a factory under `name`.
    ///
    /// Fails with [`TransactionalError::DataSourceAlreadyRegistered`] if the
    /// name is taken.
    pub fn register(&self, name: impl Into<String>, factory: Arc<dyn ConnectionFactory>) -> Result<()> {
        let name = name.into();
        let mut factories = self.factories.write();
        if factories.contains_key(&name) {
            return Err(TransactionalError::DataSourceAlreadyRegistered(name));
        }
        factories.insert(name, factory);
        Ok(())
    }

    /// Look up the factory registered under `name`.
    pub fn resolve(&self, name: &str) -> Result<Arc<dyn ConnectionFactory>> {
        self.factories
            .read()
            .get(name)
            .cloned()
            .ok_or_else(|| TransactionalError::NoRegisteredDataSource(name.to_owned()))
    }

    /// Open a new connection handle for `name`.
    pub async fn connection(&self, name: &str) -> Result<Arc<dyn ConnectionHandle>> {
        let factory = self.resolve(name)?;
        factory.create().await
    }

    /// The set of registered datasource names.
    pub fn names(&self) -> Vec<String> {
        self.factories.read().keys().cloned().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::IsolationLevel;
    use async_trait::async_trait;
    use std::any::Any;

    struct NullConnection;

    #[async_trait]
    impl ConnectionHandle for NullConnection {
        async fn begin(&self, _isolation: IsolationLevel) -> Result<()> {
            Ok(())
        }
        async fn commit(&self) -> Result<()> {
            Ok(())
        }
        async fn rollback(&self) -> Result<()> {
            Ok(())
        }
        async fn release(&self) -> Result<()> {
            Ok(())
        }
        fn is_active(&self) -> bool {
            false
        }
        fn as_any(&self) -> &dyn Any {
            self
        }
    }

    struct NullFactory;

    #[async_trait]
    impl ConnectionFactory for NullFactory {
        async fn create(&self) -> Result<Arc<dyn ConnectionHandle>> {
            Ok(Arc::new(NullConnection))
        }
    }

    #[test]
    fn duplicate_registration_fails() {
        let registry = DataSourceRegistry::new();
        registry.register("default", Arc::new(NullFactory)).unwrap();
        let err = registry.register("default", Arc::new(NullFactory)).unwrap_err();
        assert!(matches!(err, TransactionalError::DataSourceAlreadyRegistered(_)));
    }

    #[test]
    fn unknown_name_fails_resolution() {
        let registry = DataSourceRegistry::new();
        let err = registry.resolve("ghost").unwrap_err();
        assert!(matches!(err, TransactionalError::NoRegisteredDataSource(ref n) if n == "ghost"));
    }

    #[tokio::test]
    async fn registered_factory_produces_connections() {
        let registry = DataSourceRegistry::new();
        registry.register("default", Arc::new(NullFactory)).unwrap();
        let handle = registry.connection("default").await.unwrap();
        assert!(!handle.is_active());
        assert_eq!(registry.names(), vec!["default".to_string()]);
    }
}
