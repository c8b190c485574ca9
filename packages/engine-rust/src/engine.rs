use std::sync::Arc;

use pagedquery_core::Record;

use crate::builder::QueryBuilder;
use crate::config::EngineConfig;
use crate::error::RegistrationError;
use crate::filter::FilterCompiler;
use crate::parse::ValueParser;
use crate::registry::{CacheRegistry, RecordCacheStats};
use crate::sort::SortCompiler;

/// Process-wide entry point: owns configuration, the value parser and the
/// per-record-type caches.
///
/// Create one at startup, register every queryable record type, then hand
/// out [`QueryBuilder`]s per request.
#[derive(Debug)]
pub struct QueryEngine {
    config: Arc<EngineConfig>,
    registry: CacheRegistry,
    parser: Arc<ValueParser>,
}

impl QueryEngine {
    #[must_use]
    pub fn new(config: EngineConfig) -> Self {
        Self::with_parser(config, ValueParser::new())
    }

    /// Creates an engine using a customized value parser.
    #[must_use]
    pub fn with_parser(config: EngineConfig, parser: ValueParser) -> Self {
        Self {
            registry: CacheRegistry::new(config.cache_capacity),
            config: Arc::new(config),
            parser: Arc::new(parser),
        }
    }

    #[must_use]
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Registers record type `T` and creates its filter and sort caches.
    ///
    /// # Errors
    ///
    /// Returns [`RegistrationError::EmptySchema`] when `T` has no members.
    pub fn register<T: Record>(&self) -> Result<(), RegistrationError> {
        self.registry.register::<T>().map(|_| ())
    }

    /// A query builder for `T` sharing the engine's caches.
    ///
    /// # Errors
    ///
    /// Returns [`RegistrationError::NotRegistered`] when `T` was not
    /// registered.
    pub fn builder<T: Record>(&self) -> Result<QueryBuilder<T>, RegistrationError> {
        let caches = self.registry.caches::<T>()?;
        Ok(QueryBuilder::new(
            FilterCompiler::new(Arc::clone(&caches.filters), Arc::clone(&self.parser)),
            SortCompiler::new(Arc::clone(&caches.sorts)),
            Arc::clone(&self.config),
        ))
    }

    /// Registered record names, in registration order.
    #[must_use]
    pub fn registered_types(&self) -> Vec<&'static str> {
        self.registry.registered_types()
    }

    /// Cache counters for `T`, if registered.
    #[must_use]
    pub fn cache_stats<T: Record>(&self) -> Option<RecordCacheStats> {
        self.registry.get::<T>().map(|caches| caches.stats())
    }

    /// Empties both caches of `T`. Returns `false` if `T` is not registered.
    pub fn clear_caches<T: Record>(&self) -> bool {
        let Some(caches) = self.registry.get::<T>() else {
            return false;
        };
        caches.clear();
        true
    }
}

impl Default for QueryEngine {
    fn default() -> Self {
        Self::new(EngineConfig::default())
    }
}
