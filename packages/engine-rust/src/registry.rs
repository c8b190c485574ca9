use std::any::{Any, TypeId};
use std::collections::HashSet;
use std::sync::Arc;

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use pagedquery_core::{Record, RecordSchema};
use parking_lot::RwLock;

use crate::cache::{CacheStats, DescriptorCache, FilterCache, SortCache};
use crate::error::RegistrationError;

// ---------------------------------------------------------------------------
// RecordCaches
// ---------------------------------------------------------------------------

/// The filter and sort caches of one record type.
pub struct RecordCaches<T> {
    pub filters: Arc<FilterCache<T>>,
    pub sorts: Arc<SortCache<T>>,
}

impl<T: Record> RecordCaches<T> {
    /// Creates empty caches, bounded to `capacity` entries each when set.
    #[must_use]
    pub fn new(capacity: Option<usize>) -> Self {
        Self {
            filters: Arc::new(DescriptorCache::with_capacity(capacity)),
            sorts: Arc::new(DescriptorCache::with_capacity(capacity)),
        }
    }

    #[must_use]
    pub fn stats(&self) -> RecordCacheStats {
        RecordCacheStats {
            filters: self.filters.stats(),
            sorts: self.sorts.stats(),
        }
    }

    pub fn clear(&self) {
        self.filters.clear();
        self.sorts.clear();
    }
}

/// Counters of both caches of one record type.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RecordCacheStats {
    pub filters: CacheStats,
    pub sorts: CacheStats,
}

// ---------------------------------------------------------------------------
// CacheRegistry
// ---------------------------------------------------------------------------

/// Registry of per-record-type caches.
///
/// Caches are created once per record type at registration and live as long
/// as the registry. Lookup is by `TypeId`; registration order is kept for
/// diagnostics.
pub struct CacheRegistry {
    /// Type-based lookup: `TypeId` -> `Arc<RecordCaches<T>>`.
    by_type: DashMap<TypeId, Arc<dyn Any + Send + Sync>>,
    /// Record names in registration order.
    order: RwLock<Vec<&'static str>>,
    capacity: Option<usize>,
}

impl CacheRegistry {
    /// Creates an empty registry whose caches hold at most `capacity`
    /// entries each (`None` = unbounded).
    #[must_use]
    pub fn new(capacity: Option<usize>) -> Self {
        Self {
            by_type: DashMap::new(),
            order: RwLock::new(Vec::new()),
            capacity,
        }
    }

    /// Registers record type `T`, creating its caches.
    ///
    /// Registering an already registered type returns the existing caches.
    ///
    /// # Errors
    ///
    /// Returns [`RegistrationError::EmptySchema`] when `T`, or any record type
    /// nested inside it, declares no members.
    pub fn register<T: Record>(&self) -> Result<Arc<RecordCaches<T>>, RegistrationError> {
        validate_schema(T::schema(), &mut HashSet::new())?;
        if let Some(existing) = self.get::<T>() {
            return Ok(existing);
        }

        let caches = Arc::new(RecordCaches::<T>::new(self.capacity));
        match self.by_type.entry(TypeId::of::<T>()) {
            // Lost a registration race; the winner's caches are returned below.
            Entry::Occupied(_) => {}
            Entry::Vacant(entry) => {
                entry.insert(caches.clone());
                self.order.write().push(T::schema().name());
                tracing::info!(
                    record = T::schema().name(),
                    fields = T::schema().fields().len(),
                    bounded = self.capacity.is_some(),
                    "record type registered"
                );
                return Ok(caches);
            }
        }
        self.caches::<T>()
    }

    /// Retrieve the caches of a registered record type.
    pub fn get<T: Record>(&self) -> Option<Arc<RecordCaches<T>>> {
        self.by_type
            .get(&TypeId::of::<T>())
            .and_then(|entry| entry.value().clone().downcast::<RecordCaches<T>>().ok())
    }

    /// Like [`CacheRegistry::get`], failing for unregistered types.
    ///
    /// # Errors
    ///
    /// Returns [`RegistrationError::NotRegistered`] when `T` was never
    /// registered.
    pub fn caches<T: Record>(&self) -> Result<Arc<RecordCaches<T>>, RegistrationError> {
        self.get::<T>().ok_or(RegistrationError::NotRegistered {
            record: T::schema().name(),
        })
    }

    #[must_use]
    pub fn is_registered<T: Record>(&self) -> bool {
        self.by_type.contains_key(&TypeId::of::<T>())
    }

    /// Registered record names, in registration order.
    #[must_use]
    pub fn registered_types(&self) -> Vec<&'static str> {
        self.order.read().clone()
    }
}

impl std::fmt::Debug for CacheRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CacheRegistry")
            .field("types", &*self.order.read())
            .field("capacity", &self.capacity)
            .finish()
    }
}

fn validate_schema(
    schema: &'static RecordSchema,
    visited: &mut HashSet<&'static str>,
) -> Result<(), RegistrationError> {
    if !visited.insert(schema.name()) {
        return Ok(());
    }
    if schema.is_empty() {
        return Err(RegistrationError::EmptySchema {
            record: schema.name(),
        });
    }
    for field in schema.fields() {
        let nested = field
            .ty
            .record_schema()
            .or_else(|| field.ty.element().and_then(|e| e.record_schema()));
        if let Some(nested) = nested {
            validate_schema(nested, visited)?;
        }
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use pagedquery_core::SortDescriptor;

    use super::*;
    use crate::sort::SortCompiler;
    use crate::testing::{Example, Hollow};

    #[test]
    fn register_creates_caches_once() {
        let registry = CacheRegistry::new(None);
        assert!(!registry.is_registered::<Example>());

        let first = registry.register::<Example>().unwrap();
        let second = registry.register::<Example>().unwrap();
        assert!(Arc::ptr_eq(&first.filters, &second.filters));
        assert_eq!(registry.registered_types(), vec!["Example"]);
        assert!(registry.is_registered::<Example>());
    }

    #[test]
    fn empty_schema_is_rejected() {
        let registry = CacheRegistry::new(None);
        assert_eq!(
            registry.register::<Hollow>().err(),
            Some(RegistrationError::EmptySchema { record: "Hollow" })
        );
        assert!(registry.registered_types().is_empty());
    }

    #[test]
    fn unregistered_type_is_reported() {
        let registry = CacheRegistry::new(None);
        assert!(registry.get::<Example>().is_none());
        assert_eq!(
            registry.caches::<Example>().err(),
            Some(RegistrationError::NotRegistered { record: "Example" })
        );
    }

    #[test]
    fn capacity_reaches_the_caches() {
        let registry = CacheRegistry::new(Some(64));
        let caches = registry.register::<Example>().unwrap();
        assert!(caches.filters.is_bounded());
        assert!(caches.sorts.is_bounded());
    }

    #[test]
    fn stats_and_clear() {
        let registry = CacheRegistry::new(None);
        let caches = registry.register::<Example>().unwrap();
        let sorts = SortCompiler::<Example>::new(Arc::clone(&caches.sorts));
        sorts.compile_or_fetch(&SortDescriptor::asc("Id")).unwrap();

        assert_eq!(caches.stats().sorts.entries, 1);
        assert_eq!(caches.stats().sorts.misses, 1);
        assert_eq!(caches.stats().filters, CacheStats::default());

        caches.clear();
        assert_eq!(caches.stats().sorts.entries, 0);
    }
}
