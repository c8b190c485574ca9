//! Sort compilation with a per-record-type cache.

use std::cmp::Ordering;
use std::marker::PhantomData;
use std::sync::Arc;

use pagedquery_core::{FieldType, Record, SortDescriptor, SortDirection, Value};

use crate::cache::SortCache;
use crate::error::CompileError;
use crate::resolve::{AccessPath, PropertyResolver};

// ---------------------------------------------------------------------------
// CompiledOrdering
// ---------------------------------------------------------------------------

/// A compiled sort key plus direction for record type `T`.
pub struct CompiledOrdering<T> {
    path: Arc<AccessPath>,
    direction: SortDirection,
    _record: PhantomData<fn(&T) -> Value>,
}

impl<T: Record> CompiledOrdering<T> {
    #[must_use]
    pub fn new(path: AccessPath, direction: SortDirection) -> Self {
        Self {
            path: Arc::new(path),
            direction,
            _record: PhantomData,
        }
    }

    /// Extracts the sort key from `record`.
    #[must_use]
    pub fn key(&self, record: &T) -> Value {
        self.path.read(record)
    }

    /// Orders two records by this key, honoring the direction.
    ///
    /// `Null` keys sort first ascending and last descending.
    #[must_use]
    pub fn compare(&self, a: &T, b: &T) -> Ordering {
        let ord = self.key(a).canonical_cmp(&self.key(b));
        match self.direction {
            SortDirection::Asc => ord,
            SortDirection::Desc => ord.reverse(),
        }
    }

    #[must_use]
    pub fn path(&self) -> &AccessPath {
        &self.path
    }

    #[must_use]
    pub const fn direction(&self) -> SortDirection {
        self.direction
    }

    #[must_use]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.path, &other.path)
    }
}

impl<T> Clone for CompiledOrdering<T> {
    fn clone(&self) -> Self {
        Self {
            path: Arc::clone(&self.path),
            direction: self.direction,
            _record: PhantomData,
        }
    }
}

impl<T> std::fmt::Debug for CompiledOrdering<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CompiledOrdering")
            .field("path", &self.path.to_string())
            .field("direction", &self.direction)
            .finish()
    }
}

// ---------------------------------------------------------------------------
// SortCompiler
// ---------------------------------------------------------------------------

/// Compiles [`SortDescriptor`]s into [`CompiledOrdering`]s for `T`, serving
/// repeats from a shared cache.
pub struct SortCompiler<T> {
    cache: Arc<SortCache<T>>,
}

impl<T: Record> SortCompiler<T> {
    #[must_use]
    pub fn new(cache: Arc<SortCache<T>>) -> Self {
        Self { cache }
    }

    #[must_use]
    pub fn cache(&self) -> &SortCache<T> {
        &self.cache
    }

    /// Compiles `descriptor` without consulting or populating the cache.
    ///
    /// # Errors
    ///
    /// - [`CompileError::UnknownProperty`] when any step of the path does not
    ///   resolve.
    /// - [`CompileError::IncompatibleOperandTypes`] when the leaf is a
    ///   collection or sub-object.
    pub fn compile(&self, descriptor: &SortDescriptor) -> Result<CompiledOrdering<T>, CompileError> {
        let path = PropertyResolver::resolve_path(
            T::schema(),
            descriptor.property(),
            descriptor.nested_path(),
        )?;
        if matches!(
            path.leaf_type().unwrap_optional(),
            FieldType::List(_) | FieldType::Record(_)
        ) {
            return Err(CompileError::IncompatibleOperandTypes {
                operation: "sort".to_string(),
                declared: path.leaf_type().to_string(),
            });
        }
        Ok(CompiledOrdering::new(path, descriptor.direction()))
    }

    /// Returns the cached ordering for `descriptor`, compiling and caching it
    /// on a miss.
    ///
    /// # Errors
    ///
    /// See [`SortCompiler::compile`].
    pub fn compile_or_fetch(
        &self,
        descriptor: &SortDescriptor,
    ) -> Result<CompiledOrdering<T>, CompileError> {
        if let Some(ordering) = self.cache.get(descriptor) {
            tracing::debug!(
                record = T::schema().name(),
                sort = %descriptor.path(),
                "sort cache hit"
            );
            return Ok(ordering);
        }

        let ordering = self.compile(descriptor)?;
        self.cache.insert(descriptor.clone(), ordering.clone());
        tracing::debug!(
            record = T::schema().name(),
            sort = %descriptor.path(),
            "sort compiled and cached"
        );
        Ok(ordering)
    }

    /// Lazily compiles each descriptor in order, pairing it with its outcome.
    pub fn compile_all<'a>(
        &'a self,
        descriptors: &'a [SortDescriptor],
    ) -> impl Iterator<Item = (&'a SortDescriptor, Result<CompiledOrdering<T>, CompileError>)> + 'a
    {
        descriptors
            .iter()
            .map(move |descriptor| (descriptor, self.compile_or_fetch(descriptor)))
    }

    /// Lazily yields one ordering per descriptor that compiles, in order.
    pub fn build_sorts<'a>(
        &'a self,
        descriptors: &'a [SortDescriptor],
    ) -> impl Iterator<Item = CompiledOrdering<T>> + 'a {
        self.compile_all(descriptors)
            .filter_map(|(descriptor, result)| match result {
                Ok(ordering) => Some(ordering),
                Err(error) => {
                    log_dropped_sort::<T>(descriptor, &error);
                    None
                }
            })
    }
}

impl<T> Clone for SortCompiler<T> {
    fn clone(&self) -> Self {
        Self {
            cache: Arc::clone(&self.cache),
        }
    }
}

pub(crate) fn log_dropped_sort<T: Record>(descriptor: &SortDescriptor, error: &CompileError) {
    tracing::warn!(
        record = T::schema().name(),
        sort = %descriptor.path(),
        error = %error,
        "dropping sort descriptor"
    );
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
