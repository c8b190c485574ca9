//! Filter compilation with a per-record-type cache.

use std::sync::Arc;

use pagedquery_core::{FilterDescriptor, Record};

use crate::cache::FilterCache;
use crate::error::CompileError;
use crate::operation::OperationResolver;
use crate::parse::ValueParser;
use crate::predicate::CompiledPredicate;
use crate::resolve::PropertyResolver;

/// Compiles [`FilterDescriptor`]s into [`CompiledPredicate`]s for `T`,
/// serving repeats from a shared cache.
pub struct FilterCompiler<T> {
    cache: Arc<FilterCache<T>>,
    parser: Arc<ValueParser>,
}

impl<T: Record> FilterCompiler<T> {
    #[must_use]
    pub fn new(cache: Arc<FilterCache<T>>, parser: Arc<ValueParser>) -> Self {
        Self { cache, parser }
    }

    #[must_use]
    pub fn cache(&self) -> &FilterCache<T> {
        &self.cache
    }

    /// Compiles `descriptor` without consulting or populating the cache.
    ///
    /// Resolves the access path (re-deriving the declared type at each nested
    /// hop), derives the operand type for the operator, parses the value as
    /// that type and builds the predicate.
    ///
    /// # Errors
    ///
    /// Returns the first [`CompileError`] raised by any step.
    pub fn compile(&self, descriptor: &FilterDescriptor) -> Result<CompiledPredicate<T>, CompileError> {
        let path = PropertyResolver::resolve_path(
            T::schema(),
            descriptor.property(),
            descriptor.nested_path(),
        )?;
        let declared = path.leaf_type().clone();
        let operand = OperationResolver::operand_type(descriptor.operation(), &declared)?;
        let right = self.parser.parse(descriptor.value(), &operand)?;
        let expr = OperationResolver::build(descriptor.operation(), path, right, &declared)?;
        Ok(CompiledPredicate::new(expr))
    }

    /// Returns the cached predicate for `descriptor`, compiling and caching
    /// it on a miss. Failed compiles are never cached.
    ///
    /// # Errors
    ///
    /// See [`FilterCompiler::compile`].
    pub fn compile_or_fetch(
        &self,
        descriptor: &FilterDescriptor,
    ) -> Result<CompiledPredicate<T>, CompileError> {
        if let Some(predicate) = self.cache.get(descriptor) {
            tracing::debug!(
                record = T::schema().name(),
                filter = %descriptor.path(),
                "filter cache hit"
            );
            return Ok(predicate);
        }

        let predicate = self.compile(descriptor)?;
        self.cache.insert(descriptor.clone(), predicate.clone());
        tracing::debug!(
            record = T::schema().name(),
            filter = %descriptor.path(),
            operation = %descriptor.operation(),
            "filter compiled and cached"
        );
        Ok(predicate)
    }

    /// Lazily compiles each descriptor in order, pairing it with its outcome.
    pub fn compile_all<'a>(
        &'a self,
        descriptors: &'a [FilterDescriptor],
    ) -> impl Iterator<Item = (&'a FilterDescriptor, Result<CompiledPredicate<T>, CompileError>)> + 'a
    {
        descriptors
            .iter()
            .map(move |descriptor| (descriptor, self.compile_or_fetch(descriptor)))
    }

    /// Lazily yields one predicate per descriptor that compiles, in order.
    ///
    /// Descriptors that fail are skipped and logged; an empty slice never
    /// touches the cache.
    pub fn build_filters<'a>(
        &'a self,
        descriptors: &'a [FilterDescriptor],
    ) -> impl Iterator<Item = CompiledPredicate<T>> + 'a {
        self.compile_all(descriptors)
            .filter_map(|(descriptor, result)| match result {
                Ok(predicate) => Some(predicate),
                Err(error) => {
                    log_dropped_filter::<T>(descriptor, &error);
                    None
                }
            })
    }
}

impl<T> Clone for FilterCompiler<T> {
    fn clone(&self) -> Self {
        Self {
            cache: Arc::clone(&self.cache),
            parser: Arc::clone(&self.parser),
        }
    }
}

pub(crate) fn log_dropped_filter<T: Record>(descriptor: &FilterDescriptor, error: &CompileError) {
    tracing::warn!(
        record = T::schema().name(),
        filter = %descriptor.path(),
        operation = %descriptor.operation(),
        error = %error,
        "dropping filter descriptor"
    );
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
