//! Query Builder: applies a request's filters, sorts and page to a query
//! handle.

use std::sync::Arc;

use pagedquery_core::{PagedRequest, Record};

use crate::config::EngineConfig;
use crate::error::CompileError;
use crate::filter::{log_dropped_filter, FilterCompiler};
use crate::sort::{log_dropped_sort, SortCompiler};
use crate::traits::QueryHandle;

// ---------------------------------------------------------------------------
// Pagination
// ---------------------------------------------------------------------------

/// Resolved 1-based page and page size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    pub page: usize,
    pub size: usize,
}

impl Pagination {
    /// Uses `page`/`size` when positive, the defaults otherwise, and clamps
    /// the size to `max_size` when set.
    #[must_use]
    pub fn resolve(
        page: Option<i64>,
        size: Option<i64>,
        default_page: usize,
        default_size: usize,
        max_size: Option<usize>,
    ) -> Self {
        let page = positive(page).unwrap_or(default_page).max(1);
        let size = positive(size).unwrap_or(default_size);
        let size = max_size.map_or(size, |max| size.min(max));
        Self { page, size }
    }

    /// Records before this page: `(page - 1) * size`.
    #[must_use]
    pub const fn skip(&self) -> usize {
        self.page.saturating_sub(1).saturating_mul(self.size)
    }

    #[must_use]
    pub const fn take(&self) -> usize {
        self.size
    }
}

fn positive(value: Option<i64>) -> Option<usize> {
    value
        .filter(|v| *v > 0)
        .and_then(|v| usize::try_from(v).ok())
}

// ---------------------------------------------------------------------------
// BuildReport
// ---------------------------------------------------------------------------

/// Which part of a request a dropped term came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TermKind {
    Filter,
    Sort,
}

/// One request term that did not compile and was left out of the query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DroppedTerm {
    pub kind: TermKind,
    /// Position of the descriptor within its list.
    pub index: usize,
    /// Dotted property path, as requested.
    pub path: String,
    pub error: CompileError,
}

/// What [`QueryBuilder::build_query_with_report`] applied and dropped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildReport {
    pub pagination: Pagination,
    pub filters_applied: usize,
    pub sorts_applied: usize,
    pub dropped: Vec<DroppedTerm>,
}

impl BuildReport {
    #[must_use]
    pub fn dropped_count(&self, kind: TermKind) -> usize {
        self.dropped.iter().filter(|term| term.kind == kind).count()
    }

    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.dropped.is_empty()
    }
}

// ---------------------------------------------------------------------------
// QueryBuilder
// ---------------------------------------------------------------------------

/// Orchestrates filter and sort compilation for record type `T` and applies
/// the result to a [`QueryHandle`].
///
/// Cheap to clone; all clones share the record type's caches.
pub struct QueryBuilder<T> {
    filters: FilterCompiler<T>,
    sorts: SortCompiler<T>,
    config: Arc<EngineConfig>,
}

impl<T: Record> QueryBuilder<T> {
    #[must_use]
    pub fn new(filters: FilterCompiler<T>, sorts: SortCompiler<T>, config: Arc<EngineConfig>) -> Self {
        Self {
            filters,
            sorts,
            config,
        }
    }

    #[must_use]
    pub fn filters(&self) -> &FilterCompiler<T> {
        &self.filters
    }

    #[must_use]
    pub fn sorts(&self) -> &SortCompiler<T> {
        &self.sorts
    }

    /// Page and size for `request`, falling back to the given defaults.
    #[must_use]
    pub fn pagination(
        &self,
        request: &PagedRequest,
        default_page: usize,
        default_size: usize,
    ) -> Pagination {
        Pagination::resolve(
            request.page,
            request.size,
            default_page,
            default_size,
            self.config.max_page_size,
        )
    }

    /// Applies every compiled filter (ANDed), then every compiled sort (first
    /// is primary, the rest break ties), then skip/take for the page.
    ///
    /// Terms that fail to compile are dropped and logged. The returned
    /// handle is not executed.
    pub fn build_query<Q: QueryHandle<T>>(
        &self,
        source: Q,
        request: &PagedRequest,
        default_page: usize,
        default_size: usize,
    ) -> Q {
        let query = self
            .filters
            .build_filters(&request.filters)
            .fold(source, Q::filter);

        let mut sorts = self.sorts.build_sorts(&request.sorters);
        let query = match sorts.next() {
            Some(primary) => sorts.fold(query.order_by(primary), Q::then_by),
            None => query,
        };

        let pagination = self.pagination(request, default_page, default_size);
        query.skip(pagination.skip()).take(pagination.take())
    }

    /// [`QueryBuilder::build_query`] with the configured default page and
    /// size.
    pub fn build_query_default<Q: QueryHandle<T>>(&self, source: Q, request: &PagedRequest) -> Q {
        self.build_query(
            source,
            request,
            self.config.default_page,
            self.config.default_size,
        )
    }

    /// Like [`QueryBuilder::build_query`], also reporting which terms were
    /// dropped and why.
    pub fn build_query_with_report<Q: QueryHandle<T>>(
        &self,
        source: Q,
        request: &PagedRequest,
        default_page: usize,
        default_size: usize,
    ) -> (Q, BuildReport) {
        let mut dropped = Vec::new();
        let mut query = source;

        let mut filters_applied = 0;
        for (index, (descriptor, result)) in self.filters.compile_all(&request.filters).enumerate() {
            match result {
                Ok(predicate) => {
                    query = query.filter(predicate);
                    filters_applied += 1;
                }
                Err(error) => {
                    log_dropped_filter::<T>(descriptor, &error);
                    dropped.push(DroppedTerm {
                        kind: TermKind::Filter,
                        index,
                        path: descriptor.path(),
                        error,
                    });
                }
            }
        }

        let mut sorts_applied = 0;
        for (index, (descriptor, result)) in self.sorts.compile_all(&request.sorters).enumerate() {
            match result {
                Ok(ordering) => {
                    query = if sorts_applied == 0 {
                        query.order_by(ordering)
                    } else {
                        query.then_by(ordering)
                    };
                    sorts_applied += 1;
                }
                Err(error) => {
                    log_dropped_sort::<T>(descriptor, &error);
                    dropped.push(DroppedTerm {
                        kind: TermKind::Sort,
                        index,
                        path: descriptor.path(),
                        error,
                    });
                }
            }
        }

        let pagination = self.pagination(request, default_page, default_size);
        let query = query.skip(pagination.skip()).take(pagination.take());
        (
            query,
            BuildReport {
                pagination,
                filters_applied,
                sorts_applied,
                dropped,
            },
        )
    }
}

impl<T> Clone for QueryBuilder<T> {
    fn clone(&self) -> Self {
        Self {
            filters: self.filters.clone(),
            sorts: self.sorts.clone(),
            config: Arc::clone(&self.config),
        }
    }
}

impl<T> std::fmt::Debug for QueryBuilder<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("QueryBuilder")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use pagedquery_core::{FilterDescriptor, SortDescriptor};

    use super::*;
    use crate::cache::DescriptorCache;
    use crate::error::CompileErrorKind;
    use crate::memory::MemoryQuery;
    use crate::parse::ValueParser;
    use crate::testing::Example;

    fn builder(config: EngineConfig) -> QueryBuilder<Example> {
        QueryBuilder::new(
            FilterCompiler::new(
                Arc::new(DescriptorCache::unbounded()),
                Arc::new(ValueParser::new()),
            ),
            SortCompiler::new(Arc::new(DescriptorCache::unbounded())),
            Arc::new(config),
        )
    }

    fn ids(rows: &[&Example]) -> Vec<i64> {
        rows.iter().map(|r| r.id).collect()
    }

    #[test]
    fn pagination_defaults_and_clamp() {
        assert_eq!(
            Pagination::resolve(None, None, 1, 100, None),
            Pagination { page: 1, size: 100 }
        );
        assert_eq!(
            Pagination::resolve(Some(0), Some(-5), 2, 20, None),
            Pagination { page: 2, size: 20 }
        );
        assert_eq!(
            Pagination::resolve(Some(3), Some(500), 1, 100, Some(50)),
            Pagination { page: 3, size: 50 }
        );
        assert_eq!(Pagination { page: 2, size: 10 }.skip(), 10);
        assert_eq!(Pagination { page: 1, size: 10 }.skip(), 0);
    }

    #[test]
    fn second_page_of_twenty_five() {
        let data = Example::range(25);
        let request = PagedRequest::new()
            .sort(SortDescriptor::asc("Id"))
            .page(2)
            .size(10);
        let builder = builder(EngineConfig::default());

        let query = builder.build_query(MemoryQuery::new(&data), &request, 1, 100);
        assert_eq!(ids(&query.fetch()), (11..=20).collect::<Vec<_>>());
        assert_eq!(query.total_count(), 25);
    }

    #[test]
    fn filters_then_sorts_then_page() {
        let data = Example::range(30);
        let request = PagedRequest::new()
            .filter(FilterDescriptor::new("Active", "=", true))
            .filter(FilterDescriptor::new("Id", "<=", 20))
            .sort(SortDescriptor::desc("Id"))
            .size(3);
        let query = builder(EngineConfig::default()).build_query_default(MemoryQuery::new(&data), &request);
        assert_eq!(ids(&query.fetch()), vec![20, 18, 16]);
        assert_eq!(query.total_count(), 10);
    }

    #[test]
    fn invalid_terms_are_dropped_not_fatal() {
        let data = Example::range(5);
        let request = PagedRequest::new()
            .filter(FilterDescriptor::new("DoesNotExist", "=", 1))
            .filter(FilterDescriptor::new("Id", ">", 2))
            .sort(SortDescriptor::asc("Nope"))
            .sort(SortDescriptor::desc("Id"));

        let (query, report) =
            builder(EngineConfig::default()).build_query_with_report(MemoryQuery::new(&data), &request, 1, 100);

        assert_eq!(ids(&query.fetch()), vec![5, 4, 3]);
        assert_eq!(report.filters_applied, 1);
        assert_eq!(report.sorts_applied, 1);
        assert_eq!(report.dropped_count(TermKind::Filter), 1);
        assert_eq!(report.dropped_count(TermKind::Sort), 1);
        assert!(!report.is_complete());

        let first = &report.dropped[0];
        assert_eq!(first.kind, TermKind::Filter);
        assert_eq!(first.index, 0);
        assert_eq!(first.path, "DoesNotExist");
        assert_eq!(first.error.kind(), CompileErrorKind::UnknownProperty);

        assert_eq!(report.dropped[1].kind, TermKind::Sort);
        assert_eq!(report.dropped[1].index, 0);
    }

    #[test]
    fn report_and_plain_build_agree() {
        let data = Example::range(12);
        let request = PagedRequest::new()
            .filter(FilterDescriptor::new("Decimal", ">", 0.35))
            .sort(SortDescriptor::desc("Active"))
            .sort(SortDescriptor::asc("Date"))
            .page(1)
            .size(5);
        let builder = builder(EngineConfig::default());

        let plain = builder.build_query(MemoryQuery::new(&data), &request, 1, 100);
        let (reported, report) = builder.build_query_with_report(MemoryQuery::new(&data), &request, 1, 100);
        assert_eq!(ids(&plain.fetch()), ids(&reported.fetch()));
        assert!(report.is_complete());
        assert_eq!(report.pagination, Pagination { page: 1, size: 5 });
    }

    #[test]
    fn configured_page_size_cap() {
        let data = Example::range(40);
        let config = EngineConfig {
            max_page_size: Some(15),
            ..EngineConfig::default()
        };
        let request = PagedRequest::new().size(1_000);
        let query = builder(config).build_query_default(MemoryQuery::new(&data), &request);
        assert_eq!(query.fetch().len(), 15);
    }
}
