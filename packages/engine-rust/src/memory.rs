//! In-memory [`QueryHandle`] over a borrowed slice.

use std::cmp::Ordering;

use pagedquery_core::{PagedResponse, Record};

use crate::builder::Pagination;
use crate::predicate::CompiledPredicate;
use crate::sort::CompiledOrdering;
use crate::traits::QueryHandle;

/// Deferred query over `&[T]`. Nothing is evaluated until
/// [`MemoryQuery::fetch`] or [`MemoryQuery::total_count`].
pub struct MemoryQuery<'a, T> {
    source: &'a [T],
    predicates: Vec<CompiledPredicate<T>>,
    orderings: Vec<CompiledOrdering<T>>,
    skip: usize,
    take: Option<usize>,
}

impl<'a, T: Record> MemoryQuery<'a, T> {
    #[must_use]
    pub fn new(source: &'a [T]) -> Self {
        Self {
            source,
            predicates: Vec::new(),
            orderings: Vec::new(),
            skip: 0,
            take: None,
        }
    }

    #[must_use]
    pub fn predicate_count(&self) -> usize {
        self.predicates.len()
    }

    #[must_use]
    pub fn ordering_count(&self) -> usize {
        self.orderings.len()
    }

    fn matches(&self, record: &T) -> bool {
        self.predicates.iter().all(|predicate| predicate.matches(record))
    }

    fn compare(&self, a: &T, b: &T) -> Ordering {
        self.orderings
            .iter()
            .map(|ordering| ordering.compare(a, b))
            .find(|ord| ord.is_ne())
            .unwrap_or(Ordering::Equal)
    }

    /// Executes the query: filters, orders (stable), then applies the
    /// skip/take window.
    #[must_use]
    pub fn fetch(&self) -> Vec<&'a T> {
        let mut rows: Vec<&'a T> = self.source.iter().filter(|r| self.matches(r)).collect();
        if !self.orderings.is_empty() {
            rows.sort_by(|a, b| self.compare(a, b));
        }
        rows.into_iter()
            .skip(self.skip)
            .take(self.take.unwrap_or(usize::MAX))
            .collect()
    }

    /// Number of records matching the predicates, ignoring skip/take.
    #[must_use]
    pub fn total_count(&self) -> usize {
        self.source.iter().filter(|r| self.matches(r)).count()
    }

    /// Executes the query and wraps the page with its metadata.
    #[must_use]
    pub fn into_paged_response(self, pagination: Pagination) -> PagedResponse<&'a T> {
        PagedResponse::new(
            self.fetch(),
            pagination.page,
            pagination.size,
            self.total_count(),
        )
    }
}

impl<T: Record> QueryHandle<T> for MemoryQuery<'_, T> {
    fn filter(mut self, predicate: CompiledPredicate<T>) -> Self {
        self.predicates.push(predicate);
        self
    }

    fn order_by(mut self, ordering: CompiledOrdering<T>) -> Self {
        self.orderings.clear();
        self.orderings.push(ordering);
        self
    }

    fn then_by(mut self, ordering: CompiledOrdering<T>) -> Self {
        self.orderings.push(ordering);
        self
    }

    fn skip(mut self, count: usize) -> Self {
        self.skip = self.skip.saturating_add(count);
        self.take = self.take.map(|take| take.saturating_sub(count));
        self
    }

    fn take(mut self, count: usize) -> Self {
        self.take = Some(self.take.map_or(count, |take| take.min(count)));
        self
    }
}

impl<T> std::fmt::Debug for MemoryQuery<'_, T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MemoryQuery")
            .field("source", &self.source.len())
            .field("predicates", &self.predicates.len())
            .field("orderings", &self.orderings.len())
            .field("skip", &self.skip)
            .field("take", &self.take)
            .finish()
    }
}
