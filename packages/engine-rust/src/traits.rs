use pagedquery_core::Record;

use crate::predicate::CompiledPredicate;
use crate::sort::CompiledOrdering;

/// Composable, not-yet-executed query over records of type `T`.
///
/// Implemented by the persistence layer that materializes results. The
/// query builder only composes; it never executes or counts.
/// Implementations: [`MemoryQuery`](crate::memory::MemoryQuery) (in-process
/// slices).
pub trait QueryHandle<T: Record>: Sized {
    /// Keeps only records matching `predicate`, in addition to any
    /// predicates already applied.
    #[must_use]
    fn filter(self, predicate: CompiledPredicate<T>) -> Self;

    /// Makes `ordering` the primary order, discarding earlier orderings.
    #[must_use]
    fn order_by(self, ordering: CompiledOrdering<T>) -> Self;

    /// Breaks ties of the current orderings by `ordering`.
    #[must_use]
    fn then_by(self, ordering: CompiledOrdering<T>) -> Self;

    /// Skips the first `count` records of the current result window.
    #[must_use]
    fn skip(self, count: usize) -> Self;

    /// Limits the current result window to at most `count` records.
    #[must_use]
    fn take(self, count: usize) -> Self;
}
