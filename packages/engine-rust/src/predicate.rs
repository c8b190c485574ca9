use std::marker::PhantomData;
use std::sync::Arc;

use pagedquery_core::Record;

use crate::operation::PredicateExpr;

/// A compiled filter for record type `T`.
///
/// Cheap to clone: all clones share one immutable expression, so a cached
/// predicate and the copy handed to a request are the same object.
pub struct CompiledPredicate<T> {
    expr: Arc<PredicateExpr>,
    _record: PhantomData<fn(&T) -> bool>,
}

impl<T: Record> CompiledPredicate<T> {
    #[must_use]
    pub fn new(expr: PredicateExpr) -> Self {
        Self {
            expr: Arc::new(expr),
            _record: PhantomData,
        }
    }

    #[must_use]
    pub fn matches(&self, record: &T) -> bool {
        self.expr.evaluate(record)
    }

    #[must_use]
    pub fn expr(&self) -> &PredicateExpr {
        &self.expr
    }

    /// Whether `self` and `other` share the same compiled expression.
    #[must_use]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.expr, &other.expr)
    }
}

impl<T> Clone for CompiledPredicate<T> {
    fn clone(&self) -> Self {
        Self {
            expr: Arc::clone(&self.expr),
            _record: PhantomData,
        }
    }
}

impl<T> std::fmt::Debug for CompiledPredicate<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("CompiledPredicate").field(&self.expr).finish()
    }
}
