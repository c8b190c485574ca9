//! Type-directed coercion of untyped wire values.
//!
//! A [`ValueParser`] owns an ordered list of [`ValueParseStrategy`]s and
//! picks the first one that supports the target [`FieldType`]. Wrapper
//! strategies (optional, collection) recurse back into the parser for their
//! inner type, so every combination of wrappers and scalars is covered by a
//! handful of strategies.

mod strategies;

use pagedquery_core::{FieldType, RawValue, Value};

pub use strategies::{
    CollectionStrategy, DateTimeStrategy, EnumStrategy, NullableStrategy, PrimitiveStrategy,
    UuidStrategy,
};

use crate::error::CompileError;

/// A value parsed against a precise declared type.
#[derive(Debug, Clone, PartialEq)]
pub struct ValueParseResult {
    pub value: Value,
    /// The static type `value` was parsed as.
    pub value_type: FieldType,
}

/// One parsing strategy, keyed by the shape of the target type.
pub trait ValueParseStrategy: Send + Sync {
    /// Whether this strategy handles `target`.
    fn supports(&self, target: &FieldType) -> bool;

    /// Converts `raw` into a value of type `target`.
    ///
    /// `parser` is the owning parser, for strategies that recurse into an
    /// inner type.
    ///
    /// # Errors
    ///
    /// Returns [`CompileError::UnparsableValue`] when `raw` does not convert.
    fn parse(
        &self,
        raw: &RawValue,
        target: &FieldType,
        parser: &ValueParser,
    ) -> Result<Value, CompileError>;
}

/// Strategy-driven value parser.
pub struct ValueParser {
    strategies: Vec<Box<dyn ValueParseStrategy>>,
}

impl ValueParser {
    /// Creates a parser with the built-in strategies.
    #[must_use]
    pub fn new() -> Self {
        Self {
            strategies: vec![
                Box::new(NullableStrategy),
                Box::new(CollectionStrategy),
                Box::new(EnumStrategy),
                Box::new(DateTimeStrategy),
                Box::new(UuidStrategy),
                Box::new(PrimitiveStrategy),
            ],
        }
    }

    /// Adds a strategy that takes precedence over all existing ones.
    #[must_use]
    pub fn with_strategy(mut self, strategy: impl ValueParseStrategy + 'static) -> Self {
        self.strategies.insert(0, Box::new(strategy));
        self
    }

    /// Parses `raw` as `target`.
    ///
    /// # Errors
    ///
    /// Returns [`CompileError::UnparsableValue`] when no strategy supports
    /// `target` or the selected strategy rejects `raw`.
    pub fn parse(&self, raw: &RawValue, target: &FieldType) -> Result<ValueParseResult, CompileError> {
        let value = self.parse_value(raw, target)?;
        Ok(ValueParseResult {
            value,
            value_type: target.clone(),
        })
    }

    /// Parses `raw` as `target`, returning only the value.
    ///
    /// # Errors
    ///
    /// See [`ValueParser::parse`].
    pub fn parse_value(&self, raw: &RawValue, target: &FieldType) -> Result<Value, CompileError> {
        self.strategies
            .iter()
            .find(|strategy| strategy.supports(target))
            .ok_or_else(|| unparsable(raw, target, "no parse strategy for target type"))?
            .parse(raw, target, self)
    }
}

impl Default for ValueParser {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for ValueParser {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ValueParser")
            .field("strategies", &self.strategies.len())
            .finish()
    }
}

pub(crate) fn unparsable(raw: &RawValue, target: &FieldType, reason: impl Into<String>) -> CompileError {
    CompileError::UnparsableValue {
        raw: raw.to_string(),
        target: target.to_string(),
        reason: reason.into(),
    }
}
