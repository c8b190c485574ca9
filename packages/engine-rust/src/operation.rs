//! Operation resolution: operator + access path + parsed constant -> predicate.
//!
//! Predicates are a small tagged algebra interpreted directly against a
//! record. `Contains` and `In` are deliberately asymmetric:
//!
//! - `Contains` tests whether the parsed scalar occurs *inside the record's
//!   member* (element of a collection, or substring of text).
//! - `In` tests whether the *record's member* occurs inside the parsed
//!   collection.

use std::cmp::Ordering;

use pagedquery_core::{FieldType, Fields, FilterOperation, Value};

use crate::error::CompileError;
use crate::parse::ValueParseResult;
use crate::resolve::AccessPath;

/// Scalar comparison operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompareOp {
    Eq,
    Ne,
    Gt,
    Gte,
    Lt,
    Lte,
}

/// How `Contains` looks inside the record's member.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContainsMode {
    /// Member is a collection; the constant must equal one of its elements.
    Element,
    /// Member is text; the constant must be a substring of it.
    Substring,
}

/// Compiled predicate fragment over one access path.
#[derive(Debug, Clone, PartialEq)]
pub enum PredicateExpr {
    Compare {
        path: AccessPath,
        op: CompareOp,
        value: Value,
    },
    Contains {
        path: AccessPath,
        needle: Value,
        mode: ContainsMode,
    },
    In {
        path: AccessPath,
        set: Vec<Value>,
    },
}

impl PredicateExpr {
    #[must_use]
    pub const fn path(&self) -> &AccessPath {
        match self {
            Self::Compare { path, .. } | Self::Contains { path, .. } | Self::In { path, .. } => {
                path
            }
        }
    }

    /// Evaluates the predicate against one record.
    ///
    /// Ordering comparisons involving `Null` are false; `=`/`!=` treat
    /// `Null` as an ordinary value.
    #[must_use]
    pub fn evaluate(&self, record: &dyn Fields) -> bool {
        match self {
            Self::Compare { path, op, value } => {
                let actual = path.read(record);
                match op {
                    CompareOp::Eq => actual.loose_eq(value),
                    CompareOp::Ne => !actual.loose_eq(value),
                    CompareOp::Gt => actual.compare(value).is_some_and(Ordering::is_gt),
                    CompareOp::Gte => actual.compare(value).is_some_and(Ordering::is_ge),
                    CompareOp::Lt => actual.compare(value).is_some_and(Ordering::is_lt),
                    CompareOp::Lte => actual.compare(value).is_some_and(Ordering::is_le),
                }
            }
            Self::Contains { path, needle, mode } => {
                let actual = path.read(record);
                match mode {
                    ContainsMode::Element => actual.list_contains(needle),
                    ContainsMode::Substring => actual.text_contains(needle),
                }
            }
            Self::In { path, set } => {
                let actual = path.read(record);
                set.iter().any(|candidate| actual.loose_eq(candidate))
            }
        }
    }
}

/// Selects and builds the predicate fragment for an operator.
#[derive(Debug, Clone, Copy, Default)]
pub struct OperationResolver;

impl OperationResolver {
    /// The type the filter value must be parsed as for `operation` against a
    /// member declared as `declared`.
    ///
    /// # Errors
    ///
    /// - [`CompileError::UnsupportedOperation`] for unrecognized operators.
    /// - [`CompileError::IncompatibleOperandTypes`] when the operator is not
    ///   defined for `declared`.
    pub fn operand_type(
        operation: &FilterOperation,
        declared: &FieldType,
    ) -> Result<FieldType, CompileError> {
        let incompatible = || incompatible(operation, declared);
        match operation {
            FilterOperation::Unknown(token) => Err(CompileError::UnsupportedOperation {
                token: token.clone(),
            }),
            FilterOperation::Equal | FilterOperation::NotEqual => {
                if declared.is_scalar() {
                    Ok(declared.clone())
                } else {
                    Err(incompatible())
                }
            }
            FilterOperation::GreaterThan
            | FilterOperation::GreaterOrEqual
            | FilterOperation::LessThan
            | FilterOperation::LessOrEqual => {
                if declared.is_orderable() {
                    Ok(declared.clone())
                } else {
                    Err(incompatible())
                }
            }
            FilterOperation::Contains => match (declared.element(), declared.unwrap_optional()) {
                (Some(element), _) if element.is_scalar() => Ok(element.clone()),
                (None, FieldType::Text) => Ok(FieldType::Text),
                _ => Err(incompatible()),
            },
            FilterOperation::In => {
                if declared.is_scalar() {
                    Ok(FieldType::list(declared.clone()))
                } else {
                    Err(incompatible())
                }
            }
        }
    }

    /// Builds the predicate fragment comparing the member at `path` with
    /// the parsed `right` operand.
    ///
    /// # Errors
    ///
    /// - [`CompileError::UnsupportedOperation`] for unrecognized operators.
    /// - [`CompileError::IncompatibleOperandTypes`] when the operator is not
    ///   defined for `declared`, or `right` was parsed as a type that does
    ///   not match the operand type the operator needs.
    pub fn build(
        operation: &FilterOperation,
        path: AccessPath,
        right: ValueParseResult,
        declared: &FieldType,
    ) -> Result<PredicateExpr, CompileError> {
        let expected = Self::operand_type(operation, declared)?;
        if !operand_matches(&expected, &right.value_type) {
            return Err(incompatible(operation, declared));
        }

        let op = match operation {
            FilterOperation::Equal => CompareOp::Eq,
            FilterOperation::NotEqual => CompareOp::Ne,
            FilterOperation::GreaterThan => CompareOp::Gt,
            FilterOperation::GreaterOrEqual => CompareOp::Gte,
            FilterOperation::LessThan => CompareOp::Lt,
            FilterOperation::LessOrEqual => CompareOp::Lte,
            FilterOperation::Contains => {
                let mode = if declared.element().is_some() {
                    ContainsMode::Element
                } else {
                    ContainsMode::Substring
                };
                return Ok(PredicateExpr::Contains {
                    path,
                    needle: right.value,
                    mode,
                });
            }
            FilterOperation::In => {
                let Value::List(set) = right.value else {
                    return Err(incompatible(operation, declared));
                };
                return Ok(PredicateExpr::In { path, set });
            }
            FilterOperation::Unknown(token) => {
                return Err(CompileError::UnsupportedOperation {
                    token: token.clone(),
                })
            }
        };

        Ok(PredicateExpr::Compare {
            path,
            op,
            value: right.value,
        })
    }
}

fn operand_matches(expected: &FieldType, actual: &FieldType) -> bool {
    match (expected.unwrap_optional(), actual.unwrap_optional()) {
        (FieldType::List(a), FieldType::List(b)) => a.is_compatible_with(b),
        (a, b) => a.is_compatible_with(b),
    }
}

fn incompatible(operation: &FilterOperation, declared: &FieldType) -> CompileError {
    CompileError::IncompatibleOperandTypes {
        operation: operation.token().to_string(),
        declared: declared.to_string(),
    }
}
