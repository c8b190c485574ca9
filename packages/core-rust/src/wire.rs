//! Wire-level request and response types for paged, filtered, sorted listings.
//!
//! All structs use `#[serde(rename_all = "camelCase")]` to match the JSON
//! shape produced by API callers. Descriptors are immutable once built and
//! compare structurally, which makes them usable as cache keys.

use std::fmt;

use ordered_float::OrderedFloat;
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Raw values
// ---------------------------------------------------------------------------

/// Untyped scalar-or-array value exactly as received from the caller.
///
/// Floats are wrapped in [`OrderedFloat`] so that descriptors carrying them
/// can implement `Eq` and `Hash`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawValue {
    #[default]
    Null,
    Bool(bool),
    Int(i64),
    Float(OrderedFloat<f64>),
    String(String),
    Array(Vec<RawValue>),
}

impl RawValue {
    #[must_use]
    pub const fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Short name of the variant, used in diagnostics.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Bool(_) => "bool",
            Self::Int(_) => "int",
            Self::Float(_) => "float",
            Self::String(_) => "string",
            Self::Array(_) => "array",
        }
    }
}

impl fmt::Display for RawValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match serde_json::to_string(self) {
            Ok(json) => f.write_str(&json),
            Err(_) => f.write_str(self.kind()),
        }
    }
}

impl From<bool> for RawValue {
    fn from(v: bool) -> Self {
        Self::Bool(v)
    }
}

impl From<i32> for RawValue {
    fn from(v: i32) -> Self {
        Self::Int(i64::from(v))
    }
}

impl From<i64> for RawValue {
    fn from(v: i64) -> Self {
        Self::Int(v)
    }
}

impl From<f64> for RawValue {
    fn from(v: f64) -> Self {
        Self::Float(OrderedFloat(v))
    }
}

impl From<&str> for RawValue {
    fn from(v: &str) -> Self {
        Self::String(v.to_string())
    }
}

impl From<String> for RawValue {
    fn from(v: String) -> Self {
        Self::String(v)
    }
}

impl<T: Into<RawValue>> From<Vec<T>> for RawValue {
    fn from(items: Vec<T>) -> Self {
        Self::Array(items.into_iter().map(Into::into).collect())
    }
}

// ---------------------------------------------------------------------------
// Enums
// ---------------------------------------------------------------------------

/// Comparison operator of a filter term.
///
/// Tokens are matched case-insensitively on read. Unrecognized tokens are
/// kept as [`FilterOperation::Unknown`] so that one bad term does not fail
/// the whole request at deserialization time.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum FilterOperation {
    Equal,
    NotEqual,
    GreaterThan,
    GreaterOrEqual,
    LessThan,
    LessOrEqual,
    /// Scalar occurs in the record's collection, or substring of the record's text.
    Contains,
    /// Record's scalar is a member of the provided collection.
    In,
    Unknown(String),
}

impl FilterOperation {
    /// Parses a wire token. Never fails; see [`FilterOperation::Unknown`].
    #[must_use]
    pub fn parse(token: &str) -> Self {
        match token.trim().to_ascii_lowercase().as_str() {
            "=" | "==" | "eq" => Self::Equal,
            "!=" | "<>" | "ne" | "neq" => Self::NotEqual,
            ">" | "gt" => Self::GreaterThan,
            ">=" | "gte" => Self::GreaterOrEqual,
            "<" | "lt" => Self::LessThan,
            "<=" | "lte" => Self::LessOrEqual,
            "contains" => Self::Contains,
            "in" => Self::In,
            _ => Self::Unknown(token.to_string()),
        }
    }

    /// Canonical wire token.
    #[must_use]
    pub fn token(&self) -> &str {
        match self {
            Self::Equal => "=",
            Self::NotEqual => "!=",
            Self::GreaterThan => ">",
            Self::GreaterOrEqual => ">=",
            Self::LessThan => "<",
            Self::LessOrEqual => "<=",
            Self::Contains => "contains",
            Self::In => "in",
            Self::Unknown(token) => token,
        }
    }
}

impl From<String> for FilterOperation {
    fn from(token: String) -> Self {
        Self::parse(&token)
    }
}

impl From<&str> for FilterOperation {
    fn from(token: &str) -> Self {
        Self::parse(token)
    }
}

impl From<FilterOperation> for String {
    fn from(op: FilterOperation) -> Self {
        op.token().to_string()
    }
}

impl fmt::Display for FilterOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.token())
    }
}

/// Sort direction of a sort term.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    #[default]
    #[serde(alias = "ascending", alias = "ASC", alias = "Asc", alias = "Ascending")]
    Asc,
    #[serde(alias = "descending", alias = "DESC", alias = "Desc", alias = "Descending")]
    Desc,
}

// ---------------------------------------------------------------------------
// Descriptors
// ---------------------------------------------------------------------------

/// One filter term of a request.
///
/// `property` names a member of the root record; `nested_path` continues
/// from there into nested sub-objects, one member per step.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterDescriptor {
    property: String,
    #[serde(default, alias = "nested", skip_serializing_if = "Vec::is_empty")]
    nested_path: Vec<String>,
    operation: FilterOperation,
    #[serde(default)]
    value: RawValue,
}

impl FilterDescriptor {
    #[must_use]
    pub fn new(
        property: impl Into<String>,
        operation: impl Into<FilterOperation>,
        value: impl Into<RawValue>,
    ) -> Self {
        Self {
            property: property.into(),
            nested_path: Vec::new(),
            operation: operation.into(),
            value: value.into(),
        }
    }

    /// Builds a descriptor from a dotted path such as `"Inner.Nested.String"`.
    #[must_use]
    pub fn dotted(
        path: &str,
        operation: impl Into<FilterOperation>,
        value: impl Into<RawValue>,
    ) -> Self {
        let (property, nested) = split_dotted(path);
        Self::new(property, operation, value).nested(nested)
    }

    /// Sets the nested path. Consumes the builder; descriptors are not
    /// modified once handed to the engine.
    #[must_use]
    pub fn nested<I, S>(mut self, path: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.nested_path = path.into_iter().map(Into::into).collect();
        self
    }

    #[must_use]
    pub fn property(&self) -> &str {
        &self.property
    }

    #[must_use]
    pub fn nested_path(&self) -> &[String] {
        &self.nested_path
    }

    #[must_use]
    pub const fn operation(&self) -> &FilterOperation {
        &self.operation
    }

    #[must_use]
    pub const fn value(&self) -> &RawValue {
        &self.value
    }

    /// Full dotted path, for diagnostics.
    #[must_use]
    pub fn path(&self) -> String {
        join_path(&self.property, &self.nested_path)
    }
}

/// One sort term of a request.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SortDescriptor {
    property: String,
    #[serde(default, alias = "nested", skip_serializing_if = "Vec::is_empty")]
    nested_path: Vec<String>,
    #[serde(default)]
    direction: SortDirection,
}

impl SortDescriptor {
    #[must_use]
    pub fn new(property: impl Into<String>, direction: SortDirection) -> Self {
        Self {
            property: property.into(),
            nested_path: Vec::new(),
            direction,
        }
    }

    #[must_use]
    pub fn asc(property: impl Into<String>) -> Self {
        Self::new(property, SortDirection::Asc)
    }

    #[must_use]
    pub fn desc(property: impl Into<String>) -> Self {
        Self::new(property, SortDirection::Desc)
    }

    /// Sets the nested path. See [`FilterDescriptor::nested`].
    #[must_use]
    pub fn nested<I, S>(mut self, path: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.nested_path = path.into_iter().map(Into::into).collect();
        self
    }

    #[must_use]
    pub fn property(&self) -> &str {
        &self.property
    }

    #[must_use]
    pub fn nested_path(&self) -> &[String] {
        &self.nested_path
    }

    #[must_use]
    pub const fn direction(&self) -> SortDirection {
        self.direction
    }

    /// Full dotted path, for diagnostics.
    #[must_use]
    pub fn path(&self) -> String {
        join_path(&self.property, &self.nested_path)
    }
}

fn split_dotted(path: &str) -> (&str, Vec<String>) {
    let mut parts = path.split('.');
    let property = parts.next().unwrap_or_default();
    (property, parts.map(str::to_string).collect())
}

fn join_path(property: &str, nested: &[String]) -> String {
    let mut path = property.to_string();
    for step in nested {
        path.push('.');
        path.push_str(step);
    }
    path
}

// ---------------------------------------------------------------------------
// Requests and responses
// ---------------------------------------------------------------------------

/// Inbound listing request: filters, sorts, and 1-based pagination.
///
/// `page`/`size` that are absent or non-positive fall back to the defaults
/// supplied when the query is built.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PagedRequest {
    #[serde(default)]
    pub filters: Vec<FilterDescriptor>,
    #[serde(default, alias = "sorts", alias = "sort")]
    pub sorters: Vec<SortDescriptor>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub page: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub size: Option<i64>,
}

impl PagedRequest {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn filter(mut self, filter: FilterDescriptor) -> Self {
        self.filters.push(filter);
        self
    }

    #[must_use]
    pub fn sort(mut self, sorter: SortDescriptor) -> Self {
        self.sorters.push(sorter);
        self
    }

    #[must_use]
    pub const fn page(mut self, page: i64) -> Self {
        self.page = Some(page);
        self
    }

    #[must_use]
    pub const fn size(mut self, size: i64) -> Self {
        self.size = Some(size);
        self
    }
}

/// One page of results plus the total number of matching records.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PagedResponse<T> {
    pub data: Vec<T>,
    pub page: usize,
    pub size: usize,
    /// Matching records across all pages.
    pub total: usize,
    pub total_pages: usize,
}

impl<T> PagedResponse<T> {
    #[must_use]
    pub fn new(data: Vec<T>, page: usize, size: usize, total: usize) -> Self {
        let total_pages = if size == 0 { 0 } else { total.div_ceil(size) };
        Self {
            data,
            page,
            size,
            total,
            total_pages,
        }
    }

    /// Converts every item, keeping the paging metadata.
    #[must_use]
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> PagedResponse<U> {
        PagedResponse {
            data: self.data.into_iter().map(f).collect(),
            page: self.page,
            size: self.size,
            total: self.total,
            total_pages: self.total_pages,
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
