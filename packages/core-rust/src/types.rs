use std::cmp::Ordering;
use std::fmt;

use chrono::{DateTime, Utc};
use uuid::Uuid;

/// Typed runtime value read from a record member or parsed from a request.
///
/// Every comparison the engine performs happens between two `Value`s: the
/// left side read from a record through an access path, the right side parsed
/// from the wire against the member's declared [`FieldType`](crate::FieldType).
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// Absent optional value.
    Null,
    /// Boolean.
    Bool(bool),
    /// Signed 64-bit integer.
    Int(i64),
    /// 64-bit IEEE 754 float. Also used for decimal members.
    Float(f64),
    /// UTF-8 text.
    Text(String),
    /// Instant in UTC.
    DateTime(DateTime<Utc>),
    /// Unique identifier.
    Uuid(Uuid),
    /// Enumeration member, compared by ordinal.
    Enum(EnumValue),
    /// Homogeneous collection.
    List(Vec<Value>),
}

impl Value {
    /// Short name of the variant, used in diagnostics.
    #[must_use]
    pub const fn type_name(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Bool(_) => "bool",
            Self::Int(_) => "int",
            Self::Float(_) => "float",
            Self::Text(_) => "text",
            Self::DateTime(_) => "datetime",
            Self::Uuid(_) => "uuid",
            Self::Enum(_) => "enum",
            Self::List(_) => "list",
        }
    }

    #[must_use]
    pub const fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Equality with numeric widening between `Int` and `Float`.
    ///
    /// `Null` equals only `Null`.
    #[must_use]
    pub fn loose_eq(&self, other: &Self) -> bool {
        match (self, other) {
            #[allow(clippy::cast_precision_loss)]
            (Self::Int(a), Self::Float(b)) | (Self::Float(b), Self::Int(a)) => (*a as f64) == *b,
            _ => self == other,
        }
    }

    /// Partial ordering between two values of the same family.
    ///
    /// Returns `None` when either side is `Null`, when the variants differ
    /// (other than `Int`/`Float`), or when the variant has no ordering.
    #[must_use]
    pub fn compare(&self, other: &Self) -> Option<Ordering> {
        match (self, other) {
            (Self::Bool(a), Self::Bool(b)) => Some(a.cmp(b)),
            (Self::Int(a), Self::Int(b)) => Some(a.cmp(b)),
            (Self::Float(a), Self::Float(b)) => a.partial_cmp(b),
            #[allow(clippy::cast_precision_loss)]
            (Self::Int(a), Self::Float(b)) => (*a as f64).partial_cmp(b),
            #[allow(clippy::cast_precision_loss)]
            (Self::Float(a), Self::Int(b)) => a.partial_cmp(&(*b as f64)),
            (Self::Text(a), Self::Text(b)) => Some(a.cmp(b)),
            (Self::DateTime(a), Self::DateTime(b)) => Some(a.cmp(b)),
            (Self::Uuid(a), Self::Uuid(b)) => Some(a.cmp(b)),
            (Self::Enum(a), Self::Enum(b)) => Some(a.cmp(b)),
            _ => None,
        }
    }

    /// Total ordering used for sorting.
    ///
    /// Values of the same family compare naturally; `Null` sorts before
    /// everything else and unrelated variants fall back to a fixed rank.
    #[must_use]
    pub fn canonical_cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Self::Float(a), Self::Float(b)) => a.total_cmp(b),
            (Self::List(a), Self::List(b)) => {
                for (left, right) in a.iter().zip(b) {
                    let ord = left.canonical_cmp(right);
                    if ord != Ordering::Equal {
                        return ord;
                    }
                }
                a.len().cmp(&b.len())
            }
            _ => self
                .compare(other)
                .unwrap_or_else(|| self.rank().cmp(&other.rank())),
        }
    }

    const fn rank(&self) -> u8 {
        match self {
            Self::Null => 0,
            Self::Bool(_) => 1,
            Self::Int(_) | Self::Float(_) => 2,
            Self::Text(_) => 3,
            Self::DateTime(_) => 4,
            Self::Uuid(_) => 5,
            Self::Enum(_) => 6,
            Self::List(_) => 7,
        }
    }

    /// Substring test. `false` unless both sides are text.
    #[must_use]
    pub fn text_contains(&self, needle: &Self) -> bool {
        match (self, needle) {
            (Self::Text(haystack), Self::Text(needle)) => haystack.contains(needle.as_str()),
            _ => false,
        }
    }

    /// Element membership test. `false` unless `self` is a list.
    #[must_use]
    pub fn list_contains(&self, needle: &Self) -> bool {
        match self {
            Self::List(items) => items.iter().any(|item| item.loose_eq(needle)),
            _ => false,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => f.write_str("null"),
            Self::Bool(v) => write!(f, "{v}"),
            Self::Int(v) => write!(f, "{v}"),
            Self::Float(v) => write!(f, "{v}"),
            Self::Text(v) => write!(f, "{v:?}"),
            Self::DateTime(v) => write!(f, "{}", v.to_rfc3339()),
            Self::Uuid(v) => write!(f, "{v}"),
            Self::Enum(v) => f.write_str(v.name),
            Self::List(items) => {
                f.write_str("[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{item}")?;
                }
                f.write_str("]")
            }
        }
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Self::Bool(v)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Self::Int(i64::from(v))
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Self::Int(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Self::Float(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Self::Text(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Self::Text(v)
    }
}

impl From<&String> for Value {
    fn from(v: &String) -> Self {
        Self::Text(v.clone())
    }
}

impl From<DateTime<Utc>> for Value {
    fn from(v: DateTime<Utc>) -> Self {
        Self::DateTime(v)
    }
}

impl From<Uuid> for Value {
    fn from(v: Uuid) -> Self {
        Self::Uuid(v)
    }
}

impl From<EnumValue> for Value {
    fn from(v: EnumValue) -> Self {
        Self::Enum(v)
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(items: Vec<T>) -> Self {
        Self::List(items.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map_or(Self::Null, Into::into)
    }
}

// ---------------------------------------------------------------------------
// Enumerations
// ---------------------------------------------------------------------------

/// A member of an enumeration.
///
/// Identity is the ordinal; the name is carried for display.
#[derive(Debug, Clone, Copy)]
pub struct EnumValue {
    pub ordinal: i64,
    pub name: &'static str,
}

impl EnumValue {
    #[must_use]
    pub const fn new(ordinal: i64, name: &'static str) -> Self {
        Self { ordinal, name }
    }
}

impl PartialEq for EnumValue {
    fn eq(&self, other: &Self) -> bool {
        self.ordinal == other.ordinal
    }
}

impl Eq for EnumValue {}

impl PartialOrd for EnumValue {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for EnumValue {
    fn cmp(&self, other: &Self) -> Ordering {
        self.ordinal.cmp(&other.ordinal)
    }
}

/// One named variant of an [`EnumDef`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EnumVariant {
    pub name: &'static str,
    pub ordinal: i64,
}

impl EnumVariant {
    #[must_use]
    pub const fn new(name: &'static str, ordinal: i64) -> Self {
        Self { name, ordinal }
    }
}

/// Static description of an enumeration type, declared once per enum.
#[derive(Debug, PartialEq, Eq)]
pub struct EnumDef {
    pub name: &'static str,
    pub variants: &'static [EnumVariant],
}

impl EnumDef {
    #[must_use]
    pub const fn new(name: &'static str, variants: &'static [EnumVariant]) -> Self {
        Self { name, variants }
    }

    /// Looks a variant up by name, ignoring case.
    #[must_use]
    pub fn by_name(&self, name: &str) -> Option<EnumValue> {
        self.variants
            .iter()
            .find(|v| v.name.eq_ignore_ascii_case(name))
            .map(|v| EnumValue::new(v.ordinal, v.name))
    }

    /// Looks a variant up by ordinal.
    #[must_use]
    pub fn by_ordinal(&self, ordinal: i64) -> Option<EnumValue> {
        self.variants
            .iter()
            .find(|v| v.ordinal == ordinal)
            .map(|v| EnumValue::new(v.ordinal, v.name))
    }

    /// Record-side helper: the `Value` for an ordinal, or `Null` if the
    /// ordinal is not a declared variant.
    #[must_use]
    pub fn value(&self, ordinal: i64) -> Value {
        self.by_ordinal(ordinal).map_or(Value::Null, Value::Enum)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    static COLOR: EnumDef = EnumDef::new(
        "Color",
        &[
            EnumVariant::new("Red", 1),
            EnumVariant::new("Green", 2),
            EnumVariant::new("Blue", 3),
        ],
    );

    #[test]
    fn loose_eq_widens_numbers() {
        assert!(Value::Int(3).loose_eq(&Value::Float(3.0)));
        assert!(Value::Float(3.0).loose_eq(&Value::Int(3)));
        assert!(!Value::Int(3).loose_eq(&Value::Float(3.5)));
        assert!(!Value::Int(3).loose_eq(&Value::Text("3".into())));
    }

    #[test]
    fn null_equals_only_null() {
        assert!(Value::Null.loose_eq(&Value::Null));
        assert!(!Value::Null.loose_eq(&Value::Int(0)));
    }

    #[test]
    fn compare_is_undefined_across_families() {
        assert_eq!(Value::Int(1).compare(&Value::Text("1".into())), None);
        assert_eq!(Value::Null.compare(&Value::Null), None);
        assert_eq!(
            Value::Int(1).compare(&Value::Float(1.5)),
            Some(Ordering::Less)
        );
    }

    #[test]
    fn canonical_cmp_puts_null_first() {
        assert_eq!(Value::Null.canonical_cmp(&Value::Int(-5)), Ordering::Less);
        assert_eq!(
            Value::Text("a".into()).canonical_cmp(&Value::Null),
            Ordering::Greater
        );
        assert_eq!(Value::Null.canonical_cmp(&Value::Null), Ordering::Equal);
    }

    #[test]
    fn canonical_cmp_is_antisymmetric_for_mixed_variants() {
        let left = Value::Bool(true);
        let right = Value::Text("x".into());
        assert_eq!(
            left.canonical_cmp(&right),
            right.canonical_cmp(&left).reverse()
        );
    }

    #[test]
    fn text_and_list_containment() {
        let text = Value::Text("double inner string 4".into());
        assert!(text.text_contains(&Value::Text("inner".into())));
        assert!(!text.text_contains(&Value::Int(4)));

        let list = Value::from(vec![1_i64, 2, 3]);
        assert!(list.list_contains(&Value::Int(2)));
        assert!(list.list_contains(&Value::Float(3.0)));
        assert!(!list.list_contains(&Value::Int(9)));
        assert!(!text.list_contains(&Value::Text("inner".into())));
    }

    #[test]
    fn enum_lookup_and_identity() {
        assert_eq!(COLOR.by_name("green").map(|v| v.ordinal), Some(2));
        assert_eq!(COLOR.by_ordinal(3).map(|v| v.name), Some("Blue"));
        assert!(COLOR.by_name("purple").is_none());
        assert_eq!(COLOR.value(9), Value::Null);
        assert_eq!(
            EnumValue::new(2, "Green"),
            EnumValue::new(2, "whatever")
        );
        assert!(EnumValue::new(1, "Red") < EnumValue::new(3, "Blue"));
    }
}
