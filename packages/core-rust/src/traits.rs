use crate::schema::RecordSchema;
use crate::types::Value;

/// Result of reading one member from a record by its exact name.
pub enum FieldRead<'a> {
    /// Scalar or collection member.
    Value(Value),
    /// Nested sub-object, readable in turn.
    Nested(&'a dyn Fields),
    /// No member with that name.
    Missing,
}

impl<'a> FieldRead<'a> {
    /// Reads a scalar or collection member.
    pub fn value(value: impl Into<Value>) -> Self {
        Self::Value(value.into())
    }

    /// Reads a present nested sub-object.
    pub fn nested<T: Fields>(value: &'a T) -> Self {
        Self::Nested(value)
    }

    /// Reads an optional nested sub-object; `None` reads as [`Value::Null`].
    pub fn optional_nested<T: Fields>(value: Option<&'a T>) -> Self {
        match value {
            Some(inner) => Self::Nested(inner),
            None => Self::Value(Value::Null),
        }
    }
}

impl From<Value> for FieldRead<'_> {
    fn from(value: Value) -> Self {
        Self::Value(value)
    }
}

/// Member access by exact name. Implemented by record types and by every
/// struct reachable from them through nested members.
pub trait Fields {
    fn field(&self, name: &str) -> FieldRead<'_>;
}

/// A queryable root record type with static member metadata.
pub trait Record: Fields + Send + Sync + 'static {
    fn schema() -> &'static RecordSchema;
}
