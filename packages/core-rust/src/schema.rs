use std::collections::HashMap;
use std::fmt;

use crate::types::EnumDef;

/// Member metadata for one record type, built once when the type is declared.
///
/// Replaces runtime reflection: the engine resolves external field names
/// against this table and derives parse targets from each member's
/// [`FieldType`].
#[derive(Debug)]
pub struct RecordSchema {
    name: &'static str,
    fields: Vec<FieldDef>,
    /// Lower-cased member names and aliases -> index into `fields`.
    lookup: HashMap<String, usize>,
}

impl RecordSchema {
    /// Builds a schema and its case-insensitive name/alias table.
    ///
    /// When two members collide case-insensitively, the first declared wins.
    #[must_use]
    pub fn new(name: &'static str, fields: Vec<FieldDef>) -> Self {
        let mut lookup = HashMap::with_capacity(fields.len());
        for (index, field) in fields.iter().enumerate() {
            lookup.entry(field.name.to_lowercase()).or_insert(index);
        }
        for (index, field) in fields.iter().enumerate() {
            for alias in &field.aliases {
                lookup.entry(alias.to_lowercase()).or_insert(index);
            }
        }
        Self {
            name,
            fields,
            lookup,
        }
    }

    #[must_use]
    pub const fn name(&self) -> &'static str {
        self.name
    }

    #[must_use]
    pub fn fields(&self) -> &[FieldDef] {
        &self.fields
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Finds a member by exact name, then case-insensitively by name or alias.
    #[must_use]
    pub fn field(&self, name: &str) -> Option<&FieldDef> {
        if let Some(field) = self.fields.iter().find(|f| f.name == name) {
            return Some(field);
        }
        self.lookup
            .get(&name.to_lowercase())
            .map(|&index| &self.fields[index])
    }
}

/// Single member definition within a [`RecordSchema`].
#[derive(Debug, Clone)]
pub struct FieldDef {
    /// Exact member name, as passed to [`Fields::field`](crate::Fields::field).
    pub name: &'static str,
    /// Additional external names accepted for this member.
    pub aliases: Vec<&'static str>,
    /// Declared type of the member.
    pub ty: FieldType,
}

impl FieldDef {
    #[must_use]
    pub fn new(name: &'static str, ty: FieldType) -> Self {
        Self {
            name,
            aliases: Vec::new(),
            ty,
        }
    }

    /// Adds an external alias for this member.
    #[must_use]
    pub fn alias(mut self, alias: &'static str) -> Self {
        self.aliases.push(alias);
        self
    }
}

/// Declared static type of a record member.
#[derive(Clone)]
pub enum FieldType {
    Bool,
    Int,
    Float,
    Text,
    DateTime,
    Uuid,
    Enum(&'static EnumDef),
    /// Nullable wrapper around any other type.
    Optional(Box<FieldType>),
    /// Homogeneous collection.
    List(Box<FieldType>),
    /// Nested sub-object with its own schema.
    Record(fn() -> &'static RecordSchema),
}

impl FieldType {
    #[must_use]
    pub fn optional(inner: Self) -> Self {
        Self::Optional(Box::new(inner))
    }

    #[must_use]
    pub fn list(element: Self) -> Self {
        Self::List(Box::new(element))
    }

    /// Strips every `Optional` layer.
    #[must_use]
    pub fn unwrap_optional(&self) -> &Self {
        let mut ty = self;
        while let Self::Optional(inner) = ty {
            ty = inner;
        }
        ty
    }

    #[must_use]
    pub const fn is_optional(&self) -> bool {
        matches!(self, Self::Optional(_))
    }

    /// Element type when this is a (possibly optional) collection.
    #[must_use]
    pub fn element(&self) -> Option<&Self> {
        match self.unwrap_optional() {
            Self::List(element) => Some(element),
            _ => None,
        }
    }

    /// Nested schema when this is a (possibly optional) sub-object.
    #[must_use]
    pub fn record_schema(&self) -> Option<&'static RecordSchema> {
        match self.unwrap_optional() {
            Self::Record(schema) => Some(schema()),
            _ => None,
        }
    }

    /// Scalars are everything that is neither a collection nor a sub-object.
    #[must_use]
    pub fn is_scalar(&self) -> bool {
        !matches!(self.unwrap_optional(), Self::List(_) | Self::Record(_))
    }

    /// Whether `>`, `>=`, `<`, `<=` are defined for this type.
    #[must_use]
    pub fn is_orderable(&self) -> bool {
        matches!(
            self.unwrap_optional(),
            Self::Int | Self::Float | Self::Text | Self::DateTime | Self::Enum(_)
        )
    }

    #[must_use]
    pub fn is_numeric(&self) -> bool {
        matches!(self.unwrap_optional(), Self::Int | Self::Float)
    }

    /// Operand compatibility: identical after stripping `Optional`, or both numeric.
    #[must_use]
    pub fn is_compatible_with(&self, other: &Self) -> bool {
        (self.is_numeric() && other.is_numeric())
            || self.unwrap_optional() == other.unwrap_optional()
    }
}

impl PartialEq for FieldType {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Bool, Self::Bool)
            | (Self::Int, Self::Int)
            | (Self::Float, Self::Float)
            | (Self::Text, Self::Text)
            | (Self::DateTime, Self::DateTime)
            | (Self::Uuid, Self::Uuid) => true,
            (Self::Enum(a), Self::Enum(b)) => a.name == b.name,
            (Self::Optional(a), Self::Optional(b)) | (Self::List(a), Self::List(b)) => a == b,
            (Self::Record(a), Self::Record(b)) => a().name() == b().name(),
            _ => false,
        }
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool => f.write_str("bool"),
            Self::Int => f.write_str("int"),
            Self::Float => f.write_str("float"),
            Self::Text => f.write_str("text"),
            Self::DateTime => f.write_str("datetime"),
            Self::Uuid => f.write_str("uuid"),
            Self::Enum(def) => write!(f, "enum {}", def.name),
            Self::Optional(inner) => write!(f, "optional<{inner}>"),
            Self::List(element) => write!(f, "list<{element}>"),
            Self::Record(schema) => write!(f, "record {}", schema().name()),
        }
    }
}

impl fmt::Debug for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::LazyLock;

    use super::*;

    static CHILD: LazyLock<RecordSchema> = LazyLock::new(|| {
        RecordSchema::new("Child", vec![FieldDef::new("Label", FieldType::Text)])
    });

    fn child() -> &'static RecordSchema {
        &CHILD
    }

    fn parent() -> RecordSchema {
        RecordSchema::new(
            "Parent",
            vec![
                FieldDef::new("Name", FieldType::Text).alias("title"),
                FieldDef::new("Tags", FieldType::list(FieldType::Text)),
                FieldDef::new("Child", FieldType::optional(FieldType::Record(child))),
                FieldDef::new("name", FieldType::Int),
            ],
        )
    }

    #[test]
    fn field_lookup_prefers_exact_then_case_insensitive() {
        let schema = parent();
        assert_eq!(schema.field("name").map(|f| f.ty.clone()), Some(FieldType::Int));
        assert_eq!(schema.field("NAME").map(|f| f.name), Some("Name"));
        assert_eq!(schema.field("Title").map(|f| f.name), Some("Name"));
        assert!(schema.field("missing").is_none());
    }

    #[test]
    fn field_type_shape_helpers() {
        let tags = FieldType::list(FieldType::Text);
        assert_eq!(tags.element(), Some(&FieldType::Text));
        assert!(!tags.is_scalar());

        let child_ty = FieldType::optional(FieldType::Record(child));
        assert_eq!(child_ty.record_schema().map(RecordSchema::name), Some("Child"));
        assert!(!child_ty.is_scalar());

        let maybe_int = FieldType::optional(FieldType::Int);
        assert!(maybe_int.is_orderable());
        assert!(maybe_int.is_compatible_with(&FieldType::Float));
        assert!(!FieldType::Bool.is_orderable());
        assert!(!FieldType::Uuid.is_compatible_with(&FieldType::Text));
    }

    #[test]
    fn field_type_display() {
        let ty = FieldType::optional(FieldType::list(FieldType::Int));
        assert_eq!(ty.to_string(), "optional<list<int>>");
    }
}
