//! Property resolution: external field names to typed access paths.

use pagedquery_core::{FieldDef, FieldRead, FieldType, Fields, RecordSchema, Value};

use crate::error::CompileError;

/// One resolved member lookup: exact member name plus its declared type.
#[derive(Debug, Clone, PartialEq)]
pub struct Hop {
    pub member: &'static str,
    pub ty: FieldType,
}

impl From<&FieldDef> for Hop {
    fn from(field: &FieldDef) -> Self {
        Self {
            member: field.name,
            ty: field.ty.clone(),
        }
    }
}

/// Ordered chain of member lookups from a root record type to a leaf member.
///
/// Never empty: the first hop is always a member of the root record.
#[derive(Debug, Clone, PartialEq)]
pub struct AccessPath {
    record: &'static str,
    hops: Vec<Hop>,
}

impl AccessPath {
    #[must_use]
    pub const fn record(&self) -> &'static str {
        self.record
    }

    #[must_use]
    pub fn hops(&self) -> &[Hop] {
        &self.hops
    }

    /// Declared type of the leaf member.
    #[must_use]
    pub fn leaf_type(&self) -> &FieldType {
        // `resolve_path` never produces an empty path.
        &self.hops[self.hops.len() - 1].ty
    }

    /// Reads the leaf value from a record.
    ///
    /// A null or absent sub-object anywhere along the path reads as
    /// [`Value::Null`].
    #[must_use]
    pub fn read(&self, record: &dyn Fields) -> Value {
        let mut current = record;
        let last = self.hops.len() - 1;
        for (index, hop) in self.hops.iter().enumerate() {
            match current.field(hop.member) {
                FieldRead::Nested(next) if index < last => current = next,
                FieldRead::Value(value) if index == last => return value,
                FieldRead::Nested(_) | FieldRead::Value(_) | FieldRead::Missing => {
                    return Value::Null
                }
            }
        }
        Value::Null
    }
}

impl std::fmt::Display for AccessPath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.record)?;
        for hop in &self.hops {
            write!(f, ".{}", hop.member)?;
        }
        Ok(())
    }
}

/// Maps external, possibly differently-cased or aliased, field names onto
/// schema members.
///
/// Stateless: the per-type name table lives in [`RecordSchema`], built once
/// when the type is declared.
#[derive(Debug, Clone, Copy, Default)]
pub struct PropertyResolver;

impl PropertyResolver {
    /// Resolves a member of the root record type.
    ///
    /// # Errors
    ///
    /// Returns [`CompileError::UnknownProperty`] when no member matches.
    pub fn resolve(schema: &'static RecordSchema, field_name: &str) -> Result<Hop, CompileError> {
        schema
            .field(field_name)
            .map(Hop::from)
            .ok_or_else(|| CompileError::UnknownProperty {
                record: schema.name(),
                property: field_name.to_string(),
            })
    }

    /// Resolves a member of a nested sub-object whose declared type is `parent`.
    ///
    /// # Errors
    ///
    /// Returns [`CompileError::UnknownProperty`] when `parent` is not a
    /// sub-object or has no matching member.
    pub fn resolve_nested(parent: &FieldType, nested_field: &str) -> Result<Hop, CompileError> {
        let Some(schema) = parent.record_schema() else {
            return Err(CompileError::UnknownProperty {
                record: "<scalar>",
                property: nested_field.to_string(),
            });
        };
        Self::resolve(schema, nested_field)
    }

    /// Resolves `property` on the root type, then each step of `nested`
    /// against the previous hop's declared type.
    ///
    /// # Errors
    ///
    /// Returns [`CompileError::UnknownProperty`] on the first step that does
    /// not resolve.
    pub fn resolve_path(
        schema: &'static RecordSchema,
        property: &str,
        nested: &[String],
    ) -> Result<AccessPath, CompileError> {
        let mut hops = Vec::with_capacity(nested.len() + 1);
        let mut hop = Self::resolve(schema, property)?;
        for step in nested {
            let next = Self::resolve_nested(&hop.ty, step)?;
            hops.push(hop);
            hop = next;
        }
        hops.push(hop);
        Ok(AccessPath {
            record: schema.name(),
            hops,
        })
    }
}
