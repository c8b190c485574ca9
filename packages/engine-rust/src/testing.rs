//! Fixture record types shared by unit tests.

use std::sync::LazyLock;

use chrono::{DateTime, Duration, TimeZone, Utc};
use pagedquery_core::{
    EnumDef, EnumVariant, FieldDef, FieldRead, FieldType, Fields, Record, RecordSchema, Value,
};
use uuid::Uuid;

pub static EXAMPLE_ENUM: EnumDef = EnumDef::new(
    "ExampleEnum",
    &[
        EnumVariant::new("Zero", 0),
        EnumVariant::new("One", 1),
        EnumVariant::new("Two", 2),
        EnumVariant::new("Three", 3),
        EnumVariant::new("Four", 4),
        EnumVariant::new("Five", 5),
        EnumVariant::new("Six", 6),
        EnumVariant::new("Seven", 7),
        EnumVariant::new("Eight", 8),
        EnumVariant::new("Nine", 9),
        EnumVariant::new("Ten", 10),
    ],
);

static EXAMPLE_SCHEMA: LazyLock<RecordSchema> = LazyLock::new(|| {
    RecordSchema::new(
        "Example",
        vec![
            FieldDef::new("Id", FieldType::Int),
            FieldDef::new("Date", FieldType::DateTime),
            FieldDef::new("Decimal", FieldType::Float),
            FieldDef::new("Enum", FieldType::Enum(&EXAMPLE_ENUM)),
            FieldDef::new("String", FieldType::Text).alias("name"),
            FieldDef::new("Strings", FieldType::list(FieldType::Text)).alias("tags"),
            FieldDef::new("Guid", FieldType::Uuid),
            FieldDef::new("Decimals", FieldType::list(FieldType::Float)),
            FieldDef::new("Ints", FieldType::list(FieldType::Int)),
            FieldDef::new("Active", FieldType::Bool),
            FieldDef::new("Score", FieldType::optional(FieldType::Int)),
            FieldDef::new("Inner", FieldType::optional(FieldType::Record(inner_schema))),
        ],
    )
});

static INNER_SCHEMA: LazyLock<RecordSchema> = LazyLock::new(|| {
    RecordSchema::new(
        "Inner",
        vec![
            FieldDef::new("String", FieldType::Text),
            FieldDef::new("Nested", FieldType::optional(FieldType::Record(nested_schema))),
        ],
    )
});

static NESTED_SCHEMA: LazyLock<RecordSchema> = LazyLock::new(|| {
    RecordSchema::new(
        "Nested",
        vec![
            FieldDef::new("String", FieldType::Text),
            FieldDef::new("EnumArray", FieldType::list(FieldType::Enum(&EXAMPLE_ENUM))),
            FieldDef::new("EnumList", FieldType::list(FieldType::Enum(&EXAMPLE_ENUM))),
        ],
    )
});

fn inner_schema() -> &'static RecordSchema {
    &INNER_SCHEMA
}

fn nested_schema() -> &'static RecordSchema {
    &NESTED_SCHEMA
}

#[derive(Debug, Clone)]
pub struct Example {
    pub id: i64,
    pub date: DateTime<Utc>,
    pub decimal: f64,
    pub enum_ordinal: i64,
    pub string: String,
    pub strings: Vec<String>,
    pub guid: Uuid,
    pub decimals: Vec<f64>,
    pub ints: Vec<i64>,
    pub active: bool,
    pub score: Option<i64>,
    pub inner: Option<Inner>,
}

#[derive(Debug, Clone, Default)]
pub struct Inner {
    pub string: String,
    pub nested: Option<Nested>,
}

#[derive(Debug, Clone, Default)]
pub struct Nested {
    pub string: String,
    pub enum_array: Vec<i64>,
    pub enum_list: Vec<i64>,
}

pub fn base_date() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 1, 31, 12, 0, 0).unwrap()
}

impl Example {
    /// Deterministic record number `x`.
    #[allow(clippy::cast_precision_loss)]
    pub fn sample(x: i64) -> Self {
        Self {
            id: x,
            date: base_date() - Duration::days(x),
            decimal: 0.1 * x as f64,
            enum_ordinal: x % 11,
            string: format!("string {x}"),
            strings: vec![format!("string {x}")],
            guid: Uuid::parse_str(&format!("ca0ea80a-322c-436d-8e23-c638a30cf8f{}", x % 10))
                .unwrap(),
            decimals: vec![0.1 * x as f64],
            ints: vec![x],
            active: x % 2 == 0,
            score: (x % 3 != 0).then_some(x * 10),
            inner: Some(Inner {
                string: format!("inner string {x}"),
                nested: Some(Nested {
                    string: format!("double inner string {x}"),
                    enum_array: vec![x % 3],
                    enum_list: vec![x % 3],
                }),
            }),
        }
    }

    pub fn range(count: i64) -> Vec<Self> {
        (1..=count).map(Self::sample).collect()
    }
}

fn enum_list(ordinals: &[i64]) -> Value {
    Value::List(ordinals.iter().map(|&o| EXAMPLE_ENUM.value(o)).collect())
}

impl Fields for Example {
    fn field(&self, name: &str) -> FieldRead<'_> {
        match name {
            "Id" => FieldRead::value(self.id),
            "Date" => FieldRead::value(self.date),
            "Decimal" => FieldRead::value(self.decimal),
            "Enum" => EXAMPLE_ENUM.value(self.enum_ordinal).into(),
            "String" => FieldRead::value(&self.string),
            "Strings" => FieldRead::value(self.strings.clone()),
            "Guid" => FieldRead::value(self.guid),
            "Decimals" => FieldRead::value(self.decimals.clone()),
            "Ints" => FieldRead::value(self.ints.clone()),
            "Active" => FieldRead::value(self.active),
            "Score" => FieldRead::value(self.score),
            "Inner" => FieldRead::optional_nested(self.inner.as_ref()),
            _ => FieldRead::Missing,
        }
    }
}

impl Record for Example {
    fn schema() -> &'static RecordSchema {
        &EXAMPLE_SCHEMA
    }
}

impl Fields for Inner {
    fn field(&self, name: &str) -> FieldRead<'_> {
        match name {
            "String" => FieldRead::value(&self.string),
            "Nested" => FieldRead::optional_nested(self.nested.as_ref()),
            _ => FieldRead::Missing,
        }
    }
}

impl Fields for Nested {
    fn field(&self, name: &str) -> FieldRead<'_> {
        match name {
            "String" => FieldRead::value(&self.string),
            "EnumArray" => enum_list(&self.enum_array).into(),
            "EnumList" => enum_list(&self.enum_list).into(),
            _ => FieldRead::Missing,
        }
    }
}

/// A record type with no members; registration must reject it.
pub struct Hollow;

static HOLLOW_SCHEMA: LazyLock<RecordSchema> =
    LazyLock::new(|| RecordSchema::new("Hollow", Vec::new()));

impl Fields for Hollow {
    fn field(&self, _name: &str) -> FieldRead<'_> {
        FieldRead::Missing
    }
}

impl Record for Hollow {
    fn schema() -> &'static RecordSchema {
        &HOLLOW_SCHEMA
    }
}
