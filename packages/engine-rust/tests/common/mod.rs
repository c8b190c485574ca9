#![allow(dead_code)]

use std::sync::{LazyLock, Once};

use chrono::{DateTime, Duration, TimeZone, Utc};
use pagedquery_core::{
    EnumDef, EnumVariant, FieldDef, FieldRead, FieldType, Fields, Record, RecordSchema,
};
use pagedquery_engine::{EngineConfig, QueryEngine};

pub static STATUS: EnumDef = EnumDef::new(
    "Status",
    &[
        EnumVariant::new("Draft", 0),
        EnumVariant::new("Active", 1),
        EnumVariant::new("Archived", 2),
    ],
);

static ITEM_SCHEMA: LazyLock<RecordSchema> = LazyLock::new(|| {
    RecordSchema::new(
        "Item",
        vec![
            FieldDef::new("Id", FieldType::Int),
            FieldDef::new("Name", FieldType::Text).alias("title"),
            FieldDef::new("Tags", FieldType::list(FieldType::Text)),
            FieldDef::new("Price", FieldType::Float),
            FieldDef::new("Status", FieldType::Enum(&STATUS)),
            FieldDef::new("Created", FieldType::DateTime),
            FieldDef::new("Inner", FieldType::optional(FieldType::Record(inner_schema))),
        ],
    )
});

static INNER_SCHEMA: LazyLock<RecordSchema> = LazyLock::new(|| {
    RecordSchema::new(
        "Inner",
        vec![FieldDef::new(
            "Nested",
            FieldType::optional(FieldType::Record(nested_schema)),
        )],
    )
});

static NESTED_SCHEMA: LazyLock<RecordSchema> = LazyLock::new(|| {
    RecordSchema::new("Nested", vec![FieldDef::new("String", FieldType::Text)])
});

fn inner_schema() -> &'static RecordSchema {
    &INNER_SCHEMA
}

fn nested_schema() -> &'static RecordSchema {
    &NESTED_SCHEMA
}

#[derive(Debug, Clone, PartialEq)]
pub struct Item {
    pub id: i64,
    pub name: String,
    pub tags: Vec<String>,
    pub price: f64,
    pub status: i64,
    pub created: DateTime<Utc>,
    pub inner: Option<Inner>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Inner {
    pub nested: Option<Nested>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Nested {
    pub string: String,
}

impl Item {
    /// Item `id`: name `"item {id}"`, status cycling Draft/Active/Archived,
    /// created `id` hours after 2024-01-01.
    #[allow(clippy::cast_precision_loss)]
    pub fn numbered(id: i64) -> Self {
        Self {
            id,
            name: format!("item {id}"),
            tags: vec![format!("t{}", id % 4)],
            price: id as f64 * 1.5,
            status: id % 3,
            created: Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap() + Duration::hours(id),
            inner: Some(Inner {
                nested: Some(Nested {
                    string: format!("nested {id}"),
                }),
            }),
        }
    }

    pub fn tagged(id: i64, name: &str, tags: &[&str]) -> Self {
        Self {
            name: name.to_string(),
            tags: tags.iter().map(|t| (*t).to_string()).collect(),
            ..Self::numbered(id)
        }
    }
}

impl Fields for Item {
    fn field(&self, name: &str) -> FieldRead<'_> {
        match name {
            "Id" => FieldRead::value(self.id),
            "Name" => FieldRead::value(&self.name),
            "Tags" => FieldRead::value(self.tags.clone()),
            "Price" => FieldRead::value(self.price),
            "Status" => STATUS.value(self.status).into(),
            "Created" => FieldRead::value(self.created),
            "Inner" => FieldRead::optional_nested(self.inner.as_ref()),
            _ => FieldRead::Missing,
        }
    }
}

impl Record for Item {
    fn schema() -> &'static RecordSchema {
        &ITEM_SCHEMA
    }
}

impl Fields for Inner {
    fn field(&self, name: &str) -> FieldRead<'_> {
        match name {
            "Nested" => FieldRead::optional_nested(self.nested.as_ref()),
            _ => FieldRead::Missing,
        }
    }
}

impl Fields for Nested {
    fn field(&self, name: &str) -> FieldRead<'_> {
        match name {
            "String" => FieldRead::value(&self.string),
            _ => FieldRead::Missing,
        }
    }
}

/// Items numbered `1..=count`.
pub fn items(count: i64) -> Vec<Item> {
    (1..=count).map(Item::numbered).collect()
}

/// An engine with `Item` registered.
pub fn engine() -> QueryEngine {
    init_tracing();
    let engine = QueryEngine::new(EngineConfig::default());
    engine.register::<Item>().expect("Item has members");
    engine
}

pub fn ids(rows: &[&Item]) -> Vec<i64> {
    rows.iter().map(|r| r.id).collect()
}

/// Routes engine logs to the test harness; set `RUST_LOG=debug` to see them.
pub fn init_tracing() {
    static INIT: Once = Once::new();
    INIT.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    });
}
