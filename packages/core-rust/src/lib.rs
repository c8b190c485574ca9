//! `PagedQuery` Core: wire descriptors, typed values and record schemas.

pub mod schema;
pub mod traits;
pub mod types;
pub mod wire;

pub use schema::{FieldDef, FieldType, RecordSchema};
pub use traits::{FieldRead, Fields, Record};
pub use types::{EnumDef, EnumValue, EnumVariant, Value};
pub use wire::{
    FilterDescriptor, FilterOperation, PagedRequest, PagedResponse, RawValue, SortDescriptor,
    SortDirection,
};
