use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use pagedquery_core::{FieldType, RawValue, Value};
use uuid::Uuid;

use super::{unparsable, ValueParseStrategy, ValueParser};
use crate::error::CompileError;

const NAIVE_DATE_TIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

/// `Optional(T)`: `null` is accepted, anything else is parsed as `T`.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullableStrategy;

impl ValueParseStrategy for NullableStrategy {
    fn supports(&self, target: &FieldType) -> bool {
        target.is_optional()
    }

    fn parse(
        &self,
        raw: &RawValue,
        target: &FieldType,
        parser: &ValueParser,
    ) -> Result<Value, CompileError> {
        match (raw, target) {
            (RawValue::Null, _) => Ok(Value::Null),
            (_, FieldType::Optional(inner)) => parser.parse_value(raw, inner),
            _ => Err(unparsable(raw, target, "expected an optional target")),
        }
    }
}

/// `List(T)`: each array element is parsed as `T`. A lone scalar is treated
/// as a one-element array.
#[derive(Debug, Clone, Copy, Default)]
pub struct CollectionStrategy;

impl ValueParseStrategy for CollectionStrategy {
    fn supports(&self, target: &FieldType) -> bool {
        matches!(target, FieldType::List(_))
    }

    fn parse(
        &self,
        raw: &RawValue,
        target: &FieldType,
        parser: &ValueParser,
    ) -> Result<Value, CompileError> {
        let FieldType::List(element) = target else {
            return Err(unparsable(raw, target, "expected a collection target"));
        };
        match raw {
            RawValue::Array(items) => items
                .iter()
                .map(|item| parser.parse_value(item, element))
                .collect::<Result<Vec<_>, _>>()
                .map(Value::List),
            RawValue::Null => Err(unparsable(raw, target, "null is not a collection")),
            scalar => Ok(Value::List(vec![parser.parse_value(scalar, element)?])),
        }
    }
}

/// Enumerations by case-insensitive member name or by ordinal.
#[derive(Debug, Clone, Copy, Default)]
pub struct EnumStrategy;

impl ValueParseStrategy for EnumStrategy {
    fn supports(&self, target: &FieldType) -> bool {
        matches!(target, FieldType::Enum(_))
    }

    fn parse(
        &self,
        raw: &RawValue,
        target: &FieldType,
        _parser: &ValueParser,
    ) -> Result<Value, CompileError> {
        let FieldType::Enum(def) = target else {
            return Err(unparsable(raw, target, "expected an enum target"));
        };
        let found = match raw {
            RawValue::String(s) => {
                let s = s.trim();
                def.by_name(s)
                    .or_else(|| s.parse::<i64>().ok().and_then(|n| def.by_ordinal(n)))
            }
            RawValue::Int(n) => def.by_ordinal(*n),
            RawValue::Float(f) => integral(f.0).and_then(|n| def.by_ordinal(n)),
            _ => None,
        };
        found
            .map(Value::Enum)
            .ok_or_else(|| unparsable(raw, target, format!("not a member of {}", def.name)))
    }
}

/// Date-times from RFC 3339, naive date-time or plain date strings (UTC),
/// or from integer Unix epoch milliseconds.
#[derive(Debug, Clone, Copy, Default)]
pub struct DateTimeStrategy;

impl ValueParseStrategy for DateTimeStrategy {
    fn supports(&self, target: &FieldType) -> bool {
        matches!(target, FieldType::DateTime)
    }

    fn parse(
        &self,
        raw: &RawValue,
        target: &FieldType,
        _parser: &ValueParser,
    ) -> Result<Value, CompileError> {
        let parsed = match raw {
            RawValue::String(s) => parse_date_time(s.trim()),
            RawValue::Int(millis) => DateTime::<Utc>::from_timestamp_millis(*millis),
            _ => None,
        };
        parsed
            .map(Value::DateTime)
            .ok_or_else(|| unparsable(raw, target, "not a recognized date-time"))
    }
}

fn parse_date_time(s: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }
    for format in NAIVE_DATE_TIME_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(s, format) {
            return Some(naive.and_utc());
        }
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

/// Unique identifiers from their textual form.
#[derive(Debug, Clone, Copy, Default)]
pub struct UuidStrategy;

impl ValueParseStrategy for UuidStrategy {
    fn supports(&self, target: &FieldType) -> bool {
        matches!(target, FieldType::Uuid)
    }

    fn parse(
        &self,
        raw: &RawValue,
        target: &FieldType,
        _parser: &ValueParser,
    ) -> Result<Value, CompileError> {
        match raw {
            RawValue::String(s) => Uuid::parse_str(s.trim())
                .map(Value::Uuid)
                .map_err(|e| unparsable(raw, target, e.to_string())),
            _ => Err(unparsable(raw, target, "expected a string")),
        }
    }
}

/// Booleans, integers, floats and text.
#[derive(Debug, Clone, Copy, Default)]
pub struct PrimitiveStrategy;

impl ValueParseStrategy for PrimitiveStrategy {
    fn supports(&self, target: &FieldType) -> bool {
        matches!(
            target,
            FieldType::Bool | FieldType::Int | FieldType::Float | FieldType::Text
        )
    }

    #[allow(clippy::cast_precision_loss)]
    fn parse(
        &self,
        raw: &RawValue,
        target: &FieldType,
        _parser: &ValueParser,
    ) -> Result<Value, CompileError> {
        let parsed = match (target, raw) {
            (FieldType::Bool, RawValue::Bool(b)) => Some(Value::Bool(*b)),
            (FieldType::Bool, RawValue::String(s)) => match s.trim().to_ascii_lowercase().as_str() {
                "true" => Some(Value::Bool(true)),
                "false" => Some(Value::Bool(false)),
                _ => None,
            },
            (FieldType::Int, RawValue::Int(n)) => Some(Value::Int(*n)),
            (FieldType::Int, RawValue::Float(f)) => integral(f.0).map(Value::Int),
            (FieldType::Int, RawValue::String(s)) => s.trim().parse().ok().map(Value::Int),
            (FieldType::Float, RawValue::Int(n)) => Some(Value::Float(*n as f64)),
            (FieldType::Float, RawValue::Float(f)) => Some(Value::Float(f.0)),
            (FieldType::Float, RawValue::String(s)) => s
                .trim()
                .parse::<f64>()
                .ok()
                .filter(|f| f.is_finite())
                .map(Value::Float),
            (FieldType::Text, RawValue::String(s)) => Some(Value::Text(s.clone())),
            _ => None,
        };
        parsed.ok_or_else(|| unparsable(raw, target, format!("{} does not convert", raw.kind())))
    }
}

/// The integer value of a float with no fractional part, if it fits.
#[allow(clippy::cast_possible_truncation, clippy::cast_precision_loss)]
fn integral(f: f64) -> Option<i64> {
    (f.is_finite() && f.fract() == 0.0 && f >= i64::MIN as f64 && f <= i64::MAX as f64)
        .then_some(f as i64)
}
