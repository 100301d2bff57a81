// Decoding of untyped Postgres rows into `RawRow`s for the projector.
//
// Decoding never drops a row: a column that cannot be read as its declared
// type falls back to its raw text, and an unreadable `images` column becomes
// NULL so the projector emits an empty list.

use crate::catalog::projector::IMAGES_COLUMN;
use crate::catalog::{RawRow, RawValue};
use anyhow::Result;
use sqlx::postgres::PgRow;
use sqlx::types::{BigDecimal, JsonValue, Uuid};
use sqlx::{Column, Row, TypeInfo, ValueRef};
use tracing::debug;

/// How a column is read, chosen from its Postgres type name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnKind {
    Bool,
    Int2,
    Int4,
    Int8,
    Float4,
    Float8,
    Numeric,
    Text,
    TextArray,
    Bytes,
    Uuid,
    Json,
    Date,
    Timestamp,
    TimestampTz,
    /// Enums, domains and anything else: read as raw text.
    Other,
}

impl ColumnKind {
    pub fn from_type_name(name: &str) -> Self {
        match name {
            "BOOL" => ColumnKind::Bool,
            "INT2" => ColumnKind::Int2,
            "INT4" => ColumnKind::Int4,
            "INT8" => ColumnKind::Int8,
            "FLOAT4" => ColumnKind::Float4,
            "FLOAT8" => ColumnKind::Float8,
            "NUMERIC" => ColumnKind::Numeric,
            "TEXT" | "VARCHAR" | "BPCHAR" | "NAME" | "CITEXT" => ColumnKind::Text,
            "TEXT[]" | "VARCHAR[]" | "BPCHAR[]" | "NAME[]" => ColumnKind::TextArray,
            "BYTEA" => ColumnKind::Bytes,
            "UUID" => ColumnKind::Uuid,
            "JSON" | "JSONB" => ColumnKind::Json,
            "DATE" => ColumnKind::Date,
            "TIMESTAMP" => ColumnKind::Timestamp,
            "TIMESTAMPTZ" => ColumnKind::TimestampTz,
            _ => ColumnKind::Other,
        }
    }
}

fn opt<T>(value: Option<T>, wrap: impl FnOnce(T) -> RawValue) -> RawValue {
    value.map_or(RawValue::Null, wrap)
}

/// Text arrays may hold NULL elements; those are left out.
pub fn compact_list(items: Vec<Option<String>>) -> Vec<String> {
    items.into_iter().flatten().collect()
}

/// Raw column bytes as text, NULL when they are not UTF-8.
pub fn raw_text(bytes: &[u8]) -> RawValue {
    match std::str::from_utf8(bytes) {
        Ok(text) => RawValue::Text(text.to_string()),
        Err(_) => RawValue::Null,
    }
}

/// Typed read; `Ok(None)` for kinds without a typed decoder.
fn decode_typed(row: &PgRow, idx: usize, kind: ColumnKind) -> Result<Option<RawValue>> {
    Ok(Some(match kind {
        ColumnKind::Bool => opt(row.try_get::<Option<bool>, _>(idx)?, RawValue::Bool),
        ColumnKind::Int2 => opt(row.try_get::<Option<i16>, _>(idx)?, |v| RawValue::Int(v.into())),
        ColumnKind::Int4 => opt(row.try_get::<Option<i32>, _>(idx)?, |v| RawValue::Int(v.into())),
        ColumnKind::Int8 => opt(row.try_get::<Option<i64>, _>(idx)?, RawValue::Int),
        ColumnKind::Float4 => opt(row.try_get::<Option<f32>, _>(idx)?, |v| {
            RawValue::Float(v.into())
        }),
        ColumnKind::Float8 => opt(row.try_get::<Option<f64>, _>(idx)?, RawValue::Float),
        ColumnKind::Numeric => opt(row.try_get::<Option<BigDecimal>, _>(idx)?, |v| {
            RawValue::Text(v.to_string())
        }),
        ColumnKind::Text => opt(row.try_get::<Option<String>, _>(idx)?, RawValue::Text),
        ColumnKind::TextArray => opt(row.try_get::<Option<Vec<Option<String>>>, _>(idx)?, |v| {
            RawValue::TextList(compact_list(v))
        }),
        ColumnKind::Bytes => opt(row.try_get::<Option<Vec<u8>>, _>(idx)?, RawValue::Bytes),
        ColumnKind::Uuid => opt(row.try_get::<Option<Uuid>, _>(idx)?, |v| {
            RawValue::Text(v.to_string())
        }),
        ColumnKind::Json => opt(row.try_get::<Option<JsonValue>, _>(idx)?, RawValue::Json),
        ColumnKind::Date => opt(row.try_get::<Option<chrono::NaiveDate>, _>(idx)?, |v| {
            RawValue::Text(v.to_string())
        }),
        ColumnKind::Timestamp => opt(
            row.try_get::<Option<chrono::NaiveDateTime>, _>(idx)?,
            |v| RawValue::Text(v.to_string()),
        ),
        ColumnKind::TimestampTz => opt(
            row.try_get::<Option<chrono::DateTime<chrono::Utc>>, _>(idx)?,
            |v| RawValue::Text(v.to_rfc3339()),
        ),
        ColumnKind::Other => return Ok(None),
    }))
}

fn decode_raw(row: &PgRow, idx: usize) -> RawValue {
    match row.try_get_raw(idx) {
        Ok(value) if value.is_null() => RawValue::Null,
        Ok(value) => value.as_bytes().map_or(RawValue::Null, raw_text),
        Err(_) => RawValue::Null,
    }
}

/// Pick the value for `column` given its typed read and a raw-text fallback.
pub fn resolve_column(
    column: &str,
    typed: Result<Option<RawValue>>,
    raw: impl FnOnce() -> RawValue,
) -> RawValue {
    match typed {
        Ok(Some(value)) => value,
        Ok(None) if column == IMAGES_COLUMN => RawValue::Null,
        Ok(None) => raw(),
        Err(e) => {
            debug!(column, error = %e, "typed decode failed; using fallback");
            if column == IMAGES_COLUMN {
                RawValue::Null
            } else {
                raw()
            }
        }
    }
}

/// Decode every column of `row`, keeping select order.
pub fn decode_row(row: &PgRow) -> RawRow {
    row.columns()
        .iter()
        .map(|col| {
            let idx = col.ordinal();
            let kind = ColumnKind::from_type_name(col.type_info().name());
            let value = resolve_column(col.name(), decode_typed(row, idx, kind), || {
                decode_raw(row, idx)
            });
            (col.name().to_string(), value)
        })
        .collect()
}

pub fn decode_rows(rows: &[PgRow]) -> Vec<RawRow> {
    rows.iter().map(decode_row).collect()
}
