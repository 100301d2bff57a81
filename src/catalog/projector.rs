use anyhow::{anyhow, Result};
use indexmap::IndexMap;
use serde::Serialize;

/// Column that always projects to a list of strings.
pub const IMAGES_COLUMN: &str = "images";

/// Column value as read from the store, before projection.
#[derive(Debug, Clone, PartialEq)]
pub enum RawValue {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
    TextList(Vec<String>),
    Bytes(Vec<u8>),
    Json(serde_json::Value),
}

/// One result row: column names in select order with their raw values.
pub type RawRow = Vec<(String, RawValue)>;

/// Projected field value. Serializes to the bare JSON scalar or array.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum FieldValue {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
    List(Vec<String>),
    Json(serde_json::Value),
}

/// Uniform product shape shared by all five tables; keeps select order.
pub type ProductRecord = IndexMap<String, FieldValue>;

/// Parse Postgres array text (`{a, b,c}`) into its trimmed elements.
pub fn parse_pg_array_text(raw: &str) -> Vec<String> {
    let inner = raw.trim_matches(|c| c == '{' || c == '}');
    if inner.is_empty() {
        return Vec::new();
    }
    inner.split(',').map(|part| part.trim().to_string()).collect()
}

fn project_images(value: RawValue) -> FieldValue {
    let list = match value {
        RawValue::TextList(items) => items,
        RawValue::Text(text) => parse_pg_array_text(&text),
        RawValue::Bytes(bytes) => match String::from_utf8(bytes) {
            Ok(text) => parse_pg_array_text(&text),
            Err(_) => Vec::new(),
        },
        _ => Vec::new(),
    };
    FieldValue::List(list)
}

fn project_scalar(column: &str, value: RawValue) -> Result<FieldValue> {
    Ok(match value {
        RawValue::Null => FieldValue::Null,
        RawValue::Bool(b) => FieldValue::Bool(b),
        RawValue::Int(i) => FieldValue::Int(i),
        RawValue::Float(f) => FieldValue::Float(f),
        RawValue::Text(s) => FieldValue::Text(s),
        RawValue::TextList(items) => FieldValue::List(items),
        RawValue::Json(value) => FieldValue::Json(value),
        RawValue::Bytes(bytes) => FieldValue::Text(
            String::from_utf8(bytes).map_err(|_| anyhow!("column {column} is not valid UTF-8"))?,
        ),
    })
}

/// Project one row. Fails only when a non-image column holds undecodable bytes.
pub fn project_row(row: RawRow) -> Result<ProductRecord> {
    let mut record = ProductRecord::with_capacity(row.len());
    for (column, value) in row {
        let field = if column == IMAGES_COLUMN {
            project_images(value)
        } else {
            project_scalar(&column, value)?
        };
        record.insert(column, field);
    }
    Ok(record)
}

/// Project a batch; rows that fail to decode are dropped, the rest kept in order.
pub fn project_rows(rows: Vec<RawRow>) -> Vec<ProductRecord> {
    rows.into_iter()
        .filter_map(|row| match project_row(row) {
            Ok(record) => Some(record),
            Err(e) => {
                tracing::debug!(error = %e, "skipping undecodable row");
                None
            }
        })
        .collect()
}
