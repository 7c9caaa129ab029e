use crate::store::schema::{SchemaVariant, TableKind};
use rusqlite::types::Value;
use rusqlite::Row;

/// A fixed-shape record that maps onto one store table.
pub trait TableRecord: Sized {
    const KIND: TableKind;

    /// Column values in the table's storage order for `variant`.
    fn to_row(&self, variant: SchemaVariant) -> Vec<Value>;

    fn from_row(row: &Row<'_>, variant: SchemaVariant) -> rusqlite::Result<Self>;
}

pub(crate) fn text(value: &str) -> Value {
    Value::Text(value.to_string())
}

pub(crate) fn opt_text(value: Option<&str>) -> Value {
    value.map_or(Value::Null, text)
}

pub(crate) fn opt_int(value: Option<i64>) -> Value {
    value.map_or(Value::Null, Value::Integer)
}

pub(crate) fn opt_real(value: Option<f64>) -> Value {
    value.map_or(Value::Null, Value::Real)
}

/// True when `value` has no leading or trailing whitespace.
pub(crate) fn is_trimmed(value: &str) -> bool {
    value.trim() == value
}
