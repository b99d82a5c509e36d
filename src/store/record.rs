use rusqlite::Row;
use rusqlite::types::{Type, Value};
use std::error::Error;

/// A row shape stored in one table.
pub trait Record: Sized {
    /// Table name.
    const TABLE: &'static str;

    /// Every column of the table. Filters, orderings and payload fields are
    /// checked against this list before any SQL is built.
    const COLUMNS: &'static [&'static str];

    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self>;
}

/// A set of column values to write: a full insert or a partial update.
///
/// `id` and `created_at` may be omitted from inserts; the store assigns them.
pub trait Payload {
    fn fields(&self) -> Vec<(&'static str, Value)>;
}

/// Wrap a text-decoding failure the way rusqlite reports conversion errors.
pub(crate) fn conversion_error<E>(err: E) -> rusqlite::Error
where
    E: Error + Send + Sync + 'static,
{
    rusqlite::Error::FromSqlConversionFailure(0, Type::Text, Box::new(err))
}

/// Nullable text column value.
pub(crate) fn opt_text(value: Option<&str>) -> Value {
    match value {
        Some(v) => Value::Text(v.to_string()),
        None => Value::Null,
    }
}

/// Nullable integer column value.
pub(crate) fn opt_int(value: Option<i64>) -> Value {
    match value {
        Some(v) => Value::Integer(v),
        None => Value::Null,
    }
}
