//! Generic typed row-store client.
//!
//! A `DbClient<R>` gives CRUD access to the table holding rows of shape `R`.
//! It knows nothing about sessions or problems: the record type supplies the
//! table name, the column list and the row mapper.

mod record;

pub use record::{Payload, Record};
pub(crate) use record::{conversion_error, opt_int, opt_text};

use crate::utils::date::to_db_timestamp;
use chrono::Utc;
use rusqlite::types::Value;
use rusqlite::{Connection, OptionalExtension, params_from_iter};
use std::marker::PhantomData;
use thiserror::Error;
use uuid::Uuid;

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("SQLite failure: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("Unknown column '{column}' for table {table}")]
    UnknownColumn { table: &'static str, column: String },

    #[error("Invalid value for {table}.{column}: {reason}")]
    InvalidValue {
        table: &'static str,
        column: &'static str,
        reason: String,
    },

    #[error("No row with id {id} in {table}")]
    NotFound { table: &'static str, id: String },

    #[error("Empty update for row {id} in {table}")]
    EmptyPatch { table: &'static str, id: String },
}

pub type StoreResult<T> = Result<T, StorageError>;

/// Equality filter on one column.
#[derive(Debug, Clone, PartialEq)]
pub struct Filter {
    pub column: String,
    pub value: Value,
}

impl Filter {
    pub fn eq(column: impl Into<String>, value: impl Into<Value>) -> Self {
        Self {
            column: column.into(),
            value: value.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderBy {
    pub column: String,
    pub ascending: bool,
}

impl OrderBy {
    pub fn asc(column: impl Into<String>) -> Self {
        Self {
            column: column.into(),
            ascending: true,
        }
    }

    pub fn desc(column: impl Into<String>) -> Self {
        Self {
            column: column.into(),
            ascending: false,
        }
    }
}

pub struct DbClient<'c, R> {
    conn: &'c Connection,
    _row: PhantomData<fn() -> R>,
}

impl<'c, R: Record> DbClient<'c, R> {
    pub fn new(conn: &'c Connection) -> Self {
        Self {
            conn,
            _row: PhantomData,
        }
    }

    pub fn conn(&self) -> &'c Connection {
        self.conn
    }

    fn check_column(column: &str) -> StoreResult<()> {
        if R::COLUMNS.contains(&column) {
            Ok(())
        } else {
            Err(StorageError::UnknownColumn {
                table: R::TABLE,
                column: column.to_string(),
            })
        }
    }

    /// All rows matching `filter`, sorted by `order`. No match is an empty vec.
    pub fn get_all(&self, filter: Option<&Filter>, order: Option<&OrderBy>) -> StoreResult<Vec<R>> {
        let mut sql = format!("SELECT * FROM {}", R::TABLE);
        let mut values: Vec<Value> = Vec::new();

        if let Some(f) = filter {
            Self::check_column(&f.column)?;
            sql.push_str(&format!(" WHERE {} = ?1", f.column));
            values.push(f.value.clone());
        }

        if let Some(o) = order {
            Self::check_column(&o.column)?;
            let dir = if o.ascending { "ASC" } else { "DESC" };
            sql.push_str(&format!(" ORDER BY {} {}", o.column, dir));
        }

        let mut stmt = self.conn.prepare(&sql)?;
        let rows = stmt.query_map(params_from_iter(values.iter()), R::from_row)?;

        let mut out = Vec::new();
        for r in rows {
            out.push(r?);
        }
        Ok(out)
    }

    /// The row with this id, or `None`.
    pub fn get_one(&self, id: &str) -> StoreResult<Option<R>> {
        let sql = format!("SELECT * FROM {} WHERE id = ?1", R::TABLE);
        let row = self
            .conn
            .query_row(&sql, [id], R::from_row)
            .optional()?;
        Ok(row)
    }

    /// Insert one row and return it as stored.
    pub fn insert<P: Payload>(&self, payload: &P) -> StoreResult<R> {
        let mut fields = payload.fields();
        fields.retain(|(column, value)| {
            !(matches!(*column, "id" | "created_at") && *value == Value::Null)
        });

        for (column, _) in &fields {
            Self::check_column(column)?;
        }

        let id = match fields.iter().find(|(column, _)| *column == "id") {
            Some((_, Value::Text(id))) => id.clone(),
            Some(_) => {
                return Err(StorageError::InvalidValue {
                    table: R::TABLE,
                    column: "id",
                    reason: "ids are text".into(),
                });
            }
            None => {
                let id = Uuid::new_v4().to_string();
                fields.push(("id", Value::Text(id.clone())));
                id
            }
        };

        if !fields.iter().any(|(column, _)| *column == "created_at") {
            fields.push(("created_at", Value::Text(to_db_timestamp(&Utc::now()))));
        }

        let columns: Vec<&str> = fields.iter().map(|(c, _)| *c).collect();
        let placeholders: Vec<String> = (1..=fields.len()).map(|i| format!("?{i}")).collect();
        let sql = format!(
            "INSERT INTO {} ({}) VALUES ({})",
            R::TABLE,
            columns.join(", "),
            placeholders.join(", ")
        );

        self.conn
            .execute(&sql, params_from_iter(fields.iter().map(|(_, v)| v)))?;

        self.get_one(&id)?.ok_or(StorageError::NotFound {
            table: R::TABLE,
            id,
        })
    }

    /// Apply a partial update to one row and return the updated row.
    pub fn update<P: Payload>(&self, id: &str, patch: &P) -> StoreResult<R> {
        let fields = patch.fields();
        if fields.is_empty() {
            return Err(StorageError::EmptyPatch {
                table: R::TABLE,
                id: id.to_string(),
            });
        }

        let mut assignments = Vec::with_capacity(fields.len());
        for (i, (column, _)) in fields.iter().enumerate() {
            Self::check_column(column)?;
            assignments.push(format!("{} = ?{}", column, i + 1));
        }

        let sql = format!(
            "UPDATE {} SET {} WHERE id = ?{}",
            R::TABLE,
            assignments.join(", "),
            fields.len() + 1
        );

        let mut values: Vec<Value> = fields.into_iter().map(|(_, v)| v).collect();
        values.push(Value::Text(id.to_string()));

        let changed = self.conn.execute(&sql, params_from_iter(values.iter()))?;
        if changed == 0 {
            return Err(StorageError::NotFound {
                table: R::TABLE,
                id: id.to_string(),
            });
        }

        self.get_one(id)?.ok_or_else(|| StorageError::NotFound {
            table: R::TABLE,
            id: id.to_string(),
        })
    }

    /// Remove one row. A missing row is not an error.
    pub fn delete(&self, id: &str) -> StoreResult<()> {
        let sql = format!("DELETE FROM {} WHERE id = ?1", R::TABLE);
        self.conn.execute(&sql, [id])?;
        Ok(())
    }
}
