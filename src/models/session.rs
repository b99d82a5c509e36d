//! Study session rows ⇔ `sessions` table.

use super::category::Category;
use crate::errors::AppError;
use crate::store::{Payload, Record, conversion_error, opt_text};
use crate::utils::date::{parse_db_timestamp, to_db_timestamp};
use chrono::{DateTime, Utc};
use rusqlite::Row;
use rusqlite::types::Value;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SessionRow {
    pub id: String,
    pub device_id: String,
    pub category: Category,         // ⇔ sessions.category ('cs' | 'algorithm' | 'silmu')
    pub started_at: DateTime<Utc>,  // ⇔ sessions.started_at (TEXT, RFC 3339 UTC)
    pub duration_seconds: i64,      // ⇔ sessions.duration_seconds (INT >= 0)
    pub description: Option<String>,
    pub created_at: String,
}

impl Record for SessionRow {
    const TABLE: &'static str = "sessions";
    const COLUMNS: &'static [&'static str] = &[
        "id",
        "device_id",
        "category",
        "started_at",
        "duration_seconds",
        "description",
        "created_at",
    ];

    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        let category_str: String = row.get("category")?;
        let category = Category::from_db_str(&category_str)
            .ok_or_else(|| conversion_error(AppError::InvalidCategory(category_str.clone())))?;

        let started_str: String = row.get("started_at")?;
        let started_at = parse_db_timestamp(&started_str)
            .ok_or_else(|| conversion_error(AppError::InvalidDate(started_str.clone())))?;

        Ok(SessionRow {
            id: row.get("id")?,
            device_id: row.get("device_id")?,
            category,
            started_at,
            duration_seconds: row.get("duration_seconds")?,
            description: row.get("description")?,
            created_at: row.get("created_at")?,
        })
    }
}

/// Insert payload for a completed session.
#[derive(Debug, Clone, PartialEq)]
pub struct NewSession {
    pub device_id: String,
    pub category: Category,
    pub started_at: DateTime<Utc>,
    pub duration_seconds: i64,
    pub description: Option<String>,
}

impl Payload for NewSession {
    fn fields(&self) -> Vec<(&'static str, Value)> {
        vec![
            ("device_id", Value::Text(self.device_id.clone())),
            ("category", Value::Text(self.category.to_db_str().to_string())),
            ("started_at", Value::Text(to_db_timestamp(&self.started_at))),
            ("duration_seconds", Value::Integer(self.duration_seconds)),
            ("description", opt_text(self.description.as_deref())),
        ]
    }
}
