//! Algorithm problem rows ⇔ `algorithm_problems` table.

use crate::errors::AppError;
use crate::store::{Payload, Record, conversion_error, opt_int, opt_text};
use crate::utils::date::{DB_DATE_FMT, parse_date};
use chrono::NaiveDate;
use rusqlite::Row;
use rusqlite::types::Value;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AlgorithmProblem {
    pub id: String,
    pub device_id: String,
    pub problem_name: String,
    pub category: String,
    pub link: Option<String>,
    pub solved_at: NaiveDate, // ⇔ TEXT "YYYY-MM-DD"
    pub review_by: NaiveDate, // ⇔ TEXT "YYYY-MM-DD"
    pub first_solve_seconds: Option<i64>,
    pub second_solve_seconds: Option<i64>,
    pub reviewed: bool,
    pub created_at: String,
}

impl AlgorithmProblem {
    /// Reviewed with a timed, positive re-attempt.
    pub fn is_re_solved(&self) -> bool {
        self.reviewed && self.second_solve_seconds.is_some_and(|s| s > 0)
    }

    /// Reviewed without any second attempt: solved within budget the first time.
    pub fn is_one_shot(&self) -> bool {
        self.reviewed && !self.is_re_solved()
    }

    /// First 8 characters of the id, enough to pick a problem in the shell.
    pub fn short_id(&self) -> &str {
        self.id.get(..8).unwrap_or(&self.id)
    }
}

fn date_column(row: &Row<'_>, column: &str) -> rusqlite::Result<NaiveDate> {
    let raw: String = row.get(column)?;
    parse_date(&raw).ok_or_else(|| conversion_error(AppError::InvalidDate(raw.clone())))
}

impl Record for AlgorithmProblem {
    const TABLE: &'static str = "algorithm_problems";
    const COLUMNS: &'static [&'static str] = &[
        "id",
        "device_id",
        "problem_name",
        "category",
        "link",
        "solved_at",
        "review_by",
        "first_solve_seconds",
        "second_solve_seconds",
        "reviewed",
        "created_at",
    ];

    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(AlgorithmProblem {
            id: row.get("id")?,
            device_id: row.get("device_id")?,
            problem_name: row.get("problem_name")?,
            category: row.get("category")?,
            link: row.get("link")?,
            solved_at: date_column(row, "solved_at")?,
            review_by: date_column(row, "review_by")?,
            first_solve_seconds: row.get("first_solve_seconds")?,
            second_solve_seconds: row.get("second_solve_seconds")?,
            reviewed: row.get("reviewed")?,
            created_at: row.get("created_at")?,
        })
    }
}

/// Insert payload for a problem whose first attempt has just been timed.
#[derive(Debug, Clone, PartialEq)]
pub struct NewProblem {
    pub device_id: String,
    pub problem_name: String,
    pub category: String,
    pub link: Option<String>,
    pub solved_at: NaiveDate,
    pub review_by: NaiveDate,
    pub first_solve_seconds: Option<i64>,
    pub second_solve_seconds: Option<i64>,
    pub reviewed: bool,
}

impl NewProblem {
    /// Untimed, unreviewed problem due for review on `review_by`.
    pub fn new(
        device_id: &str,
        problem_name: &str,
        category: &str,
        solved_at: NaiveDate,
        review_by: NaiveDate,
    ) -> Self {
        Self {
            device_id: device_id.to_string(),
            problem_name: problem_name.to_string(),
            category: category.to_string(),
            link: None,
            solved_at,
            review_by,
            first_solve_seconds: None,
            second_solve_seconds: None,
            reviewed: false,
        }
    }
}

impl Payload for NewProblem {
    fn fields(&self) -> Vec<(&'static str, Value)> {
        vec![
            ("device_id", Value::Text(self.device_id.clone())),
            ("problem_name", Value::Text(self.problem_name.clone())),
            ("category", Value::Text(self.category.clone())),
            ("link", opt_text(self.link.as_deref())),
            ("solved_at", Value::Text(self.solved_at.format(DB_DATE_FMT).to_string())),
            ("review_by", Value::Text(self.review_by.format(DB_DATE_FMT).to_string())),
            ("first_solve_seconds", opt_int(self.first_solve_seconds)),
            ("second_solve_seconds", opt_int(self.second_solve_seconds)),
            ("reviewed", Value::Integer(i64::from(self.reviewed))),
        ]
    }
}

/// Partial update of a problem. Only fields set to `Some` are written.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProblemPatch {
    pub second_solve_seconds: Option<i64>,
    pub reviewed: Option<bool>,
}

impl ProblemPatch {
    /// A timed review attempt has finished.
    pub fn review_completed(second_solve_seconds: i64) -> Self {
        Self {
            second_solve_seconds: Some(second_solve_seconds),
            reviewed: Some(true),
        }
    }
}

impl Payload for ProblemPatch {
    fn fields(&self) -> Vec<(&'static str, Value)> {
        let mut out = Vec::new();
        if let Some(secs) = self.second_solve_seconds {
            out.push(("second_solve_seconds", Value::Integer(secs)));
        }
        if let Some(reviewed) = self.reviewed {
            out.push(("reviewed", Value::Integer(i64::from(reviewed))));
        }
        out
    }
}
