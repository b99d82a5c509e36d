//! Unified application error type.
//! All modules (store, queries, core, cli, utils) return AppError to keep the
//! error handling consistent and easy to manage.

use crate::core::timer::TimerPhase;
use crate::store::StorageError;
use chrono::NaiveDate;
use std::io;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    // ---------------------------
    // IO / serialization
    // ---------------------------
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    // ---------------------------
    // Storage
    // ---------------------------
    #[error("Database error: {0}")]
    Db(#[from] rusqlite::Error),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    // ---------------------------
    // Identity
    // ---------------------------
    #[error("Device identity is not available: nothing can be saved")]
    IdentityUnavailable,

    // ---------------------------
    // Timer / scheduler rules
    // ---------------------------
    #[error("Cannot {action} while the timer is {phase}")]
    InvalidTransition {
        action: &'static str,
        phase: TimerPhase,
    },

    #[error("Another {0} timer is already active")]
    TimerBusy(&'static str),

    #[error("Problem {id} is not due for review until {due}")]
    ReviewNotDue { id: String, due: NaiveDate },

    #[error("Problem {0} has already been reviewed")]
    AlreadyReviewed(String),

    #[error("Problem not found: {0}")]
    ProblemNotFound(String),

    #[error("Session not found: {0}")]
    SessionNotFound(String),

    #[error("Id prefix '{0}' matches more than one row")]
    AmbiguousId(String),

    #[error("Missing required field: {0}")]
    MissingField(&'static str),

    // ---------------------------
    // Parsing errors
    // ---------------------------
    #[error("{0}")]
    Usage(String),

    #[error("Invalid category: {0} (expected cs, algorithm or silmu)")]
    InvalidCategory(String),

    #[error("Invalid date format: {0}")]
    InvalidDate(String),

    #[error("Invalid UTC offset: {0} (expected e.g. +09:00)")]
    InvalidOffset(String),

    // ---------------------------
    // Config errors
    // ---------------------------
    #[error("Configuration error: {0}")]
    Config(String),

    // ---------------------------
    // Export errors
    // ---------------------------
    #[error("Export error: {0}")]
    Export(String),

    // ---------------------------
    // Generic fallback
    // ---------------------------
    #[error("Internal error: {0}")]
    Other(String),
}

pub type AppResult<T> = Result<T, AppError>;
