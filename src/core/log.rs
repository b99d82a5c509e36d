//! Printing of the internal audit log.

use crate::db::pool::DbPool;
use crate::errors::AppResult;
use crate::utils::formatting::strip_ansi;
use ansi_term::Colour;
use rusqlite::Connection;

const OPERATION_WIDTH: usize = 48;

#[derive(Debug, Clone, PartialEq)]
pub struct LogEntry {
    pub id: i64,
    pub date: String,
    pub operation: String,
    pub target: String,
    pub message: String,
}

fn colour_for(operation: &str) -> Colour {
    match operation {
        "session_add" => Colour::Green,
        "problem_add" => Colour::Cyan,
        "review_done" => Colour::Yellow,
        "del" => Colour::Red,
        "migration_applied" => Colour::Purple,
        "backup" | "export" => Colour::Blue,
        "init" => Colour::RGB(255, 153, 51),
        _ => Colour::White,
    }
}

/// Shorten `s` to at most `max` characters, marking the cut with "...".
fn ellipsize(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        return s.to_string();
    }
    let mut out: String = s.chars().take(max.saturating_sub(3)).collect();
    out.push_str("...");
    out
}

pub fn load_entries(conn: &Connection) -> AppResult<Vec<LogEntry>> {
    let mut stmt = conn.prepare_cached(
        "SELECT id, date, operation, target, message FROM log ORDER BY id ASC",
    )?;

    let rows = stmt.query_map([], |row| {
        let raw_date: String = row.get(1)?;
        let date = chrono::DateTime::parse_from_rfc3339(&raw_date)
            .map(|dt| dt.format("%F %T").to_string())
            .unwrap_or(raw_date);

        Ok(LogEntry {
            id: row.get(0)?,
            date,
            operation: row.get(2)?,
            target: row.get::<_, Option<String>>(3)?.unwrap_or_default(),
            message: row.get(4)?,
        })
    })?;

    Ok(rows.collect::<Result<Vec<_>, _>>()?)
}

/// One aligned, colored line per entry.
pub fn format_entries(entries: &[LogEntry]) -> Vec<String> {
    let id_w = entries
        .iter()
        .map(|e| e.id.to_string().len())
        .max()
        .unwrap_or(1);
    let date_w = entries.iter().map(|e| e.date.len()).max().unwrap_or(10);

    entries
        .iter()
        .map(|e| {
            let mut cell = colour_for(&e.operation).paint(e.operation.as_str()).to_string();
            if !e.target.is_empty() {
                let room = OPERATION_WIDTH.saturating_sub(e.operation.len() + 3);
                cell.push_str(&format!(" ({})", ellipsize(&e.target, room)));
            }
            let visible = strip_ansi(&cell).chars().count();
            let padding = " ".repeat(OPERATION_WIDTH.saturating_sub(visible));

            format!(
                "{:>id_w$}: {:<date_w$} | {}{} => {}",
                e.id, e.date, cell, padding, e.message
            )
        })
        .collect()
}

pub struct LogLogic;

impl LogLogic {
    pub fn print_log(pool: &DbPool) -> AppResult<()> {
        let entries = load_entries(&pool.conn)?;

        if entries.is_empty() {
            println!("📜 Internal log is empty.");
            return Ok(());
        }

        println!("📜 Internal log:\n");
        for line in format_entries(&entries) {
            println!("{line}");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::log::audit;

    #[test]
    fn migrations_and_writes_are_listed_in_order() {
        let pool = DbPool::open_in_memory().unwrap();
        audit(&pool.conn, "session_add", "abc", "cs session of 12m").unwrap();

        let entries = load_entries(&pool.conn).unwrap();
        let last = entries.last().unwrap();

        assert_eq!(entries[0].operation, "migration_applied");
        assert_eq!(last.operation, "session_add");
        assert_eq!(last.target, "abc");
    }

    #[test]
    fn message_column_is_aligned() {
        let entry = |id, target: &str| LogEntry {
            id,
            date: "2026-02-21 14:00:00".into(),
            operation: "del".into(),
            target: target.into(),
            message: "m".into(),
        };
        let long = "x".repeat(200);
        let lines = format_entries(&[entry(1, ""), entry(22, &long)]);

        let arrows: Vec<usize> = lines
            .iter()
            .map(|l| strip_ansi(l).find(" => ").unwrap())
            .collect();
        assert_eq!(arrows[0], arrows[1]);
        assert!(strip_ansi(&lines[1]).contains("..."));
    }
}
