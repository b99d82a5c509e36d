use crate::db::migrate::applied_migrations;
use crate::db::pool::DbPool;
use crate::errors::AppResult;
use crate::utils::colors::{CYAN, GREEN, GREY, RESET, YELLOW};
use rusqlite::OptionalExtension;
use std::fs;

fn count(pool: &DbPool, table: &str) -> rusqlite::Result<i64> {
    pool.conn
        .query_row(&format!("SELECT COUNT(*) FROM {table}"), [], |row| row.get(0))
}

pub fn print_db_info(pool: &DbPool, db_path: &str) -> AppResult<()> {
    println!();

    //
    // 1) FILE SIZE
    //
    let file_size = fs::metadata(db_path).map(|m| m.len()).unwrap_or(0);
    let file_mb = (file_size as f64) / (1024.0 * 1024.0);

    println!("{}• File:{} {}{}{}", CYAN, RESET, YELLOW, db_path, RESET);
    println!("{}• Size:{} {:.2} MB", CYAN, RESET, file_mb);

    //
    // 2) ROW COUNTS
    //
    let sessions = count(pool, "sessions")?;
    let problems = count(pool, "algorithm_problems")?;
    let devices: i64 = pool.conn.query_row(
        "SELECT COUNT(DISTINCT device_id) FROM sessions",
        [],
        |row| row.get(0),
    )?;

    println!("{}• Sessions:{} {}{}{}", CYAN, RESET, GREEN, sessions, RESET);
    println!("{}• Problems:{} {}{}{}", CYAN, RESET, GREEN, problems, RESET);
    println!("{}• Devices:{} {}", CYAN, RESET, devices);

    //
    // 3) SESSION RANGE
    //
    let first: Option<String> = pool
        .conn
        .query_row(
            "SELECT started_at FROM sessions ORDER BY started_at ASC LIMIT 1",
            [],
            |row| row.get(0),
        )
        .optional()?;
    let last: Option<String> = pool
        .conn
        .query_row(
            "SELECT started_at FROM sessions ORDER BY started_at DESC LIMIT 1",
            [],
            |row| row.get(0),
        )
        .optional()?;

    println!("{}• Session range:{}", CYAN, RESET);
    println!(
        "    from: {}",
        first.unwrap_or_else(|| format!("{GREY}--{RESET}"))
    );
    println!(
        "    to:   {}",
        last.unwrap_or_else(|| format!("{GREY}--{RESET}"))
    );

    //
    // 4) SCHEMA
    //
    let migrations = applied_migrations(&pool.conn)?;
    println!(
        "{}• Migrations:{} {} applied{}",
        CYAN,
        RESET,
        migrations.len(),
        migrations
            .last()
            .map(|v| format!(" (latest {v})"))
            .unwrap_or_default()
    );

    println!();
    Ok(())
}
