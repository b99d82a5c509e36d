use crate::db::log::audit;
use crate::errors::AppResult;
use crate::ui::messages::success;
use rusqlite::{Connection, OptionalExtension, Result};

/// One schema step. Applied steps are recorded in the `log` table as
/// `migration_applied` with the version as target.
struct Migration {
    version: &'static str,
    description: &'static str,
    sql: &'static str,
}

const MIGRATIONS: &[Migration] = &[
    Migration {
        version: "20260221_0001_create_sessions",
        description: "Created sessions table",
        sql: r#"
        CREATE TABLE IF NOT EXISTS sessions (
            id               TEXT PRIMARY KEY,
            device_id        TEXT NOT NULL,
            category         TEXT NOT NULL CHECK(category IN ('cs','algorithm','silmu')),
            started_at       TEXT NOT NULL,
            duration_seconds INTEGER NOT NULL CHECK(duration_seconds >= 0),
            description      TEXT,
            created_at       TEXT NOT NULL
        );

        CREATE INDEX IF NOT EXISTS idx_sessions_device_started ON sessions(device_id, started_at);
        "#,
    },
    Migration {
        version: "20260221_0002_create_algorithm_problems",
        description: "Created algorithm_problems table",
        sql: r#"
        CREATE TABLE IF NOT EXISTS algorithm_problems (
            id           TEXT PRIMARY KEY,
            device_id    TEXT NOT NULL,
            problem_name TEXT NOT NULL,
            category     TEXT NOT NULL,
            link         TEXT,
            solved_at    TEXT NOT NULL,
            review_by    TEXT NOT NULL,
            reviewed     INTEGER NOT NULL DEFAULT 0,
            created_at   TEXT NOT NULL
        );

        CREATE INDEX IF NOT EXISTS idx_problems_device_review ON algorithm_problems(device_id, review_by);
        "#,
    },
    Migration {
        version: "20260224_0003_add_solve_seconds",
        description: "Added first/second solve times to algorithm_problems",
        sql: r#"
        ALTER TABLE algorithm_problems
            ADD COLUMN first_solve_seconds INTEGER CHECK(first_solve_seconds >= 0);
        ALTER TABLE algorithm_problems
            ADD COLUMN second_solve_seconds INTEGER CHECK(second_solve_seconds >= 0);
        "#,
    },
];

/// Ensure that the `log` table exists.
fn ensure_log_table(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS log (
            id        INTEGER PRIMARY KEY AUTOINCREMENT,
            date      TEXT NOT NULL,
            operation TEXT NOT NULL,
            target    TEXT DEFAULT '',
            message   TEXT NOT NULL
        );
        "#,
    )?;
    Ok(())
}

fn is_applied(conn: &Connection, version: &str) -> Result<bool> {
    let mut chk = conn.prepare(
        "SELECT 1 FROM log
         WHERE operation = 'migration_applied' AND target = ?1
         LIMIT 1",
    )?;
    Ok(chk.query_row([version], |_| Ok(())).optional()?.is_some())
}

/// Versions already applied, oldest first.
pub fn applied_migrations(conn: &Connection) -> AppResult<Vec<String>> {
    ensure_log_table(conn)?;
    let mut stmt = conn.prepare(
        "SELECT target FROM log WHERE operation = 'migration_applied' ORDER BY id ASC",
    )?;
    let rows = stmt.query_map([], |row| row.get::<_, String>(0))?;

    let mut out = Vec::new();
    for r in rows {
        out.push(r?);
    }
    Ok(out)
}

/// Public entry point: run all pending migrations, each in its own
/// transaction. Returns the versions applied by this call.
pub fn run_pending_migrations(conn: &Connection) -> AppResult<Vec<&'static str>> {
    ensure_log_table(conn)?;

    let mut applied = Vec::new();
    for m in MIGRATIONS {
        if is_applied(conn, m.version)? {
            continue;
        }

        let tx = conn.unchecked_transaction()?;
        tx.execute_batch(m.sql)?;
        audit(&tx, "migration_applied", m.version, m.description)?;
        tx.commit()?;

        success(format!("Migration applied: {} → {}", m.version, m.description));
        applied.push(m.version);
    }

    Ok(applied)
}
