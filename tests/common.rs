#![allow(dead_code)]
use assert_cmd::{Command, cargo_bin_cmd};
use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use rstudylog::db::pool::DbPool;
use rstudylog::models::category::Category;
use rstudylog::models::problem::NewProblem;
use rstudylog::models::session::NewSession;
use rstudylog::queries::{ProblemQueries, SessionQueries};
use std::env;
use std::fs;
use std::path::PathBuf;

pub fn rsl() -> Command {
    cargo_bin_cmd!("rstudylog")
}

fn temp_path(file: String) -> String {
    let mut path: PathBuf = env::temp_dir();
    path.push(file);
    let p = path.to_string_lossy().to_string();
    fs::remove_file(&p).ok();
    p
}

/// Create a unique test DB path inside the system temp dir and remove any existing file
pub fn setup_test_db(name: &str) -> String {
    temp_path(format!("{}_rstudylog.sqlite", name))
}

/// Fresh identity file path for one test
pub fn setup_identity(name: &str) -> String {
    temp_path(format!("{}_rstudylog_device.json", name))
}

/// Create a temporary output file path inside tempdir and ensure it's removed
pub fn temp_out(name: &str, ext: &str) -> String {
    temp_path(format!("{}_out.{}", name, ext))
}

/// `rstudylog --db <db> --identity <id> --test <args...>`
pub fn run_args<'a>(db: &'a str, identity: &'a str, args: &[&'a str]) -> Vec<&'a str> {
    let mut all = vec!["--db", db, "--identity", identity, "--test"];
    all.extend_from_slice(args);
    all
}

/// Run `init` and return the device id written to the identity file.
pub fn init(db: &str, identity: &str) -> String {
    rsl().args(run_args(db, identity, &["init"])).assert().success();

    let content = fs::read_to_string(identity).expect("identity file");
    let map: serde_json::Value = serde_json::from_str(&content).expect("identity json");
    map["timer_device_id"]
        .as_str()
        .expect("device id")
        .to_string()
}

pub fn at(y: i32, m: u32, d: u32, h: u32, min: u32, s: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(y, m, d, h, min, s).unwrap()
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

pub fn seed_session(
    db: &str,
    device_id: &str,
    category: Category,
    started_at: DateTime<Utc>,
    secs: i64,
    description: Option<&str>,
) {
    let pool = DbPool::new(db).expect("open db");
    SessionQueries::new(&pool.conn)
        .save_session(&NewSession {
            device_id: device_id.to_string(),
            category,
            started_at,
            duration_seconds: secs,
            description: description.map(str::to_string),
        })
        .expect("save session");
}

pub fn seed_problem(db: &str, problem: &NewProblem) -> String {
    let pool = DbPool::new(db).expect("open db");
    ProblemQueries::new(&pool.conn)
        .add_problem(problem)
        .expect("add problem")
        .id
}
