use crate::cli::parser::Cli;
use crate::config::Config;
use crate::db::log::audit_quietly;
use crate::db::pool::DbPool;
use crate::errors::AppResult;
use crate::identity::resolve_device_id;
use crate::ui::messages::{success, warning};

/// Handle the `init` command
///
/// This initializes:
///  - the config directory (if missing)
///  - the configuration file (not in test mode)
///  - the SQLite database with all pending migrations
///  - the device identity file
pub fn handle(cli: &Cli, cfg: &Config) -> AppResult<()> {
    cfg.init_all(cli.test)?;

    let db_path = cfg.database_path();

    println!("⚙️  Initializing rStudylog…");
    if !cli.test {
        println!("📄 Config file : {}", Config::config_file().display());
    }
    println!("🗄️  Database   : {}", db_path.display());

    let pool = DbPool::new(&db_path)?;
    success(format!("Database initialized at {}", db_path.display()));

    let device_id = resolve_device_id(cfg)?;
    if device_id.is_empty() {
        warning("Identity file disabled: sessions and problems cannot be saved.");
    } else {
        println!("🔑 Device id  : {}", device_id);
    }

    audit_quietly(
        &pool.conn,
        "init",
        &db_path.to_string_lossy(),
        "Database initialized",
    );

    println!("🎉 rStudylog initialization completed!");
    Ok(())
}
