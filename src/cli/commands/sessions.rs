use crate::cli::parser::Commands;
use crate::config::Config;
use crate::db::pool::DbPool;
use crate::errors::AppResult;
use crate::identity::resolve_device_id;
use crate::queries::SessionQueries;
use crate::ui::messages::info;
use crate::ui::render;

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Sessions { category, limit } = cmd {
        let offset = cfg.offset()?;
        let pool = DbPool::new(cfg.database_path())?;
        let device_id = resolve_device_id(cfg)?;

        let rows: Vec<_> = SessionQueries::new(&pool.conn)
            .sessions(&device_id)?
            .into_iter()
            .filter(|s| category.is_none_or(|c| s.category == c))
            .take(limit.unwrap_or(usize::MAX))
            .collect();

        if rows.is_empty() {
            info("No sessions recorded.");
            return Ok(());
        }

        print!("{}", render::sessions_table(&rows, offset));
    }

    Ok(())
}
