use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::export::{ExportLogic, ExportTarget};
use crate::db::pool::DbPool;
use crate::errors::AppResult;
use crate::identity::resolve_device_id;

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Export {
        format,
        file,
        problems,
        force,
    } = cmd
    {
        let pool = DbPool::new(cfg.database_path())?;
        let device_id = resolve_device_id(cfg)?;
        let target = if *problems {
            ExportTarget::Problems
        } else {
            ExportTarget::Sessions
        };
        ExportLogic::export(&pool.conn, &device_id, target, *format, file, *force)?;
    }
    Ok(())
}
