use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::review::{classify, due_for_review};
use crate::db::pool::DbPool;
use crate::errors::AppResult;
use crate::identity::resolve_device_id;
use crate::queries::ProblemQueries;
use crate::ui::messages::info;
use crate::ui::render;
use crate::utils::date::today_in;

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Problems { due } = cmd {
        let today = today_in(cfg.offset()?);
        let pool = DbPool::new(cfg.database_path())?;
        let device_id = resolve_device_id(cfg)?;
        let problems = ProblemQueries::new(&pool.conn).problems(&device_id)?;

        if *due {
            let list = due_for_review(&problems, today);
            if list.is_empty() {
                info("No problems due for review.");
            } else {
                print!("{}", render::problems_table(&list, today));
            }
        } else {
            print!("{}", render::board(&classify(&problems, cfg.board_limit), today));
        }
    }

    Ok(())
}
