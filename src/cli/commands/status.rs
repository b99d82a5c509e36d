use crate::config::Config;
use crate::db::pool::DbPool;
use crate::errors::AppResult;
use crate::identity::resolve_device_id;
use crate::queries::{ProblemQueries, SessionQueries};
use crate::ui::messages::{header, warning};
use crate::ui::render::{self, ViewSettings};
use crate::utils::date::today_in;

pub fn handle(cfg: &Config) -> AppResult<()> {
    let view = ViewSettings::from_config(cfg)?;
    let pool = DbPool::new(cfg.database_path())?;
    let device_id = resolve_device_id(cfg)?;

    if device_id.is_empty() {
        warning("Device identity unavailable: nothing to show.");
    }

    let sessions = SessionQueries::new(&pool.conn).sessions(&device_id)?;
    let problems = ProblemQueries::new(&pool.conn).problems(&device_id)?;

    header("rStudylog status");
    print!(
        "{}",
        render::status(&sessions, &problems, &view, today_in(view.offset))
    );
    Ok(())
}
