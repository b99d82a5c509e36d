use crate::cli::parser::Commands;
use crate::config::Config;
use crate::db::pool::DbPool;
use crate::errors::AppResult;
use crate::identity::resolve_device_id;
use crate::queries::{ProblemQueries, SessionQueries};
use crate::ui::messages::{info, success, warning};
use crate::ui::prompt::confirm;

/// Ask a yes/no confirmation from the user
fn ask_confirmation(prompt: &str, yes: bool) -> AppResult<bool> {
    if yes {
        return Ok(true);
    }
    warning(prompt);
    confirm("Confirm")
}

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    let Commands::Del {
        session,
        problem,
        yes,
    } = cmd
    else {
        return Ok(());
    };

    let pool = DbPool::new(cfg.database_path())?;
    let device_id = resolve_device_id(cfg)?;

    if let Some(prefix) = problem {
        let mut queries = ProblemQueries::new(&pool.conn);
        let target = queries.resolve(&device_id, prefix)?;

        let prompt = format!(
            "Delete problem '{}' ({})? This action is irreversible.",
            target.problem_name,
            target.short_id()
        );
        if !ask_confirmation(&prompt, *yes)? {
            info("Operation cancelled.");
            return Ok(());
        }

        if queries.delete_problem(&target.id)? {
            success(format!("Problem '{}' has been deleted.", target.problem_name));
        }
    } else if let Some(prefix) = session {
        let mut queries = SessionQueries::new(&pool.conn);
        let target = queries.resolve(&device_id, prefix)?;

        let prompt = format!(
            "Delete {} session {}? This action is irreversible.",
            target.category.label(),
            &target.id
        );
        if !ask_confirmation(&prompt, *yes)? {
            info("Operation cancelled.");
            return Ok(());
        }

        if queries.delete_session(&target.id)? {
            success(format!("Session {} has been deleted.", target.id));
        }
    }

    Ok(())
}
