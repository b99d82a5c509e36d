use crate::cli::shell::{ShellFlow, StudyShell};
use crate::config::Config;
use crate::db::pool::DbPool;
use crate::errors::AppResult;
use crate::identity::resolve_device_id;
use crate::ui::messages::{error, info, warning};
use crate::ui::render::ViewSettings;
use chrono::Utc;
use std::io::{self, BufRead, Write};

/// Run the interactive timer shell until `quit` or end of input.
pub fn handle(cfg: &Config) -> AppResult<()> {
    let view = ViewSettings::from_config(cfg)?;
    let pool = DbPool::new(cfg.database_path())?;
    let device_id = resolve_device_id(cfg)?;

    if device_id.is_empty() {
        warning("Device identity unavailable: timers run but nothing can be saved.");
    }

    let mut shell = StudyShell::new(&pool.conn, &device_id, view, cfg.review_policy());

    info("rStudylog shell. Type 'help' for commands, 'quit' to leave.");
    let due = shell.due_now(Utc::now())?;
    if due > 0 {
        info(format!("{due} problem(s) due for review."));
    }

    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();

    loop {
        print!("{}", shell.prompt(Utc::now()));
        io::stdout().flush()?;

        let Some(line) = lines.next() else {
            println!();
            shell.execute_line("quit", Utc::now())?;
            break;
        };

        match shell.execute_line(&line?, Utc::now()) {
            Ok(ShellFlow::Quit) => break,
            Ok(ShellFlow::Continue) => {}
            Err(e) => error(e),
        }
    }

    Ok(())
}
