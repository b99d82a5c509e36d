//! Interactive timer shell.
//!
//! Timer state only lives as long as the shell. Every line is parsed with
//! clap and executed against an injected `now`, so the shell can be driven
//! by tests with a fake clock.

use crate::cli::parser::{ReviewAction, ShellCommand, ShellLine, SolveAction};
use crate::core::review::{ProblemDraft, ReviewPolicy, ReviewScheduler, classify, due_for_review};
use crate::core::session_timer::SessionTimer;
use crate::core::timer::TimerPhase;
use crate::errors::{AppError, AppResult};
use crate::queries::{ProblemQueries, SessionQueries};
use crate::ui::messages::{info, success, warning};
use crate::ui::render::{self, ViewSettings};
use crate::utils::date::date_in;
use crate::utils::formatting::{format_accumulated, format_elapsed};
use chrono::{DateTime, NaiveDate, Utc};
use clap::Parser;
use clap::error::ErrorKind;
use rusqlite::Connection;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShellFlow {
    Continue,
    Quit,
}

/// Split a line into words. Single or double quotes group words.
pub fn tokenize(line: &str) -> AppResult<Vec<String>> {
    let mut words = Vec::new();
    let mut current = String::new();
    let mut in_word = false;
    let mut quote: Option<char> = None;

    for c in line.chars() {
        match quote {
            Some(q) if c == q => quote = None,
            Some(_) => current.push(c),
            None if c == '"' || c == '\'' => {
                quote = Some(c);
                in_word = true;
            }
            None if c.is_whitespace() => {
                if in_word {
                    words.push(std::mem::take(&mut current));
                    in_word = false;
                }
            }
            None => {
                current.push(c);
                in_word = true;
            }
        }
    }

    if quote.is_some() {
        return Err(AppError::Usage("unterminated quote".into()));
    }
    if in_word {
        words.push(current);
    }
    Ok(words)
}

pub struct StudyShell<'c> {
    device_id: String,
    view: ViewSettings,
    sessions: SessionQueries<'c>,
    problems: ProblemQueries<'c>,
    timer: SessionTimer,
    scheduler: ReviewScheduler,
}

impl<'c> StudyShell<'c> {
    pub fn new(
        conn: &'c Connection,
        device_id: &str,
        view: ViewSettings,
        policy: ReviewPolicy,
    ) -> Self {
        Self {
            device_id: device_id.to_string(),
            view,
            sessions: SessionQueries::new(conn),
            problems: ProblemQueries::new(conn),
            timer: SessionTimer::new(),
            scheduler: ReviewScheduler::new(policy),
        }
    }

    pub fn timer(&self) -> &SessionTimer {
        &self.timer
    }

    pub fn scheduler(&self) -> &ReviewScheduler {
        &self.scheduler
    }

    pub fn sessions(&mut self) -> &mut SessionQueries<'c> {
        &mut self.sessions
    }

    pub fn problems(&mut self) -> &mut ProblemQueries<'c> {
        &mut self.problems
    }

    fn today(&self, now: DateTime<Utc>) -> NaiveDate {
        date_in(now, self.view.offset)
    }

    fn any_timer_active(&self) -> bool {
        self.timer.is_active()
            || self.scheduler.first_solve_phase() != TimerPhase::Idle
            || self.scheduler.review_phase() != TimerPhase::Idle
    }

    /// Prompt with the running timers, e.g. `[cs 00:12:03] > `.
    pub fn prompt(&self, now: DateTime<Utc>) -> String {
        let mut parts = Vec::new();

        if let Some(category) = self.timer.category() {
            let marker = if self.timer.phase() == TimerPhase::Paused {
                " paused"
            } else {
                ""
            };
            parts.push(format!(
                "{}{} {}",
                category,
                marker,
                format_elapsed(self.timer.elapsed_seconds(now))
            ));
        }
        if let Some(draft) = self.scheduler.draft() {
            parts.push(format!(
                "solve {} {}",
                draft.name,
                format_elapsed(self.scheduler.first_solve_elapsed(now))
            ));
        }
        if let Some(target) = self.scheduler.target() {
            parts.push(format!(
                "review {} {}",
                target.name,
                format_elapsed(self.scheduler.review_elapsed(now))
            ));
        }

        if parts.is_empty() {
            "> ".to_string()
        } else {
            format!("[{}] > ", parts.join(" | "))
        }
    }

    /// Parse and run one input line.
    pub fn execute_line(&mut self, line: &str, now: DateTime<Utc>) -> AppResult<ShellFlow> {
        let words = tokenize(line)?;
        if words.is_empty() {
            return Ok(ShellFlow::Continue);
        }

        let parsed = match ShellLine::try_parse_from(words) {
            Ok(parsed) => parsed,
            Err(e) if e.kind() == ErrorKind::DisplayHelp => {
                e.print()?;
                return Ok(ShellFlow::Continue);
            }
            Err(e) => return Err(AppError::Usage(e.to_string())),
        };
        self.execute(parsed.command, now)
    }

    pub fn execute(&mut self, command: ShellCommand, now: DateTime<Utc>) -> AppResult<ShellFlow> {
        match command {
            ShellCommand::Start { category } => {
                self.timer.start(category, now)?;
                success(format!("{} started", category.label()));
            }
            ShellCommand::Pause => {
                self.timer.pause(now)?;
                info(format!(
                    "Paused at {}",
                    format_elapsed(self.timer.elapsed_seconds(now))
                ));
            }
            ShellCommand::Resume => {
                self.timer.resume(now)?;
                info("Resumed");
            }
            ShellCommand::Stop { description } => self.stop_session(&description.join(" "), now)?,
            ShellCommand::Note { text } => {
                if !self.timer.is_active() {
                    return Err(AppError::InvalidTransition {
                        action: "note",
                        phase: self.timer.phase(),
                    });
                }
                self.timer.set_description(&text.join(" "));
            }
            ShellCommand::Solve { action } => self.solve(action, now)?,
            ShellCommand::Review { action } => self.review(action, now)?,
            ShellCommand::Status => {
                let sessions = self.sessions.sessions(&self.device_id)?;
                let problems = self.problems.problems(&self.device_id)?;
                print!(
                    "{}",
                    render::status(&sessions, &problems, &self.view, self.today(now))
                );
            }
            ShellCommand::Problems => {
                let problems = self.problems.problems(&self.device_id)?;
                let board = classify(&problems, self.view.board_limit);
                print!("{}", render::board(&board, self.today(now)));
            }
            ShellCommand::Quit => {
                if self.any_timer_active() {
                    warning("An active timer is discarded; its elapsed time is not saved.");
                }
                return Ok(ShellFlow::Quit);
            }
        }

        Ok(ShellFlow::Continue)
    }

    fn stop_session(&mut self, description: &str, now: DateTime<Utc>) -> AppResult<()> {
        let previous = self.timer.description().to_string();
        if !description.trim().is_empty() {
            self.timer.set_description(description);
        }

        let stopped = match self.timer.stop(&self.device_id, now) {
            Ok(stopped) => stopped,
            Err(e) => {
                self.timer.set_description(&previous);
                return Err(e);
            }
        };

        match stopped {
            Some(session) => {
                let row = self.sessions.save_session(&session)?;
                success(format!(
                    "Saved {} of {}",
                    format_accumulated(row.duration_seconds),
                    row.category.label()
                ));
            }
            None => info("Nothing recorded: no running time."),
        }
        Ok(())
    }

    fn solve(&mut self, action: SolveAction, now: DateTime<Utc>) -> AppResult<()> {
        match action {
            SolveAction::Start {
                name,
                category,
                link,
            } => {
                let draft = ProblemDraft::new(&name, &category, link.as_deref())?;
                self.scheduler.start_first_solve(draft, now)?;
                success(format!("Solving '{}'", name.trim()));
            }
            SolveAction::Pause => self.scheduler.pause_first_solve(now)?,
            SolveAction::Resume => self.scheduler.resume_first_solve(now)?,
            SolveAction::Stop => {
                let today = self.today(now);
                match self
                    .scheduler
                    .stop_first_solve(&self.device_id, today, now)?
                {
                    Some(problem) => {
                        let row = self.problems.add_problem(&problem)?;
                        if row.reviewed {
                            success(format!("'{}' solved in one shot", row.problem_name));
                        } else {
                            success(format!(
                                "'{}' saved, review on {} (id {})",
                                row.problem_name,
                                row.review_by,
                                row.short_id()
                            ));
                        }
                    }
                    None => info("Nothing recorded: no running time."),
                }
            }
        }
        Ok(())
    }

    fn review(&mut self, action: ReviewAction, now: DateTime<Utc>) -> AppResult<()> {
        match action {
            ReviewAction::Start { id } => {
                let today = self.today(now);
                let problem = self.problems.resolve(&self.device_id, &id)?;
                self.scheduler.start_review(&problem, today, now)?;
                success(format!("Reviewing '{}'", problem.problem_name));
            }
            ReviewAction::Pause => self.scheduler.pause_review(now)?,
            ReviewAction::Resume => self.scheduler.resume_review(now)?,
            ReviewAction::Stop => match self.scheduler.stop_review(now)? {
                Some(done) => {
                    let row = self.problems.update_problem(&done.problem_id, &done.patch())?;
                    success(format!(
                        "'{}' re-solved in {}",
                        row.problem_name,
                        format_accumulated(done.second_solve_seconds)
                    ));
                }
                None => info("Nothing recorded: no running time."),
            },
        }
        Ok(())
    }

    /// Problems whose review can start at `now`.
    pub fn due_now(&mut self, now: DateTime<Utc>) -> AppResult<usize> {
        let today = self.today(now);
        let problems = self.problems.problems(&self.device_id)?;
        Ok(due_for_review(&problems, today).len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tokenize_groups_quoted_words() {
        assert_eq!(
            tokenize(r#"solve start "two sum" 'hash map' --link x"#).unwrap(),
            vec!["solve", "start", "two sum", "hash map", "--link", "x"]
        );
        assert_eq!(tokenize("  ").unwrap(), Vec::<String>::new());
        assert_eq!(tokenize(r#"note """#).unwrap(), vec!["note", ""]);
        assert!(tokenize(r#"note "open"#).is_err());
    }

    #[test]
    fn help_is_not_an_error() {
        let pool = crate::db::pool::DbPool::open_in_memory().unwrap();
        let mut sh = StudyShell::new(
            &pool.conn,
            "dev",
            ViewSettings {
                offset: chrono::FixedOffset::east_opt(9 * 3600).unwrap(),
                board_limit: 5,
                recent_sessions: 8,
                target_hours: 1000,
            },
            ReviewPolicy::default(),
        );
        let now = Utc::now();

        assert_eq!(sh.execute_line("help", now).unwrap(), ShellFlow::Continue);
        assert_eq!(sh.execute_line("--help", now).unwrap(), ShellFlow::Continue);
        assert_eq!(sh.execute_line("help solve", now).unwrap(), ShellFlow::Continue);
        assert!(matches!(
            sh.execute_line("frobnicate", now),
            Err(AppError::Usage(_))
        ));
    }
}
