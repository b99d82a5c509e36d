//! Text views of sessions, totals and the problem board.
//!
//! Every function returns the rendered text; callers decide where it goes.

use crate::config::Config;
use crate::core::review::{ProblemBoard, classify};
use crate::core::totals::{CategoryTotals, Progress, derive_totals, recent_for};
use crate::errors::AppResult;
use crate::models::category::Category;
use crate::models::problem::AlgorithmProblem;
use crate::models::session::SessionRow;
use crate::utils::colors::{CYAN, GREEN, RESET, colorize_due, colorize_optional};
use crate::utils::formatting::{
    bold, format_accumulated, format_optional_seconds, format_started_at,
};
use crate::utils::table::Table;
use chrono::{FixedOffset, NaiveDate};

const BAR_WIDTH: usize = 30;

/// Display settings taken from the configuration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewSettings {
    pub offset: FixedOffset,
    pub board_limit: usize,
    pub recent_sessions: usize,
    pub target_hours: u32,
}

impl ViewSettings {
    pub fn from_config(cfg: &Config) -> AppResult<Self> {
        Ok(Self {
            offset: cfg.offset()?,
            board_limit: cfg.board_limit,
            recent_sessions: cfg.recent_sessions,
            target_hours: cfg.target_hours,
        })
    }
}

/// Full overview, recomputed from the fetched rows.
pub fn status(
    sessions: &[SessionRow],
    problems: &[AlgorithmProblem],
    view: &ViewSettings,
    today: NaiveDate,
) -> String {
    let sums = derive_totals(sessions);
    let progress = Progress::new(sums.total(), view.target_hours);

    let mut out = totals(&sums, &progress);
    out.push('\n');
    for category in Category::ALL {
        let rows = recent_for(sessions, category, view.recent_sessions);
        out.push_str(&recent(category, &rows, view.offset));
    }
    out.push('\n');
    out.push_str(&board(&classify(problems, view.board_limit), today));
    out
}

pub fn totals(totals: &CategoryTotals, progress: &Progress) -> String {
    let mut out = String::new();
    out.push_str(&bold("Study time"));
    out.push('\n');

    for (category, secs) in totals.iter() {
        out.push_str(&format!(
            "  {:<16} {}\n",
            category.label(),
            colorize_optional(&format_accumulated(secs))
        ));
    }
    out.push_str(&format!(
        "  {:<16} {}{}{}\n",
        "Total",
        GREEN,
        format_accumulated(totals.total()),
        RESET
    ));
    out.push_str(&format!(
        "  {} {:.1}h / {}h ({:.1}%)\n",
        progress.bar(BAR_WIDTH),
        progress.hours,
        progress.target_hours,
        progress.percent
    ));
    out
}

/// Recent sessions of one category, "2/21 14:30 · 1h 05m · note".
pub fn recent(category: Category, sessions: &[&SessionRow], offset: FixedOffset) -> String {
    let mut out = format!("{}{}{}\n", CYAN, category.label(), RESET);
    if sessions.is_empty() {
        out.push_str(&colorize_optional("  --"));
        out.push('\n');
        return out;
    }

    for s in sessions {
        out.push_str(&format!(
            "  {} · {}",
            format_started_at(&s.started_at, offset),
            format_accumulated(s.duration_seconds)
        ));
        if let Some(desc) = &s.description {
            out.push_str(&format!(" · {desc}"));
        }
        out.push('\n');
    }
    out
}

pub fn sessions_table(sessions: &[SessionRow], offset: FixedOffset) -> String {
    let mut table = Table::new(&["ID", "STARTED", "CATEGORY", "TIME", "NOTE"]);
    for s in sessions {
        table.add_row(vec![
            s.id.get(..8).unwrap_or(&s.id).to_string(),
            format_started_at(&s.started_at, offset),
            s.category.label().to_string(),
            format_accumulated(s.duration_seconds),
            colorize_optional(s.description.as_deref().unwrap_or("--")),
        ]);
    }
    table.render()
}

fn problem_rows(table: &mut Table, problems: &[&AlgorithmProblem], today: NaiveDate) {
    for p in problems {
        table.add_row(vec![
            p.short_id().to_string(),
            p.problem_name.clone(),
            p.category.clone(),
            p.solved_at.to_string(),
            colorize_due(&p.review_by.to_string(), !p.reviewed && p.review_by <= today),
            colorize_optional(&format_optional_seconds(p.first_solve_seconds)),
            colorize_optional(&format_optional_seconds(p.second_solve_seconds)),
        ]);
    }
}

const PROBLEM_HEADERS: [&str; 7] = [
    "ID", "PROBLEM", "TYPE", "SOLVED", "REVIEW BY", "FIRST", "SECOND",
];

pub fn problems_table(problems: &[&AlgorithmProblem], today: NaiveDate) -> String {
    let mut table = Table::new(&PROBLEM_HEADERS);
    problem_rows(&mut table, problems, today);
    table.render()
}

pub fn board(board: &ProblemBoard<'_>, today: NaiveDate) -> String {
    let sections: [(&str, &[&AlgorithmProblem]); 3] = [
        ("To review", &board.to_review),
        ("One-shot", &board.one_shot),
        ("Re-solved", &board.re_solved),
    ];

    let mut out = String::new();
    for (title, problems) in sections {
        out.push_str(&format!("{} ({})\n", bold(title), problems.len()));
        if problems.is_empty() {
            out.push_str(&colorize_optional("  --"));
            out.push_str("\n\n");
        } else {
            out.push_str(&problems_table(problems, today));
            out.push('\n');
        }
    }
    out
}
