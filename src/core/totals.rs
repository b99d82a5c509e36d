//! Aggregates derived from the fetched session rows on every render.

use crate::models::category::Category;
use crate::models::session::SessionRow;

/// Seconds per category. Categories without rows are zero.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CategoryTotals([i64; 3]);

impl CategoryTotals {
    pub fn get(&self, category: Category) -> i64 {
        self.0[category.index()]
    }

    pub fn total(&self) -> i64 {
        self.0.iter().sum()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Category, i64)> + '_ {
        Category::ALL.iter().map(|c| (*c, self.get(*c)))
    }
}

pub fn derive_totals(sessions: &[SessionRow]) -> CategoryTotals {
    let mut totals = [0i64; 3];
    for row in sessions {
        totals[row.category.index()] += row.duration_seconds;
    }
    CategoryTotals(totals)
}

/// Progress toward the overall study goal.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Progress {
    pub total_seconds: i64,
    pub target_hours: u32,
    pub hours: f64,
    /// 0..=100
    pub percent: f64,
}

impl Progress {
    pub fn new(total_seconds: i64, target_hours: u32) -> Self {
        let hours = total_seconds.max(0) as f64 / 3600.0;
        let percent = if target_hours == 0 {
            100.0
        } else {
            (hours / f64::from(target_hours) * 100.0).min(100.0)
        };

        Self {
            total_seconds,
            target_hours,
            hours,
            percent,
        }
    }

    /// Text progress bar of `width` cells.
    pub fn bar(&self, width: usize) -> String {
        let filled = ((self.percent / 100.0) * width as f64).round() as usize;
        let filled = filled.min(width);
        format!("[{}{}]", "#".repeat(filled), "-".repeat(width - filled))
    }
}

/// Most recent sessions of one category, assuming rows are newest first.
pub fn recent_for(sessions: &[SessionRow], category: Category, limit: usize) -> Vec<&SessionRow> {
    sessions
        .iter()
        .filter(|s| s.category == category)
        .take(limit)
        .collect()
}
