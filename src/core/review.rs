//! Algorithm problem timers and spaced review scheduling.
//!
//! A first attempt solved within the threshold is "one-shot" and never needs
//! review. A slower first attempt is scheduled for a timed re-attempt a few
//! calendar days later. The first-solve and review timers exclude each other.

use crate::core::timer::{Timer, TimerPhase};
use crate::errors::{AppError, AppResult};
use crate::models::problem::{AlgorithmProblem, NewProblem, ProblemPatch};
use chrono::{DateTime, Days, NaiveDate, Utc};
use std::cmp::Reverse;

pub const REVIEW_THRESHOLD_SECONDS: i64 = 40 * 60;
pub const REVIEW_DELAY_DAYS: u64 = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReviewPolicy {
    pub threshold_seconds: i64,
    pub delay_days: u64,
}

impl Default for ReviewPolicy {
    fn default() -> Self {
        Self {
            threshold_seconds: REVIEW_THRESHOLD_SECONDS,
            delay_days: REVIEW_DELAY_DAYS,
        }
    }
}

/// How a first attempt is recorded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FirstSolveOutcome {
    pub reviewed: bool,
    pub review_by: NaiveDate,
}

pub fn review_due_date(solved_at: NaiveDate, policy: &ReviewPolicy) -> NaiveDate {
    solved_at
        .checked_add_days(Days::new(policy.delay_days))
        .unwrap_or(NaiveDate::MAX)
}

/// `elapsed <= threshold` is one-shot; anything slower needs a review.
pub fn first_solve_outcome(
    elapsed_seconds: i64,
    solved_at: NaiveDate,
    policy: &ReviewPolicy,
) -> FirstSolveOutcome {
    if elapsed_seconds <= policy.threshold_seconds {
        FirstSolveOutcome {
            reviewed: true,
            review_by: solved_at,
        }
    } else {
        FirstSolveOutcome {
            reviewed: false,
            review_by: review_due_date(solved_at, policy),
        }
    }
}

pub fn is_review_eligible(problem: &AlgorithmProblem, today: NaiveDate) -> bool {
    !problem.reviewed && problem.review_by <= today
}

/// Problem being attempted for the first time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProblemDraft {
    pub name: String,
    pub category: String,
    pub link: Option<String>,
}

impl ProblemDraft {
    pub fn new(name: &str, category: &str, link: Option<&str>) -> AppResult<Self> {
        let name = name.trim();
        let category = category.trim();
        if name.is_empty() {
            return Err(AppError::MissingField("problem name"));
        }
        if category.is_empty() {
            return Err(AppError::MissingField("problem category"));
        }

        let link = link.map(str::trim).filter(|l| !l.is_empty());
        Ok(Self {
            name: name.to_string(),
            category: category.to_string(),
            link: link.map(str::to_string),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReviewTarget {
    pub id: String,
    pub name: String,
}

/// Result of a finished review attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReviewCompletion {
    pub problem_id: String,
    pub problem_name: String,
    pub second_solve_seconds: i64,
}

impl ReviewCompletion {
    pub fn patch(&self) -> ProblemPatch {
        ProblemPatch::review_completed(self.second_solve_seconds)
    }
}

#[derive(Debug, Clone, Default)]
pub struct ReviewScheduler {
    policy: ReviewPolicy,
    first: Timer,
    draft: Option<ProblemDraft>,
    review: Timer,
    target: Option<ReviewTarget>,
}

impl ReviewScheduler {
    pub fn new(policy: ReviewPolicy) -> Self {
        Self {
            policy,
            ..Self::default()
        }
    }

    pub fn policy(&self) -> &ReviewPolicy {
        &self.policy
    }

    pub fn first_solve_phase(&self) -> TimerPhase {
        self.first.phase()
    }

    pub fn review_phase(&self) -> TimerPhase {
        self.review.phase()
    }

    pub fn draft(&self) -> Option<&ProblemDraft> {
        self.draft.as_ref()
    }

    pub fn target(&self) -> Option<&ReviewTarget> {
        self.target.as_ref()
    }

    pub fn first_solve_elapsed(&self, now: DateTime<Utc>) -> i64 {
        self.first.elapsed_seconds(now)
    }

    pub fn review_elapsed(&self, now: DateTime<Utc>) -> i64 {
        self.review.elapsed_seconds(now)
    }

    /// Display refresh value of whichever timer is running.
    pub fn tick(&self, now: DateTime<Utc>) -> Option<i64> {
        self.first.tick(now).or_else(|| self.review.tick(now))
    }

    // ------------------------------------------------
    // First attempt
    // ------------------------------------------------

    pub fn start_first_solve(&mut self, draft: ProblemDraft, now: DateTime<Utc>) -> AppResult<()> {
        if self.review.is_active() {
            return Err(AppError::TimerBusy("review"));
        }
        self.first.start(now)?;
        self.draft = Some(draft);
        Ok(())
    }

    pub fn pause_first_solve(&mut self, now: DateTime<Utc>) -> AppResult<()> {
        self.first.pause(now)
    }

    pub fn resume_first_solve(&mut self, now: DateTime<Utc>) -> AppResult<()> {
        self.first.resume(now)
    }

    /// Stop the first attempt and build the problem record, dated `today`.
    /// `Ok(None)` means no running time was recorded.
    pub fn stop_first_solve(
        &mut self,
        device_id: &str,
        today: NaiveDate,
        now: DateTime<Utc>,
    ) -> AppResult<Option<NewProblem>> {
        if !self.first.is_active() {
            return Err(self.first.rejection("stop"));
        }
        if device_id.is_empty() {
            return Err(AppError::IdentityUnavailable);
        }

        let stopped = self.first.stop(now)?;
        let draft = self
            .draft
            .take()
            .ok_or_else(|| AppError::Other("active first-solve timer without problem".into()))?;

        let elapsed = stopped.elapsed_seconds;
        if elapsed <= 0 {
            return Ok(None);
        }

        let outcome = first_solve_outcome(elapsed, today, &self.policy);
        Ok(Some(NewProblem {
            device_id: device_id.to_string(),
            problem_name: draft.name,
            category: draft.category,
            link: draft.link,
            solved_at: today,
            review_by: outcome.review_by,
            first_solve_seconds: Some(elapsed),
            second_solve_seconds: None,
            reviewed: outcome.reviewed,
        }))
    }

    // ------------------------------------------------
    // Review attempt
    // ------------------------------------------------

    pub fn start_review(
        &mut self,
        problem: &AlgorithmProblem,
        today: NaiveDate,
        now: DateTime<Utc>,
    ) -> AppResult<()> {
        if self.first.is_active() {
            return Err(AppError::TimerBusy("first-solve"));
        }
        if self.review.is_active() {
            return Err(AppError::TimerBusy("review"));
        }
        if problem.reviewed {
            return Err(AppError::AlreadyReviewed(problem.id.clone()));
        }
        if !is_review_eligible(problem, today) {
            return Err(AppError::ReviewNotDue {
                id: problem.id.clone(),
                due: problem.review_by,
            });
        }

        self.review.start(now)?;
        self.target = Some(ReviewTarget {
            id: problem.id.clone(),
            name: problem.problem_name.clone(),
        });
        Ok(())
    }

    pub fn pause_review(&mut self, now: DateTime<Utc>) -> AppResult<()> {
        self.review.pause(now)
    }

    pub fn resume_review(&mut self, now: DateTime<Utc>) -> AppResult<()> {
        self.review.resume(now)
    }

    /// Stop the review attempt. `Ok(None)` means no running time was recorded.
    pub fn stop_review(&mut self, now: DateTime<Utc>) -> AppResult<Option<ReviewCompletion>> {
        let stopped = self.review.stop(now)?;
        let target = self
            .target
            .take()
            .ok_or_else(|| AppError::Other("active review timer without problem".into()))?;

        if stopped.elapsed_seconds <= 0 {
            return Ok(None);
        }

        Ok(Some(ReviewCompletion {
            problem_id: target.id,
            problem_name: target.name,
            second_solve_seconds: stopped.elapsed_seconds,
        }))
    }
}

/// Display lists derived from the full set of problems.
#[derive(Debug, Default, PartialEq)]
pub struct ProblemBoard<'a> {
    /// Every unreviewed problem.
    pub to_review: Vec<&'a AlgorithmProblem>,
    /// Reviewed without a second attempt, most recent first, capped.
    pub one_shot: Vec<&'a AlgorithmProblem>,
    /// Reviewed with a positive second attempt, most recent first, capped.
    pub re_solved: Vec<&'a AlgorithmProblem>,
}

/// Recompute the board from scratch. Ties on `solved_at` keep input order.
pub fn classify(problems: &[AlgorithmProblem], limit: usize) -> ProblemBoard<'_> {
    let mut sorted: Vec<&AlgorithmProblem> = problems.iter().collect();
    sorted.sort_by_key(|p| Reverse(p.solved_at));

    ProblemBoard {
        to_review: sorted.iter().copied().filter(|p| !p.reviewed).collect(),
        one_shot: sorted
            .iter()
            .copied()
            .filter(|p| p.is_one_shot())
            .take(limit)
            .collect(),
        re_solved: sorted
            .iter()
            .copied()
            .filter(|p| p.is_re_solved())
            .take(limit)
            .collect(),
    }
}

/// Problems whose review can be started today, earliest due first.
pub fn due_for_review(problems: &[AlgorithmProblem], today: NaiveDate) -> Vec<&AlgorithmProblem> {
    let mut due: Vec<&AlgorithmProblem> = problems
        .iter()
        .filter(|p| is_review_eligible(p, today))
        .collect();
    due.sort_by_key(|p| p.review_by);
    due
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn d(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn t(secs: i64) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 2, 21, 3, 0, 0).unwrap() + Duration::seconds(secs)
    }

    fn problem(id: &str, solved: &str, review_by: &str, reviewed: bool, second: Option<i64>) -> AlgorithmProblem {
        AlgorithmProblem {
            id: id.to_string(),
            device_id: "dev".into(),
            problem_name: format!("problem {id}"),
            category: "graph".into(),
            link: None,
            solved_at: d(solved),
            review_by: d(review_by),
            first_solve_seconds: Some(3000),
            second_solve_seconds: second,
            reviewed,
            created_at: String::new(),
        }
    }

    fn draft() -> ProblemDraft {
        ProblemDraft::new("Two Sum", "array", Some("https://example.com/1")).unwrap()
    }

    #[test]
    fn threshold_is_inclusive() {
        let policy = ReviewPolicy::default();
        let solved = d("2026-02-21");

        let at = first_solve_outcome(2400, solved, &policy);
        assert!(at.reviewed);
        assert_eq!(at.review_by, solved);

        let over = first_solve_outcome(2401, solved, &policy);
        assert!(!over.reviewed);
        assert_eq!(over.review_by, d("2026-02-24"));
    }

    #[test]
    fn due_date_crosses_month_end() {
        assert_eq!(
            review_due_date(d("2026-02-27"), &ReviewPolicy::default()),
            d("2026-03-02")
        );
    }

    #[test]
    fn draft_requires_name_and_category() {
        assert!(matches!(
            ProblemDraft::new("  ", "dp", None),
            Err(AppError::MissingField("problem name"))
        ));
        assert!(matches!(
            ProblemDraft::new("Knapsack", "", None),
            Err(AppError::MissingField("problem category"))
        ));
        assert_eq!(ProblemDraft::new("Knapsack", "dp", Some(" ")).unwrap().link, None);
    }

    #[test]
    fn slow_first_solve_is_scheduled() {
        let mut s = ReviewScheduler::new(ReviewPolicy::default());
        s.start_first_solve(draft(), t(0)).unwrap();

        let p = s
            .stop_first_solve("dev", d("2026-02-21"), t(2401))
            .unwrap()
            .unwrap();

        assert!(!p.reviewed);
        assert_eq!(p.solved_at, d("2026-02-21"));
        assert_eq!(p.review_by, d("2026-02-24"));
        assert_eq!(p.first_solve_seconds, Some(2401));
        assert_eq!(p.second_solve_seconds, None);
        assert_eq!(p.link.as_deref(), Some("https://example.com/1"));
    }

    #[test]
    fn quick_first_solve_is_one_shot() {
        let mut s = ReviewScheduler::new(ReviewPolicy::default());
        s.start_first_solve(draft(), t(0)).unwrap();
        s.pause_first_solve(t(1000)).unwrap();
        s.resume_first_solve(t(5000)).unwrap();

        let p = s
            .stop_first_solve("dev", d("2026-02-21"), t(6400))
            .unwrap()
            .unwrap();

        assert!(p.reviewed);
        assert_eq!(p.first_solve_seconds, Some(2400));
        assert_eq!(p.review_by, p.solved_at);
    }

    #[test]
    fn zero_first_solve_is_discarded() {
        let mut s = ReviewScheduler::new(ReviewPolicy::default());
        s.start_first_solve(draft(), t(0)).unwrap();

        assert_eq!(s.stop_first_solve("dev", d("2026-02-21"), t(0)).unwrap(), None);
        assert_eq!(s.first_solve_phase(), TimerPhase::Idle);
        assert_eq!(s.draft(), None);
    }

    #[test]
    fn review_requires_due_date() {
        let mut s = ReviewScheduler::new(ReviewPolicy::default());
        let p = problem("p1", "2026-02-21", "2026-02-24", false, None);

        let err = s.start_review(&p, d("2026-02-23"), t(0)).unwrap_err();
        assert!(matches!(err, AppError::ReviewNotDue { .. }));
        assert_eq!(s.review_phase(), TimerPhase::Idle);
        assert_eq!(s.target(), None);

        s.start_review(&p, d("2026-02-24"), t(0)).unwrap();
        assert_eq!(s.review_phase(), TimerPhase::Running);
    }

    #[test]
    fn reviewed_problems_cannot_be_reviewed_again() {
        let mut s = ReviewScheduler::new(ReviewPolicy::default());
        let p = problem("p1", "2026-02-01", "2026-02-04", true, Some(900));

        assert!(matches!(
            s.start_review(&p, d("2026-03-01"), t(0)),
            Err(AppError::AlreadyReviewed(_))
        ));
    }

    #[test]
    fn timers_exclude_each_other() {
        let mut s = ReviewScheduler::new(ReviewPolicy::default());
        let p = problem("p1", "2026-02-01", "2026-02-04", false, None);

        s.start_first_solve(draft(), t(0)).unwrap();
        assert!(matches!(
            s.start_review(&p, d("2026-02-21"), t(1)),
            Err(AppError::TimerBusy("first-solve"))
        ));
        assert_eq!(s.review_phase(), TimerPhase::Idle);

        s.pause_first_solve(t(5)).unwrap();
        assert!(s.start_review(&p, d("2026-02-21"), t(6)).is_err());
        s.stop_first_solve("dev", d("2026-02-21"), t(7)).unwrap();

        s.start_review(&p, d("2026-02-21"), t(10)).unwrap();
        assert!(matches!(
            s.start_first_solve(draft(), t(11)),
            Err(AppError::TimerBusy("review"))
        ));
        assert_eq!(s.first_solve_phase(), TimerPhase::Idle);
        assert_eq!(s.draft(), None);
    }

    #[test]
    fn review_completion_patch() {
        let mut s = ReviewScheduler::new(ReviewPolicy::default());
        let p = problem("p1", "2026-02-01", "2026-02-04", false, None);

        s.start_review(&p, d("2026-02-04"), t(0)).unwrap();
        s.pause_review(t(300)).unwrap();
        s.resume_review(t(400)).unwrap();
        let done = s.stop_review(t(1000)).unwrap().unwrap();

        assert_eq!(done.problem_id, "p1");
        assert_eq!(done.second_solve_seconds, 900);
        assert_eq!(
            done.patch(),
            ProblemPatch {
                second_solve_seconds: Some(900),
                reviewed: Some(true)
            }
        );
        assert_eq!(s.target(), None);
    }

    #[test]
    fn board_classification() {
        let problems = vec![
            problem("old-one-shot", "2026-01-01", "2026-01-01", true, None),
            problem("pending", "2026-02-10", "2026-02-13", false, None),
            problem("zero-second", "2026-02-05", "2026-02-05", true, Some(0)),
            problem("re-solved", "2026-02-08", "2026-02-11", true, Some(1200)),
            problem("new-one-shot", "2026-02-20", "2026-02-20", true, None),
        ];

        let board = classify(&problems, 5);
        let ids = |v: &[&AlgorithmProblem]| v.iter().map(|p| p.id.clone()).collect::<Vec<_>>();

        assert_eq!(ids(&board.to_review), vec!["pending"]);
        assert_eq!(
            ids(&board.one_shot),
            vec!["new-one-shot", "zero-second", "old-one-shot"]
        );
        assert_eq!(ids(&board.re_solved), vec!["re-solved"]);

        let capped = classify(&problems, 2);
        assert_eq!(ids(&capped.one_shot), vec!["new-one-shot", "zero-second"]);
    }

    #[test]
    fn to_review_is_not_capped() {
        let problems: Vec<AlgorithmProblem> = (0..8)
            .map(|i| problem(&format!("p{i}"), "2026-02-10", "2026-02-13", false, None))
            .collect();

        assert_eq!(classify(&problems, 5).to_review.len(), 8);
    }

    #[test]
    fn due_list_uses_review_by() {
        let problems = vec![
            problem("later", "2026-02-20", "2026-02-23", false, None),
            problem("due", "2026-02-17", "2026-02-20", false, None),
            problem("today", "2026-02-18", "2026-02-21", false, None),
            problem("done", "2026-02-01", "2026-02-04", true, Some(100)),
        ];

        let due = due_for_review(&problems, d("2026-02-21"));
        let ids: Vec<&str> = due.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec!["due", "today"]);
    }
}
