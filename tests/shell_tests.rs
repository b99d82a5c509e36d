use chrono::{Duration, FixedOffset};
use rstudylog::cli::shell::{ShellFlow, StudyShell};
use rstudylog::core::review::{ReviewPolicy, classify};
use rstudylog::core::timer::TimerPhase;
use rstudylog::db::pool::DbPool;
use rstudylog::errors::AppError;
use rstudylog::models::category::Category;
use rstudylog::models::problem::NewProblem;
use rstudylog::ui::render::ViewSettings;

mod common;
use common::{at, date};

fn view() -> ViewSettings {
    ViewSettings {
        offset: FixedOffset::east_opt(9 * 3600).unwrap(),
        board_limit: 5,
        recent_sessions: 8,
        target_hours: 1000,
    }
}

fn shell<'c>(pool: &'c DbPool, device: &str) -> StudyShell<'c> {
    StudyShell::new(&pool.conn, device, view(), ReviewPolicy::default())
}

#[test]
fn session_with_pause_is_saved_with_running_time_only() {
    let pool = DbPool::open_in_memory().unwrap();
    let mut sh = shell(&pool, "dev");
    let t0 = at(2026, 2, 21, 5, 0, 0);

    sh.execute_line("start cs", t0).unwrap();
    sh.execute_line("pause", t0 + Duration::seconds(10)).unwrap();
    sh.execute_line("resume", t0 + Duration::seconds(15)).unwrap();
    sh.execute_line(r#"stop "virtual memory""#, t0 + Duration::seconds(20))
        .unwrap();

    let rows = sh.sessions().sessions("dev").unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].duration_seconds, 15);
    assert_eq!(rows[0].category, Category::Cs);
    assert_eq!(rows[0].started_at, t0);
    assert_eq!(rows[0].description.as_deref(), Some("virtual memory"));
    assert_eq!(sh.timer().phase(), TimerPhase::Idle);
}

#[test]
fn note_then_stop_keeps_note() {
    let pool = DbPool::open_in_memory().unwrap();
    let mut sh = shell(&pool, "dev");
    let t0 = at(2026, 2, 21, 5, 0, 0);

    sh.execute_line("start silmu", t0).unwrap();
    sh.execute_line("note deploy pipeline", t0).unwrap();
    sh.execute_line("stop", t0 + Duration::seconds(60)).unwrap();

    let rows = sh.sessions().sessions("dev").unwrap();
    assert_eq!(rows[0].description.as_deref(), Some("deploy pipeline"));
}

#[test]
fn zero_length_session_is_not_saved() {
    let pool = DbPool::open_in_memory().unwrap();
    let mut sh = shell(&pool, "dev");
    let t0 = at(2026, 2, 21, 5, 0, 0);

    sh.execute_line("start algorithm", t0).unwrap();
    sh.execute_line("stop", t0).unwrap();

    assert!(sh.sessions().sessions("dev").unwrap().is_empty());
    assert_eq!(sh.timer().phase(), TimerPhase::Idle);
}

#[test]
fn stop_without_identity_keeps_timer() {
    let pool = DbPool::open_in_memory().unwrap();
    let mut sh = shell(&pool, "");
    let t0 = at(2026, 2, 21, 5, 0, 0);

    sh.execute_line("start cs", t0).unwrap();
    sh.execute_line("note first", t0).unwrap();

    let err = sh
        .execute_line("stop second", t0 + Duration::seconds(30))
        .unwrap_err();

    assert!(matches!(err, AppError::IdentityUnavailable));
    assert_eq!(sh.timer().phase(), TimerPhase::Running);
    assert_eq!(sh.timer().description(), "first");
}

#[test]
fn rejected_commands_leave_state_unchanged() {
    let pool = DbPool::open_in_memory().unwrap();
    let mut sh = shell(&pool, "dev");
    let t0 = at(2026, 2, 21, 5, 0, 0);

    assert!(matches!(
        sh.execute_line("pause", t0),
        Err(AppError::InvalidTransition { action: "pause", .. })
    ));
    assert!(sh.execute_line("note nothing running", t0).is_err());
    assert!(sh.execute_line("start maths", t0).is_err());
    assert!(sh.execute_line("dance", t0).is_err());
    assert_eq!(sh.timer().phase(), TimerPhase::Idle);

    sh.execute_line("start cs", t0).unwrap();
    assert!(sh.execute_line("start silmu", t0).is_err());
    assert_eq!(sh.timer().category(), Some(Category::Cs));
}

#[test]
fn first_solve_within_threshold_is_one_shot() {
    let pool = DbPool::open_in_memory().unwrap();
    let mut sh = shell(&pool, "dev");
    // 2026-02-21 14:00 in Seoul
    let t0 = at(2026, 2, 21, 5, 0, 0);

    sh.execute_line(r#"solve start "Two Sum" hash --link https://example.com/1"#, t0)
        .unwrap();
    sh.execute_line("solve stop", t0 + Duration::seconds(2400))
        .unwrap();

    let problems = sh.problems().problems("dev").unwrap();
    assert_eq!(problems.len(), 1);
    let p = &problems[0];
    assert_eq!(p.problem_name, "Two Sum");
    assert_eq!(p.link.as_deref(), Some("https://example.com/1"));
    assert!(p.reviewed);
    assert_eq!(p.first_solve_seconds, Some(2400));
    assert_eq!(p.second_solve_seconds, None);
    assert_eq!(p.solved_at, date(2026, 2, 21));
    assert_eq!(p.review_by, date(2026, 2, 21));
}

#[test]
fn slow_first_solve_schedules_review_then_review_completes() {
    let pool = DbPool::open_in_memory().unwrap();
    let mut sh = shell(&pool, "dev");
    let t0 = at(2026, 2, 21, 5, 0, 0);

    sh.execute_line("solve start LIS dp", t0).unwrap();
    sh.execute_line("solve stop", t0 + Duration::seconds(2401))
        .unwrap();

    let p = sh.problems().problems("dev").unwrap().remove(0);
    assert!(!p.reviewed);
    assert_eq!(p.review_by, date(2026, 2, 24));

    // not due before the 24th (Seoul calendar)
    let early = at(2026, 2, 23, 14, 59, 0); // 23:59 on the 23rd in Seoul
    let err = sh
        .execute_line(&format!("review start {}", p.short_id()), early)
        .unwrap_err();
    assert!(matches!(err, AppError::ReviewNotDue { .. }));
    assert_eq!(sh.scheduler().review_phase(), TimerPhase::Idle);

    let due = at(2026, 2, 23, 15, 0, 0); // 00:00 on the 24th in Seoul
    sh.execute_line(&format!("review start {}", p.short_id()), due)
        .unwrap();
    sh.execute_line("review pause", due + Duration::seconds(600))
        .unwrap();
    sh.execute_line("review resume", due + Duration::seconds(700))
        .unwrap();
    sh.execute_line("review stop", due + Duration::seconds(1000))
        .unwrap();

    let p = sh.problems().problems("dev").unwrap().remove(0);
    assert!(p.reviewed);
    assert_eq!(p.second_solve_seconds, Some(900));
    assert_eq!(p.first_solve_seconds, Some(2401));

    let problems = sh.problems().problems("dev").unwrap();
    let board = classify(&problems, 5);
    assert!(board.to_review.is_empty());
    assert_eq!(board.re_solved.len(), 1);
    assert_eq!(board.re_solved[0].id, p.id);
    assert!(board.one_shot.is_empty());

    // already reviewed
    assert!(matches!(
        sh.execute_line(&format!("review start {}", p.short_id()), due),
        Err(AppError::AlreadyReviewed(_))
    ));
}

#[test]
fn first_solve_and_review_exclude_each_other() {
    let pool = DbPool::open_in_memory().unwrap();
    let mut sh = shell(&pool, "dev");
    let id = sh
        .problems()
        .add_problem(&NewProblem::new("dev", "Dijkstra", "graph", date(2026, 2, 1), date(2026, 2, 4)))
        .unwrap()
        .id;
    let t0 = at(2026, 2, 21, 5, 0, 0);

    sh.execute_line(&format!("review start {id}"), t0).unwrap();
    assert!(matches!(
        sh.execute_line("solve start BFS graph", t0),
        Err(AppError::TimerBusy(_))
    ));
    assert_eq!(sh.scheduler().first_solve_phase(), TimerPhase::Idle);

    sh.execute_line("review stop", t0 + Duration::seconds(5)).unwrap();
    sh.execute_line("solve start BFS graph", t0).unwrap();
    assert!(matches!(
        sh.execute_line(&format!("review start {id}"), t0),
        Err(AppError::TimerBusy(_))
    ));
}

#[test]
fn solve_requires_name_and_category() {
    let pool = DbPool::open_in_memory().unwrap();
    let mut sh = shell(&pool, "dev");
    let t0 = at(2026, 2, 21, 5, 0, 0);

    assert!(matches!(
        sh.execute_line(r#"solve start "  " dp"#, t0),
        Err(AppError::MissingField(_))
    ));
    assert!(sh.execute_line("solve start OnlyName", t0).is_err());
    assert_eq!(sh.scheduler().first_solve_phase(), TimerPhase::Idle);
}

#[test]
fn prompt_shows_running_timer() {
    let pool = DbPool::open_in_memory().unwrap();
    let mut sh = shell(&pool, "dev");
    let t0 = at(2026, 2, 21, 5, 0, 0);

    assert_eq!(sh.prompt(t0), "> ");

    sh.execute_line("start cs", t0).unwrap();
    assert_eq!(sh.prompt(t0 + Duration::seconds(3725)), "[cs 01:02:05] > ");

    sh.execute_line("pause", t0 + Duration::seconds(60)).unwrap();
    assert_eq!(sh.prompt(t0 + Duration::seconds(9999)), "[cs paused 00:01:00] > ");
}

#[test]
fn quit_and_exit_leave_the_shell() {
    let pool = DbPool::open_in_memory().unwrap();
    let mut sh = shell(&pool, "dev");
    let t0 = at(2026, 2, 21, 5, 0, 0);

    assert_eq!(sh.execute_line("", t0).unwrap(), ShellFlow::Continue);
    assert_eq!(sh.execute_line("status", t0).unwrap(), ShellFlow::Continue);
    assert_eq!(sh.execute_line("problems", t0).unwrap(), ShellFlow::Continue);
    assert_eq!(sh.execute_line("quit", t0).unwrap(), ShellFlow::Quit);
    assert_eq!(sh.execute_line("exit", t0).unwrap(), ShellFlow::Quit);
}
