use crate::core::timer::{Timer, TimerPhase};
use crate::errors::{AppError, AppResult};
use crate::models::category::Category;
use crate::models::session::NewSession;
use chrono::{DateTime, Utc};

/// Study timer for one category at a time.
#[derive(Debug, Clone, Default)]
pub struct SessionTimer {
    timer: Timer,
    category: Option<Category>,
    description: String,
}

impl SessionTimer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn phase(&self) -> TimerPhase {
        self.timer.phase()
    }

    pub fn is_active(&self) -> bool {
        self.timer.is_active()
    }

    /// Category being timed, if any.
    pub fn category(&self) -> Option<Category> {
        self.category
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn set_description(&mut self, text: &str) {
        self.description = text.to_string();
    }

    pub fn elapsed_seconds(&self, now: DateTime<Utc>) -> i64 {
        self.timer.elapsed_seconds(now)
    }

    pub fn tick(&self, now: DateTime<Utc>) -> Option<i64> {
        self.timer.tick(now)
    }

    pub fn start(&mut self, category: Category, now: DateTime<Utc>) -> AppResult<()> {
        self.timer.start(now)?;
        self.category = Some(category);
        self.description.clear();
        Ok(())
    }

    pub fn pause(&mut self, now: DateTime<Utc>) -> AppResult<()> {
        self.timer.pause(now)
    }

    pub fn resume(&mut self, now: DateTime<Utc>) -> AppResult<()> {
        self.timer.resume(now)
    }

    /// Stop and build the session to persist.
    ///
    /// The timer is back to idle when this returns `Ok`, before the caller
    /// has written anything. `Ok(None)` means no running time was recorded.
    /// Without a device id nothing changes and the time keeps counting.
    pub fn stop(&mut self, device_id: &str, now: DateTime<Utc>) -> AppResult<Option<NewSession>> {
        if !self.timer.is_active() {
            return Err(self.timer.rejection("stop"));
        }
        if device_id.is_empty() {
            return Err(AppError::IdentityUnavailable);
        }

        let stopped = self.timer.stop(now)?;
        let category = self
            .category
            .take()
            .ok_or_else(|| AppError::Other("active session timer without category".into()))?;
        let description = std::mem::take(&mut self.description);

        if stopped.elapsed_seconds <= 0 {
            return Ok(None);
        }

        let description = description.trim();
        Ok(Some(NewSession {
            device_id: device_id.to_string(),
            category,
            started_at: stopped.started_at,
            duration_seconds: stopped.elapsed_seconds,
            description: (!description.is_empty()).then(|| description.to_string()),
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn t(secs: i64) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 2, 21, 5, 0, 0).unwrap() + Duration::seconds(secs)
    }

    #[test]
    fn stop_builds_session_with_running_time() {
        let mut st = SessionTimer::new();
        st.start(Category::Algorithm, t(0)).unwrap();
        st.set_description("  DFS practice ");
        st.pause(t(600)).unwrap();
        st.resume(t(900)).unwrap();

        let session = st.stop("dev", t(1200)).unwrap().unwrap();

        assert_eq!(session.category, Category::Algorithm);
        assert_eq!(session.duration_seconds, 900);
        assert_eq!(session.started_at, t(0));
        assert_eq!(session.description.as_deref(), Some("DFS practice"));
        assert_eq!(st.phase(), TimerPhase::Idle);
        assert_eq!(st.category(), None);
    }

    #[test]
    fn zero_time_is_not_recorded() {
        let mut st = SessionTimer::new();
        st.start(Category::Cs, t(0)).unwrap();

        assert_eq!(st.stop("dev", t(0)).unwrap(), None);
        assert!(!st.is_active());

        st.start(Category::Cs, t(10)).unwrap();
        st.pause(t(10)).unwrap();
        assert_eq!(st.stop("dev", t(99)).unwrap(), None);
    }

    #[test]
    fn blank_description_is_none() {
        let mut st = SessionTimer::new();
        st.start(Category::Silmu, t(0)).unwrap();
        st.set_description("   ");

        let session = st.stop("dev", t(30)).unwrap().unwrap();
        assert_eq!(session.description, None);
    }

    #[test]
    fn missing_identity_keeps_the_timer_running() {
        let mut st = SessionTimer::new();
        st.start(Category::Cs, t(0)).unwrap();

        assert!(matches!(st.stop("", t(60)), Err(AppError::IdentityUnavailable)));
        assert_eq!(st.phase(), TimerPhase::Running);
        assert_eq!(st.category(), Some(Category::Cs));

        let session = st.stop("dev", t(90)).unwrap().unwrap();
        assert_eq!(session.duration_seconds, 90);
    }

    #[test]
    fn start_twice_is_rejected() {
        let mut st = SessionTimer::new();
        st.start(Category::Cs, t(0)).unwrap();

        assert!(st.start(Category::Silmu, t(1)).is_err());
        assert_eq!(st.category(), Some(Category::Cs));
    }

    #[test]
    fn stop_when_idle_is_rejected() {
        let mut st = SessionTimer::new();
        assert!(matches!(
            st.stop("dev", t(0)),
            Err(AppError::InvalidTransition { action: "stop", .. })
        ));
    }
}
