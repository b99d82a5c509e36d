//! Start / pause / resume / stop state machine shared by every study timer.
//!
//! The timer never reads the clock itself: every transition takes `now`, so
//! callers decide what time it is and tests can replay exact sequences.

use crate::errors::{AppError, AppResult};
use chrono::{DateTime, Duration, Utc};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerPhase {
    Idle,
    Running,
    Paused,
}

impl fmt::Display for TimerPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            TimerPhase::Idle => "idle",
            TimerPhase::Running => "running",
            TimerPhase::Paused => "paused",
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
enum State {
    #[default]
    Idle,
    Running {
        started_at: DateTime<Utc>,
        /// Elapsed time is `now - anchor`. Shifted forward on resume.
        anchor: DateTime<Utc>,
    },
    Paused {
        started_at: DateTime<Utc>,
        accumulated: Duration,
    },
}

/// Final reading of a stopped timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StoppedTimer {
    /// Wall-clock instant of the original `start`.
    pub started_at: DateTime<Utc>,
    /// Sum of all running intervals, in whole seconds.
    pub elapsed_seconds: i64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Timer {
    state: State,
}

fn since(anchor: DateTime<Utc>, now: DateTime<Utc>) -> Duration {
    (now - anchor).max(Duration::zero())
}

fn whole_seconds(d: Duration) -> i64 {
    d.num_seconds().max(0)
}

impl Timer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn phase(&self) -> TimerPhase {
        match self.state {
            State::Idle => TimerPhase::Idle,
            State::Running { .. } => TimerPhase::Running,
            State::Paused { .. } => TimerPhase::Paused,
        }
    }

    /// Running or paused.
    pub fn is_active(&self) -> bool {
        self.phase() != TimerPhase::Idle
    }

    pub fn started_at(&self) -> Option<DateTime<Utc>> {
        match self.state {
            State::Idle => None,
            State::Running { started_at, .. } | State::Paused { started_at, .. } => {
                Some(started_at)
            }
        }
    }

    pub(crate) fn rejection(&self, action: &'static str) -> AppError {
        AppError::InvalidTransition {
            action,
            phase: self.phase(),
        }
    }

    pub fn start(&mut self, now: DateTime<Utc>) -> AppResult<()> {
        match self.state {
            State::Idle => {
                self.state = State::Running {
                    started_at: now,
                    anchor: now,
                };
                Ok(())
            }
            _ => Err(self.rejection("start")),
        }
    }

    pub fn pause(&mut self, now: DateTime<Utc>) -> AppResult<()> {
        match self.state {
            State::Running { started_at, anchor } => {
                self.state = State::Paused {
                    started_at,
                    accumulated: since(anchor, now),
                };
                Ok(())
            }
            _ => Err(self.rejection("pause")),
        }
    }

    pub fn resume(&mut self, now: DateTime<Utc>) -> AppResult<()> {
        match self.state {
            State::Paused {
                started_at,
                accumulated,
            } => {
                self.state = State::Running {
                    started_at,
                    anchor: now - accumulated,
                };
                Ok(())
            }
            _ => Err(self.rejection("resume")),
        }
    }

    /// Stop from running or paused and return to idle.
    pub fn stop(&mut self, now: DateTime<Utc>) -> AppResult<StoppedTimer> {
        let Some(started_at) = self.started_at() else {
            return Err(self.rejection("stop"));
        };

        let elapsed_seconds = self.elapsed_seconds(now);
        self.state = State::Idle;

        Ok(StoppedTimer {
            started_at,
            elapsed_seconds,
        })
    }

    /// Time spent running so far. Frozen while paused, zero while idle.
    pub fn elapsed(&self, now: DateTime<Utc>) -> Duration {
        match self.state {
            State::Idle => Duration::zero(),
            State::Running { anchor, .. } => since(anchor, now),
            State::Paused { accumulated, .. } => accumulated,
        }
    }

    pub fn elapsed_seconds(&self, now: DateTime<Utc>) -> i64 {
        whole_seconds(self.elapsed(now))
    }

    /// Display refresh: a value only while running.
    pub fn tick(&self, now: DateTime<Utc>) -> Option<i64> {
        match self.state {
            State::Running { .. } => Some(self.elapsed_seconds(now)),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn t(secs: i64) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 2, 21, 0, 0, 0).unwrap() + Duration::seconds(secs)
    }

    #[test]
    fn pause_time_is_not_counted() {
        let mut timer = Timer::new();
        timer.start(t(0)).unwrap();
        timer.pause(t(10)).unwrap();
        timer.resume(t(15)).unwrap();

        let stopped = timer.stop(t(20)).unwrap();

        assert_eq!(stopped.elapsed_seconds, 15);
        assert_eq!(stopped.started_at, t(0));
        assert_eq!(timer.phase(), TimerPhase::Idle);
    }

    #[test]
    fn many_pause_cycles_sum_running_intervals() {
        let mut timer = Timer::new();
        timer.start(t(0)).unwrap();
        let mut now = 0;
        for _ in 0..5 {
            now += 7;
            timer.pause(t(now)).unwrap();
            now += 100;
            timer.resume(t(now)).unwrap();
        }
        now += 3;

        assert_eq!(timer.stop(t(now)).unwrap().elapsed_seconds, 5 * 7 + 3);
    }

    #[test]
    fn stop_while_paused_uses_frozen_value() {
        let mut timer = Timer::new();
        timer.start(t(0)).unwrap();
        timer.pause(t(42)).unwrap();

        assert_eq!(timer.elapsed_seconds(t(500)), 42);
        assert_eq!(timer.stop(t(1000)).unwrap().elapsed_seconds, 42);
    }

    #[test]
    fn sub_second_remainders_survive_pauses() {
        let mut timer = Timer::new();
        timer.start(t(0)).unwrap();
        timer
            .pause(t(0) + Duration::milliseconds(1500))
            .unwrap();
        timer.resume(t(10)).unwrap();

        let end = t(10) + Duration::milliseconds(600);
        assert_eq!(timer.stop(end).unwrap().elapsed_seconds, 2);
    }

    #[test]
    fn invalid_transitions_leave_state_unchanged() {
        let mut timer = Timer::new();
        assert!(matches!(
            timer.pause(t(0)),
            Err(AppError::InvalidTransition { action: "pause", phase: TimerPhase::Idle })
        ));
        assert!(timer.resume(t(0)).is_err());
        assert!(timer.stop(t(0)).is_err());

        timer.start(t(0)).unwrap();
        let before = timer.clone();
        assert!(timer.start(t(5)).is_err());
        assert!(timer.resume(t(5)).is_err());
        assert_eq!(timer, before);

        timer.pause(t(5)).unwrap();
        let before = timer.clone();
        assert!(timer.pause(t(6)).is_err());
        assert_eq!(timer, before);
    }

    #[test]
    fn tick_only_while_running() {
        let mut timer = Timer::new();
        assert_eq!(timer.tick(t(0)), None);

        timer.start(t(0)).unwrap();
        assert_eq!(timer.tick(t(3)), Some(3));

        timer.pause(t(4)).unwrap();
        assert_eq!(timer.tick(t(9)), None);
    }

    #[test]
    fn clock_going_backwards_clamps_to_zero() {
        let mut timer = Timer::new();
        timer.start(t(100)).unwrap();
        assert_eq!(timer.stop(t(50)).unwrap().elapsed_seconds, 0);
    }
}
