//! Pomodoro timer state machine
//!
//! Work and break phases count down once per tick. When a countdown reaches
//! zero the engine moves to the next phase and stops; a person (or the web
//! endpoint) has to start the next phase explicitly.

use serde::Serialize;
use thiserror::Error;

/// Longest phase the `MM:SS` timer can show (99:59)
pub const MAX_DURATION_SECS: u16 = 99 * 60 + 59;

/// Invalid timer configuration
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{phase} duration must be at least one second")]
    ZeroDuration { phase: &'static str },
    #[error("{phase} duration of {secs} s exceeds {max} s", max = MAX_DURATION_SECS)]
    TooLong { phase: &'static str, secs: u16 },
    #[error("a long break needs at least one work session before it")]
    ZeroCycle,
}

/// Phase of the timer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum PomodoroState {
    Work,
    ShortBreak,
    LongBreak,
}

impl PomodoroState {
    /// Human readable name, shown on the web page
    pub fn label(self) -> &'static str {
        match self {
            PomodoroState::Work => "Work",
            PomodoroState::ShortBreak => "Short Break",
            PomodoroState::LongBreak => "Long Break",
        }
    }

    pub fn is_break(self) -> bool {
        !matches!(self, PomodoroState::Work)
    }
}

impl std::fmt::Display for PomodoroState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Phase durations in seconds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PomodoroConfig {
    work: u16,
    short_break: u16,
    long_break: u16,
    sessions_before_long_break: u32,
}

impl Default for PomodoroConfig {
    fn default() -> Self {
        Self {
            work: 1500,
            short_break: 300,
            long_break: 900,
            sessions_before_long_break: 4,
        }
    }
}

fn check(phase: &'static str, secs: u16) -> Result<u16, ConfigError> {
    if secs == 0 {
        Err(ConfigError::ZeroDuration { phase })
    } else if secs > MAX_DURATION_SECS {
        Err(ConfigError::TooLong { phase, secs })
    } else {
        Ok(secs)
    }
}

impl PomodoroConfig {
    pub fn new(work: u16, short_break: u16, long_break: u16) -> Result<Self, ConfigError> {
        Ok(Self {
            work: check("work", work)?,
            short_break: check("short break", short_break)?,
            long_break: check("long break", long_break)?,
            ..Self::default()
        })
    }

    /// Number of completed work sessions between long breaks
    pub fn with_long_break_every(mut self, sessions: u32) -> Result<Self, ConfigError> {
        if sessions == 0 {
            return Err(ConfigError::ZeroCycle);
        }
        self.sessions_before_long_break = sessions;
        Ok(self)
    }

    pub fn work(&self) -> u16 {
        self.work
    }

    pub fn short_break(&self) -> u16 {
        self.short_break
    }

    pub fn long_break(&self) -> u16 {
        self.long_break
    }

    pub fn sessions_before_long_break(&self) -> u32 {
        self.sessions_before_long_break
    }

    /// Configured length of `state`
    pub fn duration(&self, state: PomodoroState) -> u16 {
        match state {
            PomodoroState::Work => self.work,
            PomodoroState::ShortBreak => self.short_break,
            PomodoroState::LongBreak => self.long_break,
        }
    }
}

/// The timer's observable state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PomodoroSession {
    pub state: PomodoroState,
    pub running: bool,
    pub seconds_left: u16,
    pub completed_work_sessions: u32,
}

impl PomodoroSession {
    /// Remaining time split into minutes and seconds
    pub fn remaining(&self) -> (u16, u16) {
        (self.seconds_left / 60, self.seconds_left % 60)
    }
}

/// A phase change produced by [`PomodoroEngine::tick`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transition {
    pub from: PomodoroState,
    pub to: PomodoroState,
    pub completed_work_sessions: u32,
}

/// Owns the session and the configuration it reloads from
#[derive(Debug, Clone)]
pub struct PomodoroEngine {
    config: PomodoroConfig,
    session: PomodoroSession,
}

impl Default for PomodoroEngine {
    fn default() -> Self {
        Self::new(PomodoroConfig::default())
    }
}

impl PomodoroEngine {
    pub fn new(config: PomodoroConfig) -> Self {
        Self {
            session: PomodoroSession {
                state: PomodoroState::Work,
                running: false,
                seconds_left: config.work,
                completed_work_sessions: 0,
            },
            config,
        }
    }

    /// Copy of the current session
    pub fn session(&self) -> PomodoroSession {
        self.session
    }

    pub fn config(&self) -> &PomodoroConfig {
        &self.config
    }

    /// Replace the durations. The countdown in progress is kept; the new
    /// values apply from the next transition or reset.
    pub fn set_config(&mut self, config: PomodoroConfig) {
        log::info!(
            "Durations set: work {} s, short break {} s, long break {} s",
            config.work,
            config.short_break,
            config.long_break
        );
        self.config = config;
    }

    /// Advance the countdown by one second.
    ///
    /// A tick with more than one second left only decrements. The tick taken
    /// at `seconds_left == 1` brings the countdown to zero, so it also moves
    /// to the next phase and stops the timer.
    pub fn tick(&mut self) -> Option<Transition> {
        if !self.session.running {
            return None;
        }
        if self.session.seconds_left > 0 {
            self.session.seconds_left -= 1;
        }
        if self.session.seconds_left > 0 {
            return None;
        }
        Some(self.advance_phase())
    }

    fn advance_phase(&mut self) -> Transition {
        let from = self.session.state;
        let to = match from {
            PomodoroState::Work => {
                let completed = self.session.completed_work_sessions.saturating_add(1);
                self.session.completed_work_sessions = completed;
                if completed % self.config.sessions_before_long_break == 0 {
                    PomodoroState::LongBreak
                } else {
                    PomodoroState::ShortBreak
                }
            }
            PomodoroState::ShortBreak | PomodoroState::LongBreak => PomodoroState::Work,
        };

        self.session.state = to;
        self.session.seconds_left = self.config.duration(to);
        self.session.running = false;

        log::info!(
            "Pomodoro {} -> {} ({} sessions completed)",
            from,
            to,
            self.session.completed_work_sessions
        );

        Transition {
            from,
            to,
            completed_work_sessions: self.session.completed_work_sessions,
        }
    }

    /// Toggle the running flag, returning the new value
    pub fn start_stop(&mut self) -> bool {
        self.session.running = !self.session.running;
        self.session.running
    }

    /// Back to a stopped, full work phase. The session count is kept.
    pub fn reset(&mut self) {
        self.session.state = PomodoroState::Work;
        self.session.running = false;
        self.session.seconds_left = self.config.work;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn engine_at(state: PomodoroState, seconds_left: u16, completed: u32) -> PomodoroEngine {
        let mut engine = PomodoroEngine::default();
        engine.session = PomodoroSession {
            state,
            running: true,
            seconds_left,
            completed_work_sessions: completed,
        };
        engine
    }

    #[test]
    fn test_startup_defaults() {
        let engine = PomodoroEngine::default();
        let s = engine.session();
        assert_eq!(s.state, PomodoroState::Work);
        assert!(!s.running);
        assert_eq!(s.seconds_left, 1500);
        assert_eq!(s.completed_work_sessions, 0);
    }

    #[test]
    fn test_tick_decrements_by_one() {
        for secs in [2u16, 3, 300, 1500, MAX_DURATION_SECS] {
            for state in [
                PomodoroState::Work,
                PomodoroState::ShortBreak,
                PomodoroState::LongBreak,
            ] {
                let mut engine = engine_at(state, secs, 0);
                assert_eq!(engine.tick(), None);
                assert_eq!(engine.session().seconds_left, secs - 1);
                assert_eq!(engine.session().state, state);
                assert!(engine.session().running);
            }
        }
    }

    #[test]
    fn test_tick_on_last_second_transitions() {
        let mut engine = engine_at(PomodoroState::Work, 1, 0);
        let transition = engine.tick().unwrap();
        assert_eq!(transition.from, PomodoroState::Work);
        assert_eq!(transition.to, PomodoroState::ShortBreak);
        let session = engine.session();
        assert_eq!(session.state, PomodoroState::ShortBreak);
        assert!(!session.running);
    }

    #[test]
    fn test_tick_when_stopped_is_noop() {
        let mut engine = PomodoroEngine::default();
        let before = engine.session();
        for _ in 0..10 {
            assert_eq!(engine.tick(), None);
        }
        assert_eq!(engine.session(), before);
    }

    #[test]
    fn test_fourth_session_gives_long_break() {
        let mut engine = engine_at(PomodoroState::Work, 1, 3);
        let transition = engine.tick().unwrap();
        assert_eq!(transition.from, PomodoroState::Work);
        assert_eq!(transition.to, PomodoroState::LongBreak);

        let s = engine.session();
        assert_eq!(s.state, PomodoroState::LongBreak);
        assert_eq!(s.completed_work_sessions, 4);
        assert_eq!(s.seconds_left, 900);
        assert!(!s.running);
    }

    #[test]
    fn test_first_session_gives_short_break() {
        let mut engine = engine_at(PomodoroState::Work, 1, 0);
        engine.tick();
        let s = engine.session();
        assert_eq!(s.state, PomodoroState::ShortBreak);
        assert_eq!(s.completed_work_sessions, 1);
        assert_eq!(s.seconds_left, 300);
        assert!(!s.running);
    }

    #[test]
    fn test_breaks_return_to_work() {
        for state in [PomodoroState::ShortBreak, PomodoroState::LongBreak] {
            let mut engine = engine_at(state, 1, 5);
            let transition = engine.tick().unwrap();
            assert_eq!(transition.to, PomodoroState::Work);
            let s = engine.session();
            assert_eq!(s.seconds_left, 1500);
            assert_eq!(s.completed_work_sessions, 5);
            assert!(!s.running);
        }
    }

    #[test]
    fn test_running_at_zero_transitions() {
        let mut engine = engine_at(PomodoroState::Work, 0, 0);
        assert!(engine.tick().is_some());
        assert_eq!(engine.session().state, PomodoroState::ShortBreak);
    }

    #[test]
    fn test_reset_from_any_state() {
        for state in [
            PomodoroState::Work,
            PomodoroState::ShortBreak,
            PomodoroState::LongBreak,
        ] {
            for running in [true, false] {
                let mut engine = engine_at(state, 42, 7);
                engine.session.running = running;
                engine.reset();
                let s = engine.session();
                assert_eq!(s.state, PomodoroState::Work);
                assert!(!s.running);
                assert_eq!(s.seconds_left, 1500);
                assert_eq!(s.completed_work_sessions, 7);
            }
        }
    }

    #[test]
    fn test_start_stop_toggles() {
        let mut engine = PomodoroEngine::default();
        assert!(engine.start_stop());
        assert!(engine.session().running);
        assert!(!engine.start_stop());
        assert!(!engine.session().running);
        assert_eq!(engine.session().seconds_left, 1500);
        assert_eq!(engine.session().state, PomodoroState::Work);
    }

    #[test]
    fn test_full_work_phase() {
        let mut engine = PomodoroEngine::default();
        engine.start_stop();
        let transitions: Vec<Transition> = (0..1500).filter_map(|_| engine.tick()).collect();
        assert_eq!(transitions.len(), 1);

        let s = engine.session();
        assert_eq!(s.state, PomodoroState::ShortBreak);
        assert_eq!(s.seconds_left, 300);
        assert!(!s.running);
        assert_eq!(s.completed_work_sessions, 1);

        // Does not resume on its own
        assert_eq!(engine.tick(), None);
        assert_eq!(engine.session().seconds_left, 300);
    }

    #[test]
    fn test_long_break_cycle() {
        let config = PomodoroConfig::new(2, 1, 3).unwrap();
        let mut engine = PomodoroEngine::new(config);
        let mut phases = Vec::new();
        for _ in 0..8 {
            engine.start_stop();
            while engine.session().running {
                if let Some(t) = engine.tick() {
                    phases.push(t.to);
                }
            }
        }
        use PomodoroState::*;
        assert_eq!(
            phases,
            vec![ShortBreak, Work, ShortBreak, Work, ShortBreak, Work, LongBreak, Work]
        );
    }

    #[test]
    fn test_config_validation() {
        assert_eq!(
            PomodoroConfig::new(0, 300, 900),
            Err(ConfigError::ZeroDuration { phase: "work" })
        );
        assert_eq!(
            PomodoroConfig::new(1500, 300, 6000),
            Err(ConfigError::TooLong {
                phase: "long break",
                secs: 6000
            })
        );
        assert_eq!(
            PomodoroConfig::default().with_long_break_every(0),
            Err(ConfigError::ZeroCycle)
        );
        assert!(PomodoroConfig::new(MAX_DURATION_SECS, 1, 1).is_ok());
    }

    #[test]
    fn test_set_config_applies_on_reload() {
        let mut engine = PomodoroEngine::default();
        engine.start_stop();
        engine.tick();
        engine.set_config(PomodoroConfig::new(60, 30, 90).unwrap());
        assert_eq!(engine.session().seconds_left, 1499);
        engine.reset();
        assert_eq!(engine.session().seconds_left, 60);
    }

    #[test]
    fn test_remaining_split() {
        let mut engine = PomodoroEngine::default();
        assert_eq!(engine.session().remaining(), (25, 0));
        engine.session.seconds_left = 61;
        assert_eq!(engine.session().remaining(), (1, 1));
    }
}
