//! State shared between the render loop, the input arbiter and the web server

use std::sync::{Mutex, MutexGuard, PoisonError};

use serde::{Deserialize, Serialize};

use crate::pomodoro::{PomodoroEngine, PomodoroSession};
use crate::rtc::DateTime;

/// The one timer and the last time read from the RTC
#[derive(Debug, Default)]
pub struct DeskState {
    session: Mutex<PomodoroEngine>,
    time: Mutex<Option<DateTime>>,
}

// Every mutation under these locks completes before anything can panic, so a
// poisoned value is still whole.
fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

impl DeskState {
    pub fn new(engine: PomodoroEngine) -> Self {
        Self {
            session: Mutex::new(engine),
            time: Mutex::new(None),
        }
    }

    /// Run `f` with exclusive access to the engine
    pub fn with_engine<R>(&self, f: impl FnOnce(&mut PomodoroEngine) -> R) -> R {
        f(&mut lock(&self.session))
    }

    /// Consistent copy of the session
    pub fn session(&self) -> PomodoroSession {
        lock(&self.session).session()
    }

    pub fn publish_time(&self, time: DateTime) {
        *lock(&self.time) = Some(time);
    }

    /// Last time read by the render loop, `None` before the first good read
    pub fn time(&self) -> Option<DateTime> {
        *lock(&self.time)
    }

    pub fn snapshot(&self) -> StatusSnapshot {
        let session = self.session();
        StatusSnapshot::new(self.time(), &session)
    }
}

/// What the web page and the JSON endpoint show
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusSnapshot {
    /// `HH:MM:SS`, `--:--:--` until the clock has been read
    pub time: String,
    /// `DD/MM/YYYY`, `--/--/----` until the clock has been read
    pub date: String,
    /// `MM:SS`
    pub timer_remaining: String,
    pub seconds_left: u16,
    pub state_label: String,
    pub running: bool,
    pub completed_count: u32,
}

impl StatusSnapshot {
    pub fn new(time: Option<DateTime>, session: &PomodoroSession) -> Self {
        let (minutes, seconds) = session.remaining();
        Self {
            time: time.map_or_else(|| "--:--:--".to_string(), |t| t.time_label()),
            date: time.map_or_else(|| "--/--/----".to_string(), |t| t.date_label()),
            timer_remaining: format!("{:02}:{:02}", minutes, seconds),
            seconds_left: session.seconds_left,
            state_label: session.state.label().to_string(),
            running: session.running,
            completed_count: session.completed_work_sessions,
        }
    }
}
