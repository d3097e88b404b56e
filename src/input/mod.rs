//! Input handling for the buttons, the touch pad and the web endpoints
//!
//! Every source ends up as a [`Command`] on one channel. The
//! [`InputArbiter`] is the only consumer and applies commands to the engine
//! in the order they arrive, one lock at a time. Interrupt handlers never
//! touch the engine; they only wake a task or bump an atomic counter.
//!
//! The edge logic ([`ButtonDebouncer`], [`TouchCounter`], [`ModeWatcher`]) is
//! plain data so it can be driven by hand in tests.

use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use std::sync::mpsc::{self, Receiver, Sender, TryRecvError};
use std::sync::Arc;

use log::{debug, info, warn};

use crate::pomodoro::PomodoroSession;
use crate::status::DeskState;

#[cfg(target_os = "espidf")]
pub mod button;
#[cfg(target_os = "espidf")]
pub mod touch;

// Re-export the public types
pub mod types;
pub use types::*;

/// Default settle window and touch debounce in milliseconds
pub const DEBOUNCE_MS: u32 = 50;

/// Edge detector for one active-low push button.
///
/// The caller samples the line on an interrupt, waits the settle window and
/// samples again. Only a confirmed press (high to low) yields a command.
#[derive(Debug, Clone)]
pub struct ButtonDebouncer {
    command: InputCommand,
    last: Level,
}

impl ButtonDebouncer {
    pub fn new(command: InputCommand) -> Self {
        Self {
            command,
            last: Level::High,
        }
    }

    pub fn on_samples(&mut self, first: Level, settled: Level) -> Option<InputCommand> {
        if first != settled {
            debug!("{} button: noise rejected", self.command);
            return None;
        }
        if settled == self.last {
            return None;
        }
        self.last = settled;
        (settled == Level::Low).then_some(self.command)
    }
}

/// Mode counter bumped from the touch interrupt
#[derive(Debug)]
pub struct TouchCounter {
    mode: AtomicU32,
    modes: u32,
    debounce_ms: u32,
    armed: AtomicBool,
    last_touch_ms: AtomicU32,
}

impl TouchCounter {
    pub fn new(modes: u32, debounce_ms: u32) -> Self {
        Self {
            mode: AtomicU32::new(0),
            modes: modes.max(1),
            debounce_ms,
            armed: AtomicBool::new(false),
            last_touch_ms: AtomicU32::new(0),
        }
    }

    /// Register a touch at `now_ms`. Returns false when it falls inside the
    /// debounce window of the previous accepted touch.
    ///
    /// Safe to call from interrupt context: no locks, no allocation.
    pub fn on_touch(&self, now_ms: u32) -> bool {
        let last = self.last_touch_ms.load(Ordering::Relaxed);
        if self.armed.load(Ordering::Relaxed) && now_ms.wrapping_sub(last) < self.debounce_ms {
            return false;
        }
        self.armed.store(true, Ordering::Relaxed);
        self.last_touch_ms.store(now_ms, Ordering::Relaxed);
        let next = (self.mode.load(Ordering::Relaxed) + 1) % self.modes;
        self.mode.store(next, Ordering::Release);
        true
    }

    pub fn mode(&self) -> u32 {
        self.mode.load(Ordering::Acquire)
    }
}

impl Default for TouchCounter {
    fn default() -> Self {
        Self::new(2, DEBOUNCE_MS)
    }
}

/// Turns the touch mode level into one command per change.
///
/// Nothing has been seen before the first poll, so the boot mode itself
/// counts as a change and emits once.
#[derive(Debug, Clone, Default)]
pub struct ModeWatcher {
    last: Option<u32>,
}

impl ModeWatcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn observe(&mut self, mode: u32) -> Option<InputCommand> {
        if self.last == Some(mode) {
            return None;
        }
        self.last = Some(mode);
        Some(match mode {
            1 => InputCommand::StartStop,
            _ => InputCommand::Reset,
        })
    }
}

/// Producer half of the command channel, tagged with its source
#[derive(Debug, Clone)]
pub struct CommandSender {
    source: CommandSource,
    sender: Sender<Command>,
}

impl CommandSender {
    /// Same channel, different tag
    pub fn with_source(&self, source: CommandSource) -> Self {
        Self {
            source,
            sender: self.sender.clone(),
        }
    }

    pub fn source(&self) -> CommandSource {
        self.source
    }

    /// Queue a command. Returns false once the arbiter is gone.
    pub fn send(&self, command: InputCommand) -> bool {
        let command = Command {
            source: self.source,
            command,
        };
        match self.sender.send(command) {
            Ok(()) => true,
            Err(_) => {
                warn!("Input arbiter stopped, dropping {}", command);
                false
            }
        }
    }
}

/// Single consumer of every input source
pub struct InputArbiter {
    state: Arc<DeskState>,
    receiver: Receiver<Command>,
}

impl InputArbiter {
    /// Create the arbiter and the first sender of its channel
    pub fn new(state: Arc<DeskState>, source: CommandSource) -> (Self, CommandSender) {
        let (sender, receiver) = mpsc::channel();
        (Self { state, receiver }, CommandSender { source, sender })
    }

    /// Apply one command under the session lock
    pub fn apply(&self, command: Command) -> PomodoroSession {
        let session = self.state.with_engine(|engine| {
            match command.command {
                InputCommand::StartStop => {
                    engine.start_stop();
                }
                InputCommand::Reset => engine.reset(),
            }
            engine.session()
        });
        info!(
            "{}: {} {} ({:02}:{:02})",
            command,
            session.state,
            if session.running { "running" } else { "stopped" },
            session.seconds_left / 60,
            session.seconds_left % 60
        );
        session
    }

    /// Apply everything already queued without blocking. Returns the count.
    pub fn drain(&self) -> usize {
        let mut applied = 0;
        loop {
            match self.receiver.try_recv() {
                Ok(command) => {
                    self.apply(command);
                    applied += 1;
                }
                Err(TryRecvError::Empty | TryRecvError::Disconnected) => return applied,
            }
        }
    }

    /// Apply commands as they arrive until every sender is dropped
    pub fn run(self) {
        while let Ok(command) = self.receiver.recv() {
            self.apply(command);
        }
        info!("All input sources closed, arbiter exiting");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pomodoro::PomodoroState;

    fn arbiter() -> (InputArbiter, CommandSender, Arc<DeskState>) {
        let state = Arc::new(DeskState::default());
        let (arbiter, sender) = InputArbiter::new(state.clone(), CommandSource::Button);
        (arbiter, sender, state)
    }

    #[test]
    fn test_button_press_once() {
        let mut button = ButtonDebouncer::new(InputCommand::StartStop);
        assert_eq!(
            button.on_samples(Level::Low, Level::Low),
            Some(InputCommand::StartStop)
        );
        // Held down
        assert_eq!(button.on_samples(Level::Low, Level::Low), None);
        // Released
        assert_eq!(button.on_samples(Level::High, Level::High), None);
        // Pressed again
        assert_eq!(
            button.on_samples(Level::Low, Level::Low),
            Some(InputCommand::StartStop)
        );
    }

    #[test]
    fn test_button_noise_rejected() {
        let mut button = ButtonDebouncer::new(InputCommand::Reset);
        assert_eq!(button.on_samples(Level::Low, Level::High), None);
        assert_eq!(button.on_samples(Level::High, Level::Low), None);
        // A rejected bounce leaves the last level untouched
        assert_eq!(
            button.on_samples(Level::Low, Level::Low),
            Some(InputCommand::Reset)
        );
    }

    #[test]
    fn test_touch_counter_cycles() {
        let counter = TouchCounter::new(2, 50);
        assert_eq!(counter.mode(), 0);
        assert!(counter.on_touch(0));
        assert_eq!(counter.mode(), 1);
        assert!(counter.on_touch(100));
        assert_eq!(counter.mode(), 0);

        let counter = TouchCounter::new(3, 50);
        for t in [0, 60, 120] {
            counter.on_touch(t);
        }
        assert_eq!(counter.mode(), 0);
    }

    #[test]
    fn test_touch_counter_debounce() {
        let counter = TouchCounter::default();
        assert!(counter.on_touch(1000));
        assert!(!counter.on_touch(1020));
        assert!(!counter.on_touch(1049));
        assert_eq!(counter.mode(), 1);
        assert!(counter.on_touch(1050));
        assert_eq!(counter.mode(), 0);
    }

    #[test]
    fn test_touch_counter_clock_wrap() {
        let counter = TouchCounter::default();
        assert!(counter.on_touch(u32::MAX - 10));
        assert!(!counter.on_touch(5));
        assert!(counter.on_touch(40));
    }

    #[test]
    fn test_mode_held_yields_one_command() {
        let counter = TouchCounter::default();
        counter.on_touch(0);
        let mut watcher = ModeWatcher::new();

        let emitted: Vec<InputCommand> = (0..1000)
            .filter_map(|_| watcher.observe(counter.mode()))
            .collect();
        assert_eq!(emitted, vec![InputCommand::StartStop]);
    }

    #[test]
    fn test_boot_mode_held_emits_once() {
        let counter = TouchCounter::default();
        let mut watcher = ModeWatcher::new();

        let emitted: Vec<InputCommand> = (0..1000)
            .filter_map(|_| watcher.observe(counter.mode()))
            .collect();
        assert_eq!(emitted, vec![InputCommand::Reset]);
    }

    #[test]
    fn test_mode_mapping() {
        let mut watcher = ModeWatcher::new();
        assert_eq!(watcher.observe(0), Some(InputCommand::Reset));
        assert_eq!(watcher.observe(0), None);
        assert_eq!(watcher.observe(1), Some(InputCommand::StartStop));
        assert_eq!(watcher.observe(0), Some(InputCommand::Reset));
        assert_eq!(watcher.observe(2), Some(InputCommand::Reset));
        assert_eq!(watcher.observe(2), None);
    }

    #[test]
    fn test_arbiter_applies_in_order() {
        let (arbiter, buttons, state) = arbiter();
        let web = buttons.with_source(CommandSource::Web);
        assert_eq!(web.source(), CommandSource::Web);

        assert!(buttons.send(InputCommand::StartStop));
        assert!(web.send(InputCommand::StartStop));
        assert!(buttons.send(InputCommand::StartStop));
        assert_eq!(arbiter.drain(), 3);
        assert!(state.session().running);

        assert!(web.send(InputCommand::Reset));
        assert_eq!(arbiter.drain(), 1);
        let session = state.session();
        assert!(!session.running);
        assert_eq!(session.state, PomodoroState::Work);
        assert_eq!(session.seconds_left, 1500);
    }

    #[test]
    fn test_drain_empty() {
        let (arbiter, _sender, _state) = arbiter();
        assert_eq!(arbiter.drain(), 0);
    }

    #[test]
    fn test_send_after_arbiter_dropped() {
        let (arbiter, sender, _state) = arbiter();
        drop(arbiter);
        assert!(!sender.send(InputCommand::Reset));
    }

    #[test]
    fn test_run_exits_when_senders_close() {
        let (arbiter, sender, state) = arbiter();
        let touch = sender.with_source(CommandSource::Touch);
        let handle = std::thread::spawn(move || arbiter.run());

        sender.send(InputCommand::StartStop);
        touch.send(InputCommand::StartStop);
        sender.send(InputCommand::StartStop);
        drop(sender);
        drop(touch);
        handle.join().unwrap();

        assert!(state.session().running);
    }
}
