//! Once-a-second tick and redraw
//!
//! Each frame ticks the engine, reads the clock and redraws one of two
//! views. The view flips every `view_period` frames. Clock or display
//! failures cost one frame and nothing else.

use std::sync::mpsc::Sender;
use std::sync::Arc;
use std::time::{Duration, Instant};

use log::{debug, warn};

use crate::layout::{self, LayoutConfig};
use crate::pomodoro::{PomodoroSession, Transition};
use crate::rtc::{Clock, DateTime};
use crate::status::DeskState;
use crate::surface::{DisplaySurface, SurfaceError};

/// What is on screen
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    /// Large clock with the timer row below
    TimeAndTimer,
    /// Large date and year
    Date,
}

/// Outcome of one [`RenderScheduler::frame`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameReport {
    Drawn {
        view: View,
        transition: Option<Transition>,
    },
    /// Nothing drawn this frame; the tick still happened
    Skipped { transition: Option<Transition> },
}

impl FrameReport {
    pub fn transition(&self) -> Option<Transition> {
        match self {
            FrameReport::Drawn { transition, .. } | FrameReport::Skipped { transition } => {
                *transition
            }
        }
    }
}

pub struct RenderScheduler<C, S> {
    state: Arc<DeskState>,
    clock: C,
    surface: S,
    layout: LayoutConfig,
    view_period: u32,
    frame: u64,
    transitions: Option<Sender<Transition>>,
}

impl<C: Clock, S: DisplaySurface> RenderScheduler<C, S> {
    pub fn new(
        state: Arc<DeskState>,
        clock: C,
        surface: S,
        layout: LayoutConfig,
        view_period: u32,
    ) -> Self {
        Self {
            state,
            clock,
            surface,
            layout,
            view_period: view_period.max(1),
            frame: 0,
            transitions: None,
        }
    }

    /// Forward every phase change to `sender`
    pub fn with_transitions(mut self, sender: Sender<Transition>) -> Self {
        self.transitions = Some(sender);
        self
    }

    /// View for the current frame number
    pub fn current_view(&self) -> View {
        if (self.frame / self.view_period as u64) % 2 == 0 {
            View::TimeAndTimer
        } else {
            View::Date
        }
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn frame(&mut self) -> FrameReport {
        let (session, transition) = self.state.with_engine(|engine| {
            let transition = engine.tick();
            (engine.session(), transition)
        });
        if let Some(transition) = transition {
            self.forward(transition);
        }

        let view = self.current_view();
        self.frame += 1;

        let time = match self.clock.get_time() {
            Ok(time) => time,
            Err(e) => {
                warn!("Clock read failed, frame skipped: {}", e);
                return FrameReport::Skipped { transition };
            }
        };
        self.state.publish_time(time);

        match self.draw(view, &time, &session) {
            Ok(()) => FrameReport::Drawn { view, transition },
            Err(e) => {
                warn!("Display write failed, frame skipped: {}", e);
                FrameReport::Skipped { transition }
            }
        }
    }

    /// Call [`Self::frame`] every `interval`, forever
    pub fn run(&mut self, interval: Duration) -> ! {
        loop {
            let started = Instant::now();
            let report = self.frame();
            debug!("Frame {}: {:?}", self.frame, report);
            if let Some(rest) = interval.checked_sub(started.elapsed()) {
                std::thread::sleep(rest);
            }
        }
    }

    fn forward(&mut self, transition: Transition) {
        if let Some(sender) = &self.transitions {
            if sender.send(transition).is_err() {
                warn!("Transition listener gone, no more alerts");
                self.transitions = None;
            }
        }
    }

    fn draw(
        &mut self,
        view: View,
        time: &DateTime,
        session: &PomodoroSession,
    ) -> Result<(), SurfaceError> {
        layout::clear(&mut self.surface)?;
        match view {
            View::TimeAndTimer => {
                layout::render_time(&mut self.surface, &self.layout, self.layout.time_page, time)?;
                layout::render_timer(
                    &mut self.surface,
                    &self.layout,
                    self.layout.timer_page,
                    session,
                )
            }
            View::Date => {
                layout::render_date(&mut self.surface, &self.layout, self.layout.date_page, time)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pomodoro::{PomodoroConfig, PomodoroEngine, PomodoroState};
    use crate::rtc::RtcError;
    use crate::surface::FrameBuffer;
    use std::sync::mpsc;

    struct FixedClock {
        time: DateTime,
        fail: bool,
    }

    impl Clock for FixedClock {
        fn get_time(&mut self) -> Result<DateTime, RtcError> {
            if self.fail {
                Err(RtcError::Bus("nack".into()))
            } else {
                Ok(self.time)
            }
        }

        fn set_time(&mut self, time: &DateTime) -> Result<(), RtcError> {
            self.time = *time;
            Ok(())
        }
    }

    struct BrokenSurface;

    impl DisplaySurface for BrokenSurface {
        fn set_cursor(&mut self, _page: u8, _column: u8) -> Result<(), SurfaceError> {
            Err(SurfaceError::Bus("spi".into()))
        }

        fn write_columns(&mut self, _bytes: &[u8]) -> Result<(), SurfaceError> {
            Err(SurfaceError::Bus("spi".into()))
        }
    }

    fn clock(fail: bool) -> FixedClock {
        FixedClock {
            time: DateTime::parse_iso("2025-11-29T12:34:56").unwrap(),
            fail,
        }
    }

    fn scheduler(
        state: Arc<DeskState>,
        fail: bool,
        view_period: u32,
    ) -> RenderScheduler<FixedClock, FrameBuffer> {
        RenderScheduler::new(
            state,
            clock(fail),
            FrameBuffer::new(),
            LayoutConfig::default(),
            view_period,
        )
    }

    #[test]
    fn test_views_alternate() {
        let mut sched = scheduler(Arc::new(DeskState::default()), false, 2);
        let views: Vec<View> = (0..6)
            .map(|_| match sched.frame() {
                FrameReport::Drawn { view, .. } => view,
                other => panic!("unexpected {other:?}"),
            })
            .collect();
        assert_eq!(
            views,
            vec![
                View::TimeAndTimer,
                View::TimeAndTimer,
                View::Date,
                View::Date,
                View::TimeAndTimer,
                View::TimeAndTimer,
            ]
        );
    }

    #[test]
    fn test_frame_publishes_time_and_draws() {
        let state = Arc::new(DeskState::default());
        let mut sched = scheduler(state.clone(), false, 5);
        sched.frame();
        assert_eq!(state.snapshot().time, "12:34:56");

        let fb = sched.surface();
        assert!(!fb.page_is_blank(1));
        assert!(!fb.page_is_blank(5));
        assert!(fb.page_is_blank(0));
    }

    #[test]
    fn test_clock_failure_skips_but_ticks() {
        let state = Arc::new(DeskState::default());
        state.with_engine(|engine| {
            engine.start_stop();
        });
        let mut sched = scheduler(state.clone(), true, 5);

        assert_eq!(sched.frame(), FrameReport::Skipped { transition: None });
        assert_eq!(state.session().seconds_left, 1499);
        assert_eq!(state.time(), None);
    }

    #[test]
    fn test_surface_failure_skips() {
        let state = Arc::new(DeskState::default());
        let mut sched = RenderScheduler::new(
            state.clone(),
            clock(false),
            BrokenSurface,
            LayoutConfig::default(),
            5,
        );
        assert!(matches!(sched.frame(), FrameReport::Skipped { .. }));
        // The time read still succeeded
        assert!(state.time().is_some());
    }

    #[test]
    fn test_transition_forwarded() {
        let config = PomodoroConfig::new(2, 1, 1).unwrap();
        let state = Arc::new(DeskState::new(PomodoroEngine::new(config)));
        state.with_engine(|engine| {
            engine.start_stop();
        });
        let (tx, rx) = mpsc::channel();
        let mut sched = scheduler(state.clone(), false, 5).with_transitions(tx);

        assert_eq!(sched.frame().transition(), None);
        let report = sched.frame();
        let transition = report.transition().unwrap();
        assert_eq!(transition.from, PomodoroState::Work);
        assert_eq!(transition.to, PomodoroState::ShortBreak);
        assert_eq!(rx.try_recv().unwrap(), transition);

        // Stopped after the transition
        assert_eq!(sched.frame().transition(), None);
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn test_listener_drop_is_tolerated() {
        let config = PomodoroConfig::new(1, 1, 1).unwrap();
        let state = Arc::new(DeskState::new(PomodoroEngine::new(config)));
        state.with_engine(|engine| {
            engine.start_stop();
        });
        let (tx, rx) = mpsc::channel();
        drop(rx);
        let mut sched = scheduler(state, false, 5).with_transitions(tx);
        assert!(sched.frame().transition().is_some());
        assert!(sched.transitions.is_none());
    }
}
