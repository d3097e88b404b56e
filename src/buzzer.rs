//! Phase change alert on the piezo buzzer
//!
//! The scheduler hands every [`Transition`] to a channel; [`run_alerts`]
//! drains it on its own thread so beeping never delays a frame.

use std::sync::mpsc::Receiver;

use embedded_hal::delay::DelayNs;
use log::{info, warn};

use crate::pomodoro::Transition;

/// Beep timings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AlertPattern {
    pub beeps: u32,
    pub on_ms: u32,
    pub off_ms: u32,
    pub frequency_hz: u32,
}

impl Default for AlertPattern {
    fn default() -> Self {
        Self {
            beeps: 3,
            on_ms: 200,
            off_ms: 200,
            frequency_hz: 2000,
        }
    }
}

/// Something that can sound a continuous tone
pub trait Tone {
    type Error: std::fmt::Debug;

    fn tone_on(&mut self) -> Result<(), Self::Error>;
    fn tone_off(&mut self) -> Result<(), Self::Error>;
}

/// Play `pattern` once. The tone is always left off.
pub fn play<T: Tone>(
    tone: &mut T,
    delay: &mut impl DelayNs,
    pattern: &AlertPattern,
) -> Result<(), T::Error> {
    for beep in 0..pattern.beeps {
        tone.tone_on()?;
        delay.delay_ms(pattern.on_ms);
        tone.tone_off()?;
        if beep + 1 < pattern.beeps {
            delay.delay_ms(pattern.off_ms);
        }
    }
    Ok(())
}

/// Beep for every transition until the sender side is gone
pub fn run_alerts<T: Tone>(
    transitions: Receiver<Transition>,
    mut tone: T,
    mut delay: impl DelayNs,
    pattern: AlertPattern,
) {
    while let Ok(transition) = transitions.recv() {
        info!("Alert: {} -> {}", transition.from, transition.to);
        if let Err(e) = play(&mut tone, &mut delay, &pattern) {
            warn!("Buzzer failed: {:?}", e);
            let _ = tone.tone_off();
        }
    }
}

#[cfg(target_os = "espidf")]
pub use ledc::LedcTone;

#[cfg(target_os = "espidf")]
mod ledc {
    use anyhow::Result;
    use esp_idf_svc::hal::gpio::OutputPin;
    use esp_idf_svc::hal::ledc::{
        config::TimerConfig, LedcDriver, LedcTimerDriver, CHANNEL0, TIMER0,
    };
    use esp_idf_svc::hal::peripheral::Peripheral;
    use esp_idf_svc::hal::prelude::*;
    use esp_idf_svc::sys::EspError;

    use super::{AlertPattern, Tone};

    /// Square wave at half duty on LEDC channel 0
    pub struct LedcTone {
        driver: LedcDriver<'static>,
        // Dropping the timer driver stops the PWM clock
        _timer: LedcTimerDriver<'static, TIMER0>,
    }

    impl LedcTone {
        pub fn new(
            channel: CHANNEL0,
            timer: TIMER0,
            pin: impl Peripheral<P = impl OutputPin> + 'static,
            pattern: &AlertPattern,
        ) -> Result<Self> {
            let timer = LedcTimerDriver::new(
                timer,
                &TimerConfig::new().frequency(pattern.frequency_hz.Hz().into()),
            )?;
            let mut driver = LedcDriver::new(channel, &timer, pin)?;
            driver.set_duty(0)?;
            Ok(Self {
                driver,
                _timer: timer,
            })
        }
    }

    impl Tone for LedcTone {
        type Error = EspError;

        fn tone_on(&mut self) -> Result<(), EspError> {
            let duty = self.driver.get_max_duty() / 2;
            self.driver.set_duty(duty)
        }

        fn tone_off(&mut self) -> Result<(), EspError> {
            self.driver.set_duty(0)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pomodoro::PomodoroState;
    use std::sync::mpsc;

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    enum Event {
        On,
        Off,
        Wait(u32),
    }

    #[derive(Default)]
    struct Log(Vec<Event>);

    struct FakeTone<'a>(&'a std::cell::RefCell<Log>);

    impl Tone for FakeTone<'_> {
        type Error = ();

        fn tone_on(&mut self) -> Result<(), ()> {
            self.0.borrow_mut().0.push(Event::On);
            Ok(())
        }

        fn tone_off(&mut self) -> Result<(), ()> {
            self.0.borrow_mut().0.push(Event::Off);
            Ok(())
        }
    }

    struct FakeDelay<'a>(&'a std::cell::RefCell<Log>);

    impl DelayNs for FakeDelay<'_> {
        fn delay_ns(&mut self, ns: u32) {
            self.0.borrow_mut().0.push(Event::Wait(ns / 1_000_000));
        }

        fn delay_ms(&mut self, ms: u32) {
            self.0.borrow_mut().0.push(Event::Wait(ms));
        }
    }

    #[test]
    fn test_default_pattern() {
        let log = std::cell::RefCell::new(Log::default());
        play(&mut FakeTone(&log), &mut FakeDelay(&log), &AlertPattern::default()).unwrap();
        use Event::*;
        assert_eq!(
            log.into_inner().0,
            vec![On, Wait(200), Off, Wait(200), On, Wait(200), Off, Wait(200), On, Wait(200), Off]
        );
    }

    #[test]
    fn test_one_beep_per_transition() {
        let log = std::cell::RefCell::new(Log::default());
        let (tx, rx) = mpsc::channel();
        let transition = Transition {
            from: PomodoroState::Work,
            to: PomodoroState::ShortBreak,
            completed_work_sessions: 1,
        };
        tx.send(transition).unwrap();
        tx.send(transition).unwrap();
        drop(tx);

        let pattern = AlertPattern {
            beeps: 1,
            ..AlertPattern::default()
        };
        run_alerts(rx, FakeTone(&log), FakeDelay(&log), pattern);
        let ons = log.into_inner().0.iter().filter(|e| **e == Event::On).count();
        assert_eq!(ons, 2);
    }
}
