//! Touch pad: the interrupt bumps a [`TouchCounter`], a poller turns mode
//! changes into commands

use std::sync::Arc;
use std::thread::JoinHandle;

use anyhow::{Context, Result};
use esp_idf_svc::hal::{
    delay::FreeRtos,
    gpio::{AnyIOPin, InterruptType, PinDriver, Pull},
};
use log::{info, warn};

use super::{CommandSender, ModeWatcher, TouchCounter};

const STACK_SIZE: usize = 4096;

fn now_ms() -> u32 {
    // esp_timer runs from boot in microseconds; wrapping is handled by the counter
    (unsafe { esp_idf_svc::sys::esp_timer_get_time() } / 1000) as u32
}

/// Arm the touch interrupt on `pin` and spawn the poller
pub fn spawn(
    pin: AnyIOPin,
    counter: Arc<TouchCounter>,
    poll_ms: u32,
    sender: CommandSender,
) -> Result<JoinHandle<()>> {
    let mut pin = PinDriver::input(pin).context("touch pin")?;
    // The pad pulls the line low when touched
    pin.set_pull(Pull::Up)?;
    pin.set_interrupt_type(InterruptType::NegEdge)?;

    let isr_counter = counter.clone();
    unsafe {
        pin.subscribe(move || {
            isr_counter.on_touch(now_ms());
        })?;
    }

    std::thread::Builder::new()
        .name("touch".into())
        .stack_size(STACK_SIZE)
        .spawn(move || {
            let mut watcher = ModeWatcher::new();
            info!("Touch poller ready");
            loop {
                if let Err(e) = pin.enable_interrupt() {
                    warn!("Touch interrupt could not be re-armed: {:?}", e);
                }
                if let Some(command) = watcher.observe(counter.mode()) {
                    if !sender.send(command) {
                        return;
                    }
                }
                FreeRtos::delay_ms(poll_ms);
            }
        })
        .context("spawning touch task")
}
