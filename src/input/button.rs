//! Push button task: GPIO interrupt wakes a thread that debounces the edge

use std::num::NonZeroU32;
use std::thread::JoinHandle;

use anyhow::{Context, Result};
use esp_idf_svc::hal::{
    delay::{FreeRtos, BLOCK},
    gpio::{AnyIOPin, Input, InterruptType, PinDriver, Pull},
    task::notification::Notification,
};
use log::{info, warn};

use super::{ButtonDebouncer, CommandSender, InputCommand, Level};

const STACK_SIZE: usize = 4096;

/// Configure `pin` as an active-low button and spawn the task that turns its
/// presses into `command`.
pub fn spawn(
    pin: AnyIOPin,
    command: InputCommand,
    debounce_ms: u32,
    sender: CommandSender,
) -> Result<JoinHandle<()>> {
    let mut pin = PinDriver::input(pin).context("button pin")?;
    pin.set_pull(Pull::Up)?;
    pin.set_interrupt_type(InterruptType::NegEdge)?;

    std::thread::Builder::new()
        .name(format!("btn-{}", command))
        .stack_size(STACK_SIZE)
        .spawn(move || {
            if let Err(e) = run(pin, command, debounce_ms, sender) {
                warn!("{} button task stopped: {:?}", command, e);
            }
        })
        .context("spawning button task")
}

fn run(
    mut pin: PinDriver<'static, AnyIOPin, Input>,
    command: InputCommand,
    debounce_ms: u32,
    sender: CommandSender,
) -> Result<()> {
    // The notification must belong to the thread that waits on it
    let notification = Notification::new();
    let notifier = notification.notifier();
    unsafe {
        pin.subscribe(move || {
            notifier.notify_and_yield(NonZeroU32::MIN);
        })?;
    }

    let mut debouncer = ButtonDebouncer::new(command);
    info!("{} button ready", command);
    loop {
        // Interrupts disarm themselves after firing
        pin.enable_interrupt()?;
        notification.wait(BLOCK);

        let first = Level::from(pin.is_high());
        FreeRtos::delay_ms(debounce_ms);
        let settled = Level::from(pin.is_high());

        if let Some(command) = debouncer.on_samples(first, settled) {
            if !sender.send(command) {
                return Ok(());
            }
        }
        // Catch the release so the next press is an edge again
        if settled == Level::Low {
            while pin.is_low() {
                FreeRtos::delay_ms(debounce_ms);
            }
            debouncer.on_samples(Level::High, Level::High);
        }
    }
}
