#[cfg(target_os = "espidf")]
mod firmware {
    use std::sync::{mpsc, Arc};
    use std::time::Duration;

    use anyhow::{anyhow, Context, Result};
    use esp_idf_svc::eventloop::EspSystemEventLoop;
    use esp_idf_svc::hal::delay::FreeRtos;
    use esp_idf_svc::hal::gpio::{self, IOPin, PinDriver};
    use esp_idf_svc::hal::i2c::{I2cConfig, I2cDriver};
    use esp_idf_svc::hal::peripherals::Peripherals;
    use esp_idf_svc::hal::prelude::*;
    use esp_idf_svc::hal::spi;
    use log::{info, warn};

    use pomodesk::buzzer::{self, AlertPattern, LedcTone};
    use pomodesk::config::{DeskConfig, SET_TIME, WIFI_PASS, WIFI_SSID};
    use pomodesk::input::{button, touch, TouchCounter};
    use pomodesk::web::{self, WebApi};
    use pomodesk::wifi::{WifiManager, WifiNetwork};
    use pomodesk::{
        layout, Clock, CommandSource, DateTime, DeskState, Ds3231, InputArbiter, InputCommand,
        PomodoroEngine, RenderScheduler, Ssd1306,
    };

    const TASK_STACK_SIZE: usize = 4096;

    /// Write the build-time timestamp to the RTC, if one was given
    fn provision_rtc(rtc: &mut impl Clock) {
        if let Some(text) = SET_TIME {
            info!("Setting RTC to {}", text);
            match DateTime::parse_iso(text) {
                Ok(time) => {
                    if let Err(e) = rtc.set_time(&time) {
                        warn!("Could not set RTC: {}", e);
                    }
                }
                Err(e) => warn!("POMODESK_SET_TIME ignored: {}", e),
            }
        }

        // Read back the time to verify
        match rtc.get_time() {
            Ok(time) => info!("Current RTC time: {}", time),
            Err(e) => warn!("RTC not readable yet: {}", e),
        }
    }

    // https://docs.esp-rs.org/esp-idf-svc/esp_idf_svc/
    pub fn run() -> Result<()> {
        // It is necessary to call this function once. Otherwise some patches to the runtime
        // implemented by esp-idf-sys might not link properly. See https://github.com/esp-rs/esp-idf-template/issues/71
        esp_idf_svc::sys::link_patches();

        // Bind the log crate to the ESP Logging facilities
        esp_idf_svc::log::EspLogger::initialize_default();

        let reset_reason = esp_idf_svc::hal::reset::ResetReason::get();
        info!("Reset reason: {:?}", reset_reason);

        let config = DeskConfig::default();
        config.validate().context("layout does not fit the panel")?;

        let peripherals = Peripherals::take().expect("Could not take peripherals");
        let pins = peripherals.pins;
        let sys_loop = EspSystemEventLoop::take()?;

        // RTC on I2C0, SDA = Pins::I2C_SDA, SCL = Pins::I2C_SCL
        let i2c = I2cDriver::new(
            peripherals.i2c0,
            pins.gpio6,
            pins.gpio7,
            &I2cConfig::new().baudrate(100.kHz().into()),
        )
        .context("I2C driver")?;
        let mut rtc = Ds3231::new(i2c);
        provision_rtc(&mut rtc);

        info!("Configuring SPI for the OLED");
        let spi = spi::SpiDeviceDriver::new_single(
            peripherals.spi2,
            pins.gpio3,                     // SCLK - Pins::OLED_SCLK
            pins.gpio2,                     // MOSI - Pins::OLED_MOSI
            Option::<gpio::AnyIOPin>::None, // The panel has no MISO
            Some(pins.gpio5),               // CS - Pins::OLED_CS
            &spi::SpiDriverConfig::new(),
            &spi::SpiConfig::new().baudrate(8.MHz().into()),
        )
        .context("SPI device driver")?;

        let mut oled = Ssd1306::new(
            spi,
            PinDriver::output(pins.gpio4)?,  // Pins::OLED_DC
            PinDriver::output(pins.gpio10)?, // Pins::OLED_RST
            &mut FreeRtos,
        )
        .map_err(|e| anyhow!("OLED init failed: {:?}", e))?;

        oled.fill_test_pattern()?;
        FreeRtos::delay_ms(1000);
        layout::clear(&mut oled)?;

        let state = Arc::new(DeskState::new(PomodoroEngine::new(config.pomodoro)));
        let (arbiter, commands) = InputArbiter::new(state.clone(), CommandSource::Button);

        let schedule = &config.schedule;
        button::spawn(
            pins.gpio0.downgrade(), // Pins::BTN_START_STOP
            InputCommand::StartStop,
            schedule.debounce_ms,
            commands.clone(),
        )?;
        button::spawn(
            pins.gpio1.downgrade(), // Pins::BTN_RESET
            InputCommand::Reset,
            schedule.debounce_ms,
            commands.clone(),
        )?;
        let counter = Arc::new(TouchCounter::new(schedule.touch_modes, schedule.debounce_ms));
        touch::spawn(
            pins.gpio9.downgrade(), // Pins::TOUCH
            counter,
            schedule.touch_poll_ms,
            commands.with_source(CommandSource::Touch),
        )?;

        std::thread::Builder::new()
            .name("arbiter".into())
            .stack_size(TASK_STACK_SIZE)
            .spawn(move || arbiter.run())?;

        let pattern = AlertPattern::default();
        let tone = LedcTone::new(
            peripherals.ledc.channel0,
            peripherals.ledc.timer0,
            pins.gpio18, // Pins::BUZZER
            &pattern,
        )?;
        let (alerts, alert_rx) = mpsc::channel();
        std::thread::Builder::new()
            .name("buzzer".into())
            .stack_size(TASK_STACK_SIZE)
            .spawn(move || buzzer::run_alerts(alert_rx, tone, FreeRtos, pattern))?;

        // Both must stay alive for the server to keep answering
        let mut _wifi = None;
        let mut _server = None;
        if DeskConfig::has_wifi() {
            let mut wifi = WifiManager::new(peripherals.modem, sys_loop)?;
            match wifi.connect(&[WifiNetwork::new(WIFI_SSID, WIFI_PASS)]) {
                Ok(()) => {
                    let api = WebApi::new(state.clone(), commands.with_source(CommandSource::Web));
                    _server = Some(web::server::start(Arc::new(api))?);
                    _wifi = Some(wifi);
                }
                Err(e) => warn!("WiFi unavailable, running without web UI: {:?}", e),
            }
        } else {
            info!("No WiFi credentials configured, web UI disabled");
        }
        drop(commands);

        let mut scheduler = RenderScheduler::new(
            state,
            rtc,
            oled,
            config.layout,
            config.schedule.view_period,
        )
        .with_transitions(alerts);
        info!("Desk running");
        scheduler.run(Duration::from_millis(config.schedule.frame_interval_ms.into()))
    }
}

#[cfg(target_os = "espidf")]
fn main() -> anyhow::Result<()> {
    firmware::run()
}

#[cfg(not(target_os = "espidf"))]
fn main() {
    eprintln!("pomodesk is firmware for the ESP32-C3; build it with the espidf target");
}
