#![no_std]
#![no_main]

mod peripherals;
mod system;

// Panic handler and debugging
use defmt::unwrap;

use defmt_rtt as _;
use panic_probe as _;

// Device
use embassy_executor::Spawner;
use embassy_nrf::{
    bind_interrupts,
    gpio::{Input, Level, Output, OutputDrive, Pull},
    peripherals::SPI2,
    saadc::{self, ChannelConfig, Resolution, Saadc},
    spim,
};
use embassy_sync::{
    blocking_mutex::raw::ThreadModeRawMutex,
    channel::{Channel, Sender},
    signal::Signal,
};
use embassy_time::{with_timeout, Duration};
use nrf_softdevice::Softdevice;
use static_cell::StaticCell;

bind_interrupts!(struct Irqs {
    SAADC => saadc::InterruptHandler;
    SPIM2_SPIS2_SPI2 => spim::InterruptHandler<SPI2>;
});

// Crate
use peripherals::{backlight::Backlight, battery::Battery, display::Display, vibrator::Vibrator};
use pinetime_wordclock::{
    clock::TickSchedule,
    config::{FaceConfig, MonitorConfig, INITIAL_BATTERY_PERCENT},
    status::haptics::HapticPattern,
    Directive, Directives, Event, TickGranularity, TimeOfDay, WatchFace, WordClockFace,
};
use system::{
    bluetooth::{self, Server},
    config::SystemConfig,
    time::{TimeManager, TimeReference},
};

// Others
use chrono::Timelike;

// Include current UTC epoch at compile time
include!(concat!(env!("OUT_DIR"), "/utc.rs"));
const TIMEZONE: i64 = 1 * 3_600;

/// Backlight level while the watchface is shown
const BRIGHTNESS: u8 = 2;

// Communication channels
pub const EVENT_QUEUE: usize = 8;
pub type EventSender = Sender<'static, ThreadModeRawMutex, Event, EVENT_QUEUE>;

static EVENTS: Channel<ThreadModeRawMutex, Event, EVENT_QUEUE> = Channel::new();
static GRANULARITY: Signal<ThreadModeRawMutex, TickGranularity> = Signal::new();
static HAPTIC: Signal<ThreadModeRawMutex, HapticPattern> = Signal::new();

static SERVER: StaticCell<Server> = StaticCell::new();

#[embassy_executor::task]
async fn softdevice_task(sd: &'static Softdevice) -> ! {
    sd.run().await
}

#[embassy_executor::task(pool_size = 1)]
async fn bluetooth_task(sd: &'static Softdevice, server: &'static Server) -> ! {
    bluetooth::run(sd, server, EVENTS.sender()).await
}

/// Play haptic patterns as they are requested.
#[embassy_executor::task(pool_size = 1)]
async fn notify(mut vibrator: Vibrator) {
    loop {
        let pattern = HAPTIC.wait().await;
        defmt::debug!("Vibrating for {} ms", pattern.duration_ms());
        vibrator.play(pattern).await;
    }
}

/// Wake up on every subscribed tick, poll the battery once a minute.
#[embassy_executor::task(pool_size = 1)]
async fn tick(
    clock: TimeManager,
    mut battery: Battery,
    mut schedule: TickSchedule,
    mut battery_percent: u8,
    server: &'static Server,
) {
    let events = EVENTS.sender();
    loop {
        let delay = schedule.delay_secs(clock.now().second() as u8);
        if let Ok(granularity) = with_timeout(Duration::from_secs(delay), GRANULARITY.wait()).await
        {
            // Re-arm with the new granularity
            schedule.set_granularity(granularity);
            continue;
        }

        let now = clock.now();
        let time = TimeOfDay::from(&now);
        let ticks = schedule.ticks(time);

        if ticks.minute {
            match battery.percent().await {
                Ok(percent) => battery_percent = percent,
                Err(err) => defmt::warn!("Battery measurement failed: {}", err),
            }
            defmt::info!(
                "Battery status: {} ({})",
                battery_percent,
                if battery.is_charging() {
                    "charging"
                } else {
                    "discharging"
                }
            );
            if let Err(err) = server.bas.battery_level_set(&battery_percent) {
                defmt::warn!("Battery service not updated: {:?}", err);
            }

            defmt::info!("Current time: {}:{}", now.hour(), now.minute());
            events
                .send(Event::TickMinute {
                    time,
                    battery_percent,
                })
                .await;
        }

        if ticks.second {
            events.send(Event::TickSecond).await;
        }
    }
}

/// Feed events into the watchface and carry out what it asks for.
#[embassy_executor::task(pool_size = 1)]
async fn watchface(mut face: WordClockFace, mut display: Display<SPI2>) {
    loop {
        let event = EVENTS.receive().await;
        apply(face.handle(event), &mut display);
    }
}

fn apply(directives: Directives, display: &mut Display<SPI2>) {
    for directive in directives {
        let drawn = match directive {
            Directive::SetText { field, text } => display.set_text(field, &text),
            Directive::SetColors { field, colors } => display.set_colors(field, colors),
            Directive::Subscribe(granularity) => {
                GRANULARITY.signal(granularity);
                Ok(())
            }
            Directive::PlayHaptic(pattern) => {
                HAPTIC.signal(pattern);
                Ok(())
            }
        };
        if let Err(err) = drawn {
            defmt::warn!("Display update failed: {}", err);
        }
    }
}

#[embassy_executor::main]
async fn main(spawner: Spawner) {
    let mut p = embassy_nrf::init(SystemConfig::new());
    SystemConfig::lower_driver_priorities();
    defmt::info!("Initializing");

    // Initialize Bluetooth
    let sd = Softdevice::enable(&bluetooth::generate_config());
    let server = SERVER.init(unwrap!(Server::new(sd)));
    let sd: &'static Softdevice = sd;
    unwrap!(spawner.spawn(softdevice_task(sd)));

    // Initialize time
    let clock = TimeManager::init(TimeReference::from_epoch(UTC_TIME + TIMEZONE));

    // Initialize SAADC
    let mut saadc_config = saadc::Config::default();
    // Set resolution to 12bit, necessary for correct battery status calculation
    saadc_config.resolution = Resolution::_12BIT;
    // Pin P0.31: Voltage level
    let channel_config = ChannelConfig::single_ended(&mut p.P0_31);
    let saadc = Saadc::new(p.SAADC, Irqs, saadc_config, [channel_config]);
    saadc.calibrate().await;

    // Initialize Battery
    let mut battery = Battery::init(saadc, Input::new(p.P0_12, Pull::None));
    let battery_percent = match battery.percent().await {
        Ok(percent) => percent,
        Err(err) => {
            defmt::warn!("Battery measurement failed: {}", err);
            INITIAL_BATTERY_PERCENT
        }
    };
    unwrap!(server.bas.battery_level_set(&battery_percent));

    // Initialize Backlight
    let mut backlight = Backlight::init(
        Output::new(p.P0_14, Level::High, OutputDrive::Standard),
        Output::new(p.P0_22, Level::High, OutputDrive::Standard),
        Output::new(p.P0_23, Level::High, OutputDrive::Standard),
    );

    // Initialize vibration motor
    let vibrator = Vibrator::init(Output::new(p.P0_16, Level::High, OutputDrive::Standard));

    // Initialize SPI
    let mut spim_config = spim::Config::default();
    // Use SPI at 8MHz (the fastest clock available on the nRF52832),
    // otherwise refreshing will be super slow.
    spim_config.frequency = spim::Frequency::M8;
    // SPI must be used in mode 3. Mode 0 (the default) won't work.
    spim_config.mode = spim::MODE_3;

    let spim = spim::Spim::new(p.SPI2, Irqs, p.P0_02, p.P0_04, p.P0_03, spim_config);

    // Initialize LCD
    let mut display = unwrap!(Display::init(
        spim,
        Output::new(p.P0_25, Level::Low, OutputDrive::Standard),
        Output::new(p.P0_18, Level::Low, OutputDrive::Standard),
        Output::new(p.P0_26, Level::Low, OutputDrive::Standard),
    ));
    unwrap!(backlight.set(BRIGHTNESS));
    defmt::info!("Backlight at level {}", backlight.brightness());

    // Initialize watchface
    let config = FaceConfig {
        monitor: MonitorConfig {
            initial_battery_percent: battery_percent,
            ..MonitorConfig::default()
        },
        ..FaceConfig::default()
    };
    let mut face = WordClockFace::new(config, bluetooth::is_connected());
    let now = TimeOfDay::from(&clock.now());
    apply(face.start(now), &mut display);

    let mut schedule = TickSchedule::new(face.monitor().granularity());
    schedule.mark_reported(now);

    defmt::info!("Initialization finished");

    // Schedule tasks
    unwrap!(spawner.spawn(bluetooth_task(sd, server)));
    unwrap!(spawner.spawn(notify(vibrator)));
    unwrap!(spawner.spawn(tick(clock, battery, schedule, battery_percent, server)));
    unwrap!(spawner.spawn(watchface(face, display)));
}
