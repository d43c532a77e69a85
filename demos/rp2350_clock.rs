//! # AB0805 on Raspberry Pi Pico 2
//!
//! Brings the RTC up on I2C0 (GP4 SDA, GP5 SCL), seeds it once if it still
//! holds the power-on date, then logs the time over RTT every second while
//! blinking the on-board LED.
//!
//! Build: `cargo build --example rp2350_clock --features rp2350-demo
//! --target thumbv8m.main-none-eabihf` (needs the board's memory.x).

#![no_std]
#![no_main]

use panic_halt as _;

use rp235x_hal as hal;

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::OutputPin;
use hal::gpio::{FunctionI2C, PullUp};
use hal::Clock;

use defmt::*;
use defmt_rtt as _;

use ab0805::{Ab0805, Ab0805Api, DateTime};

/// Pin and clock constants for this board
mod board {
    pub const XTAL_FREQ_HZ: u32 = 12_000_000;
    pub const I2C_FREQ_HZ: u32 = 100_000;
    pub const LOG_INTERVAL_MS: u32 = 1_000;
}

/// Written when the chip reports a year before this one.
const SEED_TIME: DateTime = DateTime { year: 2025, month: 7, day: 6, hour: 14, minute: 30, second: 0 };

/// Tell the Boot ROM about our application
#[link_section = ".start_block"]
#[used]
pub static IMAGE_DEF: hal::block::ImageDef = hal::block::ImageDef::secure_exe();

#[hal::entry]
fn main() -> ! {
    info!("AB0805 demo starting on RP2350");

    let mut pac = hal::pac::Peripherals::take().unwrap();
    let mut watchdog = hal::Watchdog::new(pac.WATCHDOG);

    let clocks = hal::clocks::init_clocks_and_plls(
        board::XTAL_FREQ_HZ,
        pac.XOSC,
        pac.CLOCKS,
        pac.PLL_SYS,
        pac.PLL_USB,
        &mut pac.RESETS,
        &mut watchdog,
    )
    .unwrap();

    let mut timer = hal::Timer::new_timer0(pac.TIMER0, &mut pac.RESETS, &clocks);

    let sio = hal::Sio::new(pac.SIO);
    let pins = hal::gpio::Pins::new(
        pac.IO_BANK0,
        pac.PADS_BANK0,
        sio.gpio_bank0,
        &mut pac.RESETS,
    );

    let mut led_pin = pins.gpio25.into_push_pull_output();

    let sda = pins.gpio4.into_function::<FunctionI2C>().into_pull_type::<PullUp>();
    let scl = pins.gpio5.into_function::<FunctionI2C>().into_pull_type::<PullUp>();
    let i2c = hal::I2C::i2c0(
        pac.I2C0,
        sda,
        scl,
        hal::fugit::HertzU32::Hz(board::I2C_FREQ_HZ),
        &mut pac.RESETS,
        clocks.system_clock.freq(),
    );

    let mut rtc = Ab0805::new(i2c);
    let mut api = Ab0805Api::new(&mut rtc);

    match api.init() {
        Ok(()) => info!("AB0805 ready: {}", api.format_iso8601().as_str()),
        Err(e) => error!("AB0805 init failed: {:?}", e),
    }

    if api.present && api.last().year < SEED_TIME.year {
        warn!("AB0805 holds a stale date, seeding");
        if let Err(e) = api.set_datetime(&SEED_TIME) {
            error!("AB0805 seed failed: {:?}", e);
        }
    }

    let mut led_on = false;
    loop {
        if api.present {
            match api.now() {
                Ok(_) => info!("RTC: {}", api.format_iso8601().as_str()),
                Err(e) => warn!("RTC read failed: {:?}", e),
            }
        }

        led_on = !led_on;
        if led_on {
            led_pin.set_high().unwrap();
        } else {
            led_pin.set_low().unwrap();
        }

        timer.delay_ms(board::LOG_INTERVAL_MS);
    }
}

/// Program metadata for `picotool info`
#[link_section = ".bi_entries"]
#[used]
pub static PICOTOOL_ENTRIES: [hal::binary_info::EntryAddr; 5] = [
    hal::binary_info::rp_cargo_bin_name!(),
    hal::binary_info::rp_cargo_version!(),
    hal::binary_info::rp_program_description!(c"AB0805 RTC demo"),
    hal::binary_info::rp_cargo_homepage_url!(),
    hal::binary_info::rp_program_build_attribute!(),
];

defmt::timestamp!("{=u64:us}", {
    // Not wired to a hardware timer; a monotonically increasing counter
    // keeps log ordering readable.
    static COUNTER: core::sync::atomic::AtomicU32 = core::sync::atomic::AtomicU32::new(0);
    COUNTER.fetch_add(1, core::sync::atomic::Ordering::Relaxed) as u64
});
