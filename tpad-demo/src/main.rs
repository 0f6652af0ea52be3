#![no_std]
#![no_main]
#![deny(
    clippy::mem_forget,
    reason = "mem::forget is generally not safe to do with esp_hal types, especially those     holding buffers for the duration of a data transfer."
)]

use embassy_executor::Spawner;
use embassy_time::{Duration, Timer};
use embedded_bus::MutexI2cDevice;
use esp_hal::i2c::master::I2c;
use esp_hal::{
    clock::CpuClock,
    gpio::{Input, InputConfig, Pull},
    time::Rate,
    timer::systimer::SystemTimer,
};
use esp_println::println;
use log::{info, warn};
use mpr121::Mpr121;
use tpad::conf::{INTERRUPT_LINE, QUAD_PAD};
use tpad::{ChipRegistry, TouchEdge, TouchScanner};

#[panic_handler]
fn panic(info: &core::panic::PanicInfo) -> ! {
    println!("{}", info);
    loop {}
}

extern crate alloc;

// This creates a default app-descriptor required by the esp-idf bootloader.
// For more information see: <https://docs.espressif.com/projects/esp-idf/en/stable/esp32/api-reference/system/app_image_format.html#application-description>
esp_bootloader_esp_idf::esp_app_desc!();

/// Scan period of the control loop.
const SCAN_PERIOD: Duration = Duration::from_millis(20);

#[esp_hal_embassy::main]
async fn main(_spawner: Spawner) {
    esp_println::logger::init_logger(log::LevelFilter::Info);

    let config = esp_hal::Config::default().with_cpu_clock(CpuClock::max());
    let peripherals = esp_hal::init(config);

    esp_alloc::heap_allocator!(size: 64 * 1024);

    let timer0 = SystemTimer::new(peripherals.SYSTIMER);
    esp_hal_embassy::init(timer0.alarm0);

    // The IRQ outputs of all four controllers are open drain and wired together.
    let irq = Input::new(
        peripherals.GPIO7,
        InputConfig::default().with_pull(Pull::Up),
    );

    let config = esp_hal::i2c::master::Config::default().with_frequency(Rate::from_khz(400));
    let i2c = match I2c::new(peripherals.I2C0, config) {
        Ok(i2c) => i2c.with_sda(peripherals.GPIO13).with_scl(peripherals.GPIO14),
        Err(err) => {
            warn!("Error configuring I2C: {err:?}");
            park().await
        }
    };
    let bus = MutexI2cDevice::share(i2c);

    let registry = QUAD_PAD.iter().fold(ChipRegistry::new(), |registry, chip| {
        registry.with_chip(*chip, Mpr121::new(MutexI2cDevice::new(bus.clone())))
    });
    let mut scanner = TouchScanner::with_interrupt(registry, irq, INTERRUPT_LINE);

    if let Err(err) = scanner.initialize() {
        warn!("Error initializing touch pad: {err}");
        park().await
    }
    info!("Touch pad ready, {} buttons", scanner.registry().buttons().count());

    loop {
        match scanner.poll_all() {
            Ok(events) => {
                for event in events {
                    match event.edge {
                        TouchEdge::Down(id) => info!("button {id} down"),
                        TouchEdge::Up(id) => info!("button {id} up"),
                        TouchEdge::None => {}
                    }
                }
            }
            Err(err) => warn!("Error scanning touch pad: {err}"),
        }
        Timer::after(SCAN_PERIOD).await;
    }
}

async fn park() -> ! {
    loop {
        Timer::after(Duration::from_secs(1)).await;
    }
}
