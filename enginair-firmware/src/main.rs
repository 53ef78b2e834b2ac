//! Enginair - Air Quality Monitor Firmware
//!
//! Samples a SEN5x particulate sensor and an SCD4x CO2 sensor on a
//! shared I2C bus and renders the latest readings on a 128x32 SSD1306
//! OLED, one acquisition-and-render tick per second.

#![no_std]
#![no_main]

use defmt::*;
use embassy_embedded_hal::shared_bus::asynch::i2c::I2cDevice;
use embassy_executor::Spawner;
use embassy_rp::bind_interrupts;
use embassy_rp::i2c::{self, Async, I2c, InterruptHandler};
use embassy_rp::peripherals::I2C0;
use embassy_sync::blocking_mutex::raw::NoopRawMutex;
use embassy_sync::mutex::Mutex;
use ssd1306::prelude::*;
use ssd1306::{I2CDisplayInterface, Ssd1306Async};
use static_cell::StaticCell;
use {defmt_rtt as _, panic_probe as _};

use enginair_core::monitor::Monitor;
use enginair_core::view::ViewPolicy;
use enginair_drivers::{Scd4x, Sen5x};

use crate::surface::OledSurface;
use crate::tasks::DefmtSink;

mod surface;
mod tasks;

bind_interrupts!(struct Irqs {
    I2C0_IRQ => InterruptHandler<I2C0>;
});

/// Both sensors and the OLED share I2C0
pub type I2cBus = I2c<'static, I2C0, Async>;
pub type BusDevice = I2cDevice<'static, NoopRawMutex, I2cBus>;

static I2C_BUS: StaticCell<Mutex<NoopRawMutex, I2cBus>> = StaticCell::new();

#[embassy_executor::main]
async fn main(spawner: Spawner) {
    info!("enginair firmware starting");

    let p = embassy_rp::init(Default::default());

    // SDA=GP16, SCL=GP17
    let i2c = I2c::new_async(p.I2C0, p.PIN_17, p.PIN_16, Irqs, i2c::Config::default());
    let bus = I2C_BUS.init(Mutex::new(i2c));

    let particulate = Sen5x::new(I2cDevice::new(bus));
    let co2 = Scd4x::new(I2cDevice::new(bus));

    let interface = I2CDisplayInterface::new(I2cDevice::new(bus));
    let mut display = Ssd1306Async::new(interface, DisplaySize128x32, DisplayRotation::Rotate0)
        .into_buffered_graphics_mode();
    if let Err(e) = display.init().await {
        // Keep running headless; the monitor absorbs flush failures
        error!("display init failed: {:?}", Debug2Format(&e));
    }

    let monitor = Monitor::new(
        particulate,
        co2,
        OledSurface::new(display),
        DefmtSink,
        ViewPolicy::Combined,
    );

    unwrap!(spawner.spawn(tasks::monitor_task(monitor)));
    info!("monitor task spawned, firmware running");
}
