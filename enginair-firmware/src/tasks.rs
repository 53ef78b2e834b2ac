//! Embassy tasks

use defmt::info;
use embassy_time::{Duration, Ticker};
use ssd1306::prelude::I2CInterface;

use enginair_core::monitor::{Monitor, TICK_PERIOD_S};
use enginair_core::report::{DiagnosticSink, Level};
use enginair_drivers::{Scd4x, Sen5x};

use crate::surface::OledSurface;
use crate::BusDevice;

pub type AppMonitor =
    Monitor<Sen5x<BusDevice>, Scd4x<BusDevice>, OledSurface<I2CInterface<BusDevice>>, DefmtSink>;

/// Routes core diagnostics to defmt
pub struct DefmtSink;

impl DiagnosticSink for DefmtSink {
    fn line(&mut self, level: Level, message: &str) {
        match level {
            Level::Debug => defmt::debug!("{=str}", message),
            Level::Info => defmt::info!("{=str}", message),
            Level::Warn => defmt::warn!("{=str}", message),
            Level::Error => defmt::error!("{=str}", message),
            Level::Banner => defmt::info!("{=str}{=str}", Level::Banner.prefix(), message),
        }
    }
}

/// The whole device is one cooperative loop: poll both sensors, render
/// the active view, once per second.
#[embassy_executor::task]
pub async fn monitor_task(mut monitor: AppMonitor) {
    info!("Monitor task started");

    monitor.init().await;

    let mut ticker = Ticker::every(Duration::from_secs(TICK_PERIOD_S));
    loop {
        ticker.next().await;
        monitor.tick().await;
    }
}
