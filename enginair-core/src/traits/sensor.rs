//! Sensor driver traits

use crate::reading::{EnvironmentalReading, ParticulateReading};

/// Errors surfaced by sensor acquisition
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SensorError {
    /// Bus transaction failed or the response failed checksum validation
    Transport,
    /// The data-ready flag could not be queried this tick
    NotReady,
    /// Reset command rejected at startup
    ResetFailed,
    /// Measurement-start command rejected at startup
    StartFailed,
}

/// Which sensor an error originated from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SensorKind {
    Particulate,
    Environmental,
}

/// Particulate matter sensor (SEN5x family)
///
/// The sensor free-runs once measurement is started; `read` is always
/// a valid request and there is no ready flag to consult.
pub trait ParticulateSensor {
    /// Issue a device reset
    async fn reset(&mut self) -> Result<(), SensorError>;

    /// Start continuous measurement
    async fn start_measurement(&mut self) -> Result<(), SensorError>;

    /// Read the current measured values
    async fn read(&mut self) -> Result<ParticulateReading, SensorError>;
}

/// CO2/temperature/humidity sensor (SCD4x family)
///
/// The sensor produces a measurement roughly every five seconds and
/// clears its output buffer when read, so a true ready flag must be
/// consumed immediately.
pub trait Co2Sensor {
    /// Stop periodic measurement (required before reconfiguring)
    async fn stop_periodic(&mut self) -> Result<(), SensorError>;

    /// Start periodic measurement
    async fn start_periodic(&mut self) -> Result<(), SensorError>;

    /// Non-blocking query of the data-ready flag
    async fn data_ready(&mut self) -> Result<bool, SensorError>;

    /// Read the measurement buffer
    async fn read(&mut self) -> Result<EnvironmentalReading, SensorError>;
}
