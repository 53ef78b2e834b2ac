//! SEN5x particulate matter sensor
//!
//! The sensor free-runs once measurement is started and serves the
//! latest values on every read. The SEN50 variant populates only the
//! four mass concentrations; the ambient and gas-index words read as
//! the "unknown" sentinel and decode to `None`.

use embedded_hal_async::i2c::I2c;

use enginair_core::reading::ParticulateReading;
use enginair_core::traits::{ParticulateSensor, SensorError};

use crate::{Error, SensirionCommand, SensirionI2c};

const SENSOR_ADDR: u8 = 0x69;

/// Unsigned words report this value while no measurement is available
const UNKNOWN_U16: u16 = 0xffff;
/// Signed words report this value when the variant lacks the sensor
const UNKNOWN_I16: u16 = 0x7fff;

enum Command {
    StartMeasurement,
    StopMeasurement,
    ReadMeasuredValues,
    DeviceReset,
}

impl SensirionCommand for Command {
    fn raw(&self) -> u16 {
        match self {
            Command::StartMeasurement => 0x0021,
            Command::StopMeasurement => 0x0104,
            Command::ReadMeasuredValues => 0x03c4,
            Command::DeviceReset => 0xd304,
        }
    }
}

pub struct Sen5x<T>
where
    T: I2c,
{
    bus: SensirionI2c<T>,
}

impl<T> Sen5x<T>
where
    T: I2c,
{
    pub fn new(bus: T) -> Self {
        Self {
            bus: SensirionI2c::new(bus),
        }
    }

    pub async fn device_reset(&mut self) -> Result<(), Error<T::Error>> {
        self.bus.write_command(SENSOR_ADDR, Command::DeviceReset).await
    }

    pub async fn start_measurement(&mut self) -> Result<(), Error<T::Error>> {
        self.bus
            .write_command(SENSOR_ADDR, Command::StartMeasurement)
            .await
    }

    pub async fn stop_measurement(&mut self) -> Result<(), Error<T::Error>> {
        self.bus
            .write_command(SENSOR_ADDR, Command::StopMeasurement)
            .await
    }

    /// Read the current measured values.
    ///
    /// Returns `DataUnavailable` while the sensor is still warming up
    /// and has not produced its first measurement.
    pub async fn read_measured_values(&mut self) -> Result<ParticulateReading, Error<T::Error>> {
        let mut buffer = [0u8; 24];
        self.bus
            .read_raw(SENSOR_ADDR, Command::ReadMeasuredValues, &mut buffer)
            .await?;

        decode::measured_values(&buffer, self.bus.crc())
    }
}

impl<T> ParticulateSensor for Sen5x<T>
where
    T: I2c,
{
    async fn reset(&mut self) -> Result<(), SensorError> {
        self.device_reset()
            .await
            .map_err(|_| SensorError::Transport)
    }

    async fn start_measurement(&mut self) -> Result<(), SensorError> {
        Sen5x::start_measurement(self)
            .await
            .map_err(|_| SensorError::Transport)
    }

    async fn read(&mut self) -> Result<ParticulateReading, SensorError> {
        self.read_measured_values()
            .await
            .map_err(|_| SensorError::Transport)
    }
}

mod decode {
    use super::*;
    use crate::{checked_word, SensirionCrc};

    /// Scale factors from the SEN5x datasheet: mass concentrations are
    /// reported x10, humidity x100, temperature x200, gas indices x10.
    pub(super) fn measured_values<E>(
        buffer: &[u8; 24],
        crc: &mut SensirionCrc,
    ) -> Result<ParticulateReading, Error<E>> {
        let pm1_0 = mass_concentration(checked_word(&buffer[0..], crc)?)?;
        let pm2_5 = mass_concentration(checked_word(&buffer[3..], crc)?)?;
        let pm4_0 = mass_concentration(checked_word(&buffer[6..], crc)?)?;
        let pm10_0 = mass_concentration(checked_word(&buffer[9..], crc)?)?;

        Ok(ParticulateReading {
            pm1_0,
            pm2_5,
            pm4_0,
            pm10_0,
            humidity: signed_scaled(checked_word(&buffer[12..], crc)?, 100.0),
            temperature: signed_scaled(checked_word(&buffer[15..], crc)?, 200.0),
            voc_index: signed_scaled(checked_word(&buffer[18..], crc)?, 10.0),
            nox_index: signed_scaled(checked_word(&buffer[21..], crc)?, 10.0),
        })
    }

    fn mass_concentration<E>(raw: u16) -> Result<f32, Error<E>> {
        if raw == UNKNOWN_U16 {
            return Err(Error::DataUnavailable);
        }
        Ok(raw as f32 / 10.0)
    }

    fn signed_scaled(raw: u16, scale: f32) -> Option<f32> {
        if raw == UNKNOWN_I16 {
            return None;
        }
        Some(raw as i16 as f32 / scale)
    }

}
