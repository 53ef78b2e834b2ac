//! SCD4x CO2/temperature/humidity sensor
//!
//! The sensor produces one measurement per ~5 s internal cycle while
//! periodic measurement runs. Reading clears the output buffer, so the
//! data-ready flag must be consumed by an immediate read.

use embedded_hal_async::i2c::I2c;

use enginair_core::reading::EnvironmentalReading;
use enginair_core::traits::{Co2Sensor, SensorError};

use crate::{checked_word, Error, SensirionCommand, SensirionI2c};

const SENSOR_ADDR: u8 = 0x62;

/// The data-ready word flags a pending measurement in its low 11 bits
const READY_MASK: u16 = 0x07ff;

enum Command {
    StartPeriodicMeasurement,
    StopPeriodicMeasurement,
    ReadMeasurement,
    GetDataReadyStatus,
}

impl SensirionCommand for Command {
    fn raw(&self) -> u16 {
        match self {
            Command::StartPeriodicMeasurement => 0x21b1,
            Command::StopPeriodicMeasurement => 0x3f86,
            Command::ReadMeasurement => 0xec05,
            Command::GetDataReadyStatus => 0xe4b8,
        }
    }
}

pub struct Scd4x<T>
where
    T: I2c,
{
    bus: SensirionI2c<T>,
}

impl<T> Scd4x<T>
where
    T: I2c,
{
    pub fn new(bus: T) -> Self {
        Self {
            bus: SensirionI2c::new(bus),
        }
    }

    pub async fn start_periodic_measurement(&mut self) -> Result<(), Error<T::Error>> {
        self.bus
            .write_command(SENSOR_ADDR, Command::StartPeriodicMeasurement)
            .await
    }

    pub async fn stop_periodic_measurement(&mut self) -> Result<(), Error<T::Error>> {
        self.bus
            .write_command(SENSOR_ADDR, Command::StopPeriodicMeasurement)
            .await
    }

    /// Non-blocking query of the data-ready flag
    pub async fn get_data_ready_status(&mut self) -> Result<bool, Error<T::Error>> {
        let word = self
            .bus
            .read_word(SENSOR_ADDR, Command::GetDataReadyStatus)
            .await?;
        Ok(decode::is_ready(word))
    }

    /// Read and clear the measurement buffer
    pub async fn read_measurement(&mut self) -> Result<EnvironmentalReading, Error<T::Error>> {
        let mut buffer = [0u8; 9];
        self.bus
            .read_raw(SENSOR_ADDR, Command::ReadMeasurement, &mut buffer)
            .await?;

        decode::measurement(&buffer, self.bus.crc())
    }
}

impl<T> Co2Sensor for Scd4x<T>
where
    T: I2c,
{
    async fn stop_periodic(&mut self) -> Result<(), SensorError> {
        self.stop_periodic_measurement()
            .await
            .map_err(|_| SensorError::Transport)
    }

    async fn start_periodic(&mut self) -> Result<(), SensorError> {
        self.start_periodic_measurement()
            .await
            .map_err(|_| SensorError::Transport)
    }

    async fn data_ready(&mut self) -> Result<bool, SensorError> {
        self.get_data_ready_status()
            .await
            .map_err(|_| SensorError::Transport)
    }

    async fn read(&mut self) -> Result<EnvironmentalReading, SensorError> {
        self.read_measurement()
            .await
            .map_err(|_| SensorError::Transport)
    }
}

mod decode {
    use super::*;
    use crate::SensirionCrc;

    pub(super) fn is_ready(word: u16) -> bool {
        word & READY_MASK != 0
    }

    /// Words are CO2 [ppm] raw, then temperature and humidity as
    /// fractions of full scale per the SCD4x datasheet.
    pub(super) fn measurement<E>(
        buffer: &[u8; 9],
        crc: &mut SensirionCrc,
    ) -> Result<EnvironmentalReading, Error<E>> {
        let co2_ppm = checked_word(&buffer[0..], crc)?;
        let raw_temperature = checked_word(&buffer[3..], crc)?;
        let raw_humidity = checked_word(&buffer[6..], crc)?;

        Ok(EnvironmentalReading {
            co2_ppm,
            temperature: -45.0 + 175.0 * raw_temperature as f32 / u16::MAX as f32,
            humidity: 100.0 * raw_humidity as f32 / u16::MAX as f32,
        })
    }

}
