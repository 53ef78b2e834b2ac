//! Sensirion sensor drivers for the Enginair air quality monitor
//!
//! Concrete implementations of the sensor traits defined in
//! enginair-core, speaking the shared Sensirion I2C framing: 16-bit
//! big-endian command words, data in 2-byte words each followed by a
//! CRC-8 checksum (polynomial 0x31, init 0xFF).

#![no_std]
#![deny(unsafe_code)]

pub mod scd4x;
pub mod sen5x;

pub use scd4x::Scd4x;
pub use sen5x::Sen5x;

use crc_all::Crc;
use embedded_hal_async::i2c::I2c;

/// A 16-bit Sensirion command word
pub trait SensirionCommand {
    fn raw(&self) -> u16;
}

/// Driver-level errors, split by origin
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error<E> {
    /// I2C transaction failed
    Bus(E),
    /// A response word failed checksum validation
    Crc,
    /// The sensor reports no valid measurement yet
    DataUnavailable,
}

impl<E: embedded_hal_async::i2c::Error> From<E> for Error<E> {
    fn from(e: E) -> Self {
        Self::Bus(e)
    }
}

#[cfg(feature = "defmt")]
impl<E: embedded_hal_async::i2c::Error + defmt::Format> defmt::Format for Error<E> {
    fn format(&self, fmt: defmt::Formatter) {
        match self {
            Error::Bus(e) => e.format(fmt),
            Error::Crc => defmt::write!(fmt, "crc mismatch"),
            Error::DataUnavailable => defmt::write!(fmt, "data unavailable"),
        }
    }
}

/// Shared command/response framing over an I2C bus
pub struct SensirionI2c<T>
where
    T: I2c,
{
    bus: T,
    crc: SensirionCrc,
}

impl<T> SensirionI2c<T>
where
    T: I2c,
{
    pub fn new(bus: T) -> Self {
        Self {
            bus,
            crc: SensirionCrc::new(),
        }
    }

    /// Send a bare command word
    pub async fn write_command<C: SensirionCommand>(
        &mut self,
        address: u8,
        command: C,
    ) -> Result<(), Error<T::Error>> {
        self.bus.write(address, &command.raw().to_be_bytes()).await?;
        Ok(())
    }

    /// Read a single checksummed word
    pub async fn read_word<C: SensirionCommand>(
        &mut self,
        address: u8,
        command: C,
    ) -> Result<u16, Error<T::Error>> {
        self.bus.write(address, &command.raw().to_be_bytes()).await?;

        let mut buffer = [0u8; 3];
        self.bus.read(address, &mut buffer).await?;

        if self.crc.calculate(&buffer[..2]) != buffer[2] {
            return Err(Error::Crc);
        }

        Ok(u16::from_be_bytes([buffer[0], buffer[1]]))
    }

    /// Read a raw response; callers validate the per-word checksums
    pub async fn read_raw<C: SensirionCommand>(
        &mut self,
        address: u8,
        command: C,
        buffer: &mut [u8],
    ) -> Result<(), Error<T::Error>> {
        self.bus.write(address, &command.raw().to_be_bytes()).await?;
        self.bus.read(address, buffer).await?;
        Ok(())
    }

    pub(crate) fn crc(&mut self) -> &mut SensirionCrc {
        &mut self.crc
    }
}

/// CRC-8 as specified for all Sensirion I2C sensors
pub(crate) struct SensirionCrc {
    inner: Crc<u8>,
}

impl SensirionCrc {
    pub fn new() -> Self {
        Self {
            inner: Crc::<u8>::new(0x31, 8, 0xff, 0x00, false),
        }
    }

    pub fn calculate(&mut self, input: &[u8]) -> u8 {
        self.inner.init();
        self.inner.update(input);
        self.inner.finish()
    }
}

/// Extract one checksummed word from a response buffer
pub(crate) fn checked_word<E>(buffer: &[u8], crc: &mut SensirionCrc) -> Result<u16, Error<E>> {
    if crc.calculate(&buffer[..2]) != buffer[2] {
        return Err(Error::Crc);
    }
    Ok(u16::from_be_bytes([buffer[0], buffer[1]]))
}
