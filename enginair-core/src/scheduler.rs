//! Sensor acquisition scheduling
//!
//! Exactly one acquisition attempt per sensor per tick, never blocking
//! on sensor unavailability. The particulate sensor free-runs and is
//! always read; the CO2 sensor is read only when its ready flag says a
//! fresh measurement buffer is waiting.

use crate::reading::{EnvironmentalReading, ParticulateReading, ReadingStore};
use crate::report::{DiagnosticSink, ErrorReporter};
use crate::traits::{Co2Sensor, ParticulateSensor, SensorError, SensorKind};

/// Drives acquisition from both sensors once per tick
pub struct SensorScheduler<P, C> {
    particulate: P,
    co2: C,
}

impl<P, C> SensorScheduler<P, C>
where
    P: ParticulateSensor,
    C: Co2Sensor,
{
    pub fn new(particulate: P, co2: C) -> Self {
        Self { particulate, co2 }
    }

    /// Bring both sensors into measurement mode.
    ///
    /// Each rejected command is reported once and skipped; the device
    /// keeps running in a degraded state rather than halting. Returns
    /// false if any init command was rejected.
    pub async fn init<D: DiagnosticSink>(&mut self, reporter: &mut ErrorReporter<D>) -> bool {
        let mut healthy = true;

        if self.particulate.reset().await.is_err() {
            reporter.report(SensorKind::Particulate, SensorError::ResetFailed);
            healthy = false;
        }
        if self.particulate.start_measurement().await.is_err() {
            reporter.report(SensorKind::Particulate, SensorError::StartFailed);
            healthy = false;
        }

        // The SCD4x rejects a start while a previous periodic run is
        // still active, so stop first.
        if self.co2.stop_periodic().await.is_err() {
            reporter.report(SensorKind::Environmental, SensorError::ResetFailed);
            healthy = false;
        }
        if self.co2.start_periodic().await.is_err() {
            reporter.report(SensorKind::Environmental, SensorError::StartFailed);
            healthy = false;
        }

        healthy
    }

    /// One synchronous read attempt; the sensor has no ready flag
    pub async fn poll_particulate(&mut self) -> Result<ParticulateReading, SensorError> {
        self.particulate.read().await
    }

    /// Non-blocking ready check, then a read only if a buffer waits.
    ///
    /// `Ok(None)` means no new data this tick, which is not an error. A
    /// ready flag observed true is consumed immediately; the sensor
    /// clears its buffer on read and will not raise the flag again
    /// until its next internal cycle.
    pub async fn poll_co2(&mut self) -> Result<Option<EnvironmentalReading>, SensorError> {
        let ready = self
            .co2
            .data_ready()
            .await
            .map_err(|_| SensorError::NotReady)?;

        if !ready {
            return Ok(None);
        }

        self.co2.read().await.map(Some)
    }

    /// One tick's worth of acquisition: particulate first, then CO2.
    ///
    /// Successes update the store; failures go to the reporter and the
    /// store is left untouched. A failed ready-flag query aborts the
    /// remainder of this tick's acquisition.
    pub async fn acquire<D: DiagnosticSink>(
        &mut self,
        store: &mut ReadingStore,
        reporter: &mut ErrorReporter<D>,
    ) {
        match self.poll_particulate().await {
            Ok(reading) => store.update_particulate(reading),
            Err(error) => {
                reporter.report(SensorKind::Particulate, error);
            }
        }

        match self.poll_co2().await {
            Ok(Some(reading)) => store.update_environmental(reading),
            Ok(None) => {}
            Err(error) => {
                reporter.report(SensorKind::Environmental, error);
            }
        }
    }
}
