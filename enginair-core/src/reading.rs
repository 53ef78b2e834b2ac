//! Reading types and the latest-value store

/// One particulate measurement from the SEN5x
///
/// The SEN54/SEN55 variants additionally report compensated ambient
/// values and gas indices; on the SEN50 those words read as "unknown"
/// and decode to `None`. The display logic only consumes the four mass
/// concentrations.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ParticulateReading {
    /// Mass Concentration PM1.0 [μg/m³]
    pub pm1_0: f32,
    /// Mass Concentration PM2.5 [μg/m³]
    pub pm2_5: f32,
    /// Mass Concentration PM4.0 [μg/m³]
    pub pm4_0: f32,
    /// Mass Concentration PM10 [μg/m³]
    pub pm10_0: f32,
    /// Compensated Ambient Humidity [%RH]
    pub humidity: Option<f32>,
    /// Compensated Ambient Temperature [°C]
    pub temperature: Option<f32>,
    /// VOC Index
    pub voc_index: Option<f32>,
    /// NOx Index
    pub nox_index: Option<f32>,
}

/// One CO2/temperature/humidity measurement from the SCD4x
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct EnvironmentalReading {
    /// CO2 concentration [ppm]
    pub co2_ppm: u16,
    /// Temperature [°C]
    pub temperature: f32,
    /// Relative Humidity [%]
    pub humidity: f32,
}

/// Latest known-good reading per sensor.
///
/// Slots start empty and are only ever overwritten by a newer
/// successful read. A poll that produced no sample must not touch the
/// store, so a valid reading stays visible until replaced.
#[derive(Debug, Default)]
pub struct ReadingStore {
    particulate: Option<ParticulateReading>,
    environmental: Option<EnvironmentalReading>,
}

impl ReadingStore {
    /// Create an empty store (no data yet for either sensor)
    pub const fn new() -> Self {
        Self {
            particulate: None,
            environmental: None,
        }
    }

    /// Store a new particulate reading and mark the slot valid
    pub fn update_particulate(&mut self, reading: ParticulateReading) {
        self.particulate = Some(reading);
    }

    /// Store a new environmental reading and mark the slot valid
    pub fn update_environmental(&mut self, reading: EnvironmentalReading) {
        self.environmental = Some(reading);
    }

    /// Last valid particulate reading, if any read ever succeeded
    pub fn latest_particulate(&self) -> Option<ParticulateReading> {
        self.particulate
    }

    /// Last valid environmental reading, if any read ever succeeded
    pub fn latest_environmental(&self) -> Option<EnvironmentalReading> {
        self.environmental
    }
}
