//! Shared fakes for host tests

use heapless::{String, Vec};

use crate::icons::Icon;
use crate::reading::{EnvironmentalReading, ParticulateReading};
use crate::report::{DiagnosticSink, Level};
use crate::traits::{Co2Sensor, FrameSurface, ParticulateSensor, SensorError, Typeface};

pub fn pm_reading(pm2_5: f32) -> ParticulateReading {
    ParticulateReading {
        pm1_0: pm2_5 / 2.0,
        pm2_5,
        pm4_0: pm2_5 * 1.5,
        pm10_0: pm2_5 * 2.0,
        ..Default::default()
    }
}

pub fn env_reading(co2_ppm: u16, temperature: f32, humidity: f32) -> EnvironmentalReading {
    EnvironmentalReading {
        co2_ppm,
        temperature,
        humidity,
    }
}

// --- sensors ---------------------------------------------------------

/// Scripted particulate sensor: pops one read result per tick, then
/// repeats the fallback.
pub struct ScriptedPm {
    script: Vec<Result<ParticulateReading, SensorError>, 16>,
    cursor: usize,
    fallback: Result<ParticulateReading, SensorError>,
    init_ok: bool,
}

impl ScriptedPm {
    pub fn reading(reading: ParticulateReading) -> Self {
        Self {
            script: Vec::new(),
            cursor: 0,
            fallback: Ok(reading),
            init_ok: true,
        }
    }

    pub fn failing() -> Self {
        Self {
            script: Vec::new(),
            cursor: 0,
            fallback: Err(SensorError::Transport),
            init_ok: false,
        }
    }
}

impl ParticulateSensor for ScriptedPm {
    async fn reset(&mut self) -> Result<(), SensorError> {
        if self.init_ok {
            Ok(())
        } else {
            Err(SensorError::Transport)
        }
    }

    async fn start_measurement(&mut self) -> Result<(), SensorError> {
        if self.init_ok {
            Ok(())
        } else {
            Err(SensorError::Transport)
        }
    }

    async fn read(&mut self) -> Result<ParticulateReading, SensorError> {
        let result = self.script.get(self.cursor).copied().unwrap_or(self.fallback);
        self.cursor += 1;
        result
    }
}

/// One tick's worth of scripted CO2 sensor behavior
#[derive(Debug, Clone, Copy)]
pub struct Co2Tick {
    pub ready: Result<bool, SensorError>,
    pub reading: Result<EnvironmentalReading, SensorError>,
}

/// Scripted CO2 sensor: each ready-flag query consumes one tick plan;
/// the read that may follow uses the same plan.
pub struct ScriptedCo2 {
    script: Vec<Co2Tick, 16>,
    cursor: usize,
    fallback: Co2Tick,
    current: Co2Tick,
    reads: usize,
    init_ok: bool,
}

const IDLE_TICK: Co2Tick = Co2Tick {
    ready: Ok(false),
    reading: Err(SensorError::Transport),
};

impl ScriptedCo2 {
    fn with_fallback(fallback: Co2Tick) -> Self {
        Self {
            script: Vec::new(),
            cursor: 0,
            fallback,
            current: fallback,
            reads: 0,
            init_ok: true,
        }
    }

    /// Ready exactly once with the given reading, idle afterwards
    pub fn ready(reading: EnvironmentalReading) -> Self {
        let mut s = Self::with_fallback(IDLE_TICK);
        s.script
            .push(Co2Tick {
                ready: Ok(true),
                reading: Ok(reading),
            })
            .unwrap();
        s
    }

    /// Never ready
    pub fn not_ready() -> Self {
        Self::with_fallback(IDLE_TICK)
    }

    /// Ready flag up but every read fails on the bus
    pub fn failing_read() -> Self {
        Self::with_fallback(Co2Tick {
            ready: Ok(true),
            reading: Err(SensorError::Transport),
        })
    }

    /// The ready-flag query itself fails on the bus
    pub fn failing_ready_query() -> Self {
        Self::with_fallback(Co2Tick {
            ready: Err(SensorError::Transport),
            reading: Err(SensorError::Transport),
        })
    }

    pub fn sequence(script: &[Co2Tick]) -> Self {
        let mut s = Self::with_fallback(IDLE_TICK);
        for step in script {
            s.script.push(*step).unwrap();
        }
        s
    }

    pub fn with_failing_init(mut self) -> Self {
        self.init_ok = false;
        self
    }

    /// Number of measurement reads performed
    pub fn reads(&self) -> usize {
        self.reads
    }
}

impl Co2Sensor for ScriptedCo2 {
    async fn stop_periodic(&mut self) -> Result<(), SensorError> {
        if self.init_ok {
            Ok(())
        } else {
            Err(SensorError::Transport)
        }
    }

    async fn start_periodic(&mut self) -> Result<(), SensorError> {
        if self.init_ok {
            Ok(())
        } else {
            Err(SensorError::Transport)
        }
    }

    async fn data_ready(&mut self) -> Result<bool, SensorError> {
        self.current = self.script.get(self.cursor).copied().unwrap_or(self.fallback);
        self.cursor += 1;
        self.current.ready
    }

    async fn read(&mut self) -> Result<EnvironmentalReading, SensorError> {
        self.reads += 1;
        self.current.reading
    }
}

// --- display ---------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct TextOp {
    pub x: i32,
    pub y: i32,
    pub face: Typeface,
    pub content: String<64>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BitmapOp {
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
    pub face: Typeface,
}

/// Width the fake assigns to every glyph when advancing the cursor
pub const FAKE_GLYPH_WIDTH: i32 = 6;

/// Recording frame surface. Text and blits land in per-frame logs that
/// `clear` resets, mirroring the full clear-and-redraw contract.
pub struct FakeSurface {
    cursor: (i32, i32),
    face: Typeface,
    pub texts: Vec<TextOp, 16>,
    pub bitmaps: Vec<BitmapOp, 8>,
    pub clears: usize,
    pub flushes: usize,
    pub fail_flush: bool,
}

impl FakeSurface {
    pub fn new() -> Self {
        Self {
            cursor: (0, 0),
            face: Typeface::Proportional,
            texts: Vec::new(),
            bitmaps: Vec::new(),
            clears: 0,
            flushes: 0,
            fail_flush: false,
        }
    }

    pub fn failing_flush() -> Self {
        let mut s = Self::new();
        s.fail_flush = true;
        s
    }

    pub fn text_at(&self, x: i32, y: i32) -> Option<&str> {
        self.texts
            .iter()
            .find(|t| t.x == x && t.y == y)
            .map(|t| t.content.as_str())
    }

    pub fn contains_text(&self, needle: &str) -> bool {
        self.texts.iter().any(|t| t.content.as_str() == needle)
    }

    pub fn bitmaps(&self) -> impl Iterator<Item = &BitmapOp> {
        self.bitmaps.iter()
    }
}

impl FrameSurface for FakeSurface {
    type Error = ();

    fn clear(&mut self) {
        self.clears += 1;
        self.cursor = (0, 0);
        self.texts.clear();
        self.bitmaps.clear();
    }

    fn set_cursor(&mut self, x: i32, y: i32) {
        self.cursor = (x, y);
    }

    fn cursor(&self) -> (i32, i32) {
        self.cursor
    }

    fn set_typeface(&mut self, face: Typeface) {
        self.face = face;
    }

    fn typeface(&self) -> Typeface {
        self.face
    }

    fn draw_text(&mut self, text: &str) -> Result<(), Self::Error> {
        let mut content = String::new();
        let _ = content.push_str(text);
        let _ = self.texts.push(TextOp {
            x: self.cursor.0,
            y: self.cursor.1,
            face: self.face,
            content,
        });
        self.cursor.0 += FAKE_GLYPH_WIDTH * text.chars().count() as i32;
        Ok(())
    }

    fn draw_bitmap(&mut self, icon: &Icon, x: i32, y: i32) -> Result<(), Self::Error> {
        let _ = self.bitmaps.push(BitmapOp {
            x,
            y,
            width: icon.width,
            height: icon.height,
            face: self.face,
        });
        Ok(())
    }

    async fn flush(&mut self) -> Result<(), Self::Error> {
        if self.fail_flush {
            return Err(());
        }
        self.flushes += 1;
        Ok(())
    }
}

// --- diagnostics -----------------------------------------------------

/// Sink that counts lines and keeps the newest one
pub struct RecordingSink {
    pub lines: usize,
    pub last_level: Option<Level>,
    pub last_line: String<64>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self {
            lines: 0,
            last_level: None,
            last_line: String::new(),
        }
    }
}

impl DiagnosticSink for RecordingSink {
    fn line(&mut self, level: Level, message: &str) {
        self.lines += 1;
        self.last_level = Some(level);
        self.last_line.clear();
        let _ = self.last_line.push_str(message);
    }
}
