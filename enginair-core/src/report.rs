//! Diagnostic classification and reporting
//!
//! Sensor errors are translated into descriptive messages here and
//! routed to a line-oriented sink; the formatting is independent of
//! what backs the sink (RTT, serial, a test buffer).

use heapless::String;

use crate::traits::{SensorError, SensorKind};

/// Diagnostic severity
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Level {
    Debug,
    Info,
    Warn,
    Error,
    /// Startup and mode-change announcements
    Banner,
}

impl Level {
    /// Line prefix for sinks without native severities
    pub const fn prefix(self) -> &'static str {
        match self {
            Level::Debug => "[d] ",
            Level::Info => "[i] ",
            Level::Warn => "[W] ",
            Level::Error => "[E] ",
            Level::Banner => "=== ",
        }
    }
}

/// Capacity of a report message
pub const MESSAGE_CAPACITY: usize = 48;

/// A classified diagnostic message
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Report {
    pub level: Level,
    pub message: String<MESSAGE_CAPACITY>,
}

/// Line-oriented diagnostic output, append-only and never read back
pub trait DiagnosticSink {
    fn line(&mut self, level: Level, message: &str);
}

/// Translates driver errors into messages and retains the most recent
/// one for the display's message area. Errors are logged and discarded;
/// no retry or backoff is applied here.
pub struct ErrorReporter<D> {
    sink: D,
    last: Option<Report>,
}

impl<D: DiagnosticSink> ErrorReporter<D> {
    pub fn new(sink: D) -> Self {
        Self { sink, last: None }
    }

    /// Classify a sensor error, emit it, and retain it
    pub fn report(&mut self, kind: SensorKind, error: SensorError) -> &Report {
        let (level, text) = classify(kind, error);
        self.note(level, text)
    }

    /// Emit a pre-formatted line and retain it
    pub fn note(&mut self, level: Level, text: &str) -> &Report {
        self.sink.line(level, text);

        let mut message = String::new();
        let _ = message.push_str(text);
        self.last.insert(Report { level, message })
    }

    /// Most recent report, if any
    pub fn last(&self) -> Option<&Report> {
        self.last.as_ref()
    }

    /// Access the underlying sink
    pub fn sink(&self) -> &D {
        &self.sink
    }
}

fn classify(kind: SensorKind, error: SensorError) -> (Level, &'static str) {
    match (kind, error) {
        (SensorKind::Particulate, SensorError::Transport) => (Level::Warn, "SEN5x: read failed"),
        (SensorKind::Particulate, SensorError::NotReady) => (Level::Debug, "SEN5x: not ready"),
        (SensorKind::Particulate, SensorError::ResetFailed) => {
            (Level::Error, "SEN5x: reset rejected")
        }
        (SensorKind::Particulate, SensorError::StartFailed) => {
            (Level::Error, "SEN5x: measurement start rejected")
        }
        (SensorKind::Environmental, SensorError::Transport) => (Level::Warn, "SCD4x: read failed"),
        (SensorKind::Environmental, SensorError::NotReady) => {
            (Level::Debug, "SCD4x: ready flag unavailable")
        }
        (SensorKind::Environmental, SensorError::ResetFailed) => {
            (Level::Error, "SCD4x: stop command rejected")
        }
        (SensorKind::Environmental, SensorError::StartFailed) => {
            (Level::Error, "SCD4x: measurement start rejected")
        }
    }
}
