//! Fixed-layout rendering of the active view
//!
//! The multiplexer never fails on missing data: slots that have not
//! seen a valid reading render as placeholders, and every frame is a
//! full clear-and-redraw.

use core::fmt::Write;

use heapless::String;

use super::View;
use crate::icons;
use crate::reading::ReadingStore;
use crate::report::{Report, MESSAGE_CAPACITY};
use crate::traits::{FrameSurface, IconScope, Typeface};

/// Frame geometry of the target panel
pub const DISPLAY_WIDTH: i32 = 128;
pub const DISPLAY_HEIGHT: i32 = 32;

const LEFT_COL_X: i32 = 0;
const RIGHT_COL_X: i32 = 68;
const TOP_ROW_Y: i32 = 2;
const BOTTOM_ROW_Y: i32 = 18;
const MESSAGE_ROW_Y: i32 = 12;

/// Gap between a numeric field and its unit icon
const ICON_GAP: i32 = 2;

/// Placeholder for a one-decimal field with no data yet
const NO_DATA: &str = "--.-";
/// Placeholder for the CO2 field with no data yet
const NO_DATA_PPM: &str = "----";

type Field = String<20>;

/// Renders ReadingStore contents onto the frame surface
pub struct DisplayMultiplexer;

impl DisplayMultiplexer {
    pub const fn new() -> Self {
        Self
    }

    /// Render one full frame for the given view and push it out
    pub async fn render<S: FrameSurface>(
        &self,
        surface: &mut S,
        store: &ReadingStore,
        view: View,
    ) -> Result<(), S::Error> {
        surface.clear();
        surface.set_typeface(Typeface::Proportional);

        match view {
            View::Combined => self.draw_combined(surface, store)?,
            View::Particulate => self.draw_particulate(surface, store)?,
            View::Environmental => self.draw_environmental(surface, store)?,
        }

        surface.flush().await
    }

    /// Render a single diagnostic line (startup, init failures)
    pub async fn render_message<S: FrameSurface>(
        &self,
        surface: &mut S,
        report: &Report,
    ) -> Result<(), S::Error> {
        surface.clear();
        surface.set_typeface(Typeface::Proportional);
        surface.set_cursor(LEFT_COL_X, MESSAGE_ROW_Y);

        let mut line: String<{ MESSAGE_CAPACITY + 4 }> = String::new();
        let _ = line.push_str(report.level.prefix());
        let _ = line.push_str(report.message.as_str());
        surface.draw_text(&line)?;

        surface.flush().await
    }

    /// Two-column quadrant layout: PM2.5 and CO2 on top, temperature
    /// and humidity below. Unit glyphs for the concentration and the
    /// degree symbol are icon blits at a cursor-relative offset.
    fn draw_combined<S: FrameSurface>(
        &self,
        surface: &mut S,
        store: &ReadingStore,
    ) -> Result<(), S::Error> {
        let mut field = Field::new();
        let environmental = store.latest_environmental();

        // PM2.5 [µg/m³], top-left; the 16 px glyph hangs from the frame top
        decimal_field(&mut field, store.latest_particulate().map(|r| r.pm2_5));
        surface.set_cursor(LEFT_COL_X, TOP_ROW_Y);
        surface.draw_text(&field)?;
        {
            let mut scope = IconScope::new(surface);
            let (x, _) = scope.cursor();
            scope.draw_bitmap(&icons::UGM3, x + ICON_GAP, 0)?;
        }

        // CO2 [ppm], top-right
        field.clear();
        match environmental {
            Some(r) => {
                let _ = write!(field, "{}ppm", r.co2_ppm);
            }
            None => {
                let _ = field.push_str(NO_DATA_PPM);
            }
        }
        surface.set_cursor(RIGHT_COL_X, TOP_ROW_Y);
        surface.draw_text(&field)?;

        // Temperature [°C], bottom-left
        decimal_field(&mut field, environmental.map(|r| r.temperature));
        surface.set_cursor(LEFT_COL_X, BOTTOM_ROW_Y);
        surface.draw_text(&field)?;
        {
            let mut scope = IconScope::new(surface);
            let (x, _) = scope.cursor();
            scope.draw_bitmap(&icons::DEG_C, x + ICON_GAP, BOTTOM_ROW_Y + 2)?;
        }

        // Humidity [%], bottom-right
        decimal_field(&mut field, environmental.map(|r| r.humidity));
        let _ = field.push('%');
        surface.set_cursor(RIGHT_COL_X, BOTTOM_ROW_Y);
        surface.draw_text(&field)?;

        Ok(())
    }

    /// All four mass concentrations; PM2.5 and PM10 rows are labelled
    /// by their icons, the other two by text.
    fn draw_particulate<S: FrameSurface>(
        &self,
        surface: &mut S,
        store: &ReadingStore,
    ) -> Result<(), S::Error> {
        let mut field = Field::new();
        let reading = store.latest_particulate();

        {
            let mut scope = IconScope::new(surface);
            scope.draw_bitmap(&icons::PM25, LEFT_COL_X, TOP_ROW_Y + 2)?;
        }
        decimal_field(&mut field, reading.map(|r| r.pm2_5));
        surface.set_cursor(LEFT_COL_X + 20, TOP_ROW_Y);
        surface.draw_text(&field)?;

        field.clear();
        let _ = field.push_str("1.0 ");
        append_decimal(&mut field, reading.map(|r| r.pm1_0));
        surface.set_cursor(RIGHT_COL_X, TOP_ROW_Y);
        surface.draw_text(&field)?;

        {
            let mut scope = IconScope::new(surface);
            scope.draw_bitmap(&icons::PM10, LEFT_COL_X, BOTTOM_ROW_Y + 2)?;
        }
        decimal_field(&mut field, reading.map(|r| r.pm10_0));
        surface.set_cursor(LEFT_COL_X + 20, BOTTOM_ROW_Y);
        surface.draw_text(&field)?;

        field.clear();
        let _ = field.push_str("4.0 ");
        append_decimal(&mut field, reading.map(|r| r.pm4_0));
        surface.set_cursor(RIGHT_COL_X, BOTTOM_ROW_Y);
        surface.draw_text(&field)?;

        Ok(())
    }

    /// Temperature, humidity and CO2 as labelled rows
    fn draw_environmental<S: FrameSurface>(
        &self,
        surface: &mut S,
        store: &ReadingStore,
    ) -> Result<(), S::Error> {
        let mut field = Field::new();
        let reading = store.latest_environmental();

        field.clear();
        let _ = field.push_str("Temp: ");
        append_decimal(&mut field, reading.map(|r| r.temperature));
        let _ = field.push_str(" C");
        surface.set_cursor(LEFT_COL_X, 0);
        surface.draw_text(&field)?;

        field.clear();
        let _ = field.push_str("Humi: ");
        append_decimal(&mut field, reading.map(|r| r.humidity));
        let _ = field.push_str(" %");
        surface.set_cursor(LEFT_COL_X, 11);
        surface.draw_text(&field)?;

        field.clear();
        match reading {
            Some(r) => {
                let _ = write!(field, "CO2:  {} ppm", r.co2_ppm);
            }
            None => {
                let _ = write!(field, "CO2:  {} ppm", NO_DATA_PPM);
            }
        }
        surface.set_cursor(LEFT_COL_X, 22);
        surface.draw_text(&field)?;

        Ok(())
    }
}

/// Format a one-decimal value, or the placeholder when absent
fn decimal_field(field: &mut Field, value: Option<f32>) {
    field.clear();
    append_decimal(field, value);
}

fn append_decimal(field: &mut Field, value: Option<f32>) {
    match value {
        Some(v) => {
            let _ = write!(field, "{:.1}", v);
        }
        None => {
            let _ = field.push_str(NO_DATA);
        }
    }
}
