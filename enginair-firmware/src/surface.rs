//! SSD1306 frame surface
//!
//! Implements the core FrameSurface contract over the buffered async
//! SSD1306 driver. Text and icon drawing land in the local frame
//! buffer; only `flush` touches the bus.

use display_interface::{AsyncWriteOnlyDataCommand, DisplayError};
use embedded_graphics::image::{Image, ImageRaw};
use embedded_graphics::mono_font::ascii::{FONT_6X10, FONT_7X13};
use embedded_graphics::mono_font::MonoTextStyle;
use embedded_graphics::pixelcolor::BinaryColor;
use embedded_graphics::prelude::*;
use embedded_graphics::text::{Baseline, Text};
use ssd1306::mode::BufferedGraphicsModeAsync;
use ssd1306::prelude::*;
use ssd1306::Ssd1306Async;

use enginair_core::icons::Icon;
use enginair_core::traits::{FrameSurface, Typeface};

type Display<DI> =
    Ssd1306Async<DI, DisplaySize128x32, BufferedGraphicsModeAsync<DisplaySize128x32>>;

pub struct OledSurface<DI> {
    display: Display<DI>,
    cursor: Point,
    face: Typeface,
}

impl<DI> OledSurface<DI>
where
    DI: AsyncWriteOnlyDataCommand,
{
    /// Wrap an initialized display
    pub fn new(display: Display<DI>) -> Self {
        Self {
            display,
            cursor: Point::zero(),
            face: Typeface::Proportional,
        }
    }

    fn style(&self) -> MonoTextStyle<'static, BinaryColor> {
        match self.face {
            Typeface::Proportional => MonoTextStyle::new(&FONT_7X13, BinaryColor::On),
            Typeface::Fixed => MonoTextStyle::new(&FONT_6X10, BinaryColor::On),
        }
    }
}

impl<DI> FrameSurface for OledSurface<DI>
where
    DI: AsyncWriteOnlyDataCommand,
{
    type Error = DisplayError;

    fn clear(&mut self) {
        self.display.clear_buffer();
        self.cursor = Point::zero();
    }

    fn set_cursor(&mut self, x: i32, y: i32) {
        self.cursor = Point::new(x, y);
    }

    fn cursor(&self) -> (i32, i32) {
        (self.cursor.x, self.cursor.y)
    }

    fn set_typeface(&mut self, face: Typeface) {
        self.face = face;
    }

    fn typeface(&self) -> Typeface {
        self.face
    }

    fn draw_text(&mut self, text: &str) -> Result<(), Self::Error> {
        // Buffer-only operation; the draw cannot fail on the bus
        if let Ok(next) = Text::with_baseline(text, self.cursor, self.style(), Baseline::Top)
            .draw(&mut self.display)
        {
            self.cursor = next;
        }
        Ok(())
    }

    fn draw_bitmap(&mut self, icon: &Icon, x: i32, y: i32) -> Result<(), Self::Error> {
        // ImageRaw consumes the same MSB-first row-padded packing the
        // icon assets are stored in
        let raw = ImageRaw::<BinaryColor>::new(icon.data, icon.width);
        let _ = Image::new(&raw, Point::new(x, y)).draw(&mut self.display);
        Ok(())
    }

    async fn flush(&mut self) -> Result<(), Self::Error> {
        self.display.flush().await
    }
}
