//! Frame surface trait for the monochrome display

use crate::icons::Icon;

/// Text drawing context
///
/// Numeric and text fields use the proportional face; icon blits happen
/// in the fixed face the driver keeps for cursor bookkeeping.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Typeface {
    Proportional,
    Fixed,
}

/// Contract the view multiplexer needs from a display driver.
///
/// Drawing goes into a frame buffer; `flush` pushes the completed frame
/// to the panel. Every render is a full clear-and-redraw, so no partial
/// invalidation is exposed.
pub trait FrameSurface {
    type Error;

    /// Blank the whole frame and reset the cursor
    fn clear(&mut self);

    /// Move the text cursor to a pixel position
    fn set_cursor(&mut self, x: i32, y: i32);

    /// Current text cursor position
    fn cursor(&self) -> (i32, i32);

    /// Select the active typeface
    fn set_typeface(&mut self, face: Typeface);

    /// Currently active typeface
    fn typeface(&self) -> Typeface;

    /// Draw text at the cursor and advance the cursor past it
    fn draw_text(&mut self, text: &str) -> Result<(), Self::Error>;

    /// Blit a 1 bpp icon with its top-left corner at (x, y)
    fn draw_bitmap(&mut self, icon: &Icon, x: i32, y: i32) -> Result<(), Self::Error>;

    /// Push the frame to the panel
    async fn flush(&mut self) -> Result<(), Self::Error>;
}

/// Scoped icon-drawing context.
///
/// Entering switches the surface to the fixed face for the cursor query
/// and the blit; dropping the scope restores whatever face was active
/// before, so a field renderer cannot leak icon context into the next
/// text field.
pub struct IconScope<'a, S: FrameSurface> {
    surface: &'a mut S,
    saved: Typeface,
}

impl<'a, S: FrameSurface> IconScope<'a, S> {
    pub fn new(surface: &'a mut S) -> Self {
        let saved = surface.typeface();
        surface.set_typeface(Typeface::Fixed);
        Self { surface, saved }
    }

    /// Cursor position left behind by the preceding text draw
    pub fn cursor(&self) -> (i32, i32) {
        self.surface.cursor()
    }

    pub fn draw_bitmap(&mut self, icon: &Icon, x: i32, y: i32) -> Result<(), S::Error> {
        self.surface.draw_bitmap(icon, x, y)
    }
}

impl<S: FrameSurface> Drop for IconScope<'_, S> {
    fn drop(&mut self) {
        self.surface.set_typeface(self.saved);
    }
}
