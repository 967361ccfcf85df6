//! Text rendering boundary
//!
//! Glyph drawing and framebuffer management live outside this crate. The
//! console only needs to place one character at a pixel position and to
//! clear a rectangle.

/// Pixel surface capable of drawing text cells
pub trait TextRenderer {
    /// Draw glyph `c` with its top-left corner at (`x`, `y`)
    fn draw_char(&mut self, c: u8, x: u32, y: u32, color: u32);

    /// Fill a `width` x `height` rectangle at (`x`, `y`) with `color`
    fn fill_rect(&mut self, x: u32, y: u32, width: u32, height: u32, color: u32);
}

impl<T: TextRenderer + ?Sized> TextRenderer for &mut T {
    fn draw_char(&mut self, c: u8, x: u32, y: u32, color: u32) {
        (**self).draw_char(c, x, y, color)
    }

    fn fill_rect(&mut self, x: u32, y: u32, width: u32, height: u32, color: u32) {
        (**self).fill_rect(x, y, width, height, color)
    }
}

/// Renderer that discards everything (serial-only builds)
#[derive(Debug, Clone, Copy, Default)]
pub struct NullRenderer;

impl TextRenderer for NullRenderer {
    #[inline(always)]
    fn draw_char(&mut self, _c: u8, _x: u32, _y: u32, _color: u32) {}

    #[inline(always)]
    fn fill_rect(&mut self, _x: u32, _y: u32, _width: u32, _height: u32, _color: u32) {}
}
