//! OhneBS Console - serial output mirrored onto a pixel surface
//!
//! # Purpose
//! Every byte written to the console goes to the serial channel unchanged;
//! the console additionally tracks a text cursor on a framebuffer and asks
//! the external renderer to draw or erase cells.
//!
//! # Cursor Policy
//! - `\n`: next text row; past the bottom edge the whole surface is cleared
//!   and the cursor returns to the origin (no true scrolling)
//! - `\r`: column 0 of the current row
//! - backspace (0x08): one cell left, erasing it (no-op at column 0)
//! - printable ASCII: drawn at the cursor, which advances and wraps to a new
//!   row at the right edge
//! - other control bytes: serial only

#![no_std]

#[cfg(test)]
#[macro_use]
extern crate std;

pub mod renderer;

use ohnebs_hal::numfmt::{self, U32_HEX_LEN};
use ohnebs_hal::CharDevice;

pub use renderer::{NullRenderer, TextRenderer};

const BACKSPACE: u8 = 0x08;

/// Surface geometry and colors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConsoleConfig {
    /// Surface width in pixels
    pub width: u32,
    /// Surface height in pixels
    pub height: u32,
    /// Glyph cell width in pixels
    pub glyph_width: u32,
    /// Glyph cell height in pixels
    pub glyph_height: u32,
    /// Text color
    pub foreground: u32,
    /// Background color
    pub background: u32,
}

impl ConsoleConfig {
    pub const DEFAULT: Self = Self {
        width: 1920,
        height: 1080,
        glyph_width: 8,
        glyph_height: 16,
        foreground: 0x0F,
        background: 0x00,
    };

    /// Text columns that fit on one row
    pub const fn columns(&self) -> u32 {
        self.width / self.glyph_width
    }

    /// Text rows that fit on the surface
    pub const fn rows(&self) -> u32 {
        self.height / self.glyph_height
    }
}

impl Default for ConsoleConfig {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Serial channel plus text cursor on a pixel surface
pub struct Console<D, T> {
    serial: D,
    renderer: T,
    config: ConsoleConfig,
    x: u32,
    y: u32,
}

impl<D: CharDevice, T: TextRenderer> Console<D, T> {
    pub fn new(serial: D, renderer: T, config: ConsoleConfig) -> Self {
        Self {
            serial,
            renderer,
            config,
            x: 0,
            y: 0,
        }
    }

    /// Clear the surface and home the cursor
    pub fn init(&mut self) {
        self.clear();
        log::debug!(
            "{}x{} text cells",
            self.config.columns(),
            self.config.rows()
        );
    }

    /// Current cursor position in pixels
    pub fn cursor(&self) -> (u32, u32) {
        (self.x, self.y)
    }

    pub fn config(&self) -> &ConsoleConfig {
        &self.config
    }

    /// Access the underlying serial channel
    pub fn serial(&mut self) -> &mut D {
        &mut self.serial
    }

    /// Clear the whole surface and home the cursor
    pub fn clear(&mut self) {
        let c = self.config;
        self.renderer.fill_rect(0, 0, c.width, c.height, c.background);
        self.x = 0;
        self.y = 0;
    }

    fn newline(&mut self) {
        self.x = 0;
        self.y += self.config.glyph_height;

        if self.y + self.config.glyph_height > self.config.height {
            self.clear();
        }
    }

    /// Write one byte to the serial channel and the surface
    pub fn putc(&mut self, c: u8) {
        self.serial.write_byte(c);

        let cfg = self.config;
        match c {
            b'\n' => self.newline(),
            b'\r' => self.x = 0,
            BACKSPACE => {
                if self.x >= cfg.glyph_width {
                    self.x -= cfg.glyph_width;
                    self.renderer
                        .fill_rect(self.x, self.y, cfg.glyph_width, cfg.glyph_height, cfg.background);
                }
            }
            b' '..=b'~' => {
                self.renderer.draw_char(c, self.x, self.y, cfg.foreground);
                self.x += cfg.glyph_width;

                if self.x + cfg.glyph_width > cfg.width {
                    self.newline();
                }
            }
            _ => {}
        }
    }

    /// Write a string (`\n` becomes `\r\n`) and flush the serial channel
    pub fn puts(&mut self, s: &str) {
        self.write_text(s);
    }

    /// Write a signed decimal integer
    pub fn put_int(&mut self, value: i32) {
        self.write_int(value);
    }

    /// Write an unsigned integer as `0x`-prefixed hex
    pub fn put_hex(&mut self, value: u32) {
        let mut buf = [0u8; U32_HEX_LEN];
        self.write_text("0x");
        self.write_text(numfmt::format_hex_u32(value, &mut buf));
    }
}

impl<D: CharDevice, T: TextRenderer> CharDevice for Console<D, T> {
    fn read_byte(&mut self) -> Option<u8> {
        self.serial.read_byte()
    }

    fn write_byte(&mut self, byte: u8) {
        self.putc(byte);
    }

    fn flush(&mut self) {
        self.serial.flush();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::vec::Vec;

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    enum Op {
        Char(u8, u32, u32),
        Fill(u32, u32, u32, u32),
    }

    #[derive(Default)]
    struct Surface {
        ops: Vec<Op>,
    }

    impl TextRenderer for Surface {
        fn draw_char(&mut self, c: u8, x: u32, y: u32, _color: u32) {
            self.ops.push(Op::Char(c, x, y));
        }

        fn fill_rect(&mut self, x: u32, y: u32, width: u32, height: u32, _color: u32) {
            self.ops.push(Op::Fill(x, y, width, height));
        }
    }

    #[derive(Default)]
    struct Wire {
        out: Vec<u8>,
        flushes: usize,
    }

    impl CharDevice for Wire {
        fn read_byte(&mut self) -> Option<u8> {
            Some(b'k')
        }

        fn write_byte(&mut self, byte: u8) {
            self.out.push(byte);
        }

        fn flush(&mut self) {
            self.flushes += 1;
        }
    }

    /// 4 columns x 3 rows of 8x16 cells
    const SMALL: ConsoleConfig = ConsoleConfig {
        width: 32,
        height: 48,
        ..ConsoleConfig::DEFAULT
    };

    fn console<'a>(wire: &'a mut Wire, surface: &'a mut Surface) -> Console<&'a mut Wire, &'a mut Surface> {
        Console::new(wire, surface, SMALL)
    }

    #[test]
    fn test_serial_mirror_is_verbatim() {
        let (mut wire, mut surface) = (Wire::default(), Surface::default());
        let mut con = console(&mut wire, &mut surface);
        con.puts("ab\n\x07");
        assert_eq!(con.cursor(), (0, 16));
        drop(con);
        assert_eq!(wire.out, b"ab\r\n\x07");
        assert_eq!(wire.flushes, 1);
        assert_eq!(surface.ops, [Op::Char(b'a', 0, 0), Op::Char(b'b', 8, 0)]);
    }

    #[test]
    fn test_wrap_at_right_edge() {
        let (mut wire, mut surface) = (Wire::default(), Surface::default());
        let mut con = console(&mut wire, &mut surface);
        con.puts("abcde");
        assert_eq!(con.cursor(), (8, 16));
        drop(con);
        assert_eq!(surface.ops[3], Op::Char(b'd', 24, 0));
        assert_eq!(surface.ops[4], Op::Char(b'e', 0, 16));
    }

    #[test]
    fn test_bottom_edge_clears_surface() {
        let (mut wire, mut surface) = (Wire::default(), Surface::default());
        let mut con = console(&mut wire, &mut surface);
        con.puts("1\n2\n");
        assert_eq!(con.cursor(), (0, 32));
        con.puts("3\n");
        assert_eq!(con.cursor(), (0, 0));
        drop(con);
        assert_eq!(surface.ops.last(), Some(&Op::Fill(0, 0, 32, 48)));
    }

    #[test]
    fn test_backspace_erases_cell() {
        let (mut wire, mut surface) = (Wire::default(), Surface::default());
        let mut con = console(&mut wire, &mut surface);
        con.putc(0x08);
        assert_eq!(con.cursor(), (0, 0));
        con.puts("xy\x08");
        assert_eq!(con.cursor(), (8, 0));
        drop(con);
        assert_eq!(surface.ops.last(), Some(&Op::Fill(8, 0, 8, 16)));
        assert_eq!(wire.out, b"\x08xy\x08");
    }

    #[test]
    fn test_carriage_return_homes_column() {
        let (mut wire, mut surface) = (Wire::default(), Surface::default());
        let mut con = console(&mut wire, &mut surface);
        con.puts("ab\r");
        assert_eq!(con.cursor(), (0, 0));
    }

    #[test]
    fn test_numbers() {
        let (mut wire, mut surface) = (Wire::default(), Surface::default());
        let mut con = Console::new(&mut wire, &mut surface, ConsoleConfig::default());
        con.put_int(i32::MIN);
        con.putc(b' ');
        con.put_hex(0xFE21_5000);
        drop(con);
        assert_eq!(wire.out, b"-2147483648 0xFE215000");
    }

    #[test]
    fn test_init_and_read_passthrough() {
        let (mut wire, mut surface) = (Wire::default(), Surface::default());
        let mut con = console(&mut wire, &mut surface);
        con.puts("z");
        con.init();
        assert_eq!(con.cursor(), (0, 0));
        assert_eq!(con.read_byte(), Some(b'k'));
        drop(con);
        assert_eq!(surface.ops.last(), Some(&Op::Fill(0, 0, 32, 48)));
    }

    #[test]
    fn test_default_geometry() {
        let cfg = ConsoleConfig::default();
        assert_eq!(cfg.columns(), 240);
        assert_eq!(cfg.rows(), 67);
    }
}
