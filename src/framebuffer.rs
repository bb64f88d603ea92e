/// internal resolution of the chip-8 display
pub const CHIP8_DISPLAY_WIDTH: usize = 64;
pub const CHIP8_DISPLAY_HEIGHT: usize = 32;

/// bytes needed to hold one frame at one bit per pixel
pub const CHIP8_FRAME_BYTES: usize = CHIP8_DISPLAY_WIDTH * CHIP8_DISPLAY_HEIGHT / 8;

/// The display surface the interpreter draws into. Addressing wraps on both
/// axes, and drawing is XOR, so the only way to turn a pixel off is to draw
/// over it (or clear).
#[derive(Clone, PartialEq, Eq)]
pub struct FrameBuffer {
    pixels: [[bool; CHIP8_DISPLAY_WIDTH]; CHIP8_DISPLAY_HEIGHT],
}

impl Default for FrameBuffer {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameBuffer {
    pub fn new() -> Self {
        FrameBuffer {
            pixels: [[false; CHIP8_DISPLAY_WIDTH]; CHIP8_DISPLAY_HEIGHT],
        }
    }

    pub fn clear(&mut self) {
        for row in self.pixels.iter_mut() {
            row.fill(false);
        }
    }

    /// XOR a sprite onto the screen, one byte per row, MSB on the left.
    /// returns true if any lit pixel got switched off
    pub fn draw(&mut self, x: u8, y: u8, sprite: &[u8]) -> bool {
        let mut erased = false;
        for (row, bits) in sprite.iter().enumerate() {
            let py = (y as usize + row) % CHIP8_DISPLAY_HEIGHT;
            for col in 0..8 {
                if bits & (0x80 >> col) == 0 {
                    continue;
                }
                let px = (x as usize + col) % CHIP8_DISPLAY_WIDTH;
                let pixel = &mut self.pixels[py][px];
                // collision has to look at the pixel before it flips
                erased |= *pixel;
                *pixel = !*pixel;
            }
        }
        erased
    }

    /// is the pixel at (x, y) lit; coordinates wrap like drawing does
    pub fn pixel(&self, x: usize, y: usize) -> bool {
        self.pixels[y % CHIP8_DISPLAY_HEIGHT][x % CHIP8_DISPLAY_WIDTH]
    }

    pub fn rows(&self) -> &[[bool; CHIP8_DISPLAY_WIDTH]; CHIP8_DISPLAY_HEIGHT] {
        &self.pixels
    }

    pub fn lit_count(&self) -> usize {
        self.pixels.iter().flatten().filter(|&&p| p).count()
    }

    /// pack into a single bitplane, row-major, MSB leftmost; this is the frame
    /// format renderers get
    pub fn to_bitplane(&self) -> [u8; CHIP8_FRAME_BYTES] {
        let mut data = [0u8; CHIP8_FRAME_BYTES];
        for (n, &lit) in self.pixels.iter().flatten().enumerate() {
            if lit {
                data[n / 8] |= 0x80 >> (n % 8);
            }
        }
        data
    }
}

impl std::fmt::Debug for FrameBuffer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for row in self.pixels.iter() {
            let line: String = row.iter().map(|&p| if p { '#' } else { '.' }).collect();
            writeln!(f, "{}", line)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_is_blank() {
        let fb = FrameBuffer::new();
        assert_eq!(fb.lit_count(), 0);
        assert_eq!(fb.to_bitplane(), [0; 256]);
    }

    #[test]
    fn test_draw_sets_pixels_msb_first() {
        let mut fb = FrameBuffer::new();
        assert!(!fb.draw(0, 0, &[0b1000_0001]));
        assert!(fb.pixel(0, 0));
        assert!(!fb.pixel(1, 0));
        assert!(fb.pixel(7, 0));
        assert_eq!(fb.lit_count(), 2);
    }

    #[test]
    fn test_draw_twice_restores_and_collides() {
        let mut fb = FrameBuffer::new();
        fb.draw(3, 3, &[0x0f]);
        let before = fb.clone();
        let glyph = [0xF0, 0x90, 0x90, 0x90, 0xF0];
        assert!(!fb.draw(10, 12, &glyph));
        assert_ne!(fb, before);
        assert!(fb.draw(10, 12, &glyph));
        assert_eq!(fb, before);
    }

    #[test]
    fn test_collision_only_when_lit_pixel_erased() {
        let mut fb = FrameBuffer::new();
        fb.draw(0, 0, &[0xf0]);
        // overlapping nothing lit
        assert!(!fb.draw(4, 0, &[0xf0]));
        // overlapping one lit pixel
        assert!(fb.draw(7, 0, &[0x80]));
        assert!(!fb.pixel(7, 0));
    }

    #[test]
    fn test_horizontal_wraparound() {
        let mut fb = FrameBuffer::new();
        fb.draw(60, 0, &[0xff]);
        for x in [60, 61, 62, 63, 0, 1, 2, 3] {
            assert!(fb.pixel(x, 0), "column {} should be lit", x);
        }
        assert_eq!(fb.lit_count(), 8);
    }

    #[test]
    fn test_vertical_wraparound() {
        let mut fb = FrameBuffer::new();
        fb.draw(0, 31, &[0x80, 0x80, 0x80]);
        assert!(fb.pixel(0, 31));
        assert!(fb.pixel(0, 0));
        assert!(fb.pixel(0, 1));
    }

    #[test]
    fn test_empty_sprite_is_noop() {
        let mut fb = FrameBuffer::new();
        assert!(!fb.draw(5, 5, &[]));
        assert_eq!(fb.lit_count(), 0);
    }

    #[test]
    fn test_clear() {
        let mut fb = FrameBuffer::new();
        fb.draw(0, 0, &[0xff; 15]);
        fb.clear();
        assert_eq!(fb.lit_count(), 0);
    }

    #[test]
    fn test_bitplane_packing() {
        let mut fb = FrameBuffer::new();
        fb.draw(0, 0, &[0xa5]);
        fb.draw(63, 31, &[0x80]);
        let data = fb.to_bitplane();
        assert_eq!(data[0], 0xa5);
        assert_eq!(data[255], 0x01);
        assert_eq!(data.iter().filter(|&&b| b != 0).count(), 2);
    }
}
