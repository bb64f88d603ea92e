use crate::error::{Chip8Error, Result};
use std::io;

// NB. chip-8 addresses are u16, but I can be pointed anywhere in 16 bits, so
//     accessors take usize and check against the real size of RAM

/// Represents the memory map; out-of-range accesses are errors
pub trait MemoryMap {
    /// write unknown len of data into memory at a particular address
    fn write_any(&mut self, reader: &mut impl io::Read, addr: u16) -> Result<usize> {
        let mut buf = Vec::new();
        let len = reader.read_to_end(&mut buf)?;
        self.write(&buf, addr as usize)?;
        Ok(len)
    }

    /// write a chunk of bytes into "RAM"
    fn write(&mut self, data: &[u8], addr: usize) -> Result<()> {
        self.get_rw_slice(addr, data.len())?.copy_from_slice(data);
        Ok(())
    }

    /// get a big-endian two-byte word (instructions)
    fn get_word(&self, addr: usize) -> Result<u16> {
        let word = self.get_ro_slice(addr, 2)?;
        Ok(u16::from_be_bytes([word[0], word[1]]))
    }

    /// get a r/w slice of the underlying memory
    fn get_rw_slice(&mut self, addr: usize, len: usize) -> Result<&mut [u8]>;

    /// get a r/o slice of the underlying memory
    fn get_ro_slice(&self, addr: usize, len: usize) -> Result<&[u8]>;

    /// how many addressable bytes there are
    fn size(&self) -> usize;
}

/// how much RAM we have
pub const CHIP8_RAM_SIZE_BYTES: usize = 4096;

/// where the program is loaded
pub const CHIP8_PROGRAM_ADDR: u16 = 0x0200;

/// where the hex glyphs live, and how tall each one is
pub const CHIP8_FONT_ADDR: u16 = 0x000;
pub const CHIP8_GLYPH_BYTES: u16 = 5;

/// Standard CHIP-8 memory map:
///   0x0000-0x004f  hex font, 16 glyphs of 5 bytes
///   0x0050-0x01ff  unused (the interpreter lived here on the COSMAC VIP)
///   0x0200-0x0fff  program
///
/// the stack, registers and display are kept outside of addressable memory
pub struct Chip8MemoryMap {
    bytes: Box<[u8]>,
}

impl MemoryMap for Chip8MemoryMap {
    fn get_rw_slice(&mut self, addr: usize, len: usize) -> Result<&mut [u8]> {
        let end = checked_end(addr, len, self.bytes.len())?;
        Ok(&mut self.bytes[addr..end])
    }

    fn get_ro_slice(&self, addr: usize, len: usize) -> Result<&[u8]> {
        let end = checked_end(addr, len, self.bytes.len())?;
        Ok(&self.bytes[addr..end])
    }

    fn size(&self) -> usize {
        self.bytes.len()
    }
}

fn checked_end(addr: usize, len: usize, size: usize) -> Result<usize> {
    match addr.checked_add(len) {
        Some(end) if end <= size => Ok(end),
        _ => Err(Chip8Error::MemoryOutOfBounds { addr, len }),
    }
}

impl Default for Chip8MemoryMap {
    fn default() -> Self {
        Self::new()
    }
}

impl Chip8MemoryMap {
    /// zeroed memory with the font baked in
    pub fn new() -> Self {
        let mut mm = Chip8MemoryMap {
            bytes: vec![0u8; CHIP8_RAM_SIZE_BYTES].into_boxed_slice(),
        };
        mm.store_font();
        mm
    }

    /// back to power-on contents
    pub fn reset(&mut self) {
        self.bytes.fill(0);
        self.store_font();
    }

    fn store_font(&mut self) {
        let a = CHIP8_FONT_ADDR as usize;
        self.bytes[a..a + CHIP8_FONT.len()].copy_from_slice(&CHIP8_FONT);
    }

    /// copy a program image into memory at `base`; it has to fit entirely
    pub fn load_at(&mut self, data: &[u8], base: u16) -> Result<()> {
        let size = self.bytes.len();
        if base as usize + data.len() > size {
            return Err(Chip8Error::LoadOutOfBounds {
                base,
                len: data.len(),
                size,
            });
        }
        self.write(data, base as usize)
    }

    /// load a CHIP-8 program at 0x200
    pub fn load(&mut self, data: &[u8]) -> Result<()> {
        self.load_at(data, CHIP8_PROGRAM_ADDR)
    }

    /// read a whole program from a file, stdin or whatever and load it at 0x200
    pub fn load_program(&mut self, reader: &mut impl io::Read) -> Result<usize> {
        self.load_program_at(reader, CHIP8_PROGRAM_ADDR)
    }

    pub fn load_program_at(&mut self, reader: &mut impl io::Read, base: u16) -> Result<usize> {
        let mut buf = Vec::new();
        let len = reader.read_to_end(&mut buf)?;
        self.load_at(&buf, base)?;
        Ok(len)
    }

    /// address of the glyph for hex digit `digit`
    pub fn glyph_addr(digit: u8) -> u16 {
        CHIP8_FONT_ADDR + CHIP8_GLYPH_BYTES * digit as u16
    }
}

const CHIP8_FONT: [u8; 80] = [
    0xF0, 0x90, 0x90, 0x90, 0xF0, // 0
    0x20, 0x60, 0x20, 0x20, 0x70, // 1
    0xF0, 0x10, 0xF0, 0x80, 0xF0, // 2
    0xF0, 0x10, 0xF0, 0x10, 0xF0, // 3
    0x90, 0x90, 0xF0, 0x10, 0x10, // 4
    0xF0, 0x80, 0xF0, 0x10, 0xF0, // 5
    0xF0, 0x80, 0xF0, 0x90, 0xF0, // 6
    0xF0, 0x10, 0x20, 0x40, 0x40, // 7
    0xF0, 0x90, 0xF0, 0x90, 0xF0, // 8
    0xF0, 0x90, 0xF0, 0x10, 0xF0, // 9
    0xF0, 0x90, 0xF0, 0x90, 0x90, // A
    0xE0, 0x90, 0xE0, 0x90, 0xE0, // B
    0xF0, 0x80, 0x80, 0x80, 0xF0, // C
    0xE0, 0x90, 0x90, 0x90, 0xE0, // D
    0xF0, 0x80, 0xF0, 0x80, 0xF0, // E
    0xF0, 0x80, 0xF0, 0x80, 0x80, // F
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_zeroed() {
        let m = Chip8MemoryMap::new();
        // NB. memory is zeroed from 0x50 because before that we bake in the font
        assert!(m.bytes[0x50..].iter().all(|&b| b == 0));
        assert_eq!(m.size(), 4096);
    }

    #[test]
    fn test_font_glyphs() -> Result<()> {
        let m = Chip8MemoryMap::new();
        assert_eq!(
            m.get_ro_slice(Chip8MemoryMap::glyph_addr(0) as usize, 5)?,
            &[0xF0, 0x90, 0x90, 0x90, 0xF0]
        );
        assert_eq!(Chip8MemoryMap::glyph_addr(0xF), 0x4b);
        assert_eq!(
            m.get_ro_slice(0x4b, 5)?,
            &[0xF0, 0x80, 0xF0, 0x80, 0x80]
        );
        Ok(())
    }

    #[test]
    fn test_write_any_data_ok() -> Result<()> {
        let mut dst = Chip8MemoryMap::new();
        let mut src: &[u8] = &[0, 1, 2, 3, 4, 5, 6, 7];
        assert_eq!(dst.write_any(&mut src, 0x300)?, 8);
        assert_eq!(
            dst.get_ro_slice(0x2f8, 16)?,
            &[0, 0, 0, 0, 0, 0, 0, 0, 0, 1, 2, 3, 4, 5, 6, 7]
        );
        Ok(())
    }

    #[test]
    fn test_read_word() -> Result<()> {
        let mut m = Chip8MemoryMap::new();
        m.write(&[0, 1, 2, 3, 4, 5, 6, 7], 0x200)?;
        assert_eq!(m.get_word(0x204)?, 0x0405);
        // odd addresses are fine too
        assert_eq!(m.get_word(0x205)?, 0x0506);
        Ok(())
    }

    #[test]
    fn test_read_too_much_errors() {
        let mut dst = Chip8MemoryMap::new();
        let mut src: &[u8] = &[0; 8];
        assert!(matches!(
            dst.write_any(&mut src, 4089),
            Err(Chip8Error::MemoryOutOfBounds { addr: 4089, len: 8 })
        ));
        assert!(matches!(
            dst.get_word(4095),
            Err(Chip8Error::MemoryOutOfBounds { .. })
        ));
        assert!(dst.get_ro_slice(usize::MAX, 2).is_err());
    }

    #[test]
    fn test_program_load_ok() -> Result<()> {
        let mut dst = Chip8MemoryMap::new();
        let mut prog: &[u8] = &[0x00, 0xe0]; // clear screen
        assert_eq!(dst.load_program(&mut prog)?, 2);
        assert_eq!(dst.get_ro_slice(0x200, 2)?, &[0x00, 0xe0]);
        Ok(())
    }

    #[test]
    fn test_program_load_at() -> Result<()> {
        let mut dst = Chip8MemoryMap::new();
        let mut prog: &[u8] = &[0x12, 0x34, 0x56];
        assert_eq!(dst.load_program_at(&mut prog, 0x600)?, 3);
        assert_eq!(dst.get_ro_slice(0x600, 3)?, &[0x12, 0x34, 0x56]);
        let mut too_big: &[u8] = &[0xaa; 3];
        assert!(matches!(
            dst.load_program_at(&mut too_big, 0xffe),
            Err(Chip8Error::LoadOutOfBounds { base: 0xffe, len: 3, .. })
        ));
        Ok(())
    }

    #[test]
    fn test_load_fills_to_the_last_byte() -> Result<()> {
        let mut m = Chip8MemoryMap::new();
        m.load(&[0xaa; 0xe00])?;
        assert_eq!(m.get_ro_slice(0xfff, 1)?, &[0xaa]);
        Ok(())
    }

    #[test]
    fn test_load_out_of_bounds() {
        let mut m = Chip8MemoryMap::new();
        let res = m.load(&[0xaa; 0xe01]);
        assert!(matches!(
            res,
            Err(Chip8Error::LoadOutOfBounds {
                base: 0x200,
                len: 0xe01,
                size: 4096
            })
        ));
        // nothing got written
        assert!(m.bytes[0x200..].iter().all(|&b| b == 0));
    }

    #[test]
    fn test_reset_restores_font() -> Result<()> {
        let mut m = Chip8MemoryMap::new();
        m.write(&[0xff; 0x100], 0)?;
        m.reset();
        assert_eq!(m.get_ro_slice(0, 5)?, &[0xF0, 0x90, 0x90, 0x90, 0xF0]);
        assert!(m.bytes[0x50..].iter().all(|&b| b == 0));
        Ok(())
    }
}
