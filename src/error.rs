use std::io;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Chip8Error>;

/// Everything that can go wrong while loading or running a program.
///
/// NB. an unknown opcode is not in here; it halts the machine instead
#[derive(Debug, Error)]
pub enum Chip8Error {
    #[error("program of {len} bytes does not fit at {base:#05x} in {size} bytes of memory")]
    LoadOutOfBounds { base: u16, len: usize, size: usize },

    #[error("memory access of {len} byte(s) at {addr:#06x} is out of bounds")]
    MemoryOutOfBounds { addr: usize, len: usize },

    #[error("stack overflow: call at {pc:#05x} with all 16 slots in use")]
    StackOverflow { pc: u16 },

    #[error("stack underflow: return at {pc:#05x} with an empty stack")]
    StackUnderflow { pc: u16 },

    #[error("sound device error: {0}")]
    Sound(String),

    #[error("io error: {0}")]
    Io(#[from] io::Error),
}
