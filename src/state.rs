use crate::error::{Chip8Error, Result};
use crate::memory::{Chip8MemoryMap, CHIP8_PROGRAM_ADDR};

/// how deep subroutine calls can nest
pub const CHIP8_STACK_DEPTH: usize = 16;

/// the flag register
pub const VF: usize = 0xF;

/// The two countdown registers; they only ever go down via `decrement`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Timers {
    pub delay: u8,
    pub sound: u8,
}

impl Timers {
    /// one decrement of both timers, floored at zero
    pub fn decrement(&mut self) {
        self.delay = self.delay.saturating_sub(1);
        self.sound = self.sound.saturating_sub(1);
    }
}

/// Read-only copy of the register file, for tracing and tests
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Registers {
    pub v: [u8; 16],
    pub i: u16,
    pub pc: u16,
    pub sp: usize,
    pub delay: u8,
    pub sound: u8,
}

/// All machine-visible state: memory, registers, stack, timers and PC
pub struct MachineState {
    pub memory: Chip8MemoryMap,
    pub v: [u8; 16],
    pub i: u16,
    pub pc: u16,
    stack: [u16; CHIP8_STACK_DEPTH],
    sp: usize,
    pub timers: Timers,
}

impl Default for MachineState {
    fn default() -> Self {
        Self::new()
    }
}

impl MachineState {
    pub fn new() -> Self {
        MachineState {
            memory: Chip8MemoryMap::new(),
            v: [0; 16],
            i: 0,
            pc: CHIP8_PROGRAM_ADDR,
            stack: [0; CHIP8_STACK_DEPTH],
            sp: 0,
            timers: Timers::default(),
        }
    }

    /// power-on state, starting at `entry`
    pub fn reset(&mut self, entry: u16) {
        self.memory.reset();
        self.v = [0; 16];
        self.i = 0;
        self.pc = entry;
        self.stack = [0; CHIP8_STACK_DEPTH];
        self.sp = 0;
        self.timers = Timers::default();
    }

    /// push a return address; a full stack is an error, not a wrap
    pub fn push(&mut self, addr: u16) -> Result<()> {
        if self.sp >= CHIP8_STACK_DEPTH {
            return Err(Chip8Error::StackOverflow { pc: self.pc });
        }
        self.stack[self.sp] = addr;
        self.sp += 1;
        Ok(())
    }

    /// pop a return address
    pub fn pop(&mut self) -> Result<u16> {
        if self.sp == 0 {
            return Err(Chip8Error::StackUnderflow { pc: self.pc });
        }
        self.sp -= 1;
        Ok(self.stack[self.sp])
    }

    pub fn sp(&self) -> usize {
        self.sp
    }

    pub fn stack(&self) -> &[u16] {
        &self.stack[..self.sp]
    }

    pub fn registers(&self) -> Registers {
        Registers {
            v: self.v,
            i: self.i,
            pc: self.pc,
            sp: self.sp,
            delay: self.timers.delay,
            sound: self.timers.sound,
        }
    }
}
