//! CHIP-8 virtual machine
//!
//! ## Design
//!
//! * one interpreter cycle per instruction; the COSMAC VIP's machine-cycle
//!   timings are not modelled
//! * instructions run as fast as possible then sleep to keep the pace;
//!   the pace is `instructions_per_tick` per 60Hz timer tick
//! * the timers only ever count down on ticks, so their rate doesn't depend
//!   on how fast the host is or on the instruction mix
//! * abstract display, input and sound so alternatives plug in; the
//!   terminal ones use tui/crossterm, and there are null ones for headless
//!   runs and tests
//!
//! Model
//!
//! ```text
//! Environment (main.rs)
//!  |-- display, input, sound, config
//!  |-- interpreter(display, input, sound, config, clock)
//!  |    |-- machine state: memory map (font, program), registers, stack, timers
//!  |    |-- frame buffer
//!  |    `-- timing controller(clock)
//!  `-- interpreter.run()
//!       |-- cycle():  fetch, pc += 2, decode, execute
//!       `-- pace():   sleep off the rest of the cycle (or resync after a
//!                     stall); every n cycles a timer tick:
//!                       timers -= 1 (every ticks_per_decrement ticks),
//!                       buzzer on/off, commit frame if dirty
//! ```
pub mod config;
pub mod disassembler;
pub mod display;
pub mod error;
pub mod framebuffer;
pub mod input;
pub mod instruction;
pub mod interpreter;
pub mod memory;
pub mod sound;
pub mod state;
pub mod timing;

pub use config::Chip8Config;
pub use error::{Chip8Error, Result};
pub use interpreter::{Chip8Interpreter, StepResult};
