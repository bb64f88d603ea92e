//! # interpreter
//!
//! One cycle is: fetch the big-endian word at PC, bump PC by 2, decode,
//! execute. `step()` follows every cycle with one pacing cycle from the
//! timing controller; every `instructions_per_tick` cycles that's a timer
//! tick, which is when the timers count down, the buzzer is updated and the
//! frame goes out to the display.
//!
//! Everything runs on the caller's thread. The only thing shared with the
//! outside world is the StopHandle.

use crate::config::Chip8Config;
use crate::display::Display;
use crate::error::Result;
use crate::framebuffer::FrameBuffer;
use crate::input::Input;
use crate::instruction::Instruction;
use crate::memory::{Chip8MemoryMap, MemoryMap};
use crate::sound::Sound;
use crate::state::{MachineState, Registers, VF};
use crate::timing::{Clock, SpinClock, StopHandle, TimingController};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::io;

/// what the machine did with a cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepResult {
    Continue,
    /// fetched something that isn't an instruction; nothing more will run
    Halted,
}

pub struct Chip8Interpreter<'a> {
    state: MachineState,
    screen: FrameBuffer,
    display: &'a mut dyn Display,
    input: &'a mut dyn Input,
    sound: &'a mut dyn Sound,
    rng: StdRng,
    timing: TimingController,
    config: Chip8Config,
    stop: StopHandle,
    halted: bool,
    screen_dirty: bool,
}

impl<'a> Chip8Interpreter<'a> {
    /// interpreter with the default config, running in real time
    pub fn new(
        display: &'a mut dyn Display,
        input: &'a mut dyn Input,
        sound: &'a mut dyn Sound,
    ) -> Chip8Interpreter<'a> {
        Self::with_config(
            display,
            input,
            sound,
            Chip8Config::default(),
            Box::new(SpinClock::new()),
        )
    }

    pub fn with_config(
        display: &'a mut dyn Display,
        input: &'a mut dyn Input,
        sound: &'a mut dyn Sound,
        config: Chip8Config,
        clock: Box<dyn Clock>,
    ) -> Chip8Interpreter<'a> {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        let mut state = MachineState::new();
        state.pc = config.load_address;
        Chip8Interpreter {
            state,
            screen: FrameBuffer::new(),
            display,
            input,
            sound,
            rng,
            timing: TimingController::new(&config, clock),
            config,
            stop: StopHandle::new(),
            halted: false,
            screen_dirty: true,
        }
    }

    /// share a stop handle that was made before the interpreter, e.g. one
    /// already given to an input device
    pub fn with_stop_handle(mut self, stop: StopHandle) -> Self {
        self.stop = stop;
        self
    }

    /// back to power-on: memory, registers, stack, timers and screen
    pub fn reset(&mut self) {
        self.state.reset(self.config.load_address);
        self.screen.clear();
        self.screen_dirty = true;
        self.halted = false;
        self.timing.restart();
    }

    /// load a program image at the configured load address (0x200)
    pub fn load(&mut self, program: &[u8]) -> Result<()> {
        self.load_at(program, self.config.load_address)
    }

    pub fn load_at(&mut self, program: &[u8], base: u16) -> Result<()> {
        self.state.memory.load_at(program, base)?;
        log::debug!("loaded {} bytes at {:#05x}", program.len(), base);
        Ok(())
    }

    /// load a chip8 program from a file, stdin etc. at the load address
    pub fn load_program(&mut self, reader: &mut impl io::Read) -> Result<usize> {
        let base = self.config.load_address;
        let len = self.state.memory.load_program_at(reader, base)?;
        log::debug!("loaded {} bytes at {:#05x}", len, base);
        Ok(len)
    }

    /// execute exactly one instruction, without any pacing
    pub fn cycle(&mut self) -> Result<StepResult> {
        if self.halted {
            return Ok(StepResult::Halted);
        }
        let addr = self.state.pc;
        let word = self.state.memory.get_word(addr as usize)?;
        self.state.pc = addr.wrapping_add(2);

        match Instruction::decode(word) {
            Some(instruction) => {
                log::trace!("{:03X}: {:04X}  {}", addr, word, instruction);
                self.execute(instruction)?;
                Ok(StepResult::Continue)
            }
            None => {
                log::warn!("unknown opcode {:04X} at {:03X}, halting", word, addr);
                self.halted = true;
                Ok(StepResult::Halted)
            }
        }
    }

    /// one instruction plus one pacing cycle (which may sleep, and may tick
    /// the timers)
    pub fn step(&mut self) -> Result<StepResult> {
        if self.cycle()? == StepResult::Halted {
            return Ok(StepResult::Halted);
        }
        let pace = self.timing.pace();
        if pace.timer_tick {
            self.timer_tick(pace.decrement)?;
        }
        Ok(StepResult::Continue)
    }

    /// step until the program halts or someone hits stop
    pub fn run(&mut self) -> Result<()> {
        self.run_while(|_| true).map(|_| ())
    }

    /// like run(), but gives up after `max_steps`; returns the steps taken
    pub fn run_for(&mut self, max_steps: u64) -> Result<u64> {
        self.run_while(|steps| steps < max_steps)
    }

    fn run_while(&mut self, mut more: impl FnMut(u64) -> bool) -> Result<u64> {
        log::info!(
            "running from {:#05x} at {} instructions/s",
            self.state.pc,
            self.config.instructions_per_second()
        );
        let mut steps = 0;
        let mut outcome = Ok(());
        while more(steps) {
            if self.stop.is_stopped() {
                log::info!("stop requested after {} steps", steps);
                break;
            }
            steps += 1;
            match self.step() {
                Ok(StepResult::Continue) => {}
                Ok(StepResult::Halted) => {
                    log::info!("halted at {:#05x} after {} steps", self.state.pc, steps);
                    break;
                }
                Err(e) => {
                    log::error!("{} after {} steps", e, steps);
                    outcome = Err(e);
                    break;
                }
            }
        }

        // last frame out and buzzer off however the loop ended
        let finished = self.finish();
        outcome.and(finished).map(|_| steps)
    }

    fn finish(&mut self) -> Result<()> {
        self.commit_frame()?;
        if self.sound.is_beeping() {
            self.sound.stop()?;
        }
        Ok(())
    }

    fn timer_tick(&mut self, decrement: bool) -> Result<()> {
        if decrement {
            self.state.timers.decrement();
        }
        let want_beep = self.state.timers.sound > 0;
        if want_beep != self.sound.is_beeping() {
            if want_beep {
                self.sound.beep()?;
            } else {
                self.sound.stop()?;
            }
        }
        self.commit_frame()
    }

    /// hand the screen to the display if it changed since last time
    pub fn commit_frame(&mut self) -> Result<()> {
        if self.screen_dirty {
            self.display.draw(&self.screen.to_bitplane())?;
            self.screen_dirty = false;
        }
        Ok(())
    }

    fn skip_if(&mut self, cond: bool) {
        if cond {
            self.state.pc = self.state.pc.wrapping_add(2);
        }
    }

    fn execute(&mut self, instruction: Instruction) -> Result<()> {
        use Instruction::*;

        // flags are worked out from the operands before VX is written; VF is
        // written first, so with X = F the result overwrites the flag
        match instruction {
            Cls => {
                self.screen.clear();
                self.screen_dirty = true;
            }
            Ret => self.state.pc = self.state.pop()?,
            Jump(addr) => self.state.pc = addr,
            Call(addr) => {
                self.state.push(self.state.pc)?;
                self.state.pc = addr;
            }
            SkipEqByte(x, kk) => self.skip_if(self.state.v[x as usize] == kk),
            SkipNeByte(x, kk) => self.skip_if(self.state.v[x as usize] != kk),
            SkipEqReg(x, y) => {
                self.skip_if(self.state.v[x as usize] == self.state.v[y as usize])
            }
            SkipNeReg(x, y) => {
                self.skip_if(self.state.v[x as usize] != self.state.v[y as usize])
            }
            LoadByte(x, kk) => self.state.v[x as usize] = kk,
            AddByte(x, kk) => {
                let v = &mut self.state.v[x as usize];
                *v = v.wrapping_add(kk);
            }
            LoadReg(x, y) => self.state.v[x as usize] = self.state.v[y as usize],
            Or(x, y) => self.state.v[x as usize] |= self.state.v[y as usize],
            And(x, y) => self.state.v[x as usize] &= self.state.v[y as usize],
            Xor(x, y) => self.state.v[x as usize] ^= self.state.v[y as usize],
            AddReg(x, y) => {
                let (vx, vy) = (self.state.v[x as usize], self.state.v[y as usize]);
                let (sum, carry) = vx.overflowing_add(vy);
                self.set_with_flag(x, sum, carry as u8);
            }
            Sub(x, y) => {
                let (vx, vy) = (self.state.v[x as usize], self.state.v[y as usize]);
                self.set_with_flag(x, vx.wrapping_sub(vy), (vx > vy) as u8);
            }
            Shr(x, _) => {
                let vx = self.state.v[x as usize];
                self.set_with_flag(x, vx >> 1, vx & 0x01);
            }
            SubN(x, y) => {
                let (vx, vy) = (self.state.v[x as usize], self.state.v[y as usize]);
                self.set_with_flag(x, vy.wrapping_sub(vx), (vy > vx) as u8);
            }
            Shl(x, _) => {
                let vx = self.state.v[x as usize];
                self.set_with_flag(x, vx << 1, vx >> 7);
            }
            LoadI(addr) => self.state.i = addr,
            JumpV0(addr) => self.state.pc = addr + self.state.v[0] as u16,
            Random(x, kk) => self.state.v[x as usize] = self.rng.random::<u8>() & kk,
            Draw(x, y, n) => {
                let (vx, vy) = (self.state.v[x as usize], self.state.v[y as usize]);
                let sprite = self
                    .state
                    .memory
                    .get_ro_slice(self.state.i as usize, n as usize)?;
                let erased = self.screen.draw(vx, vy, sprite);
                self.state.v[VF] = erased as u8;
                self.screen_dirty = true;
            }
            SkipKey(x) => {
                let pressed = self.input.is_pressed(self.state.v[x as usize])?;
                self.skip_if(pressed);
            }
            SkipNotKey(x) => {
                let pressed = self.input.is_pressed(self.state.v[x as usize])?;
                self.skip_if(!pressed);
            }
            LoadDelay(x) => self.state.v[x as usize] = self.state.timers.delay,
            WaitKey(x) => match self.input.take_key()? {
                Some(key) => self.state.v[x as usize] = key,
                // run this instruction again next cycle; timers keep going
                None => self.state.pc = self.state.pc.wrapping_sub(2),
            },
            SetDelay(x) => self.state.timers.delay = self.state.v[x as usize],
            SetSound(x) => self.state.timers.sound = self.state.v[x as usize],
            AddI(x) => self.state.i = self.state.i.wrapping_add(self.state.v[x as usize] as u16),
            LoadFont(x) => self.state.i = Chip8MemoryMap::glyph_addr(self.state.v[x as usize]),
            StoreBcd(x) => {
                let vx = self.state.v[x as usize];
                self.state
                    .memory
                    .get_rw_slice(self.state.i as usize, 3)?
                    .copy_from_slice(&[vx / 100, vx / 10 % 10, vx % 10]);
            }
            StoreRegs(x) => {
                let n = x as usize + 1;
                self.state
                    .memory
                    .get_rw_slice(self.state.i as usize, n)?
                    .copy_from_slice(&self.state.v[..n]);
            }
            LoadRegs(x) => {
                let n = x as usize + 1;
                let src = self.state.memory.get_ro_slice(self.state.i as usize, n)?;
                self.state.v[..n].copy_from_slice(src);
            }
        }
        Ok(())
    }

    fn set_with_flag(&mut self, x: u8, value: u8, flag: u8) {
        self.state.v[VF] = flag;
        self.state.v[x as usize] = value;
    }

    pub fn is_halted(&self) -> bool {
        self.halted
    }

    /// handle for stopping run() from elsewhere (another thread, an input
    /// device, a signal handler...)
    pub fn stop_handle(&self) -> StopHandle {
        self.stop.clone()
    }

    pub fn screen(&self) -> &FrameBuffer {
        &self.screen
    }

    pub fn registers(&self) -> Registers {
        self.state.registers()
    }

    pub fn memory(&self) -> &Chip8MemoryMap {
        &self.state.memory
    }

    pub fn timing(&self) -> &TimingController {
        &self.timing
    }
}
