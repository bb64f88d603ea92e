/// Runtime knobs for the interpreter and its timing controller
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chip8Config {
    /// instructions executed per timer tick; 10 gives 600 instructions/s
    pub instructions_per_tick: u32,
    /// timer tick cadence
    pub ticks_per_second: u32,
    /// how many timer ticks go by between decrements of delay/sound
    pub ticks_per_decrement: u32,
    /// fixed seed for CXKK, or None to seed from the OS
    pub seed: Option<u64>,
    /// where programs are loaded and execution starts
    pub load_address: u16,
}

pub const DEFAULT_INSTRUCTIONS_PER_TICK: u32 = 10;
pub const DEFAULT_TICKS_PER_SECOND: u32 = 60;
pub const DEFAULT_TICKS_PER_DECREMENT: u32 = 60;
pub const DEFAULT_LOAD_ADDRESS: u16 = 0x0200;

impl Default for Chip8Config {
    fn default() -> Self {
        Chip8Config {
            instructions_per_tick: DEFAULT_INSTRUCTIONS_PER_TICK,
            ticks_per_second: DEFAULT_TICKS_PER_SECOND,
            ticks_per_decrement: DEFAULT_TICKS_PER_DECREMENT,
            seed: None,
            load_address: DEFAULT_LOAD_ADDRESS,
        }
    }
}

impl Chip8Config {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn instructions_per_tick(mut self, n: u32) -> Self {
        self.instructions_per_tick = n;
        self
    }

    pub fn ticks_per_second(mut self, n: u32) -> Self {
        self.ticks_per_second = n;
        self
    }

    pub fn ticks_per_decrement(mut self, n: u32) -> Self {
        self.ticks_per_decrement = n;
        self
    }

    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// target instruction rate, i.e. cycles per second
    pub fn instructions_per_second(&self) -> u32 {
        self.instructions_per_tick
            .max(1)
            .saturating_mul(self.ticks_per_second.max(1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let c = Chip8Config::default();
        assert_eq!(c.instructions_per_tick, 10);
        assert_eq!(c.ticks_per_second, 60);
        assert_eq!(c.ticks_per_decrement, 60);
        assert_eq!(c.load_address, 0x200);
        assert_eq!(c.seed, None);
        assert_eq!(c.instructions_per_second(), 600);
    }

    #[test]
    fn test_builder() {
        let c = Chip8Config::new()
            .instructions_per_tick(20)
            .ticks_per_decrement(1)
            .seed(42);
        assert_eq!(c.instructions_per_second(), 1200);
        assert_eq!(c.ticks_per_decrement, 1);
        assert_eq!(c.seed, Some(42));
    }

    #[test]
    fn test_instructions_per_second_saturates() {
        let c = Chip8Config::new().instructions_per_tick(u32::MAX / 30);
        assert_eq!(c.instructions_per_second(), u32::MAX);
    }
}
