use crate::config::Chip8Config;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Where the timing controller gets wall-clock time from, and how it waits
pub trait Clock {
    fn now(&self) -> Instant;
    fn sleep(&mut self, duration: Duration);
}

/// real time; spin_sleep keeps the short sleeps accurate, which plain
/// thread::sleep doesn't at 600Hz
#[derive(Default)]
pub struct SpinClock;

impl SpinClock {
    pub fn new() -> Self {
        SpinClock
    }
}

impl Clock for SpinClock {
    fn now(&self) -> Instant {
        Instant::now()
    }

    fn sleep(&mut self, duration: Duration) {
        spin_sleep::sleep(duration);
    }
}

/// Virtual time: only moves when slept on or advanced by hand. Clones share
/// the same timeline, so a test can keep one and stall the "host" with it.
#[derive(Clone)]
pub struct ManualClock {
    origin: Instant,
    elapsed_nanos: Arc<AtomicU64>,
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::new()
    }
}

impl ManualClock {
    pub fn new() -> Self {
        ManualClock {
            origin: Instant::now(),
            elapsed_nanos: Arc::new(AtomicU64::new(0)),
        }
    }

    /// pretend the host spent `duration` doing something else
    pub fn advance(&self, duration: Duration) {
        self.elapsed_nanos
            .fetch_add(duration.as_nanos() as u64, Ordering::SeqCst);
    }

    pub fn elapsed(&self) -> Duration {
        Duration::from_nanos(self.elapsed_nanos.load(Ordering::SeqCst))
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Instant {
        self.origin + self.elapsed()
    }

    fn sleep(&mut self, duration: Duration) {
        self.advance(duration);
    }
}

/// Cross-thread request to stop `run()`; checked between instructions, so a
/// stop never lands in the middle of one
#[derive(Clone, Default, Debug)]
pub struct StopHandle(Arc<AtomicBool>);

impl StopHandle {
    pub fn new() -> Self {
        StopHandle::default()
    }

    pub fn stop(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_stopped(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }

    /// re-arm after a stop, e.g. before running again
    pub fn clear(&self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

/// what happened during one pacing cycle
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Pace {
    /// a timer tick fell on this cycle
    pub timer_tick: bool,
    /// ... and it was one where delay/sound count down
    pub decrement: bool,
}

const MIN_CYCLE_PERIOD: Duration = Duration::from_nanos(1);

/// Paces the instruction stream to `instructions_per_tick * ticks_per_second`
/// cycles per second and turns every `instructions_per_tick` cycles into one
/// timer tick. Instruction throughput never changes the tick rate.
pub struct TimingController {
    clock: Box<dyn Clock>,
    cycle_period: Duration,
    instructions_per_tick: u64,
    ticks_per_decrement: u64,
    deadline: Option<Instant>,
    cycles: u64,
    ticks: u64,
    resyncs: u64,
}

impl TimingController {
    pub fn new(config: &Chip8Config, clock: Box<dyn Clock>) -> Self {
        let instructions_per_tick =
            at_least_one("instructions_per_tick", config.instructions_per_tick);
        let ticks_per_second = at_least_one("ticks_per_second", config.ticks_per_second);
        let ticks_per_decrement =
            at_least_one("ticks_per_decrement", config.ticks_per_decrement);
        // anything past a billion a second is just "flat out"
        let cycles_per_second = instructions_per_tick.saturating_mul(ticks_per_second);
        let cycle_period = (Duration::from_secs(1) / cycles_per_second).max(MIN_CYCLE_PERIOD);
        TimingController {
            clock,
            cycle_period,
            instructions_per_tick: instructions_per_tick as u64,
            ticks_per_decrement: ticks_per_decrement as u64,
            deadline: None,
            cycles: 0,
            ticks: 0,
            resyncs: 0,
        }
    }

    /// one pacing cycle, run after every instruction: wait out the rest of the
    /// cycle, then count it
    pub fn pace(&mut self) -> Pace {
        self.wait_for_deadline();

        self.cycles += 1;
        let mut pace = Pace::default();
        if self.cycles % self.instructions_per_tick == 0 {
            self.ticks += 1;
            pace.timer_tick = true;
            pace.decrement = self.ticks % self.ticks_per_decrement == 0;
        }
        pace
    }

    fn wait_for_deadline(&mut self) {
        let now = self.clock.now();
        let deadline = self.deadline.unwrap_or(now + self.cycle_period);
        let start_of_next = if now < deadline {
            self.clock.sleep(deadline - now);
            deadline
        } else if now - deadline > self.cycle_period {
            // stalled (debugger, slow host, key wait on a busy terminal...);
            // start the schedule again from here rather than racing to catch up
            log::debug!(
                "{:?} behind schedule at cycle {}, resynchronising",
                now - deadline,
                self.cycles
            );
            self.resyncs += 1;
            now
        } else {
            deadline
        };
        self.deadline = Some(start_of_next + self.cycle_period);
    }

    /// forget the schedule, e.g. after a pause; the next cycle starts a new one
    pub fn restart(&mut self) {
        self.deadline = None;
    }

    pub fn cycle_period(&self) -> Duration {
        self.cycle_period
    }

    pub fn cycles(&self) -> u64 {
        self.cycles
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    pub fn resyncs(&self) -> u64 {
        self.resyncs
    }
}

fn at_least_one(name: &str, value: u32) -> u32 {
    if value == 0 {
        log::warn!("{} can't be 0, using 1", name);
        1
    } else {
        value
    }
}
