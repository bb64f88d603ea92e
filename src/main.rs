use std::error::Error;
use std::fs::File;
use std::io::{self, Read};
use std::path::{Path, PathBuf};

use chip8::config::{DEFAULT_INSTRUCTIONS_PER_TICK, DEFAULT_TICKS_PER_DECREMENT};
use chip8::disassembler;
use chip8::display::{MonoTermDisplay, NullDisplay};
use chip8::input::{NullInput, StdinInput};
use chip8::interpreter::Chip8Interpreter;
use chip8::memory::CHIP8_PROGRAM_ADDR;
use chip8::sound::{Mute, SimpleBeep, Sound};
use chip8::timing::{ManualClock, SpinClock, StopHandle};
use chip8::Chip8Config;
use clap::Parser;
use env_logger::Env;

#[derive(Parser, Debug)]
#[command(name = "chip8-vm", about = "Run a CHIP-8 program in the terminal.")]
struct Args {
    /// Program image to run; read from stdin when omitted.
    #[arg(value_name = "ROM")]
    rom: Option<PathBuf>,

    /// Instructions per 60Hz timer tick.
    #[arg(long, default_value_t = DEFAULT_INSTRUCTIONS_PER_TICK)]
    speed: u32,

    /// Timer ticks between decrements of the delay and sound timers (1 = 60Hz).
    #[arg(long, default_value_t = DEFAULT_TICKS_PER_DECREMENT)]
    ticks_per_decrement: u32,

    /// Seed for the random number generator.
    #[arg(long)]
    seed: Option<u64>,

    /// No beeping.
    #[arg(long, default_value_t = false)]
    mute: bool,

    /// No terminal: run flat out on virtual time and dump the machine at the end.
    #[arg(long, default_value_t = false)]
    headless: bool,

    /// Stop after this many instructions.
    #[arg(long, value_name = "N")]
    max_steps: Option<u64>,

    /// Print a listing of the program and exit.
    #[arg(long, default_value_t = false)]
    disassemble: bool,

    /// Log filter when RUST_LOG isn't set (e.g. info, debug, chip8=trace).
    #[arg(long, default_value = "warn")]
    log_level: String,
}

impl Args {
    fn config(&self) -> Chip8Config {
        let config = Chip8Config::new()
            .instructions_per_tick(self.speed)
            .ticks_per_decrement(self.ticks_per_decrement);
        match self.seed {
            Some(seed) => config.seed(seed),
            None => config,
        }
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();
    env_logger::Builder::from_env(Env::default().default_filter_or(args.log_level.as_str()))
        .init();

    // load a program
    let program = read_program(args.rom.as_deref())?;
    log::info!("read {} bytes of program", program.len());

    if args.disassemble {
        for line in disassembler::disassemble(&program, CHIP8_PROGRAM_ADDR) {
            println!("{}", line);
        }
        return Ok(());
    }

    if args.headless {
        run_headless(&program, &args)
    } else {
        run_terminal(&program, &args)
    }
}

fn read_program(path: Option<&Path>) -> io::Result<Vec<u8>> {
    let mut program = Vec::new();
    match path {
        Some(path) => File::open(path)?.read_to_end(&mut program)?,
        None => io::stdin().lock().read_to_end(&mut program)?,
    };
    Ok(program)
}

fn run_terminal(program: &[u8], args: &Args) -> Result<(), Box<dyn Error>> {
    // initialise
    let stop = StopHandle::new();
    let mut display = MonoTermDisplay::new()?;
    let mut input = StdinInput::new(stop.clone())?;
    let mut beeper = SimpleBeep::new();
    let mut mute = Mute::new();
    let sound: &mut dyn Sound = if args.mute { &mut mute } else { &mut beeper };

    let mut interpreter = Chip8Interpreter::with_config(
        &mut display,
        &mut input,
        sound,
        args.config(),
        Box::new(SpinClock::new()),
    )
    .with_stop_handle(stop);
    interpreter.load(program)?;
    let result = match args.max_steps {
        Some(n) => interpreter.run_for(n).map(|_| ()),
        None => interpreter.run(),
    };

    // give the terminal back before reporting anything
    drop(interpreter);
    drop(input);
    drop(display);
    // shove some junk on stdout to stop the cli messing up the last frame
    for _ in 0..2 {
        println!();
    }
    Ok(result?)
}

fn run_headless(program: &[u8], args: &Args) -> Result<(), Box<dyn Error>> {
    let mut display = NullDisplay::new();
    let mut input = NullInput::new();
    let mut sound = Mute::new();
    let mut interpreter = Chip8Interpreter::with_config(
        &mut display,
        &mut input,
        &mut sound,
        args.config(),
        Box::new(ManualClock::new()),
    );
    interpreter.load(program)?;
    let steps = match args.max_steps {
        Some(n) => interpreter.run_for(n)?,
        None => interpreter.run_for(u64::MAX)?,
    };

    let r = interpreter.registers();
    println!(
        "{} steps, {}: pc={:03X} i={:04X} sp={} dt={} st={}",
        steps,
        if interpreter.is_halted() { "halted" } else { "stopped" },
        r.pc,
        r.i,
        r.sp,
        r.delay,
        r.sound
    );
    println!("v={:02X?}", r.v);
    print!("{:?}", interpreter.screen());
    Ok(())
}
