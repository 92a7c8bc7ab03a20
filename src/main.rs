use std::path::PathBuf;

use clap::Parser;
use log::info;

use chip8_vm::{
    dump_state, load_quirks_profile, load_quirks_profile_from_env, run_emulator_headless,
    Chip8Error,
};

#[derive(Debug, Parser)]
#[command(name = "chip8-vm")]
#[command(about = "Run a CHIP-8 program")]
struct Args {
    #[arg(long)]
    rom: PathBuf,

    /// Falls back to CHIP8_QUIRKS, then "modern"
    #[arg(long, value_parser = ["original", "modern"])]
    quirks: Option<String>,

    #[arg(long, default_value_t = 700)]
    hz: usize,

    #[arg(long, default_value_t = 2000)]
    max_cycles: usize,

    /// Seed for the RND instruction; random when omitted
    #[arg(long)]
    seed: Option<u64>,

    #[arg(long)]
    headless: bool,

    /// Print the register file after a headless run
    #[arg(long)]
    dump: bool,

    #[cfg(feature = "gui")]
    #[arg(long, default_value_t = 16)]
    scale: usize,

    #[cfg(feature = "gui")]
    #[arg(long, default_value_t = 60)]
    fps: usize,
}

fn main() -> Result<(), Chip8Error> {
    env_logger::init();

    let args = Args::parse();
    let (profile, quirks) = match &args.quirks {
        Some(profile) => load_quirks_profile(profile)
            .map(|quirks| (profile.clone(), quirks))
            .map_err(|_| Chip8Error::InvalidArgument("quirks must be original or modern"))?,
        None => load_quirks_profile_from_env()
            .map_err(|_| Chip8Error::InvalidArgument("CHIP8_QUIRKS must be original or modern"))?,
    };
    let seed = args.seed.unwrap_or_else(rand::random);
    info!("quirks={profile} seed={seed:#x}");

    if args.headless {
        let run = run_emulator_headless(quirks, &args.rom, args.max_cycles, args.hz, seed)?;
        println!(
            "headless finished: cycles={} pc=0x{:03x} lit_pixels={}",
            run.cycles,
            run.state.pc,
            run.frame.lit_pixel_count()
        );
        if args.dump {
            print!("{}", dump_state(&run.state));
        }
        return Ok(());
    }

    run_gui(&args, quirks, seed)
}

#[cfg(feature = "gui")]
fn run_gui(args: &Args, quirks: chip8_vm::Chip8Quirks, seed: u64) -> Result<(), Chip8Error> {
    let _state =
        chip8_vm::run_emulator_app(quirks, &args.rom, seed, args.scale, args.hz, args.fps)?;
    Ok(())
}

#[cfg(not(feature = "gui"))]
fn run_gui(_args: &Args, _quirks: chip8_vm::Chip8Quirks, _seed: u64) -> Result<(), Chip8Error> {
    Err(Chip8Error::InvalidArgument(
        "built without the gui feature, pass --headless",
    ))
}
