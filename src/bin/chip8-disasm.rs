use std::path::PathBuf;

use clap::Parser;

use chip8_vm::disassembler::{disassemble_file, DisassemblerError};

#[derive(Debug, Parser)]
#[command(name = "chip8-disasm")]
#[command(about = "Print a CHIP-8 ROM as an instruction listing")]
struct Args {
    rom: PathBuf,

    #[arg(long, default_value = "0x200")]
    origin: String,
}

fn parse_origin(text: &str) -> Result<usize, DisassemblerError> {
    let value = if let Some(rest) = text.strip_prefix("0x").or_else(|| text.strip_prefix("0X")) {
        usize::from_str_radix(rest, 16)
            .map_err(|_| DisassemblerError::new(format!("invalid --origin value '{text}'"), None))?
    } else {
        text.parse::<usize>()
            .map_err(|_| DisassemblerError::new(format!("invalid --origin value '{text}'"), None))?
    };
    Ok(value)
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let args = Args::parse();
    let origin = parse_origin(&args.origin)?;

    for line in disassemble_file(&args.rom, origin)? {
        println!("{line}");
    }
    Ok(())
}
