use std::fmt::{self, Write as _};
use std::fs;
use std::path::Path;

use log::{debug, info, log_enabled, warn};
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::chip8_emulator::config::{
    FONT_BYTES, FONT_START, MAX_PROGRAM_SIZE, MEMORY_SIZE, PROGRAM_START, REGISTER_COUNT,
    STACK_DEPTH,
};
use crate::chip8_emulator::error::Chip8Error;

#[derive(Debug, Clone)]
pub struct EmulatorState {
    pub memory: [u8; MEMORY_SIZE],
    pub registers: [u8; REGISTER_COUNT],
    pub stack: [u16; STACK_DEPTH],
    /// Number of return addresses currently on `stack`.
    pub sp: usize,
    pub pc: usize,
    pub index: usize,
    pub delay_timer: u8,
    pub sound_timer: u8,
    /// Register awaiting a key while blocked on `Fx0A`.
    pub key_wait: Option<usize>,
    seed: u64,
    pub(crate) rng: StdRng,
}

impl EmulatorState {
    pub fn with_seed(seed: u64) -> Self {
        let mut state = Self {
            memory: [0; MEMORY_SIZE],
            registers: [0; REGISTER_COUNT],
            stack: [0; STACK_DEPTH],
            sp: 0,
            pc: PROGRAM_START,
            index: 0,
            delay_timer: 0,
            sound_timer: 0,
            key_wait: None,
            seed,
            rng: StdRng::seed_from_u64(seed),
        };
        load_font(&mut state);
        state
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn is_waiting_for_key(&self) -> bool {
        self.key_wait.is_some()
    }
}

impl Default for EmulatorState {
    fn default() -> Self {
        Self::with_seed(rand::random())
    }
}

pub fn create_state(rom_path: Option<&Path>) -> Result<EmulatorState, Chip8Error> {
    let mut state = EmulatorState::default();
    if let Some(path) = rom_path {
        load_rom(&mut state, path)?;
    }
    Ok(state)
}

pub fn create_state_with_seed(
    rom_path: Option<&Path>,
    seed: u64,
) -> Result<EmulatorState, Chip8Error> {
    let mut state = EmulatorState::with_seed(seed);
    if let Some(path) = rom_path {
        load_rom(&mut state, path)?;
    }
    Ok(state)
}

/// Returns the machine to its power-on state, reseeding the random source
/// with the seed it was created with.
pub fn reset_state(state: &mut EmulatorState) {
    *state = EmulatorState::with_seed(state.seed);
    info!("reset state (seed {:#x})", state.seed);
}

pub fn load_font(state: &mut EmulatorState) {
    state.memory[FONT_START..FONT_START + FONT_BYTES.len()].copy_from_slice(&FONT_BYTES);
}

/// Returns the machine to its power-on state and copies a program image to
/// `PROGRAM_START`. An oversized image is rejected before anything changes.
pub fn load_program(state: &mut EmulatorState, program: &[u8]) -> Result<(), Chip8Error> {
    if program.len() > MAX_PROGRAM_SIZE {
        return Err(Chip8Error::RomTooLarge {
            size: program.len(),
            max: MAX_PROGRAM_SIZE,
        });
    }

    *state = EmulatorState::with_seed(state.seed);

    let start = PROGRAM_START;
    let end = PROGRAM_START + program.len();
    state.memory[start..end].copy_from_slice(program);

    if log_enabled!(log::Level::Debug) {
        log_rom_content(program);
    }
    info!("loaded program into memory 0x{start:03x}..0x{end:03x}");

    Ok(())
}

pub fn load_rom(state: &mut EmulatorState, path: &Path) -> Result<(), Chip8Error> {
    let rom_bytes = fs::read(path)?;
    load_program(state, &rom_bytes)?;
    info!("rom {} ({} bytes)", path.display(), rom_bytes.len());
    Ok(())
}

fn log_rom_content(rom: &[u8]) {
    let rows: Vec<String> = rom
        .chunks(16)
        .map(|row| {
            row.iter()
                .map(|byte| format!("0x{byte:02x}"))
                .collect::<Vec<_>>()
                .join(" ")
        })
        .collect();
    debug!("program image:\n{}", rows.join("\n"));
}

pub fn sound_active(state: &EmulatorState) -> bool {
    state.sound_timer > 0
}

pub fn dump_state(state: &EmulatorState) -> String {
    let mut out = String::new();
    if let Err(error) = write_registers(&mut out, state) {
        warn!("register dump truncated: {error}");
    }
    out
}

fn write_registers(out: &mut String, state: &EmulatorState) -> fmt::Result {
    writeln!(out, "PC: 0x{:03x}", state.pc)?;
    writeln!(out, "I:  0x{:03x}", state.index)?;
    writeln!(out, "SP: {}", state.sp)?;
    writeln!(out, "DT: {}  ST: {}", state.delay_timer, state.sound_timer)?;
    for (index, value) in state.registers.iter().enumerate() {
        writeln!(out, "V{index:X}: 0x{value:02x}")?;
    }
    Ok(())
}
