pub mod chip8_emulator;
pub mod disassembler;

#[cfg(feature = "gui")]
pub use chip8_emulator::app::run_emulator_app;
pub use chip8_emulator::app::{run_emulator_headless, HeadlessRun};
pub use chip8_emulator::cpu::{
    execute_instruction, execute_opcode, fetch, step, tick_timers, StepStatus,
};
pub use chip8_emulator::error::Chip8Error;
pub use chip8_emulator::instruction::{decode, Instruction};
pub use chip8_emulator::peripherals::{
    Devices, DisplaySink, FrameBuffer, KeyState, Keypad, Peripherals,
};
pub use chip8_emulator::quirks::{
    load_quirks_profile, load_quirks_profile_from_env, Chip8Quirks, MODERN_QUIRKS, ORIGINAL_QUIRKS,
};
pub use chip8_emulator::state::{
    create_state, create_state_with_seed, dump_state, load_program, load_rom, reset_state,
    sound_active, EmulatorState,
};
