use log::{debug, trace, warn};
use rand::Rng;

use crate::chip8_emulator::config::{
    wrap_address, FLAG_REGISTER, FONT_GLYPH_SIZE, FONT_START, SCREEN_HEIGHT, SCREEN_WIDTH,
    STACK_DEPTH,
};
use crate::chip8_emulator::error::Chip8Error;
use crate::chip8_emulator::instruction::{decode, Instruction};
use crate::chip8_emulator::peripherals::{DisplaySink, Peripherals};
use crate::chip8_emulator::quirks::Chip8Quirks;
use crate::chip8_emulator::state::EmulatorState;

/// Outcome of a successful `step`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepStatus {
    Executed(Instruction),
    /// Blocked on `Fx0A`; PC still points at the wait instruction.
    WaitingForKey { register: usize },
}

/// Reads the big-endian opcode at PC. Never advances PC.
pub fn fetch(state: &EmulatorState) -> u16 {
    let high = state.memory[wrap_address(state.pc)] as u16;
    let low = state.memory[wrap_address(state.pc + 1)] as u16;
    (high << 8) | low
}

/// Fetches, decodes and executes one instruction.
///
/// On a fault the state is left exactly as it was before the call.
pub fn step(
    state: &mut EmulatorState,
    peripherals: &mut Peripherals<'_>,
    quirks: Chip8Quirks,
) -> Result<StepStatus, Chip8Error> {
    let opcode = fetch(state);
    execute_opcode(state, opcode, peripherals, quirks)
}

pub fn execute_opcode(
    state: &mut EmulatorState,
    opcode: u16,
    peripherals: &mut Peripherals<'_>,
    quirks: Chip8Quirks,
) -> Result<StepStatus, Chip8Error> {
    let instruction = decode(opcode, state.pc).map_err(|error| {
        warn!("{error}");
        error
    })?;
    trace!("0x{:03x}: {:04x} {}", state.pc, opcode, instruction);

    execute_instruction(state, instruction, peripherals, quirks).map_err(|error| {
        warn!("{error}");
        error
    })
}

pub fn execute_instruction(
    state: &mut EmulatorState,
    instruction: Instruction,
    peripherals: &mut Peripherals<'_>,
    quirks: Chip8Quirks,
) -> Result<StepStatus, Chip8Error> {
    match instruction {
        Instruction::ClearScreen => {
            peripherals.display.clear();
            advance(state);
        }
        Instruction::Return => {
            if state.sp == 0 {
                return Err(Chip8Error::StackUnderflow { pc: state.pc });
            }
            state.sp -= 1;
            state.pc = state.stack[state.sp] as usize;
        }
        Instruction::Jump(addr) => state.pc = addr as usize,
        Instruction::Call(addr) => {
            if state.sp == STACK_DEPTH {
                return Err(Chip8Error::StackOverflow { pc: state.pc });
            }
            state.stack[state.sp] = wrap_address(state.pc + 2) as u16;
            state.sp += 1;
            state.pc = addr as usize;
        }
        Instruction::SkipEqByte(x, kk) => skip_if(state.registers[x] == kk, state),
        Instruction::SkipNeByte(x, kk) => skip_if(state.registers[x] != kk, state),
        Instruction::SkipEqReg(x, y) => skip_if(state.registers[x] == state.registers[y], state),
        Instruction::LoadByte(x, kk) => {
            state.registers[x] = kk;
            advance(state);
        }
        Instruction::AddByte(x, kk) => {
            state.registers[x] = state.registers[x].wrapping_add(kk);
            advance(state);
        }
        Instruction::LoadReg(x, y) => {
            state.registers[x] = state.registers[y];
            advance(state);
        }
        Instruction::Or(x, y) => {
            state.registers[x] |= state.registers[y];
            advance(state);
        }
        Instruction::And(x, y) => {
            state.registers[x] &= state.registers[y];
            advance(state);
        }
        Instruction::Xor(x, y) => {
            state.registers[x] ^= state.registers[y];
            advance(state);
        }
        Instruction::AddReg(x, y) => {
            let (result, carry) = state.registers[x].overflowing_add(state.registers[y]);
            set_with_flag(state, x, result, carry);
        }
        Instruction::Sub(x, y) => {
            let (vx, vy) = (state.registers[x], state.registers[y]);
            set_with_flag(state, x, vx.wrapping_sub(vy), vx > vy);
        }
        Instruction::ShiftRight(x, y) => {
            let value = state.registers[shift_source(quirks, x, y)];
            set_with_flag(state, x, value >> 1, value & 0x1 == 1);
        }
        Instruction::SubN(x, y) => {
            let (vx, vy) = (state.registers[x], state.registers[y]);
            set_with_flag(state, x, vy.wrapping_sub(vx), vy > vx);
        }
        Instruction::ShiftLeft(x, y) => {
            let value = state.registers[shift_source(quirks, x, y)];
            set_with_flag(state, x, value.wrapping_shl(1), (value >> 7) & 0x1 == 1);
        }
        Instruction::SkipNeReg(x, y) => skip_if(state.registers[x] != state.registers[y], state),
        Instruction::LoadIndex(addr) => {
            state.index = addr as usize;
            advance(state);
        }
        Instruction::JumpV0(addr) => {
            state.pc = wrap_address(addr as usize + state.registers[0] as usize);
        }
        Instruction::Random(x, kk) => {
            state.registers[x] = state.rng.gen::<u8>() & kk;
            advance(state);
        }
        Instruction::Draw(x, y, height) => {
            draw_sprite(state, &mut *peripherals.display, x, y, height as usize);
            advance(state);
        }
        Instruction::SkipKeyPressed(x) => {
            let key = state.registers[x] & 0x0F;
            skip_if(peripherals.keypad.is_key_down(key), state);
        }
        Instruction::SkipKeyNotPressed(x) => {
            let key = state.registers[x] & 0x0F;
            skip_if(!peripherals.keypad.is_key_down(key), state);
        }
        Instruction::LoadDelay(x) => {
            state.registers[x] = state.delay_timer;
            advance(state);
        }
        Instruction::WaitKey(x) => {
            if state.key_wait.is_none() {
                // Only presses that arrive while blocked release the wait.
                if let Some(stale) = peripherals.keypad.take_key_press() {
                    debug!("dropped key 0x{stale:x} pressed before wait");
                }
                debug!("waiting for key into V{x:X} at 0x{:03x}", state.pc);
                state.key_wait = Some(x);
                return Ok(StepStatus::WaitingForKey { register: x });
            }

            let Some(key) = peripherals.keypad.take_key_press() else {
                return Ok(StepStatus::WaitingForKey { register: x });
            };
            debug!("key 0x{key:x} released wait at 0x{:03x}", state.pc);
            state.key_wait = None;
            state.registers[x] = key & 0x0F;
            advance(state);
        }
        Instruction::SetDelay(x) => {
            state.delay_timer = state.registers[x];
            advance(state);
        }
        Instruction::SetSound(x) => {
            state.sound_timer = state.registers[x];
            advance(state);
        }
        Instruction::AddIndex(x) => {
            state.index = wrap_address(state.index + state.registers[x] as usize);
            advance(state);
        }
        Instruction::LoadFont(x) => {
            let digit = (state.registers[x] & 0x0F) as usize;
            state.index = FONT_START + digit * FONT_GLYPH_SIZE;
            advance(state);
        }
        Instruction::StoreBcd(x) => {
            let value = state.registers[x];
            state.memory[wrap_address(state.index)] = value / 100;
            state.memory[wrap_address(state.index + 1)] = (value % 100) / 10;
            state.memory[wrap_address(state.index + 2)] = value % 10;
            advance(state);
        }
        Instruction::StoreRegisters(x) => {
            for offset in 0..=x {
                state.memory[wrap_address(state.index + offset)] = state.registers[offset];
            }
            advance(state);
        }
        Instruction::LoadRegisters(x) => {
            for offset in 0..=x {
                state.registers[offset] = state.memory[wrap_address(state.index + offset)];
            }
            advance(state);
        }
    }

    Ok(StepStatus::Executed(instruction))
}

/// Decrements both timers by one, holding them at zero. The callback fires on
/// each tick that finds the sound timer running.
pub fn tick_timers(state: &mut EmulatorState, mut sound_callback: Option<&mut dyn FnMut()>) {
    state.delay_timer = state.delay_timer.saturating_sub(1);

    if state.sound_timer > 0 {
        state.sound_timer -= 1;
        if let Some(callback) = sound_callback.as_mut() {
            callback();
        }
    }
}

fn advance(state: &mut EmulatorState) {
    state.pc = wrap_address(state.pc + 2);
}

fn skip_if(condition: bool, state: &mut EmulatorState) {
    let width = if condition { 4 } else { 2 };
    state.pc = wrap_address(state.pc + width);
}

fn shift_source(quirks: Chip8Quirks, x: usize, y: usize) -> usize {
    if quirks.shift_uses_vy {
        y
    } else {
        x
    }
}

// VF is written after Vx so the flag survives when x is 0xF.
fn set_with_flag(state: &mut EmulatorState, x: usize, result: u8, flag: bool) {
    state.registers[x] = result;
    state.registers[FLAG_REGISTER] = u8::from(flag);
    advance(state);
}

fn draw_sprite(
    state: &mut EmulatorState,
    display: &mut dyn DisplaySink,
    x: usize,
    y: usize,
    height: usize,
) {
    let x_start = (state.registers[x] as usize) % SCREEN_WIDTH;
    let y_start = (state.registers[y] as usize) % SCREEN_HEIGHT;
    let mut collision = false;

    for row in 0..height {
        let sprite_row = state.memory[wrap_address(state.index + row)];
        let y_pos = (y_start + row) % SCREEN_HEIGHT;

        for bit in 0..8 {
            if (sprite_row >> (7 - bit)) & 0x1 == 0 {
                continue;
            }

            let x_pos = (x_start + bit) % SCREEN_WIDTH;
            let lit = display.pixel(x_pos, y_pos);
            collision |= lit;
            display.set_pixel(x_pos, y_pos, !lit);
        }
    }

    state.registers[FLAG_REGISTER] = u8::from(collision);
}
