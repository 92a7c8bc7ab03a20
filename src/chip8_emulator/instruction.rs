use std::fmt::{Display, Formatter};

use crate::chip8_emulator::error::Chip8Error;

/// One decoded CHIP-8 instruction. Register operands are indices `0x0..=0xF`,
/// addresses are 12-bit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Instruction {
    /// 00E0
    ClearScreen,
    /// 00EE
    Return,
    /// 1nnn
    Jump(u16),
    /// 2nnn
    Call(u16),
    /// 3xkk
    SkipEqByte(usize, u8),
    /// 4xkk
    SkipNeByte(usize, u8),
    /// 5xy0
    SkipEqReg(usize, usize),
    /// 6xkk
    LoadByte(usize, u8),
    /// 7xkk
    AddByte(usize, u8),
    /// 8xy0
    LoadReg(usize, usize),
    /// 8xy1
    Or(usize, usize),
    /// 8xy2
    And(usize, usize),
    /// 8xy3
    Xor(usize, usize),
    /// 8xy4
    AddReg(usize, usize),
    /// 8xy5
    Sub(usize, usize),
    /// 8xy6
    ShiftRight(usize, usize),
    /// 8xy7
    SubN(usize, usize),
    /// 8xyE
    ShiftLeft(usize, usize),
    /// 9xy0
    SkipNeReg(usize, usize),
    /// Annn
    LoadIndex(u16),
    /// Bnnn
    JumpV0(u16),
    /// Cxkk
    Random(usize, u8),
    /// Dxyn
    Draw(usize, usize, u8),
    /// Ex9E
    SkipKeyPressed(usize),
    /// ExA1
    SkipKeyNotPressed(usize),
    /// Fx07
    LoadDelay(usize),
    /// Fx0A
    WaitKey(usize),
    /// Fx15
    SetDelay(usize),
    /// Fx18
    SetSound(usize),
    /// Fx1E
    AddIndex(usize),
    /// Fx29
    LoadFont(usize),
    /// Fx33
    StoreBcd(usize),
    /// Fx55
    StoreRegisters(usize),
    /// Fx65
    LoadRegisters(usize),
}

fn x_register_index(opcode: u16) -> usize {
    ((opcode & 0x0F00) >> 8) as usize
}

fn y_register_index(opcode: u16) -> usize {
    ((opcode & 0x00F0) >> 4) as usize
}

fn address_nnn(opcode: u16) -> u16 {
    opcode & 0x0FFF
}

fn byte_kk(opcode: u16) -> u8 {
    (opcode & 0x00FF) as u8
}

fn nibble_n(opcode: u16) -> u8 {
    (opcode & 0x000F) as u8
}

/// Decodes an opcode without touching any machine state. `pc` is only used to
/// report where an unknown opcode was found.
pub fn decode(opcode: u16, pc: usize) -> Result<Instruction, Chip8Error> {
    let x = x_register_index(opcode);
    let y = y_register_index(opcode);
    let kk = byte_kk(opcode);
    let nnn = address_nnn(opcode);
    let n = nibble_n(opcode);

    let instruction = match opcode >> 12 {
        0x0 => match opcode {
            0x00E0 => Instruction::ClearScreen,
            0x00EE => Instruction::Return,
            _ => return Err(Chip8Error::UnknownOpcode { opcode, pc }),
        },
        0x1 => Instruction::Jump(nnn),
        0x2 => Instruction::Call(nnn),
        0x3 => Instruction::SkipEqByte(x, kk),
        0x4 => Instruction::SkipNeByte(x, kk),
        0x5 if n == 0 => Instruction::SkipEqReg(x, y),
        0x6 => Instruction::LoadByte(x, kk),
        0x7 => Instruction::AddByte(x, kk),
        0x8 => match n {
            0x0 => Instruction::LoadReg(x, y),
            0x1 => Instruction::Or(x, y),
            0x2 => Instruction::And(x, y),
            0x3 => Instruction::Xor(x, y),
            0x4 => Instruction::AddReg(x, y),
            0x5 => Instruction::Sub(x, y),
            0x6 => Instruction::ShiftRight(x, y),
            0x7 => Instruction::SubN(x, y),
            0xE => Instruction::ShiftLeft(x, y),
            _ => return Err(Chip8Error::UnknownOpcode { opcode, pc }),
        },
        0x9 if n == 0 => Instruction::SkipNeReg(x, y),
        0xA => Instruction::LoadIndex(nnn),
        0xB => Instruction::JumpV0(nnn),
        0xC => Instruction::Random(x, kk),
        0xD => Instruction::Draw(x, y, n),
        0xE => match kk {
            0x9E => Instruction::SkipKeyPressed(x),
            0xA1 => Instruction::SkipKeyNotPressed(x),
            _ => return Err(Chip8Error::UnknownOpcode { opcode, pc }),
        },
        0xF => match kk {
            0x07 => Instruction::LoadDelay(x),
            0x0A => Instruction::WaitKey(x),
            0x15 => Instruction::SetDelay(x),
            0x18 => Instruction::SetSound(x),
            0x1E => Instruction::AddIndex(x),
            0x29 => Instruction::LoadFont(x),
            0x33 => Instruction::StoreBcd(x),
            0x55 => Instruction::StoreRegisters(x),
            0x65 => Instruction::LoadRegisters(x),
            _ => return Err(Chip8Error::UnknownOpcode { opcode, pc }),
        },
        _ => return Err(Chip8Error::UnknownOpcode { opcode, pc }),
    };

    Ok(instruction)
}

impl Display for Instruction {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match *self {
            Self::ClearScreen => write!(f, "CLS"),
            Self::Return => write!(f, "RET"),
            Self::Jump(addr) => write!(f, "JP 0x{addr:03X}"),
            Self::Call(addr) => write!(f, "CALL 0x{addr:03X}"),
            Self::SkipEqByte(x, kk) => write!(f, "SE V{x:X}, 0x{kk:02X}"),
            Self::SkipNeByte(x, kk) => write!(f, "SNE V{x:X}, 0x{kk:02X}"),
            Self::SkipEqReg(x, y) => write!(f, "SE V{x:X}, V{y:X}"),
            Self::LoadByte(x, kk) => write!(f, "LD V{x:X}, 0x{kk:02X}"),
            Self::AddByte(x, kk) => write!(f, "ADD V{x:X}, 0x{kk:02X}"),
            Self::LoadReg(x, y) => write!(f, "LD V{x:X}, V{y:X}"),
            Self::Or(x, y) => write!(f, "OR V{x:X}, V{y:X}"),
            Self::And(x, y) => write!(f, "AND V{x:X}, V{y:X}"),
            Self::Xor(x, y) => write!(f, "XOR V{x:X}, V{y:X}"),
            Self::AddReg(x, y) => write!(f, "ADD V{x:X}, V{y:X}"),
            Self::Sub(x, y) => write!(f, "SUB V{x:X}, V{y:X}"),
            Self::ShiftRight(x, y) if x == y => write!(f, "SHR V{x:X}"),
            Self::ShiftRight(x, y) => write!(f, "SHR V{x:X}, V{y:X}"),
            Self::SubN(x, y) => write!(f, "SUBN V{x:X}, V{y:X}"),
            Self::ShiftLeft(x, y) if x == y => write!(f, "SHL V{x:X}"),
            Self::ShiftLeft(x, y) => write!(f, "SHL V{x:X}, V{y:X}"),
            Self::SkipNeReg(x, y) => write!(f, "SNE V{x:X}, V{y:X}"),
            Self::LoadIndex(addr) => write!(f, "LD I, 0x{addr:03X}"),
            Self::JumpV0(addr) => write!(f, "JP V0, 0x{addr:03X}"),
            Self::Random(x, kk) => write!(f, "RND V{x:X}, 0x{kk:02X}"),
            Self::Draw(x, y, n) => write!(f, "DRW V{x:X}, V{y:X}, {n}"),
            Self::SkipKeyPressed(x) => write!(f, "SKP V{x:X}"),
            Self::SkipKeyNotPressed(x) => write!(f, "SKNP V{x:X}"),
            Self::LoadDelay(x) => write!(f, "LD V{x:X}, DT"),
            Self::WaitKey(x) => write!(f, "LD V{x:X}, K"),
            Self::SetDelay(x) => write!(f, "LD DT, V{x:X}"),
            Self::SetSound(x) => write!(f, "LD ST, V{x:X}"),
            Self::AddIndex(x) => write!(f, "ADD I, V{x:X}"),
            Self::LoadFont(x) => write!(f, "LD F, V{x:X}"),
            Self::StoreBcd(x) => write!(f, "LD B, V{x:X}"),
            Self::StoreRegisters(x) => write!(f, "LD [I], V{x:X}"),
            Self::LoadRegisters(x) => write!(f, "LD V{x:X}, [I]"),
        }
    }
}
