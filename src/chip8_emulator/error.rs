use std::fmt::{Display, Formatter};

#[derive(Debug)]
pub enum Chip8Error {
    Io(std::io::Error),
    RomTooLarge { size: usize, max: usize },
    UnknownOpcode { opcode: u16, pc: usize },
    StackOverflow { pc: usize },
    StackUnderflow { pc: usize },
    InvalidArgument(&'static str),
}

impl Chip8Error {
    /// True for faults raised while executing an instruction, as opposed to
    /// load or driver errors.
    pub fn is_execution_fault(&self) -> bool {
        matches!(
            self,
            Self::UnknownOpcode { .. } | Self::StackOverflow { .. } | Self::StackUnderflow { .. }
        )
    }
}

impl Display for Chip8Error {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io(error) => write!(f, "io error: {error}"),
            Self::RomTooLarge { size, max } => {
                write!(f, "ROM too large: {size} bytes (max {max})")
            }
            Self::UnknownOpcode { opcode, pc } => {
                write!(f, "unknown opcode 0x{opcode:04x} at 0x{pc:03x}")
            }
            Self::StackOverflow { pc } => {
                write!(f, "call with full stack at 0x{pc:03x}")
            }
            Self::StackUnderflow { pc } => {
                write!(f, "return with empty stack at 0x{pc:03x}")
            }
            Self::InvalidArgument(argument) => write!(f, "invalid argument: {argument}"),
        }
    }
}

impl std::error::Error for Chip8Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(error) => Some(error),
            _ => None,
        }
    }
}

impl From<std::io::Error> for Chip8Error {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}
