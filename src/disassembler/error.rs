use std::fmt::{Display, Formatter};

#[derive(Debug, Clone)]
pub struct DisassemblerError {
    pub message: String,
    pub offset: Option<usize>,
}

impl DisassemblerError {
    pub fn new(message: impl Into<String>, offset: Option<usize>) -> Self {
        Self {
            message: message.into(),
            offset,
        }
    }
}

impl Display for DisassemblerError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        if let Some(offset) = self.offset {
            write!(f, "offset 0x{offset:x}: {}", self.message)
        } else {
            write!(f, "{}", self.message)
        }
    }
}

impl std::error::Error for DisassemblerError {}
