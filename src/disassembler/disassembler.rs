use std::fmt::{Display, Formatter};
use std::fs;
use std::path::Path;

use crate::chip8_emulator::instruction::decode;
use crate::disassembler::error::DisassemblerError;

/// One listing row: where the word lives, its raw bytes and its mnemonic.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisassembledLine {
    pub address: usize,
    pub bytes: Vec<u8>,
    pub text: String,
}

impl Display for DisassembledLine {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let raw: String = self.bytes.iter().map(|byte| format!("{byte:02X}")).collect();
        write!(f, "0x{:03X}: {raw:<4}  {}", self.address, self.text)
    }
}

/// Renders the instruction word at `offset`. Words outside the instruction set
/// come back as `DW` data and a lone trailing byte as `DB`, so the listing can
/// be fed back to an assembler.
pub fn disassemble_at(bytes: &[u8], offset: usize) -> Result<String, DisassemblerError> {
    let high = *bytes.get(offset).ok_or_else(|| {
        DisassemblerError::new(
            format!("past end of {}-byte buffer", bytes.len()),
            Some(offset),
        )
    })?;

    let Some(&low) = bytes.get(offset + 1) else {
        return Ok(format!("DB 0x{high:02X}"));
    };

    let opcode = ((high as u16) << 8) | low as u16;
    Ok(match decode(opcode, offset) {
        Ok(instruction) => instruction.to_string(),
        Err(_) => format!("DW 0x{opcode:04X}"),
    })
}

/// Walks the buffer two bytes at a time, labelling rows from `origin`.
pub fn disassemble(bytes: &[u8], origin: usize) -> Vec<DisassembledLine> {
    (0..bytes.len())
        .step_by(2)
        .filter_map(|offset| {
            let text = disassemble_at(bytes, offset).ok()?;
            let end = usize::min(offset + 2, bytes.len());
            Some(DisassembledLine {
                address: origin + offset,
                bytes: bytes[offset..end].to_vec(),
                text,
            })
        })
        .collect()
}

pub fn disassemble_file(
    path: impl AsRef<Path>,
    origin: usize,
) -> Result<Vec<DisassembledLine>, DisassemblerError> {
    let bytes = fs::read(path).map_err(|error| DisassemblerError::new(error.to_string(), None))?;
    Ok(disassemble(&bytes, origin))
}
