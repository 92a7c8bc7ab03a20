pub mod disassembler;
pub mod error;

pub use disassembler::{disassemble, disassemble_at, disassemble_file, DisassembledLine};
pub use error::DisassemblerError;
