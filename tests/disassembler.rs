use chip8_vm::disassembler::{disassemble, disassemble_at, disassemble_file};

#[test]
fn disassembles_opcode_at_offset() {
    let rom = [0x60, 0x0A, 0x70, 0x05, 0xF3, 0x0A];

    assert_eq!(disassemble_at(&rom, 0).unwrap(), "LD V0, 0x0A");
    assert_eq!(disassemble_at(&rom, 2).unwrap(), "ADD V0, 0x05");
    assert_eq!(disassemble_at(&rom, 4).unwrap(), "LD V3, K");
}

#[test]
fn odd_offsets_decode_the_straddling_word() {
    let rom = [0x00, 0xE0, 0xEE];

    assert_eq!(disassemble_at(&rom, 1).unwrap(), "DW 0xE0EE");
}

#[test]
fn unknown_words_and_trailing_bytes_become_data() {
    let rom = [0x81, 0x2F, 0xAB];

    assert_eq!(disassemble_at(&rom, 0).unwrap(), "DW 0x812F");
    assert_eq!(disassemble_at(&rom, 2).unwrap(), "DB 0xAB");
}

#[test]
fn listing_is_addressed_from_origin() {
    let rom = [0xA2, 0x10, 0xD0, 0x15, 0x12, 0x00];

    let lines = disassemble(&rom, 0x200);
    let addresses: Vec<usize> = lines.iter().map(|line| line.address).collect();
    let texts: Vec<&str> = lines.iter().map(|line| line.text.as_str()).collect();

    assert_eq!(addresses, vec![0x200, 0x202, 0x204]);
    assert_eq!(texts, vec!["LD I, 0x210", "DRW V0, V1, 5", "JP 0x200"]);
}

#[test]
fn disassemble_file_reads_rom() {
    let tmp = tempfile::NamedTempFile::new().unwrap();
    std::fs::write(tmp.path(), [0x00, 0xE0, 0x00, 0xEE]).unwrap();

    let lines = disassemble_file(tmp.path(), 0x200).unwrap();

    assert_eq!(lines.len(), 2);
    assert_eq!(lines[1].to_string(), "0x202: 00EE  RET");
}
