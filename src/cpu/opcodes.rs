// 6502 opcode dispatch table
//
// Maps each of the 256 possible opcode bytes to its mnemonic, addressing mode,
// base cycle count, whether a page-crossing penalty applies, and instruction
// length in bytes. `execute.rs` indexes this table to drive both instruction
// dispatch and trace/disassembly output.
//
// Unofficial (illegal) opcodes are filled in as single-byte, 2-cycle no-ops;
// `execute_instruction`'s catch-all arm treats them as NOPs.

use crate::cpu::addressing::AddressingMode;

/// Static information about a single opcode, independent of CPU state.
#[derive(Debug, Clone, Copy)]
pub struct OpcodeInfo {
    pub mnemonic: &'static str,
    pub mode: AddressingMode,
    pub cycles: u8,
    pub page_cycle: bool,
    pub bytes: u8,
}

const fn op(
    mnemonic: &'static str,
    mode: AddressingMode,
    cycles: u8,
    page_cycle: bool,
    bytes: u8,
) -> OpcodeInfo {
    OpcodeInfo {
        mnemonic,
        mode,
        cycles,
        page_cycle,
        bytes,
    }
}

const fn unofficial() -> OpcodeInfo {
    op("NOP", AddressingMode::Implied, 2, false, 1)
}

use AddressingMode::{
    Absolute as ABS, AbsoluteX as ABX, AbsoluteY as ABY, Accumulator as ACC, Immediate as IMM,
    Implied as IMP, IndexedIndirect as IZX, Indirect as IND, IndirectIndexed as IZY,
    Relative as REL, ZeroPage as ZP, ZeroPageX as ZPX, ZeroPageY as ZPY,
};

/// The full 256-entry opcode table.
pub static OPCODE_TABLE: [OpcodeInfo; 256] = [
    // 0x00-0x0F
    op("BRK", IMP, 7, false, 1),
    op("ORA", IZX, 6, false, 2),
    unofficial(),
    unofficial(),
    unofficial(),
    op("ORA", ZP, 3, false, 2),
    op("ASL", ZP, 5, false, 2),
    unofficial(),
    op("PHP", IMP, 3, false, 1),
    op("ORA", IMM, 2, false, 2),
    op("ASL", ACC, 2, false, 1),
    unofficial(),
    unofficial(),
    op("ORA", ABS, 4, false, 3),
    op("ASL", ABS, 6, false, 3),
    unofficial(),
    // 0x10-0x1F
    op("BPL", REL, 2, false, 2),
    op("ORA", IZY, 5, true, 2),
    unofficial(),
    unofficial(),
    unofficial(),
    op("ORA", ZPX, 4, false, 2),
    op("ASL", ZPX, 6, false, 2),
    unofficial(),
    op("CLC", IMP, 2, false, 1),
    op("ORA", ABY, 4, true, 3),
    unofficial(),
    unofficial(),
    unofficial(),
    op("ORA", ABX, 4, true, 3),
    op("ASL", ABX, 7, false, 3),
    unofficial(),
    // 0x20-0x2F
    op("JSR", ABS, 6, false, 3),
    op("AND", IZX, 6, false, 2),
    unofficial(),
    unofficial(),
    op("BIT", ZP, 3, false, 2),
    op("AND", ZP, 3, false, 2),
    op("ROL", ZP, 5, false, 2),
    unofficial(),
    op("PLP", IMP, 4, false, 1),
    op("AND", IMM, 2, false, 2),
    op("ROL", ACC, 2, false, 1),
    unofficial(),
    op("BIT", ABS, 4, false, 3),
    op("AND", ABS, 4, false, 3),
    op("ROL", ABS, 6, false, 3),
    unofficial(),
    // 0x30-0x3F
    op("BMI", REL, 2, false, 2),
    op("AND", IZY, 5, true, 2),
    unofficial(),
    unofficial(),
    unofficial(),
    op("AND", ZPX, 4, false, 2),
    op("ROL", ZPX, 6, false, 2),
    unofficial(),
    op("SEC", IMP, 2, false, 1),
    op("AND", ABY, 4, true, 3),
    unofficial(),
    unofficial(),
    unofficial(),
    op("AND", ABX, 4, true, 3),
    op("ROL", ABX, 7, false, 3),
    unofficial(),
    // 0x40-0x4F
    op("RTI", IMP, 6, false, 1),
    op("EOR", IZX, 6, false, 2),
    unofficial(),
    unofficial(),
    unofficial(),
    op("EOR", ZP, 3, false, 2),
    op("LSR", ZP, 5, false, 2),
    unofficial(),
    op("PHA", IMP, 3, false, 1),
    op("EOR", IMM, 2, false, 2),
    op("LSR", ACC, 2, false, 1),
    unofficial(),
    op("JMP", ABS, 3, false, 3),
    op("EOR", ABS, 4, false, 3),
    op("LSR", ABS, 6, false, 3),
    unofficial(),
    // 0x50-0x5F
    op("BVC", REL, 2, false, 2),
    op("EOR", IZY, 5, true, 2),
    unofficial(),
    unofficial(),
    unofficial(),
    op("EOR", ZPX, 4, false, 2),
    op("LSR", ZPX, 6, false, 2),
    unofficial(),
    op("CLI", IMP, 2, false, 1),
    op("EOR", ABY, 4, true, 3),
    unofficial(),
    unofficial(),
    unofficial(),
    op("EOR", ABX, 4, true, 3),
    op("LSR", ABX, 7, false, 3),
    unofficial(),
    // 0x60-0x6F
    op("RTS", IMP, 6, false, 1),
    op("ADC", IZX, 6, false, 2),
    unofficial(),
    unofficial(),
    unofficial(),
    op("ADC", ZP, 3, false, 2),
    op("ROR", ZP, 5, false, 2),
    unofficial(),
    op("PLA", IMP, 4, false, 1),
    op("ADC", IMM, 2, false, 2),
    op("ROR", ACC, 2, false, 1),
    unofficial(),
    op("JMP", IND, 5, false, 3),
    op("ADC", ABS, 4, false, 3),
    op("ROR", ABS, 6, false, 3),
    unofficial(),
    // 0x70-0x7F
    op("BVS", REL, 2, false, 2),
    op("ADC", IZY, 5, true, 2),
    unofficial(),
    unofficial(),
    unofficial(),
    op("ADC", ZPX, 4, false, 2),
    op("ROR", ZPX, 6, false, 2),
    unofficial(),
    op("SEI", IMP, 2, false, 1),
    op("ADC", ABY, 4, true, 3),
    unofficial(),
    unofficial(),
    unofficial(),
    op("ADC", ABX, 4, true, 3),
    op("ROR", ABX, 7, false, 3),
    unofficial(),
    // 0x80-0x8F
    unofficial(),
    op("STA", IZX, 6, false, 2),
    unofficial(),
    unofficial(),
    op("STY", ZP, 3, false, 2),
    op("STA", ZP, 3, false, 2),
    op("STX", ZP, 3, false, 2),
    unofficial(),
    op("DEY", IMP, 2, false, 1),
    unofficial(),
    op("TXA", IMP, 2, false, 1),
    unofficial(),
    op("STY", ABS, 4, false, 3),
    op("STA", ABS, 4, false, 3),
    op("STX", ABS, 4, false, 3),
    unofficial(),
    // 0x90-0x9F
    op("BCC", REL, 2, false, 2),
    op("STA", IZY, 6, false, 2),
    unofficial(),
    unofficial(),
    op("STY", ZPX, 4, false, 2),
    op("STA", ZPX, 4, false, 2),
    op("STX", ZPY, 4, false, 2),
    unofficial(),
    op("TYA", IMP, 2, false, 1),
    op("STA", ABY, 5, false, 3),
    op("TXS", IMP, 2, false, 1),
    unofficial(),
    unofficial(),
    op("STA", ABX, 5, false, 3),
    unofficial(),
    unofficial(),
    // 0xA0-0xAF
    op("LDY", IMM, 2, false, 2),
    op("LDA", IZX, 6, false, 2),
    op("LDX", IMM, 2, false, 2),
    unofficial(),
    op("LDY", ZP, 3, false, 2),
    op("LDA", ZP, 3, false, 2),
    op("LDX", ZP, 3, false, 2),
    unofficial(),
    op("TAY", IMP, 2, false, 1),
    op("LDA", IMM, 2, false, 2),
    op("TAX", IMP, 2, false, 1),
    unofficial(),
    op("LDY", ABS, 4, false, 3),
    op("LDA", ABS, 4, false, 3),
    op("LDX", ABS, 4, false, 3),
    unofficial(),
    // 0xB0-0xBF
    op("BCS", REL, 2, false, 2),
    op("LDA", IZY, 5, true, 2),
    unofficial(),
    unofficial(),
    op("LDY", ZPX, 4, false, 2),
    op("LDA", ZPX, 4, false, 2),
    op("LDX", ZPY, 4, false, 2),
    unofficial(),
    op("CLV", IMP, 2, false, 1),
    op("LDA", ABY, 4, true, 3),
    op("TSX", IMP, 2, false, 1),
    unofficial(),
    op("LDY", ABX, 4, true, 3),
    op("LDA", ABX, 4, true, 3),
    op("LDX", ABY, 4, true, 3),
    unofficial(),
    // 0xC0-0xCF
    op("CPY", IMM, 2, false, 2),
    op("CMP", IZX, 6, false, 2),
    unofficial(),
    unofficial(),
    op("CPY", ZP, 3, false, 2),
    op("CMP", ZP, 3, false, 2),
    op("DEC", ZP, 5, false, 2),
    unofficial(),
    op("INY", IMP, 2, false, 1),
    op("CMP", IMM, 2, false, 2),
    op("DEX", IMP, 2, false, 1),
    unofficial(),
    op("CPY", ABS, 4, false, 3),
    op("CMP", ABS, 4, false, 3),
    op("DEC", ABS, 6, false, 3),
    unofficial(),
    // 0xD0-0xDF
    op("BNE", REL, 2, false, 2),
    op("CMP", IZY, 5, true, 2),
    unofficial(),
    unofficial(),
    unofficial(),
    op("CMP", ZPX, 4, false, 2),
    op("DEC", ZPX, 6, false, 2),
    unofficial(),
    op("CLD", IMP, 2, false, 1),
    op("CMP", ABY, 4, true, 3),
    unofficial(),
    unofficial(),
    unofficial(),
    op("CMP", ABX, 4, true, 3),
    op("DEC", ABX, 7, false, 3),
    unofficial(),
    // 0xE0-0xEF
    op("CPX", IMM, 2, false, 2),
    op("SBC", IZX, 6, false, 2),
    unofficial(),
    unofficial(),
    op("CPX", ZP, 3, false, 2),
    op("SBC", ZP, 3, false, 2),
    op("INC", ZP, 5, false, 2),
    unofficial(),
    op("INX", IMP, 2, false, 1),
    op("SBC", IMM, 2, false, 2),
    op("NOP", IMP, 2, false, 1),
    unofficial(),
    op("CPX", ABS, 4, false, 3),
    op("SBC", ABS, 4, false, 3),
    op("INC", ABS, 6, false, 3),
    unofficial(),
    // 0xF0-0xFF
    op("BEQ", REL, 2, false, 2),
    op("SBC", IZY, 5, true, 2),
    unofficial(),
    unofficial(),
    unofficial(),
    op("SBC", ZPX, 4, false, 2),
    op("INC", ZPX, 6, false, 2),
    unofficial(),
    op("SED", IMP, 2, false, 1),
    op("SBC", ABY, 4, true, 3),
    unofficial(),
    unofficial(),
    unofficial(),
    op("SBC", ABX, 4, true, 3),
    op("INC", ABX, 7, false, 3),
    unofficial(),
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_has_256_entries() {
        assert_eq!(OPCODE_TABLE.len(), 256);
    }

    #[test]
    fn test_brk_entry() {
        let info = &OPCODE_TABLE[0x00];
        assert_eq!(info.mnemonic, "BRK");
        assert_eq!(info.cycles, 7);
        assert_eq!(info.bytes, 1);
    }

    #[test]
    fn test_lda_immediate_entry() {
        let info = &OPCODE_TABLE[0xA9];
        assert_eq!(info.mnemonic, "LDA");
        assert_eq!(info.mode, AddressingMode::Immediate);
        assert_eq!(info.cycles, 2);
        assert_eq!(info.bytes, 2);
    }

    #[test]
    fn test_lda_absolute_x_has_page_cycle() {
        let info = &OPCODE_TABLE[0xBD];
        assert_eq!(info.mnemonic, "LDA");
        assert!(info.page_cycle);
    }

    #[test]
    fn test_sta_absolute_x_has_no_page_cycle() {
        let info = &OPCODE_TABLE[0x9D];
        assert_eq!(info.mnemonic, "STA");
        assert_eq!(info.cycles, 5);
        assert!(!info.page_cycle);
    }

    #[test]
    fn test_jmp_indirect_entry() {
        let info = &OPCODE_TABLE[0x6C];
        assert_eq!(info.mnemonic, "JMP");
        assert_eq!(info.mode, AddressingMode::Indirect);
        assert_eq!(info.cycles, 5);
    }

    #[test]
    fn test_unofficial_opcode_behaves_as_nop() {
        let info = &OPCODE_TABLE[0x02];
        assert_eq!(info.mnemonic, "NOP");
        assert_eq!(info.cycles, 2);
        assert_eq!(info.bytes, 1);
    }

    #[test]
    fn test_nop_entry() {
        let info = &OPCODE_TABLE[0xEA];
        assert_eq!(info.mnemonic, "NOP");
        assert_eq!(info.mode, AddressingMode::Implied);
        assert_eq!(info.cycles, 2);
    }
}
