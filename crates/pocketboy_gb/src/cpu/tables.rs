//! Static per-opcode data: cycle costs and mnemonics.

use std::borrow::Cow;

/// Cycle cost of every primary opcode when no branch is taken.
///
/// `0xCB` is 0 here; the CB table carries the full cost of the pair.
/// The opcode holes cost 4, like a NOP.
#[rustfmt::skip]
const BASE_CYCLES: [u8; 256] = [
//  x0  x1  x2  x3  x4  x5  x6  x7  x8  x9  xA  xB  xC  xD  xE  xF
     4, 12,  8,  8,  4,  4,  8,  4, 20,  8,  8,  8,  4,  4,  8,  4, // 0x
     4, 12,  8,  8,  4,  4,  8,  4, 12,  8,  8,  8,  4,  4,  8,  4, // 1x
     8, 12,  8,  8,  4,  4,  8,  4,  8,  8,  8,  8,  4,  4,  8,  4, // 2x
     8, 12,  8,  8, 12, 12, 12,  4,  8,  8,  8,  8,  4,  4,  8,  4, // 3x
     4,  4,  4,  4,  4,  4,  8,  4,  4,  4,  4,  4,  4,  4,  8,  4, // 4x
     4,  4,  4,  4,  4,  4,  8,  4,  4,  4,  4,  4,  4,  4,  8,  4, // 5x
     4,  4,  4,  4,  4,  4,  8,  4,  4,  4,  4,  4,  4,  4,  8,  4, // 6x
     8,  8,  8,  8,  8,  8,  4,  8,  4,  4,  4,  4,  4,  4,  8,  4, // 7x
     4,  4,  4,  4,  4,  4,  8,  4,  4,  4,  4,  4,  4,  4,  8,  4, // 8x
     4,  4,  4,  4,  4,  4,  8,  4,  4,  4,  4,  4,  4,  4,  8,  4, // 9x
     4,  4,  4,  4,  4,  4,  8,  4,  4,  4,  4,  4,  4,  4,  8,  4, // Ax
     4,  4,  4,  4,  4,  4,  8,  4,  4,  4,  4,  4,  4,  4,  8,  4, // Bx
     8, 12, 12, 16, 12, 16,  8, 16,  8, 16, 12,  0, 12, 24,  8, 16, // Cx
     8, 12, 12,  4, 12, 16,  8, 16,  8, 16, 12,  4, 12,  4,  8, 16, // Dx
    12, 12,  8,  4,  4, 16,  8, 16, 16,  4, 16,  4,  4,  4,  8, 16, // Ex
    12, 12,  8,  4,  4, 16,  8, 16, 12,  8, 16,  4,  4,  4,  8, 16, // Fx
];

pub(super) static OPCODE_CYCLES: [u8; 256] = BASE_CYCLES;

/// Cycle cost of every primary opcode when its conditional branch is taken.
/// Only JR cc, JP cc, CALL cc and RET cc differ from [`OPCODE_CYCLES`].
pub(super) static OPCODE_BRANCH_CYCLES: [u8; 256] = branch_cycles();

/// Cycle cost of every CB-prefixed opcode, prefix included.
pub(super) static CB_CYCLES: [u8; 256] = cb_cycles();

const fn branch_cycles() -> [u8; 256] {
    let mut table = BASE_CYCLES;
    let mut cc = 0;
    while cc < 4 {
        let y = cc << 3;
        table[0x20 | y] = 12; // JR cc
        table[0xC0 | y] = 20; // RET cc
        table[0xC2 | y] = 16; // JP cc
        table[0xC4 | y] = 24; // CALL cc
        cc += 1;
    }
    table
}

const fn cb_cycles() -> [u8; 256] {
    let mut table = [8u8; 256];
    let mut op = 0;
    while op < 256 {
        if op & 0x07 == 6 {
            // BIT b,(HL) only reads memory.
            table[op] = if op >> 6 == 1 { 12 } else { 16 };
        }
        op += 1;
    }
    table
}

#[rustfmt::skip]
static MNEMONICS: [&str; 256] = [
    // 0x00
    "NOP", "LD BC,d16", "LD (BC),A", "INC BC", "INC B", "DEC B", "LD B,d8", "RLCA",
    "LD (a16),SP", "ADD HL,BC", "LD A,(BC)", "DEC BC", "INC C", "DEC C", "LD C,d8", "RRCA",
    // 0x10
    "STOP", "LD DE,d16", "LD (DE),A", "INC DE", "INC D", "DEC D", "LD D,d8", "RLA",
    "JR r8", "ADD HL,DE", "LD A,(DE)", "DEC DE", "INC E", "DEC E", "LD E,d8", "RRA",
    // 0x20
    "JR NZ,r8", "LD HL,d16", "LD (HL+),A", "INC HL", "INC H", "DEC H", "LD H,d8", "DAA",
    "JR Z,r8", "ADD HL,HL", "LD A,(HL+)", "DEC HL", "INC L", "DEC L", "LD L,d8", "CPL",
    // 0x30
    "JR NC,r8", "LD SP,d16", "LD (HL-),A", "INC SP", "INC (HL)", "DEC (HL)", "LD (HL),d8", "SCF",
    "JR C,r8", "ADD HL,SP", "LD A,(HL-)", "DEC SP", "INC A", "DEC A", "LD A,d8", "CCF",
    // 0x40
    "LD B,B", "LD B,C", "LD B,D", "LD B,E", "LD B,H", "LD B,L", "LD B,(HL)", "LD B,A",
    "LD C,B", "LD C,C", "LD C,D", "LD C,E", "LD C,H", "LD C,L", "LD C,(HL)", "LD C,A",
    // 0x50
    "LD D,B", "LD D,C", "LD D,D", "LD D,E", "LD D,H", "LD D,L", "LD D,(HL)", "LD D,A",
    "LD E,B", "LD E,C", "LD E,D", "LD E,E", "LD E,H", "LD E,L", "LD E,(HL)", "LD E,A",
    // 0x60
    "LD H,B", "LD H,C", "LD H,D", "LD H,E", "LD H,H", "LD H,L", "LD H,(HL)", "LD H,A",
    "LD L,B", "LD L,C", "LD L,D", "LD L,E", "LD L,H", "LD L,L", "LD L,(HL)", "LD L,A",
    // 0x70
    "LD (HL),B", "LD (HL),C", "LD (HL),D", "LD (HL),E", "LD (HL),H", "LD (HL),L", "HALT", "LD (HL),A",
    "LD A,B", "LD A,C", "LD A,D", "LD A,E", "LD A,H", "LD A,L", "LD A,(HL)", "LD A,A",
    // 0x80
    "ADD A,B", "ADD A,C", "ADD A,D", "ADD A,E", "ADD A,H", "ADD A,L", "ADD A,(HL)", "ADD A,A",
    "ADC A,B", "ADC A,C", "ADC A,D", "ADC A,E", "ADC A,H", "ADC A,L", "ADC A,(HL)", "ADC A,A",
    // 0x90
    "SUB B", "SUB C", "SUB D", "SUB E", "SUB H", "SUB L", "SUB (HL)", "SUB A",
    "SBC A,B", "SBC A,C", "SBC A,D", "SBC A,E", "SBC A,H", "SBC A,L", "SBC A,(HL)", "SBC A,A",
    // 0xA0
    "AND B", "AND C", "AND D", "AND E", "AND H", "AND L", "AND (HL)", "AND A",
    "XOR B", "XOR C", "XOR D", "XOR E", "XOR H", "XOR L", "XOR (HL)", "XOR A",
    // 0xB0
    "OR B", "OR C", "OR D", "OR E", "OR H", "OR L", "OR (HL)", "OR A",
    "CP B", "CP C", "CP D", "CP E", "CP H", "CP L", "CP (HL)", "CP A",
    // 0xC0
    "RET NZ", "POP BC", "JP NZ,a16", "JP a16", "CALL NZ,a16", "PUSH BC", "ADD A,d8", "RST 00H",
    "RET Z", "RET", "JP Z,a16", "PREFIX CB", "CALL Z,a16", "CALL a16", "ADC A,d8", "RST 08H",
    // 0xD0
    "RET NC", "POP DE", "JP NC,a16", "ILLEGAL_D3", "CALL NC,a16", "PUSH DE", "SUB d8", "RST 10H",
    "RET C", "RETI", "JP C,a16", "ILLEGAL_DB", "CALL C,a16", "ILLEGAL_DD", "SBC A,d8", "RST 18H",
    // 0xE0
    "LDH (a8),A", "POP HL", "LD (C),A", "ILLEGAL_E3", "ILLEGAL_E4", "PUSH HL", "AND d8", "RST 20H",
    "ADD SP,r8", "JP (HL)", "LD (a16),A", "ILLEGAL_EB", "ILLEGAL_EC", "ILLEGAL_ED", "XOR d8", "RST 28H",
    // 0xF0
    "LDH A,(a8)", "POP AF", "LD A,(C)", "DI", "ILLEGAL_F4", "PUSH AF", "OR d8", "RST 30H",
    "LD HL,SP+r8", "LD SP,HL", "LD A,(a16)", "EI", "ILLEGAL_FC", "ILLEGAL_FD", "CP d8", "RST 38H",
];

const CB_OPERANDS: [&str; 8] = ["B", "C", "D", "E", "H", "L", "(HL)", "A"];
const CB_SHIFTS: [&str; 8] = ["RLC", "RRC", "RL", "RR", "SLA", "SRA", "SWAP", "SRL"];

/// Mnemonic for an opcode; pass the second byte for CB-prefixed opcodes.
pub fn mnemonic(opcode: u8, cb: Option<u8>) -> Cow<'static, str> {
    match (opcode, cb) {
        (0xCB, Some(cb)) => {
            let operand = CB_OPERANDS[(cb & 0x07) as usize];
            let bit = (cb >> 3) & 0x07;
            match cb >> 6 {
                0 => Cow::Owned(format!("{} {}", CB_SHIFTS[bit as usize], operand)),
                1 => Cow::Owned(format!("BIT {},{}", bit, operand)),
                2 => Cow::Owned(format!("RES {},{}", bit, operand)),
                _ => Cow::Owned(format!("SET {},{}", bit, operand)),
            }
        }
        _ => Cow::Borrowed(MNEMONICS[opcode as usize]),
    }
}

/// Byte length of a primary opcode including its operands.
fn instruction_len(opcode: u8) -> usize {
    let name = MNEMONICS[opcode as usize];
    if opcode == 0xCB || opcode == 0x10 || name.contains("d8") || name.contains("a8") || name.contains("r8") {
        2
    } else if name.contains("d16") || name.contains("a16") {
        3
    } else {
        1
    }
}

/// Disassemble the instruction at the start of `bytes`.
///
/// Returns the text and the instruction length, or `None` if `bytes` is too
/// short to hold the whole instruction.
pub fn disassemble(bytes: &[u8]) -> Option<(String, usize)> {
    let opcode = *bytes.first()?;
    let len = instruction_len(opcode);
    let operands = bytes.get(1..len)?;

    let text = match (opcode, operands) {
        (0xCB, [cb]) => mnemonic(opcode, Some(*cb)).into_owned(),
        (_, [lo, hi]) => {
            let value = u16::from_le_bytes([*lo, *hi]);
            let name = MNEMONICS[opcode as usize];
            name.replace("d16", &format!("${value:04X}"))
                .replace("a16", &format!("${value:04X}"))
        }
        (0x10, [_]) => "STOP".to_string(),
        (_, [value]) => {
            let name = MNEMONICS[opcode as usize];
            if name.contains("r8") {
                name.replace("+r8", "r8")
                    .replace("r8", &format!("{:+}", *value as i8))
            } else {
                name.replace("d8", &format!("${value:02X}"))
                    .replace("a8", &format!("$FF{value:02X}"))
            }
        }
        _ => MNEMONICS[opcode as usize].to_string(),
    };

    Some((text, len))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn branch_table_only_differs_for_conditionals() {
        let differing: Vec<usize> = (0..256)
            .filter(|&op| OPCODE_CYCLES[op] != OPCODE_BRANCH_CYCLES[op])
            .collect();
        assert_eq!(
            differing,
            vec![0x20, 0x28, 0x30, 0x38, 0xC0, 0xC2, 0xC4, 0xC8, 0xCA, 0xCC, 0xD0, 0xD2, 0xD4, 0xD8, 0xDA, 0xDC]
        );
        assert_eq!(OPCODE_BRANCH_CYCLES[0xC4], 24);
        assert_eq!(OPCODE_CYCLES[0xC4], 12);
    }

    #[test]
    fn cb_costs() {
        assert_eq!(CB_CYCLES[0x00], 8); // RLC B
        assert_eq!(CB_CYCLES[0x06], 16); // RLC (HL)
        assert_eq!(CB_CYCLES[0x46], 12); // BIT 0,(HL)
        assert_eq!(CB_CYCLES[0xFE], 16); // SET 7,(HL)
    }

    #[test]
    fn disassembles_operands() {
        assert_eq!(disassemble(&[0x3E, 0x42]), Some(("LD A,$42".to_string(), 2)));
        assert_eq!(disassemble(&[0xC3, 0x50, 0x01]), Some(("JP $0150".to_string(), 3)));
        assert_eq!(disassemble(&[0x18, 0xFE]), Some(("JR -2".to_string(), 2)));
        assert_eq!(disassemble(&[0xE0, 0x40]), Some(("LDH ($FF40),A".to_string(), 2)));
        assert_eq!(disassemble(&[0xCB, 0x7C]), Some(("BIT 7,H".to_string(), 2)));
        assert_eq!(disassemble(&[0x01, 0x00]), None);
        assert_eq!(mnemonic(0xD3, None), "ILLEGAL_D3");
    }
}
