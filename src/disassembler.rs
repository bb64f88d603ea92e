//! Turns instruction words into assembly text, for tracing and dumps.
//! Nothing in here touches machine state.

use crate::instruction::Instruction;
use std::fmt;

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use Instruction::*;
        match *self {
            Cls => write!(f, "CLS"),
            Ret => write!(f, "RET"),
            Jump(a) => write!(f, "JP {:03X}", a),
            Call(a) => write!(f, "CALL {:03X}", a),
            SkipEqByte(x, kk) => write!(f, "SE V{:X}, {:02X}", x, kk),
            SkipNeByte(x, kk) => write!(f, "SNE V{:X}, {:02X}", x, kk),
            SkipEqReg(x, y) => write!(f, "SE V{:X}, V{:X}", x, y),
            LoadByte(x, kk) => write!(f, "LD V{:X}, {:02X}", x, kk),
            AddByte(x, kk) => write!(f, "ADD V{:X}, {:02X}", x, kk),
            LoadReg(x, y) => write!(f, "LD V{:X}, V{:X}", x, y),
            Or(x, y) => write!(f, "OR V{:X}, V{:X}", x, y),
            And(x, y) => write!(f, "AND V{:X}, V{:X}", x, y),
            Xor(x, y) => write!(f, "XOR V{:X}, V{:X}", x, y),
            AddReg(x, y) => write!(f, "ADD V{:X}, V{:X}", x, y),
            Sub(x, y) => write!(f, "SUB V{:X}, V{:X}", x, y),
            Shr(x, y) => write!(f, "SHR V{:X}, V{:X}", x, y),
            SubN(x, y) => write!(f, "SUBN V{:X}, V{:X}", x, y),
            Shl(x, y) => write!(f, "SHL V{:X}, V{:X}", x, y),
            SkipNeReg(x, y) => write!(f, "SNE V{:X}, V{:X}", x, y),
            LoadI(a) => write!(f, "LD I, {:03X}", a),
            JumpV0(a) => write!(f, "JP V0, {:03X}", a),
            Random(x, kk) => write!(f, "RND V{:X}, {:02X}", x, kk),
            Draw(x, y, n) => write!(f, "DRW V{:X}, V{:X}, {:X}", x, y, n),
            SkipKey(x) => write!(f, "SKP V{:X}", x),
            SkipNotKey(x) => write!(f, "SKNP V{:X}", x),
            LoadDelay(x) => write!(f, "LD V{:X}, DT", x),
            WaitKey(x) => write!(f, "LD V{:X}, K", x),
            SetDelay(x) => write!(f, "LD DT, V{:X}", x),
            SetSound(x) => write!(f, "LD ST, V{:X}", x),
            AddI(x) => write!(f, "ADD I, V{:X}", x),
            LoadFont(x) => write!(f, "LD F, V{:X}", x),
            StoreBcd(x) => write!(f, "LD B, V{:X}", x),
            StoreRegs(x) => write!(f, "LD [I], V{:X}", x),
            LoadRegs(x) => write!(f, "LD V{:X}, [I]", x),
        }
    }
}

/// mnemonic for a single word; anything undecodable comes out as a data word
pub fn format_word(word: u16) -> String {
    match Instruction::decode(word) {
        Some(instruction) => instruction.to_string(),
        None => format!(".word {:04X}", word),
    }
}

/// one listing line per word, starting at `start`; a trailing odd byte is
/// shown as a data byte
pub fn disassemble(bytes: &[u8], start: u16) -> Vec<String> {
    let mut lines = Vec::with_capacity(bytes.len() / 2 + 1);
    let mut addr = start;
    for chunk in bytes.chunks(2) {
        let line = match chunk {
            &[hi, lo] => {
                let word = u16::from_be_bytes([hi, lo]);
                format!("{:03X}: {:04X}  {}", addr, word, format_word(word))
            }
            &[b] => format!("{:03X}: {:02X}    .byte {:02X}", addr, b, b),
            _ => unreachable!(),
        };
        lines.push(line);
        addr = addr.wrapping_add(2);
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_word() {
        assert_eq!(format_word(0x00e0), "CLS");
        assert_eq!(format_word(0x00ee), "RET");
        assert_eq!(format_word(0x1a2b), "JP A2B");
        assert_eq!(format_word(0x6a2f), "LD VA, 2F");
        assert_eq!(format_word(0x8bce), "SHL VB, VC");
        assert_eq!(format_word(0xb300), "JP V0, 300");
        assert_eq!(format_word(0xd125), "DRW V1, V2, 5");
        assert_eq!(format_word(0xf00a), "LD V0, K");
        assert_eq!(format_word(0xf429), "LD F, V4");
        assert_eq!(format_word(0xf555), "LD [I], V5");
        assert_eq!(format_word(0xf565), "LD V5, [I]");
    }

    #[test]
    fn test_format_unknown() {
        assert_eq!(format_word(0x0000), ".word 0000");
        assert_eq!(format_word(0xffff), ".word FFFF");
    }

    #[test]
    fn test_disassemble_listing() {
        let lines = disassemble(&[0x60, 0x05, 0x70, 0x01, 0x12, 0x00, 0xab], 0x200);
        assert_eq!(
            lines,
            vec![
                "200: 6005  LD V0, 05",
                "202: 7001  ADD V0, 01",
                "204: 1200  JP 200",
                "206: AB    .byte AB",
            ]
        );
    }
}
