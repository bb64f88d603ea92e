/// One decoded CHIP-8 instruction. Register operands are indices 0x0-0xF,
/// addresses are the low 12 bits of the word.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Instruction {
    /// 00E0 - clear the screen
    Cls,
    /// 00EE - return from subroutine
    Ret,
    /// 1NNN - jump to NNN
    Jump(u16),
    /// 2NNN - call subroutine at NNN
    Call(u16),
    /// 3XKK - skip next if VX == KK
    SkipEqByte(u8, u8),
    /// 4XKK - skip next if VX != KK
    SkipNeByte(u8, u8),
    /// 5XY0 - skip next if VX == VY
    SkipEqReg(u8, u8),
    /// 6XKK - VX = KK
    LoadByte(u8, u8),
    /// 7XKK - VX += KK, no flag
    AddByte(u8, u8),
    /// 8XY0 - VX = VY
    LoadReg(u8, u8),
    /// 8XY1 - VX |= VY
    Or(u8, u8),
    /// 8XY2 - VX &= VY
    And(u8, u8),
    /// 8XY3 - VX ^= VY
    Xor(u8, u8),
    /// 8XY4 - VX += VY, VF = carry
    AddReg(u8, u8),
    /// 8XY5 - VX -= VY, VF = VX > VY
    Sub(u8, u8),
    /// 8XY6 - VX >>= 1, VF = old LSB
    Shr(u8, u8),
    /// 8XY7 - VX = VY - VX, VF = VY > VX
    SubN(u8, u8),
    /// 8XYE - VX <<= 1, VF = old MSB
    Shl(u8, u8),
    /// 9XY0 - skip next if VX != VY
    SkipNeReg(u8, u8),
    /// ANNN - I = NNN
    LoadI(u16),
    /// BNNN - jump to NNN + V0
    JumpV0(u16),
    /// CXKK - VX = random & KK
    Random(u8, u8),
    /// DXYN - draw N rows from [I] at (VX, VY), VF = collision
    Draw(u8, u8, u8),
    /// EX9E - skip next if key VX is down
    SkipKey(u8),
    /// EXA1 - skip next if key VX is up
    SkipNotKey(u8),
    /// FX07 - VX = delay timer
    LoadDelay(u8),
    /// FX0A - wait for a key, VX = key
    WaitKey(u8),
    /// FX15 - delay timer = VX
    SetDelay(u8),
    /// FX18 - sound timer = VX
    SetSound(u8),
    /// FX1E - I += VX
    AddI(u8),
    /// FX29 - I = glyph for hex digit VX
    LoadFont(u8),
    /// FX33 - BCD of VX into [I], [I+1], [I+2]
    StoreBcd(u8),
    /// FX55 - V0..=VX into [I..]
    StoreRegs(u8),
    /// FX65 - [I..] into V0..=VX
    LoadRegs(u8),
}

impl Instruction {
    /// decode a big-endian instruction word; None if it isn't an instruction
    pub fn decode(word: u16) -> Option<Instruction> {
        use Instruction::*;

        let addr = word & 0x0FFF;
        let x = ((word >> 8) & 0xF) as u8;
        let y = ((word >> 4) & 0xF) as u8;
        let kk = (word & 0xFF) as u8;
        let n = (word & 0xF) as u8;

        let instruction = match (word >> 12, x, y, n) {
            (0x0, 0x0, 0xE, 0x0) => Cls,
            (0x0, 0x0, 0xE, 0xE) => Ret,
            (0x1, _, _, _) => Jump(addr),
            (0x2, _, _, _) => Call(addr),
            (0x3, _, _, _) => SkipEqByte(x, kk),
            (0x4, _, _, _) => SkipNeByte(x, kk),
            (0x5, _, _, 0x0) => SkipEqReg(x, y),
            (0x6, _, _, _) => LoadByte(x, kk),
            (0x7, _, _, _) => AddByte(x, kk),
            (0x8, _, _, 0x0) => LoadReg(x, y),
            (0x8, _, _, 0x1) => Or(x, y),
            (0x8, _, _, 0x2) => And(x, y),
            (0x8, _, _, 0x3) => Xor(x, y),
            (0x8, _, _, 0x4) => AddReg(x, y),
            (0x8, _, _, 0x5) => Sub(x, y),
            (0x8, _, _, 0x6) => Shr(x, y),
            (0x8, _, _, 0x7) => SubN(x, y),
            (0x8, _, _, 0xE) => Shl(x, y),
            (0x9, _, _, 0x0) => SkipNeReg(x, y),
            (0xA, _, _, _) => LoadI(addr),
            (0xB, _, _, _) => JumpV0(addr),
            (0xC, _, _, _) => Random(x, kk),
            (0xD, _, _, _) => Draw(x, y, n),
            (0xE, _, 0x9, 0xE) => SkipKey(x),
            (0xE, _, 0xA, 0x1) => SkipNotKey(x),
            (0xF, _, 0x0, 0x7) => LoadDelay(x),
            (0xF, _, 0x0, 0xA) => WaitKey(x),
            (0xF, _, 0x1, 0x5) => SetDelay(x),
            (0xF, _, 0x1, 0x8) => SetSound(x),
            (0xF, _, 0x1, 0xE) => AddI(x),
            (0xF, _, 0x2, 0x9) => LoadFont(x),
            (0xF, _, 0x3, 0x3) => StoreBcd(x),
            (0xF, _, 0x5, 0x5) => StoreRegs(x),
            (0xF, _, 0x6, 0x5) => LoadRegs(x),
            _ => return None,
        };
        Some(instruction)
    }
}

#[cfg(test)]
mod tests {
    use super::Instruction::*;
    use super::*;

    #[test]
    fn test_decode_fields() {
        assert_eq!(Instruction::decode(0x1234), Some(Jump(0x234)));
        assert_eq!(Instruction::decode(0x6a2f), Some(LoadByte(0xa, 0x2f)));
        assert_eq!(Instruction::decode(0x8bc4), Some(AddReg(0xb, 0xc)));
        assert_eq!(Instruction::decode(0xd12f), Some(Draw(1, 2, 0xf)));
        assert_eq!(Instruction::decode(0xf355), Some(StoreRegs(3)));
    }

    #[test]
    fn test_decode_every_family() {
        let cases = [
            (0x00e0, Cls),
            (0x00ee, Ret),
            (0x2abc, Call(0xabc)),
            (0x3101, SkipEqByte(1, 1)),
            (0x4101, SkipNeByte(1, 1)),
            (0x5120, SkipEqReg(1, 2)),
            (0x7101, AddByte(1, 1)),
            (0x8120, LoadReg(1, 2)),
            (0x8121, Or(1, 2)),
            (0x8122, And(1, 2)),
            (0x8123, Xor(1, 2)),
            (0x8125, Sub(1, 2)),
            (0x8126, Shr(1, 2)),
            (0x8127, SubN(1, 2)),
            (0x812e, Shl(1, 2)),
            (0x9120, SkipNeReg(1, 2)),
            (0xa123, LoadI(0x123)),
            (0xb123, JumpV0(0x123)),
            (0xc10f, Random(1, 0x0f)),
            (0xe19e, SkipKey(1)),
            (0xe1a1, SkipNotKey(1)),
            (0xf107, LoadDelay(1)),
            (0xf10a, WaitKey(1)),
            (0xf115, SetDelay(1)),
            (0xf118, SetSound(1)),
            (0xf11e, AddI(1)),
            (0xf129, LoadFont(1)),
            (0xf133, StoreBcd(1)),
            (0xf165, LoadRegs(1)),
        ];
        for (word, expected) in cases {
            assert_eq!(Instruction::decode(word), Some(expected), "{:04x}", word);
        }
    }

    #[test]
    fn test_decode_unknown() {
        for word in [
            0x0000, 0x0123, 0x00e1, 0x5121, 0x8128, 0x812f, 0x9121, 0xe19f, 0xf100, 0xf1ff,
            0xffff,
        ] {
            assert_eq!(Instruction::decode(word), None, "{:04x}", word);
        }
    }
}
