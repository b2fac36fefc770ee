use super::{Cpu, Flag};

/// The eight accumulator operations encoded in bits 3..5 of the
/// `0x80..=0xBF` block and of the `d8` immediate forms.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(super) enum AluOp {
    Add,
    Adc,
    Sub,
    Sbc,
    And,
    Xor,
    Or,
    Cp,
}

impl AluOp {
    #[inline]
    pub(super) fn from_bits(bits: u8) -> Self {
        match bits & 0x07 {
            0 => AluOp::Add,
            1 => AluOp::Adc,
            2 => AluOp::Sub,
            3 => AluOp::Sbc,
            4 => AluOp::And,
            5 => AluOp::Xor,
            6 => AluOp::Or,
            _ => AluOp::Cp,
        }
    }
}

/// Shift and rotate family shared by the CB table and the A-only rotates.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(super) enum ShiftOp {
    Rlc,
    Rrc,
    Rl,
    Rr,
    Sla,
    Sra,
    Swap,
    Srl,
}

impl ShiftOp {
    #[inline]
    pub(super) fn from_bits(bits: u8) -> Self {
        match bits & 0x07 {
            0 => ShiftOp::Rlc,
            1 => ShiftOp::Rrc,
            2 => ShiftOp::Rl,
            3 => ShiftOp::Rr,
            4 => ShiftOp::Sla,
            5 => ShiftOp::Sra,
            6 => ShiftOp::Swap,
            _ => ShiftOp::Srl,
        }
    }
}

impl Cpu {
    /// Apply an accumulator operation. CP only updates flags.
    pub(super) fn alu8(&mut self, op: AluOp, value: u8) {
        let a = self.regs.a;
        let carry_in = self.get_flag(Flag::C) as u8;

        match op {
            AluOp::Add | AluOp::Adc => {
                let carry = if op == AluOp::Adc { carry_in } else { 0 };
                let full = a as u16 + value as u16 + carry as u16;
                let result = full as u8;
                self.clear_flags();
                self.set_flag(Flag::Z, result == 0);
                self.set_flag(Flag::H, (a & 0x0F) + (value & 0x0F) + carry > 0x0F);
                self.set_flag(Flag::C, full > 0xFF);
                self.regs.a = result;
            }
            AluOp::Sub | AluOp::Sbc | AluOp::Cp => {
                let carry = if op == AluOp::Sbc { carry_in } else { 0 };
                let full = a as i16 - value as i16 - carry as i16;
                let result = full as u8;
                self.clear_flags();
                self.set_flag(Flag::Z, result == 0);
                self.set_flag(Flag::N, true);
                self.set_flag(Flag::H, ((a & 0x0F) as i16) - ((value & 0x0F) as i16) - (carry as i16) < 0);
                self.set_flag(Flag::C, full < 0);
                if op != AluOp::Cp {
                    self.regs.a = result;
                }
            }
            AluOp::And => {
                let result = a & value;
                self.clear_flags();
                self.set_flag(Flag::Z, result == 0);
                self.set_flag(Flag::H, true);
                self.regs.a = result;
            }
            AluOp::Xor | AluOp::Or => {
                let result = if op == AluOp::Xor { a ^ value } else { a | value };
                self.clear_flags();
                self.set_flag(Flag::Z, result == 0);
                self.regs.a = result;
            }
        }
    }

    /// Shift or rotate `value`, setting Z/C from the result and clearing N/H.
    pub(super) fn shift(&mut self, op: ShiftOp, value: u8) -> u8 {
        let carry_in = self.get_flag(Flag::C);
        let (result, carry_out) = match op {
            ShiftOp::Rlc => (value.rotate_left(1), value & 0x80 != 0),
            ShiftOp::Rrc => (value.rotate_right(1), value & 0x01 != 0),
            ShiftOp::Rl => ((value << 1) | carry_in as u8, value & 0x80 != 0),
            ShiftOp::Rr => ((value >> 1) | ((carry_in as u8) << 7), value & 0x01 != 0),
            ShiftOp::Sla => (value << 1, value & 0x80 != 0),
            ShiftOp::Sra => ((value >> 1) | (value & 0x80), value & 0x01 != 0),
            ShiftOp::Swap => (value.rotate_left(4), false),
            ShiftOp::Srl => (value >> 1, value & 0x01 != 0),
        };

        self.clear_flags();
        self.set_flag(Flag::Z, result == 0);
        self.set_flag(Flag::C, carry_out);
        result
    }

    /// Decimal adjust accumulator after BCD addition/subtraction.
    ///
    /// Updates A, Z, H, C; leaves N unchanged.
    pub(super) fn alu_daa(&mut self) {
        let mut a = self.regs.a;
        let mut adjust: u8 = if self.get_flag(Flag::C) { 0x60 } else { 0x00 };
        if self.get_flag(Flag::H) {
            adjust |= 0x06;
        }

        if self.get_flag(Flag::N) {
            a = a.wrapping_sub(adjust);
        } else {
            if a & 0x0F > 0x09 {
                adjust |= 0x06;
            }
            if a > 0x99 {
                adjust |= 0x60;
            }
            a = a.wrapping_add(adjust);
        }

        self.set_flag(Flag::C, adjust >= 0x60);
        self.set_flag(Flag::H, false);
        self.set_flag(Flag::Z, a == 0);
        self.regs.a = a;
    }

    /// INC r / INC (HL). Carry is preserved.
    #[inline]
    pub(super) fn alu_inc8(&mut self, value: u8) -> u8 {
        let result = value.wrapping_add(1);
        self.set_flag(Flag::Z, result == 0);
        self.set_flag(Flag::N, false);
        self.set_flag(Flag::H, value & 0x0F == 0x0F);
        result
    }

    /// DEC r / DEC (HL). Carry is preserved.
    #[inline]
    pub(super) fn alu_dec8(&mut self, value: u8) -> u8 {
        let result = value.wrapping_sub(1);
        self.set_flag(Flag::Z, result == 0);
        self.set_flag(Flag::N, true);
        self.set_flag(Flag::H, value & 0x0F == 0);
        result
    }

    /// `ADD HL,rr`: Z untouched, H from bit 11, C from bit 15.
    #[inline]
    pub(super) fn alu_add16_hl(&mut self, value: u16) {
        let hl = self.regs.hl();
        self.set_flag(Flag::N, false);
        self.set_flag(Flag::H, (hl & 0x0FFF) + (value & 0x0FFF) > 0x0FFF);
        self.set_flag(Flag::C, hl as u32 + value as u32 > 0xFFFF);
        self.regs.set_hl(hl.wrapping_add(value));
    }

    /// `SP + r8` as used by `ADD SP,r8` and `LD HL,SP+r8`.
    ///
    /// Z and N are cleared; H and C come from the unsigned low-byte add.
    #[inline]
    pub(super) fn alu_add16_signed(&mut self, base: u16, imm8: u8) -> u16 {
        let offset = imm8 as i8 as i16 as u16;
        self.clear_flags();
        self.set_flag(Flag::H, (base & 0x000F) + (offset & 0x000F) > 0x000F);
        self.set_flag(Flag::C, (base & 0x00FF) + (offset & 0x00FF) > 0x00FF);
        base.wrapping_add(offset)
    }
}
