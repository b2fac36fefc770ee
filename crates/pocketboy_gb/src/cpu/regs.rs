/// Register file of the LR35902.
///
/// Each 8-bit register wraps on increment and decrement. The pairs AF, BC,
/// DE and HL are composed from their halves (high byte first) and can be
/// read or written either as 16-bit values or through the individual bytes.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct Registers {
    pub a: u8,
    pub f: u8,
    pub b: u8,
    pub c: u8,
    pub d: u8,
    pub e: u8,
    pub h: u8,
    pub l: u8,
    pub sp: u16,
    pub pc: u16,
}

/// Selector for the 16-bit registers.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Reg16 {
    AF,
    BC,
    DE,
    HL,
    SP,
    PC,
}

impl Registers {
    #[inline]
    pub fn af(&self) -> u16 {
        u16::from_be_bytes([self.a, self.f & 0xF0])
    }

    #[inline]
    pub fn set_af(&mut self, value: u16) {
        let [a, f] = value.to_be_bytes();
        self.a = a;
        // Lower 4 bits of F are always zero.
        self.f = f & 0xF0;
    }

    #[inline]
    pub fn bc(&self) -> u16 {
        u16::from_be_bytes([self.b, self.c])
    }

    #[inline]
    pub fn set_bc(&mut self, value: u16) {
        [self.b, self.c] = value.to_be_bytes();
    }

    #[inline]
    pub fn de(&self) -> u16 {
        u16::from_be_bytes([self.d, self.e])
    }

    #[inline]
    pub fn set_de(&mut self, value: u16) {
        [self.d, self.e] = value.to_be_bytes();
    }

    #[inline]
    pub fn hl(&self) -> u16 {
        u16::from_be_bytes([self.h, self.l])
    }

    #[inline]
    pub fn set_hl(&mut self, value: u16) {
        [self.h, self.l] = value.to_be_bytes();
    }

    pub fn get16(&self, reg: Reg16) -> u16 {
        match reg {
            Reg16::AF => self.af(),
            Reg16::BC => self.bc(),
            Reg16::DE => self.de(),
            Reg16::HL => self.hl(),
            Reg16::SP => self.sp,
            Reg16::PC => self.pc,
        }
    }

    pub fn set16(&mut self, reg: Reg16, value: u16) {
        match reg {
            Reg16::AF => self.set_af(value),
            Reg16::BC => self.set_bc(value),
            Reg16::DE => self.set_de(value),
            Reg16::HL => self.set_hl(value),
            Reg16::SP => self.sp = value,
            Reg16::PC => self.pc = value,
        }
    }

    pub fn high(&self, reg: Reg16) -> u8 {
        self.get16(reg).to_be_bytes()[0]
    }

    pub fn low(&self, reg: Reg16) -> u8 {
        self.get16(reg).to_be_bytes()[1]
    }

    pub fn set_high(&mut self, reg: Reg16, value: u8) {
        let low = self.low(reg);
        self.set16(reg, u16::from_be_bytes([value, low]));
    }

    pub fn set_low(&mut self, reg: Reg16, value: u8) {
        let high = self.high(reg);
        self.set16(reg, u16::from_be_bytes([high, value]));
    }

    /// Wrapping 16-bit increment; returns the new value.
    pub fn increment16(&mut self, reg: Reg16) -> u16 {
        let value = self.get16(reg).wrapping_add(1);
        self.set16(reg, value);
        value
    }

    /// Wrapping 16-bit decrement; returns the new value.
    pub fn decrement16(&mut self, reg: Reg16) -> u16 {
        let value = self.get16(reg).wrapping_sub(1);
        self.set16(reg, value);
        value
    }
}

/// Flag bits in the F register.
///
/// Layout (bit index in the byte, from MSB to LSB):
/// - bit 7: Z (zero)
/// - bit 6: N (subtract)
/// - bit 5: H (half carry)
/// - bit 4: C (carry)
/// - bits 0–3 are always zero.
#[derive(Clone, Copy, Debug)]
pub enum Flag {
    Z = 7,
    N = 6,
    H = 5,
    C = 4,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pairs_compose_from_halves() {
        let mut regs = Registers::default();
        regs.set16(Reg16::BC, 0x1234);
        assert_eq!(regs.b, 0x12);
        assert_eq!(regs.c, 0x34);

        regs.set_low(Reg16::HL, 0xCD);
        regs.set_high(Reg16::HL, 0xAB);
        assert_eq!(regs.hl(), 0xABCD);
        assert_eq!(regs.high(Reg16::HL), 0xAB);
        assert_eq!(regs.low(Reg16::HL), 0xCD);
    }

    #[test]
    fn f_low_nibble_always_reads_zero() {
        let mut regs = Registers::default();
        regs.set_af(0x12FF);
        assert_eq!(regs.f, 0xF0);
        assert_eq!(regs.af(), 0x12F0);
    }

    #[test]
    fn sixteen_bit_increment_and_decrement_wrap() {
        let mut regs = Registers::default();
        regs.set16(Reg16::DE, 0xFFFF);
        assert_eq!(regs.increment16(Reg16::DE), 0x0000);
        assert_eq!(regs.decrement16(Reg16::DE), 0xFFFF);

        regs.sp = 0x0000;
        assert_eq!(regs.decrement16(Reg16::SP), 0xFFFF);
    }
}
