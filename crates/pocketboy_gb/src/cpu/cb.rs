use super::alu::ShiftOp;
use super::{Bus, Cpu, Flag};

impl Cpu {
    /// Execute a CB-prefixed opcode (rotates, shifts, BIT, RES, SET).
    ///
    /// Every CB opcode has a fixed cost, so nothing is reported back.
    pub(super) fn exec_cb<B: Bus>(&mut self, bus: &mut B, cb: u8) {
        let y = (cb >> 3) & 0x07;
        let z = cb & 0x07;
        let value = self.read_reg8(bus, z);

        match cb >> 6 {
            0 => {
                let result = self.shift(ShiftOp::from_bits(y), value);
                self.write_reg8(bus, z, result);
            }
            1 => {
                // BIT b,r: C is preserved.
                self.set_flag(Flag::Z, value & (1 << y) == 0);
                self.set_flag(Flag::N, false);
                self.set_flag(Flag::H, true);
            }
            2 => self.write_reg8(bus, z, value & !(1 << y)),
            _ => self.write_reg8(bus, z, value | (1 << y)),
        }
    }
}
