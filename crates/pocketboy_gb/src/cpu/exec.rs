mod alu;
mod control;
mod incdec;
mod ld;
mod stack;
mod system;

use super::{Bus, Cpu};

impl Cpu {
    /// Decode and execute one primary opcode.
    ///
    /// Returns `true` when a conditional branch was taken, which selects the
    /// longer of the opcode's two cycle costs.
    pub(super) fn exec_opcode<B: Bus>(&mut self, bus: &mut B, opcode: u8) -> bool {
        match opcode {
            0x00 => {}

            0x01 | 0x11 | 0x21 | 0x31 => self.exec_ld_rr_d16(bus, opcode),
            0x02 | 0x12 | 0x22 | 0x32 => self.exec_ld_indirect_a(bus, opcode),
            0x0A | 0x1A | 0x2A | 0x3A => self.exec_ld_a_indirect(bus, opcode),
            0x06 | 0x0E | 0x16 | 0x1E | 0x26 | 0x2E | 0x36 | 0x3E => self.exec_ld_r_d8(bus, opcode),
            0x08 => self.exec_ld_a16_sp(bus),

            0x03 | 0x13 | 0x23 | 0x33 => self.exec_inc16(opcode),
            0x0B | 0x1B | 0x2B | 0x3B => self.exec_dec16(opcode),
            0x04 | 0x0C | 0x14 | 0x1C | 0x24 | 0x2C | 0x34 | 0x3C => self.exec_inc8(bus, opcode),
            0x05 | 0x0D | 0x15 | 0x1D | 0x25 | 0x2D | 0x35 | 0x3D => self.exec_dec8(bus, opcode),
            0x09 | 0x19 | 0x29 | 0x39 => self.exec_add_hl_rr(opcode),

            0x07 | 0x0F | 0x17 | 0x1F => self.exec_rotate_a(opcode),
            0x27 => self.alu_daa(),
            0x2F => self.exec_cpl(),
            0x37 => self.exec_scf(),
            0x3F => self.exec_ccf(),

            0x10 => self.exec_stop(bus),
            0x76 => self.exec_halt(bus),
            0xF3 => self.disable_interrupts(),
            0xFB => self.schedule_ime_enable(),

            // LD r,r' (0x76 is HALT and handled above).
            0x40..=0x7F => self.exec_ld_r_r(bus, opcode),
            0x80..=0xBF => self.exec_alu_reg(bus, opcode),
            0xC6 | 0xCE | 0xD6 | 0xDE | 0xE6 | 0xEE | 0xF6 | 0xFE => self.exec_alu_imm(bus, opcode),

            0x18 => return self.jr(bus, true),
            0x20 | 0x28 | 0x30 | 0x38 => return self.jr(bus, self.condition(opcode)),
            0xC3 => return self.jp(bus, true),
            0xC2 | 0xCA | 0xD2 | 0xDA => return self.jp(bus, self.condition(opcode)),
            0xE9 => self.regs.pc = self.regs.hl(),
            0xCD => return self.call(bus, true),
            0xC4 | 0xCC | 0xD4 | 0xDC => return self.call(bus, self.condition(opcode)),
            0xC9 => return self.ret(bus, true),
            0xC0 | 0xC8 | 0xD0 | 0xD8 => return self.ret(bus, self.condition(opcode)),
            0xD9 => self.exec_reti(bus),
            0xC7 | 0xCF | 0xD7 | 0xDF | 0xE7 | 0xEF | 0xF7 | 0xFF => self.exec_rst(bus, opcode),

            0xC1 | 0xD1 | 0xE1 | 0xF1 => self.exec_pop(bus, opcode),
            0xC5 | 0xD5 | 0xE5 | 0xF5 => self.exec_push(bus, opcode),

            0xE0 | 0xF0 => self.exec_ldh_a8(bus, opcode),
            0xE2 | 0xF2 => self.exec_ldh_c(bus, opcode),
            0xEA | 0xFA => self.exec_ld_a16_a(bus, opcode),
            0xE8 => self.exec_add_sp_r8(bus),
            0xF8 => self.exec_ld_hl_sp_r8(bus),
            0xF9 => self.regs.sp = self.regs.hl(),

            // 0xCB is decoded by the step loop before it gets here.
            0xCB => {}

            // Opcode holes: D3, DB, DD, E3, E4, EB, EC, ED, F4, FC, FD.
            _ => self.exec_undefined(opcode),
        }
        false
    }
}
