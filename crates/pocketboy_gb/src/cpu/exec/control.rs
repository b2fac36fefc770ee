use crate::cpu::{Bus, Cpu};

impl Cpu {
    /// RETI: return and re-enable interrupts without the EI latency.
    pub(super) fn exec_reti<B: Bus>(&mut self, bus: &mut B) {
        self.regs.pc = self.pop_u16(bus);
        self.ime = true;
        self.ime_enable_delay = 0;
    }

    /// The eleven opcode holes behave as one-byte no-ops here; real hardware
    /// locks up, which would stall the frame loop forever.
    pub(super) fn exec_undefined(&mut self, opcode: u8) {
        log::warn!(
            "GB CPU: undefined opcode 0x{:02X} at PC=0x{:04X} (SP=0x{:04X} AF=0x{:04X})",
            opcode,
            self.regs.pc.wrapping_sub(1),
            self.regs.sp,
            self.regs.af(),
        );
    }
}
