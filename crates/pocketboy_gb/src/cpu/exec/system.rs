use crate::cpu::{Bus, Cpu, CpuState};

impl Cpu {
    pub(super) fn exec_halt<B: Bus>(&mut self, bus: &mut B) {
        if !self.ime && bus.pending_interrupt().is_some() {
            // An interrupt is already waiting with IME off: the CPU never
            // halts. On DMG the next opcode byte is then read twice.
            if !bus.is_cgb() {
                self.halt_bug = true;
            }
            return;
        }
        self.state = CpuState::Halted;
        self.unhalt_cycles = 0;
    }

    pub(super) fn exec_stop<B: Bus>(&mut self, bus: &mut B) {
        // STOP is two bytes long; the padding byte is skipped.
        let _ = self.fetch8(bus);

        if bus.speed_switch() {
            return;
        }
        log::debug!("GB CPU: entering STOP at PC=0x{:04X}", self.regs.pc);
        self.state = CpuState::Stopped;
    }
}
