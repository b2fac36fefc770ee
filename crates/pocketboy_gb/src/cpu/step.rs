use super::tables::{CB_CYCLES, OPCODE_BRANCH_CYCLES, OPCODE_CYCLES};
use super::{Bus, Cpu, CpuState};

/// Cost of one idle step while halted or stopped.
const IDLE_CYCLES: u32 = 4;
/// Wake-up latency between an interrupt becoming pending and HALT ending.
const UNHALT_DELAY: u32 = 12;

impl Cpu {
    /// Run one step of the CPU state machine and return the cycles consumed.
    ///
    /// A step is one of: an idle slot in HALT/STOP, an interrupt dispatch, or
    /// one complete instruction. The bus is advanced by the same number of
    /// cycles before this returns.
    pub fn tick<B: Bus>(&mut self, bus: &mut B) -> u32 {
        let cycles = match self.state {
            CpuState::Stopped => {
                bus.tick_stopped(IDLE_CYCLES);
                return IDLE_CYCLES;
            }
            CpuState::Halted => self.tick_halted(bus),
            CpuState::Running => match self.service_interrupt(bus) {
                Some(cycles) => cycles,
                None => self.execute_instruction(bus),
            },
        };

        bus.tick(cycles);
        cycles
    }

    fn tick_halted<B: Bus>(&mut self, bus: &mut B) -> u32 {
        if self.unhalt_cycles > 0 {
            self.unhalt_cycles = self.unhalt_cycles.saturating_sub(IDLE_CYCLES);
            if self.unhalt_cycles == 0 {
                self.state = CpuState::Running;
            }
        } else if bus.pending_interrupt().is_some() {
            self.unhalt_cycles = UNHALT_DELAY;
        }
        IDLE_CYCLES
    }

    fn execute_instruction<B: Bus>(&mut self, bus: &mut B) -> u32 {
        let pc = self.regs.pc;
        let opcode = self.fetch8(bus);

        let cycles = if opcode == 0xCB {
            let cb = self.fetch8(bus);
            log::trace!("GB CPU: {:04X}  {}", pc, super::mnemonic(opcode, Some(cb)));
            self.exec_cb(bus, cb);
            CB_CYCLES[cb as usize]
        } else {
            log::trace!("GB CPU: {:04X}  {}", pc, super::mnemonic(opcode, None));
            if self.exec_opcode(bus, opcode) {
                OPCODE_BRANCH_CYCLES[opcode as usize]
            } else {
                OPCODE_CYCLES[opcode as usize]
            }
        };

        self.advance_ime_delay();
        cycles as u32
    }
}
