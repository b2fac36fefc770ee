use super::{Cpu, CpuState, Registers};

impl Default for Cpu {
    fn default() -> Self {
        Self::new()
    }
}

impl Cpu {
    /// A CPU in the DMG post-boot state.
    pub fn new() -> Self {
        let mut cpu = Self {
            regs: Registers::default(),
            ime: false,
            state: CpuState::Running,
            ime_enable_delay: 0,
            halt_bug: false,
            unhalt_cycles: 0,
        };
        cpu.reset(false);
        cpu
    }

    /// Reset to the register state the boot ROM leaves behind when it jumps
    /// to the cartridge entry point at `$0100`.
    pub fn reset(&mut self, cgb: bool) {
        self.regs = if cgb {
            Registers {
                a: 0x11,
                f: 0x80,
                b: 0x00,
                c: 0x00,
                d: 0xFF,
                e: 0x56,
                h: 0x00,
                l: 0x0D,
                sp: 0xFFFE,
                pc: 0x0100,
            }
        } else {
            Registers {
                a: 0x01,
                f: 0xB0,
                b: 0x00,
                c: 0x13,
                d: 0x00,
                e: 0xD8,
                h: 0x01,
                l: 0x4D,
                sp: 0xFFFE,
                pc: 0x0100,
            }
        };
        self.ime = false;
        self.state = CpuState::Running;
        self.ime_enable_delay = 0;
        self.halt_bug = false;
        self.unhalt_cycles = 0;
    }
}
