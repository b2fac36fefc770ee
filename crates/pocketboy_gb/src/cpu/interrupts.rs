use super::{Bus, Cpu, CpuState};

/// Interrupt sources in priority order.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum Interrupt {
    VBlank = 0,
    LcdStat = 1,
    Timer = 2,
    Serial = 3,
    Joypad = 4,
}

/// Cycles an interrupt service routine entry costs.
pub(super) const INTERRUPT_SERVICE_CYCLES: u32 = 20;

impl Interrupt {
    /// All sources, highest priority first.
    pub const ALL: [Interrupt; 5] = [
        Interrupt::VBlank,
        Interrupt::LcdStat,
        Interrupt::Timer,
        Interrupt::Serial,
        Interrupt::Joypad,
    ];

    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }

    /// Bit of this source in IE / IF.
    #[inline]
    pub fn mask(self) -> u8 {
        1 << (self as u8)
    }

    /// Address the CPU jumps to when servicing this interrupt.
    #[inline]
    pub fn vector(self) -> u16 {
        0x0040 + (self as u16) * 8
    }

    /// Cycles between the request and the moment the CPU can see it.
    pub fn visibility_delay(self) -> u32 {
        match self {
            Interrupt::VBlank => 32,
            Interrupt::LcdStat => 18,
            Interrupt::Timer | Interrupt::Serial | Interrupt::Joypad => 0,
        }
    }

    /// Pick the highest-priority source from an `IE & IF` style mask.
    pub fn highest(pending: u8) -> Option<Interrupt> {
        Interrupt::ALL
            .into_iter()
            .find(|interrupt| pending & interrupt.mask() != 0)
    }
}

impl Cpu {
    /// Service the highest-priority pending interrupt when IME allows it.
    ///
    /// Returns the cycles consumed, or `None` if nothing was serviced.
    pub(super) fn service_interrupt<B: Bus>(&mut self, bus: &mut B) -> Option<u32> {
        if !self.ime {
            return None;
        }
        let interrupt = bus.pending_interrupt()?;

        let pc = self.regs.pc;
        self.push_u16(bus, pc);
        bus.acknowledge_interrupt(interrupt);
        self.ime = false;
        self.ime_enable_delay = 0;
        self.state = CpuState::Running;
        self.regs.pc = interrupt.vector();

        log::debug!(
            "GB CPU: servicing {:?} interrupt pc=0x{:04X} -> 0x{:04X} sp=0x{:04X}",
            interrupt,
            pc,
            self.regs.pc,
            self.regs.sp,
        );
        Some(INTERRUPT_SERVICE_CYCLES)
    }

    /// Count down the EI latency after an instruction completes.
    #[inline]
    pub(super) fn advance_ime_delay(&mut self) {
        if self.ime_enable_delay > 0 {
            self.ime_enable_delay -= 1;
            if self.ime_enable_delay == 0 {
                self.ime = true;
            }
        }
    }

    /// Arm the EI latency: IME turns on after the next instruction.
    #[inline]
    pub(super) fn schedule_ime_enable(&mut self) {
        // Counted down once after EI itself and once after its successor.
        if !self.ime {
            self.ime_enable_delay = 2;
        }
    }

    #[inline]
    pub(super) fn disable_interrupts(&mut self) {
        self.ime = false;
        self.ime_enable_delay = 0;
    }
}
