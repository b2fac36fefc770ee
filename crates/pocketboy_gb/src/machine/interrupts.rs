use crate::cpu::Interrupt;

/// IF / IE registers plus the per-source visibility delay.
///
/// A freshly requested interrupt sets its IF bit immediately but stays
/// invisible to the CPU until its delay has elapsed.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub(crate) struct InterruptController {
    /// IF, lower five bits.
    flags: u8,
    /// IE, all eight bits are stored.
    enable: u8,
    delays: [u32; 5],
}

impl InterruptController {
    pub(crate) fn request(&mut self, interrupt: Interrupt) {
        self.flags |= interrupt.mask();
        self.delays[interrupt.index()] = interrupt.visibility_delay();
    }

    pub(crate) fn tick(&mut self, cycles: u32) {
        for delay in &mut self.delays {
            *delay = delay.saturating_sub(cycles);
        }
    }

    /// Highest-priority source that is requested, enabled and visible.
    pub(crate) fn pending(&self) -> Option<Interrupt> {
        let mut visible = self.flags & self.enable & 0x1F;
        for interrupt in Interrupt::ALL {
            if self.delays[interrupt.index()] > 0 {
                visible &= !interrupt.mask();
            }
        }
        Interrupt::highest(visible)
    }

    pub(crate) fn acknowledge(&mut self, interrupt: Interrupt) {
        self.flags &= !interrupt.mask();
        self.delays[interrupt.index()] = 0;
    }

    pub(crate) fn read_if(&self) -> u8 {
        self.flags | 0xE0
    }

    /// CPU write to IF. Bits set by software are visible immediately.
    pub(crate) fn write_if(&mut self, value: u8) {
        self.flags = value & 0x1F;
        for interrupt in Interrupt::ALL {
            if self.flags & interrupt.mask() == 0 {
                self.delays[interrupt.index()] = 0;
            }
        }
    }

    pub(crate) fn read_ie(&self) -> u8 {
        self.enable
    }

    pub(crate) fn write_ie(&mut self, value: u8) {
        self.enable = value;
    }
}
