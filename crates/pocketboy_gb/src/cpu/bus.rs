use super::Interrupt;

/// Everything the CPU can reach outside its own registers.
///
/// The defaults describe a plain 64 KiB address space with IF at `$FF0F`
/// and IE at `$FFFF`, which is what the unit tests run against. The machine
/// bus overrides the interrupt hooks to honour per-interrupt visibility
/// delays.
pub trait Bus {
    fn read8(&mut self, addr: u16) -> u8;
    fn write8(&mut self, addr: u16, value: u8);

    /// Advance bus-side peripherals (timer, serial, video) by the number of
    /// CPU cycles the last step consumed.
    fn tick(&mut self, _cycles: u32) {}

    /// Advance only what keeps running while the CPU sits in STOP.
    ///
    /// The divider is frozen in STOP, but the LCD keeps its frame cadence so
    /// the host loop still sees frames complete.
    fn tick_stopped(&mut self, cycles: u32) {
        self.tick(cycles);
    }

    /// Highest-priority interrupt that is requested, enabled and visible.
    fn pending_interrupt(&mut self) -> Option<Interrupt> {
        let pending = self.read8(0xFFFF) & self.read8(0xFF0F) & 0x1F;
        Interrupt::highest(pending)
    }

    /// Clear the request bit of an interrupt that is being serviced.
    fn acknowledge_interrupt(&mut self, interrupt: Interrupt) {
        let flags = self.read8(0xFF0F);
        self.write8(0xFF0F, flags & !interrupt.mask());
    }

    /// Whether the CPU is running as a CGB. Selects HALT and STOP behaviour.
    fn is_cgb(&self) -> bool {
        false
    }

    /// Perform the CGB KEY1 speed switch if one is armed.
    ///
    /// Returns `true` if STOP was consumed by a speed switch.
    fn speed_switch(&mut self) -> bool {
        false
    }
}
