mod alu;
mod bus;
mod cb;
mod exec;
mod helpers;
mod init;
mod interrupts;
mod regs;
mod step;
mod tables;

pub use bus::Bus;
pub use interrupts::Interrupt;
pub use regs::{Flag, Reg16, Registers};
pub use tables::{disassemble, mnemonic};

/// Execution state of the LR35902 core.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub enum CpuState {
    #[default]
    Running,
    /// Waiting for an interrupt after HALT.
    Halted,
    /// Low-power STOP; left on a joypad press.
    Stopped,
}

/// Sharp LR35902 CPU core.
///
/// The CPU owns only its register file and the bits of control state that
/// live inside the chip (IME, HALT/STOP, the HALT bug latch). Everything else
/// is reached through the [`Bus`] it is stepped with.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Cpu {
    pub regs: Registers,
    /// Interrupt master enable.
    pub ime: bool,
    pub(crate) state: CpuState,
    /// Instructions left before a pending EI turns IME on.
    ime_enable_delay: u8,
    /// Set when HALT hit the DMG bug; the next fetch does not advance PC.
    halt_bug: bool,
    /// Remaining cycles of the wake-up delay once an interrupt ends HALT.
    unhalt_cycles: u32,
}

impl Cpu {
    #[inline]
    pub fn get_flag(&self, flag: Flag) -> bool {
        let bit = flag as u8;
        (self.regs.f & (1 << bit)) != 0
    }

    #[inline]
    pub fn set_flag(&mut self, flag: Flag, value: bool) {
        let bit = flag as u8;
        if value {
            self.regs.f |= 1 << bit;
        } else {
            self.regs.f &= !(1 << bit);
        }
    }

    #[inline]
    pub fn clear_flags(&mut self) {
        self.regs.f = 0;
    }

    pub fn state(&self) -> CpuState {
        self.state
    }

    pub fn is_halted(&self) -> bool {
        self.state == CpuState::Halted
    }

    pub fn is_stopped(&self) -> bool {
        self.state == CpuState::Stopped
    }

    /// Leave STOP mode. Called by the machine when a button goes down.
    pub(crate) fn wake_from_stop(&mut self) {
        if self.state == CpuState::Stopped {
            log::debug!("GB CPU: leaving STOP on joypad input");
            self.state = CpuState::Running;
        }
    }
}
