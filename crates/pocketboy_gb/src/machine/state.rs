use crate::cpu::Cpu;

use super::{GameBoyBus, Model};

/// An in-memory snapshot of a running machine.
///
/// Holds the CPU registers and control state, the whole bus (memory array,
/// bank controller registers and cartridge RAM, video, timer, interrupt
/// delays, CGB banks) and a shared handle to the ROM it was taken from.
/// Serialising it to disk is left to the host.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct SaveState {
    pub(crate) cpu: Cpu,
    pub(crate) bus: GameBoyBus,
}

impl SaveState {
    pub fn cpu(&self) -> &Cpu {
        &self.cpu
    }

    pub fn model(&self) -> Model {
        self.bus.model()
    }
}
