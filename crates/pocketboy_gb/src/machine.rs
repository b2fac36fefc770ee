mod bus;
mod cartridge;
mod gameboy;
mod interrupts;
mod joypad;
mod serial;
mod state;
mod timer;
mod video;

pub(crate) use bus::GameBoyBus;
pub use cartridge::{Cartridge, CartridgeHeader, MapperKind};
pub use gameboy::GameBoy;
pub use joypad::Button;
pub use state::SaveState;

/// Hardware model being emulated.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub enum Model {
    #[default]
    Dmg,
    Cgb,
}

impl Model {
    pub fn is_cgb(self) -> bool {
        self == Model::Cgb
    }
}

/// The CPU-visible address space is 64 KiB. Banked regions (cartridge ROM
/// and RAM, CGB VRAM bank 1 and WRAM banks 1-7) live outside this array.
const MEMORY_SIZE: usize = 0x10000;

#[cfg(test)]
mod tests;
