use super::{Cartridge, CartridgeHeader, ExternalRam};

/// Plain 32 KiB cartridge, optionally with up to 8 KiB of RAM.
#[derive(Clone, Debug, Eq, PartialEq)]
pub(crate) struct RomOnly {
    ram: ExternalRam,
}

impl RomOnly {
    pub(super) fn new(header: &CartridgeHeader) -> Self {
        Self {
            ram: ExternalRam::new(header),
        }
    }

    pub(super) fn rom_read(&self, cartridge: &Cartridge, addr: u16) -> u8 {
        cartridge.rom_byte((addr >> 14) as usize, addr)
    }

    pub(super) fn rom_write(&mut self, addr: u16, value: u8) {
        log::warn!("GB ROM: write to read-only ROM {addr:04X}={value:02X} dropped");
    }

    pub(super) fn ram_read(&self, addr: u16) -> u8 {
        self.ram.read(0, addr)
    }

    pub(super) fn ram_write(&mut self, addr: u16, value: u8) {
        if !self.ram.is_present() {
            log::warn!("GB ROM: write to absent cartridge RAM {addr:04X}={value:02X} dropped");
            return;
        }
        self.ram.write(0, addr, value);
    }

    pub(super) fn battery_ram(&self) -> Vec<u8> {
        self.ram.dump_padded(self.ram.len())
    }

    pub(super) fn load_battery_ram(&mut self, bytes: &[u8]) {
        self.ram.restore(bytes);
    }
}
