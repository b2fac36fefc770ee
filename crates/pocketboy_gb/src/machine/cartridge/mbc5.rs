use super::{Cartridge, CartridgeHeader, ExternalRam};

/// MBC5: 9-bit ROM bank split over two registers, 4-bit RAM bank.
/// Bank 0 may be mapped at `$4000-$7FFF`.
#[derive(Clone, Debug, Eq, PartialEq)]
pub(crate) struct Mbc5 {
    ram: ExternalRam,
    rom_banks: usize,
    rom_bank_low: u8,
    rom_bank_high: u8,
    rom_bank: usize,
    ram_bank: usize,
    ram_enabled: bool,
}

impl Mbc5 {
    pub(super) fn new(header: &CartridgeHeader, rom_banks: usize) -> Self {
        Self {
            ram: ExternalRam::new(header),
            rom_banks,
            rom_bank_low: 1,
            rom_bank_high: 0,
            rom_bank: 1,
            ram_bank: 0,
            ram_enabled: false,
        }
    }

    fn update_rom_bank(&mut self) {
        let bank = ((self.rom_bank_high as usize) << 8) | self.rom_bank_low as usize;
        self.rom_bank = bank & (self.rom_banks - 1);
        log::debug!("GB MBC5: ROM bank {:#05X}", self.rom_bank);
    }

    pub(super) fn rom_read(&self, cartridge: &Cartridge, addr: u16) -> u8 {
        if addr < 0x4000 {
            cartridge.rom_byte(0, addr)
        } else {
            cartridge.rom_byte(self.rom_bank, addr)
        }
    }

    pub(super) fn rom_write(&mut self, addr: u16, value: u8) {
        match addr {
            0x0000..=0x1FFF => {
                if self.ram.is_present() {
                    self.ram_enabled = value & 0x0F == 0x0A;
                }
            }
            0x2000..=0x2FFF => {
                self.rom_bank_low = value;
                self.update_rom_bank();
            }
            0x3000..=0x3FFF => {
                self.rom_bank_high = value & 0x01;
                self.update_rom_bank();
            }
            0x4000..=0x5FFF => {
                self.ram_bank = (value & 0x0F) as usize & self.ram.bank_mask();
            }
            _ => {
                log::warn!("GB MBC5: write to unusable address {addr:04X}={value:02X}");
            }
        }
    }

    pub(super) fn ram_read(&self, addr: u16) -> u8 {
        if !self.ram_enabled {
            return 0xFF;
        }
        self.ram.read(self.ram_bank, addr)
    }

    pub(super) fn ram_write(&mut self, addr: u16, value: u8) {
        if !self.ram_enabled {
            log::warn!("GB MBC5: write to disabled RAM {addr:04X}={value:02X} dropped");
            return;
        }
        self.ram.write(self.ram_bank, addr, value);
    }

    pub(super) fn battery_ram(&self) -> Vec<u8> {
        self.ram.dump_padded(self.ram.len())
    }

    pub(super) fn load_battery_ram(&mut self, bytes: &[u8]) {
        self.ram.restore(bytes);
    }
}
