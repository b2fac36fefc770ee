use super::Cartridge;

/// 512 four-bit cells built into the controller.
const RAM_NIBBLES: usize = 0x200;

/// MBC2: 4-bit ROM bank register and built-in nibble RAM.
#[derive(Clone, Debug, Eq, PartialEq)]
pub(crate) struct Mbc2 {
    ram: Vec<u8>,
    rom_banks: usize,
    rom_bank: usize,
    ram_enabled: bool,
}

impl Mbc2 {
    pub(super) fn new(rom_banks: usize) -> Self {
        Self {
            ram: vec![0x0F; RAM_NIBBLES],
            rom_banks,
            rom_bank: 1,
            ram_enabled: false,
        }
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
            0x0000..=0x0FFF => self.ram_enabled = value & 0x0F == 0x0A,
            0x2100..=0x21FF => {
                let bank = (value & 0x0F).max(1) as usize;
                self.rom_bank = bank & (self.rom_banks - 1);
                log::debug!("GB MBC2: ROM bank {:#04X}", self.rom_bank);
            }
            _ => {
                log::warn!("GB MBC2: write to unusable address {addr:04X}={value:02X}");
            }
        }
    }

    pub(super) fn ram_read(&self, addr: u16) -> u8 {
        if !self.ram_enabled {
            return 0xFF;
        }
        match addr {
            0xA000..=0xA1FF => 0xF0 | self.ram[addr as usize - 0xA000],
            _ => 0xFF,
        }
    }

    pub(super) fn ram_write(&mut self, addr: u16, value: u8) {
        if !self.ram_enabled {
            log::warn!("GB MBC2: write to disabled RAM {addr:04X}={value:02X} dropped");
            return;
        }
        match addr {
            0xA000..=0xA1FF => self.ram[addr as usize - 0xA000] = value & 0x0F,
            _ => {
                log::warn!("GB MBC2: write to unusable address {addr:04X}={value:02X}");
            }
        }
    }

    pub(super) fn battery_ram(&self) -> Vec<u8> {
        self.ram.clone()
    }

    pub(super) fn load_battery_ram(&mut self, bytes: &[u8]) {
        for (cell, &byte) in self.ram.iter_mut().zip(bytes) {
            *cell = byte & 0x0F;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nibble_ram_ignores_upper_bits() {
        let mut mbc = Mbc2::new(16);
        mbc.rom_write(0x0000, 0x0A);
        mbc.ram_write(0xA010, 0xAB);
        assert_eq!(mbc.ram_read(0xA010), 0xFB);
        assert_eq!(mbc.ram_read(0xA300), 0xFF);

        mbc.rom_write(0x0000, 0x00);
        assert_eq!(mbc.ram_read(0xA010), 0xFF);
    }

    #[test]
    fn rom_bank_zero_selects_one() {
        let mut mbc = Mbc2::new(16);
        mbc.rom_write(0x2100, 0x00);
        assert_eq!(mbc.rom_bank, 1);
        mbc.rom_write(0x2100, 0x1F);
        assert_eq!(mbc.rom_bank, 0x0F);
        // Outside the register window.
        mbc.rom_write(0x2200, 0x03);
        assert_eq!(mbc.rom_bank, 0x0F);
    }
}
