use super::{Cartridge, CartridgeHeader, ExternalRam};

/// Battery dump: one mode byte followed by this much RAM.
const BATTERY_RAM_LEN: usize = 0x8000;

/// MBC1: 5+2 bit ROM bank register, up to four RAM banks, and a mode bit
/// that decides what the upper two bits select.
#[derive(Clone, Debug, Eq, PartialEq)]
pub(crate) struct Mbc1 {
    ram: ExternalRam,
    rom_banks: usize,
    rom_bank_low5: u8,
    rom_bank_high2: u8,
    /// Effective bank mapped at `$4000-$7FFF`.
    rom_bank: usize,
    ram_bank: usize,
    ram_enabled: bool,
    /// 0 = upper bits extend the ROM bank, 1 = they select the RAM bank.
    mode: u8,
}

impl Mbc1 {
    pub(super) fn new(header: &CartridgeHeader, rom_banks: usize) -> Self {
        Self {
            ram: ExternalRam::new(header),
            rom_banks,
            rom_bank_low5: 1,
            rom_bank_high2: 0,
            rom_bank: 1,
            ram_bank: 0,
            ram_enabled: false,
            mode: 0,
        }
    }

    /// Apply the hardware's bank-0 remap and the image-size mask.
    pub(super) fn effective_bank(raw: usize, rom_banks: usize) -> usize {
        let bank = match raw {
            0x00 | 0x20 | 0x40 | 0x60 => raw + 1,
            _ => raw,
        };
        bank & (rom_banks - 1)
    }

    fn update_rom_bank(&mut self) {
        let mut raw = self.rom_bank_low5 as usize;
        if self.mode == 0 {
            raw |= (self.rom_bank_high2 as usize) << 5;
        }
        self.rom_bank = Self::effective_bank(raw, self.rom_banks);
        log::debug!("GB MBC1: ROM bank {:#04X}", self.rom_bank);
    }

    fn update_ram_bank(&mut self) {
        self.ram_bank = if self.mode == 1 {
            self.rom_bank_high2 as usize & self.ram.bank_mask()
        } else {
            0
        };
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
            0x2000..=0x3FFF => {
                self.rom_bank_low5 = value & 0x1F;
                self.update_rom_bank();
            }
            0x4000..=0x5FFF => {
                self.rom_bank_high2 = value & 0x03;
                if self.mode == 1 {
                    self.update_ram_bank();
                } else {
                    self.update_rom_bank();
                }
            }
            _ => {
                self.mode = value & 0x01;
                self.update_rom_bank();
                self.update_ram_bank();
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
            log::warn!("GB MBC1: write to disabled RAM {addr:04X}={value:02X} dropped");
            return;
        }
        self.ram.write(self.ram_bank, addr, value);
    }

    pub(super) fn battery_ram(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(1 + BATTERY_RAM_LEN);
        out.push(self.mode);
        out.extend(self.ram.dump_padded(BATTERY_RAM_LEN));
        out
    }

    pub(super) fn load_battery_ram(&mut self, bytes: &[u8]) {
        if let Some((&mode, ram)) = bytes.split_first() {
            self.mode = mode & 0x01;
            self.ram.restore(ram);
            self.update_rom_bank();
            self.update_ram_bank();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::machine::cartridge::compute_header_checksum;

    fn header(ram_code: u8) -> CartridgeHeader {
        let mut rom = vec![0u8; 0x150];
        rom[0x147] = 0x03;
        rom[0x149] = ram_code;
        rom[0x14D] = compute_header_checksum(&rom);
        CartridgeHeader::parse(&rom).unwrap()
    }

    #[test]
    fn zero_banks_remap_to_next() {
        for raw in [0x00, 0x20, 0x40, 0x60] {
            assert_eq!(Mbc1::effective_bank(raw, 128), raw + 1);
        }
        assert_eq!(Mbc1::effective_bank(0x21, 128), 0x21);
        // Masked to the image size after remapping.
        assert_eq!(Mbc1::effective_bank(0x20, 32), 0x01);
        assert_eq!(Mbc1::effective_bank(0x13, 8), 0x03);
    }

    #[test]
    fn high_bits_extend_rom_bank_in_mode_0() {
        let mut mbc = Mbc1::new(&header(0x03), 128);
        mbc.rom_write(0x2000, 0x00);
        assert_eq!(mbc.rom_bank, 1);
        mbc.rom_write(0x4000, 0x01);
        assert_eq!(mbc.rom_bank, 0x21);
        mbc.rom_write(0x2000, 0x05);
        assert_eq!(mbc.rom_bank, 0x25);

        // Mode 1 hands the upper bits to RAM banking.
        mbc.rom_write(0x6000, 0x01);
        assert_eq!(mbc.rom_bank, 0x05);
        mbc.rom_write(0x0000, 0x0A);
        mbc.rom_write(0x4000, 0x02);
        mbc.ram_write(0xA000, 0x77);
        mbc.rom_write(0x4000, 0x00);
        assert_eq!(mbc.ram_read(0xA000), 0xFF);
        mbc.rom_write(0x4000, 0x02);
        assert_eq!(mbc.ram_read(0xA000), 0x77);
    }

    #[test]
    fn battery_dump_starts_with_mode() {
        let mut mbc = Mbc1::new(&header(0x02), 4);
        mbc.rom_write(0x0000, 0x0A);
        mbc.ram_write(0xA001, 0x12);
        mbc.rom_write(0x6000, 0x01);

        let dump = mbc.battery_ram();
        assert_eq!(dump.len(), 1 + BATTERY_RAM_LEN);
        assert_eq!(dump[0], 1);
        assert_eq!(dump[2], 0x12);

        let mut restored = Mbc1::new(&header(0x02), 4);
        restored.load_battery_ram(&dump);
        restored.rom_write(0x0000, 0x0A);
        assert_eq!(restored.ram_read(0xA001), 0x12);
    }
}
