mod read;
mod write;

use super::GameBoyBus;

pub(super) const WRAM_BANK_SIZE: usize = 0x1000;

impl GameBoyBus {
    pub(super) fn read8_mmio(&mut self, addr: u16) -> u8 {
        self.read8_mmio_impl(addr)
    }

    pub(super) fn write8_mmio(&mut self, addr: u16, value: u8) {
        self.write8_mmio_impl(addr, value)
    }

    /// VRAM byte from the bank selected by VBK, ignoring the mode 3 lock.
    pub(super) fn vram_read(&self, addr: u16) -> u8 {
        let offset = usize::from(addr & 0x1FFF);
        if self.cgb.vram_bank == 1 {
            self.cgb.vram_bank1[offset]
        } else {
            self.memory[0x8000 + offset]
        }
    }

    pub(super) fn vram_write(&mut self, addr: u16, value: u8) {
        let offset = usize::from(addr & 0x1FFF);
        if self.cgb.vram_bank == 1 {
            self.cgb.vram_bank1[offset] = value;
        } else {
            self.memory[0x8000 + offset] = value;
        }
    }

    /// Index into the CGB switchable WRAM for `$D000-$DFFF`, if it applies.
    fn switchable_wram_index(&self, addr: u16) -> Option<usize> {
        if !self.model.is_cgb() || addr < 0xD000 {
            return None;
        }
        let bank = usize::from(self.cgb.wram_bank.max(1)) - 1;
        Some(bank * WRAM_BANK_SIZE + usize::from(addr & 0x0FFF))
    }

    /// Work RAM read for `$C000-$DFFF`.
    pub(super) fn wram_read(&self, addr: u16) -> u8 {
        match self.switchable_wram_index(addr) {
            Some(index) => self.cgb.wram[index],
            None => self.memory[usize::from(addr)],
        }
    }

    /// Work RAM write for `$C000-$DFFF`. On DMG the echo copy is kept in
    /// step so the mirror can be read straight from memory.
    pub(super) fn wram_write(&mut self, addr: u16, value: u8) {
        match self.switchable_wram_index(addr) {
            Some(index) => self.cgb.wram[index] = value,
            None => {
                self.memory[usize::from(addr)] = value;
                if !self.model.is_cgb() && addr <= 0xDDFF {
                    self.memory[usize::from(addr) + 0x2000] = value;
                }
            }
        }
    }

    /// `$E000-$FDFF`.
    pub(super) fn echo_read(&self, addr: u16) -> u8 {
        if self.model.is_cgb() {
            self.wram_read(addr - 0x2000)
        } else {
            self.memory[usize::from(addr)]
        }
    }

    pub(super) fn echo_write(&mut self, addr: u16, value: u8) {
        if self.model.is_cgb() {
            self.wram_write(addr - 0x2000, value);
        } else {
            self.memory[usize::from(addr)] = value;
            self.memory[usize::from(addr) - 0x2000] = value;
        }
    }
}

/// DMG read pattern of the unusable `$FEA0-$FEFF` window.
pub(super) fn unusable_pattern(addr: u16) -> u8 {
    let row = (addr >> 4).wrapping_sub(0x0FEA);
    if ((addr.wrapping_add(row) >> 2) & 1) != 0 {
        0x00
    } else {
        0xFF
    }
}
