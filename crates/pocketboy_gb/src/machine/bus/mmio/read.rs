use super::super::super::video::registers::{LY, STAT};
use super::super::GameBoyBus;
use super::unusable_pattern;

impl GameBoyBus {
    pub(super) fn read8_mmio_impl(&mut self, addr: u16) -> u8 {
        match addr {
            0x0000..=0x7FFF => match &self.cartridge {
                Some(loaded) => loaded.rule.rom_read(&loaded.cartridge, addr),
                None => 0xFF,
            },

            0x8000..=0x9FFF => {
                if self.video.vram_accessible() {
                    self.vram_read(addr)
                } else {
                    0xFF
                }
            }

            0xA000..=0xBFFF => match &self.cartridge {
                Some(loaded) => loaded.rule.ram_read(addr),
                None => 0xFF,
            },

            0xC000..=0xDFFF => self.wram_read(addr),
            0xE000..=0xFDFF => self.echo_read(addr),

            0xFE00..=0xFE9F => {
                if self.video.oam_accessible() {
                    self.memory[usize::from(addr)]
                } else {
                    0xFF
                }
            }

            0xFEA0..=0xFEFF => {
                if self.model.is_cgb() {
                    self.memory[usize::from(addr)]
                } else {
                    unusable_pattern(addr)
                }
            }

            0xFF00..=0xFF7F => self.read_io(addr),
            0xFF80..=0xFFFE => self.memory[usize::from(addr)],
            0xFFFF => self.interrupts.read_ie(),
        }
    }

    fn read_io(&self, addr: u16) -> u8 {
        let cgb = self.model.is_cgb();
        match addr {
            0xFF00 => self.joypad.read(),
            0xFF01 => self.serial.sb,
            0xFF02 => self.serial.read_sc(),
            0xFF04 => self.timer.div,
            0xFF05 => self.timer.tima,
            0xFF06 => self.timer.tma,
            0xFF07 => self.timer.read_tac(),
            0xFF0F => self.interrupts.read_if(),

            0xFF41 => self.memory[STAT] | 0x80,
            0xFF44 => self.memory[LY],

            0xFF4D if cgb => {
                let speed = if self.cgb.double_speed { 0x80 } else { 0x00 };
                0x7E | speed | u8::from(self.cgb.key1_armed)
            }
            0xFF4F if cgb => 0xFE | self.cgb.vram_bank,
            // HDMA1-4 are write-only.
            0xFF51..=0xFF54 => 0xFF,
            0xFF55 if cgb => self.cgb.hdma.read_hdma5(),
            0xFF68 if cgb => self.cgb.palettes.read_bcps(),
            0xFF69 if cgb => self.cgb.palettes.read_bcpd(),
            0xFF6A if cgb => self.cgb.palettes.read_ocps(),
            0xFF6B if cgb => self.cgb.palettes.read_ocpd(),
            0xFF70 if cgb => 0xF8 | self.cgb.wram_bank,
            0xFF4D | 0xFF4F | 0xFF55 | 0xFF68..=0xFF6B | 0xFF70 => 0xFF,

            _ => self.memory[usize::from(addr)],
        }
    }
}
