use super::super::super::video::registers::{LCDC, LYC, STAT};
use super::super::GameBoyBus;

impl GameBoyBus {
    pub(super) fn write8_mmio_impl(&mut self, addr: u16, value: u8) {
        match addr {
            0x0000..=0x7FFF => match &mut self.cartridge {
                Some(loaded) => loaded.rule.rom_write(addr, value),
                None => log::warn!("GB BUS: write {value:02X} to {addr:04X} with no cartridge"),
            },

            0x8000..=0x9FFF => {
                if self.video.vram_accessible() {
                    self.vram_write(addr, value);
                }
            }

            0xA000..=0xBFFF => match &mut self.cartridge {
                Some(loaded) => loaded.rule.ram_write(addr, value),
                None => log::warn!("GB BUS: write {value:02X} to {addr:04X} with no cartridge"),
            },

            0xC000..=0xDFFF => self.wram_write(addr, value),
            0xE000..=0xFDFF => self.echo_write(addr, value),

            0xFE00..=0xFE9F => {
                if self.video.oam_accessible() {
                    self.memory[usize::from(addr)] = value;
                }
            }

            0xFEA0..=0xFEFF => {
                if self.model.is_cgb() {
                    self.memory[usize::from(addr)] = value;
                } else {
                    log::warn!("GB BUS: write {value:02X} to unusable {addr:04X}");
                }
            }

            0xFF00..=0xFF7F => self.write_io(addr, value),
            0xFF80..=0xFFFE => self.memory[usize::from(addr)] = value,
            0xFFFF => self.interrupts.write_ie(value),
        }
    }

    fn write_io(&mut self, addr: u16, value: u8) {
        let cgb = self.model.is_cgb();
        match addr {
            0xFF00 => self.joypad.write(value),
            0xFF01 => self.serial.sb = value,
            0xFF02 => self.serial.write_sc(value),
            0xFF04 => self.timer.reset_div_cycles(),
            0xFF05 => self.timer.tima = value,
            0xFF06 => self.timer.tma = value,
            0xFF07 => self.timer.write_tac(value),
            0xFF0F => self.interrupts.write_if(value),

            0xFF40 => {
                let previous = self.memory[LCDC];
                self.memory[LCDC] = value;
                self.with_video(|video, ctx| video.write_lcdc(previous, ctx));
            }
            0xFF41 => self.memory[STAT] = (self.memory[STAT] & 0x87) | (value & 0x78),
            0xFF44 => {}
            0xFF45 => {
                self.memory[LYC] = value;
                self.with_video(|video, ctx| video.compare_ly(ctx));
            }
            0xFF46 => self.oam_dma(value),

            0xFF4D if cgb => self.cgb.key1_armed = value & 0x01 != 0,
            0xFF4F if cgb => self.cgb.vram_bank = value & 0x01,
            0xFF51 if cgb => self.cgb.hdma.write_source_high(value),
            0xFF52 if cgb => self.cgb.hdma.write_source_low(value),
            0xFF53 if cgb => self.cgb.hdma.write_dest_high(value),
            0xFF54 if cgb => self.cgb.hdma.write_dest_low(value),
            0xFF55 if cgb => self.write_hdma5(value),
            0xFF68 if cgb => self.cgb.palettes.write_bcps(value),
            0xFF69 if cgb => self.cgb.palettes.write_bcpd(value),
            0xFF6A if cgb => self.cgb.palettes.write_ocps(value),
            0xFF6B if cgb => self.cgb.palettes.write_ocpd(value),
            0xFF70 if cgb => self.cgb.wram_bank = (value & 0x07).max(1),
            0xFF4D | 0xFF4F | 0xFF51..=0xFF55 | 0xFF68..=0xFF6B | 0xFF70 => {}

            _ => self.memory[usize::from(addr)] = value,
        }
    }
}
