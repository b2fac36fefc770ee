use super::super::video::registers::LcdMode;
use super::GameBoyBus;

const OAM_START: usize = 0xFE00;
const OAM_LEN: u16 = 0xA0;
const HDMA_BLOCK: u16 = 0x10;

/// CGB VRAM DMA registers (`$FF51-$FF55`).
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub(super) struct Hdma {
    source: u16,
    /// Offset into VRAM, `$0000-$1FF0`.
    dest: u16,
    /// 0x10-byte blocks still to copy.
    remaining: u8,
    /// An HBlank transfer is in progress.
    hblank_active: bool,
}

impl Hdma {
    pub(super) fn write_source_high(&mut self, value: u8) {
        self.source = (self.source & 0x00FF) | (u16::from(value) << 8);
    }

    pub(super) fn write_source_low(&mut self, value: u8) {
        self.source = (self.source & 0xFF00) | u16::from(value & 0xF0);
    }

    pub(super) fn write_dest_high(&mut self, value: u8) {
        self.dest = (self.dest & 0x00FF) | (u16::from(value & 0x1F) << 8);
    }

    pub(super) fn write_dest_low(&mut self, value: u8) {
        self.dest = (self.dest & 0xFF00) | u16::from(value & 0xF0);
    }

    /// Blocks left minus one; bit 7 is set while no HBlank transfer runs.
    pub(super) fn read_hdma5(&self) -> u8 {
        let left = self.remaining.wrapping_sub(1) & 0x7F;
        if self.hblank_active {
            left
        } else {
            0x80 | left
        }
    }
}

impl GameBoyBus {
    /// Copy `$XX00-$XX9F` into OAM. The transfer is not gated by the PPU mode.
    pub(super) fn oam_dma(&mut self, value: u8) {
        let base = u16::from(value) << 8;
        for i in 0..OAM_LEN {
            let byte = self.dma_source_read(base.wrapping_add(i));
            self.memory[OAM_START + usize::from(i)] = byte;
        }
        self.memory[0xFF46] = value;
    }

    /// Source read for DMA, bypassing the VRAM lock.
    fn dma_source_read(&mut self, addr: u16) -> u8 {
        match addr {
            0x8000..=0x9FFF => self.vram_read(addr),
            0xE000..=0xFFFF => self.wram_read(0xC000 | (addr & 0x1FFF)),
            _ => self.read8_mmio(addr),
        }
    }

    pub(super) fn write_hdma5(&mut self, value: u8) {
        if self.cgb.hdma.hblank_active && value & 0x80 == 0 {
            log::debug!("GB BUS: HBlank DMA cancelled, {} blocks left", self.cgb.hdma.remaining);
            self.cgb.hdma.hblank_active = false;
            return;
        }

        self.cgb.hdma.remaining = (value & 0x7F) + 1;
        if value & 0x80 != 0 {
            log::debug!(
                "GB BUS: HBlank DMA {:04X} -> {:04X}, {} blocks",
                self.cgb.hdma.source,
                0x8000 | self.cgb.hdma.dest,
                self.cgb.hdma.remaining
            );
            self.cgb.hdma.hblank_active = true;
            // Starting inside HBlank copies the first block right away.
            if self.video.mode() == LcdMode::HBlank {
                self.hdma_hblank_block();
            }
        } else {
            log::debug!(
                "GB BUS: general DMA {:04X} -> {:04X}, {} blocks",
                self.cgb.hdma.source,
                0x8000 | self.cgb.hdma.dest,
                self.cgb.hdma.remaining
            );
            while self.cgb.hdma.remaining > 0 {
                self.hdma_copy_block();
            }
        }
    }

    /// One HBlank step of an active HBlank DMA.
    pub(super) fn hdma_hblank_block(&mut self) {
        if !self.cgb.hdma.hblank_active {
            return;
        }
        self.hdma_copy_block();
        if self.cgb.hdma.remaining == 0 {
            self.cgb.hdma.hblank_active = false;
        }
    }

    fn hdma_copy_block(&mut self) {
        for _ in 0..HDMA_BLOCK {
            let byte = self.dma_source_read(self.cgb.hdma.source);
            self.vram_write(0x8000 | self.cgb.hdma.dest, byte);
            self.cgb.hdma.source = self.cgb.hdma.source.wrapping_add(1);
            self.cgb.hdma.dest = (self.cgb.hdma.dest + 1) & 0x1FFF;
        }
        self.cgb.hdma.remaining -= 1;
    }
}
