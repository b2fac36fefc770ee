use super::super::joypad::Joypad;
use super::super::serial::Serial;
use super::super::timer::Timer;
use super::super::video::registers::{LcdStatus, LY, STAT};
use super::super::video::Video;
use super::super::Model;
use super::mmio::WRAM_BANK_SIZE;
use super::{CgbState, GameBoyBus};

/// I/O registers as left by the DMG boot ROM. Only `$FF00-$FF7F` is applied.
static DMG_IO: [u8; 256] = io_table(false);
/// I/O registers as left by the CGB boot ROM.
static CGB_IO: [u8; 256] = io_table(true);

const fn io_table(cgb: bool) -> [u8; 256] {
    let mut io = [0u8; 256];

    io[0x00] = 0xCF; // P1
    io[0x02] = if cgb { 0x7F } else { 0x7E }; // SC
    io[0x04] = if cgb { 0x00 } else { 0xAB }; // DIV
    io[0x07] = 0xF8; // TAC
    io[0x0F] = 0xE1; // IF

    // Sound registers are not emulated but software can read them back.
    io[0x10] = 0x80;
    io[0x11] = 0xBF;
    io[0x12] = 0xF3;
    io[0x13] = 0xFF;
    io[0x14] = 0xBF;
    io[0x16] = 0x3F;
    io[0x18] = 0xFF;
    io[0x19] = 0xBF;
    io[0x1A] = 0x7F;
    io[0x1B] = 0xFF;
    io[0x1C] = 0x9F;
    io[0x1D] = 0xFF;
    io[0x1E] = 0xBF;
    io[0x20] = 0xFF;
    io[0x23] = 0xBF;
    io[0x24] = 0x77;
    io[0x25] = 0xF3;
    io[0x26] = 0xF1;

    io[0x40] = 0x91; // LCDC
    io[0x41] = 0x85; // STAT
    io[0x46] = 0xFF; // DMA
    io[0x47] = 0xFC; // BGP
    if !cgb {
        // OBP0/OBP1 are uninitialised on DMG; these are common power-on values.
        io[0x48] = 0xFF;
        io[0x49] = 0xFF;
    }

    io
}

impl GameBoyBus {
    /// Put memory and every peripheral into the post-boot state for the
    /// bus model.
    pub(super) fn apply_initial_io_state(&mut self) {
        let io = match self.model {
            Model::Dmg => &DMG_IO,
            Model::Cgb => &CGB_IO,
        };

        self.memory.fill(0);
        self.cgb = CgbState::default();
        self.randomize_internal_ram();
        self.memory[0xFF00..0xFF80].copy_from_slice(&io[..0x80]);

        self.joypad = Joypad::default();
        self.joypad.write(io[0x00]);
        self.serial = Serial::post_boot(io[0x02]);
        self.timer = Timer::post_boot(io[0x04], io[0x07]);
        self.interrupts = Default::default();
        self.interrupts.write_if(io[0x0F]);
        self.interrupts.write_ie(0x00);

        self.video = Video::default();
        let stat = self.memory[STAT] & !LcdStatus::MODE.bits();
        self.memory[STAT] = stat | self.video.mode() as u8;
        self.memory[LY] = self.video.ly();
        self.frame_completed = false;
    }

    /// Power-on WRAM and HRAM contents are undefined on hardware. A fixed
    /// xorshift seed keeps runs reproducible without handing software zeros.
    fn randomize_internal_ram(&mut self) {
        let mut x: u32 = 0xC0DE_1234;
        let mut next_byte = || {
            x ^= x << 13;
            x ^= x >> 17;
            x ^= x << 5;
            x as u8
        };

        for addr in 0xC000..=0xDFFF {
            self.memory[addr] = next_byte();
        }
        self.memory.copy_within(0xC000..0xDE00, 0xE000);

        if self.model.is_cgb() {
            for byte in &mut self.cgb.wram[..7 * WRAM_BANK_SIZE] {
                *byte = next_byte();
            }
        }

        for addr in 0xFF80..=0xFFFE {
            self.memory[addr] = next_byte();
        }
    }
}
