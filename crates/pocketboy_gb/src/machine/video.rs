mod palette;
pub(crate) mod registers;
mod render;

pub(crate) use palette::CgbPalettes;

use registers::{LcdControl, LcdMode, LcdStatus, LCDC, LY, LYC, STAT};

use super::interrupts::InterruptController;
use super::MEMORY_SIZE;
use crate::cpu::Interrupt;
use crate::{CYCLES_PER_FRAME, FRAMEBUFFER_LEN};

const OAM_SCAN_CYCLES: u32 = 80;
const PIXEL_TRANSFER_CYCLES: u32 = 172;
const HBLANK_CYCLES: u32 = 204;
const LINE_CYCLES: u32 = 456;
const VISIBLE_LINES: u8 = 144;
const TOTAL_LINES: u8 = 154;
/// Latency between setting LCDC bit 7 and the first OAM scan.
const SCREEN_ON_DELAY: u32 = 244;

/// Everything outside the video unit that it reads or updates.
pub(crate) struct VideoContext<'a> {
    /// Bank 0 VRAM, OAM and the LCD registers live here.
    pub(crate) memory: &'a mut [u8; MEMORY_SIZE],
    pub(crate) vram_bank1: &'a [u8],
    pub(crate) palettes: &'a CgbPalettes,
    pub(crate) interrupts: &'a mut InterruptController,
    pub(crate) cgb: bool,
}

/// What happened during one [`Video::tick`].
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub(crate) struct VideoEvents {
    pub(crate) frame_completed: bool,
    /// A visible line entered HBlank; drives HBlank DMA.
    pub(crate) hblank_started: bool,
}

/// Scanline and mode state machine with the line renderer.
#[derive(Clone, Debug, Eq, PartialEq)]
pub(crate) struct Video {
    mode: LcdMode,
    /// Cycles spent in the current mode (or VBlank line).
    mode_cycles: u32,
    /// Cycles since the last reported frame while the screen is off.
    off_cycles: u32,
    ly: u8,
    /// Lines of the window drawn so far this frame.
    window_line: u8,
    screen_enabled: bool,
    /// Remaining screen-on latency; 0 when no enable is pending.
    enable_delay: u32,
    framebuffer: Vec<u16>,
    /// Background color index per pixel, with the CGB priority flag.
    color_cache: Vec<u8>,
    /// X coordinate of the sprite owning each pixel.
    sprite_x_cache: Vec<i16>,
}

impl Default for Video {
    fn default() -> Self {
        Self {
            mode: LcdMode::OamScan,
            mode_cycles: 0,
            off_cycles: 0,
            ly: 0,
            window_line: 0,
            screen_enabled: true,
            enable_delay: 0,
            framebuffer: vec![0; FRAMEBUFFER_LEN],
            color_cache: vec![0; FRAMEBUFFER_LEN],
            sprite_x_cache: vec![render::NO_SPRITE; FRAMEBUFFER_LEN],
        }
    }
}

impl Video {
    pub(crate) fn mode(&self) -> LcdMode {
        self.mode
    }

    pub(crate) fn ly(&self) -> u8 {
        self.ly
    }

    pub(crate) fn framebuffer(&self) -> &[u16] {
        &self.framebuffer
    }

    /// Whether the CPU may access OAM right now.
    pub(crate) fn oam_accessible(&self) -> bool {
        !matches!(self.mode, LcdMode::OamScan | LcdMode::PixelTransfer)
    }

    /// Whether the CPU may access VRAM right now.
    pub(crate) fn vram_accessible(&self) -> bool {
        self.mode != LcdMode::PixelTransfer
    }

    /// Advance by `cycles` video clocks.
    pub(crate) fn tick(&mut self, cycles: u32, ctx: &mut VideoContext<'_>) -> VideoEvents {
        let mut events = VideoEvents::default();

        if !self.screen_enabled {
            self.off_cycles += cycles;
            if self.off_cycles >= CYCLES_PER_FRAME {
                self.off_cycles -= CYCLES_PER_FRAME;
                events.frame_completed = true;
            }
            if self.enable_delay > 0 {
                self.enable_delay = self.enable_delay.saturating_sub(cycles);
                if self.enable_delay == 0 {
                    self.start_screen(ctx);
                }
            }
            return events;
        }

        self.mode_cycles += cycles;
        loop {
            match self.mode {
                LcdMode::OamScan if self.mode_cycles >= OAM_SCAN_CYCLES => {
                    self.mode_cycles -= OAM_SCAN_CYCLES;
                    self.set_mode(LcdMode::PixelTransfer, ctx);
                }
                LcdMode::PixelTransfer if self.mode_cycles >= PIXEL_TRANSFER_CYCLES => {
                    self.mode_cycles -= PIXEL_TRANSFER_CYCLES;
                    self.set_mode(LcdMode::HBlank, ctx);
                    self.stat_interrupt(LcdStatus::HBLANK_INTERRUPT, ctx);
                    events.hblank_started = true;
                }
                LcdMode::HBlank if self.mode_cycles >= HBLANK_CYCLES => {
                    self.mode_cycles -= HBLANK_CYCLES;
                    self.render_line(ctx);
                    self.set_ly(self.ly + 1, ctx);
                    if self.ly == VISIBLE_LINES {
                        self.set_mode(LcdMode::VBlank, ctx);
                        ctx.interrupts.request(Interrupt::VBlank);
                        self.stat_interrupt(LcdStatus::VBLANK_INTERRUPT, ctx);
                        events.frame_completed = true;
                    } else {
                        self.enter_oam_scan(ctx);
                    }
                }
                LcdMode::VBlank if self.mode_cycles >= LINE_CYCLES => {
                    self.mode_cycles -= LINE_CYCLES;
                    if self.ly + 1 == TOTAL_LINES {
                        self.window_line = 0;
                        self.set_ly(0, ctx);
                        self.enter_oam_scan(ctx);
                    } else {
                        self.set_ly(self.ly + 1, ctx);
                    }
                }
                _ => break,
            }
        }

        events
    }

    fn enter_oam_scan(&mut self, ctx: &mut VideoContext<'_>) {
        self.set_mode(LcdMode::OamScan, ctx);
        self.stat_interrupt(LcdStatus::OAM_INTERRUPT, ctx);
    }

    fn set_mode(&mut self, mode: LcdMode, ctx: &mut VideoContext<'_>) {
        self.mode = mode;
        let stat = ctx.memory[STAT] & !LcdStatus::MODE.bits();
        ctx.memory[STAT] = stat | mode as u8;
    }

    fn set_ly(&mut self, ly: u8, ctx: &mut VideoContext<'_>) {
        self.ly = ly;
        ctx.memory[LY] = ly;
        self.compare_ly(ctx);
    }

    /// Update the coincidence flag and request STAT on a match if enabled.
    pub(crate) fn compare_ly(&mut self, ctx: &mut VideoContext<'_>) {
        let mut stat = LcdStatus::from_bits_retain(ctx.memory[STAT]);
        if self.screen_enabled && self.ly == ctx.memory[LYC] {
            stat.insert(LcdStatus::LYC_EQUAL);
            if stat.contains(LcdStatus::LYC_INTERRUPT) {
                ctx.interrupts.request(Interrupt::LcdStat);
            }
        } else {
            stat.remove(LcdStatus::LYC_EQUAL);
        }
        ctx.memory[STAT] = stat.bits();
    }

    fn stat_interrupt(&self, source: LcdStatus, ctx: &mut VideoContext<'_>) {
        if LcdStatus::from_bits_retain(ctx.memory[STAT]).contains(source) {
            ctx.interrupts.request(Interrupt::LcdStat);
        }
    }

    /// React to a CPU write of LCDC. `previous` is the value before the write.
    pub(crate) fn write_lcdc(&mut self, previous: u8, ctx: &mut VideoContext<'_>) {
        let was_on = LcdControl::from_bits_retain(previous).contains(LcdControl::LCD_ENABLE);
        let is_on = LcdControl::from_bits_retain(ctx.memory[LCDC]).contains(LcdControl::LCD_ENABLE);

        if was_on && !is_on {
            log::debug!("GB PPU: LCD off at LY={}", self.ly);
            self.screen_enabled = false;
            self.enable_delay = 0;
            self.off_cycles = 0;
            self.mode_cycles = 0;
            self.window_line = 0;
            self.ly = 0;
            ctx.memory[LY] = 0;
            self.set_mode(LcdMode::HBlank, ctx);
            self.compare_ly(ctx);
            self.framebuffer.fill(0);
        } else if !was_on && is_on {
            log::debug!("GB PPU: LCD on, {SCREEN_ON_DELAY} cycle delay");
            self.enable_delay = SCREEN_ON_DELAY;
        }
    }

    fn start_screen(&mut self, ctx: &mut VideoContext<'_>) {
        self.screen_enabled = true;
        self.mode_cycles = 0;
        self.window_line = 0;
        self.set_ly(0, ctx);
        self.enter_oam_scan(ctx);
    }
}
