use std::sync::Arc;

use super::cartridge::{BankRule, Cartridge, MapperKind};
use super::interrupts::InterruptController;
use super::joypad::Joypad;
use super::serial::Serial;
use super::timer::Timer;
use super::video::{CgbPalettes, Video, VideoContext};
use super::{Model, MEMORY_SIZE};
use crate::error::LoadError;

mod dma;
mod init;
mod mmio;
mod traits;

use dma::Hdma;

/// A cartridge together with the bank controller driving it.
#[derive(Clone, Debug, Eq, PartialEq)]
pub(crate) struct LoadedCartridge {
    pub(crate) cartridge: Arc<Cartridge>,
    pub(crate) rule: BankRule,
}

/// CGB-only banks and registers.
#[derive(Clone, Debug, Eq, PartialEq)]
pub(crate) struct CgbState {
    vram_bank1: Vec<u8>,
    /// VBK: 0 or 1.
    vram_bank: u8,
    /// WRAM banks 1-7, 4 KiB each.
    wram: Vec<u8>,
    /// SVBK: 1-7.
    wram_bank: u8,
    palettes: CgbPalettes,
    /// KEY1 bit 0: a speed switch happens on the next STOP.
    key1_armed: bool,
    double_speed: bool,
    /// Odd CPU cycle left over when halving for the video clock.
    video_subcycle: u32,
    hdma: Hdma,
}

impl Default for CgbState {
    fn default() -> Self {
        Self {
            vram_bank1: vec![0; 0x2000],
            vram_bank: 0,
            wram: vec![0; 7 * 0x1000],
            wram_bank: 1,
            palettes: CgbPalettes::default(),
            key1_armed: false,
            double_speed: false,
            video_subcycle: 0,
            hdma: Hdma::default(),
        }
    }
}

/// The memory bus: address decoding plus every peripheral the CPU reaches
/// through it.
#[derive(Clone, Debug, Eq, PartialEq)]
pub(crate) struct GameBoyBus {
    pub(crate) memory: Box<[u8; MEMORY_SIZE]>,
    model: Model,
    cartridge: Option<LoadedCartridge>,
    pub(crate) interrupts: InterruptController,
    pub(crate) timer: Timer,
    pub(crate) serial: Serial,
    pub(crate) joypad: Joypad,
    pub(crate) video: Video,
    cgb: CgbState,
    /// Set when the video unit finishes a frame; cleared by the consumer.
    frame_completed: bool,
}

impl GameBoyBus {
    /// A bus in the post-boot state for `model`, with no cartridge.
    pub(crate) fn new(model: Model) -> Self {
        let mut bus = Self {
            memory: Box::new([0; MEMORY_SIZE]),
            model,
            cartridge: None,
            interrupts: InterruptController::default(),
            timer: Timer::default(),
            serial: Serial::default(),
            joypad: Joypad::default(),
            video: Video::default(),
            cgb: CgbState::default(),
            frame_completed: false,
        };
        bus.apply_initial_io_state();
        bus
    }

    pub(crate) fn model(&self) -> Model {
        self.model
    }

    pub(crate) fn insert_cartridge(&mut self, cartridge: Arc<Cartridge>, kind: MapperKind) {
        let rule = BankRule::new(kind, &cartridge);
        self.cartridge = Some(LoadedCartridge { cartridge, rule });
    }

    pub(crate) fn cartridge(&self) -> Option<&LoadedCartridge> {
        self.cartridge.as_ref()
    }

    pub(crate) fn battery_ram(&self) -> Result<Vec<u8>, LoadError> {
        let loaded = self.cartridge.as_ref().ok_or(LoadError::NoCartridge)?;
        Ok(loaded.rule.battery_ram())
    }

    pub(crate) fn load_battery_ram(&mut self, bytes: &[u8]) -> Result<(), LoadError> {
        let loaded = self.cartridge.as_mut().ok_or(LoadError::NoCartridge)?;
        loaded.rule.load_battery_ram(bytes)
    }

    pub(crate) fn is_double_speed(&self) -> bool {
        self.cgb.double_speed
    }

    /// Returns and clears the frame-completed latch.
    pub(crate) fn take_frame_completed(&mut self) -> bool {
        std::mem::take(&mut self.frame_completed)
    }

    /// Run `f` with the video unit and the state it borrows from the bus.
    pub(super) fn with_video<R>(&mut self, f: impl FnOnce(&mut Video, &mut VideoContext<'_>) -> R) -> R {
        let mut ctx = VideoContext {
            memory: &mut *self.memory,
            vram_bank1: &self.cgb.vram_bank1,
            palettes: &self.cgb.palettes,
            interrupts: &mut self.interrupts,
            cgb: self.model.is_cgb(),
        };
        f(&mut self.video, &mut ctx)
    }

    /// Advance the video unit. In double speed it sees half the CPU cycles.
    fn tick_video(&mut self, cycles: u32) {
        let video_cycles = if self.cgb.double_speed {
            let total = self.cgb.video_subcycle + cycles;
            self.cgb.video_subcycle = total & 1;
            total / 2
        } else {
            cycles
        };

        let events = self.with_video(|video, ctx| video.tick(video_cycles, ctx));
        if events.hblank_started {
            self.hdma_hblank_block();
        }
        if events.frame_completed {
            self.frame_completed = true;
        }
    }
}
