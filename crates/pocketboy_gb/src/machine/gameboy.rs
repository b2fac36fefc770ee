use std::sync::Arc;

use crate::config::{CoreConfig, ModelPreference};
use crate::cpu::{Cpu, Interrupt};
use crate::error::LoadError;
use crate::{CPU_CLOCK_HZ, FRAMEBUFFER_LEN};

use super::cartridge::{Cartridge, CartridgeHeader, MapperKind};
use super::joypad::Button;
use super::state::SaveState;
use super::{GameBoyBus, Model};

/// A complete Game Boy: CPU plus the bus that owns every other component.
///
/// The machine starts idle with no cartridge. [`GameBoy::load_rom`] inserts
/// one and resets into the post-boot state, after which
/// [`GameBoy::run_to_vblank`] drives emulation one frame at a time.
#[derive(Debug)]
pub struct GameBoy {
    pub cpu: Cpu,
    pub(crate) bus: GameBoyBus,
    config: CoreConfig,
    /// Sub-sample remainder of the sample hint, in half-cycle units.
    sample_remainder: u64,
}

impl Default for GameBoy {
    fn default() -> Self {
        Self::new()
    }
}

impl GameBoy {
    pub fn new() -> Self {
        Self::with_config(CoreConfig::default())
    }

    pub fn with_config(config: CoreConfig) -> Self {
        let model = match config.model {
            ModelPreference::ForceCgb => Model::Cgb,
            ModelPreference::Auto | ModelPreference::ForceDmg => Model::Dmg,
        };
        let mut cpu = Cpu::new();
        cpu.reset(model.is_cgb());
        Self {
            cpu,
            bus: GameBoyBus::new(model),
            config,
            sample_remainder: 0,
        }
    }

    pub fn config(&self) -> &CoreConfig {
        &self.config
    }

    /// Drop the cartridge and return to the idle power-on state.
    pub fn init(&mut self) {
        *self = Self::with_config(self.config.clone());
    }

    /// Parse `rom`, pick the bank controller and model, and reset into the
    /// post-boot state. On error the machine is left exactly as it was.
    pub fn load_rom(&mut self, rom: &[u8]) -> Result<(), LoadError> {
        let cartridge = Cartridge::load_from_bytes(rom)?;
        if !cartridge.checksum_valid() {
            if self.config.strict_header_checksum {
                return Err(LoadError::HeaderChecksumInvalid);
            }
            log::warn!(
                "GB ROM: header checksum mismatch for \"{}\" (stored {:02X}), loading anyway",
                cartridge.title(),
                cartridge.header().header_checksum
            );
        }
        let kind = cartridge.mapper(self.config.multicart)?;
        let model = select_model(self.config.model, cartridge.header());

        log::info!(
            "GB ROM: loaded \"{}\" mapper={:?} rom={} KiB ram={} KiB model={:?}",
            cartridge.title(),
            kind,
            cartridge.rom_banks() * 16,
            cartridge.header().ram_size() / 1024,
            model
        );

        let mut bus = GameBoyBus::new(model);
        bus.insert_cartridge(Arc::new(cartridge), kind);
        self.bus = bus;
        self.cpu.reset(model.is_cgb());
        self.sample_remainder = 0;
        Ok(())
    }

    /// Reset to the post-boot state, keeping the cartridge and its RAM.
    ///
    /// `force_model` overrides the configured model preference for this
    /// reset only.
    pub fn reset(&mut self, force_model: Option<Model>) {
        let loaded = self.bus.cartridge().cloned();
        let model = force_model.unwrap_or_else(|| match &loaded {
            Some(loaded) => select_model(self.config.model, loaded.cartridge.header()),
            None => self.bus.model(),
        });

        let mut bus = GameBoyBus::new(model);
        if let Some(loaded) = loaded {
            let kind = loaded.rule.kind();
            let ram = loaded.rule.battery_ram();
            bus.insert_cartridge(loaded.cartridge, kind);
            if let Err(err) = bus.load_battery_ram(&ram) {
                log::warn!("GB BUS: cartridge RAM not carried across reset: {err}");
            }
        }
        self.bus = bus;
        self.cpu.reset(model.is_cgb());
        self.sample_remainder = 0;
        log::info!("GB CPU: reset as {model:?}");
    }

    pub fn is_loaded(&self) -> bool {
        self.bus.cartridge().is_some()
    }

    pub fn model(&self) -> Model {
        self.bus.model()
    }

    pub fn cartridge(&self) -> Option<&Cartridge> {
        self.bus.cartridge().map(|loaded| loaded.cartridge.as_ref())
    }

    pub fn mapper(&self) -> Option<MapperKind> {
        self.bus.cartridge().map(|loaded| loaded.rule.kind())
    }

    pub fn has_battery(&self) -> bool {
        self.cartridge().is_some_and(Cartridge::has_battery)
    }

    pub fn key_pressed(&mut self, button: Button) {
        if self.bus.joypad.press(button) {
            self.bus.interrupts.request(Interrupt::Joypad);
        }
        self.cpu.wake_from_stop();
    }

    pub fn key_released(&mut self, button: Button) {
        self.bus.joypad.release(button);
    }

    /// Execute one CPU step and return the cycles it took.
    pub fn step(&mut self) -> u32 {
        self.cpu.tick(&mut self.bus)
    }

    /// Run until the video unit completes a frame, copy it into `framebuffer`
    /// and return how many audio samples the elapsed time corresponds to at
    /// the configured sample rate.
    ///
    /// Without a cartridge nothing executes and a blank frame is produced.
    pub fn run_to_vblank(&mut self, framebuffer: &mut [u16]) -> usize {
        if !self.is_loaded() {
            framebuffer.fill(0);
            return self.sample_hint(2 * u64::from(crate::CYCLES_PER_FRAME));
        }

        self.bus.take_frame_completed();
        let mut half_cycles = 0u64;
        loop {
            let double_speed = self.bus.is_double_speed();
            let cycles = u64::from(self.cpu.tick(&mut self.bus));
            half_cycles += if double_speed { cycles } else { 2 * cycles };
            if self.bus.take_frame_completed() {
                break;
            }
        }

        let len = framebuffer.len().min(FRAMEBUFFER_LEN);
        framebuffer[..len].copy_from_slice(&self.bus.video.framebuffer()[..len]);
        self.sample_hint(half_cycles)
    }

    fn sample_hint(&mut self, half_cycles: u64) -> usize {
        let scaled = half_cycles * u64::from(self.config.audio_sample_rate) + self.sample_remainder;
        let per_sample = 2 * u64::from(CPU_CLOCK_HZ);
        self.sample_remainder = scaled % per_sample;
        (scaled / per_sample) as usize
    }

    /// The last completed frame: 2-bit shades on DMG, BGR555 on CGB.
    pub fn framebuffer(&self) -> &[u16] {
        self.bus.video.framebuffer()
    }

    /// Bytes sent out over the link port so far.
    pub fn serial_output(&self) -> &[u8] {
        &self.bus.serial.output
    }

    pub fn battery_ram(&self) -> Result<Vec<u8>, LoadError> {
        self.bus.battery_ram()
    }

    pub fn load_battery_ram(&mut self, bytes: &[u8]) -> Result<(), LoadError> {
        self.bus.load_battery_ram(bytes)?;
        log::info!("GB ROM: restored {} bytes of battery RAM", bytes.len());
        Ok(())
    }

    pub fn save_state(&self) -> SaveState {
        SaveState {
            cpu: self.cpu.clone(),
            bus: self.bus.clone(),
        }
    }

    /// Restore a snapshot taken from the same ROM.
    pub fn load_state(&mut self, state: &SaveState) -> Result<(), LoadError> {
        let same_rom = match (self.bus.cartridge(), state.bus.cartridge()) {
            (None, None) => true,
            (Some(current), Some(saved)) => {
                Arc::ptr_eq(&current.cartridge, &saved.cartridge)
                    || current.cartridge.rom() == saved.cartridge.rom()
            }
            _ => false,
        };
        if !same_rom {
            return Err(LoadError::StateMismatch);
        }

        self.cpu = state.cpu.clone();
        self.bus = state.bus.clone();
        log::info!("GB CPU: state restored at PC={:04X}", self.cpu.regs.pc);
        Ok(())
    }
}

fn select_model(preference: ModelPreference, header: &CartridgeHeader) -> Model {
    match preference {
        ModelPreference::ForceDmg => Model::Dmg,
        ModelPreference::ForceCgb => Model::Cgb,
        ModelPreference::Auto if header.supports_cgb() => Model::Cgb,
        ModelPreference::Auto => Model::Dmg,
    }
}
