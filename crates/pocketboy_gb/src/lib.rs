pub mod config;
pub mod cpu;
pub mod error;
pub mod machine;

pub use config::{CoreConfig, ModelPreference, MulticartDetection};
pub use error::{HeaderError, LoadError};
pub use machine::{Button, Cartridge, CartridgeHeader, GameBoy, MapperKind, Model, SaveState};

/// Logical screen width in pixels.
pub const SCREEN_WIDTH: usize = 160;
/// Logical screen height in pixels.
pub const SCREEN_HEIGHT: usize = 144;
/// Number of entries in a framebuffer passed to [`GameBoy::run_to_vblank`].
pub const FRAMEBUFFER_LEN: usize = SCREEN_WIDTH * SCREEN_HEIGHT;
/// CPU clock cycles in one full video frame (154 lines of 456 cycles).
pub const CYCLES_PER_FRAME: u32 = 70_224;
/// Base CPU clock in Hz (single speed).
pub const CPU_CLOCK_HZ: u32 = 4_194_304;
