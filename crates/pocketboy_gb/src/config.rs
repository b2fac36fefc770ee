use typed_builder::TypedBuilder;

/// Which hardware model the core should emulate.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub enum ModelPreference {
    /// Pick CGB when the cartridge header advertises CGB support.
    #[default]
    Auto,
    ForceDmg,
    ForceCgb,
}

/// How MBC1 cartridges are checked for the multi-game wiring.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub enum MulticartDetection {
    /// 1 MiB MBC1 image whose second game (bank 0x10) carries its own header logo.
    #[default]
    Auto,
    Never,
    Always,
}

/// In-process options for a [`crate::GameBoy`] instance.
///
/// ```
/// use pocketboy_gb::{CoreConfig, ModelPreference};
///
/// let config = CoreConfig::builder()
///     .model(ModelPreference::ForceDmg)
///     .strict_header_checksum(true)
///     .build();
/// assert_eq!(config.audio_sample_rate, 44_100);
/// ```
#[derive(Clone, Debug, Eq, PartialEq, TypedBuilder)]
pub struct CoreConfig {
    #[builder(default)]
    pub model: ModelPreference,
    /// Reject ROMs whose header checksum does not match instead of only warning.
    #[builder(default = false)]
    pub strict_header_checksum: bool,
    #[builder(default)]
    pub multicart: MulticartDetection,
    /// Rate used to turn elapsed cycles into the sample count hint returned
    /// by `run_to_vblank`.
    #[builder(default = 44_100)]
    pub audio_sample_rate: u32,
}

impl Default for CoreConfig {
    fn default() -> Self {
        Self::builder().build()
    }
}
