use thiserror::Error;

/// Errors raised while parsing a cartridge header.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum HeaderError {
    #[error("ROM image is {len} bytes, too small to contain a cartridge header")]
    RomTooSmall { len: usize },
}

/// Errors surfaced to the caller of the core's lifecycle operations.
///
/// Invalid memory accesses never show up here: they resolve to a sentinel
/// read or a dropped write and are only logged.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LoadError {
    #[error("invalid cartridge header: {0}")]
    Header(#[from] HeaderError),
    #[error("unsupported cartridge mapper type 0x{0:02X}")]
    UnsupportedMapperType(u8),
    #[error("cartridge header checksum does not match")]
    HeaderChecksumInvalid,
    #[error("no cartridge is loaded")]
    NoCartridge,
    #[error("battery RAM image is {actual} bytes, expected {expected}")]
    BatteryRamSize { expected: usize, actual: usize },
    #[error("save state was captured from a different cartridge")]
    StateMismatch,
}
