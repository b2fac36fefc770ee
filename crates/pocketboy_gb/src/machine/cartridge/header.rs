use crate::error::{HeaderError, LoadError};

/// Offset of the first header byte covered by the checksum (the title).
const TITLE_START: usize = 0x0134;
const TITLE_LEN: usize = 16;
const CGB_FLAG: usize = 0x0143;
const SGB_FLAG: usize = 0x0146;
const CARTRIDGE_TYPE: usize = 0x0147;
const ROM_SIZE: usize = 0x0148;
const RAM_SIZE: usize = 0x0149;
const VERSION: usize = 0x014C;
const HEADER_CHECKSUM: usize = 0x014D;
/// Images shorter than this cannot hold a complete header.
const HEADER_END: usize = 0x0150;

/// Nintendo logo bitmap start; repeated per game on multicart images.
pub(super) const LOGO_START: usize = 0x0104;
pub(super) const LOGO_LEN: usize = 0x30;

/// Memory bank controller family selected by the cartridge type byte.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum MapperKind {
    RomOnly,
    Mbc1,
    /// MBC1 wired for multi-game collections.
    Mbc1Multicart,
    Mbc2,
    Mbc3,
    Mbc5,
}

impl TryFrom<u8> for MapperKind {
    type Error = u8;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        // https://gbdev.io/pandocs/The_Cartridge_Header.html#0147--cartridge-type
        match value {
            0x00 | 0x08 | 0x09 => Ok(Self::RomOnly),
            0x01..=0x03 => Ok(Self::Mbc1),
            0x05 | 0x06 => Ok(Self::Mbc2),
            0x0F..=0x13 => Ok(Self::Mbc3),
            0x19..=0x1E => Ok(Self::Mbc5),
            _ => Err(value),
        }
    }
}

/// Metadata decoded from the fixed header area at `$0134-$014F`.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct CartridgeHeader {
    pub title: String,
    pub cgb_flag: u8,
    pub sgb_flag: u8,
    pub cartridge_type: u8,
    pub rom_size_code: u8,
    pub ram_size_code: u8,
    pub version: u8,
    pub header_checksum: u8,
    /// Whether the stored checksum matches the header bytes.
    pub checksum_valid: bool,
}

impl CartridgeHeader {
    pub fn parse(rom: &[u8]) -> Result<Self, HeaderError> {
        if rom.len() < HEADER_END {
            return Err(HeaderError::RomTooSmall { len: rom.len() });
        }

        let title_bytes = &rom[TITLE_START..TITLE_START + TITLE_LEN];
        let title_end = title_bytes
            .iter()
            .position(|&b| b == 0)
            .unwrap_or(TITLE_LEN);
        let title = title_bytes[..title_end]
            .iter()
            .map(|&b| if b.is_ascii_graphic() || b == b' ' { b as char } else { '?' })
            .collect::<String>()
            .trim_end()
            .to_string();

        Ok(Self {
            title,
            cgb_flag: rom[CGB_FLAG],
            sgb_flag: rom[SGB_FLAG],
            cartridge_type: rom[CARTRIDGE_TYPE],
            rom_size_code: rom[ROM_SIZE],
            ram_size_code: rom[RAM_SIZE],
            version: rom[VERSION],
            header_checksum: rom[HEADER_CHECKSUM],
            checksum_valid: checksum_matches(rom),
        })
    }

    /// Mapper family for the type byte, before multicart detection.
    pub fn mapper(&self) -> Result<MapperKind, LoadError> {
        MapperKind::try_from(self.cartridge_type).map_err(LoadError::UnsupportedMapperType)
    }

    /// Whether the game can use CGB features (`$80` or `$C0`).
    pub fn supports_cgb(&self) -> bool {
        self.cgb_flag & 0x80 != 0
    }

    pub fn cgb_only(&self) -> bool {
        self.cgb_flag == 0xC0
    }

    pub fn supports_sgb(&self) -> bool {
        self.sgb_flag == 0x03
    }

    /// Number of 8 KiB external RAM banks declared by the header.
    pub fn ram_banks(&self) -> usize {
        // https://gbdev.io/pandocs/The_Cartridge_Header.html#0149--ram-size
        match self.ram_size_code {
            0x01 | 0x02 => 1,
            0x03 => 4,
            0x04 => 16,
            0x05 => 8,
            _ => 0,
        }
    }

    /// Declared external RAM in bytes. Code `$01` is a 2 KiB chip.
    pub fn ram_size(&self) -> usize {
        match self.ram_size_code {
            0x01 => 0x800,
            _ => self.ram_banks() * 0x2000,
        }
    }

    pub fn has_battery(&self) -> bool {
        matches!(
            self.cartridge_type,
            0x03 | 0x06 | 0x09 | 0x0D | 0x0F | 0x10 | 0x13 | 0x1B | 0x1E | 0xFF
        )
    }

    pub fn has_rtc(&self) -> bool {
        matches!(self.cartridge_type, 0x0F | 0x10)
    }
}

/// `(sum of $0134..=$014D) + 25` must be a multiple of 256.
pub(super) fn checksum_matches(rom: &[u8]) -> bool {
    rom.get(TITLE_START..=HEADER_CHECKSUM)
        .map(|bytes| {
            let sum = bytes.iter().fold(0u8, |acc, &b| acc.wrapping_add(b));
            sum.wrapping_add(25) == 0
        })
        .unwrap_or(false)
}

/// Compute the byte `$014D` must hold for the header to validate.
#[cfg(test)]
pub(crate) fn compute_header_checksum(rom: &[u8]) -> u8 {
    rom[TITLE_START..HEADER_CHECKSUM]
        .iter()
        .fold(0u8, |acc, &b| acc.wrapping_sub(b).wrapping_sub(1))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn header_image() -> Vec<u8> {
        let mut rom = vec![0u8; 0x8000];
        rom[TITLE_START..TITLE_START + 8].copy_from_slice(b"POCKETGB");
        rom[CARTRIDGE_TYPE] = 0x03;
        rom[ROM_SIZE] = 0x00;
        rom[RAM_SIZE] = 0x02;
        rom[VERSION] = 0x01;
        rom[HEADER_CHECKSUM] = compute_header_checksum(&rom);
        rom
    }

    #[test]
    fn parses_fields() {
        let header = CartridgeHeader::parse(&header_image()).unwrap();
        assert_eq!(header.title, "POCKETGB");
        assert_eq!(header.mapper(), Ok(MapperKind::Mbc1));
        assert_eq!(header.ram_banks(), 1);
        assert_eq!(header.ram_size(), 0x2000);
        assert_eq!(header.version, 1);
        assert!(header.has_battery());
        assert!(!header.supports_cgb());
        assert!(header.checksum_valid);
    }

    #[test]
    fn checksum_breaks_on_any_flipped_byte() {
        let rom = header_image();
        assert!(checksum_matches(&rom));
        for offset in TITLE_START..=HEADER_CHECKSUM {
            let mut corrupted = rom.clone();
            corrupted[offset] ^= 0x01;
            assert!(!checksum_matches(&corrupted), "offset {offset:#06X}");
        }
    }

    #[test]
    fn rejects_truncated_image() {
        assert_eq!(
            CartridgeHeader::parse(&[0u8; 0x100]),
            Err(HeaderError::RomTooSmall { len: 0x100 })
        );
    }

    #[test]
    fn unknown_type_is_unsupported() {
        let mut rom = header_image();
        rom[CARTRIDGE_TYPE] = 0x22;
        let header = CartridgeHeader::parse(&rom).unwrap();
        assert_eq!(header.mapper(), Err(LoadError::UnsupportedMapperType(0x22)));
    }
}
