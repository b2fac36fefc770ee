mod header;
mod mbc1;
mod mbc2;
mod mbc3;
mod mbc5;
mod multicart;
mod rom_only;

#[cfg(test)]
pub(crate) use header::compute_header_checksum;
pub use header::{CartridgeHeader, MapperKind};

use header::{LOGO_LEN, LOGO_START};
use mbc1::Mbc1;
use mbc2::Mbc2;
use mbc3::Mbc3;
use mbc5::Mbc5;
use multicart::Mbc1Multicart;
use rom_only::RomOnly;

use crate::config::MulticartDetection;
use crate::error::{HeaderError, LoadError};

const ROM_BANK_SIZE: usize = 0x4000;
const RAM_BANK_SIZE: usize = 0x2000;
/// Size of a multicart image: four 256 KiB games.
const MULTICART_ROM_SIZE: usize = 0x10_0000;
/// Bank holding the second game's header on a multicart image.
const MULTICART_SECOND_GAME_BANK: usize = 0x10;

/// An immutable ROM image plus its decoded header.
#[derive(Debug, Eq, PartialEq)]
pub struct Cartridge {
    rom: Vec<u8>,
    header: CartridgeHeader,
    rom_banks: usize,
}

impl Cartridge {
    /// Copy `buffer` and decode its header. A bad checksum is recorded in
    /// the header, not reported as an error.
    pub fn load_from_bytes(buffer: &[u8]) -> Result<Self, HeaderError> {
        let header = CartridgeHeader::parse(buffer)?;
        let rom_banks = buffer
            .len()
            .div_ceil(ROM_BANK_SIZE)
            .max(2)
            .next_power_of_two();

        Ok(Self {
            rom: buffer.to_vec(),
            header,
            rom_banks,
        })
    }

    pub fn header(&self) -> &CartridgeHeader {
        &self.header
    }

    pub fn title(&self) -> &str {
        &self.header.title
    }

    pub fn rom(&self) -> &[u8] {
        &self.rom
    }

    /// Number of 16 KiB ROM banks, rounded up to a power of two.
    pub fn rom_banks(&self) -> usize {
        self.rom_banks
    }

    pub fn checksum_valid(&self) -> bool {
        self.header.checksum_valid
    }

    pub fn has_battery(&self) -> bool {
        self.header.has_battery()
    }

    /// Resolve the bank controller, including the MBC1 multicart variant.
    pub fn mapper(&self, detection: MulticartDetection) -> Result<MapperKind, LoadError> {
        let kind = self.header.mapper()?;
        if kind != MapperKind::Mbc1 {
            return Ok(kind);
        }
        let multicart = match detection {
            MulticartDetection::Never => false,
            MulticartDetection::Always => true,
            MulticartDetection::Auto => self.looks_like_multicart(),
        };
        Ok(if multicart {
            MapperKind::Mbc1Multicart
        } else {
            MapperKind::Mbc1
        })
    }

    /// 1 MiB MBC1 image whose second game carries its own logo.
    fn looks_like_multicart(&self) -> bool {
        if self.rom.len() != MULTICART_ROM_SIZE {
            return false;
        }
        let second = MULTICART_SECOND_GAME_BANK * ROM_BANK_SIZE + LOGO_START;
        let logo = &self.rom[LOGO_START..LOGO_START + LOGO_LEN];
        self.rom.get(second..second + LOGO_LEN) == Some(logo)
    }

    /// Byte at `addr & 0x3FFF` of `bank`; out-of-image reads give `0xFF`.
    #[inline]
    pub(super) fn rom_byte(&self, bank: usize, addr: u16) -> u8 {
        let index = bank * ROM_BANK_SIZE + (addr as usize & (ROM_BANK_SIZE - 1));
        self.rom.get(index).copied().unwrap_or(0xFF)
    }
}

/// Banked external cartridge RAM sized to what the header declares.
#[derive(Clone, Debug, Eq, PartialEq)]
pub(super) struct ExternalRam {
    data: Vec<u8>,
    banks: usize,
}

impl ExternalRam {
    fn new(header: &CartridgeHeader) -> Self {
        Self {
            data: vec![0xFF; header.ram_size()],
            banks: header.ram_banks(),
        }
    }

    fn is_present(&self) -> bool {
        !self.data.is_empty()
    }

    fn len(&self) -> usize {
        self.data.len()
    }

    /// Mask applied to a selected RAM bank index.
    fn bank_mask(&self) -> usize {
        self.banks.saturating_sub(1)
    }

    fn read(&self, bank: usize, addr: u16) -> u8 {
        let index = bank * RAM_BANK_SIZE + (addr as usize & (RAM_BANK_SIZE - 1));
        self.data.get(index).copied().unwrap_or(0xFF)
    }

    fn write(&mut self, bank: usize, addr: u16, value: u8) {
        let index = bank * RAM_BANK_SIZE + (addr as usize & (RAM_BANK_SIZE - 1));
        if let Some(cell) = self.data.get_mut(index) {
            *cell = value;
        }
    }

    /// Contents padded with `0xFF` to `len` bytes.
    fn dump_padded(&self, len: usize) -> Vec<u8> {
        let mut out = self.data.clone();
        out.resize(len.max(self.data.len()), 0xFF);
        out.truncate(len);
        out
    }

    /// Restore from a dump produced by [`ExternalRam::dump_padded`].
    fn restore(&mut self, bytes: &[u8]) {
        let len = self.data.len().min(bytes.len());
        self.data[..len].copy_from_slice(&bytes[..len]);
    }
}

/// The active bank-switching controller.
///
/// Exactly one variant is live; loading a new ROM replaces the value.
#[derive(Clone, Debug, Eq, PartialEq)]
pub(crate) enum BankRule {
    RomOnly(RomOnly),
    Mbc1(Mbc1),
    Mbc1Multicart(Mbc1Multicart),
    Mbc2(Mbc2),
    Mbc3(Mbc3),
    Mbc5(Mbc5),
}

impl BankRule {
    pub(crate) fn new(kind: MapperKind, cartridge: &Cartridge) -> Self {
        let header = cartridge.header();
        let rom_banks = cartridge.rom_banks();
        match kind {
            MapperKind::RomOnly => Self::RomOnly(RomOnly::new(header)),
            MapperKind::Mbc1 => Self::Mbc1(Mbc1::new(header, rom_banks)),
            MapperKind::Mbc1Multicart => Self::Mbc1Multicart(Mbc1Multicart::new(rom_banks)),
            MapperKind::Mbc2 => Self::Mbc2(Mbc2::new(rom_banks)),
            MapperKind::Mbc3 => Self::Mbc3(Mbc3::new(header, rom_banks)),
            MapperKind::Mbc5 => Self::Mbc5(Mbc5::new(header, rom_banks)),
        }
    }

    pub(crate) fn kind(&self) -> MapperKind {
        match self {
            BankRule::RomOnly(_) => MapperKind::RomOnly,
            BankRule::Mbc1(_) => MapperKind::Mbc1,
            BankRule::Mbc1Multicart(_) => MapperKind::Mbc1Multicart,
            BankRule::Mbc2(_) => MapperKind::Mbc2,
            BankRule::Mbc3(_) => MapperKind::Mbc3,
            BankRule::Mbc5(_) => MapperKind::Mbc5,
        }
    }

    /// Read from `$0000-$7FFF`.
    pub(crate) fn rom_read(&self, cartridge: &Cartridge, addr: u16) -> u8 {
        match self {
            BankRule::RomOnly(m) => m.rom_read(cartridge, addr),
            BankRule::Mbc1(m) => m.rom_read(cartridge, addr),
            BankRule::Mbc1Multicart(m) => m.rom_read(cartridge, addr),
            BankRule::Mbc2(m) => m.rom_read(cartridge, addr),
            BankRule::Mbc3(m) => m.rom_read(cartridge, addr),
            BankRule::Mbc5(m) => m.rom_read(cartridge, addr),
        }
    }

    /// Write to `$0000-$7FFF`: bank controller registers.
    pub(crate) fn rom_write(&mut self, addr: u16, value: u8) {
        match self {
            BankRule::RomOnly(m) => m.rom_write(addr, value),
            BankRule::Mbc1(m) => m.rom_write(addr, value),
            BankRule::Mbc1Multicart(m) => m.rom_write(addr, value),
            BankRule::Mbc2(m) => m.rom_write(addr, value),
            BankRule::Mbc3(m) => m.rom_write(addr, value),
            BankRule::Mbc5(m) => m.rom_write(addr, value),
        }
    }

    /// Read from `$A000-$BFFF`.
    pub(crate) fn ram_read(&self, addr: u16) -> u8 {
        match self {
            BankRule::RomOnly(m) => m.ram_read(addr),
            BankRule::Mbc1(m) => m.ram_read(addr),
            BankRule::Mbc1Multicart(_) => 0xFF,
            BankRule::Mbc2(m) => m.ram_read(addr),
            BankRule::Mbc3(m) => m.ram_read(addr),
            BankRule::Mbc5(m) => m.ram_read(addr),
        }
    }

    /// Write to `$A000-$BFFF`.
    pub(crate) fn ram_write(&mut self, addr: u16, value: u8) {
        match self {
            BankRule::RomOnly(m) => m.ram_write(addr, value),
            BankRule::Mbc1(m) => m.ram_write(addr, value),
            BankRule::Mbc1Multicart(_) => {
                log::warn!("GB MBC1M: write to absent cartridge RAM {addr:04X}={value:02X}");
            }
            BankRule::Mbc2(m) => m.ram_write(addr, value),
            BankRule::Mbc3(m) => m.ram_write(addr, value),
            BankRule::Mbc5(m) => m.ram_write(addr, value),
        }
    }

    /// Battery-backed RAM in its on-disk layout.
    pub(crate) fn battery_ram(&self) -> Vec<u8> {
        match self {
            BankRule::RomOnly(m) => m.battery_ram(),
            BankRule::Mbc1(m) => m.battery_ram(),
            BankRule::Mbc1Multicart(_) => Vec::new(),
            BankRule::Mbc2(m) => m.battery_ram(),
            BankRule::Mbc3(m) => m.battery_ram(),
            BankRule::Mbc5(m) => m.battery_ram(),
        }
    }

    /// Restore a dump produced by [`BankRule::battery_ram`].
    pub(crate) fn load_battery_ram(&mut self, bytes: &[u8]) -> Result<(), LoadError> {
        let expected = self.battery_ram().len();
        if bytes.len() != expected {
            return Err(LoadError::BatteryRamSize {
                expected,
                actual: bytes.len(),
            });
        }
        match self {
            BankRule::RomOnly(m) => m.load_battery_ram(bytes),
            BankRule::Mbc1(m) => m.load_battery_ram(bytes),
            BankRule::Mbc1Multicart(_) => {}
            BankRule::Mbc2(m) => m.load_battery_ram(bytes),
            BankRule::Mbc3(m) => m.load_battery_ram(bytes),
            BankRule::Mbc5(m) => m.load_battery_ram(bytes),
        }
        Ok(())
    }
}
