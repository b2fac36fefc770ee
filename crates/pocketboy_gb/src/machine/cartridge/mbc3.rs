use super::{Cartridge, CartridgeHeader, ExternalRam};

/// Battery dump size; the clock registers are not part of it.
const BATTERY_RAM_LEN: usize = 0x8000;

/// Real-time clock register file.
///
/// Registers can be written, latched and read back, but nothing advances
/// them with wall-clock time.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub(crate) struct RtcRegisters {
    /// Seconds, minutes, hours, day low, day high/control.
    live: [u8; 5],
    latched: [u8; 5],
    /// Last value written to the latch register.
    latch_write: u8,
}

impl RtcRegisters {
    fn read(&self, register: u8) -> u8 {
        self.latched[(register - 0x08) as usize]
    }

    fn write(&mut self, register: u8, value: u8) {
        let index = (register - 0x08) as usize;
        self.live[index] = match register {
            // Control keeps the day-carry bit; only halt and day bit 8 are writable.
            0x0C => (self.live[index] & 0x80) | (value & 0xC1),
            _ => value,
        };
    }

    fn latch(&mut self, value: u8) {
        if self.latch_write == 0x00 && value == 0x01 {
            self.latched = self.live;
        }
        self.latch_write = value;
    }
}

/// What `$A000-$BFFF` is currently mapped to.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
enum Mbc3Window {
    Ram(usize),
    Rtc(u8),
}

/// MBC3: 7-bit ROM bank, four RAM banks and the clock register window.
#[derive(Clone, Debug, Eq, PartialEq)]
pub(crate) struct Mbc3 {
    ram: ExternalRam,
    rtc: RtcRegisters,
    has_rtc: bool,
    rom_banks: usize,
    rom_bank: usize,
    window: Mbc3Window,
    ram_enabled: bool,
    rtc_enabled: bool,
}

impl Mbc3 {
    pub(super) fn new(header: &CartridgeHeader, rom_banks: usize) -> Self {
        Self {
            ram: ExternalRam::new(header),
            rtc: RtcRegisters::default(),
            has_rtc: header.has_rtc(),
            rom_banks,
            rom_bank: 1,
            window: Mbc3Window::Ram(0),
            ram_enabled: false,
            rtc_enabled: false,
        }
    }

    pub(super) fn rom_read(&self, cartridge: &Cartridge, addr: u16) -> u8 {
        if addr < 0x4000 {
            cartridge.rom_byte(0, addr)
        } else {
            cartridge.rom_byte(self.rom_bank, addr)
        }
    }

    pub(super) fn rom_write(&mut self, addr: u16, value: u8) {
        match addr {
            0x0000..=0x1FFF => {
                let enable = value & 0x0F == 0x0A;
                if self.ram.is_present() {
                    self.ram_enabled = enable;
                }
                self.rtc_enabled = enable;
            }
            0x2000..=0x3FFF => {
                let bank = (value & 0x7F).max(1) as usize;
                self.rom_bank = bank & (self.rom_banks - 1);
                log::debug!("GB MBC3: ROM bank {:#04X}", self.rom_bank);
            }
            0x4000..=0x5FFF => match value {
                0x00..=0x03 => {
                    self.window = Mbc3Window::Ram(value as usize & self.ram.bank_mask());
                }
                0x08..=0x0C if self.has_rtc && self.rtc_enabled => {
                    self.window = Mbc3Window::Rtc(value);
                }
                _ => {
                    log::warn!("GB MBC3: unusable bank select {value:02X}");
                }
            },
            _ => {
                if self.has_rtc {
                    self.rtc.latch(value);
                }
            }
        }
    }

    pub(super) fn ram_read(&self, addr: u16) -> u8 {
        match self.window {
            Mbc3Window::Ram(bank) if self.ram_enabled => self.ram.read(bank, addr),
            Mbc3Window::Rtc(register) if self.rtc_enabled => self.rtc.read(register),
            _ => 0xFF,
        }
    }

    pub(super) fn ram_write(&mut self, addr: u16, value: u8) {
        match self.window {
            Mbc3Window::Ram(bank) if self.ram_enabled => self.ram.write(bank, addr, value),
            Mbc3Window::Rtc(register) if self.rtc_enabled => self.rtc.write(register, value),
            _ => {
                log::warn!("GB MBC3: write to disabled RAM {addr:04X}={value:02X} dropped");
            }
        }
    }

    pub(super) fn battery_ram(&self) -> Vec<u8> {
        self.ram.dump_padded(BATTERY_RAM_LEN)
    }

    pub(super) fn load_battery_ram(&mut self, bytes: &[u8]) {
        self.ram.restore(bytes);
    }
}
