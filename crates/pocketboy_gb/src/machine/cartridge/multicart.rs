use super::mbc1::Mbc1;
use super::Cartridge;

/// MBC1 wired for multi-game collections.
///
/// The two upper bank bits sit one position lower than on a plain MBC1, so
/// each game sees its own 256 KiB window. In mode 1 they also move the
/// `$0000-$3FFF` window to the selected game's first bank. No RAM is fitted.
#[derive(Clone, Debug, Eq, PartialEq)]
pub(crate) struct Mbc1Multicart {
    rom_banks: usize,
    rom_bank_low5: u8,
    rom_bank_high2: u8,
    mode: u8,
    /// Bank at `$4000-$7FFF` in mode 0.
    bank1: usize,
    /// Banks at `$0000-$3FFF` and `$4000-$7FFF` in mode 1.
    multicart_bank0: usize,
    multicart_bank1: usize,
}

impl Mbc1Multicart {
    pub(super) fn new(rom_banks: usize) -> Self {
        let mut mbc = Self {
            rom_banks,
            rom_bank_low5: 1,
            rom_bank_high2: 0,
            mode: 0,
            bank1: 1,
            multicart_bank0: 0,
            multicart_bank1: 0,
        };
        mbc.update_banks();
        mbc
    }

    fn update_banks(&mut self) {
        let full = ((self.rom_bank_high2 as usize) << 5) | self.rom_bank_low5 as usize;
        let mask = self.rom_banks - 1;
        self.bank1 = Mbc1::effective_bank(full, self.rom_banks);
        self.multicart_bank0 = ((full >> 1) & 0x30) & mask;
        self.multicart_bank1 = (((full >> 1) & 0x30) | (full & 0x0F)) & mask;
        log::debug!(
            "GB MBC1M: banks mode0={:#04X} mode1={:#04X}/{:#04X}",
            self.bank1,
            self.multicart_bank0,
            self.multicart_bank1
        );
    }

    pub(super) fn rom_read(&self, cartridge: &Cartridge, addr: u16) -> u8 {
        let bank = match (addr < 0x4000, self.mode) {
            (true, 0) => 0,
            (true, _) => self.multicart_bank0,
            (false, 0) => self.bank1,
            (false, _) => self.multicart_bank1,
        };
        cartridge.rom_byte(bank, addr)
    }

    pub(super) fn rom_write(&mut self, addr: u16, value: u8) {
        match addr {
            0x2000..=0x3FFF => {
                self.rom_bank_low5 = value & 0x1F;
                self.update_banks();
            }
            0x4000..=0x5FFF => {
                self.rom_bank_high2 = value & 0x03;
                self.update_banks();
            }
            0x6000..=0x7FFF => self.mode = value & 0x01,
            // RAM enable; there is no RAM to enable.
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn powers_up_on_bank_one() {
        let mbc = Mbc1Multicart::new(64);
        assert_eq!(mbc.bank1, 1);
        assert_eq!(mbc.multicart_bank0, 0);
        assert_eq!(mbc.multicart_bank1, 1);
    }

    #[test]
    fn second_game_window() {
        let mut mbc = Mbc1Multicart::new(64);
        // Game 2 lives at bank 0x10; its bank 2 is 0x12.
        mbc.rom_write(0x4000, 0x01);
        mbc.rom_write(0x2000, 0x02);
        mbc.rom_write(0x6000, 0x01);
        assert_eq!(mbc.multicart_bank0, 0x10);
        assert_eq!(mbc.multicart_bank1, 0x12);

        mbc.rom_write(0x6000, 0x00);
        assert_eq!(mbc.bank1, 0x22 & 63);
    }
}
