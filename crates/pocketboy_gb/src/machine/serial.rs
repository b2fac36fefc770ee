/// Cycles per shifted bit with the internal 8192 Hz clock.
const BIT_PERIOD: u32 = 512;

/// SB / SC link port.
///
/// Only the internal clock is driven; nothing is connected on the other
/// end, so ones are shifted in. Bytes sent are kept in `output` so test
/// ROMs that print over the link port can be observed.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub(crate) struct Serial {
    pub(crate) sb: u8,
    sc: u8,
    bits_left: u8,
    cycles: u32,
    pub(crate) output: Vec<u8>,
}

impl Serial {
    pub(crate) fn post_boot(sc: u8) -> Self {
        Self {
            sc,
            ..Self::default()
        }
    }

    pub(crate) fn read_sc(&self) -> u8 {
        self.sc | 0x7E
    }

    pub(crate) fn write_sc(&mut self, value: u8) {
        self.sc = value;
        if value & 0x81 == 0x81 {
            self.output.push(self.sb);
            self.bits_left = 8;
            self.cycles = 0;
        } else {
            self.bits_left = 0;
        }
    }

    /// Advance the shift clock. Returns `true` when a transfer finished
    /// and the serial interrupt must be requested.
    pub(crate) fn tick(&mut self, cycles: u32) -> bool {
        if self.bits_left == 0 {
            return false;
        }
        self.cycles += cycles;
        while self.cycles >= BIT_PERIOD && self.bits_left > 0 {
            self.cycles -= BIT_PERIOD;
            self.sb = (self.sb << 1) | 0x01;
            self.bits_left -= 1;
        }
        if self.bits_left == 0 {
            self.sc &= !0x80;
            self.cycles = 0;
            return true;
        }
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn internal_clock_transfer_takes_eight_bits() {
        let mut serial = Serial::post_boot(0x7E);
        serial.sb = b'A';
        serial.write_sc(0x81);
        assert_eq!(serial.output, b"A");

        assert!(!serial.tick(512 * 7));
        assert_eq!(serial.read_sc() & 0x80, 0x80);
        assert!(serial.tick(512));
        assert_eq!(serial.sb, 0xFF);
        assert_eq!(serial.read_sc() & 0x80, 0x00);
        assert!(!serial.tick(4096));
    }

    #[test]
    fn external_clock_never_completes() {
        let mut serial = Serial::post_boot(0x7E);
        serial.write_sc(0x80);
        assert!(!serial.tick(100_000));
        assert!(serial.output.is_empty());
    }
}
