/// Input clock periods selected by TAC bits 0-1, in CPU cycles.
const TIMA_PERIODS: [u32; 4] = [1024, 16, 64, 256];
/// DIV increments once every this many cycles.
const DIV_PERIOD: u32 = 256;

/// DIV / TIMA / TMA / TAC.
///
/// Time is kept as two cycle accumulators, one for the divider and one for
/// the timer counter, advanced by whole CPU steps.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub(crate) struct Timer {
    pub(crate) div: u8,
    pub(crate) tima: u8,
    pub(crate) tma: u8,
    /// Lower three bits only.
    pub(crate) tac: u8,
    div_cycles: u32,
    tima_cycles: u32,
}

impl Timer {
    /// Timer as the boot ROM leaves it.
    pub(crate) fn post_boot(div: u8, tac: u8) -> Self {
        Self {
            div,
            tac: tac & 0x07,
            ..Self::default()
        }
    }

    #[inline]
    fn enabled(&self) -> bool {
        self.tac & 0x04 != 0
    }

    #[inline]
    fn period(&self) -> u32 {
        TIMA_PERIODS[(self.tac & 0x03) as usize]
    }

    /// Advance by `cycles`. Returns `true` when TIMA overflowed and the
    /// timer interrupt must be requested.
    pub(crate) fn tick(&mut self, cycles: u32) -> bool {
        self.div_cycles += cycles;
        while self.div_cycles >= DIV_PERIOD {
            self.div_cycles -= DIV_PERIOD;
            self.div = self.div.wrapping_add(1);
        }

        if !self.enabled() {
            return false;
        }

        let period = self.period();
        let mut overflowed = false;
        self.tima_cycles += cycles;
        while self.tima_cycles >= period {
            self.tima_cycles -= period;
            let (next, overflow) = self.tima.overflowing_add(1);
            self.tima = if overflow { self.tma } else { next };
            overflowed |= overflow;
        }
        overflowed
    }

    /// Writing DIV clears it together with the divider's cycle count.
    pub(crate) fn reset_div_cycles(&mut self) {
        self.div_cycles = 0;
        self.div = 0;
    }

    /// Restart the timer counter from TMA after the input clock changed.
    pub(crate) fn reset_tima_cycles(&mut self) {
        self.tima_cycles = 0;
        self.tima = self.tma;
    }

    pub(crate) fn read_tac(&self) -> u8 {
        0xF8 | self.tac
    }

    pub(crate) fn write_tac(&mut self, value: u8) {
        let value = value & 0x07;
        if self.tac & 0x03 != value & 0x03 {
            self.reset_tima_cycles();
        }
        self.tac = value;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn div_counts_every_256_cycles() {
        let mut timer = Timer::default();
        timer.tick(255);
        assert_eq!(timer.div, 0);
        timer.tick(1);
        assert_eq!(timer.div, 1);
        timer.tick(256 * 255);
        assert_eq!(timer.div, 0);
    }

    #[test]
    fn tima_overflow_reloads_from_tma() {
        let mut timer = Timer::default();
        timer.tma = 0xF0;
        timer.tima = 0xFE;
        timer.write_tac(0x05); // enabled, 16 cycles
        // The rate change reloaded TIMA from TMA.
        assert_eq!(timer.tima, 0xF0);

        timer.tima = 0xFE;
        assert!(!timer.tick(16));
        assert_eq!(timer.tima, 0xFF);
        assert!(timer.tick(16));
        assert_eq!(timer.tima, 0xF0);
    }

    #[test]
    fn disabled_timer_only_runs_div() {
        let mut timer = Timer::default();
        timer.write_tac(0x01);
        assert!(!timer.tick(4096));
        assert_eq!(timer.tima, 0);
        assert_eq!(timer.div, 16);
        assert_eq!(timer.read_tac(), 0xF9);
    }

    #[test]
    fn div_write_restarts_divider() {
        let mut timer = Timer::default();
        timer.tick(200);
        timer.reset_div_cycles();
        timer.tick(200);
        assert_eq!(timer.div, 0);
        timer.tick(56);
        assert_eq!(timer.div, 1);
    }
}
