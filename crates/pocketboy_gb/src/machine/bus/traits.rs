use crate::cpu::{Bus, Interrupt};

use super::GameBoyBus;

impl Bus for GameBoyBus {
    fn read8(&mut self, addr: u16) -> u8 {
        self.read8_mmio(addr)
    }

    fn write8(&mut self, addr: u16, value: u8) {
        self.write8_mmio(addr, value)
    }

    fn tick(&mut self, cycles: u32) {
        self.interrupts.tick(cycles);
        if self.timer.tick(cycles) {
            self.interrupts.request(Interrupt::Timer);
        }
        if self.serial.tick(cycles) {
            self.interrupts.request(Interrupt::Serial);
        }
        self.tick_video(cycles);
    }

    fn tick_stopped(&mut self, cycles: u32) {
        // DIV and TIMA are frozen in STOP.
        self.interrupts.tick(cycles);
        self.tick_video(cycles);
    }

    fn pending_interrupt(&mut self) -> Option<Interrupt> {
        self.interrupts.pending()
    }

    fn acknowledge_interrupt(&mut self, interrupt: Interrupt) {
        self.interrupts.acknowledge(interrupt);
    }

    fn is_cgb(&self) -> bool {
        self.model.is_cgb()
    }

    fn speed_switch(&mut self) -> bool {
        if !self.model.is_cgb() || !self.cgb.key1_armed {
            return false;
        }
        self.cgb.key1_armed = false;
        self.cgb.double_speed = !self.cgb.double_speed;
        self.cgb.video_subcycle = 0;
        log::debug!(
            "GB BUS: switched to {} speed",
            if self.cgb.double_speed { "double" } else { "normal" }
        );
        true
    }
}
