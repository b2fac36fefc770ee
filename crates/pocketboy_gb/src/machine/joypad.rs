/// The eight console buttons.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum Button {
    Right,
    Left,
    Up,
    Down,
    A,
    B,
    Select,
    Start,
}

impl Button {
    /// P1 select bit of the button's group and its line in the low nibble.
    fn line(self) -> (u8, u8) {
        match self {
            Button::Right => (0x10, 0x01),
            Button::Left => (0x10, 0x02),
            Button::Up => (0x10, 0x04),
            Button::Down => (0x10, 0x08),
            Button::A => (0x20, 0x01),
            Button::B => (0x20, 0x02),
            Button::Select => (0x20, 0x04),
            Button::Start => (0x20, 0x08),
        }
    }
}

/// P1 / JOYP register.
#[derive(Clone, Debug, Eq, PartialEq)]
pub(crate) struct Joypad {
    /// Bits 4-5 as last written; 0 selects a group.
    select: u8,
    /// Pressed d-pad lines, 1 = pressed.
    dpad: u8,
    /// Pressed action button lines, 1 = pressed.
    buttons: u8,
}

impl Default for Joypad {
    fn default() -> Self {
        Self {
            select: 0x30,
            dpad: 0,
            buttons: 0,
        }
    }
}

impl Joypad {
    pub(crate) fn read(&self) -> u8 {
        let mut low = 0x0F;
        if self.select & 0x10 == 0 {
            low &= !self.dpad;
        }
        if self.select & 0x20 == 0 {
            low &= !self.buttons;
        }
        0xC0 | self.select | (low & 0x0F)
    }

    pub(crate) fn write(&mut self, value: u8) {
        self.select = value & 0x30;
    }

    /// Returns `true` if a selected line went from high to low, which
    /// requests the joypad interrupt.
    pub(crate) fn press(&mut self, button: Button) -> bool {
        let before = self.read();
        let (group, line) = button.line();
        if group == 0x10 {
            self.dpad |= line;
        } else {
            self.buttons |= line;
        }
        before & !self.read() & 0x0F != 0
    }

    pub(crate) fn release(&mut self, button: Button) {
        let (group, line) = button.line();
        if group == 0x10 {
            self.dpad &= !line;
        } else {
            self.buttons &= !line;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn press_is_visible_only_in_selected_group() {
        let mut joypad = Joypad::default();
        joypad.write(0x20); // d-pad selected
        assert!(joypad.press(Button::Down));
        assert_eq!(joypad.read(), 0xE7);

        assert!(!joypad.press(Button::Start));
        joypad.write(0x10); // buttons selected
        assert_eq!(joypad.read(), 0xD7);

        joypad.release(Button::Start);
        assert_eq!(joypad.read(), 0xDF);
    }

    #[test]
    fn repeated_press_does_not_retrigger() {
        let mut joypad = Joypad::default();
        joypad.write(0x10);
        assert!(joypad.press(Button::A));
        assert!(!joypad.press(Button::A));
    }
}
