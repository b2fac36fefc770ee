/// CGB palette memory: eight background and eight object palettes of four
/// BGR555 colors each, reached through an index register with optional
/// auto-increment.
#[derive(Clone, Debug, Eq, PartialEq)]
pub(crate) struct CgbPalettes {
    bg: [u8; 64],
    obj: [u8; 64],
    /// BCPS / OCPS: bit 7 auto-increment, bits 0-5 index.
    bg_spec: u8,
    obj_spec: u8,
}

impl Default for CgbPalettes {
    fn default() -> Self {
        Self {
            bg: [0xFF; 64],
            obj: [0x00; 64],
            bg_spec: 0,
            obj_spec: 0,
        }
    }
}

impl CgbPalettes {
    pub(crate) fn read_bcps(&self) -> u8 {
        self.bg_spec | 0x40
    }

    pub(crate) fn write_bcps(&mut self, value: u8) {
        self.bg_spec = value & 0xBF;
    }

    pub(crate) fn read_bcpd(&self) -> u8 {
        self.bg[(self.bg_spec & 0x3F) as usize]
    }

    pub(crate) fn write_bcpd(&mut self, value: u8) {
        self.bg[(self.bg_spec & 0x3F) as usize] = value;
        self.bg_spec = advance(self.bg_spec);
    }

    pub(crate) fn read_ocps(&self) -> u8 {
        self.obj_spec | 0x40
    }

    pub(crate) fn write_ocps(&mut self, value: u8) {
        self.obj_spec = value & 0xBF;
    }

    pub(crate) fn read_ocpd(&self) -> u8 {
        self.obj[(self.obj_spec & 0x3F) as usize]
    }

    pub(crate) fn write_ocpd(&mut self, value: u8) {
        self.obj[(self.obj_spec & 0x3F) as usize] = value;
        self.obj_spec = advance(self.obj_spec);
    }

    #[inline]
    pub(crate) fn bg_color(&self, palette: u8, index: u8) -> u16 {
        color(&self.bg, palette, index)
    }

    #[inline]
    pub(crate) fn obj_color(&self, palette: u8, index: u8) -> u16 {
        color(&self.obj, palette, index)
    }
}

fn advance(spec: u8) -> u8 {
    if spec & 0x80 != 0 {
        0x80 | (spec.wrapping_add(1) & 0x3F)
    } else {
        spec
    }
}

fn color(ram: &[u8; 64], palette: u8, index: u8) -> u16 {
    let offset = ((palette & 0x07) as usize * 4 + (index & 0x03) as usize) * 2;
    u16::from_le_bytes([ram[offset], ram[offset + 1]]) & 0x7FFF
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn auto_increment_wraps_within_palette_ram() {
        let mut palettes = CgbPalettes::default();
        palettes.write_bcps(0x80 | 0x3E);
        palettes.write_bcpd(0x1F);
        palettes.write_bcpd(0x00);
        assert_eq!(palettes.read_bcps(), 0xC0);
        assert_eq!(palettes.bg_color(7, 3), 0x001F);

        palettes.write_ocps(0x02);
        palettes.write_ocpd(0xE0);
        palettes.write_ocpd(0x03);
        assert_eq!(palettes.read_ocps(), 0x42);
        assert_eq!(palettes.read_ocpd(), 0x03);
        assert_eq!(palettes.obj_color(0, 1), 0x0003);
    }
}
