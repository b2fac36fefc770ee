pub(crate) const LCDC: usize = 0xFF40;
pub(crate) const STAT: usize = 0xFF41;
pub(crate) const SCY: usize = 0xFF42;
pub(crate) const SCX: usize = 0xFF43;
pub(crate) const LY: usize = 0xFF44;
pub(crate) const LYC: usize = 0xFF45;
pub(crate) const BGP: usize = 0xFF47;
pub(crate) const OBP0: usize = 0xFF48;
pub(crate) const OBP1: usize = 0xFF49;
pub(crate) const WY: usize = 0xFF4A;
pub(crate) const WX: usize = 0xFF4B;

bitflags::bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub(crate) struct LcdControl: u8 {
        const LCD_ENABLE = 1 << 7;
        const WINDOW_TILE_MAP = 1 << 6;
        const WINDOW_ENABLE = 1 << 5;
        /// Unsigned tile indices from `$8000` instead of signed from `$9000`.
        const TILE_DATA_8000 = 1 << 4;
        const BG_TILE_MAP = 1 << 3;
        const OBJ_TALL = 1 << 2;
        const OBJ_ENABLE = 1 << 1;
        /// DMG: background and window on. CGB: background priority master.
        const BG_ENABLE = 1;
    }
}

bitflags::bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub(crate) struct LcdStatus: u8 {
        const LYC_INTERRUPT = 1 << 6;
        const OAM_INTERRUPT = 1 << 5;
        const VBLANK_INTERRUPT = 1 << 4;
        const HBLANK_INTERRUPT = 1 << 3;
        const LYC_EQUAL = 1 << 2;
        const MODE = 0b11;
    }
}

bitflags::bitflags! {
    /// Byte 3 of an OAM entry.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub(crate) struct SpriteAttributes: u8 {
        const BEHIND_BG = 1 << 7;
        const Y_FLIP = 1 << 6;
        const X_FLIP = 1 << 5;
        const DMG_PALETTE = 1 << 4;
        const CGB_BANK = 1 << 3;
        const CGB_PALETTE = 0b111;
    }
}

bitflags::bitflags! {
    /// CGB tile map attribute byte, stored in VRAM bank 1.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub(crate) struct BgAttributes: u8 {
        const PRIORITY = 1 << 7;
        const Y_FLIP = 1 << 6;
        const X_FLIP = 1 << 5;
        const BANK = 1 << 3;
        const PALETTE = 0b111;
    }
}

/// STAT mode bits.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub(crate) enum LcdMode {
    #[default]
    HBlank = 0,
    VBlank = 1,
    OamScan = 2,
    PixelTransfer = 3,
}
