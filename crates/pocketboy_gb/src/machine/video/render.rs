use super::registers::{
    BgAttributes, LcdControl, SpriteAttributes, BGP, LCDC, OBP0, OBP1, SCX, SCY, WX, WY,
};
use super::{Video, VideoContext};
use crate::SCREEN_WIDTH;

/// Marks a pixel no sprite has claimed yet.
pub(super) const NO_SPRITE: i16 = i16::MAX;
/// Set in the color cache when a CGB tile attribute asks for BG priority.
const BG_PRIORITY: u8 = 0x80;
const MAX_SPRITES_PER_LINE: usize = 10;
const OAM_START: usize = 0xFE00;
const OAM_ENTRIES: usize = 40;

/// One OAM entry, positions already converted to screen space.
#[derive(Copy, Clone, Debug)]
struct Sprite {
    y: i16,
    x: i16,
    tile: u8,
    attributes: SpriteAttributes,
}

impl<'a> VideoContext<'a> {
    #[inline]
    fn vram(&self, bank: u8, addr: u16) -> u8 {
        let offset = (addr as usize) & 0x1FFF;
        if bank == 0 || !self.cgb {
            self.memory[0x8000 + offset]
        } else {
            self.vram_bank1.get(offset).copied().unwrap_or(0xFF)
        }
    }

    /// Color index 0-3 of pixel (`x`, `y`) of the tile starting at `tile_addr`.
    #[inline]
    fn tile_pixel(&self, bank: u8, tile_addr: u16, x: u8, y: u8) -> u8 {
        let row = tile_addr + (y as u16) * 2;
        let lo = self.vram(bank, row);
        let hi = self.vram(bank, row + 1);
        let bit = 7 - x;
        (((hi >> bit) & 1) << 1) | ((lo >> bit) & 1)
    }
}

impl Video {
    /// Draw line `self.ly` into the framebuffer.
    pub(super) fn render_line(&mut self, ctx: &VideoContext<'_>) {
        let lcdc = LcdControl::from_bits_retain(ctx.memory[LCDC]);
        let line_start = self.ly as usize * SCREEN_WIDTH;
        self.sprite_x_cache[line_start..line_start + SCREEN_WIDTH].fill(NO_SPRITE);

        self.render_background(lcdc, ctx);
        if lcdc.contains(LcdControl::OBJ_ENABLE) {
            self.render_sprites(lcdc, ctx);
        }
    }

    fn render_background(&mut self, lcdc: LcdControl, ctx: &VideoContext<'_>) {
        let ly = self.ly;
        let line_start = ly as usize * SCREEN_WIDTH;

        // On DMG bit 0 blanks both layers; on CGB it only drops their priority.
        if !ctx.cgb && !lcdc.contains(LcdControl::BG_ENABLE) {
            self.color_cache[line_start..line_start + SCREEN_WIDTH].fill(0);
            self.framebuffer[line_start..line_start + SCREEN_WIDTH].fill(0);
            return;
        }

        let scx = ctx.memory[SCX];
        let scy = ctx.memory[SCY];
        let wy = ctx.memory[WY];
        let wx = ctx.memory[WX] as i16 - 7;
        let window_visible =
            lcdc.contains(LcdControl::WINDOW_ENABLE) && ly >= wy && wx < SCREEN_WIDTH as i16;

        for x in 0..SCREEN_WIDTH {
            let in_window = window_visible && x as i16 >= wx;
            let (map_base, map_x, map_y) = if in_window {
                let base = if lcdc.contains(LcdControl::WINDOW_TILE_MAP) { 0x9C00 } else { 0x9800 };
                (base, (x as i16 - wx) as u8, self.window_line)
            } else {
                let base = if lcdc.contains(LcdControl::BG_TILE_MAP) { 0x9C00 } else { 0x9800 };
                (base, (x as u8).wrapping_add(scx), ly.wrapping_add(scy))
            };

            let map_addr = map_base + (map_y as u16 / 8) * 32 + map_x as u16 / 8;
            let tile_index = ctx.vram(0, map_addr);
            let attributes = if ctx.cgb {
                BgAttributes::from_bits_retain(ctx.vram(1, map_addr))
            } else {
                BgAttributes::empty()
            };

            let tile_addr = if lcdc.contains(LcdControl::TILE_DATA_8000) {
                0x8000 + tile_index as u16 * 16
            } else {
                (0x9000i32 + (tile_index as i8 as i32) * 16) as u16
            };

            let mut fine_x = map_x & 7;
            let mut fine_y = map_y & 7;
            if attributes.contains(BgAttributes::X_FLIP) {
                fine_x = 7 - fine_x;
            }
            if attributes.contains(BgAttributes::Y_FLIP) {
                fine_y = 7 - fine_y;
            }
            let bank = attributes.contains(BgAttributes::BANK) as u8;
            let color = ctx.tile_pixel(bank, tile_addr, fine_x, fine_y);

            let pixel = line_start + x;
            self.color_cache[pixel] = if attributes.contains(BgAttributes::PRIORITY) {
                color | BG_PRIORITY
            } else {
                color
            };
            self.framebuffer[pixel] = if ctx.cgb {
                let palette = (attributes & BgAttributes::PALETTE).bits();
                ctx.palettes.bg_color(palette, color)
            } else {
                dmg_shade(ctx.memory[BGP], color)
            };
        }

        if window_visible {
            self.window_line = self.window_line.wrapping_add(1);
        }
    }

    /// Up to ten sprites overlapping the current line, in OAM order.
    fn line_sprites(&self, height: i16, ctx: &VideoContext<'_>) -> Vec<Sprite> {
        let ly = self.ly as i16;
        (0..OAM_ENTRIES)
            .map(|i| {
                let entry = &ctx.memory[OAM_START + i * 4..OAM_START + i * 4 + 4];
                Sprite {
                    y: entry[0] as i16 - 16,
                    x: entry[1] as i16 - 8,
                    tile: entry[2],
                    attributes: SpriteAttributes::from_bits_retain(entry[3]),
                }
            })
            .filter(|sprite| ly >= sprite.y && ly < sprite.y + height)
            .take(MAX_SPRITES_PER_LINE)
            .collect()
    }

    fn render_sprites(&mut self, lcdc: LcdControl, ctx: &VideoContext<'_>) {
        let height: i16 = if lcdc.contains(LcdControl::OBJ_TALL) { 16 } else { 8 };
        let line_start = self.ly as usize * SCREEN_WIDTH;
        let bg_master_priority = !ctx.cgb || lcdc.contains(LcdControl::BG_ENABLE);

        for sprite in self.line_sprites(height, ctx) {
            let mut row = (self.ly as i16 - sprite.y) as u8;
            if sprite.attributes.contains(SpriteAttributes::Y_FLIP) {
                row = (height as u8 - 1) - row;
            }
            let tile = if height == 16 { sprite.tile & 0xFE } else { sprite.tile };
            let tile_addr = 0x8000 + (tile as u16 + (row / 8) as u16) * 16;
            let bank = if ctx.cgb {
                sprite.attributes.contains(SpriteAttributes::CGB_BANK) as u8
            } else {
                0
            };

            for px in 0..8u8 {
                let x = sprite.x + px as i16;
                if !(0..SCREEN_WIDTH as i16).contains(&x) {
                    continue;
                }
                let pixel = line_start + x as usize;

                let owner = self.sprite_x_cache[pixel];
                if owner != NO_SPRITE && (ctx.cgb || owner <= sprite.x) {
                    // CGB: first in OAM order wins. DMG: smallest X wins,
                    // ties going to the earlier OAM entry.
                    continue;
                }

                let fine_x = if sprite.attributes.contains(SpriteAttributes::X_FLIP) {
                    7 - px
                } else {
                    px
                };
                let color = ctx.tile_pixel(bank, tile_addr, fine_x, row & 7);
                if color == 0 {
                    continue;
                }
                self.sprite_x_cache[pixel] = sprite.x;

                let bg = self.color_cache[pixel];
                let bg_opaque = bg & 0x03 != 0;
                let behind = bg_master_priority
                    && bg_opaque
                    && (bg & BG_PRIORITY != 0
                        || sprite.attributes.contains(SpriteAttributes::BEHIND_BG));
                if behind {
                    // A lower-priority DMG sprite may already cover this pixel.
                    if !ctx.cgb {
                        self.framebuffer[pixel] = dmg_shade(ctx.memory[BGP], bg & 0x03);
                    }
                    continue;
                }

                self.framebuffer[pixel] = if ctx.cgb {
                    let palette = (sprite.attributes & SpriteAttributes::CGB_PALETTE).bits();
                    ctx.palettes.obj_color(palette, color)
                } else {
                    let obp = if sprite.attributes.contains(SpriteAttributes::DMG_PALETTE) {
                        ctx.memory[OBP1]
                    } else {
                        ctx.memory[OBP0]
                    };
                    dmg_shade(obp, color)
                };
            }
        }
    }
}

/// Map a color index through a DMG palette register to a 2-bit shade.
#[inline]
fn dmg_shade(palette: u8, color: u8) -> u16 {
    ((palette >> (color * 2)) & 0x03) as u16
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::machine::interrupts::InterruptController;
    use crate::machine::video::CgbPalettes;
    use crate::machine::MEMORY_SIZE;

    fn memory() -> Box<[u8; MEMORY_SIZE]> {
        let mut memory = Box::new([0u8; MEMORY_SIZE]);
        memory[LCDC] = 0x93; // LCD, BG, sprites, tile data at $8000
        memory[BGP] = 0xE4;
        memory[OBP0] = 0xE4;
        memory[OBP1] = 0x1B;
        // Tile 1: every pixel color 3. Tile 2: every pixel color 1.
        for row in 0..8 {
            memory[0x8010 + row * 2] = 0xFF;
            memory[0x8010 + row * 2 + 1] = 0xFF;
            memory[0x8020 + row * 2] = 0xFF;
        }
        memory
    }

    fn render(memory: &mut [u8; MEMORY_SIZE], ly: u8) -> Video {
        let mut video = Video {
            ly,
            ..Video::default()
        };
        let mut interrupts = InterruptController::default();
        let palettes = CgbPalettes::default();
        let ctx = VideoContext {
            memory,
            vram_bank1: &[],
            palettes: &palettes,
            interrupts: &mut interrupts,
            cgb: false,
        };
        video.render_line(&ctx);
        video
    }

    fn place_sprite(memory: &mut [u8; MEMORY_SIZE], index: usize, y: u8, x: u8, tile: u8, attr: u8) {
        let base = OAM_START + index * 4;
        memory[base..base + 4].copy_from_slice(&[y, x, tile, attr]);
    }

    #[test]
    fn background_scrolls_and_wraps() {
        let mut memory = memory();
        // Map column 31 holds tile 1; with SCX=248 it lands at x=0..8.
        memory[0x9800 + 31] = 1;
        memory[SCX] = 248;
        let video = render(&mut memory, 0);
        assert!(video.framebuffer[..8].iter().all(|&p| p == 3));
        assert_eq!(video.framebuffer[8], 0);
    }

    #[test]
    fn window_uses_its_own_line_counter() {
        let mut memory = memory();
        memory[LCDC] |= LcdControl::WINDOW_ENABLE.bits() | LcdControl::WINDOW_TILE_MAP.bits();
        memory[0x9C00] = 1;
        memory[WY] = 0;
        memory[WX] = 7 + 80;
        let video = render(&mut memory, 5);
        assert_eq!(video.framebuffer[5 * 160 + 79], 0);
        assert_eq!(video.framebuffer[5 * 160 + 80], 3);
        assert_eq!(video.window_line, 1);
    }

    #[test]
    fn smaller_x_wins_on_dmg() {
        let mut memory = memory();
        // Entry 0 at x=12 with OBP0, entry 1 at x=8 with OBP1.
        place_sprite(&mut memory, 0, 16, 8 + 12, 2, 0x00);
        place_sprite(&mut memory, 1, 16, 8 + 8, 2, 0x10);
        let video = render(&mut memory, 0);
        // Color 1 through OBP1 ($1B) is shade 2, through OBP0 ($E4) shade 1.
        assert_eq!(video.framebuffer[12], 2);
        assert_eq!(video.framebuffer[16], 1);
    }

    #[test]
    fn behind_bg_sprite_shows_only_over_color_zero() {
        let mut memory = memory();
        memory[0x9800] = 1;
        place_sprite(&mut memory, 0, 16, 8 + 4, 2, 0x80);
        let video = render(&mut memory, 0);
        assert_eq!(video.framebuffer[4], 3);
        assert_eq!(video.framebuffer[8], 1);
    }

    #[test]
    fn hidden_winning_sprite_shows_background_on_dmg() {
        let mut memory = memory();
        memory[0x9800] = 2;
        // Entry 0 at x=4 draws color 3; entry 1 at x=0 wins x=4..8 but sits behind BG.
        place_sprite(&mut memory, 0, 16, 8 + 4, 1, 0x00);
        place_sprite(&mut memory, 1, 16, 8, 2, 0x80);
        let video = render(&mut memory, 0);
        assert_eq!(video.framebuffer[4], 1);
        assert_eq!(video.framebuffer[7], 1);
        assert_eq!(video.framebuffer[8], 3);
    }

    #[test]
    fn ten_sprite_limit() {
        let mut memory = memory();
        for i in 0..11 {
            place_sprite(&mut memory, i, 16, 8 + (i as u8) * 8, 2, 0x00);
        }
        let video = render(&mut memory, 0);
        assert_eq!(video.framebuffer[9 * 8], 1);
        assert_eq!(video.framebuffer[10 * 8], 0);
    }
}
