use super::cartridge::compute_header_checksum;
use super::video::registers::LcdMode;
use super::{Button, GameBoy, MapperKind, Model};
use crate::config::{CoreConfig, ModelPreference, MulticartDetection};
use crate::cpu::{Bus, CpuState, Interrupt};
use crate::error::LoadError;
use crate::FRAMEBUFFER_LEN;

/// Build a ROM image with a valid header and `program` at the entry point.
fn rom_image(cartridge_type: u8, ram_size_code: u8, size: usize, program: &[u8]) -> Vec<u8> {
    let mut rom = vec![0u8; size];
    rom[0x0134..0x0138].copy_from_slice(b"TEST");
    rom[0x0147] = cartridge_type;
    rom[0x0148] = (size / 0x8000).trailing_zeros() as u8;
    rom[0x0149] = ram_size_code;
    rom[0x0100..0x0100 + program.len()].copy_from_slice(program);
    rom[0x014D] = compute_header_checksum(&rom);
    rom
}

fn loaded(cartridge_type: u8, ram_size_code: u8, program: &[u8]) -> GameBoy {
    let mut gb = GameBoy::new();
    gb.load_rom(&rom_image(cartridge_type, ram_size_code, 0x8000, program))
        .unwrap();
    gb
}

fn loaded_cgb(program: &[u8]) -> GameBoy {
    let mut rom = rom_image(0x00, 0x00, 0x8000, program);
    rom[0x0143] = 0x80;
    rom[0x014D] = compute_header_checksum(&rom);
    let mut gb = GameBoy::new();
    gb.load_rom(&rom).unwrap();
    gb
}

#[test]
fn rom_only_cartridge_loads() {
    let mut gb = GameBoy::new();
    assert!(!gb.is_loaded());

    gb.load_rom(&rom_image(0x00, 0x00, 0x8000, &[])).unwrap();

    assert!(gb.is_loaded());
    assert_eq!(gb.mapper(), Some(MapperKind::RomOnly));
    assert_eq!(gb.model(), Model::Dmg);
    assert_eq!(gb.cartridge().map(|c| c.title()), Some("TEST"));
    assert_eq!(gb.cpu.regs.pc, 0x0100);
}

#[test]
fn ld_a_immediate_from_entry_point() {
    let mut gb = loaded(0x00, 0x00, &[0x3E, 0x42]);

    assert_eq!(gb.step(), 8);
    assert_eq!(gb.cpu.regs.a, 0x42);
    assert_eq!(gb.cpu.regs.pc, 0x0102);
}

#[test]
fn mbc1_ram_needs_enable_and_declared_ram() {
    let mut gb = loaded(0x03, 0x02, &[]);
    assert_eq!(gb.bus.read8(0xA000), 0xFF);
    gb.bus.write8(0x0000, 0x0A);
    gb.bus.write8(0xA000, 0x55);
    assert_eq!(gb.bus.read8(0xA000), 0x55);

    let mut gb = loaded(0x01, 0x00, &[]);
    gb.bus.write8(0x0000, 0x0A);
    gb.bus.write8(0xA000, 0x55);
    assert_eq!(gb.bus.read8(0xA000), 0xFF);
}

#[test]
fn screen_off_produces_blank_frame() {
    // LD A,$00 ; LDH ($40),A ; JR -2
    let mut gb = loaded(0x00, 0x00, &[0x3E, 0x00, 0xE0, 0x40, 0x18, 0xFE]);
    let mut frame = vec![0xFFFF; FRAMEBUFFER_LEN];

    gb.run_to_vblank(&mut frame);
    gb.run_to_vblank(&mut frame);

    assert!(frame.iter().all(|&pixel| pixel == 0));
    assert_eq!(gb.bus.read8(0xFF44), 0);
}

#[test]
fn no_cartridge_gives_blank_frame() {
    let mut gb = GameBoy::new();
    let mut frame = vec![0x1234; FRAMEBUFFER_LEN];

    let samples = gb.run_to_vblank(&mut frame);

    assert!(frame.iter().all(|&pixel| pixel == 0));
    assert!((738..=739).contains(&samples));
}

#[test]
fn vblank_request_waits_for_visibility_delay() {
    let mut gb = loaded(0x00, 0x00, &[]);
    gb.bus.write8(0xFF0F, 0x00);
    gb.bus.write8(0xFFFF, 0x01);
    gb.cpu.ime = true;

    gb.bus.interrupts.request(Interrupt::VBlank);
    assert_eq!(gb.bus.read8(0xFF0F) & 0x01, 0x01);

    // 32 cycles of NOPs before the request is serviceable.
    for i in 0..8 {
        assert_eq!(gb.step(), 4);
        assert_eq!(gb.cpu.regs.pc, 0x0101 + i);
    }

    assert_eq!(gb.step(), 20);
    assert_eq!(gb.cpu.regs.pc, 0x0040);
    assert!(!gb.cpu.ime);
    assert_eq!(gb.bus.read8(0xFF0F) & 0x01, 0x00);
    assert_eq!(gb.cpu.regs.sp, 0xFFFC);
    assert_eq!(gb.bus.read8(0xFFFC), 0x08);
    assert_eq!(gb.bus.read8(0xFFFD), 0x01);
}

#[test]
fn echo_ram_mirrors_work_ram() {
    let mut gb = loaded(0x00, 0x00, &[]);

    gb.bus.write8(0xC010, 0x42);
    assert_eq!(gb.bus.read8(0xE010), 0x42);

    gb.bus.write8(0xE020, 0x99);
    assert_eq!(gb.bus.read8(0xC020), 0x99);
}

#[test]
fn oam_locked_during_oam_scan_open_in_vblank() {
    let mut gb = loaded(0x00, 0x00, &[]);
    assert_eq!(gb.bus.video.mode(), LcdMode::OamScan);

    gb.bus.write8(0xFE00, 0x12);
    assert_eq!(gb.bus.memory[0xFE00], 0x00);
    assert_eq!(gb.bus.read8(0xFE00), 0xFF);

    while gb.bus.video.mode() != LcdMode::VBlank {
        gb.bus.tick(4);
    }
    gb.bus.write8(0xFE00, 0x12);
    assert_eq!(gb.bus.read8(0xFE00), 0x12);
}

#[test]
fn vram_locked_during_pixel_transfer() {
    let mut gb = loaded(0x00, 0x00, &[]);
    gb.bus.write8(0x8000, 0x34);

    gb.bus.tick(80);
    assert_eq!(gb.bus.video.mode(), LcdMode::PixelTransfer);
    gb.bus.write8(0x8000, 0x56);
    assert_eq!(gb.bus.read8(0x8000), 0xFF);

    gb.bus.tick(172);
    assert_eq!(gb.bus.read8(0x8000), 0x34);
}

#[test]
fn unusable_window_pattern_on_dmg_memory_on_cgb() {
    let mut gb = loaded(0x00, 0x00, &[]);
    assert_eq!(gb.bus.read8(0xFEA0), 0xFF);
    assert_eq!(gb.bus.read8(0xFEA4), 0x00);
    gb.bus.write8(0xFEA0, 0x12);
    assert_eq!(gb.bus.read8(0xFEA0), 0xFF);

    let mut gb = loaded_cgb(&[]);
    gb.bus.write8(0xFEA0, 0x12);
    assert_eq!(gb.bus.read8(0xFEA0), 0x12);
}

#[test]
fn frame_spacing_matches_sample_hint() {
    let mut gb = loaded(0x00, 0x00, &[0x18, 0xFE]);
    let mut frame = vec![0; FRAMEBUFFER_LEN];

    gb.run_to_vblank(&mut frame);
    assert_eq!(gb.bus.video.ly(), 144);
    // 70224 cycles at 44.1 kHz.
    let samples = gb.run_to_vblank(&mut frame);
    assert!((738..=739).contains(&samples));
    assert_eq!(gb.bus.video.ly(), 144);
}

#[test]
fn save_state_round_trip_replays_identically() {
    // LD HL,$C000 ; loop: INC A ; LD (HL+),A ; JR loop
    let mut gb = loaded(0x00, 0x00, &[0x21, 0x00, 0xC0, 0x3C, 0x22, 0x18, 0xFC]);
    for _ in 0..100 {
        gb.step();
    }
    let snapshot = gb.save_state();

    let mut frame = vec![0; FRAMEBUFFER_LEN];
    for _ in 0..500 {
        gb.step();
    }
    gb.run_to_vblank(&mut frame);
    let first_state = gb.save_state();
    let first_frame = frame.clone();

    gb.load_state(&snapshot).unwrap();
    for _ in 0..500 {
        gb.step();
    }
    gb.run_to_vblank(&mut frame);

    assert!(gb.save_state() == first_state);
    assert_eq!(frame, first_frame);
}

#[test]
fn state_from_another_rom_is_rejected() {
    let gb = loaded(0x00, 0x00, &[0x00]);
    let snapshot = gb.save_state();

    let mut other = loaded(0x00, 0x00, &[0x3C]);
    assert_eq!(other.load_state(&snapshot), Err(LoadError::StateMismatch));

    let mut empty = GameBoy::new();
    assert_eq!(empty.load_state(&snapshot), Err(LoadError::StateMismatch));
}

#[test]
fn bad_checksum_is_advisory_unless_strict() {
    let mut rom = rom_image(0x00, 0x00, 0x8000, &[]);
    rom[0x014D] = rom[0x014D].wrapping_add(1);

    let mut gb = GameBoy::new();
    gb.load_rom(&rom).unwrap();
    assert_eq!(gb.cartridge().map(|c| c.checksum_valid()), Some(false));

    let config = CoreConfig::builder().strict_header_checksum(true).build();
    let mut strict = GameBoy::with_config(config);
    assert_eq!(strict.load_rom(&rom), Err(LoadError::HeaderChecksumInvalid));
    assert!(!strict.is_loaded());
}

#[test]
fn failed_load_keeps_previous_cartridge() {
    let mut gb = loaded(0x00, 0x00, &[0x3E, 0x42]);
    gb.step();

    let bad = rom_image(0x20, 0x00, 0x8000, &[]);
    assert_eq!(gb.load_rom(&bad), Err(LoadError::UnsupportedMapperType(0x20)));

    assert_eq!(gb.mapper(), Some(MapperKind::RomOnly));
    assert_eq!(gb.cpu.regs.a, 0x42);
    assert_eq!(gb.cpu.regs.pc, 0x0102);

    assert!(matches!(gb.load_rom(&[0; 0x20]), Err(LoadError::Header(_))));
}

#[test]
fn multicart_detected_by_repeated_logo() {
    let mut rom = rom_image(0x01, 0x00, 0x10_0000, &[]);
    for i in 0..0x30 {
        rom[0x0104 + i] = 0xCE ^ i as u8;
        rom[0x4_0104 + i] = 0xCE ^ i as u8;
    }

    let mut gb = GameBoy::new();
    gb.load_rom(&rom).unwrap();
    assert_eq!(gb.mapper(), Some(MapperKind::Mbc1Multicart));

    let config = CoreConfig::builder().multicart(MulticartDetection::Never).build();
    let mut gb = GameBoy::with_config(config);
    gb.load_rom(&rom).unwrap();
    assert_eq!(gb.mapper(), Some(MapperKind::Mbc1));

    rom[0x4_0104] ^= 0xFF;
    let mut gb = GameBoy::new();
    gb.load_rom(&rom).unwrap();
    assert_eq!(gb.mapper(), Some(MapperKind::Mbc1));
}

#[test]
fn model_follows_header_unless_forced() {
    let gb = loaded_cgb(&[]);
    assert_eq!(gb.model(), Model::Cgb);
    assert_eq!(gb.cpu.regs.a, 0x11);

    let config = CoreConfig::builder().model(ModelPreference::ForceDmg).build();
    let mut gb = GameBoy::with_config(config);
    let mut rom = rom_image(0x00, 0x00, 0x8000, &[]);
    rom[0x0143] = 0xC0;
    rom[0x014D] = compute_header_checksum(&rom);
    gb.load_rom(&rom).unwrap();
    assert_eq!(gb.model(), Model::Dmg);
    assert_eq!(gb.cpu.regs.a, 0x01);

    gb.reset(Some(Model::Cgb));
    assert_eq!(gb.model(), Model::Cgb);
    assert_eq!(gb.cpu.regs.a, 0x11);
}

#[test]
fn cgb_vram_and_wram_banks() {
    let mut gb = loaded_cgb(&[]);

    gb.bus.write8(0x8000, 0x11);
    gb.bus.write8(0xFF4F, 0x01);
    assert_eq!(gb.bus.read8(0xFF4F), 0xFF);
    gb.bus.write8(0x8000, 0x22);
    assert_eq!(gb.bus.read8(0x8000), 0x22);
    gb.bus.write8(0xFF4F, 0x00);
    assert_eq!(gb.bus.read8(0x8000), 0x11);

    gb.bus.write8(0xD000, 0xAA);
    gb.bus.write8(0xFF70, 0x02);
    gb.bus.write8(0xD000, 0xBB);
    assert_eq!(gb.bus.read8(0xF000), 0xBB);
    gb.bus.write8(0xFF70, 0x00);
    assert_eq!(gb.bus.read8(0xFF70), 0xF9);
    assert_eq!(gb.bus.read8(0xD000), 0xAA);
    assert_eq!(gb.bus.read8(0xF000), 0xAA);
}

#[test]
fn dmg_reads_cgb_registers_as_ff() {
    let mut gb = loaded(0x00, 0x00, &[]);
    gb.bus.write8(0xFF4F, 0x01);
    gb.bus.write8(0xFF70, 0x03);

    assert_eq!(gb.bus.read8(0xFF4D), 0xFF);
    assert_eq!(gb.bus.read8(0xFF4F), 0xFF);
    assert_eq!(gb.bus.read8(0xFF55), 0xFF);
    assert_eq!(gb.bus.read8(0xFF69), 0xFF);
    assert_eq!(gb.bus.read8(0xFF70), 0xFF);
}

#[test]
fn cgb_palette_data_auto_increments() {
    let mut gb = loaded_cgb(&[]);
    gb.bus.write8(0xFF68, 0x80);
    gb.bus.write8(0xFF69, 0x1F);
    gb.bus.write8(0xFF69, 0x00);
    assert_eq!(gb.bus.read8(0xFF68), 0xC2);

    gb.bus.write8(0xFF68, 0x00);
    assert_eq!(gb.bus.read8(0xFF69), 0x1F);
}

#[test]
fn joypad_press_requests_interrupt_for_selected_group() {
    let mut gb = loaded(0x00, 0x00, &[]);
    gb.bus.write8(0xFF00, 0x20);
    gb.bus.write8(0xFF0F, 0x00);

    gb.key_pressed(Button::A);
    assert_eq!(gb.bus.read8(0xFF0F) & 0x10, 0x00);

    gb.key_pressed(Button::Right);
    assert_eq!(gb.bus.read8(0xFF0F) & 0x10, 0x10);
    assert_eq!(gb.bus.read8(0xFF00) & 0x0F, 0x0E);

    gb.key_released(Button::Right);
    assert_eq!(gb.bus.read8(0xFF00) & 0x0F, 0x0F);
}

#[test]
fn key_press_leaves_stop() {
    let mut gb = loaded(0x00, 0x00, &[0x10, 0x00]);
    gb.step();
    assert_eq!(gb.cpu.state(), CpuState::Stopped);

    let div = gb.bus.read8(0xFF04);
    for _ in 0..200 {
        gb.step();
    }
    assert_eq!(gb.bus.read8(0xFF04), div);

    gb.key_pressed(Button::Start);
    assert_eq!(gb.cpu.state(), CpuState::Running);
}

#[test]
fn stop_with_key1_armed_switches_speed() {
    let mut gb = loaded_cgb(&[0x10, 0x00]);
    gb.bus.write8(0xFF4D, 0x01);
    assert_eq!(gb.bus.read8(0xFF4D), 0x7F);

    gb.step();

    assert_eq!(gb.cpu.state(), CpuState::Running);
    assert!(gb.bus.is_double_speed());
    assert_eq!(gb.bus.read8(0xFF4D), 0xFE);
}

#[test]
fn double_speed_halves_video_clock() {
    let mut gb = loaded_cgb(&[0x10, 0x00, 0x18, 0xFE]);
    gb.bus.write8(0xFF4D, 0x01);
    let mut frame = vec![0; FRAMEBUFFER_LEN];

    gb.run_to_vblank(&mut frame);
    let samples = gb.run_to_vblank(&mut frame);

    // Twice the CPU cycles per frame, same wall time.
    assert!(gb.bus.is_double_speed());
    assert!((738..=739).contains(&samples));
}

#[test]
fn timer_overflow_reloads_and_requests() {
    let mut gb = loaded(0x00, 0x00, &[]);
    gb.bus.write8(0xFF06, 0x10);
    gb.bus.write8(0xFF07, 0x05);
    gb.bus.write8(0xFF05, 0xFF);
    gb.bus.write8(0xFF0F, 0x00);

    gb.bus.tick(16);

    assert_eq!(gb.bus.read8(0xFF05), 0x10);
    assert_eq!(gb.bus.read8(0xFF0F) & 0x04, 0x04);
}

#[test]
fn div_write_resets_divider() {
    let mut gb = loaded(0x00, 0x00, &[]);
    gb.bus.tick(1000);
    assert_ne!(gb.bus.read8(0xFF04), 0x00);

    gb.bus.write8(0xFF04, 0x77);
    assert_eq!(gb.bus.read8(0xFF04), 0x00);
    gb.bus.tick(256);
    assert_eq!(gb.bus.read8(0xFF04), 0x01);
}

#[test]
fn serial_transfer_is_captured() {
    let mut gb = loaded(0x00, 0x00, &[]);
    gb.bus.write8(0xFF0F, 0x00);
    gb.bus.write8(0xFF01, b'H');
    gb.bus.write8(0xFF02, 0x81);

    assert_eq!(gb.serial_output(), b"H");
    gb.bus.tick(8 * 512);
    assert_eq!(gb.bus.read8(0xFF0F) & 0x08, 0x08);
    assert_eq!(gb.bus.read8(0xFF01), 0xFF);
}

#[test]
fn oam_dma_copies_page_into_oam() {
    let mut gb = loaded(0x00, 0x00, &[]);
    for i in 0..0xA0u16 {
        gb.bus.write8(0xC100 + i, i as u8 ^ 0x5A);
    }

    gb.bus.write8(0xFF46, 0xC1);

    for i in 0..0xA0usize {
        assert_eq!(gb.bus.memory[0xFE00 + i], i as u8 ^ 0x5A);
    }
}

#[test]
fn general_hdma_copies_immediately() {
    let mut gb = loaded_cgb(&[]);
    for i in 0..0x20u16 {
        gb.bus.write8(0xC000 + i, 0x80 | i as u8);
    }
    gb.bus.write8(0xFF51, 0xC0);
    gb.bus.write8(0xFF52, 0x00);
    gb.bus.write8(0xFF53, 0x08);
    gb.bus.write8(0xFF54, 0x00);
    gb.bus.write8(0xFF55, 0x01);

    for i in 0..0x20usize {
        assert_eq!(gb.bus.memory[0x8800 + i], 0x80 | i as u8);
    }
    assert_eq!(gb.bus.read8(0xFF55), 0xFF);
}

#[test]
fn hblank_hdma_copies_one_block_per_line() {
    let mut gb = loaded_cgb(&[]);
    for i in 0..0x20u16 {
        gb.bus.write8(0xC000 + i, 0x40 | i as u8);
    }
    gb.bus.write8(0xFF51, 0xC0);
    gb.bus.write8(0xFF52, 0x00);
    gb.bus.write8(0xFF53, 0x00);
    gb.bus.write8(0xFF54, 0x00);
    gb.bus.write8(0xFF55, 0x81);
    assert_eq!(gb.bus.read8(0xFF55), 0x01);

    gb.bus.tick(80 + 172);
    assert_eq!(gb.bus.read8(0xFF55), 0x00);
    assert_eq!(gb.bus.memory[0x800F], 0x4F);
    assert_eq!(gb.bus.memory[0x8010], 0x00);

    gb.bus.tick(456);
    assert_eq!(gb.bus.read8(0xFF55), 0xFF);
    assert_eq!(gb.bus.memory[0x801F], 0x5F);
}

#[test]
fn battery_ram_survives_dump_and_reset() {
    let mut gb = loaded(0x03, 0x03, &[]);
    assert!(gb.has_battery());
    gb.bus.write8(0x0000, 0x0A);
    gb.bus.write8(0xA000, 0x77);

    let dump = gb.battery_ram().unwrap();
    assert_eq!(dump.len(), 0x8001);
    assert_eq!(dump[0], 0x00);
    assert_eq!(dump[1], 0x77);

    gb.reset(None);
    gb.bus.write8(0x0000, 0x0A);
    assert_eq!(gb.bus.read8(0xA000), 0x77);

    let mut fresh = loaded(0x03, 0x03, &[]);
    assert_eq!(
        fresh.load_battery_ram(&dump[..10]),
        Err(LoadError::BatteryRamSize {
            expected: 0x8001,
            actual: 10
        })
    );
    fresh.load_battery_ram(&dump).unwrap();
    fresh.bus.write8(0x0000, 0x0A);
    assert_eq!(fresh.bus.read8(0xA000), 0x77);
}

#[test]
fn battery_operations_need_a_cartridge() {
    let mut gb = GameBoy::new();
    assert_eq!(gb.battery_ram(), Err(LoadError::NoCartridge));
    assert_eq!(gb.load_battery_ram(&[]), Err(LoadError::NoCartridge));
    assert!(!gb.has_battery());
}

#[test]
fn init_drops_cartridge() {
    let mut gb = loaded(0x00, 0x00, &[]);
    gb.init();
    assert!(!gb.is_loaded());
    assert_eq!(gb.mapper(), None);
}

#[test]
fn lyc_match_sets_coincidence_flag() {
    let mut gb = loaded(0x00, 0x00, &[]);
    gb.bus.write8(0xFF0F, 0x00);
    gb.bus.write8(0xFFFF, 0x02);
    gb.bus.write8(0xFF41, 0x40);
    gb.bus.write8(0xFF45, 0x02);

    gb.bus.tick(2 * 456);

    assert_eq!(gb.bus.read8(0xFF44), 0x02);
    assert_eq!(gb.bus.read8(0xFF41) & 0x04, 0x04);
    assert_eq!(gb.bus.read8(0xFF0F) & 0x02, 0x02);
}

#[test]
fn screen_enable_waits_before_oam_scan() {
    let mut gb = loaded(0x00, 0x00, &[]);
    gb.bus.write8(0xFF40, 0x11);
    assert_eq!(gb.bus.read8(0xFF44), 0);
    assert_eq!(gb.bus.read8(0xFF41) & 0x03, 0);

    gb.bus.write8(0xFF40, 0x91);
    for _ in 0..60 {
        gb.bus.tick(4);
        assert_eq!(gb.bus.read8(0xFF44), 0);
        assert_eq!(gb.bus.video.mode(), LcdMode::HBlank);
    }

    gb.bus.tick(4);
    assert_eq!(gb.bus.read8(0xFF44), 0);
    assert_eq!(gb.bus.video.mode(), LcdMode::OamScan);
    assert_eq!(gb.bus.read8(0xFF41) & 0x03, 2);

    gb.bus.tick(80);
    assert_eq!(gb.bus.video.mode(), LcdMode::PixelTransfer);
}
