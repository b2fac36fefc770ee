use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use pocketboy_gb::{GameBoy, Model, FRAMEBUFFER_LEN, SCREEN_HEIGHT, SCREEN_WIDTH};

const USAGE: &str = "Usage: pb_frame_dump <rom_path> <out_path> [frames] [battery_out_path]";

/// DMG shades 0-3, lightest first.
const DMG_GRAY: [u8; 4] = [0xFF, 0xAA, 0x55, 0x00];

fn main() -> Result<()> {
    env_logger::init();

    let mut args = std::env::args().skip(1);
    let Some(rom_path) = args.next().map(PathBuf::from) else {
        bail!(USAGE);
    };
    let Some(out_path) = args.next().map(PathBuf::from) else {
        bail!(USAGE);
    };
    let frames: u32 = match args.next() {
        Some(arg) => arg
            .parse()
            .with_context(|| format!("invalid frame count '{arg}'"))?,
        None => 120,
    };
    let battery_path = args.next().map(PathBuf::from);

    let rom = std::fs::read(&rom_path)
        .with_context(|| format!("failed to read ROM '{}'", rom_path.display()))?;

    let mut gb = GameBoy::new();
    gb.load_rom(&rom)
        .with_context(|| format!("failed to load ROM '{}'", rom_path.display()))?;

    let mut frame = vec![0u16; FRAMEBUFFER_LEN];
    let mut samples = 0usize;
    for _ in 0..frames {
        samples += gb.run_to_vblank(&mut frame);
    }

    let image = match gb.model() {
        Model::Dmg => encode_pgm(&frame),
        Model::Cgb => encode_ppm(&frame),
    };
    std::fs::write(&out_path, &image)
        .with_context(|| format!("failed to write '{}'", out_path.display()))?;

    println!(
        "Wrote {}x{} {:?} frame after {} frames ({} audio samples) to '{}'",
        SCREEN_WIDTH,
        SCREEN_HEIGHT,
        gb.model(),
        frames,
        samples,
        out_path.display()
    );

    if let Some(path) = battery_path {
        let ram = gb.battery_ram()?;
        std::fs::write(&path, &ram)
            .with_context(|| format!("failed to write battery RAM '{}'", path.display()))?;
        println!("Wrote {} bytes of battery RAM to '{}'", ram.len(), path.display());
    }

    let serial = gb.serial_output();
    if !serial.is_empty() {
        println!("Serial: {}", String::from_utf8_lossy(serial));
    }

    Ok(())
}

fn encode_pgm(frame: &[u16]) -> Vec<u8> {
    let mut out = format!("P5\n{SCREEN_WIDTH} {SCREEN_HEIGHT}\n255\n").into_bytes();
    out.extend(frame.iter().map(|&shade| DMG_GRAY[usize::from(shade & 0x03)]));
    out
}

fn encode_ppm(frame: &[u16]) -> Vec<u8> {
    let mut out = format!("P6\n{SCREEN_WIDTH} {SCREEN_HEIGHT}\n255\n").into_bytes();
    for &color in frame {
        for shift in [0, 5, 10] {
            let channel = ((color >> shift) & 0x1F) as u8;
            out.push((channel << 3) | (channel >> 2));
        }
    }
    out
}
