//! Headerless bitmap fonts: classic DOS/BIOS `.fnt` dumps and raw
//! row-padded streams.

use std::io::Write;

use vfa_core::glyph::bytes_per_glyph_rpad;
use vfa_core::{Font, Glyph, Size};

use crate::{io, FormatError, Result};

/// Load an 8-pixel-wide font, guessing the height from the file size:
/// anything under 8 KiB is assumed to hold 256 glyphs, and exactly 8 KiB
/// is taken as 8x16x512 (the common case over 8x32x256).
pub fn load(font: &mut Font, path: &str) -> Result<()> {
    let data = io::read_binary(path)?;
    let height = match data.len() {
        0 => return Err(FormatError::invalid(path, "FNT", "empty file")),
        n if n < 8192 => (n / 256) as u32,
        8192 => 16,
        _ => 16,
    };
    if height == 0 {
        return Err(FormatError::invalid(
            path,
            "FNT",
            format!("{} bytes is too small for 256 glyphs", data.len()),
        ));
    }
    load_chunks(font, &data, Size::new(8, height));
    Ok(())
}

/// Load an 8-pixel-wide font with an explicit glyph height.
pub fn load_with_height(font: &mut Font, path: &str, height: u32) -> Result<()> {
    if height == 0 {
        return Err(FormatError::invalid(path, "FNT", "zero height"));
    }
    let data = io::read_binary(path)?;
    load_chunks(font, &data, Size::new(8, height));
    Ok(())
}

/// Load a raw row-padded stream with explicit geometry.
pub fn load_raw(font: &mut Font, path: &str, width: u32, height: u32) -> Result<()> {
    if width == 0 || height == 0 {
        return Err(FormatError::invalid(path, "raw bitmap", "zero geometry"));
    }
    let data = io::read_binary(path)?;
    load_chunks(font, &data, Size::new(width, height));
    Ok(())
}

fn load_chunks(font: &mut Font, data: &[u8], size: Size) {
    let bpc = bytes_per_glyph_rpad(size);
    for chunk in data.chunks_exact(bpc) {
        font.glyphs.push(Glyph::from_rpad(size, chunk));
    }
}

/// Dump the tightly packed glyph bitmaps back to back, the inverse of
/// [`load`] for byte-aligned widths.
pub fn save(font: &Font, path: &str) -> Result<()> {
    let mut out = io::open_output(path)?;
    for g in &font.glyphs {
        out.write_all(g.packed())
            .map_err(|e| FormatError::io(path, e))?;
    }
    out.flush().map_err(|e| FormatError::io(path, e))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_font_saves_as_zeros() {
        let mut font = Font::new();
        font.init_256_blanks();
        let dir = std::env::temp_dir().join("vfa-fnt-blank");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("blank.fnt");
        save(&font, path.to_str().unwrap()).unwrap();
        let data = std::fs::read(&path).unwrap();
        assert_eq!(data.len(), 256 * 16);
        assert!(data.iter().all(|&b| b == 0));
    }

    #[test]
    fn test_height_heuristic() {
        let dir = std::env::temp_dir().join("vfa-fnt-heuristic");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("vga.fnt");
        std::fs::write(&path, vec![0u8; 256 * 14]).unwrap();

        let mut font = Font::new();
        load(&mut font, path.to_str().unwrap()).unwrap();
        assert_eq!(font.glyphs.len(), 256);
        assert_eq!(font.cell_size(), Size::new(8, 14));
    }

    #[test]
    fn test_raw_round_trip() {
        let mut font = Font::new();
        font.glyphs.push(Glyph::blank(Size::new(8, 8)));
        font.glyphs[0].set(1, 2, true);
        let dir = std::env::temp_dir().join("vfa-fnt-raw");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("raw.bin");
        save(&font, path.to_str().unwrap()).unwrap();

        let mut re = Font::new();
        load_raw(&mut re, path.to_str().unwrap(), 8, 8).unwrap();
        assert_eq!(re.glyphs, font.glyphs);
    }
}
