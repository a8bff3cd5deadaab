//! BDF text fonts, the lingua franca of `gbdfed` and `bdftopcf`.
//!
//! The writer emits the fixed property block X11 consumers expect for a
//! character-cell font; the loader handles the subset those tools produce
//! (uniform cells, per-glyph BBX, hex bitmap rows).

use std::io::{BufRead, Write};

use vfa_core::{Font, Glyph, Size};

use crate::{io, FormatError, Result};

pub fn save(font: &Font, path: &str) -> Result<()> {
    let mut out = io::open_output(path)?;
    write_font(font, &mut out).map_err(|e| FormatError::io(path, e))
}

fn write_font(font: &Font, out: &mut dyn Write) -> std::io::Result<()> {
    let sz0 = font.cell_size();
    // X logical font descriptions do not permit dashes in the name.
    let name = font
        .props
        .get("FamilyName")
        .map(|n| n.replace('-', " "))
        .unwrap_or_else(|| "vfontas output".to_string());

    writeln!(out, "STARTFONT 2.1")?;
    writeln!(
        out,
        "FONT -misc-{name}-medium-r-normal--{}-{}-75-75-c-{}-iso10646-1",
        sz0.h,
        10 * sz0.h,
        10 * sz0.w
    )?;
    writeln!(out, "SIZE {} 75 75", sz0.h)?;
    writeln!(out, "FONTBOUNDINGBOX {} {} 0 -{}", sz0.w, sz0.h, sz0.h / 4)?;
    writeln!(out, "STARTPROPERTIES 24")?;
    writeln!(out, "FONT_TYPE \"Bitmap\"")?;
    writeln!(out, "FONTNAME_REGISTRY \"\"")?;
    writeln!(out, "FOUNDRY \"misc\"")?;
    writeln!(out, "FAMILY_NAME \"{name}\"")?;
    writeln!(out, "WEIGHT_NAME \"medium\"")?;
    writeln!(out, "SLANT \"r\"")?;
    writeln!(out, "SETWIDTH_NAME \"normal\"")?;
    writeln!(out, "PIXEL_SIZE {}", sz0.h)?;
    writeln!(out, "POINT_SIZE {}", 10 * sz0.h)?;
    writeln!(out, "SPACING \"C\"")?;
    writeln!(out, "AVERAGE_WIDTH {}", 10 * sz0.w)?;
    writeln!(out, "FONT \"{name}\"")?;
    writeln!(out, "WEIGHT 10")?;
    writeln!(out, "RESOLUTION 75")?;
    writeln!(out, "RESOLUTION_X 75")?;
    writeln!(out, "RESOLUTION_Y 75")?;
    writeln!(out, "CHARSET_REGISTRY \"ISO10646\"")?;
    writeln!(out, "CHARSET_ENCODING \"1\"")?;
    writeln!(out, "QUAD_WIDTH {}", sz0.w)?;
    let has_replacement = font
        .unicode_map
        .as_ref()
        .is_some_and(|m| m.to_index(0xFFFD).is_some());
    writeln!(out, "DEFAULT_CHAR {}", if has_replacement { 65533 } else { 0 })?;
    writeln!(out, "FONT_ASCENT {}", sz0.h * 12 / 16)?;
    writeln!(out, "FONT_DESCENT {}", sz0.h * 4 / 16)?;
    writeln!(out, "CAP_HEIGHT {}", sz0.h)?;
    writeln!(out, "X_HEIGHT {}", sz0.h * 7 / 16)?;
    writeln!(out, "ENDPROPERTIES")?;

    match &font.unicode_map {
        None => {
            writeln!(out, "CHARS {}", font.glyphs.len())?;
            for (idx, g) in font.glyphs.iter().enumerate() {
                write_glyph(out, g, idx as u32)?;
            }
        }
        Some(map) => {
            writeln!(out, "CHARS {}", map.len_u2i())?;
            for (cp, idx) in map.iter_u2i() {
                if let Some(g) = font.glyphs.get(idx as usize) {
                    write_glyph(out, g, cp)?;
                }
            }
        }
    }
    writeln!(out, "ENDFONT")?;
    out.flush()
}

fn write_glyph(out: &mut dyn Write, g: &Glyph, cp: u32) -> std::io::Result<()> {
    let sz = g.size();
    writeln!(out, "STARTCHAR U+{cp:04x}")?;
    writeln!(out, "ENCODING {cp}")?;
    writeln!(out, "SWIDTH 1000 0")?;
    writeln!(out, "DWIDTH {} 0", sz.w)?;
    writeln!(out, "BBX {} {} 0 -{}", sz.w, sz.h, sz.h / 4)?;
    writeln!(out, "BITMAP")?;
    let byteperline = (sz.w as usize + 7) / 8;
    for row in g.as_rowpad().chunks(byteperline.max(1)) {
        for b in row {
            write!(out, "{b:02x}")?;
        }
        writeln!(out)?;
    }
    writeln!(out, "ENDCHAR")?;
    Ok(())
}

pub fn load(font: &mut Font, path: &str) -> Result<()> {
    let reader = io::open_input(path)?;
    let mut lines = reader.lines();
    let mut saw_startfont = false;

    while let Some(line) = lines.next() {
        let line = line.map_err(|e| FormatError::io(path, e))?;
        let mut words = line.split_whitespace();
        match words.next() {
            Some("STARTFONT") => saw_startfont = true,
            Some("STARTCHAR") => {
                if !saw_startfont {
                    return Err(FormatError::invalid(path, "BDF", "STARTCHAR before STARTFONT"));
                }
                load_char(font, path, &mut lines)?;
            }
            Some("ENDFONT") => return Ok(()),
            _ => {}
        }
    }
    if !saw_startfont {
        return Err(FormatError::invalid(path, "BDF", "missing STARTFONT"));
    }
    Ok(())
}

fn load_char(
    font: &mut Font,
    path: &str,
    lines: &mut impl Iterator<Item = std::io::Result<String>>,
) -> Result<()> {
    let mut encoding: Option<i64> = None;
    let mut size = Size::default();
    let mut rows: Vec<u8> = Vec::new();
    let mut in_bitmap = false;

    for line in lines {
        let line = line.map_err(|e| FormatError::io(path, e))?;
        let trimmed = line.trim();
        if trimmed == "ENDCHAR" {
            break;
        }
        if in_bitmap {
            for pair in trimmed.as_bytes().chunks_exact(2) {
                if let Ok(b) = u8::from_str_radix(std::str::from_utf8(pair).unwrap_or(""), 16) {
                    rows.push(b);
                }
            }
            continue;
        }
        let mut words = trimmed.split_whitespace();
        match words.next() {
            Some("ENCODING") => {
                encoding = words.next().and_then(|w| w.parse().ok());
            }
            Some("BBX") => {
                let w = words.next().and_then(|w| w.parse().ok()).unwrap_or(0);
                let h = words.next().and_then(|w| w.parse().ok()).unwrap_or(0);
                size = Size::new(w, h);
            }
            Some("BITMAP") => in_bitmap = true,
            _ => {}
        }
    }

    if size.w == 0 || size.h == 0 {
        return Err(FormatError::invalid(path, "BDF", "glyph without BBX"));
    }
    let idx = font.glyphs.len() as u32;
    font.glyphs.push(Glyph::from_rpad(size, &rows));
    if let Some(cp) = encoding.filter(|&cp| cp >= 0) {
        font.map_mut().add_i2u(idx, cp as u32);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bdf_round_trip_through_our_own_writer() {
        let mut font = Font::new();
        let mut g = Glyph::blank(Size::new(8, 16));
        g.set(2, 3, true);
        g.set(7, 15, true);
        font.glyphs.push(g);
        font.map_mut().add_i2u(0, 0x41);
        font.props
            .insert("FamilyName".into(), "Test-Face".into());

        let dir = std::env::temp_dir().join("vfa-bdf-roundtrip");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("font.bdf");
        let path = path.to_str().unwrap();
        save(&font, path).unwrap();

        let text = std::fs::read_to_string(path).unwrap();
        assert!(text.contains("FAMILY_NAME \"Test Face\""));
        assert!(text.contains("STARTCHAR U+0041"));

        let mut re = Font::new();
        load(&mut re, path).unwrap();
        assert_eq!(re.glyphs, font.glyphs);
        assert_eq!(re.unicode_map.as_ref().unwrap().to_index(0x41), Some(0));
    }

    #[test]
    fn test_bdf_load_rejects_garbage() {
        let dir = std::env::temp_dir().join("vfa-bdf-garbage");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("junk.bdf");
        std::fs::write(&path, "this is not a bdf\n").unwrap();
        let mut font = Font::new();
        assert!(load(&mut font, path.to_str().unwrap()).is_err());
    }
}
