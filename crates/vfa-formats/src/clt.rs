//! Consoleet text bitmaps: one `PCLT` file per glyph, named by codepoint.

use std::io::{BufRead, Write};
use std::path::Path;

use log::warn;

use vfa_core::{Font, Glyph, Size};

use crate::{FormatError, Result};

/// Load every `<hex-codepoint>.txt` glyph file from a directory. Files
/// that do not parse as CLT are reported and skipped.
pub fn load_dir(font: &mut Font, dir: &str) -> Result<()> {
    let entries = std::fs::read_dir(dir).map_err(|e| FormatError::io(dir, e))?;
    let mut names: Vec<String> = entries
        .filter_map(|e| e.ok())
        .filter_map(|e| e.file_name().into_string().ok())
        .filter(|n| !n.starts_with('.'))
        .collect();
    names.sort();

    for name in names {
        let Some(stem) = name.split('.').next() else {
            continue;
        };
        let Ok(cp) = u32::from_str_radix(stem, 16) else {
            continue;
        };
        let path = format!("{dir}/{name}");
        let file = std::fs::File::open(&path).map_err(|e| FormatError::io(&path, e))?;
        match parse_glyph(std::io::BufReader::new(file)) {
            Ok(Some(g)) => {
                let idx = font.glyphs.len() as u32;
                font.glyphs.push(g);
                font.map_mut().add_i2u(idx, cp);
            }
            Ok(None) => warn!("{path}: not recognized as a CLT file"),
            Err(e) => return Err(FormatError::io(&path, e)),
        }
    }
    Ok(())
}

/// Parse one CLT stream; `None` when the header does not match.
fn parse_glyph(reader: impl BufRead) -> std::io::Result<Option<Glyph>> {
    let mut lines = reader.lines();
    match lines.next() {
        Some(line) => {
            if line?.trim_end() != "PCLT" {
                return Ok(None);
            }
        }
        None => return Ok(None),
    }
    let Some(dim_line) = lines.next() else {
        return Ok(None);
    };
    let dim_line = dim_line?;
    let mut dims = dim_line.split_whitespace();
    let (Some(w), Some(h)) = (dims.next(), dims.next()) else {
        return Ok(None);
    };
    let (Ok(w), Ok(h)) = (w.parse::<u32>(), h.parse::<u32>()) else {
        return Ok(None);
    };

    let mut g = Glyph::blank(Size::new(w, h));
    for (y, line) in lines.enumerate() {
        let line = line?;
        if y as u32 >= h {
            break;
        }
        let mut chars = line.chars();
        for x in 0..w {
            match chars.next() {
                Some('#') => g.set(x, y as u32, true),
                Some(_) => {}
                None => break,
            }
            chars.next(); // second character of the pixel pair
        }
    }
    Ok(Some(g))
}

/// Write one CLT file per glyph (per codepoint when a map is present).
pub fn save_dir(font: &Font, dir: &str) -> Result<()> {
    std::fs::create_dir_all(dir).map_err(|e| FormatError::io(dir, e))?;
    for (idx, g) in font.glyphs.iter().enumerate() {
        let cps = match &font.unicode_map {
            Some(map) => map.to_unicode(idx as u32),
            None => [idx as u32].into(),
        };
        for cp in cps {
            let path = Path::new(dir).join(format!("{cp:04x}.txt"));
            let mut file = std::fs::File::create(&path)
                .map_err(|e| FormatError::io(&path.to_string_lossy(), e))?;
            file.write_all(g.as_pclt().as_bytes())
                .map_err(|e| FormatError::io(&path.to_string_lossy(), e))?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clt_round_trip() {
        let mut font = Font::new();
        let mut g = Glyph::blank(Size::new(9, 4));
        g.set(0, 0, true);
        g.set(8, 3, true);
        font.glyphs.push(g);
        font.map_mut().add_i2u(0, 0x2524);

        let dir = std::env::temp_dir().join("vfa-clt-roundtrip");
        let _ = std::fs::remove_dir_all(&dir);
        let dir = dir.to_str().unwrap().to_string();
        save_dir(&font, &dir).unwrap();

        let mut re = Font::new();
        load_dir(&mut re, &dir).unwrap();
        assert_eq!(re.glyphs, font.glyphs);
        assert_eq!(re.unicode_map.as_ref().unwrap().to_index(0x2524), Some(0));
    }

    #[test]
    fn test_non_clt_file_is_skipped() {
        let dir = std::env::temp_dir().join("vfa-clt-skip");
        let _ = std::fs::remove_dir_all(&dir);
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(dir.join("0041.txt"), "definitely not PCLT\n").unwrap();
        let mut font = Font::new();
        load_dir(&mut font, dir.to_str().unwrap()).unwrap();
        assert!(font.glyphs.is_empty());
    }
}
