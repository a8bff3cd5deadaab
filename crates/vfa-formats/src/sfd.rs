//! FontForge SplineFont database output, the sink for the vectorizer.
//!
//! Glyph outlines are emitted as straight-line SplineSets in the scaled
//! font coordinate system, one closed contour per popped polygon.

use std::io::Write;

use log::warn;

use vfa_core::{Algorithm, Font, Vectorizer};

use crate::{io, FormatError, Result};

const PLACEHOLDER_NAME: &str = "vfontas output";

pub fn save(font: &Font, path: &str, algo: Algorithm) -> Result<()> {
    let mut out = io::open_output(path)?;
    write_font(font, &mut out, algo).map_err(|e| FormatError::io(path, e))
}

fn write_font(font: &Font, out: &mut dyn Write, algo: Algorithm) -> std::io::Result<()> {
    if !font.props.contains_key("FontName") {
        warn!("no font name set; the output will carry a placeholder name (use setname)");
    }
    let prop = |key: &str, dflt: &str| -> String {
        font.props
            .get(key)
            .cloned()
            .unwrap_or_else(|| dflt.to_string())
    };
    let fontname = prop("FontName", PLACEHOLDER_NAME).replace(' ', "-");
    let fullname = prop("FullName", PLACEHOLDER_NAME);
    let familyname = prop("FamilyName", PLACEHOLDER_NAME);
    let weight = prop("Weight", "medium");
    let ttfweight = prop("TTFWeight", "500");

    let (sx, sy) = Vectorizer::DEFAULT_SCALE;
    let (ascent, descent) = font.find_ascent_descent();
    let ascent = ascent * sy;
    let descent = descent * sy;

    writeln!(out, "SplineFontDB: 3.0")?;
    writeln!(out, "FontName: {fontname}")?;
    writeln!(out, "FullName: {fullname}")?;
    writeln!(out, "FamilyName: {familyname}")?;
    writeln!(out, "Weight: {weight}")?;
    writeln!(out, "Version: 001.000")?;
    writeln!(out, "ItalicAngle: 0")?;
    writeln!(out, "UnderlinePosition: -100")?;
    writeln!(out, "UnderlineWidth: 40")?;
    writeln!(out, "Ascent: {ascent}")?;
    writeln!(out, "Descent: {descent}")?;
    writeln!(out, "NeedsXUIDChange: 1")?;
    writeln!(out, "FSType: 0")?;
    writeln!(out, "PfmFamily: 32")?;
    writeln!(out, "TTFWeight: {ttfweight}")?;
    writeln!(out, "TTFWidth: 5")?;
    if let Some(stylemap) = font.props.get("StyleMap") {
        writeln!(out, "StyleMap: {stylemap}")?;
    }
    writeln!(out, "Panose: 2 0 6 4 0 0 0 0 0 0")?;
    writeln!(out, "LineGap: 72")?;
    writeln!(out, "VLineGap: 0")?;
    writeln!(out, "OS2WinAscent: {ascent}")?;
    writeln!(out, "OS2WinAOffset: 1")?;
    writeln!(out, "OS2WinDescent: {descent}")?;
    writeln!(out, "OS2WinDOffset: 1")?;
    writeln!(out, "HheadAscent: {ascent}")?;
    writeln!(out, "HheadAOffset: 1")?;
    writeln!(out, "HheadDescent: {descent}")?;
    writeln!(out, "HheadDOffset: 1")?;
    writeln!(out, "Encoding: UnicodeBmp")?;
    writeln!(out, "UnicodeInterp: none")?;
    writeln!(out, "DisplaySize: -24")?;
    writeln!(out, "AntiAlias: 1")?;
    writeln!(out, "FitToEm: 1")?;
    writeln!(out, "WinInfo: 0 50 22")?;
    writeln!(out, "BeginChars: 65536 {}\n", font.glyphs.len())?;

    let raw_descent = descent / sy;
    match &font.unicode_map {
        None => {
            for (idx, _) in font.glyphs.iter().enumerate() {
                write_glyph(font, out, idx as u32, idx as u32, raw_descent, algo)?;
            }
        }
        Some(map) => {
            for (cp, idx) in map.iter_u2i() {
                write_glyph(font, out, idx, cp, raw_descent, algo)?;
            }
        }
    }
    writeln!(out, "EndChars")?;
    writeln!(out, "EndSplineFont")?;
    out.flush()
}

fn write_glyph(
    font: &Font,
    out: &mut dyn Write,
    idx: u32,
    cp: u32,
    descent: i32,
    algo: Algorithm,
) -> std::io::Result<()> {
    let Some(g) = font.glyphs.get(idx as usize) else {
        return Ok(());
    };
    let (sx, _) = Vectorizer::DEFAULT_SCALE;
    writeln!(out, "StartChar: {cp:04x}")?;
    writeln!(out, "Encoding: {cp} {cp} {idx}")?;
    writeln!(out, "Width: {}", g.size().w as i32 * sx)?;
    writeln!(out, "TeX: 0 0 0 0")?;
    writeln!(out, "Flags: MW")?;
    writeln!(out, "Fore")?;
    writeln!(out, "SplineSet")?;
    for poly in Vectorizer::new(g, descent).run(algo) {
        if poly.is_empty() {
            continue;
        }
        let v0 = poly[0].start;
        writeln!(out, "{} {} m 25", v0.x, v0.y)?;
        for e in &poly {
            writeln!(out, " {} {} l 25", e.end.x, e.end.y)?;
        }
    }
    writeln!(out, "EndSplineSet")?;
    writeln!(out, "EndChar")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use vfa_core::{Glyph, Size};

    fn tiny_font() -> Font {
        let mut font = Font::new();
        let mut g = Glyph::blank(Size::new(4, 4));
        g.set(1, 1, true);
        g.set(2, 1, true);
        font.glyphs.push(g);
        font.map_mut().add_i2u(0, 0x2D);
        font
    }

    #[test]
    fn test_sfd_structure() {
        let font = tiny_font();
        let dir = std::env::temp_dir().join("vfa-sfd-structure");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("font.sfd");
        save(&font, path.to_str().unwrap(), Algorithm::Simple).unwrap();
        let text = std::fs::read_to_string(&path).unwrap();

        assert!(text.starts_with("SplineFontDB: 3.0\n"));
        assert!(text.contains("FontName: vfontas-output"));
        assert!(text.contains("BeginChars: 65536 1"));
        assert!(text.contains("StartChar: 002d"));
        assert!(text.contains(" m 25\n"));
        assert!(text.ends_with("EndChars\nEndSplineFont\n"));
    }

    #[test]
    fn test_sfd_uses_name_properties() {
        let mut font = tiny_font();
        font.props.insert("FontName".into(), "My Face".into());
        font.props.insert("Weight".into(), "bold".into());
        font.props.insert("TTFWeight".into(), "700".into());
        font.props.insert("StyleMap".into(), "0x0020".into());

        let dir = std::env::temp_dir().join("vfa-sfd-props");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("font.sfd");
        save(&font, path.to_str().unwrap(), Algorithm::N2).unwrap();
        let text = std::fs::read_to_string(&path).unwrap();

        // PostScript names cannot contain spaces.
        assert!(text.contains("FontName: My-Face"));
        assert!(text.contains("Weight: bold"));
        assert!(text.contains("TTFWeight: 700"));
        assert!(text.contains("StyleMap: 0x0020"));
    }
}
