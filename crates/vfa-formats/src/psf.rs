//! PC Screen Font, both generations. PSF2 is what we write; the loader
//! takes either and tells them apart by magic.

use std::io::Write;

use vfa_core::glyph::bytes_per_glyph_rpad;
use vfa_core::{Font, Glyph, Size};

use crate::{io, FormatError, Result};

const PSF1_MAGIC: [u8; 2] = [0x36, 0x04];
const PSF1_MODE512: u8 = 0x01;
const PSF1_MODEHASTAB: u8 = 0x02;
const PSF1_MODEHASSEQ: u8 = 0x04;
const PSF1_SEPARATOR: u16 = 0xFFFF;
const PSF1_STARTSEQ: u16 = 0xFFFE;

const PSF2_MAGIC: [u8; 4] = [0x72, 0xB5, 0x4A, 0x86];
const PSF2_HAS_UNICODE_TABLE: u32 = 0x01;
const PSF2_SEPARATOR: u8 = 0xFF;
const PSF2_STARTSEQ: u8 = 0xFE;
const PSF2_HEADER_SIZE: u32 = 32;

pub fn load(font: &mut Font, path: &str) -> Result<()> {
    let data = io::read_binary(path)?;
    if data.starts_with(&PSF2_MAGIC) {
        load_psf2(font, path, &data)
    } else if data.starts_with(&PSF1_MAGIC) {
        load_psf1(font, path, &data)
    } else {
        Err(FormatError::invalid(path, "PSF", "bad magic"))
    }
}

fn le32(data: &[u8], at: usize) -> u32 {
    let mut b = [0u8; 4];
    b.copy_from_slice(&data[at..at + 4]);
    u32::from_le_bytes(b)
}

fn load_psf2(font: &mut Font, path: &str, data: &[u8]) -> Result<()> {
    if data.len() < PSF2_HEADER_SIZE as usize {
        return Err(FormatError::invalid(path, "PSF2", "truncated header"));
    }
    let version = le32(data, 4);
    let headersize = le32(data, 8) as usize;
    let flags = le32(data, 12);
    let length = le32(data, 16) as usize;
    let charsize = le32(data, 20) as usize;
    let height = le32(data, 24);
    let width = le32(data, 28);
    if version != 0 {
        return Err(FormatError::invalid(
            path,
            "PSF2",
            format!("unsupported version {version}"),
        ));
    }
    if charsize == 0 || charsize < bytes_per_glyph_rpad(Size::new(width, height)) {
        return Err(FormatError::invalid(
            path,
            "PSF2",
            format!("charsize {charsize} too small for {width}x{height}"),
        ));
    }

    let glyph_start = font.glyphs.len() as u32;
    let size = Size::new(width, height);
    for idx in 0..length {
        let at = headersize + idx * charsize;
        let Some(chunk) = data.get(at..at + charsize) else {
            break;
        };
        font.glyphs.push(Glyph::from_rpad(size, chunk));
    }

    if flags & PSF2_HAS_UNICODE_TABLE == 0 {
        return Ok(());
    }
    let mut at = headersize + length * charsize;
    let map = font.map_mut();
    for idx in 0..length as u32 {
        let mut in_seq = false;
        while let Some(&byte) = data.get(at) {
            if byte == PSF2_SEPARATOR {
                at += 1;
                break;
            }
            if byte == PSF2_STARTSEQ {
                // Combining sequences describe multi-codepoint aliases;
                // the font model only carries plain codepoints.
                in_seq = true;
                at += 1;
                continue;
            }
            match next_utf8(data, &mut at) {
                Some(cp) if !in_seq => map.add_i2u(glyph_start + idx, cp),
                _ => {}
            }
        }
    }
    Ok(())
}

/// Decode one UTF-8 scalar starting at `*at`, advancing past it. Malformed
/// bytes consume one position and yield nothing.
fn next_utf8(data: &[u8], at: &mut usize) -> Option<u32> {
    let lead = *data.get(*at)?;
    *at += 1;
    let (mut cp, extra) = match lead {
        0x00..=0x7F => (lead as u32, 0),
        0xC0..=0xDF => (lead as u32 & 0x1F, 1),
        0xE0..=0xEF => (lead as u32 & 0x0F, 2),
        0xF0..=0xF7 => (lead as u32 & 0x07, 3),
        _ => return None,
    };
    for _ in 0..extra {
        let cont = *data.get(*at)?;
        if cont & 0xC0 != 0x80 {
            return None;
        }
        *at += 1;
        cp = (cp << 6) | (cont as u32 & 0x3F);
    }
    Some(cp)
}

fn load_psf1(font: &mut Font, path: &str, data: &[u8]) -> Result<()> {
    if data.len() < 4 {
        return Err(FormatError::invalid(path, "PSF1", "truncated header"));
    }
    let mode = data[2];
    let charsize = data[3] as usize;
    if charsize == 0 {
        return Err(FormatError::invalid(path, "PSF1", "zero charsize"));
    }
    let length = if mode & PSF1_MODE512 != 0 { 512 } else { 256 };
    let size = Size::new(8, charsize as u32);

    let glyph_start = font.glyphs.len() as u32;
    for idx in 0..length {
        let at = 4 + idx * charsize;
        let Some(chunk) = data.get(at..at + charsize) else {
            break;
        };
        font.glyphs.push(Glyph::from_rpad(size, chunk));
    }

    if mode & (PSF1_MODEHASTAB | PSF1_MODEHASSEQ) == 0 {
        return Ok(());
    }
    let mut at = 4 + length * charsize;
    let map = font.map_mut();
    for idx in 0..length as u32 {
        let mut in_seq = false;
        loop {
            let Some(bytes) = data.get(at..at + 2) else {
                return Ok(());
            };
            at += 2;
            let unit = u16::from_le_bytes([bytes[0], bytes[1]]);
            match unit {
                PSF1_SEPARATOR => break,
                PSF1_STARTSEQ => in_seq = true,
                cp if !in_seq => map.add_i2u(glyph_start + idx, cp as u32),
                _ => {}
            }
        }
    }
    Ok(())
}

/// Write the font as PSF2 with a unicode table whenever a map is present.
pub fn save(font: &Font, path: &str) -> Result<()> {
    let mut out = Vec::new();
    let cell = font.cell_size();
    let charsize = bytes_per_glyph_rpad(cell) as u32;

    out.extend_from_slice(&PSF2_MAGIC);
    out.extend_from_slice(&0u32.to_le_bytes()); // version
    out.extend_from_slice(&PSF2_HEADER_SIZE.to_le_bytes());
    let flags = if font.unicode_map.is_some() {
        PSF2_HAS_UNICODE_TABLE
    } else {
        0
    };
    out.extend_from_slice(&flags.to_le_bytes());
    out.extend_from_slice(&(font.glyphs.len() as u32).to_le_bytes());
    out.extend_from_slice(&charsize.to_le_bytes());
    out.extend_from_slice(&cell.h.to_le_bytes());
    out.extend_from_slice(&cell.w.to_le_bytes());

    for g in &font.glyphs {
        out.extend_from_slice(&g.as_rowpad());
    }
    if let Some(map) = &font.unicode_map {
        for idx in 0..font.glyphs.len() as u32 {
            for cp in map.to_unicode(idx) {
                if let Some(c) = char::from_u32(cp) {
                    let mut buf = [0u8; 4];
                    out.extend_from_slice(c.encode_utf8(&mut buf).as_bytes());
                }
            }
            out.push(PSF2_SEPARATOR);
        }
    }

    let mut w = io::open_output(path)?;
    w.write_all(&out)
        .and_then(|()| w.flush())
        .map_err(|e| FormatError::io(path, e))
}
