//! GNU Unifont style `.hex` files: one `codepoint:bitmap` pair per line.

use std::io::BufRead;

use log::warn;

use vfa_core::{Font, Glyph, Size};

use crate::{io, Result};

/// Load a hex file. Sixteen data bytes make an 8x16 glyph, thirty-two a
/// 16x16 one; anything else is reported and skipped.
pub fn load(font: &mut Font, path: &str) -> Result<()> {
    let reader = io::open_input(path)?;
    for (lnum, line) in reader.lines().enumerate() {
        let line = line.map_err(|e| crate::FormatError::io(path, e))?;
        let Some((cp_part, bits_part)) = line.split_once(':') else {
            continue;
        };
        let Ok(cp) = u32::from_str_radix(cp_part.trim(), 16) else {
            continue;
        };

        let mut bytes = Vec::with_capacity(32);
        let hex = bits_part.trim();
        let mut it = hex.as_bytes().chunks_exact(2);
        for pair in &mut it {
            match u8::from_str_radix(std::str::from_utf8(pair).unwrap_or(""), 16) {
                Ok(b) if bytes.len() < 32 => bytes.push(b),
                _ => break,
            }
        }

        let size = match bytes.len() {
            16 => Size::new(8, 16),
            32 => Size::new(16, 16),
            n => {
                warn!("{path}:{}: unrecognized glyph size ({n} bytes)", lnum + 1);
                continue;
            }
        };
        let idx = font.glyphs.len() as u32;
        font.glyphs.push(Glyph::from_rpad(size, &bytes));
        font.map_mut().add_i2u(idx, cp);
    }
    Ok(())
}
