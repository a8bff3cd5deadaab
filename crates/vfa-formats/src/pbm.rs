//! Per-glyph P1 portable bitmaps, one file per codepoint.

use std::io::Write;
use std::path::Path;

use vfa_core::Font;

use crate::{FormatError, Result};

pub fn save_dir(font: &Font, dir: &str) -> Result<()> {
    std::fs::create_dir_all(dir).map_err(|e| FormatError::io(dir, e))?;
    for (idx, g) in font.glyphs.iter().enumerate() {
        let cps = match &font.unicode_map {
            Some(map) => map.to_unicode(idx as u32),
            None => [idx as u32].into(),
        };
        for cp in cps {
            let path = Path::new(dir).join(format!("{cp:04x}.pbm"));
            let mut file = std::fs::File::create(&path)
                .map_err(|e| FormatError::io(&path.to_string_lossy(), e))?;
            file.write_all(g.as_pbm().as_bytes())
                .map_err(|e| FormatError::io(&path.to_string_lossy(), e))?;
        }
    }
    Ok(())
}
