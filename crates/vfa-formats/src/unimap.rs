//! Unicode mapping text files, as consumed by the console tools:
//! `<index>[-<index>] idem` or `<index> U+hhhh [U+hhhh ...]` lines.

use std::io::{BufRead, Write};

use log::warn;

use vfa_core::{Font, UnicodeMap};

use crate::{io, FormatError, Result};

/// Parse a unimap file into `map`. `idem` entries are a no-op because an
/// unmapped index already maps to itself; ranged left-hand sides are only
/// meaningful with `idem`.
pub fn load(map: &mut UnicodeMap, path: &str) -> Result<()> {
    let reader = io::open_input(path)?;
    for (n, line) in reader.lines().enumerate() {
        let line = line.map_err(|e| FormatError::io(path, e))?;
        let lnum = n + 1;
        let body = line.split('#').next().unwrap_or("");
        let mut words = body.split_whitespace();
        let Some(lhs) = words.next() else {
            continue;
        };

        let (first, range_end) = match lhs.split_once('-') {
            Some((a, b)) => (parse_int(a), parse_int(b)),
            None => (parse_int(lhs), None),
        };
        let Some(first) = first else {
            warn!("{path}:{lnum}: unparsable index {lhs:?}");
            continue;
        };

        let mut mapped_any = false;
        for word in words {
            if word == "idem" {
                // Identity is the default; nothing to record.
                mapped_any = true;
                continue;
            }
            let Some(hex) = word.strip_prefix("U+") else {
                warn!("{path}:{lnum}: unexpected token {word:?}");
                break;
            };
            let Ok(cp) = u32::from_str_radix(hex, 16) else {
                warn!("{path}:{lnum}: bad codepoint {word:?}");
                break;
            };
            if range_end.is_some() {
                warn!("{path}:{lnum}: ranges are only valid with idem");
                break;
            }
            map.add_i2u(first, cp);
            mapped_any = true;
        }
        if !mapped_any {
            warn!("{path}:{lnum}: index without mapping");
        }
    }
    Ok(())
}

fn parse_int(s: &str) -> Option<u32> {
    if let Some(hex) = s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        u32::from_str_radix(hex, 16).ok()
    } else {
        s.parse().ok()
    }
}

/// Write the explicit entries back out, one index per line.
pub fn save(font: &Font, path: &str) -> Result<()> {
    let mut out = io::open_output(path)?;
    let write = |out: &mut dyn Write| -> std::io::Result<()> {
        if let Some(map) = &font.unicode_map {
            for (idx, cps) in map.iter_i2u() {
                write!(out, "0x{idx:02x}\t")?;
                for cp in cps {
                    write!(out, "U+{cp:04x} ")?;
                }
                writeln!(out)?;
            }
        }
        out.flush()
    };
    write(&mut *out).map_err(|e| FormatError::io(path, e))
}
