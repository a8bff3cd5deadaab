// this_file: crates/vfa-formats/src/pcf.rs

//! X11 PCF bitmap font loader.
//!
//! Only the tables the assembler needs are read: metrics, bitmaps and the
//! BDF encodings. The table of contents is always little-endian; each
//! table's payload carries its own byte/bit order in the format word.

use vfa_core::{Font, Glyph, Size};

use crate::{io, FormatError, Result};

const PCF_MAGIC: [u8; 4] = [1, b'f', b'c', b'p'];

const PCF_METRICS: u32 = 1 << 2;
const PCF_BITMAPS: u32 = 1 << 3;
const PCF_BDF_ENCODINGS: u32 = 1 << 5;

const PCF_COMPRESSED_METRICS: u32 = 0x100;
const PCF_BYTE_BIG: u32 = 1 << 2;
const PCF_BIT_BIG: u32 = 1 << 3;

#[derive(Debug, Clone, Copy)]
struct Metric {
    left: i32,
    right: i32,
    ascent: i32,
    descent: i32,
}

struct Table<'a> {
    format: u32,
    data: &'a [u8],
}

struct Cursor<'a> {
    data: &'a [u8],
    at: usize,
    big: bool,
}

impl<'a> Cursor<'a> {
    fn new(table: &Table<'a>, at: usize) -> Self {
        Self {
            data: table.data,
            at,
            big: table.format & PCF_BYTE_BIG != 0,
        }
    }

    fn take(&mut self, n: usize) -> Option<&'a [u8]> {
        let b = self.data.get(self.at..self.at + n)?;
        self.at += n;
        Some(b)
    }

    fn u8(&mut self) -> Option<u8> {
        Some(self.take(1)?[0])
    }

    fn u16(&mut self) -> Option<u16> {
        let b = self.take(2)?;
        Some(if self.big {
            u16::from_be_bytes([b[0], b[1]])
        } else {
            u16::from_le_bytes([b[0], b[1]])
        })
    }

    fn i16(&mut self) -> Option<i16> {
        self.u16().map(|v| v as i16)
    }

    fn u32(&mut self) -> Option<u32> {
        let b = self.take(4)?;
        let arr = [b[0], b[1], b[2], b[3]];
        Some(if self.big {
            u32::from_be_bytes(arr)
        } else {
            u32::from_le_bytes(arr)
        })
    }
}

pub fn load(font: &mut Font, path: &str) -> Result<()> {
    let data = io::read_binary(path)?;
    if !data.starts_with(&PCF_MAGIC) {
        return Err(FormatError::invalid(path, "PCF", "bad magic"));
    }
    let bad = |reason: &str| FormatError::invalid(path, "PCF", reason.to_string());

    let ntables = u32::from_le_bytes(
        data.get(4..8)
            .ok_or_else(|| bad("truncated header"))?
            .try_into()
            .unwrap_or_default(),
    ) as usize;

    let metrics_tab = find_table(&data, ntables, PCF_METRICS).ok_or_else(|| bad("no metrics table"))?;
    let bitmaps_tab = find_table(&data, ntables, PCF_BITMAPS).ok_or_else(|| bad("no bitmaps table"))?;
    let encodings_tab = find_table(&data, ntables, PCF_BDF_ENCODINGS);

    let metrics = read_metrics(&metrics_tab).ok_or_else(|| bad("truncated metrics"))?;
    let glyph_start = font.glyphs.len() as u32;
    read_bitmaps(font, &bitmaps_tab, &metrics).ok_or_else(|| bad("truncated bitmaps"))?;
    if let Some(tab) = encodings_tab {
        read_encodings(font, &tab, glyph_start).ok_or_else(|| bad("truncated encodings"))?;
    }
    Ok(())
}

/// Walk the little-endian table of contents for one table type.
fn find_table(data: &[u8], ntables: usize, wanted: u32) -> Option<Table<'_>> {
    for i in 0..ntables {
        let at = 8 + i * 16;
        let entry = data.get(at..at + 16)?;
        let ttype = u32::from_le_bytes(entry[0..4].try_into().ok()?);
        if ttype != wanted {
            continue;
        }
        let format = u32::from_le_bytes(entry[4..8].try_into().ok()?);
        let size = u32::from_le_bytes(entry[8..12].try_into().ok()?) as usize;
        let offset = u32::from_le_bytes(entry[12..16].try_into().ok()?) as usize;
        return Some(Table {
            format,
            data: data.get(offset..offset + size)?,
        });
    }
    None
}

fn read_metrics(tab: &Table) -> Option<Vec<Metric>> {
    let mut c = Cursor::new(tab, 4); // skip the in-table format copy
    let mut out = Vec::new();
    if tab.format & PCF_COMPRESSED_METRICS != 0 {
        let count = c.u16()? as usize;
        for _ in 0..count {
            let left = c.u8()? as i32 - 0x80;
            let right = c.u8()? as i32 - 0x80;
            let _width = c.u8()?;
            let ascent = c.u8()? as i32 - 0x80;
            let descent = c.u8()? as i32 - 0x80;
            out.push(Metric {
                left,
                right,
                ascent,
                descent,
            });
        }
    } else {
        let count = c.u32()? as usize;
        for _ in 0..count {
            let left = c.i16()? as i32;
            let right = c.i16()? as i32;
            let _width = c.i16()?;
            let ascent = c.i16()? as i32;
            let descent = c.i16()? as i32;
            let _attrs = c.u16()?;
            out.push(Metric {
                left,
                right,
                ascent,
                descent,
            });
        }
    }
    Some(out)
}

fn read_bitmaps(font: &mut Font, tab: &Table, metrics: &[Metric]) -> Option<()> {
    let mut c = Cursor::new(tab, 4);
    let count = c.u32()? as usize;
    let mut offsets = Vec::with_capacity(count);
    for _ in 0..count {
        offsets.push(c.u32()? as usize);
    }
    let mut sizes = [0usize; 4];
    for s in &mut sizes {
        *s = c.u32()? as usize;
    }
    let pad_index = (tab.format & 3) as usize;
    let glyph_pad = 1usize << pad_index;
    let scan_unit = 1usize << ((tab.format >> 4) & 3);
    let bit_big = tab.format & PCF_BIT_BIG != 0;
    let byte_big = tab.format & PCF_BYTE_BIG != 0;
    let bitmap_data = tab.data.get(c.at..c.at + sizes[pad_index])?;

    for (i, m) in metrics.iter().enumerate().take(count) {
        let w = (m.right - m.left).max(0) as u32;
        let h = (m.ascent + m.descent).max(0) as u32;
        let stride = ((w as usize + 7) / 8).next_multiple_of(glyph_pad);
        let mut g = Glyph::blank(Size::new(w, h));
        for y in 0..h as usize {
            let row = bitmap_data.get(offsets[i] + y * stride..offsets[i] + (y + 1) * stride)?;
            let row = normalize_row(row, scan_unit, bit_big, byte_big);
            for x in 0..w as usize {
                if row[x / 8] & (1 << (7 - x % 8)) != 0 {
                    g.set(x as u32, y as u32, true);
                }
            }
        }
        font.glyphs.push(g);
    }
    Some(())
}

/// Rewrite one bitmap row as an MSB-first byte stream.
fn normalize_row(row: &[u8], scan_unit: usize, bit_big: bool, byte_big: bool) -> Vec<u8> {
    let mut out = row.to_vec();
    if !byte_big && scan_unit > 1 {
        for chunk in out.chunks_mut(scan_unit) {
            chunk.reverse();
        }
    }
    if !bit_big {
        for b in &mut out {
            *b = b.reverse_bits();
        }
    }
    out
}

fn read_encodings(font: &mut Font, tab: &Table, glyph_start: u32) -> Option<()> {
    let mut c = Cursor::new(tab, 4);
    let first_col = c.i16()? as i32;
    let last_col = c.i16()? as i32;
    let first_row = c.i16()? as i32;
    let last_row = c.i16()? as i32;
    let _default_char = c.u16()?;

    let map = font.map_mut();
    for row in first_row..=last_row {
        for col in first_col..=last_col {
            let idx = c.u16()?;
            if idx == 0xFFFF {
                continue;
            }
            let cp = (row as u32) * 256 + col as u32;
            map.add_i2u(glyph_start + idx as u32, cp);
        }
    }
    Some(())
}
