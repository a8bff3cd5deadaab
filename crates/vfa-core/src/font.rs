//! The font container: an indexed glyph sequence, an optional unicode map
//! and a free-form property map picked up by the format writers.

use std::collections::BTreeMap;

use log::warn;

use crate::geometry::{Pos, Rect, Size};
use crate::glyph::Glyph;
use crate::unimap::UnicodeMap;

/// Codepoint ranges that receive the line-graphics treatment: box drawing,
/// and additionally the block elements for the "full" variant.
const LGE_BOX_DRAWING: std::ops::RangeInclusive<u32> = 0x2500..=0x257F;
const LGE_BLOCK_ELEMENTS: std::ops::RangeInclusive<u32> = 0x2580..=0x259F;

/// In-memory font under assembly.
///
/// The first glyph's size doubles as the nominal cell size for format
/// headers. The unicode map is owned by the font; loaders create it on
/// demand.
#[derive(Debug, Clone, Default)]
pub struct Font {
    pub glyphs: Vec<Glyph>,
    pub unicode_map: Option<UnicodeMap>,
    pub props: BTreeMap<String, String>,
}

impl Font {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the glyph set with 256 blank 8x16 cells.
    pub fn init_256_blanks(&mut self) {
        self.glyphs = vec![Glyph::blank(Size::new(8, 16)); 256];
    }

    /// Nominal cell size, taken from the first glyph.
    pub fn cell_size(&self) -> Size {
        self.glyphs.first().map(Glyph::size).unwrap_or_default()
    }

    /// Get the unicode map, creating an empty one first if needed.
    pub fn map_mut(&mut self) -> &mut UnicodeMap {
        self.unicode_map.get_or_insert_with(UnicodeMap::new)
    }

    /// Apply `copy_rect_to` onto a blank canvas of `dst`'s size, per glyph.
    pub fn copy_to_blank(&mut self, src: Rect, dst: Rect) {
        for g in &mut self.glyphs {
            *g = g.copy_rect_to(src, &Glyph::blank(dst.size), dst, true);
        }
    }

    /// Re-canvas every glyph to `size`, anchored at the top-left.
    pub fn canvas(&mut self, size: Size) {
        let src = Pos::new(0, 0).with_size(self.cell_size());
        self.copy_to_blank(src, Pos::new(0, 0).with_size(size));
    }

    /// Cut out a window of every glyph.
    pub fn crop(&mut self, rect: Rect) {
        let src = rect.pos.with_size(self.cell_size());
        self.copy_to_blank(src, Pos::new(0, 0).with_size(rect.size));
    }

    /// Translate glyph images by an offset, clipping at the canvas.
    pub fn translate(&mut self, x: i32, y: i32) {
        let size = self.cell_size();
        let src = Pos::new(0, 0).with_size(size);
        self.copy_to_blank(src, Pos::new(x, y).with_size(size));
    }

    /// Duplicate a region of every glyph at another position in place.
    pub fn copy_region(&mut self, src: Rect, to: Pos) {
        for g in &mut self.glyphs {
            *g = g.copy_rect_to(src, g, to.with_size(src.size), true);
        }
    }

    pub fn flip(&mut self, x: bool, y: bool) {
        for g in &mut self.glyphs {
            *g = g.flip(x, y);
        }
    }

    pub fn invert(&mut self) {
        for g in &mut self.glyphs {
            g.invert();
        }
    }

    pub fn upscale(&mut self, factor: Size) {
        for g in &mut self.glyphs {
            *g = g.upscale(factor);
        }
    }

    pub fn overstrike(&mut self, px: u32) {
        for g in &mut self.glyphs {
            *g = g.overstrike(px);
        }
    }

    /// Classic VGA behavior: replicate column 8 into column 9 for the
    /// glyph slots 0xC0..=0xDF.
    pub fn lge(&mut self) {
        for idx in 0xC0..=0xDFusize {
            match self.glyphs.get_mut(idx) {
                Some(g) => g.lge(1),
                None => break,
            }
        }
    }

    /// Like [`Font::lge`], but selecting glyphs through the unicode map:
    /// everything mapped into the box-drawing block, plus the block
    /// elements when `full` is set. Without a map there is nothing to
    /// select on, so the call warns and leaves the font untouched.
    pub fn lgeu(&mut self, full: bool) {
        let Some(map) = &self.unicode_map else {
            warn!("lgeu: no unicode map loaded, nothing to do");
            return;
        };
        let picks: Vec<usize> = (0..self.glyphs.len())
            .filter(|&idx| {
                map.to_unicode(idx as u32).iter().any(|cp| {
                    LGE_BOX_DRAWING.contains(cp) || (full && LGE_BLOCK_ELEMENTS.contains(cp))
                })
            })
            .collect();
        for idx in picks {
            self.glyphs[idx].lge(1);
        }
    }

    /// Ascent/descent split used by the outline writers. The baseline of
    /// the glyph mapped to U+0041 decides when available; otherwise a
    /// quarter of the cell height goes below the baseline.
    pub fn find_ascent_descent(&self) -> (i32, i32) {
        let h = self.cell_size().h as i32;
        let baseline = self
            .unicode_map
            .as_ref()
            .and_then(|m| m.to_index(0x41))
            .and_then(|idx| self.glyphs.get(idx as usize))
            .and_then(Glyph::find_baseline);
        let descent = match baseline {
            Some(b) => h - b as i32,
            None => h / 4,
        };
        (h - descent, descent)
    }
}
