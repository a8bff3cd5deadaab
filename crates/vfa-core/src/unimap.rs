//! The index <-> codepoint relation carried alongside a font.
//!
//! Both directions are kept mutually consistent: every `u2i` entry implies
//! membership in the matching `i2u` set. An index without an explicit entry
//! maps to itself, which is what console fonts without a unicode table
//! effectively do.

use std::collections::{BTreeMap, BTreeSet};

/// Bidirectional glyph-index/codepoint mapping with an identity default.
#[derive(Debug, Clone, Default)]
pub struct UnicodeMap {
    i2u: BTreeMap<u32, BTreeSet<u32>>,
    u2i: BTreeMap<u32, u32>,
}

impl UnicodeMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach `cp` to glyph `idx`. The reverse direction is overwritten, so
    /// the last insertion for a codepoint wins.
    pub fn add_i2u(&mut self, idx: u32, cp: u32) {
        self.i2u.entry(idx).or_default().insert(cp);
        self.u2i.insert(cp, idx);
    }

    /// Codepoints for a glyph index; `{idx}` when the index was never
    /// mapped explicitly.
    pub fn to_unicode(&self, idx: u32) -> BTreeSet<u32> {
        match self.i2u.get(&idx) {
            Some(set) => set.clone(),
            None => BTreeSet::from([idx]),
        }
    }

    /// Glyph index for a codepoint, if any.
    pub fn to_index(&self, cp: u32) -> Option<u32> {
        self.u2i.get(&cp).copied()
    }

    /// Exchange the mappings of two glyph indices in both directions.
    pub fn swap_idx(&mut self, a: u32, b: u32) {
        let sa = self.i2u.remove(&a);
        let sb = self.i2u.remove(&b);
        if let Some(set) = &sa {
            for cp in set {
                self.u2i.insert(*cp, b);
            }
            self.i2u.insert(b, set.clone());
        }
        if let Some(set) = &sb {
            for cp in set {
                self.u2i.insert(*cp, a);
            }
            self.i2u.insert(a, set.clone());
        }
    }

    /// Explicit `index -> codepoints` entries in index order.
    pub fn iter_i2u(&self) -> impl Iterator<Item = (u32, &BTreeSet<u32>)> {
        self.i2u.iter().map(|(idx, set)| (*idx, set))
    }

    /// `codepoint -> index` entries in codepoint order.
    pub fn iter_u2i(&self) -> impl Iterator<Item = (u32, u32)> + '_ {
        self.u2i.iter().map(|(cp, idx)| (*cp, *idx))
    }

    pub fn len_u2i(&self) -> usize {
        self.u2i.len()
    }

    pub fn is_empty(&self) -> bool {
        self.i2u.is_empty()
    }
}
