//! The working palette: sixteen sRGB entries and their LCh companions,
//! kept coherent after every mutation to stop conversion error from
//! accumulating, plus three free scalars for the expression evaluator.

use std::io::BufRead;

use log::{debug, warn};

use crate::color::{
    self, hsl_to_srgb, srgb_from_888, to_hsl, ColorEngine, Hsl, Lch, Srgb888,
};

pub const PALETTE_LEN: usize = 16;

pub const VGA: [Srgb888; 16] = [
    Srgb888::new(0x00, 0x00, 0x00),
    Srgb888::new(0xAA, 0x00, 0x00),
    Srgb888::new(0x00, 0xAA, 0x00),
    Srgb888::new(0xAA, 0x55, 0x00),
    Srgb888::new(0x00, 0x00, 0xAA),
    Srgb888::new(0xAA, 0x00, 0xAA),
    Srgb888::new(0x00, 0xAA, 0xAA),
    Srgb888::new(0xAA, 0xAA, 0xAA),
    Srgb888::new(0x55, 0x55, 0x55),
    Srgb888::new(0xFF, 0x55, 0x55),
    Srgb888::new(0x55, 0xFF, 0x55),
    Srgb888::new(0xFF, 0xFF, 0x55),
    Srgb888::new(0x55, 0x55, 0xFF),
    Srgb888::new(0xFF, 0x55, 0xFF),
    Srgb888::new(0x55, 0xFF, 0xFF),
    Srgb888::new(0xFF, 0xFF, 0xFF),
];

/// VGA with the bright colors fully saturated.
pub const VGA_SAT: [Srgb888; 16] = [
    Srgb888::new(0x00, 0x00, 0x00),
    Srgb888::new(0xAA, 0x00, 0x00),
    Srgb888::new(0x00, 0xAA, 0x00),
    Srgb888::new(0xAA, 0x55, 0x00),
    Srgb888::new(0x00, 0x00, 0xAA),
    Srgb888::new(0xAA, 0x00, 0xAA),
    Srgb888::new(0x00, 0xAA, 0xAA),
    Srgb888::new(0xAA, 0xAA, 0xAA),
    Srgb888::new(0x55, 0x55, 0x55),
    Srgb888::new(0xFF, 0x00, 0x00),
    Srgb888::new(0x00, 0xFF, 0x00),
    Srgb888::new(0xFF, 0xFF, 0x00),
    Srgb888::new(0x00, 0x00, 0xFF),
    Srgb888::new(0xFF, 0x00, 0xFF),
    Srgb888::new(0x00, 0xFF, 0xFF),
    Srgb888::new(0xFF, 0xFF, 0xFF),
];

pub const WIN: [Srgb888; 16] = [
    Srgb888::new(0x00, 0x00, 0x00),
    Srgb888::new(0x80, 0x00, 0x00),
    Srgb888::new(0x00, 0x80, 0x00),
    Srgb888::new(0x80, 0x80, 0x00),
    Srgb888::new(0x00, 0x00, 0x80),
    Srgb888::new(0x80, 0x00, 0x80),
    Srgb888::new(0x00, 0x80, 0x80),
    Srgb888::new(0xC0, 0xC0, 0xC0),
    Srgb888::new(0x80, 0x80, 0x80),
    Srgb888::new(0xFF, 0x00, 0x00),
    Srgb888::new(0x00, 0xFF, 0x00),
    Srgb888::new(0xFF, 0xFF, 0x00),
    Srgb888::new(0x00, 0x00, 0xFF),
    Srgb888::new(0xFF, 0x00, 0xFF),
    Srgb888::new(0x00, 0xFF, 0xFF),
    Srgb888::new(0xFF, 0xFF, 0xFF),
];

/// Both numeric views of the palette plus the evaluator's free scalars.
#[derive(Debug, Clone, Default)]
pub struct Palette {
    pub ra: Vec<Srgb888>,
    pub la: Vec<Lch>,
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Palette {
    pub fn from_rgb(engine: &ColorEngine, colors: &[Srgb888]) -> Self {
        let mut pal = Self {
            ra: colors.to_vec(),
            ..Default::default()
        };
        pal.sync_from_rgb(engine);
        pal
    }

    /// Recompute the LCh side from the sRGB side.
    pub fn sync_from_rgb(&mut self, engine: &ColorEngine) {
        self.la = self.ra.iter().map(|&c| engine.to_lch(c)).collect();
    }

    /// Recompute the sRGB side from the LCh side.
    pub fn sync_from_lch(&mut self, engine: &ColorEngine) {
        self.ra = self.la.iter().map(|&c| engine.to_srgb888(c)).collect();
    }

    /// Mix `pct` percent of `other` into the sRGB side.
    pub fn blend(&mut self, other: &Palette, pct: f64) {
        let amult = 1.0 - pct / 100.0;
        let bmult = pct / 100.0;
        let len = self.ra.len().max(other.ra.len());
        let mut out = Vec::with_capacity(len);
        for i in 0..len {
            let a = self.ra.get(i).copied().unwrap_or_default();
            let b = other.ra.get(i).copied().unwrap_or_default();
            let mix = |x: u8, y: u8| (x as f64 * amult + y as f64 * bmult) as u8;
            out.push(Srgb888::new(mix(a.r, b.r), mix(a.g, b.g), mix(a.b, b.b)));
        }
        self.ra = out;
    }

    /// Space the L values of the first `count` entries evenly: the darkest
    /// keeps its lightness as a base offset, the rest land on
    /// `[blue, gray]` in their existing brightness order.
    pub fn equalize(&mut self, count: usize, blue: f64, gray: f64) {
        if self.la.len() < count || count < 3 {
            warn!("equalize: palette has no {count} LCh entries, skipping");
            return;
        }
        let mut order: Vec<usize> = (0..count).collect();
        order.sort_by(|&a, &b| self.la[a].l.total_cmp(&self.la[b].l));
        debug!(
            "equalize({count}) in: {:?}",
            order.iter().map(|&i| self.la[i].l).collect::<Vec<_>>()
        );
        let base = self.la[order[0]].l;
        for (rank, &entry) in order.iter().enumerate().skip(1) {
            self.la[entry].l = (gray - blue) * (rank - 1) as f64 / (count - 2) as f64 + blue + base;
        }
    }

    /// Recolor from a base HSL tone, scaling its lightness by each entry's
    /// LCh lightness.
    pub fn hsltint(&mut self, base: Hsl) {
        self.ra = self
            .la
            .iter()
            .map(|e| {
                let mut tone = base;
                tone.l *= e.l / 100.0;
                color::srgb_to_888(hsl_to_srgb(tone))
            })
            .collect();
    }

    /// Keep each entry's lightness, impose the base color's chroma and hue.
    pub fn lchtint(&mut self, base: Lch) {
        self.la = self
            .la
            .iter()
            .map(|e| Lch {
                l: e.l,
                c: base.c,
                h: base.h,
            })
            .collect();
    }

    /// Reverse the palette (entry 15 becomes entry 0 and so on).
    pub fn invert16(&mut self) {
        self.ra.reverse();
    }

    /// Force entry zero to pure black on both sides.
    pub fn black_zero(&mut self) {
        if self.ra.is_empty() || self.la.is_empty() {
            warn!("b0: empty palette, skipping");
            return;
        }
        self.ra[0] = Srgb888::default();
        self.la[0] = Lch::default();
    }
}

/// Parse `h,s,l` or `#rrggbb[,L]` into an HSL tone.
pub fn parse_hsl(s: &str) -> Hsl {
    if !s.starts_with('#') {
        let parts: Vec<f64> = s.split(',').filter_map(|p| p.trim().parse().ok()).collect();
        if parts.len() != 3 {
            warn!("illegal HSL input: {s:?}");
            return Hsl::default();
        }
        return Hsl {
            h: parts[0],
            s: parts[1],
            l: parts[2],
        };
    }
    let Some((rgb, used)) = color::parse_hex(s) else {
        warn!("illegal RGB(,L) value: {s:?}");
        return Hsl::default();
    };
    let mut c = to_hsl(srgb_from_888(rgb));
    if let Some(rest) = s.get(used..) {
        if let Some(l) = rest.strip_prefix(',').and_then(|v| v.parse().ok()) {
            c.l = l;
        }
    }
    c
}

/// Read a palette from an Xfce `ColorPalette=` line or from
/// `colorN = #rrggbb` resource lines.
pub fn load_palette(path: &str) -> std::io::Result<Vec<Srgb888>> {
    let file = std::fs::File::open(path)?;
    let mut ra = vec![Srgb888::default(); PALETTE_LEN];
    for line in std::io::BufReader::new(file).lines() {
        let line = line?;
        let lower = line.to_ascii_lowercase();
        if let Some(rest) = lower
            .strip_prefix("colorpalette=")
            .map(|_| &line["ColorPalette=".len()..])
        {
            parse_xfce_line(rest, &mut ra);
        } else if lower.starts_with("color") {
            parse_resource_line(&line["color".len()..], &mut ra);
        }
    }
    Ok(ra)
}

fn parse_xfce_line(mut p: &str, ra: &mut [Srgb888]) {
    for slot in ra.iter_mut() {
        p = p.trim_start();
        if p.is_empty() {
            break;
        }
        let Some((c, used)) = color::parse_hex(p) else {
            warn!("error in ColorPalette line near {p:?}");
            return;
        };
        *slot = c;
        p = &p[used..];
        p = p.strip_prefix(';').unwrap_or(p);
    }
}

fn parse_resource_line(frag: &str, ra: &mut [Srgb888]) {
    let digits: String = frag.chars().take_while(|c| c.is_ascii_digit()).collect();
    let Ok(n) = digits.parse::<usize>() else {
        return;
    };
    if n >= ra.len() {
        return;
    }
    let rest = frag[digits.len()..].trim_start();
    let Some(rest) = rest.strip_prefix(['=', ':']) else {
        return;
    };
    if let Some((c, _)) = color::parse_hex(rest.trim_start()) {
        ra[n] = c;
    }
}
