//! Contrast analyzers over the 16x16 foreground/background matrix: the
//! plain L* difference and APCA (SAPC), each reported over three grid
//! views.

use crate::color::{srgb_from_888, ColorEngine, Lch, Srgb888};

/// Statistics for one grid view (16x16, 8x16, 8x8).
#[derive(Debug, Clone, Copy, Default)]
pub struct GridStat {
    pub pairs: u32,
    pub penalized: u32,
    pub sum: f64,
    pub avg: f64,
    pub adj_sum: f64,
    pub adj_avg: f64,
}

/// The full contrast matrix plus its per-grid summaries.
pub struct PalStat {
    pub delta: [[f64; 16]; 16],
    pub x1616: GridStat,
    pub x816: GridStat,
    pub x88: GridStat,
}

impl PalStat {
    fn compute(delta: [[f64; 16]; 16], penalize: fn(f64) -> bool) -> Self {
        let grid = |xlim: usize, ylim: usize| {
            let mut gs = GridStat::default();
            for y in 0..ylim {
                for x in 0..xlim {
                    if x == y {
                        continue;
                    }
                    gs.pairs += 1;
                    gs.sum += delta[y][x];
                    if penalize(delta[y][x]) {
                        gs.penalized += 1;
                    } else {
                        gs.adj_sum += delta[y][x];
                    }
                }
            }
            if gs.pairs > 0 {
                gs.avg = gs.sum / gs.pairs as f64;
            }
            if gs.pairs > gs.penalized {
                gs.adj_avg = gs.adj_sum / (gs.pairs - gs.penalized) as f64;
            }
            gs
        };
        Self {
            x1616: grid(16, 16),
            x816: grid(8, 16),
            x88: grid(8, 8),
            delta,
        }
    }
}

/// Absolute difference of the L* components. Pairs under 7 are penalized
/// as too close to tell apart.
pub fn cxl(pal: &[Lch]) -> PalStat {
    let mut delta = [[0.0; 16]; 16];
    for (bg, row) in delta.iter_mut().enumerate() {
        for (fg, cell) in row.iter_mut().enumerate() {
            *cell = (pal[fg].l - pal[bg].l).abs();
        }
    }
    PalStat::compute(delta, |x| x < 7.0)
}

/// SAPC/APCA version 0.0.98G constants.
mod sapc {
    pub const NORM_BG: f64 = 0.56;
    pub const NORM_TXT: f64 = 0.57;
    pub const REV_TXT: f64 = 0.62;
    pub const REV_BG: f64 = 0.65;
    pub const BLACK_THRESH: f64 = 0.022;
    pub const BLACK_CLAMP: f64 = 1.414;
    pub const SCALE_BOW: f64 = 1.14;
    pub const SCALE_WOB: f64 = 1.14;
    pub const LO_OFFSET: f64 = 0.027;
    pub const DELTA_Y_MIN: f64 = 0.0005;
}

/// APCA lightness contrast between a text and a background luminance.
pub fn apca_contrast(mut ytx: f64, mut ybg: f64) -> f64 {
    if ytx <= sapc::BLACK_THRESH {
        ytx += (sapc::BLACK_THRESH - ytx).powf(sapc::BLACK_CLAMP);
    }
    if ybg <= sapc::BLACK_THRESH {
        ybg += (sapc::BLACK_THRESH - ybg).powf(sapc::BLACK_CLAMP);
    }
    if (ybg - ytx).abs() < sapc::DELTA_Y_MIN {
        return 0.0;
    }
    let oc = if ybg > ytx {
        let v = (ybg.powf(sapc::NORM_BG) - ytx.powf(sapc::NORM_TXT)) * sapc::SCALE_BOW;
        (v - sapc::LO_OFFSET).max(0.0)
    } else {
        let v = (ybg.powf(sapc::REV_BG) - ytx.powf(sapc::REV_TXT)) * sapc::SCALE_WOB;
        (v + sapc::LO_OFFSET).min(0.0)
    };
    100.0 * oc.abs()
}

/// APCA over all palette pairs. Pairs under 7.3 are penalized.
pub fn cxa(engine: &ColorEngine, pal: &[Srgb888]) -> PalStat {
    let ell: Vec<f64> = pal
        .iter()
        .map(|&c| engine.luminance(srgb_from_888(c)))
        .collect();
    let mut delta = [[0.0; 16]; 16];
    for (bg, row) in delta.iter_mut().enumerate() {
        for (fg, cell) in row.iter_mut().enumerate() {
            *cell = apca_contrast(ell[fg], ell[bg]);
        }
    }
    PalStat::compute(delta, |x| x < 7.3)
}

/// The per-grid summary lines shared by both analyzers.
pub fn report(stat: &PalStat) -> String {
    let line = |gs: &GridStat, desc: &str| {
        format!(
            "[{desc:<5}] contrast \u{3a3} {:.0} // minus {} penalties:\t\u{3a3} {:.0}\n",
            gs.sum, gs.penalized, gs.adj_sum
        )
    };
    let mut out = String::new();
    out += &line(&stat.x1616, "16x16");
    out += &line(&stat.x816, "16x8 ");
    out += &line(&stat.x88, " 8x8 ");
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::palette::{Palette, VGA};

    #[test]
    fn test_apca_reference_points() {
        let engine = ColorEngine::default();
        let black = engine.luminance(srgb_from_888(Srgb888::new(0, 0, 0)));
        let white = engine.luminance(srgb_from_888(Srgb888::new(255, 255, 255)));
        assert!(apca_contrast(black, white) >= 105.0);
        assert!(apca_contrast(white, black) >= 107.0);
        assert_eq!(apca_contrast(white, white), 0.0);
        assert_eq!(apca_contrast(black, black), 0.0);
    }

    #[test]
    fn test_cxl_matrix_shape() {
        let engine = ColorEngine::default();
        let pal = Palette::from_rgb(&engine, &VGA);
        let stat = cxl(&pal.la);

        assert_eq!(stat.x1616.pairs, 240);
        assert_eq!(stat.x816.pairs, 120);
        assert_eq!(stat.x88.pairs, 56);
        // Black against white is the full lightness range.
        assert!((stat.delta[0][15] - 100.0).abs() < 0.5);
        assert_eq!(stat.delta[3][3], 0.0);
        // delta[7][0]: light gray versus black.
        assert!(stat.delta[7][0] > 60.0);
        assert!(stat.x1616.sum > stat.x816.sum);
        assert!(stat.x816.sum > stat.x88.sum);
        assert!(stat.x1616.adj_sum <= stat.x1616.sum);
        assert!(stat.x1616.avg > 20.0 && stat.x1616.avg < 60.0);
    }

    #[test]
    fn test_cxa_penalizes_close_pairs() {
        let engine = ColorEngine::default();
        let pal = Palette::from_rgb(&engine, &VGA);
        let stat = cxa(&engine, &pal.ra);
        assert!(stat.x1616.penalized > 0);
        assert!(stat.delta[0][15] >= 105.0);
        assert!(stat.x1616.adj_avg >= stat.x1616.avg);
    }

    #[test]
    fn test_whitepoint_change_propagates() {
        // A chromatic pair: neutral-vs-neutral deltas are whitepoint
        // invariant because the Y matrix row always sums to one.
        let mut engine = ColorEngine::default();
        let mut pal = Palette::from_rgb(&engine, &VGA);
        let d65 = cxl(&pal.la).delta[1][0];

        engine.set_illuminant(5000.0);
        pal.sync_from_rgb(&engine);
        let d50 = cxl(&pal.la).delta[1][0];
        assert!((d65 - d50).abs() > 1e-6, "{d65} vs {d50}");
    }

    #[test]
    fn test_report_layout() {
        let engine = ColorEngine::default();
        let pal = Palette::from_rgb(&engine, &VGA);
        let text = report(&cxl(&pal.la));
        assert!(text.starts_with("[16x16] contrast \u{3a3} "));
        assert_eq!(text.lines().count(), 3);
    }
}
