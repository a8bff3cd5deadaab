//! Bitmap-to-outline vectorizer.
//!
//! Every strategy follows the same plan: populate an edge graph with small
//! closed shapes (one per pixel, all wound the same way), cancel shared
//! contradirectional edges so touching shapes fuse, then walk the surviving
//! edges into closed polygons. Because cancellation never re-orients an
//! edge, the polygons inherit the winding of the per-pixel shapes: filled
//! outlines come out with positive signed area, enclaves negative.
//!
//! Coordinates are font-space (`y` up, baseline at zero) scaled by integer
//! factors. The default factor of two keeps the half-pixel nodes the `n2`
//! post-pass introduces on the integer grid.

mod n1;
mod n2;
#[cfg(test)]
mod proptests;
#[cfg(test)]
mod tests;

use std::collections::BTreeSet;

use log::warn;

use crate::geometry::{Edge, Vertex};
use crate::glyph::Glyph;

/// Outline extraction strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Algorithm {
    /// Axis-aligned rectilinear outlines reproducing the bitmap exactly.
    Simple,
    /// Neighborhood-driven diamonds and corner triangles.
    N1,
    /// Rectilinear extraction with the staircase-to-diagonal post-pass.
    N2,
    /// `N2` with the isthmus rule keeping lone corner touches separate.
    N2ev,
}

/// A closed outline; `end` of each edge equals `start` of the next,
/// cyclically.
pub type Polygon = Vec<Edge>;

#[derive(Debug, Clone, Copy, Default)]
struct WalkOpts {
    simplify: bool,
    isthmus: bool,
}

/// One-shot converter from a glyph bitmap to closed oriented polygons.
pub struct Vectorizer<'a> {
    glyph: &'a Glyph,
    sx: i32,
    sy: i32,
    descent: i32,
    emap: BTreeSet<Edge>,
}

impl<'a> Vectorizer<'a> {
    pub const DEFAULT_SCALE: (i32, i32) = (2, 2);

    pub fn new(glyph: &'a Glyph, descent: i32) -> Self {
        let (sx, sy) = Self::DEFAULT_SCALE;
        Self::with_scale(glyph, sx, sy, descent)
    }

    pub fn with_scale(glyph: &'a Glyph, sx: i32, sy: i32, descent: i32) -> Self {
        Self {
            glyph,
            sx,
            sy,
            descent,
            emap: BTreeSet::new(),
        }
    }

    /// Run the selected strategy and hand back the outline polygons.
    pub fn run(mut self, algo: Algorithm) -> Vec<Polygon> {
        match algo {
            Algorithm::Simple => {
                self.make_squares();
                self.delete_internal_edges();
                self.pop_all(WalkOpts {
                    simplify: true,
                    ..Default::default()
                })
            }
            Algorithm::N1 => {
                self.make_n1();
                self.delete_internal_edges();
                self.pop_all(WalkOpts {
                    simplify: true,
                    ..Default::default()
                })
            }
            Algorithm::N2 | Algorithm::N2ev => {
                self.make_squares();
                self.delete_internal_edges();
                let opts = WalkOpts {
                    simplify: false,
                    isthmus: algo == Algorithm::N2ev,
                };
                let (hx, hy) = (self.sx / 2, self.sy / 2);
                self.pop_all(opts)
                    .into_iter()
                    .map(|poly| n2::angle_pass(poly, hx, hy))
                    .collect()
            }
        }
    }

    /// Glyph row `y` mapped into font space.
    fn font_row(&self, y: u32) -> i32 {
        self.glyph.size().h as i32 - 1 - y as i32 - self.descent
    }

    fn add_edge(&mut self, start: Vertex, end: Vertex) {
        self.emap.insert(Edge::new(start, end));
    }

    /// Emit one closed square per set pixel: left edge downward, bottom
    /// edge rightward, right edge upward, top edge leftward.
    fn make_squares(&mut self) {
        let size = self.glyph.size();
        for y in 0..size.h {
            let yy = self.font_row(y);
            for x in 0..size.w {
                if !self.glyph.test(x as i32, y as i32) {
                    continue;
                }
                let x0 = x as i32 * self.sx;
                let x1 = x0 + self.sx;
                let y0 = yy * self.sy;
                let y1 = y0 + self.sy;
                self.add_edge(Vertex::new(y1, x0), Vertex::new(y0, x0));
                self.add_edge(Vertex::new(y0, x0), Vertex::new(y0, x1));
                self.add_edge(Vertex::new(y0, x1), Vertex::new(y1, x1));
                self.add_edge(Vertex::new(y1, x1), Vertex::new(y1, x0));
            }
        }
    }

    /// Cancel every pair of contradirectional edges. Shapes only ever
    /// touch, so the removal fuses them without re-orienting anything.
    fn delete_internal_edges(&mut self) {
        let mut doomed = Vec::new();
        for e in &self.emap {
            if e.start == e.end {
                warn!(
                    "corrupt outline: self-loop at ({},{})",
                    e.start.x, e.start.y
                );
                doomed.push(*e);
            } else if e.start < e.end && self.emap.contains(&e.reversed()) {
                doomed.push(*e);
                doomed.push(e.reversed());
            }
        }
        for e in doomed {
            self.emap.remove(&e);
        }
    }

    fn pop_all(&mut self, opts: WalkOpts) -> Vec<Polygon> {
        let mut polys = Vec::new();
        while let Some(poly) = self.pop_poly(opts) {
            polys.push(poly);
        }
        polys
    }

    /// Extract one closed polygon, seeded from the smallest edge still in
    /// the graph.
    fn pop_poly(&mut self, opts: WalkOpts) -> Option<Polygon> {
        let seed = self.emap.iter().next().copied()?;
        self.emap.remove(&seed);
        let mut poly = vec![seed];
        let mut tail = seed.end;
        let mut prev_dir = seed.trivial_dir();

        while tail != seed.start {
            let Some(next) = self.next_edge(tail, prev_dir, opts.isthmus) else {
                warn!("outline walk ran dry before closing; dropping partial contour");
                break;
            };
            self.emap.remove(&next);
            tail = next.end;
            let dir = next.trivial_dir();
            if opts.simplify && dir == prev_dir {
                if let Some(last) = poly.last_mut() {
                    last.end = next.end;
                }
            } else {
                poly.push(next);
            }
            prev_dir = dir;
        }
        Some(poly)
    }

    /// Pick the edge leaving `from`. With two outgoing edges the inward
    /// branch wins: the lexicographic successor when traveling at 0 or 270
    /// degrees, the predecessor at 90 or 180. That is the right turn which
    /// crosses over onto the touching shape, so enclosing forms come out
    /// as one self-touching polygon instead of two nested ones. Under the
    /// isthmus rule the antijoin-worthy crossings take the outward branch
    /// instead, keeping the touching shapes separate.
    fn next_edge(&self, from: Vertex, prev_dir: u16, isthmus: bool) -> Option<Edge> {
        let mut it = self
            .emap
            .range(Edge::new(from, Vertex::MIN)..)
            .take_while(|e| e.start == from);
        let first = *it.next()?;
        let Some(&second) = it.next() else {
            return Some(first);
        };

        let inward = match prev_dir {
            0 | 270 => second,
            _ => first,
        };
        if isthmus && self.crossing_antijoinworthy(from) {
            let outward = if inward == first { second } else { first };
            return Some(outward);
        }
        Some(inward)
    }

    /// Bitmap neighborhood test for the isthmus rule. The two antijoin
    /// patterns are the lone diagonal touches, one per orientation: two
    /// shapes meeting at a single corner with no diagonal run continuing
    /// through it. A joinworthy pattern is deliberately not implemented,
    /// so everything else reports false and keeps the default branch.
    fn crossing_antijoinworthy(&self, v: Vertex) -> bool {
        let size = self.glyph.size();
        let px = v.x / self.sx;
        let py = v.y / self.sy;
        // Bitmap row of the cell just above the corner in font space.
        let ya = size.h as i32 - 1 - self.descent - py;
        let yb = ya + 1;
        let g = self.glyph;

        let ul = g.test(px - 1, ya);
        let ur = g.test(px, ya);
        let ll = g.test(px - 1, yb);
        let lr = g.test(px, yb);

        if ul && lr && !ur && !ll {
            // Backslash orientation, isolated when the diagonal stops here.
            return !g.test(px - 2, ya - 1) && !g.test(px + 1, yb + 1);
        }
        if ur && ll && !ul && !lr {
            return !g.test(px + 1, ya - 1) && !g.test(px - 2, yb + 1);
        }
        false
    }
}
