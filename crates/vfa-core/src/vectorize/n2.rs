// this_file: crates/vfa-core/src/vectorize/n2.rs

//! The `n2` post-pass: cut staircases into diagonals while leaving
//! deliberate one-pixel features alone.
//!
//! Works on one polygon at a time, straight off the rectilinear walk (no
//! line simplification, so every edge is one scaled pixel step long). A
//! classification sweep over a seven-edge window tags edges with HEAD/TAIL
//! marks (a diagonal may start/end here) and XHEAD/XTAIL vetoes (hands
//! off). A second sweep inserts the diagonals, pulling the neighboring
//! edges in by half a pixel step; edges eaten from both sides vanish,
//! which is how whole staircases collapse into single diagonals.

use crate::geometry::{Edge, Vertex};

use super::Polygon;

const HEAD: u8 = 1 << 0;
const TAIL: u8 = 1 << 1;
const XHEAD: u8 = 1 << 2;
const XTAIL: u8 = 1 << 3;

fn rot(dir: u16, by: u16) -> u16 {
    (dir + by) % 360
}

/// Run the angle pass over one polygon. `hx`/`hy` are half a scaled pixel
/// step, the amount adjacent edges shrink by per inserted diagonal.
pub(super) fn angle_pass(poly: Polygon, hx: i32, hy: i32) -> Polygon {
    let n = poly.len();
    if n < 7 {
        // Nothing a seven-edge window could say about a lone square.
        return poly;
    }
    let dirs: Vec<u16> = poly.iter().map(Edge::trivial_dir).collect();
    let mut flags = vec![0u8; n];

    for i in 0..n {
        let at = |k: isize| ((i as isize + k).rem_euclid(n as isize)) as usize;
        let d = |k: isize| dirs[at(k)];
        let (dm3, dm2, dm1) = (d(-3), d(-2), d(-1));
        let d00 = d(0);
        let (dp1, dp2, dp3) = (d(1), d(2), d(3));

        if d00 == dm2 && d00 == dp2 {
            // Pimple: a one-pixel bump, e.g. the crossbar tip of "f".
            // Veto the whole window so no diagonal may shave it off.
            if (dm3 == d00 || dm3 == dp1)
                && (dp3 == d00 || dp3 == dm1)
                && dm1 == rot(dm2, 90)
                && dp1 == rot(dm2, 270)
            {
                for k in -2..=2 {
                    flags[at(k)] |= XHEAD | XTAIL;
                }
            }
            // Dimple: a one-pixel notch, truncated into a shallow vee
            // wherever a flat run leads into it.
            if dm1 == rot(dm2, 270) && dp1 == rot(dm2, 90) {
                if dm3 == dm2 {
                    flags[at(-2)] |= TAIL;
                    flags[at(-1)] |= HEAD | TAIL;
                    flags[at(0)] |= HEAD;
                }
                if dp3 == dp2 {
                    flags[at(0)] |= TAIL;
                    flags[at(1)] |= HEAD | TAIL;
                    flags[at(2)] |= HEAD;
                }
            }
        }

        // Chicane: one step of a staircase.
        if dm1 == dp1 && (dp1 == rot(d00, 90) || dp1 == rot(d00, 270)) {
            // E-serif ramps stay square; cutting them would round the
            // outermost corner of serif-like endings.
            let serif_a = dm2 == dm1 && d00 == rot(dm1, 90) && dp2 == rot(dm1, 270) && dp3 == dp2;
            let serif_b = dp2 == dp1 && d00 == rot(dp1, 270) && dm2 == rot(dp1, 90) && dm3 == dm2;
            if !serif_a && !serif_b {
                flags[at(-1)] |= TAIL;
                flags[at(0)] |= HEAD | TAIL;
                flags[at(1)] |= HEAD;
                if dp2 == d00 {
                    // Stairs continue to the right.
                    flags[at(1)] |= TAIL;
                    flags[at(2)] |= HEAD;
                }
                if dm2 == d00 {
                    flags[at(-1)] |= HEAD;
                    flags[at(-2)] |= TAIL;
                }
            }
        }
    }

    // Insertion: a diagonal goes between every TAIL/HEAD pair that no veto
    // covers, and both neighbors give up half a pixel step.
    let mut adj = poly;
    let mut cut_after = vec![false; n];
    for i in 0..n {
        let j = (i + 1) % n;
        if flags[i] & TAIL != 0
            && flags[j] & HEAD != 0
            && flags[i] & XTAIL == 0
            && flags[j] & XHEAD == 0
        {
            cut_after[i] = true;
            shorten_end(&mut adj[i], hx, hy);
            shorten_start(&mut adj[j], hx, hy);
        }
    }

    let mut out = Vec::with_capacity(n * 2);
    for i in 0..n {
        let e = adj[i];
        if e.start != e.end {
            out.push(e);
        }
        if cut_after[i] {
            let diag = Edge::new(adj[i].end, adj[(i + 1) % n].start);
            if diag.start != diag.end {
                out.push(diag);
            }
        }
    }
    coalesce(out)
}

fn step(dir: u16, hx: i32, hy: i32) -> (i32, i32) {
    match dir {
        0 => (0, hy),
        90 => (hx, 0),
        180 => (0, -hy),
        270 => (-hx, 0),
        _ => (0, 0),
    }
}

fn shorten_end(e: &mut Edge, hx: i32, hy: i32) {
    let (dx, dy) = step(e.trivial_dir(), hx, hy);
    e.end = Vertex::new(e.end.y - dy, e.end.x - dx);
}

fn shorten_start(e: &mut Edge, hx: i32, hy: i32) {
    let (dx, dy) = step(e.trivial_dir(), hx, hy);
    e.start = Vertex::new(e.start.y + dy, e.start.x + dx);
}

/// Merge runs of consecutive same-direction edges, cyclically.
fn coalesce(poly: Polygon) -> Polygon {
    let n = poly.len();
    if n < 2 {
        return poly;
    }
    let mut first = 0;
    for i in 0..n {
        let prev = (i + n - 1) % n;
        if poly[prev].trivial_dir() != poly[i].trivial_dir() {
            first = i;
            break;
        }
    }
    let mut out: Polygon = Vec::with_capacity(n);
    for k in 0..n {
        let e = poly[(first + k) % n];
        match out.last_mut() {
            Some(last) if last.trivial_dir() == e.trivial_dir() && last.end == e.start => {
                last.end = e.end;
            }
            _ => out.push(e),
        }
    }
    out
}
