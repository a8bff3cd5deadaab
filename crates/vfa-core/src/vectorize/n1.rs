//! The `n1` emitter: per-pixel diamonds and corner triangles.
//!
//! Each set pixel turns into up to five sub-shapes on the scaled grid: a
//! center diamond plus one triangle per quadrant, chosen by hand-tuned
//! boolean formulas over the 3x3 neighborhood. All shapes share the square
//! winding convention, and a triangle's hypotenuse runs opposite to the
//! matching diamond edge, so internal-edge removal fuses them into one
//! outline.
//!
//! The neighborhood is read in font orientation: `c1` is the lower-left
//! neighbor, `c2` the one below, up to `c9` at the upper right, with `c5`
//! the pixel itself. The read side only ever touches the source bitmap, so
//! emission order across the scan does not feed back into the tests.

use crate::geometry::Vertex;

use super::Vectorizer;

/// Corner/center choice for one pixel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) struct Corners {
    pub di: bool,
    pub tl: bool,
    pub tr: bool,
    pub bl: bool,
    pub br: bool,
}

/// The n1 corner formulas, verbatim. `c1..c9` index the neighborhood
/// numpad-style in font orientation.
#[allow(clippy::too_many_arguments, clippy::nonminimal_bool)]
pub(super) fn corners(
    c1: bool,
    c2: bool,
    c3: bool,
    c4: bool,
    c5: bool,
    c6: bool,
    c7: bool,
    c8: bool,
    c9: bool,
) -> Corners {
    let di = c5;
    let tl = (c4 && ((c8 && ((!c7 && (c1 || c3 || c9)) || (!c1 && !c2) || (!c6 && !c9))) || c5))
        || (c5 && ((!c1 && !c9) || c7 || c8));
    let tr = (((!c7 && !c3) || c9 || c8 || c6) && c5)
        || (((!c9 && (c1 || c3 || c7)) || (!c2 && !c3) || (!c4 && !c7)) && c8 && c6);
    let bl = (c5 && (c1 || c2 || (!c3 && !c7) || c4))
        || (c2 && c4 && ((!c1 && (c3 || c7 || c9)) || (!c3 && !c6) || (!c7 && !c8)));
    let br = (c2 && ((c6 && ((!c3 && (c1 || c7 || c9)) || (!c1 && !c4) || (!c8 && !c9))) || c5))
        || (c5 && ((!c1 && !c9) || c3 || c6));
    Corners { di, tl, tr, bl, br }
}

impl Vectorizer<'_> {
    /// Populate the edge graph with the n1 sub-pixel shapes.
    pub(super) fn make_n1(&mut self) {
        let size = self.glyph.size();
        let (hx, hy) = (self.sx / 2, self.sy / 2);
        for uy in 0..size.h as i32 {
            let yy = self.font_row(uy as u32);
            for ux in 0..size.w as i32 {
                // Unset cells still get evaluated: the corner formulas fill
                // triangles into concave corners of the surroundings.
                let k = corners(
                    self.glyph.test(ux - 1, uy + 1),
                    self.glyph.test(ux, uy + 1),
                    self.glyph.test(ux + 1, uy + 1),
                    self.glyph.test(ux - 1, uy),
                    self.glyph.test(ux, uy),
                    self.glyph.test(ux + 1, uy),
                    self.glyph.test(ux - 1, uy - 1),
                    self.glyph.test(ux, uy - 1),
                    self.glyph.test(ux + 1, uy - 1),
                );
                if !(k.di || k.tl || k.tr || k.bl || k.br) {
                    continue;
                }

                let bx = ux * self.sx;
                let by = yy * self.sy;
                let b = Vertex::new(by, bx + hx);
                let t = Vertex::new(by + self.sy, bx + hx);
                let l = Vertex::new(by + hy, bx);
                let r = Vertex::new(by + hy, bx + self.sx);
                let blc = Vertex::new(by, bx);
                let brc = Vertex::new(by, bx + self.sx);
                let tlc = Vertex::new(by + self.sy, bx);
                let trc = Vertex::new(by + self.sy, bx + self.sx);

                if k.di {
                    self.add_edge(b, r);
                    self.add_edge(r, t);
                    self.add_edge(t, l);
                    self.add_edge(l, b);
                }
                if k.tl {
                    self.add_edge(l, t);
                    self.add_edge(t, tlc);
                    self.add_edge(tlc, l);
                }
                if k.tr {
                    self.add_edge(t, r);
                    self.add_edge(r, trc);
                    self.add_edge(trc, t);
                }
                if k.bl {
                    self.add_edge(b, l);
                    self.add_edge(l, blc);
                    self.add_edge(blc, b);
                }
                if k.br {
                    self.add_edge(r, b);
                    self.add_edge(b, brc);
                    self.add_edge(brc, r);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_isolated_pixel_fills_the_cell() {
        let k = corners(
            false, false, false, false, true, false, false, false, false,
        );
        assert_eq!(
            k,
            Corners {
                di: true,
                tl: true,
                tr: true,
                bl: true,
                br: true
            }
        );
    }

    #[test]
    fn test_unset_pixel_emits_nothing() {
        let k = corners(true, true, true, true, false, true, true, true, true);
        assert!(!k.di && !k.tl && !k.tr && !k.bl && !k.br);
    }

    #[test]
    fn test_diagonal_runs_extend_along_the_stroke() {
        // Stroke towards upper-left/lower-right (c7 and c3 set).
        let k = corners(
            false, false, true, false, true, false, true, false, false,
        );
        assert!(k.tl && k.br);
        assert!(!k.tr && !k.bl);

        // The opposite diagonal (c1 and c9 set).
        let k = corners(
            true, false, false, false, true, false, false, false, true,
        );
        assert!(k.tr && k.bl);
        assert!(!k.tl && !k.br);
    }

    #[test]
    fn test_straight_stroke_keeps_square_cells() {
        // Middle of a horizontal run (c4 and c6 set).
        let k = corners(
            false, false, false, true, true, true, false, false, false,
        );
        assert!(k.di && k.tl && k.tr && k.bl && k.br);
    }

    #[test]
    fn test_staircase_step_loses_the_outer_corner() {
        // A step: left neighbor, below, and below-right set.
        let k = corners(
            false, true, true, true, true, false, false, false, false,
        );
        assert!(k.di && k.tl && k.bl && k.br);
        assert!(!k.tr);
    }
}
