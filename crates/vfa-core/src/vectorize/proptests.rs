use proptest::prelude::*;

use super::*;
use crate::geometry::Size;
use crate::glyph::Glyph;

fn glyph_from_bits(w: u32, h: u32, bits: &[bool]) -> Glyph {
    let mut g = Glyph::blank(Size::new(w, h));
    for (n, &bit) in bits.iter().enumerate() {
        if bit {
            g.set(n as u32 % w, n as u32 / w, true);
        }
    }
    g
}

fn closed(poly: &[crate::geometry::Edge]) -> bool {
    !poly.is_empty()
        && poly.windows(2).all(|p| p[0].end == p[1].start)
        && poly.last().is_some_and(|l| l.end == poly[0].start)
}

fn shoelace2(poly: &[crate::geometry::Edge]) -> i64 {
    poly.iter()
        .map(|e| e.start.x as i64 * e.end.y as i64 - e.end.x as i64 * e.start.y as i64)
        .sum()
}

// Property: every algorithm closes every polygon on arbitrary bitmaps. The
// n1 corner formulas are hand-tuned, so they get fuzzed against the
// structural invariants rather than re-derived.
proptest! {
    #[test]
    fn prop_outlines_always_close(bits in proptest::collection::vec(any::<bool>(), 36)) {
        let g = glyph_from_bits(6, 6, &bits);
        for algo in [Algorithm::Simple, Algorithm::N1, Algorithm::N2, Algorithm::N2ev] {
            for poly in Vectorizer::new(&g, 0).run(algo) {
                prop_assert!(closed(&poly), "{algo:?} produced an open polygon");
            }
        }
    }
}

// Property: edges stay on the eight principal directions; diagonals run at
// exactly 45 degrees.
proptest! {
    #[test]
    fn prop_edges_stay_on_the_compass(bits in proptest::collection::vec(any::<bool>(), 36)) {
        let g = glyph_from_bits(6, 6, &bits);
        for algo in [Algorithm::N1, Algorithm::N2, Algorithm::N2ev] {
            for poly in Vectorizer::new(&g, 0).run(algo) {
                for e in &poly {
                    let dx = (e.end.x - e.start.x).abs();
                    let dy = (e.end.y - e.start.y).abs();
                    prop_assert!(dx + dy > 0, "zero-length edge");
                    prop_assert!(dx == 0 || dy == 0 || dx == dy,
                        "off-grid edge {e:?}");
                }
            }
        }
    }
}

// Property: for the exact algorithm, the signed areas account for every
// set pixel: outers positive, enclaves negative, total equal to the ink.
proptest! {
    #[test]
    fn prop_simple_area_matches_ink(bits in proptest::collection::vec(any::<bool>(), 36)) {
        let g = glyph_from_bits(6, 6, &bits);
        let ink = bits.iter().filter(|&&b| b).count() as i64;
        let total: i64 = Vectorizer::new(&g, 0)
            .run(Algorithm::Simple)
            .iter()
            .map(|p| shoelace2(p))
            .sum();
        prop_assert_eq!(total, ink * 8);
    }
}

// Property: same input, same output, run after run.
proptest! {
    #[test]
    fn prop_vectorization_is_deterministic(bits in proptest::collection::vec(any::<bool>(), 25)) {
        let g = glyph_from_bits(5, 5, &bits);
        for algo in [Algorithm::Simple, Algorithm::N1, Algorithm::N2, Algorithm::N2ev] {
            let a = Vectorizer::new(&g, 0).run(algo);
            let b = Vectorizer::new(&g, 0).run(algo);
            prop_assert_eq!(a, b);
        }
    }
}
