use super::*;
use crate::geometry::Size;
use crate::glyph::Glyph;

/// Build a glyph from `#`/`.` art, one row per string, top row first.
fn glyph_from_art(rows: &[&str]) -> Glyph {
    let h = rows.len() as u32;
    let w = rows[0].len() as u32;
    let mut g = Glyph::blank(Size::new(w, h));
    for (y, row) in rows.iter().enumerate() {
        for (x, ch) in row.chars().enumerate() {
            if ch == '#' {
                g.set(x as u32, y as u32, true);
            }
        }
    }
    g
}

fn assert_closed(poly: &Polygon) {
    assert!(!poly.is_empty());
    for pair in poly.windows(2) {
        assert_eq!(pair[0].end, pair[1].start, "gap inside polygon");
    }
    assert_eq!(
        poly.last().unwrap().end,
        poly[0].start,
        "polygon does not close"
    );
}

/// Twice the standard shoelace area; positive when the polygon runs
/// counter-clockwise in font coordinates.
fn shoelace2(poly: &[Edge]) -> i64 {
    poly.iter()
        .map(|e| e.start.x as i64 * e.end.y as i64 - e.end.x as i64 * e.start.y as i64)
        .sum()
}

/// Even-odd test of a point against a polygon set, ray towards +x.
fn filled_at(polys: &[Polygon], px: f64, py: f64) -> bool {
    let mut crossings = 0u32;
    for e in polys.iter().flatten() {
        let (y1, y2) = (e.start.y as f64, e.end.y as f64);
        if y1 == y2 {
            continue;
        }
        if (y1.min(y2)..y1.max(y2)).contains(&py) {
            let t = (py - y1) / (y2 - y1);
            let x_at = e.start.x as f64 + t * (e.end.x as f64 - e.start.x as f64);
            if x_at > px {
                crossings += 1;
            }
        }
    }
    crossings % 2 == 1
}

fn vectorize(g: &Glyph, algo: Algorithm) -> Vec<Polygon> {
    Vectorizer::new(g, 0).run(algo)
}

#[test]
fn test_simple_single_pixel_is_one_square() {
    let g = glyph_from_art(&["#"]);
    let polys = vectorize(&g, Algorithm::Simple);
    assert_eq!(polys.len(), 1);
    assert_eq!(polys[0].len(), 4);
    assert_closed(&polys[0]);
    assert_eq!(shoelace2(&polys[0]), 8); // 2x2 scaled square
}

#[test]
fn test_simple_merges_adjacent_pixels() {
    let g = glyph_from_art(&["##"]);
    let polys = vectorize(&g, Algorithm::Simple);
    assert_eq!(polys.len(), 1);
    // A 4x2 rectangle after line simplification.
    assert_eq!(polys[0].len(), 4);
    assert_eq!(shoelace2(&polys[0]), 16);
}

#[test]
fn test_simple_ring_yields_outer_and_enclave() {
    let g = glyph_from_art(&[
        "###", //
        "#.#", //
        "###",
    ]);
    let polys = vectorize(&g, Algorithm::Simple);
    assert_eq!(polys.len(), 2);
    for poly in &polys {
        assert_closed(poly);
    }
    let areas: Vec<i64> = polys.iter().map(|p| shoelace2(p)).collect();
    assert!(areas.iter().any(|&a| a > 0), "no outer contour: {areas:?}");
    assert!(areas.iter().any(|&a| a < 0), "no enclave: {areas:?}");
    // Outer minus enclave leaves the eight set pixels.
    assert_eq!(areas.iter().sum::<i64>(), 8 * 2 * 4);
}

#[test]
fn test_simple_diagonal_touch_makes_one_self_touching_polygon() {
    let g = glyph_from_art(&[
        "#.", //
        ".#",
    ]);
    let polys = vectorize(&g, Algorithm::Simple);
    assert_eq!(polys.len(), 1);
    assert_closed(&polys[0]);
    assert_eq!(shoelace2(&polys[0]), 16);
}

#[test]
fn test_simple_reproduces_bitmap_even_odd() {
    let g = glyph_from_art(&[
        "..####..", //
        ".#....#.", //
        ".#....#.", //
        ".######.", //
        ".#.##.#.", //
        ".#....#.", //
        "........",
    ]);
    let polys = vectorize(&g, Algorithm::Simple);
    let size = g.size();
    for y in 0..size.h {
        for x in 0..size.w {
            let yy = size.h as i32 - 1 - y as i32;
            let px = x as f64 * 2.0 + 1.0;
            let py = yy as f64 * 2.0 + 1.0;
            assert_eq!(
                filled_at(&polys, px, py),
                g.test(x as i32, y as i32),
                "mismatch at ({x},{y})"
            );
        }
    }
}

#[test]
fn test_all_algorithms_are_deterministic_and_closed() {
    let g = glyph_from_art(&[
        ".##..", //
        "#..#.", //
        "#..#.", //
        ".##.#", //
        "...#.",
    ]);
    for algo in [
        Algorithm::Simple,
        Algorithm::N1,
        Algorithm::N2,
        Algorithm::N2ev,
    ] {
        let a = vectorize(&g, algo);
        let b = vectorize(&g, algo);
        assert_eq!(a, b, "{algo:?} not deterministic");
        for poly in &a {
            assert_closed(poly);
        }
    }
}

#[test]
fn test_n1_isolated_pixel_is_a_square() {
    let g = glyph_from_art(&[
        "...", //
        ".#.", //
        "...",
    ]);
    let polys = vectorize(&g, Algorithm::N1);
    assert_eq!(polys.len(), 1);
    assert_closed(&polys[0]);
    // Diamond plus all four corner triangles fuse back into the cell.
    assert_eq!(shoelace2(&polys[0]), 8);
    assert_eq!(polys[0].len(), 4);
}

#[test]
fn test_n1_lone_diagonal_pair_connects() {
    let g = glyph_from_art(&[
        "#.", //
        ".#",
    ]);
    let polys = vectorize(&g, Algorithm::N1);
    // The along-stroke triangles keep the two cells joined at the corner.
    assert_eq!(polys.len(), 1);
    assert_closed(&polys[0]);
    assert!(polys[0].iter().any(|e| e.trivial_dir() % 90 != 0));
}

#[test]
fn test_n2_diagonal_line_scenario() {
    let g = glyph_from_art(&[
        "#....", //
        ".#...", //
        "..#..", //
        "...#.", //
        "....#",
    ]);
    let polys = vectorize(&g, Algorithm::N2);
    assert_eq!(polys.len(), 1, "diagonal must come out as one polygon");
    let poly = &polys[0];
    assert_closed(poly);

    let xs: Vec<i32> = poly.iter().map(|e| e.start.x).collect();
    let ys: Vec<i32> = poly.iter().map(|e| e.start.y).collect();
    assert_eq!(xs.iter().min(), Some(&0));
    assert_eq!(xs.iter().max(), Some(&10));
    assert_eq!(ys.iter().min(), Some(&0));
    assert_eq!(ys.iter().max(), Some(&10));

    // The staircases collapse into one long diagonal per side; only the
    // two end caps stay rectilinear.
    let diagonals: Vec<_> = poly.iter().filter(|e| e.trivial_dir() % 90 != 0).collect();
    assert_eq!(diagonals.len(), 2);
    assert!(poly.len() <= 6);
}

#[test]
fn test_n2_preserves_one_pixel_bump() {
    let g = glyph_from_art(&[
        "..#..", //
        "#####",
    ]);
    let polys = vectorize(&g, Algorithm::N2);
    assert_eq!(polys.len(), 1);
    let poly = &polys[0];
    assert_closed(poly);
    // The pimple veto keeps the bump square: its top edge survives at
    // full width and nothing got cut into a diagonal.
    assert!(poly
        .iter()
        .any(|e| e.start.y == 4 && e.end.y == 4 && (e.start.x - e.end.x).abs() == 2));
    assert!(poly.iter().all(|e| e.trivial_dir() % 90 == 0));
}

#[test]
fn test_n2_truncates_dimple() {
    // A notch in the middle of a wide slab's top side.
    let g = glyph_from_art(&[
        "###.###", //
        "#######",
    ]);
    let polys = vectorize(&g, Algorithm::N2);
    assert_eq!(polys.len(), 1);
    assert_closed(&polys[0]);
    assert!(
        polys[0].iter().any(|e| e.trivial_dir() % 90 != 0),
        "dimple should have been cut into diagonals"
    );
}

#[test]
fn test_n2ev_separates_lone_corner_touch() {
    let g = glyph_from_art(&[
        "#.", //
        ".#",
    ]);
    let joined = vectorize(&g, Algorithm::N2);
    assert_eq!(joined.len(), 1);
    let split = vectorize(&g, Algorithm::N2ev);
    assert_eq!(split.len(), 2);
    for poly in &split {
        assert_closed(poly);
        assert_eq!(shoelace2(poly), 8);
    }
}

#[test]
fn test_n2ev_keeps_running_diagonals_joined() {
    let g = glyph_from_art(&[
        "#..", //
        ".#.", //
        "..#",
    ]);
    let polys = vectorize(&g, Algorithm::N2ev);
    assert_eq!(polys.len(), 1);
    assert_closed(&polys[0]);
}

#[test]
fn test_descent_shifts_the_baseline() {
    let g = glyph_from_art(&["#"]);
    let polys = Vectorizer::new(&g, 1).run(Algorithm::Simple);
    let ys: Vec<i32> = polys[0].iter().map(|e| e.start.y).collect();
    assert_eq!(ys.iter().min(), Some(&-2));
    assert_eq!(ys.iter().max(), Some(&0));
}

#[test]
fn test_kurbo_area_agrees_with_shoelace() {
    let g = glyph_from_art(&[
        ".#.", //
        "###",
    ]);
    for algo in [Algorithm::Simple, Algorithm::N1, Algorithm::N2] {
        for poly in vectorize(&g, algo) {
            let mut path = kurbo::BezPath::new();
            path.move_to((poly[0].start.x as f64, poly[0].start.y as f64));
            for e in &poly {
                path.line_to((e.end.x as f64, e.end.y as f64));
            }
            path.close_path();
            let area = kurbo::Shape::area(&path);
            assert!((area - shoelace2(&poly) as f64 / 2.0).abs() < 1e-9);
        }
    }
}
