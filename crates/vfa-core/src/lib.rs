//! vfa-core: the raster model behind the font assembler.
//!
//! Three layers build on each other here:
//!
//! 1. [`geometry`] - integer positions, sizes and the vertex/edge types
//!    the vectorizer works in.
//! 2. [`glyph`] and [`font`] - the bit-packed raster glyph with its pixel
//!    transforms, and the container tying glyphs to a [`unimap`] and a
//!    property map.
//! 3. [`vectorize`] - the bitmap-to-outline converter with its three
//!    strategies (`simple`, `n1`, `n2`/`n2ev`).
//!
//! File formats live in the `vfa-formats` crate; this one never touches
//! the filesystem.

pub mod font;
pub mod geometry;
pub mod glyph;
pub mod unimap;
pub mod vectorize;

pub use font::Font;
pub use geometry::{Edge, Pos, Rect, Size, Vertex};
pub use glyph::Glyph;
pub use unimap::UnicodeMap;
pub use vectorize::{Algorithm, Polygon, Vectorizer};
