//! palcomp: palette composition for terminal emulators.
//!
//! The pipeline keeps a palette in two synchronized numeric forms (sRGB888
//! and CIE LCh) and pushes it through whitepoint-aware color conversions,
//! a small per-entry expression language, and two contrast analyzers. The
//! binary in `main.rs` is a thin argv-ordered command loop over these
//! modules.

pub mod color;
pub mod contrast;
pub mod emit;
pub mod eval;
pub mod palette;

pub use color::{ColorEngine, Hsl, Lch, Srgb888};
pub use palette::Palette;
