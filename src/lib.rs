//! A lossless/lossy grayscale image codec built on recursive quadtree
//! decomposition of square, power-of-two rasters.
//!
//! The core is single-threaded and synchronous: every public entry point
//! below either succeeds fully or releases everything it allocated before
//! returning a [`error::CodecError`].

pub mod bits;
pub mod codec;
pub mod error;
pub mod grid;
pub mod logger;
pub mod pgm;
pub mod raster;
pub mod tree;

pub use error::{CodecError, CodecErrorKind, Result};
pub use raster::PixelBuffer;
pub use tree::Tree;

/// Compression rate achieved by a payload of `compressed_bytes` against an
/// original `side`-by-`side` 8-bit raster, as a percentage in `0.0..=100.0`.
pub fn compression_rate_pct(side: usize, compressed_bytes: usize) -> f64 {
    let raw = (side * side) as f64;
    if raw == 0.0 {
        return 0.0;
    }
    (100.0 * (1.0 - compressed_bytes as f64 / raw)).clamp(0.0, 100.0)
}
