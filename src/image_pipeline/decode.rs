//! Image decoding module
//!
//! This module turns uploaded bytes (JPEG, PNG) into an 8-bit RGB raster.

mod reader;
mod standard_reader;

pub use reader::ImageReader;
pub use standard_reader::StandardImageReader;
