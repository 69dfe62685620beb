//! Overlay rendering module
//!
//! This module composites class masks over the working image and encodes the
//! result for transport.

mod encoder;
mod overlay;
mod png_encoder;

pub use encoder::{EncodedOverlay, OverlayEncoder};
pub use overlay::{composite, OverlayStyle, SAND_OVERLAY, SEAGRASS_OVERLAY};
pub use png_encoder::PngBase64Encoder;
