//! Image provider seam.
//!
//! The layout core never decodes images. It asks an [`ImageProvider`] for
//! intrinsic dimensions when it needs an aspect ratio, and the render surface
//! draws the pixels when it executes a draw-image command.

/// Source of intrinsic image dimensions, keyed by the markup `source` path.
pub trait ImageProvider {
    /// Intrinsic `(width, height)` in pixels, or `None` when the image is
    /// missing or undecodable.
    fn dimensions(&self, path: &str) -> Option<(u32, u32)>;
}

/// Provider that knows no images. Every lookup misses.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoImages;

impl ImageProvider for NoImages {
    fn dimensions(&self, _path: &str) -> Option<(u32, u32)> {
        None
    }
}
