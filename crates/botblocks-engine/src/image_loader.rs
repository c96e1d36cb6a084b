//! Image files: dimension probing for layout and decoding for the renderer.
//!
//! Markup `source` paths are resolved against an asset root. Probing reads
//! only the header, so laying out a page never decodes pixels.

use std::cell::RefCell;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

use botblocks_common::ImageProvider;
use botblocks_common::warning::warn_once;
use botblocks_layout::{DisplayCommand, DisplayList};
use image::RgbaImage;

/// Image provider reading files under an asset root.
///
/// Results are cached per source path, misses included.
#[derive(Debug, Default)]
pub struct ImageProbe {
    root: PathBuf,
    cache: RefCell<HashMap<String, Option<(u32, u32)>>>,
}

impl ImageProbe {
    /// Resolve sources against `root`.
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            cache: RefCell::new(HashMap::new()),
        }
    }

    /// The asset root.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn resolve(&self, source: &str) -> PathBuf {
        self.root.join(source)
    }

    /// Decode `source` to RGBA pixels.
    #[must_use]
    pub fn decode(&self, source: &str) -> Option<RgbaImage> {
        match image::open(self.resolve(source)) {
            Ok(img) => Some(img.to_rgba8()),
            Err(e) => {
                warn_once("image", &format!("cannot decode '{source}': {e}"));
                None
            }
        }
    }

    /// Decode every image a display list draws, keyed by source.
    #[must_use]
    pub fn decode_all(&self, list: &DisplayList) -> HashMap<String, RgbaImage> {
        let mut images = HashMap::new();
        for command in list.commands() {
            if let DisplayCommand::DrawImage { source, .. } = command
                && !images.contains_key(source)
                && let Some(pixels) = self.decode(source)
            {
                let _ = images.insert(source.clone(), pixels);
            }
        }
        images
    }
}

impl ImageProvider for ImageProbe {
    fn dimensions(&self, path: &str) -> Option<(u32, u32)> {
        if let Some(known) = self.cache.borrow().get(path) {
            return *known;
        }
        let probed = match image::image_dimensions(self.resolve(path)) {
            Ok(dims) => Some(dims),
            Err(e) => {
                warn_once("image", &format!("cannot read '{path}': {e}"));
                None
            }
        };
        let _ = self.cache.borrow_mut().insert(path.to_string(), probed);
        probed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_probe_reads_header_and_caches_misses() {
        let dir = std::env::temp_dir().join(format!("botblocks-probe-{}", std::process::id()));
        std::fs::create_dir_all(&dir).expect("temp dir");
        RgbaImage::new(6, 4)
            .save(dir.join("robot.png"))
            .expect("write png");

        let probe = ImageProbe::new(&dir);
        assert_eq!(probe.dimensions("robot.png"), Some((6, 4)));
        assert_eq!(probe.dimensions("missing.png"), None);
        assert_eq!(probe.cache.borrow().len(), 2);
        assert_eq!(probe.decode("robot.png").map(|img| img.dimensions()), Some((6, 4)));

        std::fs::remove_dir_all(&dir).expect("cleanup");
    }
}
