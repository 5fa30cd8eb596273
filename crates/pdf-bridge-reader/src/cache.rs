use crate::ReaderError;
use base64::{Engine as _, engine::general_purpose};
use image::ImageEncoder;
use image::codecs::png::PngEncoder;
use pdf_bridge_runtime::{PageNumber, RasterSurface};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// Flattened, PNG-encoded snapshot of a rendered page
#[derive(Clone, PartialEq, Eq)]
pub struct PageImage {
    pub width: u32,
    pub height: u32,
    png: Vec<u8>,
}

impl PageImage {
    pub fn from_png(width: u32, height: u32, png: Vec<u8>) -> Self {
        Self { width, height, png }
    }

    pub fn png(&self) -> &[u8] {
        &self.png
    }

    pub fn data_url(&self) -> String {
        format!(
            "data:image/png;base64,{}",
            general_purpose::STANDARD.encode(&self.png)
        )
    }
}

impl fmt::Debug for PageImage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PageImage")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("png_len", &self.png.len())
            .finish()
    }
}

/// Something a page image can be derived from
pub trait SnapshotSource {
    fn snapshot(&self) -> Result<PageImage, ReaderError>;
}

impl SnapshotSource for RasterSurface {
    fn snapshot(&self) -> Result<PageImage, ReaderError> {
        if self.width == 0 || self.height == 0 {
            return Err(ReaderError::Snapshot(format!(
                "Surface has no area ({}x{})",
                self.width, self.height
            )));
        }

        let expected = self.width as usize * self.height as usize * 4;
        if self.rgba.len() != expected {
            return Err(ReaderError::Snapshot(format!(
                "Expected {} RGBA bytes for {}x{}, got {}",
                expected,
                self.width,
                self.height,
                self.rgba.len()
            )));
        }

        let mut png = Vec::new();
        PngEncoder::new(&mut png).write_image(
            &self.rgba,
            self.width,
            self.height,
            image::ExtendedColorType::Rgba8,
        )?;

        Ok(PageImage::from_png(self.width, self.height, png))
    }
}

/// One flattened image per page, written at most once
#[derive(Debug, Default)]
pub struct PageImageCache {
    images: HashMap<PageNumber, Arc<PageImage>>,
}

impl PageImageCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot `source` into the cache unless `page` is already present.
    ///
    /// Returns `Ok(true)` when a new entry was stored and `Ok(false)` when the
    /// page was already cached; the source is not touched in that case.
    pub fn write(
        &mut self,
        page: PageNumber,
        source: &dyn SnapshotSource,
    ) -> Result<bool, ReaderError> {
        if self.images.contains_key(&page) {
            log::debug!("Page {} already cached, skipping snapshot", page);
            return Ok(false);
        }

        let image = source.snapshot()?;
        log::debug!(
            "Cached page {} ({}x{}, {} byte png)",
            page,
            image.width,
            image.height,
            image.png.len()
        );
        self.images.insert(page, Arc::new(image));
        Ok(true)
    }

    pub fn read(&self, page: PageNumber) -> Option<Arc<PageImage>> {
        self.images.get(&page).cloned()
    }

    pub fn contains(&self, page: PageNumber) -> bool {
        self.images.contains_key(&page)
    }

    pub fn len(&self) -> usize {
        self.images.len()
    }

    pub fn is_empty(&self) -> bool {
        self.images.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn surface(width: u32, height: u32) -> RasterSurface {
        RasterSurface {
            width,
            height,
            rgba: vec![255; (width * height * 4) as usize],
        }
    }

    #[test]
    fn snapshot_produces_png() {
        let image = surface(2, 3).snapshot().unwrap();
        assert_eq!((image.width, image.height), (2, 3));
        assert_eq!(&image.png()[..8], b"\x89PNG\r\n\x1a\n");
        assert!(image.data_url().starts_with("data:image/png;base64,iVBORw0KGgo"));
    }

    #[test]
    fn snapshot_rejects_short_buffer() {
        let mut bad = surface(2, 2);
        bad.rgba.pop();
        assert!(matches!(bad.snapshot(), Err(ReaderError::Snapshot(_))));
    }

    #[test]
    fn snapshot_rejects_empty_surface() {
        assert!(matches!(
            surface(0, 4).snapshot(),
            Err(ReaderError::Snapshot(_))
        ));
    }
}
