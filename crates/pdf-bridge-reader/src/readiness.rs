//! Per-page readiness tracking
//!
//! A page is flattened into the image cache only once its load, render and
//! text-extraction signals have all been observed, in whatever order they
//! arrive. After that the page is `cached` for good.

use crate::ReaderError;
use crate::cache::PageImageCache;
use pdf_bridge_runtime::{PageNumber, RasterSurface, Signal};

/// Signal state for one page
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReadinessRecord {
    pub loaded: bool,
    pub rendered: bool,
    pub text_extracted: bool,
    cached: bool,
}

impl ReadinessRecord {
    pub fn is_fully_ready(&self) -> bool {
        self.loaded && self.rendered && self.text_extracted
    }

    pub fn is_cached(&self) -> bool {
        self.cached
    }

    pub fn has(&self, signal: Signal) -> bool {
        match signal {
            Signal::Load => self.loaded,
            Signal::Render => self.rendered,
            Signal::TextExtraction => self.text_extracted,
        }
    }

    fn set(&mut self, signal: Signal) {
        match signal {
            Signal::Load => self.loaded = true,
            Signal::Render => self.rendered = true,
            Signal::TextExtraction => self.text_extracted = true,
        }
    }
}

/// Result of feeding one signal to a page
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Progress {
    /// Still waiting on at least one signal
    Pending,
    /// This signal completed the page and it was written to the cache
    Cached,
    /// The page was cached earlier; nothing changed
    AlreadyCached,
}

/// Readiness engine for a single page
#[derive(Debug)]
pub struct PageReadiness {
    page: PageNumber,
    width: u32,
    record: ReadinessRecord,
    surface: Option<RasterSurface>,
    failed: Option<Signal>,
}

impl PageReadiness {
    pub fn new(page: PageNumber, width: u32) -> Self {
        Self {
            page,
            width,
            record: ReadinessRecord::default(),
            surface: None,
            failed: None,
        }
    }

    pub fn page(&self) -> PageNumber {
        self.page
    }

    /// Raster width this page was requested at
    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn record(&self) -> &ReadinessRecord {
        &self.record
    }

    pub fn failed(&self) -> Option<Signal> {
        self.failed
    }

    /// Cached, or stuck behind a failed signal
    pub fn is_settled(&self) -> bool {
        self.record.cached || self.failed.is_some()
    }

    /// Keep the surface the page was drawn into until the page is flattened
    pub fn attach_surface(&mut self, surface: RasterSurface) {
        if !self.record.cached {
            self.surface = Some(surface);
        }
    }

    /// Record `signal` as observed and flatten the page once all three are in
    pub fn observe(
        &mut self,
        signal: Signal,
        cache: &mut PageImageCache,
    ) -> Result<Progress, ReaderError> {
        if self.record.cached {
            log::debug!("Page {}: {} signal after caching ignored", self.page, signal);
            return Ok(Progress::AlreadyCached);
        }

        if self.record.has(signal) {
            log::debug!("Page {}: duplicate {} signal", self.page, signal);
        }
        self.record.set(signal);

        if !self.record.is_fully_ready() {
            return Ok(Progress::Pending);
        }

        let surface = self.surface.as_ref().ok_or_else(|| {
            ReaderError::Snapshot(format!("Page {} has no rendered surface", self.page))
        })?;
        cache.write(self.page, surface)?;

        self.record.cached = true;
        self.surface = None;
        Ok(Progress::Cached)
    }

    /// Mark `signal` as failed for this page
    pub fn fail(&mut self, signal: Signal, message: impl Into<String>) -> ReaderError {
        if self.failed.is_none() {
            self.failed = Some(signal);
        }
        ReaderError::PageSignal {
            page: self.page,
            signal,
            message: message.into(),
        }
    }
}
