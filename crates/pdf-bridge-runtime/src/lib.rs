use std::fmt;
use tokio::sync::mpsc;

// Re-export the structured handoff received by the isolated context
pub use pdf_bridge_payload::{Handoff, HandoffError};

/// 1-based page number
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PageNumber(u32);

impl PageNumber {
    pub const FIRST: PageNumber = PageNumber(1);

    /// `None` for page zero
    pub fn new(number: u32) -> Option<Self> {
        (number > 0).then_some(Self(number))
    }

    pub fn get(self) -> u32 {
        self.0
    }

    /// Zero-based index, as used by most rendering engines
    pub fn index(self) -> usize {
        (self.0 - 1) as usize
    }

    /// Pages `1..=count`, ascending
    pub fn range(count: u32) -> impl Iterator<Item = PageNumber> {
        (1..=count).map(PageNumber)
    }
}

impl fmt::Display for PageNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// The three independent per-page completion signals
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Signal {
    Load,
    Render,
    TextExtraction,
}

impl Signal {
    pub const ALL: [Signal; 3] = [Signal::Load, Signal::Render, Signal::TextExtraction];

    pub fn name(self) -> &'static str {
        match self {
            Signal::Load => "load",
            Signal::Render => "render",
            Signal::TextExtraction => "text extraction",
        }
    }
}

impl fmt::Display for Signal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Raw RGBA pixels a page was rendered into
#[derive(Clone, PartialEq, Eq)]
pub struct RasterSurface {
    pub width: u32,
    pub height: u32,
    pub rgba: Vec<u8>,
}

impl fmt::Debug for RasterSurface {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RasterSurface")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("rgba_len", &self.rgba.len())
            .finish()
    }
}

/// Ask the renderer to process one page at a given raster width
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: PageNumber,
    pub width: u32,
}

/// Events emitted by the black-box renderer
#[derive(Debug, Clone, PartialEq)]
pub enum RendererEvent {
    DocumentLoaded {
        num_pages: u32,
    },
    DocumentFailed {
        message: String,
    },
    PageLoaded {
        page: PageNumber,
    },
    PageRendered {
        page: PageNumber,
        surface: RasterSurface,
    },
    TextExtracted {
        page: PageNumber,
    },
    PageFailed {
        page: PageNumber,
        signal: Signal,
        message: String,
    },
}

/// Updates sent from the reader to its view layer
#[derive(Debug, Clone, PartialEq)]
pub enum ReaderUpdate {
    DocumentLoaded {
        num_pages: u32,
    },
    PageCached {
        page: PageNumber,
    },
    Alert {
        message: String,
        fatal: bool,
    },
    /// Every page is cached or failed, or the document failed
    Settled,
}

pub type EventSender = mpsc::UnboundedSender<RendererEvent>;
pub type EventReceiver = mpsc::UnboundedReceiver<RendererEvent>;
pub type UpdateSender = mpsc::UnboundedSender<ReaderUpdate>;
pub type UpdateReceiver = mpsc::UnboundedReceiver<ReaderUpdate>;
