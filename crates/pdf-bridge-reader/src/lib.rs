mod cache;
mod orchestrator;
#[cfg(feature = "pdfium")]
mod pdfium;
mod readiness;
mod renderer;
mod worker;

pub use cache::{PageImage, PageImageCache, SnapshotSource};
pub use orchestrator::{DocumentOrchestrator, DocumentSession, DocumentView, PageView};
#[cfg(feature = "pdfium")]
pub use pdfium::PdfiumRenderer;
pub use readiness::{PageReadiness, Progress, ReadinessRecord};
pub use renderer::Renderer;
pub use worker::reader_task;

use pdf_bridge_runtime::{HandoffError, PageNumber, Signal};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ReaderError {
    #[error("Error while loading document! \n{0}")]
    DocumentLoad(String),
    #[error("Error on page {page} during {signal}: {message}")]
    PageSignal {
        page: PageNumber,
        signal: Signal,
        message: String,
    },
    #[error("Snapshot error: {0}")]
    Snapshot(String),
    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),
    #[error("Handoff error: {0}")]
    Handoff(#[from] HandoffError),
}

pub type Result<T> = std::result::Result<T, ReaderError>;
