use crate::renderer::Renderer;
use pdf_bridge_payload::transport::decode_data_uri;
use pdf_bridge_runtime::{EventSender, PageRequest, RasterSurface, RendererEvent, Signal};
use pdfium_render::prelude::*;
use std::path::PathBuf;
use tokio::sync::mpsc;

/// Initialize Pdfium, trying `library_dir` first, then falling back to system
fn init_pdfium(library_dir: Option<&PathBuf>) -> Result<Pdfium, PdfiumError> {
    if let Some(dir) = library_dir {
        if let Ok(binding) =
            Pdfium::bind_to_library(Pdfium::pdfium_platform_library_name_at_path(dir))
        {
            return Ok(Pdfium::new(binding));
        }
    }

    Pdfium::bind_to_system_library().map(Pdfium::new)
}

/// [`Renderer`] backed by pdfium.
///
/// Pdfium is not thread safe, so one blocking worker owns the library and the
/// open document for the whole session and renders page requests in the
/// order they were made. The worker exits when the renderer is dropped.
#[derive(Debug, Default)]
pub struct PdfiumRenderer {
    library_dir: Option<PathBuf>,
    jobs: Option<mpsc::UnboundedSender<PageRequest>>,
}

impl PdfiumRenderer {
    pub fn new(library_dir: Option<PathBuf>) -> Self {
        Self {
            library_dir,
            jobs: None,
        }
    }
}

impl Renderer for PdfiumRenderer {
    fn load_document(&mut self, file: &str, events: EventSender) {
        let bytes = match decode_data_uri(file) {
            Ok(body) => body.bytes,
            Err(e) => {
                let _ = events.send(RendererEvent::DocumentFailed {
                    message: e.to_string(),
                });
                return;
            }
        };

        let (job_tx, job_rx) = mpsc::unbounded_channel();
        self.jobs = Some(job_tx);

        let library_dir = self.library_dir.clone();
        tokio::task::spawn_blocking(move || {
            run_document(library_dir.as_ref(), &bytes, job_rx, &events);
        });
    }

    fn render_page(&mut self, request: PageRequest, events: EventSender) {
        let queued = self
            .jobs
            .as_ref()
            .is_some_and(|jobs| jobs.send(request).is_ok());

        if !queued {
            let _ = events.send(RendererEvent::PageFailed {
                page: request.page,
                signal: Signal::Load,
                message: "No document loaded".to_string(),
            });
        }
    }
}

fn run_document(
    library_dir: Option<&PathBuf>,
    bytes: &[u8],
    mut jobs: mpsc::UnboundedReceiver<PageRequest>,
    events: &EventSender,
) {
    let document_failed = |e: PdfiumError| {
        let _ = events.send(RendererEvent::DocumentFailed {
            message: e.to_string(),
        });
    };

    let pdfium = match init_pdfium(library_dir) {
        Ok(pdfium) => pdfium,
        Err(e) => return document_failed(e),
    };
    let document = match pdfium.load_pdf_from_byte_slice(bytes, None) {
        Ok(document) => document,
        Err(e) => return document_failed(e),
    };

    let num_pages = document.pages().len() as u32;
    let _ = events.send(RendererEvent::DocumentLoaded { num_pages });

    while let Some(request) = jobs.blocking_recv() {
        render_into(&document, request, events);
    }
    log::debug!("Pdfium worker finished");
}

fn render_into(document: &PdfDocument<'_>, request: PageRequest, events: &EventSender) {
    let page_number = request.page;
    let fail = |signal: Signal, e: PdfiumError| {
        let _ = events.send(RendererEvent::PageFailed {
            page: page_number,
            signal,
            message: e.to_string(),
        });
    };

    let page = match document.pages().get(request.page.index() as u16) {
        Ok(page) => page,
        Err(e) => return fail(Signal::Load, e),
    };
    let _ = events.send(RendererEvent::PageLoaded { page: page_number });

    let config = PdfRenderConfig::new().set_target_width(request.width as i32);
    match page.render_with_config(&config) {
        Ok(bitmap) => {
            let surface = RasterSurface {
                width: bitmap.width() as u32,
                height: bitmap.height() as u32,
                rgba: bitmap.as_rgba_bytes().to_vec(),
            };
            let _ = events.send(RendererEvent::PageRendered {
                page: page_number,
                surface,
            });
        }
        Err(e) => fail(Signal::Render, e),
    }

    match page.text() {
        Ok(text) => {
            log::debug!(
                "Extracted {} characters from page {}",
                text.all().len(),
                page_number
            );
            let _ = events.send(RendererEvent::TextExtracted { page: page_number });
        }
        Err(e) => fail(Signal::TextExtraction, e),
    }
}
