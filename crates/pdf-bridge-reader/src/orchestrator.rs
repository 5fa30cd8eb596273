use crate::cache::{PageImage, PageImageCache};
use crate::readiness::{PageReadiness, Progress, ReadinessRecord};
use crate::renderer::Renderer;
use crate::{ReaderError, Result};
use pdf_bridge_runtime::{
    EventSender, Handoff, PageNumber, PageRequest, RasterSurface, ReaderUpdate, RendererEvent,
    Signal, UpdateSender,
};
use std::collections::BTreeMap;
use std::sync::Arc;

/// Document-level state of a reader session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DocumentSession {
    /// Unknown until the renderer reports it
    pub num_pages: Option<u32>,
    /// Page whose signal was observed most recently
    pub current_page: PageNumber,
    /// True until the first document-level load signal
    pub loading: bool,
}

impl Default for DocumentSession {
    fn default() -> Self {
        Self {
            num_pages: None,
            current_page: PageNumber::FIRST,
            loading: true,
        }
    }
}

/// How one page should be presented right now
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageView {
    /// Not flattened yet, shown as a placeholder
    Pending(PageNumber),
    Image(PageNumber, Arc<PageImage>),
}

/// Snapshot of what the reader's view layer shows
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentView {
    pub loading: bool,
    pub pages: Vec<PageView>,
}

/// Owns the page list inside the isolated context and drives one
/// [`PageReadiness`] per page through the renderer
pub struct DocumentOrchestrator<R> {
    handoff: Handoff,
    renderer: R,
    events: EventSender,
    updates: UpdateSender,
    session: DocumentSession,
    pages: BTreeMap<PageNumber, PageReadiness>,
    cache: PageImageCache,
    halted: bool,
}

impl<R: Renderer> DocumentOrchestrator<R> {
    pub fn new(handoff: Handoff, renderer: R, events: EventSender, updates: UpdateSender) -> Self {
        Self {
            handoff,
            renderer,
            events,
            updates,
            session: DocumentSession::default(),
            pages: BTreeMap::new(),
            cache: PageImageCache::new(),
            halted: false,
        }
    }

    /// Read the handoff out of a packaged artifact at startup
    pub fn from_html(
        html: &str,
        renderer: R,
        events: EventSender,
        updates: UpdateSender,
    ) -> Result<Self> {
        let handoff = Handoff::from_html(html)?;
        Ok(Self::new(handoff, renderer, events, updates))
    }

    /// Hand the payload to the renderer
    pub fn start(&mut self) {
        log::debug!(
            "Starting reader: {} byte payload, width {}",
            self.handoff.payload.len(),
            self.handoff.viewport_width
        );
        self.renderer
            .load_document(&self.handoff.payload, self.events.clone());
    }

    pub fn handle_event(&mut self, event: RendererEvent) {
        if self.halted {
            log::debug!("Reader halted, dropping {:?}", event);
            return;
        }

        match event {
            RendererEvent::DocumentLoaded { num_pages } => self.on_document_loaded(num_pages),
            RendererEvent::DocumentFailed { message } => self.on_document_failed(message),
            RendererEvent::PageLoaded { page } => self.on_signal(page, Signal::Load, None),
            RendererEvent::PageRendered { page, surface } => {
                self.on_signal(page, Signal::Render, Some(surface))
            }
            RendererEvent::TextExtracted { page } => {
                self.on_signal(page, Signal::TextExtraction, None)
            }
            RendererEvent::PageFailed {
                page,
                signal,
                message,
            } => self.on_page_failed(page, signal, message),
        }
    }

    fn on_document_loaded(&mut self, num_pages: u32) {
        if !self.session.loading {
            log::warn!("Ignoring repeated document load signal");
            return;
        }

        self.session.num_pages = Some(num_pages);
        self.session.loading = false;
        log::info!("Document loaded with {} pages", num_pages);
        self.send(ReaderUpdate::DocumentLoaded { num_pages });

        let width = self.handoff.viewport_width;
        for page in PageNumber::range(num_pages) {
            self.pages.insert(page, PageReadiness::new(page, width));
            self.renderer
                .render_page(PageRequest { page, width }, self.events.clone());
        }
    }

    fn on_document_failed(&mut self, message: String) {
        let error = ReaderError::DocumentLoad(message);
        log::error!("{}", error);
        self.halted = true;
        self.send(ReaderUpdate::Alert {
            message: error.to_string(),
            fatal: true,
        });
    }

    fn on_signal(&mut self, page: PageNumber, signal: Signal, surface: Option<RasterSurface>) {
        let Some(readiness) = self.pages.get_mut(&page) else {
            log::warn!("Dropping {} signal for unrequested page {}", signal, page);
            return;
        };
        self.session.current_page = page;

        if let Some(surface) = surface {
            readiness.attach_surface(surface);
        }

        match readiness.observe(signal, &mut self.cache) {
            Ok(Progress::Cached) => self.send(ReaderUpdate::PageCached { page }),
            Ok(Progress::Pending | Progress::AlreadyCached) => {}
            Err(e) => {
                let error = readiness.fail(signal, e.to_string());
                self.alert_page(error);
            }
        }
    }

    fn on_page_failed(&mut self, page: PageNumber, signal: Signal, message: String) {
        let error = match self.pages.get_mut(&page) {
            Some(readiness) if !readiness.record().is_cached() => readiness.fail(signal, message),
            _ => ReaderError::PageSignal {
                page,
                signal,
                message,
            },
        };
        self.alert_page(error);
    }

    fn alert_page(&self, error: ReaderError) {
        log::warn!("{}", error);
        self.send(ReaderUpdate::Alert {
            message: error.to_string(),
            fatal: false,
        });
    }

    fn send(&self, update: ReaderUpdate) {
        let _ = self.updates.send(update);
    }

    pub fn session(&self) -> &DocumentSession {
        &self.session
    }

    pub fn handoff(&self) -> &Handoff {
        &self.handoff
    }

    pub fn is_halted(&self) -> bool {
        self.halted
    }

    pub fn readiness(&self, page: PageNumber) -> Option<&ReadinessRecord> {
        self.pages.get(&page).map(PageReadiness::record)
    }

    /// Number of per-page readiness engines created so far
    pub fn page_engines(&self) -> usize {
        self.pages.len()
    }

    pub fn cache(&self) -> &PageImageCache {
        &self.cache
    }

    /// No further progress is expected
    pub fn is_settled(&self) -> bool {
        self.halted
            || (!self.session.loading && self.pages.values().all(PageReadiness::is_settled))
    }

    pub fn view(&self) -> DocumentView {
        let pages = PageNumber::range(self.session.num_pages.unwrap_or(0))
            .map(|page| match self.cache.read(page) {
                Some(image) => PageView::Image(page, image),
                None => PageView::Pending(page),
            })
            .collect();

        DocumentView {
            loading: self.session.loading,
            pages,
        }
    }
}
