use pdf_bridge_runtime::{EventSender, PageRequest};

/// The black-box PDF engine.
///
/// Implementations report every outcome asynchronously as a
/// [`RendererEvent`](pdf_bridge_runtime::RendererEvent) on `events`; the
/// methods themselves never fail.
pub trait Renderer {
    /// Start loading `file`, the payload read from the handoff
    fn load_document(&mut self, file: &str, events: EventSender);

    /// Load, render and extract text for one page
    fn render_page(&mut self, request: PageRequest, events: EventSender);
}
