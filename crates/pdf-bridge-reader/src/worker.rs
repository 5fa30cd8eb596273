use crate::orchestrator::DocumentOrchestrator;
use crate::renderer::Renderer;
use pdf_bridge_runtime::{Handoff, ReaderUpdate, UpdateSender};
use tokio::sync::mpsc;

/// Event loop of the isolated context.
///
/// Feeds renderer events to the orchestrator until the session settles, then
/// sends [`ReaderUpdate::Settled`] and returns the orchestrator so callers can
/// read the cached pages. A renderer that never reports a signal keeps this
/// task waiting; there is no timeout.
pub async fn reader_task<R: Renderer>(
    handoff: Handoff,
    renderer: R,
    update_tx: UpdateSender,
) -> DocumentOrchestrator<R> {
    let (event_tx, mut event_rx) = mpsc::unbounded_channel();
    let mut reader = DocumentOrchestrator::new(handoff, renderer, event_tx, update_tx.clone());
    reader.start();

    while !reader.is_settled() {
        match event_rx.recv().await {
            Some(event) => reader.handle_event(event),
            None => break,
        }
    }

    log::debug!(
        "Reader settled: {} of {:?} pages cached",
        reader.cache().len(),
        reader.session().num_pages
    );
    let _ = update_tx.send(ReaderUpdate::Settled);
    reader
}
