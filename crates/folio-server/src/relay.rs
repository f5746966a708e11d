//! Bridge between the gateway fragment stream and the client's SSE stream.

use std::convert::Infallible;

use axum::response::sse::{Event, Sse};
use futures_util::StreamExt;
use tokio::sync::mpsc;
use tokio_stream::wrappers::UnboundedReceiverStream;

use folio_core::sanitize::{normalize_markdown_links, sanitize_output};
use folio_gateway::TextStream;

/// Inline error text for a fragment that could not be processed.
const FRAGMENT_ERROR: &str = "Error processing response fragment.";

/// Scrub one raw model fragment for the page.
///
/// Markup is stripped first so that link normalization sees the final
/// text. Whitespace is preserved: fragments carry their own spacing and
/// the page reassembles them by concatenation.
pub fn clean_fragment(raw: &str) -> String {
    normalize_markdown_links(&sanitize_output(raw))
}

/// Relay a gateway fragment stream to the client as server-sent events.
///
/// Each fragment becomes one `data: {"text": ...}` frame, in arrival
/// order. A fragment that failed upstream becomes an inline
/// `data: {"error": ...}` frame and the relay carries on with whatever
/// follows. The stream ends when the gateway is done; no terminator
/// frame is sent.
pub fn stream_events(
    mut upstream: TextStream,
) -> Sse<UnboundedReceiverStream<Result<Event, Infallible>>> {
    let (tx, rx) = mpsc::unbounded_channel();

    tokio::spawn(async move {
        while let Some(item) = upstream.next().await {
            let event = match item {
                Ok(raw) => {
                    let clean = clean_fragment(&raw);
                    if clean.is_empty() {
                        // Nothing survived scrubbing; not worth a frame.
                        continue;
                    }
                    Event::default().data(serde_json::json!({ "text": clean }).to_string())
                }
                Err(e) => {
                    tracing::warn!(error = %e, "bad fragment in generation stream");
                    Event::default().data(serde_json::json!({ "error": FRAGMENT_ERROR }).to_string())
                }
            };
            if tx.send(Ok(event)).is_err() {
                // Client disconnected; stop pulling from the gateway.
                return;
            }
        }
    });

    Sse::new(UnboundedReceiverStream::new(rx))
}
