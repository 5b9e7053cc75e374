//! Turbo stream rendering hook.

use std::sync::Arc;

/// Applies a `text/vnd.turbo-stream.html` message to the live document.
pub trait StreamRenderer: Send + Sync {
    fn render_stream_message(&self, markup: &str);
}

/// Shared handle to a [`StreamRenderer`].
pub type StreamRendererHandle = Arc<dyn StreamRenderer>;
