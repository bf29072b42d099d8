use std::fmt;

use tracing::{debug, trace, warn};

/// Receives the human readable diagnostics produced while a document is
/// scanned and resolved.
///
/// Any `FnMut(&str)` closure is a sink:
///
/// ```
/// let mut seen = Vec::new();
/// let output = pdf_cmap_strings::PdfExtractor::builder()
///     .sink(move |m: &str| seen.push(m.to_string()))
///     .build()
///     .from_bytes(b"%PDF-1.4\n");
/// assert!(output.is_empty());
/// ```
pub trait MessageSink {
    fn message(&mut self, message: &str);

    /// Sinks that drop everything return `false` so messages are never formatted for them.
    fn enabled(&self) -> bool {
        true
    }
}

/// The default sink. Discards every message.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullSink;

impl MessageSink for NullSink {
    fn message(&mut self, _message: &str) {}

    fn enabled(&self) -> bool {
        false
    }
}

impl<F> MessageSink for F
where
    F: FnMut(&str),
{
    fn message(&mut self, message: &str) {
        self(message)
    }
}

/// Emits a tracing event and forwards the same text to the injected sink.
pub(crate) struct Diagnostics<'s> {
    sink: &'s mut dyn MessageSink,
}

impl<'s> Diagnostics<'s> {
    pub(crate) fn new(sink: &'s mut dyn MessageSink) -> Diagnostics<'s> {
        Diagnostics { sink }
    }

    pub(crate) fn trace(&mut self, args: fmt::Arguments<'_>) {
        trace!("{}", args);
        self.forward(args);
    }

    pub(crate) fn debug(&mut self, args: fmt::Arguments<'_>) {
        debug!("{}", args);
        self.forward(args);
    }

    pub(crate) fn warn(&mut self, args: fmt::Arguments<'_>) {
        warn!("{}", args);
        self.forward(args);
    }

    fn forward(&mut self, args: fmt::Arguments<'_>) {
        if self.sink.enabled() {
            self.sink.message(&args.to_string());
        }
    }
}
