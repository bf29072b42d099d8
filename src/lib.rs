//! Heuristic text extraction for PDF files that use CID fonts with embedded
//! ToUnicode CMaps or Shift-JIS encodings.
//!
//! The document is scanned line by line without an xref table. The scan
//! collects font metadata, CMap tables and the operands of every `Tj`/`TJ`
//! operator; once the whole buffer has been read the operands are resolved
//! against the fonts, so fonts declared after the page that uses them still
//! apply.

mod cmap;
mod content;
mod error;
mod extract;
mod fonts;
mod processor;
mod reader;
mod resolve;
mod sink;
mod stream;
mod types;
mod utils;

// Re-export error type
pub use error::OutputError;

// Re-export extraction API
pub use extract::{PdfExtractor, PdfExtractorBuilder, from_bytes, from_path, from_reader};
pub use processor::ScanReport;
pub use sink::{MessageSink, NullSink};

// Re-export public types
pub use cmap::{CMapTable, CMapTables};
pub use fonts::FontCatalog;
pub use types::{Fragment, IndirectRef, Payload, TextFragment, TextOutput};
