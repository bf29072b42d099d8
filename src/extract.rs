use std::fmt;
use std::io::Read;
use std::path::Path;

use crate::error::OutputError;
use crate::processor::{ScanReport, scan};
use crate::resolve::resolve;
use crate::sink::{Diagnostics, MessageSink, NullSink};
use crate::types::TextOutput;

/// Builder for configuring extraction options.
///
/// # Examples
///
/// ```no_run
/// use pdf_cmap_strings::PdfExtractor;
///
/// // Print every diagnostic while extracting
/// let output = PdfExtractor::builder()
///     .sink(|m: &str| eprintln!("{}", m))
///     .build()
///     .from_path("document.pdf")?;
/// # Ok::<(), pdf_cmap_strings::OutputError>(())
/// ```
#[derive(Default)]
pub struct PdfExtractorBuilder {
    sink: Option<Box<dyn MessageSink>>,
}

impl PdfExtractorBuilder {
    /// Create a new builder with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Receive the diagnostics of the scan and the resolution.
    pub fn sink(mut self, sink: impl MessageSink + 'static) -> Self {
        self.sink = Some(Box::new(sink));
        self
    }

    /// Build the extractor configuration.
    pub fn build(self) -> PdfExtractor {
        PdfExtractor {
            sink: self.sink.unwrap_or_else(|| Box::new(NullSink)),
        }
    }
}

impl fmt::Debug for PdfExtractorBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PdfExtractorBuilder")
            .field("sink", &self.sink.is_some())
            .finish()
    }
}

/// PDF text extractor with configuration options.
///
/// Extraction runs in two passes. [`PdfExtractor::scan`] walks the document
/// once and collects font metadata, CMap tables and unresolved fragments;
/// [`PdfExtractor::resolve`] turns the fragments into text. The `from_*`
/// methods run both.
///
/// # Examples
///
/// ```no_run
/// use pdf_cmap_strings::PdfExtractor;
///
/// let output = PdfExtractor::default().from_path("file.pdf")?;
/// for text in output.texts() {
///     println!("{}", text);
/// }
/// # Ok::<(), pdf_cmap_strings::OutputError>(())
/// ```
pub struct PdfExtractor {
    sink: Box<dyn MessageSink>,
}

impl Default for PdfExtractor {
    fn default() -> Self {
        PdfExtractor {
            sink: Box::new(NullSink),
        }
    }
}

impl PdfExtractor {
    /// Create a builder for configuring extraction options.
    pub fn builder() -> PdfExtractorBuilder {
        PdfExtractorBuilder::new()
    }

    /// First pass only.
    pub fn scan(&mut self, bytes: &[u8]) -> ScanReport {
        scan(bytes, &mut *self.sink)
    }

    /// Second pass over a finished scan.
    pub fn resolve(&mut self, report: &ScanReport) -> TextOutput {
        let mut diag = Diagnostics::new(&mut *self.sink);
        resolve(report, &mut diag)
    }

    /// Extract text from a PDF file at the given path.
    pub fn from_path<P: AsRef<Path>>(self, path: P) -> Result<TextOutput, OutputError> {
        let bytes = std::fs::read(path)?;
        Ok(self.from_bytes(&bytes))
    }

    /// Extract text from a PDF in memory.
    ///
    /// A buffer that does not start with a PDF header gives an empty output.
    pub fn from_bytes(mut self, bytes: &[u8]) -> TextOutput {
        let report = self.scan(bytes);
        self.resolve(&report)
    }

    /// Extract text from a PDF reader.
    pub fn from_reader<R: Read>(self, mut reader: R) -> Result<TextOutput, OutputError> {
        let mut bytes = Vec::new();
        reader.read_to_end(&mut bytes)?;
        Ok(self.from_bytes(&bytes))
    }
}

impl fmt::Debug for PdfExtractor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PdfExtractor")
            .field("sink_enabled", &self.sink.enabled())
            .finish()
    }
}

/// Extract text from a PDF file at the given path using default settings.
///
/// This is a convenience function equivalent to `PdfExtractor::default().from_path(path)`.
///
/// # Examples
///
/// ```no_run
/// let output = pdf_cmap_strings::from_path("file.pdf")?;
/// print!("{}", output);
/// # Ok::<(), pdf_cmap_strings::OutputError>(())
/// ```
pub fn from_path<P: AsRef<Path>>(path: P) -> Result<TextOutput, OutputError> {
    PdfExtractor::default().from_path(path)
}

/// Extract text from a PDF in memory using default settings.
///
/// This is a convenience function equivalent to `PdfExtractor::default().from_bytes(bytes)`.
///
/// # Examples
///
/// ```no_run
/// let bytes = std::fs::read("file.pdf")?;
/// let output = pdf_cmap_strings::from_bytes(&bytes);
/// println!("{}", output.joined());
/// # Ok::<(), std::io::Error>(())
/// ```
pub fn from_bytes(bytes: &[u8]) -> TextOutput {
    PdfExtractor::default().from_bytes(bytes)
}

/// Extract text from a PDF reader using default settings.
///
/// This is a convenience function equivalent to `PdfExtractor::default().from_reader(reader)`.
///
/// # Examples
///
/// ```no_run
/// use std::fs::File;
///
/// let file = File::open("file.pdf")?;
/// let output = pdf_cmap_strings::from_reader(file)?;
/// print!("{}", output);
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub fn from_reader<R: Read>(reader: R) -> Result<TextOutput, OutputError> {
    PdfExtractor::default().from_reader(reader)
}
