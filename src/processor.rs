use std::sync::OnceLock;

use regex::Regex;

use crate::cmap::{CMapBuilder, CMapTables};
use crate::content::{ContentExtractor, SequenceCounter};
use crate::error::ObjectError;
use crate::fonts::{FontCatalog, extract_font_metadata, is_font_dictionary};
use crate::reader::{LineReader, is_header_line};
use crate::sink::{Diagnostics, MessageSink};
use crate::stream::{SkipReason, check_decodable, decode_stream, is_flate_encoded, stream_length};
use crate::types::{Fragment, IndirectRef};
use crate::utils::parse_u32;

/// Everything the first pass collected: font metadata, CMap tables and the
/// unresolved fragments in document order.
#[derive(Debug, Clone, Default)]
pub struct ScanReport {
    header_accepted: bool,
    fonts: FontCatalog,
    cmaps: CMapTables,
    fragments: Vec<Fragment>,
}

impl ScanReport {
    /// `false` when the first line was not a `%PDF-x.y` header and nothing was scanned.
    pub fn header_accepted(&self) -> bool {
        self.header_accepted
    }

    pub fn fonts(&self) -> &FontCatalog {
        &self.fonts
    }

    pub fn cmaps(&self) -> &CMapTables {
        &self.cmaps
    }

    pub fn fragments(&self) -> &[Fragment] {
        &self.fragments
    }

    #[cfg(test)]
    pub(crate) fn fonts_mut(&mut self) -> &mut FontCatalog {
        &mut self.fonts
    }

    #[cfg(test)]
    pub(crate) fn cmaps_mut(&mut self) -> &mut CMapTables {
        &mut self.cmaps
    }

    #[cfg(test)]
    pub(crate) fn fragments_mut(&mut self) -> &mut Vec<Fragment> {
        &mut self.fragments
    }
}

/// What happened to one indirect object.
#[derive(Debug)]
pub(crate) enum ObjectOutcome {
    Processed(Vec<Fragment>),
    Skipped(SkipReason),
    Malformed(ObjectError),
}

fn object_header_regex() -> &'static Regex {
    static RE_OBJECT_HEADER: OnceLock<Regex> = OnceLock::new();
    RE_OBJECT_HEADER.get_or_init(|| Regex::new(r"[0-9]+ +[0-9]+ +obj *$").unwrap())
}

fn integer_regex() -> &'static Regex {
    static RE_INTEGER: OnceLock<Regex> = OnceLock::new();
    RE_INTEGER.get_or_init(|| Regex::new(r"[0-9]+").unwrap())
}

/// The object an `N G obj` line opens.
fn object_ref(line: &str) -> Result<IndirectRef, ObjectError> {
    let mut numbers = integer_regex().find_iter(line).map(|m| parse_u32(m.as_str()));
    match (numbers.next(), numbers.next()) {
        (Some(number), Some(generation)) => Ok(IndirectRef::new(number?, generation?)),
        _ => Err(ObjectError::MalformedInteger(line.to_string())),
    }
}

/// State of one scan. Owns the cursor and everything accumulated so far.
struct Scanner<'a, 's> {
    reader: LineReader<'a>,
    diag: Diagnostics<'s>,
    fonts: FontCatalog,
    cmaps: CMapTables,
    counter: SequenceCounter,
    fragments: Vec<Fragment>,
}

impl<'a, 's> Scanner<'a, 's> {
    fn new(data: &'a [u8], sink: &'s mut dyn MessageSink) -> Scanner<'a, 's> {
        Scanner {
            reader: LineReader::new(data),
            diag: Diagnostics::new(sink),
            fonts: FontCatalog::new(),
            cmaps: CMapTables::default(),
            counter: SequenceCounter::default(),
            fragments: Vec::new(),
        }
    }

    fn check_header(&mut self) -> bool {
        match self.reader.next_line() {
            Some(line) if is_header_line(&line) => {
                self.diag.debug(format_args!("Header : {}", line));
                true
            }
            Some(line) => {
                self.diag.warn(format_args!("NG : not a PDF header: {}", line));
                false
            }
            None => {
                self.diag.warn(format_args!("NG : empty document"));
                false
            }
        }
    }

    fn run(mut self) -> ScanReport {
        if !self.check_header() {
            return ScanReport::default();
        }

        while let Some(line) = self.reader.next_line() {
            if line.is_empty() || line.starts_with('%') {
                continue;
            }
            self.diag.trace(format_args!("Read : {}", line));
            if !object_header_regex().is_match(&line) {
                continue;
            }

            let outcome = self
                .process_object(&line)
                .unwrap_or_else(ObjectOutcome::Malformed);
            match outcome {
                ObjectOutcome::Processed(fragments) => self.fragments.extend(fragments),
                ObjectOutcome::Skipped(reason) => {
                    self.diag
                        .debug(format_args!("Skip stream of {} : {}", line, reason));
                }
                ObjectOutcome::Malformed(e) => {
                    self.diag.warn(format_args!(
                        "Malformed object {} at offset {}: {}",
                        line,
                        self.reader.position(),
                        e
                    ));
                }
            }
        }

        ScanReport {
            header_accepted: true,
            fonts: self.fonts,
            cmaps: self.cmaps,
            fragments: self.fragments,
        }
    }

    fn process_object(&mut self, header: &str) -> Result<ObjectOutcome, ObjectError> {
        let owner = object_ref(header)?;
        let Some(dict) = self.reader.next_line() else {
            return Ok(ObjectOutcome::Processed(Vec::new()));
        };
        self.diag.trace(format_args!("Read : {}", dict));

        if is_font_dictionary(&dict) {
            extract_font_metadata(&dict, owner, &mut self.fonts, &mut self.diag)?;
        }

        let Some(length) = stream_length(&dict)? else {
            return Ok(ObjectOutcome::Processed(Vec::new()));
        };
        let Some(keyword) = self.reader.next_line() else {
            return Ok(ObjectOutcome::Processed(Vec::new()));
        };
        if !keyword.contains("stream") {
            return Ok(ObjectOutcome::Processed(Vec::new()));
        }

        if !is_flate_encoded(&dict) {
            self.diag
                .trace(format_args!("Skip {} opaque bytes of {}", length, owner));
            self.reader.advance(length);
            return Ok(ObjectOutcome::Processed(Vec::new()));
        }

        let payload = self.reader.take_stream(length)?;
        if let Err(reason) = check_decodable(&dict) {
            return Ok(ObjectOutcome::Skipped(reason));
        }

        let lines = decode_stream(payload)?;
        self.diag.debug(format_args!(
            "Inflated {} : {} lines from {} bytes",
            owner,
            lines.len(),
            length
        ));

        CMapBuilder::new(owner, &mut self.cmaps).process_lines(&lines, &mut self.diag);
        let fragments =
            ContentExtractor::new(&mut self.counter).process_lines(&lines, &mut self.diag);
        Ok(ObjectOutcome::Processed(fragments))
    }
}

/// First pass over a whole document buffer.
pub(crate) fn scan(data: &[u8], sink: &mut dyn MessageSink) -> ScanReport {
    Scanner::new(data, sink).run()
}
