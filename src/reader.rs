use std::sync::OnceLock;

use regex::Regex;

use crate::error::ObjectError;

/// Forward only cursor over the document buffer that yields PDF-structural lines.
///
/// A raw line ends after CR, LF or CRLF. Two overrides keep dictionaries apart:
/// the line is cut before a following `<<`, and cut right after a `>>`.
#[derive(Debug)]
pub(crate) struct LineReader<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> LineReader<'a> {
    pub(crate) fn new(data: &'a [u8]) -> LineReader<'a> {
        LineReader { data, pos: 0 }
    }

    pub(crate) fn position(&self) -> usize {
        self.pos
    }

    /// Move the cursor forward, stopping at the end of the buffer.
    pub(crate) fn advance(&mut self, length: usize) {
        self.pos = self.pos.saturating_add(length).min(self.data.len());
    }

    /// Take the payload of a `length` byte stream starting at the cursor.
    ///
    /// The first two bytes (the zlib header) are not part of the returned slice.
    /// On error the cursor does not move.
    pub(crate) fn take_stream(&mut self, length: usize) -> Result<&'a [u8], ObjectError> {
        if length < 2 {
            return Err(ObjectError::StreamTooShort(length));
        }
        let end = self
            .pos
            .checked_add(length)
            .filter(|end| *end <= self.data.len())
            .ok_or(ObjectError::StreamOutOfRange {
                position: self.pos,
                length,
                available: self.data.len(),
            })?;
        let payload = &self.data[self.pos + 2..end];
        self.pos = end;
        Ok(payload)
    }

    fn next_raw_line(&mut self) -> Option<&'a [u8]> {
        let data = self.data;
        let start = self.pos;
        if start >= data.len() {
            return None;
        }

        let mut length = 0;
        let mut prev: Option<u8> = None;
        while start + length < data.len() {
            let at = start + length;
            if let Some(prev) = prev {
                let cur = data[at];
                if prev == b'\r' && cur == b'\n' {
                    length += 1;
                    break;
                }
                if prev == b'\r' || prev == b'\n' {
                    break;
                }
                if prev == b'>' && cur == b'>' {
                    length += 1;
                    break;
                }
                if at + 2 < data.len() && data[at + 1] == b'<' && data[at + 2] == b'<' {
                    length += 1;
                    break;
                }
            }
            prev = Some(data[at]);
            length += 1;
        }

        self.pos += length;
        Some(&data[start..start + length])
    }

    /// Next raw line that is not blank, as text without its line terminators.
    fn next_nonblank_line(&mut self) -> Option<String> {
        loop {
            let raw = self.next_raw_line()?;
            let line: String = String::from_utf8_lossy(raw)
                .chars()
                .filter(|c| *c != '\r' && *c != '\n')
                .collect();
            if !line.is_empty() {
                return Some(line);
            }
        }
    }

    /// Next logical line: raw lines are joined until every `<<` has its `>>`.
    pub(crate) fn next_line(&mut self) -> Option<String> {
        let mut line = self.next_nonblank_line()?;
        while line.matches("<<").count() != line.matches(">>").count() {
            match self.next_nonblank_line() {
                Some(more) => line.push_str(&more),
                None => break,
            }
        }
        Some(line)
    }
}

/// Whether `line` is an acceptable first line, `%PDF-<digit>.<digit>` followed by anything.
pub(crate) fn is_header_line(line: &str) -> bool {
    static RE_HEADER: OnceLock<Regex> = OnceLock::new();
    let re_header = RE_HEADER.get_or_init(|| Regex::new(r"^%PDF-[0-9]\.[0-9]").unwrap());
    re_header.is_match(line)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lines(data: &[u8]) -> Vec<String> {
        let mut reader = LineReader::new(data);
        std::iter::from_fn(|| reader.next_line()).collect()
    }

    #[test_log::test]
    fn splits_on_every_line_ending() {
        assert_eq!(lines(b"a\rb\nc\r\nd"), ["a", "b", "c", "d"]);
    }

    #[test_log::test]
    fn skips_blank_lines() {
        assert_eq!(lines(b"a\n\n\r\n\rb\n"), ["a", "b"]);
    }

    #[test_log::test]
    fn breaks_before_nested_dictionary_and_after_close() {
        let mut reader = LineReader::new(b"5 0 obj<</Length 4>>stream\n");
        assert_eq!(reader.next_raw_line(), Some(&b"5 0 obj"[..]));
        assert_eq!(reader.next_raw_line(), Some(&b"<</Length 4>>"[..]));
        assert_eq!(reader.next_raw_line(), Some(&b"stream\n"[..]));
        assert_eq!(reader.next_raw_line(), None);
    }

    #[test_log::test]
    fn joins_until_dictionaries_balance() {
        let data = b"<</Type/Page/Resources<</Font<</F1 5 0 R>>>>>>\n/Contents 4 0 R\n";
        assert_eq!(
            lines(data),
            ["<</Type/Page/Resources<</Font<</F1 5 0 R>>>>>>", "/Contents 4 0 R"]
        );
    }

    #[test_log::test]
    fn multi_line_dictionary_is_one_logical_line() {
        let data = b"<<\n/Type /Font\n/ToUnicode 6 0 R\n>>\nendobj\n";
        assert_eq!(lines(data), ["<</Type /Font/ToUnicode 6 0 R>>", "endobj"]);
    }

    #[test_log::test]
    fn unbalanced_tail_stops_at_end_of_buffer() {
        assert_eq!(lines(b"<</Type\n/Font"), ["<</Type/Font"]);
    }

    #[test_log::test]
    fn take_stream_skips_header_and_advances() {
        let data = b"xx0123456789";
        let mut reader = LineReader::new(data);
        reader.advance(2);
        assert_eq!(reader.take_stream(6).unwrap(), b"2345");
        assert_eq!(reader.position(), 8);
    }

    #[test_log::test]
    fn take_stream_out_of_range_keeps_cursor() {
        let mut reader = LineReader::new(b"0123");
        assert!(matches!(
            reader.take_stream(10),
            Err(ObjectError::StreamOutOfRange { .. })
        ));
        assert!(matches!(reader.take_stream(1), Err(ObjectError::StreamTooShort(1))));
        assert_eq!(reader.position(), 0);
    }

    #[test_log::test]
    fn advance_clamps_to_end() {
        let mut reader = LineReader::new(b"abc");
        reader.advance(100);
        assert_eq!(reader.position(), 3);
        assert_eq!(reader.next_line(), None);
    }

    #[test_log::test]
    fn header_line() {
        assert!(is_header_line("%PDF-1.4"));
        assert!(is_header_line("%PDF-1.7 trailing"));
        assert!(!is_header_line("%PDF-14"));
        assert!(!is_header_line("PDF-1.4"));
        assert!(!is_header_line(" %PDF-1.4"));
    }
}
