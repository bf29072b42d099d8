use std::sync::OnceLock;

use regex::Regex;

use crate::sink::Diagnostics;
use crate::types::{Fragment, Payload};
use crate::utils::hex_to_bytes;

/// Hands out fragment sequence ids in document order.
#[derive(Debug, Default)]
pub(crate) struct SequenceCounter {
    next: u64,
}

impl SequenceCounter {
    pub(crate) fn next_id(&mut self) -> u64 {
        let id = self.next;
        self.next += 1;
        id
    }
}

fn font_select_regex() -> &'static Regex {
    static RE_FONT_SELECT: OnceLock<Regex> = OnceLock::new();
    RE_FONT_SELECT.get_or_init(|| Regex::new(r"/(F[0-9]+) ").unwrap())
}

fn show_text_regex() -> &'static Regex {
    static RE_SHOW_TEXT: OnceLock<Regex> = OnceLock::new();
    RE_SHOW_TEXT.get_or_init(|| Regex::new(r"T[Jj]$").unwrap())
}

fn hex_operand_regex() -> &'static Regex {
    static RE_HEX_OPERAND: OnceLock<Regex> = OnceLock::new();
    RE_HEX_OPERAND.get_or_init(|| Regex::new(r"<([0-9a-fA-F]*)>").unwrap())
}

fn literal_operand_regex() -> &'static Regex {
    static RE_LITERAL_OPERAND: OnceLock<Regex> = OnceLock::new();
    RE_LITERAL_OPERAND.get_or_init(|| Regex::new(r"\(.*\)").unwrap())
}

/// `)-250(` between the strings of a `TJ` array.
fn adjustment_regex() -> &'static Regex {
    static RE_ADJUSTMENT: OnceLock<Regex> = OnceLock::new();
    RE_ADJUSTMENT.get_or_init(|| Regex::new(r"\)[0-9\-]*\(").unwrap())
}

/// Pulls `Tj`/`TJ` operands out of the decoded lines of one content stream.
pub(crate) struct ContentExtractor<'c> {
    counter: &'c mut SequenceCounter,
    current_font: Option<String>,
}

impl<'c> ContentExtractor<'c> {
    pub(crate) fn new(counter: &'c mut SequenceCounter) -> ContentExtractor<'c> {
        ContentExtractor {
            counter,
            current_font: None,
        }
    }

    pub(crate) fn process_lines(
        &mut self,
        lines: &[String],
        diag: &mut Diagnostics<'_>,
    ) -> Vec<Fragment> {
        let mut fragments = Vec::new();
        for line in lines {
            self.process_line(line, &mut fragments, diag);
        }
        fragments
    }

    fn process_line(&mut self, line: &str, out: &mut Vec<Fragment>, diag: &mut Diagnostics<'_>) {
        if let Some(caps) = font_select_regex().captures(line) {
            diag.trace(format_args!("{}", line));
            self.current_font = Some(caps[1].to_string());
        }

        if !show_text_regex().is_match(line) {
            return;
        }
        diag.trace(format_args!("{}", line));

        let bytes: Vec<u8> = hex_operand_regex()
            .captures_iter(line)
            .flat_map(|caps| hex_to_bytes(&caps[1]))
            .collect();
        if !bytes.is_empty() {
            out.push(self.fragment(Payload::Bytes(bytes)));
        }

        for unit in literal_operand_regex().find_iter(line) {
            let merged = adjustment_regex().replace_all(unit.as_str(), "");
            if merged.len() >= 2 {
                let text = merged[1..merged.len() - 1].to_string();
                out.push(self.fragment(Payload::Text(text)));
            }
        }
    }

    fn fragment(&mut self, payload: Payload) -> Fragment {
        Fragment {
            sequence: self.counter.next_id(),
            font: self.current_font.clone(),
            payload,
        }
    }
}
