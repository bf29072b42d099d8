//! `bfchar` / `bfrange` blocks of embedded ToUnicode CMaps.
//!
//! ```text
//! 2 beginbfchar
//! <0003> <0020>
//! <0024> <0041>
//! endbfchar
//! 1 beginbfrange
//! <0044> <0046> <0061>
//! <0050> <0051> [<3042> <3044>]
//! endbfrange
//! ```

use std::collections::{HashMap, hash_map::Entry};
use std::sync::OnceLock;

use regex::Regex;

use crate::sink::Diagnostics;
use crate::types::IndirectRef;
use crate::utils::padded_hex_to_bytes;

/// Source code to destination code for one CMap stream.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CMapTable {
    map: HashMap<u16, u16>,
}

impl CMapTable {
    pub fn get(&self, code: u16) -> Option<u16> {
        self.map.get(&code).copied()
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    /// Entries sorted by source code.
    pub fn entries(&self) -> Vec<(u16, u16)> {
        let mut entries: Vec<_> = self.map.iter().map(|(k, v)| (*k, *v)).collect();
        entries.sort_unstable();
        entries
    }

    /// First registration wins; on conflict the kept destination is returned.
    fn insert(&mut self, src: u16, dst: u16) -> Result<(), u16> {
        match self.map.entry(src) {
            Entry::Occupied(e) => Err(*e.get()),
            Entry::Vacant(e) => {
                e.insert(dst);
                Ok(())
            }
        }
    }
}

/// Every CMap table in the document, keyed by the stream object it came from.
#[derive(Debug, Clone, Default)]
pub struct CMapTables {
    tables: HashMap<IndirectRef, CMapTable>,
}

impl CMapTables {
    pub fn get(&self, cmap: IndirectRef) -> Option<&CMapTable> {
        self.tables.get(&cmap)
    }

    pub fn iter(&self) -> impl Iterator<Item = (IndirectRef, &CMapTable)> {
        self.tables.iter().map(|(r, t)| (*r, t))
    }

    pub fn len(&self) -> usize {
        self.tables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }

    #[cfg(test)]
    pub(crate) fn extend(&mut self, cmap: IndirectRef, entries: &[(u16, u16)]) {
        let table = self.table_mut(cmap);
        for (src, dst) in entries {
            let _ = table.insert(*src, *dst);
        }
    }

    fn table_mut(&mut self, cmap: IndirectRef) -> &mut CMapTable {
        self.tables.entry(cmap).or_default()
    }

    fn register(&mut self, cmap: IndirectRef, src: u16, dst: u16, diag: &mut Diagnostics<'_>) {
        if let Err(kept) = self.table_mut(cmap).insert(src, dst) {
            diag.debug(format_args!(
                "Conflict : {:04X} : {:04X} vs {:04X}",
                src, kept, dst
            ));
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Idle,
    InBfChar,
    InBfRange,
}

const BEGIN_BFCHAR: &str = "beginbfchar";
const END_BFCHAR: &str = "endbfchar";
const BEGIN_BFRANGE: &str = "beginbfrange";
const END_BFRANGE: &str = "endbfrange";

fn cmap_token_regex() -> &'static Regex {
    static RE_CMAP_TOKEN: OnceLock<Regex> = OnceLock::new();
    RE_CMAP_TOKEN.get_or_init(|| Regex::new(r"<([0-9a-fA-F]+)>").unwrap())
}

/// Convert one line's tokens to 16-bit codes.
///
/// Each token is padded to whole bytes. A one byte token is one code; longer
/// tokens give one big-endian code per byte pair and drop an unpaired last byte.
fn group_codes(group: &[Vec<u8>]) -> Vec<u16> {
    let mut codes = Vec::new();
    for token in group {
        if let [byte] = token.as_slice() {
            codes.push(u16::from(*byte));
        } else {
            codes.extend(
                token
                    .chunks_exact(2)
                    .map(|pair| u16::from_be_bytes([pair[0], pair[1]])),
            );
        }
    }
    codes
}

/// Line driven scanner for the bfchar/bfrange blocks of one decoded stream.
pub(crate) struct CMapBuilder<'t> {
    owner: IndirectRef,
    tables: &'t mut CMapTables,
    state: State,
    groups: Vec<Vec<Vec<u8>>>,
}

impl<'t> CMapBuilder<'t> {
    pub(crate) fn new(owner: IndirectRef, tables: &'t mut CMapTables) -> CMapBuilder<'t> {
        CMapBuilder {
            owner,
            tables,
            state: State::Idle,
            groups: Vec::new(),
        }
    }

    pub(crate) fn process_lines(&mut self, lines: &[String], diag: &mut Diagnostics<'_>) {
        for line in lines {
            self.process_line(line, diag);
        }
    }

    pub(crate) fn process_line(&mut self, line: &str, diag: &mut Diagnostics<'_>) {
        let mut rest = line;
        loop {
            match self.state {
                State::Idle => {
                    let begin = [
                        (BEGIN_BFCHAR, State::InBfChar),
                        (BEGIN_BFRANGE, State::InBfRange),
                    ]
                    .into_iter()
                    .filter_map(|(marker, state)| rest.find(marker).map(|at| (at, marker, state)))
                    .min_by_key(|(at, _, _)| *at);
                    let Some((at, marker, state)) = begin else {
                        return;
                    };
                    self.state = state;
                    self.groups.clear();
                    rest = &rest[at + marker.len()..];
                }
                State::InBfChar | State::InBfRange => {
                    let end = if self.state == State::InBfChar {
                        END_BFCHAR
                    } else {
                        END_BFRANGE
                    };
                    match rest.find(end) {
                        Some(at) => {
                            self.collect_group(&rest[..at]);
                            self.flush(diag);
                            self.state = State::Idle;
                            rest = &rest[at + end.len()..];
                        }
                        None => {
                            self.collect_group(rest);
                            return;
                        }
                    }
                }
            }
        }
    }

    fn collect_group(&mut self, text: &str) {
        let group: Vec<Vec<u8>> = cmap_token_regex()
            .captures_iter(text)
            .map(|caps| padded_hex_to_bytes(&caps[1]))
            .collect();
        if !group.is_empty() {
            self.groups.push(group);
        }
    }

    fn flush(&mut self, diag: &mut Diagnostics<'_>) {
        let groups = std::mem::take(&mut self.groups);
        match self.state {
            State::InBfChar => {
                for group in &groups {
                    let codes = group_codes(group);
                    match *codes.as_slice() {
                        [src, dst] => self.tables.register(self.owner, src, dst, diag),
                        _ => diag.trace(format_args!("Skipping bfchar group {:04X?}", codes)),
                    }
                }
            }
            State::InBfRange => {
                for group in &groups {
                    self.tables.table_mut(self.owner);
                    self.register_range(&group_codes(group), diag);
                }
            }
            State::Idle => {}
        }
    }

    fn register_range(&mut self, codes: &[u16], diag: &mut Diagnostics<'_>) {
        match *codes {
            [lo, hi, _, ..] if hi < lo => {
                diag.trace(format_args!("Empty bfrange {:04X}..{:04X}", lo, hi));
            }
            [lo, hi, dst] => {
                for offset in 0..=(hi - lo) {
                    self.tables
                        .register(self.owner, lo + offset, dst.wrapping_add(offset), diag);
                }
            }
            [lo, hi, ref dsts @ ..] if !dsts.is_empty() => {
                let span = usize::from(hi - lo);
                for (i, dst) in dsts.iter().enumerate().take(span + 1) {
                    self.tables.register(self.owner, lo + i as u16, *dst, diag);
                }
            }
            _ => diag.trace(format_args!("Skipping bfrange group {:04X?}", codes)),
        }
    }
}
