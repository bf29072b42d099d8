use std::collections::{HashMap, HashSet, hash_map::Entry};
use std::sync::OnceLock;

use regex::Regex;

use crate::error::ObjectError;
use crate::sink::Diagnostics;
use crate::types::IndirectRef;
use crate::utils::parse_u32;

/// Font metadata gathered from every Font dictionary in the document.
#[derive(Debug, Clone, Default)]
pub struct FontCatalog {
    resources: HashMap<String, IndirectRef>,
    to_unicode: HashMap<IndirectRef, IndirectRef>,
    shift_jis: HashSet<IndirectRef>,
}

impl FontCatalog {
    pub fn new() -> FontCatalog {
        FontCatalog::default()
    }

    /// Font object registered for a resource name such as `F1`.
    pub fn resource(&self, name: &str) -> Option<IndirectRef> {
        self.resources.get(name).copied()
    }

    /// CMap stream object a font points at through `/ToUnicode`.
    pub fn to_unicode(&self, font: IndirectRef) -> Option<IndirectRef> {
        self.to_unicode.get(&font).copied()
    }

    pub fn is_shift_jis(&self, font: IndirectRef) -> bool {
        self.shift_jis.contains(&font)
    }

    pub fn resources(&self) -> impl Iterator<Item = (&str, IndirectRef)> {
        self.resources.iter().map(|(name, r)| (name.as_str(), *r))
    }

    pub fn to_unicode_refs(&self) -> impl Iterator<Item = (IndirectRef, IndirectRef)> + '_ {
        self.to_unicode.iter().map(|(font, cmap)| (*font, *cmap))
    }

    pub fn shift_jis_fonts(&self) -> impl Iterator<Item = IndirectRef> + '_ {
        self.shift_jis.iter().copied()
    }

    /// Returns `false` when the name was already taken; the first registration stays.
    pub(crate) fn register_resource(&mut self, name: &str, font: IndirectRef) -> bool {
        match self.resources.entry(name.to_string()) {
            Entry::Occupied(_) => false,
            Entry::Vacant(e) => {
                e.insert(font);
                true
            }
        }
    }

    pub(crate) fn register_to_unicode(&mut self, font: IndirectRef, cmap: IndirectRef) -> bool {
        match self.to_unicode.entry(font) {
            Entry::Occupied(_) => false,
            Entry::Vacant(e) => {
                e.insert(cmap);
                true
            }
        }
    }

    pub(crate) fn mark_shift_jis(&mut self, font: IndirectRef) {
        self.shift_jis.insert(font);
    }
}

fn font_resource_regex() -> &'static Regex {
    static RE_FONT_RESOURCE: OnceLock<Regex> = OnceLock::new();
    RE_FONT_RESOURCE.get_or_init(|| Regex::new(r"/(F[0-9]+) +([0-9]+) +([0-9]+)").unwrap())
}

fn to_unicode_regex() -> &'static Regex {
    static RE_TO_UNICODE: OnceLock<Regex> = OnceLock::new();
    RE_TO_UNICODE.get_or_init(|| Regex::new(r"/ToUnicode +([0-9]+) +([0-9]+)").unwrap())
}

/// Whether a dictionary line should go through [`extract_font_metadata`].
pub(crate) fn is_font_dictionary(dict: &str) -> bool {
    dict.contains("/Font")
}

/// Record what a Font dictionary says about resource names, ToUnicode CMaps
/// and Shift-JIS encodings. `owner` is the object the dictionary belongs to.
pub(crate) fn extract_font_metadata(
    dict: &str,
    owner: IndirectRef,
    catalog: &mut FontCatalog,
    diag: &mut Diagnostics<'_>,
) -> Result<(), ObjectError> {
    for caps in font_resource_regex().captures_iter(dict) {
        let name = &caps[1];
        let font = IndirectRef::new(parse_u32(&caps[2])?, parse_u32(&caps[3])?);
        if catalog.register_resource(name, font) {
            diag.debug(format_args!("Font resource {} -> {}", name, font));
        } else {
            diag.debug(format_args!(
                "Font resource {} already registered, ignoring {}",
                name, font
            ));
        }
    }

    if let Some(caps) = to_unicode_regex().captures(dict) {
        let cmap = IndirectRef::new(parse_u32(&caps[1])?, parse_u32(&caps[2])?);
        if catalog.register_to_unicode(owner, cmap) {
            diag.debug(format_args!("ToUnicode {} -> {}", owner, cmap));
        }
    }

    if dict.contains("RKSJ") {
        diag.debug(format_args!("Shift-JIS font {}", owner));
        catalog.mark_shift_jis(owner);
    }

    Ok(())
}
