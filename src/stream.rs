use std::io::Read;
use std::sync::OnceLock;

use encoding_rs::SHIFT_JIS;
use flate2::read::DeflateDecoder;
use regex::Regex;

use crate::error::ObjectError;
use crate::utils::{parse_usize, split_decoded_lines};

/// Dictionary markers of streams that never hold text or CMaps.
const EXCLUDED_MARKERS: &[&str] = &[
    "/XRef",
    "/ObjStm",
    "/Length1",
    "/XObject",
    "/DeviceRGB",
    "/DeviceGray",
    "/DeviceCMYK",
    "/CalGray",
    "/CalRGB",
    "/Lab",
    "/ICCCBased",
    "/Separation",
    "/Device",
    "/Indexed",
    "/Pattern",
];

/// The only keys a decodable stream dictionary may carry.
const ALLOWED_KEYS: &[&str] = &["filter", "flatedecode", "length"];

/// Why a stream's bytes were consumed without being decoded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum SkipReason {
    /// The dictionary carried one of the excluded markers.
    Excluded(&'static str),
    /// The dictionary had a key other than `Filter`, `FlateDecode`, `Length`.
    UnexpectedKey(String),
}

impl std::fmt::Display for SkipReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SkipReason::Excluded(marker) => write!(f, "excluded by {}", marker),
            SkipReason::UnexpectedKey(key) => write!(f, "unexpected key /{}", key),
        }
    }
}

fn length_regex() -> &'static Regex {
    static RE_LENGTH: OnceLock<Regex> = OnceLock::new();
    RE_LENGTH.get_or_init(|| Regex::new(r"Length +([0-9]+)").unwrap())
}

/// The `Length <int>` value of a stream dictionary, if it has one.
pub(crate) fn stream_length(dict: &str) -> Result<Option<usize>, ObjectError> {
    length_regex()
        .captures(dict)
        .map(|caps| parse_usize(&caps[1]))
        .transpose()
}

pub(crate) fn is_flate_encoded(dict: &str) -> bool {
    dict.contains("FlateDecode")
}

/// Decide whether a FlateDecode stream with this dictionary is worth decoding.
pub(crate) fn check_decodable(dict: &str) -> Result<(), SkipReason> {
    if let Some(marker) = EXCLUDED_MARKERS.iter().find(|m| dict.contains(**m)) {
        return Err(SkipReason::Excluded(*marker));
    }

    let stripped = dict.replace("<<", "").replace(">>", "");
    for piece in stripped.split('/') {
        let Some(key) = piece.split(' ').next().filter(|k| !k.is_empty()) else {
            continue;
        };
        if !ALLOWED_KEYS.contains(&key.to_lowercase().as_str()) {
            return Err(SkipReason::UnexpectedKey(key.to_string()));
        }
    }
    Ok(())
}

/// Inflate a raw DEFLATE payload and split the Shift-JIS text into lines.
pub(crate) fn decode_stream(payload: &[u8]) -> Result<Vec<String>, ObjectError> {
    let mut inflated = Vec::new();
    DeflateDecoder::new(payload)
        .read_to_end(&mut inflated)
        .map_err(ObjectError::Inflate)?;
    let (text, _) = SHIFT_JIS.decode_without_bom_handling(&inflated);
    Ok(split_decoded_lines(&text))
}
