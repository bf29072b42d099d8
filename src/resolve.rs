use crate::cmap::CMapTable;
use crate::processor::ScanReport;
use crate::sink::Diagnostics;
use crate::types::{Fragment, IndirectRef, Payload, TextFragment, TextOutput};
use crate::utils::{be_units, utf16be_to_string};

/// Second pass: turn every buffered fragment into text using the metadata
/// of the whole document.
pub(crate) fn resolve(report: &ScanReport, diag: &mut Diagnostics<'_>) -> TextOutput {
    let mut resolved = Vec::new();
    for fragment in report.fragments() {
        let Some(name) = fragment.font.as_deref() else {
            diag.debug(format_args!("Fragment {} has no font, dropped", fragment.sequence));
            continue;
        };
        let Some(font) = report.fonts().resource(name) else {
            diag.debug(format_args!(
                "Fragment {} uses unknown font {}, dropped",
                fragment.sequence, name
            ));
            continue;
        };

        let text = resolve_fragment(report, fragment, font, diag);
        if !text.is_empty() {
            resolved.push(TextFragment {
                text,
                sequence: fragment.sequence,
                font: name.to_string(),
            });
        }
    }
    TextOutput::from(resolved)
}

fn resolve_fragment(
    report: &ScanReport,
    fragment: &Fragment,
    font: IndirectRef,
    diag: &mut Diagnostics<'_>,
) -> String {
    let table = report
        .fonts()
        .to_unicode(font)
        .and_then(|cmap| report.cmaps().get(cmap));

    match &fragment.payload {
        Payload::Bytes(bytes) => match table {
            Some(table) => {
                diag.debug(format_args!("Decode with CMap : {}", font));
                let mut out = Vec::with_capacity(bytes.len());
                for unit in map_units(be_units(bytes), table, diag) {
                    out.extend_from_slice(&unit.to_be_bytes());
                }
                utf16be_to_string(&out)
            }
            None => {
                diag.debug(format_args!("Decode as UTF-16BE : {}", font));
                utf16be_to_string(bytes)
            }
        },
        Payload::Text(text) => {
            if report.fonts().is_shift_jis(font) {
                diag.debug(format_args!("Decode as String! : {}", font));
                return text.clone();
            }
            match table {
                Some(table) => {
                    let units = map_units(text.encode_utf16(), table, diag);
                    String::from_utf16_lossy(&units)
                }
                None => text.clone(),
            }
        }
    }
}

/// Look every unit up in `table`; misses are reported and left out.
fn map_units(
    units: impl IntoIterator<Item = u16>,
    table: &CMapTable,
    diag: &mut Diagnostics<'_>,
) -> Vec<u16> {
    units
        .into_iter()
        .filter_map(|unit| {
            let mapped = table.get(unit);
            if mapped.is_none() {
                diag.warn(format_args!("Unmapped code {:04X}", unit));
            }
            mapped
        })
        .collect()
}
