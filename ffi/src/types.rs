use std::ffi::CString;
use std::os::raw::c_char;

/// One resolved fragment. `text` is owned by the caller and released with
/// `pdf_fragment_text_free`.
#[repr(C)]
pub struct FfiFragment {
    pub text: *mut c_char,
    pub sequence: u64,
}

impl FfiFragment {
    pub fn from_fragment(fragment: &pdf_cmap_strings::TextFragment) -> Self {
        // Interior NULs cannot cross the C boundary; cut the text there.
        let text = fragment.text.split('\0').next().unwrap_or_default();
        let text = CString::new(text).unwrap_or_default();

        FfiFragment {
            text: text.into_raw(),
            sequence: fragment.sequence,
        }
    }
}
