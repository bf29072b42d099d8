mod types;

use std::cell::RefCell;
use std::ffi::{CStr, CString};
use std::os::raw::c_char;
use std::ptr;

pub use types::FfiFragment;

thread_local! {
    static LAST_ERROR: RefCell<Option<CString>> = RefCell::new(None);
}

fn set_last_error(err: String) {
    LAST_ERROR.with(|e| {
        *e.borrow_mut() = CString::new(err).ok();
    });
}

fn into_c_string(text: String) -> *mut c_char {
    match CString::new(text) {
        Ok(c_str) => c_str.into_raw(),
        Err(e) => {
            set_last_error(format!("Failed to convert text to C string: {}", e));
            ptr::null_mut()
        }
    }
}

pub struct PdfOutputHandle {
    output: pdf_cmap_strings::TextOutput,
}

fn into_handle(output: pdf_cmap_strings::TextOutput) -> *mut PdfOutputHandle {
    Box::into_raw(Box::new(PdfOutputHandle { output }))
}

#[no_mangle]
pub extern "C" fn pdf_extract_from_path(path: *const c_char) -> *mut PdfOutputHandle {
    if path.is_null() {
        set_last_error("Path pointer is null".to_string());
        return ptr::null_mut();
    }

    let path_str = unsafe {
        match CStr::from_ptr(path).to_str() {
            Ok(s) => s,
            Err(e) => {
                set_last_error(format!("Invalid UTF-8 in path: {}", e));
                return ptr::null_mut();
            }
        }
    };

    match pdf_cmap_strings::from_path(path_str) {
        Ok(output) => into_handle(output),
        Err(e) => {
            set_last_error(format!("Failed to extract PDF: {}", e));
            ptr::null_mut()
        }
    }
}

#[no_mangle]
pub extern "C" fn pdf_extract_from_bytes(data: *const u8, len: usize) -> *mut PdfOutputHandle {
    if data.is_null() {
        set_last_error("Data pointer is null".to_string());
        return ptr::null_mut();
    }

    let bytes = unsafe { std::slice::from_raw_parts(data, len) };
    into_handle(pdf_cmap_strings::from_bytes(bytes))
}

#[no_mangle]
pub extern "C" fn pdf_fragment_count(handle: *const PdfOutputHandle) -> usize {
    if handle.is_null() {
        set_last_error("Handle is null".to_string());
        return 0;
    }

    let handle = unsafe { &*handle };
    handle.output.len()
}

#[no_mangle]
pub extern "C" fn pdf_get_fragment(
    handle: *const PdfOutputHandle,
    index: usize,
    out: *mut FfiFragment,
) -> i32 {
    if handle.is_null() {
        set_last_error("Handle is null".to_string());
        return -1;
    }

    if out.is_null() {
        set_last_error("Output pointer is null".to_string());
        return -1;
    }

    let handle = unsafe { &*handle };

    let fragment = match handle.output.fragments().get(index) {
        Some(fragment) => fragment,
        None => {
            set_last_error(format!("Fragment index {} out of bounds", index));
            return -1;
        }
    };

    unsafe {
        *out = FfiFragment::from_fragment(fragment);
    }

    0
}

/// Every fragment followed by a newline.
#[no_mangle]
pub extern "C" fn pdf_output_to_string(handle: *const PdfOutputHandle) -> *mut c_char {
    if handle.is_null() {
        set_last_error("Handle is null".to_string());
        return ptr::null_mut();
    }

    let handle = unsafe { &*handle };
    into_c_string(handle.output.to_string())
}

#[no_mangle]
pub extern "C" fn pdf_output_joined(handle: *const PdfOutputHandle) -> *mut c_char {
    if handle.is_null() {
        set_last_error("Handle is null".to_string());
        return ptr::null_mut();
    }

    let handle = unsafe { &*handle };
    into_c_string(handle.output.joined())
}

#[no_mangle]
pub extern "C" fn pdf_string_free(s: *mut c_char) {
    if !s.is_null() {
        unsafe {
            drop(CString::from_raw(s));
        }
    }
}

#[no_mangle]
pub extern "C" fn pdf_fragment_text_free(text: *mut c_char) {
    if !text.is_null() {
        unsafe {
            drop(CString::from_raw(text));
        }
    }
}

#[no_mangle]
pub extern "C" fn pdf_output_free(handle: *mut PdfOutputHandle) {
    if !handle.is_null() {
        unsafe {
            drop(Box::from_raw(handle));
        }
    }
}

#[no_mangle]
pub extern "C" fn pdf_last_error() -> *const c_char {
    LAST_ERROR.with(|e| match e.borrow().as_ref() {
        Some(err) => err.as_ptr(),
        None => ptr::null(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn non_pdf_bytes_give_an_empty_handle() {
        let data = b"not a pdf";
        let handle = pdf_extract_from_bytes(data.as_ptr(), data.len());
        assert!(!handle.is_null());
        assert_eq!(pdf_fragment_count(handle), 0);

        let mut fragment = FfiFragment {
            text: ptr::null_mut(),
            sequence: 0,
        };
        assert_eq!(pdf_get_fragment(handle, 0, &mut fragment), -1);
        let err = unsafe { CStr::from_ptr(pdf_last_error()) };
        assert_eq!(err.to_str().unwrap(), "Fragment index 0 out of bounds");

        let joined = pdf_output_joined(handle);
        assert_eq!(unsafe { CStr::from_ptr(joined) }.to_bytes(), b"");
        pdf_string_free(joined);
        pdf_output_free(handle);
    }

    #[test]
    fn null_path_sets_last_error() {
        assert!(pdf_extract_from_path(ptr::null()).is_null());
        let err = unsafe { CStr::from_ptr(pdf_last_error()) };
        assert_eq!(err.to_str().unwrap(), "Path pointer is null");
    }
}
