/// Read the full text of an FLTK TextBuffer without leaking the C-allocated
/// copy.
///
/// fltk-rs's `TextBuffer::text()` copies the `malloc()`'d C string returned
/// by `Fl_Text_Buffer_text()` into a Rust String but never frees the
/// original pointer, leaking the whole buffer on every call. Since the
/// highlighting pipeline re-reads the document on every change event, that
/// leak would grow with every keystroke. This helper calls the C API
/// directly and frees the allocation itself.
pub fn document_text(buf: &fltk::text::TextBuffer) -> String {
    unsafe extern "C" {
        fn Fl_Text_Buffer_text(buf: *mut std::ffi::c_void) -> *mut std::ffi::c_char;
        fn free(ptr: *mut std::ffi::c_void);
    }

    // SAFETY: `buf.as_ptr()` is valid while `buf` lives, and
    // `Fl_Text_Buffer_text` returns either null (empty buffer) or a
    // malloc'd, null-terminated C string that we own and must free. The
    // bytes are copied out before `free`, and `to_string_lossy` absorbs any
    // invalid UTF-8.
    unsafe {
        let inner = buf.as_ptr() as *mut std::ffi::c_void;
        let ptr = Fl_Text_Buffer_text(inner);
        if ptr.is_null() {
            return String::new();
        }
        let cstr = std::ffi::CStr::from_ptr(ptr);
        let result = cstr.to_string_lossy().into_owned();
        free(ptr as *mut std::ffi::c_void);
        result
    }
}
