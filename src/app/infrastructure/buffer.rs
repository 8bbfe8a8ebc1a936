/// Copy the text out of an FLTK `TextBuffer` and free FLTK's allocation.
///
/// `TextBuffer::text()` copies the `malloc()`'d string returned by
/// `Fl_Text_Buffer_text()` but never frees it, which leaks one full copy of
/// the snippet on every keystroke. This goes through the C API directly.
pub fn buffer_text_no_leak(buf: &fltk::text::TextBuffer) -> String {
    unsafe extern "C" {
        fn Fl_Text_Buffer_text(buf: *mut std::ffi::c_void) -> *mut std::ffi::c_char;
        fn free(ptr: *mut std::ffi::c_void);
    }

    // SAFETY: `as_ptr` is the live FLTK buffer owned by `buf`. The returned
    // pointer is either null or a NUL-terminated malloc'd copy that we own
    // and release with `free` after copying it into a Rust String.
    unsafe {
        let ptr = Fl_Text_Buffer_text(buf.as_ptr() as *mut std::ffi::c_void);
        if ptr.is_null() {
            return String::new();
        }
        let text = std::ffi::CStr::from_ptr(ptr).to_string_lossy().into_owned();
        free(ptr as *mut std::ffi::c_void);
        text
    }
}
