//! Helpers for rendering host-supplied C strings in diagnostics.

use std::borrow::Cow;
use std::ffi::CStr;
use std::os::raw::c_char;

/// Lossy view of a possibly-null C string, for logging only.
///
/// # Safety
/// `ptr` must be null or point to a NUL-terminated string that outlives the
/// returned value.
pub unsafe fn display<'a>(ptr: *const c_char) -> Cow<'a, str> {
    if ptr.is_null() {
        Cow::Borrowed("(null)")
    } else {
        CStr::from_ptr(ptr).to_string_lossy()
    }
}
