//! Common FFI utilities for the edgeview C-compatible interface.
//!
//! Frames cross the boundary as `(pointer, length)` pairs and edge maps come
//! back as owned byte arrays. This crate holds the pieces that make that safe
//! to write: turning raw input into checked slices, handing owned buffers and
//! error strings to the caller, and freeing them again.
//!
//! # Memory Ownership
//!
//! - Pointers returned by `vec_into_raw` or `cstring_new_or_fallback` belong
//!   to the caller until passed back to the matching `free_*` function
//! - NULL pointers are handled safely (no-op for free functions)
//! - Borrowed input slices never outlive the FFI call that created them

use std::ffi::CString;
use std::os::raw::c_char;
use std::ptr;
use std::slice;

/// Convert a Rust string to a C string pointer, with a fallback on failure.
///
/// If the input contains null bytes, returns the fallback string instead.
/// The returned pointer is owned by the caller and must be freed.
///
/// # Example
/// ```
/// use edgeview_ffi_common::{cstring_new_or_fallback, free_cstring};
///
/// let ptr = cstring_new_or_fallback("frame buffer too small", "error");
/// unsafe { free_cstring(ptr) };
/// ```
#[inline]
pub fn cstring_new_or_fallback(s: &str, fallback: &'static str) -> *mut c_char {
    CString::new(s)
        .or_else(|_| CString::new(fallback))
        .unwrap_or_default()
        .into_raw()
}

/// Safely free a C string pointer.
///
/// Does nothing if the pointer is null.
///
/// # Safety
/// The pointer must have been allocated by `CString::into_raw()` or be null.
#[inline]
pub unsafe fn free_cstring(ptr: *mut c_char) {
    if !ptr.is_null() {
        unsafe {
            let _ = CString::from_raw(ptr);
        }
    }
}

/// Safely free a boxed value.
///
/// Does nothing if the pointer is null.
///
/// # Safety
/// The pointer must have been allocated by `Box::into_raw()` or be null.
#[inline]
pub unsafe fn free_boxed<T>(ptr: *mut T) {
    if !ptr.is_null() {
        unsafe {
            let _ = Box::from_raw(ptr);
        }
    }
}

/// Free a boxed slice and its contents.
///
/// Does nothing if the pointer is null or length is zero.
///
/// # Safety
/// The pointer must have been allocated by `vec_into_raw` with the same `len`.
#[inline]
pub unsafe fn free_boxed_slice<T>(ptr: *mut T, len: usize) {
    if !ptr.is_null() && len > 0 {
        unsafe {
            let _ = Box::from_raw(ptr::slice_from_raw_parts_mut(ptr, len));
        }
    }
}

/// Convert a vector to a raw pointer and length owned by the caller.
///
/// Returns null pointer and 0 length for empty vectors.
#[inline]
pub fn vec_into_raw<T>(vec: Vec<T>) -> (*mut T, usize) {
    let len = vec.len();
    if len == 0 {
        (ptr::null_mut(), 0)
    } else {
        (Box::into_raw(vec.into_boxed_slice()) as *mut T, len)
    }
}

/// Borrow caller memory as a slice.
///
/// Returns `None` for a null pointer. A zero length yields an empty slice
/// without dereferencing `ptr`.
///
/// # Safety
/// If non-null, `ptr` must point to `len` initialized elements that stay
/// valid and unmodified for `'a`.
#[inline]
pub unsafe fn borrow_slice<'a, T>(ptr: *const T, len: usize) -> Option<&'a [T]> {
    if ptr.is_null() {
        None
    } else if len == 0 {
        Some(&[])
    } else {
        Some(unsafe { slice::from_raw_parts(ptr, len) })
    }
}

/// Trait for FFI result types with standardized error handling.
///
/// Result structs carry a numeric code alongside the message so callers can
/// branch without parsing strings.
///
/// # Example
/// ```ignore
/// #[repr(C)]
/// pub struct MyResultC {
///     pub success: bool,
///     pub error_code: i32,
///     pub error_msg: *mut c_char,
///     pub data: *mut u8,
///     pub data_len: usize,
/// }
///
/// impl FfiResult for MyResultC {
///     const ERROR_FALLBACK: &'static str = "unknown error";
///
///     fn error_fields(error_code: i32, error_msg: *mut c_char) -> Self {
///         Self {
///             success: false,
///             error_code,
///             error_msg,
///             data: ptr::null_mut(),
///             data_len: 0,
///         }
///     }
/// }
///
/// let result = MyResultC::error(2, "frame buffer too small");
/// ```
pub trait FfiResult: Sized {
    /// Fallback message used when the error message contains null bytes.
    const ERROR_FALLBACK: &'static str;

    /// Construct the result struct in its failed state.
    ///
    /// Receives an already-allocated `error_msg` pointer.
    fn error_fields(error_code: i32, error_msg: *mut c_char) -> Self;

    /// Create an error result with the given code and message.
    #[inline]
    fn error(error_code: i32, msg: &str) -> Self {
        let error_msg = cstring_new_or_fallback(msg, Self::ERROR_FALLBACK);
        Self::error_fields(error_code, error_msg)
    }
}

/// Generate a version function that returns a static C string.
///
/// # Example
/// ```ignore
/// edgeview_ffi_common::define_version_fn!(my_lib_version);
/// // Expands to:
/// // #[no_mangle]
/// // pub extern "C" fn my_lib_version() -> *const c_char {
/// //     concat!(env!("CARGO_PKG_VERSION"), "\0").as_ptr() as *const c_char
/// // }
/// ```
#[macro_export]
macro_rules! define_version_fn {
    ($fn_name:ident) => {
        #[no_mangle]
        pub extern "C" fn $fn_name() -> *const std::os::raw::c_char {
            concat!(env!("CARGO_PKG_VERSION"), "\0").as_ptr() as *const std::os::raw::c_char
        }
    };
}

/// Generate a free function for a boxed engine type.
///
/// # Example
/// ```ignore
/// edgeview_ffi_common::define_engine_free!(my_engine_free, MyEngine);
/// // Expands to:
/// // #[no_mangle]
/// // #[allow(clippy::not_unsafe_ptr_arg_deref)]
/// // pub extern "C" fn my_engine_free(ptr: *mut MyEngine) {
/// //     edgeview_ffi_common::free_boxed(ptr);
/// // }
/// ```
#[macro_export]
macro_rules! define_engine_free {
    ($fn_name:ident, $engine_type:ty) => {
        #[no_mangle]
        #[allow(clippy::not_unsafe_ptr_arg_deref)]
        pub extern "C" fn $fn_name(ptr: *mut $engine_type) {
            unsafe { $crate::free_boxed(ptr) };
        }
    };
}
