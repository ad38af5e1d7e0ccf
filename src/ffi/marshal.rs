//! String and Pointer Marshaling
//!
//! Conversions between native null-terminated buffers and Rust text.
//!
//! Outbound strings are copied into an owned, zero-terminated byte buffer whose
//! address is handed to the native call. The buffer must outlive that call;
//! [`with_c_str`] makes this structural by scoping the call inside the borrow.
//!
//! Inbound strings are read by scanning for the terminator, bounded by
//! [`MAX_C_STRING_LEN`] so a corrupted or unterminated native buffer can never
//! cause an unbounded read.

use std::ffi::{c_char, c_void};
use std::marker::PhantomData;
use std::path::Path;

/// Hard cap on bytes scanned when reading a native string (64 KiB)
pub const MAX_C_STRING_LEN: usize = 65_536;

/// Owned, zero-terminated copy of a Rust string for passing to native code.
///
/// Interior NUL bytes are copied verbatim; the native side then sees only the
/// prefix before the first one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OwnedCString {
    bytes: Vec<u8>,
}

impl OwnedCString {
    /// Allocate `text.len() + 1` bytes, copy `text`, append the terminator
    pub fn new(text: &str) -> Self {
        Self::from_bytes(text.as_bytes())
    }

    /// Same as [`OwnedCString::new`] for bytes that need not be UTF-8
    pub fn from_bytes(raw: &[u8]) -> Self {
        let mut bytes = Vec::with_capacity(raw.len() + 1);
        bytes.extend_from_slice(raw);
        bytes.push(0);
        Self { bytes }
    }

    /// Zero-terminated copy of a filesystem path.
    ///
    /// On Unix the path's bytes are passed through unchanged. Elsewhere the
    /// native side expects UTF-8, so unpaired surrogates in a Windows path are
    /// replaced lossily.
    pub fn from_path(path: &Path) -> Self {
        #[cfg(unix)]
        {
            use std::os::unix::ffi::OsStrExt;
            Self::from_bytes(path.as_os_str().as_bytes())
        }
        #[cfg(not(unix))]
        {
            Self::new(&path.to_string_lossy())
        }
    }

    /// Address of the first byte. Valid while `self` is alive and unmodified.
    pub fn as_ptr(&self) -> *const c_char {
        self.bytes.as_ptr() as *const c_char
    }

    /// Bytes including the trailing terminator
    pub fn as_bytes_with_nul(&self) -> &[u8] {
        &self.bytes
    }

    /// Length without the terminator
    pub fn len(&self) -> usize {
        self.bytes.len() - 1
    }

    /// Whether the string (without terminator) is empty
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Marshal `text` for a native call, returning the address and its backing buffer.
///
/// The returned buffer must be kept alive until the native call that received
/// the address has returned.
pub fn c_string(text: &str) -> (*const c_char, OwnedCString) {
    let owned = OwnedCString::new(text);
    (owned.as_ptr(), owned)
}

/// Run `f` with the address of a zero-terminated copy of `text`.
///
/// The copy lives until `f` returns.
pub fn with_c_str<R>(text: &str, f: impl FnOnce(*const c_char) -> R) -> R {
    let owned = OwnedCString::new(text);
    f(owned.as_ptr())
}

/// Run `f` with the address of a zero-terminated copy of `path`.
///
/// See [`OwnedCString::from_path`] for how the path is encoded.
pub fn with_c_path<R>(path: &Path, f: impl FnOnce(*const c_char) -> R) -> R {
    let owned = OwnedCString::from_path(path);
    f(owned.as_ptr())
}

/// Read a native zero-terminated string into an owned `String`.
///
/// Null yields `""`. At most [`MAX_C_STRING_LEN`] bytes are read; an
/// unterminated buffer is truncated at that cap. Invalid UTF-8 is replaced.
///
/// # Safety
///
/// `ptr` must be null or point to memory readable up to its terminator or
/// [`MAX_C_STRING_LEN`] bytes, whichever comes first.
pub unsafe fn read_c_string(ptr: *const c_char) -> String {
    if ptr.is_null() {
        return String::new();
    }

    let base = ptr as *const u8;
    let mut length = 0usize;
    while length < MAX_C_STRING_LEN {
        if *base.add(length) == 0 {
            break;
        }
        length += 1;
    }

    if length == 0 {
        return String::new();
    }

    let bytes = std::slice::from_raw_parts(base, length);
    String::from_utf8_lossy(bytes).into_owned()
}

/// View native memory as a byte slice.
///
/// Null or zero size yields an empty slice.
///
/// # Safety
///
/// `data` must be valid for reads of `size` bytes for the lifetime `'a`, and
/// the memory must not be mutated during that lifetime.
pub unsafe fn native_bytes<'a>(data: *const c_void, size: usize) -> &'a [u8] {
    if data.is_null() || size == 0 {
        return &[];
    }
    std::slice::from_raw_parts(data as *const u8, size)
}

/// Contiguous array of element addresses borrowed from a list of byte sequences.
///
/// Used where the native ABI takes `const uint8_t** items, size_t count`. The
/// borrow keeps every element's backing memory alive while the array exists.
/// Empty elements are passed as null addresses.
pub struct PointerArray<'a> {
    addresses: Vec<*const u8>,
    _items: PhantomData<&'a [u8]>,
}

impl<'a> PointerArray<'a> {
    /// Collect the address of each element
    pub fn new<T: AsRef<[u8]>>(items: &'a [T]) -> Self {
        let addresses = items
            .iter()
            .map(|item| {
                let bytes = item.as_ref();
                if bytes.is_empty() {
                    std::ptr::null()
                } else {
                    bytes.as_ptr()
                }
            })
            .collect();
        Self {
            addresses,
            _items: PhantomData,
        }
    }

    /// Address of the first slot, or null when there are no elements
    pub fn as_ptr(&self) -> *const *const u8 {
        if self.addresses.is_empty() {
            std::ptr::null()
        } else {
            self.addresses.as_ptr()
        }
    }

    pub fn len(&self) -> usize {
        self.addresses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.addresses.is_empty()
    }
}
