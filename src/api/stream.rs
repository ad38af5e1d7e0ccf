//! Bidirectional streams
//!
//! Streams use the older `bidirectional_stream_*` C API: plain functions
//! returning `int` net error codes (0 on success, see [`NetError`]) and a
//! `repr(C)` callback struct instead of `CreateWith` objects.

use std::ffi::c_char;

use super::callbacks::STREAMS;
use super::{Cronet, NetError};
use crate::ffi::marshal::{read_c_string, with_c_str, OwnedCString};
use crate::ffi::{
    BidirectionalStreamCallback, BidirectionalStreamHandle, BidirectionalStreamHeader,
    BidirectionalStreamHeaderArray, ClientContext, StreamEngineHandle,
};

/// Request headers marshaled into a `bidirectional_stream_header_array`.
///
/// Owns every key and value string; the array returned by
/// [`StreamHeaders::as_array`] stays valid while this value is alive.
pub struct StreamHeaders {
    _strings: Vec<OwnedCString>,
    entries: Vec<BidirectionalStreamHeader>,
}

impl StreamHeaders {
    /// Copy every key and value
    pub fn new<K: AsRef<str>, V: AsRef<str>>(headers: &[(K, V)]) -> Self {
        let mut strings = Vec::with_capacity(headers.len() * 2);
        let mut entries = Vec::with_capacity(headers.len());

        for (key, value) in headers {
            let key = OwnedCString::new(key.as_ref());
            let value = OwnedCString::new(value.as_ref());
            // The heap buffers do not move when the owners move into `strings`.
            entries.push(BidirectionalStreamHeader {
                key: key.as_ptr(),
                value: value.as_ptr(),
            });
            strings.push(key);
            strings.push(value);
        }

        Self {
            _strings: strings,
            entries,
        }
    }

    /// Number of headers
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether there are no headers
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// C view of the headers; read-only on the native side
    pub fn as_array(&self) -> BidirectionalStreamHeaderArray {
        BidirectionalStreamHeaderArray {
            count: self.entries.len(),
            capacity: self.entries.len(),
            headers: self.entries.as_ptr() as *mut BidirectionalStreamHeader,
        }
    }
}

/// Copy a native header array (e.g. from `on_response_headers_received`).
///
/// Null yields an empty list.
///
/// # Safety
///
/// `array` must be null or point to a valid header array whose `headers`
/// hold `count` entries with valid (or null) strings.
pub unsafe fn read_header_array(
    array: *const BidirectionalStreamHeaderArray,
) -> Vec<(String, String)> {
    let Some(array) = array.as_ref() else {
        return Vec::new();
    };
    if array.headers.is_null() || array.count == 0 {
        return Vec::new();
    }
    std::slice::from_raw_parts(array.headers, array.count)
        .iter()
        .map(|header| (read_c_string(header.key), read_c_string(header.value)))
        .collect()
}

impl Cronet {
    /// Create a stream on `engine`.
    ///
    /// `callback` is static because the library may call through it until
    /// the stream is destroyed.
    pub fn bidirectional_stream_create(
        &self,
        engine: StreamEngineHandle,
        annotation: ClientContext,
        callback: &'static BidirectionalStreamCallback,
    ) -> BidirectionalStreamHandle {
        let callback: *const BidirectionalStreamCallback = callback;
        unsafe { (self.sym().bidirectional_stream_create)(engine, annotation, callback) }
    }

    /// Destroy the stream; no callbacks follow once this returns
    pub fn bidirectional_stream_destroy(&self, stream: BidirectionalStreamHandle) -> NetError {
        let slot = self.sym().bidirectional_stream_destroy;
        let mut code = 0;
        STREAMS.destroy(stream.addr(), || code = unsafe { slot(stream) });
        NetError::from_raw(code)
    }

    /// Buffer writes until `bidirectional_stream_flush`
    pub fn bidirectional_stream_disable_auto_flush(
        &self,
        stream: BidirectionalStreamHandle,
        disable: bool,
    ) {
        unsafe { (self.sym().bidirectional_stream_disable_auto_flush)(stream, disable) }
    }

    /// Hold the request headers back until the first flush
    pub fn bidirectional_stream_delay_request_headers_until_flush(
        &self,
        stream: BidirectionalStreamHandle,
        delay: bool,
    ) {
        unsafe { (self.sym().bidirectional_stream_delay_request_headers_until_flush)(stream, delay) }
    }

    /// Start the stream with `method` on `url`. Headers are copied by the
    /// library before this returns.
    pub fn bidirectional_stream_start<K: AsRef<str>, V: AsRef<str>>(
        &self,
        stream: BidirectionalStreamHandle,
        url: &str,
        priority: i32,
        method: &str,
        headers: &[(K, V)],
        end_of_stream: bool,
    ) -> NetError {
        let slot = self.sym().bidirectional_stream_start;
        let headers = StreamHeaders::new(headers);
        let array = headers.as_array();
        let code = with_c_str(url, |url| {
            with_c_str(method, |method| unsafe {
                slot(stream, url, priority, method, &array, end_of_stream)
            })
        });
        NetError::from_raw(code)
    }

    /// Read up to `capacity` bytes into `buffer`; completion is reported
    /// through `on_read_completed`.
    ///
    /// # Safety
    ///
    /// `buffer` must be valid for writes of `capacity` bytes until the read
    /// completes or the stream is canceled or destroyed.
    pub unsafe fn bidirectional_stream_read(
        &self,
        stream: BidirectionalStreamHandle,
        buffer: *mut c_char,
        capacity: i32,
    ) -> NetError {
        NetError::from_raw((self.sym().bidirectional_stream_read)(stream, buffer, capacity))
    }

    /// Queue `count` bytes at `data` for sending.
    ///
    /// # Safety
    ///
    /// `data` must be valid for reads of `count` bytes until
    /// `on_write_completed` reports it, or the stream is canceled or
    /// destroyed.
    pub unsafe fn bidirectional_stream_write(
        &self,
        stream: BidirectionalStreamHandle,
        data: *const c_char,
        count: i32,
        end_of_stream: bool,
    ) -> NetError {
        NetError::from_raw((self.sym().bidirectional_stream_write)(
            stream,
            data,
            count,
            end_of_stream,
        ))
    }

    /// Send all buffered writes
    pub fn bidirectional_stream_flush(&self, stream: BidirectionalStreamHandle) {
        unsafe { (self.sym().bidirectional_stream_flush)(stream) }
    }

    /// Cancel the stream; `on_canceled` follows
    pub fn bidirectional_stream_cancel(&self, stream: BidirectionalStreamHandle) {
        unsafe { (self.sym().bidirectional_stream_cancel)(stream) }
    }

    /// Pick which of the engine's network threads serves the stream
    pub fn bidirectional_stream_set_concurrency_index(
        &self,
        stream: BidirectionalStreamHandle,
        index: i32,
    ) {
        unsafe { (self.sym().bidirectional_stream_set_concurrency_index)(stream, index) }
    }
}
