//! Response info, errors and HTTP headers
//!
//! Response info and error objects normally come from the library inside
//! callbacks and are only valid for that callback. The setters exist so the
//! objects can also be built locally, e.g. for tests.

use super::{Cronet, ErrorCode};
use crate::ffi::marshal::{read_c_string, with_c_str};
use crate::ffi::{ErrorHandle, HttpHeaderHandle, UrlResponseInfoHandle};

impl Cronet {
    /// Create a response info
    pub fn url_response_info_create(&self) -> UrlResponseInfoHandle {
        unsafe { (self.sym().url_response_info_create)() }
    }

    /// Destroy the response info
    pub fn url_response_info_destroy(&self, info: UrlResponseInfoHandle) {
        unsafe { (self.sym().url_response_info_destroy)(info) }
    }

    /// Set the URL
    pub fn url_response_info_url_set(&self, info: UrlResponseInfoHandle, url: &str) {
        let slot = self.sym().url_response_info_url_set;
        with_c_str(url, |text| unsafe { slot(info, text) })
    }

    /// Final URL after redirects
    pub fn url_response_info_url_get(&self, info: UrlResponseInfoHandle) -> String {
        unsafe { read_c_string((self.sym().url_response_info_url_get)(info)) }
    }

    /// Append `url` to the redirect chain
    pub fn url_response_info_url_chain_add(&self, info: UrlResponseInfoHandle, url: &str) {
        let slot = self.sym().url_response_info_url_chain_add;
        with_c_str(url, |text| unsafe { slot(info, text) })
    }

    /// Number of URLs in the redirect chain
    pub fn url_response_info_url_chain_size(&self, info: UrlResponseInfoHandle) -> u32 {
        unsafe { (self.sym().url_response_info_url_chain_size)(info) }
    }

    /// URL at `index` in the redirect chain
    pub fn url_response_info_url_chain_at(&self, info: UrlResponseInfoHandle, index: u32) -> String {
        unsafe { read_c_string((self.sym().url_response_info_url_chain_at)(info, index)) }
    }

    /// Remove every URL from the redirect chain
    pub fn url_response_info_url_chain_clear(&self, info: UrlResponseInfoHandle) {
        unsafe { (self.sym().url_response_info_url_chain_clear)(info) }
    }

    /// Set the HTTP status code
    pub fn url_response_info_http_status_code_set(&self, info: UrlResponseInfoHandle, code: i32) {
        unsafe { (self.sym().url_response_info_http_status_code_set)(info, code) }
    }

    /// Current HTTP status code
    pub fn url_response_info_http_status_code_get(&self, info: UrlResponseInfoHandle) -> i32 {
        unsafe { (self.sym().url_response_info_http_status_code_get)(info) }
    }

    /// Set the HTTP status text
    pub fn url_response_info_http_status_text_set(&self, info: UrlResponseInfoHandle, text: &str) {
        let slot = self.sym().url_response_info_http_status_text_set;
        with_c_str(text, |text| unsafe { slot(info, text) })
    }

    /// Current HTTP status text
    pub fn url_response_info_http_status_text_get(&self, info: UrlResponseInfoHandle) -> String {
        unsafe { read_c_string((self.sym().url_response_info_http_status_text_get)(info)) }
    }

    /// Append a copy of `header`
    pub fn url_response_info_all_headers_list_add(
        &self,
        info: UrlResponseInfoHandle,
        header: HttpHeaderHandle,
    ) {
        unsafe { (self.sym().url_response_info_all_headers_list_add)(info, header) }
    }

    /// Number of response headers
    pub fn url_response_info_all_headers_list_size(&self, info: UrlResponseInfoHandle) -> u32 {
        unsafe { (self.sym().url_response_info_all_headers_list_size)(info) }
    }

    /// Header at `index`, owned by `info`
    pub fn url_response_info_all_headers_list_at(
        &self,
        info: UrlResponseInfoHandle,
        index: u32,
    ) -> HttpHeaderHandle {
        unsafe { (self.sym().url_response_info_all_headers_list_at)(info, index) }
    }

    /// Remove every response header
    pub fn url_response_info_all_headers_list_clear(&self, info: UrlResponseInfoHandle) {
        unsafe { (self.sym().url_response_info_all_headers_list_clear)(info) }
    }

    /// All response headers as `(name, value)` pairs, in wire order
    pub fn url_response_info_headers(&self, info: UrlResponseInfoHandle) -> Vec<(String, String)> {
        (0..self.url_response_info_all_headers_list_size(info))
            .map(|index| {
                let header = self.url_response_info_all_headers_list_at(info, index);
                (self.http_header_name_get(header), self.http_header_value_get(header))
            })
            .collect()
    }

    /// Mark the response as served from cache
    pub fn url_response_info_was_cached_set(&self, info: UrlResponseInfoHandle, cached: bool) {
        unsafe { (self.sym().url_response_info_was_cached_set)(info, cached) }
    }

    /// Whether the response came from the cache
    pub fn url_response_info_was_cached_get(&self, info: UrlResponseInfoHandle) -> bool {
        unsafe { (self.sym().url_response_info_was_cached_get)(info) }
    }

    /// Set the negotiated protocol
    pub fn url_response_info_negotiated_protocol_set(
        &self,
        info: UrlResponseInfoHandle,
        protocol: &str,
    ) {
        let slot = self.sym().url_response_info_negotiated_protocol_set;
        with_c_str(protocol, |text| unsafe { slot(info, text) })
    }

    /// ALPN protocol, e.g. `"h2"` or `"h3"`
    pub fn url_response_info_negotiated_protocol_get(&self, info: UrlResponseInfoHandle) -> String {
        unsafe { read_c_string((self.sym().url_response_info_negotiated_protocol_get)(info)) }
    }

    /// Set the proxy server
    pub fn url_response_info_proxy_server_set(&self, info: UrlResponseInfoHandle, proxy: &str) {
        let slot = self.sym().url_response_info_proxy_server_set;
        with_c_str(proxy, |text| unsafe { slot(info, text) })
    }

    /// Current proxy server
    pub fn url_response_info_proxy_server_get(&self, info: UrlResponseInfoHandle) -> String {
        unsafe { read_c_string((self.sym().url_response_info_proxy_server_get)(info)) }
    }

    /// Set the received byte count
    pub fn url_response_info_received_byte_count_set(&self, info: UrlResponseInfoHandle, count: i64) {
        unsafe { (self.sym().url_response_info_received_byte_count_set)(info, count) }
    }

    /// Bytes received over the network, headers included
    pub fn url_response_info_received_byte_count_get(&self, info: UrlResponseInfoHandle) -> i64 {
        unsafe { (self.sym().url_response_info_received_byte_count_get)(info) }
    }

    // -------------------------------------------------------------------------
    // Error
    // -------------------------------------------------------------------------

    /// Create an error
    pub fn error_create(&self) -> ErrorHandle {
        unsafe { (self.sym().error_create)() }
    }

    /// Destroy the error
    pub fn error_destroy(&self, error: ErrorHandle) {
        unsafe { (self.sym().error_destroy)(error) }
    }

    /// Set the error category
    pub fn error_error_code_set(&self, error: ErrorHandle, code: ErrorCode) {
        unsafe { (self.sym().error_error_code_set)(error, code.raw()) }
    }

    /// Error category
    pub fn error_error_code_get(&self, error: ErrorHandle) -> ErrorCode {
        ErrorCode::from_raw(unsafe { (self.sym().error_error_code_get)(error) })
    }

    /// Set the message
    pub fn error_message_set(&self, error: ErrorHandle, message: &str) {
        let slot = self.sym().error_message_set;
        with_c_str(message, |text| unsafe { slot(error, text) })
    }

    /// Current message
    pub fn error_message_get(&self, error: ErrorHandle) -> String {
        unsafe { read_c_string((self.sym().error_message_get)(error)) }
    }

    /// Chromium net error (`net::Error`, negative)
    pub fn error_internal_error_code_set(&self, error: ErrorHandle, code: i32) {
        unsafe { (self.sym().error_internal_error_code_set)(error, code) }
    }

    /// Chromium net error behind this error
    pub fn error_internal_error_code_get(&self, error: ErrorHandle) -> i32 {
        unsafe { (self.sym().error_internal_error_code_get)(error) }
    }

    /// Mark the error as immediately retryable
    pub fn error_immediately_retryable_set(&self, error: ErrorHandle, retryable: bool) {
        unsafe { (self.sym().error_immediately_retryable_set)(error, retryable) }
    }

    /// Whether retrying right away may succeed
    pub fn error_immediately_retryable_get(&self, error: ErrorHandle) -> bool {
        unsafe { (self.sym().error_immediately_retryable_get)(error) }
    }

    /// Set the QUIC detailed error code
    pub fn error_quic_detailed_error_code_set(&self, error: ErrorHandle, code: i32) {
        unsafe { (self.sym().error_quic_detailed_error_code_set)(error, code) }
    }

    /// QUIC error detail, 0 if not a QUIC failure
    pub fn error_quic_detailed_error_code_get(&self, error: ErrorHandle) -> i32 {
        unsafe { (self.sym().error_quic_detailed_error_code_get)(error) }
    }

    // -------------------------------------------------------------------------
    // HttpHeader
    // -------------------------------------------------------------------------

    /// Create a header
    pub fn http_header_create(&self) -> HttpHeaderHandle {
        unsafe { (self.sym().http_header_create)() }
    }

    /// Destroy the header
    pub fn http_header_destroy(&self, header: HttpHeaderHandle) {
        unsafe { (self.sym().http_header_destroy)(header) }
    }

    /// Set the name
    pub fn http_header_name_set(&self, header: HttpHeaderHandle, name: &str) {
        let slot = self.sym().http_header_name_set;
        with_c_str(name, |text| unsafe { slot(header, text) })
    }

    /// Current name
    pub fn http_header_name_get(&self, header: HttpHeaderHandle) -> String {
        unsafe { read_c_string((self.sym().http_header_name_get)(header)) }
    }

    /// Set the value
    pub fn http_header_value_set(&self, header: HttpHeaderHandle, value: &str) {
        let slot = self.sym().http_header_value_set;
        with_c_str(value, |text| unsafe { slot(header, text) })
    }

    /// Current value
    pub fn http_header_value_get(&self, header: HttpHeaderHandle) -> String {
        unsafe { read_c_string((self.sym().http_header_value_get)(header)) }
    }
}
