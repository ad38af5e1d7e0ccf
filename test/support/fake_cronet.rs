//! In-process fake of the cronet C API
//!
//! A subset of entry points is implemented with `extern "C"` functions over
//! boxed Rust state; every other registered symbol resolves to a stub that
//! aborts if it is ever called.
//!
//! Callback-carrying objects call their stored functions synchronously, on
//! the calling thread. Their destroy functions deliver one late callback
//! before freeing, the way a callback already queued on the network thread
//! would.

#![allow(dead_code)]

use std::ffi::{c_char, c_void, CStr, CString};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;

use cronet_bind::ffi::platform::is_thread_pinned;
use cronet_bind::ffi::symbols::{
    BufferCallbackOnDestroyFn, ExecutorExecuteFn, OnCanceledFn, OnFailedFn, OnReadCompletedFn,
    OnRedirectReceivedFn, OnRequestFinishedFn, OnResponseStartedFn, OnStatusFn, OnSucceededFn,
    RunnableRunFn, UploadCloseFn, UploadGetLengthFn, UploadReadFn, UploadRewindFn,
};
use cronet_bind::ffi::{
    symbol_group, BidirectionalStreamCallback, BidirectionalStreamHandle,
    BidirectionalStreamHeader, BidirectionalStreamHeaderArray, BufferCallbackHandle, BufferHandle,
    CertVerifierHandle, ClientContext, EngineHandle, EngineParamsHandle, ErrorHandle,
    ExecutorHandle, HttpHeaderHandle, LibraryLocator, LoadGuard, NativeLibrary,
    PublicKeyPinsHandle, QuicHintHandle, RequestFinishedInfoHandle,
    RequestFinishedInfoListenerHandle, RunnableHandle, StreamEngineHandle, SymbolSource,
    UploadDataProviderHandle, UploadDataSinkHandle, UrlRequestCallbackHandle, UrlRequestHandle,
    UrlRequestParamsHandle, UrlRequestStatusListenerHandle, UrlResponseInfoHandle,
};
use cronet_bind::Cronet;
use parking_lot::Mutex;

pub const FAKE_VERSION: &str = "fake-cronet/1.0";

/// Where a request whose URL contains "redirect" is sent first
pub const REDIRECT_TARGET: &str = "https://example.test/final";

/// Response headers every fake request and stream reports
pub const RESPONSE_HEADERS: [(&str, &str); 2] =
    [("content-type", "text/plain"), ("x-fake", "1")];

static REDIRECT_TARGET_C: &[u8] = b"https://example.test/final\0";
static PROTOCOL_C: &[u8] = b"h2\0";
static RESPONSE_HEADERS_C: [(&[u8], &[u8]); 2] =
    [(b"content-type\0", b"text/plain\0"), (b"x-fake\0", b"1\0")];

static VERSION_C: &[u8] = b"fake-cronet/1.0\0";

/// Calls into `Cronet_CreateCertVerifierWithPublicKeySHA256`
pub static VERIFIER_CALLS: AtomicUsize = AtomicUsize::new(0);
/// Hash count passed to the last verifier creation
pub static LAST_HASH_COUNT: AtomicUsize = AtomicUsize::new(0);
/// Hashes read by the last verifier creation, 32 bytes per element; `None`
/// for a null element
pub static LAST_HASHES: Mutex<Vec<Option<[u8; 32]>>> = parking_lot::const_mutex(Vec::new());
/// Whether the last engine start ran with the calling thread pinned
pub static START_PINNED: AtomicBool = AtomicBool::new(false);

struct FakeParams {
    user_agent: CString,
    experimental_options: CString,
    http_cache_mode: i32,
    network_thread_priority: f64,
    quic_hints: Vec<Box<FakeQuicHint>>,
    public_key_pins: Vec<Box<FakePins>>,
}

#[derive(Clone, Default)]
struct FakeQuicHint {
    host: CString,
    port: i32,
    alternate_port: i32,
}

#[derive(Clone, Default)]
struct FakePins {
    host: CString,
    pins: Vec<CString>,
    include_subdomains: bool,
    expiration: i64,
}

struct FakeEngine {
    started: bool,
    verifier: *mut c_void,
    net_log: Option<Vec<u8>>,
    finished_listeners: Vec<RequestFinishedInfoListenerHandle>,
}

struct FakeBuffer {
    data: Vec<u8>,
    external: Option<(*mut c_void, u64)>,
    callback: BufferCallbackHandle,
}

struct FakeError {
    code: i32,
    message: CString,
}

#[derive(Clone, Default)]
struct FakeHeader {
    name: CString,
    value: CString,
}

#[derive(Default)]
struct FakeRequestParams {
    method: CString,
    headers: Vec<Box<FakeHeader>>,
    annotations: Vec<ClientContext>,
}

#[derive(Default)]
struct FakeResponseInfo {
    url_chain: Vec<CString>,
    status_text: CString,
    headers: Vec<Box<FakeHeader>>,
}

struct FakeExecutor {
    execute: ExecutorExecuteFn,
}

struct FakeRunnable {
    run: RunnableRunFn,
}

struct FakeBufferCallback {
    on_destroy: BufferCallbackOnDestroyFn,
}

#[derive(Clone, Copy)]
struct FakeRequestCallback {
    on_redirect_received: OnRedirectReceivedFn,
    on_response_started: OnResponseStartedFn,
    on_read_completed: OnReadCompletedFn,
    on_succeeded: OnSucceededFn,
    on_failed: OnFailedFn,
    on_canceled: OnCanceledFn,
}

struct FakeStatusListener {
    on_status: OnStatusFn,
}

#[derive(Clone, Copy)]
struct FakeUploadProvider {
    get_length: UploadGetLengthFn,
    read: UploadReadFn,
    rewind: UploadRewindFn,
    close: UploadCloseFn,
}

#[derive(Default)]
struct FakeSink {
    events: Vec<String>,
}

struct FakeFinishedListener {
    on_finished: OnRequestFinishedFn,
}

struct FakeRequest {
    engine: EngineHandle,
    url: String,
    callback: UrlRequestCallbackHandle,
    info: UrlResponseInfoHandle,
    error: ErrorHandle,
    initialized: bool,
    started: bool,
    done: bool,
}

/// What `bidirectional_stream_start` was called with, copied during the call
#[derive(Debug, Clone, PartialEq)]
pub struct StreamStart {
    pub url: String,
    pub priority: i32,
    pub method: String,
    pub headers: Vec<(String, String)>,
    pub end_of_stream: bool,
}

struct FakeStream {
    callback: *const BidirectionalStreamCallback,
    annotation: ClientContext,
    start: Option<StreamStart>,
}

fn into_handle<T>(value: T) -> *mut c_void {
    Box::into_raw(Box::new(value)) as *mut c_void
}

unsafe fn state<'a, T>(handle: *mut c_void) -> &'a mut T {
    &mut *(handle as *mut T)
}

unsafe fn drop_handle<T>(handle: *mut c_void) {
    if !handle.is_null() {
        drop(Box::from_raw(handle as *mut T));
    }
}

unsafe fn copy_in(text: *const c_char) -> CString {
    if text.is_null() {
        CString::default()
    } else {
        CStr::from_ptr(text).to_owned()
    }
}

unsafe fn copy_string(text: *const c_char) -> String {
    copy_in(text).to_string_lossy().into_owned()
}

/// Pointer to the element at `index`, or null when out of range
fn element<T>(items: &mut [Box<T>], index: u32) -> *mut c_void {
    items
        .get_mut(index as usize)
        .map_or(std::ptr::null_mut(), |item| &mut **item as *mut T as *mut c_void)
}

// -----------------------------------------------------------------------------
// EngineParams
// -----------------------------------------------------------------------------

extern "C" fn engine_params_create() -> EngineParamsHandle {
    EngineParamsHandle::from_raw(into_handle(FakeParams {
        user_agent: CString::default(),
        experimental_options: CString::default(),
        http_cache_mode: 0,
        network_thread_priority: 0.0,
        quic_hints: Vec::new(),
        public_key_pins: Vec::new(),
    }))
}

unsafe extern "C" fn engine_params_destroy(params: EngineParamsHandle) {
    drop_handle::<FakeParams>(params.as_raw())
}

unsafe extern "C" fn engine_params_user_agent_set(params: EngineParamsHandle, text: *const c_char) {
    state::<FakeParams>(params.as_raw()).user_agent = copy_in(text);
}

unsafe extern "C" fn engine_params_user_agent_get(params: EngineParamsHandle) -> *const c_char {
    state::<FakeParams>(params.as_raw()).user_agent.as_ptr()
}

unsafe extern "C" fn engine_params_experimental_options_set(
    params: EngineParamsHandle,
    text: *const c_char,
) {
    state::<FakeParams>(params.as_raw()).experimental_options = copy_in(text);
}

unsafe extern "C" fn engine_params_experimental_options_get(
    params: EngineParamsHandle,
) -> *const c_char {
    state::<FakeParams>(params.as_raw()).experimental_options.as_ptr()
}

unsafe extern "C" fn engine_params_http_cache_mode_set(params: EngineParamsHandle, mode: i32) {
    state::<FakeParams>(params.as_raw()).http_cache_mode = mode;
}

unsafe extern "C" fn engine_params_http_cache_mode_get(params: EngineParamsHandle) -> i32 {
    state::<FakeParams>(params.as_raw()).http_cache_mode
}

unsafe extern "C" fn engine_params_network_thread_priority_set(
    params: EngineParamsHandle,
    priority: f64,
) {
    state::<FakeParams>(params.as_raw()).network_thread_priority = priority;
}

unsafe extern "C" fn engine_params_network_thread_priority_get(params: EngineParamsHandle) -> f64 {
    state::<FakeParams>(params.as_raw()).network_thread_priority
}

unsafe extern "C" fn engine_params_quic_hints_add(params: EngineParamsHandle, hint: QuicHintHandle) {
    let copy = state::<FakeQuicHint>(hint.as_raw()).clone();
    state::<FakeParams>(params.as_raw()).quic_hints.push(Box::new(copy));
}

unsafe extern "C" fn engine_params_quic_hints_size(params: EngineParamsHandle) -> u32 {
    state::<FakeParams>(params.as_raw()).quic_hints.len() as u32
}

unsafe extern "C" fn engine_params_quic_hints_at(
    params: EngineParamsHandle,
    index: u32,
) -> QuicHintHandle {
    QuicHintHandle::from_raw(element(&mut state::<FakeParams>(params.as_raw()).quic_hints, index))
}

unsafe extern "C" fn engine_params_quic_hints_clear(params: EngineParamsHandle) {
    state::<FakeParams>(params.as_raw()).quic_hints.clear();
}

unsafe extern "C" fn engine_params_public_key_pins_add(
    params: EngineParamsHandle,
    pins: PublicKeyPinsHandle,
) {
    let copy = state::<FakePins>(pins.as_raw()).clone();
    state::<FakeParams>(params.as_raw()).public_key_pins.push(Box::new(copy));
}

unsafe extern "C" fn engine_params_public_key_pins_size(params: EngineParamsHandle) -> u32 {
    state::<FakeParams>(params.as_raw()).public_key_pins.len() as u32
}

unsafe extern "C" fn engine_params_public_key_pins_at(
    params: EngineParamsHandle,
    index: u32,
) -> PublicKeyPinsHandle {
    let pins = &mut state::<FakeParams>(params.as_raw()).public_key_pins;
    PublicKeyPinsHandle::from_raw(element(pins, index))
}

unsafe extern "C" fn engine_params_public_key_pins_clear(params: EngineParamsHandle) {
    state::<FakeParams>(params.as_raw()).public_key_pins.clear();
}

// -----------------------------------------------------------------------------
// QuicHint / PublicKeyPins
// -----------------------------------------------------------------------------

extern "C" fn quic_hint_create() -> QuicHintHandle {
    QuicHintHandle::from_raw(into_handle(FakeQuicHint::default()))
}

unsafe extern "C" fn quic_hint_destroy(hint: QuicHintHandle) {
    drop_handle::<FakeQuicHint>(hint.as_raw())
}

unsafe extern "C" fn quic_hint_host_set(hint: QuicHintHandle, host: *const c_char) {
    state::<FakeQuicHint>(hint.as_raw()).host = copy_in(host);
}

unsafe extern "C" fn quic_hint_host_get(hint: QuicHintHandle) -> *const c_char {
    state::<FakeQuicHint>(hint.as_raw()).host.as_ptr()
}

unsafe extern "C" fn quic_hint_port_set(hint: QuicHintHandle, port: i32) {
    state::<FakeQuicHint>(hint.as_raw()).port = port;
}

unsafe extern "C" fn quic_hint_port_get(hint: QuicHintHandle) -> i32 {
    state::<FakeQuicHint>(hint.as_raw()).port
}

unsafe extern "C" fn quic_hint_alternate_port_set(hint: QuicHintHandle, port: i32) {
    state::<FakeQuicHint>(hint.as_raw()).alternate_port = port;
}

unsafe extern "C" fn quic_hint_alternate_port_get(hint: QuicHintHandle) -> i32 {
    state::<FakeQuicHint>(hint.as_raw()).alternate_port
}

extern "C" fn public_key_pins_create() -> PublicKeyPinsHandle {
    PublicKeyPinsHandle::from_raw(into_handle(FakePins::default()))
}

unsafe extern "C" fn public_key_pins_destroy(pins: PublicKeyPinsHandle) {
    drop_handle::<FakePins>(pins.as_raw())
}

unsafe extern "C" fn public_key_pins_host_set(pins: PublicKeyPinsHandle, host: *const c_char) {
    state::<FakePins>(pins.as_raw()).host = copy_in(host);
}

unsafe extern "C" fn public_key_pins_host_get(pins: PublicKeyPinsHandle) -> *const c_char {
    state::<FakePins>(pins.as_raw()).host.as_ptr()
}

unsafe extern "C" fn public_key_pins_pins_sha256_add(pins: PublicKeyPinsHandle, pin: *const c_char) {
    state::<FakePins>(pins.as_raw()).pins.push(copy_in(pin));
}

unsafe extern "C" fn public_key_pins_pins_sha256_size(pins: PublicKeyPinsHandle) -> u32 {
    state::<FakePins>(pins.as_raw()).pins.len() as u32
}

unsafe extern "C" fn public_key_pins_pins_sha256_at(
    pins: PublicKeyPinsHandle,
    index: u32,
) -> *const c_char {
    state::<FakePins>(pins.as_raw())
        .pins
        .get(index as usize)
        .map_or(std::ptr::null(), |pin| pin.as_ptr())
}

unsafe extern "C" fn public_key_pins_pins_sha256_clear(pins: PublicKeyPinsHandle) {
    state::<FakePins>(pins.as_raw()).pins.clear();
}

unsafe extern "C" fn public_key_pins_include_subdomains_set(pins: PublicKeyPinsHandle, include: bool) {
    state::<FakePins>(pins.as_raw()).include_subdomains = include;
}

unsafe extern "C" fn public_key_pins_include_subdomains_get(pins: PublicKeyPinsHandle) -> bool {
    state::<FakePins>(pins.as_raw()).include_subdomains
}

unsafe extern "C" fn public_key_pins_expiration_date_set(pins: PublicKeyPinsHandle, millis: i64) {
    state::<FakePins>(pins.as_raw()).expiration = millis;
}

unsafe extern "C" fn public_key_pins_expiration_date_get(pins: PublicKeyPinsHandle) -> i64 {
    state::<FakePins>(pins.as_raw()).expiration
}

// -----------------------------------------------------------------------------
// Engine
// -----------------------------------------------------------------------------

extern "C" fn engine_create() -> EngineHandle {
    EngineHandle::from_raw(into_handle(FakeEngine {
        started: false,
        verifier: std::ptr::null_mut(),
        net_log: None,
        finished_listeners: Vec::new(),
    }))
}

unsafe extern "C" fn engine_destroy(engine: EngineHandle) {
    drop_handle::<FakeEngine>(engine.as_raw())
}

unsafe extern "C" fn engine_start_with_params(
    engine: EngineHandle,
    params: EngineParamsHandle,
) -> i32 {
    START_PINNED.store(is_thread_pinned(), Ordering::SeqCst);
    if params.is_null() {
        return -311;
    }
    let engine = state::<FakeEngine>(engine.as_raw());
    if engine.started {
        return -203;
    }
    engine.started = true;
    0
}

unsafe extern "C" fn engine_shutdown(engine: EngineHandle) -> i32 {
    state::<FakeEngine>(engine.as_raw()).started = false;
    0
}

extern "C" fn engine_get_version_string(_engine: EngineHandle) -> *const c_char {
    VERSION_C.as_ptr() as *const c_char
}

unsafe extern "C" fn engine_set_mock_cert_verifier_for_testing(
    engine: EngineHandle,
    verifier: CertVerifierHandle,
) {
    state::<FakeEngine>(engine.as_raw()).verifier = verifier.as_raw();
}

unsafe extern "C" fn create_cert_verifier_with_public_key_sha256(
    hashes: *const *const u8,
    count: usize,
) -> CertVerifierHandle {
    VERIFIER_CALLS.fetch_add(1, Ordering::SeqCst);
    LAST_HASH_COUNT.store(count, Ordering::SeqCst);
    let read = (0..count)
        .map(|i| {
            let hash = *hashes.add(i);
            (!hash.is_null()).then(|| *(hash as *const [u8; 32]))
        })
        .collect();
    *LAST_HASHES.lock() = read;
    CertVerifierHandle::from_raw(into_handle(count))
}

unsafe extern "C" fn engine_start_net_log_to_file(
    engine: EngineHandle,
    file_name: *const c_char,
    _log_all: bool,
) -> bool {
    if file_name.is_null() {
        return false;
    }
    let path = CStr::from_ptr(file_name).to_bytes().to_vec();
    state::<FakeEngine>(engine.as_raw()).net_log = Some(path);
    true
}

unsafe extern "C" fn engine_stop_net_log(engine: EngineHandle) {
    state::<FakeEngine>(engine.as_raw()).net_log = None;
}

unsafe extern "C" fn engine_add_request_finished_listener(
    engine: EngineHandle,
    listener: RequestFinishedInfoListenerHandle,
    _executor: ExecutorHandle,
) {
    state::<FakeEngine>(engine.as_raw()).finished_listeners.push(listener);
}

unsafe extern "C" fn engine_remove_request_finished_listener(
    engine: EngineHandle,
    listener: RequestFinishedInfoListenerHandle,
) {
    state::<FakeEngine>(engine.as_raw())
        .finished_listeners
        .retain(|current| *current != listener);
}

extern "C" fn engine_get_stream_engine(engine: EngineHandle) -> StreamEngineHandle {
    StreamEngineHandle::from_raw(engine.as_raw())
}

/// Bytes of the path the running net log writes to
pub fn net_log_path(engine: EngineHandle) -> Option<Vec<u8>> {
    unsafe { state::<FakeEngine>(engine.as_raw()).net_log.clone() }
}

// -----------------------------------------------------------------------------
// Buffer
// -----------------------------------------------------------------------------

extern "C" fn buffer_create() -> BufferHandle {
    BufferHandle::from_raw(into_handle(FakeBuffer {
        data: Vec::new(),
        external: None,
        callback: BufferCallbackHandle::NULL,
    }))
}

unsafe extern "C" fn buffer_destroy(buffer: BufferHandle) {
    let callback = state::<FakeBuffer>(buffer.as_raw()).callback;
    if !callback.is_null() {
        let on_destroy = state::<FakeBufferCallback>(callback.as_raw()).on_destroy;
        on_destroy(callback, buffer);
    }
    drop_handle::<FakeBuffer>(buffer.as_raw())
}

unsafe extern "C" fn buffer_init_with_data_and_callback(
    buffer: BufferHandle,
    data: *mut c_void,
    size: u64,
    callback: BufferCallbackHandle,
) {
    let buffer = state::<FakeBuffer>(buffer.as_raw());
    buffer.external = Some((data, size));
    buffer.callback = callback;
}

unsafe extern "C" fn buffer_init_with_alloc(buffer: BufferHandle, size: u64) {
    state::<FakeBuffer>(buffer.as_raw()).data = (0..size).map(|i| i as u8).collect();
}

unsafe extern "C" fn buffer_get_size(buffer: BufferHandle) -> u64 {
    let buffer = state::<FakeBuffer>(buffer.as_raw());
    match buffer.external {
        Some((_, size)) => size,
        None => buffer.data.len() as u64,
    }
}

unsafe extern "C" fn buffer_get_data(buffer: BufferHandle) -> *mut c_void {
    let buffer = state::<FakeBuffer>(buffer.as_raw());
    if let Some((data, _)) = buffer.external {
        return data;
    }
    let data = &mut buffer.data;
    if data.is_empty() {
        std::ptr::null_mut()
    } else {
        data.as_mut_ptr() as *mut c_void
    }
}

// -----------------------------------------------------------------------------
// Error
// -----------------------------------------------------------------------------

extern "C" fn error_create() -> ErrorHandle {
    ErrorHandle::from_raw(into_handle(FakeError {
        code: 0,
        message: CString::default(),
    }))
}

unsafe extern "C" fn error_destroy(error: ErrorHandle) {
    drop_handle::<FakeError>(error.as_raw())
}

unsafe extern "C" fn error_error_code_set(error: ErrorHandle, code: i32) {
    state::<FakeError>(error.as_raw()).code = code;
}

unsafe extern "C" fn error_error_code_get(error: ErrorHandle) -> i32 {
    state::<FakeError>(error.as_raw()).code
}

unsafe extern "C" fn error_message_set(error: ErrorHandle, message: *const c_char) {
    state::<FakeError>(error.as_raw()).message = copy_in(message);
}

unsafe extern "C" fn error_message_get(error: ErrorHandle) -> *const c_char {
    state::<FakeError>(error.as_raw()).message.as_ptr()
}

// -----------------------------------------------------------------------------
// HttpHeader / UrlRequestParams / UrlResponseInfo
// -----------------------------------------------------------------------------

extern "C" fn http_header_create() -> HttpHeaderHandle {
    HttpHeaderHandle::from_raw(into_handle(FakeHeader::default()))
}

unsafe extern "C" fn http_header_destroy(header: HttpHeaderHandle) {
    drop_handle::<FakeHeader>(header.as_raw())
}

unsafe extern "C" fn http_header_name_set(header: HttpHeaderHandle, name: *const c_char) {
    state::<FakeHeader>(header.as_raw()).name = copy_in(name);
}

unsafe extern "C" fn http_header_name_get(header: HttpHeaderHandle) -> *const c_char {
    state::<FakeHeader>(header.as_raw()).name.as_ptr()
}

unsafe extern "C" fn http_header_value_set(header: HttpHeaderHandle, value: *const c_char) {
    state::<FakeHeader>(header.as_raw()).value = copy_in(value);
}

unsafe extern "C" fn http_header_value_get(header: HttpHeaderHandle) -> *const c_char {
    state::<FakeHeader>(header.as_raw()).value.as_ptr()
}

extern "C" fn url_request_params_create() -> UrlRequestParamsHandle {
    UrlRequestParamsHandle::from_raw(into_handle(FakeRequestParams::default()))
}

unsafe extern "C" fn url_request_params_destroy(params: UrlRequestParamsHandle) {
    drop_handle::<FakeRequestParams>(params.as_raw())
}

unsafe extern "C" fn url_request_params_http_method_set(
    params: UrlRequestParamsHandle,
    method: *const c_char,
) {
    state::<FakeRequestParams>(params.as_raw()).method = copy_in(method);
}

unsafe extern "C" fn url_request_params_http_method_get(
    params: UrlRequestParamsHandle,
) -> *const c_char {
    state::<FakeRequestParams>(params.as_raw()).method.as_ptr()
}

unsafe extern "C" fn url_request_params_request_headers_add(
    params: UrlRequestParamsHandle,
    header: HttpHeaderHandle,
) {
    let copy = state::<FakeHeader>(header.as_raw()).clone();
    state::<FakeRequestParams>(params.as_raw()).headers.push(Box::new(copy));
}

unsafe extern "C" fn url_request_params_request_headers_size(params: UrlRequestParamsHandle) -> u32 {
    state::<FakeRequestParams>(params.as_raw()).headers.len() as u32
}

unsafe extern "C" fn url_request_params_request_headers_at(
    params: UrlRequestParamsHandle,
    index: u32,
) -> HttpHeaderHandle {
    let headers = &mut state::<FakeRequestParams>(params.as_raw()).headers;
    HttpHeaderHandle::from_raw(element(headers, index))
}

unsafe extern "C" fn url_request_params_request_headers_clear(params: UrlRequestParamsHandle) {
    state::<FakeRequestParams>(params.as_raw()).headers.clear();
}

unsafe extern "C" fn url_request_params_annotations_add(
    params: UrlRequestParamsHandle,
    annotation: ClientContext,
) {
    state::<FakeRequestParams>(params.as_raw()).annotations.push(annotation);
}

unsafe extern "C" fn url_request_params_annotations_size(params: UrlRequestParamsHandle) -> u32 {
    state::<FakeRequestParams>(params.as_raw()).annotations.len() as u32
}

unsafe extern "C" fn url_request_params_annotations_at(
    params: UrlRequestParamsHandle,
    index: u32,
) -> ClientContext {
    state::<FakeRequestParams>(params.as_raw())
        .annotations
        .get(index as usize)
        .copied()
        .unwrap_or(ClientContext::NULL)
}

unsafe extern "C" fn url_request_params_annotations_clear(params: UrlRequestParamsHandle) {
    state::<FakeRequestParams>(params.as_raw()).annotations.clear();
}

extern "C" fn url_response_info_create() -> UrlResponseInfoHandle {
    UrlResponseInfoHandle::from_raw(into_handle(FakeResponseInfo::default()))
}

unsafe extern "C" fn url_response_info_destroy(info: UrlResponseInfoHandle) {
    drop_handle::<FakeResponseInfo>(info.as_raw())
}

unsafe extern "C" fn url_response_info_url_chain_add(info: UrlResponseInfoHandle, url: *const c_char) {
    state::<FakeResponseInfo>(info.as_raw()).url_chain.push(copy_in(url));
}

unsafe extern "C" fn url_response_info_url_chain_size(info: UrlResponseInfoHandle) -> u32 {
    state::<FakeResponseInfo>(info.as_raw()).url_chain.len() as u32
}

unsafe extern "C" fn url_response_info_url_chain_at(
    info: UrlResponseInfoHandle,
    index: u32,
) -> *const c_char {
    state::<FakeResponseInfo>(info.as_raw())
        .url_chain
        .get(index as usize)
        .map_or(std::ptr::null(), |url| url.as_ptr())
}

unsafe extern "C" fn url_response_info_url_chain_clear(info: UrlResponseInfoHandle) {
    state::<FakeResponseInfo>(info.as_raw()).url_chain.clear();
}

unsafe extern "C" fn url_response_info_http_status_text_set(
    info: UrlResponseInfoHandle,
    text: *const c_char,
) {
    state::<FakeResponseInfo>(info.as_raw()).status_text = copy_in(text);
}

unsafe extern "C" fn url_response_info_http_status_text_get(
    info: UrlResponseInfoHandle,
) -> *const c_char {
    state::<FakeResponseInfo>(info.as_raw()).status_text.as_ptr()
}

unsafe extern "C" fn url_response_info_all_headers_list_add(
    info: UrlResponseInfoHandle,
    header: HttpHeaderHandle,
) {
    let copy = state::<FakeHeader>(header.as_raw()).clone();
    state::<FakeResponseInfo>(info.as_raw()).headers.push(Box::new(copy));
}

unsafe extern "C" fn url_response_info_all_headers_list_size(info: UrlResponseInfoHandle) -> u32 {
    state::<FakeResponseInfo>(info.as_raw()).headers.len() as u32
}

unsafe extern "C" fn url_response_info_all_headers_list_at(
    info: UrlResponseInfoHandle,
    index: u32,
) -> HttpHeaderHandle {
    let headers = &mut state::<FakeResponseInfo>(info.as_raw()).headers;
    HttpHeaderHandle::from_raw(element(headers, index))
}

unsafe extern "C" fn url_response_info_all_headers_list_clear(info: UrlResponseInfoHandle) {
    state::<FakeResponseInfo>(info.as_raw()).headers.clear();
}

// -----------------------------------------------------------------------------
// Executor / Runnable / BufferCallback
// -----------------------------------------------------------------------------

extern "C" fn executor_create_with(execute: ExecutorExecuteFn) -> ExecutorHandle {
    ExecutorHandle::from_raw(into_handle(FakeExecutor { execute }))
}

unsafe extern "C" fn executor_destroy(executor: ExecutorHandle) {
    let execute = state::<FakeExecutor>(executor.as_raw()).execute;
    execute(executor, RunnableHandle::NULL);
    drop_handle::<FakeExecutor>(executor.as_raw())
}

unsafe extern "C" fn executor_execute(executor: ExecutorHandle, runnable: RunnableHandle) {
    let execute = state::<FakeExecutor>(executor.as_raw()).execute;
    execute(executor, runnable);
}

extern "C" fn runnable_create_with(run: RunnableRunFn) -> RunnableHandle {
    RunnableHandle::from_raw(into_handle(FakeRunnable { run }))
}

unsafe extern "C" fn runnable_destroy(runnable: RunnableHandle) {
    drop_handle::<FakeRunnable>(runnable.as_raw())
}

unsafe extern "C" fn runnable_run(runnable: RunnableHandle) {
    let run = state::<FakeRunnable>(runnable.as_raw()).run;
    run(runnable);
}

extern "C" fn buffer_callback_create_with(on_destroy: BufferCallbackOnDestroyFn) -> BufferCallbackHandle {
    BufferCallbackHandle::from_raw(into_handle(FakeBufferCallback { on_destroy }))
}

unsafe extern "C" fn buffer_callback_destroy(callback: BufferCallbackHandle) {
    drop_handle::<FakeBufferCallback>(callback.as_raw())
}

// -----------------------------------------------------------------------------
// UrlRequest and its listeners
// -----------------------------------------------------------------------------

extern "C" fn url_request_callback_create_with(
    on_redirect_received: OnRedirectReceivedFn,
    on_response_started: OnResponseStartedFn,
    on_read_completed: OnReadCompletedFn,
    on_succeeded: OnSucceededFn,
    on_failed: OnFailedFn,
    on_canceled: OnCanceledFn,
) -> UrlRequestCallbackHandle {
    UrlRequestCallbackHandle::from_raw(into_handle(FakeRequestCallback {
        on_redirect_received,
        on_response_started,
        on_read_completed,
        on_succeeded,
        on_failed,
        on_canceled,
    }))
}

unsafe extern "C" fn url_request_callback_destroy(callback: UrlRequestCallbackHandle) {
    let fns = *state::<FakeRequestCallback>(callback.as_raw());
    (fns.on_response_started)(callback, UrlRequestHandle::NULL, UrlResponseInfoHandle::NULL);
    drop_handle::<FakeRequestCallback>(callback.as_raw())
}

extern "C" fn url_request_status_listener_create_with(
    on_status: OnStatusFn,
) -> UrlRequestStatusListenerHandle {
    UrlRequestStatusListenerHandle::from_raw(into_handle(FakeStatusListener { on_status }))
}

unsafe extern "C" fn url_request_status_listener_destroy(listener: UrlRequestStatusListenerHandle) {
    drop_handle::<FakeStatusListener>(listener.as_raw())
}

extern "C" fn request_finished_info_listener_create_with(
    on_finished: OnRequestFinishedFn,
) -> RequestFinishedInfoListenerHandle {
    RequestFinishedInfoListenerHandle::from_raw(into_handle(FakeFinishedListener { on_finished }))
}

unsafe extern "C" fn request_finished_info_listener_destroy(
    listener: RequestFinishedInfoListenerHandle,
) {
    drop_handle::<FakeFinishedListener>(listener.as_raw())
}

extern "C" fn url_request_create() -> UrlRequestHandle {
    UrlRequestHandle::from_raw(into_handle(FakeRequest {
        engine: EngineHandle::NULL,
        url: String::new(),
        callback: UrlRequestCallbackHandle::NULL,
        info: url_response_info_create(),
        error: error_create(),
        initialized: false,
        started: false,
        done: false,
    }))
}

unsafe extern "C" fn url_request_destroy(request: UrlRequestHandle) {
    let fake = state::<FakeRequest>(request.as_raw());
    url_response_info_destroy(fake.info);
    error_destroy(fake.error);
    drop_handle::<FakeRequest>(request.as_raw())
}

unsafe extern "C" fn url_request_init_with_params(
    request: UrlRequestHandle,
    engine: EngineHandle,
    url: *const c_char,
    _params: UrlRequestParamsHandle,
    callback: UrlRequestCallbackHandle,
    _executor: ExecutorHandle,
) -> i32 {
    if url.is_null() {
        return -305;
    }
    if callback.is_null() {
        return -306;
    }
    let fake = state::<FakeRequest>(request.as_raw());
    if fake.initialized {
        return -206;
    }
    fake.engine = engine;
    fake.url = copy_string(url);
    fake.callback = callback;
    fake.initialized = true;
    0
}

/// Runs the whole request synchronously: an optional redirect, then either
/// success or (for URLs containing "unreachable") failure.
unsafe extern "C" fn url_request_start(request: UrlRequestHandle) -> i32 {
    let fake = state::<FakeRequest>(request.as_raw());
    if !fake.initialized {
        return -205;
    }
    if fake.started {
        return -204;
    }
    fake.started = true;
    let (engine, url, callback, info, error) =
        (fake.engine, fake.url.clone(), fake.callback, fake.info, fake.error);

    url_response_info_url_chain_add(info, copy_in_str(&url).as_ptr());
    let fns = *state::<FakeRequestCallback>(callback.as_raw());

    if url.contains("redirect") {
        (fns.on_redirect_received)(callback, request, info, REDIRECT_TARGET_C.as_ptr() as *const c_char);
        url_response_info_url_chain_add(info, REDIRECT_TARGET_C.as_ptr() as *const c_char);
    }

    if url.contains("unreachable") {
        let fake_error = state::<FakeError>(error.as_raw());
        fake_error.code = 7;
        fake_error.message = copy_in_str("net::ERR_CONNECTION_REFUSED");
        state::<FakeRequest>(request.as_raw()).done = true;
        (fns.on_failed)(callback, request, UrlResponseInfoHandle::NULL, error);
        notify_finished(engine, UrlResponseInfoHandle::NULL, error);
        return 0;
    }

    for (name, value) in RESPONSE_HEADERS_C {
        let header = http_header_create();
        http_header_name_set(header, name.as_ptr() as *const c_char);
        http_header_value_set(header, value.as_ptr() as *const c_char);
        url_response_info_all_headers_list_add(info, header);
        http_header_destroy(header);
    }
    (fns.on_response_started)(callback, request, info);
    state::<FakeRequest>(request.as_raw()).done = true;
    (fns.on_succeeded)(callback, request, info);
    notify_finished(engine, info, ErrorHandle::NULL);
    0
}

fn copy_in_str(text: &str) -> CString {
    CString::new(text).unwrap_or_default()
}

unsafe fn notify_finished(engine: EngineHandle, info: UrlResponseInfoHandle, error: ErrorHandle) {
    if engine.is_null() {
        return;
    }
    let listeners = state::<FakeEngine>(engine.as_raw()).finished_listeners.clone();
    for listener in listeners {
        let on_finished = state::<FakeFinishedListener>(listener.as_raw()).on_finished;
        on_finished(listener, RequestFinishedInfoHandle::NULL, info, error);
    }
}

extern "C" fn url_request_follow_redirect(_request: UrlRequestHandle) -> i32 {
    0
}

unsafe extern "C" fn url_request_cancel(request: UrlRequestHandle) {
    let fake = state::<FakeRequest>(request.as_raw());
    if fake.done || !fake.initialized {
        return;
    }
    fake.done = true;
    let (callback, info) = (fake.callback, fake.info);
    let fns = *state::<FakeRequestCallback>(callback.as_raw());
    (fns.on_canceled)(callback, request, info);
}

unsafe extern "C" fn url_request_is_done(request: UrlRequestHandle) -> bool {
    state::<FakeRequest>(request.as_raw()).done
}

unsafe extern "C" fn url_request_get_status(
    request: UrlRequestHandle,
    listener: UrlRequestStatusListenerHandle,
) {
    let status = if state::<FakeRequest>(request.as_raw()).done { 0 } else { 13 };
    let on_status = state::<FakeStatusListener>(listener.as_raw()).on_status;
    on_status(listener, status);
}

// -----------------------------------------------------------------------------
// Upload
// -----------------------------------------------------------------------------

extern "C" fn upload_data_provider_create_with(
    get_length: UploadGetLengthFn,
    read: UploadReadFn,
    rewind: UploadRewindFn,
    close: UploadCloseFn,
) -> UploadDataProviderHandle {
    UploadDataProviderHandle::from_raw(into_handle(FakeUploadProvider {
        get_length,
        read,
        rewind,
        close,
    }))
}

unsafe extern "C" fn upload_data_provider_destroy(provider: UploadDataProviderHandle) {
    let fns = *state::<FakeUploadProvider>(provider.as_raw());
    (fns.close)(provider);
    drop_handle::<FakeUploadProvider>(provider.as_raw())
}

unsafe extern "C" fn upload_data_sink_destroy(sink: UploadDataSinkHandle) {
    drop_handle::<FakeSink>(sink.as_raw())
}

unsafe extern "C" fn upload_data_sink_on_read_succeeded(
    sink: UploadDataSinkHandle,
    bytes_read: u64,
    final_chunk: bool,
) {
    let event = format!("read {} final={}", bytes_read, final_chunk);
    state::<FakeSink>(sink.as_raw()).events.push(event);
}

unsafe extern "C" fn upload_data_sink_on_read_error(sink: UploadDataSinkHandle, message: *const c_char) {
    let event = format!("read error: {}", copy_string(message));
    state::<FakeSink>(sink.as_raw()).events.push(event);
}

unsafe extern "C" fn upload_data_sink_on_rewind_succeeded(sink: UploadDataSinkHandle) {
    state::<FakeSink>(sink.as_raw()).events.push("rewound".to_string());
}

unsafe extern "C" fn upload_data_sink_on_rewind_error(
    sink: UploadDataSinkHandle,
    message: *const c_char,
) {
    let event = format!("rewind error: {}", copy_string(message));
    state::<FakeSink>(sink.as_raw()).events.push(event);
}

/// A sink the way the network stack would hand one to a provider
pub fn new_upload_sink() -> UploadDataSinkHandle {
    UploadDataSinkHandle::from_raw(into_handle(FakeSink::default()))
}

/// Every answer the sink has received, in order
pub fn sink_events(sink: UploadDataSinkHandle) -> Vec<String> {
    unsafe { state::<FakeSink>(sink.as_raw()).events.clone() }
}

/// Ask `provider` for its length, as the network stack would
pub fn upload_length(provider: UploadDataProviderHandle) -> i64 {
    unsafe { (state::<FakeUploadProvider>(provider.as_raw()).get_length)(provider) }
}

/// Ask `provider` to fill `buffer`
pub fn upload_read(provider: UploadDataProviderHandle, sink: UploadDataSinkHandle, buffer: BufferHandle) {
    unsafe { (state::<FakeUploadProvider>(provider.as_raw()).read)(provider, sink, buffer) }
}

/// Ask `provider` to start over
pub fn upload_rewind(provider: UploadDataProviderHandle, sink: UploadDataSinkHandle) {
    unsafe { (state::<FakeUploadProvider>(provider.as_raw()).rewind)(provider, sink) }
}

/// Tell `provider` the request is done with it
pub fn upload_close(provider: UploadDataProviderHandle) {
    unsafe { (state::<FakeUploadProvider>(provider.as_raw()).close)(provider) }
}

// -----------------------------------------------------------------------------
// Bidirectional stream
// -----------------------------------------------------------------------------

unsafe extern "C" fn bidirectional_stream_create(
    _engine: StreamEngineHandle,
    annotation: ClientContext,
    callback: *const BidirectionalStreamCallback,
) -> BidirectionalStreamHandle {
    BidirectionalStreamHandle::from_raw(into_handle(FakeStream {
        callback,
        annotation,
        start: None,
    }))
}

unsafe fn stream_callback<'a>(stream: BidirectionalStreamHandle) -> &'a BidirectionalStreamCallback {
    &*state::<FakeStream>(stream.as_raw()).callback
}

unsafe extern "C" fn bidirectional_stream_destroy(stream: BidirectionalStreamHandle) -> i32 {
    if let Some(on_succeeded) = stream_callback(stream).on_succeeded {
        on_succeeded(stream);
    }
    drop_handle::<FakeStream>(stream.as_raw());
    0
}

unsafe fn read_headers(array: *const BidirectionalStreamHeaderArray) -> Vec<(String, String)> {
    let Some(array) = array.as_ref() else {
        return Vec::new();
    };
    (0..array.count)
        .map(|i| {
            let header = &*array.headers.add(i);
            (copy_string(header.key), copy_string(header.value))
        })
        .collect()
}

unsafe fn with_header_array<R>(
    headers: &[(&[u8], &[u8])],
    f: impl FnOnce(*const BidirectionalStreamHeaderArray) -> R,
) -> R {
    let mut entries: Vec<BidirectionalStreamHeader> = headers
        .iter()
        .map(|(key, value)| BidirectionalStreamHeader {
            key: key.as_ptr() as *const c_char,
            value: value.as_ptr() as *const c_char,
        })
        .collect();
    let array = BidirectionalStreamHeaderArray {
        count: entries.len(),
        capacity: entries.len(),
        headers: entries.as_mut_ptr(),
    };
    f(&array)
}

/// Records the arguments and reports the stream ready with response headers
unsafe extern "C" fn bidirectional_stream_start(
    stream: BidirectionalStreamHandle,
    url: *const c_char,
    priority: i32,
    method: *const c_char,
    headers: *const BidirectionalStreamHeaderArray,
    end_of_stream: bool,
) -> i32 {
    let url = copy_string(url);
    if url.is_empty() {
        return -300;
    }
    state::<FakeStream>(stream.as_raw()).start = Some(StreamStart {
        url,
        priority,
        method: copy_string(method),
        headers: read_headers(headers),
        end_of_stream,
    });

    let callback = stream_callback(stream);
    if let Some(on_ready) = callback.on_stream_ready {
        on_ready(stream);
    }
    if let Some(on_headers) = callback.on_response_headers_received {
        with_header_array(&RESPONSE_HEADERS_C, |array| {
            on_headers(stream, array, PROTOCOL_C.as_ptr() as *const c_char)
        });
    }
    0
}

unsafe extern "C" fn bidirectional_stream_write(
    stream: BidirectionalStreamHandle,
    data: *const c_char,
    _count: i32,
    _end_of_stream: bool,
) -> i32 {
    if let Some(on_write) = stream_callback(stream).on_write_completed {
        on_write(stream, data);
    }
    0
}

unsafe extern "C" fn bidirectional_stream_cancel(stream: BidirectionalStreamHandle) {
    if let Some(on_canceled) = stream_callback(stream).on_canceled {
        on_canceled(stream);
    }
}

/// Arguments of the stream's start call, if it was started
pub fn stream_started(stream: BidirectionalStreamHandle) -> Option<StreamStart> {
    unsafe { state::<FakeStream>(stream.as_raw()).start.clone() }
}

/// Annotation the stream was created with
pub fn stream_annotation(stream: BidirectionalStreamHandle) -> ClientContext {
    unsafe { state::<FakeStream>(stream.as_raw()).annotation }
}

/// Deliver trailers and then success, as the network thread would
pub fn finish_stream(stream: BidirectionalStreamHandle) {
    unsafe {
        let callback = stream_callback(stream);
        if let Some(on_trailers) = callback.on_response_trailers_received {
            let trailers: [(&[u8], &[u8]); 1] = [(b"grpc-status\0", b"0\0")];
            with_header_array(&trailers, |array| on_trailers(stream, array));
        }
        if let Some(on_succeeded) = callback.on_succeeded {
            on_succeeded(stream);
        }
    }
}

/// Deliver a failure with net error `code`
pub fn fail_stream(stream: BidirectionalStreamHandle, code: i32) {
    unsafe {
        if let Some(on_failed) = stream_callback(stream).on_failed {
            on_failed(stream, code);
        }
    }
}

extern "C" fn not_implemented() {
    std::process::abort()
}

fn implemented(name: &str) -> Option<*const c_void> {
    let address = match name {
        "Cronet_EngineParams_Create" => engine_params_create as *const c_void,
        "Cronet_EngineParams_Destroy" => engine_params_destroy as *const c_void,
        "Cronet_EngineParams_user_agent_set" => engine_params_user_agent_set as *const c_void,
        "Cronet_EngineParams_user_agent_get" => engine_params_user_agent_get as *const c_void,
        "Cronet_EngineParams_experimental_options_set" => {
            engine_params_experimental_options_set as *const c_void
        }
        "Cronet_EngineParams_experimental_options_get" => {
            engine_params_experimental_options_get as *const c_void
        }
        "Cronet_EngineParams_http_cache_mode_set" => {
            engine_params_http_cache_mode_set as *const c_void
        }
        "Cronet_EngineParams_http_cache_mode_get" => {
            engine_params_http_cache_mode_get as *const c_void
        }
        "Cronet_EngineParams_network_thread_priority_set" => {
            engine_params_network_thread_priority_set as *const c_void
        }
        "Cronet_EngineParams_network_thread_priority_get" => {
            engine_params_network_thread_priority_get as *const c_void
        }
        "Cronet_Engine_Create" => engine_create as *const c_void,
        "Cronet_Engine_Destroy" => engine_destroy as *const c_void,
        "Cronet_Engine_StartWithParams" => engine_start_with_params as *const c_void,
        "Cronet_Engine_Shutdown" => engine_shutdown as *const c_void,
        "Cronet_Engine_GetVersionString" => engine_get_version_string as *const c_void,
        "Cronet_Engine_SetMockCertVerifierForTesting" => {
            engine_set_mock_cert_verifier_for_testing as *const c_void
        }
        "Cronet_CreateCertVerifierWithPublicKeySHA256" => {
            create_cert_verifier_with_public_key_sha256 as *const c_void
        }
        "Cronet_Buffer_Create" => buffer_create as *const c_void,
        "Cronet_Buffer_Destroy" => buffer_destroy as *const c_void,
        "Cronet_Buffer_InitWithAlloc" => buffer_init_with_alloc as *const c_void,
        "Cronet_Buffer_GetSize" => buffer_get_size as *const c_void,
        "Cronet_Buffer_GetData" => buffer_get_data as *const c_void,
        "Cronet_Error_Create" => error_create as *const c_void,
        "Cronet_Error_Destroy" => error_destroy as *const c_void,
        "Cronet_Error_error_code_set" => error_error_code_set as *const c_void,
        "Cronet_Error_error_code_get" => error_error_code_get as *const c_void,
        "Cronet_EngineParams_quic_hints_add" => engine_params_quic_hints_add as *const c_void,
        "Cronet_EngineParams_quic_hints_size" => engine_params_quic_hints_size as *const c_void,
        "Cronet_EngineParams_quic_hints_at" => engine_params_quic_hints_at as *const c_void,
        "Cronet_EngineParams_quic_hints_clear" => engine_params_quic_hints_clear as *const c_void,
        "Cronet_EngineParams_public_key_pins_add" => engine_params_public_key_pins_add as *const c_void,
        "Cronet_EngineParams_public_key_pins_size" => engine_params_public_key_pins_size as *const c_void,
        "Cronet_EngineParams_public_key_pins_at" => engine_params_public_key_pins_at as *const c_void,
        "Cronet_EngineParams_public_key_pins_clear" => engine_params_public_key_pins_clear as *const c_void,
        "Cronet_QuicHint_Create" => quic_hint_create as *const c_void,
        "Cronet_QuicHint_Destroy" => quic_hint_destroy as *const c_void,
        "Cronet_QuicHint_host_set" => quic_hint_host_set as *const c_void,
        "Cronet_QuicHint_host_get" => quic_hint_host_get as *const c_void,
        "Cronet_QuicHint_port_set" => quic_hint_port_set as *const c_void,
        "Cronet_QuicHint_port_get" => quic_hint_port_get as *const c_void,
        "Cronet_QuicHint_alternate_port_set" => quic_hint_alternate_port_set as *const c_void,
        "Cronet_QuicHint_alternate_port_get" => quic_hint_alternate_port_get as *const c_void,
        "Cronet_PublicKeyPins_Create" => public_key_pins_create as *const c_void,
        "Cronet_PublicKeyPins_Destroy" => public_key_pins_destroy as *const c_void,
        "Cronet_PublicKeyPins_host_set" => public_key_pins_host_set as *const c_void,
        "Cronet_PublicKeyPins_host_get" => public_key_pins_host_get as *const c_void,
        "Cronet_PublicKeyPins_pins_sha256_add" => public_key_pins_pins_sha256_add as *const c_void,
        "Cronet_PublicKeyPins_pins_sha256_size" => public_key_pins_pins_sha256_size as *const c_void,
        "Cronet_PublicKeyPins_pins_sha256_at" => public_key_pins_pins_sha256_at as *const c_void,
        "Cronet_PublicKeyPins_pins_sha256_clear" => public_key_pins_pins_sha256_clear as *const c_void,
        "Cronet_PublicKeyPins_include_subdomains_set" => public_key_pins_include_subdomains_set as *const c_void,
        "Cronet_PublicKeyPins_include_subdomains_get" => public_key_pins_include_subdomains_get as *const c_void,
        "Cronet_PublicKeyPins_expiration_date_set" => public_key_pins_expiration_date_set as *const c_void,
        "Cronet_PublicKeyPins_expiration_date_get" => public_key_pins_expiration_date_get as *const c_void,
        "Cronet_Engine_StartNetLogToFile" => engine_start_net_log_to_file as *const c_void,
        "Cronet_Engine_StopNetLog" => engine_stop_net_log as *const c_void,
        "Cronet_Engine_AddRequestFinishedListener" => engine_add_request_finished_listener as *const c_void,
        "Cronet_Engine_RemoveRequestFinishedListener" => engine_remove_request_finished_listener as *const c_void,
        "Cronet_Engine_GetStreamEngine" => engine_get_stream_engine as *const c_void,
        "Cronet_Buffer_InitWithDataAndCallback" => buffer_init_with_data_and_callback as *const c_void,
        "Cronet_Error_message_set" => error_message_set as *const c_void,
        "Cronet_Error_message_get" => error_message_get as *const c_void,
        "Cronet_HttpHeader_Create" => http_header_create as *const c_void,
        "Cronet_HttpHeader_Destroy" => http_header_destroy as *const c_void,
        "Cronet_HttpHeader_name_set" => http_header_name_set as *const c_void,
        "Cronet_HttpHeader_name_get" => http_header_name_get as *const c_void,
        "Cronet_HttpHeader_value_set" => http_header_value_set as *const c_void,
        "Cronet_HttpHeader_value_get" => http_header_value_get as *const c_void,
        "Cronet_UrlRequestParams_Create" => url_request_params_create as *const c_void,
        "Cronet_UrlRequestParams_Destroy" => url_request_params_destroy as *const c_void,
        "Cronet_UrlRequestParams_http_method_set" => url_request_params_http_method_set as *const c_void,
        "Cronet_UrlRequestParams_http_method_get" => url_request_params_http_method_get as *const c_void,
        "Cronet_UrlRequestParams_request_headers_add" => url_request_params_request_headers_add as *const c_void,
        "Cronet_UrlRequestParams_request_headers_size" => url_request_params_request_headers_size as *const c_void,
        "Cronet_UrlRequestParams_request_headers_at" => url_request_params_request_headers_at as *const c_void,
        "Cronet_UrlRequestParams_request_headers_clear" => url_request_params_request_headers_clear as *const c_void,
        "Cronet_UrlRequestParams_annotations_add" => url_request_params_annotations_add as *const c_void,
        "Cronet_UrlRequestParams_annotations_size" => url_request_params_annotations_size as *const c_void,
        "Cronet_UrlRequestParams_annotations_at" => url_request_params_annotations_at as *const c_void,
        "Cronet_UrlRequestParams_annotations_clear" => url_request_params_annotations_clear as *const c_void,
        "Cronet_UrlResponseInfo_Create" => url_response_info_create as *const c_void,
        "Cronet_UrlResponseInfo_Destroy" => url_response_info_destroy as *const c_void,
        "Cronet_UrlResponseInfo_url_chain_add" => url_response_info_url_chain_add as *const c_void,
        "Cronet_UrlResponseInfo_url_chain_size" => url_response_info_url_chain_size as *const c_void,
        "Cronet_UrlResponseInfo_url_chain_at" => url_response_info_url_chain_at as *const c_void,
        "Cronet_UrlResponseInfo_url_chain_clear" => url_response_info_url_chain_clear as *const c_void,
        "Cronet_UrlResponseInfo_http_status_text_set" => url_response_info_http_status_text_set as *const c_void,
        "Cronet_UrlResponseInfo_http_status_text_get" => url_response_info_http_status_text_get as *const c_void,
        "Cronet_UrlResponseInfo_all_headers_list_add" => url_response_info_all_headers_list_add as *const c_void,
        "Cronet_UrlResponseInfo_all_headers_list_size" => url_response_info_all_headers_list_size as *const c_void,
        "Cronet_UrlResponseInfo_all_headers_list_at" => url_response_info_all_headers_list_at as *const c_void,
        "Cronet_UrlResponseInfo_all_headers_list_clear" => url_response_info_all_headers_list_clear as *const c_void,
        "Cronet_Executor_CreateWith" => executor_create_with as *const c_void,
        "Cronet_Executor_Destroy" => executor_destroy as *const c_void,
        "Cronet_Executor_Execute" => executor_execute as *const c_void,
        "Cronet_Runnable_CreateWith" => runnable_create_with as *const c_void,
        "Cronet_Runnable_Destroy" => runnable_destroy as *const c_void,
        "Cronet_Runnable_Run" => runnable_run as *const c_void,
        "Cronet_BufferCallback_CreateWith" => buffer_callback_create_with as *const c_void,
        "Cronet_BufferCallback_Destroy" => buffer_callback_destroy as *const c_void,
        "Cronet_UrlRequestCallback_CreateWith" => url_request_callback_create_with as *const c_void,
        "Cronet_UrlRequestCallback_Destroy" => url_request_callback_destroy as *const c_void,
        "Cronet_UrlRequestStatusListener_CreateWith" => url_request_status_listener_create_with as *const c_void,
        "Cronet_UrlRequestStatusListener_Destroy" => url_request_status_listener_destroy as *const c_void,
        "Cronet_RequestFinishedInfoListener_CreateWith" => request_finished_info_listener_create_with as *const c_void,
        "Cronet_RequestFinishedInfoListener_Destroy" => request_finished_info_listener_destroy as *const c_void,
        "Cronet_UrlRequest_Create" => url_request_create as *const c_void,
        "Cronet_UrlRequest_Destroy" => url_request_destroy as *const c_void,
        "Cronet_UrlRequest_InitWithParams" => url_request_init_with_params as *const c_void,
        "Cronet_UrlRequest_Start" => url_request_start as *const c_void,
        "Cronet_UrlRequest_FollowRedirect" => url_request_follow_redirect as *const c_void,
        "Cronet_UrlRequest_Cancel" => url_request_cancel as *const c_void,
        "Cronet_UrlRequest_IsDone" => url_request_is_done as *const c_void,
        "Cronet_UrlRequest_GetStatus" => url_request_get_status as *const c_void,
        "Cronet_UploadDataProvider_CreateWith" => upload_data_provider_create_with as *const c_void,
        "Cronet_UploadDataProvider_Destroy" => upload_data_provider_destroy as *const c_void,
        "Cronet_UploadDataSink_Destroy" => upload_data_sink_destroy as *const c_void,
        "Cronet_UploadDataSink_OnReadSucceeded" => upload_data_sink_on_read_succeeded as *const c_void,
        "Cronet_UploadDataSink_OnReadError" => upload_data_sink_on_read_error as *const c_void,
        "Cronet_UploadDataSink_OnRewindSucceeded" => upload_data_sink_on_rewind_succeeded as *const c_void,
        "Cronet_UploadDataSink_OnRewindError" => upload_data_sink_on_rewind_error as *const c_void,
        "bidirectional_stream_create" => bidirectional_stream_create as *const c_void,
        "bidirectional_stream_destroy" => bidirectional_stream_destroy as *const c_void,
        "bidirectional_stream_start" => bidirectional_stream_start as *const c_void,
        "bidirectional_stream_write" => bidirectional_stream_write as *const c_void,
        "bidirectional_stream_cancel" => bidirectional_stream_cancel as *const c_void,
        _ => return None,
    };
    Some(address)
}

/// Symbol source over the fake, optionally hiding one symbol
pub struct FakeCronet {
    pub missing: Option<&'static str>,
}

impl SymbolSource for FakeCronet {
    fn symbol_address(&self, name: &str) -> Option<*const c_void> {
        if Some(name) == self.missing {
            return None;
        }
        implemented(name).or_else(|| symbol_group(name).map(|_| not_implemented as *const c_void))
    }
}

/// A `Cronet` bound to its own guard, already loaded from the fake
pub fn fake_cronet(missing: Option<&'static str>) -> Cronet {
    let guard = Arc::new(LoadGuard::new(LibraryLocator::new()));
    let _ = guard.load_with(|| NativeLibrary::resolve("fake-cronet", &FakeCronet { missing }));
    Cronet::with_guard(guard)
}
