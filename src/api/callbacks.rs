//! Rust Callback Handlers
//!
//! Native objects that call back into the caller can be created from a Rust
//! closure or handler trait instead of a raw `extern "C"` function. Each
//! object kind has one process-wide registry keyed by the native object's
//! address, and one `extern "C"` trampoline per native entry point that looks
//! the handler up and calls it.
//!
//! # Lifecycle
//!
//! ```text
//! *_create(handler) ──► native CreateWith(trampolines) ──► registry.insert(addr)
//!       │
//!       ▼
//! native callback ──► trampoline ──► registry lookup ──► handler
//!       │
//!       ▼
//! *_destroy ──► mark destroyed ──► native Destroy ──► registry.remove(addr)
//! ```
//!
//! A callback that arrives for a destroyed or unknown address is dropped
//! silently; the native library may still deliver one while a destroy is in
//! flight. One-shot callbacks (runnable run, buffer release, status, and the
//! terminal request and stream callbacks) drop their entry after running.
//!
//! Handlers run on whatever thread the native library calls from. A panic in
//! a handler is not caught: unwinding out of an `extern "C"` trampoline aborts
//! the process.

use std::collections::HashMap;
use std::ffi::c_char;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use once_cell::sync::Lazy;
use parking_lot::RwLock;

use super::stream::read_header_array;
use super::{Cronet, NetError, RequestStatus};
use crate::ffi::marshal::read_c_string;
use crate::ffi::{
    BidirectionalStreamCallback, BidirectionalStreamHandle, BidirectionalStreamHeaderArray,
    BufferCallbackHandle, BufferHandle, ClientContext, ErrorHandle, ExecutorHandle,
    RequestFinishedInfoHandle, RequestFinishedInfoListenerHandle, RunnableHandle,
    StreamEngineHandle, UploadDataProviderHandle, UploadDataSinkHandle, UrlRequestCallbackHandle,
    UrlRequestHandle, UrlRequestStatusListenerHandle, UrlResponseInfoHandle,
};

// =============================================================================
// Handler types
// =============================================================================

/// Executor body: decide where (and when) to run `runnable`.
///
/// The executor owns `runnable` and must run and then destroy it, or just
/// destroy it when shutting down.
pub type ExecuteHandler = dyn Fn(ExecutorHandle, RunnableHandle) + Send + Sync;

/// Runnable body, called at most once
pub type RunHandler = dyn Fn(RunnableHandle) + Send + Sync;

/// Called once the native buffer no longer references the caller's memory
pub type BufferReleaseHandler = dyn Fn(BufferCallbackHandle, BufferHandle) + Send + Sync;

/// Status listener body, called at most once
pub type StatusHandler = dyn Fn(UrlRequestStatusListenerHandle, RequestStatus) + Send + Sync;

/// Request-finished listener body
pub type RequestFinishedHandler = dyn Fn(
        RequestFinishedInfoListenerHandle,
        RequestFinishedInfoHandle,
        UrlResponseInfoHandle,
        ErrorHandle,
    ) + Send
    + Sync;

/// Receives the events of one URL request.
///
/// Exactly one of `on_succeeded`, `on_failed` or `on_canceled` ends the
/// request; nothing is delivered to the handler afterwards.
pub trait UrlRequestCallbackHandler: Send + Sync {
    /// A redirect to `new_location` was received; call
    /// `url_request_follow_redirect` or `url_request_cancel`
    fn on_redirect_received(
        &self,
        callback: UrlRequestCallbackHandle,
        request: UrlRequestHandle,
        info: UrlResponseInfoHandle,
        new_location: &str,
    );

    /// Final headers are in; start reading the body with `url_request_read`
    fn on_response_started(
        &self,
        callback: UrlRequestCallbackHandle,
        request: UrlRequestHandle,
        info: UrlResponseInfoHandle,
    );

    /// `bytes_read` bytes of body are in `buffer`, which is the caller's again
    fn on_read_completed(
        &self,
        callback: UrlRequestCallbackHandle,
        request: UrlRequestHandle,
        info: UrlResponseInfoHandle,
        buffer: BufferHandle,
        bytes_read: u64,
    );

    fn on_succeeded(
        &self,
        callback: UrlRequestCallbackHandle,
        request: UrlRequestHandle,
        info: UrlResponseInfoHandle,
    );

    /// `info` may be null if no response was received
    fn on_failed(
        &self,
        callback: UrlRequestCallbackHandle,
        request: UrlRequestHandle,
        info: UrlResponseInfoHandle,
        error: ErrorHandle,
    );

    fn on_canceled(
        &self,
        callback: UrlRequestCallbackHandle,
        request: UrlRequestHandle,
        info: UrlResponseInfoHandle,
    );
}

/// Supplies a request body.
///
/// Every `read` must be answered with exactly one of
/// `upload_data_sink_on_read_succeeded` / `upload_data_sink_on_read_error`,
/// and every `rewind` with `upload_data_sink_on_rewind_succeeded` /
/// `upload_data_sink_on_rewind_error`, synchronously or later.
pub trait UploadDataProviderHandler: Send + Sync {
    /// Body length in bytes, or -1 for a chunked upload
    fn length(&self, provider: UploadDataProviderHandle) -> i64;

    /// Fill `buffer` with the next part of the body
    fn read(
        &self,
        provider: UploadDataProviderHandle,
        sink: UploadDataSinkHandle,
        buffer: BufferHandle,
    );

    /// Restart the body from the beginning
    fn rewind(&self, provider: UploadDataProviderHandle, sink: UploadDataSinkHandle);

    /// The request no longer needs the provider
    fn close(&self, provider: UploadDataProviderHandle);
}

/// Receives the events of one bidirectional stream.
///
/// `on_succeeded`, `on_failed` and `on_canceled` are terminal.
pub trait BidirectionalStreamHandler: Send + Sync {
    /// Headers were sent; reads and writes may start
    fn on_stream_ready(&self, stream: BidirectionalStreamHandle);

    fn on_response_headers_received(
        &self,
        stream: BidirectionalStreamHandle,
        headers: Vec<(String, String)>,
        negotiated_protocol: &str,
    );

    /// `bytes_read` bytes were written to the buffer passed to
    /// `bidirectional_stream_read`; 0 means end of stream
    fn on_read_completed(&self, stream: BidirectionalStreamHandle, data: *mut c_char, bytes_read: i32);

    /// The buffer passed to `bidirectional_stream_write` is the caller's again
    fn on_write_completed(&self, stream: BidirectionalStreamHandle, data: *const c_char);

    fn on_response_trailers_received(
        &self,
        stream: BidirectionalStreamHandle,
        trailers: Vec<(String, String)>,
    );

    fn on_succeeded(&self, stream: BidirectionalStreamHandle);

    fn on_failed(&self, stream: BidirectionalStreamHandle, error: NetError);

    fn on_canceled(&self, stream: BidirectionalStreamHandle);
}

// =============================================================================
// Registry
// =============================================================================

struct Entry<H: ?Sized> {
    destroyed: AtomicBool,
    handler: Box<H>,
}

/// Handlers of one object kind, keyed by native address.
pub(crate) struct Registry<H: ?Sized> {
    entries: RwLock<HashMap<usize, Arc<Entry<H>>>>,
}

impl<H: ?Sized> Registry<H> {
    fn new() -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
        }
    }

    fn insert(&self, addr: usize, handler: Box<H>) {
        let entry = Arc::new(Entry {
            destroyed: AtomicBool::new(false),
            handler,
        });
        self.entries.write().insert(addr, entry);
    }

    /// Entry for `addr` unless it is unknown or being destroyed
    fn live(&self, addr: usize) -> Option<Arc<Entry<H>>> {
        let entry = self.entries.read().get(&addr).cloned()?;
        (!entry.destroyed.load(Ordering::Acquire)).then_some(entry)
    }

    /// Drop `entry` if it is still the one registered for `addr`.
    ///
    /// The native address may already belong to a newer object.
    fn retire(&self, addr: usize, entry: &Arc<Entry<H>>) {
        let mut entries = self.entries.write();
        if entries.get(&addr).is_some_and(|current| Arc::ptr_eq(current, entry)) {
            entries.remove(&addr);
        }
    }

    /// Run a one-shot callback and retire its entry
    fn dispatch_once(&self, addr: usize, call: impl FnOnce(&H)) {
        let Some(entry) = self.live(addr) else {
            return;
        };
        call(&entry.handler);
        self.retire(addr, &entry);
    }

    /// Run a callback if `addr` has a live entry
    fn dispatch(&self, addr: usize, call: impl FnOnce(&H)) {
        if let Some(entry) = self.live(addr) {
            call(&entry.handler);
        }
    }

    /// Mark `addr` destroyed, run the native destroy, then drop the entry
    pub(crate) fn destroy(&self, addr: usize, native_destroy: impl FnOnce()) {
        let entry = self.entries.read().get(&addr).cloned();
        if let Some(entry) = &entry {
            entry.destroyed.store(true, Ordering::Release);
        }
        native_destroy();
        if let Some(entry) = &entry {
            self.retire(addr, entry);
        }
    }

    #[cfg(test)]
    fn contains(&self, addr: usize) -> bool {
        self.entries.read().contains_key(&addr)
    }
}

pub(crate) static EXECUTORS: Lazy<Registry<ExecuteHandler>> = Lazy::new(Registry::new);
pub(crate) static RUNNABLES: Lazy<Registry<RunHandler>> = Lazy::new(Registry::new);
pub(crate) static BUFFER_CALLBACKS: Lazy<Registry<BufferReleaseHandler>> = Lazy::new(Registry::new);
pub(crate) static REQUEST_CALLBACKS: Lazy<Registry<dyn UrlRequestCallbackHandler>> =
    Lazy::new(Registry::new);
pub(crate) static STATUS_LISTENERS: Lazy<Registry<StatusHandler>> = Lazy::new(Registry::new);
pub(crate) static UPLOAD_PROVIDERS: Lazy<Registry<dyn UploadDataProviderHandler>> =
    Lazy::new(Registry::new);
pub(crate) static FINISHED_LISTENERS: Lazy<Registry<RequestFinishedHandler>> =
    Lazy::new(Registry::new);
pub(crate) static STREAMS: Lazy<Registry<dyn BidirectionalStreamHandler>> =
    Lazy::new(Registry::new);

// =============================================================================
// Trampolines
// =============================================================================

unsafe extern "C" fn execute_trampoline(executor: ExecutorHandle, runnable: RunnableHandle) {
    EXECUTORS.dispatch(executor.addr(), |execute| execute(executor, runnable));
}

unsafe extern "C" fn run_trampoline(runnable: RunnableHandle) {
    RUNNABLES.dispatch_once(runnable.addr(), |run| run(runnable));
}

unsafe extern "C" fn buffer_release_trampoline(callback: BufferCallbackHandle, buffer: BufferHandle) {
    BUFFER_CALLBACKS.dispatch_once(callback.addr(), |release| release(callback, buffer));
}

unsafe extern "C" fn status_trampoline(listener: UrlRequestStatusListenerHandle, status: i32) {
    STATUS_LISTENERS.dispatch_once(listener.addr(), |on_status| {
        on_status(listener, RequestStatus::from_raw(status))
    });
}

unsafe extern "C" fn request_finished_trampoline(
    listener: RequestFinishedInfoListenerHandle,
    info: RequestFinishedInfoHandle,
    response: UrlResponseInfoHandle,
    error: ErrorHandle,
) {
    FINISHED_LISTENERS.dispatch(listener.addr(), |on_finished| {
        on_finished(listener, info, response, error)
    });
}

unsafe extern "C" fn redirect_received_trampoline(
    callback: UrlRequestCallbackHandle,
    request: UrlRequestHandle,
    info: UrlResponseInfoHandle,
    new_location: *const c_char,
) {
    let new_location = read_c_string(new_location);
    REQUEST_CALLBACKS.dispatch(callback.addr(), |handler| {
        handler.on_redirect_received(callback, request, info, &new_location)
    });
}

unsafe extern "C" fn response_started_trampoline(
    callback: UrlRequestCallbackHandle,
    request: UrlRequestHandle,
    info: UrlResponseInfoHandle,
) {
    REQUEST_CALLBACKS.dispatch(callback.addr(), |handler| {
        handler.on_response_started(callback, request, info)
    });
}

unsafe extern "C" fn read_completed_trampoline(
    callback: UrlRequestCallbackHandle,
    request: UrlRequestHandle,
    info: UrlResponseInfoHandle,
    buffer: BufferHandle,
    bytes_read: u64,
) {
    REQUEST_CALLBACKS.dispatch(callback.addr(), |handler| {
        handler.on_read_completed(callback, request, info, buffer, bytes_read)
    });
}

unsafe extern "C" fn succeeded_trampoline(
    callback: UrlRequestCallbackHandle,
    request: UrlRequestHandle,
    info: UrlResponseInfoHandle,
) {
    REQUEST_CALLBACKS.dispatch_once(callback.addr(), |handler| {
        handler.on_succeeded(callback, request, info)
    });
}

unsafe extern "C" fn failed_trampoline(
    callback: UrlRequestCallbackHandle,
    request: UrlRequestHandle,
    info: UrlResponseInfoHandle,
    error: ErrorHandle,
) {
    REQUEST_CALLBACKS.dispatch_once(callback.addr(), |handler| {
        handler.on_failed(callback, request, info, error)
    });
}

unsafe extern "C" fn canceled_trampoline(
    callback: UrlRequestCallbackHandle,
    request: UrlRequestHandle,
    info: UrlResponseInfoHandle,
) {
    REQUEST_CALLBACKS.dispatch_once(callback.addr(), |handler| {
        handler.on_canceled(callback, request, info)
    });
}

unsafe extern "C" fn upload_length_trampoline(provider: UploadDataProviderHandle) -> i64 {
    let mut length = 0;
    UPLOAD_PROVIDERS.dispatch(provider.addr(), |handler| length = handler.length(provider));
    length
}

unsafe extern "C" fn upload_read_trampoline(
    provider: UploadDataProviderHandle,
    sink: UploadDataSinkHandle,
    buffer: BufferHandle,
) {
    UPLOAD_PROVIDERS.dispatch(provider.addr(), |handler| handler.read(provider, sink, buffer));
}

unsafe extern "C" fn upload_rewind_trampoline(
    provider: UploadDataProviderHandle,
    sink: UploadDataSinkHandle,
) {
    UPLOAD_PROVIDERS.dispatch(provider.addr(), |handler| handler.rewind(provider, sink));
}

unsafe extern "C" fn upload_close_trampoline(provider: UploadDataProviderHandle) {
    UPLOAD_PROVIDERS.dispatch(provider.addr(), |handler| handler.close(provider));
}

unsafe extern "C" fn stream_ready_trampoline(stream: BidirectionalStreamHandle) {
    STREAMS.dispatch(stream.addr(), |handler| handler.on_stream_ready(stream));
}

unsafe extern "C" fn stream_headers_trampoline(
    stream: BidirectionalStreamHandle,
    headers: *const BidirectionalStreamHeaderArray,
    negotiated_protocol: *const c_char,
) {
    let headers = read_header_array(headers);
    let protocol = read_c_string(negotiated_protocol);
    STREAMS.dispatch(stream.addr(), |handler| {
        handler.on_response_headers_received(stream, headers, &protocol)
    });
}

unsafe extern "C" fn stream_read_trampoline(
    stream: BidirectionalStreamHandle,
    data: *mut c_char,
    bytes_read: i32,
) {
    STREAMS.dispatch(stream.addr(), |handler| {
        handler.on_read_completed(stream, data, bytes_read)
    });
}

unsafe extern "C" fn stream_write_trampoline(stream: BidirectionalStreamHandle, data: *const c_char) {
    STREAMS.dispatch(stream.addr(), |handler| handler.on_write_completed(stream, data));
}

unsafe extern "C" fn stream_trailers_trampoline(
    stream: BidirectionalStreamHandle,
    trailers: *const BidirectionalStreamHeaderArray,
) {
    let trailers = read_header_array(trailers);
    STREAMS.dispatch(stream.addr(), |handler| {
        handler.on_response_trailers_received(stream, trailers)
    });
}

unsafe extern "C" fn stream_succeeded_trampoline(stream: BidirectionalStreamHandle) {
    STREAMS.dispatch_once(stream.addr(), |handler| handler.on_succeeded(stream));
}

unsafe extern "C" fn stream_failed_trampoline(stream: BidirectionalStreamHandle, error: i32) {
    STREAMS.dispatch_once(stream.addr(), |handler| {
        handler.on_failed(stream, NetError::from_raw(error))
    });
}

unsafe extern "C" fn stream_canceled_trampoline(stream: BidirectionalStreamHandle) {
    STREAMS.dispatch_once(stream.addr(), |handler| handler.on_canceled(stream));
}

/// Callback struct shared by every handler-backed stream
static STREAM_TRAMPOLINES: BidirectionalStreamCallback = BidirectionalStreamCallback {
    on_stream_ready: Some(stream_ready_trampoline),
    on_response_headers_received: Some(stream_headers_trampoline),
    on_read_completed: Some(stream_read_trampoline),
    on_write_completed: Some(stream_write_trampoline),
    on_response_trailers_received: Some(stream_trailers_trampoline),
    on_succeeded: Some(stream_succeeded_trampoline),
    on_failed: Some(stream_failed_trampoline),
    on_canceled: Some(stream_canceled_trampoline),
};

// =============================================================================
// Handler-backed constructors
// =============================================================================

impl Cronet {
    /// Executor that hands every runnable to `execute`
    pub fn executor_create(
        &self,
        execute: impl Fn(ExecutorHandle, RunnableHandle) + Send + Sync + 'static,
    ) -> ExecutorHandle {
        let executor = self.executor_create_with(execute_trampoline);
        if !executor.is_null() {
            EXECUTORS.insert(executor.addr(), Box::new(execute));
        }
        executor
    }

    /// Runnable that calls `run` the first time it is run
    pub fn runnable_create(
        &self,
        run: impl Fn(RunnableHandle) + Send + Sync + 'static,
    ) -> RunnableHandle {
        let runnable = self.runnable_create_with(run_trampoline);
        if !runnable.is_null() {
            RUNNABLES.insert(runnable.addr(), Box::new(run));
        }
        runnable
    }

    /// Buffer callback that calls `on_release` once its buffer is destroyed
    pub fn buffer_callback_create(
        &self,
        on_release: impl Fn(BufferCallbackHandle, BufferHandle) + Send + Sync + 'static,
    ) -> BufferCallbackHandle {
        let callback = self.buffer_callback_create_with(buffer_release_trampoline);
        if !callback.is_null() {
            BUFFER_CALLBACKS.insert(callback.addr(), Box::new(on_release));
        }
        callback
    }

    /// Request callback delivering events to `handler`
    pub fn url_request_callback_create(
        &self,
        handler: impl UrlRequestCallbackHandler + 'static,
    ) -> UrlRequestCallbackHandle {
        let callback = self.url_request_callback_create_with(super::UrlRequestCallbackFns {
            on_redirect_received: redirect_received_trampoline,
            on_response_started: response_started_trampoline,
            on_read_completed: read_completed_trampoline,
            on_succeeded: succeeded_trampoline,
            on_failed: failed_trampoline,
            on_canceled: canceled_trampoline,
        });
        if !callback.is_null() {
            REQUEST_CALLBACKS.insert(callback.addr(), Box::new(handler));
        }
        callback
    }

    /// Status listener that calls `on_status` for the first status reported
    pub fn url_request_status_listener_create(
        &self,
        on_status: impl Fn(UrlRequestStatusListenerHandle, RequestStatus) + Send + Sync + 'static,
    ) -> UrlRequestStatusListenerHandle {
        let listener = self.url_request_status_listener_create_with(status_trampoline);
        if !listener.is_null() {
            STATUS_LISTENERS.insert(listener.addr(), Box::new(on_status));
        }
        listener
    }

    /// Upload provider backed by `handler`
    pub fn upload_data_provider_create(
        &self,
        handler: impl UploadDataProviderHandler + 'static,
    ) -> UploadDataProviderHandle {
        let provider = self.upload_data_provider_create_with(super::UploadDataProviderFns {
            get_length: upload_length_trampoline,
            read: upload_read_trampoline,
            rewind: upload_rewind_trampoline,
            close: upload_close_trampoline,
        });
        if !provider.is_null() {
            UPLOAD_PROVIDERS.insert(provider.addr(), Box::new(handler));
        }
        provider
    }

    /// Request-finished listener that calls `on_finished` for every report
    pub fn request_finished_info_listener_create(
        &self,
        on_finished: impl Fn(
                RequestFinishedInfoListenerHandle,
                RequestFinishedInfoHandle,
                UrlResponseInfoHandle,
                ErrorHandle,
            ) + Send
            + Sync
            + 'static,
    ) -> RequestFinishedInfoListenerHandle {
        let listener = self.request_finished_info_listener_create_with(request_finished_trampoline);
        if !listener.is_null() {
            FINISHED_LISTENERS.insert(listener.addr(), Box::new(on_finished));
        }
        listener
    }

    /// Stream on `engine` delivering events to `handler`
    pub fn bidirectional_stream_create_with_handler(
        &self,
        engine: StreamEngineHandle,
        annotation: ClientContext,
        handler: impl BidirectionalStreamHandler + 'static,
    ) -> BidirectionalStreamHandle {
        let stream = self.bidirectional_stream_create(engine, annotation, &STREAM_TRAMPOLINES);
        if !stream.is_null() {
            STREAMS.insert(stream.addr(), Box::new(handler));
        }
        stream
    }
}
