//! URL requests, their parameters, callbacks and status listeners
//!
//! A request moves through `Created → InitWithParams → Start → (Read |
//! FollowRedirect)* → Succeeded | Failed | Canceled → Destroy`. The order is
//! the caller's responsibility; out-of-order calls return a non-success
//! [`ResultCode`] or abort inside the library, depending on
//! `enable_check_result`.

use super::callbacks::{REQUEST_CALLBACKS, STATUS_LISTENERS};
use super::{Cronet, Idempotency, RequestPriority, ResultCode};
use crate::ffi::marshal::{read_c_string, with_c_str};
use crate::ffi::symbols::{
    OnCanceledFn, OnFailedFn, OnReadCompletedFn, OnRedirectReceivedFn, OnResponseStartedFn,
    OnStatusFn, OnSucceededFn,
};
use crate::ffi::{
    BufferHandle, ClientContext, EngineHandle, ExecutorHandle, HttpHeaderHandle,
    RequestFinishedInfoListenerHandle, UploadDataProviderHandle, UrlRequestCallbackHandle,
    UrlRequestHandle, UrlRequestParamsHandle, UrlRequestStatusListenerHandle,
};

/// The six `Cronet_UrlRequestCallback` entry points
#[derive(Debug, Clone, Copy)]
pub struct UrlRequestCallbackFns {
    pub on_redirect_received: OnRedirectReceivedFn,
    pub on_response_started: OnResponseStartedFn,
    pub on_read_completed: OnReadCompletedFn,
    pub on_succeeded: OnSucceededFn,
    pub on_failed: OnFailedFn,
    pub on_canceled: OnCanceledFn,
}

impl Cronet {
    /// Create a request
    pub fn url_request_create(&self) -> UrlRequestHandle {
        unsafe { (self.sym().url_request_create)() }
    }

    /// Destroy the request
    pub fn url_request_destroy(&self, request: UrlRequestHandle) {
        unsafe { (self.sym().url_request_destroy)(request) }
    }

    /// Attach caller data to the request
    pub fn url_request_set_client_context(&self, request: UrlRequestHandle, context: ClientContext) {
        unsafe { (self.sym().url_request_set_client_context)(request, context) }
    }

    /// Caller data attached to the request
    pub fn url_request_get_client_context(&self, request: UrlRequestHandle) -> ClientContext {
        unsafe { (self.sym().url_request_get_client_context)(request) }
    }

    /// Bind `request` to `engine`, `url` and `params`. Callbacks run on
    /// `executor`.
    pub fn url_request_init_with_params(
        &self,
        request: UrlRequestHandle,
        engine: EngineHandle,
        url: &str,
        params: UrlRequestParamsHandle,
        callback: UrlRequestCallbackHandle,
        executor: ExecutorHandle,
    ) -> ResultCode {
        let slot = self.sym().url_request_init_with_params;
        let code = with_c_str(url, |url| unsafe {
            slot(request, engine, url, params, callback, executor)
        });
        ResultCode::from_raw(code)
    }

    /// Start the request; events follow on the callback
    pub fn url_request_start(&self, request: UrlRequestHandle) -> ResultCode {
        ResultCode::from_raw(unsafe { (self.sym().url_request_start)(request) })
    }

    /// Continue after `OnRedirectReceived`
    pub fn url_request_follow_redirect(&self, request: UrlRequestHandle) -> ResultCode {
        ResultCode::from_raw(unsafe { (self.sym().url_request_follow_redirect)(request) })
    }

    /// Read the next chunk of the body into `buffer`. Ownership of `buffer`
    /// passes to the library until `OnReadCompleted` hands it back.
    pub fn url_request_read(&self, request: UrlRequestHandle, buffer: BufferHandle) -> ResultCode {
        ResultCode::from_raw(unsafe { (self.sym().url_request_read)(request, buffer) })
    }

    /// Cancel the request; `OnCanceled` follows unless it already finished
    pub fn url_request_cancel(&self, request: UrlRequestHandle) {
        unsafe { (self.sym().url_request_cancel)(request) }
    }

    /// Whether the request has succeeded, failed or been canceled
    pub fn url_request_is_done(&self, request: UrlRequestHandle) -> bool {
        unsafe { (self.sym().url_request_is_done)(request) }
    }

    /// Ask for the current load status; answered through `listener`
    pub fn url_request_get_status(
        &self,
        request: UrlRequestHandle,
        listener: UrlRequestStatusListenerHandle,
    ) {
        unsafe { (self.sym().url_request_get_status)(request, listener) }
    }

    // -------------------------------------------------------------------------
    // UrlRequestParams
    // -------------------------------------------------------------------------

    /// Create a request params
    pub fn url_request_params_create(&self) -> UrlRequestParamsHandle {
        unsafe { (self.sym().url_request_params_create)() }
    }

    /// Destroy the request params
    pub fn url_request_params_destroy(&self, params: UrlRequestParamsHandle) {
        unsafe { (self.sym().url_request_params_destroy)(params) }
    }

    /// Set the HTTP method
    pub fn url_request_params_http_method_set(&self, params: UrlRequestParamsHandle, method: &str) {
        let slot = self.sym().url_request_params_http_method_set;
        with_c_str(method, |text| unsafe { slot(params, text) })
    }

    /// Current HTTP method
    pub fn url_request_params_http_method_get(&self, params: UrlRequestParamsHandle) -> String {
        unsafe { read_c_string((self.sym().url_request_params_http_method_get)(params)) }
    }

    /// Append a copy of `header`
    pub fn url_request_params_request_headers_add(
        &self,
        params: UrlRequestParamsHandle,
        header: HttpHeaderHandle,
    ) {
        unsafe { (self.sym().url_request_params_request_headers_add)(params, header) }
    }

    /// Number of request headers
    pub fn url_request_params_request_headers_size(&self, params: UrlRequestParamsHandle) -> u32 {
        unsafe { (self.sym().url_request_params_request_headers_size)(params) }
    }

    /// Request header at `index`, owned by `params`
    pub fn url_request_params_request_headers_at(
        &self,
        params: UrlRequestParamsHandle,
        index: u32,
    ) -> HttpHeaderHandle {
        unsafe { (self.sym().url_request_params_request_headers_at)(params, index) }
    }

    /// Remove every request header
    pub fn url_request_params_request_headers_clear(&self, params: UrlRequestParamsHandle) {
        unsafe { (self.sym().url_request_params_request_headers_clear)(params) }
    }

    /// Bypass the HTTP cache for this request
    pub fn url_request_params_disable_cache_set(&self, params: UrlRequestParamsHandle, disable: bool) {
        unsafe { (self.sym().url_request_params_disable_cache_set)(params, disable) }
    }

    /// Whether the HTTP cache is bypassed
    pub fn url_request_params_disable_cache_get(&self, params: UrlRequestParamsHandle) -> bool {
        unsafe { (self.sym().url_request_params_disable_cache_get)(params) }
    }

    /// Set the request priority
    pub fn url_request_params_priority_set(
        &self,
        params: UrlRequestParamsHandle,
        priority: RequestPriority,
    ) {
        unsafe { (self.sym().url_request_params_priority_set)(params, priority.raw()) }
    }

    /// Request priority
    pub fn url_request_params_priority_get(&self, params: UrlRequestParamsHandle) -> RequestPriority {
        RequestPriority::from_raw(unsafe { (self.sym().url_request_params_priority_get)(params) })
    }

    /// Set the upload data provider
    pub fn url_request_params_upload_data_provider_set(
        &self,
        params: UrlRequestParamsHandle,
        provider: UploadDataProviderHandle,
    ) {
        unsafe { (self.sym().url_request_params_upload_data_provider_set)(params, provider) }
    }

    /// Current upload data provider
    pub fn url_request_params_upload_data_provider_get(
        &self,
        params: UrlRequestParamsHandle,
    ) -> UploadDataProviderHandle {
        unsafe { (self.sym().url_request_params_upload_data_provider_get)(params) }
    }

    /// Set the upload data provider executor
    pub fn url_request_params_upload_data_provider_executor_set(
        &self,
        params: UrlRequestParamsHandle,
        executor: ExecutorHandle,
    ) {
        unsafe { (self.sym().url_request_params_upload_data_provider_executor_set)(params, executor) }
    }

    /// Current upload data provider executor
    pub fn url_request_params_upload_data_provider_executor_get(
        &self,
        params: UrlRequestParamsHandle,
    ) -> ExecutorHandle {
        unsafe { (self.sym().url_request_params_upload_data_provider_executor_get)(params) }
    }

    /// Allow callbacks to run inline on the network thread
    pub fn url_request_params_allow_direct_executor_set(
        &self,
        params: UrlRequestParamsHandle,
        allow: bool,
    ) {
        unsafe { (self.sym().url_request_params_allow_direct_executor_set)(params, allow) }
    }

    /// Whether callbacks may run on the network thread
    pub fn url_request_params_allow_direct_executor_get(&self, params: UrlRequestParamsHandle) -> bool {
        unsafe { (self.sym().url_request_params_allow_direct_executor_get)(params) }
    }

    /// Attach an opaque annotation, reported back in `RequestFinishedInfo`
    pub fn url_request_params_annotations_add(
        &self,
        params: UrlRequestParamsHandle,
        annotation: ClientContext,
    ) {
        unsafe { (self.sym().url_request_params_annotations_add)(params, annotation) }
    }

    /// Number of annotations
    pub fn url_request_params_annotations_size(&self, params: UrlRequestParamsHandle) -> u32 {
        unsafe { (self.sym().url_request_params_annotations_size)(params) }
    }

    /// Annotation at `index`
    pub fn url_request_params_annotations_at(
        &self,
        params: UrlRequestParamsHandle,
        index: u32,
    ) -> ClientContext {
        unsafe { (self.sym().url_request_params_annotations_at)(params, index) }
    }

    /// Remove every annotation
    pub fn url_request_params_annotations_clear(&self, params: UrlRequestParamsHandle) {
        unsafe { (self.sym().url_request_params_annotations_clear)(params) }
    }

    /// Listener told when this request finishes
    pub fn url_request_params_request_finished_listener_set(
        &self,
        params: UrlRequestParamsHandle,
        listener: RequestFinishedInfoListenerHandle,
    ) {
        unsafe { (self.sym().url_request_params_request_finished_listener_set)(params, listener) }
    }

    /// Listener told when this request finishes
    pub fn url_request_params_request_finished_listener_get(
        &self,
        params: UrlRequestParamsHandle,
    ) -> RequestFinishedInfoListenerHandle {
        unsafe { (self.sym().url_request_params_request_finished_listener_get)(params) }
    }

    /// Executor the request-finished listener runs on
    pub fn url_request_params_request_finished_executor_set(
        &self,
        params: UrlRequestParamsHandle,
        executor: ExecutorHandle,
    ) {
        unsafe { (self.sym().url_request_params_request_finished_executor_set)(params, executor) }
    }

    /// Executor the request-finished listener runs on
    pub fn url_request_params_request_finished_executor_get(
        &self,
        params: UrlRequestParamsHandle,
    ) -> ExecutorHandle {
        unsafe { (self.sym().url_request_params_request_finished_executor_get)(params) }
    }

    /// Set the idempotency
    pub fn url_request_params_idempotency_set(
        &self,
        params: UrlRequestParamsHandle,
        idempotency: Idempotency,
    ) {
        unsafe { (self.sym().url_request_params_idempotency_set)(params, idempotency.raw()) }
    }

    /// Current idempotency
    pub fn url_request_params_idempotency_get(&self, params: UrlRequestParamsHandle) -> Idempotency {
        Idempotency::from_raw(unsafe { (self.sym().url_request_params_idempotency_get)(params) })
    }

    // -------------------------------------------------------------------------
    // UrlRequestCallback
    // -------------------------------------------------------------------------

    /// Request callback calling the six raw functions in `fns`
    pub fn url_request_callback_create_with(
        &self,
        fns: UrlRequestCallbackFns,
    ) -> UrlRequestCallbackHandle {
        unsafe {
            (self.sym().url_request_callback_create_with)(
                fns.on_redirect_received,
                fns.on_response_started,
                fns.on_read_completed,
                fns.on_succeeded,
                fns.on_failed,
                fns.on_canceled,
            )
        }
    }

    /// Destroy `callback`; its handler, if any, gets no further events
    pub fn url_request_callback_destroy(&self, callback: UrlRequestCallbackHandle) {
        let slot = self.sym().url_request_callback_destroy;
        REQUEST_CALLBACKS.destroy(callback.addr(), || unsafe { slot(callback) })
    }

    /// Attach caller data to the request callback
    pub fn url_request_callback_set_client_context(
        &self,
        callback: UrlRequestCallbackHandle,
        context: ClientContext,
    ) {
        unsafe { (self.sym().url_request_callback_set_client_context)(callback, context) }
    }

    /// Caller data attached to the request callback
    pub fn url_request_callback_get_client_context(
        &self,
        callback: UrlRequestCallbackHandle,
    ) -> ClientContext {
        unsafe { (self.sym().url_request_callback_get_client_context)(callback) }
    }

    // -------------------------------------------------------------------------
    // UrlRequestStatusListener
    // -------------------------------------------------------------------------

    /// `on_status` receives a raw [`super::RequestStatus`] value
    pub fn url_request_status_listener_create_with(
        &self,
        on_status: OnStatusFn,
    ) -> UrlRequestStatusListenerHandle {
        unsafe { (self.sym().url_request_status_listener_create_with)(on_status) }
    }

    /// Destroy `listener`; its handler, if any, is never called afterwards
    pub fn url_request_status_listener_destroy(&self, listener: UrlRequestStatusListenerHandle) {
        let slot = self.sym().url_request_status_listener_destroy;
        STATUS_LISTENERS.destroy(listener.addr(), || unsafe { slot(listener) })
    }

    /// Attach caller data to the status listener
    pub fn url_request_status_listener_set_client_context(
        &self,
        listener: UrlRequestStatusListenerHandle,
        context: ClientContext,
    ) {
        unsafe { (self.sym().url_request_status_listener_set_client_context)(listener, context) }
    }

    /// Caller data attached to the status listener
    pub fn url_request_status_listener_get_client_context(
        &self,
        listener: UrlRequestStatusListenerHandle,
    ) -> ClientContext {
        unsafe { (self.sym().url_request_status_listener_get_client_context)(listener) }
    }
}
