//! Symbol Table
//!
//! Static mapping from the exported cronet C symbols to typed function slots.
//! The table is declared once with [`symbol_table!`]; the macro generates the
//! slot struct, the ordered list of `(group, symbol)` names, and a resolver that
//! binds every slot or fails on the first missing symbol.
//!
//! Registration order follows the declaration order below and never changes
//! between runs. A table value only exists fully resolved.

use std::ffi::{c_char, c_void};

use super::error::{BindError, BindResult};
use super::handles::*;

/// Something that can look up exported symbol addresses by name.
///
/// Implemented for `libloading::Library`; tests provide in-process fakes.
pub trait SymbolSource {
    /// Address of the exported symbol `name`, or `None` if absent
    fn symbol_address(&self, name: &str) -> Option<*const c_void>;
}

/// Look up a required symbol; absence (or a null address) is `SymbolMissing`.
pub fn require_symbol<S: SymbolSource + ?Sized>(
    source: &S,
    name: &str,
) -> BindResult<*const c_void> {
    match source.symbol_address(name) {
        Some(address) if !address.is_null() => Ok(address),
        _ => Err(BindError::SymbolMissing {
            symbol: name.to_string(),
        }),
    }
}

macro_rules! symbol_table {
    (
        $(#[$meta:meta])*
        pub struct $table:ident {
            $(
                [$group:literal]
                $(
                    $field:ident = $symbol:literal : fn($($arg:ty),*) $(-> $ret:ty)?;
                )*
            )*
        }
    ) => {
        $(#[$meta])*
        pub struct $table {
            $($(
                pub(crate) $field: unsafe extern "C" fn($($arg),*) $(-> $ret)?,
            )*)*
        }

        impl $table {
            /// `(group, exported symbol)` pairs in registration order
            pub const SYMBOLS: &'static [(&'static str, &'static str)] = &[
                $($( ($group, $symbol), )*)*
            ];

            /// Bind every slot from `source`, stopping at the first missing symbol
            pub fn resolve<S: SymbolSource + ?Sized>(source: &S) -> BindResult<Self> {
                Ok(Self {
                    $($(
                        $field: {
                            let address = require_symbol(source, $symbol)?;
                            // SAFETY: the exported symbol has exactly this C
                            // signature per the native headers.
                            unsafe {
                                std::mem::transmute::<
                                    *const c_void,
                                    unsafe extern "C" fn($($arg),*) $(-> $ret)?,
                                >(address)
                            }
                        },
                    )*)*
                })
            }

            /// Every registered symbol `source` cannot provide
            pub fn missing<S: SymbolSource + ?Sized>(source: &S) -> Vec<&'static str> {
                Self::SYMBOLS
                    .iter()
                    .filter(|(_, symbol)| require_symbol(source, symbol).is_err())
                    .map(|(_, symbol)| *symbol)
                    .collect()
            }
        }

        impl std::fmt::Debug for $table {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.debug_struct(stringify!($table))
                    .field("slots", &Self::SYMBOLS.len())
                    .finish()
            }
        }
    };
}

// =============================================================================
// Callback signatures implemented by the caller and invoked by native code
// =============================================================================

pub type BufferCallbackOnDestroyFn = unsafe extern "C" fn(BufferCallbackHandle, BufferHandle);
pub type RunnableRunFn = unsafe extern "C" fn(RunnableHandle);
pub type ExecutorExecuteFn = unsafe extern "C" fn(ExecutorHandle, RunnableHandle);

pub type OnRedirectReceivedFn = unsafe extern "C" fn(
    UrlRequestCallbackHandle,
    UrlRequestHandle,
    UrlResponseInfoHandle,
    *const c_char,
);
pub type OnResponseStartedFn =
    unsafe extern "C" fn(UrlRequestCallbackHandle, UrlRequestHandle, UrlResponseInfoHandle);
pub type OnReadCompletedFn = unsafe extern "C" fn(
    UrlRequestCallbackHandle,
    UrlRequestHandle,
    UrlResponseInfoHandle,
    BufferHandle,
    u64,
);
pub type OnSucceededFn =
    unsafe extern "C" fn(UrlRequestCallbackHandle, UrlRequestHandle, UrlResponseInfoHandle);
pub type OnFailedFn = unsafe extern "C" fn(
    UrlRequestCallbackHandle,
    UrlRequestHandle,
    UrlResponseInfoHandle,
    ErrorHandle,
);
pub type OnCanceledFn =
    unsafe extern "C" fn(UrlRequestCallbackHandle, UrlRequestHandle, UrlResponseInfoHandle);

pub type OnStatusFn = unsafe extern "C" fn(UrlRequestStatusListenerHandle, i32);

pub type UploadGetLengthFn = unsafe extern "C" fn(UploadDataProviderHandle) -> i64;
pub type UploadReadFn =
    unsafe extern "C" fn(UploadDataProviderHandle, UploadDataSinkHandle, BufferHandle);
pub type UploadRewindFn = unsafe extern "C" fn(UploadDataProviderHandle, UploadDataSinkHandle);
pub type UploadCloseFn = unsafe extern "C" fn(UploadDataProviderHandle);

pub type OnRequestFinishedFn = unsafe extern "C" fn(
    RequestFinishedInfoListenerHandle,
    RequestFinishedInfoHandle,
    UrlResponseInfoHandle,
    ErrorHandle,
);

// =============================================================================
// Bidirectional stream C structs
// =============================================================================

/// `bidirectional_stream_header`
#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub struct BidirectionalStreamHeader {
    pub key: *const c_char,
    pub value: *const c_char,
}

/// `bidirectional_stream_header_array`
#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub struct BidirectionalStreamHeaderArray {
    pub count: usize,
    pub capacity: usize,
    pub headers: *mut BidirectionalStreamHeader,
}

/// `bidirectional_stream_callback`: eight function pointers in header order.
///
/// The struct must stay at a stable address for as long as any stream created
/// with it can still call back.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default)]
pub struct BidirectionalStreamCallback {
    pub on_stream_ready: Option<unsafe extern "C" fn(BidirectionalStreamHandle)>,
    pub on_response_headers_received: Option<
        unsafe extern "C" fn(
            BidirectionalStreamHandle,
            *const BidirectionalStreamHeaderArray,
            *const c_char,
        ),
    >,
    pub on_read_completed:
        Option<unsafe extern "C" fn(BidirectionalStreamHandle, *mut c_char, i32)>,
    pub on_write_completed: Option<unsafe extern "C" fn(BidirectionalStreamHandle, *const c_char)>,
    pub on_response_trailers_received: Option<
        unsafe extern "C" fn(BidirectionalStreamHandle, *const BidirectionalStreamHeaderArray),
    >,
    pub on_succeeded: Option<unsafe extern "C" fn(BidirectionalStreamHandle)>,
    pub on_failed: Option<unsafe extern "C" fn(BidirectionalStreamHandle, i32)>,
    pub on_canceled: Option<unsafe extern "C" fn(BidirectionalStreamHandle)>,
}

// =============================================================================
// The table
// =============================================================================

symbol_table! {
    /// Every non-float cronet entry point, bound to a typed slot.
    pub struct SymbolTable {
        ["buffer"]
        buffer_create = "Cronet_Buffer_Create": fn() -> BufferHandle;
        buffer_destroy = "Cronet_Buffer_Destroy": fn(BufferHandle);
        buffer_set_client_context = "Cronet_Buffer_SetClientContext": fn(BufferHandle, ClientContext);
        buffer_get_client_context = "Cronet_Buffer_GetClientContext": fn(BufferHandle) -> ClientContext;
        buffer_init_with_data_and_callback = "Cronet_Buffer_InitWithDataAndCallback": fn(BufferHandle, *mut c_void, u64, BufferCallbackHandle);
        buffer_init_with_alloc = "Cronet_Buffer_InitWithAlloc": fn(BufferHandle, u64);
        buffer_get_size = "Cronet_Buffer_GetSize": fn(BufferHandle) -> u64;
        buffer_get_data = "Cronet_Buffer_GetData": fn(BufferHandle) -> *mut c_void;

        ["buffer_callback"]
        buffer_callback_destroy = "Cronet_BufferCallback_Destroy": fn(BufferCallbackHandle);
        buffer_callback_set_client_context = "Cronet_BufferCallback_SetClientContext": fn(BufferCallbackHandle, ClientContext);
        buffer_callback_get_client_context = "Cronet_BufferCallback_GetClientContext": fn(BufferCallbackHandle) -> ClientContext;
        buffer_callback_create_with = "Cronet_BufferCallback_CreateWith": fn(BufferCallbackOnDestroyFn) -> BufferCallbackHandle;

        ["runnable"]
        runnable_destroy = "Cronet_Runnable_Destroy": fn(RunnableHandle);
        runnable_set_client_context = "Cronet_Runnable_SetClientContext": fn(RunnableHandle, ClientContext);
        runnable_get_client_context = "Cronet_Runnable_GetClientContext": fn(RunnableHandle) -> ClientContext;
        runnable_run = "Cronet_Runnable_Run": fn(RunnableHandle);
        runnable_create_with = "Cronet_Runnable_CreateWith": fn(RunnableRunFn) -> RunnableHandle;

        ["executor"]
        executor_destroy = "Cronet_Executor_Destroy": fn(ExecutorHandle);
        executor_set_client_context = "Cronet_Executor_SetClientContext": fn(ExecutorHandle, ClientContext);
        executor_get_client_context = "Cronet_Executor_GetClientContext": fn(ExecutorHandle) -> ClientContext;
        executor_execute = "Cronet_Executor_Execute": fn(ExecutorHandle, RunnableHandle);
        executor_create_with = "Cronet_Executor_CreateWith": fn(ExecutorExecuteFn) -> ExecutorHandle;

        ["engine"]
        engine_create = "Cronet_Engine_Create": fn() -> EngineHandle;
        engine_destroy = "Cronet_Engine_Destroy": fn(EngineHandle);
        engine_set_client_context = "Cronet_Engine_SetClientContext": fn(EngineHandle, ClientContext);
        engine_get_client_context = "Cronet_Engine_GetClientContext": fn(EngineHandle) -> ClientContext;
        engine_start_with_params = "Cronet_Engine_StartWithParams": fn(EngineHandle, EngineParamsHandle) -> i32;
        engine_start_net_log_to_file = "Cronet_Engine_StartNetLogToFile": fn(EngineHandle, *const c_char, bool) -> bool;
        engine_stop_net_log = "Cronet_Engine_StopNetLog": fn(EngineHandle);
        engine_shutdown = "Cronet_Engine_Shutdown": fn(EngineHandle) -> i32;
        engine_get_version_string = "Cronet_Engine_GetVersionString": fn(EngineHandle) -> *const c_char;
        engine_get_default_user_agent = "Cronet_Engine_GetDefaultUserAgent": fn(EngineHandle) -> *const c_char;
        engine_add_request_finished_listener = "Cronet_Engine_AddRequestFinishedListener": fn(EngineHandle, RequestFinishedInfoListenerHandle, ExecutorHandle);
        engine_remove_request_finished_listener = "Cronet_Engine_RemoveRequestFinishedListener": fn(EngineHandle, RequestFinishedInfoListenerHandle);
        engine_get_stream_engine = "Cronet_Engine_GetStreamEngine": fn(EngineHandle) -> StreamEngineHandle;
        engine_set_mock_cert_verifier_for_testing = "Cronet_Engine_SetMockCertVerifierForTesting": fn(EngineHandle, CertVerifierHandle);

        ["engine_params"]
        engine_params_create = "Cronet_EngineParams_Create": fn() -> EngineParamsHandle;
        engine_params_destroy = "Cronet_EngineParams_Destroy": fn(EngineParamsHandle);
        engine_params_enable_check_result_set = "Cronet_EngineParams_enable_check_result_set": fn(EngineParamsHandle, bool);
        engine_params_user_agent_set = "Cronet_EngineParams_user_agent_set": fn(EngineParamsHandle, *const c_char);
        engine_params_accept_language_set = "Cronet_EngineParams_accept_language_set": fn(EngineParamsHandle, *const c_char);
        engine_params_storage_path_set = "Cronet_EngineParams_storage_path_set": fn(EngineParamsHandle, *const c_char);
        engine_params_enable_quic_set = "Cronet_EngineParams_enable_quic_set": fn(EngineParamsHandle, bool);
        engine_params_enable_http2_set = "Cronet_EngineParams_enable_http2_set": fn(EngineParamsHandle, bool);
        engine_params_enable_brotli_set = "Cronet_EngineParams_enable_brotli_set": fn(EngineParamsHandle, bool);
        engine_params_http_cache_mode_set = "Cronet_EngineParams_http_cache_mode_set": fn(EngineParamsHandle, i32);
        engine_params_http_cache_max_size_set = "Cronet_EngineParams_http_cache_max_size_set": fn(EngineParamsHandle, i64);
        engine_params_quic_hints_add = "Cronet_EngineParams_quic_hints_add": fn(EngineParamsHandle, QuicHintHandle);
        engine_params_public_key_pins_add = "Cronet_EngineParams_public_key_pins_add": fn(EngineParamsHandle, PublicKeyPinsHandle);
        engine_params_enable_public_key_pinning_bypass_for_local_trust_anchors_set = "Cronet_EngineParams_enable_public_key_pinning_bypass_for_local_trust_anchors_set": fn(EngineParamsHandle, bool);
        engine_params_experimental_options_set = "Cronet_EngineParams_experimental_options_set": fn(EngineParamsHandle, *const c_char);
        engine_params_enable_check_result_get = "Cronet_EngineParams_enable_check_result_get": fn(EngineParamsHandle) -> bool;
        engine_params_user_agent_get = "Cronet_EngineParams_user_agent_get": fn(EngineParamsHandle) -> *const c_char;
        engine_params_accept_language_get = "Cronet_EngineParams_accept_language_get": fn(EngineParamsHandle) -> *const c_char;
        engine_params_storage_path_get = "Cronet_EngineParams_storage_path_get": fn(EngineParamsHandle) -> *const c_char;
        engine_params_enable_quic_get = "Cronet_EngineParams_enable_quic_get": fn(EngineParamsHandle) -> bool;
        engine_params_enable_http2_get = "Cronet_EngineParams_enable_http2_get": fn(EngineParamsHandle) -> bool;
        engine_params_enable_brotli_get = "Cronet_EngineParams_enable_brotli_get": fn(EngineParamsHandle) -> bool;
        engine_params_http_cache_mode_get = "Cronet_EngineParams_http_cache_mode_get": fn(EngineParamsHandle) -> i32;
        engine_params_http_cache_max_size_get = "Cronet_EngineParams_http_cache_max_size_get": fn(EngineParamsHandle) -> i64;
        engine_params_quic_hints_size = "Cronet_EngineParams_quic_hints_size": fn(EngineParamsHandle) -> u32;
        engine_params_quic_hints_at = "Cronet_EngineParams_quic_hints_at": fn(EngineParamsHandle, u32) -> QuicHintHandle;
        engine_params_quic_hints_clear = "Cronet_EngineParams_quic_hints_clear": fn(EngineParamsHandle);
        engine_params_public_key_pins_size = "Cronet_EngineParams_public_key_pins_size": fn(EngineParamsHandle) -> u32;
        engine_params_public_key_pins_at = "Cronet_EngineParams_public_key_pins_at": fn(EngineParamsHandle, u32) -> PublicKeyPinsHandle;
        engine_params_public_key_pins_clear = "Cronet_EngineParams_public_key_pins_clear": fn(EngineParamsHandle);
        engine_params_enable_public_key_pinning_bypass_for_local_trust_anchors_get = "Cronet_EngineParams_enable_public_key_pinning_bypass_for_local_trust_anchors_get": fn(EngineParamsHandle) -> bool;
        engine_params_experimental_options_get = "Cronet_EngineParams_experimental_options_get": fn(EngineParamsHandle) -> *const c_char;

        ["url_request"]
        url_request_create = "Cronet_UrlRequest_Create": fn() -> UrlRequestHandle;
        url_request_destroy = "Cronet_UrlRequest_Destroy": fn(UrlRequestHandle);
        url_request_set_client_context = "Cronet_UrlRequest_SetClientContext": fn(UrlRequestHandle, ClientContext);
        url_request_get_client_context = "Cronet_UrlRequest_GetClientContext": fn(UrlRequestHandle) -> ClientContext;
        url_request_init_with_params = "Cronet_UrlRequest_InitWithParams": fn(UrlRequestHandle, EngineHandle, *const c_char, UrlRequestParamsHandle, UrlRequestCallbackHandle, ExecutorHandle) -> i32;
        url_request_start = "Cronet_UrlRequest_Start": fn(UrlRequestHandle) -> i32;
        url_request_follow_redirect = "Cronet_UrlRequest_FollowRedirect": fn(UrlRequestHandle) -> i32;
        url_request_read = "Cronet_UrlRequest_Read": fn(UrlRequestHandle, BufferHandle) -> i32;
        url_request_cancel = "Cronet_UrlRequest_Cancel": fn(UrlRequestHandle);
        url_request_is_done = "Cronet_UrlRequest_IsDone": fn(UrlRequestHandle) -> bool;
        url_request_get_status = "Cronet_UrlRequest_GetStatus": fn(UrlRequestHandle, UrlRequestStatusListenerHandle);

        ["url_request_params"]
        url_request_params_create = "Cronet_UrlRequestParams_Create": fn() -> UrlRequestParamsHandle;
        url_request_params_destroy = "Cronet_UrlRequestParams_Destroy": fn(UrlRequestParamsHandle);
        url_request_params_http_method_set = "Cronet_UrlRequestParams_http_method_set": fn(UrlRequestParamsHandle, *const c_char);
        url_request_params_request_headers_add = "Cronet_UrlRequestParams_request_headers_add": fn(UrlRequestParamsHandle, HttpHeaderHandle);
        url_request_params_disable_cache_set = "Cronet_UrlRequestParams_disable_cache_set": fn(UrlRequestParamsHandle, bool);
        url_request_params_priority_set = "Cronet_UrlRequestParams_priority_set": fn(UrlRequestParamsHandle, i32);
        url_request_params_upload_data_provider_set = "Cronet_UrlRequestParams_upload_data_provider_set": fn(UrlRequestParamsHandle, UploadDataProviderHandle);
        url_request_params_upload_data_provider_executor_set = "Cronet_UrlRequestParams_upload_data_provider_executor_set": fn(UrlRequestParamsHandle, ExecutorHandle);
        url_request_params_allow_direct_executor_set = "Cronet_UrlRequestParams_allow_direct_executor_set": fn(UrlRequestParamsHandle, bool);
        url_request_params_annotations_add = "Cronet_UrlRequestParams_annotations_add": fn(UrlRequestParamsHandle, ClientContext);
        url_request_params_request_finished_listener_set = "Cronet_UrlRequestParams_request_finished_listener_set": fn(UrlRequestParamsHandle, RequestFinishedInfoListenerHandle);
        url_request_params_request_finished_executor_set = "Cronet_UrlRequestParams_request_finished_executor_set": fn(UrlRequestParamsHandle, ExecutorHandle);
        url_request_params_idempotency_set = "Cronet_UrlRequestParams_idempotency_set": fn(UrlRequestParamsHandle, i32);
        url_request_params_http_method_get = "Cronet_UrlRequestParams_http_method_get": fn(UrlRequestParamsHandle) -> *const c_char;
        url_request_params_request_headers_size = "Cronet_UrlRequestParams_request_headers_size": fn(UrlRequestParamsHandle) -> u32;
        url_request_params_request_headers_at = "Cronet_UrlRequestParams_request_headers_at": fn(UrlRequestParamsHandle, u32) -> HttpHeaderHandle;
        url_request_params_request_headers_clear = "Cronet_UrlRequestParams_request_headers_clear": fn(UrlRequestParamsHandle);
        url_request_params_disable_cache_get = "Cronet_UrlRequestParams_disable_cache_get": fn(UrlRequestParamsHandle) -> bool;
        url_request_params_priority_get = "Cronet_UrlRequestParams_priority_get": fn(UrlRequestParamsHandle) -> i32;
        url_request_params_upload_data_provider_get = "Cronet_UrlRequestParams_upload_data_provider_get": fn(UrlRequestParamsHandle) -> UploadDataProviderHandle;
        url_request_params_upload_data_provider_executor_get = "Cronet_UrlRequestParams_upload_data_provider_executor_get": fn(UrlRequestParamsHandle) -> ExecutorHandle;
        url_request_params_allow_direct_executor_get = "Cronet_UrlRequestParams_allow_direct_executor_get": fn(UrlRequestParamsHandle) -> bool;
        url_request_params_annotations_size = "Cronet_UrlRequestParams_annotations_size": fn(UrlRequestParamsHandle) -> u32;
        url_request_params_annotations_at = "Cronet_UrlRequestParams_annotations_at": fn(UrlRequestParamsHandle, u32) -> ClientContext;
        url_request_params_annotations_clear = "Cronet_UrlRequestParams_annotations_clear": fn(UrlRequestParamsHandle);
        url_request_params_request_finished_listener_get = "Cronet_UrlRequestParams_request_finished_listener_get": fn(UrlRequestParamsHandle) -> RequestFinishedInfoListenerHandle;
        url_request_params_request_finished_executor_get = "Cronet_UrlRequestParams_request_finished_executor_get": fn(UrlRequestParamsHandle) -> ExecutorHandle;
        url_request_params_idempotency_get = "Cronet_UrlRequestParams_idempotency_get": fn(UrlRequestParamsHandle) -> i32;

        ["url_request_callback"]
        url_request_callback_destroy = "Cronet_UrlRequestCallback_Destroy": fn(UrlRequestCallbackHandle);
        url_request_callback_set_client_context = "Cronet_UrlRequestCallback_SetClientContext": fn(UrlRequestCallbackHandle, ClientContext);
        url_request_callback_get_client_context = "Cronet_UrlRequestCallback_GetClientContext": fn(UrlRequestCallbackHandle) -> ClientContext;
        url_request_callback_create_with = "Cronet_UrlRequestCallback_CreateWith": fn(OnRedirectReceivedFn, OnResponseStartedFn, OnReadCompletedFn, OnSucceededFn, OnFailedFn, OnCanceledFn) -> UrlRequestCallbackHandle;

        ["url_request_status_listener"]
        url_request_status_listener_destroy = "Cronet_UrlRequestStatusListener_Destroy": fn(UrlRequestStatusListenerHandle);
        url_request_status_listener_set_client_context = "Cronet_UrlRequestStatusListener_SetClientContext": fn(UrlRequestStatusListenerHandle, ClientContext);
        url_request_status_listener_get_client_context = "Cronet_UrlRequestStatusListener_GetClientContext": fn(UrlRequestStatusListenerHandle) -> ClientContext;
        url_request_status_listener_create_with = "Cronet_UrlRequestStatusListener_CreateWith": fn(OnStatusFn) -> UrlRequestStatusListenerHandle;

        ["upload_data_provider"]
        upload_data_provider_destroy = "Cronet_UploadDataProvider_Destroy": fn(UploadDataProviderHandle);
        upload_data_provider_set_client_context = "Cronet_UploadDataProvider_SetClientContext": fn(UploadDataProviderHandle, ClientContext);
        upload_data_provider_get_client_context = "Cronet_UploadDataProvider_GetClientContext": fn(UploadDataProviderHandle) -> ClientContext;
        upload_data_provider_create_with = "Cronet_UploadDataProvider_CreateWith": fn(UploadGetLengthFn, UploadReadFn, UploadRewindFn, UploadCloseFn) -> UploadDataProviderHandle;

        ["upload_data_sink"]
        upload_data_sink_destroy = "Cronet_UploadDataSink_Destroy": fn(UploadDataSinkHandle);
        upload_data_sink_set_client_context = "Cronet_UploadDataSink_SetClientContext": fn(UploadDataSinkHandle, ClientContext);
        upload_data_sink_get_client_context = "Cronet_UploadDataSink_GetClientContext": fn(UploadDataSinkHandle) -> ClientContext;
        upload_data_sink_on_read_succeeded = "Cronet_UploadDataSink_OnReadSucceeded": fn(UploadDataSinkHandle, u64, bool);
        upload_data_sink_on_read_error = "Cronet_UploadDataSink_OnReadError": fn(UploadDataSinkHandle, *const c_char);
        upload_data_sink_on_rewind_succeeded = "Cronet_UploadDataSink_OnRewindSucceeded": fn(UploadDataSinkHandle);
        upload_data_sink_on_rewind_error = "Cronet_UploadDataSink_OnRewindError": fn(UploadDataSinkHandle, *const c_char);

        ["url_response_info"]
        url_response_info_create = "Cronet_UrlResponseInfo_Create": fn() -> UrlResponseInfoHandle;
        url_response_info_destroy = "Cronet_UrlResponseInfo_Destroy": fn(UrlResponseInfoHandle);
        url_response_info_url_set = "Cronet_UrlResponseInfo_url_set": fn(UrlResponseInfoHandle, *const c_char);
        url_response_info_url_chain_add = "Cronet_UrlResponseInfo_url_chain_add": fn(UrlResponseInfoHandle, *const c_char);
        url_response_info_http_status_code_set = "Cronet_UrlResponseInfo_http_status_code_set": fn(UrlResponseInfoHandle, i32);
        url_response_info_http_status_text_set = "Cronet_UrlResponseInfo_http_status_text_set": fn(UrlResponseInfoHandle, *const c_char);
        url_response_info_all_headers_list_add = "Cronet_UrlResponseInfo_all_headers_list_add": fn(UrlResponseInfoHandle, HttpHeaderHandle);
        url_response_info_was_cached_set = "Cronet_UrlResponseInfo_was_cached_set": fn(UrlResponseInfoHandle, bool);
        url_response_info_negotiated_protocol_set = "Cronet_UrlResponseInfo_negotiated_protocol_set": fn(UrlResponseInfoHandle, *const c_char);
        url_response_info_proxy_server_set = "Cronet_UrlResponseInfo_proxy_server_set": fn(UrlResponseInfoHandle, *const c_char);
        url_response_info_received_byte_count_set = "Cronet_UrlResponseInfo_received_byte_count_set": fn(UrlResponseInfoHandle, i64);
        url_response_info_url_get = "Cronet_UrlResponseInfo_url_get": fn(UrlResponseInfoHandle) -> *const c_char;
        url_response_info_url_chain_size = "Cronet_UrlResponseInfo_url_chain_size": fn(UrlResponseInfoHandle) -> u32;
        url_response_info_url_chain_at = "Cronet_UrlResponseInfo_url_chain_at": fn(UrlResponseInfoHandle, u32) -> *const c_char;
        url_response_info_url_chain_clear = "Cronet_UrlResponseInfo_url_chain_clear": fn(UrlResponseInfoHandle);
        url_response_info_http_status_code_get = "Cronet_UrlResponseInfo_http_status_code_get": fn(UrlResponseInfoHandle) -> i32;
        url_response_info_http_status_text_get = "Cronet_UrlResponseInfo_http_status_text_get": fn(UrlResponseInfoHandle) -> *const c_char;
        url_response_info_all_headers_list_size = "Cronet_UrlResponseInfo_all_headers_list_size": fn(UrlResponseInfoHandle) -> u32;
        url_response_info_all_headers_list_at = "Cronet_UrlResponseInfo_all_headers_list_at": fn(UrlResponseInfoHandle, u32) -> HttpHeaderHandle;
        url_response_info_all_headers_list_clear = "Cronet_UrlResponseInfo_all_headers_list_clear": fn(UrlResponseInfoHandle);
        url_response_info_was_cached_get = "Cronet_UrlResponseInfo_was_cached_get": fn(UrlResponseInfoHandle) -> bool;
        url_response_info_negotiated_protocol_get = "Cronet_UrlResponseInfo_negotiated_protocol_get": fn(UrlResponseInfoHandle) -> *const c_char;
        url_response_info_proxy_server_get = "Cronet_UrlResponseInfo_proxy_server_get": fn(UrlResponseInfoHandle) -> *const c_char;
        url_response_info_received_byte_count_get = "Cronet_UrlResponseInfo_received_byte_count_get": fn(UrlResponseInfoHandle) -> i64;

        ["error"]
        error_create = "Cronet_Error_Create": fn() -> ErrorHandle;
        error_destroy = "Cronet_Error_Destroy": fn(ErrorHandle);
        error_error_code_set = "Cronet_Error_error_code_set": fn(ErrorHandle, i32);
        error_message_set = "Cronet_Error_message_set": fn(ErrorHandle, *const c_char);
        error_internal_error_code_set = "Cronet_Error_internal_error_code_set": fn(ErrorHandle, i32);
        error_immediately_retryable_set = "Cronet_Error_immediately_retryable_set": fn(ErrorHandle, bool);
        error_quic_detailed_error_code_set = "Cronet_Error_quic_detailed_error_code_set": fn(ErrorHandle, i32);
        error_error_code_get = "Cronet_Error_error_code_get": fn(ErrorHandle) -> i32;
        error_message_get = "Cronet_Error_message_get": fn(ErrorHandle) -> *const c_char;
        error_internal_error_code_get = "Cronet_Error_internal_error_code_get": fn(ErrorHandle) -> i32;
        error_immediately_retryable_get = "Cronet_Error_immediately_retryable_get": fn(ErrorHandle) -> bool;
        error_quic_detailed_error_code_get = "Cronet_Error_quic_detailed_error_code_get": fn(ErrorHandle) -> i32;

        ["http_header"]
        http_header_create = "Cronet_HttpHeader_Create": fn() -> HttpHeaderHandle;
        http_header_destroy = "Cronet_HttpHeader_Destroy": fn(HttpHeaderHandle);
        http_header_name_set = "Cronet_HttpHeader_name_set": fn(HttpHeaderHandle, *const c_char);
        http_header_value_set = "Cronet_HttpHeader_value_set": fn(HttpHeaderHandle, *const c_char);
        http_header_name_get = "Cronet_HttpHeader_name_get": fn(HttpHeaderHandle) -> *const c_char;
        http_header_value_get = "Cronet_HttpHeader_value_get": fn(HttpHeaderHandle) -> *const c_char;

        ["quic_hint"]
        quic_hint_create = "Cronet_QuicHint_Create": fn() -> QuicHintHandle;
        quic_hint_destroy = "Cronet_QuicHint_Destroy": fn(QuicHintHandle);
        quic_hint_host_set = "Cronet_QuicHint_host_set": fn(QuicHintHandle, *const c_char);
        quic_hint_port_set = "Cronet_QuicHint_port_set": fn(QuicHintHandle, i32);
        quic_hint_alternate_port_set = "Cronet_QuicHint_alternate_port_set": fn(QuicHintHandle, i32);
        quic_hint_host_get = "Cronet_QuicHint_host_get": fn(QuicHintHandle) -> *const c_char;
        quic_hint_port_get = "Cronet_QuicHint_port_get": fn(QuicHintHandle) -> i32;
        quic_hint_alternate_port_get = "Cronet_QuicHint_alternate_port_get": fn(QuicHintHandle) -> i32;

        ["public_key_pins"]
        public_key_pins_create = "Cronet_PublicKeyPins_Create": fn() -> PublicKeyPinsHandle;
        public_key_pins_destroy = "Cronet_PublicKeyPins_Destroy": fn(PublicKeyPinsHandle);
        public_key_pins_host_set = "Cronet_PublicKeyPins_host_set": fn(PublicKeyPinsHandle, *const c_char);
        public_key_pins_pins_sha256_add = "Cronet_PublicKeyPins_pins_sha256_add": fn(PublicKeyPinsHandle, *const c_char);
        public_key_pins_include_subdomains_set = "Cronet_PublicKeyPins_include_subdomains_set": fn(PublicKeyPinsHandle, bool);
        public_key_pins_expiration_date_set = "Cronet_PublicKeyPins_expiration_date_set": fn(PublicKeyPinsHandle, i64);
        public_key_pins_host_get = "Cronet_PublicKeyPins_host_get": fn(PublicKeyPinsHandle) -> *const c_char;
        public_key_pins_pins_sha256_size = "Cronet_PublicKeyPins_pins_sha256_size": fn(PublicKeyPinsHandle) -> u32;
        public_key_pins_pins_sha256_at = "Cronet_PublicKeyPins_pins_sha256_at": fn(PublicKeyPinsHandle, u32) -> *const c_char;
        public_key_pins_pins_sha256_clear = "Cronet_PublicKeyPins_pins_sha256_clear": fn(PublicKeyPinsHandle);
        public_key_pins_include_subdomains_get = "Cronet_PublicKeyPins_include_subdomains_get": fn(PublicKeyPinsHandle) -> bool;
        public_key_pins_expiration_date_get = "Cronet_PublicKeyPins_expiration_date_get": fn(PublicKeyPinsHandle) -> i64;

        ["date_time"]
        date_time_create = "Cronet_DateTime_Create": fn() -> DateTimeHandle;
        date_time_destroy = "Cronet_DateTime_Destroy": fn(DateTimeHandle);
        date_time_value_set = "Cronet_DateTime_value_set": fn(DateTimeHandle, i64);
        date_time_value_get = "Cronet_DateTime_value_get": fn(DateTimeHandle) -> i64;

        ["metrics"]
        metrics_create = "Cronet_Metrics_Create": fn() -> MetricsHandle;
        metrics_destroy = "Cronet_Metrics_Destroy": fn(MetricsHandle);
        metrics_request_start_set = "Cronet_Metrics_request_start_set": fn(MetricsHandle, DateTimeHandle);
        metrics_dns_start_set = "Cronet_Metrics_dns_start_set": fn(MetricsHandle, DateTimeHandle);
        metrics_dns_end_set = "Cronet_Metrics_dns_end_set": fn(MetricsHandle, DateTimeHandle);
        metrics_connect_start_set = "Cronet_Metrics_connect_start_set": fn(MetricsHandle, DateTimeHandle);
        metrics_connect_end_set = "Cronet_Metrics_connect_end_set": fn(MetricsHandle, DateTimeHandle);
        metrics_ssl_start_set = "Cronet_Metrics_ssl_start_set": fn(MetricsHandle, DateTimeHandle);
        metrics_ssl_end_set = "Cronet_Metrics_ssl_end_set": fn(MetricsHandle, DateTimeHandle);
        metrics_sending_start_set = "Cronet_Metrics_sending_start_set": fn(MetricsHandle, DateTimeHandle);
        metrics_sending_end_set = "Cronet_Metrics_sending_end_set": fn(MetricsHandle, DateTimeHandle);
        metrics_push_start_set = "Cronet_Metrics_push_start_set": fn(MetricsHandle, DateTimeHandle);
        metrics_push_end_set = "Cronet_Metrics_push_end_set": fn(MetricsHandle, DateTimeHandle);
        metrics_response_start_set = "Cronet_Metrics_response_start_set": fn(MetricsHandle, DateTimeHandle);
        metrics_request_end_set = "Cronet_Metrics_request_end_set": fn(MetricsHandle, DateTimeHandle);
        metrics_socket_reused_set = "Cronet_Metrics_socket_reused_set": fn(MetricsHandle, bool);
        metrics_sent_byte_count_set = "Cronet_Metrics_sent_byte_count_set": fn(MetricsHandle, i64);
        metrics_received_byte_count_set = "Cronet_Metrics_received_byte_count_set": fn(MetricsHandle, i64);
        metrics_request_start_get = "Cronet_Metrics_request_start_get": fn(MetricsHandle) -> DateTimeHandle;
        metrics_dns_start_get = "Cronet_Metrics_dns_start_get": fn(MetricsHandle) -> DateTimeHandle;
        metrics_dns_end_get = "Cronet_Metrics_dns_end_get": fn(MetricsHandle) -> DateTimeHandle;
        metrics_connect_start_get = "Cronet_Metrics_connect_start_get": fn(MetricsHandle) -> DateTimeHandle;
        metrics_connect_end_get = "Cronet_Metrics_connect_end_get": fn(MetricsHandle) -> DateTimeHandle;
        metrics_ssl_start_get = "Cronet_Metrics_ssl_start_get": fn(MetricsHandle) -> DateTimeHandle;
        metrics_ssl_end_get = "Cronet_Metrics_ssl_end_get": fn(MetricsHandle) -> DateTimeHandle;
        metrics_sending_start_get = "Cronet_Metrics_sending_start_get": fn(MetricsHandle) -> DateTimeHandle;
        metrics_sending_end_get = "Cronet_Metrics_sending_end_get": fn(MetricsHandle) -> DateTimeHandle;
        metrics_push_start_get = "Cronet_Metrics_push_start_get": fn(MetricsHandle) -> DateTimeHandle;
        metrics_push_end_get = "Cronet_Metrics_push_end_get": fn(MetricsHandle) -> DateTimeHandle;
        metrics_response_start_get = "Cronet_Metrics_response_start_get": fn(MetricsHandle) -> DateTimeHandle;
        metrics_request_end_get = "Cronet_Metrics_request_end_get": fn(MetricsHandle) -> DateTimeHandle;
        metrics_socket_reused_get = "Cronet_Metrics_socket_reused_get": fn(MetricsHandle) -> bool;
        metrics_sent_byte_count_get = "Cronet_Metrics_sent_byte_count_get": fn(MetricsHandle) -> i64;
        metrics_received_byte_count_get = "Cronet_Metrics_received_byte_count_get": fn(MetricsHandle) -> i64;

        ["request_finished_info"]
        request_finished_info_create = "Cronet_RequestFinishedInfo_Create": fn() -> RequestFinishedInfoHandle;
        request_finished_info_destroy = "Cronet_RequestFinishedInfo_Destroy": fn(RequestFinishedInfoHandle);
        request_finished_info_metrics_set = "Cronet_RequestFinishedInfo_metrics_set": fn(RequestFinishedInfoHandle, MetricsHandle);
        request_finished_info_annotations_add = "Cronet_RequestFinishedInfo_annotations_add": fn(RequestFinishedInfoHandle, ClientContext);
        request_finished_info_finished_reason_set = "Cronet_RequestFinishedInfo_finished_reason_set": fn(RequestFinishedInfoHandle, i32);
        request_finished_info_metrics_get = "Cronet_RequestFinishedInfo_metrics_get": fn(RequestFinishedInfoHandle) -> MetricsHandle;
        request_finished_info_annotations_size = "Cronet_RequestFinishedInfo_annotations_size": fn(RequestFinishedInfoHandle) -> u32;
        request_finished_info_annotations_at = "Cronet_RequestFinishedInfo_annotations_at": fn(RequestFinishedInfoHandle, u32) -> ClientContext;
        request_finished_info_annotations_clear = "Cronet_RequestFinishedInfo_annotations_clear": fn(RequestFinishedInfoHandle);
        request_finished_info_finished_reason_get = "Cronet_RequestFinishedInfo_finished_reason_get": fn(RequestFinishedInfoHandle) -> i32;

        ["request_finished_info_listener"]
        request_finished_info_listener_destroy = "Cronet_RequestFinishedInfoListener_Destroy": fn(RequestFinishedInfoListenerHandle);
        request_finished_info_listener_set_client_context = "Cronet_RequestFinishedInfoListener_SetClientContext": fn(RequestFinishedInfoListenerHandle, ClientContext);
        request_finished_info_listener_get_client_context = "Cronet_RequestFinishedInfoListener_GetClientContext": fn(RequestFinishedInfoListenerHandle) -> ClientContext;
        request_finished_info_listener_create_with = "Cronet_RequestFinishedInfoListener_CreateWith": fn(OnRequestFinishedFn) -> RequestFinishedInfoListenerHandle;

        ["cert_verifier"]
        create_cert_verifier_with_root_certs = "Cronet_CreateCertVerifierWithRootCerts": fn(*const c_char) -> CertVerifierHandle;
        create_cert_verifier_with_public_key_sha256 = "Cronet_CreateCertVerifierWithPublicKeySHA256": fn(*const *const u8, usize) -> CertVerifierHandle;

        ["bidirectional_stream"]
        bidirectional_stream_create = "bidirectional_stream_create": fn(StreamEngineHandle, ClientContext, *const BidirectionalStreamCallback) -> BidirectionalStreamHandle;
        bidirectional_stream_destroy = "bidirectional_stream_destroy": fn(BidirectionalStreamHandle) -> i32;
        bidirectional_stream_disable_auto_flush = "bidirectional_stream_disable_auto_flush": fn(BidirectionalStreamHandle, bool);
        bidirectional_stream_delay_request_headers_until_flush = "bidirectional_stream_delay_request_headers_until_flush": fn(BidirectionalStreamHandle, bool);
        bidirectional_stream_start = "bidirectional_stream_start": fn(BidirectionalStreamHandle, *const c_char, i32, *const c_char, *const BidirectionalStreamHeaderArray, bool) -> i32;
        bidirectional_stream_read = "bidirectional_stream_read": fn(BidirectionalStreamHandle, *mut c_char, i32) -> i32;
        bidirectional_stream_write = "bidirectional_stream_write": fn(BidirectionalStreamHandle, *const c_char, i32, bool) -> i32;
        bidirectional_stream_flush = "bidirectional_stream_flush": fn(BidirectionalStreamHandle);
        bidirectional_stream_cancel = "bidirectional_stream_cancel": fn(BidirectionalStreamHandle);
        bidirectional_stream_set_concurrency_index = "bidirectional_stream_set_concurrency_index": fn(BidirectionalStreamHandle, i32);
    }
}

symbol_table! {
    /// Entry points taking or returning `double`, registered separately so
    /// targets without float-argument support never bind them.
    pub struct FloatSymbols {
        ["engine_params"]
        engine_params_network_thread_priority_set = "Cronet_EngineParams_network_thread_priority_set": fn(EngineParamsHandle, f64);
        engine_params_network_thread_priority_get = "Cronet_EngineParams_network_thread_priority_get": fn(EngineParamsHandle) -> f64;
    }
}

/// Group label of an exported symbol, if it is part of either table
pub fn symbol_group(name: &str) -> Option<&'static str> {
    SymbolTable::SYMBOLS
        .iter()
        .chain(FloatSymbols::SYMBOLS.iter())
        .find(|(_, symbol)| *symbol == name)
        .map(|(group, _)| *group)
}
