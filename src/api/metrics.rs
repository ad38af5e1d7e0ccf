//! Timing metrics and request-finished reporting

use super::callbacks::FINISHED_LISTENERS;
use super::{Cronet, FinishedReason};
use crate::ffi::symbols::OnRequestFinishedFn;
use crate::ffi::{
    ClientContext, DateTimeHandle, MetricsHandle, RequestFinishedInfoHandle,
    RequestFinishedInfoListenerHandle,
};

/// Names of the timestamps carried by `Cronet_Metrics`, in request order
pub const METRICS_TIMESTAMPS: [&str; 13] = [
    "request_start",
    "dns_start",
    "dns_end",
    "connect_start",
    "connect_end",
    "ssl_start",
    "ssl_end",
    "sending_start",
    "sending_end",
    "push_start",
    "push_end",
    "response_start",
    "request_end",
];

// Each timestamp is a `Cronet_DateTime` owned by the metrics object; the
// getter returns null when the phase did not happen, and the setter copies.
macro_rules! metrics_timestamps {
    ($( $get:ident / $set:ident ; )*) => {
        impl Cronet {
            $(
                #[doc = concat!("`", stringify!($get), "`: timestamp, or null if the phase was skipped")]
                pub fn $get(&self, metrics: MetricsHandle) -> DateTimeHandle {
                    unsafe { (self.sym().$get)(metrics) }
                }

                #[doc = concat!("`", stringify!($set), "`: copy `value` into the metrics")]
                pub fn $set(&self, metrics: MetricsHandle, value: DateTimeHandle) {
                    unsafe { (self.sym().$set)(metrics, value) }
                }
            )*
        }
    };
}

metrics_timestamps! {
    metrics_request_start_get / metrics_request_start_set;
    metrics_dns_start_get / metrics_dns_start_set;
    metrics_dns_end_get / metrics_dns_end_set;
    metrics_connect_start_get / metrics_connect_start_set;
    metrics_connect_end_get / metrics_connect_end_set;
    metrics_ssl_start_get / metrics_ssl_start_set;
    metrics_ssl_end_get / metrics_ssl_end_set;
    metrics_sending_start_get / metrics_sending_start_set;
    metrics_sending_end_get / metrics_sending_end_set;
    metrics_push_start_get / metrics_push_start_set;
    metrics_push_end_get / metrics_push_end_set;
    metrics_response_start_get / metrics_response_start_set;
    metrics_request_end_get / metrics_request_end_set;
}

impl Cronet {
    /// Create a date-time
    pub fn date_time_create(&self) -> DateTimeHandle {
        unsafe { (self.sym().date_time_create)() }
    }

    /// Destroy the date-time
    pub fn date_time_destroy(&self, date_time: DateTimeHandle) {
        unsafe { (self.sym().date_time_destroy)(date_time) }
    }

    /// Set the value in milliseconds since the Unix epoch
    pub fn date_time_value_set(&self, date_time: DateTimeHandle, millis: i64) {
        unsafe { (self.sym().date_time_value_set)(date_time, millis) }
    }

    /// Milliseconds since the Unix epoch
    pub fn date_time_value_get(&self, date_time: DateTimeHandle) -> i64 {
        unsafe { (self.sym().date_time_value_get)(date_time) }
    }

    /// Value of a possibly-null timestamp
    pub fn date_time_millis(&self, date_time: DateTimeHandle) -> Option<i64> {
        (!date_time.is_null()).then(|| self.date_time_value_get(date_time))
    }

    /// Create a metrics
    pub fn metrics_create(&self) -> MetricsHandle {
        unsafe { (self.sym().metrics_create)() }
    }

    /// Destroy the metrics
    pub fn metrics_destroy(&self, metrics: MetricsHandle) {
        unsafe { (self.sym().metrics_destroy)(metrics) }
    }

    /// Every timestamp as `(name, millis)`, in [`METRICS_TIMESTAMPS`] order
    pub fn metrics_timestamps(&self, metrics: MetricsHandle) -> Vec<(&'static str, Option<i64>)> {
        let values = [
            self.metrics_request_start_get(metrics),
            self.metrics_dns_start_get(metrics),
            self.metrics_dns_end_get(metrics),
            self.metrics_connect_start_get(metrics),
            self.metrics_connect_end_get(metrics),
            self.metrics_ssl_start_get(metrics),
            self.metrics_ssl_end_get(metrics),
            self.metrics_sending_start_get(metrics),
            self.metrics_sending_end_get(metrics),
            self.metrics_push_start_get(metrics),
            self.metrics_push_end_get(metrics),
            self.metrics_response_start_get(metrics),
            self.metrics_request_end_get(metrics),
        ];
        METRICS_TIMESTAMPS
            .iter()
            .zip(values)
            .map(|(name, handle)| (*name, self.date_time_millis(handle)))
            .collect()
    }

    /// Record whether the connection was reused
    pub fn metrics_socket_reused_set(&self, metrics: MetricsHandle, reused: bool) {
        unsafe { (self.sym().metrics_socket_reused_set)(metrics, reused) }
    }

    /// Whether an existing connection was reused
    pub fn metrics_socket_reused_get(&self, metrics: MetricsHandle) -> bool {
        unsafe { (self.sym().metrics_socket_reused_get)(metrics) }
    }

    /// Set the sent byte count
    pub fn metrics_sent_byte_count_set(&self, metrics: MetricsHandle, count: i64) {
        unsafe { (self.sym().metrics_sent_byte_count_set)(metrics, count) }
    }

    /// Bytes sent, headers included
    pub fn metrics_sent_byte_count_get(&self, metrics: MetricsHandle) -> i64 {
        unsafe { (self.sym().metrics_sent_byte_count_get)(metrics) }
    }

    /// Set the received byte count
    pub fn metrics_received_byte_count_set(&self, metrics: MetricsHandle, count: i64) {
        unsafe { (self.sym().metrics_received_byte_count_set)(metrics, count) }
    }

    /// Bytes received, headers included
    pub fn metrics_received_byte_count_get(&self, metrics: MetricsHandle) -> i64 {
        unsafe { (self.sym().metrics_received_byte_count_get)(metrics) }
    }

    // -------------------------------------------------------------------------
    // RequestFinishedInfo
    // -------------------------------------------------------------------------

    /// Create a request-finished info
    pub fn request_finished_info_create(&self) -> RequestFinishedInfoHandle {
        unsafe { (self.sym().request_finished_info_create)() }
    }

    /// Destroy the request-finished info
    pub fn request_finished_info_destroy(&self, info: RequestFinishedInfoHandle) {
        unsafe { (self.sym().request_finished_info_destroy)(info) }
    }

    /// Attach `metrics`
    pub fn request_finished_info_metrics_set(
        &self,
        info: RequestFinishedInfoHandle,
        metrics: MetricsHandle,
    ) {
        unsafe { (self.sym().request_finished_info_metrics_set)(info, metrics) }
    }

    /// Metrics owned by `info`
    pub fn request_finished_info_metrics_get(&self, info: RequestFinishedInfoHandle) -> MetricsHandle {
        unsafe { (self.sym().request_finished_info_metrics_get)(info) }
    }

    /// Append an annotation
    pub fn request_finished_info_annotations_add(
        &self,
        info: RequestFinishedInfoHandle,
        annotation: ClientContext,
    ) {
        unsafe { (self.sym().request_finished_info_annotations_add)(info, annotation) }
    }

    /// Number of annotations
    pub fn request_finished_info_annotations_size(&self, info: RequestFinishedInfoHandle) -> u32 {
        unsafe { (self.sym().request_finished_info_annotations_size)(info) }
    }

    /// Annotation at `index`
    pub fn request_finished_info_annotations_at(
        &self,
        info: RequestFinishedInfoHandle,
        index: u32,
    ) -> ClientContext {
        unsafe { (self.sym().request_finished_info_annotations_at)(info, index) }
    }

    /// Remove every annotation
    pub fn request_finished_info_annotations_clear(&self, info: RequestFinishedInfoHandle) {
        unsafe { (self.sym().request_finished_info_annotations_clear)(info) }
    }

    /// Set how the request ended
    pub fn request_finished_info_finished_reason_set(
        &self,
        info: RequestFinishedInfoHandle,
        reason: FinishedReason,
    ) {
        unsafe { (self.sym().request_finished_info_finished_reason_set)(info, reason.raw()) }
    }

    /// How the request ended
    pub fn request_finished_info_finished_reason_get(
        &self,
        info: RequestFinishedInfoHandle,
    ) -> FinishedReason {
        FinishedReason::from_raw(unsafe {
            (self.sym().request_finished_info_finished_reason_get)(info)
        })
    }

    /// Request-finished listener calling the raw `on_request_finished` function
    pub fn request_finished_info_listener_create_with(
        &self,
        on_request_finished: OnRequestFinishedFn,
    ) -> RequestFinishedInfoListenerHandle {
        unsafe { (self.sym().request_finished_info_listener_create_with)(on_request_finished) }
    }

    /// Destroy `listener`; its handler, if any, is never called afterwards
    pub fn request_finished_info_listener_destroy(&self, listener: RequestFinishedInfoListenerHandle) {
        let slot = self.sym().request_finished_info_listener_destroy;
        FINISHED_LISTENERS.destroy(listener.addr(), || unsafe { slot(listener) })
    }

    /// Attach caller data to the request-finished listener
    pub fn request_finished_info_listener_set_client_context(
        &self,
        listener: RequestFinishedInfoListenerHandle,
        context: ClientContext,
    ) {
        unsafe { (self.sym().request_finished_info_listener_set_client_context)(listener, context) }
    }

    /// Caller data attached to the request-finished listener
    pub fn request_finished_info_listener_get_client_context(
        &self,
        listener: RequestFinishedInfoListenerHandle,
    ) -> ClientContext {
        unsafe { (self.sym().request_finished_info_listener_get_client_context)(listener) }
    }
}
