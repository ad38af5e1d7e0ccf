//! Upload data providers and sinks
//!
//! The provider is implemented by the caller; the library drives it and the
//! provider answers each `Read`/`Rewind` through the sink it was handed.

use super::callbacks::UPLOAD_PROVIDERS;
use super::Cronet;
use crate::ffi::marshal::with_c_str;
use crate::ffi::symbols::{UploadCloseFn, UploadGetLengthFn, UploadReadFn, UploadRewindFn};
use crate::ffi::{ClientContext, UploadDataProviderHandle, UploadDataSinkHandle};

/// The four `Cronet_UploadDataProvider` entry points
#[derive(Debug, Clone, Copy)]
pub struct UploadDataProviderFns {
    /// Body length in bytes, or -1 for chunked
    pub get_length: UploadGetLengthFn,
    pub read: UploadReadFn,
    pub rewind: UploadRewindFn,
    pub close: UploadCloseFn,
}

impl Cronet {
    /// Upload provider calling the four raw functions in `fns`
    pub fn upload_data_provider_create_with(
        &self,
        fns: UploadDataProviderFns,
    ) -> UploadDataProviderHandle {
        unsafe {
            (self.sym().upload_data_provider_create_with)(
                fns.get_length,
                fns.read,
                fns.rewind,
                fns.close,
            )
        }
    }

    /// Destroy `provider`; its handler, if any, is never called afterwards
    pub fn upload_data_provider_destroy(&self, provider: UploadDataProviderHandle) {
        let slot = self.sym().upload_data_provider_destroy;
        UPLOAD_PROVIDERS.destroy(provider.addr(), || unsafe { slot(provider) })
    }

    /// Attach caller data to the upload provider
    pub fn upload_data_provider_set_client_context(
        &self,
        provider: UploadDataProviderHandle,
        context: ClientContext,
    ) {
        unsafe { (self.sym().upload_data_provider_set_client_context)(provider, context) }
    }

    /// Caller data attached to the upload provider
    pub fn upload_data_provider_get_client_context(
        &self,
        provider: UploadDataProviderHandle,
    ) -> ClientContext {
        unsafe { (self.sym().upload_data_provider_get_client_context)(provider) }
    }

    /// Destroy the upload sink
    pub fn upload_data_sink_destroy(&self, sink: UploadDataSinkHandle) {
        unsafe { (self.sym().upload_data_sink_destroy)(sink) }
    }

    /// Attach caller data to the upload sink
    pub fn upload_data_sink_set_client_context(
        &self,
        sink: UploadDataSinkHandle,
        context: ClientContext,
    ) {
        unsafe { (self.sym().upload_data_sink_set_client_context)(sink, context) }
    }

    /// Caller data attached to the upload sink
    pub fn upload_data_sink_get_client_context(&self, sink: UploadDataSinkHandle) -> ClientContext {
        unsafe { (self.sym().upload_data_sink_get_client_context)(sink) }
    }

    /// `bytes_read` bytes were written to the read buffer; `final_chunk` ends
    /// a chunked upload
    pub fn upload_data_sink_on_read_succeeded(
        &self,
        sink: UploadDataSinkHandle,
        bytes_read: u64,
        final_chunk: bool,
    ) {
        unsafe { (self.sym().upload_data_sink_on_read_succeeded)(sink, bytes_read, final_chunk) }
    }

    /// Fail the pending read with `message`; the request fails
    pub fn upload_data_sink_on_read_error(&self, sink: UploadDataSinkHandle, message: &str) {
        let slot = self.sym().upload_data_sink_on_read_error;
        with_c_str(message, |text| unsafe { slot(sink, text) })
    }

    /// The pending rewind finished
    pub fn upload_data_sink_on_rewind_succeeded(&self, sink: UploadDataSinkHandle) {
        unsafe { (self.sym().upload_data_sink_on_rewind_succeeded)(sink) }
    }

    /// Fail the pending rewind with `message`; the request fails
    pub fn upload_data_sink_on_rewind_error(&self, sink: UploadDataSinkHandle, message: &str) {
        let slot = self.sym().upload_data_sink_on_rewind_error;
        with_c_str(message, |text| unsafe { slot(sink, text) })
    }
}
