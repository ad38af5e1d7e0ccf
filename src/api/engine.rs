//! Engine lifecycle and certificate verifiers

use std::path::Path;

use super::{Cronet, ResultCode};
use crate::ffi::marshal::{read_c_string, with_c_path, with_c_str, PointerArray};
use crate::ffi::platform::{ActiveStart, StartStrategy};
use crate::ffi::{
    CertVerifierHandle, ClientContext, EngineHandle, EngineParamsHandle, ExecutorHandle,
    RequestFinishedInfoListenerHandle, StreamEngineHandle,
};
use crate::pins::SpkiHash;

impl Cronet {
    /// Create an engine
    pub fn engine_create(&self) -> EngineHandle {
        unsafe { (self.sym().engine_create)() }
    }

    /// Destroy the engine
    pub fn engine_destroy(&self, engine: EngineHandle) {
        unsafe { (self.sym().engine_destroy)(engine) }
    }

    /// Attach caller data to the engine
    pub fn engine_set_client_context(&self, engine: EngineHandle, context: ClientContext) {
        unsafe { (self.sym().engine_set_client_context)(engine, context) }
    }

    /// Caller data attached to the engine
    pub fn engine_get_client_context(&self, engine: EngineHandle) -> ClientContext {
        unsafe { (self.sym().engine_get_client_context)(engine) }
    }

    /// Start `engine` with a configured `params`.
    ///
    /// On Windows the call runs with the calling thread pinned for its whole
    /// duration.
    pub fn engine_start_with_params(
        &self,
        engine: EngineHandle,
        params: EngineParamsHandle,
    ) -> ResultCode {
        let start = self.sym().engine_start_with_params;
        let code = ActiveStart::run(|| unsafe { start(engine, params) });
        ResultCode::from_raw(code)
    }

    /// Start writing a net log to `file_name`; false if it could not be opened.
    ///
    /// On Unix the path's bytes reach the library unchanged, UTF-8 or not.
    pub fn engine_start_net_log_to_file(
        &self,
        engine: EngineHandle,
        file_name: impl AsRef<Path>,
        log_all: bool,
    ) -> bool {
        let slot = self.sym().engine_start_net_log_to_file;
        with_c_path(file_name.as_ref(), |name| unsafe { slot(engine, name, log_all) })
    }

    /// Stop the net log started by `engine_start_net_log_to_file`
    pub fn engine_stop_net_log(&self, engine: EngineHandle) {
        unsafe { (self.sym().engine_stop_net_log)(engine) }
    }

    /// Shut the engine down; must not be called from the network thread
    pub fn engine_shutdown(&self, engine: EngineHandle) -> ResultCode {
        ResultCode::from_raw(unsafe { (self.sym().engine_shutdown)(engine) })
    }

    /// Version of the loaded library
    pub fn engine_get_version_string(&self, engine: EngineHandle) -> String {
        unsafe { read_c_string((self.sym().engine_get_version_string)(engine)) }
    }

    /// User agent the engine sends when none is configured
    pub fn engine_get_default_user_agent(&self, engine: EngineHandle) -> String {
        unsafe { read_c_string((self.sym().engine_get_default_user_agent)(engine)) }
    }

    /// Register `listener`, called on `executor` for every finished request
    pub fn engine_add_request_finished_listener(
        &self,
        engine: EngineHandle,
        listener: RequestFinishedInfoListenerHandle,
        executor: ExecutorHandle,
    ) {
        unsafe { (self.sym().engine_add_request_finished_listener)(engine, listener, executor) }
    }

    /// Unregister a listener added with `engine_add_request_finished_listener`
    pub fn engine_remove_request_finished_listener(
        &self,
        engine: EngineHandle,
        listener: RequestFinishedInfoListenerHandle,
    ) {
        unsafe { (self.sym().engine_remove_request_finished_listener)(engine, listener) }
    }

    /// The engine's `stream_engine*`, used to create bidirectional streams.
    ///
    /// Owned by the engine; never destroy it separately.
    pub fn engine_get_stream_engine(&self, engine: EngineHandle) -> StreamEngineHandle {
        unsafe { (self.sym().engine_get_stream_engine)(engine) }
    }

    /// Install a certificate verifier before the engine is started.
    ///
    /// The engine takes ownership of `verifier`.
    pub fn engine_set_mock_cert_verifier_for_testing(
        &self,
        engine: EngineHandle,
        verifier: CertVerifierHandle,
    ) {
        unsafe { (self.sym().engine_set_mock_cert_verifier_for_testing)(engine, verifier) }
    }

    /// Verifier trusting only the PEM-encoded roots in `pem_root_certs`
    pub fn create_cert_verifier_with_root_certs(&self, pem_root_certs: &str) -> CertVerifierHandle {
        let slot = self.sym().create_cert_verifier_with_root_certs;
        with_c_str(pem_root_certs, |pem| unsafe { slot(pem) })
    }

    /// Verifier that accepts a chain only if one of its keys has a SPKI
    /// SHA-256 in `hashes`.
    ///
    /// The library reads exactly 32 bytes behind every element address, so
    /// the element type is fixed at [`SpkiHash`]. An empty list yields
    /// [`CertVerifierHandle::NULL`] without calling into the library.
    pub fn create_cert_verifier_with_public_key_sha256(
        &self,
        hashes: &[SpkiHash],
    ) -> CertVerifierHandle {
        let slot = self.sym().create_cert_verifier_with_public_key_sha256;
        if hashes.is_empty() {
            return CertVerifierHandle::NULL;
        }
        let array = PointerArray::new(hashes);
        unsafe { slot(array.as_ptr(), array.len()) }
    }

    /// Create a public-key verifier from `hashes` and install it on `engine`.
    ///
    /// Returns false, leaving the engine untouched, when no verifier could be
    /// created (including for an empty list).
    pub fn engine_set_cert_verifier_with_public_key_sha256(
        &self,
        engine: EngineHandle,
        hashes: &[SpkiHash],
    ) -> bool {
        let verifier = self.create_cert_verifier_with_public_key_sha256(hashes);
        if verifier.is_null() {
            return false;
        }
        self.engine_set_mock_cert_verifier_for_testing(engine, verifier);
        true
    }
}
