//! Typed API
//!
//! One method per native capability, grouped by area into submodules that all
//! extend [`Cronet`]. Every method first makes sure the library is loaded
//! (panicking with the load error if it cannot be), then calls the bound slot
//! directly.
//!
//! Handles are plain values. Creating an object makes the caller responsible
//! for destroying it exactly once; nothing here tracks liveness, so passing a
//! destroyed or foreign handle is undefined behavior on the native side even
//! though the methods themselves are not marked `unsafe`. The few operations
//! that additionally take caller memory which must outlive the call are
//! `unsafe fn`.
//!
//! Objects that call back (executors, request callbacks, upload providers and
//! the rest) can be created either from raw `extern "C"` functions
//! (`*_create_with`) or from Rust closures and handler traits (`*_create`),
//! which are dispatched through per-kind registries.
//!
//! # Example
//!
//! ```ignore
//! let cronet = Cronet::global();
//! let params = cronet.engine_params_create();
//! cronet.engine_params_user_agent_set(params, "demo/1.0");
//!
//! let engine = cronet.engine_create();
//! cronet.engine_start_with_params(engine, params).into_result()?;
//! println!("{}", cronet.engine_get_version_string(engine));
//! ```

mod buffer;
mod callbacks;
mod engine;
mod engine_params;
mod executor;
mod metrics;
mod request;
mod response;
mod stream;
pub mod types;
mod upload;

use std::path::Path;
use std::sync::Arc;

use crate::ffi::platform::{ActiveFloat, FloatAbi};
use crate::ffi::{
    BindResult, EngineParamsHandle, FloatSymbols, LoadGuard, NativeLibrary, SymbolTable,
};

pub use callbacks::{
    BidirectionalStreamHandler, BufferReleaseHandler, ExecuteHandler, RequestFinishedHandler,
    RunHandler, StatusHandler, UploadDataProviderHandler, UrlRequestCallbackHandler,
};
pub use engine_params::{apply_experimental_option, option_keys, OptionsError};
pub use metrics::METRICS_TIMESTAMPS;
pub use request::UrlRequestCallbackFns;
pub use stream::{read_header_array, StreamHeaders};
pub use types::*;
pub use upload::UploadDataProviderFns;

/// Entry point to the native library.
///
/// Cheap to clone; clones share the same load guard.
#[derive(Debug, Clone)]
pub struct Cronet {
    guard: Arc<LoadGuard>,
}

impl Cronet {
    /// Bound to the process-wide guard
    pub fn global() -> Self {
        Self {
            guard: LoadGuard::global(),
        }
    }

    /// Bound to a specific guard
    pub fn with_guard(guard: Arc<LoadGuard>) -> Self {
        Self { guard }
    }

    /// The guard this instance loads through
    pub fn guard(&self) -> &Arc<LoadGuard> {
        &self.guard
    }

    /// Load the library now instead of on first use.
    ///
    /// `path` only matters for the first load of this guard.
    pub fn load(&self, path: Option<&Path>) -> BindResult<&NativeLibrary> {
        self.guard.load_library(path)
    }

    #[inline]
    fn native(&self) -> &NativeLibrary {
        self.guard.ensure_loaded()
    }

    #[inline]
    fn sym(&self) -> &SymbolTable {
        self.native().symbols()
    }

    #[inline]
    fn float(&self) -> Option<&FloatSymbols> {
        self.native().float_symbols()
    }

    /// `Cronet_EngineParams_network_thread_priority_set`.
    ///
    /// # Panics
    ///
    /// On 32-bit targets, with `PlatformUnsupported`.
    pub fn engine_params_network_thread_priority_set(
        &self,
        params: EngineParamsHandle,
        priority: f64,
    ) {
        ActiveFloat::set_network_thread_priority(self.float(), params, priority)
    }

    /// `Cronet_EngineParams_network_thread_priority_get`.
    ///
    /// # Panics
    ///
    /// On 32-bit targets, with `PlatformUnsupported`.
    pub fn engine_params_network_thread_priority_get(&self, params: EngineParamsHandle) -> f64 {
        ActiveFloat::network_thread_priority(self.float(), params)
    }
}

impl Default for Cronet {
    fn default() -> Self {
        Self::global()
    }
}
