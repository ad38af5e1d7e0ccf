//! Native Handles
//!
//! Every native object is referenced through an opaque pointer. Each kind gets
//! its own `#[repr(transparent)]` newtype so an engine handle cannot be passed
//! where a request handle is expected, while staying ABI-identical to the C
//! pointer it wraps.
//!
//! Ownership follows the native create/destroy pairs: whoever calls a
//! `*_create` operation must call the matching `*_destroy` exactly once, and no
//! handle may be used after it has been destroyed. None of this is tracked
//! here.

use std::ffi::c_void;
use std::fmt;

macro_rules! native_handles {
    ($( $(#[$meta:meta])* $name:ident; )*) => {
        $(
            $(#[$meta])*
            #[repr(transparent)]
            #[derive(Clone, Copy, PartialEq, Eq, Hash)]
            pub struct $name(*mut c_void);

            // The wrapper never dereferences the pointer; thread-safety of the
            // object behind it is the native library's contract.
            unsafe impl Send for $name {}
            unsafe impl Sync for $name {}

            impl $name {
                /// The null handle
                pub const NULL: Self = Self(std::ptr::null_mut());

                /// Wrap a raw native pointer
                pub const fn from_raw(ptr: *mut c_void) -> Self {
                    Self(ptr)
                }

                /// The raw native pointer
                pub const fn as_raw(self) -> *mut c_void {
                    self.0
                }

                /// Whether this is the null handle
                pub fn is_null(self) -> bool {
                    self.0.is_null()
                }

                /// Integer value of the handle
                pub fn addr(self) -> usize {
                    self.0 as usize
                }
            }

            impl Default for $name {
                fn default() -> Self {
                    Self::NULL
                }
            }

            impl fmt::Debug for $name {
                fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                    write!(f, "{}({:#x})", stringify!($name), self.addr())
                }
            }
        )*
    };
}

native_handles! {
    /// `Cronet_BufferPtr`
    BufferHandle;
    /// `Cronet_BufferCallbackPtr`
    BufferCallbackHandle;
    /// `Cronet_RunnablePtr`
    RunnableHandle;
    /// `Cronet_ExecutorPtr`
    ExecutorHandle;
    /// `Cronet_EnginePtr`
    EngineHandle;
    /// `Cronet_EngineParamsPtr`
    EngineParamsHandle;
    /// `Cronet_UrlRequestPtr`
    UrlRequestHandle;
    /// `Cronet_UrlRequestParamsPtr`
    UrlRequestParamsHandle;
    /// `Cronet_UrlRequestCallbackPtr`
    UrlRequestCallbackHandle;
    /// `Cronet_UrlRequestStatusListenerPtr`
    UrlRequestStatusListenerHandle;
    /// `Cronet_UploadDataProviderPtr`
    UploadDataProviderHandle;
    /// `Cronet_UploadDataSinkPtr`
    UploadDataSinkHandle;
    /// `Cronet_UrlResponseInfoPtr`
    UrlResponseInfoHandle;
    /// `Cronet_ErrorPtr`
    ErrorHandle;
    /// `Cronet_HttpHeaderPtr`
    HttpHeaderHandle;
    /// `Cronet_QuicHintPtr`
    QuicHintHandle;
    /// `Cronet_PublicKeyPinsPtr`
    PublicKeyPinsHandle;
    /// `Cronet_DateTimePtr`
    DateTimeHandle;
    /// `Cronet_MetricsPtr`
    MetricsHandle;
    /// `Cronet_RequestFinishedInfoPtr`
    RequestFinishedInfoHandle;
    /// `Cronet_RequestFinishedInfoListenerPtr`
    RequestFinishedInfoListenerHandle;
    /// `Cronet_CertVerifierPtr`
    CertVerifierHandle;
    /// `stream_engine*`
    StreamEngineHandle;
    /// `bidirectional_stream*`
    BidirectionalStreamHandle;
    /// Caller-owned data attached to a native object (`Cronet_ClientContext`).
    ///
    /// Stored and returned verbatim; its lifetime is entirely the caller's.
    ClientContext;
}
