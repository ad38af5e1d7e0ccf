//! Binding Errors
//!
//! Two tiers: load/setup failures are returned from [`LoadGuard::load_library`]
//! and turned into panics by every typed call, while native result codes are
//! plain values that callers may convert with [`ResultCode::into_result`].
//!
//! [`LoadGuard::load_library`]: super::LoadGuard::load_library
//! [`ResultCode::into_result`]: crate::api::types::ResultCode::into_result

use std::path::PathBuf;

use thiserror::Error;

/// Error type for the binding layer
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BindError {
    /// No candidate location contained the native library
    #[error("cronet: library not found (searched: {})", display_searched(.searched))]
    NotFound { searched: Vec<PathBuf> },

    /// The platform dynamic loader rejected the file
    #[error("cronet: failed to load library {}: {reason}", .path.display())]
    OpenFailed { path: PathBuf, reason: String },

    /// A required exported entry point is absent
    #[error("cronet: symbol {symbol} not found")]
    SymbolMissing { symbol: String },

    /// Float-valued native call on a target that cannot pass float arguments
    #[error("cronet: {operation} not supported on 32-bit platforms")]
    PlatformUnsupported { operation: &'static str },

    /// A native call reported a failure result code
    #[error("cronet: native call failed with {name} ({code})")]
    NativeCallFailure { code: i32, name: &'static str },
}

impl BindError {
    /// Name of the missing symbol, if this is a [`BindError::SymbolMissing`]
    pub fn missing_symbol(&self) -> Option<&str> {
        match self {
            BindError::SymbolMissing { symbol } => Some(symbol),
            _ => None,
        }
    }

    /// Whether the error comes from loading (as opposed to a native call)
    pub fn is_load_error(&self) -> bool {
        matches!(
            self,
            BindError::NotFound { .. }
                | BindError::OpenFailed { .. }
                | BindError::SymbolMissing { .. }
        )
    }
}

fn display_searched(searched: &[PathBuf]) -> String {
    if searched.is_empty() {
        return "<nothing>".to_string();
    }
    searched
        .iter()
        .map(|p| p.display().to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Result type for binding operations
pub type BindResult<T> = Result<T, BindError>;
