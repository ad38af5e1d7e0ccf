//! FFI Binding Layer
//!
//! Loads the cronet shared library at runtime and binds its C ABI into
//! statically typed function slots.
//!
//! # Architecture
//!
//! ```text
//! Typed API call (crate::api)
//!       │
//!       ▼
//! LoadGuard::ensure_loaded (once per process)
//!       │
//!       ▼
//! LibraryLocator ──► libcronet.{so,dylib} / cronet.dll
//!       │
//!       ▼
//! Dynamic Loader (libloading, RTLD_NOW | RTLD_GLOBAL)
//!       │
//!       ▼
//! SymbolTable (typed extern "C" slots) + FloatSymbols (64-bit only)
//!       │
//!       ▼
//! Native call, strings marshaled through `marshal`
//! ```
//!
//! # Example
//!
//! ```ignore
//! let guard = LoadGuard::global();
//! let native = guard.load_library(Some(Path::new("/opt/cronet/libcronet.so")))?;
//! println!("{} symbols bound", native.symbol_count());
//! ```

mod error;
mod handles;
mod loader;
pub mod marshal;
pub mod platform;
pub mod symbols;

pub use error::{BindError, BindResult};
pub use handles::*;
pub use loader::{
    LibraryLocator, LoadGuard, LoadPhase, NativeLibrary, SearchEnv, DYLD_LIBRARY_PATH_VAR,
    LIBRARY_FILENAME, LIBRARY_PATH_VAR,
};
pub use symbols::{
    require_symbol, symbol_group, BidirectionalStreamCallback, BidirectionalStreamHeader,
    BidirectionalStreamHeaderArray, FloatSymbols, SymbolSource, SymbolTable,
};
