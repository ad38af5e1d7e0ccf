//! cronet-bind - Runtime Bindings to the Cronet Native Networking Library
//!
//! Loads `libcronet` (Chromium's network stack packaged as a C library) at
//! runtime, without linking against it at build time, and exposes every
//! exported entry point as a typed Rust method.
//!
//! # Features
//!
//! - **Runtime loading**: explicit path, executable directory, library search
//!   path variables and common system directories, tried in that order
//! - **Load once**: the first successful or failed load is cached for the
//!   whole process; concurrent first calls wait for the one attempt
//! - **Typed slots**: 254 C entry points bound to `extern "C"` function
//!   pointers with per-object handle newtypes
//! - **String marshaling**: owned NUL-terminated copies going in, copies of
//!   library-owned strings coming out
//! - **Platform strategies**: floating-point entry points only on 64-bit
//!   targets, and engine start pinned to its thread on Windows
//!
//! # Example
//!
//! ```ignore
//! use cronet_bind::Cronet;
//!
//! let cronet = Cronet::global();
//! cronet.load(None)?;
//!
//! let params = cronet.engine_params_create();
//! cronet.engine_params_user_agent_set(params, "demo/1.0");
//! let engine = cronet.engine_create();
//! cronet.engine_start_with_params(engine, params).into_result()?;
//!
//! println!("cronet {}", cronet.engine_get_version_string(engine));
//! cronet.engine_shutdown(engine);
//! cronet.engine_destroy(engine);
//! cronet.engine_params_destroy(params);
//! ```
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────┐
//! │   api::Cronet   │  One method per native capability
//! └────────┬────────┘
//!          │
//!          ▼
//! ┌─────────────────┐
//! │  ffi::LoadGuard │  Once-only locate, open, bind
//! └────────┬────────┘
//!          │
//!     ┌────┴────┐
//!     ▼         ▼
//! ┌───────┐  ┌──────────┐
//! │Symbols│  │ Platform │  Float ABI, thread pinning
//! └───┬───┘  └────┬─────┘
//!     └─────┬─────┘
//!           ▼
//! ┌─────────────────┐
//! │   libcronet     │
//! └─────────────────┘
//! ```

pub mod api;
pub mod config;
pub mod ffi;
pub mod pins;

pub use api::{Cronet, ResultCode};
pub use config::{BindConfig, ConfigError};
pub use ffi::{BindError, BindResult, LibraryLocator, LoadGuard, NativeLibrary};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
