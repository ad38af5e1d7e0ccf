//! Platform Adapters
//!
//! Architecture and OS specific calling behavior, selected at compile time.
//!
//! - [`FloatAbi`]: whether `double`-valued entry points can be called. 64-bit
//!   targets bind and call them; other targets never bind them and panic with
//!   [`BindError::PlatformUnsupported`] when they are used.
//! - [`StartStrategy`]: how the engine-start call is run. Windows requires it
//!   to stay on one OS thread for its whole duration, so it runs inside a
//!   [`ThreadPin`]; elsewhere it is a direct call.
//!
//! Both variants of each strategy are always compiled so either can be
//! exercised on any host; only the `Active*` aliases differ per target.

use std::cell::Cell;
use std::marker::PhantomData;

use super::error::{BindError, BindResult};
use super::handles::EngineParamsHandle;
use super::symbols::{FloatSymbols, SymbolSource};

/// Operation name reported for the thread-priority float calls
pub const NETWORK_THREAD_PRIORITY: &str = "NetworkThreadPriority";

// =============================================================================
// Float argument support
// =============================================================================

/// Strategy for the float-valued engine-params calls.
pub trait FloatAbi {
    /// Whether this target binds the float symbols at all
    const SUPPORTED: bool;

    /// Bind the float slots, or skip them on targets that cannot call them
    fn resolve<S: SymbolSource + ?Sized>(source: &S) -> BindResult<Option<FloatSymbols>>;

    /// `Cronet_EngineParams_network_thread_priority_set`
    fn set_network_thread_priority(
        slots: Option<&FloatSymbols>,
        params: EngineParamsHandle,
        priority: f64,
    );

    /// `Cronet_EngineParams_network_thread_priority_get`
    fn network_thread_priority(slots: Option<&FloatSymbols>, params: EngineParamsHandle) -> f64;
}

/// Calls the native float entry points directly.
#[derive(Debug, Clone, Copy)]
pub struct NativeFloat;

/// Never binds the float entry points; every use panics.
#[derive(Debug, Clone, Copy)]
pub struct UnsupportedFloat;

fn bound(slots: Option<&FloatSymbols>) -> &FloatSymbols {
    match slots {
        Some(slots) => slots,
        // A library resolved under `NativeFloat` always carries the slots.
        None => panic!(
            "{}",
            BindError::SymbolMissing {
                symbol: "Cronet_EngineParams_network_thread_priority_set".to_string(),
            }
        ),
    }
}

impl FloatAbi for NativeFloat {
    const SUPPORTED: bool = true;

    fn resolve<S: SymbolSource + ?Sized>(source: &S) -> BindResult<Option<FloatSymbols>> {
        FloatSymbols::resolve(source).map(Some)
    }

    fn set_network_thread_priority(
        slots: Option<&FloatSymbols>,
        params: EngineParamsHandle,
        priority: f64,
    ) {
        let slots = bound(slots);
        unsafe { (slots.engine_params_network_thread_priority_set)(params, priority) }
    }

    fn network_thread_priority(slots: Option<&FloatSymbols>, params: EngineParamsHandle) -> f64 {
        let slots = bound(slots);
        unsafe { (slots.engine_params_network_thread_priority_get)(params) }
    }
}

impl FloatAbi for UnsupportedFloat {
    const SUPPORTED: bool = false;

    fn resolve<S: SymbolSource + ?Sized>(_source: &S) -> BindResult<Option<FloatSymbols>> {
        Ok(None)
    }

    fn set_network_thread_priority(
        _slots: Option<&FloatSymbols>,
        _params: EngineParamsHandle,
        _priority: f64,
    ) {
        panic!(
            "{}",
            BindError::PlatformUnsupported {
                operation: NETWORK_THREAD_PRIORITY,
            }
        )
    }

    fn network_thread_priority(_slots: Option<&FloatSymbols>, _params: EngineParamsHandle) -> f64 {
        panic!(
            "{}",
            BindError::PlatformUnsupported {
                operation: NETWORK_THREAD_PRIORITY,
            }
        )
    }
}

/// Float strategy for the compilation target
#[cfg(target_pointer_width = "64")]
pub type ActiveFloat = NativeFloat;

/// Float strategy for the compilation target
#[cfg(not(target_pointer_width = "64"))]
pub type ActiveFloat = UnsupportedFloat;

// =============================================================================
// Engine-start thread affinity
// =============================================================================

thread_local! {
    static PIN_DEPTH: Cell<usize> = const { Cell::new(0) };
}

/// Scoped marker that the current OS thread must not be given up until drop.
///
/// A synchronous Rust call never migrates to another OS thread, so holding
/// the native call inside the scope already guarantees the affinity; the
/// per-thread depth counter only makes the pinned state observable, for
/// [`is_thread_pinned`] and for nested scopes.
///
/// Not `Send`: a pin belongs to the thread that acquired it. Nested pins on
/// one thread are counted; the thread is unpinned when the last one drops,
/// which also happens while unwinding.
#[derive(Debug)]
pub struct ThreadPin {
    _thread_bound: PhantomData<*const ()>,
}

impl ThreadPin {
    /// Pin the calling thread
    pub fn acquire() -> Self {
        PIN_DEPTH.with(|depth| depth.set(depth.get() + 1));
        Self {
            _thread_bound: PhantomData,
        }
    }
}

impl Drop for ThreadPin {
    fn drop(&mut self) {
        PIN_DEPTH.with(|depth| depth.set(depth.get().saturating_sub(1)));
    }
}

/// Whether the calling thread is currently inside a [`ThreadPin`]
pub fn is_thread_pinned() -> bool {
    PIN_DEPTH.with(|depth| depth.get() > 0)
}

/// Strategy for running the engine-start call.
pub trait StartStrategy {
    /// Run `start` under this strategy's thread-affinity rules
    fn run<R>(start: impl FnOnce() -> R) -> R;
}

/// Runs the start call as-is.
#[derive(Debug, Clone, Copy)]
pub struct DirectStart;

/// Runs the start call with the calling thread pinned.
#[derive(Debug, Clone, Copy)]
pub struct PinnedStart;

impl StartStrategy for DirectStart {
    fn run<R>(start: impl FnOnce() -> R) -> R {
        start()
    }
}

impl StartStrategy for PinnedStart {
    fn run<R>(start: impl FnOnce() -> R) -> R {
        let _pin = ThreadPin::acquire();
        start()
    }
}

/// Start strategy for the compilation target
#[cfg(windows)]
pub type ActiveStart = PinnedStart;

/// Start strategy for the compilation target
#[cfg(not(windows))]
pub type ActiveStart = DirectStart;
