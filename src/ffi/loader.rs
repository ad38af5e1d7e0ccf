//! Dynamic Library Loader
//!
//! Finds the cronet shared library, opens it once per [`LoadGuard`], and binds
//! the symbol table from it.
//!
//! The process-wide guard ([`LoadGuard::global`]) is what the typed API uses;
//! additional guards exist for tests and for callers that want to bind against
//! a different [`SymbolSource`].

use std::ffi::{c_void, OsString};
use std::fmt;
use std::mem::ManuallyDrop;
use std::panic::{self, AssertUnwindSafe};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use libloading::{Library, Symbol};
use log::{debug, error, info, warn};
use once_cell::sync::{Lazy, OnceCell};
use parking_lot::{Condvar, Mutex};

use super::error::{BindError, BindResult};
use super::platform::{ActiveFloat, FloatAbi};
use super::symbols::{FloatSymbols, SymbolSource, SymbolTable};
use crate::config::BindConfig;

/// Platform file name of the native library
pub const LIBRARY_FILENAME: &str = if cfg!(target_vendor = "apple") {
    "libcronet.dylib"
} else if cfg!(windows) {
    "cronet.dll"
} else {
    "libcronet.so"
};

/// Dynamic-library search variable consulted after the executable directory
pub const LIBRARY_PATH_VAR: &str = if cfg!(windows) {
    "PATH"
} else {
    "LD_LIBRARY_PATH"
};

/// Extra search variable consulted on macOS only
pub const DYLD_LIBRARY_PATH_VAR: &str = "DYLD_LIBRARY_PATH";

impl SymbolSource for Library {
    fn symbol_address(&self, name: &str) -> Option<*const c_void> {
        // SAFETY: the address is only reinterpreted by the symbol table,
        // which knows each symbol's signature.
        let symbol: Symbol<*const c_void> = unsafe { self.get(name.as_bytes()) }.ok()?;
        Some(*symbol)
    }
}

// =============================================================================
// Discovery
// =============================================================================

/// Process inputs to library discovery.
///
/// Separated from [`LibraryLocator`] so the search order can be checked
/// without touching the real environment.
#[derive(Debug, Clone, Default)]
pub struct SearchEnv {
    /// Directory containing the running executable
    pub exe_dir: Option<PathBuf>,
    /// Value of [`LIBRARY_PATH_VAR`]
    pub library_path: Option<OsString>,
    /// Value of [`DYLD_LIBRARY_PATH_VAR`]
    pub dyld_library_path: Option<OsString>,
}

impl SearchEnv {
    /// Snapshot the current process
    pub fn from_process() -> Self {
        let exe_dir = std::env::current_exe()
            .ok()
            .and_then(|exe| exe.parent().map(Path::to_path_buf));

        Self {
            exe_dir,
            library_path: std::env::var_os(LIBRARY_PATH_VAR),
            dyld_library_path: std::env::var_os(DYLD_LIBRARY_PATH_VAR),
        }
    }
}

/// Library search plan
#[derive(Debug, Clone)]
pub struct LibraryLocator {
    /// Used when the caller does not pass a path
    explicit: Option<PathBuf>,
    /// Standard system directories
    system_dirs: Vec<PathBuf>,
    /// Searched last
    extra_dirs: Vec<PathBuf>,
    /// File looked for in each directory
    filename: String,
    /// Whether `DYLD_LIBRARY_PATH` is consulted
    use_dyld_path: bool,
}

impl LibraryLocator {
    /// Locator with the platform defaults
    pub fn new() -> Self {
        Self {
            explicit: None,
            system_dirs: default_system_dirs(),
            extra_dirs: Vec::new(),
            filename: LIBRARY_FILENAME.to_string(),
            use_dyld_path: cfg!(target_os = "macos"),
        }
    }

    /// Use `path` whenever the caller does not pass one
    pub fn with_explicit_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.explicit = Some(path.into());
        self
    }

    /// Append a directory searched after the standard list
    pub fn add_search_path(&mut self, path: impl AsRef<Path>) {
        self.extra_dirs.push(path.as_ref().to_path_buf());
    }

    /// Replace the standard system directories
    pub fn with_system_dirs(mut self, dirs: Vec<PathBuf>) -> Self {
        self.system_dirs = dirs;
        self
    }

    /// Look for a different file name in each directory
    pub fn with_filename(mut self, filename: impl Into<String>) -> Self {
        self.filename = filename.into();
        self
    }

    /// Force `DYLD_LIBRARY_PATH` handling on or off
    pub fn with_dyld_path(mut self, enabled: bool) -> Self {
        self.use_dyld_path = enabled;
        self
    }

    /// The configured explicit path, if any
    pub fn explicit_path(&self) -> Option<&Path> {
        self.explicit.as_deref()
    }

    /// File name looked for in each directory
    pub fn filename(&self) -> &str {
        &self.filename
    }

    /// Directories in search order
    pub fn search_dirs(&self, env: &SearchEnv) -> Vec<PathBuf> {
        let mut dirs = Vec::new();

        if let Some(exe_dir) = &env.exe_dir {
            dirs.push(exe_dir.clone());
        }

        if let Some(value) = &env.library_path {
            dirs.extend(split_search_var(value));
        }

        if self.use_dyld_path {
            if let Some(value) = &env.dyld_library_path {
                dirs.extend(split_search_var(value));
            }
        }

        dirs.extend(self.system_dirs.iter().cloned());
        dirs.extend(self.extra_dirs.iter().cloned());
        dirs
    }

    /// Full candidate paths in search order
    pub fn candidates(&self, env: &SearchEnv) -> Vec<PathBuf> {
        self.search_dirs(env)
            .into_iter()
            .map(|dir| dir.join(&self.filename))
            .collect()
    }

    /// Resolve the library path.
    ///
    /// `explicit` (or the configured explicit path) must exist; otherwise the
    /// first existing candidate wins.
    pub fn locate(&self, explicit: Option<&Path>, env: &SearchEnv) -> BindResult<PathBuf> {
        if let Some(path) = explicit.or(self.explicit.as_deref()) {
            if path.exists() {
                return Ok(path.to_path_buf());
            }
            return Err(BindError::NotFound {
                searched: vec![path.to_path_buf()],
            });
        }

        let candidates = self.candidates(env);
        for candidate in &candidates {
            debug!("cronet: probing {}", candidate.display());
            if candidate.exists() {
                return Ok(candidate.clone());
            }
        }

        Err(BindError::NotFound {
            searched: candidates,
        })
    }
}

impl Default for LibraryLocator {
    fn default() -> Self {
        Self::new()
    }
}

fn split_search_var(value: &OsString) -> Vec<PathBuf> {
    std::env::split_paths(value)
        .filter(|dir| !dir.as_os_str().is_empty())
        .collect()
}

fn default_system_dirs() -> Vec<PathBuf> {
    if cfg!(unix) {
        vec![PathBuf::from("/usr/local/lib"), PathBuf::from("/usr/lib")]
    } else {
        Vec::new()
    }
}

// =============================================================================
// Opened library
// =============================================================================

/// An opened native library with every slot bound.
///
/// The underlying library is never closed, even when this value is dropped:
/// native background threads may still be running its code.
pub struct NativeLibrary {
    path: PathBuf,
    symbols: SymbolTable,
    float: Option<FloatSymbols>,
    _library: Option<ManuallyDrop<Library>>,
}

impl NativeLibrary {
    /// Open `path` with the platform loader and bind all symbols
    pub fn open(path: &Path) -> BindResult<Self> {
        let library = ManuallyDrop::new(open_native(path).map_err(|e| BindError::OpenFailed {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?);

        let mut native = Self::resolve(path, &*library)?;
        native._library = Some(library);
        Ok(native)
    }

    /// Open `path` and list every symbol it lacks, without binding.
    ///
    /// Float symbols are only checked on targets that bind them. The library
    /// stays loaded afterwards, like any other opened copy.
    pub fn audit(path: &Path) -> BindResult<Vec<&'static str>> {
        let library = ManuallyDrop::new(open_native(path).map_err(|e| BindError::OpenFailed {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?);

        let mut missing = SymbolTable::missing(&*library);
        if ActiveFloat::SUPPORTED {
            missing.extend(FloatSymbols::missing(&*library));
        }
        debug!("cronet: audited {} ({} missing)", path.display(), missing.len());
        Ok(missing)
    }

    /// Bind all symbols from an arbitrary source
    pub fn resolve<S: SymbolSource + ?Sized>(
        origin: impl Into<PathBuf>,
        source: &S,
    ) -> BindResult<Self> {
        let symbols = SymbolTable::resolve(source)?;
        let float = ActiveFloat::resolve(source)?;
        Ok(Self {
            path: origin.into(),
            symbols,
            float,
            _library: None,
        })
    }

    /// Where the library came from
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The bound symbol table
    pub fn symbols(&self) -> &SymbolTable {
        &self.symbols
    }

    /// Float slots, present only on targets that bind them
    pub fn float_symbols(&self) -> Option<&FloatSymbols> {
        self.float.as_ref()
    }

    /// Number of bound slots
    pub fn symbol_count(&self) -> usize {
        let float = if self.float.is_some() {
            FloatSymbols::SYMBOLS.len()
        } else {
            0
        };
        SymbolTable::SYMBOLS.len() + float
    }
}

impl fmt::Debug for NativeLibrary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NativeLibrary")
            .field("path", &self.path)
            .field("symbols", &self.symbol_count())
            .field("opened", &self._library.is_some())
            .finish()
    }
}

#[cfg(unix)]
fn open_native(path: &Path) -> Result<Library, libloading::Error> {
    use libloading::os::unix::{Library as UnixLibrary, RTLD_GLOBAL, RTLD_NOW};

    // SAFETY: loading runs the library's initializers; the library is trusted.
    unsafe { UnixLibrary::open(Some(path), RTLD_NOW | RTLD_GLOBAL) }.map(Library::from)
}

#[cfg(not(unix))]
fn open_native(path: &Path) -> Result<Library, libloading::Error> {
    // SAFETY: loading runs the library's initializers; the library is trusted.
    unsafe { Library::new(path) }
}

// =============================================================================
// Once-only guard
// =============================================================================

/// Progress of a [`LoadGuard`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadPhase {
    Unstarted,
    InProgress,
    Done,
}

/// Runs at most one load attempt and hands its outcome to every caller.
///
/// Concurrent callers block until the attempt finishes. Once done, the
/// outcome (success or failure) is final; later calls never retry.
pub struct LoadGuard {
    locator: LibraryLocator,
    phase: Mutex<LoadPhase>,
    settled: Condvar,
    outcome: OnceCell<BindResult<NativeLibrary>>,
    attempts: AtomicUsize,
}

static GLOBAL_GUARD: Lazy<Arc<LoadGuard>> = Lazy::new(|| {
    let locator = match BindConfig::load_from_cwd() {
        Ok(config) => config.locator(),
        Err(err) => {
            warn!("cronet: ignoring configuration: {}", err);
            BindConfig::default().locator()
        }
    };
    Arc::new(LoadGuard::new(locator))
});

impl LoadGuard {
    /// Guard that discovers the library with `locator`
    pub fn new(locator: LibraryLocator) -> Self {
        Self {
            locator,
            phase: Mutex::new(LoadPhase::Unstarted),
            settled: Condvar::new(),
            outcome: OnceCell::new(),
            attempts: AtomicUsize::new(0),
        }
    }

    /// The process-wide guard used by [`crate::Cronet::global`]
    pub fn global() -> Arc<LoadGuard> {
        Arc::clone(&GLOBAL_GUARD)
    }

    /// The discovery plan
    pub fn locator(&self) -> &LibraryLocator {
        &self.locator
    }

    /// Current phase
    pub fn phase(&self) -> LoadPhase {
        *self.phase.lock()
    }

    /// Number of open attempts made (0 or 1)
    pub fn attempts(&self) -> usize {
        self.attempts.load(Ordering::Acquire)
    }

    /// The loaded library, if loading has already succeeded
    pub fn loaded(&self) -> Option<&NativeLibrary> {
        match self.outcome.get() {
            Some(Ok(native)) => Some(native),
            _ => None,
        }
    }

    /// Find, open and bind the library (once).
    ///
    /// `path` is only honored by the first attempt; after that the cached
    /// outcome is returned regardless of the argument.
    pub fn load_library(&self, path: Option<&Path>) -> BindResult<&NativeLibrary> {
        if let (Some(native), Some(requested)) = (self.loaded(), path) {
            if native.path() != requested {
                debug!(
                    "cronet: already loaded from {}, ignoring {}",
                    native.path().display(),
                    requested.display()
                );
            }
        }

        self.load_with(|| {
            let env = SearchEnv::from_process();
            let target = self.locator.locate(path, &env)?;
            NativeLibrary::open(&target)
        })
    }

    /// Run `open` through the once-only machinery.
    ///
    /// If `open` panics, the guard settles as `OpenFailed` before the panic
    /// continues, so waiting callers are released.
    pub fn load_with<F>(&self, open: F) -> BindResult<&NativeLibrary>
    where
        F: FnOnce() -> BindResult<NativeLibrary>,
    {
        if self.outcome.get().is_some() {
            return self.cached();
        }

        {
            let mut phase = self.phase.lock();
            loop {
                match *phase {
                    LoadPhase::Done => return self.cached(),
                    LoadPhase::InProgress => self.settled.wait(&mut phase),
                    LoadPhase::Unstarted => break,
                }
            }
            *phase = LoadPhase::InProgress;
        }

        self.attempts.fetch_add(1, Ordering::AcqRel);

        match panic::catch_unwind(AssertUnwindSafe(open)) {
            Ok(outcome) => {
                match &outcome {
                    Ok(native) => info!(
                        "cronet: loaded {} ({} symbols)",
                        native.path().display(),
                        native.symbol_count()
                    ),
                    Err(err) => error!("{}", err),
                }
                self.settle(outcome);
                self.cached()
            }
            Err(payload) => {
                let reason = panic_message(payload.as_ref());
                error!("cronet: load attempt panicked: {}", reason);
                self.settle(Err(BindError::OpenFailed {
                    path: self.locator.explicit_path().map(Path::to_path_buf).unwrap_or_default(),
                    reason: format!("load attempt panicked: {}", reason),
                }));
                panic::resume_unwind(payload)
            }
        }
    }

    /// Load (once) and return the library, panicking on failure.
    ///
    /// Every typed API call goes through here.
    pub fn ensure_loaded(&self) -> &NativeLibrary {
        match self.load_library(None) {
            Ok(native) => native,
            Err(err) => panic!("{}", err),
        }
    }

    fn settle(&self, outcome: BindResult<NativeLibrary>) {
        // Only the single in-progress attempt reaches here.
        let _ = self.outcome.set(outcome);
        let mut phase = self.phase.lock();
        *phase = LoadPhase::Done;
        self.settled.notify_all();
    }

    fn cached(&self) -> BindResult<&NativeLibrary> {
        match self.outcome.get() {
            Some(Ok(native)) => Ok(native),
            Some(Err(err)) => Err(err.clone()),
            None => Err(BindError::OpenFailed {
                path: PathBuf::new(),
                reason: "load outcome missing".to_string(),
            }),
        }
    }
}

impl Default for LoadGuard {
    fn default() -> Self {
        Self::new(LibraryLocator::new())
    }
}

impl fmt::Debug for LoadGuard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoadGuard")
            .field("phase", &self.phase())
            .field("attempts", &self.attempts())
            .field("loaded", &self.loaded())
            .finish()
    }
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(text) = payload.downcast_ref::<&str>() {
        (*text).to_string()
    } else if let Some(text) = payload.downcast_ref::<String>() {
        text.clone()
    } else {
        "unknown panic".to_string()
    }
}
