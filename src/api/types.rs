//! Native Enumerations
//!
//! The C ABI passes every enumeration as a plain `int32_t`. Each one is a
//! newtype over `i32` with named constants; values the native library adds in
//! later versions pass through unchanged and print as `UNKNOWN(<n>)`.

use std::fmt;

use crate::ffi::{BindError, BindResult};

macro_rules! native_enum {
    (
        $(#[$meta:meta])*
        pub struct $name:ident {
            $( $(#[$vmeta:meta])* $variant:ident = $value:expr; )*
        }
    ) => {
        $(#[$meta])*
        #[repr(transparent)]
        #[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
        pub struct $name(pub i32);

        impl $name {
            $( $(#[$vmeta])* pub const $variant: Self = Self($value); )*

            /// Every named value, in declaration order
            pub const ALL: &'static [Self] = &[$( Self::$variant ),*];

            /// Wrap a raw native value
            pub const fn from_raw(value: i32) -> Self {
                Self(value)
            }

            /// The raw native value
            pub const fn raw(self) -> i32 {
                self.0
            }

            /// Constant name, or `None` for values without one
            pub fn name(self) -> Option<&'static str> {
                match self.0 {
                    $( v if v == $value => Some(stringify!($variant)), )*
                    _ => None,
                }
            }

            /// Whether the value has a named constant
            pub fn is_known(self) -> bool {
                self.name().is_some()
            }
        }

        impl From<i32> for $name {
            fn from(value: i32) -> Self {
                Self(value)
            }
        }

        impl From<$name> for i32 {
            fn from(value: $name) -> i32 {
                value.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                match self.name() {
                    Some(name) => f.write_str(name),
                    None => write!(f, "UNKNOWN({})", self.0),
                }
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}::{}", stringify!($name), self)
            }
        }
    };
}

native_enum! {
    /// `Cronet_RESULT`, returned by engine and request operations.
    ///
    /// With `enable_check_result` set (the default), every value other than
    /// `SUCCESS` aborts inside the native library before it is ever returned.
    pub struct ResultCode {
        SUCCESS = 0;
        ILLEGAL_ARGUMENT = -100;
        ILLEGAL_ARGUMENT_STORAGE_PATH_MUST_EXIST = -101;
        ILLEGAL_ARGUMENT_INVALID_PIN = -102;
        ILLEGAL_ARGUMENT_INVALID_HOSTNAME = -103;
        ILLEGAL_ARGUMENT_INVALID_HTTP_METHOD = -104;
        ILLEGAL_ARGUMENT_INVALID_HTTP_HEADER = -105;
        ILLEGAL_STATE = -200;
        ILLEGAL_STATE_STORAGE_PATH_IN_USE = -201;
        ILLEGAL_STATE_CANNOT_SHUTDOWN_ENGINE_FROM_NETWORK_THREAD = -202;
        ILLEGAL_STATE_ENGINE_ALREADY_STARTED = -203;
        ILLEGAL_STATE_REQUEST_ALREADY_STARTED = -204;
        ILLEGAL_STATE_REQUEST_NOT_INITIALIZED = -205;
        ILLEGAL_STATE_REQUEST_ALREADY_INITIALIZED = -206;
        ILLEGAL_STATE_REQUEST_NOT_STARTED = -207;
        ILLEGAL_STATE_UNEXPECTED_REDIRECT = -208;
        ILLEGAL_STATE_UNEXPECTED_READ = -209;
        ILLEGAL_STATE_READ_FAILED = -210;
        NULL_POINTER = -300;
        NULL_POINTER_HOSTNAME = -301;
        NULL_POINTER_SHA256_PINS = -302;
        NULL_POINTER_EXPIRATION_DATE = -303;
        NULL_POINTER_ENGINE = -304;
        NULL_POINTER_URL = -305;
        NULL_POINTER_CALLBACK = -306;
        NULL_POINTER_EXECUTOR = -307;
        NULL_POINTER_METHOD = -308;
        NULL_POINTER_HEADER_NAME = -309;
        NULL_POINTER_HEADER_VALUE = -310;
        NULL_POINTER_PARAMS = -311;
        NULL_POINTER_REQUEST_FINISHED_INFO_LISTENER_EXECUTOR = -312;
    }
}

impl ResultCode {
    /// Whether this is `SUCCESS`
    pub fn is_success(self) -> bool {
        self == Self::SUCCESS
    }

    /// `Ok(())` for `SUCCESS`, otherwise [`BindError::NativeCallFailure`]
    pub fn into_result(self) -> BindResult<()> {
        if self.is_success() {
            Ok(())
        } else {
            Err(BindError::NativeCallFailure {
                code: self.0,
                name: self.name().unwrap_or("UNKNOWN"),
            })
        }
    }
}

native_enum! {
    /// `Cronet_EngineParams_HTTP_CACHE_MODE`
    pub struct HttpCacheMode {
        DISABLED = 0;
        IN_MEMORY = 1;
        DISK_NO_HTTP = 2;
        DISK = 3;
    }
}

native_enum! {
    /// `Cronet_UrlRequestParams_REQUEST_PRIORITY`
    pub struct RequestPriority {
        IDLE = 0;
        LOWEST = 1;
        LOW = 2;
        MEDIUM = 3;
        HIGHEST = 4;
    }
}

native_enum! {
    /// `Cronet_UrlRequestParams_IDEMPOTENCY`
    pub struct Idempotency {
        DEFAULT_IDEMPOTENCY = 0;
        IDEMPOTENT = 1;
        NOT_IDEMPOTENT = 2;
    }
}

native_enum! {
    /// `Cronet_UrlRequestStatusListener_Status`, reported by `OnStatus`
    pub struct RequestStatus {
        INVALID = -1;
        IDLE = 0;
        WAITING_FOR_STALLED_SOCKET_POOL = 1;
        WAITING_FOR_AVAILABLE_SOCKET = 2;
        WAITING_FOR_DELEGATE = 3;
        WAITING_FOR_CACHE = 4;
        DOWNLOADING_PAC_FILE = 5;
        RESOLVING_PROXY_FOR_URL = 6;
        RESOLVING_HOST_IN_PAC_FILE = 7;
        ESTABLISHING_PROXY_TUNNEL = 8;
        RESOLVING_HOST = 9;
        CONNECTING = 10;
        SSL_HANDSHAKE = 11;
        SENDING_REQUEST = 12;
        WAITING_FOR_RESPONSE = 13;
        READING_RESPONSE = 14;
    }
}

native_enum! {
    /// `Cronet_RequestFinishedInfo_FINISHED_REASON`
    pub struct FinishedReason {
        SUCCEEDED = 0;
        FAILED = 1;
        CANCELED = 2;
    }
}

native_enum! {
    /// `Cronet_Error_ERROR_CODE`
    pub struct ErrorCode {
        ERROR_CALLBACK = 0;
        ERROR_HOSTNAME_NOT_RESOLVED = 1;
        ERROR_INTERNET_DISCONNECTED = 2;
        ERROR_NETWORK_CHANGED = 3;
        ERROR_TIMED_OUT = 4;
        ERROR_CONNECTION_CLOSED = 5;
        ERROR_CONNECTION_TIMED_OUT = 6;
        ERROR_CONNECTION_REFUSED = 7;
        ERROR_CONNECTION_RESET = 8;
        ERROR_ADDRESS_UNREACHABLE = 9;
        ERROR_QUIC_PROTOCOL_FAILED = 10;
        ERROR_OTHER = 11;
    }
}

native_enum! {
    /// Chromium `net::Error` code, as returned by the `bidirectional_stream_*`
    /// calls and reported by `on_failed`.
    ///
    /// Only the common codes are named; every other value passes through.
    pub struct NetError {
        OK = 0;
        ERR_IO_PENDING = -1;
        ERR_FAILED = -2;
        ERR_ABORTED = -3;
        ERR_INVALID_ARGUMENT = -4;
        ERR_TIMED_OUT = -7;
        ERR_UNEXPECTED = -9;
        ERR_ACCESS_DENIED = -10;
        ERR_NOT_IMPLEMENTED = -11;
        ERR_SOCKET_NOT_CONNECTED = -15;
        ERR_NETWORK_CHANGED = -21;
        ERR_CONNECTION_CLOSED = -100;
        ERR_CONNECTION_RESET = -101;
        ERR_CONNECTION_REFUSED = -102;
        ERR_CONNECTION_ABORTED = -103;
        ERR_CONNECTION_FAILED = -104;
        ERR_NAME_NOT_RESOLVED = -105;
        ERR_INTERNET_DISCONNECTED = -106;
        ERR_SSL_PROTOCOL_ERROR = -107;
        ERR_ADDRESS_INVALID = -108;
        ERR_ADDRESS_UNREACHABLE = -109;
        ERR_TUNNEL_CONNECTION_FAILED = -111;
        ERR_CONNECTION_TIMED_OUT = -118;
        ERR_PROXY_CONNECTION_FAILED = -130;
        ERR_NAME_RESOLUTION_FAILED = -137;
        ERR_SSL_PINNED_KEY_NOT_IN_CERT_CHAIN = -150;
        ERR_CERT_COMMON_NAME_INVALID = -200;
        ERR_CERT_DATE_INVALID = -201;
        ERR_CERT_AUTHORITY_INVALID = -202;
        ERR_CERT_REVOKED = -206;
        ERR_CERT_INVALID = -207;
        ERR_INVALID_URL = -300;
        ERR_UNKNOWN_URL_SCHEME = -302;
        ERR_TOO_MANY_REDIRECTS = -310;
        ERR_INVALID_RESPONSE = -320;
        ERR_EMPTY_RESPONSE = -324;
        ERR_HTTP2_PROTOCOL_ERROR = -337;
        ERR_QUIC_PROTOCOL_ERROR = -356;
        ERR_QUIC_HANDSHAKE_FAILED = -358;
    }
}

impl NetError {
    /// Whether this is `OK`
    pub fn is_ok(self) -> bool {
        self == Self::OK
    }

    /// Whether the operation was accepted and completes through a callback
    pub fn is_pending(self) -> bool {
        self == Self::ERR_IO_PENDING
    }

    /// Lowercase description, e.g. `"connection refused"`
    pub fn message(self) -> String {
        match self.name() {
            Some("OK") => "ok".to_string(),
            Some(name) => name
                .trim_start_matches("ERR_")
                .to_ascii_lowercase()
                .replace('_', " "),
            None => format!("network error {}", self.0),
        }
    }

    /// Whether the error is one of the timeout codes
    pub fn is_timeout(self) -> bool {
        self == Self::ERR_TIMED_OUT || self == Self::ERR_CONNECTION_TIMED_OUT
    }
}
