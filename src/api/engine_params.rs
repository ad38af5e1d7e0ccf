//! Engine parameters, QUIC hints and public key pins
//!
//! Besides the plain field accessors, this module edits the
//! `experimental_options` JSON object key by key, which is how DNS behavior
//! and other unlisted engine features are configured.

use serde_json::{json, Map, Value};
use thiserror::Error;

use super::{Cronet, HttpCacheMode};
use crate::ffi::marshal::{read_c_string, with_c_str};
use crate::ffi::{EngineParamsHandle, PublicKeyPinsHandle, QuicHintHandle};

/// Keys understood inside `experimental_options`
pub mod option_keys {
    pub const ASYNC_DNS: &str = "AsyncDNS";
    pub const DNS_SERVER_OVERRIDE: &str = "DnsServerOverride";
    pub const HOST_RESOLVER_RULES: &str = "HostResolverRules";
    pub const USE_DNS_HTTPS_SVCB: &str = "UseDnsHttpsSvcb";
}

/// Errors editing the experimental options JSON
#[derive(Debug, Error)]
pub enum OptionsError {
    #[error("experimental options are not valid JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("experimental options must be a JSON object, found {0}")]
    NotAnObject(&'static str),
}

/// Insert (`Some`) or remove (`None`) `key` in the JSON object `current`.
///
/// Blank input counts as an empty object; other keys are preserved.
pub fn apply_experimental_option(
    current: &str,
    key: &str,
    value: Option<Value>,
) -> Result<String, OptionsError> {
    let current = current.trim();
    let mut options = if current.is_empty() {
        Map::new()
    } else {
        match serde_json::from_str::<Value>(current)? {
            Value::Object(map) => map,
            other => return Err(OptionsError::NotAnObject(json_kind(&other))),
        }
    };

    match value {
        Some(value) => {
            options.insert(key.to_string(), value);
        }
        None => {
            options.remove(key);
        }
    }

    Ok(Value::Object(options).to_string())
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

impl Cronet {
    /// Create an engine params
    pub fn engine_params_create(&self) -> EngineParamsHandle {
        unsafe { (self.sym().engine_params_create)() }
    }

    /// Destroy the engine params
    pub fn engine_params_destroy(&self, params: EngineParamsHandle) {
        unsafe { (self.sym().engine_params_destroy)(params) }
    }

    /// Whether non-success results abort inside the library (default true)
    pub fn engine_params_enable_check_result_set(&self, params: EngineParamsHandle, enable: bool) {
        unsafe { (self.sym().engine_params_enable_check_result_set)(params, enable) }
    }

    /// Whether non-success results abort inside the library
    pub fn engine_params_enable_check_result_get(&self, params: EngineParamsHandle) -> bool {
        unsafe { (self.sym().engine_params_enable_check_result_get)(params) }
    }

    /// Set the user agent
    pub fn engine_params_user_agent_set(&self, params: EngineParamsHandle, user_agent: &str) {
        let slot = self.sym().engine_params_user_agent_set;
        with_c_str(user_agent, |text| unsafe { slot(params, text) })
    }

    /// Current user agent
    pub fn engine_params_user_agent_get(&self, params: EngineParamsHandle) -> String {
        unsafe { read_c_string((self.sym().engine_params_user_agent_get)(params)) }
    }

    /// Set the accept language
    pub fn engine_params_accept_language_set(&self, params: EngineParamsHandle, language: &str) {
        let slot = self.sym().engine_params_accept_language_set;
        with_c_str(language, |text| unsafe { slot(params, text) })
    }

    /// Current accept language
    pub fn engine_params_accept_language_get(&self, params: EngineParamsHandle) -> String {
        unsafe { read_c_string((self.sym().engine_params_accept_language_get)(params)) }
    }

    /// Directory for the disk cache and prefs; must already exist
    pub fn engine_params_storage_path_set(&self, params: EngineParamsHandle, path: &str) {
        let slot = self.sym().engine_params_storage_path_set;
        with_c_str(path, |text| unsafe { slot(params, text) })
    }

    /// Cache and prefs directory
    pub fn engine_params_storage_path_get(&self, params: EngineParamsHandle) -> String {
        unsafe { read_c_string((self.sym().engine_params_storage_path_get)(params)) }
    }

    /// Enable or disable QUIC
    pub fn engine_params_enable_quic_set(&self, params: EngineParamsHandle, enable: bool) {
        unsafe { (self.sym().engine_params_enable_quic_set)(params, enable) }
    }

    /// Whether QUIC is enabled
    pub fn engine_params_enable_quic_get(&self, params: EngineParamsHandle) -> bool {
        unsafe { (self.sym().engine_params_enable_quic_get)(params) }
    }

    /// Enable or disable HTTP/2
    pub fn engine_params_enable_http2_set(&self, params: EngineParamsHandle, enable: bool) {
        unsafe { (self.sym().engine_params_enable_http2_set)(params, enable) }
    }

    /// Whether HTTP/2 is enabled
    pub fn engine_params_enable_http2_get(&self, params: EngineParamsHandle) -> bool {
        unsafe { (self.sym().engine_params_enable_http2_get)(params) }
    }

    /// Enable or disable brotli decoding
    pub fn engine_params_enable_brotli_set(&self, params: EngineParamsHandle, enable: bool) {
        unsafe { (self.sym().engine_params_enable_brotli_set)(params, enable) }
    }

    /// Whether brotli decoding is enabled
    pub fn engine_params_enable_brotli_get(&self, params: EngineParamsHandle) -> bool {
        unsafe { (self.sym().engine_params_enable_brotli_get)(params) }
    }

    /// Set the HTTP cache mode
    pub fn engine_params_http_cache_mode_set(&self, params: EngineParamsHandle, mode: HttpCacheMode) {
        unsafe { (self.sym().engine_params_http_cache_mode_set)(params, mode.raw()) }
    }

    /// Current HTTP cache mode
    pub fn engine_params_http_cache_mode_get(&self, params: EngineParamsHandle) -> HttpCacheMode {
        HttpCacheMode::from_raw(unsafe { (self.sym().engine_params_http_cache_mode_get)(params) })
    }

    /// Maximum cache size in bytes
    pub fn engine_params_http_cache_max_size_set(&self, params: EngineParamsHandle, bytes: i64) {
        unsafe { (self.sym().engine_params_http_cache_max_size_set)(params, bytes) }
    }

    /// Maximum cache size in bytes
    pub fn engine_params_http_cache_max_size_get(&self, params: EngineParamsHandle) -> i64 {
        unsafe { (self.sym().engine_params_http_cache_max_size_get)(params) }
    }

    /// Append a copy of `hint`; the caller keeps ownership of `hint`
    pub fn engine_params_quic_hints_add(&self, params: EngineParamsHandle, hint: QuicHintHandle) {
        unsafe { (self.sym().engine_params_quic_hints_add)(params, hint) }
    }

    /// Number of QUIC hints
    pub fn engine_params_quic_hints_size(&self, params: EngineParamsHandle) -> u32 {
        unsafe { (self.sym().engine_params_quic_hints_size)(params) }
    }

    /// Hint at `index`, owned by `params`
    pub fn engine_params_quic_hints_at(&self, params: EngineParamsHandle, index: u32) -> QuicHintHandle {
        unsafe { (self.sym().engine_params_quic_hints_at)(params, index) }
    }

    /// Remove every QUIC hint
    pub fn engine_params_quic_hints_clear(&self, params: EngineParamsHandle) {
        unsafe { (self.sym().engine_params_quic_hints_clear)(params) }
    }

    /// Append a copy of `pins`; the caller keeps ownership of `pins`
    pub fn engine_params_public_key_pins_add(
        &self,
        params: EngineParamsHandle,
        pins: PublicKeyPinsHandle,
    ) {
        unsafe { (self.sym().engine_params_public_key_pins_add)(params, pins) }
    }

    /// Number of pin sets
    pub fn engine_params_public_key_pins_size(&self, params: EngineParamsHandle) -> u32 {
        unsafe { (self.sym().engine_params_public_key_pins_size)(params) }
    }

    /// Pin set at `index`, owned by `params`
    pub fn engine_params_public_key_pins_at(
        &self,
        params: EngineParamsHandle,
        index: u32,
    ) -> PublicKeyPinsHandle {
        unsafe { (self.sym().engine_params_public_key_pins_at)(params, index) }
    }

    /// Remove every pin set
    pub fn engine_params_public_key_pins_clear(&self, params: EngineParamsHandle) {
        unsafe { (self.sym().engine_params_public_key_pins_clear)(params) }
    }

    /// Skip pin checks for chains ending in a locally installed root
    pub fn engine_params_enable_public_key_pinning_bypass_for_local_trust_anchors_set(
        &self,
        params: EngineParamsHandle,
        enable: bool,
    ) {
        let slot = self
            .sym()
            .engine_params_enable_public_key_pinning_bypass_for_local_trust_anchors_set;
        unsafe { slot(params, enable) }
    }

    /// Whether pin checks are skipped for locally installed roots
    pub fn engine_params_enable_public_key_pinning_bypass_for_local_trust_anchors_get(
        &self,
        params: EngineParamsHandle,
    ) -> bool {
        let slot = self
            .sym()
            .engine_params_enable_public_key_pinning_bypass_for_local_trust_anchors_get;
        unsafe { slot(params) }
    }

    /// Replace the whole experimental options JSON string
    pub fn engine_params_experimental_options_set(&self, params: EngineParamsHandle, options: &str) {
        let slot = self.sym().engine_params_experimental_options_set;
        with_c_str(options, |text| unsafe { slot(params, text) })
    }

    /// Current experimental options JSON string
    pub fn engine_params_experimental_options_get(&self, params: EngineParamsHandle) -> String {
        unsafe { read_c_string((self.sym().engine_params_experimental_options_get)(params)) }
    }

    /// Set (`Some`) or remove (`None`) one key of the experimental options,
    /// keeping all others.
    pub fn engine_params_set_experimental_option(
        &self,
        params: EngineParamsHandle,
        key: &str,
        value: Option<Value>,
    ) -> Result<(), OptionsError> {
        let current = self.engine_params_experimental_options_get(params);
        let updated = apply_experimental_option(&current, key, value)?;
        log::debug!("cronet: experimental options now {}", updated);
        self.engine_params_experimental_options_set(params, &updated);
        Ok(())
    }

    /// Use the built-in asynchronous DNS client
    pub fn engine_params_set_async_dns(
        &self,
        params: EngineParamsHandle,
        enable: bool,
    ) -> Result<(), OptionsError> {
        let value = enable.then(|| json!({ "enable": true }));
        self.engine_params_set_experimental_option(params, option_keys::ASYNC_DNS, value)
    }

    /// Resolve exclusively through `nameservers` (`"ip:port"`, IPv6 as
    /// `"[ip]:port"`). An empty list removes the override.
    pub fn engine_params_set_dns_server_override<S: AsRef<str>>(
        &self,
        params: EngineParamsHandle,
        nameservers: &[S],
    ) -> Result<(), OptionsError> {
        let value = (!nameservers.is_empty()).then(|| {
            let list: Vec<&str> = nameservers.iter().map(AsRef::as_ref).collect();
            json!({ "nameservers": list })
        });
        self.engine_params_set_experimental_option(params, option_keys::DNS_SERVER_OVERRIDE, value)
    }

    /// Host resolver rules such as `"MAP foo 1.2.3.4, EXCLUDE bar"`. Empty
    /// removes them.
    pub fn engine_params_set_host_resolver_rules(
        &self,
        params: EngineParamsHandle,
        rules: &str,
    ) -> Result<(), OptionsError> {
        let value = (!rules.is_empty()).then(|| json!({ "host_resolver_rules": rules }));
        self.engine_params_set_experimental_option(params, option_keys::HOST_RESOLVER_RULES, value)
    }

    /// DNS HTTPS (SVCB, type 65) lookups; required for ECH
    pub fn engine_params_set_use_dns_https_svcb(
        &self,
        params: EngineParamsHandle,
        enable: bool,
    ) -> Result<(), OptionsError> {
        self.engine_params_set_experimental_option(
            params,
            option_keys::USE_DNS_HTTPS_SVCB,
            Some(json!({ "enable": enable })),
        )
    }

    // -------------------------------------------------------------------------
    // QuicHint
    // -------------------------------------------------------------------------

    /// Create a QUIC hint
    pub fn quic_hint_create(&self) -> QuicHintHandle {
        unsafe { (self.sym().quic_hint_create)() }
    }

    /// Destroy the QUIC hint
    pub fn quic_hint_destroy(&self, hint: QuicHintHandle) {
        unsafe { (self.sym().quic_hint_destroy)(hint) }
    }

    /// Set the host
    pub fn quic_hint_host_set(&self, hint: QuicHintHandle, host: &str) {
        let slot = self.sym().quic_hint_host_set;
        with_c_str(host, |text| unsafe { slot(hint, text) })
    }

    /// Current host
    pub fn quic_hint_host_get(&self, hint: QuicHintHandle) -> String {
        unsafe { read_c_string((self.sym().quic_hint_host_get)(hint)) }
    }

    /// Set the port
    pub fn quic_hint_port_set(&self, hint: QuicHintHandle, port: i32) {
        unsafe { (self.sym().quic_hint_port_set)(hint, port) }
    }

    /// Current port
    pub fn quic_hint_port_get(&self, hint: QuicHintHandle) -> i32 {
        unsafe { (self.sym().quic_hint_port_get)(hint) }
    }

    /// Set the alternate port
    pub fn quic_hint_alternate_port_set(&self, hint: QuicHintHandle, port: i32) {
        unsafe { (self.sym().quic_hint_alternate_port_set)(hint, port) }
    }

    /// Current alternate port
    pub fn quic_hint_alternate_port_get(&self, hint: QuicHintHandle) -> i32 {
        unsafe { (self.sym().quic_hint_alternate_port_get)(hint) }
    }

    // -------------------------------------------------------------------------
    // PublicKeyPins
    // -------------------------------------------------------------------------

    /// Create a pin set
    pub fn public_key_pins_create(&self) -> PublicKeyPinsHandle {
        unsafe { (self.sym().public_key_pins_create)() }
    }

    /// Destroy the pin set
    pub fn public_key_pins_destroy(&self, pins: PublicKeyPinsHandle) {
        unsafe { (self.sym().public_key_pins_destroy)(pins) }
    }

    /// Set the host
    pub fn public_key_pins_host_set(&self, pins: PublicKeyPinsHandle, host: &str) {
        let slot = self.sym().public_key_pins_host_set;
        with_c_str(host, |text| unsafe { slot(pins, text) })
    }

    /// Current host
    pub fn public_key_pins_host_get(&self, pins: PublicKeyPinsHandle) -> String {
        unsafe { read_c_string((self.sym().public_key_pins_host_get)(pins)) }
    }

    /// Add a `"sha256/<base64>"` pin (see [`crate::pins::pin_string`])
    pub fn public_key_pins_pins_sha256_add(&self, pins: PublicKeyPinsHandle, pin: &str) {
        let slot = self.sym().public_key_pins_pins_sha256_add;
        with_c_str(pin, |text| unsafe { slot(pins, text) })
    }

    /// Number of `sha256/` pins
    pub fn public_key_pins_pins_sha256_size(&self, pins: PublicKeyPinsHandle) -> u32 {
        unsafe { (self.sym().public_key_pins_pins_sha256_size)(pins) }
    }

    /// Pin at `index`
    pub fn public_key_pins_pins_sha256_at(&self, pins: PublicKeyPinsHandle, index: u32) -> String {
        unsafe { read_c_string((self.sym().public_key_pins_pins_sha256_at)(pins, index)) }
    }

    /// Remove every pin
    pub fn public_key_pins_pins_sha256_clear(&self, pins: PublicKeyPinsHandle) {
        unsafe { (self.sym().public_key_pins_pins_sha256_clear)(pins) }
    }

    /// Apply the pins to subdomains too
    pub fn public_key_pins_include_subdomains_set(&self, pins: PublicKeyPinsHandle, include: bool) {
        unsafe { (self.sym().public_key_pins_include_subdomains_set)(pins, include) }
    }

    /// Whether the pins cover subdomains
    pub fn public_key_pins_include_subdomains_get(&self, pins: PublicKeyPinsHandle) -> bool {
        unsafe { (self.sym().public_key_pins_include_subdomains_get)(pins) }
    }

    /// Expiration as milliseconds since the Unix epoch
    pub fn public_key_pins_expiration_date_set(&self, pins: PublicKeyPinsHandle, millis: i64) {
        unsafe { (self.sym().public_key_pins_expiration_date_set)(pins, millis) }
    }

    /// Expiration as milliseconds since the Unix epoch
    pub fn public_key_pins_expiration_date_get(&self, pins: PublicKeyPinsHandle) -> i64 {
        unsafe { (self.sym().public_key_pins_expiration_date_get)(pins) }
    }
}
