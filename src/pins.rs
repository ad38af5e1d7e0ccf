//! Public Key Pins
//!
//! Helpers for the two places that take key hashes: `PublicKeyPins`, which
//! wants `"sha256/<base64>"` strings, and the public-key certificate
//! verifier, which wants raw 32-byte SHA-256 digests of each certificate's
//! SubjectPublicKeyInfo.

use base64::{engine::general_purpose, Engine as _};
use sha2::{Digest, Sha256};
use thiserror::Error;
use x509_parser::prelude::*;

/// Prefix of pin strings accepted by `Cronet_PublicKeyPins_pins_sha256_add`
pub const PIN_PREFIX: &str = "sha256/";

/// SHA-256 digest of a SubjectPublicKeyInfo
pub type SpkiHash = [u8; 32];

/// Pin helper errors
#[derive(Debug, Error)]
pub enum PinError {
    #[error("Invalid PEM: {0}")]
    Pem(#[from] std::io::Error),

    #[error("No certificates found in PEM")]
    NoCertificates,

    #[error("Invalid certificate: {0}")]
    Certificate(String),

    #[error("Invalid pin {0:?}: expected sha256/<base64 of 32 bytes>")]
    InvalidPin(String),
}

/// Result type for pin operations
pub type PinResult<T> = Result<T, PinError>;

/// SPKI SHA-256 of one DER-encoded certificate
pub fn spki_sha256(cert_der: &[u8]) -> PinResult<SpkiHash> {
    let (_, cert) = X509Certificate::from_der(cert_der)
        .map_err(|e| PinError::Certificate(format!("{:?}", e)))?;
    Ok(Sha256::digest(cert.public_key().raw).into())
}

/// SPKI SHA-256 of every certificate in a PEM bundle, in file order
pub fn spki_sha256_from_pem(pem: &str) -> PinResult<Vec<SpkiHash>> {
    let certs = rustls_pemfile::certs(&mut pem.as_bytes()).collect::<Result<Vec<_>, _>>()?;
    if certs.is_empty() {
        return Err(PinError::NoCertificates);
    }
    certs.iter().map(|der| spki_sha256(der.as_ref())).collect()
}

/// `"sha256/<base64>"` form of a hash
pub fn pin_string(hash: &SpkiHash) -> String {
    format!("{}{}", PIN_PREFIX, general_purpose::STANDARD.encode(hash))
}

/// Parse a `"sha256/<base64>"` pin back into its hash
pub fn parse_pin(pin: &str) -> PinResult<SpkiHash> {
    let invalid = || PinError::InvalidPin(pin.to_string());
    let encoded = pin.strip_prefix(PIN_PREFIX).ok_or_else(invalid)?;
    let bytes = general_purpose::STANDARD
        .decode(encoded)
        .map_err(|_| invalid())?;
    SpkiHash::try_from(bytes.as_slice()).map_err(|_| invalid())
}

/// Lowercase hex form of a hash
pub fn hex_string(hash: &SpkiHash) -> String {
    hex::encode(hash)
}
