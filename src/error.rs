//! Error types for the signing core.
//!
//! This module defines all error types that can occur during certificate
//! provisioning, PKCS#12 extraction, key encryption and signature placement.

/// Result type alias for signing core operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur in the signing core.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Missing or invalid configuration (master key, bundle password).
    ///
    /// Fatal: a process without a valid master key must not serve signing
    /// requests, otherwise private keys would be persisted unprotected.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Wrong PKCS#12 or content password. Recoverable; the user retries.
    #[error("Invalid credentials: {0}")]
    InvalidCredentials(String),

    /// AEAD tag verification failed on decrypt.
    ///
    /// Deliberately covers both "wrong password" and "corrupted data" so the
    /// message never acts as a password oracle. Must never be downgraded to
    /// treating the payload as plaintext.
    #[error("Integrity error: decryption failed")]
    Integrity,

    /// Serialized encrypted payload is structurally malformed
    #[error("Invalid encrypted payload: {0}")]
    InvalidPayload(String),

    /// No certificate could be provisioned for the environment
    #[error("Certificate state error: {0}")]
    CertificateState(String),

    /// PKCS#12/X.509 structure could not be parsed (not a credential failure)
    #[error("Certificate parse error: {0}")]
    CertificateParse(String),

    /// Invalid signature placement input (non-positive scale, page 0, ...)
    #[error("Invalid placement: {0}")]
    InvalidPlacement(String),

    /// Signature image bytes could not be decoded
    #[error("Image error: {0}")]
    Image(String),

    /// Underlying OpenSSL failure during generation or parsing
    #[error("OpenSSL error: {0}")]
    OpenSsl(#[from] openssl::error::ErrorStack),

    /// Certificate repository failure
    #[error("Repository error: {0}")]
    Repository(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
