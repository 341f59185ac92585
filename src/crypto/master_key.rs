//! Platform master key for envelope encryption.

use base64::{engine::general_purpose, Engine as _};

use crate::error::{Error, Result};

/// The 256-bit platform master key protecting private keys at rest.
///
/// Loaded once at startup from configuration. A missing or malformed key is
/// a fatal [`Error::Configuration`]: the process must refuse to serve signing
/// requests rather than fall back to storing keys unprotected.
#[derive(Clone)]
pub struct MasterKey {
    bytes: [u8; 32],
}

impl MasterKey {
    /// Create a master key from raw bytes.
    pub fn from_bytes(bytes: [u8; 32]) -> Self {
        Self { bytes }
    }

    /// Decode a master key from its base64 configuration form.
    pub fn from_base64(encoded: &str) -> Result<Self> {
        let decoded = general_purpose::STANDARD
            .decode(encoded.trim())
            .map_err(|e| Error::Configuration(format!("master key is not valid base64: {e}")))?;
        let bytes: [u8; 32] = decoded.try_into().map_err(|v: Vec<u8>| {
            Error::Configuration(format!("master key must be 32 bytes, got {}", v.len()))
        })?;
        Ok(Self { bytes })
    }

    /// Load the master key from an environment variable.
    pub fn from_env(var: &str) -> Result<Self> {
        let encoded = std::env::var(var)
            .map_err(|_| Error::Configuration(format!("{var} is not set")))?;
        Self::from_base64(&encoded)
    }

    /// Raw key bytes for cipher construction.
    pub(crate) fn as_bytes(&self) -> &[u8; 32] {
        &self.bytes
    }
}

impl std::fmt::Debug for MasterKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MasterKey").field("bytes", &"[REDACTED]").finish()
    }
}
