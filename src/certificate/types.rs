//! Certificate data types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A persisted certificate row, as stored by the external row store.
///
/// Owned exclusively by the certificate store once persisted. `private_key_pem`
/// holds either a serialized encrypted envelope (current format) or a legacy
/// plaintext PEM that the store migrates in place on first read.
#[derive(Clone, Serialize, Deserialize)]
pub struct CertificateRecord {
    /// Unique serial number (unix millis plus a random suffix).
    pub serial_number: String,
    /// Certificate in PEM form. Safe to expose.
    pub certificate_pem: String,
    /// Private key: encrypted envelope, or legacy plaintext PEM.
    pub private_key_pem: String,
    /// Public key in PEM form. Safe to expose.
    pub public_key_pem: String,
    /// PKCS#12 bundle, base64-encoded, protected by the platform bundle password.
    pub p12_base64: String,
    /// Issuer display string (equal to `subject` for self-signed certificates).
    pub issuer: String,
    /// Subject display string.
    pub subject: String,
    /// Start of the validity window.
    pub valid_from: DateTime<Utc>,
    /// End of the validity window. Always after `valid_from`.
    pub valid_until: DateTime<Utc>,
    /// Logical deployment partition. At most one active row per environment.
    pub environment: String,
    /// Whether this is the environment's active certificate.
    ///
    /// Renewal flips this to `false` (soft delete); rows are never removed so
    /// previously issued signatures stay verifiable.
    pub is_active: bool,
    /// Row creation timestamp.
    pub created_at: DateTime<Utc>,
}

impl std::fmt::Debug for CertificateRecord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CertificateRecord")
            .field("serial_number", &self.serial_number)
            .field("environment", &self.environment)
            .field("subject", &self.subject)
            .field("valid_from", &self.valid_from)
            .field("valid_until", &self.valid_until)
            .field("is_active", &self.is_active)
            .field("private_key_pem", &"[REDACTED]")
            .finish()
    }
}

/// The environment's active certificate with its private key decrypted.
///
/// Produced and cached only by the certificate store; consumers receive it
/// read-only behind an `Arc`.
#[derive(Clone)]
pub struct ActiveCertificate {
    /// The persisted row this certificate was loaded from.
    pub record: CertificateRecord,
    /// Decrypted private key PEM, held in memory only.
    pub private_key_pem: String,
}

impl ActiveCertificate {
    /// Whether `now` falls inside the certificate's validity window.
    pub fn is_currently_valid(&self) -> bool {
        let now = Utc::now();
        self.record.is_active && self.record.valid_from <= now && now < self.record.valid_until
    }

    /// Whole days until expiry. Negative once expired.
    pub fn days_remaining(&self) -> i64 {
        (self.record.valid_until - Utc::now()).num_days()
    }

    /// Whether the certificate expires within `threshold_days`.
    ///
    /// Pure date arithmetic; used by external schedulers to prompt renewal.
    pub fn is_near_expiry(&self, threshold_days: i64) -> bool {
        self.days_remaining() <= threshold_days
    }
}

impl std::fmt::Debug for ActiveCertificate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ActiveCertificate")
            .field("record", &self.record)
            .field("private_key_pem", &"[REDACTED]")
            .finish()
    }
}

/// Classification of an uploaded certificate by taxpayer identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CertificateType {
    /// Personal certificate carrying a CPF (11-digit taxpayer ID).
    ECpf,
    /// Company certificate carrying a CNPJ (14-digit taxpayer ID).
    ECnpj,
    /// Neither identifier could be resolved.
    Custom,
}

impl CertificateType {
    /// Display name for this certificate type.
    pub fn name(&self) -> &'static str {
        match self {
            CertificateType::ECpf => "e-CPF",
            CertificateType::ECnpj => "e-CNPJ",
            CertificateType::Custom => "custom",
        }
    }
}

/// Attributes projected from an uploaded PKCS#12 container.
///
/// Transient: derived on each extraction, never persisted by this core.
/// At most one of `cpf`/`cnpj` is set, and `certificate_type` reflects which.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractedCertificateData {
    /// Subject common name.
    pub common_name: String,
    /// Subject email address, when present.
    pub email: Option<String>,
    /// Brazilian personal taxpayer ID (11 digits), when recovered.
    pub cpf: Option<String>,
    /// Brazilian company taxpayer ID (14 digits), when recovered.
    pub cnpj: Option<String>,
    /// Subject organization, when present.
    pub organization: Option<String>,
    /// Start of the validity window.
    pub valid_from: DateTime<Utc>,
    /// End of the validity window.
    pub valid_until: DateTime<Utc>,
    /// Issuer common name (or full DN when no CN is present).
    pub issuer: String,
    /// Certificate serial number, hex-encoded.
    pub serial_number: String,
    /// SHA-256 fingerprint of the DER certificate, hex-encoded.
    pub fingerprint: String,
    /// Classification by recovered taxpayer identifier.
    pub certificate_type: CertificateType,
    /// Public key algorithm name ("RSA", "EC", ...).
    pub key_algorithm: String,
    /// Public key size in bits.
    pub key_size_bits: u32,
    /// Full subject distinguished name.
    pub subject_dn: String,
    /// Full issuer distinguished name.
    pub issuer_dn: String,
    /// Whole days until expiry. Negative once expired.
    pub days_remaining: i64,
    /// Whether now falls inside the validity window.
    pub is_valid: bool,
    /// Whether the certificate is past `valid_until`.
    pub is_expired: bool,
}
