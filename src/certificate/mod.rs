//! Certificate authority, store and extractor.
//!
//! The platform's signing identity lives here: a self-signed X.509
//! certificate generated on first use per environment, persisted with its
//! private key encrypted at rest, cached in memory, and renewed before
//! expiry. Uploaded third-party PKCS#12 containers are projected into a
//! structured attribute set by the extractor.

pub mod authority;
pub mod extractor;
pub mod store;
pub mod types;

pub use authority::{
    AuthorityIdentity, CertificateAuthority, GeneratedCertificate, DEFAULT_VALIDITY_YEARS,
};
pub use extractor::{extract, extract_der, extract_pem};
pub use store::{CertificateRepository, CertificateStore, InMemoryCertificateRepository};
pub use types::{ActiveCertificate, CertificateRecord, CertificateType, ExtractedCertificateData};
