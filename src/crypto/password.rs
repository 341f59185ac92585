//! Password-derived encryption for user-opaque payloads.
//!
//! Used where the platform never holds the plaintext key material itself:
//! the caller supplies a password, a 256-bit key is derived with
//! PBKDF2-HMAC-SHA256 over a random salt, and the salt travels inside the
//! serialized payload. A wrong password surfaces as the same
//! [`Error::Integrity`](crate::error::Error::Integrity) as corrupted data.

use aes_gcm::aead::rand_core::RngCore;
use aes_gcm::aead::OsRng;
use pbkdf2::pbkdf2_hmac_array;
use sha2::Sha256;

use crate::error::{Error, Result};

use super::envelope::{open, seal, EncryptedPayload, KeyMaterial};

/// PBKDF2-HMAC-SHA256 iteration count for newly encrypted payloads.
///
/// Payloads record their own count, so this can be raised without breaking
/// previously stored data.
pub const PBKDF2_ITERATIONS: u32 = 310_000;

/// Salt length in bytes for newly derived keys.
const SALT_LEN: usize = 16;

/// Encrypt plaintext under a password-derived key.
///
/// Returns the serialized payload string, the only durable representation.
pub fn encrypt_with_password(plaintext: &[u8], password: &str) -> Result<String> {
    let mut salt = [0u8; SALT_LEN];
    OsRng.fill_bytes(&mut salt);

    let key = derive_key(password, &salt, PBKDF2_ITERATIONS);
    let (iv, ciphertext, auth_tag) = seal(&key, plaintext)?;

    let payload = EncryptedPayload {
        ciphertext,
        iv,
        auth_tag,
        key_material: KeyMaterial::PasswordDerived {
            salt: salt.to_vec(),
            iterations: PBKDF2_ITERATIONS,
        },
    };
    Ok(payload.serialize())
}

/// Decrypt a serialized password-derived payload.
///
/// Fails closed with [`Error::Integrity`] on a wrong password or tampered
/// ciphertext; the two cases are deliberately indistinguishable.
pub fn decrypt_with_password(serialized: &str, password: &str) -> Result<Vec<u8>> {
    let payload = EncryptedPayload::parse(serialized)?;
    let (salt, iterations) = match &payload.key_material {
        KeyMaterial::PasswordDerived { salt, iterations } => (salt.as_slice(), *iterations),
        KeyMaterial::Master => {
            return Err(Error::InvalidPayload(
                "payload is master-key encrypted, not password-derived".to_string(),
            ))
        },
    };
    let key = derive_key(password, salt, iterations);
    open(&key, &payload.iv, &payload.ciphertext, &payload.auth_tag)
}

/// Derive a 256-bit key from a password and salt.
fn derive_key(password: &str, salt: &[u8], iterations: u32) -> [u8; 32] {
    pbkdf2_hmac_array::<Sha256, 32>(password.as_bytes(), salt, iterations)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_password_roundtrip() {
        let serialized = encrypt_with_password(b"confidential bytes", "hunter2").unwrap();
        assert!(serialized.starts_with("pbe1:"));
        let plain = decrypt_with_password(&serialized, "hunter2").unwrap();
        assert_eq!(plain, b"confidential bytes");
    }

    #[test]
    fn test_wrong_password_is_integrity_error() {
        let serialized = encrypt_with_password(b"confidential bytes", "correct").unwrap();
        let err = decrypt_with_password(&serialized, "incorrect").unwrap_err();
        assert!(matches!(err, Error::Integrity));
    }

    #[test]
    fn test_payload_records_iterations() {
        let serialized = encrypt_with_password(b"x", "pw").unwrap();
        let payload = EncryptedPayload::parse(&serialized).unwrap();
        match payload.key_material {
            KeyMaterial::PasswordDerived { iterations, ref salt } => {
                assert_eq!(iterations, PBKDF2_ITERATIONS);
                assert_eq!(salt.len(), SALT_LEN);
            },
            _ => panic!("expected password-derived key material"),
        }
    }

    #[test]
    fn test_salt_is_random_per_call() {
        let a = encrypt_with_password(b"x", "pw").unwrap();
        let b = encrypt_with_password(b"x", "pw").unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn test_master_payload_rejected() {
        use super::super::{encrypt, MasterKey};
        let payload = encrypt(b"x", &MasterKey::from_bytes([3u8; 32])).unwrap();
        let err = decrypt_with_password(&payload.serialize(), "pw").unwrap_err();
        assert!(matches!(err, Error::InvalidPayload(_)));
    }
}
