//! AES-256-GCM encryption of short secrets.
//!
//! Stored values are `base64(nonce || ciphertext)` with a random 96-bit nonce
//! per value.

use aes_gcm::{
    aead::{rand_core::RngCore, Aead, AeadCore, KeyInit, OsRng},
    Aes256Gcm, Key, Nonce,
};
use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use devhabit_config::EncryptionConfig;
use devhabit_core::{DevHabitError, DevHabitResult, Interface};
use shaku::Component;
use std::sync::Arc;

/// Key length in bytes.
pub const KEY_LENGTH: usize = 32;

const NONCE_LENGTH: usize = 12;

/// Returns `len` random bytes encoded as base64.
#[must_use]
pub fn random_token(len: usize) -> String {
    let mut bytes = vec![0u8; len];
    OsRng.fill_bytes(&mut bytes);
    BASE64.encode(bytes)
}

/// Interface for secret encryption.
pub trait EncryptionServiceInterface: Interface {
    /// Encrypts `plain_text`.
    fn encrypt(&self, plain_text: &str) -> DevHabitResult<String>;

    /// Decrypts a value produced by [`encrypt`](Self::encrypt).
    fn decrypt(&self, cipher_text: &str) -> DevHabitResult<String>;
}

/// AES-256-GCM encryption service.
#[derive(Component, Clone)]
#[shaku(interface = EncryptionServiceInterface)]
pub struct EncryptionService {
    key: Arc<[u8; KEY_LENGTH]>,
}

impl EncryptionService {
    /// Creates the service from raw key bytes.
    #[must_use]
    pub fn from_key(key: [u8; KEY_LENGTH]) -> Self {
        Self { key: Arc::new(key) }
    }

    /// Creates the service from the base64 key in configuration.
    pub fn from_config(config: &EncryptionConfig) -> DevHabitResult<Self> {
        let bytes = BASE64
            .decode(config.key.trim())
            .map_err(|e| DevHabitError::Configuration(format!("Encryption key is not valid base64: {}", e)))?;
        let key: [u8; KEY_LENGTH] = bytes.try_into().map_err(|bytes: Vec<u8>| {
            DevHabitError::Configuration(format!(
                "Encryption key must be {} bytes, got {}",
                KEY_LENGTH,
                bytes.len()
            ))
        })?;
        Ok(Self::from_key(key))
    }

    /// Returns the key, used to build the DI parameters.
    #[must_use]
    pub fn key_arc(&self) -> Arc<[u8; KEY_LENGTH]> {
        Arc::clone(&self.key)
    }

    fn cipher(&self) -> Aes256Gcm {
        Aes256Gcm::new(Key::<Aes256Gcm>::from_slice(self.key.as_slice()))
    }
}

impl EncryptionServiceInterface for EncryptionService {
    fn encrypt(&self, plain_text: &str) -> DevHabitResult<String> {
        let nonce = Aes256Gcm::generate_nonce(&mut OsRng);
        let cipher_text = self
            .cipher()
            .encrypt(&nonce, plain_text.as_bytes())
            .map_err(|e| DevHabitError::Encryption(format!("Encryption failed: {}", e)))?;

        let mut payload = Vec::with_capacity(NONCE_LENGTH + cipher_text.len());
        payload.extend_from_slice(nonce.as_slice());
        payload.extend_from_slice(&cipher_text);
        Ok(BASE64.encode(payload))
    }

    fn decrypt(&self, cipher_text: &str) -> DevHabitResult<String> {
        let payload = BASE64
            .decode(cipher_text)
            .map_err(|e| DevHabitError::Encryption(format!("Invalid encrypted payload: {}", e)))?;
        if payload.len() <= NONCE_LENGTH {
            return Err(DevHabitError::Encryption("Encrypted payload is too short".to_string()));
        }

        let (nonce, data) = payload.split_at(NONCE_LENGTH);
        let plain = self
            .cipher()
            .decrypt(Nonce::from_slice(nonce), data)
            .map_err(|e| DevHabitError::Encryption(format!("Decryption failed: {}", e)))?;

        String::from_utf8(plain).map_err(|e| DevHabitError::Encryption(format!("Decrypted value is not UTF-8: {}", e)))
    }
}

impl std::fmt::Debug for EncryptionService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EncryptionService").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn service() -> EncryptionService {
        EncryptionService::from_key([7u8; KEY_LENGTH])
    }

    #[test]
    fn test_encrypt_then_decrypt() {
        let service = service();
        let encrypted = service.encrypt("ghp_secret").unwrap();

        assert_ne!(encrypted, "ghp_secret");
        assert_eq!(service.decrypt(&encrypted).unwrap(), "ghp_secret");
    }

    #[test]
    fn test_nonce_differs_per_value() {
        let service = service();
        assert_ne!(service.encrypt("same").unwrap(), service.encrypt("same").unwrap());
    }

    #[test]
    fn test_wrong_key_fails() {
        let encrypted = service().encrypt("ghp_secret").unwrap();
        let other = EncryptionService::from_key([8u8; KEY_LENGTH]);

        assert!(matches!(other.decrypt(&encrypted), Err(DevHabitError::Encryption(_))));
    }

    #[test]
    fn test_tampered_payload_fails() {
        let service = service();
        assert!(service.decrypt("not base64 at all!").is_err());
        assert!(service.decrypt(&BASE64.encode([1u8; 4])).is_err());
    }

    #[test]
    fn test_from_config() {
        let config = EncryptionConfig {
            key: BASE64.encode([3u8; KEY_LENGTH]),
        };
        let service = EncryptionService::from_config(&config).unwrap();
        let encrypted = service.encrypt("value").unwrap();
        assert_eq!(service.decrypt(&encrypted).unwrap(), "value");

        let short = EncryptionConfig {
            key: BASE64.encode([3u8; 8]),
        };
        assert!(matches!(
            EncryptionService::from_config(&short),
            Err(DevHabitError::Configuration(_))
        ));
    }

    #[test]
    fn test_random_token_length() {
        let token = random_token(32);
        assert_eq!(BASE64.decode(token).unwrap().len(), 32);
    }
}
