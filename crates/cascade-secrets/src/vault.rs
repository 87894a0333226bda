//! AES-256-GCM token vault.

use aes_gcm::{
    Aes256Gcm, Nonce,
    aead::{Aead, KeyInit},
};
use async_trait::async_trait;
use cascade_core::ports::TokenVault;
use cascade_core::user::SealedToken;
use cascade_core::{Error, Result};

/// Token vault with AES-256-GCM encryption.
pub struct AesTokenVault {
    cipher: Aes256Gcm,
}

impl AesTokenVault {
    /// Create a new vault with a 32-byte key.
    pub fn new(key: &[u8; 32]) -> Self {
        let cipher = Aes256Gcm::new_from_slice(key).expect("valid key length");
        Self { cipher }
    }

    /// Create from a master key string (will be hashed to 32 bytes).
    pub fn from_master_key(master_key: &str) -> Self {
        use sha2::{Digest, Sha256};
        let mut hasher = Sha256::new();
        hasher.update(master_key.as_bytes());
        let key: [u8; 32] = hasher.finalize().into();
        Self::new(&key)
    }
}

#[async_trait]
impl TokenVault for AesTokenVault {
    async fn seal(&self, plaintext: &str) -> Result<SealedToken> {
        let nonce_bytes: [u8; 12] = rand::random();
        let nonce = Nonce::from_slice(&nonce_bytes);

        let ciphertext = self
            .cipher
            .encrypt(nonce, plaintext.as_bytes())
            .map_err(|e| Error::Credential(format!("Encryption failed: {}", e)))?;

        Ok(SealedToken {
            ciphertext,
            nonce: nonce_bytes,
        })
    }

    async fn unseal(&self, token: &SealedToken) -> Result<String> {
        let nonce = Nonce::from_slice(&token.nonce);
        let plaintext = self
            .cipher
            .decrypt(nonce, token.ciphertext.as_ref())
            .map_err(|e| Error::Credential(format!("Decryption failed: {}", e)))?;

        String::from_utf8(plaintext).map_err(|e| Error::Credential(format!("Invalid UTF-8: {}", e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_seal_unseal_round_trip() {
        let vault = AesTokenVault::from_master_key("test-master-key");
        let sealed = vault.seal("ghp_secret").await.unwrap();
        assert_ne!(sealed.ciphertext, b"ghp_secret");
        assert_eq!(vault.unseal(&sealed).await.unwrap(), "ghp_secret");
    }

    #[tokio::test]
    async fn test_unseal_with_wrong_key_fails() {
        let vault = AesTokenVault::from_master_key("key-one");
        let other = AesTokenVault::from_master_key("key-two");
        let sealed = vault.seal("ghp_secret").await.unwrap();
        assert!(matches!(
            other.unseal(&sealed).await,
            Err(Error::Credential(_))
        ));
    }

    #[tokio::test]
    async fn test_nonces_differ_per_seal() {
        let vault = AesTokenVault::from_master_key("test-master-key");
        let a = vault.seal("tok").await.unwrap();
        let b = vault.seal("tok").await.unwrap();
        assert_ne!(a.nonce, b.nonce);
    }
}
