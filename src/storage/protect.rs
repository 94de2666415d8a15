//! At-rest protection for the authentication token.
//!
//! A random 32-byte key is generated once per user profile and kept next to
//! the data files with owner-only permissions. Tokens are sealed with
//! ChaCha20-Poly1305; the stored blob is `nonce || ciphertext`.

use std::path::{Path, PathBuf};

use chacha20poly1305::aead::{Aead, AeadCore, KeyInit, OsRng};
use chacha20poly1305::{ChaCha20Poly1305, Key, Nonce};
use tokio::io::AsyncWriteExt;
use zeroize::Zeroizing;

use crate::error::{JoinerError, Result};

const KEY_LEN: usize = 32;
const NONCE_LEN: usize = 12;

pub struct TokenProtector {
    key_path: PathBuf,
}

impl TokenProtector {
    pub fn new(key_path: impl Into<PathBuf>) -> Self {
        Self {
            key_path: key_path.into(),
        }
    }

    pub fn key_path(&self) -> &Path {
        &self.key_path
    }

    /// Seal `plaintext`, creating the per-user key on first use.
    pub async fn protect(&self, plaintext: &str) -> Result<Vec<u8>> {
        let key = self.load_or_create_key().await?;
        let cipher = ChaCha20Poly1305::new(Key::from_slice(&key));
        let nonce = ChaCha20Poly1305::generate_nonce(&mut OsRng);

        let ciphertext = cipher
            .encrypt(&nonce, plaintext.as_bytes())
            .map_err(|e| JoinerError::Crypto(format!("Encryption failed: {e}")))?;

        let mut blob = Vec::with_capacity(NONCE_LEN + ciphertext.len());
        blob.extend_from_slice(&nonce);
        blob.extend_from_slice(&ciphertext);
        Ok(blob)
    }

    /// Open a blob produced by [`TokenProtector::protect`] with the same key.
    pub async fn unprotect(&self, blob: &[u8]) -> Result<String> {
        if blob.len() <= NONCE_LEN {
            return Err(JoinerError::Crypto("Sealed token is truncated".into()));
        }
        let key = self.load_key().await?;
        let cipher = ChaCha20Poly1305::new(Key::from_slice(&key));
        let (nonce, ciphertext) = blob.split_at(NONCE_LEN);

        let plaintext = Zeroizing::new(
            cipher
                .decrypt(Nonce::from_slice(nonce), ciphertext)
                .map_err(|e| JoinerError::Crypto(format!("Decryption failed: {e}")))?,
        );

        String::from_utf8(plaintext.to_vec())
            .map_err(|_| JoinerError::Crypto("Sealed token is not UTF-8".into()))
    }

    async fn load_key(&self) -> Result<Zeroizing<Vec<u8>>> {
        let key = Zeroizing::new(tokio::fs::read(&self.key_path).await?);
        if key.len() != KEY_LEN {
            return Err(JoinerError::Crypto(format!(
                "Key file {} must hold {KEY_LEN} bytes (got {})",
                self.key_path.display(),
                key.len()
            )));
        }
        Ok(key)
    }

    async fn load_or_create_key(&self) -> Result<Zeroizing<Vec<u8>>> {
        match self.load_key().await {
            Ok(key) => return Ok(key),
            Err(JoinerError::Io(e)) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => return Err(e),
        }

        if let Some(parent) = self.key_path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }

        let key = Zeroizing::new(ChaCha20Poly1305::generate_key(&mut OsRng).to_vec());

        let mut options = tokio::fs::OpenOptions::new();
        options.write(true).create_new(true);
        #[cfg(unix)]
        options.mode(0o600);

        match options.open(&self.key_path).await {
            Ok(mut file) => {
                file.write_all(&key).await?;
                file.flush().await?;
                file.sync_all().await?;
                tracing::info!(path = %self.key_path.display(), "Created token protection key");
                Ok(key)
            }
            // Another writer won the race; use its key.
            Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => self.load_key().await,
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[tokio::test]
    async fn test_seal_and_open() {
        let dir = tempdir().unwrap();
        let protector = TokenProtector::new(dir.path().join("auth.key"));

        let blob = protector.protect("auth-token-abc").await.unwrap();
        assert!(!blob.windows(14).any(|w| w == b"auth-token-abc"));
        assert_eq!(protector.unprotect(&blob).await.unwrap(), "auth-token-abc");
    }

    #[tokio::test]
    async fn test_tampered_blob_is_rejected() {
        let dir = tempdir().unwrap();
        let protector = TokenProtector::new(dir.path().join("auth.key"));

        let mut blob = protector.protect("auth-token-abc").await.unwrap();
        let last = blob.len() - 1;
        blob[last] ^= 0x01;
        assert!(matches!(
            protector.unprotect(&blob).await,
            Err(JoinerError::Crypto(_))
        ));
    }

    #[tokio::test]
    async fn test_other_key_cannot_open() {
        let dir = tempdir().unwrap();
        let ours = TokenProtector::new(dir.path().join("a.key"));
        let theirs = TokenProtector::new(dir.path().join("b.key"));

        let blob = ours.protect("secret").await.unwrap();
        theirs.protect("warm up key").await.unwrap();
        assert!(theirs.unprotect(&blob).await.is_err());
    }

    #[tokio::test]
    async fn test_missing_key_fails_without_creating_one() {
        let dir = tempdir().unwrap();
        let protector = TokenProtector::new(dir.path().join("auth.key"));

        assert!(protector.unprotect(&[0u8; 40]).await.is_err());
        assert!(!protector.key_path().exists());
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_key_file_is_owner_only() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempdir().unwrap();
        let protector = TokenProtector::new(dir.path().join("auth.key"));
        protector.protect("x").await.unwrap();

        let mode = std::fs::metadata(protector.key_path())
            .unwrap()
            .permissions()
            .mode();
        assert_eq!(mode & 0o777, 0o600);
    }
}
