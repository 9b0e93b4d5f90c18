//! Decryption of stored refresh tokens.
//!
//! The legacy app encrypted OAuth refresh tokens with Fernet before
//! writing them to the user table, so this job has to speak the same
//! format. Decryption failure is an expected condition (users who never
//! finished authorization, rows written under a rotated key) and degrades
//! to "no credentials available", never an error.

use fernet::Fernet;
use tracing::warn;

/// Decrypts Fernet token blobs from the user table.
pub struct TokenDecryptor {
    fernet: Option<Fernet>,
}

impl std::fmt::Debug for TokenDecryptor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenDecryptor")
            .field("key", &"[REDACTED]")
            .finish()
    }
}

impl TokenDecryptor {
    /// Builds a decryptor from the configured key.
    ///
    /// An unusable key yields a decryptor that answers `None` for every
    /// blob, so affected users are skipped instead of aborting the run.
    pub fn new(key: &str) -> Self {
        let fernet = Fernet::new(key);
        if fernet.is_none() {
            warn!("encryption key is not a valid Fernet key; all decryption will fail");
        }
        Self { fernet }
    }

    /// Decrypts a stored token blob.
    ///
    /// Returns `None` for absent input, malformed ciphertext, a key
    /// mismatch, or non-UTF-8 plaintext.
    pub fn decrypt(&self, ciphertext: Option<&str>) -> Option<String> {
        let ciphertext = ciphertext?;
        let fernet = self.fernet.as_ref()?;

        match fernet.decrypt(ciphertext) {
            Ok(bytes) => match String::from_utf8(bytes) {
                Ok(token) => Some(token),
                Err(_) => {
                    warn!("decrypted token is not valid UTF-8");
                    None
                }
            },
            Err(_) => {
                warn!("failed to decrypt token");
                None
            }
        }
    }
}
