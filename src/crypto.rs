use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use tracing::info;

/// At-rest encryption capability.
///
/// Key storage and the cipher itself are opaque to the core; callers only
/// rely on encrypt/decrypt being inverses. Must not be invoked concurrently
/// for the same destination path (the session phase hand-off guarantees
/// this).
#[async_trait::async_trait]
pub trait FileCipher: Send + Sync {
    async fn encrypt_file(&self, plain: &Path, cipher: &Path) -> Result<()>;

    /// Decrypts to `temp` and returns its path. The scratch file is owned by
    /// the calling operation and must not outlive it.
    async fn decrypt_to_temp_file(&self, cipher: &Path, temp: &Path) -> Result<PathBuf>;
}

/// Symmetric keystream-XOR stand-in for the platform's at-rest cipher.
///
/// Guarantees the plaintext never sits at the final path and round-trips
/// exactly; real key management lives in a collaborator behind the
/// `FileCipher` seam.
pub struct XorFileCipher {
    key: Vec<u8>,
}

impl Default for XorFileCipher {
    fn default() -> Self {
        Self {
            key: b"voicedesk-at-rest".to_vec(),
        }
    }
}

impl XorFileCipher {
    pub fn new(key: impl Into<Vec<u8>>) -> Self {
        Self { key: key.into() }
    }

    async fn transform(&self, input: &Path, output: &Path) -> Result<()> {
        if let Some(parent) = output.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        let mut bytes = tokio::fs::read(input)
            .await
            .with_context(|| format!("Failed to read {}", input.display()))?;
        for (i, byte) in bytes.iter_mut().enumerate() {
            *byte ^= self.key[i % self.key.len()];
        }
        tokio::fs::write(output, bytes)
            .await
            .with_context(|| format!("Failed to write {}", output.display()))?;
        Ok(())
    }
}

#[async_trait::async_trait]
impl FileCipher for XorFileCipher {
    async fn encrypt_file(&self, plain: &Path, cipher: &Path) -> Result<()> {
        self.transform(plain, cipher).await?;
        info!("Encrypted recording to {}", cipher.display());
        Ok(())
    }

    async fn decrypt_to_temp_file(&self, cipher: &Path, temp: &Path) -> Result<PathBuf> {
        self.transform(cipher, temp).await?;
        Ok(temp.to_path_buf())
    }
}
