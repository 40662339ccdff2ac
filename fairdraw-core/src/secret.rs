use crate::error::{DrawError, Result};
use rand::rngs::OsRng;
use rand::TryRngCore;

/// Length in bytes of a draw secret before hex encoding.
pub const SECRET_LEN: usize = 16;

/// Supplier of cryptographically secure random bytes.
///
/// Implementations must fail rather than fall back to a weaker generator.
pub trait SecretSource: Send + Sync {
    fn generate(&self, n_bytes: usize) -> Result<Vec<u8>>;
}

/// Operating system CSPRNG.
#[derive(Debug, Clone, Copy, Default)]
pub struct OsSecretSource;

impl SecretSource for OsSecretSource {
    fn generate(&self, n_bytes: usize) -> Result<Vec<u8>> {
        let mut bytes = vec![0u8; n_bytes];
        OsRng.try_fill_bytes(&mut bytes).map_err(|e| {
            tracing::error!("OS random source failed: {}", e);
            DrawError::SecureRandomUnavailable(e.to_string())
        })?;
        Ok(bytes)
    }
}

/// Fresh hex-encoded draw secret.
pub fn generate_secret(source: &dyn SecretSource) -> Result<String> {
    let bytes = source.generate(SECRET_LEN)?;
    if bytes.len() != SECRET_LEN {
        return Err(DrawError::internal(format!(
            "Secret source returned {} bytes, expected {}",
            bytes.len(),
            SECRET_LEN
        )));
    }
    Ok(hex::encode(bytes))
}
