use crate::error::{DrawError, Result};
use serde::{Deserialize, Serialize};

/// Number of leading hex characters of the commitment folded into the result.
/// 15 hex digits is at most 60 bits, so the value always fits in a `u64`.
pub const HASH_PREFIX_LEN: usize = 15;

/// Every intermediate value of a range mapping, in order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RangeDerivation {
    pub prefix: String,
    pub value: u64,
    pub range: u64,
    pub modulo: u64,
    pub min: i64,
    pub max: i64,
    pub result: i64,
}

/// Deterministic fold of a commitment hash into `[min, max]`.
pub trait RangeMapper: Send + Sync {
    fn derive(&self, hash_hex: &str, min: i64, max: i64) -> Result<RangeDerivation>;

    fn map(&self, hash_hex: &str, min: i64, max: i64) -> Result<i64> {
        Ok(self.derive(hash_hex, min, max)?.result)
    }
}

/// `(int(hash[..15], 16) mod (max - min + 1)) + min`.
///
/// Plain modulo reduction, not rejection sampling. The bias is bounded by
/// `range / 2^60`, which is negligible for spans up to 10^9. Results must be
/// reproduced bit for bit by verifiers, so prefix length and operation order
/// are fixed.
#[derive(Debug, Clone, Copy, Default)]
pub struct PrefixModuloMapper;

impl RangeMapper for PrefixModuloMapper {
    fn derive(&self, hash_hex: &str, min: i64, max: i64) -> Result<RangeDerivation> {
        if max <= min {
            return Err(DrawError::RangeInverted { min, max });
        }

        let prefix = hash_hex.get(..HASH_PREFIX_LEN).ok_or_else(|| {
            DrawError::invalid_input(format!(
                "Hash must have at least {} hex characters",
                HASH_PREFIX_LEN
            ))
        })?;
        // from_str_radix tolerates a leading '+', a hex digest never has one
        if !prefix.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(DrawError::invalid_input("Hash prefix is not hexadecimal"));
        }
        let value = u64::from_str_radix(prefix, 16)
            .map_err(|e| DrawError::invalid_input(format!("Hash prefix is not hexadecimal: {}", e)))?;

        let span = max.abs_diff(min);
        let range = span
            .checked_add(1)
            .ok_or_else(|| DrawError::invalid_input("Range does not fit in 64 bits"))?;
        let modulo = value % range;
        let result = min
            .checked_add_unsigned(modulo)
            .ok_or_else(|| DrawError::internal("Mapped result overflowed"))?;

        Ok(RangeDerivation {
            prefix: prefix.to_string(),
            value,
            range,
            modulo,
            min,
            max,
            result,
        })
    }
}
