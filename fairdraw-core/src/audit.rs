//! Offline recomputation of a draw from its disclosed values.
//!
//! This is a second, standalone implementation of the commitment and range
//! mapping, written the way an outside auditor would: hash the secret's hex
//! text with SHA-256, read the first 15 hex digits one at a time, reduce
//! modulo `max - min + 1` and add `min`. It shares no code with
//! `range::PrefixModuloMapper`, and the conformance tests below pin the two
//! together bit for bit.

use crate::error::{DrawError, Result};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

const PREFIX_DIGITS: usize = 15;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditOutcome {
    pub hash: String,
    pub prefix: String,
    pub value: u128,
    pub range: u128,
    pub result: i128,
}

impl AuditOutcome {
    /// Does a server-reported commitment agree with the recomputed hash?
    pub fn commitment_matches(&self, reported: &str) -> bool {
        self.hash.eq_ignore_ascii_case(reported.trim())
    }

    pub fn result_matches(&self, reported: i64) -> bool {
        self.result == i128::from(reported)
    }
}

pub fn recompute(secret_hex: &str, min: i64, max: i64) -> Result<AuditOutcome> {
    if max <= min {
        return Err(DrawError::RangeInverted { min, max });
    }

    let hash: String = Sha256::digest(secret_hex.as_bytes())
        .iter()
        .map(|b| format!("{:02x}", b))
        .collect();

    let prefix = &hash[..PREFIX_DIGITS];
    let mut value: u128 = 0;
    for c in prefix.chars() {
        let digit = c
            .to_digit(16)
            .ok_or_else(|| DrawError::internal("digest is not hexadecimal"))?;
        value = value * 16 + u128::from(digit);
    }

    let range = (i128::from(max) - i128::from(min) + 1) as u128;
    let result = (value % range) as i128 + i128::from(min);

    Ok(AuditOutcome {
        hash: hash.clone(),
        prefix: prefix.to_string(),
        value,
        range,
        result,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commitment::{CommitmentScheme, Sha256Commitment};
    use crate::range::{PrefixModuloMapper, RangeMapper};
    use proptest::prelude::*;

    #[test]
    fn test_die_example() {
        let outcome = recompute("00112233445566778899aabbccddeeff", 1, 6).unwrap();

        assert_eq!(
            outcome.hash,
            "5947d7c33d783f94b3b4c1a96ebc8991ed28f1b069b71e03376cba8caa98a720"
        );
        assert_eq!(outcome.prefix, "5947d7c33d783f9");
        assert_eq!(outcome.value, 402_084_239_141_995_513);
        assert_eq!(outcome.range, 6);
        assert_eq!(outcome.result, 2);
        assert!(outcome.result_matches(2));
        assert!(outcome.commitment_matches(
            "5947D7C33D783F94B3B4C1A96EBC8991ED28F1B069B71E03376CBA8CAA98A720"
        ));
    }

    #[test]
    fn test_rejects_inverted_range() {
        assert!(recompute("00", 3, 3).is_err());
    }

    proptest! {
        #[test]
        fn prop_conforms_to_engine_mapping(
            secret in "[0-9a-f]{32}",
            min in 0i64..1_000_000_000,
            span in 1i64..=1_000_000_000,
        ) {
            let max = min + span;
            let outcome = recompute(&secret, min, max).unwrap();

            let commitment = Sha256Commitment.commit(&secret);
            let derivation = PrefixModuloMapper.derive(&commitment, min, max).unwrap();

            prop_assert_eq!(&outcome.hash, &commitment);
            prop_assert_eq!(&outcome.prefix, &derivation.prefix);
            prop_assert_eq!(outcome.value, u128::from(derivation.value));
            prop_assert!(outcome.result_matches(derivation.result));
        }
    }
}
