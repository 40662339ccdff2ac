pub mod scheme;

pub use scheme::CommitmentScheme;

use sha2::{Digest, Sha256};

/// Length of a SHA-256 digest in hex characters.
pub const COMMITMENT_HEX_LEN: usize = 64;

/// SHA-256 commitment, hex encoded.
#[derive(Debug, Clone, Copy, Default)]
pub struct Sha256Commitment;

impl CommitmentScheme for Sha256Commitment {
    fn commit(&self, secret: &str) -> String {
        let mut hasher = Sha256::new();
        hasher.update(secret.as_bytes());
        hex::encode(hasher.finalize())
    }
}

/// True for a full-length lowercase hex digest.
pub fn is_well_formed(commitment: &str) -> bool {
    commitment.len() == COMMITMENT_HEX_LEN
        && commitment
            .chars()
            .all(|c| c.is_ascii_digit() || ('a'..='f').contains(&c))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_commitment_scheme() {
        let secret = "00112233445566778899aabbccddeeff";
        let commitment = Sha256Commitment.commit(secret);

        assert!(is_well_formed(&commitment));
        assert!(Sha256Commitment.verify(&commitment, secret));
        assert!(!Sha256Commitment.verify(&commitment, "00112233445566778899aabbccddeefe"));
    }

    #[test]
    fn test_hashes_hex_text_not_decoded_bytes() {
        let secret = "00ff";
        let over_text = Sha256Commitment.commit(secret);

        let mut hasher = Sha256::new();
        hasher.update([0x00u8, 0xff]);
        let over_bytes = hex::encode(hasher.finalize());

        assert_ne!(over_text, over_bytes);
    }

    #[test]
    fn test_known_vector() {
        assert_eq!(
            Sha256Commitment.commit("abc"),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }

    #[test]
    fn test_verify_accepts_uppercase_commitment() {
        let secret = "deadbeef";
        let upper = Sha256Commitment.commit(secret).to_uppercase();
        assert!(Sha256Commitment.verify(&upper, secret));
        assert!(!is_well_formed(&upper));
    }
}
