//! Short, human-typable draw keys.
//!
//! Random bytes are read as one big-endian unsigned integer and rewritten in
//! base 58. The conversion runs over byte vectors, so there is no width limit.
//! Leading zero bytes carry no symbols; an all-zero input encodes as the first
//! alphabet symbol instead of the empty string.

use crate::error::{DrawError, Result};

/// Digits and letters without the look-alikes `0`, `O`, `I` and `l`.
pub const ALPHABET: &[u8; 58] = b"123456789ABCDEFGHJKLMNPQRSTUVWXYZabcdefghijkmnopqrstuvwxyz";

const BASE: u32 = 58;

pub trait KeyEncoder: Send + Sync {
    fn encode(&self, random_bytes: &[u8]) -> String;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct Base58KeyEncoder;

impl KeyEncoder for Base58KeyEncoder {
    fn encode(&self, random_bytes: &[u8]) -> String {
        encode(random_bytes)
    }
}

pub fn encode(bytes: &[u8]) -> String {
    let mut num = strip_leading_zeros(bytes).to_vec();
    let mut symbols = Vec::with_capacity(bytes.len() * 138 / 100 + 1);

    // Long division by 58, least significant digit first.
    while !num.is_empty() {
        let mut quotient = Vec::with_capacity(num.len());
        let mut rem = 0u32;
        for &byte in &num {
            let acc = (rem << 8) | u32::from(byte);
            let q = acc / BASE;
            rem = acc % BASE;
            if !(quotient.is_empty() && q == 0) {
                quotient.push(q as u8);
            }
        }
        symbols.push(ALPHABET[rem as usize]);
        num = quotient;
    }

    if symbols.is_empty() {
        return (ALPHABET[0] as char).to_string();
    }

    symbols.reverse();
    symbols.into_iter().map(char::from).collect()
}

/// Minimal big-endian bytes of the integer a key represents.
/// Zero decodes to an empty vector.
pub fn decode(key: &str) -> Result<Vec<u8>> {
    if key.is_empty() {
        return Err(DrawError::invalid_input("Key required"));
    }

    // Little-endian accumulator.
    let mut num: Vec<u8> = Vec::new();
    for c in key.chars() {
        let digit = symbol_value(c)
            .ok_or_else(|| DrawError::invalid_input(format!("Invalid key character '{}'", c)))?;

        let mut carry = digit;
        for byte in num.iter_mut() {
            let acc = u32::from(*byte) * BASE + carry;
            *byte = (acc & 0xff) as u8;
            carry = acc >> 8;
        }
        while carry > 0 {
            num.push((carry & 0xff) as u8);
            carry >>= 8;
        }
    }

    num.reverse();
    Ok(strip_leading_zeros(&num).to_vec())
}

fn symbol_value(c: char) -> Option<u32> {
    if !c.is_ascii() {
        return None;
    }
    ALPHABET
        .iter()
        .position(|&s| s == c as u8)
        .map(|p| p as u32)
}

fn strip_leading_zeros(bytes: &[u8]) -> &[u8] {
    let first = bytes.iter().position(|&b| b != 0).unwrap_or(bytes.len());
    &bytes[first..]
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_small_values() {
        assert_eq!(encode(&[0]), "1");
        assert_eq!(encode(&[]), "1");
        assert_eq!(encode(&[57]), "z");
        assert_eq!(encode(&[58]), "21");
        assert_eq!(encode(&[0, 0, 58]), "21");
    }

    #[test]
    fn test_known_vector() {
        // "Hello World!" in the same alphabet
        assert_eq!(encode(b"Hello World!"), "2NEpo7TZRRrLZSi2U");
    }

    #[test]
    fn test_alphabet_excludes_ambiguous_symbols() {
        for c in ['0', 'O', 'I', 'l'] {
            assert!(!ALPHABET.contains(&(c as u8)));
        }
        let mut sorted = ALPHABET.to_vec();
        sorted.sort_unstable();
        sorted.dedup();
        assert_eq!(sorted.len(), 58);
    }

    #[test]
    fn test_nine_byte_keys_are_short() {
        let key = encode(&[0xff; 9]);
        assert!(key.len() <= 13);
        assert_eq!(decode(&key).unwrap(), vec![0xff; 9]);
    }

    #[test]
    fn test_wider_than_machine_word() {
        let bytes: Vec<u8> = (1..=40).collect();
        assert_eq!(decode(&encode(&bytes)).unwrap(), bytes);
    }

    #[test]
    fn test_decode_rejects_ambiguous_symbols() {
        assert!(decode("abc0").is_err());
        assert!(decode("").is_err());
        assert!(decode("ab é").is_err());
    }

    proptest! {
        #[test]
        fn prop_round_trip(bytes in proptest::collection::vec(any::<u8>(), 0..48)) {
            let decoded = decode(&encode(&bytes)).unwrap();
            prop_assert_eq!(decoded.as_slice(), strip_leading_zeros(&bytes));
        }
    }
}
