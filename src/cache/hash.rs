//! Nix base32 hash codec
//!
//! Nix encodes digests with its own 32-character alphabet (no `e`, `o`,
//! `t` or `u`), and treats the digest bytes as a little-endian number.
//! Standard tooling wants big-endian hex, so decoding ends with a byte
//! reversal relative to the numeric representation.

use crate::error::{NarlockError, NarlockResult};

/// Nix's base32 alphabet. Not the RFC 4648 alphabet: visually ambiguous
/// characters are excluded.
const ALPHABET: &[u8; 32] = b"0123456789abcdfghijklmnpqrsvwxyz";

/// Length of a sha256 digest in bytes.
const DIGEST_LEN: usize = 32;

/// Number of base32 digits covering a 256-bit digest.
const ENCODED_LEN: usize = (DIGEST_LEN * 8).div_ceil(5);

/// Decode a Nix base32 digest (optionally `sha256:`-prefixed) into raw
/// digest bytes.
///
/// The digits form a big base-32 number, most significant digit first.
/// The returned bytes are that number least-significant byte first,
/// zero-padded to 32 bytes, which is the order standard hex display
/// expects for Nix hashes.
pub fn decode_nix_base32(encoded: &str) -> NarlockResult<[u8; DIGEST_LEN]> {
    let digits = encoded.strip_prefix("sha256:").unwrap_or(encoded);

    // Little-endian accumulator; multiply-add one digit at a time.
    let mut acc: Vec<u8> = vec![0];
    for ch in digits.chars() {
        let val = ALPHABET
            .iter()
            .position(|&a| a as char == ch)
            .ok_or_else(|| NarlockError::HashCharacter {
                hash: encoded.to_string(),
                character: ch,
            })?;

        let mut carry = val as u32;
        for byte in acc.iter_mut() {
            let v = *byte as u32 * 32 + carry;
            *byte = (v & 0xff) as u8;
            carry = v >> 8;
        }
        while carry > 0 {
            acc.push((carry & 0xff) as u8);
            carry >>= 8;
        }
    }

    if acc.len() > DIGEST_LEN {
        return Err(NarlockError::HashOverflow(encoded.to_string()));
    }

    let mut out = [0u8; DIGEST_LEN];
    out[..acc.len()].copy_from_slice(&acc);
    Ok(out)
}

/// Encode raw digest bytes (as produced by [`decode_nix_base32`]) back
/// into the 52-digit Nix base32 form.
pub fn encode_nix_base32(digest: &[u8; DIGEST_LEN]) -> String {
    let mut out = String::with_capacity(ENCODED_LEN);
    for n in (0..ENCODED_LEN).rev() {
        let b = n * 5;
        let i = b / 8;
        let j = b % 8;
        let next = if i + 1 < DIGEST_LEN { digest[i + 1] } else { 0 };
        let c = ((digest[i] as u16) >> j) | ((next as u16) << (8 - j));
        out.push(ALPHABET[(c & 0x1f) as usize] as char);
    }
    out
}

/// Convert a Nix base32 hash string to standard big-endian hex.
pub fn nix_hash_to_hex(hash: &str) -> NarlockResult<String> {
    Ok(hex::encode(decode_nix_base32(hash)?))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_digest_is_all_zero_digits() {
        let zeros = "0".repeat(52);
        assert_eq!(decode_nix_base32(&zeros).unwrap(), [0u8; 32]);
        assert_eq!(encode_nix_base32(&[0u8; 32]), zeros);
    }

    #[test]
    fn single_digit_one() {
        let mut expected = [0u8; 32];
        expected[0] = 1;
        assert_eq!(decode_nix_base32("1").unwrap(), expected);
    }

    #[test]
    fn two_digit_value() {
        // "zz" = 31 * 32 + 31 = 1023 = 0x03ff, little-endian: ff 03
        let mut expected = [0u8; 32];
        expected[0] = 0xff;
        expected[1] = 0x03;
        assert_eq!(decode_nix_base32("zz").unwrap(), expected);
        assert_eq!(nix_hash_to_hex("zz").unwrap()[..4], *"ff03");
    }

    #[test]
    fn round_trip_nontrivial_digest() {
        let mut digest = [0u8; 32];
        for (i, b) in digest.iter_mut().enumerate() {
            *b = (i as u8).wrapping_mul(37).wrapping_add(11);
        }
        let encoded = encode_nix_base32(&digest);
        assert_eq!(encoded.len(), 52);
        assert_eq!(decode_nix_base32(&encoded).unwrap(), digest);
    }

    #[test]
    fn prefix_is_stripped() {
        let zeros = format!("sha256:{}", "0".repeat(52));
        assert_eq!(decode_nix_base32(&zeros).unwrap(), [0u8; 32]);
    }

    #[test]
    fn excluded_letter_rejected() {
        // 'e' is not in the Nix alphabet
        let err = decode_nix_base32("abcde").unwrap_err();
        assert!(matches!(
            err,
            NarlockError::HashCharacter { character: 'e', .. }
        ));
    }

    #[test]
    fn uppercase_rejected() {
        assert!(decode_nix_base32("ABC").is_err());
    }

    #[test]
    fn oversized_value_rejected() {
        // 53 'z' digits exceed 256 bits no matter what
        let too_big = "z".repeat(53);
        assert!(matches!(
            decode_nix_base32(&too_big).unwrap_err(),
            NarlockError::HashOverflow(_)
        ));
    }

    #[test]
    fn hex_of_zero_digest() {
        assert_eq!(nix_hash_to_hex(&"0".repeat(52)).unwrap(), "0".repeat(64));
    }
}
