use ark_bn254::Fr;
use ark_ff::Zero;

use crate::crypto::field::FieldElement;

/// Bytes of a password that survive encoding. 31 bytes always fit below the
/// 254-bit modulus, so no reduction happens.
pub const MAX_PASSWORD_BYTES: usize = 31;

/// Encode a password as a field element: the first 31 bytes of its UTF-8
/// encoding, read as a big-endian integer.
///
/// Passwords sharing a 31-byte prefix encode identically. The empty password
/// encodes to zero, which is a valid (weak) secret.
pub fn encode(password: &str) -> FieldElement {
    let bytes = password.as_bytes();
    let prefix = &bytes[..bytes.len().min(MAX_PASSWORD_BYTES)];

    let value = prefix
        .iter()
        .fold(Fr::zero(), |acc, byte| acc * Fr::from(256u64) + Fr::from(*byte));

    FieldElement::from(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_known_values() {
        assert_eq!(encode("a").to_string(), "97");
        assert_eq!(encode("hunter2").to_string(), "29402514837566002");
    }

    #[test]
    fn test_encode_is_deterministic() {
        let password = "correct horse battery staple";
        assert_eq!(encode(password), encode(password));
        assert_ne!(encode(password), encode("correct horse battery stapler"));
    }

    #[test]
    fn test_empty_password_is_zero() {
        assert_eq!(encode(""), FieldElement::zero());
    }

    #[test]
    fn test_truncates_to_31_bytes() {
        let prefix = "x".repeat(MAX_PASSWORD_BYTES);
        let long = format!("{}-and-then-some", prefix);
        assert_eq!(encode(&long), encode(&prefix));
        assert_ne!(encode(&prefix), encode(&prefix[..30]));
    }

    #[test]
    fn test_multibyte_utf8_uses_bytes() {
        // "é" is 0xC3 0xA9 in UTF-8.
        assert_eq!(encode("é").to_string(), (0xC3u64 * 256 + 0xA9).to_string());
    }
}
