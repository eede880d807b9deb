//! Nonce-tagged message encoding
//!
//! Layout: `UTF-8(message) ++ be_u64(nonce)`. No length prefix, no
//! delimiter; the nonce is always the trailing 8 bytes. Signer and verifier
//! must produce identical bytes, so both sides go through these functions.

/// Width of the encoded nonce
pub const NONCE_LENGTH: usize = 8;

/// Big-endian nonce bytes, left-padded with zeros
pub fn encode_nonce(nonce: u64) -> [u8; NONCE_LENGTH] {
    nonce.to_be_bytes()
}

/// Encode a text message with its nonce
pub fn encode_message(message: &str, nonce: u64) -> Vec<u8> {
    encode_message_bytes(message.as_bytes(), nonce)
}

/// Encode raw message bytes with their nonce
pub fn encode_message_bytes(message: &[u8], nonce: u64) -> Vec<u8> {
    let mut encoded = Vec::with_capacity(message.len() + NONCE_LENGTH);
    encoded.extend_from_slice(message);
    encoded.extend_from_slice(&encode_nonce(nonce));
    encoded
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hello_world_nonce_two() {
        let encoded = encode_message("hello world", 2);

        let mut expected = b"hello world".to_vec();
        expected.extend_from_slice(&[0, 0, 0, 0, 0, 0, 0, 2]);
        assert_eq!(encoded, expected);
    }

    #[test]
    fn test_nonce_width_boundaries() {
        assert_eq!(encode_nonce(0), [0u8; 8]);
        assert_eq!(encode_nonce(u64::MAX), [0xff; 8]);
        assert_eq!(encode_nonce(0x0102), [0, 0, 0, 0, 0, 0, 0x01, 0x02]);
        assert_eq!(encode_message("", u64::MAX).len(), NONCE_LENGTH);
    }

    #[test]
    fn test_encoding_is_deterministic() {
        let first = encode_message("souvenir #17", 42);
        let second = encode_message("souvenir #17", 42);
        assert_eq!(first, second);
        assert_ne!(first, encode_message("souvenir #17", 43));
    }

    #[test]
    fn test_multibyte_utf8() {
        let encoded = encode_message("héllo", 1);
        assert_eq!(encoded.len(), "héllo".len() + NONCE_LENGTH);
        assert_eq!(&encoded[..6], "héllo".as_bytes());
    }
}
