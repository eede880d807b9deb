//! Verification of nonce-tagged signatures
//!
//! The signed buffer is always rebuilt from `(message, nonce)`. A stored
//! `nonceBytes` field is never trusted: a buffer forged independently of the
//! logical nonce must not verify.

use crate::encoding::{encode_message_bytes, encode_nonce};
use crate::error::{Result, SignerError};
use crate::keypair::{PUBLIC_KEY_LENGTH, SIGNATURE_LENGTH};
use crate::signing::SigningResult;
use ed25519_dalek::{Signature, Verifier as _, VerifyingKey};

/// Verify a signing result
///
/// # Returns
/// - `Ok(true)`: signature is valid for the recomputed buffer
/// - `Ok(false)`: well-formed but invalid
/// - `Err(MalformedInput)`: public key or signature has the wrong length
pub fn verify(result: &SigningResult) -> Result<bool> {
    if let Some(nonce_bytes) = result.nonce_bytes() {
        if nonce_bytes != encode_nonce(result.nonce()) {
            tracing::warn!(
                "nonceBytes {} do not match nonce {}; ignoring stored bytes",
                hex::encode(nonce_bytes),
                result.nonce()
            );
        }
    }

    verify_parts(
        result.public_key(),
        result.message(),
        result.nonce(),
        result.signature(),
    )
}

/// Verify from individual parts
pub fn verify_parts(
    public_key: &[u8],
    message: &[u8],
    nonce: u64,
    signature: &[u8],
) -> Result<bool> {
    let public_key: [u8; PUBLIC_KEY_LENGTH] = public_key.try_into().map_err(|_| {
        SignerError::MalformedInput(format!(
            "Invalid public key length: expected {} bytes, got {}",
            PUBLIC_KEY_LENGTH,
            public_key.len()
        ))
    })?;

    let signature: [u8; SIGNATURE_LENGTH] = signature.try_into().map_err(|_| {
        SignerError::MalformedInput(format!(
            "Invalid signature length: expected {} bytes, got {}",
            SIGNATURE_LENGTH,
            signature.len()
        ))
    })?;

    let verifying_key = match VerifyingKey::from_bytes(&public_key) {
        Ok(key) => key,
        Err(_) => {
            tracing::warn!("Public key is not a valid Ed25519 point");
            return Ok(false);
        }
    };

    let encoded = encode_message_bytes(message, nonce);
    let is_valid = verifying_key
        .verify(&encoded, &Signature::from_bytes(&signature))
        .is_ok();

    tracing::debug!(
        "Signature verification: valid={}, msg_len={} bytes, nonce={}",
        is_valid,
        message.len(),
        nonce
    );

    Ok(is_valid)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keypair::Ed25519Keypair;
    use crate::signing::sign_with_nonce;

    fn fixed_keypair() -> Ed25519Keypair {
        Ed25519Keypair::from_seed(&[0x11; 32])
    }

    #[test]
    fn test_hello_world_scenario() {
        let keypair = fixed_keypair();
        let signed = sign_with_nonce(&keypair, "hello world", 2).unwrap();
        assert!(verify(&signed).unwrap());

        let replayed = SigningResult::new(
            signed.public_key().to_vec(),
            signed.message().to_vec(),
            3,
            signed.signature().to_vec(),
        );
        assert!(!verify(&replayed).unwrap());
    }

    #[test]
    fn test_forged_nonce_bytes_are_ignored() {
        let keypair = fixed_keypair();
        let signed = sign_with_nonce(&keypair, "hello world", 2).unwrap();

        // claims nonce 7 but carries bytes for nonce 2
        let json = signed
            .to_json()
            .unwrap()
            .replace("\"nonce\": 2", "\"nonce\": 7");
        let forged = SigningResult::from_json(&json).unwrap();

        assert_eq!(forged.nonce(), 7);
        assert_eq!(forged.nonce_bytes(), signed.nonce_bytes());
        assert!(!verify(&forged).unwrap());
    }

    #[test]
    fn test_wrong_public_key_length() {
        let result = verify_parts(&[0u8; 31], b"m", 0, &[0u8; 64]);
        match result {
            Err(SignerError::MalformedInput(msg)) => assert!(msg.contains("public key")),
            _ => panic!("Expected MalformedInput"),
        }
    }

    #[test]
    fn test_wrong_signature_length() {
        let keypair = fixed_keypair();
        let result = verify_parts(&keypair.public_key_bytes(), b"m", 0, &[0u8; 63]);
        match result {
            Err(SignerError::MalformedInput(msg)) => assert!(msg.contains("signature")),
            _ => panic!("Expected MalformedInput"),
        }
    }

    #[test]
    fn test_zero_signature_is_rejected() {
        let keypair = fixed_keypair();
        let valid = verify_parts(&keypair.public_key_bytes(), b"m", 0, &[0u8; 64]).unwrap();
        assert!(!valid);
    }
}
