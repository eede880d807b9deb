//! Nonce-tagged signing
//!
//! # Signing Flow
//!
//! ```text
//! (message, nonce)
//!     ↓
//! encode_message  →  UTF-8(message) ++ be_u64(nonce)
//!     ↓
//! Ed25519 sign
//!     ↓
//! SigningResult  →  JSON artifact for the verifier
//! ```

use crate::encoding::{encode_message, encode_nonce};
use crate::error::Result;
use crate::traits::Signer;
use serde::{Deserialize, Serialize};

/// Artifact exchanged between signer and verifier
///
/// Byte fields serialize as arrays of numbers so the JSON can be fed to
/// transaction builders expecting `vector<u8>` arguments.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SigningResult {
    public_key: Vec<u8>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    private_key: Option<String>,

    message: Vec<u8>,

    nonce: u64,

    /// Presentation only; verification recomputes it from `nonce`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    nonce_bytes: Option<Vec<u8>>,

    signature: Vec<u8>,
}

impl SigningResult {
    /// Assemble a result from parts received out of band
    pub fn new(public_key: Vec<u8>, message: Vec<u8>, nonce: u64, signature: Vec<u8>) -> Self {
        Self {
            public_key,
            private_key: None,
            message,
            nonce,
            nonce_bytes: None,
            signature,
        }
    }

    /// Attach the encoded nonce for display
    pub fn with_nonce_bytes(mut self) -> Self {
        self.nonce_bytes = Some(encode_nonce(self.nonce).to_vec());
        self
    }

    /// Attach the exported secret key (demonstration flows only)
    pub fn with_private_key(mut self, private_key: String) -> Self {
        self.private_key = Some(private_key);
        self
    }

    pub fn public_key(&self) -> &[u8] {
        &self.public_key
    }

    pub fn private_key(&self) -> Option<&str> {
        self.private_key.as_deref()
    }

    pub fn message(&self) -> &[u8] {
        &self.message
    }

    /// Message as text, if it is valid UTF-8
    pub fn message_text(&self) -> Option<&str> {
        std::str::from_utf8(&self.message).ok()
    }

    pub fn nonce(&self) -> u64 {
        self.nonce
    }

    pub fn nonce_bytes(&self) -> Option<&[u8]> {
        self.nonce_bytes.as_deref()
    }

    pub fn signature(&self) -> &[u8] {
        &self.signature
    }

    /// The exact bytes that were signed
    pub fn encoded_message(&self) -> Vec<u8> {
        crate::encoding::encode_message_bytes(&self.message, self.nonce)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

/// Sign `message` tagged with `nonce`
///
/// # Example
///
/// ```rust
/// use moments_signer::{sign_with_nonce, verify, Ed25519Keypair};
///
/// let keypair = Ed25519Keypair::from_seed(&[1u8; 32]);
/// let result = sign_with_nonce(&keypair, "hello world", 2).unwrap();
/// assert!(verify(&result).unwrap());
/// ```
pub fn sign_with_nonce<S: Signer + ?Sized>(
    signer: &S,
    message: &str,
    nonce: u64,
) -> Result<SigningResult> {
    let encoded = encode_message(message, nonce);
    let signature = signer.sign(&encoded)?;

    tracing::debug!(
        "Signed nonce-tagged message: msg_len={} bytes, nonce={}, sig_len={} bytes",
        message.len(),
        nonce,
        signature.len()
    );

    Ok(SigningResult::new(
        signer.public_key().to_vec(),
        message.as_bytes().to_vec(),
        nonce,
        signature,
    )
    .with_nonce_bytes())
}

/// Like [`sign_with_nonce`], echoing the exported secret key into the result
pub fn sign_with_nonce_exposing_key<S: Signer + ?Sized>(
    signer: &S,
    message: &str,
    nonce: u64,
) -> Result<SigningResult> {
    let result = sign_with_nonce(signer, message, nonce)?;
    Ok(match signer.export_secret() {
        Some(secret) => result.with_private_key(secret),
        None => result,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keypair::Ed25519Keypair;

    #[test]
    fn test_result_fields() {
        let keypair = Ed25519Keypair::from_seed(&[9u8; 32]);
        let result = sign_with_nonce(&keypair, "hello world", 2).unwrap();

        assert_eq!(result.public_key(), &keypair.public_key_bytes()[..]);
        assert_eq!(result.message(), b"hello world");
        assert_eq!(result.message_text(), Some("hello world"));
        assert_eq!(result.nonce(), 2);
        assert_eq!(result.nonce_bytes(), Some(&[0u8, 0, 0, 0, 0, 0, 0, 2][..]));
        assert_eq!(result.signature().len(), 64);
        assert!(result.private_key().is_none());
    }

    #[test]
    fn test_signature_is_deterministic() {
        let keypair = Ed25519Keypair::from_seed(&[9u8; 32]);
        let a = sign_with_nonce(&keypair, "hello world", 2).unwrap();
        let b = sign_with_nonce(&keypair, "hello world", 2).unwrap();
        let c = sign_with_nonce(&keypair, "hello world", 3).unwrap();

        assert_eq!(a.signature(), b.signature());
        assert_ne!(a.signature(), c.signature());
    }

    #[test]
    fn test_exposing_key() {
        let keypair = Ed25519Keypair::from_seed(&[9u8; 32]);
        let result = sign_with_nonce_exposing_key(&keypair, "hello world", 0).unwrap();

        assert_eq!(result.private_key(), Some(keypair.export_secret_base64().as_str()));
    }

    #[test]
    fn test_json_shape() {
        let keypair = Ed25519Keypair::from_seed(&[9u8; 32]);
        let result = sign_with_nonce(&keypair, "hi", 1).unwrap();

        let value: serde_json::Value = serde_json::from_str(&result.to_json().unwrap()).unwrap();
        assert_eq!(value["message"], serde_json::json!([104, 105]));
        assert_eq!(value["nonce"], 1);
        assert_eq!(value["nonceBytes"], serde_json::json!([0, 0, 0, 0, 0, 0, 0, 1]));
        assert_eq!(value["publicKey"].as_array().unwrap().len(), 32);
        assert!(value.get("privateKey").is_none());

        let parsed = SigningResult::from_json(&result.to_json().unwrap()).unwrap();
        assert_eq!(parsed, result);
    }

    #[test]
    fn test_from_json_without_optional_fields() {
        let json = r#"{"publicKey":[1,2],"message":[104],"nonce":5,"signature":[3]}"#;
        let parsed = SigningResult::from_json(json).unwrap();

        assert_eq!(parsed.nonce(), 5);
        assert!(parsed.nonce_bytes().is_none());
        assert!(parsed.private_key().is_none());
    }
}
