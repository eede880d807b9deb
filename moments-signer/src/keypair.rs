//! Ed25519 keypair
//!
//! The signing identity used for nonce-tagged messages. Signatures are plain
//! Ed25519 over the raw message bytes, the same primitive the `moments`
//! contract checks on chain, so no intent prefix or hashing is applied here.

use crate::derivation;
use crate::error::{Result, SignerError};
use crate::traits::Signer;
use base64::{engine::general_purpose, Engine as _};
use ed25519_dalek::{Signature, SigningKey, VerifyingKey};
use rand::rngs::OsRng;

/// Raw private seed length
pub const SECRET_KEY_LENGTH: usize = 32;
/// Public key length
pub const PUBLIC_KEY_LENGTH: usize = 32;
/// Detached signature length
pub const SIGNATURE_LENGTH: usize = 64;

/// Ed25519 keypair
///
/// # Example
///
/// ```rust
/// use moments_signer::keypair::Ed25519Keypair;
/// use moments_signer::traits::Signer;
///
/// let keypair = Ed25519Keypair::from_seed(&[7u8; 32]);
/// let signature = keypair.sign(b"hello world").unwrap();
/// assert!(keypair.verify(b"hello world", &signature).unwrap());
/// ```
#[derive(Clone)]
pub struct Ed25519Keypair {
    signing_key: SigningKey,
    verifying_key: VerifyingKey,
}

impl Ed25519Keypair {
    /// Generate a fresh keypair from the OS random source
    pub fn generate() -> Self {
        let keypair = Self::from_signing_key(SigningKey::generate(&mut OsRng));
        tracing::info!(
            "Generated Ed25519 keypair: pk={}",
            hex::encode(keypair.public_key_bytes())
        );
        keypair
    }

    /// Build keypair from a 32-byte private seed
    pub fn from_seed(seed: &[u8; SECRET_KEY_LENGTH]) -> Self {
        Self::from_signing_key(SigningKey::from_bytes(seed))
    }

    /// Restore keypair from decoded secret key bytes
    ///
    /// Inputs longer than the seed keep only the first 32 bytes, which
    /// allows exported forms carrying a trailing flag byte.
    ///
    /// # Errors
    /// - Returns `InvalidKeyEncoding` if fewer than 32 bytes are supplied
    pub fn from_secret_key(bytes: &[u8]) -> Result<Self> {
        if bytes.len() < SECRET_KEY_LENGTH {
            return Err(SignerError::InvalidKeyEncoding(format!(
                "Secret key too short: expected at least {} bytes, got {}",
                SECRET_KEY_LENGTH,
                bytes.len()
            )));
        }

        if bytes.len() > SECRET_KEY_LENGTH {
            tracing::debug!(
                "Secret key has {} bytes, using the first {}",
                bytes.len(),
                SECRET_KEY_LENGTH
            );
        }

        let mut seed = [0u8; SECRET_KEY_LENGTH];
        seed.copy_from_slice(&bytes[..SECRET_KEY_LENGTH]);
        Ok(Self::from_seed(&seed))
    }

    /// Restore keypair from a base64 encoded secret key
    pub fn from_base64(encoded: &str) -> Result<Self> {
        let bytes = general_purpose::STANDARD
            .decode(encoded.trim())
            .map_err(|e| SignerError::InvalidKeyEncoding(format!("Invalid base64: {}", e)))?;
        Self::from_secret_key(&bytes)
    }

    /// Derive keypair from a BIP-39 mnemonic along the Sui Ed25519 path
    pub fn from_mnemonic(phrase: &str) -> Result<Self> {
        Self::from_mnemonic_with_path(phrase, derivation::SUI_DERIVATION_PATH)
    }

    /// Derive keypair from a BIP-39 mnemonic along an explicit hardened path
    pub fn from_mnemonic_with_path(phrase: &str, path: &str) -> Result<Self> {
        let seed = derivation::mnemonic_to_seed(phrase)?;
        let secret = derivation::derive_path(&seed, path)?;
        Ok(Self::from_seed(&secret))
    }

    fn from_signing_key(signing_key: SigningKey) -> Self {
        let verifying_key = signing_key.verifying_key();
        Self {
            signing_key,
            verifying_key,
        }
    }

    /// Public key bytes
    pub fn public_key_bytes(&self) -> [u8; PUBLIC_KEY_LENGTH] {
        self.verifying_key.to_bytes()
    }

    /// Sign with the private seed, returning the fixed-size signature
    pub fn sign_bytes(&self, message: &[u8]) -> [u8; SIGNATURE_LENGTH] {
        use ed25519_dalek::Signer as _;
        self.signing_key.sign(message).to_bytes()
    }

    /// Export the private seed as base64
    ///
    /// # Security Warning
    /// Only for demonstration and debugging flows; never log the result
    pub fn export_secret_base64(&self) -> String {
        general_purpose::STANDARD.encode(self.signing_key.to_bytes())
    }

    /// Raw private seed
    pub fn secret_bytes(&self) -> [u8; SECRET_KEY_LENGTH] {
        self.signing_key.to_bytes()
    }

    pub(crate) fn verifying_key(&self) -> &VerifyingKey {
        &self.verifying_key
    }
}

impl Signer for Ed25519Keypair {
    fn sign(&self, message: &[u8]) -> Result<Vec<u8>> {
        Ok(self.sign_bytes(message).to_vec())
    }

    fn verify(&self, message: &[u8], signature: &[u8]) -> Result<bool> {
        let signature: [u8; SIGNATURE_LENGTH] = signature.try_into().map_err(|_| {
            SignerError::MalformedInput(format!(
                "Invalid signature length: expected {} bytes, got {}",
                SIGNATURE_LENGTH,
                signature.len()
            ))
        })?;

        use ed25519_dalek::Verifier as _;
        Ok(self
            .verifying_key()
            .verify(message, &Signature::from_bytes(&signature))
            .is_ok())
    }

    fn public_key(&self) -> &[u8] {
        self.verifying_key.as_bytes()
    }

    fn algorithm_name(&self) -> &str {
        "Ed25519"
    }

    fn export_secret(&self) -> Option<String> {
        Some(self.export_secret_base64())
    }
}

impl std::fmt::Debug for Ed25519Keypair {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Ed25519Keypair")
            .field("public_key", &hex::encode(self.public_key_bytes()))
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // RFC 8032, section 7.1, TEST 1
    const RFC8032_SECRET: &str = "9d61b19deffd5a60ba844af492ec2cc44449c5697b326919703bac031cae7f60";
    const RFC8032_PUBLIC: &str = "d75a980182b10ab7d54bfed3c964073a0ee172f3daa62325af021a68f707511a";
    const RFC8032_SIGNATURE: &str = "e5564300c360ac729086e2cc806e828a84877f1eb8e5d974d873e065224901555fb8821590a33bacc61e39701cf9b46bd25bf5f0595bbe24655141438e7a100b";

    fn rfc8032_keypair() -> Ed25519Keypair {
        let seed: [u8; 32] = hex::decode(RFC8032_SECRET).unwrap().try_into().unwrap();
        Ed25519Keypair::from_seed(&seed)
    }

    #[test]
    fn test_rfc8032_public_key() {
        let keypair = rfc8032_keypair();
        assert_eq!(hex::encode(keypair.public_key_bytes()), RFC8032_PUBLIC);
    }

    #[test]
    fn test_rfc8032_empty_message_signature() {
        let keypair = rfc8032_keypair();
        assert_eq!(hex::encode(keypair.sign_bytes(b"")), RFC8032_SIGNATURE);
    }

    #[test]
    fn test_sign_and_verify() {
        let keypair = Ed25519Keypair::generate();
        let signature = keypair.sign(b"moment minted").unwrap();

        assert_eq!(signature.len(), SIGNATURE_LENGTH);
        assert!(keypair.verify(b"moment minted", &signature).unwrap());
        assert!(!keypair.verify(b"moment burned", &signature).unwrap());
    }

    #[test]
    fn test_verify_wrong_signature_length() {
        let keypair = Ed25519Keypair::generate();
        let result = keypair.verify(b"msg", &[0u8; 10]);

        match result {
            Err(SignerError::MalformedInput(msg)) => assert!(msg.contains("signature length")),
            _ => panic!("Expected MalformedInput"),
        }
    }

    #[test]
    fn test_from_secret_key_truncates_long_input() {
        let mut bytes = vec![5u8; 32];
        bytes.push(0x00);

        let long = Ed25519Keypair::from_secret_key(&bytes).unwrap();
        let exact = Ed25519Keypair::from_seed(&[5u8; 32]);
        assert_eq!(long.public_key_bytes(), exact.public_key_bytes());
    }

    #[test]
    fn test_from_secret_key_too_short() {
        let result = Ed25519Keypair::from_secret_key(&[1u8; 31]);
        match result {
            Err(SignerError::InvalidKeyEncoding(msg)) => assert!(msg.contains("too short")),
            _ => panic!("Expected InvalidKeyEncoding"),
        }
    }

    #[test]
    fn test_base64_roundtrip_keeps_identity() {
        let keypair = Ed25519Keypair::generate();
        let restored = Ed25519Keypair::from_base64(&keypair.export_secret_base64()).unwrap();

        assert_eq!(restored.public_key_bytes(), keypair.public_key_bytes());
        assert_eq!(restored.secret_bytes(), keypair.secret_bytes());
    }

    #[test]
    fn test_invalid_base64() {
        assert!(matches!(
            Ed25519Keypair::from_base64("not base64!!"),
            Err(SignerError::InvalidKeyEncoding(_))
        ));
    }

    #[test]
    fn test_debug_does_not_leak_secret() {
        let keypair = Ed25519Keypair::from_seed(&[42u8; 32]);
        let debug_str = format!("{:?}", keypair);

        assert!(debug_str.contains("public_key"));
        assert!(!debug_str.contains("2a2a2a2a"));
    }
}
