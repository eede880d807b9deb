//! Key provider with a single-assignment identity cache
//!
//! One provider is built per process or session and handed by reference to
//! whatever signs. The first successful `derive_or_load` fixes the identity;
//! later calls return that same keypair and ignore their input.

use crate::error::Result;
use crate::keypair::Ed25519Keypair;
use std::sync::OnceLock;

/// Where the signing identity comes from
#[derive(Clone)]
pub enum KeySource {
    /// Base64 encoded secret key
    SecretKey(String),
    /// BIP-39 mnemonic, derived along the Sui path
    Mnemonic(String),
    /// Fresh random keypair
    Random,
}

impl KeySource {
    pub fn kind(&self) -> &'static str {
        match self {
            KeySource::SecretKey(_) => "secret-key",
            KeySource::Mnemonic(_) => "mnemonic",
            KeySource::Random => "random",
        }
    }

    fn resolve(&self) -> Result<Ed25519Keypair> {
        match self {
            KeySource::SecretKey(encoded) => Ed25519Keypair::from_base64(encoded),
            KeySource::Mnemonic(phrase) => Ed25519Keypair::from_mnemonic(phrase),
            KeySource::Random => Ok(Ed25519Keypair::generate()),
        }
    }
}

impl std::fmt::Debug for KeySource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "KeySource::{}(..)", self.kind())
    }
}

/// Caller-owned key provider
#[derive(Default)]
pub struct KeyProvider {
    identity: OnceLock<Ed25519Keypair>,
}

impl KeyProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Provider whose identity is already fixed
    pub fn with_keypair(keypair: Ed25519Keypair) -> Self {
        let provider = Self::new();
        let _ = provider.identity.set(keypair);
        provider
    }

    /// Return the cached identity, resolving `source` on first use
    ///
    /// # Errors
    /// - `InvalidKeyEncoding` when the first resolution fails (bad secret or phrase);
    ///   nothing is cached in that case
    pub fn derive_or_load(&self, source: &KeySource) -> Result<&Ed25519Keypair> {
        if let Some(keypair) = self.identity.get() {
            tracing::debug!("Reusing cached keypair, ignoring {:?}", source);
            return Ok(keypair);
        }

        let keypair = source.resolve()?;
        tracing::info!(
            "Key provider initialized from {}: pk={}",
            source.kind(),
            hex::encode(keypair.public_key_bytes())
        );

        // a concurrent initializer may have won; its keypair is the identity
        Ok(self.identity.get_or_init(|| keypair))
    }

    /// Cached identity, if any
    pub fn keypair(&self) -> Option<&Ed25519Keypair> {
        self.identity.get()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SignerError;

    #[test]
    fn test_first_call_wins() {
        let provider = KeyProvider::new();
        let first = provider
            .derive_or_load(&KeySource::SecretKey(
                "AAAAAAAAAAAAAAEAAAAAAAgAAAgAAAUAAAAABgQAAAA=".to_string(),
            ))
            .unwrap()
            .public_key_bytes();

        let second = provider
            .derive_or_load(&KeySource::Random)
            .unwrap()
            .public_key_bytes();

        assert_eq!(first, second);
    }

    #[test]
    fn test_failed_resolution_is_not_cached() {
        let provider = KeyProvider::new();

        let result = provider.derive_or_load(&KeySource::SecretKey("AAAA".to_string()));
        assert!(matches!(result, Err(SignerError::InvalidKeyEncoding(_))));
        assert!(provider.keypair().is_none());

        let result = provider.derive_or_load(&KeySource::Mnemonic("not a real phrase".to_string()));
        assert!(matches!(result, Err(SignerError::InvalidKeyEncoding(_))));
        assert!(provider.keypair().is_none());

        provider.derive_or_load(&KeySource::Random).unwrap();
        assert!(provider.keypair().is_some());
    }

    #[test]
    fn test_separate_providers_are_independent() {
        let a = KeyProvider::new();
        let b = KeyProvider::new();

        let pk_a = a.derive_or_load(&KeySource::Random).unwrap().public_key_bytes();
        let pk_b = b.derive_or_load(&KeySource::Random).unwrap().public_key_bytes();

        assert_ne!(pk_a, pk_b);
    }

    #[test]
    fn test_with_keypair() {
        let keypair = Ed25519Keypair::from_seed(&[3u8; 32]);
        let expected = keypair.public_key_bytes();

        let provider = KeyProvider::with_keypair(keypair);
        let cached = provider.derive_or_load(&KeySource::Random).unwrap();
        assert_eq!(cached.public_key_bytes(), expected);
    }

    #[test]
    fn test_debug_hides_secret() {
        let source = KeySource::Mnemonic("secret words here".to_string());
        let debug_str = format!("{:?}", source);
        assert!(debug_str.contains("mnemonic"));
        assert!(!debug_str.contains("secret words"));
    }
}
