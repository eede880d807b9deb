/// Unified interface for detached signatures
use crate::error::Result;

/// Signer trait
pub trait Signer {
    /// Sign message
    fn sign(&self, message: &[u8]) -> Result<Vec<u8>>;

    /// Verify signature against this signer's public key
    fn verify(&self, message: &[u8], signature: &[u8]) -> Result<bool>;

    /// Get public key
    fn public_key(&self) -> &[u8];

    /// Algorithm name
    fn algorithm_name(&self) -> &str;

    /// Secret key export for demonstration flows, if the signer allows it
    fn export_secret(&self) -> Option<String> {
        None
    }
}
