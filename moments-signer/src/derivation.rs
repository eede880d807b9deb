//! Mnemonic key derivation
//!
//! BIP-39 turns the phrase into a 64-byte seed (empty passphrase), then
//! SLIP-0010 walks an all-hardened path over Ed25519. Sui wallets use
//! `m/44'/784'/0'/0'/0'` for the first account.

use crate::error::{Result, SignerError};
use bip39::Mnemonic;
use hmac::{Hmac, Mac};
use sha2::Sha512;

type HmacSha512 = Hmac<Sha512>;

/// Default Sui Ed25519 derivation path
pub const SUI_DERIVATION_PATH: &str = "m/44'/784'/0'/0'/0'";

const ED25519_CURVE_KEY: &[u8] = b"ed25519 seed";
const HARDENED_OFFSET: u32 = 0x8000_0000;

/// SLIP-0010 extended private key
#[derive(Clone)]
pub struct ExtendedKey {
    pub secret: [u8; 32],
    pub chain_code: [u8; 32],
}

/// Convert a mnemonic phrase into its BIP-39 seed
///
/// Words are lowercased and whitespace collapsed before parsing.
pub fn mnemonic_to_seed(phrase: &str) -> Result<[u8; 64]> {
    let normalized = phrase
        .split_whitespace()
        .map(|word| word.to_lowercase())
        .collect::<Vec<_>>()
        .join(" ");

    let mnemonic = Mnemonic::parse_normalized(&normalized)
        .map_err(|e| SignerError::InvalidKeyEncoding(format!("invalid mnemonic: {}", e)))?;

    Ok(mnemonic.to_seed_normalized(""))
}

/// Master key from a seed
pub fn master_key(seed: &[u8]) -> Result<ExtendedKey> {
    hmac_split(ED25519_CURVE_KEY, seed)
}

/// Hardened child derivation; `index` is the unhardened index
pub fn derive_hardened(parent: &ExtendedKey, index: u32) -> Result<ExtendedKey> {
    if index >= HARDENED_OFFSET {
        return Err(SignerError::KeyDerivation(format!(
            "Child index {} out of range",
            index
        )));
    }

    let mut data = Vec::with_capacity(1 + 32 + 4);
    data.push(0x00);
    data.extend_from_slice(&parent.secret);
    data.extend_from_slice(&(index | HARDENED_OFFSET).to_be_bytes());

    hmac_split(&parent.chain_code, &data)
}

/// Parse a path such as `m/44'/784'/0'/0'/0'`
///
/// Ed25519 only supports hardened derivation, so every segment must carry
/// a `'` (or `h`) marker.
pub fn parse_path(path: &str) -> Result<Vec<u32>> {
    let mut segments = path.trim().split('/');

    if segments.next() != Some("m") {
        return Err(SignerError::KeyDerivation(format!(
            "Derivation path must start with 'm': {}",
            path
        )));
    }

    segments
        .map(|segment| {
            let index = segment
                .strip_suffix('\'')
                .or_else(|| segment.strip_suffix('h'))
                .ok_or_else(|| {
                    SignerError::KeyDerivation(format!(
                        "Non-hardened segment '{}' in path {}",
                        segment, path
                    ))
                })?;

            let index: u32 = index.parse().map_err(|_| {
                SignerError::KeyDerivation(format!("Invalid segment '{}' in path {}", segment, path))
            })?;

            if index >= HARDENED_OFFSET {
                return Err(SignerError::KeyDerivation(format!(
                    "Segment '{}' out of range",
                    segment
                )));
            }

            Ok(index)
        })
        .collect()
}

/// Derive the private seed at `path`
pub fn derive_path(seed: &[u8], path: &str) -> Result<[u8; 32]> {
    let indices = parse_path(path)?;

    let mut key = master_key(seed)?;
    for index in indices {
        key = derive_hardened(&key, index)?;
    }

    tracing::debug!("Derived Ed25519 key along {}", path);

    Ok(key.secret)
}

fn hmac_split(key: &[u8], data: &[u8]) -> Result<ExtendedKey> {
    let mut mac = HmacSha512::new_from_slice(key)
        .map_err(|e| SignerError::KeyDerivation(format!("HMAC init failed: {}", e)))?;
    mac.update(data);
    let output = mac.finalize().into_bytes();

    let mut secret = [0u8; 32];
    let mut chain_code = [0u8; 32];
    secret.copy_from_slice(&output[..32]);
    chain_code.copy_from_slice(&output[32..]);

    Ok(ExtendedKey { secret, chain_code })
}
