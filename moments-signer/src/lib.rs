//! Nonce-tagged Ed25519 signing library
//!
//! Signs `UTF-8(message) ++ be_u64(nonce)` so that an otherwise identical
//! message cannot be replayed under a different nonce, and verifies the
//! resulting artifact by recomputing that buffer.
//!
//! # Quick Start
//!
//! ```rust
//! use moments_signer::{KeyProvider, KeySource, sign_with_nonce, verify};
//!
//! // Derive or load the process identity once
//! let provider = KeyProvider::new();
//! let keypair = provider
//!     .derive_or_load(&KeySource::SecretKey(
//!         "AAAAAAAAAAAAAAEAAAAAAAgAAAgAAAUAAAAABgQAAAA=".to_string(),
//!     ))
//!     .unwrap();
//!
//! // Sign message with nonce
//! let result = sign_with_nonce(keypair, "hello world", 2).unwrap();
//!
//! // Verify signature
//! assert!(verify(&result).unwrap());
//! ```

pub mod derivation;
pub mod encoding;
pub mod error;
pub mod keypair;
pub mod provider;
pub mod signing;
pub mod traits;
pub mod verifier;

// Re-export commonly used types
pub use encoding::{encode_message, encode_message_bytes, encode_nonce};
pub use error::{Result, SignerError};
pub use keypair::Ed25519Keypair;
pub use provider::{KeyProvider, KeySource};
pub use signing::{sign_with_nonce, sign_with_nonce_exposing_key, SigningResult};
pub use traits::Signer;
pub use verifier::{verify, verify_parts};
