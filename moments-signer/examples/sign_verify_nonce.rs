//! Sign and verify a nonce-tagged message end to end

use moments_signer::{sign_with_nonce_exposing_key, verify, KeyProvider, KeySource, SigningResult};

fn main() {
    println!("=== Nonce-Tagged Signature/Verification ===\n");

    // 1. Load identity
    let provider = KeyProvider::new();
    let keypair = provider
        .derive_or_load(&KeySource::SecretKey(
            "AAAAAAAAAAAAAAEAAAAAAAgAAAgAAAUAAAAABgQAAAA=".to_string(),
        ))
        .unwrap();

    println!("✓ Loaded keypair");
    println!("  Public key: {}", hex::encode(keypair.public_key_bytes()));
    println!();

    // 2. Sign message with nonce
    let result = sign_with_nonce_exposing_key(keypair, "hello world", 2).unwrap();

    println!("✓ Signing complete");
    println!("{}", result.to_json().unwrap());
    println!();

    // 3. Verify
    println!("Step: Verify...");
    match verify(&result) {
        Ok(true) => println!("✓ Verification successful"),
        Ok(false) => println!("✗ Verification failed"),
        Err(e) => println!("✗ Verification error: {:?}", e),
    }
    println!();

    // 4. Replay under another nonce
    println!("Step: Replay with nonce 3...");
    let replayed = SigningResult::new(
        result.public_key().to_vec(),
        result.message().to_vec(),
        3,
        result.signature().to_vec(),
    );
    match verify(&replayed) {
        Ok(false) => println!("✓ Correct: replay was rejected"),
        Ok(true) => println!("✗ Critical error: replay was accepted!"),
        Err(e) => println!("Verification error: {:?}", e),
    }
}
