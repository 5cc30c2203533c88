//! End-to-end walkthrough of the SM2 engine.
//!
//! This example demonstrates:
//! - Loading configuration from the environment
//! - Generating a key pair
//! - Compressing and restoring the public key
//! - Signing and verifying a message
//! - Encrypting and decrypting a message

use sm2_lab::{DomainParameters, SecureRng, Sm2, Sm2Config};

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    println!("SM2 Engine: Walkthrough\n");

    println!("Step 1: Load configuration and domain parameters");
    let config = Sm2Config::from_env().expect("Configuration should load");
    let sm2 = Sm2::new(DomainParameters::sm2(), config).expect("Configuration should be valid");
    println!("  Curve: {}", sm2.params().name());
    println!("  Hash: {}", sm2.config().hash);
    println!("  Retry bound: {}\n", sm2.config().max_retries);

    println!("Step 2: Generate a key pair");
    let mut rng = SecureRng::new();
    let keys = sm2
        .generate_key_pair(&mut rng)
        .expect("Key generation should succeed");
    println!("  Public key: {}\n", keys.public_key());

    println!("Step 3: Compress the public key for transmission");
    let compressed = sm2.params().compress(keys.public_key());
    println!("  Compressed: {}", hex::encode(&compressed));
    let restored = sm2
        .params()
        .decompress(&compressed)
        .expect("Decompression should succeed");
    println!("  Restored key matches: {}\n", &restored == keys.public_key());

    println!("Step 4: Sign a message");
    let message = b"message digest";
    let signature = sm2
        .sign(&mut rng, message, keys.private_key())
        .expect("Signing should succeed");
    println!("  Signature: {}\n", signature);

    println!("Step 5: Verify the signature");
    println!("  Original message: {}", sm2.verify(message, &signature, &restored));
    println!(
        "  Tampered message: {}\n",
        sm2.verify(b"message digest?", &signature, &restored)
    );

    println!("Step 6: Encrypt and decrypt");
    let ciphertext = sm2
        .encrypt(&mut rng, b"encryption standard", &restored)
        .expect("Encryption should succeed");
    println!("  Ciphertext ({} bytes): {}", ciphertext.len(), hex::encode(&ciphertext));
    let plaintext = sm2
        .decrypt(&ciphertext, keys.private_key())
        .expect("Decryption should succeed");
    println!("  Plaintext: {}", String::from_utf8_lossy(&plaintext));
}
