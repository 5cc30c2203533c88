//! What goes wrong when nonces are mishandled.
//!
//! This example demonstrates:
//! - Recovering a private key from a leaked nonce
//! - Recovering a private key from two signatures sharing a nonce
//! - Forging a signature against prehashed verification, and its limits

use num_bigint::BigUint;
use sm2_lab::analysis::{
    forge_signature, recover_from_leaked_nonce, recover_from_reused_nonce, verify_prehashed,
};
use sm2_lab::{SecureRng, Sm2};

fn main() {
    println!("SM2 Nonce Misuse\n");

    let sm2 = Sm2::default();
    let mut rng = SecureRng::new();
    let keys = sm2
        .generate_key_pair(&mut rng)
        .expect("Key generation should succeed");
    let user_id = sm2.config().user_id.clone();

    println!("Scenario 1: a nonce leaks");
    let k = BigUint::from(0x1337_u32);
    let signature = sm2
        .sign_with_nonce(b"leaked", &user_id, keys.private_key(), &k)
        .expect("Signing should succeed");
    let d = recover_from_leaked_nonce(&sm2, b"leaked", &user_id, &signature, &k)
        .expect("Recovery should succeed");
    println!("  Recovered key matches: {}\n", &d == keys.private_key().scalar());

    println!("Scenario 2: a nonce is reused");
    let first = sm2
        .sign_with_nonce(b"first", &user_id, keys.private_key(), &k)
        .expect("Signing should succeed");
    let second = sm2
        .sign_with_nonce(b"second", &user_id, keys.private_key(), &k)
        .expect("Signing should succeed");
    let d = recover_from_reused_nonce(&sm2, b"first", &first, b"second", &second, &user_id)
        .expect("Recovery should succeed");
    println!("  Recovered key matches: {}", &d == keys.private_key().scalar());

    let fresh = sm2
        .sign(&mut rng, b"second", keys.private_key())
        .expect("Signing should succeed");
    match recover_from_reused_nonce(&sm2, b"first", &first, b"second", &fresh, &user_id) {
        Ok(_) => println!("  Fresh nonce was mistaken for reuse"),
        Err(e) => println!("  Fresh nonce correctly refused: {}\n", e),
    }

    println!("Scenario 3: existential forgery over bare digests");
    let forged = forge_signature(&sm2, &mut rng, keys.public_key())
        .expect("Forgery should succeed");
    println!("  Forged digest: {}", hex::encode(forged.message()));
    println!(
        "  Verifies over its own digest: {}",
        verify_prehashed(sm2.params(), forged.message(), forged.signature(), keys.public_key())
    );
    let chosen = sm2.config().hash.digest(&[b"pay mallory".as_slice()]);
    println!(
        "  Verifies over a chosen message: {}",
        verify_prehashed(sm2.params(), &chosen, forged.signature(), keys.public_key())
    );
    println!("\nThe forger never controls which digest gets signed.");
}
