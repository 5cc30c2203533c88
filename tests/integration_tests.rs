mod common;

use num_bigint::BigUint;
use sm2_lab::primitives::curve::encoding::UNCOMPRESSED_TAG;
use sm2_lab::{
    DomainParameters, Error, HashAlgorithm, KeyPair, MultiplicationMethod, Point, SecureRng,
    Signature, Sm2, Sm2Config,
};

use common::{init_tracing, seeded_rng, toy_params};

#[test]
fn toy_curve_doubling_and_order() {
    let params = toy_params();
    let g = params.generator();

    let doubled = params.double(g);
    assert_eq!(
        params.scalar_multiply(&BigUint::from(2u32), g),
        doubled,
        "2*G must equal G doubled"
    );
    assert_eq!(doubled, Point::new(BigUint::from(6u32), BigUint::from(3u32)));
    assert!(
        params.scalar_multiply(&BigUint::from(19u32), g).is_identity(),
        "19*G must be the identity"
    );
}

#[test]
fn sm2_generator_has_order_n() {
    let params = DomainParameters::sm2();
    let n_g = params.scalar_multiply(params.n(), params.generator());
    assert!(n_g.is_identity());
}

#[test]
fn full_signature_flow_with_os_randomness() {
    init_tracing();

    let sm2 = Sm2::default();
    let mut rng = SecureRng::new();
    let keys = sm2
        .generate_key_pair(&mut rng)
        .expect("Key generation should succeed");

    let signature = sm2
        .sign(&mut rng, b"message digest", keys.private_key())
        .expect("Signing should succeed");
    assert!(
        sm2.verify(b"message digest", &signature, keys.public_key()),
        "Fresh signature should verify"
    );

    let bytes = signature.to_bytes(sm2.params());
    let decoded =
        Signature::from_bytes(sm2.params(), &bytes).expect("Signature decoding should succeed");
    assert!(sm2.verify(b"message digest", &decoded, keys.public_key()));
}

#[test]
fn full_encryption_flow_with_os_randomness() {
    init_tracing();

    let sm2 = Sm2::default();
    let mut rng = SecureRng::new();
    let keys = sm2
        .generate_key_pair(&mut rng)
        .expect("Key generation should succeed");

    let message = b"encryption standard";
    let ciphertext = sm2
        .encrypt(&mut rng, message, keys.public_key())
        .expect("Encryption should succeed");
    assert_eq!(ciphertext[0], UNCOMPRESSED_TAG);
    assert_eq!(ciphertext.len(), 65 + 32 + message.len());

    let plaintext = sm2
        .decrypt(&ciphertext, keys.private_key())
        .expect("Decryption should succeed");
    assert_eq!(plaintext, message);
}

#[test]
fn public_key_survives_compression() {
    let sm2 = Sm2::default();
    let mut rng = seeded_rng(1);
    let keys = sm2.generate_key_pair(&mut rng).unwrap();
    let params = sm2.params();

    let compressed = params.compress(keys.public_key());
    assert_eq!(compressed.len(), 33);
    let restored = params
        .decompress(&compressed)
        .expect("Decompression should succeed");
    assert_eq!(&restored, keys.public_key());

    let signature = sm2.sign(&mut rng, b"payload", keys.private_key()).unwrap();
    assert!(sm2.verify(b"payload", &signature, &restored));
}

#[test]
fn every_multiplication_method_interoperates() {
    init_tracing();

    let methods = [
        MultiplicationMethod::DoubleAndAdd,
        MultiplicationMethod::Windowed { width: 4 },
        MultiplicationMethod::Naf,
    ];
    let contexts: Vec<Sm2> = methods
        .iter()
        .map(|&m| {
            Sm2::new(
                DomainParameters::sm2(),
                Sm2Config::default().with_multiplication(m),
            )
            .expect("Configuration should be valid")
        })
        .collect();

    let mut rng = seeded_rng(2);
    let keys = contexts[0].generate_key_pair(&mut rng).unwrap();

    for signer in &contexts {
        let signature = signer
            .sign(&mut rng, b"interop", keys.private_key())
            .unwrap();
        let ciphertext = signer
            .encrypt(&mut rng, b"interop", keys.public_key())
            .unwrap();
        for verifier in &contexts {
            assert!(verifier.verify(b"interop", &signature, keys.public_key()));
            assert_eq!(
                verifier.decrypt(&ciphertext, keys.private_key()).unwrap(),
                b"interop"
            );
        }
    }
}

#[test]
fn hash_choice_changes_signatures_and_ciphertexts() {
    let sha256 = Sm2::default();
    let sha3 = Sm2::new(
        DomainParameters::sm2(),
        Sm2Config::default().with_hash(HashAlgorithm::Sha3_256),
    )
    .unwrap();

    let mut rng = seeded_rng(3);
    let keys = sha256.generate_key_pair(&mut rng).unwrap();

    let signature = sha256.sign(&mut rng, b"abc", keys.private_key()).unwrap();
    assert!(sha256.verify(b"abc", &signature, keys.public_key()));
    assert!(!sha3.verify(b"abc", &signature, keys.public_key()));

    let ciphertext = sha256.encrypt(&mut rng, b"abc", keys.public_key()).unwrap();
    assert!(matches!(
        sha3.decrypt(&ciphertext, keys.private_key()),
        Err(Error::DecryptionIntegrity)
    ));
}

#[test]
fn toml_configuration_drives_the_engine() {
    let config = Sm2Config::from_toml_str(
        r#"
        hash = "sha512"
        user_id = "414c494345313233405941484f4f2e434f4d"
        max_retries = 16

        [multiplication]
        method = "naf"
        "#,
    )
    .expect("Configuration should parse");
    assert_eq!(config.user_id, b"ALICE123@YAHOO.COM");

    let sm2 = Sm2::new(DomainParameters::sm2(), config).unwrap();
    let mut rng = seeded_rng(4);
    let keys = sm2.generate_key_pair(&mut rng).unwrap();

    let signature = sm2.sign(&mut rng, b"configured", keys.private_key()).unwrap();
    assert!(sm2.verify_with_user_id(
        b"configured",
        b"ALICE123@YAHOO.COM",
        &signature,
        keys.public_key()
    ));

    let ciphertext = sm2.encrypt(&mut rng, b"configured", keys.public_key()).unwrap();
    assert_eq!(ciphertext.len(), 65 + 64 + 10);
}

#[test]
fn toy_curve_engine_end_to_end() {
    init_tracing();

    let sm2 = Sm2::new(toy_params(), Sm2Config::default()).unwrap();
    let mut rng = seeded_rng(5);

    for d in 1u32..=17 {
        let keys = KeyPair::from_private_key(sm2.params(), BigUint::from(d)).unwrap();

        let signature = sm2.sign(&mut rng, b"toy", keys.private_key()).unwrap();
        assert!(sm2.verify(b"toy", &signature, keys.public_key()));

        let ciphertext = sm2.encrypt(&mut rng, b"toy", keys.public_key()).unwrap();
        assert_eq!(ciphertext.len(), 3 + 32 + 3);
        assert_eq!(sm2.decrypt(&ciphertext, keys.private_key()).unwrap(), b"toy");
    }
}

#[test]
fn malformed_domain_parameters_are_rejected() {
    let result = DomainParameters::new(
        "composite",
        BigUint::from(15u32),
        BigUint::from(2u32),
        BigUint::from(2u32),
        BigUint::from(19u32),
        BigUint::from(5u32),
        BigUint::from(1u32),
    );
    assert!(matches!(result, Err(Error::InvalidDomainParameters(_))));

    let result = DomainParameters::new(
        "wrong order",
        BigUint::from(17u32),
        BigUint::from(2u32),
        BigUint::from(2u32),
        BigUint::from(17u32),
        BigUint::from(5u32),
        BigUint::from(1u32),
    );
    assert!(matches!(result, Err(Error::InvalidDomainParameters(_))));
}
