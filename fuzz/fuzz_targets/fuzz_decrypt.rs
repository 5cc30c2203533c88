#![no_main]

use libfuzzer_sys::fuzz_target;
use num_bigint::BigUint;
use sm2_lab::{KeyPair, Signature, Sm2};

fuzz_target!(|data: &[u8]| {
    let sm2 = Sm2::default();
    let keys = match KeyPair::from_private_key(sm2.params(), BigUint::from(0x5eed_u32)) {
        Ok(keys) => keys,
        Err(_) => return,
    };
    let _ = sm2.decrypt(data, keys.private_key());
    let _ = Signature::from_bytes(sm2.params(), data);
});
