#![no_main]

use libfuzzer_sys::fuzz_target;
use sm2_lab::DomainParameters;

fuzz_target!(|data: &[u8]| {
    let params = DomainParameters::sm2();
    if let Ok(point) = params.decompress(data) {
        assert!(params.is_on_curve(&point));
        assert_eq!(params.decompress(&params.compress(&point)).ok(), Some(point));
    }
    let _ = params.decode_uncompressed(data);
});
