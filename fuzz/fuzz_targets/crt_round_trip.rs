#![no_main]

use libfuzzer_sys::fuzz_target;
use std::sync::OnceLock;

use digitalid_crypto::{Group, KeyPair, Parameters};
use num_bigint_dig::BigUint;
use rand::rngs::StdRng;
use rand::SeedableRng;

static KEYPAIR: OnceLock<KeyPair> = OnceLock::new();

fuzz_target!(|data: &[u8]| {
    let key_pair = KEYPAIR.get_or_init(|| {
        KeyPair::generate_with(Parameters::testing(), &mut StdRng::from_seed([1; 32])).unwrap()
    });
    let public_key = key_pair.public_key();

    // Reduce arbitrary input into the composite group
    let value = BigUint::from_bytes_be(data) % &**public_key.composite_group().modulus();
    let m = public_key.composite_group().element(value).unwrap();

    let c = public_key.pow_e(&m).unwrap();
    let decrypted = key_pair.private_key().pow_d(&c).unwrap();
    assert_eq!(decrypted, m, "CRT round trip mismatch for input {:?}", data);

    // CRT must agree with plain exponentiation
    let direct = c.pow(key_pair.private_key().d()).unwrap();
    assert_eq!(decrypted, direct);
});
