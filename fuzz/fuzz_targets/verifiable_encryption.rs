#![no_main]

use libfuzzer_sys::fuzz_target;
use std::sync::OnceLock;

use digitalid_crypto::{Exponent, KeyPair, Parameters};
use num_bigint_dig::BigUint;
use rand::rngs::StdRng;
use rand::SeedableRng;

static KEYPAIR: OnceLock<KeyPair> = OnceLock::new();

fuzz_target!(|data: &[u8]| {
    if data.len() < 4 {
        return;
    }
    let key_pair = KEYPAIR.get_or_init(|| {
        KeyPair::generate_with(Parameters::testing(), &mut StdRng::from_seed([2; 32])).unwrap()
    });
    let public_key = key_pair.public_key();
    let private_key = key_pair.private_key();

    // Plaintexts up to 64 bits stay far below z
    let (m_bytes, r_bytes) = data.split_at(data.len().min(16) / 2);
    let m1 = Exponent::from(BigUint::from_bytes_be(m_bytes));
    let reversed: Vec<u8> = m_bytes.iter().rev().copied().collect();
    let m2 = Exponent::from(BigUint::from_bytes_be(&reversed));
    let r = Exponent::from(BigUint::from_bytes_be(r_bytes));

    let e1 = public_key.get_verifiable_encryption(&m1, &r).unwrap();
    assert_eq!(private_key.decrypt_verifiable_encryption(&e1).unwrap(), m1);

    let e2 = public_key.get_verifiable_encryption(&m2, &r).unwrap();
    let sum = e1.multiply(&e2).unwrap();
    assert_eq!(private_key.decrypt_verifiable_encryption(&sum).unwrap(), m1.add(&m2));
});
