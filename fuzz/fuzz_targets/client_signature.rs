#![no_main]

use libfuzzer_sys::fuzz_target;
use std::sync::{Arc, OnceLock};
use std::time::{Duration, UNIX_EPOCH};

use digitalid_crypto::{ClientSignature, Error, Exponent, KeyPair, Parameters, SecretCommitment};
use rand::rngs::StdRng;
use rand::SeedableRng;

static COMMITMENT: OnceLock<SecretCommitment> = OnceLock::new();

fuzz_target!(|data: &[u8]| {
    if data.is_empty() {
        return;
    }
    let secret = COMMITMENT.get_or_init(|| {
        let mut rng = StdRng::from_seed([3; 32]);
        let key_pair = KeyPair::generate_with(Parameters::testing(), &mut rng).unwrap();
        let public_key = Arc::new(key_pair.public_key().clone());
        SecretCommitment::new(public_key, Exponent::from(7u64)).unwrap()
    });

    let mut rng = StdRng::from_seed([data[0]; 32]);
    let time = UNIX_EPOCH + Duration::from_secs(1_700_000_000);
    let object = data.to_vec();
    let parameters = Parameters::testing();
    let signature =
        ClientSignature::sign(secret, time, "fuzz@example.test", object, &parameters, &mut rng)
            .unwrap();
    assert_eq!(signature.verify_at(time), Ok(()));

    // Any change to the signed bytes must invalidate the signature
    let mut tampered = data.to_vec();
    tampered[data.len() - 1] ^= 1;
    let forged = ClientSignature::from_parts(
        signature.time(),
        signature.subject(),
        tampered,
        signature.commitment().clone(),
        signature.t().clone(),
        signature.s().clone(),
    );
    assert_eq!(forged.verify_at(time), Err(Error::InvalidClientSignature));
});
