//! Property tests: any single-bit change to the signature or message is
//! rejected, and every message signs and verifies.

use cryypt_slhdsa::{HashFamily, Params, PrivateKey, PublicKey};
use proptest::prelude::*;
use std::sync::OnceLock;

const SIGNATURE_SIZE: usize = 4256;

struct Fixture {
    public: PublicKey,
    private: PrivateKey,
    message: Vec<u8>,
    signature: Vec<u8>,
}

fn fixture() -> &'static Fixture {
    static FIXTURE: OnceLock<Fixture> = OnceLock::new();
    FIXTURE.get_or_init(|| {
        // 80 index bits, so a tampered message never lands on the same leaves
        let params = Params::new(HashFamily::Shake, 16, 20, 5, 6, 10).expect("test parameters");
        let private =
            PrivateKey::from_seeds(params, &[0x11; 16], &[0x22; 16], &[0x33; 16]).expect("keygen");
        let message = b"property based tamper check".to_vec();
        let signature = private.sign_deterministic(&message, b"").expect("sign");
        assert_eq!(signature.len(), SIGNATURE_SIZE);
        Fixture {
            public: private.public_key(),
            private,
            message,
            signature,
        }
    })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(2048))]

    #[test]
    fn flipped_signature_bit_is_rejected(index in 0usize..SIGNATURE_SIZE, bit in 0u8..8) {
        let f = fixture();
        let mut sig = f.signature.clone();
        sig[index] ^= 1 << bit;
        prop_assert!(!f.public.verify(&f.message, b"", &sig));
    }

    #[test]
    fn flipped_message_bit_is_rejected(index in 0usize..27, bit in 0u8..8) {
        let f = fixture();
        let mut msg = f.message.clone();
        msg[index] ^= 1 << bit;
        prop_assert!(!f.public.verify(&msg, b"", &f.signature));
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn any_message_round_trips(msg in proptest::collection::vec(any::<u8>(), 0..256)) {
        let f = fixture();
        let sig = f.private.sign_deterministic(&msg, b"").expect("sign");
        prop_assert!(f.public.verify(&msg, b"", &sig));
    }
}
