//! Keys are shared across threads without synchronization

use cryypt_slhdsa::{HashFamily, Params, PrivateKey};
use std::sync::Arc;
use std::thread;

#[test]
fn test_parallel_sign_and_verify() {
    let params = Params::new(HashFamily::Sha2, 16, 6, 2, 3, 2).expect("toy parameters");
    let private = Arc::new(
        PrivateKey::from_seeds(params, &[1u8; 16], &[2u8; 16], &[3u8; 16]).expect("keygen"),
    );
    let public = Arc::new(private.public_key());
    let reference = private
        .sign_deterministic(b"thread 0", b"")
        .expect("sign");

    let handles: Vec<_> = (0..8)
        .map(|i| {
            let private = Arc::clone(&private);
            let public = Arc::clone(&public);
            thread::spawn(move || {
                let msg = format!("thread {i}");
                let sig = private
                    .sign_deterministic(msg.as_bytes(), b"")
                    .expect("sign");
                assert!(public.verify(msg.as_bytes(), b"", &sig));
                sig
            })
        })
        .collect();

    let signatures: Vec<Vec<u8>> = handles
        .into_iter()
        .map(|h| h.join().expect("worker thread"))
        .collect();
    assert_eq!(signatures[0], reference);
    for sig in &signatures[1..] {
        assert_ne!(sig, &reference);
    }
}
