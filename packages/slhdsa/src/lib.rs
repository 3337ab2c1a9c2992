//! Stateless hash-based digital signatures (SLH-DSA, FIPS 205)
//!
//! This crate implements SLH-DSA, the standardized form of SPHINCS+: a
//! signature scheme whose security rests only on the hash functions it is
//! built from. It is structured bottom-up as
//!
//! - [`address`]: 32-byte domain-separation tags for every hash call
//! - the tweakable hash functions for the SHAKE and SHA-2 families (internal)
//! - WOTS+ one-time signatures, the FORS few-time signature and the
//!   hypertree of XMSS layers (internal)
//! - [`PrivateKey`] / [`PublicKey`]: key generation, signing and verification
//!
//! # Parameter sets
//!
//! All twelve FIPS 205 sets are available through [`ParameterSet`]:
//! `SLH-DSA-{SHA2,SHAKE}-{128,192,256}{s,f}`. The `s` sets give smaller
//! signatures, the `f` sets faster signing.
//!
//! # API shape
//!
//! Signing and verification are CPU-bound and never block on I/O, so the
//! crate exposes plain synchronous functions and methods rather than async
//! builders. Callers that need to keep an executor responsive can move a
//! call onto a blocking thread; keys are `Send + Sync`.
//!
//! # Example
//!
//! ```
//! use cryypt_slhdsa::{generate_key, ParameterSet};
//!
//! let (public, private) = generate_key(&mut rand::rng(), ParameterSet::Shake128f)?;
//! let signature = private.sign_deterministic(b"hello", b"ctx")?;
//! assert!(public.verify(b"hello", b"ctx", &signature));
//! assert!(!public.verify(b"hello", b"other", &signature));
//! # Ok::<(), cryypt_slhdsa::SlhDsaError>(())
//! ```

pub mod address;
pub mod context;
mod error;
mod fors;
mod hash;
mod hypertree;
mod keys;
pub mod params;
mod scheme;
mod tree;
mod wots;

pub use self::error::{Result, SlhDsaError};
pub use self::keys::{PrivateKey, PublicKey};
pub use self::params::{HashFamily, ParameterSet, Params};

use rand_core::TryCryptoRng;

/// Generate a fresh key pair, drawing the three `n`-byte seeds from `rng`
/// (FIPS 205 Algorithm 21).
///
/// # Errors
///
/// Returns [`SlhDsaError::InvalidParameters`] for an inconsistent parameter
/// struct and [`SlhDsaError::RandomGenerationFailed`] if `rng` fails; no key
/// is produced from partial randomness.
pub fn generate_key<R: TryCryptoRng + ?Sized>(
    rng: &mut R,
    params: impl Into<Params>,
) -> Result<(PublicKey, PrivateKey)> {
    let params = params.into();
    scheme::check_params(&params)?;
    let n = params.n;
    tracing::debug!(
        "SLH-DSA: generating key pair (n={n}, h={}, d={}, signature {} bytes)",
        params.h,
        params.d,
        params.signature_size()
    );

    let sk_seed = keys::random_bytes(rng, n)?;
    let sk_prf = keys::random_bytes(rng, n)?;
    let pk_seed = keys::random_bytes(rng, n)?;

    let private = PrivateKey::from_seeds(params, &sk_seed[..n], &sk_prf[..n], &pk_seed[..n])?;
    Ok((private.public_key(), private))
}

/// Generate a fresh key pair from the thread-local CSPRNG.
///
/// # Errors
///
/// Returns [`SlhDsaError::RandomGenerationFailed`] if the system random
/// source fails.
pub fn generate(params: impl Into<Params>) -> Result<(PublicKey, PrivateKey)> {
    generate_key(&mut rand::rng(), params)
}

/// Prelude for SLH-DSA
pub mod prelude {
    pub use super::{generate, generate_key, ParameterSet, Params, PrivateKey, PublicKey};
}
