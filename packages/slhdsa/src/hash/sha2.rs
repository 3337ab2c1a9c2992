//! SHA-2 instantiation
//!
//! `PRF` and `F` always use SHA-256. `H`, `T`, `H_msg` and `PRF_msg` use
//! SHA-256 at category 1 ([`Sha2Cat1`]) and SHA-512 at categories 3 and 5
//! ([`Sha2Cat35`]). Tree hashes absorb `pk_seed` padded with zeros to one
//! full block, then the 22-byte compressed address, then the data, and keep
//! the first `n` bytes of the digest.

use super::TweakableHash;
use crate::address::Address;
use crate::params::{Params, MAX_N};
use crate::{Result, SlhDsaError};
use digest::Digest;
use sha2::{Sha256, Sha512};

const ZEROS: [u8; 128] = [0u8; 128];

/// Digest backing `H`, `T` and the message functions
pub trait WideDigest: Digest + Clone {
    /// Input block size in bytes
    const BLOCK_SIZE: usize;

    /// `HMAC(key, parts[0] ‖ parts[1] ‖ ...)` truncated to `out.len()`
    ///
    /// # Errors
    ///
    /// Returns [`SlhDsaError::Hash`] if the MAC cannot be keyed.
    fn hmac(key: &[u8], parts: &[&[u8]], out: &mut [u8]) -> Result<()>;
}

impl WideDigest for Sha256 {
    const BLOCK_SIZE: usize = 64;

    fn hmac(key: &[u8], parts: &[&[u8]], out: &mut [u8]) -> Result<()> {
        use hmac::{Hmac, Mac};

        let mut mac = <Hmac<Sha256> as Mac>::new_from_slice(key)
            .map_err(|e| SlhDsaError::hash(format!("HMAC-SHA256 key error: {e}")))?;
        for part in parts {
            Mac::update(&mut mac, part);
        }
        let tag = mac.finalize().into_bytes();
        out.copy_from_slice(&tag[..out.len()]);
        Ok(())
    }
}

impl WideDigest for Sha512 {
    const BLOCK_SIZE: usize = 128;

    fn hmac(key: &[u8], parts: &[&[u8]], out: &mut [u8]) -> Result<()> {
        use hmac::{Hmac, Mac};

        let mut mac = <Hmac<Sha512> as Mac>::new_from_slice(key)
            .map_err(|e| SlhDsaError::hash(format!("HMAC-SHA512 key error: {e}")))?;
        for part in parts {
            Mac::update(&mut mac, part);
        }
        let tag = mac.finalize().into_bytes();
        out.copy_from_slice(&tag[..out.len()]);
        Ok(())
    }
}

/// SHA-2 tweakable hash, generic over the wide digest
#[derive(Clone)]
pub struct Sha2Hash<D: WideDigest> {
    n: usize,
    pk_seed: [u8; MAX_N],
    seeded_narrow: Sha256,
    seeded_wide: D,
}

/// Category 1 (`n = 16`): SHA-256 everywhere
pub type Sha2Cat1 = Sha2Hash<Sha256>;

/// Categories 3 and 5 (`n = 24, 32`): SHA-512 for `H`, `T` and messages
pub type Sha2Cat35 = Sha2Hash<Sha512>;

impl<D: WideDigest> Sha2Hash<D> {
    fn truncate<T: Digest>(state: T, out: &mut [u8]) {
        let digest = state.finalize();
        out.copy_from_slice(&digest[..out.len()]);
    }

    /// MGF1 over `D` with `seed = parts[0] ‖ parts[1] ‖ ...`
    fn mgf1(parts: &[&[u8]], out: &mut [u8]) {
        let width = <D as Digest>::output_size();
        for (counter, chunk) in out.chunks_mut(width).enumerate() {
            let mut state = D::new();
            for part in parts {
                Digest::update(&mut state, part);
            }
            Digest::update(&mut state, (counter as u32).to_be_bytes());
            let block = state.finalize();
            chunk.copy_from_slice(&block[..chunk.len()]);
        }
    }
}

impl<D: WideDigest> TweakableHash for Sha2Hash<D> {
    fn new(params: &Params, pk_seed: &[u8]) -> Self {
        let n = params.n;
        let mut seed = [0u8; MAX_N];
        seed[..n].copy_from_slice(&pk_seed[..n]);

        let mut seeded_narrow = Sha256::new();
        Digest::update(&mut seeded_narrow, &seed[..n]);
        Digest::update(&mut seeded_narrow, &ZEROS[..64 - n]);

        let mut seeded_wide = D::new();
        Digest::update(&mut seeded_wide, &seed[..n]);
        Digest::update(&mut seeded_wide, &ZEROS[..D::BLOCK_SIZE - n]);

        Self {
            n,
            pk_seed: seed,
            seeded_narrow,
            seeded_wide,
        }
    }

    fn n(&self) -> usize {
        self.n
    }

    fn prf(&self, adrs: &Address, sk_seed: &[u8], out: &mut [u8]) {
        let mut state = self.seeded_narrow.clone();
        Digest::update(&mut state, adrs.compressed());
        Digest::update(&mut state, sk_seed);
        Self::truncate(state, out);
    }

    fn f(&self, adrs: &Address, block: &mut [u8]) {
        let mut state = self.seeded_narrow.clone();
        Digest::update(&mut state, adrs.compressed());
        Digest::update(&mut state, &*block);
        Self::truncate(state, block);
    }

    fn h(&self, adrs: &Address, left: &[u8], right: &[u8], out: &mut [u8]) {
        let mut state = self.seeded_wide.clone();
        Digest::update(&mut state, adrs.compressed());
        Digest::update(&mut state, left);
        Digest::update(&mut state, right);
        Self::truncate(state, out);
    }

    fn t(&self, adrs: &Address, blocks: &[u8], out: &mut [u8]) {
        let mut state = self.seeded_wide.clone();
        Digest::update(&mut state, adrs.compressed());
        Digest::update(&mut state, blocks);
        Self::truncate(state, out);
    }

    fn prf_msg(&self, sk_prf: &[u8], opt_rand: &[u8], msg: &[u8], out: &mut [u8]) -> Result<()> {
        D::hmac(sk_prf, &[opt_rand, msg], out)
    }

    fn h_msg(&self, r: &[u8], pk_root: &[u8], msg: &[u8], out: &mut [u8]) {
        let pk_seed = &self.pk_seed[..self.n];
        let mut state = D::new();
        Digest::update(&mut state, r);
        Digest::update(&mut state, pk_seed);
        Digest::update(&mut state, pk_root);
        Digest::update(&mut state, msg);
        let inner = state.finalize();
        Self::mgf1(&[r, pk_seed, inner.as_slice()], out);
    }
}
