//! Tweakable hash functions
//!
//! The core consumes hashing only through [`TweakableHash`]. An instance is
//! built once per key generation, signing or verification call from the
//! public seed; every invocation clones the pre-seeded digest state, so no
//! mutable hash state is ever shared between calls or threads.

mod sha2;
mod shake;

pub(crate) use self::sha2::{Sha2Cat1, Sha2Cat35};
pub(crate) use self::shake::Shake;

use crate::address::Address;
use crate::params::Params;
use crate::Result;

/// Hash capability consumed by WOTS+, FORS and the hypertree
pub(crate) trait TweakableHash {
    /// Bind a new instance to `pk_seed` for the given parameter set.
    ///
    /// Callers pass validated parameters and an `n`-byte seed; output
    /// buffers handed to the other methods are exactly `n` bytes.
    fn new(params: &Params, pk_seed: &[u8]) -> Self;

    /// Security parameter `n`
    fn n(&self) -> usize;

    /// `PRF(pk_seed, sk_seed, adrs)`: secret chain starts and FORS leaves
    fn prf(&self, adrs: &Address, sk_seed: &[u8], out: &mut [u8]);

    /// `F(pk_seed, adrs, m)` computed in place over the `n`-byte block
    fn f(&self, adrs: &Address, block: &mut [u8]);

    /// `H(pk_seed, adrs, left ‖ right)`
    fn h(&self, adrs: &Address, left: &[u8], right: &[u8], out: &mut [u8]);

    /// `T_l(pk_seed, adrs, blocks)` over `l` concatenated `n`-byte blocks
    fn t(&self, adrs: &Address, blocks: &[u8], out: &mut [u8]);

    /// `PRF_msg(sk_prf, opt_rand, msg)`: the per-message randomizer
    ///
    /// # Errors
    ///
    /// Returns [`crate::SlhDsaError::Hash`] if the keyed hash rejects `sk_prf`.
    fn prf_msg(&self, sk_prf: &[u8], opt_rand: &[u8], msg: &[u8], out: &mut [u8]) -> Result<()>;

    /// `H_msg(r, pk_seed, pk_root, msg)` filling all of `out` (`m` bytes)
    fn h_msg(&self, r: &[u8], pk_root: &[u8], msg: &[u8], out: &mut [u8]);
}

/// Run a generic function monomorphized for the hash back end that
/// `$params` selects.
macro_rules! with_hash {
    ($params:expr, $func:ident($($arg:expr),* $(,)?)) => {
        match ($params.family, $params.uses_sha512()) {
            ($crate::params::HashFamily::Shake, _) => {
                $func::<$crate::hash::Shake>($($arg),*)
            }
            ($crate::params::HashFamily::Sha2, false) => {
                $func::<$crate::hash::Sha2Cat1>($($arg),*)
            }
            ($crate::params::HashFamily::Sha2, true) => {
                $func::<$crate::hash::Sha2Cat35>($($arg),*)
            }
        }
    };
}

pub(crate) use with_hash;
