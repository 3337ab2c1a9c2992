//! SHAKE256 instantiation
//!
//! Every function is `SHAKE256(input, 8 * out.len())`:
//! `PRF`, `F`, `H` and `T` absorb `pk_seed ‖ ADRS ‖ data`, `PRF_msg` absorbs
//! `sk_prf ‖ opt_rand ‖ msg` and `H_msg` absorbs `r ‖ pk_seed ‖ pk_root ‖ msg`.

use super::TweakableHash;
use crate::address::Address;
use crate::params::{Params, MAX_N};
use crate::Result;
use digest::{ExtendableOutput, Update, XofReader};
use sha3::Shake256;

/// SHAKE256-based tweakable hash
#[derive(Clone)]
pub struct Shake {
    n: usize,
    pk_seed: [u8; MAX_N],
    seeded: Shake256,
}

impl Shake {
    fn squeeze(state: Shake256, out: &mut [u8]) {
        let mut reader = state.finalize_xof();
        reader.read(out);
    }

    fn keyed(&self, adrs: &Address) -> Shake256 {
        let mut state = self.seeded.clone();
        state.update(adrs.as_bytes());
        state
    }
}

impl TweakableHash for Shake {
    fn new(params: &Params, pk_seed: &[u8]) -> Self {
        let n = params.n;
        let mut seed = [0u8; MAX_N];
        seed[..n].copy_from_slice(&pk_seed[..n]);

        let mut seeded = Shake256::default();
        seeded.update(&seed[..n]);
        Self {
            n,
            pk_seed: seed,
            seeded,
        }
    }

    fn n(&self) -> usize {
        self.n
    }

    fn prf(&self, adrs: &Address, sk_seed: &[u8], out: &mut [u8]) {
        let mut state = self.keyed(adrs);
        state.update(sk_seed);
        Self::squeeze(state, out);
    }

    fn f(&self, adrs: &Address, block: &mut [u8]) {
        let mut state = self.keyed(adrs);
        state.update(block);
        Self::squeeze(state, block);
    }

    fn h(&self, adrs: &Address, left: &[u8], right: &[u8], out: &mut [u8]) {
        let mut state = self.keyed(adrs);
        state.update(left);
        state.update(right);
        Self::squeeze(state, out);
    }

    fn t(&self, adrs: &Address, blocks: &[u8], out: &mut [u8]) {
        let mut state = self.keyed(adrs);
        state.update(blocks);
        Self::squeeze(state, out);
    }

    fn prf_msg(&self, sk_prf: &[u8], opt_rand: &[u8], msg: &[u8], out: &mut [u8]) -> Result<()> {
        let mut state = Shake256::default();
        state.update(sk_prf);
        state.update(opt_rand);
        state.update(msg);
        Self::squeeze(state, out);
        Ok(())
    }

    fn h_msg(&self, r: &[u8], pk_root: &[u8], msg: &[u8], out: &mut [u8]) {
        let mut state = Shake256::default();
        state.update(r);
        state.update(&self.pk_seed[..self.n]);
        state.update(pk_root);
        state.update(msg);
        Self::squeeze(state, out);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::ParameterSet;

    #[test]
    fn test_f_matches_plain_shake() {
        let params = ParameterSet::Shake128f.params();
        let pk_seed = [7u8; 16];
        let hash = Shake::new(&params, &pk_seed);
        let adrs = Address::new();

        let mut block = [3u8; 16];
        hash.f(&adrs, &mut block);

        let mut expected = [0u8; 16];
        let mut state = Shake256::default();
        state.update(&pk_seed);
        state.update(adrs.as_bytes());
        state.update(&[3u8; 16]);
        state.finalize_xof().read(&mut expected);

        assert_eq!(block, expected);
    }

    #[test]
    fn test_address_separates_outputs() {
        let params = ParameterSet::Shake128f.params();
        let hash = Shake::new(&params, &[0u8; 16]);
        let mut a = Address::new();
        let mut b = Address::new();
        a.set_chain(1);
        b.set_chain(2);

        let (mut out_a, mut out_b) = ([0u8; 16], [0u8; 16]);
        hash.t(&a, &[1u8; 32], &mut out_a);
        hash.t(&b, &[1u8; 32], &mut out_b);
        assert_ne!(out_a, out_b);
    }
}
