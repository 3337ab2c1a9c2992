//! WOTS+ one-time signatures
//!
//! An `n`-byte message is split into `len1 = 2n` base-16 digits followed by
//! `len2 = 3` checksum digits. Chain `i` starts at `PRF(sk_seed, adrs_i)`;
//! signing walks it `digit_i` steps and verification completes the remaining
//! `w - 1 - digit_i`, so any decrease of a message digit must be paid for by
//! an increase of a checksum digit.

use crate::address::{Address, AddressType};
use crate::hash::TweakableHash;
use crate::params::{LEN2, LG_W, MAX_N, MAX_WOTS_LEN, W};

/// Left shift that aligns the checksum to whole bytes: `(8 - len2*lg_w % 8) % 8`
const CSUM_SHIFT: u32 = (8 - (LEN2 as u32 * LG_W) % 8) % 8;

/// Bytes needed to hold the shifted checksum
const CSUM_BYTES: usize = (LEN2 * LG_W as usize).div_ceil(8);

/// Split `x` into `out.len()` big-endian integers of `b` bits each.
///
/// `x` must hold at least `ceil(out.len() * b / 8)` bytes.
pub(crate) fn base_2b(x: &[u8], b: u32, out: &mut [u32]) {
    let mask = (1u64 << b) - 1;
    let mut bytes = x.iter();
    let mut bits = 0u32;
    let mut total = 0u64;
    for digit in out.iter_mut() {
        while bits < b {
            let byte = bytes.next().copied().unwrap_or(0);
            total = (total << 8) | u64::from(byte);
            bits += 8;
        }
        bits -= b;
        *digit = ((total >> bits) & mask) as u32;
        total &= (1u64 << bits) - 1;
    }
}

/// Message digits followed by checksum digits, `len` in total
fn digits(len1: usize, msg: &[u8], out: &mut [u32; MAX_WOTS_LEN]) {
    base_2b(msg, LG_W, &mut out[..len1]);

    let mut csum: u32 = out[..len1].iter().map(|d| W - 1 - d).sum();
    csum <<= CSUM_SHIFT;
    let bytes = csum.to_be_bytes();
    base_2b(&bytes[4 - CSUM_BYTES..], LG_W, &mut out[len1..len1 + LEN2]);
}

/// Apply `F` `steps` times to `block`, starting at chain position `start`.
pub(crate) fn chain<H: TweakableHash>(
    hash: &H,
    adrs: &mut Address,
    block: &mut [u8],
    start: u32,
    steps: u32,
) {
    for j in start..start + steps {
        adrs.set_hash(j);
        hash.f(adrs, block);
    }
}

/// Address keying the secret chain starts of `adrs`'s key pair
fn secret_address(adrs: &Address) -> Address {
    let mut sk_adrs = *adrs;
    sk_adrs.set_type_and_clear(AddressType::WotsPrf);
    sk_adrs.set_key_pair(adrs.key_pair());
    sk_adrs
}

/// Compress the `len` chain tops into the one-time public key
fn compress<H: TweakableHash>(hash: &H, adrs: &Address, tops: &[u8], pk: &mut [u8]) {
    let mut pk_adrs = *adrs;
    pk_adrs.set_type_and_clear(AddressType::WotsPk);
    pk_adrs.set_key_pair(adrs.key_pair());
    hash.t(&pk_adrs, tops, pk);
}

/// Generate the WOTS+ public key of the key pair addressed by `adrs`.
///
/// `adrs` must be a `WotsHash` address with layer, tree and key pair set.
pub(crate) fn pk_gen<H: TweakableHash>(
    hash: &H,
    len: usize,
    sk_seed: &[u8],
    adrs: &mut Address,
    pk: &mut [u8],
) {
    let n = hash.n();
    let mut sk_adrs = secret_address(adrs);
    let mut tops = [0u8; MAX_WOTS_LEN * MAX_N];

    for (i, top) in tops[..len * n].chunks_exact_mut(n).enumerate() {
        sk_adrs.set_chain(i as u32);
        hash.prf(&sk_adrs, sk_seed, top);
        adrs.set_chain(i as u32);
        chain(hash, adrs, top, 0, W - 1);
    }
    compress(hash, adrs, &tops[..len * n], pk);
}

/// Sign the `n`-byte `msg`, writing `len * n` bytes to `sig`.
pub(crate) fn sign<H: TweakableHash>(
    hash: &H,
    len: usize,
    msg: &[u8],
    sk_seed: &[u8],
    adrs: &mut Address,
    sig: &mut [u8],
) {
    let n = hash.n();
    let mut digit = [0u32; MAX_WOTS_LEN];
    digits(len - LEN2, msg, &mut digit);

    let mut sk_adrs = secret_address(adrs);
    for (i, block) in sig[..len * n].chunks_exact_mut(n).enumerate() {
        sk_adrs.set_chain(i as u32);
        hash.prf(&sk_adrs, sk_seed, block);
        adrs.set_chain(i as u32);
        chain(hash, adrs, block, 0, digit[i]);
    }
}

/// Recover the public key a signature `sig` over `msg` commits to.
pub(crate) fn pk_from_sig<H: TweakableHash>(
    hash: &H,
    len: usize,
    sig: &[u8],
    msg: &[u8],
    adrs: &mut Address,
    pk: &mut [u8],
) {
    let n = hash.n();
    let mut digit = [0u32; MAX_WOTS_LEN];
    digits(len - LEN2, msg, &mut digit);

    let mut tops = [0u8; MAX_WOTS_LEN * MAX_N];
    let chunks = tops[..len * n]
        .chunks_exact_mut(n)
        .zip(sig[..len * n].chunks_exact(n));
    for (i, (top, block)) in chunks.enumerate() {
        top.copy_from_slice(block);
        adrs.set_chain(i as u32);
        chain(hash, adrs, top, digit[i], W - 1 - digit[i]);
    }
    compress(hash, adrs, &tops[..len * n], pk);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hash::{Sha2Cat35, Shake};
    use crate::params::ParameterSet;

    fn leaf_address() -> Address {
        let mut adrs = Address::new();
        adrs.set_layer(1);
        adrs.set_tree(7);
        adrs.set_type_and_clear(AddressType::WotsHash);
        adrs.set_key_pair(3);
        adrs
    }

    #[test]
    fn test_base_2b() {
        let mut out = [0u32; 4];
        base_2b(&[0x12, 0x34], 4, &mut out);
        assert_eq!(out, [1, 2, 3, 4]);

        let mut out = [0u32; 2];
        base_2b(&[0xab, 0xcd, 0xef], 12, &mut out);
        assert_eq!(out, [0xabc, 0xdef]);

        let mut out = [0u32; 3];
        base_2b(&[0b1010_1100, 0b0111_0000], 3, &mut out);
        assert_eq!(out, [0b101, 0b011, 0b000]);
    }

    #[test]
    fn test_checksum_digits() {
        let mut digit = [0u32; MAX_WOTS_LEN];
        digits(32, &[0u8; 16], &mut digit);
        // 32 * 15 = 480, shifted by 4 = 0x1e00
        assert_eq!(&digit[32..35], &[1, 14, 0]);

        digits(32, &[0xff; 16], &mut digit);
        assert_eq!(&digit[32..35], &[0, 0, 0]);
    }

    #[test]
    fn test_signature_recovers_public_key() {
        let params = ParameterSet::Shake128s.params();
        let hash = Shake::new(&params, &[5u8; 16]);
        let sk_seed = [9u8; 16];
        let msg = [0x3cu8; 16];

        let mut pk = [0u8; 16];
        pk_gen(&hash, params.len, &sk_seed, &mut leaf_address(), &mut pk);

        let mut sig = vec![0u8; params.wots_sig_size()];
        sign(&hash, params.len, &msg, &sk_seed, &mut leaf_address(), &mut sig);

        let mut recovered = [0u8; 16];
        pk_from_sig(&hash, params.len, &sig, &msg, &mut leaf_address(), &mut recovered);
        assert_eq!(recovered, pk);

        let mut other = msg;
        other[0] ^= 1;
        pk_from_sig(&hash, params.len, &sig, &other, &mut leaf_address(), &mut recovered);
        assert_ne!(recovered, pk);
    }

    #[test]
    fn test_signature_recovers_public_key_sha2_wide() {
        let params = ParameterSet::Sha2_256f.params();
        let hash = Sha2Cat35::new(&params, &[1u8; 32]);
        let sk_seed = [2u8; 32];
        let msg = [0xa5u8; 32];

        let mut pk = [0u8; 32];
        pk_gen(&hash, params.len, &sk_seed, &mut leaf_address(), &mut pk);

        let mut sig = vec![0u8; params.wots_sig_size()];
        sign(&hash, params.len, &msg, &sk_seed, &mut leaf_address(), &mut sig);

        let mut recovered = [0u8; 32];
        pk_from_sig(&hash, params.len, &sig, &msg, &mut leaf_address(), &mut recovered);
        assert_eq!(recovered, pk);
    }

    proptest::proptest! {
        #![proptest_config(proptest::prelude::ProptestConfig::with_cases(64))]

        #[test]
        fn test_signature_recovers_public_key_for_random_inputs(
            sk_seed in proptest::array::uniform16(proptest::prelude::any::<u8>()),
            pk_seed in proptest::array::uniform16(proptest::prelude::any::<u8>()),
            msg in proptest::array::uniform16(proptest::prelude::any::<u8>()),
        ) {
            let params = ParameterSet::Shake128f.params();
            let hash = Shake::new(&params, &pk_seed);

            let mut pk = [0u8; 16];
            pk_gen(&hash, params.len, &sk_seed, &mut leaf_address(), &mut pk);

            let mut sig = vec![0u8; params.wots_sig_size()];
            sign(&hash, params.len, &msg, &sk_seed, &mut leaf_address(), &mut sig);

            let mut recovered = [0u8; 16];
            pk_from_sig(&hash, params.len, &sig, &msg, &mut leaf_address(), &mut recovered);
            proptest::prop_assert_eq!(recovered, pk);
        }
    }

    #[test]
    fn test_zero_digit_reveals_chain_start() {
        let params = ParameterSet::Shake128f.params();
        let hash = Shake::new(&params, &[0u8; 16]);
        let sk_seed = [4u8; 16];

        let mut sig = vec![0u8; params.wots_sig_size()];
        sign(&hash, params.len, &[0u8; 16], &sk_seed, &mut leaf_address(), &mut sig);

        let mut sk_adrs = secret_address(&leaf_address());
        sk_adrs.set_chain(0);
        let mut start = [0u8; 16];
        hash.prf(&sk_adrs, &sk_seed, &mut start);
        assert_eq!(&sig[..16], &start);
    }
}
