//! Internal key generation, signing and verification (FIPS 205 §9)
//!
//! These functions take already-prepared messages: context framing happens
//! in [`crate::context`] and the key types in [`crate::keys`] call in here.
//! Each entry point picks the hash back end once from the parameter set and
//! runs a monomorphized copy of the algorithm.

use crate::address::{Address, AddressType};
use crate::hash::{with_hash, TweakableHash};
use crate::params::{Params, MAX_M, MAX_N};
use crate::{fors, hypertree, Result, SlhDsaError};

/// Where the signature lands in the hypertree, read from the message digest
struct DigestSplit<'a> {
    md: &'a [u8],
    idx_tree: u64,
    idx_leaf: u32,
}

fn to_int(bytes: &[u8]) -> u64 {
    bytes.iter().fold(0u64, |acc, &b| (acc << 8) | u64::from(b))
}

fn low_bits(value: u64, bits: usize) -> u64 {
    if bits >= 64 {
        value
    } else {
        value & ((1u64 << bits) - 1)
    }
}

fn split_digest<'a>(params: &Params, digest: &'a [u8]) -> DigestSplit<'a> {
    let (md, rest) = digest.split_at(params.md_size());
    let (tree_bytes, rest) = rest.split_at(params.tree_index_size());
    let leaf_bytes = &rest[..params.leaf_index_size()];
    DigestSplit {
        md,
        idx_tree: low_bits(to_int(tree_bytes), params.h - params.hp),
        idx_leaf: low_bits(to_int(leaf_bytes), params.hp) as u32,
    }
}

/// `ForsTree` address of the FORS instance under hypertree leaf `idx_leaf`
fn fors_address(idx_tree: u64, idx_leaf: u32) -> Address {
    let mut adrs = Address::new();
    adrs.set_tree(idx_tree);
    adrs.set_type_and_clear(AddressType::ForsTree);
    adrs.set_key_pair(idx_leaf);
    adrs
}

fn arena_for(params: &Params) -> Vec<u8> {
    let widest = params.a.max(params.hp);
    Vec::with_capacity((1usize << widest) * params.n)
}

/// Reject hand-assembled parameter structs whose derived fields disagree
/// with what [`Params::new`] computes.
pub(crate) fn check_params(params: &Params) -> Result<()> {
    let derived = Params::new(params.family, params.n, params.h, params.d, params.a, params.k)?;
    if derived != *params {
        return Err(SlhDsaError::invalid_parameters(
            "derived sizes do not match the base parameters",
        ));
    }
    Ok(())
}

fn check_len(what: &'static str, expected: usize, bytes: &[u8]) -> Result<()> {
    if bytes.len() != expected {
        return Err(SlhDsaError::invalid_length(what, expected, bytes.len()));
    }
    Ok(())
}

fn keygen_with<H: TweakableHash>(
    params: &Params,
    sk_seed: &[u8],
    pk_seed: &[u8],
    root: &mut [u8],
) -> Result<()> {
    let hash = H::new(params, pk_seed);
    let mut arena = arena_for(params);
    hypertree::layer_root(&hash, params, sk_seed, (params.d - 1) as u32, 0, root, &mut arena)
}

/// Compute the public root for the given seeds (FIPS 205 Algorithm 18).
///
/// # Errors
///
/// Returns [`SlhDsaError::InvalidLength`] if a seed is not `n` bytes.
pub(crate) fn keygen_internal(
    params: &Params,
    sk_seed: &[u8],
    sk_prf: &[u8],
    pk_seed: &[u8],
) -> Result<[u8; MAX_N]> {
    check_params(params)?;
    check_len("secret seed", params.n, sk_seed)?;
    check_len("PRF key", params.n, sk_prf)?;
    check_len("public seed", params.n, pk_seed)?;

    let mut root = [0u8; MAX_N];
    with_hash!(params, keygen_with(params, sk_seed, pk_seed, &mut root[..params.n]))?;
    Ok(root)
}

/// Seeds and root of a private key, borrowed for one signing call
pub(crate) struct SigningKey<'a> {
    pub sk_seed: &'a [u8],
    pub sk_prf: &'a [u8],
    pub pk_seed: &'a [u8],
    pub pk_root: &'a [u8],
}

fn sign_with<H: TweakableHash>(
    params: &Params,
    key: &SigningKey<'_>,
    msg: &[u8],
    add_rand: &[u8],
    sig: &mut [u8],
) -> Result<()> {
    let n = params.n;
    let hash = H::new(params, key.pk_seed);
    let (r, rest) = sig.split_at_mut(n);
    let (fors_sig, ht_sig) = rest.split_at_mut(params.fors_sig_size());

    hash.prf_msg(key.sk_prf, add_rand, msg, r)?;

    let mut digest = [0u8; MAX_M];
    hash.h_msg(r, key.pk_root, msg, &mut digest[..params.m]);
    let split = split_digest(params, &digest[..params.m]);

    let mut arena = arena_for(params);
    let mut adrs = fors_address(split.idx_tree, split.idx_leaf);
    let mut fors_pk = [0u8; MAX_N];
    fors::sign(
        &hash,
        params,
        split.md,
        key.sk_seed,
        &mut adrs,
        fors_sig,
        &mut fors_pk[..n],
        &mut arena,
    )?;

    hypertree::sign(
        &hash,
        params,
        &fors_pk[..n],
        key.sk_seed,
        split.idx_tree,
        split.idx_leaf,
        ht_sig,
        &mut arena,
    )
}

/// Sign a prepared message with the randomizer input `add_rand`
/// (FIPS 205 Algorithm 19). The output is `R ‖ SIG_FORS ‖ SIG_HT`.
///
/// # Errors
///
/// Returns [`SlhDsaError::InvalidLength`] if `add_rand` or a key part is not
/// `n` bytes, and [`SlhDsaError::Hash`] if the message PRF cannot be keyed.
pub(crate) fn sign_internal(
    params: &Params,
    key: &SigningKey<'_>,
    msg: &[u8],
    add_rand: &[u8],
) -> Result<Vec<u8>> {
    check_params(params)?;
    check_len("randomizer", params.n, add_rand)?;
    check_len("secret seed", params.n, key.sk_seed)?;
    check_len("PRF key", params.n, key.sk_prf)?;
    check_len("public seed", params.n, key.pk_seed)?;
    check_len("public root", params.n, key.pk_root)?;

    let mut sig = vec![0u8; params.signature_size()];
    with_hash!(params, sign_with(params, key, msg, add_rand, &mut sig))?;
    Ok(sig)
}

fn verify_with<H: TweakableHash>(
    params: &Params,
    pk_seed: &[u8],
    pk_root: &[u8],
    msg: &[u8],
    sig: &[u8],
) -> Result<bool> {
    let n = params.n;
    let hash = H::new(params, pk_seed);
    let (r, rest) = sig.split_at(n);
    let (fors_sig, ht_sig) = rest.split_at(params.fors_sig_size());

    let mut digest = [0u8; MAX_M];
    hash.h_msg(r, pk_root, msg, &mut digest[..params.m]);
    let split = split_digest(params, &digest[..params.m]);

    let mut adrs = fors_address(split.idx_tree, split.idx_leaf);
    let mut fors_pk = [0u8; MAX_N];
    fors::pk_from_sig(&hash, params, fors_sig, split.md, &mut adrs, &mut fors_pk[..n])?;

    hypertree::verify(
        &hash,
        params,
        &fors_pk[..n],
        ht_sig,
        split.idx_tree,
        split.idx_leaf,
        pk_root,
    )
}

/// Check a signature over a prepared message (FIPS 205 Algorithm 20).
///
/// Every failure, including a malformed signature length, is `false`.
pub(crate) fn verify_internal(
    params: &Params,
    pk_seed: &[u8],
    pk_root: &[u8],
    msg: &[u8],
    sig: &[u8],
) -> bool {
    if check_params(params).is_err()
        || sig.len() != params.signature_size()
        || pk_seed.len() != params.n
        || pk_root.len() != params.n
    {
        return false;
    }
    matches!(
        with_hash!(params, verify_with(params, pk_seed, pk_root, msg, sig)),
        Ok(true)
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::{HashFamily, ParameterSet};

    #[test]
    fn test_digest_split_masks_indices() {
        let params = Params::new(HashFamily::Shake, 16, 6, 2, 3, 2).expect("valid");
        assert_eq!(params.m, 3);
        let digest = [0xab, 0xff, 0xff];
        let split = split_digest(&params, &digest);
        assert_eq!(split.md, &[0xabu8]);
        assert_eq!(split.idx_tree, 0b111);
        assert_eq!(split.idx_leaf, 0b111);
    }

    #[test]
    fn test_digest_split_wide_tree_index() {
        let params = ParameterSet::Sha2_128f.params();
        // h - hp = 63 bits in 8 bytes
        let mut digest = [0u8; 34];
        digest[params.md_size()..params.md_size() + 8].fill(0xff);
        digest[33] = 0x05;
        let split = split_digest(&params, &digest);
        assert_eq!(split.idx_tree, u64::MAX >> 1);
        assert_eq!(split.idx_leaf, 0x05 & 0b111);
    }

    #[test]
    fn test_low_bits_full_width() {
        assert_eq!(low_bits(u64::MAX, 64), u64::MAX);
        assert_eq!(low_bits(0x1ff, 8), 0xff);
    }

    #[test]
    fn test_wrong_randomizer_length_is_rejected() {
        let params = ParameterSet::Shake128f.params();
        let seed = [0u8; 16];
        let key = SigningKey {
            sk_seed: &seed,
            sk_prf: &seed,
            pk_seed: &seed,
            pk_root: &seed,
        };
        let err = sign_internal(&params, &key, b"msg", &[0u8; 15]);
        assert_eq!(err, Err(SlhDsaError::invalid_length("randomizer", 16, 15)));
    }

    #[test]
    fn test_inconsistent_params_are_rejected() {
        let mut params = ParameterSet::Shake128f.params();
        params.m = 200;
        let seed = [0u8; 16];
        assert!(matches!(
            keygen_internal(&params, &seed, &seed, &seed),
            Err(SlhDsaError::InvalidParameters(_))
        ));
        let sig = vec![0u8; params.signature_size()];
        assert!(!verify_internal(&params, &seed, &seed, b"msg", &sig));
    }

    #[test]
    fn test_wrong_signature_length_is_false() {
        let params = ParameterSet::Shake128f.params();
        let seed = [0u8; 16];
        assert!(!verify_internal(&params, &seed, &seed, b"msg", &[0u8; 100]));
    }
}
