//! FORS: forest of random subsets
//!
//! `k` Merkle trees of height `a`, each over `2^a` secret leaves. The message
//! digest selects one leaf per tree; the signature reveals those secrets with
//! their authentication paths, and the `k` roots compress into the value the
//! bottom hypertree layer signs.
//!
//! Addresses: secret leaves are keyed with `ForsPrf`, tree nodes with
//! `ForsTree` and the root compression with `ForsRoots`, all sharing the
//! key pair field of the hypertree leaf that signs this FORS instance. Leaf
//! and node indices are global across the forest: tree `j` starts at leaf
//! `j * 2^a`.

use crate::address::{Address, AddressType};
use crate::hash::TweakableHash;
use crate::params::{Params, MAX_N};
use crate::tree;
use crate::wots::base_2b;
use crate::{Result, SlhDsaError};

/// Split the digest `md` into `k` leaf indices of `a` bits each.
pub(crate) fn indices(params: &Params, md: &[u8], out: &mut [u32]) {
    base_2b(md, params.a as u32, &mut out[..params.k]);
}

fn secret_address(adrs: &Address) -> Address {
    let mut sk_adrs = *adrs;
    sk_adrs.set_type_and_clear(AddressType::ForsPrf);
    sk_adrs.set_key_pair(adrs.key_pair());
    sk_adrs
}

/// Secret value of the leaf at global index `index`
fn secret_leaf<H: TweakableHash>(
    hash: &H,
    sk_seed: &[u8],
    adrs: &Address,
    index: u32,
    out: &mut [u8],
) {
    let mut sk_adrs = secret_address(adrs);
    sk_adrs.set_tree_index(index);
    hash.prf(&sk_adrs, sk_seed, out);
}

fn tree_offset(params: &Params, j: usize) -> u32 {
    (j as u32) << params.a
}

/// Root of tree `j`, plus the authentication path of `leaf_index` if asked for
#[allow(clippy::too_many_arguments)]
fn tree_root<H: TweakableHash>(
    hash: &H,
    params: &Params,
    sk_seed: &[u8],
    adrs: &mut Address,
    j: usize,
    leaf_index: u32,
    auth: Option<&mut [u8]>,
    root: &mut [u8],
    arena: &mut Vec<u8>,
) -> Result<()> {
    let offset = tree_offset(params, j);
    let mut leaf_adrs = *adrs;
    let leaf = |i: u32, out: &mut [u8]| {
        secret_leaf(hash, sk_seed, &leaf_adrs, offset + i, out);
        leaf_adrs.set_tree_height(0);
        leaf_adrs.set_tree_index(offset + i);
        hash.f(&leaf_adrs, out);
    };
    tree::root_and_path(hash, adrs, params.a, offset, leaf_index, auth, root, arena, leaf)
}

/// Compress the `k` tree roots into the FORS public value.
fn compress_roots<H: TweakableHash>(hash: &H, adrs: &Address, roots: &[u8], pk: &mut [u8]) {
    let mut roots_adrs = *adrs;
    roots_adrs.set_type_and_clear(AddressType::ForsRoots);
    roots_adrs.set_key_pair(adrs.key_pair());
    hash.t(&roots_adrs, roots, pk);
}

/// Public value of the FORS instance addressed by `adrs` (a `ForsTree`
/// address with layer 0, tree and key pair set).
///
/// # Errors
///
/// Returns [`SlhDsaError::InvalidTree`] if `a` exceeds the index field.
pub(crate) fn pk_gen<H: TweakableHash>(
    hash: &H,
    params: &Params,
    sk_seed: &[u8],
    adrs: &mut Address,
    pk: &mut [u8],
    arena: &mut Vec<u8>,
) -> Result<()> {
    let n = params.n;
    let mut roots = vec![0u8; params.k * n];
    for (j, root) in roots.chunks_exact_mut(n).enumerate() {
        tree_root(hash, params, sk_seed, adrs, j, 0, None, root, arena)?;
    }
    compress_roots(hash, adrs, &roots, pk);
    Ok(())
}

/// Sign the digest `md`, writing `k * (a + 1) * n` bytes to `sig` and the
/// FORS public value the signature commits to into `pk`.
///
/// # Errors
///
/// Returns [`SlhDsaError::InvalidLength`] if `sig` has the wrong size and
/// [`SlhDsaError::InvalidTree`] if a tree index is out of range.
#[allow(clippy::too_many_arguments)]
pub(crate) fn sign<H: TweakableHash>(
    hash: &H,
    params: &Params,
    md: &[u8],
    sk_seed: &[u8],
    adrs: &mut Address,
    sig: &mut [u8],
    pk: &mut [u8],
    arena: &mut Vec<u8>,
) -> Result<()> {
    let n = params.n;
    if sig.len() != params.fors_sig_size() {
        return Err(SlhDsaError::invalid_length(
            "FORS signature",
            params.fors_sig_size(),
            sig.len(),
        ));
    }

    let mut idx = vec![0u32; params.k];
    indices(params, md, &mut idx);

    let mut roots = vec![0u8; params.k * n];
    let trees = sig.chunks_exact_mut((params.a + 1) * n).zip(roots.chunks_exact_mut(n));
    for (j, (segment, root)) in trees.enumerate() {
        let (secret, auth) = segment.split_at_mut(n);
        secret_leaf(hash, sk_seed, adrs, tree_offset(params, j) + idx[j], secret);
        tree_root(hash, params, sk_seed, adrs, j, idx[j], Some(auth), root, arena)?;
    }
    compress_roots(hash, adrs, &roots, pk);
    Ok(())
}

/// Recompute the FORS public value from a signature over `md`.
///
/// # Errors
///
/// Returns [`SlhDsaError::InvalidLength`] if `sig` has the wrong size and
/// [`SlhDsaError::InvalidTree`] if a tree index is out of range.
pub(crate) fn pk_from_sig<H: TweakableHash>(
    hash: &H,
    params: &Params,
    sig: &[u8],
    md: &[u8],
    adrs: &mut Address,
    pk: &mut [u8],
) -> Result<()> {
    let n = params.n;
    if sig.len() != params.fors_sig_size() {
        return Err(SlhDsaError::invalid_length(
            "FORS signature",
            params.fors_sig_size(),
            sig.len(),
        ));
    }

    let mut idx = vec![0u32; params.k];
    indices(params, md, &mut idx);

    let mut roots = vec![0u8; params.k * n];
    let mut leaf = [0u8; MAX_N];
    let trees = sig.chunks_exact((params.a + 1) * n).zip(roots.chunks_exact_mut(n));
    for (j, (segment, root)) in trees.enumerate() {
        let offset = tree_offset(params, j);
        let (secret, auth) = segment.split_at(n);

        adrs.set_tree_height(0);
        adrs.set_tree_index(offset + idx[j]);
        leaf[..n].copy_from_slice(secret);
        hash.f(adrs, &mut leaf[..n]);

        tree::root_from_path(hash, adrs, params.a, offset, idx[j], &leaf[..n], auth, root)?;
    }
    compress_roots(hash, adrs, &roots, pk);
    Ok(())
}
