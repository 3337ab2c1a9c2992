//! Hypertree: `d` layers of XMSS trees of height `hp`
//!
//! Layer 0 signs the FORS public value; every higher layer signs the root of
//! the tree below it. The root of the single tree on layer `d - 1` is the
//! long-term public key.

use crate::address::{Address, AddressType};
use crate::hash::TweakableHash;
use crate::params::{Params, MAX_N};
use crate::{tree, wots, Result, SlhDsaError};
use subtle::ConstantTimeEq;

fn tree_address(layer: u32, tree: u64) -> Address {
    let mut adrs = Address::new();
    adrs.set_layer(layer);
    adrs.set_tree(tree);
    adrs
}

/// Root of the tree addressed by `adrs` (layer and tree set), with the
/// authentication path of `leaf_index` if asked for
#[allow(clippy::too_many_arguments)]
fn xmss_root<H: TweakableHash>(
    hash: &H,
    params: &Params,
    sk_seed: &[u8],
    adrs: &mut Address,
    leaf_index: u32,
    auth: Option<&mut [u8]>,
    root: &mut [u8],
    arena: &mut Vec<u8>,
) -> Result<()> {
    let mut wots_adrs = *adrs;
    wots_adrs.set_type_and_clear(AddressType::WotsHash);
    let leaf = |i: u32, out: &mut [u8]| {
        wots_adrs.set_key_pair(i);
        wots::pk_gen(hash, params.len, sk_seed, &mut wots_adrs, out);
    };

    adrs.set_type_and_clear(AddressType::Tree);
    tree::root_and_path(hash, adrs, params.hp, 0, leaf_index, auth, root, arena, leaf)
}

/// Root of tree `tree` on hypertree layer `layer`.
///
/// # Errors
///
/// Returns [`SlhDsaError::InvalidTree`] if the layer height is out of range.
pub(crate) fn layer_root<H: TweakableHash>(
    hash: &H,
    params: &Params,
    sk_seed: &[u8],
    layer: u32,
    tree: u64,
    root: &mut [u8],
    arena: &mut Vec<u8>,
) -> Result<()> {
    let mut adrs = tree_address(layer, tree);
    xmss_root(hash, params, sk_seed, &mut adrs, 0, None, root, arena)
}

/// Sign `msg` with leaf `idx` of the tree addressed by `adrs`.
///
/// Writes `(len + hp) * n` bytes (WOTS+ signature, then authentication path)
/// to `sig` and the tree root to `root`.
///
/// # Errors
///
/// Returns [`SlhDsaError::InvalidTree`] if `idx` is not below `2^hp`.
#[allow(clippy::too_many_arguments)]
pub(crate) fn xmss_sign<H: TweakableHash>(
    hash: &H,
    params: &Params,
    msg: &[u8],
    sk_seed: &[u8],
    idx: u32,
    adrs: &mut Address,
    sig: &mut [u8],
    root: &mut [u8],
    arena: &mut Vec<u8>,
) -> Result<()> {
    let (wots_sig, auth) = sig.split_at_mut(params.wots_sig_size());
    xmss_root(hash, params, sk_seed, adrs, idx, Some(auth), root, arena)?;

    adrs.set_type_and_clear(AddressType::WotsHash);
    adrs.set_key_pair(idx);
    wots::sign(hash, params.len, msg, sk_seed, adrs, wots_sig);
    Ok(())
}

/// Recompute the root of the tree addressed by `adrs` from a layer
/// signature over `msg` by leaf `idx`.
///
/// # Errors
///
/// Returns [`SlhDsaError::InvalidTree`] if `idx` is not below `2^hp`.
pub(crate) fn xmss_pk_from_sig<H: TweakableHash>(
    hash: &H,
    params: &Params,
    idx: u32,
    sig: &[u8],
    msg: &[u8],
    adrs: &mut Address,
    root: &mut [u8],
) -> Result<()> {
    let n = params.n;
    let (wots_sig, auth) = sig.split_at(params.wots_sig_size());

    adrs.set_type_and_clear(AddressType::WotsHash);
    adrs.set_key_pair(idx);
    let mut leaf = [0u8; MAX_N];
    wots::pk_from_sig(hash, params.len, wots_sig, msg, adrs, &mut leaf[..n]);

    adrs.set_type_and_clear(AddressType::Tree);
    tree::root_from_path(hash, adrs, params.hp, 0, idx, &leaf[..n], auth, root)
}

/// Layer-local leaf index and the tree index one layer up
fn ascend(params: &Params, idx_tree: u64) -> (u32, u64) {
    let mask = (1u64 << params.hp) - 1;
    ((idx_tree & mask) as u32, idx_tree >> params.hp)
}

/// Authenticate `msg` through all `d` layers, starting at leaf `idx_leaf` of
/// tree `idx_tree` on layer 0.
///
/// # Errors
///
/// Returns [`SlhDsaError::InvalidLength`] if `sig` is not `d * (len + hp) * n`
/// bytes and [`SlhDsaError::InvalidTree`] if `idx_leaf` is not below `2^hp`.
#[allow(clippy::too_many_arguments)]
pub(crate) fn sign<H: TweakableHash>(
    hash: &H,
    params: &Params,
    msg: &[u8],
    sk_seed: &[u8],
    mut idx_tree: u64,
    mut idx_leaf: u32,
    sig: &mut [u8],
    arena: &mut Vec<u8>,
) -> Result<()> {
    let n = params.n;
    if sig.len() != params.ht_sig_size() {
        return Err(SlhDsaError::invalid_length(
            "hypertree signature",
            params.ht_sig_size(),
            sig.len(),
        ));
    }

    let mut node = [0u8; MAX_N];
    let mut root = [0u8; MAX_N];
    node[..n].copy_from_slice(msg);

    for (layer, segment) in sig.chunks_exact_mut(params.xmss_sig_size()).enumerate() {
        if layer > 0 {
            (idx_leaf, idx_tree) = ascend(params, idx_tree);
        }
        tracing::trace!("Hypertree: signing layer {layer} (tree {idx_tree}, leaf {idx_leaf})");

        let mut adrs = tree_address(layer as u32, idx_tree);
        xmss_sign(
            hash,
            params,
            &node[..n],
            sk_seed,
            idx_leaf,
            &mut adrs,
            segment,
            &mut root[..n],
            arena,
        )?;
        node[..n].copy_from_slice(&root[..n]);
    }
    Ok(())
}

/// Check a hypertree signature over `msg` against the top root `pk_root`.
///
/// # Errors
///
/// Returns [`SlhDsaError::InvalidLength`] if `sig` is not `d * (len + hp) * n`
/// bytes and [`SlhDsaError::InvalidTree`] if `idx_leaf` is not below `2^hp`.
pub(crate) fn verify<H: TweakableHash>(
    hash: &H,
    params: &Params,
    msg: &[u8],
    sig: &[u8],
    mut idx_tree: u64,
    mut idx_leaf: u32,
    pk_root: &[u8],
) -> Result<bool> {
    let n = params.n;
    if sig.len() != params.ht_sig_size() {
        return Err(SlhDsaError::invalid_length(
            "hypertree signature",
            params.ht_sig_size(),
            sig.len(),
        ));
    }

    let mut node = [0u8; MAX_N];
    let mut root = [0u8; MAX_N];
    node[..n].copy_from_slice(msg);

    for (layer, segment) in sig.chunks_exact(params.xmss_sig_size()).enumerate() {
        if layer > 0 {
            (idx_leaf, idx_tree) = ascend(params, idx_tree);
        }
        tracing::trace!("Hypertree: verifying layer {layer} (tree {idx_tree}, leaf {idx_leaf})");

        let mut adrs = tree_address(layer as u32, idx_tree);
        xmss_pk_from_sig(hash, params, idx_leaf, segment, &node[..n], &mut adrs, &mut root[..n])?;
        node[..n].copy_from_slice(&root[..n]);
    }

    Ok(node[..n].ct_eq(pk_root).into())
}
