//! Merkle subtree helper shared by FORS and the hypertree layers
//!
//! Both tree kinds hash node pairs with `H` under an address whose height and
//! index fields name the parent. A FORS tree `j` of height `a` lives at global
//! leaf offset `j * 2^a`, so its node `i` at height `z` has index
//! `(offset >> z) + i`; hypertree layers use offset `0`.

use crate::address::Address;
use crate::hash::TweakableHash;
use crate::params::MAX_N;
use crate::{Result, SlhDsaError};

/// Largest height the 32-bit index field can address
const MAX_HEIGHT: usize = 31;

fn check_bounds(height: usize, offset: u32, leaf_index: u32) -> Result<()> {
    if height > MAX_HEIGHT
        || u64::from(leaf_index) >= 1u64 << height
        || u64::from(offset) + (1u64 << height) > 1u64 << 32
    {
        return Err(SlhDsaError::invalid_tree(
            height as u32,
            u64::from(offset) + u64::from(leaf_index),
        ));
    }
    Ok(())
}

/// Compute the root of a subtree of `height` levels and, if `auth` is given,
/// the authentication path of `leaf_index`.
///
/// `adrs` must already carry the layer, tree, type and key pair fields of the
/// internal nodes; only its height and index are changed. `leaf(i, out)`
/// writes the `n`-byte leaf node at local index `i`. `arena` is scratch space
/// owned by the caller and reused between trees of the same request.
///
/// # Errors
///
/// Returns [`SlhDsaError::InvalidTree`] if the height or leaf index is out of
/// range for the 32-bit index field.
#[allow(clippy::too_many_arguments)]
pub(crate) fn root_and_path<H, L>(
    hash: &H,
    adrs: &mut Address,
    height: usize,
    offset: u32,
    leaf_index: u32,
    mut auth: Option<&mut [u8]>,
    root: &mut [u8],
    arena: &mut Vec<u8>,
    mut leaf: L,
) -> Result<()>
where
    H: TweakableHash,
    L: FnMut(u32, &mut [u8]),
{
    check_bounds(height, offset, leaf_index)?;
    let n = hash.n();
    if let Some(path) = auth.as_deref() {
        if path.len() != height * n {
            return Err(SlhDsaError::invalid_length(
                "authentication path",
                height * n,
                path.len(),
            ));
        }
    }

    let leaves = 1usize << height;
    arena.clear();
    arena.resize(leaves * n, 0);
    for (i, node) in arena.chunks_exact_mut(n).enumerate() {
        leaf(i as u32, node);
    }

    let mut parent = [0u8; MAX_N];
    for z in 1..=height {
        if let Some(path) = auth.as_deref_mut() {
            let sibling = ((leaf_index >> (z - 1)) ^ 1) as usize;
            path[(z - 1) * n..z * n].copy_from_slice(&arena[sibling * n..(sibling + 1) * n]);
        }

        adrs.set_tree_height(z as u32);
        let base = offset >> z;
        for i in 0..leaves >> z {
            adrs.set_tree_index(base + i as u32);
            let pair = &arena[2 * i * n..(2 * i + 2) * n];
            hash.h(adrs, &pair[..n], &pair[n..], &mut parent[..n]);
            arena[i * n..(i + 1) * n].copy_from_slice(&parent[..n]);
        }
    }

    root.copy_from_slice(&arena[..n]);
    Ok(())
}

/// Recompute a subtree root from leaf node `leaf` at `leaf_index` and its
/// authentication path.
///
/// # Errors
///
/// Returns [`SlhDsaError::InvalidTree`] if the height or leaf index is out of
/// range, and [`SlhDsaError::InvalidLength`] if `auth` is not `height * n`
/// bytes.
#[allow(clippy::too_many_arguments)]
pub(crate) fn root_from_path<H: TweakableHash>(
    hash: &H,
    adrs: &mut Address,
    height: usize,
    offset: u32,
    leaf_index: u32,
    leaf: &[u8],
    auth: &[u8],
    out: &mut [u8],
) -> Result<()> {
    check_bounds(height, offset, leaf_index)?;
    let n = hash.n();
    if auth.len() != height * n {
        return Err(SlhDsaError::invalid_length(
            "authentication path",
            height * n,
            auth.len(),
        ));
    }

    let mut node = [0u8; MAX_N];
    let mut next = [0u8; MAX_N];
    node[..n].copy_from_slice(leaf);

    let global = offset + leaf_index;
    for (j, sibling) in auth.chunks_exact(n).enumerate() {
        let z = j + 1;
        adrs.set_tree_height(z as u32);
        adrs.set_tree_index(global >> z);
        if (leaf_index >> j) & 1 == 0 {
            hash.h(adrs, &node[..n], sibling, &mut next[..n]);
        } else {
            hash.h(adrs, sibling, &node[..n], &mut next[..n]);
        }
        node[..n].copy_from_slice(&next[..n]);
    }

    out.copy_from_slice(&node[..n]);
    Ok(())
}
