//! Parameter sets for SLH-DSA
//!
//! [`ParameterSet`] names the twelve FIPS 205 sets; [`Params`] carries the
//! derived sizes every other module is parameterized by. Custom (small) sets
//! can be built with [`Params::new`] for testing.

use crate::{Result, SlhDsaError};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Largest supported security parameter `n` in bytes.
pub const MAX_N: usize = 32;

/// Winternitz parameter `w`.
pub const W: u32 = 16;

/// `log2(w)`.
pub const LG_W: u32 = 4;

/// Number of checksum digits for every supported `n`.
pub const LEN2: usize = 3;

/// Largest number of WOTS+ chains (`2 * MAX_N + LEN2`).
pub const MAX_WOTS_LEN: usize = 2 * MAX_N + LEN2;

/// Largest supported per-layer tree height.
pub const MAX_TREE_HEIGHT: usize = 20;

/// Largest supported FORS tree height.
pub const MAX_FORS_HEIGHT: usize = 24;

/// Largest supported message digest length `m` in bytes.
pub const MAX_M: usize = 64;

/// Hash family backing the tweakable hash functions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HashFamily {
    /// SHA-256 / SHA-512 with compressed addresses
    #[serde(rename = "sha2")]
    Sha2,
    /// SHAKE256 with full addresses
    #[serde(rename = "shake")]
    Shake,
}

impl fmt::Display for HashFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Sha2 => write!(f, "SHA2"),
            Self::Shake => write!(f, "SHAKE"),
        }
    }
}

/// FIPS 205 parameter sets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum ParameterSet {
    /// SLH-DSA-SHA2-128s (category 1, small signatures)
    #[serde(rename = "slh-dsa-sha2-128s")]
    Sha2_128s,
    /// SLH-DSA-SHAKE-128s (category 1, small signatures)
    #[serde(rename = "slh-dsa-shake-128s")]
    Shake128s,
    /// SLH-DSA-SHA2-128f (category 1, fast signing)
    #[serde(rename = "slh-dsa-sha2-128f")]
    Sha2_128f,
    /// SLH-DSA-SHAKE-128f (category 1, fast signing)
    #[serde(rename = "slh-dsa-shake-128f")]
    #[default]
    Shake128f,
    /// SLH-DSA-SHA2-192s (category 3, small signatures)
    #[serde(rename = "slh-dsa-sha2-192s")]
    Sha2_192s,
    /// SLH-DSA-SHAKE-192s (category 3, small signatures)
    #[serde(rename = "slh-dsa-shake-192s")]
    Shake192s,
    /// SLH-DSA-SHA2-192f (category 3, fast signing)
    #[serde(rename = "slh-dsa-sha2-192f")]
    Sha2_192f,
    /// SLH-DSA-SHAKE-192f (category 3, fast signing)
    #[serde(rename = "slh-dsa-shake-192f")]
    Shake192f,
    /// SLH-DSA-SHA2-256s (category 5, small signatures)
    #[serde(rename = "slh-dsa-sha2-256s")]
    Sha2_256s,
    /// SLH-DSA-SHAKE-256s (category 5, small signatures)
    #[serde(rename = "slh-dsa-shake-256s")]
    Shake256s,
    /// SLH-DSA-SHA2-256f (category 5, fast signing)
    #[serde(rename = "slh-dsa-sha2-256f")]
    Sha2_256f,
    /// SLH-DSA-SHAKE-256f (category 5, fast signing)
    #[serde(rename = "slh-dsa-shake-256f")]
    Shake256f,
}

impl ParameterSet {
    /// All parameter sets in FIPS 205 table order
    pub const ALL: [ParameterSet; 12] = [
        Self::Sha2_128s,
        Self::Shake128s,
        Self::Sha2_128f,
        Self::Shake128f,
        Self::Sha2_192s,
        Self::Shake192s,
        Self::Sha2_192f,
        Self::Shake192f,
        Self::Sha2_256s,
        Self::Shake256s,
        Self::Sha2_256f,
        Self::Shake256f,
    ];

    /// Derived parameters for this set
    #[must_use]
    pub fn params(&self) -> Params {
        // (n, h, d, a, k) from FIPS 205 Table 2
        let (n, h, d, a, k) = match self {
            Self::Sha2_128s | Self::Shake128s => (16, 63, 7, 12, 14),
            Self::Sha2_128f | Self::Shake128f => (16, 66, 22, 6, 33),
            Self::Sha2_192s | Self::Shake192s => (24, 63, 7, 14, 17),
            Self::Sha2_192f | Self::Shake192f => (24, 66, 22, 8, 33),
            Self::Sha2_256s | Self::Shake256s => (32, 64, 8, 14, 22),
            Self::Sha2_256f | Self::Shake256f => (32, 68, 17, 9, 35),
        };
        Params::derive(self.family(), n, h, d, a, k)
    }

    /// Hash family of this set
    #[must_use]
    pub fn family(&self) -> HashFamily {
        match self {
            Self::Sha2_128s
            | Self::Sha2_128f
            | Self::Sha2_192s
            | Self::Sha2_192f
            | Self::Sha2_256s
            | Self::Sha2_256f => HashFamily::Sha2,
            _ => HashFamily::Shake,
        }
    }

    /// NIST security category (1, 3 or 5)
    #[must_use]
    pub fn security_level(&self) -> u8 {
        match self.params().n {
            16 => 1,
            24 => 3,
            _ => 5,
        }
    }

    /// Check if this is a "fast" variant
    #[must_use]
    pub fn is_fast_variant(&self) -> bool {
        matches!(
            self,
            Self::Sha2_128f
                | Self::Shake128f
                | Self::Sha2_192f
                | Self::Shake192f
                | Self::Sha2_256f
                | Self::Shake256f
        )
    }

    /// Check if this is a "small" variant
    #[must_use]
    pub fn is_small_variant(&self) -> bool {
        !self.is_fast_variant()
    }

    /// Canonical FIPS 205 name, e.g. `SLH-DSA-SHA2-128s`
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::Sha2_128s => "SLH-DSA-SHA2-128s",
            Self::Shake128s => "SLH-DSA-SHAKE-128s",
            Self::Sha2_128f => "SLH-DSA-SHA2-128f",
            Self::Shake128f => "SLH-DSA-SHAKE-128f",
            Self::Sha2_192s => "SLH-DSA-SHA2-192s",
            Self::Shake192s => "SLH-DSA-SHAKE-192s",
            Self::Sha2_192f => "SLH-DSA-SHA2-192f",
            Self::Shake192f => "SLH-DSA-SHAKE-192f",
            Self::Sha2_256s => "SLH-DSA-SHA2-256s",
            Self::Shake256s => "SLH-DSA-SHAKE-256s",
            Self::Sha2_256f => "SLH-DSA-SHA2-256f",
            Self::Shake256f => "SLH-DSA-SHAKE-256f",
        }
    }
}

impl fmt::Display for ParameterSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ParameterSet {
    type Err = SlhDsaError;

    /// Accepts the canonical name with or without the `SLH-DSA-` prefix,
    /// case-insensitively (`SLH-DSA-SHA2-128s`, `shake-256f`, ...).
    fn from_str(s: &str) -> Result<Self> {
        let wanted = s.trim().to_ascii_lowercase();
        let wanted = wanted.strip_prefix("slh-dsa-").unwrap_or(&wanted);
        Self::ALL
            .into_iter()
            .find(|set| {
                let name = set.name().to_ascii_lowercase();
                name.strip_prefix("slh-dsa-") == Some(wanted)
            })
            .ok_or_else(|| SlhDsaError::invalid_parameters(format!("unknown parameter set {s:?}")))
    }
}

impl From<ParameterSet> for Params {
    fn from(set: ParameterSet) -> Self {
        set.params()
    }
}

/// Derived parameters of one SLH-DSA instance
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Params {
    /// Hash family
    pub family: HashFamily,
    /// Security parameter: digest size in bytes
    pub n: usize,
    /// Total hypertree height
    pub h: usize,
    /// Number of hypertree layers
    pub d: usize,
    /// Height of each hypertree layer (`h / d`)
    pub hp: usize,
    /// FORS tree height
    pub a: usize,
    /// Number of FORS trees
    pub k: usize,
    /// Message digest length in bytes
    pub m: usize,
    /// WOTS+ message digits (`2n`)
    pub len1: usize,
    /// WOTS+ checksum digits
    pub len2: usize,
    /// Total WOTS+ chains
    pub len: usize,
}

impl Params {
    /// Build and validate a custom parameter set.
    ///
    /// # Errors
    ///
    /// Returns [`SlhDsaError::InvalidParameters`] if `n` is not 16, 24 or 32,
    /// `h` is not a multiple of `d`, or the tree heights exceed what the
    /// address fields can index.
    pub fn new(
        family: HashFamily,
        n: usize,
        h: usize,
        d: usize,
        a: usize,
        k: usize,
    ) -> Result<Self> {
        if !matches!(n, 16 | 24 | 32) {
            return Err(SlhDsaError::invalid_parameters(format!(
                "n must be 16, 24 or 32, got {n}"
            )));
        }
        if d == 0 || h == 0 || h % d != 0 {
            return Err(SlhDsaError::invalid_parameters(format!(
                "h ({h}) must be a positive multiple of d ({d})"
            )));
        }
        let hp = h / d;
        if hp > MAX_TREE_HEIGHT {
            return Err(SlhDsaError::invalid_parameters(format!(
                "layer height {hp} exceeds {MAX_TREE_HEIGHT}"
            )));
        }
        if h - hp > 64 {
            return Err(SlhDsaError::invalid_parameters(format!(
                "tree address needs {} bits, at most 64 are available",
                h - hp
            )));
        }
        if a == 0 || a > MAX_FORS_HEIGHT || k == 0 {
            return Err(SlhDsaError::invalid_parameters(format!(
                "FORS needs 1 <= a <= {MAX_FORS_HEIGHT} and k >= 1, got a={a}, k={k}"
            )));
        }
        // Global FORS leaf indices are k * 2^a and must fit the 32-bit index field.
        if (k as u64) << a > u64::from(u32::MAX) + 1 {
            return Err(SlhDsaError::invalid_parameters(format!(
                "k * 2^a overflows the tree index field (k={k}, a={a})"
            )));
        }
        let params = Self::derive(family, n, h, d, a, k);
        if params.m > MAX_M {
            return Err(SlhDsaError::invalid_parameters(format!(
                "digest length {} exceeds {MAX_M} bytes",
                params.m
            )));
        }
        Ok(params)
    }

    fn derive(family: HashFamily, n: usize, h: usize, d: usize, a: usize, k: usize) -> Self {
        let hp = h / d;
        let len1 = 2 * n;
        let m = (k * a).div_ceil(8) + (h - hp).div_ceil(8) + hp.div_ceil(8);
        Self {
            family,
            n,
            h,
            d,
            hp,
            a,
            k,
            m,
            len1,
            len2: LEN2,
            len: len1 + LEN2,
        }
    }

    /// Size of one WOTS+ signature: `len * n`
    #[must_use]
    pub const fn wots_sig_size(&self) -> usize {
        self.len * self.n
    }

    /// Size of one hypertree layer signature: `(len + hp) * n`
    #[must_use]
    pub const fn xmss_sig_size(&self) -> usize {
        (self.len + self.hp) * self.n
    }

    /// Size of the FORS signature: `k * (a + 1) * n`
    #[must_use]
    pub const fn fors_sig_size(&self) -> usize {
        self.k * (self.a + 1) * self.n
    }

    /// Size of the hypertree signature: `d * (len + hp) * n`
    #[must_use]
    pub const fn ht_sig_size(&self) -> usize {
        self.d * self.xmss_sig_size()
    }

    /// Total signature size
    #[must_use]
    pub const fn signature_size(&self) -> usize {
        self.n + self.fors_sig_size() + self.ht_sig_size()
    }

    /// Encoded public key size: `2n`
    #[must_use]
    pub const fn public_key_size(&self) -> usize {
        2 * self.n
    }

    /// Encoded private key size: `4n`
    #[must_use]
    pub const fn private_key_size(&self) -> usize {
        4 * self.n
    }

    /// Bytes of the digest feeding the FORS indices: `ceil(k * a / 8)`
    #[must_use]
    pub const fn md_size(&self) -> usize {
        (self.k * self.a).div_ceil(8)
    }

    /// Bytes of the digest feeding the tree index: `ceil((h - hp) / 8)`
    #[must_use]
    pub const fn tree_index_size(&self) -> usize {
        (self.h - self.hp).div_ceil(8)
    }

    /// Bytes of the digest feeding the leaf index: `ceil(hp / 8)`
    #[must_use]
    pub const fn leaf_index_size(&self) -> usize {
        self.hp.div_ceil(8)
    }

    /// Whether `H`, `T` and the message functions use SHA-512
    /// (SHA-2 family, categories 3 and 5).
    #[must_use]
    pub const fn uses_sha512(&self) -> bool {
        matches!(self.family, HashFamily::Sha2) && self.n > 16
    }
}
