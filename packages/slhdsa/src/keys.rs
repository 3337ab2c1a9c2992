//! SLH-DSA key types
//!
//! Keys are immutable after construction and every operation on them is a
//! pure function of the key and its inputs, so both types are `Send + Sync`
//! and can be shared freely between threads.
//!
//! Encodings: a public key is `pk_seed ‖ pk_root` (`2n` bytes), a private key
//! is `sk_seed ‖ sk_prf ‖ pk_seed ‖ pk_root` (`4n` bytes).

use crate::context::frame_message;
use crate::params::{Params, MAX_N};
use crate::scheme::{self, SigningKey};
use crate::{Result, SlhDsaError};
use rand_core::{TryCryptoRng, TryRngCore};
use std::fmt;
use subtle::ConstantTimeEq;
use zeroize::{Zeroize, ZeroizeOnDrop, Zeroizing};

fn copy_part(what: &'static str, n: usize, bytes: &[u8]) -> Result<[u8; MAX_N]> {
    if bytes.len() != n {
        return Err(SlhDsaError::invalid_length(what, n, bytes.len()));
    }
    let mut out = [0u8; MAX_N];
    out[..n].copy_from_slice(bytes);
    Ok(out)
}

/// Draw `n` bytes from `rng` into a zeroizing buffer.
pub(crate) fn random_bytes<R: TryCryptoRng + ?Sized>(
    rng: &mut R,
    n: usize,
) -> Result<Zeroizing<[u8; MAX_N]>> {
    if n > MAX_N {
        return Err(SlhDsaError::invalid_parameters(format!(
            "n must be at most {MAX_N}, got {n}"
        )));
    }
    let mut out = Zeroizing::new([0u8; MAX_N]);
    TryRngCore::try_fill_bytes(rng, &mut out[..n])
        .map_err(|e| SlhDsaError::random(format!("failed to read {n} random bytes: {e}")))?;
    Ok(out)
}

/// SLH-DSA public key
#[derive(Clone)]
pub struct PublicKey {
    params: Params,
    seed: [u8; MAX_N],
    root: [u8; MAX_N],
}

impl PublicKey {
    /// Decode a `2n`-byte public key.
    ///
    /// # Errors
    ///
    /// Returns [`SlhDsaError::InvalidParameters`] for an inconsistent
    /// parameter struct and [`SlhDsaError::InvalidLength`] if `bytes` is not
    /// `2n` bytes.
    pub fn from_bytes(params: Params, bytes: &[u8]) -> Result<Self> {
        scheme::check_params(&params)?;
        let n = params.n;
        if bytes.len() != params.public_key_size() {
            return Err(SlhDsaError::invalid_length(
                "public key",
                params.public_key_size(),
                bytes.len(),
            ));
        }
        Ok(Self {
            params,
            seed: copy_part("public seed", n, &bytes[..n])?,
            root: copy_part("public root", n, &bytes[n..])?,
        })
    }

    /// Decode a hex-encoded public key.
    ///
    /// # Errors
    ///
    /// Returns [`SlhDsaError::InvalidKey`] for malformed hex and
    /// [`SlhDsaError::InvalidLength`] for a wrong size.
    pub fn from_hex(params: Params, encoded: &str) -> Result<Self> {
        let bytes = hex::decode(encoded)?;
        Self::from_bytes(params, &bytes)
    }

    /// Encode as `pk_seed ‖ pk_root`
    #[must_use]
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.params.public_key_size());
        out.extend_from_slice(self.seed());
        out.extend_from_slice(self.root());
        out
    }

    /// Hex encoding of [`PublicKey::to_bytes`]
    #[must_use]
    pub fn to_hex(&self) -> String {
        hex::encode(self.to_bytes())
    }

    /// Parameter set this key belongs to
    #[must_use]
    pub fn params(&self) -> &Params {
        &self.params
    }

    /// Public seed `pk_seed`
    #[must_use]
    pub fn seed(&self) -> &[u8] {
        &self.seed[..self.params.n]
    }

    /// Root of the top hypertree layer
    #[must_use]
    pub fn root(&self) -> &[u8] {
        &self.root[..self.params.n]
    }

    /// Verify a signature over an already prepared message, i.e. without
    /// context framing.
    ///
    /// Returns `false` for any invalid input, including a signature of the
    /// wrong length; this never panics or errors.
    #[must_use]
    pub fn verify_prepared(&self, msg: &[u8], sig: &[u8]) -> bool {
        let valid = scheme::verify_internal(&self.params, self.seed(), self.root(), msg, sig);
        if !valid {
            tracing::debug!("SLH-DSA: signature rejected");
        }
        valid
    }

    /// Verify a signature over `msg` bound to the context string `ctx`.
    ///
    /// Returns `false` if `ctx` is longer than 255 bytes.
    #[must_use]
    pub fn verify(&self, msg: &[u8], ctx: &[u8], sig: &[u8]) -> bool {
        match frame_message(ctx, msg) {
            Ok(framed) => self.verify_prepared(&framed, sig),
            Err(e) => {
                tracing::debug!("SLH-DSA: signature rejected: {e}");
                false
            }
        }
    }

    /// Verify a signature made by one of the `*_no_context` signers.
    #[must_use]
    pub fn verify_no_context(&self, msg: &[u8], sig: &[u8]) -> bool {
        self.verify_prepared(msg, sig)
    }
}

impl PartialEq for PublicKey {
    fn eq(&self, other: &Self) -> bool {
        self.params == other.params && bool::from(self.to_bytes().ct_eq(&other.to_bytes()))
    }
}

impl Eq for PublicKey {}

impl fmt::Debug for PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PublicKey")
            .field("n", &self.params.n)
            .field("root", &hex::encode(self.root()))
            .finish()
    }
}

/// SLH-DSA private key
///
/// Secret seeds are wiped from memory when the key is dropped.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct PrivateKey {
    #[zeroize(skip)]
    params: Params,
    sk_seed: [u8; MAX_N],
    sk_prf: [u8; MAX_N],
    pk_seed: [u8; MAX_N],
    pk_root: [u8; MAX_N],
}

impl PrivateKey {
    /// Derive the key pair for explicit seeds (FIPS 205 Algorithm 18).
    ///
    /// # Errors
    ///
    /// Returns [`SlhDsaError::InvalidLength`] if a seed is not `n` bytes.
    pub fn from_seeds(
        params: Params,
        sk_seed: &[u8],
        sk_prf: &[u8],
        pk_seed: &[u8],
    ) -> Result<Self> {
        let pk_root = scheme::keygen_internal(&params, sk_seed, sk_prf, pk_seed)?;
        Ok(Self {
            params,
            sk_seed: copy_part("secret seed", params.n, sk_seed)?,
            sk_prf: copy_part("PRF key", params.n, sk_prf)?,
            pk_seed: copy_part("public seed", params.n, pk_seed)?,
            pk_root,
        })
    }

    /// Decode a `4n`-byte private key. The embedded root is trusted as is.
    ///
    /// # Errors
    ///
    /// Returns [`SlhDsaError::InvalidLength`] if `bytes` is not `4n` bytes.
    pub fn from_bytes(params: Params, bytes: &[u8]) -> Result<Self> {
        scheme::check_params(&params)?;
        let n = params.n;
        if bytes.len() != params.private_key_size() {
            return Err(SlhDsaError::invalid_length(
                "private key",
                params.private_key_size(),
                bytes.len(),
            ));
        }
        Ok(Self {
            params,
            sk_seed: copy_part("secret seed", n, &bytes[..n])?,
            sk_prf: copy_part("PRF key", n, &bytes[n..2 * n])?,
            pk_seed: copy_part("public seed", n, &bytes[2 * n..3 * n])?,
            pk_root: copy_part("public root", n, &bytes[3 * n..])?,
        })
    }

    /// Encode as `sk_seed ‖ sk_prf ‖ pk_seed ‖ pk_root`
    #[must_use]
    pub fn to_bytes(&self) -> Zeroizing<Vec<u8>> {
        let n = self.params.n;
        let mut out = Zeroizing::new(Vec::with_capacity(self.params.private_key_size()));
        out.extend_from_slice(&self.sk_seed[..n]);
        out.extend_from_slice(&self.sk_prf[..n]);
        out.extend_from_slice(&self.pk_seed[..n]);
        out.extend_from_slice(&self.pk_root[..n]);
        out
    }

    /// Parameter set this key belongs to
    #[must_use]
    pub fn params(&self) -> &Params {
        &self.params
    }

    /// Matching public key
    #[must_use]
    pub fn public_key(&self) -> PublicKey {
        PublicKey {
            params: self.params,
            seed: self.pk_seed,
            root: self.pk_root,
        }
    }

    fn signing_key(&self) -> SigningKey<'_> {
        let n = self.params.n;
        SigningKey {
            sk_seed: &self.sk_seed[..n],
            sk_prf: &self.sk_prf[..n],
            pk_seed: &self.pk_seed[..n],
            pk_root: &self.pk_root[..n],
        }
    }

    /// Sign an already prepared message with the `n`-byte randomizer
    /// `add_rand` (FIPS 205 Algorithm 19).
    ///
    /// # Errors
    ///
    /// Returns [`SlhDsaError::InvalidLength`] if `add_rand` is not `n` bytes
    /// and [`SlhDsaError::Hash`] if the message PRF cannot be keyed.
    pub fn sign_prepared(&self, msg: &[u8], add_rand: &[u8]) -> Result<Vec<u8>> {
        tracing::debug!(
            "SLH-DSA: signing {} byte message (n={}, h={}, d={})",
            msg.len(),
            self.params.n,
            self.params.h,
            self.params.d
        );
        let sig = scheme::sign_internal(&self.params, &self.signing_key(), msg, add_rand)?;
        tracing::debug!("SLH-DSA: produced {} byte signature", sig.len());
        Ok(sig)
    }

    /// Deterministic signature of `msg` bound to `ctx`; the randomizer input
    /// is `pk_seed`, so signing the same input twice gives the same bytes.
    ///
    /// # Errors
    ///
    /// Returns [`SlhDsaError::ContextTooLong`] if `ctx` exceeds 255 bytes.
    pub fn sign_deterministic(&self, msg: &[u8], ctx: &[u8]) -> Result<Vec<u8>> {
        let framed = frame_message(ctx, msg)?;
        self.sign_prepared(&framed, &self.pk_seed[..self.params.n])
    }

    /// Deterministic signature of `msg` without context framing.
    ///
    /// # Errors
    ///
    /// Returns [`SlhDsaError::Hash`] if the message PRF cannot be keyed.
    pub fn sign_deterministic_no_context(&self, msg: &[u8]) -> Result<Vec<u8>> {
        self.sign_prepared(msg, &self.pk_seed[..self.params.n])
    }

    /// Randomized signature of `msg` bound to `ctx`, drawing `n` fresh bytes
    /// of randomizer input from `rng`.
    ///
    /// # Errors
    ///
    /// Returns [`SlhDsaError::ContextTooLong`] if `ctx` exceeds 255 bytes and
    /// [`SlhDsaError::RandomGenerationFailed`] if `rng` fails.
    pub fn sign_randomized<R: TryCryptoRng + ?Sized>(
        &self,
        rng: &mut R,
        msg: &[u8],
        ctx: &[u8],
    ) -> Result<Vec<u8>> {
        let framed = frame_message(ctx, msg)?;
        let add_rand = random_bytes(rng, self.params.n)?;
        self.sign_prepared(&framed, &add_rand[..self.params.n])
    }

    /// Randomized signature of `msg` without context framing.
    ///
    /// # Errors
    ///
    /// Returns [`SlhDsaError::RandomGenerationFailed`] if `rng` fails.
    pub fn sign_randomized_no_context<R: TryCryptoRng + ?Sized>(
        &self,
        rng: &mut R,
        msg: &[u8],
    ) -> Result<Vec<u8>> {
        let add_rand = random_bytes(rng, self.params.n)?;
        self.sign_prepared(msg, &add_rand[..self.params.n])
    }
}

impl fmt::Debug for PrivateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PrivateKey")
            .field("n", &self.params.n)
            .field("secret", &"<redacted>")
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::HashFamily;

    fn toy_key() -> PrivateKey {
        let params = Params::new(HashFamily::Shake, 16, 6, 2, 3, 2).expect("valid");
        PrivateKey::from_seeds(params, &[1u8; 16], &[2u8; 16], &[3u8; 16]).expect("keygen")
    }

    #[test]
    fn test_private_key_encoding_round_trip() -> Result<()> {
        let key = toy_key();
        let bytes = key.to_bytes();
        assert_eq!(bytes.len(), 64);
        assert_eq!(&bytes[..16], &[1u8; 16]);
        assert_eq!(&bytes[32..48], &[3u8; 16]);

        let decoded = PrivateKey::from_bytes(*key.params(), &bytes)?;
        assert_eq!(decoded.public_key(), key.public_key());
        assert_eq!(decoded.to_bytes(), bytes);
        Ok(())
    }

    #[test]
    fn test_public_key_hex_round_trip() -> Result<()> {
        let pk = toy_key().public_key();
        let decoded = PublicKey::from_hex(*pk.params(), &pk.to_hex())?;
        assert_eq!(decoded, pk);
        assert_eq!(decoded.seed(), &[3u8; 16]);
        Ok(())
    }

    #[test]
    fn test_wrong_key_lengths_are_rejected() {
        let params = *toy_key().params();
        assert_eq!(
            PublicKey::from_bytes(params, &[0u8; 31]).err(),
            Some(SlhDsaError::invalid_length("public key", 32, 31))
        );
        assert!(PrivateKey::from_bytes(params, &[0u8; 65]).is_err());
        assert!(PrivateKey::from_seeds(params, &[0u8; 16], &[0u8; 16], &[0u8; 15]).is_err());
        assert!(matches!(
            PublicKey::from_hex(params, "zz"),
            Err(SlhDsaError::InvalidKey(_))
        ));
    }

    #[test]
    fn test_debug_output_hides_secrets() {
        let rendered = format!("{:?}", toy_key());
        assert!(rendered.contains("<redacted>"));
        assert!(!rendered.contains("0101"));
    }

    #[test]
    fn test_zeroize_clears_seeds() {
        let mut key = toy_key();
        key.zeroize();
        assert_eq!(&key.sk_seed[..16], &[0u8; 16]);
        assert_eq!(&key.sk_prf[..16], &[0u8; 16]);
    }

    #[test]
    fn test_random_bytes_rejects_oversized_n() {
        use rand::SeedableRng;
        let mut rng = rand::rngs::StdRng::seed_from_u64(0);
        assert!(matches!(
            random_bytes(&mut rng, MAX_N + 1),
            Err(SlhDsaError::InvalidParameters(_))
        ));
        let bytes = random_bytes(&mut rng, 16).expect("16 bytes");
        assert_eq!(&bytes[16..], &[0u8; MAX_N - 16]);
    }

    #[test]
    fn test_keys_are_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<PublicKey>();
        assert_send_sync::<PrivateKey>();
    }
}
