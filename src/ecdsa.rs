//! ECDSA signing and verification over the Stark curve, with the digest
//! length fix-up applied on both the sign and verify paths.
//!
//! Nonce generation is explicitly out of scope: [`Signer`] is an opaque
//! capability supplied by the consumer that holds the private key.
//! [`Verifier`] is pure public-key math, so this crate ships one concrete
//! implementation, [`PublicKey`], built on its own [`CurveOps`].

use num_bigint::BigUint;
use num_traits::One;

use crate::bigint::FieldBigInt;
use crate::curve::{CurveOps, CurveParameters, CurvePoint};
use crate::error::{CryptoError, Result};
use crate::pedersen::to_output_hex;
use crate::StarkCryptoCore;

/// An (r, s) ECDSA signature over the Stark curve.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Signature {
    pub r: BigUint,
    pub s: BigUint,
}

/// Produces a raw (r, s) signature over an already length-adjusted digest.
/// The nonce used internally is this implementation's concern, not this
/// crate's.
pub trait Signer {
    fn sign(&self, length_adjusted_digest_hex: &str) -> Result<(BigUint, BigUint)>;
}

/// Verifies an (r, s) signature over an already length-adjusted digest.
pub trait Verifier {
    fn verify(&self, length_adjusted_digest_hex: &str, r: &BigUint, s: &BigUint) -> bool;
}

/// A Stark curve point paired with the curve parameters and generator it
/// was issued under, so verification needs nothing but `self` and a
/// digest/signature.
pub struct PublicKey {
    point: CurvePoint,
    params: CurveParameters,
    generator: CurvePoint,
}

impl PublicKey {
    pub fn new(point: CurvePoint, params: CurveParameters, generator: CurvePoint) -> Self {
        PublicKey {
            point,
            params,
            generator,
        }
    }
}

impl Verifier for PublicKey {
    fn verify(&self, length_adjusted_digest_hex: &str, r: &BigUint, s: &BigUint) -> bool {
        let n = &self.params.n;
        let Ok(h) = FieldBigInt::from_hex(length_adjusted_digest_hex) else {
            return false;
        };
        let h = h.into_biguint();
        let Ok(w) = FieldBigInt::from_biguint(s.clone()).mod_inverse(n) else {
            return false;
        };
        let w = w.into_biguint();

        let ops = CurveOps::new(&self.params);
        let u1 = (&h * &w) % n;
        let u2 = (r * &w) % n;
        let (Ok(p1), Ok(p2)) = (
            ops.scalar_mul(&u1, &self.generator),
            ops.scalar_mul(&u2, &self.point),
        ) else {
            return false;
        };
        let Ok(sum) = ops.add(&p1, &p2) else {
            return false;
        };
        match sum.x() {
            Some(x) => (x % n) == *r,
            None => false,
        }
    }
}

/// `fixMsgHashLen`: compensates for the underlying ECDSA library's
/// automatic right-shift by `8*byteLen - bitLen(n) = 4` bits when the
/// digest already occupies the full 252 bits.
///
/// `digest_hex` is the digest's minimum-length hex, with any `0x` prefix
/// already stripped by the caller's `0x`-prefix check.
pub fn fix_msg_hash_len(digest_hex: &str) -> Result<String> {
    let stripped = digest_hex.trim_start_matches('0');
    let stripped = if stripped.is_empty() { "0" } else { stripped };
    match stripped.len() {
        0..=62 => Ok(stripped.to_string()),
        63 => Ok(format!("{stripped}0")),
        other => Err(CryptoError::InvalidDigestLength(other)),
    }
}

fn assert_sig_range(x: &BigUint, lo: &BigUint, hi: &BigUint, name: &'static str) -> Result<()> {
    if x >= lo && x < hi {
        Ok(())
    } else {
        Err(CryptoError::SignatureOutOfRange(name))
    }
}

fn parse_and_check_digest(msg_hash_hex: &str, max_ecdsa_val: &BigUint) -> Result<BigUint> {
    if !msg_hash_hex.starts_with("0x") && !msg_hash_hex.starts_with("0X") {
        return Err(CryptoError::MissingHexPrefix(msg_hash_hex.to_string()));
    }
    let digest = FieldBigInt::from_hex(msg_hash_hex)?.into_biguint();
    if digest >= *max_ecdsa_val {
        return Err(CryptoError::DigestOutOfRange(to_output_hex(&digest)));
    }
    Ok(digest)
}

impl StarkCryptoCore {
    /// `sign(key, msgHash)`.
    pub fn sign<S: Signer>(&self, signer: &S, msg_hash_hex: &str) -> Result<Signature> {
        let digest = parse_and_check_digest(msg_hash_hex, &self.max_ecdsa_val)?;
        let adjusted = fix_msg_hash_len(&to_output_hex(&digest))?;

        let (r, s) = signer.sign(&adjusted)?;
        assert_sig_range(&r, &BigUint::one(), &self.max_ecdsa_val, "r")?;
        assert_sig_range(&s, &BigUint::one(), &self.params.n, "s")?;

        let w = FieldBigInt::from_biguint(s.clone())
            .mod_inverse(&self.params.n)
            .map_err(|_| CryptoError::SignatureOutOfRange("w"))?
            .into_biguint();
        assert_sig_range(&w, &BigUint::one(), &self.max_ecdsa_val, "w")?;

        log::trace!("signature produced and range-checked");
        Ok(Signature { r, s })
    }

    /// `verify(key, msgHash, sig)`.
    pub fn verify<V: Verifier>(
        &self,
        verifier: &V,
        msg_hash_hex: &str,
        sig: &Signature,
    ) -> Result<bool> {
        let digest = parse_and_check_digest(msg_hash_hex, &self.max_ecdsa_val)?;
        let adjusted = fix_msg_hash_len(&to_output_hex(&digest))?;

        assert_sig_range(&sig.r, &BigUint::one(), &self.max_ecdsa_val, "r")?;
        assert_sig_range(&sig.s, &BigUint::one(), &self.params.n, "s")?;

        let w = FieldBigInt::from_biguint(sig.s.clone())
            .mod_inverse(&self.params.n)
            .map_err(|_| CryptoError::SignatureOutOfRange("w"))?
            .into_biguint();
        assert_sig_range(&w, &BigUint::one(), &self.max_ecdsa_val, "w")?;

        let ok = verifier.verify(&adjusted, &sig.r, &sig.s);
        log::trace!("verification outcome: {ok}");
        Ok(ok)
    }
}
