//! Arbitrary-precision unsigned integer support.
//!
//! A thin newtype over [`BigUint`] rather than a hand-rolled limb array —
//! the same choice the wider example pack makes for custom curve math
//! (see e.g. the `num_bigint`-based ECDSA implementations in
//! `other_examples/`).

use num_bigint::{BigInt, BigUint};
use num_integer::Integer;
use num_traits::{One, Signed, Zero};

use crate::error::{CryptoError, Result};

#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub struct FieldBigInt(BigUint);

impl FieldBigInt {
    pub fn from_biguint(value: BigUint) -> Self {
        FieldBigInt(value)
    }

    pub fn from_u64(value: u64) -> Self {
        FieldBigInt(BigUint::from(value))
    }

    pub fn zero() -> Self {
        FieldBigInt(BigUint::zero())
    }

    /// Parses a hex string, with or without a `0x` prefix. Callers that
    /// must enforce the prefix check for it before calling this.
    pub fn from_hex(s: &str) -> Result<Self> {
        let digits = s.trim_start_matches("0x").trim_start_matches("0X");
        let digits = if digits.is_empty() { "0" } else { digits };
        BigUint::parse_bytes(digits.as_bytes(), 16)
            .map(FieldBigInt)
            .ok_or_else(|| CryptoError::InvalidInput(format!("not a valid hex integer: {s:?}")))
    }

    /// Parses a base-10 string (amounts and fee limits arrive this way to
    /// preserve the full 63-bit range).
    pub fn from_dec(s: &str) -> Result<Self> {
        BigUint::parse_bytes(s.as_bytes(), 10)
            .map(FieldBigInt)
            .ok_or_else(|| CryptoError::InvalidInput(format!("not a valid decimal integer: {s:?}")))
    }

    pub fn into_biguint(self) -> BigUint {
        self.0
    }

    pub fn as_biguint(&self) -> &BigUint {
        &self.0
    }

    /// Lower-case hex, no leading zeros, no `0x` prefix.
    pub fn to_hex_lower(&self) -> String {
        if self.0.is_zero() {
            "0".to_string()
        } else {
            self.0.to_str_radix(16)
        }
    }

    pub fn bit(&self, i: u64) -> bool {
        self.0.bit(i)
    }

    pub fn shl(&self, bits: u32) -> Self {
        FieldBigInt(&self.0 << bits)
    }

    pub fn shr1(&self) -> Self {
        FieldBigInt(&self.0 >> 1u32)
    }

    pub fn bitand(&self, other: &Self) -> Self {
        FieldBigInt(&self.0 & &other.0)
    }

    /// Modular inverse via the extended Euclidean algorithm. Fails if
    /// `self` shares a factor with `modulus` (never the case for a nonzero
    /// residue mod the prime field or the prime curve order this crate
    /// uses, but the contract is total).
    pub fn mod_inverse(&self, modulus: &BigUint) -> Result<Self> {
        let a = BigInt::from(self.0.clone());
        let m = BigInt::from(modulus.clone());
        let egcd = a.extended_gcd(&m);
        if egcd.gcd != BigInt::one() {
            return Err(CryptoError::InvalidInput(
                "value has no modular inverse under the given modulus".to_string(),
            ));
        }
        let mut x = egcd.x % &m;
        if x.is_negative() {
            x += &m;
        }
        Ok(FieldBigInt(
            x.to_biguint()
                .expect("reduced mod a positive modulus is never negative"),
        ))
    }
}

impl std::fmt::Display for FieldBigInt {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
