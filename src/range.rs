//! Uniform bounded-range assertions applied to every typed field before
//! hashing or signing.

use num_bigint::BigUint;
use num_traits::{One, Zero};
use std::sync::OnceLock;

use crate::error::{CryptoError, Result};

/// `assertInRange(x, lo, hi, name)`: asserts `lo <= x < hi`.
pub fn assert_in_range(x: &BigUint, lo: &BigUint, hi: &BigUint, name: &'static str) -> Result<()> {
    if x >= lo && x < hi {
        Ok(())
    } else {
        Err(CryptoError::InvalidRange(name))
    }
}

fn pow2(bits: u32) -> BigUint {
    BigUint::one() << bits
}

static VAULT_HI: OnceLock<BigUint> = OnceLock::new();
static AMOUNT_HI: OnceLock<BigUint> = OnceLock::new();
static NONCE_HI: OnceLock<BigUint> = OnceLock::new();
static EXPIRATION_HI: OnceLock<BigUint> = OnceLock::new();
static FEE_LIMIT_HI: OnceLock<BigUint> = OnceLock::new();

/// Per-field upper bounds (all lower bounds are 0).
pub mod bounds {
    use super::*;

    pub fn vault_hi() -> &'static BigUint {
        VAULT_HI.get_or_init(|| pow2(31))
    }

    pub fn amount_hi() -> &'static BigUint {
        AMOUNT_HI.get_or_init(|| pow2(63))
    }

    pub fn nonce_hi() -> &'static BigUint {
        NONCE_HI.get_or_init(|| pow2(31))
    }

    pub fn expiration_hi() -> &'static BigUint {
        EXPIRATION_HI.get_or_init(|| pow2(22))
    }

    pub fn fee_limit_hi() -> &'static BigUint {
        FEE_LIMIT_HI.get_or_init(|| pow2(63))
    }
}

pub fn assert_vault(x: &BigUint, name: &'static str) -> Result<()> {
    assert_in_range(x, &BigUint::zero(), bounds::vault_hi(), name)
}

pub fn assert_amount(x: &BigUint, name: &'static str) -> Result<()> {
    assert_in_range(x, &BigUint::zero(), bounds::amount_hi(), name)
}

pub fn assert_nonce(x: &BigUint, name: &'static str) -> Result<()> {
    assert_in_range(x, &BigUint::zero(), bounds::nonce_hi(), name)
}

pub fn assert_expiration(x: &BigUint, name: &'static str) -> Result<()> {
    assert_in_range(x, &BigUint::zero(), bounds::expiration_hi(), name)
}

pub fn assert_fee_limit(x: &BigUint, name: &'static str) -> Result<()> {
    assert_in_range(x, &BigUint::zero(), bounds::fee_limit_hi(), name)
}

/// token / public key / condition: `[0, p)`.
pub fn assert_field_element(x: &BigUint, prime: &BigUint, name: &'static str) -> Result<()> {
    assert_in_range(x, &BigUint::zero(), prime, name)
}
