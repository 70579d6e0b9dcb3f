//! Client-side cryptographic core for a layer-2 exchange protocol: Pedersen
//! hashing over the Stark curve, the typed message hashers built on top of
//! it, and ECDSA signing/verification.
//!
//! [`StarkCryptoCore::new`] builds a core over the crate's built-in,
//! bit-exact constant-point table; construct it once and reuse it for
//! every hash, sign, and verify call. [`StarkCryptoCore::with_table`]
//! swaps in a different validated [`ConstantPointTable`] for deployments
//! with their own trusted setup.

pub mod bigint;
pub mod constants;
pub mod curve;
pub mod ecdsa;
pub mod error;
pub mod hashers;
pub mod packing;
pub mod pedersen;
pub mod range;

use num_bigint::BigUint;

pub use constants::ConstantPointTable;
pub use curve::{CurveParameters, CurvePoint};
pub use ecdsa::{PublicKey, Signature, Signer, Verifier};
pub use error::{CryptoError, Result};
pub use packing::InstructionType;

/// The crate's entry point: curve parameters, a validated constant-point
/// table, and the `2^251` ECDSA digest bound, bundled so every hasher and
/// the sign/verify pair share one consistent view of the curve.
#[derive(Clone, Debug)]
pub struct StarkCryptoCore {
    params: CurveParameters,
    table: ConstantPointTable,
    max_ecdsa_val: BigUint,
}

impl StarkCryptoCore {
    /// Builds a core over the crate's built-in, bit-exact constant-point
    /// table (see [`constants::stark_constant_points`]).
    pub fn new() -> Self {
        let params = CurveParameters::stark();
        let points = constants::stark_constant_points(&params)
            .expect("built-in constant points must be valid curve points");
        let table = ConstantPointTable::new(points, &params)
            .expect("built-in constant point table must pass validation");
        Self::with_table(table)
    }

    /// Builds a core over an already-validated constant-point table. Use
    /// [`ConstantPointTable::new`] to validate a table sourced from a
    /// different trusted setup before passing it in here.
    pub fn with_table(table: ConstantPointTable) -> Self {
        let params = CurveParameters::stark();
        let max_ecdsa_val = CurveParameters::max_ecdsa_val();
        log::debug!("crypto core initialized");
        StarkCryptoCore {
            params,
            table,
            max_ecdsa_val,
        }
    }

    pub fn params(&self) -> &CurveParameters {
        &self.params
    }

    pub fn table(&self) -> &ConstantPointTable {
        &self.table
    }

    /// Builds a [`PublicKey`] verifier bound to this core's curve
    /// parameters and generator, from a public-key x-coordinate.
    pub fn public_key_from_point(&self, point: CurvePoint) -> PublicKey {
        PublicKey::new(point, self.params.clone(), self.table.generator().clone())
    }
}

impl Default for StarkCryptoCore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_core() -> StarkCryptoCore {
        StarkCryptoCore::new()
    }

    #[test]
    fn pedersen_rejects_missing_hex_prefix() {
        let core = test_core();
        assert!(core.pedersen(&["1234"]).is_err());
    }

    #[test]
    fn pedersen_accepts_prefixed_hex_inputs() {
        let core = test_core();
        assert!(core.pedersen(&["0x1", "0x2"]).is_ok());
    }
}
