//! The bit-indexed conditional-sum Pedersen hash.

use num_bigint::BigUint;

use crate::constants::ConstantPointTable;
use crate::curve::{assert_x_disjoint, CurveOps, CurveParameters};
use crate::error::{CryptoError, Result};

/// Hashes 1 or 2 field elements to a field element: the x-coordinate of the
/// final accumulator.
///
/// Each input must satisfy `0 <= x < p`. The accumulator starts at the
/// table's shift point so it is never the identity during the loop, then
/// for each input, bits are walked LSB-first and the corresponding constant
/// point is added whenever the bit is set.
pub fn pedersen_hash(
    inputs: &[BigUint],
    table: &ConstantPointTable,
    params: &CurveParameters,
) -> Result<BigUint> {
    if inputs.is_empty() || inputs.len() > ConstantPointTable::MAX_INPUTS {
        return Err(CryptoError::InvalidInput(format!(
            "pedersen hash takes 1 or {} inputs, got {}",
            ConstantPointTable::MAX_INPUTS,
            inputs.len()
        )));
    }
    for x in inputs {
        if x >= &params.p {
            return Err(CryptoError::InvalidInput(format!(
                "input {x} is not in [0, p)"
            )));
        }
    }

    let ops = CurveOps::new(params);
    let mut acc = table.shift_point().clone();

    for (input_index, x) in inputs.iter().enumerate() {
        for bit_index in 0..ConstantPointTable::BITS_PER_INPUT {
            if !x.bit(bit_index as u64) {
                continue;
            }
            let (table_index, addend) = table.addend(input_index, bit_index);
            assert_x_disjoint(&acc, addend, table_index)?;
            acc = ops.add(&acc, addend)?;
        }
    }

    acc.x()
        .cloned()
        .ok_or_else(|| CryptoError::InvalidInput("pedersen hash collapsed to infinity".into()))
}

/// Lower-case hex, no `0x` prefix, no leading zeros — the wire format
/// every public function in this crate returns.
pub fn to_output_hex(value: &BigUint) -> String {
    if value == &BigUint::from(0u32) {
        "0".to_string()
    } else {
        value.to_str_radix(16)
    }
}
