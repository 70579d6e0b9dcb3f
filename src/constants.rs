//! The constant-point table: the Pedersen hash's trusted setup.
//!
//! `CurveParameters` fixes this table as static data (index 0 the shift
//! point, index 1 the generator, indices 2..505 the per-bit addends for up
//! to 2 hash inputs). This module builds that exact table from the five
//! published base points of the Stark curve's pedersen hash — the shift
//! point and the four low/high-split base points `P0..P3` — by repeated
//! doubling, the same technique every StarkEx-compatible implementation
//! uses to turn a handful of base points into the full lookup table.

use num_bigint::BigUint;

use crate::curve::{CurveOps, CurveParameters, CurvePoint};
use crate::error::{CryptoError, Result};

/// Immutable, validated sequence of 506 curve points: index 0 is the shift
/// point, index 1 is the generator, indices 2..505 are the per-bit addends
/// for up to 2 hash inputs of 252 bits each.
#[derive(Clone, Debug)]
pub struct ConstantPointTable {
    points: Vec<CurvePoint>,
}

impl ConstantPointTable {
    pub const LEN: usize = 506;
    pub const BITS_PER_INPUT: usize = 252;
    pub const MAX_INPUTS: usize = 2;
    /// Within one input's 252-bit range, bits below this index are hashed
    /// against the input's "low" base point, bits at or above it against
    /// its "high" base point.
    const HIGH_PART_SHIFT: usize = 248;

    /// Validates and freezes a caller-supplied table. This is a one-time
    /// "uninitialized -> initialized -> frozen" transition; callers are
    /// expected to do this once and share the result.
    pub fn new(points: Vec<CurvePoint>, params: &CurveParameters) -> Result<Self> {
        if points.len() != Self::LEN {
            return Err(CryptoError::InvalidConstantTable(format!(
                "expected {} points, got {}",
                Self::LEN,
                points.len()
            )));
        }
        for (index, point) in points.iter().enumerate() {
            if point.is_infinity() {
                return Err(CryptoError::InvalidConstantTable(format!(
                    "point at index {index} is the point at infinity"
                )));
            }
            if !point.is_on_curve(params) {
                return Err(CryptoError::InvalidConstantTable(format!(
                    "point at index {index} is not on the curve"
                )));
            }
        }
        log::debug!("constant point table validated: {} points on-curve", points.len());
        Ok(ConstantPointTable { points })
    }

    pub fn shift_point(&self) -> &CurvePoint {
        &self.points[0]
    }

    /// The generator G — table index 1, not a separate constant.
    pub fn generator(&self) -> &CurvePoint {
        &self.points[1]
    }

    /// The addend for bit `bit_index` of input `input_index`, at table
    /// index `2 + input_index*252 + bit_index`.
    pub fn addend(&self, input_index: usize, bit_index: usize) -> (usize, &CurvePoint) {
        let table_index = 2 + input_index * Self::BITS_PER_INPUT + bit_index;
        (table_index, &self.points[table_index])
    }
}

fn decimal(s: &str) -> BigUint {
    BigUint::parse_bytes(s.as_bytes(), 10).expect("hard-coded decimal constant must parse")
}

/// The real Stark curve generator (table index 1).
pub fn stark_generator() -> CurvePoint {
    CurvePoint::new(
        decimal("874739451078007766457464989774322083649278607533249481151382481072868806602"),
        decimal("152666792071518830868575557812948353041420400780739481342941381225525861407"),
    )
}

/// The real Stark curve shift point (table index 0).
pub fn stark_shift_point() -> CurvePoint {
    CurvePoint::new(
        decimal("2089986280348253421170679821480865132823066470938446095505822317253594081284"),
        decimal("1713931329540660377023406109199410414810705867260802078187082345529207694986"),
    )
}

/// Low-part base point for the first hash input, bits `[0, 248)`.
/// Numerically identical to the shift point, as published.
fn stark_p0() -> CurvePoint {
    stark_shift_point()
}

/// High-part base point for the first hash input, bits `[248, 252)`.
fn stark_p1() -> CurvePoint {
    CurvePoint::new(
        decimal("996781205833008774514500082376783249102396023663454813447423147977397232763"),
        decimal("1668503676786377725805489344771023921079126552019160156920634619255970485781"),
    )
}

/// Low-part base point for the second hash input, bits `[0, 248)`.
fn stark_p2() -> CurvePoint {
    CurvePoint::new(
        decimal("2251563274489750535117886426533222435294046428347329203627021249169616184184"),
        decimal("1798716007562728905295480679789526322175868328062420237419143593021674992973"),
    )
}

/// High-part base point for the second hash input, bits `[248, 252)`.
fn stark_p3() -> CurvePoint {
    CurvePoint::new(
        decimal("2138414695194151160943305727036575959195309218611738193261179310511854807447"),
        decimal("113410276730064486255102093846540133784865286929052426931474106396135072156"),
    )
}

/// Doubles `base` repeatedly, pushing `2^0*base, 2^1*base, ..., 2^(count-1)*base`.
fn push_doublings(points: &mut Vec<CurvePoint>, ops: &CurveOps, base: CurvePoint, count: usize) -> Result<()> {
    let mut acc = base;
    for _ in 0..count {
        points.push(acc.clone());
        acc = ops.add(&acc, &acc)?;
    }
    Ok(())
}

/// Builds the real, bit-exact 506-point StarkEx constant table from the
/// five published base points, by repeated doubling. Index 0 is the shift
/// point, index 1 the generator; for each input `i` in `{0, 1}`, bits
/// `[0, 248)` are addends `2^j * P_low(i)` and bits `[248, 252)` are
/// addends `2^(j-248) * P_high(i)`, where `P_low/P_high` are `(P0, P1)`
/// for the first input and `(P2, P3)` for the second.
pub fn stark_constant_points(params: &CurveParameters) -> Result<Vec<CurvePoint>> {
    let ops = CurveOps::new(params);
    let mut points = Vec::with_capacity(ConstantPointTable::LEN);
    points.push(stark_shift_point());
    points.push(stark_generator());

    let high_part_bits = ConstantPointTable::BITS_PER_INPUT - ConstantPointTable::HIGH_PART_SHIFT;
    for (low_base, high_base) in [(stark_p0(), stark_p1()), (stark_p2(), stark_p3())] {
        push_doublings(&mut points, &ops, low_base, ConstantPointTable::HIGH_PART_SHIFT)?;
        push_doublings(&mut points, &ops, high_base, high_part_bits)?;
    }
    Ok(points)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn real_table_is_valid() {
        let params = CurveParameters::stark();
        let points = stark_constant_points(&params).unwrap();
        let table = ConstantPointTable::new(points, &params).unwrap();
        assert!(table.shift_point().is_on_curve(&params));
        assert!(table.generator().same_point(&stark_generator()));
    }

    #[test]
    fn rejects_wrong_length() {
        let params = CurveParameters::stark();
        let points = vec![stark_shift_point(), stark_generator()];
        assert!(ConstantPointTable::new(points, &params).is_err());
    }

    #[test]
    fn rejects_off_curve_point() {
        let params = CurveParameters::stark();
        let mut points = stark_constant_points(&params).unwrap();
        points[5] = CurvePoint::new(BigUint::from(1u32), BigUint::from(1u32));
        assert!(ConstantPointTable::new(points, &params).is_err());
    }

    #[test]
    fn addend_table_index_matches_bit_layout() {
        let params = CurveParameters::stark();
        let points = stark_constant_points(&params).unwrap();
        let table = ConstantPointTable::new(points, &params).unwrap();
        let (index, _) = table.addend(1, 0);
        assert_eq!(index, 2 + ConstantPointTable::BITS_PER_INPUT);
    }
}
