//! Short Weierstrass arithmetic on the Stark curve: `y^2 = x^3 + a*x + b (mod p)`.

use std::sync::OnceLock;

use num_bigint::BigUint;
use num_traits::{One, Zero};

use crate::bigint::FieldBigInt;
use crate::error::{CryptoError, Result};

fn parse_hex_const(s: &str) -> BigUint {
    BigUint::parse_bytes(s.as_bytes(), 16).expect("hard-coded curve constant must parse")
}

/// The fixed constants of the Stark curve.
///
/// `a` and `b` are the Weierstrass coefficients; `p` is the base field
/// modulus; `n` is the order of the cyclic subgroup used for ECDSA. The
/// generator itself is *not* one of these constants — it is table index 1
/// of the externally-supplied [`crate::constants::ConstantPointTable`].
#[derive(Clone, Debug)]
pub struct CurveParameters {
    pub p: BigUint,
    pub n: BigUint,
    pub a: BigUint,
    pub b: BigUint,
}

static PRIME: OnceLock<BigUint> = OnceLock::new();
static ORDER: OnceLock<BigUint> = OnceLock::new();
static COEFF_B: OnceLock<BigUint> = OnceLock::new();

impl CurveParameters {
    /// `p = 2^251 + 17*2^192 + 1`.
    pub fn prime() -> &'static BigUint {
        PRIME.get_or_init(|| {
            parse_hex_const("800000000000011000000000000000000000000000000000000000000000001")
        })
    }

    /// The order of the Stark curve's prime-order subgroup.
    pub fn order() -> &'static BigUint {
        ORDER.get_or_init(|| {
            parse_hex_const("0800000000000010ffffffffffffffffb781126dcae7b2321e66a241adc64d2f")
        })
    }

    /// `b` coefficient of `y^2 = x^3 + a*x + b`.
    pub fn coeff_b() -> &'static BigUint {
        COEFF_B.get_or_init(|| {
            parse_hex_const("06f21413efbe40de150e596d72f7a8c5609ad26c15c915c1f4cdfcb99cee9e89")
        })
    }

    pub fn stark() -> Self {
        CurveParameters {
            p: Self::prime().clone(),
            n: Self::order().clone(),
            a: BigUint::one(),
            b: Self::coeff_b().clone(),
        }
    }

    /// `2^251`, the bound every ECDSA digest and message-hasher output must
    /// satisfy.
    pub fn max_ecdsa_val() -> BigUint {
        BigUint::one() << 251u32
    }
}

/// An affine point on the Stark curve, or the point at infinity.
#[derive(Clone, Debug)]
pub enum CurvePoint {
    Affine { x: BigUint, y: BigUint },
    Infinity,
}

impl CurvePoint {
    pub fn new(x: BigUint, y: BigUint) -> Self {
        CurvePoint::Affine { x, y }
    }

    pub fn infinity() -> Self {
        CurvePoint::Infinity
    }

    pub fn is_infinity(&self) -> bool {
        matches!(self, CurvePoint::Infinity)
    }

    pub fn x(&self) -> Option<&BigUint> {
        match self {
            CurvePoint::Affine { x, .. } => Some(x),
            CurvePoint::Infinity => None,
        }
    }

    pub fn y(&self) -> Option<&BigUint> {
        match self {
            CurvePoint::Affine { y, .. } => Some(y),
            CurvePoint::Infinity => None,
        }
    }

    /// Equality on (x, y); two infinities are equal, an infinity never
    /// equals an affine point.
    pub fn same_point(&self, other: &CurvePoint) -> bool {
        match (self, other) {
            (CurvePoint::Infinity, CurvePoint::Infinity) => true,
            (CurvePoint::Affine { x: x1, y: y1 }, CurvePoint::Affine { x: x2, y: y2 }) => {
                x1 == x2 && y1 == y2
            }
            _ => false,
        }
    }

    /// True when both points are affine and share an x-coordinate
    /// (whether or not y matches) — the condition the Pedersen hash loop
    /// must never hit.
    pub fn same_x(&self, other: &CurvePoint) -> bool {
        matches!((self.x(), other.x()), (Some(a), Some(b)) if a == b)
    }

    pub fn is_on_curve(&self, params: &CurveParameters) -> bool {
        match self {
            CurvePoint::Infinity => true,
            CurvePoint::Affine { x, y } => {
                let lhs = (y * y) % &params.p;
                let rhs = (x * x % &params.p * x + &params.a * x + &params.b) % &params.p;
                lhs == rhs
            }
        }
    }
}

/// Standard short-Weierstrass point addition and scalar multiplication.
///
/// The Pedersen hash's x-disjointness invariant guarantees the hash loop
/// never needs to double or hit the identity, but `add` handles both
/// correctly anyway: ECDSA's scalar multiplication goes through the same
/// routine.
pub struct CurveOps<'a> {
    pub params: &'a CurveParameters,
}

impl<'a> CurveOps<'a> {
    pub fn new(params: &'a CurveParameters) -> Self {
        CurveOps { params }
    }

    fn mod_add(&self, a: &BigUint, b: &BigUint) -> BigUint {
        (a + b) % &self.params.p
    }

    fn mod_sub(&self, a: &BigUint, b: &BigUint) -> BigUint {
        let p = &self.params.p;
        let a = a % p;
        let b = b % p;
        if a >= b {
            a - b
        } else {
            p + a - b
        }
    }

    fn mod_mul(&self, a: &BigUint, b: &BigUint) -> BigUint {
        (a * b) % &self.params.p
    }

    fn inv_mod_p(&self, x: &BigUint) -> Result<BigUint> {
        FieldBigInt::from_biguint(x.clone())
            .mod_inverse(&self.params.p)
            .map(|f| f.into_biguint())
    }

    pub fn add(&self, p1: &CurvePoint, p2: &CurvePoint) -> Result<CurvePoint> {
        let (x1, y1) = match p1 {
            CurvePoint::Infinity => return Ok(p2.clone()),
            CurvePoint::Affine { x, y } => (x, y),
        };
        let (x2, y2) = match p2 {
            CurvePoint::Infinity => return Ok(p1.clone()),
            CurvePoint::Affine { x, y } => (x, y),
        };

        if x1 == x2 {
            if self.mod_add(y1, y2) == BigUint::zero() {
                return Ok(CurvePoint::Infinity);
            }
            // Doubling: lambda = (3*x1^2 + a) / (2*y1).
            let numerator = self.mod_add(&self.mod_mul(&BigUint::from(3u32), &self.mod_mul(x1, x1)), &self.params.a);
            let denominator = self.mod_add(y1, y1);
            let lambda = self.mod_mul(&numerator, &self.inv_mod_p(&denominator)?);
            let x3 = self.mod_sub(&self.mod_sub(&self.mod_mul(&lambda, &lambda), x1), x2);
            let y3 = self.mod_sub(&self.mod_mul(&lambda, &self.mod_sub(x1, &x3)), y1);
            Ok(CurvePoint::Affine { x: x3, y: y3 })
        } else {
            // Addition: lambda = (y2 - y1) / (x2 - x1).
            let numerator = self.mod_sub(y2, y1);
            let denominator = self.mod_sub(x2, x1);
            let lambda = self.mod_mul(&numerator, &self.inv_mod_p(&denominator)?);
            let x3 = self.mod_sub(&self.mod_sub(&self.mod_mul(&lambda, &lambda), x1), x2);
            let y3 = self.mod_sub(&self.mod_mul(&lambda, &self.mod_sub(x1, &x3)), y1);
            Ok(CurvePoint::Affine { x: x3, y: y3 })
        }
    }

    /// Double-and-add scalar multiplication, LSB first.
    pub fn scalar_mul(&self, scalar: &BigUint, point: &CurvePoint) -> Result<CurvePoint> {
        let mut acc = CurvePoint::Infinity;
        let mut addend = point.clone();
        let bits = scalar.bits();
        for i in 0..bits {
            if scalar.bit(i) {
                acc = self.add(&acc, &addend)?;
            }
            if i + 1 < bits {
                addend = self.add(&addend, &addend)?;
            }
        }
        Ok(acc)
    }
}

/// Asserts the identity the Pedersen hash loop depends on never breaking:
/// the running accumulator's x-coordinate must differ from the x of the
/// point about to be added.
pub fn assert_x_disjoint(acc: &CurvePoint, addend: &CurvePoint, addend_index: usize) -> Result<()> {
    if acc.same_x(addend) {
        return Err(CryptoError::PointCollision(addend_index));
    }
    Ok(())
}
