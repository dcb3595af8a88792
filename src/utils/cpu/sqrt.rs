use num_bigint::{BigInt, Sign};
use num_traits::{FromPrimitive, One, Signed, ToPrimitive, Zero};

use crate::errors::{PiError, PiResult};

/// Scale used for the floating-point seed.
const FLOAT_SEED_SCALE: u64 = 10_000_000_000_000_000;

/// One Newton-Raphson step for the integer square root of `n_one`.
pub fn newton_step(x: &BigInt, n_one: &BigInt) -> BigInt {
    (x + n_one / x) / 2u32
}

/// Square root of the fixed-point value `n / one`, returned at the same scale.
///
/// The result is `floor(sqrt(n * one))`, i.e. the truncated fixed-point root.
pub fn fixed_sqrt(n: &BigInt, one: &BigInt) -> PiResult<BigInt> {
    if n.is_negative() {
        return Err(PiError::InvalidArgument(
            "square root of a negative value is undefined".into(),
        ));
    }
    if one.sign() != Sign::Plus {
        return Err(PiError::InvalidArgument("fixed-point scale must be positive".into()));
    }
    if n.is_zero() {
        return Ok(BigInt::zero());
    }

    let n_one = n * one;
    let seed = float_seed(n, one).unwrap_or_else(|| power_of_two_seed(&n_one));

    // From any positive seed the first step lands at or above floor(sqrt(n_one)),
    // after which the sequence only decreases until it reaches the root.
    let mut x = newton_step(&seed, &n_one);
    loop {
        let next = newton_step(&x, &n_one);
        if next >= x {
            return Ok(x);
        }
        x = next;
    }
}

fn float_seed(n: &BigInt, one: &BigInt) -> Option<BigInt> {
    let k = BigInt::from(FLOAT_SEED_SCALE);
    let k_float = FLOAT_SEED_SCALE as f64;

    let n_float = ((n * &k) / one).to_f64()? / k_float;
    let root = BigInt::from_f64(k_float * n_float.sqrt())?;
    let x = (root * one) / k;
    if x.is_positive() {
        Some(x)
    } else {
        None
    }
}

fn power_of_two_seed(n_one: &BigInt) -> BigInt {
    let half_bits = (n_one.bits() + 1) / 2;
    BigInt::one() << half_bits as usize
}
