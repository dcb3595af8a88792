use chudnovsky_pi::{
    binary_split, compute_pi_digits, fixed_sqrt, jobs::pi::parse_digit_count, newton_step,
    EngineConfig, PiEngine, PiError,
};
use num_bigint::BigInt;
use num_traits::{One, Zero};
use rstest::rstest;

const PI_100: &str = "3.1415926535897932384626433832795028841971693993751058209749445923078164062862089986280348253421170679";

/// arctan(1/x) at the given scale, by direct series summation.
fn arctan_inv(x: u64, one: &BigInt) -> BigInt {
    let x2 = BigInt::from(x * x);
    let mut power = one / x;
    let mut sum = power.clone();
    let mut k = 1u64;
    loop {
        power = power / &x2;
        if power.is_zero() {
            return sum;
        }
        let term = &power / (2 * k + 1);
        if k % 2 == 1 {
            sum -= term;
        } else {
            sum += term;
        }
        k += 1;
    }
}

/// π via Machin's formula, an independent oracle for the Chudnovsky engine.
fn machin_pi(digits: usize) -> String {
    let guard = 12u32;
    let one = BigInt::from(10u32).pow(digits as u32 + guard);
    let pi = arctan_inv(5, &one) * 16u32 - arctan_inv(239, &one) * 4u32;
    let scaled = pi / BigInt::from(10u32).pow(guard);
    let s = scaled.to_string();
    format!("{}.{}", &s[..1], &s[1..])
}

#[test]
fn test_first_hundred_digits() {
    assert_eq!(compute_pi_digits(100).unwrap(), PI_100);
}

#[test]
fn test_thousand_digits_match_machin() {
    let chudnovsky = compute_pi_digits(1000).unwrap();
    assert_eq!(chudnovsky.len(), 1002);
    assert_eq!(chudnovsky, machin_pi(1000));
}

#[test]
fn test_scenario_fifteen_digits() {
    assert!(compute_pi_digits(15).unwrap().starts_with("3.14159265358979"));
}

#[rstest]
#[case(1, 2)]
#[case(13, 14)]
#[case(14, 15)]
#[case(28, 29)]
#[case(99, 250)]
#[case(500, 1200)]
fn test_leading_digits_are_stable(#[case] d1: usize, #[case] d2: usize) {
    let short = compute_pi_digits(d1).unwrap();
    let long = compute_pi_digits(d2).unwrap();
    assert_eq!(short.len(), d1 + 2);
    assert_eq!(&long[..d1 + 2], short);
}

#[rstest]
#[case(0)]
#[case(-1)]
#[case(-1000)]
fn test_non_positive_digits_are_rejected(#[case] digits: i64) {
    let err = parse_digit_count(&digits.to_string()).unwrap_err();
    assert!(matches!(err, PiError::InvalidArgument(_)), "got {err:?}");
    if digits == 0 {
        assert!(matches!(compute_pi_digits(0), Err(PiError::InvalidArgument(_))));
    }
}

#[rstest]
#[case(10)]
#[case(37)]
#[case(200)]
fn test_half_split_recombines_exactly(#[case] n: u64) {
    let whole = binary_split(0, n);
    let half = n / 2;
    assert_eq!(binary_split(0, half).combine(binary_split(half, n)), whole);
}

#[rstest]
#[case(1, 5)]
#[case(12345, 30)]
#[case(31_415_926_535, 60)]
fn test_sqrt_of_square_is_identity(#[case] x: u64, #[case] scale: u32) {
    let one = BigInt::from(10u32).pow(scale);
    let x = BigInt::from(x);
    let n = &x * &x * &one;
    let root = fixed_sqrt(&n, &one).unwrap();
    assert_eq!(root, &x * &one);
    assert_eq!(newton_step(&root, &(&n * &one)), root);
}

#[test]
fn test_sqrt_edges() {
    let one = BigInt::from(10u32).pow(10);
    assert_eq!(fixed_sqrt(&BigInt::zero(), &one).unwrap(), BigInt::zero());
    assert!(matches!(
        fixed_sqrt(&-BigInt::one(), &one),
        Err(PiError::InvalidArgument(_))
    ));
}

#[rstest]
#[case(2, 16)]
#[case(4, 1)]
#[case(8, 64)]
fn test_parallel_engine_agrees(#[case] workers: usize, #[case] parallel_min_terms: u64) {
    let engine = PiEngine::new(EngineConfig {
        workers,
        parallel_min_terms,
        ..EngineConfig::default()
    })
    .unwrap();
    assert_eq!(engine.compute_digits(2000).unwrap(), compute_pi_digits(2000).unwrap());
}

#[test]
fn test_calls_are_independent() {
    let engine = PiEngine::sequential();
    assert!(engine.compute_digits(0).is_err());
    assert_eq!(engine.compute_digits(100).unwrap(), PI_100);
    assert!(engine.compute_digits(0).is_err());
    assert_eq!(engine.compute_digits(100).unwrap(), PI_100);
}
