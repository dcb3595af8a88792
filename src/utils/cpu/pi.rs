use lazy_static::lazy_static;
use num_bigint::BigInt;
use tracing::debug;

use crate::config::EngineConfig;
use crate::errors::{PiError, PiResult};
use crate::utils::cpu::splitting::{binary_split, parallel_split, Triple, C3_OVER_24_U64};
use crate::utils::cpu::sqrt::fixed_sqrt;
use crate::worker_pool::ThreadPool;

/// Extra terms on top of the estimate; raise it if a digit count ever comes up short.
pub const TERM_SAFETY_MARGIN: u64 = 1;

const SQRT_RADICAND: u32 = 10005;
const SCALE_FACTOR: u32 = 426880;

lazy_static! {
    /// Decimal digits gained per Chudnovsky term: log10(C^3 / 24 / 72) ~ 14.18.
    pub static ref DIGITS_PER_TERM: f64 = (C3_OVER_24_U64 as f64 / 72.0).log10();
}

/// Number of series terms needed for `digits` correct decimals.
pub fn term_count(digits: usize) -> u64 {
    (digits as f64 / *DIGITS_PER_TERM) as u64 + TERM_SAFETY_MARGIN
}

fn validate_digits(digits: usize) -> PiResult<()> {
    if digits == 0 {
        return Err(PiError::InvalidArgument("digits must be greater than 0".into()));
    }
    Ok(())
}

fn scale_exponent(digits: usize) -> PiResult<u32> {
    u32::try_from(digits).map_err(|_| {
        PiError::ResourceExhausted(format!("{} digits exceeds the representable scale", digits))
    })
}

/// `floor(π · 10^digits)` from an already evaluated series for `[0, N)`.
fn pi_from_series(series: Triple, digits: usize) -> PiResult<BigInt> {
    let one = BigInt::from(10u32).pow(scale_exponent(digits)?);
    let sqrt_c = fixed_sqrt(&(BigInt::from(SQRT_RADICAND) * &one), &one)?;
    Ok((series.q * SCALE_FACTOR * sqrt_c) / series.t)
}

/// Inserts the decimal point after the integer digit and keeps `digits` decimals.
pub fn render_digits(scaled: &BigInt, digits: usize) -> String {
    let mut pi_str = scaled.to_str_radix(10);

    if pi_str.len() < 2 {
        pi_str.insert(0, '0');
    }
    pi_str.insert(1, '.');

    let max_len = 2 + digits;
    if pi_str.len() > max_len {
        pi_str.truncate(max_len);
    }
    pi_str
}

/// Chudnovsky / binary-splitting π engine.
///
/// Holds no per-call state: the optional pool is only used to evaluate
/// disjoint sub-ranges of the series, which are recombined on the caller thread.
#[derive(Clone)]
pub struct PiEngine {
    config: EngineConfig,
    pool: Option<ThreadPool>,
}

impl PiEngine {
    pub fn new(config: EngineConfig) -> PiResult<Self> {
        let pool = if config.workers > 1 {
            Some(ThreadPool::new("pi-split", config.workers)?)
        } else {
            None
        };
        Ok(PiEngine { config, pool })
    }

    pub fn sequential() -> Self {
        PiEngine {
            config: EngineConfig::sequential(),
            pool: None,
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn is_parallel(&self) -> bool {
        self.pool.is_some()
    }

    fn evaluate_series(&self, terms: u64) -> PiResult<Triple> {
        match &self.pool {
            Some(pool) if terms >= self.config.parallel_min_terms => {
                debug!(terms, workers = pool.total_workers(), "parallel binary splitting");
                parallel_split(pool, 0, terms, pool.total_workers())
            }
            _ => {
                debug!(terms, "sequential binary splitting");
                Ok(binary_split(0, terms))
            }
        }
    }

    /// `π · 10^digits`, truncated, using exactly `10^digits` as the fixed-point scale.
    pub fn pi_fixed_point(&self, digits: usize) -> PiResult<BigInt> {
        validate_digits(digits)?;
        scale_exponent(digits)?;
        let terms = term_count(digits);
        let series = self.evaluate_series(terms)?;
        pi_from_series(series, digits)
    }

    /// `"3."` followed by `digits` correct decimals of π.
    pub fn compute_digits(&self, digits: usize) -> PiResult<String> {
        validate_digits(digits)?;
        if digits > self.config.max_digits {
            return Err(PiError::ResourceExhausted(format!(
                "{} digits requested, limit is {}",
                digits, self.config.max_digits
            )));
        }
        let working = digits.checked_add(self.config.guard_digits).ok_or_else(|| {
            PiError::ResourceExhausted(format!("{} digits exceeds the representable scale", digits))
        })?;

        debug!(
            digits,
            working,
            terms = term_count(working),
            parallel = self.is_parallel(),
            "computing pi"
        );
        let scaled = self.pi_fixed_point(working)?;
        Ok(render_digits(&scaled, digits))
    }
}

/// Sequential `compute_pi_digits` with the default guard digits and limits.
pub fn compute_pi_digits(digits: usize) -> PiResult<String> {
    PiEngine::sequential().compute_digits(digits)
}
