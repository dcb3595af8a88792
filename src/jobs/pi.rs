use std::collections::HashMap;
use std::time::{Duration, Instant};
use tracing::info;

use crate::errors::{PiError, PiResult};
use crate::utils::cpu::pi::{term_count, PiEngine};
use crate::utils::timeout::run_with_timeout;

/// One timed π computation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PiRun {
    pub digits: usize,
    pub terms: u64,
    pub value: String,
    pub elapsed: Duration,
}

impl PiRun {
    /// Job report; `with_result: false` leaves out the digit string itself.
    pub fn to_json(&self, with_result: bool) -> serde_json::Value {
        let mut report = serde_json::json!({
            "digits": self.digits,
            "algo": "chudnovsky",
            "terms": self.terms,
            "elapsed_ms": self.elapsed.as_millis() as u64,
        });
        if with_result {
            report["result"] = serde_json::Value::from(self.value.as_str());
        }
        report
    }
}

/// Parses a requested digit count, rejecting zero and negative values.
pub fn parse_digit_count(raw: &str) -> PiResult<usize> {
    let value: i128 = raw
        .trim()
        .parse()
        .map_err(|_| PiError::InvalidArgument(format!("'{}' is not an integer digit count", raw)))?;
    if value <= 0 {
        return Err(PiError::InvalidArgument(format!(
            "digits must be greater than 0, got {}",
            value
        )));
    }
    usize::try_from(value).map_err(|_| {
        PiError::ResourceExhausted(format!("{} digits exceeds the addressable range", value))
    })
}

/// Times a single call into the engine.
pub fn timed(engine: &PiEngine, digits: usize) -> PiResult<PiRun> {
    let start = Instant::now();
    let value = engine.compute_digits(digits)?;
    let elapsed = start.elapsed();
    info!(digits, elapsed_ms = elapsed.as_millis() as u64, "computed pi");

    Ok(PiRun {
        digits,
        terms: term_count(digits + engine.config().guard_digits),
        value,
        elapsed,
    })
}

/// Like [`timed`], but gives up once `timeout` (or the engine's configured timeout) expires.
pub fn timed_with_deadline(
    engine: &PiEngine,
    digits: usize,
    timeout: Option<Duration>,
) -> PiResult<PiRun> {
    match timeout.or(engine.config().timeout) {
        Some(limit) => {
            let engine = engine.clone();
            run_with_timeout(limit, move || timed(&engine, digits))?
        }
        None => timed(engine, digits),
    }
}

/// Job entry point: `digits` is required, `timeout_ms` optional.
pub fn run_timed(engine: &PiEngine, params: &HashMap<String, String>) -> PiResult<PiRun> {
    let digits = params
        .get("digits")
        .ok_or_else(|| PiError::InvalidArgument("missing 'digits' parameter".into()))
        .and_then(|v| parse_digit_count(v))?;

    let timeout = match params.get("timeout_ms") {
        Some(raw) => {
            let ms = raw.trim().parse::<u64>().map_err(|_| {
                PiError::InvalidArgument(format!("invalid 'timeout_ms' parameter: {}", raw))
            })?;
            (ms > 0).then(|| Duration::from_millis(ms))
        }
        None => None,
    };

    timed_with_deadline(engine, digits, timeout)
}

/// [`run_timed`] rendered as a JSON object.
pub fn run(engine: &PiEngine, params: &HashMap<String, String>) -> PiResult<String> {
    Ok(run_timed(engine, params)?.to_json(true).to_string())
}
