use std::env;
use std::thread;
use std::time::Duration;

pub const DEFAULT_PARALLEL_MIN_TERMS: u64 = 256;
pub const DEFAULT_GUARD_DIGITS: usize = 10;
pub const DEFAULT_MAX_DIGITS: usize = 20_000_000;

/// Knobs for [`crate::PiEngine`], normally read from the environment (or `.env`).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EngineConfig {
    /// Worker threads for parallel splitting; `1` keeps everything on the caller thread.
    pub workers: usize,
    /// Series length below which splitting stays sequential.
    pub parallel_min_terms: u64,
    /// Extra digits computed and then discarded to absorb truncation error.
    pub guard_digits: usize,
    /// Largest digit count accepted before any allocation happens.
    pub max_digits: usize,
    /// Wall-clock limit applied by the job harness; `None` waits forever.
    pub timeout: Option<Duration>,
}

fn parse_env_var<T: std::str::FromStr>(name: &str, default: T) -> T {
    env::var(name)
        .ok()
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(default)
}

pub fn available_workers() -> usize {
    thread::available_parallelism().map(|n| n.get()).unwrap_or(1)
}

impl Default for EngineConfig {
    fn default() -> Self {
        EngineConfig {
            workers: available_workers(),
            parallel_min_terms: DEFAULT_PARALLEL_MIN_TERMS,
            guard_digits: DEFAULT_GUARD_DIGITS,
            max_digits: DEFAULT_MAX_DIGITS,
            timeout: None,
        }
    }
}

impl EngineConfig {
    /// Single-threaded configuration with the default limits.
    pub fn sequential() -> Self {
        EngineConfig {
            workers: 1,
            ..Self::default()
        }
    }

    pub fn from_env() -> Self {
        let defaults = Self::default();
        let timeout_ms: u64 = parse_env_var("PI_TIMEOUT_MS", 0);

        EngineConfig {
            workers: parse_env_var("PI_WORKERS", defaults.workers).max(1),
            parallel_min_terms: parse_env_var("PI_PARALLEL_MIN_TERMS", defaults.parallel_min_terms),
            guard_digits: parse_env_var("PI_GUARD_DIGITS", defaults.guard_digits),
            max_digits: parse_env_var("PI_MAX_DIGITS", defaults.max_digits),
            timeout: (timeout_ms > 0).then(|| Duration::from_millis(timeout_ms)),
        }
    }
}
