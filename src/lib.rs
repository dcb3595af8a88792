//! π to arbitrary precision with the Chudnovsky series.
//!
//! The series is evaluated by binary splitting over exact big integers
//! (`num-bigint`), optionally spreading disjoint sub-ranges across a worker
//! pool, and combined with a fixed-point Newton-Raphson square root.

pub mod config;
pub mod errors;
pub mod jobs;
pub mod utils;
pub mod worker_pool;

pub use config::EngineConfig;
pub use errors::{PiError, PiResult};
pub use utils::cpu::pi::{compute_pi_digits, term_count, PiEngine};
pub use utils::cpu::splitting::{binary_split, parallel_split, Triple};
pub use utils::cpu::sqrt::{fixed_sqrt, newton_step};
