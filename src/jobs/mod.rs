pub mod pi;

pub use pi::{run, run_timed, timed, timed_with_deadline, PiRun};
