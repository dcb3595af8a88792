use std::collections::HashMap;
use std::process;

use chudnovsky_pi::{jobs, EngineConfig, PiEngine, PiError};
use clap::{ArgAction, Parser};
use dotenv::dotenv;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

/// Compute π with the Chudnovsky series and binary splitting.
#[derive(Parser, Debug)]
#[command(name = "chudnovsky-pi", version, about)]
struct Cli {
    /// Decimal digits to compute; each value is computed and timed separately
    #[arg(
        value_name = "DIGITS",
        env = "PI_DIGITS",
        value_delimiter = ',',
        default_value = "1000",
        allow_negative_numbers = true
    )]
    digits: Vec<String>,

    /// Worker threads for parallel binary splitting (1 = sequential)
    #[arg(short, long)]
    workers: Option<usize>,

    /// Abandon a computation after this many milliseconds
    #[arg(long, value_name = "MS")]
    timeout_ms: Option<u64>,

    /// Print timings only, without the digits themselves
    #[arg(short, long)]
    summary: bool,

    /// Increase log verbosity (-d info, -dd debug, -ddd trace)
    #[arg(short, long, action = ArgAction::Count)]
    debug: u8,
}

fn setup_logging(verbosity: u8) {
    let level = match verbosity {
        0 => LevelFilter::WARN,
        1 => LevelFilter::INFO,
        2 => LevelFilter::DEBUG,
        _ => LevelFilter::TRACE,
    };
    let filter = EnvFilter::builder()
        .with_default_directive(level.into())
        .from_env_lossy();

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn run(cli: &Cli) -> Result<(), PiError> {
    let mut config = EngineConfig::from_env();
    if let Some(workers) = cli.workers {
        config.workers = workers.max(1);
    }
    let engine = PiEngine::new(config)?;

    for raw in &cli.digits {
        let mut params = HashMap::new();
        params.insert("digits".to_string(), raw.clone());
        if let Some(ms) = cli.timeout_ms {
            params.insert("timeout_ms".to_string(), ms.to_string());
        }

        let run = jobs::run_timed(&engine, &params)?;
        println!("{}", run.to_json(!cli.summary));
    }
    Ok(())
}

fn main() {
    dotenv().ok();
    let cli = Cli::parse();
    setup_logging(cli.debug);

    if let Err(e) = run(&cli) {
        eprintln!("Error: {}", e);
        process::exit(e.exit_code());
    }
}
