use std::fs::File;
use std::io::BufReader;
use std::process::ExitCode;

use showdown::{play_rounds, OutputFormat, ShowdownConfig, ShowdownError, Tally};
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn main() -> ExitCode {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "showdown=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let config = ShowdownConfig::from_env().with_path_arg(std::env::args().nth(1));
    info!(path = %config.rounds_path.display(), output = %config.output, "Starting showdown");

    match run(&config) {
        Ok(tally) => match report(&tally, config.output) {
            Ok(()) => ExitCode::SUCCESS,
            Err(e) => {
                error!(error = %e, "Failed to render report");
                ExitCode::FAILURE
            }
        },
        Err(e) => {
            error!(error = %e, path = %config.rounds_path.display(), "Showdown failed");
            ExitCode::FAILURE
        }
    }
}

fn run(config: &ShowdownConfig) -> Result<Tally, ShowdownError> {
    let file = File::open(&config.rounds_path)?;
    play_rounds(BufReader::new(file))
}

fn report(tally: &Tally, output: OutputFormat) -> Result<(), serde_json::Error> {
    match output {
        OutputFormat::Text => println!("Player 1 wins {} times", tally.player_one_wins),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(tally)?),
    }
    Ok(())
}
