//! pizza-review-agent binary.

use std::io::Write;
use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use pizza_review_agent::cli::{Cli, execute};
use pizza_review_agent::{AgentError, DataError, Error};

fn main() -> ExitCode {
    // A missing .env file is fine; the environment may already be set.
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            report(&err);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> anyhow::Result<()> {
    let output = execute(cli)?;
    if !output.is_empty() {
        let mut stdout = std::io::stdout().lock();
        write!(stdout, "{output}").context("failed to write output")?;
        stdout.flush().context("failed to flush output")?;
    }
    Ok(())
}

/// Logs go to stderr so stdout stays clean for answers and JSON.
fn init_tracing(verbose: bool) {
    let default = if verbose { "pizza_review_agent=debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

fn report(err: &anyhow::Error) {
    let mut stderr = std::io::stderr().lock();
    let _ = writeln!(stderr, "Error: {err:#}");
    if let Some(remedy) = err.downcast_ref::<Error>().and_then(remedy) {
        let _ = writeln!(stderr, "\n{remedy}");
    }
}

/// Suggests a fix for startup-fatal errors.
fn remedy(err: &Error) -> Option<&'static str> {
    let data = match err {
        Error::Agent(AgentError::ApiKeyMissing) => {
            return Some(
                "Copy .env.example to .env and add your OpenAI API key, \
                 or export OPENAI_API_KEY.",
            );
        }
        Error::Data(data) | Error::Agent(AgentError::Data(data)) => data,
        _ => return None,
    };
    matches!(data, DataError::NotFound { .. }).then_some(
        "Place the review dataset at data/pizza_reviews.csv, \
         or point --data (or PIZZA_REVIEWS_PATH) at it.",
    )
}
