//! CLI command implementations.

use std::io::{self, Write as _};
use std::path::Path;

use tokio::io::BufReader;
use tracing::debug;

use crate::agent::{AgentConfig, ReviewAgent};
use crate::cli::output::{OutputFormat, format_query_result, format_statistics};
use crate::cli::parser::Cli;
use crate::error::{AgentError, CommandError, Result};
use crate::reviews::{DatasetStatistics, ReviewLoader};

/// Executes the CLI command.
///
/// `--stats` prints the dataset overview without contacting any service.
/// A question on the command line is answered once; otherwise an interactive
/// session opens with the dataset statistics, reads from stdin and writes to
/// stdout, and the returned string is empty.
///
/// # Errors
///
/// Returns an error if the configuration is incomplete, the dataset is
/// unavailable, or a service call fails.
pub fn execute(cli: &Cli) -> Result<String> {
    let format = OutputFormat::parse(&cli.format);

    if cli.stats {
        return cmd_stats(&cli.data, format);
    }

    let config = agent_config(cli)?;
    debug!(?config, "resolved configuration");
    let question = cli.question();

    let rt = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(|e| CommandError::ExecutionFailed(format!("Failed to create async runtime: {e}")))?;

    rt.block_on(run(cli, &config, question.as_deref(), format))
}

async fn run(
    cli: &Cli,
    config: &AgentConfig,
    question: Option<&str>,
    format: OutputFormat,
) -> Result<String> {
    let mut agent = ReviewAgent::from_config(config, ReviewLoader::new(&cli.data))?;
    agent.initialize().await?;

    match question {
        Some(question) => cmd_ask(&agent, question, cli, format).await,
        None => {
            let header = session_header(&agent.statistics()?)?;
            cmd_interactive(&agent, &header).await
        }
    }
}

/// Builds the agent configuration: CLI flags first, then environment, then defaults.
fn agent_config(cli: &Cli) -> std::result::Result<AgentConfig, AgentError> {
    let mut builder = AgentConfig::builder();
    if let Some(dir) = &cli.index_dir {
        builder = builder.index_dir(dir);
    }
    if cli.no_persist {
        builder = builder.persist(false);
    }
    if let Some(k) = cli.top_k {
        builder = builder.top_k(k);
    }
    if let Some(model) = &cli.embedding_model {
        builder = builder.embedding_model(model);
    }
    if let Some(model) = &cli.generation_model {
        builder = builder.generation_model(model);
    }
    if let Some(dir) = &cli.prompt_dir {
        builder = builder.prompt_dir(dir);
    }
    builder.from_env().build()
}

fn cmd_stats(data: &Path, format: OutputFormat) -> Result<String> {
    let mut loader = ReviewLoader::new(data);
    let stats = loader.statistics()?;
    let samples = loader.documents()?;
    format_statistics(&stats, &samples, format)
}

async fn cmd_ask(
    agent: &ReviewAgent,
    question: &str,
    cli: &Cli,
    format: OutputFormat,
) -> Result<String> {
    let result = agent.query(question).await?;
    format_query_result(&result, cli.sources, cli.verbose, format)
}

/// Statistics shown before the interactive banner, without sample reviews.
fn session_header(stats: &DatasetStatistics) -> Result<String> {
    let mut header = format_statistics(stats, &[], OutputFormat::Text)?;
    header.push('\n');
    Ok(header)
}

async fn cmd_interactive(agent: &ReviewAgent, header: &str) -> Result<String> {
    let input = BufReader::new(tokio::io::stdin());
    let mut output = io::stdout();
    write!(output, "{header}")?;
    let answered = agent
        .interactive_loop(input, &mut output, shutdown_signal())
        .await?;
    debug!(answered, "interactive session ended");
    Ok(String::new())
}

/// Resolves on Ctrl-C. Never resolves if the handler cannot be installed.
async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_err() {
        std::future::pending::<()>().await;
    }
}
