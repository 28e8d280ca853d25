//! localchat terminal entry point.
//!
//! Binary name: `localchat`
//!
//! Parses CLI arguments and environment, initializes logging, then runs the
//! interactive chat loop against the configured Ollama server.

mod cli;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use cli::Cli;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Logs go to stderr so they never interleave with streamed replies
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(cli.log_filter()))
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let config = cli.into_config();
    cli::chat::loop_runner::run_chat_loop(&config).await
}
