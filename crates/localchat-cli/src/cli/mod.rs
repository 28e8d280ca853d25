//! CLI argument definitions for the `localchat` binary.
//!
//! Every setting can come from a flag or an `OLLAMA_*` environment
//! variable; flags win. There are no subcommands.

pub mod chat;

use clap::Parser;

use localchat_types::config::ChatConfig;

/// Chat with a local Ollama model from the terminal.
#[derive(Parser, Debug)]
#[command(name = "localchat", version, about, long_about = None)]
pub struct Cli {
    /// Suppress all log output except errors.
    #[arg(long)]
    pub quiet: bool,

    /// Detailed output (-v for verbose, -vv for debug/trace).
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Model to chat with (default: llama3.2:1b).
    #[arg(short, long, env = "OLLAMA_MODEL")]
    pub model: Option<String>,

    /// Ollama server URL (default: http://localhost:11434).
    #[arg(short, long, env = "OLLAMA_ENDPOINT")]
    pub endpoint: Option<String>,

    /// System prompt sent as the first message of every request.
    #[arg(long, env = "OLLAMA_SYSTEM_PROMPT")]
    pub system_prompt: Option<String>,

    /// Number of user/assistant turns kept in history (default: 10).
    ///
    /// Values that are not positive integers fall back to the default.
    #[arg(long, env = "OLLAMA_MAX_TURNS")]
    pub max_turns: Option<String>,

    /// Sampling temperature passed to the model.
    #[arg(long, env = "OLLAMA_TEMPERATURE")]
    pub temperature: Option<f64>,
}

impl Cli {
    /// Tracing filter directive for the requested verbosity.
    pub fn log_filter(&self) -> &'static str {
        match self.verbose {
            0 if self.quiet => "error",
            0 => "warn",
            1 => "info,localchat=debug",
            _ => "trace",
        }
    }

    /// Resolve the session configuration, applying defaults and normalization.
    pub fn into_config(self) -> ChatConfig {
        ChatConfig::from_raw(
            self.model,
            self.endpoint,
            self.system_prompt,
            self.max_turns.as_deref(),
            self.temperature,
        )
    }
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("localchat").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_flags_build_config() {
        let config = parse(&[
            "-m",
            "phi3",
            "-e",
            "http://gpu-box:11434",
            "--system-prompt",
            "Be terse.",
            "--max-turns",
            "3",
            "--temperature",
            "0.4",
        ])
        .into_config();

        assert_eq!(config.model, "phi3");
        assert_eq!(config.raw_endpoint, "http://gpu-box:11434");
        assert_eq!(config.endpoint, "http://gpu-box:11434/");
        assert_eq!(config.system_prompt.as_deref(), Some("Be terse."));
        assert_eq!(config.max_turns, 3);
        assert_eq!(config.temperature, Some(0.4));
    }

    #[test]
    fn test_invalid_max_turns_falls_back() {
        assert_eq!(parse(&["--max-turns", "lots"]).into_config().max_turns, 10);
        assert_eq!(parse(&["--max-turns=-2"]).into_config().max_turns, 10);
    }

    #[test]
    fn test_log_filter_levels() {
        assert_eq!(parse(&[]).log_filter(), "warn");
        assert_eq!(parse(&["--quiet"]).log_filter(), "error");
        assert_eq!(parse(&["-v"]).log_filter(), "info,localchat=debug");
        assert_eq!(parse(&["-vv"]).log_filter(), "trace");
        assert_eq!(parse(&["-v", "--quiet"]).log_filter(), "info,localchat=debug");
    }
}
