//! Terminal output for a chat turn.
//!
//! `ChatRenderer` is the terminal [`TurnObserver`]: it shows a spinner while
//! waiting for the first fragment, prints fragments raw as they stream in,
//! then a dim stats footer. Failures are printed to stderr with guidance.

use std::io::Write;
use std::time::Duration;

use console::style;
use indicatif::{ProgressBar, ProgressStyle};

use localchat_core::chat::session::{TurnObserver, TurnSummary};
use localchat_types::llm::LlmError;

/// Streaming reply printer bound to one model.
pub struct ChatRenderer {
    model: String,
    spinner: Option<ProgressBar>,
    first_token_received: bool,
}

impl ChatRenderer {
    pub fn new(model: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            spinner: None,
            first_token_received: false,
        }
    }

    /// Print a single streaming token (raw, no formatting).
    pub fn print_streaming_token(&self, token: &str) {
        print!("{token}");
        let _ = std::io::stdout().flush();
    }

    /// Print the stats footer after a reply.
    ///
    /// Format: "| {tokens} tokens . {time}s . {model}"
    pub fn print_stats_footer(&self, tokens: u32, response_ms: u64, model: &str) {
        let seconds = response_ms as f64 / 1000.0;
        println!(
            "  {} {} tokens {} {:.1}s {} {}",
            style("|").dim(),
            style(tokens).dim(),
            style("\u{00b7}").dim(),
            style(seconds).dim(),
            style("\u{00b7}").dim(),
            style(model).dim(),
        );
    }

    fn start_spinner(&mut self) {
        let spinner = ProgressBar::new_spinner();
        let spinner_style = ProgressStyle::default_spinner()
            .template("{spinner:.cyan} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner());
        spinner.set_style(spinner_style);
        spinner.set_message("thinking...");
        spinner.enable_steady_tick(Duration::from_millis(80));
        self.spinner = Some(spinner);
    }

    fn clear_spinner(&mut self) {
        if let Some(spinner) = self.spinner.take() {
            spinner.finish_and_clear();
        }
    }

    fn print_reply_prefix(&mut self) {
        if !self.first_token_received {
            self.first_token_received = true;
            print!("{} ", style("AI:").cyan().bold());
            let _ = std::io::stdout().flush();
        }
    }
}

impl TurnObserver for ChatRenderer {
    fn on_start(&mut self) {
        self.first_token_received = false;
        self.start_spinner();
    }

    fn on_delta(&mut self, text: &str) {
        self.clear_spinner();
        self.print_reply_prefix();
        self.print_streaming_token(text);
    }

    fn on_complete(&mut self, summary: &TurnSummary) {
        self.clear_spinner();
        self.print_reply_prefix();
        println!();
        self.print_stats_footer(
            summary.usage.output_tokens,
            summary.elapsed.as_millis() as u64,
            &self.model,
        );
        println!();
    }

    fn on_error(&mut self, error: &LlmError) {
        self.clear_spinner();
        if self.first_token_received {
            println!();
        }

        if error.is_model_not_found() {
            let [headline, hint, next] = model_not_found_guidance(&self.model);
            eprintln!("{} {headline}", style("!").red().bold());
            eprintln!("  {}", style(hint).yellow());
            eprintln!("  {}", style(next).dim());
        } else {
            eprintln!(
                "{} {}",
                style("!").red().bold(),
                request_failed_message(error, &self.model)
            );
        }
        println!();
    }
}

/// Guidance shown when the configured model is not installed.
pub fn model_not_found_guidance(model: &str) -> [String; 3] {
    [
        format!("Model '{model}' is not available in Ollama."),
        format!("Run: ollama pull {model}"),
        "Then start this app again.".to_string(),
    ]
}

/// Message shown for any recoverable request failure.
pub fn request_failed_message(error: &LlmError, model: &str) -> String {
    format!("Request failed: {error}. Ensure Ollama is running and model '{model}' exists.")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_model_not_found_guidance() {
        let lines = model_not_found_guidance("llama3.2:1b");
        assert_eq!(lines[0], "Model 'llama3.2:1b' is not available in Ollama.");
        assert_eq!(lines[1], "Run: ollama pull llama3.2:1b");
        assert_eq!(lines[2], "Then start this app again.");
    }

    #[test]
    fn test_request_failed_message() {
        let err = LlmError::Provider {
            message: "HTTP request failed: connection refused".into(),
        };
        assert_eq!(
            request_failed_message(&err, "phi3"),
            "Request failed: provider error: HTTP request failed: connection refused. \
             Ensure Ollama is running and model 'phi3' exists."
        );
    }

    #[test]
    fn test_on_start_resets_prefix_state() {
        let mut renderer = ChatRenderer::new("m");
        renderer.first_token_received = true;
        renderer.on_start();
        assert!(!renderer.first_token_received);
        assert!(renderer.spinner.is_some());
        renderer.clear_spinner();
        assert!(renderer.spinner.is_none());
    }
}
