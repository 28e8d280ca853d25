//! Main chat loop orchestration.
//!
//! Coordinates the conversation lifecycle: provider setup, welcome banner,
//! a bounded backend probe, input loop with streaming responses, and the end-of-session
//! summary.

use std::time::Duration;

use console::style;
use tracing::{info, warn};

use localchat_core::chat::session::{ChatSession, LoopControl};
use localchat_core::llm::box_provider::BoxLlmProvider;
use localchat_infra::llm::ollama::OllamaProvider;
use localchat_types::config::ChatConfig;

use super::banner::print_welcome_banner;
use super::input::{ChatInput, InputEvent};
use super::renderer::ChatRenderer;

/// Upper bound on the startup version check, independent of the connect timeout.
const VERSION_PROBE_TIMEOUT: Duration = Duration::from_secs(2);

/// Log the backend version. Failures and timeouts are only logged; the first
/// chat turn reports connection problems to the user.
async fn probe_backend(provider: &BoxLlmProvider, endpoint: &str, limit: Duration) -> Option<String> {
    match tokio::time::timeout(limit, provider.version()).await {
        Ok(Ok(version)) => {
            info!(version = %version, endpoint = %endpoint, "Ollama reachable");
            Some(version)
        }
        Ok(Err(e)) => {
            warn!(error = %e, endpoint = %endpoint, "Could not query Ollama version");
            None
        }
        Err(_) => {
            warn!(endpoint = %endpoint, timeout_ms = limit.as_millis() as u64, "Ollama version check timed out");
            None
        }
    }
}

/// Run the interactive chat loop until the user quits or the model is missing.
pub async fn run_chat_loop(config: &ChatConfig) -> anyhow::Result<()> {
    let provider = BoxLlmProvider::new(OllamaProvider::from_config(config)?);

    print_welcome_banner(&config.model, &config.raw_endpoint);
    probe_backend(&provider, &config.endpoint, VERSION_PROBE_TIMEOUT).await;

    let mut session = ChatSession::new(config);
    let mut renderer = ChatRenderer::new(config.model.clone());

    let prompt = format!("{} ", style("User:").green().bold());
    let (mut chat_input, _writer) =
        ChatInput::new(prompt).map_err(|e| anyhow::anyhow!("Failed to initialize input: {e}"))?;

    loop {
        let line = match chat_input.read_line().await {
            InputEvent::Message(line) => line,
            InputEvent::Eof | InputEvent::Interrupted => break,
        };

        if session.handle_line(&provider, &line, &mut renderer).await == LoopControl::Exit {
            break;
        }
    }

    println!("{}", style("Session ended.").dim());

    let usage = session.total_usage();
    info!(
        turns = session.turn_count(),
        input_tokens = usage.input_tokens,
        output_tokens = usage.output_tokens,
        history_len = session.history().len(),
        "Session ended"
    );
    Ok(())
}
