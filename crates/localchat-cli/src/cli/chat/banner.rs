//! Welcome banner display for chat sessions.

use console::style;

use localchat_core::chat::input::EXIT_COMMAND;

/// Print the welcome banner at the start of a chat session.
///
/// Shows the model and the endpoint exactly as configured.
pub fn print_welcome_banner(model: &str, endpoint: &str) {
    println!("{}", style("=== Local AI Chat ===").cyan().bold());
    println!("{} {}", style("Model:").bold(), model);
    println!("{} {}", style("Endpoint:").bold(), endpoint);
    println!("{}", style(format!("Type '{EXIT_COMMAND}' to quit.")).dim());
    println!();
}
