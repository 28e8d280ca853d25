//! Classification of raw input lines.

/// What the loop should do with one line of user input.
#[derive(Debug, PartialEq, Eq)]
pub enum InputAction {
    /// End the session.
    Quit,
    /// Send this text to the model as a user turn.
    Send(String),
}

/// Sentinel that ends the session, matched case-insensitively.
pub const EXIT_COMMAND: &str = "exit";

/// Classify a line read from the terminal.
///
/// Blank or whitespace-only input and the word `exit` (any case) quit.
/// Everything else is sent verbatim, surrounding whitespace included.
pub fn classify_input(line: &str) -> InputAction {
    let trimmed = line.trim();
    if trimmed.is_empty() || trimmed.eq_ignore_ascii_case(EXIT_COMMAND) {
        InputAction::Quit
    } else {
        InputAction::Send(line.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_and_blank_quit() {
        assert_eq!(classify_input(""), InputAction::Quit);
        assert_eq!(classify_input("   \t"), InputAction::Quit);
    }

    #[test]
    fn test_exit_any_case() {
        assert_eq!(classify_input("exit"), InputAction::Quit);
        assert_eq!(classify_input("EXIT"), InputAction::Quit);
        assert_eq!(classify_input("Exit "), InputAction::Quit);
    }

    #[test]
    fn test_exit_inside_sentence_is_sent() {
        assert_eq!(
            classify_input("how do I exit vim?"),
            InputAction::Send("how do I exit vim?".to_string())
        );
    }

    #[test]
    fn test_regular_message() {
        assert_eq!(classify_input("hello"), InputAction::Send("hello".to_string()));
    }
}
