//! Leading-slash command parsing.

/// A command token and the text that followed it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedCommand {
    pub command: String,
    pub payload: String,
}

/// Parses `text` as a command when, trimmed, it is non-empty and starts with `/`.
///
/// The command is everything up to the first whitespace (the whole text if there is none); the
/// payload is the rest, trimmed at both ends with inner spacing kept.
/// `@botname` suffixes are not stripped: `/start@my_bot` is its own token.
pub fn parse_command(text: &str) -> Option<ParsedCommand> {
    let text = text.trim();
    if !text.starts_with('/') {
        return None;
    }

    let (command, payload) = match text.find(char::is_whitespace) {
        Some(idx) => (&text[..idx], text[idx..].trim()),
        None => (text, ""),
    };

    Some(ParsedCommand {
        command: command.to_string(),
        payload: payload.to_string(),
    })
}
