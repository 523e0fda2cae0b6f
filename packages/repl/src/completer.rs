use reedline::{Completer, Span, Suggestion};

use crate::commands::COMMANDS;

/// Completes command names at the start of the line
#[derive(Debug, Default)]
pub struct ReplCompleter;

impl ReplCompleter {
    pub fn new() -> Self {
        Self
    }
}

impl Completer for ReplCompleter {
    fn complete(&mut self, line: &str, pos: usize) -> Vec<Suggestion> {
        let line_to_pos = &line[..pos];
        let start = line_to_pos.len() - line_to_pos.trim_start().len();
        let prefix = &line_to_pos[start..];

        // Only the command word is completed
        if prefix.contains(char::is_whitespace) {
            return Vec::new();
        }

        COMMANDS
            .iter()
            .filter(|&&(cmd, _, _)| !cmd.is_empty() && cmd.starts_with(prefix))
            .map(|&(cmd, _, desc)| Suggestion {
                value: cmd.to_string(),
                description: Some(desc.to_string()),
                style: None,
                extra: None,
                span: Span::new(start, pos),
                append_whitespace: true,
                match_indices: None,
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn values(line: &str) -> Vec<String> {
        ReplCompleter::new()
            .complete(line, line.len())
            .into_iter()
            .map(|s| s.value)
            .collect()
    }

    #[test]
    fn completes_command_prefix() {
        assert_eq!(values("se"), vec!["set", "sell"]);
        assert_eq!(values("rm"), vec!["rm", "rm-all"]);
    }

    #[test]
    fn empty_line_offers_everything() {
        let all = values("");
        assert!(all.contains(&"list".to_string()));
        assert!(all.contains(&"discard".to_string()));
        assert!(!all.contains(&String::new()));
    }

    #[test]
    fn arguments_are_not_completed() {
        assert!(values("sell 1").is_empty());
        assert!(values("edit ").is_empty());
    }

    #[test]
    fn span_covers_the_typed_prefix() {
        let suggestions = ReplCompleter::new().complete("  ad", 4);
        assert_eq!(suggestions.len(), 1);
        assert_eq!(suggestions[0].span, Span::new(2, 4));
        assert!(suggestions[0].description.is_some());
    }
}
