use nu_ansi_term::{Color, Style};
use reedline::{Highlighter, StyledText};

use crate::commands::is_command;

/// Colours the command word, resource arguments and JSON payloads
#[derive(Debug, Default)]
pub struct ReplHighlighter;

impl ReplHighlighter {
    pub fn new() -> Self {
        Self
    }
}

impl Highlighter for ReplHighlighter {
    fn highlight(&self, line: &str, _cursor: usize) -> StyledText {
        let mut styled = StyledText::new();
        if line.is_empty() {
            return styled;
        }

        let (command, rest) = match line.find(char::is_whitespace) {
            Some(pos) => line.split_at(pos),
            None => (line, ""),
        };

        let cmd_style = if is_command(command) {
            Style::new().bold().fg(Color::Cyan)
        } else {
            Style::new().fg(Color::Red)
        };
        styled.push((cmd_style, command.to_string()));

        if rest.is_empty() {
            return styled;
        }

        let resource = Style::new().fg(Color::Yellow);
        let json = Style::new().fg(Color::Green);
        match command.to_lowercase().as_str() {
            "add" | "set" => match rest.find('{') {
                Some(json_pos) => {
                    let (before, payload) = rest.split_at(json_pos);
                    let before_style = if before.trim().is_empty() {
                        Style::new()
                    } else {
                        resource
                    };
                    styled.push((before_style, before.to_string()));
                    styled.push((json, payload.to_string()));
                }
                None => styled.push((resource, rest.to_string())),
            },
            "show" | "get" | "sell" | "inc" | "dec" | "rm" | "kind" | "edit" => {
                styled.push((resource, rest.to_string()));
            }
            _ => styled.push((Style::new(), rest.to_string())),
        }

        styled
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn colours(line: &str) -> Vec<(String, Option<Color>)> {
        ReplHighlighter::new()
            .highlight(line, 0)
            .buffer
            .into_iter()
            .map(|(style, text)| (text, style.foreground))
            .collect()
    }

    #[test]
    fn empty_line_is_empty() {
        assert!(colours("").is_empty());
    }

    #[test]
    fn known_commands_are_bold_cyan() {
        let styled = ReplHighlighter::new().highlight("list", 0);
        assert_eq!(styled.buffer.len(), 1);
        assert_eq!(styled.buffer[0].0.foreground, Some(Color::Cyan));
        assert!(styled.buffer[0].0.is_bold);

        assert_eq!(colours("RM-ALL")[0].1, Some(Color::Cyan));
        assert_eq!(colours("q")[0].1, Some(Color::Cyan));
    }

    #[test]
    fn unknown_commands_are_red() {
        assert_eq!(colours("frobnicate"), vec![("frobnicate".to_string(), Some(Color::Red))]);
    }

    #[test]
    fn resource_arguments_are_yellow() {
        assert_eq!(
            colours("sell 3"),
            vec![
                ("sell".to_string(), Some(Color::Cyan)),
                (" 3".to_string(), Some(Color::Yellow)),
            ]
        );
        assert_eq!(colours("show products")[1].1, Some(Color::Yellow));
    }

    #[test]
    fn set_splits_id_from_payload() {
        assert_eq!(
            colours(r#"set 2 {"quantity": 4}"#),
            vec![
                ("set".to_string(), Some(Color::Cyan)),
                (" 2 ".to_string(), Some(Color::Yellow)),
                (r#"{"quantity": 4}"#.to_string(), Some(Color::Green)),
            ]
        );
    }

    #[test]
    fn add_payload_is_green() {
        let styled = colours(r#"add {"name": "Widget"}"#);
        assert_eq!(styled.len(), 3);
        assert_eq!(styled[1], (" ".to_string(), None));
        assert_eq!(styled[2].1, Some(Color::Green));
    }

    #[test]
    fn editor_text_is_plain() {
        assert_eq!(colours("name Blue Widget")[1], (" Blue Widget".to_string(), None));
    }
}
