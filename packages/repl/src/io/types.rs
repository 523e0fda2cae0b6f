//! Messages exchanged between the REPL core and its host.
//!
//! Everything here is plain data. The core produces [`Output`] and
//! [`PromptConfig`]; the host produces [`InputLine`] and [`Signal`]. The
//! serde derives keep the messages printable as JSON when a session is
//! scripted or replayed.

use serde::{Deserialize, Serialize};

/// A line typed by the user, without its trailing newline.
///
/// Blank lines are passed through; the core decides to skip them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InputLine {
    pub line: String,
}

/// A key the host turns into a signal instead of a line.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "signal", rename_all = "lowercase")]
pub enum Signal {
    /// Ctrl+C. Abandons the current line; the session keeps going.
    Interrupt,
    /// Ctrl+D. Ends the session.
    Eof,
}

/// Text for the host to print.
///
/// `text` is written verbatim, so multi-line tables and forms carry their own
/// newlines. The host only adds decoration for [`OutputStyle::Error`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Output {
    pub text: String,
    #[serde(default)]
    pub style: OutputStyle,
}

impl Output {
    fn styled(text: impl Into<String>, style: OutputStyle) -> Self {
        Self {
            text: text.into(),
            style,
        }
    }

    /// Command output: rows, forms, JSON.
    pub fn normal(text: impl Into<String>) -> Self {
        Self::styled(text, OutputStyle::Normal)
    }

    /// A rejected command or a failed write.
    pub fn error(text: impl Into<String>) -> Self {
        Self::styled(text, OutputStyle::Error)
    }

    /// A one-line status message.
    pub fn info(text: impl Into<String>) -> Self {
        Self::styled(text, OutputStyle::Info)
    }

    /// The startup greeting.
    pub fn banner(text: impl Into<String>) -> Self {
        Self::styled(text, OutputStyle::Banner)
    }
}

/// How the host should render an [`Output`].
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum OutputStyle {
    /// Printed as is. Command output already carries its ANSI styling.
    #[default]
    Normal,
    /// Command failure; the host adds a red prefix.
    Error,
    /// Status line such as "Goodbye!".
    Info,
    /// Printed once at startup.
    Banner,
}

/// What the host shows in the prompt before the next line.
///
/// The core sends a fresh one every turn, so a write that changes the row
/// count or an editor that gains unsaved changes shows up on the next prompt.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PromptConfig {
    /// Collection the REPL serves.
    pub collection: String,
    /// Rows currently in the list view.
    pub product_count: usize,
    /// Editor target (`new` or a row id), with `*` when there are unsaved
    /// changes. `None` when no editor is open.
    pub editor: Option<String>,
}

/// Why [`ReplCore::run`](crate::repl::ReplCore::run) returned.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExitReason {
    /// `exit`, `quit` or `q`.
    UserExit,
    /// Ctrl+D.
    Eof,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn messages_serialize_as_tagged_json() {
        assert_eq!(
            serde_json::to_value(Signal::Interrupt).unwrap(),
            json!({"signal": "interrupt"})
        );
        assert_eq!(
            serde_json::to_value(Output::error("no such product")).unwrap(),
            json!({"text": "no such product", "style": "error"})
        );

        let prompt = PromptConfig {
            collection: "products".to_string(),
            product_count: 4,
            editor: None,
        };
        let back: PromptConfig =
            serde_json::from_value(serde_json::to_value(&prompt).unwrap()).unwrap();
        assert_eq!(back, prompt);
    }

    #[test]
    fn style_defaults_to_normal() {
        let output: Output = serde_json::from_value(json!({"text": "3 products"})).unwrap();
        assert_eq!(output.style, OutputStyle::Normal);
        assert!(matches!(
            serde_json::from_value::<Signal>(json!({"signal": "eof"})).unwrap(),
            Signal::Eof
        ));
    }
}
