//! In-memory [`IoHost`] for driving the REPL loop from tests.
//!
//! A test queues the lines a user would type, runs
//! [`ReplCore::run`](crate::repl::ReplCore::run) to completion, and then
//! inspects what was printed and which prompt was shown last. No terminal
//! is involved, so the tests run headless.

use std::collections::VecDeque;

use super::{InputLine, IoError, IoHost, Output, OutputStyle, PromptConfig, Signal};

/// Scripted host: queued lines and signals go in, printed output is kept.
///
/// Signals are consumed before lines, matching the order in which the REPL
/// polls them. A script must end with `exit` or [`Signal::Eof`]; the core
/// keeps asking for lines until one of them arrives.
#[derive(Debug, Default)]
pub struct TestHost {
    inputs: VecDeque<String>,
    signals: VecDeque<Signal>,
    /// Every [`Output`] in the order it was written.
    outputs: Vec<Output>,
    /// Only the latest prompt is kept.
    last_prompt: Option<PromptConfig>,
    flushes: usize,
}

impl TestHost {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue one line as if the user typed it and pressed Enter.
    pub fn queue_input(&mut self, line: impl Into<String>) {
        self.inputs.push_back(line.into());
    }

    pub fn queue_inputs(&mut self, lines: impl IntoIterator<Item = impl Into<String>>) {
        self.inputs.extend(lines.into_iter().map(Into::into));
    }

    /// Queue Ctrl+C or Ctrl+D. It is read before any pending line.
    pub fn queue_signal(&mut self, signal: Signal) {
        self.signals.push_back(signal);
    }

    pub fn output(&self) -> &[Output] {
        &self.outputs
    }

    /// Every printed text, concatenated.
    pub fn output_text(&self) -> String {
        self.outputs.iter().map(|o| o.text.as_str()).collect()
    }

    /// [`output_text`](Self::output_text) with ANSI escapes removed.
    pub fn plain_output_text(&self) -> String {
        strip_ansi(&self.output_text())
    }

    /// Texts written with `style`, in order.
    pub fn output_with_style(&self, style: OutputStyle) -> Vec<&str> {
        self.outputs
            .iter()
            .filter(|o| o.style == style)
            .map(|o| o.text.as_str())
            .collect()
    }

    pub fn errors(&self) -> Vec<&str> {
        self.output_with_style(OutputStyle::Error)
    }

    /// The prompt the host would show if the session were still running.
    pub fn last_prompt(&self) -> Option<&PromptConfig> {
        self.last_prompt.as_ref()
    }

    pub fn flush_count(&self) -> usize {
        self.flushes
    }

    pub fn has_pending_input(&self) -> bool {
        !self.inputs.is_empty()
    }
}

impl IoHost for TestHost {
    fn wait_for_input(&mut self) -> Result<(), IoError> {
        Ok(())
    }

    fn read_input(&mut self) -> Result<Option<InputLine>, IoError> {
        Ok(self.inputs.pop_front().map(|line| InputLine { line }))
    }

    fn read_signal(&mut self) -> Result<Option<Signal>, IoError> {
        Ok(self.signals.pop_front())
    }

    fn write_output(&mut self, output: Output) -> Result<(), IoError> {
        self.outputs.push(output);
        Ok(())
    }

    fn write_prompt(&mut self, config: PromptConfig) -> Result<(), IoError> {
        self.last_prompt = Some(config);
        Ok(())
    }

    fn flush(&mut self) -> Result<(), IoError> {
        self.flushes += 1;
        Ok(())
    }
}

/// Drop `ESC [ ... <letter>` sequences.
fn strip_ansi(text: &str) -> String {
    let mut plain = String::with_capacity(text.len());
    let mut chars = text.chars();
    while let Some(c) = chars.next() {
        if c == '\u{1b}' {
            for next in chars.by_ref() {
                if next.is_ascii_alphabetic() {
                    break;
                }
            }
        } else {
            plain.push(c);
        }
    }
    plain
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn inputs_come_back_in_order() {
        let mut host = TestHost::new();
        host.queue_inputs(["list", "exit"]);

        assert_eq!(host.read_input().unwrap().unwrap().line, "list");
        assert_eq!(host.read_input().unwrap().unwrap().line, "exit");
        assert!(host.read_input().unwrap().is_none());
        assert!(!host.has_pending_input());
    }

    #[test]
    fn signals_come_back_in_order() {
        let mut host = TestHost::new();
        host.queue_signal(Signal::Interrupt);
        host.queue_signal(Signal::Eof);

        assert!(matches!(host.read_signal().unwrap(), Some(Signal::Interrupt)));
        assert!(matches!(host.read_signal().unwrap(), Some(Signal::Eof)));
        assert!(host.read_signal().unwrap().is_none());
    }

    #[test]
    fn outputs_are_filtered_by_style() {
        let mut host = TestHost::new();
        host.write_output(Output::normal("rows\n")).unwrap();
        host.write_output(Output::error("no such product")).unwrap();
        host.write_output(Output::info("Goodbye!")).unwrap();

        assert_eq!(host.output().len(), 3);
        assert_eq!(host.errors(), vec!["no such product"]);
        assert_eq!(host.output_with_style(OutputStyle::Info), vec!["Goodbye!"]);
        assert_eq!(host.output_text(), "rows\nno such productGoodbye!");
    }

    #[test]
    fn prompt_and_flushes_are_recorded() {
        let mut host = TestHost::new();
        assert!(host.last_prompt().is_none());

        let prompt = PromptConfig {
            collection: "products".to_string(),
            product_count: 2,
            editor: Some("new*".to_string()),
        };
        host.write_prompt(prompt.clone()).unwrap();
        host.flush().unwrap();
        host.flush().unwrap();

        assert_eq!(host.last_prompt(), Some(&prompt));
        assert_eq!(host.flush_count(), 2);
    }

    #[test]
    fn ansi_is_stripped() {
        let mut host = TestHost::new();
        let painted = nu_ansi_term::Color::Green.bold().paint("Saved").to_string();
        host.write_output(Output::normal(format!("{} products/1", painted)))
            .unwrap();

        assert_eq!(host.plain_output_text(), "Saved products/1");
    }
}
