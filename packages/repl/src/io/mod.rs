//! The seam between the REPL loop and whatever drives it.
//!
//! [`ReplCore`](crate::repl::ReplCore) talks only to an [`IoHost`]. The
//! terminal host reads with Reedline; tests script a [`TestHost`].

pub mod types;

#[cfg(test)]
pub mod test_host;

pub use types::*;

#[cfg(test)]
pub use test_host::TestHost;

/// A host could not read or write.
///
/// The core stops the session on the first one; it never retries.
#[derive(Debug, thiserror::Error)]
pub enum IoError {
    #[error("I/O error: {0}")]
    Io(String),
}

/// Input and output for one REPL session.
///
/// Each turn the core sends a prompt, calls [`wait_for_input`], then polls
/// [`read_signal`] before [`read_input`]. A turn with neither a signal nor
/// a line is skipped.
///
/// Hosts are driven from a single thread and need not be `Send`.
///
/// [`wait_for_input`]: IoHost::wait_for_input
/// [`read_signal`]: IoHost::read_signal
/// [`read_input`]: IoHost::read_input
pub trait IoHost {
    /// Block until a line or a signal is available.
    fn wait_for_input(&mut self) -> Result<(), IoError>;

    /// The pending line, if any.
    fn read_input(&mut self) -> Result<Option<InputLine>, IoError>;

    /// The pending Ctrl+C or Ctrl+D, if any.
    fn read_signal(&mut self) -> Result<Option<Signal>, IoError>;

    /// Print one message. Styling other than the error prefix is already in
    /// the text.
    fn write_output(&mut self, output: Output) -> Result<(), IoError>;

    /// Set what the next prompt shows.
    fn write_prompt(&mut self, config: PromptConfig) -> Result<(), IoError>;

    /// Called after each command's output and before the session ends.
    fn flush(&mut self) -> Result<(), IoError> {
        Ok(())
    }
}
