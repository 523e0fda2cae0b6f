//! Platform-independent REPL core.
//!
//! This module contains the main REPL loop logic.

use crate::commands::{self, CommandResult};
use crate::io::{ExitReason, IoError, IoHost, Output, PromptConfig, Signal};
use crate::store_context::InventoryContext;

use stockfs_core_store::EditorState;

/// The platform-independent REPL core.
pub struct ReplCore {
    ctx: InventoryContext,
}

impl ReplCore {
    pub fn new(ctx: InventoryContext) -> Self {
        Self { ctx }
    }

    /// Run the REPL loop, reading/writing through the provided I/O host.
    pub fn run(&mut self, io: &mut impl IoHost) -> Result<ExitReason, IoError> {
        io.write_output(Output::banner(BANNER))?;

        loop {
            io.write_prompt(self.prompt())?;
            io.wait_for_input()?;

            if let Some(signal) = io.read_signal()? {
                match signal {
                    Signal::Eof => {
                        io.write_output(Output::info("Goodbye!"))?;
                        io.flush()?;
                        return Ok(ExitReason::Eof);
                    }
                    Signal::Interrupt => {
                        io.write_output(Output::info("^C (use 'exit' to quit)"))?;
                        continue;
                    }
                }
            }

            let Some(input) = io.read_input()? else {
                continue;
            };

            match commands::execute(&input.line, &mut self.ctx) {
                CommandResult::Ok { display: None } => {}
                CommandResult::Ok {
                    display: Some(output),
                } => io.write_output(Output::normal(output))?,
                CommandResult::Error(msg) => {
                    tracing::debug!(command = %input.line, error = %msg, "command failed");
                    io.write_output(Output::error(msg))?
                }
                CommandResult::Help => io.write_output(Output::normal(commands::format_help()))?,
                CommandResult::Exit => {
                    if self.ctx.session().is_some_and(|s| s.is_dirty()) {
                        io.write_output(Output::info("Unsaved editor changes were discarded."))?;
                    }
                    io.write_output(Output::info("Goodbye!"))?;
                    io.flush()?;
                    return Ok(ExitReason::UserExit);
                }
            }

            io.flush()?;
        }
    }

    pub fn context(&self) -> &InventoryContext {
        &self.ctx
    }

    pub fn context_mut(&mut self) -> &mut InventoryContext {
        &mut self.ctx
    }

    fn prompt(&self) -> PromptConfig {
        let editor = self.ctx.session().map(|session| {
            let target = match session.state() {
                EditorState::New => "new".to_string(),
                EditorState::Editing(id) => id.to_string(),
            };
            if session.is_dirty() {
                format!("{}*", target)
            } else {
                target
            }
        });

        PromptConfig {
            collection: self.ctx.resolver().config().collection.clone(),
            product_count: self.ctx.list().len(),
            editor,
        }
    }
}

const BANNER: &str = r#"
     _             _     __
 ___| |_ ___   ___| | __/ _|___
/ __| __/ _ \ / __| |/ / |_/ __|
\__ \ || (_) | (__|   <|  _\__ \
|___/\__\___/ \___|_|\_\_| |___/

Type 'help' for available commands, 'exit' to quit.
"#;
