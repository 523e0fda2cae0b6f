//! Terminal host built on Reedline.
//!
//! Provides line editing in Vi or Emacs mode, command completion,
//! highlighting and a history file.

use std::borrow::Cow;
use std::io::{self, Write};
use std::path::PathBuf;

use nu_ansi_term::{Color, Style};
use reedline::{
    default_emacs_keybindings, default_vi_insert_keybindings, default_vi_normal_keybindings,
    ColumnarMenu, DefaultHinter, EditCommand, Emacs, FileBackedHistory, KeyCode, KeyModifiers,
    Keybindings, MenuBuilder, Prompt, PromptEditMode, PromptHistorySearch,
    PromptHistorySearchStatus, PromptViMode, Reedline, ReedlineEvent, ReedlineMenu,
    Signal as ReedlineSignal, Vi,
};

use crate::completer::ReplCompleter;
use crate::highlighter::ReplHighlighter;
use crate::io::{InputLine, IoError, IoHost, Output, OutputStyle, PromptConfig, Signal};

const COMPLETION_MENU: &str = "completion_menu";
const HISTORY_SIZE: usize = 1000;

/// Environment variable that forces an edit mode (`vi` or `emacs`).
pub const EDIT_MODE_VAR: &str = "STOCKFS_EDIT_MODE";

/// Line editing style.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditMode {
    Vi,
    Emacs,
}

impl EditMode {
    /// Pick a mode from `STOCKFS_EDIT_MODE`, then `EDITOR`/`VISUAL`, then
    /// `.inputrc`. Emacs otherwise.
    pub fn detect() -> Self {
        if let Ok(mode) = std::env::var(EDIT_MODE_VAR) {
            match mode.to_lowercase().as_str() {
                "vi" | "vim" => return EditMode::Vi,
                "emacs" => return EditMode::Emacs,
                other => tracing::warn!(mode = other, "ignoring unknown {}", EDIT_MODE_VAR),
            }
        }

        let editor_is_vi = ["EDITOR", "VISUAL"].iter().any(|var| {
            std::env::var(var).is_ok_and(|editor| names_vi(&editor))
        });
        if editor_is_vi || inputrc_selects_vi() {
            EditMode::Vi
        } else {
            EditMode::Emacs
        }
    }
}

fn names_vi(editor: &str) -> bool {
    let program = editor
        .rsplit('/')
        .next()
        .unwrap_or(editor)
        .split_whitespace()
        .next()
        .unwrap_or("")
        .to_lowercase();
    matches!(program.as_str(), "vi" | "vim" | "nvim")
}

fn inputrc_selects_vi() -> bool {
    let candidates = [
        std::env::var("INPUTRC").ok().map(PathBuf::from),
        dirs::home_dir().map(|p| p.join(".inputrc")),
        Some(PathBuf::from("/etc/inputrc")),
    ];

    candidates
        .into_iter()
        .flatten()
        .filter_map(|path| std::fs::read_to_string(path).ok())
        .any(|content| {
            content.lines().any(|line| {
                let words: Vec<&str> = line.split_whitespace().collect();
                words == ["set", "editing-mode", "vi"]
            })
        })
}

fn history_path() -> Option<PathBuf> {
    dirs::data_local_dir().map(|p| p.join("stockfs").join("history.txt"))
}

fn with_tab_completion(mut keybindings: Keybindings) -> Keybindings {
    keybindings.add_binding(
        KeyModifiers::NONE,
        KeyCode::Tab,
        ReedlineEvent::UntilFound(vec![
            ReedlineEvent::Menu(COMPLETION_MENU.to_string()),
            ReedlineEvent::MenuNext,
        ]),
    );
    keybindings
}

/// Interactive host reading from the terminal.
pub struct TerminalHost {
    line_editor: Reedline,
    pending_input: Option<InputLine>,
    pending_signal: Option<Signal>,
    prompt: PromptConfig,
}

impl TerminalHost {
    pub fn new(mode: EditMode) -> io::Result<Self> {
        let hinter = DefaultHinter::default().with_style(Style::new().fg(Color::LightGray).dimmed());
        let menu = ColumnarMenu::default()
            .with_name(COMPLETION_MENU)
            .with_text_style(Style::new().fg(Color::Cyan))
            .with_selected_text_style(Style::new().fg(Color::Black).on(Color::Cyan).bold());

        let edit_mode: Box<dyn reedline::EditMode> = match mode {
            EditMode::Vi => Box::new(Vi::new(
                with_tab_completion(default_vi_insert_keybindings()),
                default_vi_normal_keybindings(),
            )),
            EditMode::Emacs => {
                let mut keybindings = with_tab_completion(default_emacs_keybindings());
                keybindings.add_binding(
                    KeyModifiers::CONTROL,
                    KeyCode::Char('d'),
                    ReedlineEvent::Edit(vec![EditCommand::Clear]),
                );
                Box::new(Emacs::new(keybindings))
            }
        };

        let mut line_editor = Reedline::create()
            .with_completer(Box::new(ReplCompleter::new()))
            .with_highlighter(Box::new(ReplHighlighter::new()))
            .with_hinter(Box::new(hinter))
            .with_menu(ReedlineMenu::EngineCompleter(Box::new(menu)))
            .with_edit_mode(edit_mode);

        if let Some(path) = history_path() {
            if let Some(parent) = path.parent() {
                if let Err(e) = std::fs::create_dir_all(parent) {
                    tracing::debug!(path = %parent.display(), error = %e, "no history directory");
                }
            }
            match FileBackedHistory::with_file(HISTORY_SIZE, path) {
                Ok(history) => line_editor = line_editor.with_history(Box::new(history)),
                Err(e) => tracing::debug!(error = %e, "history disabled"),
            }
        }

        Ok(Self {
            line_editor,
            pending_input: None,
            pending_signal: None,
            prompt: PromptConfig::default(),
        })
    }
}

impl IoHost for TerminalHost {
    fn wait_for_input(&mut self) -> Result<(), IoError> {
        let prompt = TerminalPrompt(&self.prompt);

        match self.line_editor.read_line(&prompt) {
            Ok(ReedlineSignal::Success(line)) => self.pending_input = Some(InputLine { line }),
            Ok(ReedlineSignal::CtrlC) => self.pending_signal = Some(Signal::Interrupt),
            Ok(ReedlineSignal::CtrlD) => self.pending_signal = Some(Signal::Eof),
            Err(e) => return Err(IoError::Io(format!("Reedline error: {}", e))),
        }

        Ok(())
    }

    fn read_input(&mut self) -> Result<Option<InputLine>, IoError> {
        Ok(self.pending_input.take())
    }

    fn read_signal(&mut self) -> Result<Option<Signal>, IoError> {
        Ok(self.pending_signal.take())
    }

    fn write_output(&mut self, output: Output) -> Result<(), IoError> {
        match output.style {
            OutputStyle::Normal => println!("{}", output.text),
            OutputStyle::Error => println!("{} {}", Color::Red.bold().paint("Error:"), output.text),
            OutputStyle::Info | OutputStyle::Banner => {
                println!("{}", Color::Cyan.paint(&output.text))
            }
        }
        Ok(())
    }

    fn write_prompt(&mut self, config: PromptConfig) -> Result<(), IoError> {
        self.prompt = config;
        Ok(())
    }

    fn flush(&mut self) -> Result<(), IoError> {
        io::stdout().flush().map_err(|e| IoError::Io(e.to_string()))
    }
}

/// Renders `products (3) [edit 2*] >`.
struct TerminalPrompt<'a>(&'a PromptConfig);

impl Prompt for TerminalPrompt<'_> {
    fn render_prompt_left(&self) -> Cow<'_, str> {
        let config = self.0;
        let mut left = format!(
            "{} {}",
            Color::Blue.bold().paint(&config.collection),
            Color::Yellow.paint(format!("({})", config.product_count))
        );
        if let Some(editor) = &config.editor {
            left.push_str(&format!(" {}", Color::Magenta.paint(format!("[edit {}]", editor))));
        }
        Cow::Owned(left)
    }

    fn render_prompt_right(&self) -> Cow<'_, str> {
        Cow::Borrowed("")
    }

    fn render_prompt_indicator(&self, edit_mode: PromptEditMode) -> Cow<'_, str> {
        let indicator = match edit_mode {
            PromptEditMode::Vi(PromptViMode::Normal) => Color::Blue.bold().paint("[N]>"),
            PromptEditMode::Vi(PromptViMode::Insert) => Color::Green.bold().paint("[I]>"),
            PromptEditMode::Custom(s) => return Cow::Owned(format!(" ({})> ", s)),
            _ => Color::Green.bold().paint(">"),
        };
        Cow::Owned(format!(" {} ", indicator))
    }

    fn render_prompt_multiline_indicator(&self) -> Cow<'_, str> {
        Cow::Borrowed(": ")
    }

    fn render_prompt_history_search_indicator(
        &self,
        history_search: PromptHistorySearch,
    ) -> Cow<'_, str> {
        let prefix = match history_search.status {
            PromptHistorySearchStatus::Passing => "",
            PromptHistorySearchStatus::Failing => "failing ",
        };
        Cow::Owned(format!("({}reverse-search: {}) ", prefix, history_search.term))
    }
}
