use crate::commands::dispatcher::CommandDispatcher;
use crate::core::error::SitegenError;

use console::style;
use rustyline::completion::{Completer, FilenameCompleter, Pair};
use rustyline::error::ReadlineError;
use rustyline::highlight::Highlighter;
use rustyline::hint::{Hinter, HistoryHinter};
use rustyline::history::FileHistory;
use rustyline::validate::Validator;
use rustyline::{CompletionType, Config, Context, EditMode, Editor, Helper};
use std::borrow::Cow;
use std::path::PathBuf;

/// Completes slash commands, and file paths for their arguments
pub struct PromptHelper {
    filename_completer: FilenameCompleter,
    command_registry: CommandDispatcher,
    history_hinter: HistoryHinter,
}

impl PromptHelper {
    pub fn new(command_registry: CommandDispatcher) -> Self {
        Self {
            filename_completer: FilenameCompleter::new(),
            command_registry,
            history_hinter: HistoryHinter {},
        }
    }
}

impl Helper for PromptHelper {}

impl Completer for PromptHelper {
    type Candidate = Pair;

    fn complete(
        &self,
        line: &str,
        pos: usize,
        ctx: &Context<'_>,
    ) -> rustyline::Result<(usize, Vec<Pair>)> {
        let command_part = line
            .get(..pos)
            .and_then(|head| head.strip_prefix('/'))
            .filter(|head| !head.contains(' '));
        if let Some(command_part) = command_part {
            let mut matches: Vec<Pair> = self
                .command_registry
                .get_command_names()
                .into_iter()
                .filter(|cmd| cmd.starts_with(command_part))
                .map(|cmd| Pair {
                    display: cmd.clone(),
                    replacement: cmd,
                })
                .collect();
            matches.sort_by(|a, b| a.display.cmp(&b.display));

            return Ok((1, matches));
        }

        self.filename_completer.complete(line, pos, ctx)
    }
}

impl Hinter for PromptHelper {
    type Hint = String;

    fn hint(&self, line: &str, pos: usize, ctx: &Context<'_>) -> Option<String> {
        self.history_hinter.hint(line, pos, ctx)
    }
}

impl Highlighter for PromptHelper {
    fn highlight_hint<'h>(&self, hint: &'h str) -> Cow<'h, str> {
        Cow::Owned(style(hint).dim().to_string())
    }
}

/// Descriptions are free text, so every line is accepted as typed.
impl Validator for PromptHelper {}

fn history_path() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".sitegen")
        .join("input_history.txt")
}

/// Creates a configured rustyline editor
pub fn create_editor(
    command_registry: CommandDispatcher,
) -> Result<Editor<PromptHelper, FileHistory>, SitegenError> {
    let config = Config::builder()
        .history_ignore_space(true)
        .completion_type(CompletionType::List)
        .edit_mode(EditMode::Emacs)
        .build();

    let mut editor = Editor::with_config(config)
        .map_err(|e| SitegenError::Input(format!("Failed to create line editor: {}", e)))?;
    editor.set_helper(Some(PromptHelper::new(command_registry)));
    let _ = editor.load_history(&history_path());

    Ok(editor)
}

/// Reads one line; `None` once the user presses Ctrl-C or Ctrl-D.
pub fn read_input(
    editor: &mut Editor<PromptHelper, FileHistory>,
    label: &str,
) -> Result<Option<String>, SitegenError> {
    let prompt = if cfg!(windows) && std::env::var("PSModulePath").is_ok() {
        format!("{}> ", label)
    } else {
        style(format!("{}> ", label)).bold().cyan().to_string()
    };
    match editor.readline(&prompt) {
        Ok(line) => {
            if !line.trim().is_empty() {
                editor.add_history_entry(&line)?;
            }
            Ok(Some(line))
        }
        Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => {
            println!("Exiting...");
            Ok(None)
        }
        Err(err) => Err(err.into()),
    }
}

pub fn save_history(editor: &mut Editor<PromptHelper, FileHistory>) -> Result<(), SitegenError> {
    let history_path = history_path();
    if let Some(parent) = history_path.parent() {
        if !parent.exists() {
            std::fs::create_dir_all(parent)?;
        }
    }

    editor
        .save_history(&history_path)
        .map_err(|e| SitegenError::Input(format!("Failed to save history: {}", e)))
}
