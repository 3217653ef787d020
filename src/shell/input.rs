use std::io::{BufRead, Write};
use std::path::PathBuf;

use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;
use tracing::{debug, warn};

use crate::error::ShellError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReadOutcome {
    Line(String),
    /// The user cancelled the line (Ctrl-C at the prompt).
    Interrupted,
    EndOfInput,
}

/// Where the controller gets its lines from.
pub trait LineSource {
    /// Shows `prompt` and blocks for one line.
    fn read_line(&mut self, prompt: &str) -> Result<ReadOutcome, ShellError>;

    fn add_history(&mut self, _line: &str) {}

    /// Called once when the shell shuts down.
    fn close(&mut self) -> Result<(), ShellError> {
        Ok(())
    }
}

/// Interactive input through rustyline, with on-disk history.
pub struct EditorInput {
    editor: DefaultEditor,
    history_file: Option<PathBuf>,
}

impl EditorInput {
    pub fn new(history_file: Option<PathBuf>) -> Result<Self, ShellError> {
        let mut editor = DefaultEditor::new()?;

        if let Some(path) = history_file.as_ref().filter(|p| p.exists()) {
            if let Err(e) = editor.load_history(path) {
                warn!("could not load history from {}: {}", path.display(), e);
            }
        }

        Ok(Self {
            editor,
            history_file,
        })
    }
}

impl LineSource for EditorInput {
    fn read_line(&mut self, prompt: &str) -> Result<ReadOutcome, ShellError> {
        match self.editor.readline(prompt) {
            Ok(line) => Ok(ReadOutcome::Line(line)),
            Err(ReadlineError::Interrupted) => Ok(ReadOutcome::Interrupted),
            Err(ReadlineError::Eof) => Ok(ReadOutcome::EndOfInput),
            Err(e) => Err(e.into()),
        }
    }

    fn add_history(&mut self, line: &str) {
        if let Err(e) = self.editor.add_history_entry(line) {
            warn!("could not add to history: {}", e);
        }
    }

    fn close(&mut self) -> Result<(), ShellError> {
        if let Some(path) = &self.history_file {
            self.editor.save_history(path)?;
            debug!("saved history to {}", path.display());
        }
        Ok(())
    }
}

/// Plain line reader for non-terminal input. The prompt goes to `prompt_out`.
pub struct BufReadInput<R, W> {
    reader: R,
    prompt_out: W,
}

impl<R: BufRead, W: Write> BufReadInput<R, W> {
    pub fn new(reader: R, prompt_out: W) -> Self {
        Self { reader, prompt_out }
    }
}

impl<R: BufRead, W: Write> LineSource for BufReadInput<R, W> {
    fn read_line(&mut self, prompt: &str) -> Result<ReadOutcome, ShellError> {
        write!(self.prompt_out, "{}", prompt)?;
        self.prompt_out.flush()?;

        let mut line = String::new();
        if self.reader.read_line(&mut line)? == 0 {
            return Ok(ReadOutcome::EndOfInput);
        }

        if line.ends_with('\n') {
            line.pop();
            if line.ends_with('\r') {
                line.pop();
            }
        }
        Ok(ReadOutcome::Line(line))
    }
}
