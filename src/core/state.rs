use tracing::debug;

use super::config::ShellConfig;
use crate::command::Command;
use crate::error::ShellError;
use crate::parser::{CommandParser, RedirectPatterns, WordExpander};
use crate::path::{PathExpander, SearchPath};

/// State that lives for the whole session. The configuration half is fixed
/// after [`ShellState::init`]; the per-line half is cleared by
/// [`ShellState::reset`].
#[derive(Debug)]
pub struct ShellState {
    search_path: SearchPath,
    prompt: String,
    max_line_length: usize,
    patterns: RedirectPatterns,
    words: WordExpander,

    pub(crate) current_line: Option<String>,
    pub(crate) current_command: Option<Command>,
    pub(crate) fatal: bool,
}

impl ShellState {
    pub fn init(config: &ShellConfig) -> Result<Self, ShellError> {
        let patterns = RedirectPatterns::compile()?;
        let expander = PathExpander::with_home(config.home.clone());
        let search_path = SearchPath::from_var(config.path_var.as_deref(), &expander)?;
        let max_line_length = arg_max()?;

        debug!(
            "search path {:?}, line limit {}",
            search_path.dirs(),
            max_line_length
        );

        Ok(Self {
            search_path,
            prompt: config.prompt().to_string(),
            max_line_length,
            patterns,
            words: WordExpander::new(expander),
            current_line: None,
            current_command: None,
            fatal: false,
        })
    }

    /// Drops everything belonging to the current line.
    pub fn reset(&mut self) {
        self.current_line = None;
        self.current_command = None;
        self.fatal = false;
    }

    pub fn search_path(&self) -> &SearchPath {
        &self.search_path
    }

    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    pub fn max_line_length(&self) -> usize {
        self.max_line_length
    }

    pub fn patterns(&self) -> &RedirectPatterns {
        &self.patterns
    }

    pub fn words(&self) -> &WordExpander {
        &self.words
    }

    pub fn parser(&self) -> CommandParser<'_> {
        CommandParser::new(&self.patterns, &self.words)
    }

    pub fn current_line(&self) -> Option<&str> {
        self.current_line.as_deref()
    }

    pub fn current_command(&self) -> Option<&Command> {
        self.current_command.as_ref()
    }

    pub fn is_fatal(&self) -> bool {
        self.fatal
    }

    #[cfg(test)]
    pub(crate) fn set_max_line_length(&mut self, limit: usize) {
        self.max_line_length = limit;
    }
}

fn arg_max() -> Result<usize, ShellError> {
    // SAFETY: sysconf has no memory-safety preconditions.
    let value = unsafe { libc::sysconf(libc::_SC_ARG_MAX) };
    if value <= 0 {
        return Err(ShellError::ArgMaxUnavailable);
    }
    Ok(value as usize)
}
