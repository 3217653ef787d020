use std::path::PathBuf;

use super::PathExpander;
use crate::error::ShellError;

/// Ordered directories probed when a program name has no `/` in it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchPath {
    dirs: Vec<PathBuf>,
}

impl SearchPath {
    pub fn new(dirs: Vec<PathBuf>) -> Self {
        Self { dirs }
    }

    /// Splits a `PATH`-style value on `:`. Empty entries are dropped and each
    /// remaining entry gets tilde expansion.
    pub fn parse(value: &str, expander: &PathExpander) -> Result<Self, ShellError> {
        let dirs = value
            .split(':')
            .filter(|entry| !entry.is_empty())
            .map(|entry| expander.expand(entry))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { dirs })
    }

    pub fn from_var(value: Option<&str>, expander: &PathExpander) -> Result<Self, ShellError> {
        match value {
            Some(value) => Self::parse(value, expander),
            None => Ok(Self::default()),
        }
    }

    pub fn dirs(&self) -> &[PathBuf] {
        &self.dirs
    }

    pub fn is_empty(&self) -> bool {
        self.dirs.is_empty()
    }

    /// Every `dir/name` to try, in search order.
    pub fn candidates<'a>(&'a self, name: &'a str) -> impl Iterator<Item = PathBuf> + 'a {
        self.dirs.iter().map(move |dir| dir.join(name))
    }
}
