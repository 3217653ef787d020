use crate::error::ShellError;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathExpander {
    home: Option<PathBuf>,
}

impl Default for PathExpander {
    fn default() -> Self {
        Self::new()
    }
}

impl PathExpander {
    pub fn new() -> Self {
        Self {
            home: dirs::home_dir(),
        }
    }

    pub fn with_home(home: Option<PathBuf>) -> Self {
        Self { home }
    }

    pub fn expand(&self, path: &str) -> Result<PathBuf, ShellError> {
        if path.starts_with('~') {
            self.expand_tilde(path)
        } else {
            Ok(Path::new(path).to_path_buf())
        }
    }

    /// Like [`expand`](Self::expand) but for text that stays a string.
    pub fn expand_str(&self, path: &str) -> Result<String, ShellError> {
        if !self.is_home_path(path) {
            return Ok(path.to_string());
        }
        Ok(self.expand(path)?.to_string_lossy().into_owned())
    }

    fn expand_tilde(&self, path: &str) -> Result<PathBuf, ShellError> {
        if path.len() == 1 {
            self.home_dir()
        } else {
            let without_tilde = &path[1..];
            if let Some(stripped) = without_tilde.strip_prefix('/') {
                let mut home_path = self.home_dir()?;
                for part in stripped.split('/') {
                    if !part.is_empty() {
                        home_path.push(part);
                    }
                }
                Ok(home_path)
            } else {
                // ~user is left alone
                Ok(Path::new(path).to_path_buf())
            }
        }
    }

    pub fn is_home_path(&self, path: &str) -> bool {
        path == "~" || path.starts_with("~/")
    }

    pub fn home_dir(&self) -> Result<PathBuf, ShellError> {
        self.home.clone().ok_or(ShellError::HomeDirNotFound)
    }
}
