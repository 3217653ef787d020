use std::env;
use std::path::PathBuf;

use crate::flags::Flags;

pub const DEFAULT_PROMPT: &str = "$ ";
const HISTORY_FILE: &str = ".lash_history";

/// Everything the shell takes from its environment, read once at startup.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ShellConfig {
    pub path_var: Option<String>,
    pub prompt_var: Option<String>,
    pub home: Option<PathBuf>,
    pub history_file: Option<PathBuf>,
    pub quiet: bool,
}

impl ShellConfig {
    pub fn from_env(flags: &Flags) -> Self {
        let home = dirs::home_dir();
        let history_file = match flags.get_value("history") {
            Some(path) => Some(PathBuf::from(path)),
            None => home.as_ref().map(|h| h.join(HISTORY_FILE)),
        };

        Self {
            path_var: env::var("PATH").ok(),
            prompt_var: env::var("PS1").ok(),
            home,
            history_file,
            quiet: flags.is_set("quiet"),
        }
    }

    pub fn prompt(&self) -> &str {
        self.prompt_var.as_deref().unwrap_or(DEFAULT_PROMPT)
    }
}
