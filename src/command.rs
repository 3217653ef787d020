use std::fmt;

/// Which standard stream a redirection applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stream {
    Stdin,
    Stdout,
    Stderr,
}

impl Stream {
    pub fn fd(self) -> i32 {
        match self {
            Stream::Stdin => libc::STDIN_FILENO,
            Stream::Stdout => libc::STDOUT_FILENO,
            Stream::Stderr => libc::STDERR_FILENO,
        }
    }
}

impl fmt::Display for Stream {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Stream::Stdin => write!(f, "standard input"),
            Stream::Stdout => write!(f, "standard output"),
            Stream::Stderr => write!(f, "standard error"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RedirectMode {
    Truncate,
    Append,
}

impl RedirectMode {
    /// `>>` appends, anything else truncates.
    pub fn from_operator(op: &str) -> Self {
        if op == ">>" {
            RedirectMode::Append
        } else {
            RedirectMode::Truncate
        }
    }

    pub fn operator(self) -> &'static str {
        match self {
            RedirectMode::Truncate => ">",
            RedirectMode::Append => ">>",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputTarget {
    pub path: String,
    pub mode: RedirectMode,
}

impl OutputTarget {
    pub fn new(path: impl Into<String>, mode: RedirectMode) -> Self {
        Self {
            path: path.into(),
            mode,
        }
    }
}

/// One input line, parsed. Lives for a single trip around the read loop.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Command {
    pub raw_line: String,
    pub program_name: String,
    pub argv: Vec<String>,
    pub stdin_target: Option<String>,
    pub stdout_target: Option<OutputTarget>,
    pub stderr_target: Option<OutputTarget>,
    pub exit_code: Option<i32>,
}

impl Command {
    pub fn new(raw_line: impl Into<String>) -> Self {
        Self {
            raw_line: raw_line.into(),
            ..Self::default()
        }
    }

    pub fn args(&self) -> &[String] {
        self.argv.get(1..).unwrap_or(&[])
    }

    pub fn has_redirection(&self) -> bool {
        self.stdin_target.is_some() || self.stdout_target.is_some() || self.stderr_target.is_some()
    }
}

// Renders operators in input, output, error order so the line parses back
// to the same command.
impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.argv.join(" "))?;
        if let Some(path) = &self.stdin_target {
            write!(f, " < {}", path)?;
        }
        if let Some(target) = &self.stdout_target {
            write!(f, " {} {}", target.mode.operator(), target.path)?;
        }
        if let Some(target) = &self.stderr_target {
            write!(f, " 2{} {}", target.mode.operator(), target.path)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_args_skip_program() {
        let mut cmd = Command::new("ls -la /tmp");
        cmd.argv = vec!["ls".into(), "-la".into(), "/tmp".into()];
        assert_eq!(cmd.args(), &["-la".to_string(), "/tmp".to_string()]);

        let empty = Command::new("");
        assert!(empty.args().is_empty());
    }

    #[test]
    fn test_display_orders_redirections() {
        let cmd = Command {
            argv: vec!["sort".into(), "-r".into()],
            stdin_target: Some("in.txt".into()),
            stdout_target: Some(OutputTarget::new("out.txt", RedirectMode::Append)),
            stderr_target: Some(OutputTarget::new("err.log", RedirectMode::Truncate)),
            ..Command::default()
        };
        assert_eq!(cmd.to_string(), "sort -r < in.txt >> out.txt 2> err.log");
        assert!(cmd.has_redirection());
    }

    #[test]
    fn test_mode_from_operator() {
        assert_eq!(RedirectMode::from_operator(">"), RedirectMode::Truncate);
        assert_eq!(RedirectMode::from_operator(">>"), RedirectMode::Append);
    }
}
