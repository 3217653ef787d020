use crate::parser::ParseError;
use crate::shell::State;

#[derive(Debug)]
pub enum ShellError {
    Readline(rustyline::error::ReadlineError),
    Io(std::io::Error),
    HomeDirNotFound,
    Pattern(regex::Error),
    Parse(ParseError),
    LineTooLong { length: usize, limit: usize },
    ArgMaxUnavailable,
    NotInitialized,
    NoCommand,
    IllegalTransition { from: State, to: State },
    FlagError(String),
    CtrlC(String),
    Logger(String),
}

impl From<rustyline::error::ReadlineError> for ShellError {
    fn from(err: rustyline::error::ReadlineError) -> Self {
        ShellError::Readline(err)
    }
}

impl From<std::io::Error> for ShellError {
    fn from(err: std::io::Error) -> Self {
        ShellError::Io(err)
    }
}

impl From<ctrlc::Error> for ShellError {
    fn from(err: ctrlc::Error) -> Self {
        ShellError::CtrlC(err.to_string())
    }
}

impl From<regex::Error> for ShellError {
    fn from(err: regex::Error) -> Self {
        ShellError::Pattern(err)
    }
}

impl From<ParseError> for ShellError {
    fn from(err: ParseError) -> Self {
        ShellError::Parse(err)
    }
}

impl std::fmt::Display for ShellError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ShellError::Readline(e) => write!(f, "Readline error: {}", e),
            ShellError::Io(e) => write!(f, "IO error: {}", e),
            ShellError::HomeDirNotFound => write!(f, "Home directory not found"),
            ShellError::Pattern(e) => write!(f, "Bad redirection pattern: {}", e),
            ShellError::Parse(e) => write!(f, "Parse error: {}", e),
            ShellError::LineTooLong { length, limit } => {
                write!(f, "Line too long: {} bytes (limit {})", length, limit)
            }
            ShellError::ArgMaxUnavailable => write!(f, "Could not determine the maximum line length"),
            ShellError::NotInitialized => write!(f, "Shell state is not initialized"),
            ShellError::NoCommand => write!(f, "No command to work on"),
            ShellError::IllegalTransition { from, to } => {
                write!(f, "Illegal transition from {:?} to {:?}", from, to)
            }
            ShellError::FlagError(msg) => write!(f, "Flag error: {}", msg),
            ShellError::CtrlC(msg) => write!(f, "Ctrl-C error: {}", msg),
            ShellError::Logger(msg) => write!(f, "Logger error: {}", msg),
        }
    }
}

impl std::error::Error for ShellError {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::Stream;

    #[test]
    fn test_display_is_never_empty() {
        let errors = vec![
            ShellError::HomeDirNotFound,
            ShellError::Parse(ParseError::MissingTarget(Stream::Stdout)),
            ShellError::LineTooLong { length: 10, limit: 5 },
            ShellError::IllegalTransition {
                from: State::Reset,
                to: State::Execute,
            },
            ShellError::Io(std::io::Error::new(std::io::ErrorKind::NotFound, "io error")),
        ];

        for error in errors {
            assert!(!error.to_string().is_empty());
        }
    }

    #[test]
    fn test_parse_error_conversion() {
        let err: ShellError = ParseError::EmptyCommand.into();
        assert_eq!(err.to_string(), "Parse error: empty command");
    }
}
