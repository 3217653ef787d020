mod patterns;
mod words;

pub use patterns::RedirectPatterns;
pub use words::WordExpander;

use std::fmt;

use tracing::{debug, trace};
use regex::Regex;

use crate::command::{Command, OutputTarget, RedirectMode, Stream};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    MissingTarget(Stream),
    BadTarget(Stream, String),
    EmptyCommand,
    UnterminatedQuote(char),
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseError::MissingTarget(stream) => {
                write!(f, "missing file name for {} redirection", stream)
            }
            ParseError::BadTarget(stream, msg) => {
                write!(f, "bad file name for {} redirection: {}", stream, msg)
            }
            ParseError::EmptyCommand => write!(f, "empty command"),
            ParseError::UnterminatedQuote(q) => write!(f, "unterminated {} quote", q),
        }
    }
}

impl std::error::Error for ParseError {}

/// A redirection pulled off the end of the working line.
struct Stripped {
    target: String,
    mode: RedirectMode,
}

/// Turns a raw line into a [`Command`].
///
/// Redirections are removed from the line in a fixed order, standard error
/// first, then standard output, then standard input, regardless of where they
/// appear. Each operator's target runs to the end of whatever line remains.
/// The leftover text goes through the [`WordExpander`].
pub struct CommandParser<'a> {
    patterns: &'a RedirectPatterns,
    words: &'a WordExpander,
}

impl<'a> CommandParser<'a> {
    pub fn new(patterns: &'a RedirectPatterns, words: &'a WordExpander) -> Self {
        Self { patterns, words }
    }

    pub fn parse(&self, raw_line: &str) -> Result<Command, ParseError> {
        let mut working = raw_line.to_string();
        let mut command = Command::new(raw_line);

        command.stderr_target = self
            .strip_all(&self.patterns.stderr, Stream::Stderr, &mut working)?
            .map(|s| OutputTarget::new(s.target, s.mode));
        command.stdout_target = self
            .strip_all(&self.patterns.stdout, Stream::Stdout, &mut working)?
            .map(|s| OutputTarget::new(s.target, s.mode));
        command.stdin_target = self
            .strip_all(&self.patterns.stdin, Stream::Stdin, &mut working)?
            .map(|s| s.target);

        let argv = self.words.expand(&working)?;
        let program_name = argv.first().ok_or(ParseError::EmptyCommand)?.clone();

        trace!("parsed {:?} into argv {:?}", raw_line, argv);
        command.program_name = program_name;
        command.argv = argv;
        Ok(command)
    }

    /// Strips every match of `pattern` from the end of `working`. The first
    /// match found is the textually last operator and is the one kept.
    fn strip_all(
        &self,
        pattern: &Regex,
        stream: Stream,
        working: &mut String,
    ) -> Result<Option<Stripped>, ParseError> {
        let mut kept: Option<Stripped> = None;

        loop {
            let (rest_end, target, op) = match pattern.captures(working.as_str()) {
                Some(caps) => (
                    caps.name("rest").map_or(0, |m| m.end()),
                    caps.name("target").map_or("", |m| m.as_str()).trim().to_string(),
                    caps.name("op").map_or(">", |m| m.as_str()).to_string(),
                ),
                None => break,
            };

            if target.is_empty() {
                return Err(ParseError::MissingTarget(stream));
            }
            let target = self
                .words
                .paths()
                .expand_str(&target)
                .map_err(|e| ParseError::BadTarget(stream, e.to_string()))?;

            working.truncate(rest_end);
            if kept.is_some() {
                debug!("ignoring earlier {} redirection to {}", stream, target);
                continue;
            }
            kept = Some(Stripped {
                target,
                mode: RedirectMode::from_operator(&op),
            });
        }

        Ok(kept)
    }
}
