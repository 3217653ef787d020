use std::io::Write;

use tracing::{debug, trace, warn};

use super::input::ReadOutcome;
use super::{Shell, State};
use crate::command::Command;
use crate::core::commands::Flow;
use crate::error::ShellError;

/// The states that take one line from input to a finished command.
pub(crate) trait CommandHandler {
    fn read_command(&mut self) -> State;
    fn separate(&mut self) -> State;
    fn parse(&mut self) -> State;
    fn execute(&mut self) -> State;
}

impl CommandHandler for Shell {
    fn read_command(&mut self) -> State {
        let Some(state) = self.state.as_ref() else {
            return self.fail(ShellError::NotInitialized, true);
        };
        let prompt = self.prompt_line(state.prompt());
        let limit = state.max_line_length();

        let raw = match self.input.read_line(&prompt) {
            Ok(ReadOutcome::Line(raw)) => raw,
            Ok(ReadOutcome::Interrupted) => {
                if !self.config.quiet {
                    let hint = self.highlighter.hint("Use 'exit' to leave the shell");
                    if let Err(e) = writeln!(self.err, "{}", hint) {
                        warn!("could not print hint: {}", e);
                    }
                }
                return State::Reset;
            }
            Ok(ReadOutcome::EndOfInput) => {
                debug!("end of input");
                return State::Exit;
            }
            Err(e) => return self.fail(e, true),
        };

        let trimmed = raw.trim();
        if trimmed.is_empty() {
            trace!("empty line");
            return State::Reset;
        }
        let length = trimmed.len();
        self.input.add_history(trimmed);

        // The line is kept as read; surrounding whitespace only goes at parse time.
        if let Some(state) = self.state.as_mut() {
            state.current_line = Some(raw);
        }

        if length > limit {
            return self.fail(ShellError::LineTooLong { length, limit }, false);
        }
        State::Separate
    }

    fn separate(&mut self) -> State {
        let Some(state) = self.state.as_mut() else {
            return self.fail(ShellError::NotInitialized, true);
        };

        match state.current_line.clone() {
            Some(line) => {
                state.current_command = Some(Command::new(line));
                State::Parse
            }
            None => self.fail(ShellError::NoCommand, false),
        }
    }

    fn parse(&mut self) -> State {
        let Some(state) = self.state.as_mut() else {
            return self.fail(ShellError::NotInitialized, true);
        };
        let Some(line) = state.current_command.as_ref().map(|c| c.raw_line.clone()) else {
            return self.fail(ShellError::NoCommand, false);
        };

        let parsed = state.parser().parse(line.trim());
        match parsed {
            Ok(mut command) => {
                command.raw_line = line;
                debug!("parsed {:?}", command);
                state.current_command = Some(command);
                State::Execute
            }
            Err(e) => self.fail(e.into(), false),
        }
    }

    fn execute(&mut self) -> State {
        let Some(state) = self.state.as_mut() else {
            return self.fail(ShellError::NotInitialized, true);
        };
        let Some(mut command) = state.current_command.take() else {
            return self.fail(ShellError::NoCommand, false);
        };

        let builtin = self
            .builtins
            .execute(&command.program_name, command.args(), &mut *self.err);

        let next = match builtin {
            Some(Flow::Exit) => State::Exit,
            Some(Flow::Continue(code)) => {
                command.exit_code = Some(code);
                State::Reset
            }
            None => {
                if let Err(e) = self.out.flush() {
                    state.current_command = Some(command);
                    return self.fail(e.into(), false);
                }
                self.launcher
                    .run(&mut command, state.search_path(), &mut *self.err);
                State::Reset
            }
        };

        if self.interrupt.take() {
            debug!("interrupted while running {}", command.program_name);
            if let Err(e) = writeln!(self.out) {
                warn!("could not write to output: {}", e);
            }
        }

        state.current_command = Some(command);
        next
    }
}
