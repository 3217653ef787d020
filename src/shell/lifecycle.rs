use std::io::Write;

use tracing::{debug, warn};

use super::{Shell, State};
use crate::core::ShellState;

impl Shell {
    pub(super) fn init(&mut self) -> State {
        match ShellState::init(&self.config) {
            Ok(state) => {
                debug!("shell state ready, prompt {:?}", state.prompt());
                self.state = Some(state);
                State::ReadCommand
            }
            Err(e) => self.fail(e, true),
        }
    }

    pub(super) fn reset(&mut self) -> State {
        if let Some(state) = self.state.as_mut() {
            state.reset();
        }
        self.failure = None;
        State::ReadCommand
    }

    pub(super) fn error(&mut self) -> State {
        let message = match self.failure.take() {
            Some(e) => e.to_string(),
            None => "unknown error".to_string(),
        };
        let line = self.state.as_ref().and_then(|s| s.current_line());
        let text = match line {
            Some(line) => format!("lash: {}: \"{}\"", message, line),
            None => format!("lash: {}", message),
        };

        if let Err(e) = writeln!(self.err, "{}", self.highlighter.error(&text)) {
            warn!("could not report error: {}", e);
        }

        if self.is_fatal() {
            State::Destroy
        } else {
            State::Reset
        }
    }

    pub(super) fn exit(&mut self) -> State {
        if let Some(state) = self.state.as_mut() {
            state.reset();
        }
        debug!("exit requested");
        State::Destroy
    }

    /// Saves history, drops the session state and fixes the exit status.
    pub(super) fn destroy(&mut self) -> State {
        self.status = if self.is_fatal() { 1 } else { 0 };

        if let Err(e) = self.input.close() {
            warn!("could not close input: {}", e);
        }
        if let Err(e) = self.out.flush().and_then(|_| self.err.flush()) {
            warn!("could not flush output: {}", e);
        }

        self.state = None;
        debug!("shell finished with status {}", self.status);
        State::Finish
    }
}
