use std::env;
use std::io::{self, IsTerminal, Write};

use tracing::{debug, trace};

mod executor;
pub mod fsm;
pub mod input;
mod lifecycle;

pub use fsm::State;
pub use input::{BufReadInput, EditorInput, LineSource, ReadOutcome};

use crate::core::commands::Builtins;
use crate::core::{ShellConfig, ShellState};
use crate::error::ShellError;
use crate::highlight::DiagnosticHighlighter;
use crate::path::PathExpander;
use crate::process::{InterruptFlag, ProcessLauncher};

use executor::CommandHandler;

/// The read, parse, execute, reset loop, driven one state at a time.
pub struct Shell {
    pub(crate) config: ShellConfig,
    pub(crate) input: Box<dyn LineSource>,
    pub(crate) out: Box<dyn Write>,
    pub(crate) err: Box<dyn Write>,
    pub(crate) highlighter: DiagnosticHighlighter,
    pub(crate) interrupt: InterruptFlag,
    pub(crate) builtins: Builtins,
    pub(crate) launcher: ProcessLauncher,
    pub(crate) state: Option<ShellState>,
    pub(crate) failure: Option<ShellError>,
    current: State,
    pub(crate) status: i32,
}

impl Shell {
    /// A shell on the process's own standard streams, with the SIGINT
    /// handler installed.
    pub fn new(config: ShellConfig) -> Result<Self, ShellError> {
        let input: Box<dyn LineSource> = if io::stdin().is_terminal() {
            Box::new(EditorInput::new(config.history_file.clone())?)
        } else {
            Box::new(BufReadInput::new(io::stdin().lock(), io::stdout()))
        };

        let highlighter = if io::stderr().is_terminal() {
            DiagnosticHighlighter::new()
        } else {
            DiagnosticHighlighter::plain()
        };

        let mut shell = Self::with_io(
            config,
            input,
            Box::new(io::stdout()),
            Box::new(io::stderr()),
        );
        shell.highlighter = highlighter;
        shell.interrupt = InterruptFlag::install()?;
        Ok(shell)
    }

    pub fn with_io(
        config: ShellConfig,
        input: Box<dyn LineSource>,
        out: Box<dyn Write>,
        err: Box<dyn Write>,
    ) -> Self {
        let builtins = Builtins::new(PathExpander::with_home(config.home.clone()));
        Self {
            config,
            input,
            out,
            err,
            highlighter: DiagnosticHighlighter::plain(),
            interrupt: InterruptFlag::detached(),
            builtins,
            launcher: ProcessLauncher::new(),
            state: None,
            failure: None,
            current: State::Start,
            status: 0,
        }
    }

    pub fn current(&self) -> State {
        self.current
    }

    pub fn shell_state(&self) -> Option<&ShellState> {
        self.state.as_ref()
    }

    pub fn interrupt(&self) -> &InterruptFlag {
        &self.interrupt
    }

    /// Runs the handler for the current state and moves to the state it picks.
    pub fn step(&mut self) -> Result<State, ShellError> {
        let next = match self.current {
            State::Start => State::Init,
            State::Init => self.init(),
            State::ReadCommand => self.read_command(),
            State::Separate => self.separate(),
            State::Parse => self.parse(),
            State::Execute => self.execute(),
            State::Reset => self.reset(),
            State::Error => self.error(),
            State::Exit => self.exit(),
            State::Destroy => self.destroy(),
            State::Finish => return Ok(State::Finish),
        };

        if !fsm::permits(self.current, next) {
            return Err(ShellError::IllegalTransition {
                from: self.current,
                to: next,
            });
        }

        trace!("{:?} -> {:?}", self.current, next);
        self.current = next;
        Ok(next)
    }

    /// Steps until the machine finishes and returns the shell's exit status.
    pub fn run(&mut self) -> Result<i32, ShellError> {
        while self.current != State::Finish {
            self.step()?;
        }
        Ok(self.status)
    }

    /// Records `error` for the Error state.
    pub(crate) fn fail(&mut self, error: ShellError, fatal: bool) -> State {
        let severity = if fatal { "fatal" } else { "recoverable" };
        debug!("{} failure: {}", severity, error);
        if let Some(state) = self.state.as_mut() {
            state.fatal |= fatal;
        }
        self.failure = Some(error);
        State::Error
    }

    /// No state means Init never finished, which is fatal too.
    pub(crate) fn is_fatal(&self) -> bool {
        self.state.as_ref().map_or(true, ShellState::is_fatal)
    }

    pub(crate) fn prompt_line(&self, prompt: &str) -> String {
        match env::current_dir() {
            Ok(dir) => format!("[{}] {}", dir.display(), prompt),
            Err(e) => {
                debug!("no current directory for the prompt: {}", e);
                prompt.to_string()
            }
        }
    }
}
