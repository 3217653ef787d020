/// Controller states. `Start` and `Finish` mark machine entry and exit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum State {
    Start,
    Init,
    ReadCommand,
    Separate,
    Parse,
    Execute,
    Reset,
    Error,
    Exit,
    Destroy,
    Finish,
}

use State::*;

/// Every legal `(from, to)` pair. Anything else is a controller bug.
pub const TRANSITIONS: &[(State, State)] = &[
    (Start, Init),
    (Init, ReadCommand),
    (Init, Error),
    (ReadCommand, Reset),
    (ReadCommand, Separate),
    (ReadCommand, Error),
    (ReadCommand, Exit),
    (Separate, Parse),
    (Separate, Error),
    (Parse, Execute),
    (Parse, Error),
    (Execute, Reset),
    (Execute, Exit),
    (Execute, Error),
    (Reset, ReadCommand),
    (Error, Destroy),
    (Error, Reset),
    (Exit, Destroy),
    (Destroy, Finish),
];

pub fn permits(from: State, to: State) -> bool {
    TRANSITIONS.contains(&(from, to))
}

pub fn successors(from: State) -> impl Iterator<Item = State> {
    TRANSITIONS
        .iter()
        .filter(move |(f, _)| *f == from)
        .map(|&(_, to)| to)
}
