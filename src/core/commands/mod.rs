use std::collections::BTreeMap;
use std::io::Write;

mod cd;
mod exit;

pub use cd::CdCommand;
pub use exit::ExitCommand;

use crate::path::PathExpander;

/// What the controller does after a builtin ran.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue(i32),
    Exit,
}

pub trait Builtin {
    fn execute(&self, args: &[String], errors: &mut dyn Write) -> Flow;
}

#[derive(Clone)]
enum BuiltinType {
    Cd(CdCommand),
    Exit(ExitCommand),
}

impl Builtin for BuiltinType {
    fn execute(&self, args: &[String], errors: &mut dyn Write) -> Flow {
        match self {
            BuiltinType::Cd(cmd) => cmd.execute(args, errors),
            BuiltinType::Exit(cmd) => cmd.execute(args, errors),
        }
    }
}

/// Commands the shell runs itself instead of launching a process.
#[derive(Clone)]
pub struct Builtins {
    commands: BTreeMap<String, BuiltinType>,
}

impl Builtins {
    pub fn new(expander: PathExpander) -> Self {
        let mut commands = BTreeMap::new();
        commands.insert("cd".to_string(), BuiltinType::Cd(CdCommand::new(expander)));
        commands.insert("exit".to_string(), BuiltinType::Exit(ExitCommand::new()));
        Self { commands }
    }

    /// `None` when `name` is not a builtin.
    pub fn execute(&self, name: &str, args: &[String], errors: &mut dyn Write) -> Option<Flow> {
        self.commands.get(name).map(|cmd| cmd.execute(args, errors))
    }

    #[cfg(test)]
    fn is_builtin(&self, name: &str) -> bool {
        self.commands.contains_key(name)
    }
}
