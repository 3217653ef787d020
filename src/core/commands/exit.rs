use std::io::Write;

use super::{Builtin, Flow};

#[derive(Clone)]
pub struct ExitCommand;

impl Default for ExitCommand {
    fn default() -> Self {
        Self::new()
    }
}

impl ExitCommand {
    pub fn new() -> Self {
        Self
    }
}

impl Builtin for ExitCommand {
    fn execute(&self, _args: &[String], _errors: &mut dyn Write) -> Flow {
        Flow::Exit
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_command() {
        let cmd = ExitCommand::new();
        let mut errors = Vec::new();
        assert_eq!(cmd.execute(&["3".to_string()], &mut errors), Flow::Exit);
    }
}
