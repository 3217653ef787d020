use std::env;
use std::io::{self, Write};

use tracing::{debug, warn};

use super::{Builtin, Flow};
use crate::path::PathExpander;

#[derive(Clone)]
pub struct CdCommand {
    path_expander: PathExpander,
}

impl Default for CdCommand {
    fn default() -> Self {
        Self::new(PathExpander::new())
    }
}

impl CdCommand {
    pub fn new(path_expander: PathExpander) -> Self {
        Self { path_expander }
    }
}

impl Builtin for CdCommand {
    fn execute(&self, args: &[String], errors: &mut dyn Write) -> Flow {
        let path_str = args.first().map(|s| s.as_str()).unwrap_or("~");

        let result = self
            .path_expander
            .expand(path_str)
            .map_err(|e| e.to_string())
            .and_then(|path| env::set_current_dir(&path).map_err(|e| describe(&e)));

        match result {
            Ok(()) => {
                debug!("changed directory to {}", path_str);
                Flow::Continue(0)
            }
            Err(reason) => {
                if let Err(e) = writeln!(errors, "{}: {}", path_str, reason) {
                    warn!("could not report cd failure: {}", e);
                }
                Flow::Continue(1)
            }
        }
    }
}

fn describe(err: &io::Error) -> String {
    match err.raw_os_error() {
        Some(libc::EACCES) => "Permission denied".to_string(),
        Some(libc::ELOOP) => "Too many symbolic links encountered".to_string(),
        Some(libc::ENAMETOOLONG) => "File name too long".to_string(),
        Some(libc::ENOENT) => "does not exist".to_string(),
        Some(libc::ENOTDIR) => "is not a directory".to_string(),
        _ => err.to_string(),
    }
}
