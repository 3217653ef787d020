use std::fmt;

pub mod launcher;
pub mod signal;

pub use launcher::ProcessLauncher;
pub use signal::InterruptFlag;

/// Exit status of a child that could not set up its redirections.
pub const REDIRECT_FAILURE: i32 = 126;

/// Offset added to the signal number of a child killed by a signal.
pub const SIGNAL_EXIT_BASE: i32 = 128;

/// Why a program image could not be started, with the numeric outcome the
/// child reports for it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LaunchFailure {
    ArgumentListTooLong,
    PermissionDenied,
    InvalidArgument,
    TooManySymlinks,
    NameTooLong,
    NotFound,
    NotADirectory,
    ExecFormat,
    OutOfMemory,
    TextFileBusy,
    Other,
}

impl LaunchFailure {
    pub fn from_errno(errno: i32) -> Self {
        match errno {
            libc::E2BIG => LaunchFailure::ArgumentListTooLong,
            libc::EACCES => LaunchFailure::PermissionDenied,
            libc::EINVAL => LaunchFailure::InvalidArgument,
            libc::ELOOP => LaunchFailure::TooManySymlinks,
            libc::ENAMETOOLONG => LaunchFailure::NameTooLong,
            libc::ENOENT => LaunchFailure::NotFound,
            libc::ENOTDIR => LaunchFailure::NotADirectory,
            libc::ENOEXEC => LaunchFailure::ExecFormat,
            libc::ENOMEM => LaunchFailure::OutOfMemory,
            libc::ETXTBSY => LaunchFailure::TextFileBusy,
            _ => LaunchFailure::Other,
        }
    }

    pub fn exit_code(self) -> i32 {
        match self {
            LaunchFailure::ArgumentListTooLong => 1,
            LaunchFailure::PermissionDenied => 2,
            LaunchFailure::InvalidArgument => 3,
            LaunchFailure::TooManySymlinks => 4,
            LaunchFailure::NameTooLong => 5,
            LaunchFailure::NotFound => 127,
            LaunchFailure::NotADirectory => 6,
            LaunchFailure::ExecFormat => 7,
            LaunchFailure::OutOfMemory => 8,
            LaunchFailure::TextFileBusy => 9,
            LaunchFailure::Other => 125,
        }
    }

    pub fn message(self) -> &'static str {
        match self {
            LaunchFailure::ArgumentListTooLong => "Argument list too long",
            LaunchFailure::PermissionDenied => "Permission denied",
            LaunchFailure::InvalidArgument => "Invalid argument",
            LaunchFailure::TooManySymlinks => "Too many symbolic links encountered",
            LaunchFailure::NameTooLong => "File name too long",
            LaunchFailure::NotFound => "No such file or directory",
            LaunchFailure::NotADirectory => "Not a directory",
            LaunchFailure::ExecFormat => "Exec format error",
            LaunchFailure::OutOfMemory => "Out of memory",
            LaunchFailure::TextFileBusy => "Text file busy",
            LaunchFailure::Other => "Unable to execute",
        }
    }
}

impl fmt::Display for LaunchFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message())
    }
}

/// Turns a raw `waitpid` status into the number stored on the command.
pub fn decode_wait_status(status: i32) -> i32 {
    if libc::WIFEXITED(status) {
        libc::WEXITSTATUS(status)
    } else if libc::WIFSIGNALED(status) {
        SIGNAL_EXIT_BASE + libc::WTERMSIG(status)
    } else {
        LaunchFailure::Other.exit_code()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_outcome_table() {
        let table = [
            (libc::E2BIG, 1),
            (libc::EACCES, 2),
            (libc::EINVAL, 3),
            (libc::ELOOP, 4),
            (libc::ENAMETOOLONG, 5),
            (libc::ENOENT, 127),
            (libc::ENOTDIR, 6),
            (libc::ENOEXEC, 7),
            (libc::ENOMEM, 8),
            (libc::ETXTBSY, 9),
            (libc::EIO, 125),
            (libc::EPERM, 125),
        ];
        for (errno, code) in table {
            assert_eq!(LaunchFailure::from_errno(errno).exit_code(), code, "errno {}", errno);
        }
    }

    #[test]
    fn test_not_found_message() {
        let failure = LaunchFailure::from_errno(libc::ENOENT);
        assert_eq!(failure.to_string(), "No such file or directory");
    }

    #[test]
    fn test_decode_exit_status() {
        // exit(3): status byte in bits 8..16
        assert_eq!(decode_wait_status(3 << 8), 3);
        assert_eq!(decode_wait_status(0), 0);
    }

    #[test]
    fn test_decode_signal_status() {
        // killed by SIGKILL, no core
        assert_eq!(decode_wait_status(libc::SIGKILL), 128 + libc::SIGKILL);
    }
}
