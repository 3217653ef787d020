use std::ffi::CString;
use std::io::{self, Write};
use std::os::unix::ffi::OsStrExt;
use std::ptr;

use libc::c_char;
use tracing::{debug, warn};

use super::{decode_wait_status, LaunchFailure, REDIRECT_FAILURE};
use crate::command::{Command, OutputTarget, RedirectMode, Stream};
use crate::path::SearchPath;

/// A file to open in the child and move onto `fd`.
struct Redirect {
    path: CString,
    flags: libc::c_int,
    fd: libc::c_int,
}

/// Everything the child needs, built before `fork` so the child itself only
/// makes system calls.
struct LaunchPlan {
    candidates: Vec<CString>,
    argv: Vec<CString>,
    redirects: Vec<Redirect>,
}

enum PlanError {
    Redirect(Stream),
    Argument,
}

impl LaunchPlan {
    fn prepare(command: &Command, search_path: &SearchPath) -> Result<Self, PlanError> {
        let argv = command
            .argv
            .iter()
            .map(|arg| CString::new(arg.as_bytes()))
            .collect::<Result<Vec<_>, _>>()
            .map_err(|_| PlanError::Argument)?;

        // An empty name joined onto a directory is the directory itself.
        let candidates = if command.program_name.is_empty() {
            Vec::new()
        } else if command.program_name.contains('/') {
            vec![CString::new(command.program_name.as_bytes()).map_err(|_| PlanError::Argument)?]
        } else {
            search_path
                .candidates(&command.program_name)
                .map(|path| CString::new(path.as_os_str().as_bytes()))
                .collect::<Result<Vec<_>, _>>()
                .map_err(|_| PlanError::Argument)?
        };

        let mut redirects = Vec::new();
        if let Some(path) = &command.stdin_target {
            redirects.push(Redirect {
                path: CString::new(path.as_bytes()).map_err(|_| PlanError::Redirect(Stream::Stdin))?,
                flags: libc::O_RDONLY,
                fd: Stream::Stdin.fd(),
            });
        }
        if let Some(target) = &command.stdout_target {
            redirects.push(Redirect::output(target, Stream::Stdout)?);
        }
        if let Some(target) = &command.stderr_target {
            redirects.push(Redirect::output(target, Stream::Stderr)?);
        }

        Ok(Self {
            candidates,
            argv,
            redirects,
        })
    }
}

impl Redirect {
    fn output(target: &OutputTarget, stream: Stream) -> Result<Self, PlanError> {
        let mode = match target.mode {
            RedirectMode::Truncate => libc::O_TRUNC,
            RedirectMode::Append => libc::O_APPEND,
        };
        Ok(Self {
            path: CString::new(target.path.as_bytes()).map_err(|_| PlanError::Redirect(stream))?,
            flags: libc::O_WRONLY | libc::O_CREAT | mode,
            fd: stream.fd(),
        })
    }
}

/// Runs one external program per call: fork, redirect in the child, resolve
/// and replace the program image, wait in the parent.
#[derive(Debug, Clone, Default)]
pub struct ProcessLauncher;

impl ProcessLauncher {
    pub fn new() -> Self {
        Self
    }

    /// Always leaves a status in `command.exit_code`. Diagnostics the parent
    /// produces go to `errors`; the child writes its own to its stderr.
    pub fn run(&self, command: &mut Command, search_path: &SearchPath, errors: &mut dyn Write) {
        let code = match LaunchPlan::prepare(command, search_path) {
            Ok(plan) => self.spawn(&plan, command, errors),
            Err(PlanError::Redirect(stream)) => {
                debug!("{} target for {} is not a valid path", stream, command.program_name);
                REDIRECT_FAILURE
            }
            Err(PlanError::Argument) => {
                let failure = LaunchFailure::InvalidArgument;
                report(errors, &command.program_name, failure);
                failure.exit_code()
            }
        };

        debug!("{} exited with {}", command.program_name, code);
        command.exit_code = Some(code);
    }

    fn spawn(&self, plan: &LaunchPlan, command: &Command, errors: &mut dyn Write) -> i32 {
        let mut argv: Vec<*const c_char> = plan.argv.iter().map(|arg| arg.as_ptr()).collect();
        argv.push(ptr::null());
        let name = command.program_name.as_bytes();

        // SAFETY: the child branch only calls async-signal-safe functions on
        // memory prepared before the fork, and never returns.
        let pid = unsafe { libc::fork() };
        match pid {
            -1 => {
                let failure = LaunchFailure::from_errno(last_errno());
                report(errors, "fork", failure);
                failure.exit_code()
            }
            0 => unsafe { exec_child(plan, &mut argv, name) },
            pid => {
                debug!("started {} as pid {}", command.program_name, pid);
                wait_for(pid)
            }
        }
    }
}

/// Child side. Redirection happens before program resolution; failing to set
/// it up exits with [`REDIRECT_FAILURE`].
unsafe fn exec_child(plan: &LaunchPlan, argv: &mut [*const c_char], name: &[u8]) -> ! {
    for redirect in &plan.redirects {
        let fd = libc::open(redirect.path.as_ptr(), redirect.flags, 0o644 as libc::c_uint);
        if fd < 0 {
            libc::_exit(REDIRECT_FAILURE);
        }
        if fd != redirect.fd {
            if libc::dup2(fd, redirect.fd) < 0 {
                libc::_exit(REDIRECT_FAILURE);
            }
            libc::close(fd);
        }
    }

    let mut errno = libc::ENOENT;
    for candidate in &plan.candidates {
        argv[0] = candidate.as_ptr();
        libc::execv(candidate.as_ptr(), argv.as_ptr());
        errno = last_errno();
        if errno != libc::ENOENT {
            break;
        }
    }

    let failure = LaunchFailure::from_errno(errno);
    write_raw(name);
    write_raw(b": ");
    write_raw(failure.message().as_bytes());
    write_raw(b"\n");
    libc::_exit(failure.exit_code())
}

fn write_raw(bytes: &[u8]) {
    let mut rest = bytes;
    while !rest.is_empty() {
        // SAFETY: writes from a live slice to the stderr descriptor.
        let n = unsafe { libc::write(libc::STDERR_FILENO, rest.as_ptr().cast(), rest.len()) };
        if n <= 0 {
            return;
        }
        rest = &rest[n as usize..];
    }
}

fn wait_for(pid: libc::pid_t) -> i32 {
    let mut status = 0;
    loop {
        // SAFETY: `status` outlives the call.
        let rc = unsafe { libc::waitpid(pid, &mut status, 0) };
        if rc == pid {
            return decode_wait_status(status);
        }
        let err = io::Error::last_os_error();
        if err.kind() != io::ErrorKind::Interrupted {
            warn!("waiting for pid {} failed: {}", pid, err);
            return LaunchFailure::Other.exit_code();
        }
    }
}

fn last_errno() -> i32 {
    io::Error::last_os_error().raw_os_error().unwrap_or(libc::ENOENT)
}

fn report(errors: &mut dyn Write, name: &str, failure: LaunchFailure) {
    if let Err(e) = writeln!(errors, "{}: {}", name, failure) {
        warn!("could not report launch failure: {}", e);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{fork_lock, scratch_dir, write_file, write_script};
    use std::fs;
    use std::path::{Path, PathBuf};

    fn command(argv: &[&str]) -> Command {
        let mut cmd = Command::new(argv.join(" "));
        cmd.argv = argv.iter().map(|s| s.to_string()).collect();
        cmd.program_name = cmd.argv[0].clone();
        cmd
    }

    fn launch(cmd: &mut Command, search_path: &SearchPath) -> String {
        let mut errors = Vec::new();
        ProcessLauncher::new().run(cmd, search_path, &mut errors);
        String::from_utf8(errors).unwrap()
    }

    fn path_of(p: &Path) -> String {
        p.to_string_lossy().into_owned()
    }

    #[test]
    fn test_first_match_in_search_path() {
        let _guard = fork_lock();
        let dir = scratch_dir("first_match");
        let empty = dir.join("usr_bin");
        let bin = dir.join("bin");
        fs::create_dir_all(&empty).unwrap();
        fs::create_dir_all(&bin).unwrap();
        write_script(&bin, "probe", "echo \"$0\"\nexit 3\n");

        let out = dir.join("out.txt");
        let mut cmd = command(&["probe"]);
        cmd.stdout_target = Some(OutputTarget::new(path_of(&out), RedirectMode::Truncate));
        let search = SearchPath::new(vec![empty, bin.clone()]);

        launch(&mut cmd, &search);
        assert_eq!(cmd.exit_code, Some(3));
        assert_eq!(
            fs::read_to_string(&out).unwrap().trim(),
            path_of(&bin.join("probe"))
        );
    }

    #[test]
    fn test_not_found() {
        let _guard = fork_lock();
        let dir = scratch_dir("not_found");
        let err = dir.join("err.txt");
        let mut cmd = command(&["lash-no-such-program"]);
        cmd.stderr_target = Some(OutputTarget::new(path_of(&err), RedirectMode::Truncate));

        launch(&mut cmd, &SearchPath::new(vec![dir.clone()]));
        assert_eq!(cmd.exit_code, Some(127));
        assert_eq!(
            fs::read_to_string(&err).unwrap(),
            "lash-no-such-program: No such file or directory\n"
        );
    }

    #[test]
    fn test_empty_program_name_is_not_found() {
        let _guard = fork_lock();
        let dir = scratch_dir("empty_name");
        let err = dir.join("err.txt");
        let mut cmd = command(&["", "arg"]);
        cmd.stderr_target = Some(OutputTarget::new(path_of(&err), RedirectMode::Truncate));

        launch(&mut cmd, &SearchPath::new(vec![dir.clone(), PathBuf::from("/bin")]));
        assert_eq!(cmd.exit_code, Some(127));
        assert_eq!(
            fs::read_to_string(&err).unwrap(),
            ": No such file or directory\n"
        );
    }

    #[test]
    fn test_empty_search_path() {
        let _guard = fork_lock();
        let dir = scratch_dir("empty_path");
        let err = dir.join("err.txt");
        let mut cmd = command(&["sh"]);
        cmd.stderr_target = Some(OutputTarget::new(path_of(&err), RedirectMode::Truncate));

        launch(&mut cmd, &SearchPath::default());
        assert_eq!(cmd.exit_code, Some(127));
        assert!(fs::read_to_string(&err).unwrap().contains("No such file or directory"));
    }

    #[test]
    fn test_permission_denied_stops_search() {
        let _guard = fork_lock();
        let dir = scratch_dir("denied");
        let first = dir.join("first");
        let second = dir.join("second");
        fs::create_dir_all(&first).unwrap();
        fs::create_dir_all(&second).unwrap();
        write_file(&first, "tool", "#!/bin/sh\nexit 0\n", 0o644);
        write_script(&second, "tool", "exit 0\n");

        let err = dir.join("err.txt");
        let mut cmd = command(&["tool"]);
        cmd.stderr_target = Some(OutputTarget::new(path_of(&err), RedirectMode::Truncate));

        launch(&mut cmd, &SearchPath::new(vec![first, second]));
        assert_eq!(cmd.exit_code, Some(2));
        assert_eq!(fs::read_to_string(&err).unwrap(), "tool: Permission denied\n");
    }

    #[test]
    fn test_exec_format_error() {
        let _guard = fork_lock();
        let dir = scratch_dir("format");
        write_file(&dir, "junk", "this is not a program\n", 0o755);
        let err = dir.join("err.txt");
        let junk = path_of(&dir.join("junk"));
        let mut cmd = command(&[junk.as_str()]);
        cmd.stderr_target = Some(OutputTarget::new(path_of(&err), RedirectMode::Truncate));

        launch(&mut cmd, &SearchPath::default());
        assert_eq!(cmd.exit_code, Some(7));
        assert!(fs::read_to_string(&err).unwrap().ends_with("Exec format error\n"));
    }

    #[test]
    fn test_explicit_path_skips_search() {
        let _guard = fork_lock();
        let dir = scratch_dir("explicit");
        write_script(&dir, "hello", "exit 42\n");
        let hello = path_of(&dir.join("hello"));
        let mut cmd = command(&[hello.as_str()]);

        launch(&mut cmd, &SearchPath::default());
        assert_eq!(cmd.exit_code, Some(42));
    }

    #[test]
    fn test_stdin_and_stdout_redirect() {
        let _guard = fork_lock();
        let dir = scratch_dir("stdin");
        let input = dir.join("in.txt");
        let output = dir.join("out.txt");
        fs::write(&input, "hello\n").unwrap();

        let mut cmd = command(&["/bin/sh", "-c", "read line; echo \"got $line\""]);
        cmd.stdin_target = Some(path_of(&input));
        cmd.stdout_target = Some(OutputTarget::new(path_of(&output), RedirectMode::Truncate));

        launch(&mut cmd, &SearchPath::default());
        assert_eq!(cmd.exit_code, Some(0));
        assert_eq!(fs::read_to_string(&output).unwrap(), "got hello\n");
    }

    #[test]
    fn test_append_and_truncate() {
        let _guard = fork_lock();
        let dir = scratch_dir("append");
        let output = dir.join("log.txt");
        fs::write(&output, "old contents\n").unwrap();

        for _ in 0..2 {
            let mut cmd = command(&["/bin/sh", "-c", "echo line"]);
            cmd.stdout_target = Some(OutputTarget::new(path_of(&output), RedirectMode::Append));
            launch(&mut cmd, &SearchPath::default());
        }
        assert_eq!(
            fs::read_to_string(&output).unwrap(),
            "old contents\nline\nline\n"
        );

        let mut cmd = command(&["/bin/sh", "-c", "echo fresh"]);
        cmd.stdout_target = Some(OutputTarget::new(path_of(&output), RedirectMode::Truncate));
        launch(&mut cmd, &SearchPath::default());
        assert_eq!(fs::read_to_string(&output).unwrap(), "fresh\n");
    }

    #[test]
    fn test_stderr_redirect() {
        let _guard = fork_lock();
        let dir = scratch_dir("stderr");
        let err = dir.join("err.log");

        let mut cmd = command(&["/bin/sh", "-c", "echo oops >&2; exit 1"]);
        cmd.stderr_target = Some(OutputTarget::new(path_of(&err), RedirectMode::Truncate));
        launch(&mut cmd, &SearchPath::default());
        assert_eq!(cmd.exit_code, Some(1));
        assert_eq!(fs::read_to_string(&err).unwrap(), "oops\n");
    }

    #[test]
    fn test_redirect_failure_is_126() {
        let _guard = fork_lock();
        let dir = scratch_dir("redirect_fail");
        let mut cmd = command(&["/bin/sh", "-c", "exit 0"]);
        cmd.stdin_target = Some(path_of(&dir.join("missing.txt")));

        launch(&mut cmd, &SearchPath::default());
        assert_eq!(cmd.exit_code, Some(126));
    }

    #[test]
    fn test_killed_by_signal() {
        let _guard = fork_lock();
        let mut cmd = command(&["/bin/sh", "-c", "kill -9 $$"]);
        launch(&mut cmd, &SearchPath::default());
        assert_eq!(cmd.exit_code, Some(128 + libc::SIGKILL));
    }

    #[test]
    fn test_nul_in_argument() {
        let mut cmd = command(&["echo", "a\0b"]);
        let errors = launch(&mut cmd, &SearchPath::default());
        assert_eq!(cmd.exit_code, Some(3));
        assert_eq!(errors, "echo: Invalid argument\n");
    }
}
