use std::io::{self, IsTerminal};

use tracing::{Level, Subscriber};
use tracing_subscriber::fmt::MakeWriter;

use crate::error::ShellError;

/// Compact `LEVEL target: message` lines, no timestamps.
fn subscriber<W>(level: Level, ansi: bool, writer: W) -> impl Subscriber + Send + Sync
where
    W: for<'w> MakeWriter<'w> + Send + Sync + 'static,
{
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(true)
        .without_time()
        .with_ansi(ansi)
        .with_writer(writer)
        .finish()
}

/// Installs the global subscriber writing to standard error.
pub fn init(level: Level) -> Result<(), ShellError> {
    let ansi = io::stderr().is_terminal();
    tracing::subscriber::set_global_default(subscriber(level, ansi, io::stderr))
        .map_err(|e| ShellError::Logger(e.to_string()))
}

/// `DEBUG` with `--debug`, otherwise only warnings and errors.
pub fn level_for(debug: bool) -> Level {
    if debug {
        Level::DEBUG
    } else {
        Level::WARN
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use std::sync::{Arc, Mutex};

    #[derive(Clone, Default)]
    struct Captured(Arc<Mutex<Vec<u8>>>);

    impl Captured {
        fn contents(&self) -> String {
            let bytes = self.0.lock().unwrap();
            String::from_utf8_lossy(&bytes).into_owned()
        }
    }

    impl Write for Captured {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_level_for() {
        assert_eq!(level_for(true), Level::DEBUG);
        assert_eq!(level_for(false), Level::WARN);
    }

    #[test]
    fn test_filters_and_formats() {
        let captured = Captured::default();
        let writer = captured.clone();
        let subscriber = subscriber(Level::WARN, false, move || writer.clone());

        tracing::subscriber::with_default(subscriber, || {
            tracing::debug!("started ls as pid 42");
            tracing::warn!(target: "lash::process", "could not report launch failure");
        });

        let text = captured.contents();
        assert!(!text.contains("pid 42"), "{:?}", text);
        assert!(text.contains("WARN"), "{:?}", text);
        assert!(
            text.contains("lash::process: could not report launch failure"),
            "{:?}",
            text
        );
    }
}
