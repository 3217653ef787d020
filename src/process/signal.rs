use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::error::ShellError;

/// Set from the SIGINT handler, drained by the controller between states.
///
/// The handler only flips the flag, so a cancel while a child runs reaches
/// the child (its handler is reset when the program image is replaced) and
/// the shell keeps going.
#[derive(Debug, Clone, Default)]
pub struct InterruptFlag {
    raised: Arc<AtomicBool>,
}

impl InterruptFlag {
    /// A flag with no handler behind it.
    pub fn detached() -> Self {
        Self::default()
    }

    pub fn install() -> Result<Self, ShellError> {
        let flag = Self::default();
        let raised = Arc::clone(&flag.raised);
        ctrlc::set_handler(move || {
            raised.store(true, Ordering::SeqCst);
        })?;
        Ok(flag)
    }

    pub fn raise(&self) {
        self.raised.store(true, Ordering::SeqCst);
    }

    /// Returns whether an interrupt arrived since the last call, and clears it.
    pub fn take(&self) -> bool {
        self.raised.swap(false, Ordering::SeqCst)
    }
}
