//! Raw-mode terminal setup that is always undone

use crossterm::{
    cursor::Show,
    execute,
    terminal::{disable_raw_mode, LeaveAlternateScreen},
};
use std::io;

/// Runs `restore` when dropped, including on early `?` returns
pub struct RestoreGuard<F: FnMut()> {
    restore: F,
}

impl<F: FnMut()> RestoreGuard<F> {
    pub fn new(restore: F) -> Self {
        Self { restore }
    }
}

impl<F: FnMut()> Drop for RestoreGuard<F> {
    fn drop(&mut self) {
        (self.restore)();
    }
}

/// Leave raw mode and the alternate screen, and show the cursor again
pub fn restore_terminal() {
    if let Err(err) = disable_raw_mode() {
        tracing::warn!("failed to disable raw mode: {err}");
    }
    if let Err(err) = execute!(io::stdout(), LeaveAlternateScreen, Show) {
        tracing::warn!("failed to leave alternate screen: {err}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    fn enter_screen() -> io::Result<()> {
        Err(io::Error::other("no tty"))
    }

    fn setup_that_fails(restored: &Cell<u32>) -> io::Result<()> {
        let _guard = RestoreGuard::new(|| restored.set(restored.get() + 1));
        enter_screen()?;
        Ok(())
    }

    #[test]
    fn test_restores_on_early_error() {
        let restored = Cell::new(0);
        assert!(setup_that_fails(&restored).is_err());
        assert_eq!(restored.get(), 1);
    }

    #[test]
    fn test_restores_once_on_success() {
        let restored = Cell::new(0);
        {
            let _guard = RestoreGuard::new(|| restored.set(restored.get() + 1));
        }
        assert_eq!(restored.get(), 1);
    }
}
