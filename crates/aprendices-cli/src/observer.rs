//! Session side effects surfaced on the terminal.

use aprendices_session::SessionObserver;

/// Prints session notices to stderr.
///
/// A terminal has no login view to navigate to, so the redirect becomes a
/// hint to run `aprendices login`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TerminalObserver;

impl SessionObserver for TerminalObserver {
    fn session_expired(&self) {
        eprintln!("Your session has expired. Please log in again.");
    }

    fn redirect_to_login(&self) {
        eprintln!("Run `aprendices login --username <USER>` to sign in.");
    }
}
