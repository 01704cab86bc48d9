//! User-visible failure notifications.

use std::sync::Arc;

/// Receives failure notices the user must see (the send failed, nothing changed).
///
/// The terminal front end prints them; tests record them.
pub trait FailureNotifier: Send + Sync {
    fn notify_failure(&self, message: &str);
}

impl<N: FailureNotifier + ?Sized> FailureNotifier for Arc<N> {
    fn notify_failure(&self, message: &str) {
        (**self).notify_failure(message);
    }
}

/// Notifier that only logs. Useful for headless clients.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogNotifier;

impl FailureNotifier for LogNotifier {
    fn notify_failure(&self, message: &str) {
        tracing::error!(notice = %message, "Chat failure");
    }
}
