//! User-visible failure notifications.

use tracing::warn;

/// Surface a failed request to whoever is watching the table.
pub trait Notifier: Send + Sync {
    fn notify(&self, message: &str);
}

/// Writes notifications to the log.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn notify(&self, message: &str) {
        warn!("List request failed: {}", message);
    }
}
