//! Notifier that forwards messages to the log.

use hrm_application::ports::Notifier;
use tracing::{info, warn};

/// Sends notifications to `tracing` instead of a UI.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn success(&self, title: &str, message: &str) {
        info!(title, "{message}");
    }

    fn error(&self, title: &str, message: &str) {
        warn!(title, "{message}");
    }
}
