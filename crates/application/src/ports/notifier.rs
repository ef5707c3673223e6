//! Notification port for transient user-facing messages.

/// Port for showing short-lived success and failure messages.
pub trait Notifier: Send + Sync {
    /// Shows a success message.
    fn success(&self, title: &str, message: &str);

    /// Shows a failure message.
    fn error(&self, title: &str, message: &str);
}
