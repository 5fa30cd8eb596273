/// Shown when the descriptor carries no usable payload
pub const INVALID_SOURCE_ALERT: &str = "source props is not correct";
/// Shown for every other fatal resolution error
pub const GENERIC_ALERT: &str = "Sorry, an error occurred.";

/// Blocking, user-visible notice
pub trait AlertSink: Send + Sync {
    fn alert(&self, message: &str);
}

/// Sends alerts to the log at error level
#[derive(Debug, Clone, Copy, Default)]
pub struct LogAlerts;

impl AlertSink for LogAlerts {
    fn alert(&self, message: &str) {
        log::error!("{}", message);
    }
}
