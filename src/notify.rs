//! Console notification sink.
//!
//! The core never writes to the console itself; callers inject a
//! [`Notifier`] and own presentation. The stock [`ConsoleNotifier`] prints
//! a timestamped, app-tagged line for human-readable reporting of the
//! terminal error.

use chrono::Local;

/// Capability for reporting a tagged, human-readable message.
pub trait Notifier {
    /// Reports `message` under `title` (typically the application name).
    fn notify(&self, title: &str, message: &str);
}

/// Notifier that prints timestamped lines to stdout.
#[derive(Debug, Default, Clone, Copy)]
pub struct ConsoleNotifier;

impl ConsoleNotifier {
    fn format_line(title: &str, message: &str) -> String {
        let timestamp = Local::now().format("%Y-%m-%d %H:%M:%S");
        format!("{timestamp} [{title}] {message}")
    }
}

impl Notifier for ConsoleNotifier {
    fn notify(&self, title: &str, message: &str) {
        println!("{}", Self::format_line(title, message));
    }
}
