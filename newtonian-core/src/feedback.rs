//! Announcement seam shared by every component that reports to the user

use std::sync::Arc;

/// Something that can tell the user what just happened.
///
/// Implementations must return immediately: rendering (speech, logging)
/// happens elsewhere. Callers never learn which backend served the call.
pub trait Announcer: Send + Sync {
    fn announce(&self, message: &str);
}

impl<T: Announcer + ?Sized> Announcer for Arc<T> {
    fn announce(&self, message: &str) {
        (**self).announce(message)
    }
}

/// Announcer that only writes to the log. Used where no channel is wired up.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogAnnouncer;

impl Announcer for LogAnnouncer {
    fn announce(&self, message: &str) {
        tracing::info!("announce: {}", message);
    }
}
