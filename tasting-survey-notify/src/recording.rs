//! Notifier for tests: records what would have been sent.
//!
//! `RecordingNotifier` accepts every notification unless a failure has been
//! queued, in which case the next attempt returns that failure instead.
//!
//! # Example
//!
//! ```rust,ignore
//! use tasting_survey_notify::{NotifyError, RecordingNotifier};
//!
//! let notifier = RecordingNotifier::new()
//!     .then_fail(NotifyError::Transport("connection refused".into()));
//!
//! assert!(notifier.send(&notification).await.is_err());
//! assert!(notifier.send(&notification).await.is_ok());
//! assert_eq!(notifier.attempts(), 2);
//! assert_eq!(notifier.sent().len(), 1);
//! ```

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;

use crate::{Notification, Notifier, NotifyError};

#[derive(Debug, Default)]
pub struct RecordingNotifier {
    failures: Mutex<VecDeque<NotifyError>>,
    sent: Mutex<Vec<Notification>>,
    attempts: AtomicUsize,
    delay: Duration,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a failure for the next attempt that has none queued before it.
    pub fn then_fail(self, error: NotifyError) -> Self {
        self.fail_next(error);
        self
    }

    /// Take `delay` for every send, like a slow mail server.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Queue a failure on a notifier that is already shared.
    pub fn fail_next(&self, error: NotifyError) {
        self.failures.lock().push_back(error);
    }

    /// Notifications accepted so far, oldest first.
    pub fn sent(&self) -> Vec<Notification> {
        self.sent.lock().clone()
    }

    /// Number of `send` calls, failed ones included.
    pub fn attempts(&self) -> usize {
        self.attempts.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Notifier for RecordingNotifier {
    async fn send(&self, notification: &Notification) -> Result<(), NotifyError> {
        self.attempts.fetch_add(1, Ordering::SeqCst);

        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }

        if let Some(error) = self.failures.lock().pop_front() {
            return Err(error);
        }

        self.sent.lock().push(notification.clone());
        Ok(())
    }
}
