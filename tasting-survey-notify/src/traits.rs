use async_trait::async_trait;

use crate::{Notification, NotifyError};

/// Delivers notifications.
///
/// Implementations make exactly one attempt per call and keep no state about
/// previous sends. Retrying is up to the caller.
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn send(&self, notification: &Notification) -> Result<(), NotifyError>;
}
