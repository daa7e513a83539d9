//! # tasting-survey-notify
//!
//! Delivers a finished survey as an email with the response document
//! attached.
//!
//! - `Notifier` - the delivery seam used by the submission controller
//! - `SmtpNotifier` - sends over an implicit-TLS SMTP relay (port 465)
//! - `RecordingNotifier` - records notifications, optionally failing on cue
//!
//! Every `send` is a single attempt. Failures come back as [`NotifyError`],
//! split into credential problems, transport problems and everything else.

mod error;
pub use error::{NotifyError, NotifyErrorKind};

mod notification;
pub use notification::{FileAttachment, Notification};

mod traits;
pub use traits::Notifier;

mod smtp;
pub use smtp::{SmtpNotifier, SmtpSettings, compose};

mod recording;
pub use recording::RecordingNotifier;

pub use lettre::message::Mailbox;
