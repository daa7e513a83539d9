//! Delivery through an implicit-TLS SMTP relay.

use std::time::Duration;

use async_trait::async_trait;
use lettre::{
    AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
    message::{Attachment, Mailbox, MultiPart, SinglePart, header::ContentType},
    transport::smtp::{self, authentication::Credentials},
};
use tracing::{debug, error};

use crate::{Notification, Notifier, NotifyError, NotifyErrorKind};

/// Where and as whom to submit mail.
#[derive(Clone)]
pub struct SmtpSettings {
    pub host: String,
    /// Implicit TLS port, usually 465.
    pub port: u16,
    pub username: String,
    pub password: String,
    pub from: Mailbox,
    /// Upper bound for one complete send, connection included.
    pub timeout: Duration,
}

impl std::fmt::Debug for SmtpSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SmtpSettings")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("username", &self.username)
            .field("password", &"***")
            .field("from", &self.from)
            .field("timeout", &self.timeout)
            .finish()
    }
}

/// Sends notifications through an authenticated SMTPS relay.
pub struct SmtpNotifier {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
    host: String,
    timeout: Duration,
}

impl SmtpNotifier {
    /// Set up the transport. No connection is opened until the first send.
    pub fn new(settings: SmtpSettings) -> Result<Self, NotifyError> {
        let transport = AsyncSmtpTransport::<Tokio1Executor>::relay(&settings.host)
            .map_err(|err| NotifyError::Transport(err.to_string()))?
            .port(settings.port)
            .credentials(Credentials::new(settings.username, settings.password))
            .timeout(Some(settings.timeout))
            .build();

        Ok(Self {
            transport,
            from: settings.from,
            host: settings.host,
            timeout: settings.timeout,
        })
    }
}

#[async_trait]
impl Notifier for SmtpNotifier {
    async fn send(&self, notification: &Notification) -> Result<(), NotifyError> {
        let message = compose(&self.from, notification)?;

        debug!(
            host = %self.host,
            recipient = %notification.recipient,
            attachment = %notification.attachment.filename,
            "Sending mail"
        );

        match tokio::time::timeout(self.timeout, self.transport.send(message)).await {
            Ok(Ok(response)) => {
                debug!(code = %response.code(), "Mail accepted");
                Ok(())
            }
            Ok(Err(err)) => {
                let failure = classify(&err);
                error!(kind = %failure.kind(), %err, "Mail delivery failed");
                Err(failure)
            }
            Err(_) => {
                error!(timeout = ?self.timeout, "Mail delivery timed out");
                Err(NotifyError::Transport(format!(
                    "no answer from {} within {} s",
                    self.host,
                    self.timeout.as_secs()
                )))
            }
        }
    }
}

/// Build the multipart message: a UTF-8 text body followed by the attachment.
pub fn compose(from: &Mailbox, notification: &Notification) -> Result<Message, NotifyError> {
    let file = &notification.attachment;
    let content_type = ContentType::parse(&file.content_type).map_err(|err| {
        NotifyError::Unknown(format!("invalid attachment type '{}': {err}", file.content_type))
    })?;

    Message::builder()
        .from(from.clone())
        .to(notification.recipient.clone())
        .subject(notification.subject.clone())
        .multipart(
            MultiPart::mixed()
                .singlepart(SinglePart::plain(notification.body.clone()))
                .singlepart(Attachment::new(file.filename.clone()).body(file.bytes.clone(), content_type)),
        )
        .map_err(|err| NotifyError::Unknown(format!("could not compose message: {err}")))
}

fn classify(err: &smtp::Error) -> NotifyError {
    let code = err
        .status()
        .and_then(|code| code.to_string().parse::<u16>().ok());
    let message = err.to_string();

    match kind_for(code, err.is_client()) {
        NotifyErrorKind::Auth => NotifyError::Auth(message),
        NotifyErrorKind::Transport => NotifyError::Transport(message),
        NotifyErrorKind::Unknown => NotifyError::Unknown(message),
    }
}

/// Map an SMTP failure to its kind. `code` is the server's reply code, if the
/// failure was a reply at all.
fn kind_for(code: Option<u16>, is_client: bool) -> NotifyErrorKind {
    match code {
        // authentication required / mechanism too weak / credentials invalid
        Some(530 | 534 | 535) => NotifyErrorKind::Auth,
        // transient: service unavailable, TLS not available now, ...
        Some(400..=499) => NotifyErrorKind::Transport,
        Some(_) => NotifyErrorKind::Unknown,
        None if is_client => NotifyErrorKind::Unknown,
        None => NotifyErrorKind::Transport,
    }
}
