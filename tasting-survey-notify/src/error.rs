use std::fmt;

/// Error type for a single delivery attempt.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum NotifyError {
    /// The mail server rejected the configured credentials.
    #[error("Mail server rejected the credentials: {0}")]
    Auth(String),

    /// Connection, TLS or network failure, or no answer in time.
    #[error("Could not reach the mail server: {0}")]
    Transport(String),

    /// Anything else, including failures while composing the message.
    #[error("Sending failed: {0}")]
    Unknown(String),
}

impl NotifyError {
    pub fn kind(&self) -> NotifyErrorKind {
        match self {
            Self::Auth(_) => NotifyErrorKind::Auth,
            Self::Transport(_) => NotifyErrorKind::Transport,
            Self::Unknown(_) => NotifyErrorKind::Unknown,
        }
    }

    /// Whether resubmitting unchanged may succeed. Credential problems need
    /// an operator first.
    pub fn is_retryable(&self) -> bool {
        !matches!(self, Self::Auth(_))
    }

    /// The underlying message without the kind prefix.
    pub fn detail(&self) -> &str {
        match self {
            Self::Auth(msg) | Self::Transport(msg) | Self::Unknown(msg) => msg,
        }
    }
}

/// The category of a [`NotifyError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NotifyErrorKind {
    Auth,
    Transport,
    Unknown,
}

impl NotifyErrorKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Auth => "AuthError",
            Self::Transport => "TransportError",
            Self::Unknown => "Unknown",
        }
    }
}

impl fmt::Display for NotifyErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
