use lettre::message::Mailbox;

/// A file carried by a notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileAttachment {
    pub filename: String,
    pub bytes: Vec<u8>,
    /// MIME type, e.g. `application/json`.
    pub content_type: String,
}

impl FileAttachment {
    pub fn new(
        filename: impl Into<String>,
        bytes: impl Into<Vec<u8>>,
        content_type: impl Into<String>,
    ) -> Self {
        Self {
            filename: filename.into(),
            bytes: bytes.into(),
            content_type: content_type.into(),
        }
    }
}

/// One message to one recipient: a plain-text body plus one attachment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub recipient: Mailbox,
    pub subject: String,
    pub body: String,
    pub attachment: FileAttachment,
}
