//! The submission pipeline: form state in, one email out.

use std::fmt;
use std::sync::Arc;

use chrono::{DateTime, FixedOffset, Local};
use tasting_survey_notify::{
    FileAttachment, Mailbox, Notification, Notifier, NotifyError, NotifyErrorKind,
};
use tasting_survey_types::{Catalog, FormState, ResponseModel, json};
use tracing::{debug, error, info};

/// Where a session is in the submission state machine.
///
/// `Idle -> Submitting -> Submitted` on success, and
/// `Idle -> Submitting -> Failed -> Idle` when delivery fails.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Phase {
    #[default]
    Idle,
    Submitting,
    Failed,
    Submitted,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Idle => "idle",
            Self::Submitting => "submitting",
            Self::Failed => "failed",
            Self::Submitted => "submitted",
        };
        f.write_str(name)
    }
}

/// The "already submitted" flag of one session. Only ever goes from false
/// to true.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SubmissionState {
    submitted: bool,
}

impl SubmissionState {
    pub fn is_submitted(self) -> bool {
        self.submitted
    }
}

/// Per-session state handed to the controller for every submit.
#[derive(Debug, Default)]
pub struct Session {
    state: SubmissionState,
    phase: Phase,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> SubmissionState {
        self.state
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn is_submitted(&self) -> bool {
        self.state.is_submitted()
    }

    fn transition(&mut self, to: Phase) {
        debug!(from = %self.phase, %to, "Session phase change");
        self.phase = to;
    }

    pub(crate) fn complete(&mut self) {
        self.transition(Phase::Submitted);
        self.state.submitted = true;
    }
}

/// Error type for a failed submit attempt.
#[derive(Debug, thiserror::Error)]
pub enum SubmitError {
    #[error(transparent)]
    Notify(#[from] NotifyError),

    #[error("Could not serialize the response: {0}")]
    Serialize(#[from] serde_json::Error),
}

impl SubmitError {
    pub fn kind(&self) -> NotifyErrorKind {
        match self {
            Self::Notify(err) => err.kind(),
            Self::Serialize(_) => NotifyErrorKind::Unknown,
        }
    }

    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Notify(err) => err.is_retryable(),
            Self::Serialize(_) => true,
        }
    }
}

/// What a submit attempt ended in.
#[derive(Debug)]
pub enum SubmitOutcome {
    /// The email went out; the session is now complete.
    Submitted { filename: String },

    /// The session had already submitted. Nothing was sent.
    AlreadySubmitted,

    /// Delivery failed. The session is back to idle and may try again.
    Failed(SubmitError),
}

/// How the submission email is addressed and worded.
#[derive(Debug, Clone)]
pub struct MailSettings {
    pub recipient: Mailbox,
    pub subject: String,
    /// Body text; `{name}` is replaced with the submitter's name.
    pub body_template: String,
    /// Attachment files are named `<prefix>_<YYYYmmdd_HHMMSS>.json`.
    pub attachment_prefix: String,
    /// Stands in for `{name}` when the submitter left the name empty.
    pub anonymous_name: String,
}

impl MailSettings {
    pub fn new(recipient: Mailbox) -> Self {
        Self {
            recipient,
            subject: "Neue Pralinen-Umfrage eingegangen".to_string(),
            body_template: "Es wurde eine neue Umfrage von {name} ausgefüllt. \
                            Die Ergebnisse befinden sich im Anhang."
                .to_string(),
            attachment_prefix: "survey".to_string(),
            anonymous_name: "anonym".to_string(),
        }
    }

    fn body_for(&self, name: &str) -> String {
        let name = if name.is_empty() { self.anonymous_name.as_str() } else { name };
        self.body_template.replace("{name}", name)
    }
}

/// Runs submissions for every session against one catalog and notifier.
///
/// Holds no per-session state itself; each call gets the session it acts on.
pub struct SubmissionController {
    catalog: Arc<Catalog>,
    notifier: Arc<dyn Notifier>,
    mail: MailSettings,
}

impl SubmissionController {
    pub fn new(catalog: Arc<Catalog>, notifier: Arc<dyn Notifier>, mail: MailSettings) -> Self {
        Self {
            catalog,
            notifier,
            mail,
        }
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// Submit the form for `session`, stamped with the current local time.
    pub async fn submit(&self, session: &mut Session, form: &FormState) -> SubmitOutcome {
        self.submit_at(session, form, Local::now().fixed_offset()).await
    }

    /// Submit the form for `session`, stamped with `now`.
    pub async fn submit_at(
        &self,
        session: &mut Session,
        form: &FormState,
        now: DateTime<FixedOffset>,
    ) -> SubmitOutcome {
        if session.is_submitted() {
            debug!("Session already submitted, not sending again");
            return SubmitOutcome::AlreadySubmitted;
        }

        session.transition(Phase::Submitting);

        match self.deliver(form, now).await {
            Ok(filename) => {
                session.complete();
                info!(%filename, "Survey submitted");
                SubmitOutcome::Submitted { filename }
            }
            Err(err) => {
                session.transition(Phase::Failed);
                error!(kind = %err.kind(), %err, "Survey submission failed");
                session.transition(Phase::Idle);
                SubmitOutcome::Failed(err)
            }
        }
    }

    async fn deliver(&self, form: &FormState, now: DateTime<FixedOffset>) -> Result<String, SubmitError> {
        let model = ResponseModel::build(&self.catalog, form, now);
        let bytes = json::to_json(&model)?;
        let filename = attachment_filename(&self.mail.attachment_prefix, &now);

        let notification = Notification {
            recipient: self.mail.recipient.clone(),
            subject: self.mail.subject.clone(),
            body: self.mail.body_for(&model.name),
            attachment: FileAttachment::new(filename.clone(), bytes, json::CONTENT_TYPE),
        };

        self.notifier.send(&notification).await?;
        Ok(filename)
    }
}

/// `<prefix>_<YYYYmmdd_HHMMSS>.json`
pub fn attachment_filename(prefix: &str, at: &DateTime<FixedOffset>) -> String {
    format!("{prefix}_{}.json", at.format("%Y%m%d_%H%M%S"))
}

#[cfg(test)]
mod tests {
    use tasting_survey_notify::RecordingNotifier;
    use tasting_survey_types::{Item, RatingField, RatingScale};

    use super::*;

    fn controller(notifier: Arc<RecordingNotifier>) -> SubmissionController {
        let catalog = Catalog::new(
            "t",
            RatingScale::new(["1", "2", "3"]),
            vec![RatingField::new("overall", "?")],
            vec![Item::new("a", "A")],
        )
        .unwrap();
        let recipient = "survey@example.com".parse().unwrap();
        SubmissionController::new(Arc::new(catalog), notifier, MailSettings::new(recipient))
    }

    fn now() -> DateTime<FixedOffset> {
        DateTime::parse_from_rfc3339("2024-05-01T09:05:03+02:00").unwrap()
    }

    #[test]
    fn filename_embeds_compact_timestamp() {
        assert_eq!(attachment_filename("survey", &now()), "survey_20240501_090503.json");
        assert_eq!(attachment_filename("umfrage", &now()), "umfrage_20240501_090503.json");
    }

    #[test]
    fn body_mentions_submitter() {
        let mail = MailSettings::new("survey@example.com".parse().unwrap());
        assert_eq!(
            mail.body_for("Anna"),
            "Es wurde eine neue Umfrage von Anna ausgefüllt. Die Ergebnisse befinden sich im Anhang."
        );
    }

    #[test]
    fn empty_name_uses_placeholder() {
        let mut mail = MailSettings::new("survey@example.com".parse().unwrap());
        assert!(mail.body_for("").contains("von anonym ausgefüllt"));

        mail.anonymous_name = "Unbekannt".to_string();
        assert!(mail.body_for("").contains("von Unbekannt ausgefüllt"));
    }

    #[tokio::test]
    async fn success_completes_session() {
        let notifier = Arc::new(RecordingNotifier::new());
        let controller = controller(notifier.clone());
        let mut session = Session::new();

        let outcome = controller.submit_at(&mut session, &FormState::new(), now()).await;

        assert!(matches!(outcome, SubmitOutcome::Submitted { ref filename } if filename == "survey_20240501_090503.json"));
        assert_eq!(session.phase(), Phase::Submitted);
        assert!(session.state().is_submitted());
        assert_eq!(notifier.sent()[0].attachment.content_type, "application/json");
    }

    #[tokio::test]
    async fn failure_returns_to_idle() {
        let notifier = Arc::new(RecordingNotifier::new().then_fail(NotifyError::Unknown("boom".into())));
        let controller = controller(notifier.clone());
        let mut session = Session::new();

        let outcome = controller.submit_at(&mut session, &FormState::new(), now()).await;

        let SubmitOutcome::Failed(err) = outcome else {
            panic!("expected a failed outcome");
        };
        assert_eq!(err.kind(), NotifyErrorKind::Unknown);
        assert_eq!(session.phase(), Phase::Idle);
        assert!(!session.is_submitted());
    }
}
