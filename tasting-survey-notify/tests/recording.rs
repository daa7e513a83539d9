use tasting_survey_notify::{
    FileAttachment, Notification, Notifier, NotifyError, NotifyErrorKind, RecordingNotifier,
};

fn notification(subject: &str) -> Notification {
    Notification {
        recipient: "survey@example.com".parse().unwrap(),
        subject: subject.to_string(),
        body: "Results attached.".to_string(),
        attachment: FileAttachment::new("survey.json", b"{}".to_vec(), "application/json"),
    }
}

#[tokio::test]
async fn records_accepted_notifications() {
    let notifier = RecordingNotifier::new();

    notifier.send(&notification("first")).await.unwrap();
    notifier.send(&notification("second")).await.unwrap();

    let sent = notifier.sent();
    assert_eq!(sent.len(), 2);
    assert_eq!(sent[0].subject, "first");
    assert_eq!(sent[1].attachment.filename, "survey.json");
    assert_eq!(notifier.attempts(), 2);
}

#[tokio::test]
async fn queued_failures_come_first() {
    let notifier = RecordingNotifier::new()
        .then_fail(NotifyError::Auth("535 rejected".into()))
        .then_fail(NotifyError::Transport("connection reset".into()));

    let first = notifier.send(&notification("a")).await.unwrap_err();
    let second = notifier.send(&notification("b")).await.unwrap_err();
    notifier.send(&notification("c")).await.unwrap();

    assert_eq!(first.kind(), NotifyErrorKind::Auth);
    assert_eq!(second.kind(), NotifyErrorKind::Transport);
    assert_eq!(notifier.attempts(), 3);
    assert_eq!(notifier.sent().len(), 1);
    assert_eq!(notifier.sent()[0].subject, "c");
}

#[tokio::test]
async fn failures_can_be_queued_while_shared() {
    let notifier = std::sync::Arc::new(RecordingNotifier::new());
    notifier.fail_next(NotifyError::Unknown("boom".into()));

    let result = notifier.send(&notification("a")).await;

    assert_eq!(result, Err(NotifyError::Unknown("boom".into())));
    assert!(notifier.sent().is_empty());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn counts_concurrent_attempts() {
    let notifier = std::sync::Arc::new(RecordingNotifier::new());

    let tasks: Vec<_> = (0..16)
        .map(|i| {
            let notifier = notifier.clone();
            tokio::spawn(async move { notifier.send(&notification(&i.to_string())).await })
        })
        .collect();
    for task in tasks {
        task.await.unwrap().unwrap();
    }

    assert_eq!(notifier.attempts(), 16);
    assert_eq!(notifier.sent().len(), 16);
}

#[tokio::test]
async fn delay_holds_the_send() {
    let notifier = RecordingNotifier::new().with_delay(std::time::Duration::from_millis(100));

    let started = std::time::Instant::now();
    notifier.send(&notification("slow")).await.unwrap();

    assert!(started.elapsed() >= std::time::Duration::from_millis(100));
    assert_eq!(notifier.sent().len(), 1);
}
