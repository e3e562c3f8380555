use std::sync::Arc;
use std::sync::atomic::Ordering;
use std::time::Duration;

use ambience_services::PollOutcome;
use serde_json::Value;

use crate::fixtures::mocks::FailingTranscriber;
use crate::fixtures::test_app::{TestApp, TestOptions, fast_policy};

#[tokio::test]
async fn exhausted_step_marks_the_run_failed() {
    let transcriber = Arc::new(FailingTranscriber::default());
    let app = TestApp::spawn_with(TestOptions {
        transcriber: transcriber.clone(),
        ..TestOptions::default()
    })
    .await;

    let run_id = app.trigger(&[("a.mp3", b"AUDIO")]).await;
    assert_eq!(
        app.poll_to_terminal(&run_id).await,
        PollOutcome::Failed(run_id.clone())
    );

    // initial attempt plus three retries
    assert_eq!(transcriber.calls.load(Ordering::SeqCst), 4);

    let resp = app
        .client
        .get(app.url(&format!("/api/status/{run_id}")))
        .send()
        .await
        .unwrap();
    let json: Value = resp.json().await.unwrap();
    assert_eq!(json["status"], "failed");

    // the fan-out steps are independent: the summary still landed even
    // though transcription never did
    let resp = app
        .client
        .get(app.url(&format!("/api/transcription/{run_id}")))
        .send()
        .await
        .unwrap();
    let json: Value = resp.json().await.unwrap();
    assert!(json["transcription"].is_null());
    assert_eq!(json["summary"], "Mock conversation title");
}

#[tokio::test]
async fn trigger_beyond_the_parallelism_ceiling_is_throttled() {
    let mut policy = fast_policy();
    policy.parallelism = 1;
    let app = TestApp::spawn_with(TestOptions {
        policy,
        merge_delay: Duration::from_millis(500),
        ..TestOptions::default()
    })
    .await;

    // first run occupies the single slot while its merge sleeps
    let run_id = app.trigger(&[("a.mp3", b"A")]).await;

    let resp = app.post_audio(&[("file", "b.mp3", b"B")]).await;
    assert_eq!(resp.status().as_u16(), 429);

    // once the first run finishes, the slot frees up (the permit drops
    // just after the final status write lands)
    assert_eq!(
        app.poll_to_terminal(&run_id).await,
        PollOutcome::Complete(run_id.clone())
    );
    tokio::time::sleep(Duration::from_millis(50)).await;
    let resp = app.post_audio(&[("file", "c.mp3", b"C")]).await;
    assert_eq!(resp.status().as_u16(), 200);
}

#[tokio::test]
async fn throttling_is_per_user() {
    let mut policy = fast_policy();
    policy.parallelism = 1;
    let app = TestApp::spawn_with(TestOptions {
        policy,
        merge_delay: Duration::from_millis(500),
        ..TestOptions::default()
    })
    .await;

    app.trigger(&[("a.mp3", b"A")]).await;
    let resp = app.post_audio(&[("file", "b.mp3", b"B")]).await;
    assert_eq!(resp.status().as_u16(), 429);

    // a different browser (fresh cookie jar) is not affected
    let other = reqwest::Client::builder()
        .cookie_store(true)
        .build()
        .unwrap();
    let part = reqwest::multipart::Part::bytes(b"C".to_vec())
        .file_name("c.mp3")
        .mime_str("audio/mpeg")
        .unwrap();
    let form = reqwest::multipart::Form::new().part("file", part);
    let resp = other
        .post(app.url("/api/transcribe"))
        .multipart(form)
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status().as_u16(), 200);
}
