use ambience_services::PollOutcome;
use serde_json::Value;

use crate::fixtures::test_app::TestApp;

async fn completed_run(app: &TestApp) -> String {
    let run_id = app.trigger(&[("a.mp3", b"AUDIO")]).await;
    assert_eq!(
        app.poll_to_terminal(&run_id).await,
        PollOutcome::Complete(run_id.clone())
    );
    run_id
}

#[tokio::test]
async fn delete_removes_every_trace_of_the_run() {
    let app = TestApp::spawn().await;
    let run_id = completed_run(&app).await;

    let resp = app
        .client
        .delete(app.url(&format!("/api/transcription/{run_id}")))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status().as_u16(), 200);
    let json: Value = resp.json().await.unwrap();
    assert_eq!(json["ok"], true);

    // status reads back as unknown
    let resp = app
        .client
        .get(app.url(&format!("/api/status/{run_id}")))
        .send()
        .await
        .unwrap();
    let json: Value = resp.json().await.unwrap();
    assert_eq!(json["status"], "unknown");

    // artifacts are all gone
    let resp = app
        .client
        .get(app.url(&format!("/api/transcription/{run_id}")))
        .send()
        .await
        .unwrap();
    let json: Value = resp.json().await.unwrap();
    assert!(json["audioUrl"].is_null());
    assert!(json["transcription"].is_null());
    assert!(json["summary"].is_null());

    // and the listing no longer mentions the run
    let resp = app
        .client
        .get(app.url("/api/transcriptions"))
        .send()
        .await
        .unwrap();
    let json: Value = resp.json().await.unwrap();
    assert!(json["workflowData"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn delete_of_unknown_run_is_not_an_error() {
    let app = TestApp::spawn().await;

    let resp = app
        .client
        .delete(app.url("/api/transcription/wfr_never_existed"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status().as_u16(), 200);
    let json: Value = resp.json().await.unwrap();
    assert_eq!(json["ok"], true);
}

#[tokio::test]
async fn blank_rename_preserves_the_original_summary() {
    let app = TestApp::spawn().await;
    let run_id = completed_run(&app).await;

    let resp = app
        .client
        .patch(app.url(&format!("/api/transcription/{run_id}")))
        .json(&serde_json::json!({ "summary": "   " }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status().as_u16(), 200);
    let json: Value = resp.json().await.unwrap();
    assert_eq!(json["ok"], false);

    let resp = app
        .client
        .get(app.url(&format!("/api/transcription/{run_id}")))
        .send()
        .await
        .unwrap();
    let json: Value = resp.json().await.unwrap();
    assert_eq!(json["summary"], "Mock conversation title");
}

#[tokio::test]
async fn rename_updates_subsequent_reads() {
    let app = TestApp::spawn().await;
    let run_id = completed_run(&app).await;

    let resp = app
        .client
        .patch(app.url(&format!("/api/transcription/{run_id}")))
        .json(&serde_json::json!({ "summary": "Quarterly planning call" }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status().as_u16(), 200);

    let resp = app
        .client
        .get(app.url(&format!("/api/transcription/{run_id}")))
        .send()
        .await
        .unwrap();
    let json: Value = resp.json().await.unwrap();
    assert_eq!(json["summary"], "Quarterly planning call");
}

#[tokio::test]
async fn rename_with_non_string_summary_is_rejected() {
    let app = TestApp::spawn().await;
    let run_id = completed_run(&app).await;

    let resp = app
        .client
        .patch(app.url(&format!("/api/transcription/{run_id}")))
        .json(&serde_json::json!({ "summary": 42 }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status().as_u16(), 400);
    let json: Value = resp.json().await.unwrap();
    assert_eq!(json["message"], "Invalid body");
}

#[tokio::test]
async fn listing_requires_the_identity_cookie() {
    let app = TestApp::spawn().await;

    // a client without a cookie store never presents the identity cookie
    let anonymous = reqwest::Client::new();
    let resp = anonymous
        .get(app.url("/api/transcriptions"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status().as_u16(), 401);
}
