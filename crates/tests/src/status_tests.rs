use crate::fixtures::test_app::TestApp;
use serde_json::Value;

#[tokio::test]
async fn unknown_run_reports_unknown_status() {
    let app = TestApp::spawn().await;

    let resp = app
        .client
        .get(app.url("/api/status/wfr_does_not_exist"))
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status().as_u16(), 200);
    let json: Value = resp.json().await.unwrap();
    assert_eq!(json["status"], "unknown");
}

#[tokio::test]
async fn health_reports_ok() {
    let app = TestApp::spawn().await;

    let resp = app.client.get(app.url("/health")).send().await.unwrap();
    assert_eq!(resp.status().as_u16(), 200);
    let json: Value = resp.json().await.unwrap();
    assert_eq!(json["status"], "ok");
}

#[tokio::test]
async fn identity_cookie_is_issued_once() {
    let app = TestApp::spawn().await;

    let resp = app.client.get(app.url("/health")).send().await.unwrap();
    let set_cookie = resp
        .headers()
        .get("set-cookie")
        .expect("first visit sets the identity cookie")
        .to_str()
        .unwrap()
        .to_string();
    assert!(set_cookie.starts_with("ambience_user_id="));
    assert!(set_cookie.contains("Max-Age=31536000"));
    assert!(set_cookie.contains("HttpOnly"));
    assert!(set_cookie.contains("SameSite=Lax"));

    // the cookie store now presents it, so no new cookie is minted
    let resp = app.client.get(app.url("/health")).send().await.unwrap();
    assert!(resp.headers().get("set-cookie").is_none());
}
