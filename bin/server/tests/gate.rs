//! End-to-end tests of the login flow and the file gate.
//!
//! The identity provider is a wiremock server; requests go through the full
//! router with `oneshot`.

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode, header},
    response::Response,
};
use fbrp_server::{
    app,
    auth::AppState,
    config::{GateConfig, ProviderConfig, SessionConfig},
};
use tempfile::TempDir;
use tower::ServiceExt; // for `oneshot`
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const SECRET_GROUP: &str = "secret-group";
const FILE_BODY: &str = "hello, members";

struct Harness {
    app: Router,
    provider: MockServer,
    _root: TempDir,
}

fn test_config(provider: &MockServer, root: &TempDir) -> GateConfig {
    GateConfig {
        app_id: "app-123".to_string(),
        app_secret: "app-secret".to_string(),
        hostname: "gate.test".to_string(),
        secret_group_id: SECRET_GROUP.to_string(),
        serve_root: root.path().to_path_buf(),
        internal_port: 0,
        session_secret: "test-session-secret".to_string(),
        provider: ProviderConfig {
            auth_url: format!("{}/dialog/oauth", provider.uri()),
            token_url: format!("{}/oauth/access_token", provider.uri()),
            profile_url: format!("{}/me", provider.uri()),
            ..ProviderConfig::default()
        },
        session: SessionConfig::default(),
    }
}

async fn harness() -> Harness {
    let provider = MockServer::start().await;
    let root = tempfile::tempdir().expect("temp dir");
    std::fs::write(root.path().join("hello.txt"), FILE_BODY).expect("write file");

    let state = AppState::new(test_config(&provider, &root)).expect("app state");
    Harness {
        app: app::router(state),
        provider,
        _root: root,
    }
}

impl Harness {
    async fn get(&self, uri: &str, cookie: Option<&str>) -> Response {
        let mut request = Request::builder().uri(uri);
        if let Some(cookie) = cookie {
            request = request.header(header::COOKIE, cookie);
        }
        self.app
            .clone()
            .oneshot(request.body(Body::empty()).expect("request"))
            .await
            .expect("response")
    }

    async fn token_endpoint_accepts(&self) {
        Mock::given(method("POST"))
            .and(path("/oauth/access_token"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "access_token": "tok-1",
                "token_type": "bearer",
                "expires_in": 3600
            })))
            .mount(&self.provider)
            .await;
    }

    async fn profile_returns(&self, body: serde_json::Value) {
        Mock::given(method("GET"))
            .and(path("/me"))
            .respond_with(ResponseTemplate::new(200).set_body_json(body))
            .mount(&self.provider)
            .await;
    }

    /// Runs the callback and returns the session cookie it set.
    async fn complete_login(&self) -> String {
        let response = self
            .get("/auth/login/facebook/callback?code=abc&state=login", None)
            .await;
        assert_eq!(response.status(), StatusCode::MOVED_PERMANENTLY);
        assert_eq!(location(&response), "/");
        session_cookie(&response)
    }
}

fn profile_with_groups(groups: &[&str]) -> serde_json::Value {
    let data: Vec<_> = groups
        .iter()
        .map(|id| serde_json::json!({ "id": id }))
        .collect();
    serde_json::json!({
        "id": "42",
        "name": "Alice",
        "groups": { "data": data }
    })
}

fn location(response: &Response) -> &str {
    response
        .headers()
        .get(header::LOCATION)
        .expect("location header")
        .to_str()
        .expect("ascii location")
}

/// Returns the `name=value` part of the response's Set-Cookie header.
fn session_cookie(response: &Response) -> String {
    let set_cookie = response
        .headers()
        .get(header::SET_COOKIE)
        .expect("set-cookie header")
        .to_str()
        .expect("ascii cookie");
    set_cookie
        .split(';')
        .next()
        .expect("cookie pair")
        .to_string()
}

async fn body_string(response: Response) -> String {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body");
    String::from_utf8(bytes.to_vec()).expect("utf-8 body")
}

#[tokio::test]
async fn files_without_session_are_forbidden() {
    let h = harness().await;

    let response = h.get("/files/hello.txt", None).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let body = body_string(response).await;
    assert!(body.contains("not logged in, login first"));
    assert!(body.contains("Logged in? No!"));
    assert!(!body.contains(FILE_BODY));
}

#[tokio::test]
async fn unsigned_cookie_is_treated_as_logged_out() {
    let h = harness().await;

    let forged = r#"fbrp_session={"has_auth":true}"#;
    let response = h.get("/files/hello.txt", Some(forged)).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn login_redirects_to_provider() {
    let h = harness().await;

    let response = h.get("/auth/login", None).await;
    assert_eq!(response.status(), StatusCode::MOVED_PERMANENTLY);

    let target = location(&response);
    assert!(target.starts_with(&format!("{}/dialog/oauth?", h.provider.uri())));
    assert!(target.contains("client_id=app-123"));
    assert!(target.contains("state=login"));
}

#[tokio::test]
async fn member_login_grants_file_access() {
    let h = harness().await;
    h.token_endpoint_accepts().await;
    h.profile_returns(profile_with_groups(&["other", SECRET_GROUP]))
        .await;

    let cookie = h.complete_login().await;

    let response = h.get("/files/hello.txt", Some(&cookie)).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_string(response).await, FILE_BODY);

    let response = h.get("/files/missing.txt", Some(&cookie)).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn logout_revokes_file_access() {
    let h = harness().await;
    h.token_endpoint_accepts().await;
    h.profile_returns(profile_with_groups(&[SECRET_GROUP])).await;

    let cookie = h.complete_login().await;
    assert_eq!(
        h.get("/files/hello.txt", Some(&cookie)).await.status(),
        StatusCode::OK
    );

    let response = h.get("/auth/logout", Some(&cookie)).await;
    assert_eq!(response.status(), StatusCode::MOVED_PERMANENTLY);
    assert_eq!(location(&response), "/");
    let cookie = session_cookie(&response);

    let response = h.get("/files/hello.txt", Some(&cookie)).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn logout_without_session_still_redirects() {
    let h = harness().await;

    let response = h.get("/auth/logout", None).await;
    assert_eq!(response.status(), StatusCode::MOVED_PERMANENTLY);
    let cookie = session_cookie(&response);

    let response = h.get("/files/hello.txt", Some(&cookie)).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn non_member_login_is_forbidden() {
    let h = harness().await;
    h.token_endpoint_accepts().await;
    h.profile_returns(profile_with_groups(&["A", "B"])).await;

    let cookie = h.complete_login().await;

    let response = h.get("/files/hello.txt", Some(&cookie)).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn malformed_profile_is_forbidden() {
    let h = harness().await;
    h.token_endpoint_accepts().await;
    h.profile_returns(serde_json::json!({ "id": "42", "name": "Alice" }))
        .await;

    let cookie = h.complete_login().await;

    let response = h.get("/files/hello.txt", Some(&cookie)).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn failed_exchange_skips_group_check() {
    let h = harness().await;
    Mock::given(method("POST"))
        .and(path("/oauth/access_token"))
        .respond_with(ResponseTemplate::new(400).set_body_json(serde_json::json!({
            "error": "invalid_grant"
        })))
        .mount(&h.provider)
        .await;
    Mock::given(method("GET"))
        .and(path("/me"))
        .respond_with(ResponseTemplate::new(200).set_body_json(profile_with_groups(&[
            SECRET_GROUP,
        ])))
        .expect(0)
        .mount(&h.provider)
        .await;

    let cookie = h.complete_login().await;

    let response = h.get("/files/hello.txt", Some(&cookie)).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn failed_exchange_logs_out_a_previous_session() {
    let h = harness().await;
    h.token_endpoint_accepts().await;
    h.profile_returns(profile_with_groups(&[SECRET_GROUP])).await;
    let cookie = h.complete_login().await;

    h.provider.reset().await;
    Mock::given(method("POST"))
        .and(path("/oauth/access_token"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&h.provider)
        .await;

    let response = h
        .get("/auth/login/facebook/callback?code=abc", Some(&cookie))
        .await;
    assert_eq!(response.status(), StatusCode::MOVED_PERMANENTLY);
    let cookie = session_cookie(&response);

    let response = h.get("/files/hello.txt", Some(&cookie)).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn repeated_code_parameter_logs_out() {
    let h = harness().await;
    h.token_endpoint_accepts().await;
    h.profile_returns(profile_with_groups(&[SECRET_GROUP])).await;
    let cookie = h.complete_login().await;

    h.provider.reset().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&h.provider)
        .await;

    let response = h
        .get(
            "/auth/login/facebook/callback?code=abc&code=def&state=login",
            Some(&cookie),
        )
        .await;
    assert_eq!(response.status(), StatusCode::MOVED_PERMANENTLY);
    assert_eq!(location(&response), "/");
    let cookie = session_cookie(&response);

    let response = h.get("/files/hello.txt", Some(&cookie)).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn declined_login_makes_no_provider_calls() {
    let h = harness().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&h.provider)
        .await;

    let response = h
        .get(
            "/auth/login/facebook/callback?error=access_denied&error_description=Permissions+error",
            None,
        )
        .await;
    assert_eq!(response.status(), StatusCode::MOVED_PERMANENTLY);
    assert_eq!(location(&response), "/");
}

#[tokio::test]
async fn index_reports_login_state() {
    let h = harness().await;
    h.token_endpoint_accepts().await;
    h.profile_returns(profile_with_groups(&[SECRET_GROUP])).await;

    let response = h.get("/", None).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(response.headers().get(header::SET_COOKIE).is_none());
    assert!(body_string(response).await.contains("Logged in? No!"));

    let cookie = h.complete_login().await;
    let response = h.get("/", Some(&cookie)).await;
    assert!(body_string(response).await.contains("Logged in? yes!"));
}

#[tokio::test]
async fn unknown_paths_show_the_status_page() {
    let h = harness().await;

    let response = h.get("/no/such/page", None).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(body_string(response).await.contains("Logged in? No!"));
}

#[tokio::test]
async fn empty_session_secret_fails_startup() {
    let provider = MockServer::start().await;
    let root = tempfile::tempdir().expect("temp dir");
    let mut config = test_config(&provider, &root);
    config.session_secret = String::new();

    assert!(AppState::new(config).is_err());
}

#[tokio::test]
async fn oversized_cookie_lifetime_fails_startup() {
    let provider = MockServer::start().await;
    let root = tempfile::tempdir().expect("temp dir");
    let mut config = test_config(&provider, &root);
    config.session.max_age_days = i64::MAX / 2;

    assert!(AppState::new(config).is_err());
}

#[tokio::test]
async fn zero_timeout_fails_startup() {
    let provider = MockServer::start().await;
    let root = tempfile::tempdir().expect("temp dir");
    let mut config = test_config(&provider, &root);
    config.provider.timeout_seconds = 0;

    assert!(AppState::new(config).is_err());
}
