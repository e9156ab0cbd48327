//! End-to-end fan-out against two local mirrors over real HTTP.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::extract::State;
use axum::http::{HeaderMap, StatusCode, Uri};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::{json, Value};

use forkast_sdk::{
    build_hmac_signature, AttestationRequest, AuthContext, ForkastError, KeyClient, KeysConfig,
};

const SECRET: &str = "c2VjcmV0LWtleS1ieXRlcw==";
const ADDRESS: &str = "0x1234567890123456789012345678901234567890";

struct Mirror {
    issued: Value,
    issue_delay: Duration,
    keys: Vec<&'static str>,
    revoke_status: StatusCode,
    calls: Mutex<Vec<String>>,
}

impl Mirror {
    fn new(issued: Value, keys: Vec<&'static str>, revoke_status: StatusCode) -> Self {
        Self {
            issued,
            issue_delay: Duration::ZERO,
            keys,
            revoke_status,
            calls: Mutex::new(Vec::new()),
        }
    }

    fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

fn header<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers.get(name).and_then(|value| value.to_str().ok())
}

fn verify_l2(headers: &HeaderMap, method: &str, uri: &Uri) -> bool {
    let (Some(timestamp), Some(signature)) = (
        header(headers, "forkast_timestamp"),
        header(headers, "forkast_signature"),
    ) else {
        return false;
    };
    let path = uri.path_and_query().map(|pq| pq.as_str()).unwrap_or("/");
    let expected = build_hmac_signature(SECRET, timestamp, method, path, None).unwrap();
    signature == expected
        && header(headers, "forkast_api_key") == Some("active")
        && header(headers, "forkast_passphrase") == Some("phrase")
}

async fn issue(State(mirror): State<Arc<Mirror>>, headers: HeaderMap) -> (StatusCode, Json<Value>) {
    mirror.calls.lock().unwrap().push("issue".into());
    if header(&headers, "forkast_signature").is_none() || header(&headers, "forkast_nonce").is_none() {
        return (StatusCode::BAD_REQUEST, Json(json!({"message": "missing attestation"})));
    }
    tokio::time::sleep(mirror.issue_delay).await;
    (StatusCode::OK, Json(mirror.issued.clone()))
}

async fn list(
    State(mirror): State<Arc<Mirror>>,
    headers: HeaderMap,
    uri: Uri,
) -> (StatusCode, Json<Value>) {
    mirror.calls.lock().unwrap().push("list".into());
    if !verify_l2(&headers, "GET", &uri) {
        return (StatusCode::UNAUTHORIZED, Json(json!({"error": "bad signature"})));
    }
    (StatusCode::OK, Json(json!(mirror.keys)))
}

async fn revoke(
    State(mirror): State<Arc<Mirror>>,
    headers: HeaderMap,
    uri: Uri,
) -> (StatusCode, Json<Value>) {
    mirror
        .calls
        .lock()
        .unwrap()
        .push(format!("revoke {}", uri.query().unwrap_or_default()));
    if !verify_l2(&headers, "DELETE", &uri) {
        return (StatusCode::UNAUTHORIZED, Json(json!({"error": "bad signature"})));
    }
    (mirror.revoke_status, Json(json!({"message": "revoke result"})))
}

async fn spawn_mirror(mirror: Arc<Mirror>) -> String {
    let app = Router::new()
        .route("/auth/api-key", post(issue).delete(revoke))
        .route("/auth/api-keys", get(list))
        .with_state(mirror);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{addr}")
}

fn client(endpoints: &[&str]) -> KeyClient {
    let config = KeysConfig::default()
        .with_endpoints(endpoints.iter().copied())
        .with_timeout(Duration::from_secs(5))
        .with_debug_errors(false);
    KeyClient::new(config).unwrap()
}

fn auth() -> AuthContext {
    AuthContext {
        address: ADDRESS.into(),
        api_key: "active".into(),
        api_secret: SECRET.into(),
        passphrase: "phrase".into(),
    }
}

async fn two_mirrors() -> (Arc<Mirror>, Arc<Mirror>, String, String) {
    let mut a = Mirror::new(
        json!({"apiKey": "k1", "secret": SECRET, "passphrase": "p1"}),
        vec!["k1", "k2"],
        StatusCode::INTERNAL_SERVER_ERROR,
    );
    a.issue_delay = Duration::from_millis(100);
    let b = Mirror::new(
        json!({"data": {"api_key": "k2", "api_secret": SECRET, "api_passphrase": "p2"}}),
        vec!["k2", "k3"],
        StatusCode::NO_CONTENT,
    );
    let (a, b) = (Arc::new(a), Arc::new(b));
    let url_a = spawn_mirror(a.clone()).await;
    let url_b = spawn_mirror(b.clone()).await;
    (a, b, url_a, url_b)
}

#[tokio::test]
async fn test_issue_prefers_first_configured_mirror() {
    let (a, b, url_a, url_b) = two_mirrors().await;
    let request = AttestationRequest::new(ADDRESS, "0xsig", "1700000000", "").unwrap();

    let bundle = client(&[url_a.as_str(), url_b.as_str()]).issue(&request).await.unwrap();

    assert_eq!(bundle.api_key, "k1");
    assert_eq!(bundle.passphrase, "p1");
    assert_eq!(a.calls(), vec!["issue"]);
    assert_eq!(b.calls(), vec!["issue"]);
}

#[tokio::test]
async fn test_issue_falls_back_to_second_mirror() {
    let (_a, _b, _url_a, url_b) = two_mirrors().await;
    let request = AttestationRequest::new(ADDRESS, "0xsig", "1700000000", "5").unwrap();

    let bundle = client(&["http://127.0.0.1:1", url_b.as_str()])
        .issue(&request)
        .await
        .unwrap();
    assert_eq!(bundle.api_key, "k2");
    assert_eq!(bundle.passphrase, "p2");
}

#[tokio::test]
async fn test_list_unions_signed_responses() {
    let (_a, _b, url_a, url_b) = two_mirrors().await;

    let keys = client(&[url_a.as_str(), url_b.as_str()]).list(&auth()).await.unwrap();
    assert_eq!(keys, vec!["k1", "k2", "k3"]);
}

#[tokio::test]
async fn test_list_with_wrong_secret_is_rejected() {
    let (_a, _b, url_a, url_b) = two_mirrors().await;
    let mut ctx = auth();
    ctx.api_secret = "b3RoZXItc2VjcmV0".into();

    let err = client(&[url_a.as_str(), url_b.as_str()]).list(&ctx).await.unwrap_err();
    assert!(err.is_auth_rejection());
    assert_eq!(
        err.to_string(),
        "Credentials rejected by Forkast. Generate a fresh API key and try again."
    );
}

#[tokio::test]
async fn test_revoke_succeeds_when_any_mirror_accepts() {
    let (a, b, url_a, url_b) = two_mirrors().await;

    client(&[url_a.as_str(), url_b.as_str()]).revoke(&auth(), "k-2").await.unwrap();

    assert_eq!(a.calls(), vec!["revoke apiKey=k-2"]);
    assert_eq!(b.calls(), vec!["revoke apiKey=k-2"]);
}

#[tokio::test]
async fn test_revoke_fails_when_every_mirror_refuses() {
    let (_a, _b, url_a, _url_b) = two_mirrors().await;

    let err = client(&[url_a.as_str()]).revoke(&auth(), "k-2").await.unwrap_err();
    assert!(matches!(err, ForkastError::Api { status: 500, .. }));
    assert_eq!(
        err.to_string(),
        "Forkast is temporarily unavailable. Retry shortly."
    );
}
