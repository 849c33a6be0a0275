// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

use futures_util::future::BoxFuture;
use jsonwebtoken::{encode, Algorithm, DecodingKey, EncodingKey, Header};
use project_code::ai::{
    GenerateRequest, GenerateResponse, GenerativeModel, Media, ModelFactory, TokenUsage,
};
use project_code::config::Config;
use project_code::db::FirestoreDb;
use project_code::error::AppError;
use project_code::routes::create_router;
use project_code::services::{FirebaseTokenVerifier, PaymentDetails, PaymentGateway};
use project_code::AppState;
use serde::Serialize;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::{SystemTime, UNIX_EPOCH};

pub const TEST_PROJECT: &str = "test-project";
pub const TEST_KID: &str = "test-kid";
const PRIVATE_KEY: &[u8] = include_bytes!("../fixtures/firebase_test_key.pem");
const PUBLIC_KEY: &[u8] = include_bytes!("../fixtures/firebase_test_key.pub.pem");

/// Check if emulator is available via environment variable.
#[allow(dead_code)]
pub fn emulator_available() -> bool {
    std::env::var("FIRESTORE_EMULATOR_HOST").is_ok()
}

/// Skip test with message if emulator not available.
#[macro_export]
macro_rules! require_emulator {
    () => {
        if !crate::common::emulator_available() {
            eprintln!("⚠️  Skipping: FIRESTORE_EMULATOR_HOST not set");
            return;
        }
    };
}

/// Create a test database connection.
#[allow(dead_code)]
pub async fn test_db() -> FirestoreDb {
    FirestoreDb::new(TEST_PROJECT)
        .await
        .expect("Failed to connect to Firestore emulator")
}

/// Unique user id for test isolation.
#[allow(dead_code)]
pub fn unique_uid(prefix: &str) -> String {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_nanos();
    format!("{}-{}", prefix, nanos)
}

// ─── Firebase ID tokens ──────────────────────────────────────

#[derive(Serialize)]
struct TestClaims<'a> {
    iss: String,
    aud: &'a str,
    sub: &'a str,
    iat: u64,
    exp: u64,
    auth_time: u64,
    email: &'a str,
}

/// Sign an ID token the test verifier accepts.
#[allow(dead_code)]
pub fn id_token(uid: &str) -> String {
    let now = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_secs();
    let claims = TestClaims {
        iss: format!("https://securetoken.google.com/{}", TEST_PROJECT),
        aud: TEST_PROJECT,
        sub: uid,
        iat: now,
        exp: now + 3600,
        auth_time: now,
        email: "learner@example.com",
    };

    let mut header = Header::new(Algorithm::RS256);
    header.kid = Some(TEST_KID.to_string());
    encode(
        &header,
        &claims,
        &EncodingKey::from_rsa_pem(PRIVATE_KEY).expect("test private key"),
    )
    .expect("Failed to sign test ID token")
}

pub fn test_verifier() -> FirebaseTokenVerifier {
    FirebaseTokenVerifier::new_with_static_key(
        TEST_PROJECT,
        TEST_KID,
        DecodingKey::from_rsa_pem(PUBLIC_KEY).expect("test public key"),
    )
    .expect("Failed to build test verifier")
}

// ─── Fakes ───────────────────────────────────────────────────

/// What a [`FakeModel`] returns for each call, in order. The last entry
/// repeats once the script runs out.
#[derive(Clone)]
pub enum Reply {
    Text(String),
    Image,
    NoMedia,
}

pub struct FakeModel {
    script: Vec<Reply>,
    calls: AtomicUsize,
    pub requests: Mutex<Vec<GenerateRequest>>,
}

impl GenerativeModel for FakeModel {
    fn generate(&self, request: GenerateRequest) -> BoxFuture<'_, Result<GenerateResponse, AppError>> {
        let n = self.calls.fetch_add(1, Ordering::SeqCst);
        self.requests.lock().unwrap().push(request);
        let reply = self
            .script
            .get(n)
            .or(self.script.last())
            .cloned()
            .unwrap_or(Reply::NoMedia);

        Box::pin(async move {
            let usage = TokenUsage {
                input_tokens: 10,
                output_tokens: 5,
            };
            Ok(match reply {
                Reply::Text(text) => GenerateResponse {
                    text: Some(text),
                    media: vec![],
                    usage,
                },
                Reply::Image => GenerateResponse {
                    text: None,
                    media: vec![Media {
                        mime_type: "image/png".into(),
                        data: "iVBORw0KGgo=".into(),
                    }],
                    usage,
                },
                Reply::NoMedia => GenerateResponse {
                    text: None,
                    media: vec![],
                    usage,
                },
            })
        })
    }
}

/// Factory that records the keys it was asked for.
pub struct FakeModelFactory {
    pub model: Arc<FakeModel>,
    pub keys: Mutex<Vec<String>>,
}

impl FakeModelFactory {
    pub fn new(script: Vec<Reply>) -> Self {
        Self {
            model: Arc::new(FakeModel {
                script,
                calls: AtomicUsize::new(0),
                requests: Mutex::new(Vec::new()),
            }),
            keys: Mutex::new(Vec::new()),
        }
    }

    #[allow(dead_code)]
    pub fn created(&self) -> usize {
        self.keys.lock().unwrap().len()
    }
}

impl ModelFactory for FakeModelFactory {
    fn create(&self, api_key: &str) -> Arc<dyn GenerativeModel> {
        self.keys.lock().unwrap().push(api_key.to_string());
        self.model.clone()
    }
}

/// Gateway reporting every payment with a fixed status.
pub struct FakeGateway {
    pub status: String,
    pub lookups: AtomicUsize,
}

impl PaymentGateway for FakeGateway {
    fn fetch_payment<'a>(
        &'a self,
        payment_id: &'a str,
    ) -> BoxFuture<'a, Result<PaymentDetails, AppError>> {
        self.lookups.fetch_add(1, Ordering::SeqCst);
        let payment = PaymentDetails {
            id: payment_id.to_string(),
            status: self.status.clone(),
            order_id: None,
            amount: Some(19900),
            currency: Some("INR".to_string()),
        };
        Box::pin(async move { Ok(payment) })
    }
}

// ─── App builders ────────────────────────────────────────────

/// Handles to the fakes behind a test app.
#[allow(dead_code)]
pub struct TestApp {
    pub router: axum::Router,
    pub state: Arc<AppState>,
    pub models: Arc<FakeModelFactory>,
    pub gateway: Arc<FakeGateway>,
}

pub struct TestAppBuilder {
    config: Config,
    db: Option<FirestoreDb>,
    script: Vec<Reply>,
    payment_status: String,
}

impl TestAppBuilder {
    pub fn new() -> Self {
        Self {
            config: Config::test_default(),
            db: None,
            script: vec![Reply::NoMedia],
            payment_status: "captured".to_string(),
        }
    }

    #[allow(dead_code)]
    pub fn server_key(mut self, key: &str) -> Self {
        self.config.gemini_api_key = Some(key.to_string());
        self
    }

    #[allow(dead_code)]
    pub fn replies(mut self, script: Vec<Reply>) -> Self {
        self.script = script;
        self
    }

    #[allow(dead_code)]
    pub fn payment_status(mut self, status: &str) -> Self {
        self.payment_status = status.to_string();
        self
    }

    #[allow(dead_code)]
    pub fn db(mut self, db: FirestoreDb) -> Self {
        self.db = Some(db);
        self
    }

    pub fn build(self) -> TestApp {
        let models = Arc::new(FakeModelFactory::new(self.script));
        let gateway = Arc::new(FakeGateway {
            status: self.payment_status,
            lookups: AtomicUsize::new(0),
        });

        let state = Arc::new(AppState {
            config: self.config,
            db: self.db.unwrap_or_else(FirestoreDb::new_mock),
            auth: Arc::new(test_verifier()),
            models: models.clone(),
            payments: gateway.clone(),
        });

        TestApp {
            router: create_router(state.clone()),
            state,
            models,
            gateway,
        }
    }
}

/// Create a test app with offline mock dependencies.
#[allow(dead_code)]
pub fn create_test_app() -> TestApp {
    TestAppBuilder::new().build()
}

// ─── Request helpers ─────────────────────────────────────────

/// JSON request, optionally authenticated and carrying a Gemini key.
#[allow(dead_code)]
pub fn json_request(
    method: &str,
    uri: &str,
    token: Option<&str>,
    api_key: Option<&str>,
    body: serde_json::Value,
) -> axum::http::Request<axum::body::Body> {
    let mut builder = axum::http::Request::builder()
        .method(method)
        .uri(uri)
        .header(axum::http::header::CONTENT_TYPE, "application/json");
    if let Some(token) = token {
        builder = builder.header(
            axum::http::header::AUTHORIZATION,
            format!("Bearer {}", token),
        );
    }
    if let Some(key) = api_key {
        builder = builder.header("X-Gemini-Api-Key", key);
    }
    builder
        .body(axum::body::Body::from(body.to_string()))
        .unwrap()
}

/// Send a request and decode the JSON body (`Null` when empty).
#[allow(dead_code)]
pub async fn send(
    router: axum::Router,
    request: axum::http::Request<axum::body::Body>,
) -> (axum::http::StatusCode, serde_json::Value) {
    use tower::ServiceExt;

    let response = router.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body = if bytes.is_empty() {
        serde_json::Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(serde_json::Value::Null)
    };
    (status, body)
}
