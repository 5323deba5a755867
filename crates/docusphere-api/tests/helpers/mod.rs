//! Shared test helpers for the HTTP integration tests.

#![allow(dead_code)]

use axum::Router;
use axum::body::Body;
use axum::http::{Method, Request, StatusCode, header};
use http_body_util::BodyExt;
use serde_json::{Value, json};
use tempfile::TempDir;
use tower::ServiceExt;
use uuid::Uuid;

use docusphere_api::{AppState, build_app};
use docusphere_auth::PasswordHasher;
use docusphere_core::config::{AppConfig, StoreProvider};
use docusphere_database::Stores;
use docusphere_database::store::AccountStore;
use docusphere_entity::account::{AccountRole, CreateAccount};
use docusphere_storage::build_asset_store;

/// Password used for every test account.
pub const PASSWORD: &str = "secret123";

const BOUNDARY: &str = "docusphere-test-boundary";

/// Test application backed by in-memory stores and a temp asset directory.
pub struct TestApp {
    /// The Axum router for making test requests
    pub router: Router,
    /// Shared state, for direct store access
    pub state: AppState,
    _dir: TempDir,
}

/// Status and decoded JSON body of a response.
#[derive(Debug)]
pub struct TestResponse {
    pub status: StatusCode,
    pub body: Value,
}

impl TestResponse {
    /// The `data` field of a success body.
    pub fn data(&self) -> &Value {
        &self.body["data"]
    }
}

/// A signed-in account.
#[derive(Debug, Clone)]
pub struct Session {
    pub id: Uuid,
    pub token: String,
}

/// One text part of a multipart form.
pub type FormField<'a> = (&'a str, &'a str);

impl TestApp {
    /// Create a new test application.
    pub async fn new() -> Self {
        let dir = tempfile::tempdir().expect("Failed to create temp dir");

        let mut config = AppConfig::default();
        config.database.provider = StoreProvider::Memory;
        config.storage.local.root_path = dir.path().to_string_lossy().into_owned();
        config.storage.max_upload_size_bytes = 64 * 1024;

        let assets = build_asset_store(&config.storage)
            .await
            .expect("Failed to build asset store");
        let state = AppState::new(config, Stores::in_memory(), assets);
        let router = build_app(state.clone());

        Self {
            router,
            state,
            _dir: dir,
        }
    }

    /// Send a JSON request.
    pub async fn request(
        &self,
        method: &str,
        uri: &str,
        body: Option<Value>,
        token: Option<&str>,
    ) -> TestResponse {
        let mut builder = Request::builder()
            .method(Method::from_bytes(method.as_bytes()).unwrap())
            .uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }
        let body = match body {
            Some(value) => {
                builder = builder.header(header::CONTENT_TYPE, "application/json");
                Body::from(value.to_string())
            }
            None => Body::empty(),
        };
        self.send(builder.body(body).unwrap()).await
    }

    /// Send a raw request.
    pub async fn send(&self, request: Request<Body>) -> TestResponse {
        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(Value::Null)
        };
        TestResponse { status, body }
    }

    /// Send a multipart upload with an optional `file` part.
    pub async fn multipart(
        &self,
        uri: &str,
        token: &str,
        file: Option<(&str, &str, &[u8])>,
        fields: &[FormField<'_>],
    ) -> TestResponse {
        let mut body = Vec::new();
        for (name, value) in fields {
            body.extend_from_slice(
                format!(
                    "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n"
                )
                .as_bytes(),
            );
        }
        if let Some((file_name, mime_type, data)) = file {
            body.extend_from_slice(
                format!(
                    "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"file\"; filename=\"{file_name}\"\r\nContent-Type: {mime_type}\r\n\r\n"
                )
                .as_bytes(),
            );
            body.extend_from_slice(data);
            body.extend_from_slice(b"\r\n");
        }
        body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());

        let request = Request::builder()
            .method(Method::POST)
            .uri(uri)
            .header(header::AUTHORIZATION, format!("Bearer {token}"))
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={BOUNDARY}"),
            )
            .body(Body::from(body))
            .unwrap();
        self.send(request).await
    }

    /// Upload a small file, returning its JSON.
    pub async fn upload(&self, session: &Session, name: &str, parent: Option<&str>) -> Value {
        let mut fields = Vec::new();
        if let Some(parent) = parent {
            fields.push(("parent_id", parent));
        }
        let response = self
            .multipart(
                "/api/files",
                &session.token,
                Some((name, "application/pdf", b"%PDF-1.7 test")),
                &fields,
            )
            .await;
        assert_eq!(response.status, StatusCode::CREATED, "{:?}", response.body);
        response.data().clone()
    }

    /// Create a folder, returning its JSON.
    pub async fn mkdir(&self, session: &Session, name: &str, parent: Option<&str>) -> Value {
        let response = self
            .request(
                "POST",
                "/api/folders",
                Some(json!({ "name": name, "parent_id": parent })),
                Some(&session.token),
            )
            .await;
        assert_eq!(response.status, StatusCode::CREATED, "{:?}", response.body);
        response.data().clone()
    }

    /// Log in and return the token.
    pub async fn login(&self, email: &str, password: &str) -> TestResponse {
        self.request(
            "POST",
            "/api/auth/login",
            Some(json!({ "email": email, "password": password })),
            None,
        )
        .await
    }

    /// Register a Viewer named `name` and sign in.
    pub async fn viewer(&self, name: &str) -> Session {
        let email = format!("{}@example.com", name.to_lowercase());
        let response = self
            .request(
                "POST",
                "/api/auth/register",
                Some(json!({ "name": name, "email": email, "password": PASSWORD })),
                None,
            )
            .await;
        assert_eq!(response.status, StatusCode::CREATED, "{:?}", response.body);
        self.sign_in(&email).await
    }

    /// Create an Admin directly in the store and sign in.
    pub async fn admin(&self, name: &str) -> Session {
        let email = format!("{}@example.com", name.to_lowercase());
        self.state
            .stores
            .accounts
            .create(&CreateAccount {
                name: name.to_string(),
                email: email.clone(),
                password_hash: PasswordHasher::new().hash(PASSWORD).unwrap(),
                role: AccountRole::Admin,
                avatar_url: None,
            })
            .await
            .unwrap();
        self.sign_in(&email).await
    }

    async fn sign_in(&self, email: &str) -> Session {
        let response = self.login(email, PASSWORD).await;
        assert_eq!(response.status, StatusCode::OK, "{:?}", response.body);
        Session {
            id: Uuid::parse_str(response.data()["account"]["id"].as_str().unwrap()).unwrap(),
            token: response.data()["token"].as_str().unwrap().to_string(),
        }
    }
}

/// String id of a JSON record.
pub fn id_of(value: &Value) -> String {
    value["id"].as_str().unwrap().to_string()
}
