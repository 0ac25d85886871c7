//! Integration test harness for the Pronto Pizza backend.
//!
//! Each test builds its own [`TestApp`] with fresh in-process stores and a
//! deterministic [`StubFactory`], then drives the real router through
//! `tower::ServiceExt::oneshot` - no sockets, no external services.
//!
//! # Example
//!
//! ```rust,ignore
//! let app = TestApp::spawn();
//! let (status, body) = app
//!     .request("GET", "/api/order/menu", None, None)
//!     .await;
//! assert_eq!(status, StatusCode::OK);
//! ```

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use secrecy::SecretString;
use serde_json::Value;
use tower::ServiceExt;

use pronto_service::config::{AdminSeedConfig, FactoryConfig, ServiceConfig};
use pronto_service::factory::{FactoryError, FactoryReceipt, FulfillmentRequest, PizzaFactory};
use pronto_service::state::AppState;

/// Email of the seeded admin account.
pub const ADMIN_EMAIL: &str = "a@pronto.pizza";
/// Password of the seeded admin account.
pub const ADMIN_PASSWORD: &str = "toomanysecrets";

/// Deterministic stand-in for the external factory collaborator.
pub enum StubFactory {
    /// Always confirm, returning a fixed receipt.
    Confirm,
    /// Always reject with the given report reference.
    Reject {
        /// Report reference included in the rejection.
        report_url: Option<String>,
    },
    /// Simulate a transport failure or timeout.
    Unreachable,
}

#[async_trait]
impl PizzaFactory for StubFactory {
    async fn fulfill(
        &self,
        _request: &FulfillmentRequest,
    ) -> Result<FactoryReceipt, FactoryError> {
        match self {
            Self::Confirm => Ok(FactoryReceipt {
                jwt: "eyJhbGciOiJSUzI1NiJ9.factory.receipt".to_owned(),
                report_url: Some("http://factory.test/report/1".to_owned()),
            }),
            Self::Reject { report_url } => Err(FactoryError::Rejected {
                report_url: report_url.clone(),
            }),
            Self::Unreachable => Err(FactoryError::Unreachable("connection refused".to_owned())),
        }
    }
}

/// Configuration used by every test app.
#[must_use]
pub fn test_config() -> ServiceConfig {
    ServiceConfig {
        host: std::net::IpAddr::from([127, 0, 0, 1]),
        port: 0,
        factory: FactoryConfig {
            url: "http://factory.test".to_owned(),
            api_key: SecretString::from("test-factory-key"),
            timeout: Duration::from_secs(1),
        },
        admin: AdminSeedConfig {
            name: "service admin".to_owned(),
            email: ADMIN_EMAIL.to_owned(),
            password: SecretString::from(ADMIN_PASSWORD),
        },
    }
}

/// One isolated application instance with fresh stores.
pub struct TestApp {
    router: Router,
}

impl TestApp {
    /// Spawn an app whose factory always confirms orders.
    #[must_use]
    pub fn spawn() -> Self {
        Self::spawn_with_factory(Arc::new(StubFactory::Confirm))
    }

    /// Spawn an app with a specific factory stub.
    #[must_use]
    pub fn spawn_with_factory(factory: Arc<dyn PizzaFactory>) -> Self {
        let state = AppState::new(test_config(), factory);
        state.seed_admin().expect("failed to seed admin account");

        Self {
            router: pronto_service::app(state),
        }
    }

    /// Issue one request against the router and decode the JSON response.
    ///
    /// # Panics
    ///
    /// Panics if the request cannot be built or the response is not JSON.
    pub async fn request(
        &self,
        method: &str,
        path: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(path);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }

        let request = match body {
            Some(value) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(value.to_string())),
            None => builder.body(Body::empty()),
        }
        .expect("failed to build request");

        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("request failed");

        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("failed to read response body");
        let json = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).expect("response body is not JSON")
        };

        (status, json)
    }

    /// Issue a request and return only the status and response headers.
    ///
    /// # Panics
    ///
    /// Panics if the request cannot be built.
    pub async fn request_headers(
        &self,
        method: &str,
        path: &str,
    ) -> (StatusCode, axum::http::HeaderMap) {
        let request = Request::builder()
            .method(method)
            .uri(path)
            .body(Body::empty())
            .expect("failed to build request");

        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("request failed");

        (response.status(), response.headers().clone())
    }

    /// Register a new diner and return `(user, token)`.
    ///
    /// # Panics
    ///
    /// Panics if registration does not succeed.
    pub async fn register(&self, name: &str, email: &str, password: &str) -> (Value, String) {
        let (status, body) = self
            .request(
                "POST",
                "/api/auth",
                None,
                Some(serde_json::json!({
                    "name": name,
                    "email": email,
                    "password": password,
                })),
            )
            .await;
        assert_eq!(status, StatusCode::OK, "registration failed: {body}");

        let token = body["token"]
            .as_str()
            .expect("registration response has no token")
            .to_owned();
        (body["user"].clone(), token)
    }

    /// Login as the seeded admin and return `(user, token)`.
    ///
    /// # Panics
    ///
    /// Panics if the admin login does not succeed.
    pub async fn login_admin(&self) -> (Value, String) {
        let (status, body) = self
            .request(
                "PUT",
                "/api/auth",
                None,
                Some(serde_json::json!({
                    "email": ADMIN_EMAIL,
                    "password": ADMIN_PASSWORD,
                })),
            )
            .await;
        assert_eq!(status, StatusCode::OK, "admin login failed: {body}");

        let token = body["token"]
            .as_str()
            .expect("login response has no token")
            .to_owned();
        (body["user"].clone(), token)
    }

    /// Create a franchise as admin and return its JSON representation.
    ///
    /// # Panics
    ///
    /// Panics if the creation does not succeed.
    pub async fn create_franchise(
        &self,
        admin_token: &str,
        name: &str,
        admin_email: &str,
    ) -> Value {
        let (status, body) = self
            .request(
                "POST",
                "/api/franchise",
                Some(admin_token),
                Some(serde_json::json!({
                    "name": name,
                    "admins": [{ "email": admin_email }],
                })),
            )
            .await;
        assert_eq!(status, StatusCode::OK, "franchise creation failed: {body}");
        body
    }

    /// Create a store as admin and return its JSON representation.
    ///
    /// # Panics
    ///
    /// Panics if the creation does not succeed.
    pub async fn create_store(&self, admin_token: &str, franchise_id: &Value, name: &str) -> Value {
        let (status, body) = self
            .request(
                "POST",
                &format!("/api/franchise/{franchise_id}/store"),
                Some(admin_token),
                Some(serde_json::json!({ "name": name })),
            )
            .await;
        assert_eq!(status, StatusCode::OK, "store creation failed: {body}");
        body
    }
}
