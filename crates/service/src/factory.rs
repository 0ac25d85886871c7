//! External pizza factory collaborator.
//!
//! The factory is the service that actually produces and certifies orders.
//! It is reached over HTTP with a JSON payload carrying the diner identity and
//! the order contents, authenticated by the configured API key. The call is
//! the only operation in the system with externally-controlled latency, so the
//! client bounds it with a request timeout; a timeout is treated exactly like
//! any other factory failure.

use async_trait::async_trait;
use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, error, instrument};

use pronto_core::{Email, UserId};

use crate::config::FactoryConfig;
use crate::models::{Order, User};

/// Errors that can occur while submitting an order to the factory.
#[derive(Debug, Error)]
pub enum FactoryError {
    /// The request never produced a usable response (network error, timeout,
    /// or an unparseable body).
    #[error("factory unreachable: {0}")]
    Unreachable(String),

    /// The factory answered with a non-success status.
    #[error("factory rejected the order")]
    Rejected {
        /// Diagnostic report reference supplied by the factory, if any.
        report_url: Option<String>,
    },
}

/// The payload submitted to the factory.
#[derive(Debug, Serialize)]
pub struct FulfillmentRequest {
    /// Who is ordering.
    pub diner: DinerInfo,
    /// The persisted order being fulfilled.
    pub order: Order,
}

/// Diner identity forwarded to the factory.
#[derive(Debug, Serialize)]
pub struct DinerInfo {
    /// The diner's user id.
    pub id: UserId,
    /// The diner's display name.
    pub name: String,
    /// The diner's email address.
    pub email: Email,
}

impl From<&User> for DinerInfo {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            name: user.name.clone(),
            email: user.email.clone(),
        }
    }
}

/// A successful factory confirmation.
#[derive(Debug, Clone, Deserialize)]
pub struct FactoryReceipt {
    /// Integrity-signed confirmation of the order.
    pub jwt: String,
    /// Reference to the factory's report page for this order.
    #[serde(rename = "reportUrl")]
    pub report_url: Option<String>,
}

/// Error body returned by the factory on rejection.
#[derive(Debug, Default, Deserialize)]
struct FactoryFailure {
    #[serde(rename = "reportUrl")]
    report_url: Option<String>,
}

/// Port for the factory collaborator.
///
/// The order workflow depends on this trait rather than the HTTP client so
/// tests can substitute deterministic success/failure stubs.
#[async_trait]
pub trait PizzaFactory: Send + Sync {
    /// Submit an order for fulfillment.
    ///
    /// # Errors
    ///
    /// Returns [`FactoryError::Unreachable`] for transport failures and
    /// [`FactoryError::Rejected`] when the factory declines the order.
    async fn fulfill(&self, request: &FulfillmentRequest) -> Result<FactoryReceipt, FactoryError>;
}

/// HTTP client for the real factory.
#[derive(Clone)]
pub struct HttpFactory {
    client: Client,
    url: String,
    api_key: SecretString,
}

impl std::fmt::Debug for HttpFactory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpFactory")
            .field("url", &self.url)
            .field("api_key", &"[REDACTED]")
            .finish_non_exhaustive()
    }
}

impl HttpFactory {
    /// Create a factory client from configuration.
    ///
    /// # Errors
    ///
    /// Returns `reqwest::Error` if the underlying HTTP client cannot be built.
    pub fn new(config: &FactoryConfig) -> Result<Self, reqwest::Error> {
        let client = Client::builder().timeout(config.timeout).build()?;

        Ok(Self {
            client,
            url: config.url.trim_end_matches('/').to_owned(),
            api_key: config.api_key.clone(),
        })
    }
}

#[async_trait]
impl PizzaFactory for HttpFactory {
    #[instrument(skip(self, request), fields(order = %request.order.id))]
    async fn fulfill(&self, request: &FulfillmentRequest) -> Result<FactoryReceipt, FactoryError> {
        let response = self
            .client
            .post(format!("{}/api/order", self.url))
            .bearer_auth(self.api_key.expose_secret())
            .json(request)
            .send()
            .await
            .map_err(|e| FactoryError::Unreachable(e.to_string()))?;

        if response.status().is_success() {
            let receipt: FactoryReceipt = response
                .json()
                .await
                .map_err(|e| FactoryError::Unreachable(e.to_string()))?;

            debug!(order = %request.order.id, "factory confirmed order");
            return Ok(receipt);
        }

        let status = response.status();
        let failure: FactoryFailure = response.json().await.unwrap_or_default();

        error!(
            order = %request.order.id,
            status = %status,
            report_url = ?failure.report_url,
            "factory rejected order"
        );

        Err(FactoryError::Rejected {
            report_url: failure.report_url,
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    use std::time::Duration;

    #[test]
    fn test_debug_redacts_api_key() {
        let factory = HttpFactory::new(&FactoryConfig {
            url: "http://localhost:9000/".to_owned(),
            api_key: SecretString::from("super_secret_factory_key"),
            timeout: Duration::from_secs(1),
        })
        .unwrap();

        let debug_output = format!("{factory:?}");
        assert!(debug_output.contains("[REDACTED]"));
        assert!(!debug_output.contains("super_secret_factory_key"));
    }

    #[test]
    fn test_trailing_slash_is_trimmed() {
        let factory = HttpFactory::new(&FactoryConfig {
            url: "http://localhost:9000/".to_owned(),
            api_key: SecretString::from("k"),
            timeout: Duration::from_secs(1),
        })
        .unwrap();

        assert_eq!(factory.url, "http://localhost:9000");
    }

    #[test]
    fn test_receipt_parses_factory_shape() {
        let receipt: FactoryReceipt =
            serde_json::from_str(r#"{"jwt":"eyJ0","reportUrl":"http://factory/report/1"}"#)
                .unwrap();
        assert_eq!(receipt.jwt, "eyJ0");
        assert_eq!(receipt.report_url.as_deref(), Some("http://factory/report/1"));
    }
}
