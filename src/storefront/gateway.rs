//! Collaborator contracts the checkout depends on, and their HTTP
//! implementation against this crate's API.

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use rust_decimal::Decimal;
use serde::{Serialize, de::DeserializeOwned};
use thiserror::Error;
use uuid::Uuid;

use crate::{
    config::ClientConfig,
    dto::{
        auth::{LoginRequest, LoginResponse, RegisterRequest},
        functions::{
            FunctionErrorBody, OrderNotificationRequest, OrderNotificationResponse,
            ValidateOrderRequest, ValidateOrderResponse, ValidationFailure,
        },
        orders::OrderSubmission,
    },
    models::{Order, User},
    response::ApiResponse,
    storefront::session::Session,
    validation::ValidationReport,
};

#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("not authenticated")]
    Unauthorized,

    #[error("request rejected ({status}): {message}")]
    Rejected { status: u16, message: String },

    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("unexpected response: {0}")]
    Protocol(String),
}

/// Reference to an order the persistence layer accepted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedOrder {
    pub id: Uuid,
    pub total_amount: Decimal,
}

#[async_trait]
pub trait OrderValidationService: Send + Sync {
    /// Ask the trusted side to re-price the order. A mismatch is `Ok` with
    /// `valid == false`; an order that cannot be priced is an error.
    async fn validate_order(
        &self,
        session: &Session,
        request: &ValidateOrderRequest,
    ) -> Result<ValidationReport, GatewayError>;
}

#[async_trait]
pub trait OrderRepository: Send + Sync {
    async fn insert_order(
        &self,
        session: &Session,
        order: &OrderSubmission,
    ) -> Result<PersistedOrder, GatewayError>;
}

#[async_trait]
pub trait OrderNotifier: Send + Sync {
    async fn send_order_notification(
        &self,
        session: &Session,
        notification: &OrderNotificationRequest,
    ) -> Result<OrderNotificationResponse, GatewayError>;
}

/// reqwest client for the storefront API.
#[derive(Debug, Clone)]
pub struct HttpBackend {
    client: Client,
    base_url: String,
}

impl HttpBackend {
    pub fn new(config: &ClientConfig) -> Self {
        Self::with_client(Client::new(), config)
    }

    pub fn with_client(client: Client, config: &ClientConfig) -> Self {
        Self {
            client,
            base_url: config.api_base_url.trim_end_matches('/').to_string(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    pub async fn register(&self, email: &str, password: &str) -> Result<User, GatewayError> {
        let body = RegisterRequest {
            email: email.to_string(),
            password: password.to_string(),
        };
        let response = self
            .client
            .post(self.url("/api/auth/register"))
            .json(&body)
            .send()
            .await?;
        envelope_data(response).await
    }

    /// Exchange credentials for a session. Publishing it is up to the caller.
    pub async fn sign_in(&self, email: &str, password: &str) -> Result<Session, GatewayError> {
        let body = LoginRequest {
            email: email.to_string(),
            password: password.to_string(),
        };
        let response = self
            .client
            .post(self.url("/api/auth/login"))
            .json(&body)
            .send()
            .await?;
        let login: LoginResponse = envelope_data(response).await?;
        Ok(Session {
            user_id: login.user.id,
            email: login.user.email,
            access_token: login.access_token,
        })
    }

    async fn post_authorized<B: Serialize + ?Sized>(
        &self,
        session: &Session,
        path: &str,
        body: &B,
    ) -> Result<reqwest::Response, GatewayError> {
        let response = self
            .client
            .post(self.url(path))
            .bearer_auth(&session.access_token)
            .json(body)
            .send()
            .await?;
        if response.status() == StatusCode::UNAUTHORIZED {
            return Err(GatewayError::Unauthorized);
        }
        Ok(response)
    }
}

async fn rejected(response: reqwest::Response) -> GatewayError {
    let status = response.status().as_u16();
    // Function endpoints answer `{error}`, the rest wrap it as `{data: {error}}`.
    let body = response.json::<serde_json::Value>().await.unwrap_or_default();
    let message = serde_json::from_value::<FunctionErrorBody>(body.clone())
        .or_else(|_| serde_json::from_value::<FunctionErrorBody>(body["data"].clone()))
        .map(|b| b.error)
        .unwrap_or_else(|_| "no error details".to_string());
    GatewayError::Rejected { status, message }
}

async fn envelope_data<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, GatewayError> {
    let status = response.status();
    if status == StatusCode::UNAUTHORIZED {
        return Err(GatewayError::Unauthorized);
    }
    if !status.is_success() {
        return Err(rejected(response).await);
    }
    let envelope: ApiResponse<T> = response.json().await?;
    envelope
        .into_data()
        .ok_or_else(|| GatewayError::Protocol("response envelope had no data".into()))
}

#[async_trait]
impl OrderValidationService for HttpBackend {
    async fn validate_order(
        &self,
        session: &Session,
        request: &ValidateOrderRequest,
    ) -> Result<ValidationReport, GatewayError> {
        let response = self
            .post_authorized(session, "/api/functions/validate-order", request)
            .await?;

        match response.status() {
            StatusCode::OK => {
                let body: ValidateOrderResponse = response.json().await?;
                Ok(ValidationReport {
                    valid: body.valid,
                    calculated_total: body.calculated_total,
                })
            }
            StatusCode::BAD_REQUEST => {
                let body: ValidationFailure = response.json().await?;
                match body.calculated_total {
                    Some(calculated_total) => Ok(ValidationReport {
                        valid: false,
                        calculated_total,
                    }),
                    None => Err(GatewayError::Rejected {
                        status: StatusCode::BAD_REQUEST.as_u16(),
                        message: body.error,
                    }),
                }
            }
            _ => Err(rejected(response).await),
        }
    }
}

#[async_trait]
impl OrderRepository for HttpBackend {
    async fn insert_order(
        &self,
        session: &Session,
        order: &OrderSubmission,
    ) -> Result<PersistedOrder, GatewayError> {
        let response = self.post_authorized(session, "/api/orders", order).await?;
        let stored: Order = envelope_data(response).await?;
        Ok(PersistedOrder {
            id: stored.id,
            total_amount: stored.total_amount,
        })
    }
}

#[async_trait]
impl OrderNotifier for HttpBackend {
    async fn send_order_notification(
        &self,
        session: &Session,
        notification: &OrderNotificationRequest,
    ) -> Result<OrderNotificationResponse, GatewayError> {
        let response = self
            .post_authorized(session, "/api/functions/send-order-notification", notification)
            .await?;
        if !response.status().is_success() {
            return Err(rejected(response).await);
        }
        Ok(response.json().await?)
    }
}
