#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::Utc;
use serde_json::{Value, json};
use sqlx::postgres::PgPoolOptions;
use storefront_api::{
    config::{AppConfig, MailConfig},
    db::{DbPool, orm_from_pool},
    models::User,
    services::{
        auth_service::issue_token,
        mailer::{MailError, Mailer, OutgoingEmail},
    },
    state::AppState,
};
use uuid::Uuid;

pub const JWT_SECRET: &str = "test-secret";
pub const OWNER_EMAIL: &str = "owner@store.test";

pub fn test_config(database_url: &str, resend_api_key: Option<&str>) -> AppConfig {
    AppConfig {
        database_url: database_url.to_string(),
        host: "127.0.0.1".into(),
        port: 0,
        jwt_secret: JWT_SECRET.into(),
        mail: MailConfig {
            resend_api_key: resend_api_key.map(str::to_string),
            resend_api_url: "http://127.0.0.1:9/emails".into(),
            owner_email: OWNER_EMAIL.into(),
            owner_from: "Orders <orders@store.test>".into(),
            customer_from: "Store <hello@store.test>".into(),
        },
    }
}

pub fn state_with(pool: DbPool, config: AppConfig, mailer: Arc<dyn Mailer>) -> AppState {
    AppState {
        orm: orm_from_pool(&pool),
        pool,
        config: Arc::new(config),
        mailer,
    }
}

/// State whose pool never connects; fine for handlers that skip the database.
pub fn offline_state(mailer: Arc<dyn Mailer>) -> AppState {
    let url = "postgres://storefront@127.0.0.1:1/unused";
    let pool = PgPoolOptions::new()
        .connect_lazy(url)
        .expect("lazy pool");
    state_with(pool, test_config(url, Some("re_test")), mailer)
}

pub fn token_for(user_id: Uuid, email: &str) -> String {
    let user = User {
        id: user_id,
        email: email.to_string(),
        password_hash: String::new(),
        created_at: Utc::now(),
    };
    let (token, _) = issue_token(&user, JWT_SECRET).expect("token");
    token
}

pub fn bearer_for(user_id: Uuid, email: &str) -> String {
    format!("Bearer {}", token_for(user_id, email))
}

#[derive(Default)]
pub struct RecordingMailer {
    pub sent: Mutex<Vec<OutgoingEmail>>,
}

#[async_trait]
impl Mailer for RecordingMailer {
    async fn send(&self, email: &OutgoingEmail) -> Result<Value, MailError> {
        let mut sent = self.sent.lock().unwrap();
        sent.push(email.clone());
        Ok(json!({ "id": format!("msg_{}", sent.len()) }))
    }
}
