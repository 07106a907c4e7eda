use std::env;

#[derive(Debug, Clone)]
pub struct MailConfig {
    pub resend_api_key: Option<String>,
    pub resend_api_url: String,
    pub owner_email: String,
    pub owner_from: String,
    pub customer_from: String,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub host: String,
    pub port: u16,
    pub jwt_secret: String,
    pub mail: MailConfig,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let database_url = env::var("DATABASE_URL")?;
        let jwt_secret = env::var("JWT_SECRET")
            .map_err(|_| anyhow::anyhow!("JWT_SECRET is not set"))?;
        let host = env::var("APP_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = env::var("APP_PORT")
            .ok()
            .and_then(|p| p.parse::<u16>().ok())
            .unwrap_or(3000);
        Ok(Self {
            port,
            database_url,
            host,
            jwt_secret,
            mail: MailConfig::from_env(),
        })
    }
}

impl MailConfig {
    pub fn from_env() -> Self {
        Self {
            resend_api_key: env::var("RESEND_API_KEY").ok().filter(|k| !k.is_empty()),
            resend_api_url: env::var("RESEND_API_URL")
                .unwrap_or_else(|_| "https://api.resend.com/emails".to_string()),
            owner_email: env::var("STORE_OWNER_EMAIL")
                .unwrap_or_else(|_| "owner@example.com".to_string()),
            owner_from: env::var("MAIL_FROM_OWNER")
                .unwrap_or_else(|_| "Store Orders <onboarding@resend.dev>".to_string()),
            customer_from: env::var("MAIL_FROM_CUSTOMER")
                .unwrap_or_else(|_| "Store <onboarding@resend.dev>".to_string()),
        }
    }
}

/// Settings for the storefront client talking to this API.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub api_base_url: String,
}

impl ClientConfig {
    pub fn from_env() -> Self {
        let api_base_url = env::var("STOREFRONT_API_URL")
            .unwrap_or_else(|_| "http://127.0.0.1:3000".to_string());
        Self {
            api_base_url: api_base_url.trim_end_matches('/').to_string(),
        }
    }
}
