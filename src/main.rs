use std::{net::SocketAddr, sync::Arc};

use storefront_api::{
    app::{build_app, init_tracing},
    config::AppConfig,
    db::{create_pool, orm_from_pool, run_migrations},
    services::mailer::ResendMailer,
    state::AppState,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    init_tracing();

    let config = AppConfig::from_env()?;
    let pool = create_pool(&config.database_url).await?;
    let orm = orm_from_pool(&pool);

    run_migrations(&orm).await?;

    if config.mail.resend_api_key.is_none() {
        tracing::warn!("RESEND_API_KEY not set, order notifications will fail");
    }

    let addr = SocketAddr::from((config.host.parse::<std::net::IpAddr>()?, config.port));
    let state = AppState {
        pool,
        orm,
        mailer: Arc::new(ResendMailer::new(&config.mail)),
        config: Arc::new(config),
    };

    let app = build_app(state);
    tracing::info!("listening on {}", addr);
    axum::serve(tokio::net::TcpListener::bind(addr).await?, app).await?;

    Ok(())
}
