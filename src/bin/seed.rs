use sea_orm::{ColumnTrait, EntityTrait, QueryFilter};
use storefront_api::{
    app::init_tracing,
    catalog,
    config::AppConfig,
    db::{DbPool, OrmConn, create_pool, orm_from_pool, run_migrations},
    entity::{Users, users},
    services::auth_service::hash_password,
};
use uuid::Uuid;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    init_tracing();

    let config = AppConfig::from_env()?;
    let pool = create_pool(&config.database_url).await?;
    let orm = orm_from_pool(&pool);
    run_migrations(&orm).await?;

    let email = std::env::var("SEED_CUSTOMER_EMAIL")
        .unwrap_or_else(|_| "customer@example.com".to_string());
    let password =
        std::env::var("SEED_CUSTOMER_PASSWORD").unwrap_or_else(|_| "customer123".to_string());
    let user_id = ensure_customer(&pool, &orm, &email, &password).await?;

    tracing::info!(
        %user_id,
        products = catalog::products().len(),
        "seed completed"
    );
    Ok(())
}

/// Create the demo customer unless the email is taken; existing accounts keep
/// their password.
async fn ensure_customer(
    pool: &DbPool,
    orm: &OrmConn,
    email: &str,
    password: &str,
) -> anyhow::Result<Uuid> {
    let email = email.trim().to_lowercase();
    if let Some(existing) = Users::find()
        .filter(users::Column::Email.eq(email.as_str()))
        .one(orm)
        .await?
    {
        tracing::info!(email = %existing.email, "customer already exists");
        return Ok(existing.id);
    }

    let password_hash = hash_password(password)?;
    let (user_id,): (Uuid,) = sqlx::query_as(
        r#"
        INSERT INTO users (id, email, password_hash)
        VALUES ($1, $2, $3)
        RETURNING id
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(email.as_str())
    .bind(password_hash)
    .fetch_one(pool)
    .await?;

    tracing::info!(email = %email, "created customer account");
    Ok(user_id)
}
