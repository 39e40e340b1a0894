use chrono::Utc;
use dotenv::dotenv;
use serde_json::json;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use uuid::Uuid;

use auth_cell::services::PasswordService;
use shared_config::AppConfig;
use shared_database::StoreClient;

/// Wipes and re-creates the demo staff accounts. Run against a fresh store
/// before first login.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = AppConfig::from_env();
    let store = StoreClient::new(&config);

    info!("Clearing staff accounts");
    store.delete("/rest/v1/staff?id=not.is.null").await?;

    let password_hash = PasswordService::hash_password("zayed")
        .map_err(|err| anyhow::anyhow!("Failed to hash seed password: {}", err))?;

    let staff = json!([
        {
            "id": Uuid::new_v4(),
            "name": "Dr. Ashfaqur Rahman Khan",
            "email": "arkhan@gmail.com",
            "password": password_hash,
            "role": "doctor",
            "createdAt": Utc::now().to_rfc3339(),
        },
        {
            "id": Uuid::new_v4(),
            "name": "Ar Khan",
            "email": "ar.khan@gmail.com",
            "password": password_hash,
            "role": "receptionist",
            "createdAt": Utc::now().to_rfc3339(),
        }
    ]);

    let created: Vec<serde_json::Value> = store.insert("/rest/v1/staff", staff).await?;
    info!("Seeded {} staff accounts", created.len());

    Ok(())
}
