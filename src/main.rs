use dotenvy::dotenv;
use flower_shop::{
    api::{self, AppState},
    config::{self, database, secrets},
    errors::{Error, Result},
    notify::{Notifier, TelegramSender},
};
use std::sync::Arc;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // 1. Initialize tracing (as early as possible)
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // 2. Load .env file
    dotenv().ok(); // Make it non-fatal, env vars can be set externally
    info!("Attempted to load .env file.");

    // 3. Load the application settings
    let app_config = config::load_config_or_default("config.toml")
        .inspect_err(|e| error!("Critical error loading application configuration: {}", e))?;

    // 4. Initialize database and schema
    let db = database::create_connection(&database::get_database_url())
        .await
        .inspect_err(|e| error!("Failed to connect to database: {}", e))?;
    database::create_tables(&db)
        .await
        .inspect(|_| info!("Database initialized successfully."))
        .inspect_err(|e| error!("Failed to create tables: {}", e))?;

    // 5. Build the notifier; without credentials notifications are dropped
    let notifier = match secrets::telegram_credentials() {
        Some(credentials) => {
            let sender = TelegramSender::new(
                &app_config.notifications.api_base,
                &credentials.bot_token,
                app_config.notifications.timeout(),
            )?;
            info!(chat_id = %credentials.chat_id, "Telegram notifications enabled");
            Notifier::new(Arc::new(sender), credentials.chat_id)
        }
        None => {
            warn!("TELEGRAM_BOT_TOKEN or TELEGRAM_GROUP_CHAT_ID not set, notifications disabled");
            Notifier::disabled()
        }
    };

    // 6. Serve the API
    let bind_address = app_config.server.bind_address.clone();
    let app = api::router(AppState::new(db, notifier, app_config));

    let listener = tokio::net::TcpListener::bind(&bind_address)
        .await
        .inspect_err(|e| error!("Failed to bind {}: {}", bind_address, e))?;
    info!("Listening on {}", bind_address);

    axum::serve(listener, app).await.map_err(Error::from)?;

    Ok(())
}
