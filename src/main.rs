use std::sync::Arc;

use log::{info, warn};
use paper_broker::api::routes::{AppState, app_router};
use paper_broker::config::Config;
use paper_broker::persistence::create_pool_and_migrate;
use paper_broker::quotes::{HttpQuoteProvider, QuoteProvider};
use paper_broker::store::{MemoryStore, PgStore, Store};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = Config::from_env()?;

    let store: Arc<dyn Store> = match &config.database_url {
        Some(url) => Arc::new(PgStore::new(create_pool_and_migrate(url).await?)),
        None => {
            warn!("DATABASE_URL not set, using in-memory store; data is lost on exit");
            Arc::new(MemoryStore::new())
        }
    };
    let quotes: Arc<dyn QuoteProvider> = Arc::new(HttpQuoteProvider::new(
        config.quote_base_url.clone(),
        config.quote_api_key.clone(),
    ));

    let app_state = AppState {
        store,
        quotes,
        jwt_secret: config.jwt_secret.clone(),
    };

    let app = app_router(app_state);
    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;
    info!("listening on {}", listener.local_addr()?);
    axum::serve(listener, app).await?;
    Ok(())
}
