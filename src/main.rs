use std::{net::SocketAddr, sync::Arc};

use court_reservation_service::{
    adapters::{
        database::{
            memory::MemoryDatabase,
            postgres::PostgresDatabase,
            seed::{self, CatalogStore},
        },
        http,
        payment::xendit::XenditClient,
    },
    commands::DomainLogic,
    config::Config,
    domain::FixedPrice,
    ports::database::DatabasePort,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

type BoxError = Box<dyn std::error::Error + Send + Sync>;

#[tokio::main]
async fn main() -> Result<(), BoxError> {
    // Load .env file
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "court_reservation_service=info,tower_http=info".into()),
        )
        .init();

    let config = Config::from_env()?;

    match config.database_url.as_deref() {
        Some(database_url) => {
            let database = PostgresDatabase::connect(database_url).await?;
            tracing::info!("using PostgreSQL store");
            serve(&config, database).await
        }
        None => {
            tracing::info!("using in-memory store");
            serve(&config, MemoryDatabase::default()).await
        }
    }
}

async fn serve<D>(config: &Config, database: D) -> Result<(), BoxError>
where
    D: DatabasePort + CatalogStore + Send + Sync + 'static,
{
    if config.seed_demo_data {
        seed::seed_demo_data(&database).await?;
    }

    let payment = XenditClient::new(config.xendit.clone());
    let logic = DomainLogic::new(
        Arc::new(database),
        Arc::new(payment),
        Arc::new(FixedPrice(config.reservation_price)),
    );

    let app = http::router(logic)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr = SocketAddr::from(([0, 0, 0, 0], config.http_port));
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("listening on {addr}");

    axum::serve(listener, app).await?;

    Ok(())
}
