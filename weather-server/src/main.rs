use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};
use weather_core::Config;
use weather_server::{AppState, router};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "weather_server=info,weather_core=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    dotenvy::dotenv().ok();
    let config = Config::load()?;

    if config.api_key().is_none() {
        tracing::warn!("OPENWEATHER_API_KEY is not set; /api/forecast will answer 500");
    }

    let app = router(AppState::from_config(&config)?);

    let addr = config.bind_address();
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Listening on http://{}", addr);
    tracing::info!("  GET /api/health               - health check");
    tracing::info!("  GET /api/location             - current location");
    tracing::info!("  GET /api/forecast[?lat=&lng=] - 4-day forecast with rain prediction");

    axum::serve(listener, app).await?;
    Ok(())
}
