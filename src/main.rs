use std::sync::Arc;

use fraudscope::api::router::{create_router, API_PREFIX};
use fraudscope::config::AppConfig;
use fraudscope::ml::{ArtifactProvider, ArtifactStore};
use fraudscope::metrics::init_metrics;
use fraudscope::{db, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let config = AppConfig::from_env()?;
    init_tracing(config.debug);

    let addr = format!("{}:{}", config.host, config.port);

    tracing::info!(
        app = %config.app_name,
        version = %config.version,
        environment = %config.environment,
        debug = config.debug,
        "Starting service"
    );

    let metrics_handle = init_metrics();

    tracing::info!("Connecting to database...");
    let pool = db::init_pool(&config.database_url, config.db_max_connections).await?;

    if config.auto_migrate {
        db::run_migrations(&pool).await?;
        tracing::info!("Database migrations applied");
    } else {
        tracing::info!("AUTO_MIGRATE disabled, expecting schema to exist");
    }

    // --- Fraud model artifacts: best-effort load, reloadable at runtime ---
    let model_dir = config.ml_model_path.clone();
    let artifacts = tokio::task::spawn_blocking(move || ArtifactStore::open(model_dir)).await?;
    if !artifacts.is_loaded() {
        tracing::warn!(
            dir = %artifacts.dir().display(),
            "Fraud detection models not loaded; scoring endpoints will return 503 until reloaded"
        );
    }

    let state = AppState::new(pool, config, Arc::new(artifacts), metrics_handle);
    let router = create_router(state);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Server listening on {addr}");
    tracing::info!("Health:   {API_PREFIX}/health, {API_PREFIX}/health/detailed");
    tracing::info!("Scoring:  {API_PREFIX}/ml/predict/transaction, {API_PREFIX}/ml/predict/transactions/batch");
    tracing::info!("Workers:  {API_PREFIX}/workers, {API_PREFIX}/workers/stats/summary");

    axum::serve(listener, router).await?;

    Ok(())
}

fn init_tracing(debug: bool) {
    use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

    let default_level = if debug { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let json = std::env::var("LOG_FORMAT")
        .map(|f| f.eq_ignore_ascii_case("json"))
        .unwrap_or(false);

    let registry = tracing_subscriber::registry().with(filter);
    if json {
        registry.with(fmt::layer().json()).init();
    } else {
        registry.with(fmt::layer()).init();
    }
}
