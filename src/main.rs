use actix_cors::Cors;
use actix_web::{web, App, HttpServer, middleware};
use spam_classifier::config::{LoggingSettings, Settings};
use spam_classifier::routes::{self, AppState};
use spam_classifier::services::{ModelLoader, PredictionService};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

fn init_tracing(logging: &LoggingSettings) {
    let filter = EnvFilter::try_new(&logging.level).unwrap_or_else(|_| EnvFilter::new("info"));

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_level(true);

    if logging.format == "pretty" {
        subscriber.pretty().init();
    } else {
        subscriber.json().init();
    }
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Load .env file if present
    dotenv::dotenv().ok();

    // Logging is configured from settings, so a config error can only go to stderr
    let settings = Settings::load().map_err(|e| {
        eprintln!("Failed to load configuration: {}", e);
        std::io::Error::new(std::io::ErrorKind::InvalidInput, e)
    })?;

    init_tracing(&settings.logging);

    info!("Starting Email Spam Classifier API v{}...", env!("CARGO_PKG_VERSION"));
    info!("Configuration loaded successfully");

    // Artifacts are loaded once, before any route exists
    let loader = ModelLoader::from_settings(&settings.models);
    let artifacts = loader.load().await;
    if !artifacts.is_complete() {
        warn!("API started but models are not available");
    }

    let app_state = AppState::new(PredictionService::new(artifacts, settings.models.spam_label));

    info!("API initialization complete!");

    let host = settings.server.host.clone();
    let port = settings.server.port;
    let workers = settings.server.workers.unwrap_or(4);

    info!("Starting HTTP server on {}:{}", host, port);

    HttpServer::new(move || {
        let cors = Cors::permissive();

        App::new()
            .app_data(web::Data::new(app_state.clone()))
            .app_data(routes::json_config())
            .wrap(cors)
            .wrap(middleware::Logger::default())
            .wrap(middleware::Compress::default())
            .configure(routes::configure_routes)
    })
    .workers(workers)
    .bind((host, port))?
    .run()
    .await?;

    info!("Shutting down Email Spam Classifier API...");
    Ok(())
}
