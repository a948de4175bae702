use actix_cors::Cors;
use actix_web::{middleware::NormalizePath, web, App, HttpServer};
use anyhow::Context;
use tracing_actix_web::TracingLogger;
use tracing_subscriber::EnvFilter;

use invitation_backend::{
    background_task::start_limiter_sweep,
    connect_storage,
    graceful_shutdown::shutdown_signal,
    routes::configure_routes,
    settings::{AppConfig, LogFormat},
    AppState,
};

fn init_tracing(format: LogFormat) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,sqlx=warn,actix_web=info"));

    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    match format {
        LogFormat::Json => builder.json().init(),
        LogFormat::Pretty => builder.init(),
    }
}

fn cors_for(origins: &[String]) -> Cors {
    if origins.iter().any(|o| o == "*") {
        return Cors::permissive();
    }

    origins
        .iter()
        .fold(Cors::default(), |cors, origin| cors.allowed_origin(origin))
        .allow_any_method()
        .allow_any_header()
        .max_age(3600)
}

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    let config = match AppConfig::new() {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("Configuration error: {}", e);
            std::process::exit(1);
        }
    };

    init_tracing(config.log_format);
    tracing::info!("Loaded configuration: {:?}", config);

    let storage = connect_storage(&config)
        .await
        .context("Failed to open storage")?;

    let server_addr = format!("{}:{}", config.host, config.port);
    let workers = config.worker_count.max(1);
    let origins = config.cors_origins();

    let app_state = web::Data::new(AppState::new(config, storage));

    tracing::info!(
        "🚀 Starting Invitation API v{} on {} ({} storage)",
        env!("CARGO_PKG_VERSION"),
        server_addr,
        app_state.storage.kind()
    );

    tokio::spawn(start_limiter_sweep(app_state.limiter.clone()));

    let server = HttpServer::new(move || {
        App::new()
            .app_data(app_state.clone())
            .wrap(cors_for(&origins))
            .wrap(NormalizePath::trim())
            .wrap(TracingLogger::default())
            .configure(configure_routes)
    })
    .workers(workers)
    .bind(&server_addr)
    .with_context(|| format!("Failed to bind {server_addr}"))?
    .run();

    tokio::select! {
        res = server => res.context("Server error")?,
        _ = shutdown_signal() => {},
    }

    Ok(())
}
