use api::auth::middleware::log_request;
use api::routes::routes;
use axum::{Router, middleware::from_fn};
use migration::Migrator;
use sea_orm_migration::MigratorTrait;
use std::net::SocketAddr;
use tower_http::cors::CorsLayer;
use tracing_appender::rolling;
use util::config::{self, DEFAULT_JWT_SECRET};
use util::state::AppState;

#[tokio::main]
async fn main() {
    // Load configuration and initialize logging
    let _log_guard = init_logging(&config::log_file(), &config::log_level());

    if config::env().eq_ignore_ascii_case("production") && config::jwt_secret() == DEFAULT_JWT_SECRET {
        tracing::error!("JWT_SECRET must be set in production");
        std::process::exit(1);
    }

    let db = match db::connect().await {
        Ok(db) => db,
        Err(e) => {
            tracing::error!(error = %e, path = %config::database_path(), "Failed to connect to database");
            std::process::exit(1);
        }
    };

    if let Err(e) = Migrator::up(&db, None).await {
        tracing::error!(error = %e, "Failed to run migrations");
        std::process::exit(1);
    }

    let app_state = AppState::new(db);

    // Build app router
    let app = Router::new()
        .merge(routes(app_state))
        .layer(from_fn(log_request))
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = match format!("{}:{}", config::host(), config::port()).parse() {
        Ok(addr) => addr,
        Err(e) => {
            tracing::error!(error = %e, "Invalid HOST/PORT");
            std::process::exit(1);
        }
    };

    println!(
        "Starting {} on http://{}",
        config::project_name(),
        addr
    );
    tracing::info!(%addr, env = %config::env(), "Server starting");

    let listener = match tokio::net::TcpListener::bind(&addr).await {
        Ok(listener) => listener,
        Err(e) => {
            tracing::error!(error = %e, %addr, "Failed to bind");
            std::process::exit(1);
        }
    };

    if let Err(e) = axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await
    {
        tracing::error!(error = %e, "Server crashed");
    }
}

fn init_logging(log_file: &str, log_level: &str) -> tracing_appender::non_blocking::WorkerGuard {
    use std::fs;
    use tracing_subscriber::{EnvFilter, fmt, prelude::*};

    fs::create_dir_all("logs").ok();

    let file_appender = rolling::daily("logs", log_file);
    let (file_writer, guard) = tracing_appender::non_blocking(file_appender);

    let file_layer = fmt::layer()
        .with_writer(file_writer)
        .with_ansi(false)
        .with_target(true)
        .with_thread_ids(true);

    let stdout_layer = config::log_to_stdout().then(|| {
        fmt::layer()
            .with_writer(std::io::stdout)
            .with_ansi(true)
            .with_target(true)
    });

    let env_filter = EnvFilter::try_new(log_level).unwrap_or_else(|_| EnvFilter::new("api=info"));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(file_layer)
        .with(stdout_layer)
        .init();

    guard
}
