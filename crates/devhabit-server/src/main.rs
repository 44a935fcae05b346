//! # DevHabit Server
//!
//! Main entry point: loads configuration, wires the DI module, prepares the
//! database and serves the REST API until a shutdown signal arrives.

use devhabit_config::ConfigLoader;
use devhabit_core::{telemetry::shutdown_telemetry, DevHabitError, DevHabitResult};
use devhabit_rest::create_router;
use devhabit_server::{di, startup};
use tokio::signal;
use tracing::{error, info};

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        error!("Application error: {}", e);
        eprintln!("Application error: {e}");
        std::process::exit(1);
    }
}

async fn run() -> DevHabitResult<()> {
    let config_loader = ConfigLoader::from_default_location()?;
    let config = config_loader.get().await;

    startup::init_tracing(&config)?;
    startup::print_banner();
    info!("Starting DevHabit Server...");
    info!("Version: {}", env!("CARGO_PKG_VERSION"));

    let module = di::connect_module(&config).await?;
    let database = di::database_pool(&module);

    if config.database.run_migrations {
        database.run_migrations().await?;
    }
    if config.database.seed_data {
        di::data_seeder(&module).seed().await?;
    }

    let router = create_router(module.as_ref(), &config.server);

    let addr = config.server.addr();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| DevHabitError::Internal(format!("Failed to bind {}: {}", addr, e)))?;
    startup::print_startup_info(&config);

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| DevHabitError::Internal(format!("REST server error: {}", e)))?;

    database.close().await;
    shutdown_telemetry();
    info!("Server shutdown complete");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            info!("Received Ctrl+C, initiating graceful shutdown...");
        }
        () = terminate => {
            info!("Received terminate signal, initiating graceful shutdown...");
        }
    }
}
