//! Server startup utilities.

use devhabit_config::AppConfig;
use devhabit_core::{
    telemetry::{init_telemetry, TelemetryConfig},
    DevHabitResult,
};
use tracing::info;

/// Maps the observability section onto the telemetry settings.
#[must_use]
pub fn telemetry_config(config: &AppConfig) -> TelemetryConfig {
    TelemetryConfig {
        enabled: config.observability.tracing_enabled,
        service_name: config.app.name.clone(),
        otlp_endpoint: config.observability.otlp_endpoint.clone(),
        sampling_ratio: config.observability.sampling_ratio,
        json_output: config.observability.json_logs(),
        log_level: Some(config.observability.log_level.clone()),
    }
}

/// Installs the global subscriber, with span export when enabled.
pub fn init_tracing(config: &AppConfig) -> DevHabitResult<()> {
    init_telemetry(&telemetry_config(config))
}

/// Prints the startup banner.
pub fn print_banner() {
    info!(r#"
    ____             __  __      __    _ __
   / __ \___ _   __/ / / /___ _/ /_  (_) /_
  / / / / _ \ | / / /_/ / __ `/ __ \/ / __/
 / /_/ /  __/ |/ / __  / /_/ / /_/ / / /_
/_____/\___/|___/_/ /_/\__,_/_.___/_/\__/
    "#);
}

/// Prints where the API can be reached.
pub fn print_startup_info(config: &AppConfig) {
    let base = config
        .server
        .public_base_url
        .clone()
        .unwrap_or_else(|| format!("http://{}", config.server.addr()));
    let separator = "=".repeat(60);

    info!("{}", separator);
    info!("Environment: {}", config.app.environment);
    info!("REST API:    {}", base);
    info!("Health:      {}/health", base);
    info!("API Docs:    {}/swagger-ui", base);
    info!("{}", separator);
}
