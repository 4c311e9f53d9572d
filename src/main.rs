use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use api_rest::{AppState, router};
use patientor_core::{
    CoreConfig, Services, constants::DEFAULT_REST_ADDR, data_dir_from_env_value,
    sick_leave_policy_from_env_value,
};

/// Main entry point for the patientor backend
///
/// Loads the seed data and serves the REST API until interrupted.
///
/// # Environment Variables
/// - `PATIENTOR_REST_ADDR`: REST server address (default: "0.0.0.0:3001")
/// - `PATIENTOR_DATA_DIR`: Directory holding `patients.json` and `diagnoses.json` (default: bundled data)
/// - `PATIENTOR_SICK_LEAVE_POLICY`: `lenient` or `strict` (default: "lenient")
///
/// # Returns
/// * `Ok(())` - If the server starts and shuts down cleanly
/// * `Err(anyhow::Error)` - If configuration, seeding or the server fails
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("patientor_run=info".parse()?)
                .add_directive("patientor_core=info".parse()?)
                .add_directive("api_rest=info".parse()?),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let rest_addr = std::env::var("PATIENTOR_REST_ADDR").unwrap_or_else(|_| DEFAULT_REST_ADDR.into());

    let cfg = Arc::new(CoreConfig::new(
        data_dir_from_env_value(std::env::var("PATIENTOR_DATA_DIR").ok()),
        sick_leave_policy_from_env_value(std::env::var("PATIENTOR_SICK_LEAVE_POLICY").ok())?,
    )?);
    tracing::info!("sick leave policy: {}", cfg.sick_leave_policy());

    let services = Services::load(cfg)?;
    let app = router(AppState::new(services));

    tracing::info!("++ Starting patientor REST on {}", rest_addr);
    let listener = tokio::net::TcpListener::bind(&rest_addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("-- patientor REST stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("failed to listen for shutdown signal: {:?}", e);
        std::future::pending::<()>().await;
    }
}
