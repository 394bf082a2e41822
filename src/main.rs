use std::net::SocketAddr;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use api_rest::AppState;
use badge_core::config::{
    dir_from_env_value, export_timeout_from_env_value, flag_from_env_value,
    optional_path_from_env_value, port_from_env_value, sheets_environment_from_env_value,
};
use badge_core::constants::{DEFAULT_OUTPUT_DIR, DEFAULT_STATIC_DIR};
use badge_core::{
    select_exporter, BadgeConfig, BadgeRenderer, DocumentExporter, DocumentMaterializer,
    FooterLabels, Logo, SheetsConfig,
};

fn env(key: &str) -> Option<String> {
    std::env::var(key).ok()
}

/// Resolve all configuration from the environment, once.
fn config_from_env() -> anyhow::Result<BadgeConfig> {
    let environment = sheets_environment_from_env_value(env("BADGE_ENV"))?;
    let suffix = environment.var_suffix();
    let sheets = SheetsConfig::new(env("GOOGLE_API_KEY"), env("SHEET_ID"), environment)
        .with_overrides(
            env(&format!("GOOGLE_API_KEY_{suffix}")),
            env(&format!("SHEET_ID_{suffix}")),
        );

    Ok(BadgeConfig::new(
        port_from_env_value(env("PORT"))?,
        dir_from_env_value(env("BADGE_OUTPUT_DIR"), DEFAULT_OUTPUT_DIR),
        dir_from_env_value(env("BADGE_STATIC_DIR"), DEFAULT_STATIC_DIR),
        FooterLabels::new(env("BADGE_FOOTER_PRIMARY"), env("BADGE_FOOTER_SECONDARY")),
        optional_path_from_env_value(env("BADGE_LOGO_PATH")),
        flag_from_env_value("BADGE_PDF_ENABLED", env("BADGE_PDF_ENABLED"), true)?,
        export_timeout_from_env_value(env("BADGE_PDF_TIMEOUT_SECS"))?,
        sheets,
    )?)
}

/// Main entry point for the badge server
///
/// # Environment Variables
/// - `PORT`: listening port (default: 3000)
/// - `BADGE_BIND_HOST`: listening address (default: "0.0.0.0")
/// - `BADGE_OUTPUT_DIR`: artifact directory (default: "output")
/// - `BADGE_STATIC_DIR`: static file root (default: "public")
/// - `BADGE_FOOTER_PRIMARY` / `BADGE_FOOTER_SECONDARY`: badge footer labels
/// - `BADGE_LOGO_PATH`: logo image embedded in every badge
/// - `BADGE_PDF_ENABLED`: try to use headless Chrome for PDF output (default: true)
/// - `BADGE_PDF_TIMEOUT_SECS`: per-request export budget (default: 30)
/// - `GOOGLE_API_KEY`, `SHEET_ID`: spreadsheet source
/// - `BADGE_ENV`: `development` (default) or `production`; selects the
///   `GOOGLE_API_KEY_<ENV>` / `SHEET_ID_<ENV>` overrides
///
/// # Errors
/// Returns an error if:
/// - the logging/tracing configuration cannot be initialised,
/// - any environment value is malformed or the logo cannot be read,
/// - the output directory cannot be created,
/// - the server address cannot be bound, or
/// - the HTTP server fails while running.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("badge=info".parse()?)
                .add_directive("api_rest=info".parse()?),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cfg = Arc::new(config_from_env()?);

    let missing = cfg.sheets().missing_required();
    if !missing.is_empty() {
        tracing::warn!(
            "Google Sheets settings missing: {}; spreadsheet import will not work",
            missing.join(", ")
        );
    }

    let logo = match cfg.logo_path() {
        Some(path) => Logo::from_file(path)?,
        None => Logo::builtin(),
    };
    let renderer = BadgeRenderer::new(cfg.footer().clone(), logo);
    let exporter: Arc<dyn DocumentExporter> = Arc::from(select_exporter(cfg.pdf_enabled()));
    let materializer = Arc::new(DocumentMaterializer::new(
        cfg.output_dir().to_path_buf(),
        renderer,
        exporter,
        cfg.export_timeout(),
    ));
    materializer.ensure_output_dir()?;

    let host = env("BADGE_BIND_HOST").unwrap_or_else(|| "0.0.0.0".into());
    let addr: SocketAddr = format!("{host}:{}", cfg.port()).parse()?;

    tracing::info!("++ Starting badge server on {}", addr);
    tracing::info!(
        "++ Writing {} badges to {}",
        materializer.kind().extension(),
        materializer.output_dir().display()
    );

    let app = api_rest::router(AppState::new(cfg.clone(), materializer));

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("failed to listen for shutdown signal: {e}");
        std::future::pending::<()>().await;
    }
    tracing::info!("-- Shutting down badge server");
}
