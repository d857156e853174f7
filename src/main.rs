//! Wiring & DI. Entry point: bootstrap adapters, inject into services, run UI.
//! No business logic here; validation lives in the domain, flows in the services.

use dotenv::dotenv;
use splitfair::adapters::http::{MockGateway, RestGateway};
use splitfair::adapters::session::SessionJson;
use splitfair::adapters::ui::tui::TuiInputPort;
use splitfair::ports::{ExpenseGateway, InputPort, SessionStore};
use splitfair::shared::config::AppConfig;
use splitfair::usecases::{AuthService, ExpenseService, GroupService, PaymentService};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cwd = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
    let env_loaded = dotenv();
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with(tracing_subscriber::fmt::layer())
        .init();

    match &env_loaded {
        Ok(path) => info!(path = %path.display(), "loaded .env"),
        Err(_) => info!(cwd = %cwd.display(), "no .env found (check CWD)"),
    }

    splitfair::adapters::ui::init_ui();

    let cfg = AppConfig::load().unwrap_or_default();

    // --- Gateway: real REST client when an API is configured, mock otherwise ---
    let gateway: Arc<dyn ExpenseGateway> = if cfg.is_api_configured() {
        let base_url = cfg.api_base_url.clone().unwrap_or_default();
        info!(url = %base_url, "using expense service API");
        Arc::new(RestGateway::new(
            base_url,
            Duration::from_secs(cfg.request_timeout_secs_or_default()),
        )?)
    } else {
        warn!("SPLITFAIR_API_BASE_URL not set, using mock gateway with fixture data");
        Arc::new(MockGateway::new())
    };

    // --- Session store (opaque bearer token between runs) ---
    let session_path = PathBuf::from(cfg.session_path_or_default());
    info!(path = %session_path.display(), "session file");
    let store: Arc<dyn SessionStore> = Arc::new(SessionJson::new(&session_path));

    // --- Services ---
    let auth = Arc::new(AuthService::new(Arc::clone(&gateway), Arc::clone(&store)));
    let expenses = Arc::new(ExpenseService::new(Arc::clone(&gateway)));
    let groups = Arc::new(GroupService::new(Arc::clone(&gateway)));
    let payments = Arc::new(PaymentService::new(Arc::clone(&gateway)));

    let input_port: Arc<dyn InputPort> = Arc::new(TuiInputPort::new(
        auth,
        expenses,
        groups,
        payments,
        cfg.currency_or_default(),
    ));

    // --- Run (auth -> main menu: expenses / payments / groups) ---
    input_port
        .run()
        .await
        .map_err(|e| anyhow::anyhow!("{}", e))?;

    Ok(())
}
