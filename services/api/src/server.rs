use crate::cli::ServeArgs;
use crate::infra::{AppState, InMemoryProfileDirectory, InMemorySubmissionStore};
use crate::routes::with_compliance_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use dpo_vendor::compliance::{compliance_sections, ComplianceIntakeService};
use dpo_vendor::config::AppConfig;
use dpo_vendor::error::AppError;
use dpo_vendor::telemetry;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use tracing::info;

pub(crate) async fn run(mut args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }

    telemetry::init(&config.telemetry)?;

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(std::sync::atomic::AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
        public_url: config.auth.public_url.clone(),
    };

    let store = Arc::new(InMemorySubmissionStore::default());
    let profiles = Arc::new(InMemoryProfileDirectory::seeded(&config.auth));
    let intake_service = Arc::new(ComplianceIntakeService::new(
        compliance_sections(),
        store,
        profiles,
    ));

    let app = with_compliance_routes(intake_service)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(
        ?config.environment,
        %addr,
        superadmins = config.auth.superadmin_ids.len(),
        limited_admins = config.auth.limited_admin_ids.len(),
        "compliance intake service ready"
    );

    axum::serve(listener, app).await?;
    Ok(())
}
