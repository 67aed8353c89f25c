use crate::cli::ServeArgs;
use crate::infra::{AppState, DiscoveryServices};
use crate::routes::with_discovery_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use tabletop_discovery::config::AppConfig;
use tabletop_discovery::error::AppError;
use tabletop_discovery::telemetry;
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
    };

    let services = DiscoveryServices::load(&config.discovery)?;
    if config.discovery.admin_token.is_none() {
        info!("APP_ADMIN_TOKEN not set; admin routes are disabled");
    }

    let app = with_discovery_routes(services)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(
        ?config.environment,
        %addr,
        ad_radius_miles = config.discovery.ad_radius_miles,
        "tabletop discovery service ready"
    );

    axum::serve(listener, app).await?;
    Ok(())
}
