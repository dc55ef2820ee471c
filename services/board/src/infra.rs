use chrono::NaiveDate;
use hr_pipeline::config::AppConfig;
use hr_pipeline::error::AppError;
use hr_pipeline::HttpCollectionClient;
use metrics_exporter_prometheus::PrometheusHandle;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Load configuration and build the authenticated API client it describes.
pub(crate) fn connect() -> Result<(AppConfig, Arc<HttpCollectionClient>), AppError> {
    let config = AppConfig::load()?;
    let client = HttpCollectionClient::from_config(&config.api)?;
    Ok((config, Arc::new(client)))
}

pub(crate) fn parse_date(raw: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|err| format!("failed to parse '{raw}' as YYYY-MM-DD ({err})"))
}
