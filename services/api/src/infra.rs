use metrics_exporter_prometheus::PrometheusHandle;
use priority_funding::catalog::{CsvRegionImporter, InMemoryRegionCatalog};
use priority_funding::config::FundingConfig;
use priority_funding::error::AppError;
use priority_funding::funding::{validate_pool, Indicator};
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Sample catalog, extended with the configured CSV export when present.
pub(crate) fn build_catalog(config: &FundingConfig) -> Result<InMemoryRegionCatalog, AppError> {
    let mut catalog = InMemoryRegionCatalog::african_sample();
    if let Some(path) = &config.region_csv {
        CsvRegionImporter::load_into(path, &config.default_country, &mut catalog)?;
    }
    Ok(catalog)
}

/// Parse `indicator=value` pairs such as `ld=0.5` or `luminosity=0.1`.
pub(crate) fn parse_weight_override(raw: &str) -> Result<(Indicator, f64), String> {
    let (name, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected INDICATOR=VALUE, got '{raw}'"))?;
    let indicator = name
        .parse::<Indicator>()
        .map_err(|err| err.to_string())?;
    let value = value
        .trim()
        .parse::<f64>()
        .map_err(|err| format!("failed to parse weight '{value}' ({err})"))?;
    Ok((indicator, value))
}

pub(crate) fn parse_pool(raw: &str) -> Result<f64, String> {
    let pool = raw
        .trim()
        .parse::<f64>()
        .map_err(|err| format!("failed to parse pool '{raw}' ({err})"))?;
    validate_pool(pool).map_err(|err| err.to_string())?;
    Ok(pool)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn weight_override_accepts_aliases() {
        assert_eq!(
            parse_weight_override("pop=0.35"),
            Ok((Indicator::PopulationTrend, 0.35))
        );
        assert_eq!(
            parse_weight_override("wealth = -0.1"),
            Ok((Indicator::Wealth, -0.1))
        );
        assert!(parse_weight_override("wealth=abc").is_err());
    }

    #[test]
    fn pool_must_be_positive() {
        assert_eq!(parse_pool("1000"), Ok(1000.0));
        assert!(parse_pool("0").is_err());
        assert!(parse_pool("inf").is_err());
        assert!(parse_pool("2e19").is_err());
        assert_eq!(parse_pool("9007199254740992"), Ok(9_007_199_254_740_992.0));
    }

    #[test]
    fn missing_csv_is_an_import_error() {
        let config = FundingConfig {
            region_csv: Some(PathBuf::from("/nonexistent/regions.csv")),
            ..FundingConfig::default()
        };
        assert!(matches!(build_catalog(&config), Err(AppError::Import(_))));
    }
}
