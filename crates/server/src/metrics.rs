//! Prometheus metrics for observability.
//!
//! HTTP request metrics live here; engine and export metrics come from
//! `pickbook_core::metrics` and are registered into the same registry.

use once_cell::sync::Lazy;
use prometheus::{
    self, Encoder, HistogramOpts, HistogramVec, IntCounterVec, IntGauge, Opts, Registry,
    TextEncoder,
};
use regex_lite::Regex;

/// Global metrics registry.
pub static REGISTRY: Lazy<Registry> = Lazy::new(|| {
    let registry = Registry::new();
    register_metrics(&registry);
    registry
});

// =============================================================================
// HTTP Request Metrics
// =============================================================================

/// HTTP request duration in seconds.
pub static HTTP_REQUEST_DURATION: Lazy<HistogramVec> = Lazy::new(|| {
    HistogramVec::new(
        HistogramOpts::new(
            "pickbook_http_request_duration_seconds",
            "HTTP request duration in seconds",
        )
        .buckets(vec![
            0.001, 0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0,
        ]),
        &["method", "path", "status"],
    )
    .unwrap()
});

/// HTTP requests total count.
pub static HTTP_REQUESTS_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new("pickbook_http_requests_total", "Total HTTP requests"),
        &["method", "path", "status"],
    )
    .unwrap()
});

/// HTTP requests currently in flight.
pub static HTTP_REQUESTS_IN_FLIGHT: Lazy<IntGauge> = Lazy::new(|| {
    IntGauge::new(
        "pickbook_http_requests_in_flight",
        "Number of HTTP requests currently being processed",
    )
    .unwrap()
});

// =============================================================================
// Registration
// =============================================================================

fn register_metrics(registry: &Registry) {
    registry
        .register(Box::new(HTTP_REQUEST_DURATION.clone()))
        .unwrap();
    registry
        .register(Box::new(HTTP_REQUESTS_TOTAL.clone()))
        .unwrap();
    registry
        .register(Box::new(HTTP_REQUESTS_IN_FLIGHT.clone()))
        .unwrap();

    // Core metrics (derivation, loads, export)
    for metric in pickbook_core::metrics::all_metrics() {
        registry.register(metric).unwrap();
    }
}

/// Encode all metrics as Prometheus text format.
pub fn encode_metrics() -> Result<String, prometheus::Error> {
    let mut buffer = Vec::new();
    TextEncoder::new().encode(&REGISTRY.gather(), &mut buffer)?;
    Ok(String::from_utf8_lossy(&buffer).into_owned())
}

static COUNTRY_SEGMENT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"/countries/[^/]+").expect("valid regex"));
static USER_SEGMENT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"/preferences/[^/]+").expect("valid regex"));

/// Normalize a path for metric labels (replace ids with placeholders).
pub fn normalize_path(path: &str) -> String {
    let result = COUNTRY_SEGMENT.replace_all(path, "/countries/{country_id}");
    let result = USER_SEGMENT.replace_all(&result, "/preferences/{user_id}");
    result.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_path_country() {
        let path = "/api/v1/countries/tr/metadata";
        assert_eq!(normalize_path(path), "/api/v1/countries/{country_id}/metadata");
    }

    #[test]
    fn test_normalize_path_country_and_user() {
        let path = "/api/v1/countries/tr/preferences/user-42";
        assert_eq!(
            normalize_path(path),
            "/api/v1/countries/{country_id}/preferences/{user_id}"
        );
    }

    #[test]
    fn test_normalize_path_no_ids() {
        assert_eq!(normalize_path("/api/v1/health"), "/api/v1/health");
        assert_eq!(normalize_path("/api/v1/export/catalog"), "/api/v1/export/catalog");
    }

    #[test]
    fn test_encode_metrics_returns_prometheus_format() {
        HTTP_REQUESTS_TOTAL
            .with_label_values(&["GET", "/test", "200"])
            .inc();

        let output = encode_metrics().unwrap();
        assert!(output.contains("pickbook_http_requests_total"));
        assert!(output.contains("# HELP"));
        assert!(output.contains("# TYPE"));
    }

    #[test]
    fn test_registry_includes_core_metrics() {
        HTTP_REQUEST_DURATION
            .with_label_values(&["GET", "/test", "200"])
            .observe(0.1);
        HTTP_REQUESTS_IN_FLIGHT.set(0);
        pickbook_core::metrics::DERIVATIONS_TOTAL.inc();
        pickbook_core::metrics::STALE_LOADS_DISCARDED.inc();

        let output = encode_metrics().unwrap();

        assert!(output.contains("pickbook_http_request_duration_seconds"));
        assert!(output.contains("pickbook_http_requests_in_flight"));
        assert!(output.contains("pickbook_derivations_total"));
        assert!(output.contains("pickbook_stale_loads_discarded_total"));
    }
}
