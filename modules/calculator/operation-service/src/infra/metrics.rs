//! Prometheus metrics for one operation service.
//!
//! Exposed at `/metrics` in Prometheus text format:
//! - `<noun>_requests_total`: calculation requests received (counter)
//! - `<noun>_errors_total`: requests answered with an error (counter)
//! - `<noun>_request_latency_seconds`: time to produce a response (histogram)

use prometheus::{Encoder, Histogram, HistogramOpts, IntCounter, Registry, TextEncoder};

pub struct ServiceMetrics {
    registry: Registry,
    pub requests: IntCounter,
    pub errors: IntCounter,
    pub latency: Histogram,
}

impl ServiceMetrics {
    /// Create and register the metric family for `service`.
    ///
    /// # Errors
    /// Returns an error if a metric name is invalid for Prometheus.
    pub fn new(service: &str) -> Result<Self, prometheus::Error> {
        let registry = Registry::new();

        let requests = IntCounter::new(
            format!("{service}_requests_total"),
            format!("Total {service} requests"),
        )?;
        let errors = IntCounter::new(
            format!("{service}_errors_total"),
            format!("Total {service} requests answered with an error"),
        )?;
        let latency = Histogram::with_opts(HistogramOpts::new(
            format!("{service}_request_latency_seconds"),
            format!("{service} request latency"),
        ))?;

        registry.register(Box::new(requests.clone()))?;
        registry.register(Box::new(errors.clone()))?;
        registry.register(Box::new(latency.clone()))?;

        tracing::debug!(service, "Prometheus metrics registered");
        Ok(Self {
            registry,
            requests,
            errors,
            latency,
        })
    }

    /// Render all metrics in the text exposition format.
    ///
    /// # Errors
    /// Returns an error if encoding fails.
    pub fn render(&self) -> Result<String, prometheus::Error> {
        let mut buf = Vec::new();
        TextEncoder::new().encode(&self.registry.gather(), &mut buf)?;
        String::from_utf8(buf).map_err(|e| prometheus::Error::Msg(e.to_string()))
    }
}
