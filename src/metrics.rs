//! Prometheus metrics for the feed, alert evaluation and HTTP surface

use prometheus::{Encoder, Gauge, Histogram, HistogramOpts, IntCounter, IntGauge, Registry, TextEncoder};

pub struct Metrics {
    registry: Registry,

    pub http_requests_total: IntCounter,
    pub http_request_duration_seconds: Histogram,
    pub http_requests_in_flight: IntGauge,

    pub feed_connected: Gauge,
    pub feed_reconnects_total: IntCounter,
    pub feed_messages_total: IntCounter,
    pub feed_decode_errors_total: IntCounter,
    pub indicator_updates_total: IntCounter,

    pub alert_cycles_total: IntCounter,
    pub alert_cycle_failures_total: IntCounter,
    pub alerts_triggered_total: IntCounter,
    pub alert_status_update_failures_total: IntCounter,
    pub subscribers_active: IntGauge,

    pub database_connected: Gauge,
}

impl Metrics {
    /// Create a metrics set on its own registry
    pub fn new() -> Result<Self, prometheus::Error> {
        let registry = Registry::new();

        let http_requests_total =
            IntCounter::new("http_requests_total", "Total number of HTTP requests")?;
        let http_request_duration_seconds = Histogram::with_opts(HistogramOpts::new(
            "http_request_duration_seconds",
            "HTTP request duration in seconds",
        ))?;
        let http_requests_in_flight =
            IntGauge::new("http_requests_in_flight", "HTTP requests currently being served")?;

        let feed_connected = Gauge::new("feed_connected", "1 while the kline stream is connected")?;
        let feed_reconnects_total =
            IntCounter::new("feed_reconnects_total", "Kline stream reconnect attempts")?;
        let feed_messages_total =
            IntCounter::new("feed_messages_total", "Kline stream messages received")?;
        let feed_decode_errors_total = IntCounter::new(
            "feed_decode_errors_total",
            "Kline stream messages skipped because they failed to decode",
        )?;
        let indicator_updates_total = IntCounter::new(
            "indicator_updates_total",
            "Indicator snapshots published",
        )?;

        let alert_cycles_total =
            IntCounter::new("alert_cycles_total", "Alert evaluation cycles completed")?;
        let alert_cycle_failures_total = IntCounter::new(
            "alert_cycle_failures_total",
            "Alert evaluation cycles aborted by a store read failure",
        )?;
        let alerts_triggered_total =
            IntCounter::new("alerts_triggered_total", "Alerts moved to completed")?;
        let alert_status_update_failures_total = IntCounter::new(
            "alert_status_update_failures_total",
            "Failed attempts to persist an alert status change",
        )?;
        let subscribers_active =
            IntGauge::new("subscribers_active", "Connected alert subscribers")?;

        let database_connected =
            Gauge::new("database_connected", "1 when a database-backed store is in use")?;

        registry.register(Box::new(http_requests_total.clone()))?;
        registry.register(Box::new(http_request_duration_seconds.clone()))?;
        registry.register(Box::new(http_requests_in_flight.clone()))?;
        registry.register(Box::new(feed_connected.clone()))?;
        registry.register(Box::new(feed_reconnects_total.clone()))?;
        registry.register(Box::new(feed_messages_total.clone()))?;
        registry.register(Box::new(feed_decode_errors_total.clone()))?;
        registry.register(Box::new(indicator_updates_total.clone()))?;
        registry.register(Box::new(alert_cycles_total.clone()))?;
        registry.register(Box::new(alert_cycle_failures_total.clone()))?;
        registry.register(Box::new(alerts_triggered_total.clone()))?;
        registry.register(Box::new(alert_status_update_failures_total.clone()))?;
        registry.register(Box::new(subscribers_active.clone()))?;
        registry.register(Box::new(database_connected.clone()))?;

        Ok(Self {
            registry,
            http_requests_total,
            http_request_duration_seconds,
            http_requests_in_flight,
            feed_connected,
            feed_reconnects_total,
            feed_messages_total,
            feed_decode_errors_total,
            indicator_updates_total,
            alert_cycles_total,
            alert_cycle_failures_total,
            alerts_triggered_total,
            alert_status_update_failures_total,
            subscribers_active,
            database_connected,
        })
    }

    /// Render all metrics in the Prometheus text format
    pub fn export(&self) -> Result<String, prometheus::Error> {
        let encoder = TextEncoder::new();
        let mut buffer = Vec::new();
        encoder.encode(&self.registry.gather(), &mut buffer)?;
        String::from_utf8(buffer).map_err(|e| prometheus::Error::Msg(e.to_string()))
    }
}
