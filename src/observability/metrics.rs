use prometheus::{
    Encoder, GaugeVec, HistogramOpts, HistogramVec, IntCounter, IntCounterVec, Opts, Registry,
    TextEncoder,
};

#[derive(Clone)]
pub struct Metrics {
    registry: Registry,
    pub assignments_total: IntCounterVec,
    pub assignment_latency_seconds: HistogramVec,
    pub assignment_conflicts_total: IntCounter,
    pub driver_total_distance_km: GaugeVec,
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new()
    }
}

impl Metrics {
    pub fn new() -> Self {
        let registry = Registry::new();

        let assignments_total = IntCounterVec::new(
            Opts::new("assignments_total", "Total driver assignments by outcome"),
            &["outcome"],
        )
        .expect("valid assignments_total metric");

        let assignment_latency_seconds = HistogramVec::new(
            HistogramOpts::new(
                "assignment_latency_seconds",
                "Latency of driver assignment in seconds",
            ),
            &["outcome"],
        )
        .expect("valid assignment_latency_seconds metric");

        let assignment_conflicts_total = IntCounter::new(
            "assignment_conflicts_total",
            "Booking conflicts that triggered a new driver selection",
        )
        .expect("valid assignment_conflicts_total metric");

        let driver_total_distance_km = GaugeVec::new(
            Opts::new(
                "driver_total_distance_km",
                "Accumulated delivery distance per driver in km",
            ),
            &["driver_id"],
        )
        .expect("valid driver_total_distance_km metric");

        registry
            .register(Box::new(assignments_total.clone()))
            .expect("register assignments_total");
        registry
            .register(Box::new(assignment_latency_seconds.clone()))
            .expect("register assignment_latency_seconds");
        registry
            .register(Box::new(assignment_conflicts_total.clone()))
            .expect("register assignment_conflicts_total");
        registry
            .register(Box::new(driver_total_distance_km.clone()))
            .expect("register driver_total_distance_km");

        Self {
            registry,
            assignments_total,
            assignment_latency_seconds,
            assignment_conflicts_total,
            driver_total_distance_km,
        }
    }

    pub fn observe_assignment(&self, outcome: &str, elapsed_seconds: f64) {
        self.assignment_latency_seconds
            .with_label_values(&[outcome])
            .observe(elapsed_seconds);
        self.assignments_total.with_label_values(&[outcome]).inc();
    }

    pub fn encode(&self) -> Result<String, String> {
        let metric_families = self.registry.gather();
        let mut buffer = Vec::new();

        TextEncoder::new()
            .encode(&metric_families, &mut buffer)
            .map_err(|err| format!("failed to encode metrics: {err}"))?;

        String::from_utf8(buffer).map_err(|err| format!("metrics are not valid utf8: {err}"))
    }
}

#[cfg(test)]
mod tests {
    use super::Metrics;

    #[test]
    fn encodes_recorded_outcomes() {
        let metrics = Metrics::new();
        metrics.observe_assignment("success", 0.002);
        metrics.observe_assignment("city_mismatch", 0.001);

        let body = metrics.encode().unwrap();
        assert!(body.contains("assignments_total{outcome=\"success\"} 1"));
        assert!(body.contains("assignments_total{outcome=\"city_mismatch\"} 1"));
        assert!(body.contains("assignment_latency_seconds"));
    }
}
