use prometheus_exporter::prometheus::{
    HistogramTimer, HistogramVec, IntCounterVec, default_registry,
    register_histogram_vec_with_registry, register_int_counter_vec_with_registry,
};

// Provisioning each metrics
lazy_static::lazy_static! {
    pub static ref ATTESTATION_AGGREGATION_TIME: HistogramVec = create_histogram_vec(
        "beacon_attestation_aggregation_time",
        "Duration of a single max-cover attestation aggregation call",
        &["strategy"]
    );

    pub static ref ATTESTATION_AGGREGATES_PRODUCED: IntCounterVec = create_int_counter_vec(
        "beacon_attestation_aggregates_produced",
        "Number of aggregate attestations materialized by max-cover aggregation",
        &["strategy"]
    );
}

/// Create a new counter metric
pub fn create_int_counter_vec(name: &str, help: &str, label_names: &[&str]) -> IntCounterVec {
    let registry = default_registry();
    register_int_counter_vec_with_registry!(name, help, label_names, registry)
        .expect("failed to create int counter vec")
}

/// Increase the value of a counter metric
pub fn inc_int_counter_vec(counter_vec: &IntCounterVec, amount: u64, label_values: &[&str]) {
    counter_vec.with_label_values(label_values).inc_by(amount);
}

/// Create a new histogram metric
pub fn create_histogram_vec(name: &str, help: &str, label_names: &[&str]) -> HistogramVec {
    let registry = default_registry();
    register_histogram_vec_with_registry!(name, help, label_names, registry)
        .expect("failed to create histogram")
}

/// Start a timer for a histogram metric
pub fn start_timer_vec(histogram_vec: &HistogramVec, label_values: &[&str]) -> HistogramTimer {
    histogram_vec.with_label_values(label_values).start_timer()
}

/// Stop a timer for a histogram metric
pub fn stop_timer(timer: HistogramTimer) {
    timer.observe_duration()
}
