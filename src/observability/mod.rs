// Observability: metrics recording for the ingestion pipeline

pub mod metrics;

pub use metrics::MetricName;
