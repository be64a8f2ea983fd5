//! Metrics for the ingestion pipeline
//!
//! Recording goes through the `metrics` facade. Nothing is exported unless the
//! embedding application installs a recorder, in which case every name below
//! follows the Prometheus naming conventions.

use std::fmt;

/// Enum representing all metric names used in the system
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MetricName {
    // Decoder metrics
    DecoderDecodeSuccess,
    DecoderDecodeError,
    DecoderDuration,
    DecoderBytesProcessed,
    DecoderRowsDecoded,

    // Normalize metrics
    NormalizeRowsProcessed,
    NormalizeStatusInferred,
    NormalizeNumericDefaulted,
    NormalizeNegativeDuration,

    // Ingestion metrics
    IngestStarted,
    IngestSucceeded,
    IngestFailed,
    IngestRejected,
    IngestCancelled,
    IngestReadFailed,
    IngestDuration,
    IngestFindings,
}

impl MetricName {
    pub fn as_str(&self) -> &'static str {
        match self {
            MetricName::DecoderDecodeSuccess => "armp_decoder_decode_success_total",
            MetricName::DecoderDecodeError => "armp_decoder_decode_error_total",
            MetricName::DecoderDuration => "armp_decoder_duration_seconds",
            MetricName::DecoderBytesProcessed => "armp_decoder_bytes_processed",
            MetricName::DecoderRowsDecoded => "armp_decoder_rows_decoded_total",

            MetricName::NormalizeRowsProcessed => "armp_normalize_rows_processed_total",
            MetricName::NormalizeStatusInferred => "armp_normalize_status_inferred_total",
            MetricName::NormalizeNumericDefaulted => "armp_normalize_numeric_defaulted_total",
            MetricName::NormalizeNegativeDuration => "armp_normalize_negative_duration_total",

            MetricName::IngestStarted => "armp_ingest_started_total",
            MetricName::IngestSucceeded => "armp_ingest_succeeded_total",
            MetricName::IngestFailed => "armp_ingest_failed_total",
            MetricName::IngestRejected => "armp_ingest_rejected_total",
            MetricName::IngestCancelled => "armp_ingest_cancelled_total",
            MetricName::IngestReadFailed => "armp_ingest_read_failed_total",
            MetricName::IngestDuration => "armp_ingest_duration_seconds",
            MetricName::IngestFindings => "armp_ingest_findings",
        }
    }

    pub fn all_metrics() -> impl Iterator<Item = MetricName> {
        use MetricName::*;
        [
            DecoderDecodeSuccess,
            DecoderDecodeError,
            DecoderDuration,
            DecoderBytesProcessed,
            DecoderRowsDecoded,
            NormalizeRowsProcessed,
            NormalizeStatusInferred,
            NormalizeNumericDefaulted,
            NormalizeNegativeDuration,
            IngestStarted,
            IngestSucceeded,
            IngestFailed,
            IngestRejected,
            IngestCancelled,
            IngestReadFailed,
            IngestDuration,
            IngestFindings,
        ]
        .into_iter()
    }
}

impl fmt::Display for MetricName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ============================================================================
// Decoder Metrics
// ============================================================================

pub mod decoder {
    use super::MetricName;

    pub fn decode_success(format: &'static str) {
        ::metrics::counter!(MetricName::DecoderDecodeSuccess.as_str(), "format" => format).increment(1);
    }

    pub fn decode_error(format: &'static str) {
        ::metrics::counter!(MetricName::DecoderDecodeError.as_str(), "format" => format).increment(1);
    }

    pub fn duration(secs: f64) {
        ::metrics::histogram!(MetricName::DecoderDuration.as_str()).record(secs);
    }

    pub fn bytes_processed(bytes: usize) {
        ::metrics::histogram!(MetricName::DecoderBytesProcessed.as_str()).record(bytes as f64);
    }

    pub fn rows_decoded(count: u64) {
        ::metrics::counter!(MetricName::DecoderRowsDecoded.as_str()).increment(count);
    }
}

// ============================================================================
// Normalize Metrics
// ============================================================================

pub mod normalize {
    use super::MetricName;

    pub fn row_processed() {
        ::metrics::counter!(MetricName::NormalizeRowsProcessed.as_str()).increment(1);
    }

    /// Status came from the date fallback rather than the Status cell
    pub fn status_inferred(status: &'static str) {
        ::metrics::counter!(MetricName::NormalizeStatusInferred.as_str(), "status" => status).increment(1);
    }

    pub fn numeric_defaulted(field: &'static str) {
        ::metrics::counter!(MetricName::NormalizeNumericDefaulted.as_str(), "field" => field).increment(1);
    }

    pub fn negative_duration() {
        ::metrics::counter!(MetricName::NormalizeNegativeDuration.as_str()).increment(1);
    }
}

// ============================================================================
// Ingest Metrics
// ============================================================================

pub mod ingest {
    use super::MetricName;

    pub fn started() {
        ::metrics::counter!(MetricName::IngestStarted.as_str()).increment(1);
    }

    pub fn succeeded(findings: usize) {
        ::metrics::counter!(MetricName::IngestSucceeded.as_str()).increment(1);
        ::metrics::histogram!(MetricName::IngestFindings.as_str()).record(findings as f64);
    }

    pub fn failed(error_kind: &'static str) {
        ::metrics::counter!(MetricName::IngestFailed.as_str(), "error_type" => error_kind).increment(1);
    }

    pub fn rejected() {
        ::metrics::counter!(MetricName::IngestRejected.as_str()).increment(1);
    }

    /// Upload dropped by its caller before publishing an outcome
    pub fn cancelled() {
        ::metrics::counter!(MetricName::IngestCancelled.as_str()).increment(1);
    }

    /// Source bytes could not be read; no ingestion was started
    pub fn read_failed(error_kind: &'static str) {
        ::metrics::counter!(MetricName::IngestReadFailed.as_str(), "error_type" => error_kind).increment(1);
    }

    pub fn duration(secs: f64) {
        ::metrics::histogram!(MetricName::IngestDuration.as_str()).record(secs);
    }
}
