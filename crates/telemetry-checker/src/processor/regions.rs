use crate::{
    ingestor::TelemetryRecord,
    processor::util::{PercentileMethod, latency_value, mean, percentile, round_to, uptime_value},
};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Aggregate statistics for one region.
///
/// Latency statistics are rounded to 4 decimal digits, uptime to 6. A
/// statistic is `None` when the region has no valid samples for it;
/// `breaches` is always a concrete count.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegionMetrics {
    pub avg_latency: Option<f64>,
    pub p95_latency: Option<f64>,
    pub avg_uptime: Option<f64>,
    pub breaches: u64,
}

impl RegionMetrics {
    /// Result for a region with no matching records. Not an error.
    pub fn empty() -> Self {
        Self {
            avg_latency: None,
            p95_latency: None,
            avg_uptime: None,
            breaches: 0,
        }
    }
}

/// Compute aggregate metrics for a single region.
///
/// Records are matched on exact, case-sensitive region equality. Fields that
/// fail numeric extraction are skipped per record, per statistic. Pure: no
/// I/O, no mutation of the input.
pub fn region_metrics(
    records: &[TelemetryRecord],
    region: &str,
    threshold_ms: f64,
    method: PercentileMethod,
) -> RegionMetrics {
    let mut latencies = Vec::new();
    let mut uptimes = Vec::new();

    for record in records
        .iter()
        .filter(|r| r.region.as_deref() == Some(region))
    {
        if let Some(latency) = latency_value(&record.latency_ms) {
            latencies.push(latency);
        }
        if let Some(uptime) = uptime_value(&record.uptime) {
            uptimes.push(uptime);
        }
    }

    let breaches = latencies.iter().filter(|&&l| l > threshold_ms).count() as u64;

    RegionMetrics {
        avg_latency: mean(&latencies).map(|m| round_to(m, 4)),
        p95_latency: percentile(&latencies, 95.0, method).map(|p| round_to(p, 4)),
        avg_uptime: mean(&uptimes).map(|m| round_to(m, 6)),
        breaches,
    }
}

/// Compute metrics for a batch of requested regions against one threshold.
///
/// Duplicate region names are deduplicated first-seen-wins, so each region is
/// computed once and the output mapping preserves first-seen request order.
pub fn batch_metrics(
    records: &[TelemetryRecord],
    regions: &[String],
    threshold_ms: f64,
    method: PercentileMethod,
) -> IndexMap<String, RegionMetrics> {
    debug!(
        "Aggregating {} regions over {} records (threshold {threshold_ms}ms)",
        regions.len(),
        records.len()
    );

    let mut out = IndexMap::with_capacity(regions.len());
    for region in regions {
        out.entry(region.clone())
            .or_insert_with(|| region_metrics(records, region, threshold_ms, method));
    }
    out
}
