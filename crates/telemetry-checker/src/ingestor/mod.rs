use anyhow::{Context, Result};
use serde::Deserialize;
use serde_json::Value;
use std::{fs, path::Path};
use tracing::{info, warn};

/// One telemetry observation as it appears in the dataset file.
///
/// The telemetry fields keep their raw JSON shape; whether a value is a
/// usable number is decided per query by the processor, so a malformed field
/// costs one statistic for one record instead of failing the whole load.
/// Records without a region never match any query.
#[derive(Debug, Clone, Deserialize)]
pub struct TelemetryRecord {
    #[serde(default)]
    pub region: Option<String>,
    #[serde(default)]
    pub latency_ms: Value,
    #[serde(default)]
    pub uptime: Value,
}

/// Load the telemetry dataset from the first candidate path that exists.
///
/// No candidate existing yields an empty dataset with a warning; the server
/// reports the missing bundle per request. A file that exists but cannot be
/// read or parsed is a startup error.
pub fn load_dataset<P: AsRef<Path>>(candidates: &[P]) -> Result<Vec<TelemetryRecord>> {
    for candidate in candidates {
        let path = candidate.as_ref();
        if !path.exists() {
            continue;
        }

        let raw = fs::read_to_string(path)
            .with_context(|| format!("Failed to read telemetry dataset {}", path.display()))?;
        let records: Vec<TelemetryRecord> = serde_json::from_str(&raw)
            .with_context(|| format!("Failed to parse telemetry dataset {}", path.display()))?;

        info!(
            "Loaded {} telemetry records from {}",
            records.len(),
            path.display()
        );
        return Ok(records);
    }

    warn!("No telemetry dataset found; starting with an empty dataset");
    Ok(Vec::new())
}
