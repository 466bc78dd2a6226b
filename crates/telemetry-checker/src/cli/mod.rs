use crate::{
    ingestor::TelemetryRecord,
    processor::{regions::batch_metrics, util::PercentileMethod},
};
use anyhow::Result;
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::fmt;
use tabled::{Table, Tabled, settings::Style};

/// Unified output format for CLI commands
#[derive(Debug, Clone, Copy, Default, ValueEnum, Serialize, Deserialize)]
pub enum OutputFormat {
    #[default]
    #[value(name = "table")]
    Table,
    #[value(name = "json")]
    Json,
    #[value(name = "json-pretty")]
    JsonPretty,
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Table => write!(f, "table"),
            Self::Json => write!(f, "json"),
            Self::JsonPretty => write!(f, "json-pretty"),
        }
    }
}

#[derive(Tabled)]
struct MetricsRow {
    #[tabled(rename = "Region")]
    region: String,
    #[tabled(rename = "Avg Latency (ms)")]
    avg_latency: String,
    #[tabled(rename = "P95 Latency (ms)")]
    p95_latency: String,
    #[tabled(rename = "Avg Uptime")]
    avg_uptime: String,
    #[tabled(rename = "Breaches")]
    breaches: String,
}

/// Run the batch aggregation once and render it for the terminal.
pub fn handle_check(
    records: &[TelemetryRecord],
    regions: &[String],
    threshold_ms: f64,
    method: PercentileMethod,
    format: OutputFormat,
) -> Result<String> {
    let metrics = batch_metrics(records, regions, threshold_ms, method);

    match format {
        OutputFormat::Table => {
            let rows: Vec<MetricsRow> = metrics
                .iter()
                .map(|(region, m)| MetricsRow {
                    region: region.clone(),
                    avg_latency: display_stat(m.avg_latency),
                    p95_latency: display_stat(m.p95_latency),
                    avg_uptime: display_stat(m.avg_uptime),
                    breaches: m.breaches.to_string(),
                })
                .collect();
            Ok(Table::new(rows).with(Style::modern()).to_string())
        }
        OutputFormat::Json => Ok(serde_json::to_string(&metrics)?),
        OutputFormat::JsonPretty => Ok(serde_json::to_string_pretty(&metrics)?),
    }
}

fn display_stat(value: Option<f64>) -> String {
    value.map_or_else(|| "-".to_string(), |v| v.to_string())
}
