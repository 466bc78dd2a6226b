use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::cmp::Ordering;

/// Percentile estimation strategy.
///
/// `NearestRank` always returns an observed data point and is the canonical
/// estimator. `Interpolated` reproduces the linear-interpolation estimator
/// used by older deployments, for callers that still compare against its
/// output.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PercentileMethod {
    #[default]
    NearestRank,
    Interpolated,
}

/// Extract a latency reading from a raw record field.
///
/// Only JSON numbers count; strings, booleans, nulls and missing keys are
/// skipped without affecting the rest of the record.
pub fn latency_value(raw: &Value) -> Option<f64> {
    raw.as_f64()
}

/// Extract an uptime reading from a raw record field and normalize it to a
/// fraction.
///
/// Numbers are accepted as-is, booleans count as 0/1 samples. Values above 1
/// are percentage-scale (e.g. 99.9) and are divided by 100.
pub fn uptime_value(raw: &Value) -> Option<f64> {
    let u = match raw {
        Value::Bool(up) => {
            if *up {
                1.0
            } else {
                0.0
            }
        }
        _ => raw.as_f64()?,
    };
    Some(if u > 1.0 { u / 100.0 } else { u })
}

/// Round to a fixed number of decimal digits.
pub fn round_to(value: f64, digits: i32) -> f64 {
    let factor = 10f64.powi(digits);
    (value * factor).round() / factor
}

/// Arithmetic mean, `None` for an empty slice.
pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

/// Estimate the `perc`-th percentile (0..=100) of `values`.
///
/// Returns `None` for an empty slice. The input does not need to be sorted.
pub fn percentile(values: &[f64], perc: f64, method: PercentileMethod) -> Option<f64> {
    if values.is_empty() {
        return None;
    }

    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(Ordering::Equal));
    let n = sorted.len();

    match method {
        PercentileMethod::NearestRank => {
            let rank = (perc / 100.0 * n as f64).ceil() as usize;
            let idx = rank.saturating_sub(1).min(n - 1);
            Some(sorted[idx])
        }
        PercentileMethod::Interpolated => {
            if n == 1 {
                return Some(sorted[0]);
            }
            let k = (n - 1) as f64 * perc / 100.0;
            let floor = k.floor();
            let ceil = k.ceil();
            if floor == ceil {
                return Some(sorted[k as usize]);
            }
            let lower = sorted[floor as usize] * (ceil - k);
            let upper = sorted[ceil as usize] * (k - floor);
            Some(lower + upper)
        }
    }
}
