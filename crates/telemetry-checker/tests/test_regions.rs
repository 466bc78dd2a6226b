use serde_json::json;
use telemetry_checker::{
    ingestor::TelemetryRecord,
    processor::{
        regions::{RegionMetrics, batch_metrics, region_metrics},
        util::PercentileMethod,
    },
};

fn records(raw: serde_json::Value) -> Vec<TelemetryRecord> {
    serde_json::from_value(raw).unwrap()
}

#[test]
fn avg_latency_is_rounded_mean() {
    let data = records(json!([
        {"region": "apac", "latency_ms": 100.0},
        {"region": "apac", "latency_ms": 100.0001},
        {"region": "apac", "latency_ms": 100.0002}
    ]));
    let metrics = region_metrics(&data, "apac", 500.0, PercentileMethod::NearestRank);
    assert_eq!(metrics.avg_latency, Some(100.0001));
}

#[test]
fn p95_nearest_rank_picks_last_element_of_five() {
    let data = records(json!([
        {"region": "apac", "latency_ms": 100},
        {"region": "apac", "latency_ms": 200},
        {"region": "apac", "latency_ms": 300},
        {"region": "apac", "latency_ms": 400},
        {"region": "apac", "latency_ms": 500}
    ]));
    let metrics = region_metrics(&data, "apac", 1000.0, PercentileMethod::NearestRank);
    assert_eq!(metrics.p95_latency, Some(500.0));
}

#[test]
fn p95_of_single_observation_is_that_observation() {
    let data = records(json!([
        {"region": "apac", "latency_ms": 42.5}
    ]));
    let metrics = region_metrics(&data, "apac", 1000.0, PercentileMethod::NearestRank);
    assert_eq!(metrics.p95_latency, Some(42.5));
}

#[test]
fn uptime_percentage_scale_is_normalized() {
    let data = records(json!([
        {"region": "apac", "uptime": 99.9},
        {"region": "emea", "uptime": 0.95}
    ]));
    let apac = region_metrics(&data, "apac", 0.0, PercentileMethod::NearestRank);
    let emea = region_metrics(&data, "emea", 0.0, PercentileMethod::NearestRank);
    assert_eq!(apac.avg_uptime, Some(0.999));
    assert_eq!(emea.avg_uptime, Some(0.95));
}

#[test]
fn boolean_uptime_counts_as_zero_or_one() {
    let data = records(json!([
        {"region": "apac", "uptime": true},
        {"region": "apac", "uptime": false}
    ]));
    let metrics = region_metrics(&data, "apac", 0.0, PercentileMethod::NearestRank);
    assert_eq!(metrics.avg_uptime, Some(0.5));
}

#[test]
fn breaches_count_values_above_threshold() {
    let data = records(json!([
        {"region": "apac", "latency_ms": 100},
        {"region": "apac", "latency_ms": 200},
        {"region": "apac", "latency_ms": 300}
    ]));
    let metrics = region_metrics(&data, "apac", 150.0, PercentileMethod::NearestRank);
    assert_eq!(metrics.breaches, 2);
}

#[test]
fn unknown_region_yields_empty_metrics() {
    let data = records(json!([
        {"region": "apac", "latency_ms": 100, "uptime": 0.99}
    ]));
    let metrics = region_metrics(&data, "mars", 150.0, PercentileMethod::NearestRank);
    assert_eq!(metrics, RegionMetrics::empty());
    assert_eq!(metrics.breaches, 0);
}

#[test]
fn non_numeric_latency_is_skipped_not_fatal() {
    let data = records(json!([
        {"region": "apac", "latency_ms": "n/a"},
        {"region": "apac", "latency_ms": null},
        {"region": "apac", "latency_ms": true},
        {"region": "apac", "latency_ms": 250}
    ]));
    let metrics = region_metrics(&data, "apac", 150.0, PercentileMethod::NearestRank);
    assert_eq!(metrics.avg_latency, Some(250.0));
    assert_eq!(metrics.p95_latency, Some(250.0));
    assert_eq!(metrics.breaches, 1);
}

#[test]
fn end_to_end_apac_scenario() {
    let data = records(json!([
        {"region": "apac", "latency_ms": 100, "uptime": 99.5},
        {"region": "apac", "latency_ms": 300, "uptime": 0.98}
    ]));
    let out = batch_metrics(
        &data,
        &["apac".to_string()],
        150.0,
        PercentileMethod::NearestRank,
    );

    let apac = &out["apac"];
    assert_eq!(apac.avg_latency, Some(200.0));
    assert_eq!(apac.p95_latency, Some(300.0));
    assert_eq!(apac.avg_uptime, Some(0.9875));
    assert_eq!(apac.breaches, 1);
}

#[test]
fn interpolated_method_matches_legacy_estimator() {
    let data = records(json!([
        {"region": "apac", "latency_ms": 100},
        {"region": "apac", "latency_ms": 200},
        {"region": "apac", "latency_ms": 300},
        {"region": "apac", "latency_ms": 400},
        {"region": "apac", "latency_ms": 500}
    ]));
    let metrics = region_metrics(&data, "apac", 1000.0, PercentileMethod::Interpolated);
    // k = 3.8 -> 400 * 0.2 + 500 * 0.8
    assert_eq!(metrics.p95_latency, Some(480.0));
}

#[test]
fn batch_output_preserves_first_seen_order() {
    let data = records(json!([
        {"region": "apac", "latency_ms": 100},
        {"region": "emea", "latency_ms": 200},
        {"region": "amer", "latency_ms": 300}
    ]));
    let regions = vec![
        "emea".to_string(),
        "amer".to_string(),
        "emea".to_string(),
        "apac".to_string(),
    ];
    let out = batch_metrics(&data, &regions, 150.0, PercentileMethod::NearestRank);

    let keys: Vec<&String> = out.keys().collect();
    assert_eq!(keys, vec!["emea", "amer", "apac"]);
}

#[test]
fn empty_dataset_yields_empty_metrics_per_region() {
    let out = batch_metrics(
        &[],
        &["apac".to_string()],
        150.0,
        PercentileMethod::NearestRank,
    );
    assert_eq!(out["apac"], RegionMetrics::empty());
}
