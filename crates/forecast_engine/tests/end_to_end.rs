//! End-to-end forecast scenarios through the public API.

use approx::assert_relative_eq;
use forecast_core::types::{
    EstimationMethod, ErrorKind, ForecastError, PriceBand, SeriesKind, ValidationError,
};
use forecast_engine::mc::SimulationConfig;
use forecast_engine::{forecast, CancellationToken, ForecastEngine, ForecastRequest};

/// Upward-drifting closes with a bounded oscillation.
fn drifting_closes(n: usize) -> Vec<f64> {
    (0..n)
        .map(|i| {
            let t = i as f64;
            100.0 * 1.003_f64.powf(t) * (1.0 + 0.004 * t.sin())
        })
        .collect()
}

fn bootstrap_config(seed: u64) -> SimulationConfig {
    SimulationConfig::builder()
        .simulations(2000)
        .block_size(5)
        .method(EstimationMethod::BlockBootstrap)
        .seed(seed)
        .build()
        .unwrap()
}

#[test]
fn test_bootstrap_three_horizons() {
    let request = ForecastRequest::new(drifting_closes(130), vec![5, 20, 60]);
    let result = forecast(&request, &bootstrap_config(42)).unwrap();

    assert_eq!(result.horizons.len(), 3);
    let days: Vec<u32> = result.horizons.iter().map(|h| h.horizon_days).collect();
    assert_eq!(days, vec![5, 20, 60]);

    for h in &result.horizons {
        assert!(matches!(h.band, PriceBand::Terminal { .. }));
        assert!(h.band.lower() <= h.band.upper());
        assert!(h.probability_of_rise > 0.5);
        assert!((0.0..=1.0).contains(&h.probability_of_rise));
        assert_eq!(h.paths, 2000);
        assert!(h.prob_above_target.is_none());
    }

    assert_relative_eq!(result.last_price, *drifting_closes(130).last().unwrap());
    assert_eq!(result.block_size, Some(5));
    assert_eq!(result.diagnostics.dropped_returns, 0);
}

#[test]
fn test_horizons_returned_ascending() {
    let request = ForecastRequest::new(drifting_closes(130), vec![60, 5, 20]);
    let result = forecast(&request, &bootstrap_config(1)).unwrap();

    let days: Vec<u32> = result.horizons.iter().map(|h| h.horizon_days).collect();
    assert_eq!(days, vec![5, 20, 60]);
}

#[test]
fn test_short_series_is_insufficient_data() {
    let request = ForecastRequest::new(drifting_closes(50), vec![5]);
    let err = forecast(&request, &bootstrap_config(1)).unwrap_err();

    assert_eq!(
        err,
        ForecastError::InsufficientData {
            series: SeriesKind::Closes,
            required: 120,
            actual: 50,
        }
    );
    assert_eq!(err.kind(), ErrorKind::InsufficientData);
}

#[test]
fn test_duplicate_horizons_rejected() {
    let request = ForecastRequest::new(drifting_closes(130), vec![5, 20, 5]);
    let err = forecast(&request, &bootstrap_config(1)).unwrap_err();

    assert_eq!(err, ForecastError::Validation(ValidationError::DuplicateHorizon(5)));
}

#[test]
fn test_gbm_constant_series_collapses_to_last_price() {
    let config = SimulationConfig::builder()
        .method(EstimationMethod::Gbm)
        .seed(3)
        .build()
        .unwrap();
    let request = ForecastRequest::new(vec![100.0; 40], vec![10]);
    let result = forecast(&request, &config).unwrap();

    let calibration = result.calibration.unwrap();
    assert_eq!(calibration.mu, 0.0);
    assert_eq!(calibration.sigma, 0.0);

    let h = &result.horizons[0];
    assert_relative_eq!(h.band.lower(), 100.0, epsilon = 1e-12);
    assert_relative_eq!(h.band.upper(), 100.0, epsilon = 1e-12);
    assert_eq!(h.paths, 2000);
}

#[test]
fn test_gbm_diagnostics_report_skipped_steps() {
    // Each log-return is ln(1e300), so every step overflows and is held.
    let config = SimulationConfig::builder()
        .simulations(500)
        .method(EstimationMethod::Gbm)
        .seed(4)
        .build()
        .unwrap();
    let request = ForecastRequest::new(vec![1e-300, 1.0, 1e300], vec![4]);
    let result = forecast(&request, &config).unwrap();

    assert_eq!(result.diagnostics.skipped_steps, 500 * 4);
    assert_eq!(result.diagnostics.discarded_paths, 0);
    assert_eq!(result.diagnostics.dropped_returns, 0);
    assert!(result.diagnostics.any());

    let h = &result.horizons[0];
    assert_eq!(h.paths, 500);
    assert_relative_eq!(h.band.lower(), 1e300, max_relative = 1e-12);
    assert_relative_eq!(h.band.upper(), 1e300, max_relative = 1e-12);
    assert_eq!(h.probability_of_rise, 0.0);
}

#[test]
fn test_gbm_band_brackets_last_price() {
    let config = SimulationConfig::builder()
        .method(EstimationMethod::Gbm)
        .seed(8)
        .build()
        .unwrap();
    let closes = drifting_closes(130);
    let last = *closes.last().unwrap();
    let request = ForecastRequest::new(closes, vec![20]).with_target(20, last);
    let result = forecast(&request, &config).unwrap();

    let h = &result.horizons[0];
    assert!(matches!(h.band, PriceBand::PathExtrema { .. }));
    assert!(h.band.lower() <= last && last <= h.band.upper());
    let p = h.prob_above_target.unwrap();
    assert!((0.0..=1.0).contains(&p));
}

#[test]
fn test_same_seed_reproduces_sequential_and_parallel() {
    let closes = drifting_closes(150);
    let request = ForecastRequest::new(closes, vec![5, 20]);

    let build = |parallel: bool| {
        SimulationConfig::builder()
            .simulations(1_500)
            .seed(2024)
            .parallel(parallel)
            .build()
            .unwrap()
    };

    let sequential = forecast(&request, &build(false)).unwrap();
    let parallel = forecast(&request, &build(true)).unwrap();
    let again = forecast(&request, &build(true)).unwrap();

    assert_eq!(sequential.horizons, parallel.horizons);
    assert_eq!(parallel.horizons, again.horizons);
    assert_eq!(sequential.seed, 2024);
}

#[test]
fn test_different_seeds_differ() {
    let request = ForecastRequest::new(drifting_closes(130), vec![20]);
    let a = forecast(&request, &bootstrap_config(1)).unwrap();
    let b = forecast(&request, &bootstrap_config(2)).unwrap();

    assert_ne!(a.horizons[0].band, b.horizons[0].band);
}

#[test]
fn test_unseeded_run_reports_replayable_seed() {
    let request = ForecastRequest::new(drifting_closes(130), vec![5]);
    let config = SimulationConfig::builder().simulations(500).build().unwrap();
    let first = forecast(&request, &config).unwrap();

    let replay_config = SimulationConfig::builder()
        .simulations(500)
        .seed(first.seed)
        .build()
        .unwrap();
    let replay = forecast(&request, &replay_config).unwrap();

    assert_eq!(first.horizons, replay.horizons);
}

#[test]
fn test_dropped_returns_counted() {
    // 140 closes; three isolated corrupt values each kill two adjacent pairs.
    let mut closes = drifting_closes(140);
    closes[10] = f64::NAN;
    closes[50] = 0.0;
    closes[90] = -3.0;

    let result = forecast(&ForecastRequest::new(closes, vec![5]), &bootstrap_config(5)).unwrap();
    assert_eq!(result.diagnostics.dropped_returns, 6);
    assert!(result.diagnostics.any());
}

#[test]
fn test_cancelled_run() {
    let token = CancellationToken::new();
    token.cancel();

    let engine = ForecastEngine::new(bootstrap_config(9));
    let request = ForecastRequest::new(drifting_closes(130), vec![5, 20]);
    let err = engine.run_cancellable(&request, &token).unwrap_err();

    assert_eq!(err, ForecastError::Cancelled);
    assert_eq!(err.kind(), ErrorKind::Cancelled);
}

#[test]
fn test_uncancelled_token_runs_to_completion() {
    let token = CancellationToken::new();
    let engine = ForecastEngine::new(bootstrap_config(9));
    let request = ForecastRequest::new(drifting_closes(130), vec![5]);

    assert!(engine.run_cancellable(&request, &token).is_ok());
}

#[test]
fn test_target_probability() {
    let closes = drifting_closes(130);
    let last = *closes.last().unwrap();
    let request = ForecastRequest::new(closes, vec![20])
        .with_target(20, last * 0.5)
        .with_target(20, last * 10.0);
    let result = forecast(&request, &bootstrap_config(4)).unwrap();

    // The later target replaces the earlier one.
    assert_eq!(result.horizons[0].prob_above_target, Some(0.0));
}

#[cfg(feature = "serde")]
#[test]
fn test_result_serialises_camel_case() {
    let request = ForecastRequest::new(drifting_closes(130), vec![5]).with_target(5, 100.0);
    let result = forecast(&request, &bootstrap_config(6)).unwrap();
    let json = serde_json::to_value(&result).unwrap();

    assert_eq!(json["method"], "block-bootstrap");
    assert_eq!(json["blockSize"], 5);
    assert_eq!(json["seed"], 6);
    assert!(json["lastPrice"].is_number());
    assert!(json["asOf"].is_string());
    assert!(json.get("calibration").is_none());
    assert_eq!(json["horizons"][0]["horizonDays"], 5);
    assert!(json["horizons"][0]["probAboveTarget"].is_number());
    assert_eq!(json["diagnostics"]["droppedReturns"], 0);
}
