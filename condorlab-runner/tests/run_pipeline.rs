//! End-to-end pipeline: CSV bars → engine → metrics → exported artifacts.

use std::io::Write;

use chrono::{Duration, NaiveDate};
use condorlab_core::calendar::BlackoutCalendar;
use condorlab_core::config::BacktestConfig;
use condorlab_core::engine::run_backtest;
use condorlab_runner::{
    export_run, load_bars_csv, load_blackout_dates, RunConfig, SummaryMetrics,
};

/// A config with short windows and wide thresholds so a 100-bar synthetic
/// series produces trades.
fn admitting_config() -> BacktestConfig {
    BacktestConfig {
        band_window: 5,
        rsi_period: 3,
        adx_period: 3,
        hv_window: 5,
        vwap_sma_window: 5,
        tightening_window: 5,
        hv_min: 0.0,
        hv_max: 10_000.0,
        ..Default::default()
    }
}

fn write_bars_csv(n: usize) -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "timestamp,open,high,low,close,vwap,volume").unwrap();
    let base = NaiveDate::from_ymd_opt(2024, 1, 2).unwrap();
    for i in 0..n {
        let date = base + Duration::days(i as i64);
        let close = if i % 2 == 0 { 100.0 } else { 104.0 };
        writeln!(
            file,
            "{date},{:.2},{:.2},{:.2},{close:.2},{:.4},1000000",
            close - 0.1,
            close + 0.2,
            close - 0.2,
            (close + 0.2 + close - 0.2 + close) / 3.0,
        )
        .unwrap();
    }
    file.flush().unwrap();
    file
}

#[test]
fn csv_to_artifacts_round_trip() {
    let bars_file = write_bars_csv(100);
    let series = load_bars_csv(bars_file.path()).unwrap();
    assert_eq!(series.bars().len(), 100);

    let run_config = RunConfig {
        symbol: "SPY".into(),
        blackout_dates: Vec::new(),
        backtest: admitting_config(),
    };
    let calendar = BlackoutCalendar::empty();
    let result = run_backtest(&series, &calendar, &run_config.backtest, None).unwrap();
    assert!(result.has_trades(), "quiet series should trade");

    let out_dir = tempfile::tempdir().unwrap();
    let run_id = export_run(&run_config, &result, out_dir.path()).unwrap();
    assert_eq!(run_id, run_config.run_id());

    for name in ["trades.csv", "equity.csv", "rejections.csv", "summary.json"] {
        let path = out_dir.path().join(name);
        assert!(path.exists(), "missing artifact {name}");
    }

    // summary.json carries the run id and a consistent trade count.
    let summary: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(out_dir.path().join("summary.json")).unwrap())
            .unwrap();
    assert_eq!(summary["run_id"], run_id.as_str());
    assert_eq!(
        summary["metrics"]["total_trades"].as_u64().unwrap() as usize,
        result.trades.len()
    );

    // trades.csv has one row per trade plus a header.
    let trades_csv = std::fs::read_to_string(out_dir.path().join("trades.csv")).unwrap();
    assert_eq!(trades_csv.lines().count(), result.trades.len() + 1);

    // equity.csv has one row per bar plus a header.
    let equity_csv = std::fs::read_to_string(out_dir.path().join("equity.csv")).unwrap();
    assert_eq!(equity_csv.lines().count(), 101);
}

#[test]
fn blackout_dates_flow_through_the_run() {
    let bars_file = write_bars_csv(100);
    let series = load_bars_csv(bars_file.path()).unwrap();

    let mut blackout_file = tempfile::NamedTempFile::new().unwrap();
    // Blanket the whole series so every otherwise-eligible bar is blacked out.
    let base = NaiveDate::from_ymd_opt(2024, 1, 2).unwrap();
    for i in (0..100).step_by(7) {
        writeln!(blackout_file, "{}", base + Duration::days(i)).unwrap();
    }
    blackout_file.flush().unwrap();

    let dates = load_blackout_dates(blackout_file.path()).unwrap();
    let config = admitting_config();
    let open = run_backtest(&series, &BlackoutCalendar::empty(), &config, None).unwrap();
    let blocked = run_backtest(&series, &BlackoutCalendar::new(dates), &config, None).unwrap();

    // 7-day spacing with the default ±(7,1) window covers every bar.
    assert!(open.has_trades());
    assert!(!blocked.has_trades());
    assert!(blocked
        .rejections
        .iter()
        .any(|r| r.reason == condorlab_core::filter::RejectReason::Blackout));
}

#[test]
fn metrics_sentinels_on_zero_eligible_run() {
    let bars_file = write_bars_csv(60);
    let series = load_bars_csv(bars_file.path()).unwrap();
    let config = BacktestConfig {
        hv_min: 5_000.0, // nothing qualifies
        hv_max: 10_000.0,
        ..admitting_config()
    };

    let result = run_backtest(&series, &BlackoutCalendar::empty(), &config, None).unwrap();
    assert!(!result.has_trades());

    let metrics = SummaryMetrics::compute(&result);
    assert_eq!(metrics.total_trades, 0);
    assert_eq!(metrics.profit_factor, 0.0);
    assert_eq!(metrics.win_rate_pct, 0.0);
    assert_eq!(metrics.max_drawdown, 0.0);
    assert_eq!(metrics.return_on_risk_pct, 0.0);
    assert_eq!(metrics.final_equity, config.initial_capital);
}

#[test]
fn all_winning_run_reports_infinite_profit_factor() {
    let bars_file = write_bars_csv(100);
    let series = load_bars_csv(bars_file.path()).unwrap();
    let result = run_backtest(
        &series,
        &BlackoutCalendar::empty(),
        &admitting_config(),
        None,
    )
    .unwrap();

    // The quiet series never leaves the band, so every trade keeps its credit.
    assert!(result.has_trades());
    assert!(result.trades.iter().all(|t| t.pnl > 0.0));
    let metrics = SummaryMetrics::compute(&result);
    assert_eq!(metrics.profit_factor, f64::INFINITY);
    assert_eq!(metrics.losses, 0);
}
