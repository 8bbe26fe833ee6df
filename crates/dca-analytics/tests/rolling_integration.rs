//! 롤링 분석 통합 테스트.

use std::sync::Arc;

use chrono::{Days, NaiveDate};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use tokio_util::sync::CancellationToken;

use dca_analytics::{aggregate, RollingAnalyzer, ScenarioResult, ScenarioState, SweepProgress};
use dca_core::{PriceBar, PriceSeries, ScenarioConfig, YearMonth};

/// 2000-01-01부터 3년간 매일 거래되는 톱니형 상승 시계열.
fn sawtooth_series() -> PriceSeries {
    let start = NaiveDate::from_ymd_opt(2000, 1, 1).unwrap();
    PriceSeries::new(
        (0..1100u64)
            .map(|i| {
                let close = Decimal::from(1000 + (i % 97) * 3 + i / 2);
                PriceBar::from_close(start + Days::new(i), close)
            })
            .collect(),
    )
    .unwrap()
}

/// 매일 오르기만 하는 시계열.
fn rising_series() -> PriceSeries {
    let start = NaiveDate::from_ymd_opt(2000, 1, 1).unwrap();
    PriceSeries::new(
        (0..800u64)
            .map(|i| PriceBar::from_close(start + Days::new(i), Decimal::from(1000 + i * 2)))
            .collect(),
    )
    .unwrap()
}

fn two_year_sweep() -> RollingAnalyzer {
    let config = ScenarioConfig::builder(
        YearMonth::new(2000, 1).unwrap(),
        YearMonth::new(2002, 1).unwrap(),
    )
    .with_total_amount(dec!(1000000))
    .with_dca_installment_months(6)
    .with_horizon_years(1)
    .build()
    .unwrap();
    RollingAnalyzer::new(config)
}

#[test]
fn test_sweep_win_counts_cover_all_successes() {
    let report = two_year_sweep().run(&sawtooth_series());

    assert_eq!(report.attempted, 24);
    assert_eq!(report.success_count(), 24);
    assert_eq!(report.summary.scenario_count, 24);
    assert_eq!(report.summary.win_counts.total(), report.success_count());
    assert!((report.summary.lump_sum_win_rate + report.summary.dca_win_rate - 1.0).abs() < 1e-12);

    // 결과는 시작 월 순
    let starts: Vec<YearMonth> = report.results.iter().map(|r| r.start).collect();
    let mut sorted = starts.clone();
    sorted.sort();
    assert_eq!(starts, sorted);

    let p = report.summary.lump_sum.percentiles;
    assert!(p.p5 <= p.p25 && p.p25 <= p.p50 && p.p50 <= p.p75 && p.p75 <= p.p95);
    assert!(report.summary.lump_sum.min <= p.p5 && p.p95 <= report.summary.lump_sum.max);
}

#[tokio::test]
async fn test_concurrent_run_matches_sequential() {
    let series = Arc::new(sawtooth_series());
    let analyzer = two_year_sweep();

    let sequential = analyzer.run(&series);
    let concurrent = analyzer
        .run_concurrent(Arc::clone(&series), 4, CancellationToken::new())
        .await;

    assert_eq!(concurrent, sequential);
}

#[tokio::test]
async fn test_cancelled_sweep_leaves_scenarios_not_run() {
    let cancel = CancellationToken::new();
    cancel.cancel();

    let report = two_year_sweep()
        .run_concurrent(Arc::new(sawtooth_series()), 2, cancel)
        .await;

    assert_eq!(report.attempted, 24);
    assert_eq!(report.not_run_count(), 24);
    assert!(!report.is_complete());
    assert_eq!(
        report.state_of(YearMonth::new(2001, 6).unwrap()),
        Some(ScenarioState::Pending)
    );
    assert_eq!(report.summary.scenario_count, 0);
    assert!(report.summary.extremes.best_dca.is_none());
}

#[tokio::test]
async fn test_concurrent_progress_matches_report() {
    let progress = SweepProgress::new();
    let report = two_year_sweep()
        .run_concurrent_with_progress(
            Arc::new(sawtooth_series()),
            4,
            CancellationToken::new(),
            progress.clone(),
        )
        .await;

    let counts = progress.counts();
    assert_eq!(counts.total(), report.attempted);
    assert_eq!(counts.succeeded, report.success_count());
    assert_eq!(counts.running, 0);
    assert_eq!(
        progress.history(YearMonth::new(2001, 6).unwrap()),
        vec![
            ScenarioState::Pending,
            ScenarioState::Running,
            ScenarioState::Succeeded
        ]
    );
}

#[test]
fn test_persisted_results_aggregate_after_reload() {
    let config = ScenarioConfig::builder(
        YearMonth::new(2000, 1).unwrap(),
        YearMonth::new(2000, 6).unwrap(),
    )
    .with_total_amount(dec!(1000000))
    .with_dca_installment_months(3)
    .with_horizon_years(1)
    .build()
    .unwrap();
    let report = RollingAnalyzer::new(config).run(&rising_series());
    assert_eq!(report.success_count(), 5);

    // 매일 오르면 일시투자의 하방 변동성이 없음
    assert!(report
        .results
        .iter()
        .all(|r| r.lump_sum.sortino_ratio == f64::INFINITY));

    let json = serde_json::to_string(&report.results).unwrap();
    assert!(json.contains(r#""sortino_ratio":"inf""#));

    let reloaded: Vec<ScenarioResult> = serde_json::from_str(&json).unwrap();
    assert!(reloaded
        .iter()
        .all(|r| r.lump_sum.sortino_ratio == f64::INFINITY));

    let summary = aggregate(&reloaded);
    assert_eq!(summary.scenario_count, report.summary.scenario_count);
    assert_eq!(summary.win_counts, report.summary.win_counts);
    assert!((summary.lump_sum.mean - report.summary.lump_sum.mean).abs() < 1e-12);
    assert!((summary.dca.mean - report.summary.dca.mean).abs() < 1e-12);
    assert!(
        (summary.return_difference.percentiles.p50 - report.summary.return_difference.percentiles.p50)
            .abs()
            < 1e-12
    );
}
