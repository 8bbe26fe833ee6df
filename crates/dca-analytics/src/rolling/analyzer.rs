//! 롤링 시나리오 분석기.
//!
//! 스윕 범위의 매월을 시작 시점으로 일시투자와 적립투자를 비교합니다.
//! 각 시나리오는 독립적이며 실패해도 스윕 전체는 계속 진행됩니다.
//!
//! # 실행 방식
//!
//! - [`RollingAnalyzer::run`]: 현재 스레드에서 순차 실행
//! - [`RollingAnalyzer::run_concurrent`]: `spawn_blocking` 워커에서 병렬 실행.
//!   결과는 시작 월 순으로 다시 정렬되므로 순차 실행과 같습니다.
//!
//! # 취소
//!
//! `CancellationToken`이 취소되면 새 시나리오를 시작하지 않습니다.
//! 이미 실행 중인 시나리오는 끝까지 실행되고, 시작되지 못한 시나리오는
//! 리포트의 `not_run`에 기록됩니다.
//!
//! # 진행 상태
//!
//! `*_with_progress` 변형은 [`SweepProgress`]에 시나리오별 상태 전이
//! (`Pending → Running → Succeeded/Failed`)를 기록합니다. 시작되지 못한 시나리오는 `Pending`에 남습니다.

use std::sync::Arc;

use dca_core::{PriceSeries, ScenarioConfig, SimError, SimResult, StrategyKind, YearMonth};
use futures::stream::{self, StreamExt};
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn, Instrument};

use super::progress::SweepProgress;
use super::report::{ScenarioOutcome, SweepReport};
use super::scenario::{FailureKind, ScenarioFailure, ScenarioResult, ScenarioState};
use crate::backtest::comparison::compare_in_window;

/// 롤링 시나리오 분석기.
#[derive(Debug, Clone)]
pub struct RollingAnalyzer {
    config: ScenarioConfig,
}

impl RollingAnalyzer {
    pub fn new(config: ScenarioConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ScenarioConfig {
        &self.config
    }

    /// 한 시작 월에 대한 시나리오를 실행합니다.
    ///
    /// # Errors
    ///
    /// - 구간 거래일 수가 `min_trading_days_per_year × horizon_years` 미만이면 `InsufficientHistory`
    /// - 시작 월에 거래일이 없으면 `NoDataForStartPeriod`
    pub fn run_scenario(&self, series: &PriceSeries, start: YearMonth) -> SimResult<ScenarioResult> {
        let config = self.config.investment_config_for(start, StrategyKind::LumpSum)?;
        let (window_start, window_end) = config.window();
        let window = series.slice(window_start, window_end);

        let required = self.config.min_trading_days();
        if window.len() < required {
            return Err(SimError::InsufficientHistory {
                start,
                actual: window.len(),
                required,
            });
        }

        let comparison = compare_in_window(&window, &config)?;
        ScenarioResult::from_comparison(&window, &comparison)
            .ok_or(SimError::NoDataForStartPeriod(start))
    }

    /// 모든 시나리오를 순차 실행합니다.
    pub fn run(&self, series: &PriceSeries) -> SweepReport {
        self.run_with_cancel(series, &CancellationToken::new())
    }

    /// 모든 시나리오를 순차 실행하되 취소 토큰을 확인합니다.
    pub fn run_with_cancel(&self, series: &PriceSeries, cancel: &CancellationToken) -> SweepReport {
        self.run_with_progress(series, cancel, &SweepProgress::new())
    }

    /// 순차 실행하며 상태 전이를 `progress`에 기록합니다.
    pub fn run_with_progress(
        &self,
        series: &PriceSeries,
        cancel: &CancellationToken,
        progress: &SweepProgress,
    ) -> SweepReport {
        let starts = self.config.start_months();
        progress.register(&starts);

        let outcomes = starts
            .into_iter()
            .map(|start| {
                if cancel.is_cancelled() {
                    (start, ScenarioOutcome::NotRun)
                } else {
                    (start, self.execute(series, start, progress))
                }
            })
            .collect();

        self.finish(outcomes)
    }

    /// 시나리오를 blocking 워커 풀에서 병렬 실행합니다.
    ///
    /// `parallelism`은 동시에 실행되는 시나리오 수의 상한입니다 (최소 1).
    pub async fn run_concurrent(
        &self,
        series: Arc<PriceSeries>,
        parallelism: usize,
        cancel: CancellationToken,
    ) -> SweepReport {
        self.run_concurrent_with_progress(series, parallelism, cancel, SweepProgress::new())
            .await
    }

    /// 병렬 실행하며 상태 전이를 `progress`에 기록합니다.
    pub async fn run_concurrent_with_progress(
        &self,
        series: Arc<PriceSeries>,
        parallelism: usize,
        cancel: CancellationToken,
        progress: SweepProgress,
    ) -> SweepReport {
        let parallelism = parallelism.max(1);
        let starts = self.config.start_months();
        progress.register(&starts);

        debug!(
            scenarios = starts.len(),
            parallelism = parallelism,
            "롤링 분석 병렬 실행 시작"
        );

        let tasks = starts.into_iter().map(|start| {
            let analyzer = self.clone();
            let series = Arc::clone(&series);
            let cancel = cancel.clone();
            let progress = progress.clone();

            async move {
                if cancel.is_cancelled() {
                    return (start, ScenarioOutcome::NotRun);
                }

                let worker_progress = progress.clone();
                let outcome = tokio::task::spawn_blocking(move || {
                    analyzer.execute(&series, start, &worker_progress)
                })
                .await;

                match outcome {
                    Ok(outcome) => (start, outcome),
                    Err(e) => {
                        warn!(start = %start, error = %e, "시나리오 워커 실패");
                        let kind = FailureKind::WorkerPanicked;
                        progress.transition(start, ScenarioState::Failed(kind));
                        let failure = ScenarioFailure {
                            start,
                            kind,
                            message: format!("시나리오 태스크 실행 실패: {}", e),
                        };
                        (start, ScenarioOutcome::Failed(failure))
                    }
                }
            }
        });

        let outcomes: Vec<(YearMonth, ScenarioOutcome)> = stream::iter(tasks)
            .buffer_unordered(parallelism)
            .collect()
            .instrument(tracing::debug_span!("rolling_sweep"))
            .await;

        self.finish(outcomes)
    }

    /// 시나리오 하나를 실행하고 결과를 분류합니다.
    fn execute(
        &self,
        series: &PriceSeries,
        start: YearMonth,
        progress: &SweepProgress,
    ) -> ScenarioOutcome {
        let _span = dca_core::scenario_span!("scenario", start).entered();
        progress.transition(start, ScenarioState::Running);

        match self.run_scenario(series, start) {
            Ok(result) => {
                debug!(
                    winner = %result.winner,
                    return_difference = result.return_difference,
                    "시나리오 성공"
                );
                progress.transition(start, ScenarioState::Succeeded);
                ScenarioOutcome::Succeeded(Box::new(result))
            }
            Err(e) => {
                let failure = ScenarioFailure::from_error(start, &e);
                if e.is_scenario_failure() {
                    debug!(reason = %e, "시나리오 실패");
                } else {
                    warn!(reason = %e, "시나리오 실패");
                }
                progress.transition(start, ScenarioState::Failed(failure.kind));
                ScenarioOutcome::Failed(failure)
            }
        }
    }

    fn finish(&self, outcomes: Vec<(YearMonth, ScenarioOutcome)>) -> SweepReport {
        let report = SweepReport::from_outcomes(self.config.clone(), outcomes);
        report.log_summary();
        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Days, NaiveDate};
    use dca_core::PriceBar;
    use rust_decimal::Decimal;

    /// 매일 거래되는 상승 시계열.
    fn daily_series(from: NaiveDate, days: u64) -> PriceSeries {
        PriceSeries::new(
            (0..days)
                .map(|i| PriceBar::from_close(from + Days::new(i), Decimal::from(100 + i)))
                .collect(),
        )
        .unwrap()
    }

    fn ym(year: i32, month: u32) -> YearMonth {
        YearMonth::new(year, month).unwrap()
    }

    fn analyzer(from: YearMonth, to: YearMonth) -> RollingAnalyzer {
        let config = ScenarioConfig::builder(from, to)
            .with_total_amount(Decimal::from(1200))
            .with_dca_installment_months(6)
            .with_horizon_years(1)
            .build()
            .unwrap();
        RollingAnalyzer::new(config)
    }

    #[test]
    fn test_insufficient_history_fails_only_that_scenario() {
        // 2000-01-01 ~ 2001-06-29 (546일)
        let series = daily_series(NaiveDate::from_ymd_opt(2000, 1, 1).unwrap(), 546);
        let report = analyzer(ym(2000, 1), ym(2001, 6)).run(&series);

        // 2001-04, 2001-05 시작 구간은 거래일이 120일 미만
        assert_eq!(report.attempted, 17);
        assert_eq!(report.success_count(), 15);
        assert_eq!(report.failure_count(), 2);
        assert!(report
            .failures
            .iter()
            .all(|f| f.kind == FailureKind::InsufficientHistory));
        assert_eq!(report.failures[0].start, ym(2001, 4));
        assert!(report.is_complete());
    }

    #[test]
    fn test_cancelled_sequential_run_reports_not_run() {
        let series = daily_series(NaiveDate::from_ymd_opt(2000, 1, 1).unwrap(), 800);
        let cancel = CancellationToken::new();
        cancel.cancel();

        let report = analyzer(ym(2000, 1), ym(2000, 4)).run_with_cancel(&series, &cancel);
        assert_eq!(report.not_run, vec![ym(2000, 1), ym(2000, 2), ym(2000, 3)]);
        assert_eq!(report.state_of(ym(2000, 2)), Some(ScenarioState::Pending));
        assert_eq!(report.summary.scenario_count, 0);
    }

    #[test]
    fn test_progress_records_observed_states() {
        let series = daily_series(NaiveDate::from_ymd_opt(2000, 1, 1).unwrap(), 546);
        let progress = SweepProgress::new();
        let report = analyzer(ym(2000, 1), ym(2001, 6)).run_with_progress(
            &series,
            &CancellationToken::new(),
            &progress,
        );

        assert_eq!(
            progress.history(ym(2000, 1)),
            vec![
                ScenarioState::Pending,
                ScenarioState::Running,
                ScenarioState::Succeeded
            ]
        );
        assert_eq!(
            progress.history(ym(2001, 4)),
            vec![
                ScenarioState::Pending,
                ScenarioState::Running,
                ScenarioState::Failed(FailureKind::InsufficientHistory)
            ]
        );

        let counts = progress.counts();
        assert_eq!(counts.succeeded, report.success_count());
        assert_eq!(counts.failed, report.failure_count());
        assert_eq!(counts.running, 0);
        assert_eq!(counts.pending, 0);
    }

    #[test]
    fn test_cancelled_scenarios_never_leave_pending() {
        let series = daily_series(NaiveDate::from_ymd_opt(2000, 1, 1).unwrap(), 800);
        let cancel = CancellationToken::new();
        cancel.cancel();
        let progress = SweepProgress::new();

        analyzer(ym(2000, 1), ym(2000, 4)).run_with_progress(&series, &cancel, &progress);
        assert_eq!(progress.history(ym(2000, 1)), vec![ScenarioState::Pending]);
        assert_eq!(progress.counts().pending, 3);
    }

    #[test]
    fn test_missing_start_month_is_failure() {
        let mut bars: Vec<PriceBar> = daily_series(NaiveDate::from_ymd_opt(2000, 1, 1).unwrap(), 800)
            .bars()
            .to_vec();
        bars.retain(|b| !ym(2000, 2).contains(b.date));
        let series = PriceSeries::new(bars).unwrap();

        let report = analyzer(ym(2000, 1), ym(2000, 4)).run(&series);
        assert_eq!(report.success_count(), 2);
        assert_eq!(
            report.state_of(ym(2000, 2)),
            Some(ScenarioState::Failed(FailureKind::NoDataForStartPeriod))
        );
    }
}
