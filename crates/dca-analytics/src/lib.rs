//! 분석 및 백테스팅 엔진.
//!
//! 이 크레이트는 다음을 제공합니다:
//! - 일시투자/적립투자 시뮬레이션과 일별 평가
//! - 성과 지표 계산 (CAGR, MDD, 샤프, 소르티노, 변동성, 승률)
//! - 단일 시점 전략 비교와 월별 상세 분석
//! - 시작 월 롤링 스윕과 집계
//!
//! # Re-exports
//!
//! - [`backtest`]: 시뮬레이션, 평가, 비교 (ComparisonResult, StrategyRun 등)
//! - [`performance`]: 성과 지표 계산 (Metrics 등)
//! - [`rolling`]: 롤링 분석 (RollingAnalyzer, SweepProgress, SweepReport, SummaryStatistics 등)

pub mod backtest;
pub mod performance;
pub mod rolling;

// Backtest 모듈 re-exports
pub use backtest::{
    analyze_detailed_scenario, drawdown_from_peak, monthly_records, run_comparison, run_strategy,
    simulate, valuate, ComparisonResult, DailyValuationRecord, DetailedScenario, MetricComparison,
    MetricKind, MonthlyRecord, StrategyRun,
};

// Performance 모듈 re-exports
pub use performance::metrics::{
    DetailedMetrics, DistributionMetrics, DrawdownMetrics, Metrics, PeriodReturnStats,
    RiskMetrics, DAYS_PER_YEAR, DEFAULT_RISK_FREE_RATE,
};

// Rolling 모듈 re-exports
pub use rolling::{
    aggregate, BestWorstScenarios, FailureKind, Percentiles, ProgressCounts,
    ReturnDistribution, RollingAnalyzer, ScenarioExtreme, ScenarioFailure, ScenarioResult,
    ScenarioState, SummaryStatistics, SweepProgress, SweepReport, WinCounts,
};
