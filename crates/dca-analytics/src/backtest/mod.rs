//! 백테스팅 모듈
//!
//! 과거 가격 데이터로 일시투자와 적립투자를 시뮬레이션하고 비교합니다.
//!
//! # 주요 구성요소
//!
//! - [`simulate`]: 전략별 거래 원장 생성
//! - [`valuate`]: 일별 포트폴리오 평가
//! - [`run_comparison`]: 단일 시점 일시투자 vs 적립투자 비교
//! - [`analyze_detailed_scenario`]: 월별 기록과 상세 지표

pub mod comparison;
pub mod detail;
pub mod simulator;
pub mod valuation;

pub use comparison::{
    run_comparison, run_strategy, ComparisonResult, MetricComparison, MetricKind, StrategyRun,
};
pub use detail::{analyze_detailed_scenario, monthly_records, DetailedScenario, MonthlyRecord};
pub use simulator::simulate;
pub use valuation::{drawdown_from_peak, valuate, DailyValuationRecord};
