//! 롤링 시나리오 분석.
//!
//! - [`analyzer`]: 시작 월 스윕 실행 (순차/병렬, 취소 지원)
//! - [`scenario`]: 시나리오 단위 결과와 상태
//! - [`progress`]: 시나리오 상태 전이 추적
//! - [`aggregate`]: 성공 시나리오 집계
//! - [`report`]: 스윕 리포트

pub mod aggregate;
pub mod analyzer;
pub mod progress;
pub mod report;
pub mod scenario;

pub use aggregate::{
    aggregate, BestWorstScenarios, Percentiles, ReturnDistribution, ScenarioExtreme,
    SummaryStatistics, WinCounts,
};
pub use analyzer::RollingAnalyzer;
pub use progress::{ProgressCounts, SweepProgress};
pub use report::SweepReport;
pub use scenario::{FailureKind, ScenarioFailure, ScenarioResult, ScenarioState};
