//! 시나리오 단위 결과 타입.

use chrono::NaiveDate;
use dca_core::{
    Amount, DecimalExt, Price, PriceSeries, Quantity, SimError, StrategyKind, YearMonth,
};
use serde::{Deserialize, Serialize};

use crate::backtest::{comparison::pick_winner, ComparisonResult};
use crate::performance::Metrics;

/// 시나리오 진행 상태.
///
/// `Pending → Running → {Succeeded, Failed}` 순서로만 전이합니다.
/// 취소로 시작되지 못한 시나리오는 `Pending`으로 남습니다.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScenarioState {
    Pending,
    Running,
    Succeeded,
    Failed(FailureKind),
}

impl ScenarioState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, ScenarioState::Succeeded | ScenarioState::Failed(_))
    }

    /// 허용되는 전이인지 확인합니다.
    pub fn can_transition_to(&self, next: ScenarioState) -> bool {
        matches!(
            (self, next),
            (ScenarioState::Pending, ScenarioState::Running)
                | (ScenarioState::Running, ScenarioState::Succeeded)
                | (ScenarioState::Running, ScenarioState::Failed(_))
        )
    }
}

/// 시나리오 실패 사유 분류.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    /// 시작 월에 거래일 없음
    NoDataForStartPeriod,
    /// 구간 거래일 수 부족
    InsufficientHistory,
    /// 잘못된 설정 또는 시계열
    InvalidInput,
    /// 워커 태스크 패닉
    WorkerPanicked,
}

impl From<&SimError> for FailureKind {
    fn from(err: &SimError) -> Self {
        match err {
            SimError::NoDataForStartPeriod(_) => FailureKind::NoDataForStartPeriod,
            SimError::InsufficientHistory { .. } => FailureKind::InsufficientHistory,
            SimError::InvalidConfig(_) | SimError::InvalidSeries(_) => FailureKind::InvalidInput,
        }
    }
}

/// 실패한 시나리오.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScenarioFailure {
    pub start: YearMonth,
    pub kind: FailureKind,
    pub message: String,
}

impl ScenarioFailure {
    pub fn from_error(start: YearMonth, err: &SimError) -> Self {
        Self {
            start,
            kind: FailureKind::from(err),
            message: err.to_string(),
        }
    }
}

/// 한 시작 시점에 대한 일시투자 vs 적립투자 결과.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScenarioResult {
    /// 투자 시작 월
    pub start: YearMonth,
    /// 구간 첫 거래일
    pub start_date: NaiveDate,
    /// 구간 마지막 거래일
    pub end_date: NaiveDate,
    /// 구간 거래일 수
    pub trading_days: usize,
    /// 시작 시점 지수 가격
    pub start_price: Price,
    /// 종료 시점 지수 가격
    pub end_price: Price,
    pub lump_sum: Metrics,
    pub dca: Metrics,
    /// DCA 평균 매입 단가
    pub dca_average_price: Price,
    /// DCA 최종 보유 수량
    pub dca_total_shares: Quantity,
    pub winner: StrategyKind,
    /// 일시투자 수익률 - 적립투자 수익률
    pub return_difference: f64,
    /// 일시투자 CAGR - 적립투자 CAGR
    pub cagr_difference: f64,
    /// 일시투자 최종 자산 - 적립투자 최종 자산
    pub value_difference: Amount,
}

impl ScenarioResult {
    /// 측정 구간 시계열과 비교 결과로부터 생성합니다.
    ///
    /// 구간이 비어 있으면 `None` (비교 단계에서 이미 실패했어야 함).
    pub fn from_comparison(window: &PriceSeries, comparison: &ComparisonResult) -> Option<Self> {
        let first = window.first()?;
        let last = window.last()?;
        let lump = &comparison.lump_sum.metrics;
        let dca = &comparison.dca.metrics;

        Some(Self {
            start: comparison.start,
            start_date: first.date,
            end_date: last.date,
            trading_days: window.len(),
            start_price: first.close,
            end_price: last.close,
            dca_average_price: dca.average_price,
            dca_total_shares: dca.total_shares,
            winner: pick_winner(lump.final_return, dca.final_return),
            return_difference: lump.final_return - dca.final_return,
            cagr_difference: lump.cagr - dca.cagr,
            value_difference: lump.final_value - dca.final_value,
            lump_sum: lump.clone(),
            dca: dca.clone(),
        })
    }

    /// 구간 동안의 지수 가격 변화율.
    pub fn index_return(&self) -> f64 {
        (self.end_price - self.start_price)
            .ratio_to(self.start_price)
            .unwrap_or(0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_failure_kind_from_error() {
        let start = YearMonth::new(1990, 1).unwrap();
        let err = SimError::InsufficientHistory {
            start,
            actual: 100,
            required: 1200,
        };
        let failure = ScenarioFailure::from_error(start, &err);

        assert_eq!(failure.kind, FailureKind::InsufficientHistory);
        assert!(failure.message.contains("1200"));
        assert_eq!(
            FailureKind::from(&SimError::NoDataForStartPeriod(start)),
            FailureKind::NoDataForStartPeriod
        );
    }

    #[test]
    fn test_terminal_states() {
        assert!(!ScenarioState::Pending.is_terminal());
        assert!(!ScenarioState::Running.is_terminal());
        assert!(ScenarioState::Succeeded.is_terminal());
        assert!(ScenarioState::Failed(FailureKind::InsufficientHistory).is_terminal());
    }

    #[test]
    fn test_allowed_transitions() {
        use ScenarioState::*;
        let failed = Failed(FailureKind::NoDataForStartPeriod);

        assert!(Pending.can_transition_to(Running));
        assert!(Running.can_transition_to(Succeeded));
        assert!(Running.can_transition_to(failed));
        assert!(!Pending.can_transition_to(Succeeded));
        assert!(!Succeeded.can_transition_to(Running));
        assert!(!failed.can_transition_to(Succeeded));
    }
}
