//! 성과 지표 계산 모듈
//!
//! 일별 평가 레코드를 스칼라 성과 지표로 축약합니다:
//! - CAGR: 연평균 복리 수익률
//! - 최대 낙폭 (MDD): 낙폭 시계열의 최솟값 (0 이하)
//! - 샤프/소르티노 비율: 무위험 수익률 대비 초과 수익 / 변동성
//! - 변동성: 일별 수익률 변화의 연율화 표준편차
//! - 승률: 일별 수익률 변화가 양수인 날의 비율
//!
//! 일별 수익률 계열은 `total_return`의 1차 차분입니다.
//! 연율화에는 달력 기준 연간 일수(365.25)를 사용합니다.
//!
//! [`DetailedMetrics`]는 같은 일별 수익률로 월/연 수익률, VaR, 분포,
//! 낙폭 회복 지표를 추가로 계산합니다.
//!
//! # 퇴화 값 규칙
//!
//! 계산이 정의되지 않는 경우 에러 대신 정해진 값을 반환합니다:
//! - 레코드가 없으면 모든 지표가 0
//! - 변동성이 0이면 샤프 비율 0
//! - 음수 수익일이 없으면 소르티노는 연율화 수익률이 무위험 수익률보다 클 때 `+∞`, 아니면 0

use chrono::{Datelike, NaiveDate};
use dca_core::{Amount, DecimalExt, Price, Quantity, YearMonth};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::stats::{diff, excess_kurtosis, max_consecutive, mean, percentile, sample_std, skewness};
use crate::backtest::DailyValuationRecord;

/// 연율화에 사용하는 연간 일수.
pub const DAYS_PER_YEAR: f64 = 365.25;

/// 기본 무위험 이자율 (연간 2%).
pub const DEFAULT_RISK_FREE_RATE: f64 = 0.02;

/// 한 전략 실행의 성과 지표.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Metrics {
    /// 최종 누적 수익률
    pub final_return: f64,
    /// 연평균 복리 수익률
    pub cagr: f64,
    /// 일별 수익률 변화 평균의 연율화 값
    pub annualized_return: f64,
    /// 최대 낙폭 (0 이하)
    pub mdd: f64,
    pub sharpe_ratio: f64,
    /// 하락일이 없으면 `+∞`일 수 있음
    #[serde(with = "dca_core::types::serde_float")]
    pub sortino_ratio: f64,
    /// 연율화 변동성
    pub volatility: f64,
    /// 일별 수익률 변화가 양수인 날의 비율
    pub win_rate: f64,
    /// 총 투자금
    pub total_invested: Amount,
    /// 최종 평가 금액
    pub final_value: Amount,
    /// 최종 평균 매입 단가
    pub average_price: Price,
    /// 최종 보유 수량
    pub total_shares: Quantity,
    /// 매수 횟수
    pub trade_count: usize,
    /// 측정 구간의 거래일 수
    pub period_days: usize,
    /// `period_days / 365.25`
    pub period_years: f64,
}

impl Metrics {
    /// 평가 레코드로부터 지표를 계산합니다 (무위험 이자율 2%).
    pub fn from_records(records: &[DailyValuationRecord]) -> Self {
        Self::from_records_with_rate(records, DEFAULT_RISK_FREE_RATE)
    }

    /// 무위험 이자율을 지정하여 지표를 계산합니다.
    pub fn from_records_with_rate(records: &[DailyValuationRecord], risk_free_rate: f64) -> Self {
        let Some(last) = records.last() else {
            return Self::default();
        };

        let period_days = records.len();
        let period_years = period_days as f64 / DAYS_PER_YEAR;

        let daily = daily_returns(records);

        let annualized_return = mean(&daily).map(|m| m * DAYS_PER_YEAR).unwrap_or(0.0);
        let volatility = Self::calculate_volatility(&daily);
        let sharpe_ratio = if volatility == 0.0 {
            0.0
        } else {
            (annualized_return - risk_free_rate) / volatility
        };

        Self {
            final_return: last.total_return,
            cagr: Self::calculate_cagr(last.current_value, last.invested_amount, period_years),
            annualized_return,
            mdd: records.iter().map(|r| r.drawdown).fold(0.0, f64::min),
            sharpe_ratio,
            sortino_ratio: Self::calculate_sortino_ratio(&daily, annualized_return, risk_free_rate),
            volatility,
            win_rate: Self::calculate_win_rate(&daily),
            total_invested: last.invested_amount,
            final_value: last.current_value,
            average_price: last.average_price,
            total_shares: last.shares_held,
            trade_count: 0,
            period_days,
            period_years,
        }
    }

    /// 매수 횟수를 설정합니다.
    pub fn with_trade_count(mut self, trade_count: usize) -> Self {
        self.trade_count = trade_count;
        self
    }

    /// CAGR = (최종가치 / 투자금)^(1/년수) - 1
    ///
    /// 년수 또는 투자금이 0 이하이면 0.
    pub fn calculate_cagr(final_value: Amount, total_invested: Amount, years: f64) -> f64 {
        if years <= 0.0 || total_invested <= Decimal::ZERO {
            return 0.0;
        }
        let ratio = final_value.ratio_to(total_invested).unwrap_or(0.0);
        if ratio <= 0.0 {
            return -1.0;
        }
        ratio.powf(1.0 / years) - 1.0
    }

    /// 연율화 변동성 = 표본 표준편차 × √365.25
    pub fn calculate_volatility(daily: &[f64]) -> f64 {
        sample_std(daily)
            .map(|s| s * DAYS_PER_YEAR.sqrt())
            .unwrap_or(0.0)
    }

    /// 소르티노 비율.
    ///
    /// 분모는 음수 일별 수익률만의 표본 표준편차를 연율화한 값입니다.
    pub fn calculate_sortino_ratio(daily: &[f64], annualized_return: f64, risk_free_rate: f64) -> f64 {
        let negatives: Vec<f64> = daily.iter().copied().filter(|r| *r < 0.0).collect();

        if negatives.is_empty() {
            return if annualized_return > risk_free_rate {
                f64::INFINITY
            } else {
                0.0
            };
        }

        let downside = sample_std(&negatives)
            .map(|s| s * DAYS_PER_YEAR.sqrt())
            .unwrap_or(0.0);

        if downside > 0.0 {
            (annualized_return - risk_free_rate) / downside
        } else {
            0.0
        }
    }

    /// 일별 수익률 변화 중 양수 비율.
    pub fn calculate_win_rate(daily: &[f64]) -> f64 {
        if daily.is_empty() {
            return 0.0;
        }
        daily.iter().filter(|r| **r > 0.0).count() as f64 / daily.len() as f64
    }

    /// 성과 요약을 한 줄 문자열로 반환합니다.
    pub fn summary(&self) -> String {
        format!(
            "수익률: {:.2}% | CAGR: {:.2}% | MDD: {:.2}% | 샤프: {:.2} | 변동성: {:.2}% | 최종: {:.0}",
            self.final_return * 100.0,
            self.cagr * 100.0,
            self.mdd * 100.0,
            self.sharpe_ratio,
            self.volatility * 100.0,
            self.final_value,
        )
    }
}

/// 일별 수익률 계열 (`total_return`의 1차 차분).
fn daily_returns(records: &[DailyValuationRecord]) -> Vec<f64> {
    let total_returns: Vec<f64> = records.iter().map(|r| r.total_return).collect();
    diff(&total_returns)
}

/// 낙폭 구간 시작 기준 (-1%).
const DRAWDOWN_EPISODE_THRESHOLD: f64 = -0.01;

/// 월/연 단위 수익률 통계.
///
/// 기간 수익률은 기간 마지막 거래일 평가 금액의 변화율이며,
/// 직전 기간 평가 금액이 0이면 그 기간은 제외됩니다.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct PeriodReturnStats {
    /// 계산에 사용된 기간 수
    pub periods: usize,
    pub mean: f64,
    /// 표본 표준편차
    pub std_dev: f64,
    pub min: f64,
    pub max: f64,
    pub positive: usize,
    pub negative: usize,
    /// 수익률이 양수인 기간의 비율
    pub win_rate: f64,
}

impl PeriodReturnStats {
    fn of(returns: &[f64]) -> Self {
        if returns.is_empty() {
            return Self::default();
        }
        let positive = returns.iter().filter(|r| **r > 0.0).count();
        Self {
            periods: returns.len(),
            mean: mean(returns).unwrap_or(0.0),
            std_dev: sample_std(returns).unwrap_or(0.0),
            min: returns.iter().copied().fold(f64::INFINITY, f64::min),
            max: returns.iter().copied().fold(f64::NEG_INFINITY, f64::max),
            positive,
            negative: returns.iter().filter(|r| **r < 0.0).count(),
            win_rate: positive as f64 / returns.len() as f64,
        }
    }
}

/// 꼬리 위험 지표.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct RiskMetrics {
    /// 일별 수익률의 5 백분위수
    pub var_5: f64,
    /// `var_5` 이하 일별 수익률의 평균
    pub cvar_5: f64,
    pub skewness: f64,
    /// 초과 첨도
    pub kurtosis: f64,
}

/// 일별 수익률 분포 지표.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct DistributionMetrics {
    pub avg_win: f64,
    pub avg_loss: f64,
    /// `|수익 합 / 손실 합|`. 손실일이 없으면 `+∞` (수익일도 없으면 0)
    #[serde(with = "dca_core::types::serde_float")]
    pub profit_factor: f64,
    pub best_day: f64,
    pub worst_day: f64,
    pub max_consecutive_wins: usize,
    pub max_consecutive_losses: usize,
}

/// 낙폭 회복 지표.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct DrawdownMetrics {
    /// 최대 낙폭 (`Metrics::mdd`와 같음)
    pub max_drawdown: f64,
    /// 최대 낙폭이 처음 발생한 날 (낙폭이 없으면 `None`)
    pub max_drawdown_date: Option<NaiveDate>,
    /// 최대 낙폭일부터 고점 회복까지의 달력 일수. 회복하지 못했으면 마지막 날까지
    pub recovery_days: i64,
    pub recovered: bool,
    /// -1% 아래로 내려갔다가 회복한 낙폭 구간 수
    pub drawdown_frequency: usize,
    /// 회복한 낙폭 구간의 평균 달력 일수
    pub avg_drawdown_days: f64,
    /// 마지막 날의 낙폭
    pub current_drawdown: f64,
}

/// 상세 성과 지표.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DetailedMetrics {
    pub monthly: PeriodReturnStats,
    pub yearly: PeriodReturnStats,
    pub risk: RiskMetrics,
    pub distribution: DistributionMetrics,
    pub drawdown: DrawdownMetrics,
}

impl DetailedMetrics {
    /// 평가 레코드로부터 상세 지표를 계산합니다. 레코드가 없으면 모두 0.
    pub fn from_records(records: &[DailyValuationRecord]) -> Self {
        if records.is_empty() {
            return Self::default();
        }
        let daily = daily_returns(records);

        Self {
            monthly: PeriodReturnStats::of(&period_returns(records, YearMonth::from_date)),
            yearly: PeriodReturnStats::of(&period_returns(records, |d| d.year())),
            risk: Self::calculate_risk(&daily),
            distribution: Self::calculate_distribution(&daily),
            drawdown: Self::calculate_drawdown(records),
        }
    }

    pub fn calculate_risk(daily: &[f64]) -> RiskMetrics {
        let Some(var_5) = percentile(daily, 5.0) else {
            return RiskMetrics::default();
        };
        let tail: Vec<f64> = daily.iter().copied().filter(|r| *r <= var_5).collect();

        RiskMetrics {
            var_5,
            cvar_5: mean(&tail).unwrap_or(var_5),
            skewness: skewness(daily),
            kurtosis: excess_kurtosis(daily),
        }
    }

    pub fn calculate_distribution(daily: &[f64]) -> DistributionMetrics {
        let wins: Vec<f64> = daily.iter().copied().filter(|r| *r > 0.0).collect();
        let losses: Vec<f64> = daily.iter().copied().filter(|r| *r < 0.0).collect();

        let loss_sum: f64 = losses.iter().sum();
        let profit_factor = if loss_sum != 0.0 {
            (wins.iter().sum::<f64>() / loss_sum).abs()
        } else if wins.is_empty() {
            0.0
        } else {
            f64::INFINITY
        };

        DistributionMetrics {
            avg_win: mean(&wins).unwrap_or(0.0),
            avg_loss: mean(&losses).unwrap_or(0.0),
            profit_factor,
            best_day: daily.iter().copied().reduce(f64::max).unwrap_or(0.0),
            worst_day: daily.iter().copied().reduce(f64::min).unwrap_or(0.0),
            max_consecutive_wins: max_consecutive(daily, |r| r > 0.0),
            max_consecutive_losses: max_consecutive(daily, |r| r < 0.0),
        }
    }

    pub fn calculate_drawdown(records: &[DailyValuationRecord]) -> DrawdownMetrics {
        let Some(last) = records.last() else {
            return DrawdownMetrics::default();
        };

        let max_drawdown = records.iter().map(|r| r.drawdown).fold(0.0, f64::min);
        let trough = records
            .iter()
            .position(|r| r.drawdown < 0.0 && r.drawdown == max_drawdown);

        let (max_drawdown_date, recovery_days, recovered) = match trough {
            Some(i) => {
                let trough_date = records[i].date;
                match records[i + 1..].iter().find(|r| r.drawdown >= 0.0) {
                    Some(r) => (Some(trough_date), (r.date - trough_date).num_days(), true),
                    None => (Some(trough_date), (last.date - trough_date).num_days(), false),
                }
            }
            None => (None, 0, true),
        };

        let mut episodes: Vec<f64> = Vec::new();
        let mut episode_start: Option<NaiveDate> = None;
        for r in records {
            match episode_start {
                None if r.drawdown < DRAWDOWN_EPISODE_THRESHOLD => episode_start = Some(r.date),
                Some(start) if r.drawdown >= 0.0 => {
                    episodes.push((r.date - start).num_days() as f64);
                    episode_start = None;
                }
                _ => {}
            }
        }

        DrawdownMetrics {
            max_drawdown,
            max_drawdown_date,
            recovery_days,
            recovered,
            drawdown_frequency: episodes.len(),
            avg_drawdown_days: mean(&episodes).unwrap_or(0.0),
            current_drawdown: last.drawdown,
        }
    }
}

/// 기간 키가 바뀌는 지점마다 직전 기간의 마지막 평가 금액을 모아 변화율을 계산합니다.
fn period_returns<K: PartialEq>(
    records: &[DailyValuationRecord],
    key: impl Fn(NaiveDate) -> K,
) -> Vec<f64> {
    let mut closes: Vec<Amount> = Vec::new();
    let mut current: Option<K> = None;

    for r in records {
        let k = key(r.date);
        match closes.last_mut() {
            Some(close) if current.as_ref() == Some(&k) => *close = r.current_value,
            _ => {
                closes.push(r.current_value);
                current = Some(k);
            }
        }
    }

    closes
        .windows(2)
        .filter_map(|w| w[1].ratio_to(w[0]).map(|ratio| ratio - 1.0))
        .collect()
}
