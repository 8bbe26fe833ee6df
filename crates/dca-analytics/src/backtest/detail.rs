//! 단일 시나리오 상세 분석.
//!
//! 비교 결과를 월 단위 표로 펼치고 두 전략의 상세 지표와 지표별 비교를 함께 제공합니다.
//! 월별 행은 각 월 첫 거래일의 평가 레코드에서 만듭니다.
//!
//! # 월별 낙폭
//!
//! 평가 금액의 고점 대비 하락률입니다. 일시투자의 고점은 총 투자금에서 시작하고,
//! 적립투자의 고점은 평가 금액이 생긴 뒤부터 추적합니다.

use chrono::NaiveDate;
use dca_core::{
    format_ratio_pct, Amount, DecimalExt, InvestmentConfig, Price, PriceSeries, Quantity,
    SimResult, YearMonth,
};
use rust_decimal::Decimal;
use serde::Serialize;

use super::comparison::{run_comparison, ComparisonResult, MetricComparison};
use crate::performance::DetailedMetrics;

/// 월별 투자 진행 기록.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthlyRecord {
    /// 시작 후 경과 월수 (0부터)
    pub month_num: u32,
    pub month: YearMonth,
    /// 해당 월 첫 거래일
    pub date: NaiveDate,
    pub index_price: Price,

    pub lump_sum_value: Amount,
    /// 전월 대비 수익률
    pub lump_sum_return: f64,
    pub lump_sum_cumulative_return: f64,
    /// 평가 금액 고점 대비 현재 낙폭
    pub lump_sum_drawdown: f64,
    /// 현재까지의 최대 낙폭
    pub lump_sum_mdd: f64,

    /// 이번 달 투자 금액
    pub dca_investment: Amount,
    pub dca_shares_bought: Quantity,
    pub dca_total_shares: Quantity,
    pub dca_total_invested: Amount,
    pub dca_average_price: Price,
    pub dca_value: Amount,
    pub dca_return: f64,
    pub dca_cumulative_return: f64,
    pub dca_drawdown: f64,
    pub dca_mdd: f64,
}

/// 평가 금액 기준 고점/낙폭 추적기.
#[derive(Debug, Clone, Copy)]
struct ValueDrawdown {
    peak: Amount,
    mdd: f64,
}

impl ValueDrawdown {
    fn starting_at(peak: Amount) -> Self {
        Self { peak, mdd: 0.0 }
    }

    /// 새 평가 금액을 반영하고 현재 낙폭을 반환합니다. 평가 금액이 0이면 0.
    fn update(&mut self, value: Amount) -> f64 {
        if value <= Decimal::ZERO {
            return 0.0;
        }
        self.peak = self.peak.max(value);
        let drawdown = value.ratio_to(self.peak).map(|r| r - 1.0).unwrap_or(0.0);
        self.mdd = self.mdd.min(drawdown);
        drawdown
    }
}

/// 전월 대비 수익률. 전월 평가 금액이 0이면 0.
fn month_over_month(value: Amount, previous: Option<Amount>) -> f64 {
    previous
        .and_then(|prev| value.ratio_to(prev))
        .map(|r| r - 1.0)
        .unwrap_or(0.0)
}

/// 비교 결과를 월별 기록으로 펼칩니다.
pub fn monthly_records(comparison: &ComparisonResult) -> Vec<MonthlyRecord> {
    let lump_records = &comparison.lump_sum.records;
    let dca_records = &comparison.dca.records;
    let dca_trades = comparison.dca.ledger.trades();

    let mut lump_dd = ValueDrawdown::starting_at(comparison.lump_sum.ledger.total_invested());
    let mut dca_dd = ValueDrawdown::starting_at(Decimal::ZERO);
    let mut previous: Option<(Amount, Amount)> = None;
    let mut last_month: Option<YearMonth> = None;
    let mut rows = Vec::new();

    for (lump, dca) in lump_records.iter().zip(dca_records) {
        let month = YearMonth::from_date(lump.date);
        if last_month == Some(month) {
            continue;
        }
        last_month = Some(month);

        let (dca_investment, dca_shares_bought) = dca_trades
            .iter()
            .filter(|t| month.contains(t.date()))
            .fold((Decimal::ZERO, Decimal::ZERO), |(amount, shares), t| {
                (amount + t.amount(), shares + t.shares())
            });

        rows.push(MonthlyRecord {
            month_num: rows.len() as u32,
            month,
            date: lump.date,
            index_price: lump.price,
            lump_sum_value: lump.current_value,
            lump_sum_return: month_over_month(lump.current_value, previous.map(|p| p.0)),
            lump_sum_cumulative_return: lump.total_return,
            lump_sum_drawdown: lump_dd.update(lump.current_value),
            lump_sum_mdd: lump_dd.mdd,
            dca_investment,
            dca_shares_bought,
            dca_total_shares: dca.shares_held,
            dca_total_invested: dca.invested_amount,
            dca_average_price: dca.average_price,
            dca_value: dca.current_value,
            dca_return: month_over_month(dca.current_value, previous.map(|p| p.1)),
            dca_cumulative_return: dca.total_return,
            dca_drawdown: dca_dd.update(dca.current_value),
            dca_mdd: dca_dd.mdd,
        });

        previous = Some((lump.current_value, dca.current_value));
    }

    rows
}

/// 단일 시나리오 상세 분석 결과.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DetailedScenario {
    pub comparison: ComparisonResult,
    pub lump_sum: DetailedMetrics,
    pub dca: DetailedMetrics,
    /// 지표별 우위 전략
    pub metric_comparison: Vec<MetricComparison>,
    /// 월별 진행 기록
    pub monthly: Vec<MonthlyRecord>,
}

impl DetailedScenario {
    pub fn from_comparison(comparison: ComparisonResult) -> Self {
        Self {
            lump_sum: DetailedMetrics::from_records(&comparison.lump_sum.records),
            dca: DetailedMetrics::from_records(&comparison.dca.records),
            metric_comparison: comparison.compare_metrics(),
            monthly: monthly_records(&comparison),
            comparison,
        }
    }

    /// 상세 분석을 여러 줄 문자열로 반환합니다.
    pub fn summary(&self) -> String {
        let mut lines = vec![self.comparison.summary()];

        lines.push(format!("{:<10} {:>12} {:>12} {:>10}", "지표", "일시투자", "적립투자", "우위"));
        for row in &self.metric_comparison {
            lines.push(format!(
                "{:<10} {:>12.4} {:>12.4} {:>10}",
                row.metric.label(),
                row.lump_sum,
                row.dca,
                row.better.label()
            ));
        }

        let (l, d) = (&self.lump_sum, &self.dca);
        lines.push(format!(
            "월 승률: {} vs {} | VaR5: {} vs {} | 회복 일수: {} vs {}",
            format_ratio_pct(l.monthly.win_rate),
            format_ratio_pct(d.monthly.win_rate),
            format_ratio_pct(l.risk.var_5),
            format_ratio_pct(d.risk.var_5),
            l.drawdown.recovery_days,
            d.drawdown.recovery_days,
        ));
        lines.push(format!("월별 기록: {}개월", self.monthly.len()));

        lines.join("\n")
    }
}

/// 한 시작 시점을 월 단위로 상세 분석합니다.
///
/// # Errors
///
/// 시작 월에 거래일이 없으면 `NoDataForStartPeriod`.
pub fn analyze_detailed_scenario(
    series: &PriceSeries,
    config: &InvestmentConfig,
) -> SimResult<DetailedScenario> {
    run_comparison(series, config).map(DetailedScenario::from_comparison)
}
