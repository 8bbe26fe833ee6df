//! 단일 시점 일시투자 vs 적립투자 비교.
//!
//! 두 전략 모두 같은 측정 구간 `[시작 월, 시작 + 투자 기간)`으로 잘라낸
//! 시계열에서 시뮬레이션, 평가, 지표 계산을 수행합니다.
//! 롤링 스윕도 같은 경로를 사용하므로 한 달짜리 스윕은 단일 비교와 결과가 같습니다.

use chrono::NaiveDate;
use dca_core::{
    format_ratio_pct, DecimalExt, InvestmentConfig, PriceSeries, SimResult, StrategyKind,
    TradeLedger, YearMonth,
};
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::simulator::simulate;
use super::valuation::{valuate, DailyValuationRecord};
use crate::performance::Metrics;

/// 한 전략의 실행 결과.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StrategyRun {
    pub strategy: StrategyKind,
    /// 거래 원장
    pub ledger: TradeLedger,
    /// 일별 평가 레코드
    #[serde(rename = "daily_valuation_records")]
    pub records: Vec<DailyValuationRecord>,
    /// 성과 지표
    pub metrics: Metrics,
}

/// 시계열을 측정 구간으로 잘라 한 전략을 실행합니다.
pub fn run_strategy(series: &PriceSeries, config: &InvestmentConfig) -> SimResult<StrategyRun> {
    let (start, end) = config.window();
    run_strategy_in_window(&series.slice(start, end), config)
}

/// 이미 측정 구간으로 잘라낸 시계열에서 한 전략을 실행합니다.
pub(crate) fn run_strategy_in_window(
    window: &PriceSeries,
    config: &InvestmentConfig,
) -> SimResult<StrategyRun> {
    let (start, end) = config.window();
    let ledger = simulate(window, config)?;
    let records = valuate(window, &ledger, start, end);
    let metrics = Metrics::from_records(&records).with_trade_count(ledger.len());

    debug!(
        strategy = %config.strategy(),
        start = %config.start(),
        trades = ledger.len(),
        days = records.len(),
        final_return = metrics.final_return,
        "전략 실행 완료"
    );

    Ok(StrategyRun {
        strategy: config.strategy(),
        ledger,
        records,
        metrics,
    })
}

/// 단일 시점 비교 결과.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComparisonResult {
    /// 투자 시작 월
    pub start: YearMonth,
    /// 측정 구간 시작일 (포함)
    pub window_start: NaiveDate,
    /// 측정 구간 종료일 (제외)
    pub window_end: NaiveDate,
    pub lump_sum: StrategyRun,
    pub dca: StrategyRun,
}

impl ComparisonResult {
    /// 수익률이 더 높은 전략. 같으면 DCA.
    pub fn winner(&self) -> StrategyKind {
        pick_winner(self.lump_sum.metrics.final_return, self.dca.metrics.final_return)
    }

    /// 일시투자 수익률 - 적립투자 수익률.
    pub fn return_difference(&self) -> f64 {
        self.lump_sum.metrics.final_return - self.dca.metrics.final_return
    }

    /// 지표별로 더 나은 전략을 판정합니다.
    pub fn compare_metrics(&self) -> Vec<MetricComparison> {
        MetricKind::ALL
            .iter()
            .map(|kind| MetricComparison::of(*kind, &self.lump_sum.metrics, &self.dca.metrics))
            .collect()
    }

    /// 비교 결과를 여러 줄 문자열로 반환합니다.
    pub fn summary(&self) -> String {
        let lump = &self.lump_sum.metrics;
        let dca = &self.dca.metrics;

        format!(
            "일시투자 vs 적립투자 비교\n\
             ═══════════════════════════════════════\n\
             기간: {} → {} ({} 거래일)\n\
             ───────────────────────────────────────\n\
             {:<10} {:>12} {:>12}\n\
             {:<10} {:>12} {:>12}\n\
             {:<10} {:>12} {:>12}\n\
             {:<10} {:>12} {:>12}\n\
             {:<10} {:>12.2} {:>12.2}\n\
             {:<10} {:>12.2} {:>12.2}\n\
             {:<10} {:>12} {:>12}\n\
             {:<10} {:>12.0} {:>12.0}\n\
             {:<10} {:>12} {:>12}\n\
             ───────────────────────────────────────\n\
             승자: {} (수익률 차이 {})\n\
             ═══════════════════════════════════════",
            self.window_start,
            self.window_end,
            lump.period_days,
            "", StrategyKind::LumpSum.label(), StrategyKind::Dca.label(),
            "최종 수익률", format_ratio_pct(lump.final_return), format_ratio_pct(dca.final_return),
            "CAGR", format_ratio_pct(lump.cagr), format_ratio_pct(dca.cagr),
            "MDD", format_ratio_pct(lump.mdd), format_ratio_pct(dca.mdd),
            "샤프", lump.sharpe_ratio, dca.sharpe_ratio,
            "소르티노", lump.sortino_ratio, dca.sortino_ratio,
            "변동성", format_ratio_pct(lump.volatility), format_ratio_pct(dca.volatility),
            "최종 자산", lump.final_value, dca.final_value,
            "매수 횟수", lump.trade_count, dca.trade_count,
            self.winner().label(),
            format_ratio_pct(self.return_difference()),
        )
    }
}

/// 전략 간 비교 대상 지표.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MetricKind {
    FinalReturn,
    Cagr,
    Mdd,
    SharpeRatio,
    Volatility,
    WinRate,
    FinalValue,
}

impl MetricKind {
    pub const ALL: [MetricKind; 7] = [
        MetricKind::FinalReturn,
        MetricKind::Cagr,
        MetricKind::Mdd,
        MetricKind::SharpeRatio,
        MetricKind::Volatility,
        MetricKind::WinRate,
        MetricKind::FinalValue,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            MetricKind::FinalReturn => "최종 수익률",
            MetricKind::Cagr => "CAGR",
            MetricKind::Mdd => "MDD",
            MetricKind::SharpeRatio => "샤프",
            MetricKind::Volatility => "변동성",
            MetricKind::WinRate => "승률",
            MetricKind::FinalValue => "최종 자산",
        }
    }

    fn value(&self, metrics: &Metrics) -> f64 {
        match self {
            MetricKind::FinalReturn => metrics.final_return,
            MetricKind::Cagr => metrics.cagr,
            MetricKind::Mdd => metrics.mdd,
            MetricKind::SharpeRatio => metrics.sharpe_ratio,
            MetricKind::Volatility => metrics.volatility,
            MetricKind::WinRate => metrics.win_rate,
            MetricKind::FinalValue => metrics.final_value.to_f64_lossy(),
        }
    }

    /// 더 나은 전략.
    ///
    /// MDD는 0 이하이므로 절댓값이 작은 쪽, 변동성은 낮은 쪽이 낫습니다.
    /// 동률이면 낮을수록 좋은 지표는 일시투자, 나머지는 적립투자.
    fn better(&self, lump_sum: f64, dca: f64) -> StrategyKind {
        match self {
            MetricKind::Mdd if dca.abs() < lump_sum.abs() => StrategyKind::Dca,
            MetricKind::Volatility if dca < lump_sum => StrategyKind::Dca,
            MetricKind::Mdd | MetricKind::Volatility => StrategyKind::LumpSum,
            _ => pick_winner(lump_sum, dca),
        }
    }
}

/// 지표 하나에 대한 전략 비교.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MetricComparison {
    pub metric: MetricKind,
    pub lump_sum: f64,
    pub dca: f64,
    /// 일시투자 - 적립투자
    pub difference: f64,
    pub better: StrategyKind,
}

impl MetricComparison {
    fn of(metric: MetricKind, lump_sum: &Metrics, dca: &Metrics) -> Self {
        let (l, d) = (metric.value(lump_sum), metric.value(dca));
        Self {
            metric,
            lump_sum: l,
            dca: d,
            difference: l - d,
            better: metric.better(l, d),
        }
    }
}

/// 일시투자 수익률이 엄격하게 클 때만 일시투자 승리.
pub(crate) fn pick_winner(lump_sum_return: f64, dca_return: f64) -> StrategyKind {
    if lump_sum_return > dca_return {
        StrategyKind::LumpSum
    } else {
        StrategyKind::Dca
    }
}

/// 같은 설정으로 일시투자와 적립투자를 실행하여 비교합니다.
///
/// `config`의 전략 값은 무시되고 두 전략이 모두 실행됩니다.
///
/// # Errors
///
/// 시작 월에 거래일이 없으면 `NoDataForStartPeriod`.
pub fn run_comparison(series: &PriceSeries, config: &InvestmentConfig) -> SimResult<ComparisonResult> {
    let (window_start, window_end) = config.window();
    compare_in_window(&series.slice(window_start, window_end), config)
}

/// 이미 측정 구간으로 잘라낸 시계열에서 두 전략을 비교합니다.
pub(crate) fn compare_in_window(
    window: &PriceSeries,
    config: &InvestmentConfig,
) -> SimResult<ComparisonResult> {
    let (window_start, window_end) = config.window();

    let lump_sum = run_strategy_in_window(window, &config.with_strategy(StrategyKind::LumpSum))?;
    let dca = run_strategy_in_window(window, &config.with_strategy(StrategyKind::Dca))?;

    Ok(ComparisonResult {
        start: config.start(),
        window_start,
        window_end,
        lump_sum,
        dca,
    })
}
