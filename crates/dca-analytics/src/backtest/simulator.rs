//! 전략 시뮬레이터.
//!
//! 가격 시계열과 투자 설정으로부터 매수 거래 원장을 생성합니다.
//! 전략은 `StrategyKind`의 닫힌 집합이며 하나의 `simulate` 함수에서 분기합니다.
//!
//! - **LumpSum**: 시작 월 첫 거래일 종가에 총 투자금 전액 매수
//! - **DCA**: 시작 월부터 매월 첫 거래일 종가에 `총 투자금 / 분할 횟수`씩 매수.
//!   거래일이 없는 월은 건너뜁니다 (다음 월로 밀지 않음).

use dca_core::{
    InvestmentConfig, PriceSeries, SimError, SimResult, StrategyKind, Trade, TradeLedger,
};
use tracing::debug;

/// 설정된 전략으로 거래 원장을 생성합니다.
///
/// 같은 입력에 대해 항상 같은 원장을 반환합니다.
///
/// # Errors
///
/// LumpSum 전략에서 시작 월에 거래일이 없으면 `NoDataForStartPeriod`.
pub fn simulate(series: &PriceSeries, config: &InvestmentConfig) -> SimResult<TradeLedger> {
    match config.strategy() {
        StrategyKind::LumpSum => simulate_lump_sum(series, config),
        StrategyKind::Dca => simulate_dca(series, config),
    }
}

fn simulate_lump_sum(series: &PriceSeries, config: &InvestmentConfig) -> SimResult<TradeLedger> {
    let start = config.start();
    let bar = series
        .first_trading_day_in(start)
        .ok_or(SimError::NoDataForStartPeriod(start))?;

    let trade = Trade::new(bar.date, bar.close, config.total_capital())?;
    Ok(TradeLedger::new(StrategyKind::LumpSum, vec![trade], Vec::new()))
}

fn simulate_dca(series: &PriceSeries, config: &InvestmentConfig) -> SimResult<TradeLedger> {
    let amount = config.dca_installment_amount();
    let mut trades = Vec::with_capacity(config.dca_installments() as usize);
    let mut skipped = Vec::new();

    for i in 0..config.dca_installments() {
        let Some(month) = config.start().add_months(i) else {
            break;
        };

        match series.first_trading_day_in(month) {
            Some(bar) => trades.push(Trade::new(bar.date, bar.close, amount)?),
            None => skipped.push(month),
        }
    }

    if !skipped.is_empty() {
        debug!(
            start = %config.start(),
            executed = trades.len(),
            skipped = skipped.len(),
            "DCA 회차 중 거래일이 없는 월을 건너뜀"
        );
    }

    Ok(TradeLedger::new(StrategyKind::Dca, trades, skipped))
}
