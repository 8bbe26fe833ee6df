//! 일별 평가 엔진.
//!
//! 측정 구간의 거래일을 앞에서부터 순회하며 거래 원장을 누적하고,
//! 거래일마다 평가 레코드 하나를 만듭니다.
//!
//! # 낙폭 계산
//!
//! - `peak_return > 0`: `(total_return - peak_return) / (1 + peak_return)`
//! - `peak_return <= 0`: `total_return - peak_return`
//!
//! 첫 거래 이전의 레코드는 수익률, 고점, 낙폭이 모두 0입니다.

use chrono::NaiveDate;
use dca_core::{Amount, DecimalExt, PortfolioLedger, Price, PriceSeries, Quantity, TradeLedger};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// 하루치 포트폴리오 평가 레코드.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyValuationRecord {
    pub date: NaiveDate,
    /// 당일 종가
    pub price: Price,
    /// 누적 투자금
    pub invested_amount: Amount,
    /// 누적 보유 수량
    pub shares_held: Quantity,
    /// 평균 매입 단가 (보유 수량이 없으면 0)
    pub average_price: Price,
    /// 평가 금액 (`shares_held × price`)
    pub current_value: Amount,
    /// 누적 수익률 (비율)
    pub total_return: f64,
    /// 누적 수익률의 최고점
    pub peak_return: f64,
    /// 고점 대비 낙폭 (항상 0 이하)
    pub drawdown: f64,
}

/// 고점 수익률 기준 낙폭.
pub fn drawdown_from_peak(total_return: f64, peak_return: f64) -> f64 {
    if peak_return > 0.0 {
        (total_return - peak_return) / (1.0 + peak_return)
    } else {
        total_return - peak_return
    }
}

/// `[window_start, window_end)` 구간의 일별 평가 레코드를 생성합니다.
///
/// 거래는 날짜가 거래일과 일치할 때만 반영됩니다. 구간 밖의 거래는 무시됩니다.
pub fn valuate(
    series: &PriceSeries,
    ledger: &TradeLedger,
    window_start: NaiveDate,
    window_end: NaiveDate,
) -> Vec<DailyValuationRecord> {
    let bars = series.range(window_start, window_end);
    let mut trades = ledger.trades().iter().peekable();
    let mut portfolio = PortfolioLedger::default();
    let mut peak_return = f64::NEG_INFINITY;
    let mut records = Vec::with_capacity(bars.len());

    for bar in bars {
        while trades.next_if(|t| t.date() < bar.date).is_some() {}
        while let Some(trade) = trades.next_if(|t| t.date() == bar.date) {
            portfolio = portfolio.apply(trade);
        }

        let (current_value, total_return) = if portfolio.has_position() {
            let value = portfolio.market_value(bar.close);
            let ret = (value - portfolio.total_invested)
                .ratio_to(portfolio.total_invested)
                .unwrap_or(0.0);
            (value, ret)
        } else {
            (Decimal::ZERO, 0.0)
        };

        peak_return = peak_return.max(total_return);

        records.push(DailyValuationRecord {
            date: bar.date,
            price: bar.close,
            invested_amount: portfolio.total_invested,
            shares_held: portfolio.total_shares,
            average_price: portfolio.average_price(),
            current_value,
            total_return,
            peak_return,
            drawdown: drawdown_from_peak(total_return, peak_return),
        });
    }

    records
}

#[cfg(test)]
mod tests {
    use super::*;
    use dca_core::{PriceBar, StrategyKind, Trade};
    use rust_decimal_macros::dec;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn series(points: &[(NaiveDate, Decimal)]) -> PriceSeries {
        PriceSeries::new(points.iter().map(|(d, c)| PriceBar::from_close(*d, *c)).collect()).unwrap()
    }

    #[test]
    fn test_drawdown_branches() {
        assert_eq!(drawdown_from_peak(0.0, 0.0), 0.0);
        assert!((drawdown_from_peak(-0.1, 0.0) - (-0.1)).abs() < 1e-12);
        assert!((drawdown_from_peak(0.0, 1.0) - (-0.5)).abs() < 1e-12);
    }

    #[test]
    fn test_records_before_first_trade_are_zero() {
        let s = series(&[
            (date(2020, 1, 2), dec!(100)),
            (date(2020, 1, 3), dec!(110)),
            (date(2020, 2, 3), dec!(120)),
            (date(2020, 2, 4), dec!(90)),
        ]);
        let ledger = TradeLedger::new(
            StrategyKind::Dca,
            vec![Trade::new(date(2020, 2, 3), dec!(120), dec!(1200)).unwrap()],
            vec![],
        );

        let records = valuate(&s, &ledger, date(2020, 1, 1), date(2020, 3, 1));
        assert_eq!(records.len(), 4);

        for r in &records[..2] {
            assert_eq!(r.total_return, 0.0);
            assert_eq!(r.peak_return, 0.0);
            assert_eq!(r.drawdown, 0.0);
            assert_eq!(r.current_value, Decimal::ZERO);
            assert_eq!(r.average_price, Decimal::ZERO);
        }

        assert_eq!(records[2].shares_held, dec!(10));
        assert_eq!(records[2].average_price, dec!(120));
        assert_eq!(records[3].current_value, dec!(900));
        assert!((records[3].total_return - (-0.25)).abs() < 1e-12);
        assert!((records[3].drawdown - (-0.25)).abs() < 1e-12);
    }

    #[test]
    fn test_peak_and_drawdown_after_gain() {
        let s = series(&[
            (date(2020, 1, 2), dec!(100)),
            (date(2020, 1, 3), dec!(200)),
            (date(2020, 1, 6), dec!(150)),
        ]);
        let ledger = TradeLedger::new(
            StrategyKind::LumpSum,
            vec![Trade::new(date(2020, 1, 2), dec!(100), dec!(1000)).unwrap()],
            vec![],
        );

        let records = valuate(&s, &ledger, date(2020, 1, 1), date(2020, 2, 1));
        assert!((records[1].peak_return - 1.0).abs() < 1e-12);
        // (0.5 - 1.0) / (1 + 1.0)
        assert!((records[2].drawdown - (-0.25)).abs() < 1e-12);
        assert!((records[2].peak_return - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_trades_outside_window_are_ignored() {
        let s = series(&[(date(2020, 1, 2), dec!(100)), (date(2020, 1, 3), dec!(100))]);
        let ledger = TradeLedger::new(
            StrategyKind::LumpSum,
            vec![Trade::new(date(2019, 12, 31), dec!(100), dec!(1000)).unwrap()],
            vec![],
        );

        let records = valuate(&s, &ledger, date(2020, 1, 1), date(2020, 2, 1));
        assert!(records.iter().all(|r| r.invested_amount.is_zero()));
    }
}
