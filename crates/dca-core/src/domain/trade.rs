//! 매수 거래 기록.
//!
//! 이 모듈은 시뮬레이션이 만들어내는 거래 관련 타입을 정의합니다:
//! - `Trade` - 개별 매수 기록
//! - `PortfolioLedger` - 거래를 누적(fold)한 보유 현황
//! - `TradeLedger` - 한 전략의 전체 거래 목록

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;

use super::{StrategyKind, YearMonth};
use crate::error::{SimError, SimResult};
use crate::types::{Amount, Price, Quantity};

/// 한 번의 매수 체결.
///
/// 생성 후에는 변경할 수 없으며 `shares = amount / price` 입니다.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Trade {
    date: NaiveDate,
    price: Price,
    amount: Amount,
    shares: Quantity,
}

impl Trade {
    /// 새 매수 기록을 생성합니다.
    pub fn new(date: NaiveDate, price: Price, amount: Amount) -> SimResult<Self> {
        if price <= Decimal::ZERO {
            return Err(SimError::InvalidSeries(format!(
                "{} 체결 가격이 양수가 아닙니다: {}",
                date, price
            )));
        }
        if amount <= Decimal::ZERO {
            return Err(SimError::InvalidConfig(format!(
                "{} 매수 금액이 양수가 아닙니다: {}",
                date, amount
            )));
        }

        Ok(Self {
            date,
            price,
            amount,
            shares: amount / price,
        })
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }

    pub fn price(&self) -> Price {
        self.price
    }

    pub fn amount(&self) -> Amount {
        self.amount
    }

    pub fn shares(&self) -> Quantity {
        self.shares
    }
}

/// 거래를 누적한 보유 현황.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct PortfolioLedger {
    /// 누적 투자금
    pub total_invested: Amount,
    /// 누적 보유 수량
    pub total_shares: Quantity,
}

impl PortfolioLedger {
    /// 거래 목록을 순서대로 누적합니다.
    pub fn from_trades<'a>(trades: impl IntoIterator<Item = &'a Trade>) -> Self {
        trades.into_iter().fold(Self::default(), |ledger, t| ledger.apply(t))
    }

    /// 거래 하나를 반영한 새 현황.
    pub fn apply(self, trade: &Trade) -> Self {
        Self {
            total_invested: self.total_invested + trade.amount,
            total_shares: self.total_shares + trade.shares,
        }
    }

    /// 평균 매입 단가. 보유 수량이 없으면 0.
    pub fn average_price(&self) -> Price {
        if self.total_shares.is_zero() {
            Decimal::ZERO
        } else {
            self.total_invested / self.total_shares
        }
    }

    /// 주어진 가격에서의 평가 금액.
    pub fn market_value(&self, price: Price) -> Amount {
        self.total_shares * price
    }

    pub fn has_position(&self) -> bool {
        !self.total_shares.is_zero()
    }
}

/// 한 전략 실행의 전체 거래 원장.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TradeLedger {
    strategy: StrategyKind,
    trades: Vec<Trade>,
    /// 데이터가 없어 건너뛴 DCA 회차의 월
    skipped_months: Vec<YearMonth>,
}

impl TradeLedger {
    /// 날짜 순으로 정렬된 거래 목록으로 원장을 생성합니다.
    pub fn new(strategy: StrategyKind, trades: Vec<Trade>, skipped_months: Vec<YearMonth>) -> Self {
        Self {
            strategy,
            trades,
            skipped_months,
        }
    }

    pub fn strategy(&self) -> StrategyKind {
        self.strategy
    }

    pub fn trades(&self) -> &[Trade] {
        &self.trades
    }

    pub fn skipped_months(&self) -> &[YearMonth] {
        &self.skipped_months
    }

    pub fn len(&self) -> usize {
        self.trades.len()
    }

    pub fn is_empty(&self) -> bool {
        self.trades.is_empty()
    }

    /// 전체 거래를 누적한 최종 보유 현황.
    pub fn portfolio(&self) -> PortfolioLedger {
        PortfolioLedger::from_trades(&self.trades)
    }

    pub fn total_invested(&self) -> Amount {
        self.portfolio().total_invested
    }

    pub fn first_trade_date(&self) -> Option<NaiveDate> {
        self.trades.first().map(|t| t.date)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_trade_shares() {
        let trade = Trade::new(date(2020, 1, 2), dec!(250), dec!(1000)).unwrap();
        assert_eq!(trade.shares(), dec!(4));
        assert_eq!(trade.amount(), dec!(1000));
    }

    #[test]
    fn test_trade_rejects_non_positive_inputs() {
        assert!(Trade::new(date(2020, 1, 2), dec!(0), dec!(1000)).is_err());
        assert!(Trade::new(date(2020, 1, 2), dec!(10), dec!(0)).is_err());
    }

    #[test]
    fn test_portfolio_fold() {
        let trades = vec![
            Trade::new(date(2020, 1, 2), dec!(100), dec!(1000)).unwrap(),
            Trade::new(date(2020, 2, 3), dec!(50), dec!(1000)).unwrap(),
        ];
        let ledger = PortfolioLedger::from_trades(&trades);

        assert_eq!(ledger.total_invested, dec!(2000));
        assert_eq!(ledger.total_shares, dec!(30));
        assert_eq!(ledger.market_value(dec!(80)), dec!(2400));
        assert!(ledger.has_position());
    }

    #[test]
    fn test_average_price_zero_without_shares() {
        assert_eq!(PortfolioLedger::default().average_price(), Decimal::ZERO);
    }

    #[test]
    fn test_trade_ledger_totals() {
        let ledger = TradeLedger::new(
            StrategyKind::Dca,
            vec![
                Trade::new(date(2020, 1, 2), dec!(100), dec!(500)).unwrap(),
                Trade::new(date(2020, 2, 3), dec!(100), dec!(500)).unwrap(),
            ],
            vec![YearMonth::new(2020, 3).unwrap()],
        );

        assert_eq!(ledger.len(), 2);
        assert_eq!(ledger.total_invested(), dec!(1000));
        assert_eq!(ledger.portfolio().average_price(), dec!(100));
        assert_eq!(ledger.first_trade_date(), Some(date(2020, 1, 2)));
        assert_eq!(ledger.skipped_months().len(), 1);
    }
}
