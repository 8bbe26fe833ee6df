//! PriceSeries / YearMonth 통합 테스트
//!
//! 무작위 거래일 목록에 대해 구간 조회와 월 첫 거래일 조회를 선형 탐색 결과와 비교합니다.

use chrono::{Days, NaiveDate};
use dca_core::{PriceBar, PriceSeries, PortfolioLedger, Trade, YearMonth};
use proptest::prelude::*;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

fn base_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2000, 1, 3).unwrap()
}

/// 1~5일 간격의 증가하는 날짜와 양수 종가로 시계열을 만듭니다.
fn build_series(gaps: &[u64], closes: &[u32]) -> PriceSeries {
    let mut date = base_date();
    let bars = gaps
        .iter()
        .zip(closes)
        .map(|(gap, close)| {
            date = date + Days::new(*gap);
            PriceBar::from_close(date, Decimal::from(*close))
        })
        .collect();
    PriceSeries::new(bars).unwrap()
}

proptest! {
    #[test]
    fn first_trading_day_matches_linear_scan(
        gaps in prop::collection::vec(1u64..6, 1..300),
        closes in prop::collection::vec(1u32..10_000, 300),
        month_offset in 0u32..24,
    ) {
        let series = build_series(&gaps, &closes);
        let month = YearMonth::from_date(base_date()).add_months(month_offset).unwrap();

        let expected = series.bars().iter().find(|b| month.contains(b.date)).map(|b| b.date);
        let actual = series.first_trading_day_in(month).map(|b| b.date);
        prop_assert_eq!(actual, expected);
    }

    #[test]
    fn range_matches_filter(
        gaps in prop::collection::vec(1u64..6, 1..300),
        closes in prop::collection::vec(1u32..10_000, 300),
        from in 0u64..800,
        len in 0u64..800,
    ) {
        let series = build_series(&gaps, &closes);
        let start = base_date() + Days::new(from);
        let end = start + Days::new(len);

        let expected: Vec<NaiveDate> = series
            .bars()
            .iter()
            .filter(|b| b.date >= start && b.date < end)
            .map(|b| b.date)
            .collect();
        let actual: Vec<NaiveDate> = series.range(start, end).iter().map(|b| b.date).collect();
        prop_assert_eq!(actual, expected);
    }
}

#[test]
fn test_portfolio_fold_over_monthly_purchases() {
    let start = YearMonth::new(2021, 1).unwrap();
    let trades: Vec<Trade> = start
        .iter_until(YearMonth::new(2022, 1).unwrap())
        .enumerate()
        .map(|(i, ym)| Trade::new(ym.first_day(), Decimal::from(100 + i as u32 * 10), dec!(1000)).unwrap())
        .collect();

    assert_eq!(trades.len(), 12);

    let ledger = PortfolioLedger::from_trades(&trades);
    assert_eq!(ledger.total_invested, dec!(12000));

    // 평균 단가는 조화평균이므로 산술평균(155)보다 작다
    assert!(ledger.average_price() < dec!(155));
    assert!(ledger.average_price() > dec!(100));
}
