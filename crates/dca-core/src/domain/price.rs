//! 일별 가격 시계열.
//!
//! 시뮬레이션은 검증이 끝난 `PriceSeries`만을 입력으로 받습니다.
//! 날짜는 엄격하게 증가하고 종가는 항상 양수입니다. 휴장일 공백은 허용됩니다.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::YearMonth;
use crate::error::{SimError, SimResult};
use crate::types::{Price, Quantity};

/// 하루치 OHLCV 레코드.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceBar {
    pub date: NaiveDate,
    pub open: Price,
    pub high: Price,
    pub low: Price,
    pub close: Price,
    pub volume: Quantity,
}

impl PriceBar {
    /// 종가만 의미 있는 레코드를 생성합니다 (OHLC 모두 종가).
    pub fn from_close(date: NaiveDate, close: Price) -> Self {
        Self {
            date,
            open: close,
            high: close,
            low: close,
            close,
            volume: Quantity::ZERO,
        }
    }
}

/// 거래일 순으로 정렬된 일별 가격 시계열.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PriceSeries {
    bars: Vec<PriceBar>,
}

impl PriceSeries {
    /// 불변식을 검증하여 시계열을 생성합니다.
    ///
    /// # Errors
    ///
    /// - 날짜가 엄격하게 증가하지 않으면 (정렬 안 됨, 중복) `InvalidSeries`
    /// - 종가가 0 이하이면 `InvalidSeries`
    pub fn new(bars: Vec<PriceBar>) -> SimResult<Self> {
        if let Some(bar) = bars.iter().find(|b| b.close <= Price::ZERO) {
            return Err(SimError::InvalidSeries(format!(
                "{} 종가가 양수가 아닙니다: {}",
                bar.date, bar.close
            )));
        }

        if let Some(pair) = bars.windows(2).find(|w| w[0].date >= w[1].date) {
            let reason = if pair[0].date == pair[1].date {
                "중복된 날짜"
            } else {
                "정렬되지 않은 날짜"
            };
            return Err(SimError::InvalidSeries(format!(
                "{}: {} -> {}",
                reason, pair[0].date, pair[1].date
            )));
        }

        Ok(Self { bars })
    }

    pub fn bars(&self) -> &[PriceBar] {
        &self.bars
    }

    pub fn len(&self) -> usize {
        self.bars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    pub fn first(&self) -> Option<&PriceBar> {
        self.bars.first()
    }

    pub fn last(&self) -> Option<&PriceBar> {
        self.bars.last()
    }

    /// 특정 날짜의 레코드.
    pub fn get(&self, date: NaiveDate) -> Option<&PriceBar> {
        self.bars
            .binary_search_by_key(&date, |b| b.date)
            .ok()
            .map(|idx| &self.bars[idx])
    }

    /// `[start, end)` 구간의 레코드.
    pub fn range(&self, start: NaiveDate, end: NaiveDate) -> &[PriceBar] {
        let lo = self.bars.partition_point(|b| b.date < start);
        let hi = self.bars.partition_point(|b| b.date < end).max(lo);
        &self.bars[lo..hi]
    }

    /// `[start, end)` 구간을 새 시계열로 잘라냅니다.
    ///
    /// 원본이 이미 검증되었으므로 부분 구간도 불변식을 만족합니다.
    pub fn slice(&self, start: NaiveDate, end: NaiveDate) -> PriceSeries {
        PriceSeries {
            bars: self.range(start, end).to_vec(),
        }
    }

    /// 해당 월의 첫 거래일 레코드.
    pub fn first_trading_day_in(&self, month: YearMonth) -> Option<&PriceBar> {
        let idx = self.bars.partition_point(|b| b.date < month.first_day());
        self.bars.get(idx).filter(|b| month.contains(b.date))
    }

    /// 첫 날짜와 마지막 날짜.
    pub fn date_range(&self) -> Option<(NaiveDate, NaiveDate)> {
        match (self.bars.first(), self.bars.last()) {
            (Some(first), Some(last)) => Some((first.date, last.date)),
            _ => None,
        }
    }
}
