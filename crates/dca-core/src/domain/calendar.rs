//! 연월(year-month) 달력 타입.
//!
//! 시뮬레이션의 시작 시점, DCA 회차, 롤링 스윕은 모두 월 단위로 움직입니다.
//! `YearMonth`는 해당 월의 1일을 보관하며 "YYYY-MM" 문자열로 직렬화됩니다.

use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, Days, Months, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::error::{SimError, SimResult};

/// 특정 연도의 특정 월.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct YearMonth(NaiveDate);

impl YearMonth {
    /// 연도와 월로 생성합니다. 월은 1~12 범위여야 합니다.
    pub fn new(year: i32, month: u32) -> SimResult<Self> {
        if !(1..=12).contains(&month) {
            return Err(SimError::InvalidConfig(format!(
                "월은 1~12 범위여야 합니다: {}",
                month
            )));
        }
        NaiveDate::from_ymd_opt(year, month, 1)
            .map(Self)
            .ok_or_else(|| SimError::InvalidConfig(format!("잘못된 연월: {}-{:02}", year, month)))
    }

    /// 날짜가 속한 월을 반환합니다.
    pub fn from_date(date: NaiveDate) -> Self {
        let offset = Days::new(u64::from(date.day0()));
        Self(date - offset)
    }

    pub fn year(&self) -> i32 {
        self.0.year()
    }

    pub fn month(&self) -> u32 {
        self.0.month()
    }

    /// 해당 월의 1일.
    pub fn first_day(&self) -> NaiveDate {
        self.0
    }

    /// `n`개월 뒤의 월. 날짜 범위를 벗어나면 `None`.
    pub fn add_months(&self, n: u32) -> Option<Self> {
        self.0.checked_add_months(Months::new(n)).map(Self)
    }

    /// `n`년 뒤의 같은 월.
    pub fn add_years(&self, n: u32) -> Option<Self> {
        n.checked_mul(12).and_then(|months| self.add_months(months))
    }

    /// 다음 달.
    pub fn next(&self) -> Option<Self> {
        self.add_months(1)
    }

    /// 날짜가 이 월에 속하는지 확인합니다.
    pub fn contains(&self, date: NaiveDate) -> bool {
        date.year() == self.year() && date.month() == self.month()
    }

    /// `[self, end)` 범위의 월을 순서대로 순회합니다.
    pub fn iter_until(self, end: YearMonth) -> impl Iterator<Item = YearMonth> {
        std::iter::successors(Some(self), |ym| ym.next()).take_while(move |ym| *ym < end)
    }

    /// 두 월 사이의 개월 수 (`end - self`). `end`가 앞서면 0.
    pub fn months_until(&self, end: YearMonth) -> u32 {
        let diff = (end.year() - self.year()) * 12 + end.month() as i32 - self.month() as i32;
        diff.max(0) as u32
    }
}

impl fmt::Display for YearMonth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year(), self.month())
    }
}

impl FromStr for YearMonth {
    type Err = SimError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || SimError::InvalidConfig(format!("연월 형식은 YYYY-MM 이어야 합니다: {}", s));

        let (year, month) = s.trim().split_once('-').ok_or_else(invalid)?;
        let year: i32 = year.parse().map_err(|_| invalid())?;
        let month: u32 = month.parse().map_err(|_| invalid())?;
        Self::new(year, month)
    }
}

impl TryFrom<String> for YearMonth {
    type Error = SimError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<YearMonth> for String {
    fn from(value: YearMonth) -> Self {
        value.to_string()
    }
}
