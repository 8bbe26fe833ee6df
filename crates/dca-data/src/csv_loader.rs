//! CSV 가격 데이터 로더.
//!
//! 예상 형식: `Date,Open,High,Low,Close,Volume[,...]`
//!
//! - 헤더는 대소문자를 구분하지 않으며 추가 컬럼(`Dividends`, `Stock Splits`,
//!   `Adj Close` 등)은 무시합니다.
//! - 오프셋이 붙은 타임스탬프(RFC 3339 또는 `YYYY-MM-DD HH:MM:SS±HH:MM`)는 UTC 날짜로 변환합니다.
//!   오프셋 없는 `YYYY-MM-DD[ HH:MM:SS]`는 적힌 날짜를 그대로 사용합니다.
//! - 필수 값이 비어 있거나 `null`/`nan`인 행은 건너뜁니다.
//! - 행은 날짜순으로 정렬된 뒤 `PriceSeries`로 검증됩니다.

use std::fs::File;
use std::io::Read;
use std::path::Path;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use dca_core::{PriceBar, PriceSeries};
use rust_decimal::Decimal;
use tracing::{debug, info, warn};

use crate::error::{DataError, Result};

/// 필수 컬럼 목록.
pub const REQUIRED_COLUMNS: [&str; 6] = ["Date", "Open", "High", "Low", "Close", "Volume"];

/// CSV 파일에서 가격 시계열을 로드합니다.
pub fn load_price_series(path: impl AsRef<Path>) -> Result<PriceSeries> {
    let path = path.as_ref();
    let file = File::open(path)?;
    let series = read_price_series(file)?;

    info!(
        path = %path.display(),
        bars = series.len(),
        first = ?series.first().map(|b| b.date),
        last = ?series.last().map(|b| b.date),
        "가격 데이터 로드 완료"
    );

    Ok(series)
}

/// 임의의 reader에서 CSV 가격 시계열을 읽습니다.
///
/// # Errors
///
/// - 필수 컬럼이 없으면 `MissingRequiredColumns` (행을 읽기 전에 반환)
/// - 값을 해석할 수 없으면 `ParseError`
/// - 중복 날짜나 0 이하 종가가 있으면 `Sim(InvalidSeries)`
pub fn read_price_series<R: Read>(reader: R) -> Result<PriceSeries> {
    let mut rdr = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(reader);

    let columns = ColumnIndex::resolve(rdr.headers()?)?;

    let mut bars = Vec::new();
    let mut skipped = 0usize;

    for (i, record) in rdr.records().enumerate() {
        let record = record?;
        // 헤더가 1행이므로 데이터는 2행부터
        let line = i + 2;

        match columns.parse_row(&record, line)? {
            Some(bar) => bars.push(bar),
            None => {
                debug!(line, "빈 값이 있는 행 건너뜀");
                skipped += 1;
            }
        }
    }

    if skipped > 0 {
        warn!(skipped, "빈 값이 있는 행을 건너뛰었습니다");
    }

    bars.sort_by_key(|b| b.date);
    Ok(PriceSeries::new(bars)?)
}

/// 필수 컬럼의 위치.
#[derive(Debug, Clone, Copy)]
struct ColumnIndex {
    date: usize,
    open: usize,
    high: usize,
    low: usize,
    close: usize,
    volume: usize,
}

impl ColumnIndex {
    fn resolve(headers: &csv::StringRecord) -> Result<Self> {
        let find = |name: &str| headers.iter().position(|h| h.eq_ignore_ascii_case(name));

        let positions: Vec<Option<usize>> = REQUIRED_COLUMNS.iter().map(|&c| find(c)).collect();
        let missing: Vec<String> = REQUIRED_COLUMNS
            .iter()
            .zip(&positions)
            .filter(|(_, pos)| pos.is_none())
            .map(|(name, _)| name.to_string())
            .collect();

        match positions.as_slice() {
            [Some(date), Some(open), Some(high), Some(low), Some(close), Some(volume)] => Ok(Self {
                date: *date,
                open: *open,
                high: *high,
                low: *low,
                close: *close,
                volume: *volume,
            }),
            _ => Err(DataError::MissingRequiredColumns(missing)),
        }
    }

    /// 한 행을 해석합니다. 필수 값이 비어 있으면 `None`.
    fn parse_row(&self, record: &csv::StringRecord, line: usize) -> Result<Option<PriceBar>> {
        let cells = [self.date, self.open, self.high, self.low, self.close, self.volume]
            .map(|idx| record.get(idx).unwrap_or(""));

        if cells.iter().any(|c| is_blank(c)) {
            return Ok(None);
        }

        let [date, open, high, low, close, volume] = cells;

        Ok(Some(PriceBar {
            date: parse_date(date, line)?,
            open: parse_decimal(open, "Open", line)?,
            high: parse_decimal(high, "High", line)?,
            low: parse_decimal(low, "Low", line)?,
            close: parse_decimal(close, "Close", line)?,
            volume: parse_decimal(volume, "Volume", line)?,
        }))
    }
}

fn is_blank(cell: &str) -> bool {
    cell.is_empty() || cell.eq_ignore_ascii_case("null") || cell.eq_ignore_ascii_case("nan")
}

fn parse_date(cell: &str, line: usize) -> Result<NaiveDate> {
    DateTime::parse_from_rfc3339(cell)
        .or_else(|_| DateTime::parse_from_str(cell, "%Y-%m-%d %H:%M:%S%:z"))
        .map(|dt| dt.naive_utc().date())
        .or_else(|_| NaiveDate::parse_from_str(cell, "%Y-%m-%d"))
        .or_else(|_| NaiveDateTime::parse_from_str(cell, "%Y-%m-%d %H:%M:%S").map(|dt| dt.date()))
        .map_err(|_| DataError::ParseError(format!("line {}: invalid date '{}'", line, cell)))
}

fn parse_decimal(cell: &str, column: &str, line: usize) -> Result<Decimal> {
    Decimal::from_str(cell)
        .or_else(|_| Decimal::from_scientific(cell))
        .map_err(|e| {
            DataError::ParseError(format!(
                "line {}: invalid {} value '{}': {}",
                line, column, cell, e
            ))
        })
}
