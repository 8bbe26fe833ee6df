//! 정밀한 금액 계산을 위한 Decimal 유틸리티.
//!
//! 금액, 가격, 수량은 `Decimal`로 보관하고, 수익률과 통계 지표는 `f64`로 계산합니다.
//! 이 모듈은 두 표현 사이의 변환을 한곳에 모읍니다.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;

/// 금융 정밀도를 위한 가격 타입.
pub type Price = Decimal;

/// 보유 수량(주식 수)을 위한 타입.
pub type Quantity = Decimal;

/// 투자 금액을 위한 타입.
pub type Amount = Decimal;

/// Decimal 연산을 위한 확장 트레이트.
pub trait DecimalExt {
    /// `f64`로 변환합니다. 표현할 수 없으면 0을 반환합니다.
    fn to_f64_lossy(&self) -> f64;

    /// 퍼센트 문자열로 변환합니다 (예: "5.25%").
    fn to_percentage_string(&self) -> String;

    /// 0으로 나누는 경우 `None`을 반환하는 비율 계산.
    fn ratio_to(&self, denominator: Decimal) -> Option<f64>;
}

impl DecimalExt for Decimal {
    fn to_f64_lossy(&self) -> f64 {
        self.to_f64().unwrap_or(0.0)
    }

    fn to_percentage_string(&self) -> String {
        let pct = *self * Decimal::from(100);
        format!("{:.2}%", pct)
    }

    fn ratio_to(&self, denominator: Decimal) -> Option<f64> {
        if denominator.is_zero() {
            return None;
        }
        self.checked_div(denominator).map(|r| r.to_f64_lossy())
    }
}

/// `f64` 비율을 퍼센트 문자열로 포맷합니다. 무한대는 "inf"로 표시합니다.
pub fn format_ratio_pct(value: f64) -> String {
    if value.is_infinite() {
        return if value > 0.0 { "inf".to_string() } else { "-inf".to_string() };
    }
    format!("{:.2}%", value * 100.0)
}
