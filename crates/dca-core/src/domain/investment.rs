//! 투자 설정 및 시나리오 스윕 설정.
//!
//! 두 설정 모두 검증 빌더(`build()`)를 통해서만 생성되는 불변 값 객체입니다.
//! 역직렬화 시에도 같은 검증을 거칩니다.

use std::fmt;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use super::YearMonth;
use crate::error::{SimError, SimResult};
use crate::types::Amount;

/// 기본 총 투자금 (1천만).
pub const DEFAULT_TOTAL_CAPITAL: Decimal = dec!(10000000);
/// 기본 DCA 분할 횟수 (개월).
pub const DEFAULT_DCA_INSTALLMENTS: u32 = 60;
/// 기본 투자 기간 (년).
pub const DEFAULT_HORIZON_YEARS: u32 = 10;
/// 연간 최소 거래일 수 기본값.
pub const DEFAULT_MIN_TRADING_DAYS_PER_YEAR: u32 = 120;

/// 투자 전략 종류.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StrategyKind {
    /// 일시투자
    #[default]
    LumpSum,
    /// 적립투자 (Dollar-Cost Averaging)
    Dca,
}

impl StrategyKind {
    /// 사람이 읽기 쉬운 한글 이름.
    pub fn label(&self) -> &'static str {
        match self {
            StrategyKind::LumpSum => "일시투자",
            StrategyKind::Dca => "적립투자",
        }
    }
}

impl fmt::Display for StrategyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StrategyKind::LumpSum => write!(f, "LumpSum"),
            StrategyKind::Dca => write!(f, "DCA"),
        }
    }
}

// ==================== InvestmentConfig ====================

/// 단일 시뮬레이션 실행 설정.
///
/// 불변식:
/// - `total_capital > 0`
/// - `dca_installments >= 1`
/// - `horizon_years >= 1`
/// - 시작 월은 1~12
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "InvestmentConfigRaw", into = "InvestmentConfigRaw")]
pub struct InvestmentConfig {
    total_capital: Amount,
    strategy: StrategyKind,
    dca_installments: u32,
    start: YearMonth,
    horizon_years: u32,
    window_end: YearMonth,
}

impl InvestmentConfig {
    /// 기본값으로 채워진 빌더를 생성합니다.
    pub fn builder() -> InvestmentConfigBuilder {
        InvestmentConfigBuilder::default()
    }

    pub fn total_capital(&self) -> Amount {
        self.total_capital
    }

    pub fn strategy(&self) -> StrategyKind {
        self.strategy
    }

    pub fn dca_installments(&self) -> u32 {
        self.dca_installments
    }

    pub fn start(&self) -> YearMonth {
        self.start
    }

    pub fn horizon_years(&self) -> u32 {
        self.horizon_years
    }

    /// 같은 설정에 전략만 바꾼 사본.
    pub fn with_strategy(&self, strategy: StrategyKind) -> Self {
        Self {
            strategy,
            ..self.clone()
        }
    }

    /// DCA 1회 투자 금액 (`total_capital / dca_installments`).
    pub fn dca_installment_amount(&self) -> Amount {
        self.total_capital / Decimal::from(self.dca_installments)
    }

    /// 측정 구간 `[시작 월 1일, 시작 + horizon_years 년의 1일)`.
    pub fn window(&self) -> (NaiveDate, NaiveDate) {
        (self.start.first_day(), self.window_end.first_day())
    }
}

/// `InvestmentConfig` 빌더.
#[derive(Debug, Clone)]
pub struct InvestmentConfigBuilder {
    total_capital: Amount,
    strategy: StrategyKind,
    dca_installments: u32,
    start_year: i32,
    start_month: u32,
    horizon_years: u32,
}

impl Default for InvestmentConfigBuilder {
    fn default() -> Self {
        Self {
            total_capital: DEFAULT_TOTAL_CAPITAL,
            strategy: StrategyKind::LumpSum,
            dca_installments: DEFAULT_DCA_INSTALLMENTS,
            start_year: 2000,
            start_month: 1,
            horizon_years: DEFAULT_HORIZON_YEARS,
        }
    }
}

impl InvestmentConfigBuilder {
    pub fn with_total_capital(mut self, total_capital: Amount) -> Self {
        self.total_capital = total_capital;
        self
    }

    pub fn with_strategy(mut self, strategy: StrategyKind) -> Self {
        self.strategy = strategy;
        self
    }

    pub fn with_dca_installments(mut self, installments: u32) -> Self {
        self.dca_installments = installments;
        self
    }

    pub fn with_start(mut self, year: i32, month: u32) -> Self {
        self.start_year = year;
        self.start_month = month;
        self
    }

    pub fn with_start_month(self, start: YearMonth) -> Self {
        self.with_start(start.year(), start.month())
    }

    pub fn with_horizon_years(mut self, years: u32) -> Self {
        self.horizon_years = years;
        self
    }

    /// 불변식을 검증하고 설정을 생성합니다.
    pub fn build(self) -> SimResult<InvestmentConfig> {
        validate_common(self.total_capital, self.dca_installments, self.horizon_years)?;

        let start = YearMonth::new(self.start_year, self.start_month)?;
        let window_end = start.add_years(self.horizon_years).ok_or_else(|| {
            SimError::InvalidConfig(format!(
                "투자 기간이 날짜 범위를 벗어납니다: {} + {}년",
                start, self.horizon_years
            ))
        })?;

        Ok(InvestmentConfig {
            total_capital: self.total_capital,
            strategy: self.strategy,
            dca_installments: self.dca_installments,
            start,
            horizon_years: self.horizon_years,
            window_end,
        })
    }
}

fn validate_common(total_capital: Amount, dca_installments: u32, horizon_years: u32) -> SimResult<()> {
    if total_capital <= Decimal::ZERO {
        return Err(SimError::InvalidConfig(format!(
            "총 투자금은 0보다 커야 합니다: {}",
            total_capital
        )));
    }
    if dca_installments < 1 {
        return Err(SimError::InvalidConfig(
            "DCA 분할 횟수는 1 이상이어야 합니다".to_string(),
        ));
    }
    if horizon_years < 1 {
        return Err(SimError::InvalidConfig(
            "투자 기간은 1년 이상이어야 합니다".to_string(),
        ));
    }
    Ok(())
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct InvestmentConfigRaw {
    #[serde(alias = "total_amount")]
    total_capital: Amount,
    #[serde(default)]
    strategy: StrategyKind,
    #[serde(alias = "dca_months")]
    dca_installments: u32,
    start_year: i32,
    start_month: u32,
    #[serde(alias = "investment_period_years")]
    horizon_years: u32,
}

impl TryFrom<InvestmentConfigRaw> for InvestmentConfig {
    type Error = SimError;

    fn try_from(raw: InvestmentConfigRaw) -> Result<Self, Self::Error> {
        InvestmentConfig::builder()
            .with_total_capital(raw.total_capital)
            .with_strategy(raw.strategy)
            .with_dca_installments(raw.dca_installments)
            .with_start(raw.start_year, raw.start_month)
            .with_horizon_years(raw.horizon_years)
            .build()
    }
}

impl From<InvestmentConfig> for InvestmentConfigRaw {
    fn from(config: InvestmentConfig) -> Self {
        Self {
            total_capital: config.total_capital,
            strategy: config.strategy,
            dca_installments: config.dca_installments,
            start_year: config.start.year(),
            start_month: config.start.month(),
            horizon_years: config.horizon_years,
        }
    }
}

// ==================== ScenarioConfig ====================

/// 롤링 스윕 설정.
///
/// `[sweep_start, sweep_end)` 범위의 매월마다 시나리오 하나를 생성합니다.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "ScenarioConfigRaw", into = "ScenarioConfigRaw")]
pub struct ScenarioConfig {
    total_amount: Amount,
    dca_installment_months: u32,
    horizon_years: u32,
    sweep_start: YearMonth,
    sweep_end: YearMonth,
    min_trading_days_per_year: u32,
}

impl ScenarioConfig {
    /// 스윕 범위를 지정하여 빌더를 생성합니다.
    pub fn builder(sweep_start: YearMonth, sweep_end: YearMonth) -> ScenarioConfigBuilder {
        ScenarioConfigBuilder {
            total_amount: DEFAULT_TOTAL_CAPITAL,
            dca_installment_months: DEFAULT_DCA_INSTALLMENTS,
            horizon_years: DEFAULT_HORIZON_YEARS,
            sweep_start,
            sweep_end,
            min_trading_days_per_year: DEFAULT_MIN_TRADING_DAYS_PER_YEAR,
        }
    }

    pub fn total_amount(&self) -> Amount {
        self.total_amount
    }

    pub fn dca_installment_months(&self) -> u32 {
        self.dca_installment_months
    }

    pub fn horizon_years(&self) -> u32 {
        self.horizon_years
    }

    pub fn sweep_start(&self) -> YearMonth {
        self.sweep_start
    }

    pub fn sweep_end(&self) -> YearMonth {
        self.sweep_end
    }

    pub fn min_trading_days_per_year(&self) -> u32 {
        self.min_trading_days_per_year
    }

    /// 시나리오 하나가 성공하기 위한 최소 거래일 수.
    pub fn min_trading_days(&self) -> usize {
        self.min_trading_days_per_year as usize * self.horizon_years as usize
    }

    /// 스윕할 시작 월 목록 (끝 월 제외).
    pub fn start_months(&self) -> Vec<YearMonth> {
        self.sweep_start.iter_until(self.sweep_end).collect()
    }

    pub fn scenario_count(&self) -> usize {
        self.sweep_start.months_until(self.sweep_end) as usize
    }

    /// 특정 시작 월에 대한 투자 설정.
    pub fn investment_config_for(&self, start: YearMonth, strategy: StrategyKind) -> SimResult<InvestmentConfig> {
        InvestmentConfig::builder()
            .with_total_capital(self.total_amount)
            .with_strategy(strategy)
            .with_dca_installments(self.dca_installment_months)
            .with_start_month(start)
            .with_horizon_years(self.horizon_years)
            .build()
    }
}

/// `ScenarioConfig` 빌더.
#[derive(Debug, Clone)]
pub struct ScenarioConfigBuilder {
    total_amount: Amount,
    dca_installment_months: u32,
    horizon_years: u32,
    sweep_start: YearMonth,
    sweep_end: YearMonth,
    min_trading_days_per_year: u32,
}

impl ScenarioConfigBuilder {
    pub fn with_total_amount(mut self, total_amount: Amount) -> Self {
        self.total_amount = total_amount;
        self
    }

    pub fn with_dca_installment_months(mut self, months: u32) -> Self {
        self.dca_installment_months = months;
        self
    }

    pub fn with_horizon_years(mut self, years: u32) -> Self {
        self.horizon_years = years;
        self
    }

    pub fn with_min_trading_days_per_year(mut self, days: u32) -> Self {
        self.min_trading_days_per_year = days;
        self
    }

    /// 불변식을 검증하고 설정을 생성합니다.
    pub fn build(self) -> SimResult<ScenarioConfig> {
        validate_common(self.total_amount, self.dca_installment_months, self.horizon_years)?;

        if self.sweep_start >= self.sweep_end {
            return Err(SimError::InvalidConfig(format!(
                "스윕 시작({})은 종료({})보다 앞서야 합니다",
                self.sweep_start, self.sweep_end
            )));
        }
        if self.sweep_end.add_years(self.horizon_years).is_none() {
            return Err(SimError::InvalidConfig(format!(
                "투자 기간이 날짜 범위를 벗어납니다: {} + {}년",
                self.sweep_end, self.horizon_years
            )));
        }

        Ok(ScenarioConfig {
            total_amount: self.total_amount,
            dca_installment_months: self.dca_installment_months,
            horizon_years: self.horizon_years,
            sweep_start: self.sweep_start,
            sweep_end: self.sweep_end,
            min_trading_days_per_year: self.min_trading_days_per_year,
        })
    }
}

fn default_min_trading_days_per_year() -> u32 {
    DEFAULT_MIN_TRADING_DAYS_PER_YEAR
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct ScenarioConfigRaw {
    #[serde(alias = "total_capital")]
    total_amount: Amount,
    #[serde(alias = "dca_months")]
    dca_installment_months: u32,
    #[serde(alias = "investment_period_years")]
    horizon_years: u32,
    sweep_start_year: i32,
    sweep_start_month: u32,
    sweep_end_year: i32,
    sweep_end_month: u32,
    #[serde(default = "default_min_trading_days_per_year")]
    min_trading_days_per_year: u32,
}

impl TryFrom<ScenarioConfigRaw> for ScenarioConfig {
    type Error = SimError;

    fn try_from(raw: ScenarioConfigRaw) -> Result<Self, Self::Error> {
        let start = YearMonth::new(raw.sweep_start_year, raw.sweep_start_month)?;
        let end = YearMonth::new(raw.sweep_end_year, raw.sweep_end_month)?;

        ScenarioConfig::builder(start, end)
            .with_total_amount(raw.total_amount)
            .with_dca_installment_months(raw.dca_installment_months)
            .with_horizon_years(raw.horizon_years)
            .with_min_trading_days_per_year(raw.min_trading_days_per_year)
            .build()
    }
}

impl From<ScenarioConfig> for ScenarioConfigRaw {
    fn from(config: ScenarioConfig) -> Self {
        Self {
            total_amount: config.total_amount,
            dca_installment_months: config.dca_installment_months,
            horizon_years: config.horizon_years,
            sweep_start_year: config.sweep_start.year(),
            sweep_start_month: config.sweep_start.month(),
            sweep_end_year: config.sweep_end.year(),
            sweep_end_month: config.sweep_end.month(),
            min_trading_days_per_year: config.min_trading_days_per_year,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ym(year: i32, month: u32) -> YearMonth {
        YearMonth::new(year, month).unwrap()
    }

    #[test]
    fn test_investment_config_validation() {
        assert!(InvestmentConfig::builder().build().is_ok());
        assert!(InvestmentConfig::builder()
            .with_total_capital(Decimal::ZERO)
            .build()
            .is_err());
        assert!(InvestmentConfig::builder().with_dca_installments(0).build().is_err());
        assert!(InvestmentConfig::builder().with_horizon_years(0).build().is_err());
        assert!(InvestmentConfig::builder().with_start(2000, 13).build().is_err());
    }

    #[test]
    fn test_window_and_installment_amount() {
        let config = InvestmentConfig::builder()
            .with_total_capital(dec!(12000))
            .with_dca_installments(12)
            .with_start(2019, 3)
            .with_horizon_years(2)
            .build()
            .unwrap();

        assert_eq!(config.dca_installment_amount(), dec!(1000));
        let (start, end) = config.window();
        assert_eq!(start, NaiveDate::from_ymd_opt(2019, 3, 1).unwrap());
        assert_eq!(end, NaiveDate::from_ymd_opt(2021, 3, 1).unwrap());
    }

    #[test]
    fn test_with_strategy_keeps_other_fields() {
        let lump = InvestmentConfig::builder().build().unwrap();
        let dca = lump.with_strategy(StrategyKind::Dca);

        assert_eq!(dca.strategy(), StrategyKind::Dca);
        assert_eq!(dca.total_capital(), lump.total_capital());
        assert_eq!(dca.window(), lump.window());
    }

    #[test]
    fn test_investment_config_deserialize_validates_and_accepts_aliases() {
        let json = r#"{"total_amount":"5000","dca_months":10,"start_year":2010,"start_month":5,"investment_period_years":3}"#;
        let config: InvestmentConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.total_capital(), dec!(5000));
        assert_eq!(config.dca_installments(), 10);
        assert_eq!(config.strategy(), StrategyKind::LumpSum);

        let bad = r#"{"total_capital":"5000","dca_installments":0,"start_year":2010,"start_month":5,"horizon_years":3}"#;
        assert!(serde_json::from_str::<InvestmentConfig>(bad).is_err());
    }

    #[test]
    fn test_scenario_config_months() {
        let config = ScenarioConfig::builder(ym(1980, 1), ym(1981, 3))
            .with_horizon_years(10)
            .build()
            .unwrap();

        let months = config.start_months();
        assert_eq!(months.len(), 14);
        assert_eq!(config.scenario_count(), 14);
        assert_eq!(months[0], ym(1980, 1));
        assert_eq!(*months.last().unwrap(), ym(1981, 2));
        assert_eq!(config.min_trading_days(), 1200);
    }

    #[test]
    fn test_scenario_config_rejects_empty_sweep() {
        assert!(ScenarioConfig::builder(ym(1990, 1), ym(1990, 1)).build().is_err());
        assert!(ScenarioConfig::builder(ym(1990, 2), ym(1990, 1)).build().is_err());
    }

    #[test]
    fn test_investment_config_for_start() {
        let config = ScenarioConfig::builder(ym(1990, 1), ym(1991, 1))
            .with_total_amount(dec!(1000))
            .with_dca_installment_months(5)
            .with_horizon_years(3)
            .build()
            .unwrap();

        let inv = config.investment_config_for(ym(1990, 6), StrategyKind::Dca).unwrap();
        assert_eq!(inv.start(), ym(1990, 6));
        assert_eq!(inv.dca_installments(), 5);
        assert_eq!(inv.horizon_years(), 3);
        assert_eq!(inv.strategy(), StrategyKind::Dca);
    }

    #[test]
    fn test_strategy_kind_serde() {
        assert_eq!(serde_json::to_string(&StrategyKind::LumpSum).unwrap(), "\"lump_sum\"");
        assert_eq!(StrategyKind::Dca.to_string(), "DCA");
    }
}
