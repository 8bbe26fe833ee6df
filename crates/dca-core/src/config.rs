//! 설정 관리.
//!
//! 기본값, 선택적 TOML 파일, `DCA__` 접두사 환경 변수 순으로 설정을 병합합니다.
//! 예: `DCA__SWEEP__PARALLELISM=8`

use std::path::{Path, PathBuf};

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::{
    InvestmentConfig, ScenarioConfig, StrategyKind, YearMonth, DEFAULT_DCA_INSTALLMENTS,
    DEFAULT_HORIZON_YEARS, DEFAULT_MIN_TRADING_DAYS_PER_YEAR, DEFAULT_TOTAL_CAPITAL,
};
use crate::error::SimResult;

/// 애플리케이션 설정.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct AppConfig {
    /// 로깅 설정
    pub logging: LoggingConfig,
    /// 가격 데이터 설정
    pub data: DataConfig,
    /// 단일 분석 설정
    pub analysis: AnalysisConfig,
    /// 롤링 스윕 설정
    pub sweep: SweepConfig,
}

/// 로깅 설정.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// 로그 레벨
    pub level: String,
    /// 로그 형식 (pretty, json, compact)
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
        }
    }
}

/// 가격 데이터 설정.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct DataConfig {
    /// `<SYMBOL>_data.csv` 파일이 위치한 디렉토리
    pub data_dir: PathBuf,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("data"),
        }
    }
}

/// 단일 분석 설정.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// 분석 대상 심볼
    pub symbol: String,
    /// 총 투자금
    #[serde(alias = "total_amount")]
    pub total_capital: Decimal,
    /// DCA 분할 횟수 (개월)
    #[serde(alias = "dca_months")]
    pub dca_installments: u32,
    pub start_year: i32,
    pub start_month: u32,
    /// 투자 기간 (년)
    #[serde(alias = "investment_period_years")]
    pub horizon_years: u32,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            symbol: "NASDAQ".to_string(),
            total_capital: DEFAULT_TOTAL_CAPITAL,
            dca_installments: DEFAULT_DCA_INSTALLMENTS,
            start_year: 2000,
            start_month: 1,
            horizon_years: DEFAULT_HORIZON_YEARS,
        }
    }
}

/// 롤링 스윕 설정.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct SweepConfig {
    pub start_year: i32,
    pub start_month: u32,
    /// 종료 연월 (해당 월은 포함하지 않음)
    pub end_year: i32,
    pub end_month: u32,
    /// 연간 최소 거래일 수
    pub min_trading_days_per_year: u32,
    /// 동시에 실행할 시나리오 수
    pub parallelism: usize,
}

impl Default for SweepConfig {
    fn default() -> Self {
        Self {
            start_year: 1980,
            start_month: 1,
            end_year: 2015,
            end_month: 1,
            min_trading_days_per_year: DEFAULT_MIN_TRADING_DAYS_PER_YEAR,
            parallelism: 4,
        }
    }
}

impl AppConfig {
    /// 파일과 환경 변수에서 설정을 로드합니다.
    ///
    /// 파일이 없으면 기본값과 환경 변수만 사용합니다.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, config::ConfigError> {
        let builder = config::Config::builder()
            .add_source(config::File::from(path.as_ref()).required(false))
            .add_source(
                config::Environment::with_prefix("DCA")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            );

        builder.build()?.try_deserialize()
    }

    /// 기본 경로에서 설정을 로드합니다.
    pub fn load_default() -> Result<Self, config::ConfigError> {
        Self::load("config/default.toml")
    }

    /// `[analysis]` 섹션을 검증된 일시투자 설정으로 변환합니다.
    ///
    /// DCA 설정은 `with_strategy(StrategyKind::Dca)`로 얻습니다.
    pub fn investment_config(&self) -> SimResult<InvestmentConfig> {
        let a = &self.analysis;
        InvestmentConfig::builder()
            .with_total_capital(a.total_capital)
            .with_strategy(StrategyKind::LumpSum)
            .with_dca_installments(a.dca_installments)
            .with_start(a.start_year, a.start_month)
            .with_horizon_years(a.horizon_years)
            .build()
    }

    /// `[analysis]`와 `[sweep]` 섹션을 검증된 스윕 설정으로 변환합니다.
    pub fn scenario_config(&self) -> SimResult<ScenarioConfig> {
        let a = &self.analysis;
        let s = &self.sweep;
        let start = YearMonth::new(s.start_year, s.start_month)?;
        let end = YearMonth::new(s.end_year, s.end_month)?;

        ScenarioConfig::builder(start, end)
            .with_total_amount(a.total_capital)
            .with_dca_installment_months(a.dca_installments)
            .with_horizon_years(a.horizon_years)
            .with_min_trading_days_per_year(s.min_trading_days_per_year)
            .build()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use std::io::Write;

    #[test]
    fn test_default_converts_to_valid_configs() {
        let config = AppConfig::default();
        let inv = config.investment_config().unwrap();
        assert_eq!(inv.total_capital(), dec!(10000000));
        assert_eq!(inv.dca_installments(), 60);

        let sweep = config.scenario_config().unwrap();
        assert_eq!(sweep.scenario_count(), 35 * 12);
        assert_eq!(sweep.min_trading_days(), 1200);
    }

    #[test]
    fn test_load_from_toml_file() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(
            file,
            r#"
[data]
data_dir = "/tmp/prices"

[analysis]
symbol = "SP500"
total_amount = 12000
dca_months = 12
start_year = 2010
start_month = 3
horizon_years = 1

[sweep]
start_year = 2001
start_month = 1
end_year = 2002
end_month = 1
parallelism = 2
"#
        )
        .unwrap();

        let config = AppConfig::load(file.path()).unwrap();
        assert_eq!(config.data.data_dir, PathBuf::from("/tmp/prices"));
        assert_eq!(config.analysis.symbol, "SP500");
        assert_eq!(config.analysis.total_capital, dec!(12000));
        assert_eq!(config.analysis.dca_installments, 12);
        assert_eq!(config.sweep.parallelism, 2);
        assert_eq!(config.sweep.min_trading_days_per_year, 120);
        assert_eq!(config.logging.level, "info");

        let sweep = config.scenario_config().unwrap();
        assert_eq!(sweep.scenario_count(), 12);
    }

    #[test]
    fn test_invalid_section_fails_conversion() {
        let mut config = AppConfig::default();
        config.analysis.start_month = 0;
        assert!(config.investment_config().is_err());

        let mut config = AppConfig::default();
        config.sweep.end_year = config.sweep.start_year;
        config.sweep.end_month = config.sweep.start_month;
        assert!(config.scenario_config().is_err());
    }
}
