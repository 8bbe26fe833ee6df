//! 단일 시점 비교 명령어.
//!
//! 지정한 시작 월에 일시투자와 적립투자를 동시에 실행하여 비교합니다.
//!
//! # 사용 예시
//!
//! ```bash
//! # 나스닥, 2000년 1월 시작, 10년 투자, 60개월 분할
//! dca backtest -s NASDAQ --start 2000-01 --years 10 --installments 60
//!
//! # 결과를 JSON으로 저장
//! dca backtest -s SP500 --capital 50000000 -o results/sp500.json
//! ```

use std::path::PathBuf;

use anyhow::{Context, Result};
use rust_decimal::Decimal;
use tracing::info;

use dca_analytics::{run_comparison, ComparisonResult};
use dca_core::{AppConfig, YearMonth};
use dca_data::{export_comparison, SymbolCatalog};

/// 비교 명령어 옵션. 지정하지 않은 값은 설정 파일을 따릅니다.
#[derive(Debug, Clone, Default)]
pub struct BacktestOptions {
    pub symbol: Option<String>,
    pub capital: Option<Decimal>,
    pub installments: Option<u32>,
    pub start: Option<YearMonth>,
    pub years: Option<u32>,
    pub output: Option<PathBuf>,
}

impl BacktestOptions {
    /// CLI 값을 `[analysis]` 섹션에 덮어씁니다.
    pub fn apply_to(&self, config: &mut AppConfig) {
        let analysis = &mut config.analysis;
        if let Some(symbol) = &self.symbol {
            analysis.symbol = symbol.clone();
        }
        if let Some(capital) = self.capital {
            analysis.total_capital = capital;
        }
        if let Some(installments) = self.installments {
            analysis.dca_installments = installments;
        }
        if let Some(start) = self.start {
            analysis.start_year = start.year();
            analysis.start_month = start.month();
        }
        if let Some(years) = self.years {
            analysis.horizon_years = years;
        }
    }
}

/// 비교를 실행하고 결과를 출력합니다.
pub fn run_backtest(mut config: AppConfig, options: BacktestOptions) -> Result<ComparisonResult> {
    options.apply_to(&mut config);

    let investment = config
        .investment_config()
        .context("Invalid analysis configuration")?;
    let symbol = &config.analysis.symbol;

    info!(
        symbol = %symbol,
        start = %investment.start(),
        years = investment.horizon_years(),
        installments = investment.dca_installments(),
        "비교 분석 시작"
    );

    let series = SymbolCatalog::new(&config.data.data_dir)
        .load(symbol)
        .with_context(|| format!("Failed to load price data for {}", symbol))?;

    let result = run_comparison(&series, &investment)
        .with_context(|| format!("Comparison failed for {} from {}", symbol, investment.start()))?;

    println!("\n[{}]", symbol);
    println!("{}", result.summary());

    if let Some(path) = &options.output {
        export_comparison(&result, path)
            .with_context(|| format!("Failed to write {}", path.display()))?;
        println!("저장 위치: {}", path.display());
    }

    Ok(result)
}
