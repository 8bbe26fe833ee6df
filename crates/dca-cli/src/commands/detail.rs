//! 단일 시점 상세 분석 명령어.
//!
//! 비교 결과에 월별 진행 기록, 상세 지표, 지표별 우위를 더해 출력합니다.
//!
//! # 사용 예시
//!
//! ```bash
//! dca detail -s NASDAQ --start 2000-01 --years 10 -o results/detail.json --csv results/monthly.csv
//! ```

use std::path::PathBuf;

use anyhow::{Context, Result};
use tracing::info;

use dca_analytics::{analyze_detailed_scenario, DetailedScenario};
use dca_core::AppConfig;
use dca_data::{export_detailed_scenario, export_monthly_csv, SymbolCatalog};

use super::backtest::BacktestOptions;

/// 상세 분석 옵션. 시나리오 값은 비교 명령어와 같습니다.
#[derive(Debug, Clone, Default)]
pub struct DetailOptions {
    pub scenario: BacktestOptions,
    /// 월별 기록 CSV 저장 경로
    pub csv: Option<PathBuf>,
}

/// 상세 분석을 실행하고 결과를 출력합니다.
pub fn run_detail(mut config: AppConfig, options: DetailOptions) -> Result<DetailedScenario> {
    options.scenario.apply_to(&mut config);

    let investment = config
        .investment_config()
        .context("Invalid analysis configuration")?;
    let symbol = &config.analysis.symbol;

    info!(
        symbol = %symbol,
        start = %investment.start(),
        years = investment.horizon_years(),
        "상세 분석 시작"
    );

    let series = SymbolCatalog::new(&config.data.data_dir)
        .load(symbol)
        .with_context(|| format!("Failed to load price data for {}", symbol))?;

    let detail = analyze_detailed_scenario(&series, &investment)
        .with_context(|| format!("Detailed analysis failed for {} from {}", symbol, investment.start()))?;

    println!("\n[{}]", symbol);
    println!("{}", detail.summary());

    if let Some(path) = &options.scenario.output {
        export_detailed_scenario(&detail, path)
            .with_context(|| format!("Failed to write {}", path.display()))?;
        println!("저장 위치: {}", path.display());
    }
    if let Some(path) = &options.csv {
        export_monthly_csv(&detail.monthly, path)
            .with_context(|| format!("Failed to write {}", path.display()))?;
        println!("월별 기록: {}", path.display());
    }

    Ok(detail)
}
