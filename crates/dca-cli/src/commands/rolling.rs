//! 롤링 분석 명령어.
//!
//! 스윕 범위의 매월을 시작 시점으로 일시투자와 적립투자를 비교하고 집계합니다.
//! 실행 중 Ctrl+C를 누르면 남은 시나리오는 시작하지 않습니다.
//!
//! # 사용 예시
//!
//! ```bash
//! # 1980년 1월 ~ 2015년 1월 시작, 10년 투자
//! dca rolling -s SP500 --from 1980-01 --to 2015-01 --years 10
//!
//! # 병렬 8개, JSON과 CSV로 저장
//! dca rolling -s NASDAQ --from 1990-01 --to 2010-01 --parallel 8 -o results/nasdaq.json --csv results/nasdaq.csv
//! ```

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use rust_decimal::Decimal;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use dca_analytics::{RollingAnalyzer, SweepReport};
use dca_core::{AppConfig, YearMonth};
use dca_data::{export_scenarios_csv, export_sweep_report, SymbolCatalog};

/// 롤링 분석 명령어 옵션. 지정하지 않은 값은 설정 파일을 따릅니다.
#[derive(Debug, Clone, Default)]
pub struct RollingOptions {
    pub symbol: Option<String>,
    pub from: Option<YearMonth>,
    pub to: Option<YearMonth>,
    pub years: Option<u32>,
    pub installments: Option<u32>,
    pub capital: Option<Decimal>,
    pub parallel: Option<usize>,
    pub output: Option<PathBuf>,
    pub csv: Option<PathBuf>,
}

impl RollingOptions {
    /// CLI 값을 `[analysis]`, `[sweep]` 섹션에 덮어씁니다.
    pub fn apply_to(&self, config: &mut AppConfig) {
        if let Some(symbol) = &self.symbol {
            config.analysis.symbol = symbol.clone();
        }
        if let Some(capital) = self.capital {
            config.analysis.total_capital = capital;
        }
        if let Some(installments) = self.installments {
            config.analysis.dca_installments = installments;
        }
        if let Some(years) = self.years {
            config.analysis.horizon_years = years;
        }
        if let Some(from) = self.from {
            config.sweep.start_year = from.year();
            config.sweep.start_month = from.month();
        }
        if let Some(to) = self.to {
            config.sweep.end_year = to.year();
            config.sweep.end_month = to.month();
        }
        if let Some(parallel) = self.parallel {
            config.sweep.parallelism = parallel;
        }
    }
}

/// 롤링 분석을 실행하고 결과를 출력합니다.
///
/// `cancel`이 취소되면 남은 시나리오는 `not_run`으로 보고됩니다.
pub async fn run_rolling(
    mut config: AppConfig,
    options: RollingOptions,
    cancel: CancellationToken,
) -> Result<SweepReport> {
    options.apply_to(&mut config);

    let scenario = config
        .scenario_config()
        .context("Invalid sweep configuration")?;
    let symbol = config.analysis.symbol.clone();

    let series = SymbolCatalog::new(&config.data.data_dir)
        .load(&symbol)
        .with_context(|| format!("Failed to load price data for {}", symbol))?;

    info!(
        symbol = %symbol,
        from = %scenario.sweep_start(),
        to = %scenario.sweep_end(),
        scenarios = scenario.scenario_count(),
        parallelism = config.sweep.parallelism,
        "롤링 분석 시작"
    );

    let report = RollingAnalyzer::new(scenario)
        .run_concurrent(Arc::new(series), config.sweep.parallelism, cancel)
        .await;

    if !report.is_complete() {
        warn!(not_run = report.not_run_count(), "분석이 중단되어 일부 시나리오가 실행되지 않았습니다");
    }

    println!("\n[{}]", symbol);
    println!("{}", report.summary());

    if let Some(path) = &options.output {
        export_sweep_report(&report, path)
            .with_context(|| format!("Failed to write {}", path.display()))?;
        println!("리포트 저장: {}", path.display());
    }
    if let Some(path) = &options.csv {
        export_scenarios_csv(&report.results, path)
            .with_context(|| format!("Failed to write {}", path.display()))?;
        println!("CSV 저장: {}", path.display());
    }

    Ok(report)
}

/// Ctrl+C를 받으면 토큰을 취소합니다.
pub async fn cancel_on_ctrl_c(cancel: CancellationToken) {
    tokio::select! {
        result = tokio::signal::ctrl_c() => {
            match result {
                Ok(()) => warn!("Received Ctrl+C, stopping remaining scenarios..."),
                Err(e) => {
                    warn!("Failed to listen for Ctrl+C: {}", e);
                    return;
                }
            }
            cancel.cancel();
        }
        _ = cancel.cancelled() => {}
    }
}
