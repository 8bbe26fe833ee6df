//! 결과 내보내기 (JSON, CSV).
//!
//! 상위 디렉토리가 없으면 생성합니다. JSON에서 무한대 값(소르티노 `+∞` 등)은 `"inf"`로 기록되어
//! 다시 읽을 수 있습니다.

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::Path;

use chrono::NaiveDate;
use dca_analytics::{ComparisonResult, DetailedScenario, MonthlyRecord, ScenarioResult, SweepReport};
use dca_core::{Amount, Price, StrategyKind, YearMonth};
use serde::Serialize;
use tracing::info;

use crate::error::Result;

/// 값을 보기 좋은 JSON으로 파일에 씁니다.
pub fn write_json<T: Serialize + ?Sized>(value: &T, path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    let mut writer = BufWriter::new(create_file(path)?);
    serde_json::to_writer_pretty(&mut writer, value)?;
    writer.write_all(b"\n")?;
    writer.flush()?;
    Ok(())
}

/// 단일 시점 비교 결과를 JSON으로 내보냅니다.
pub fn export_comparison(result: &ComparisonResult, path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    write_json(result, path)?;
    info!(path = %path.display(), "비교 결과 저장");
    Ok(())
}

/// 롤링 스윕 리포트를 JSON으로 내보냅니다.
pub fn export_sweep_report(report: &SweepReport, path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    write_json(report, path)?;
    info!(
        path = %path.display(),
        scenarios = report.success_count(),
        "롤링 분석 리포트 저장"
    );
    Ok(())
}

/// 상세 분석 결과를 JSON으로 내보냅니다.
pub fn export_detailed_scenario(detail: &DetailedScenario, path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    write_json(detail, path)?;
    info!(
        path = %path.display(),
        months = detail.monthly.len(),
        "상세 분석 결과 저장"
    );
    Ok(())
}

/// 시나리오 결과 CSV의 한 행.
#[derive(Debug, Clone, Serialize)]
struct ScenarioRow {
    start: YearMonth,
    start_date: NaiveDate,
    end_date: NaiveDate,
    trading_days: usize,
    start_price: Price,
    end_price: Price,
    lump_sum_return: f64,
    lump_sum_cagr: f64,
    lump_sum_mdd: f64,
    lump_sum_sharpe: f64,
    lump_sum_volatility: f64,
    lump_sum_final_value: Amount,
    dca_return: f64,
    dca_cagr: f64,
    dca_mdd: f64,
    dca_sharpe: f64,
    dca_volatility: f64,
    dca_final_value: Amount,
    dca_average_price: Price,
    return_difference: f64,
    cagr_difference: f64,
    value_difference: Amount,
    winner: StrategyKind,
}

impl From<&ScenarioResult> for ScenarioRow {
    fn from(r: &ScenarioResult) -> Self {
        Self {
            start: r.start,
            start_date: r.start_date,
            end_date: r.end_date,
            trading_days: r.trading_days,
            start_price: r.start_price,
            end_price: r.end_price,
            lump_sum_return: r.lump_sum.final_return,
            lump_sum_cagr: r.lump_sum.cagr,
            lump_sum_mdd: r.lump_sum.mdd,
            lump_sum_sharpe: r.lump_sum.sharpe_ratio,
            lump_sum_volatility: r.lump_sum.volatility,
            lump_sum_final_value: r.lump_sum.final_value,
            dca_return: r.dca.final_return,
            dca_cagr: r.dca.cagr,
            dca_mdd: r.dca.mdd,
            dca_sharpe: r.dca.sharpe_ratio,
            dca_volatility: r.dca.volatility,
            dca_final_value: r.dca.final_value,
            dca_average_price: r.dca_average_price,
            return_difference: r.return_difference,
            cagr_difference: r.cagr_difference,
            value_difference: r.value_difference,
            winner: r.winner,
        }
    }
}

/// 시나리오 결과를 CSV로 씁니다 (헤더 포함).
pub fn write_scenarios_csv<W: Write>(results: &[ScenarioResult], writer: W) -> Result<()> {
    let mut wtr = csv::Writer::from_writer(writer);
    for result in results {
        wtr.serialize(ScenarioRow::from(result))?;
    }
    wtr.flush()?;
    Ok(())
}

/// 시나리오 결과를 CSV 파일로 내보냅니다.
pub fn export_scenarios_csv(results: &[ScenarioResult], path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    write_scenarios_csv(results, BufWriter::new(create_file(path)?))?;
    info!(path = %path.display(), rows = results.len(), "시나리오 CSV 저장");
    Ok(())
}

/// 월별 기록을 CSV로 씁니다 (헤더 포함).
pub fn write_monthly_csv<W: Write>(records: &[MonthlyRecord], writer: W) -> Result<()> {
    let mut wtr = csv::Writer::from_writer(writer);
    for record in records {
        wtr.serialize(record)?;
    }
    wtr.flush()?;
    Ok(())
}

/// 월별 기록을 CSV 파일로 내보냅니다.
pub fn export_monthly_csv(records: &[MonthlyRecord], path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    write_monthly_csv(records, BufWriter::new(create_file(path)?))?;
    info!(path = %path.display(), rows = records.len(), "월별 기록 CSV 저장");
    Ok(())
}

fn create_file(path: &Path) -> Result<File> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    Ok(File::create(path)?)
}
