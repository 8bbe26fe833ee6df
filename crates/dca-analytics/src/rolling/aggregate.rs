//! 시나리오 결과 집계.
//!
//! 성공한 시나리오 목록에 대한 횡단면 통계를 계산합니다.
//! 입력이 같으면 결과도 같으며 언제든 다시 계산할 수 있습니다.
//! 표준편차는 모표준편차(n)입니다.

use dca_core::{format_ratio_pct, StrategyKind, YearMonth};
use serde::{Deserialize, Serialize};

use super::scenario::ScenarioResult;
use crate::performance::stats::{mean, percentile, population_std};

/// 전략별 승리 횟수.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WinCounts {
    pub lump_sum: usize,
    pub dca: usize,
}

impl WinCounts {
    pub fn total(&self) -> usize {
        self.lump_sum + self.dca
    }
}

/// 5/25/50/75/95 백분위수.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Percentiles {
    pub p5: f64,
    pub p25: f64,
    pub p50: f64,
    pub p75: f64,
    pub p95: f64,
}

impl Percentiles {
    fn of(values: &[f64]) -> Self {
        let at = |p| percentile(values, p).unwrap_or(0.0);
        Self {
            p5: at(5.0),
            p25: at(25.0),
            p50: at(50.0),
            p75: at(75.0),
            p95: at(95.0),
        }
    }
}

/// 수익률 분포 통계.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ReturnDistribution {
    pub mean: f64,
    pub std_dev: f64,
    pub min: f64,
    pub max: f64,
    pub percentiles: Percentiles,
}

impl ReturnDistribution {
    fn of(values: &[f64]) -> Self {
        if values.is_empty() {
            return Self::default();
        }
        Self {
            mean: mean(values).unwrap_or(0.0),
            std_dev: population_std(values).unwrap_or(0.0),
            min: values.iter().copied().fold(f64::INFINITY, f64::min),
            max: values.iter().copied().fold(f64::NEG_INFINITY, f64::max),
            percentiles: Percentiles::of(values),
        }
    }
}

/// 극값 시나리오 (시작 월과 해당 수익률).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScenarioExtreme {
    pub start: YearMonth,
    pub value: f64,
}

/// 최고/최악 시나리오.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct BestWorstScenarios {
    pub best_lump_sum: Option<ScenarioExtreme>,
    pub worst_lump_sum: Option<ScenarioExtreme>,
    pub best_dca: Option<ScenarioExtreme>,
    pub worst_dca: Option<ScenarioExtreme>,
}

/// 스윕 요약 통계.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SummaryStatistics {
    /// 집계한 시나리오 수
    pub scenario_count: usize,
    pub win_counts: WinCounts,
    pub lump_sum_win_rate: f64,
    pub dca_win_rate: f64,
    /// 일시투자 최종 수익률 분포
    pub lump_sum: ReturnDistribution,
    /// 적립투자 최종 수익률 분포
    pub dca: ReturnDistribution,
    /// 수익률 차이 (일시투자 - 적립투자) 분포
    pub return_difference: ReturnDistribution,
    pub extremes: BestWorstScenarios,
}

/// 시나리오 결과 목록을 집계합니다.
///
/// 비어 있으면 모든 값이 0이고 극값 시나리오는 `None`입니다.
pub fn aggregate(results: &[ScenarioResult]) -> SummaryStatistics {
    if results.is_empty() {
        return SummaryStatistics::default();
    }

    let n = results.len();
    let lump_sum_wins = results
        .iter()
        .filter(|r| r.winner == StrategyKind::LumpSum)
        .count();
    let win_counts = WinCounts {
        lump_sum: lump_sum_wins,
        dca: n - lump_sum_wins,
    };

    let lump_returns: Vec<f64> = results.iter().map(|r| r.lump_sum.final_return).collect();
    let dca_returns: Vec<f64> = results.iter().map(|r| r.dca.final_return).collect();
    let differences: Vec<f64> = results.iter().map(|r| r.return_difference).collect();

    SummaryStatistics {
        scenario_count: n,
        win_counts,
        lump_sum_win_rate: win_counts.lump_sum as f64 / n as f64,
        dca_win_rate: win_counts.dca as f64 / n as f64,
        lump_sum: ReturnDistribution::of(&lump_returns),
        dca: ReturnDistribution::of(&dca_returns),
        return_difference: ReturnDistribution::of(&differences),
        extremes: BestWorstScenarios {
            best_lump_sum: extreme(results, |r| r.lump_sum.final_return, Extreme::Max),
            worst_lump_sum: extreme(results, |r| r.lump_sum.final_return, Extreme::Min),
            best_dca: extreme(results, |r| r.dca.final_return, Extreme::Max),
            worst_dca: extreme(results, |r| r.dca.final_return, Extreme::Min),
        },
    }
}

#[derive(Clone, Copy)]
enum Extreme {
    Max,
    Min,
}

/// 동률이면 먼저 나온 시나리오를 선택합니다.
fn extreme(
    results: &[ScenarioResult],
    key: impl Fn(&ScenarioResult) -> f64,
    which: Extreme,
) -> Option<ScenarioExtreme> {
    results
        .iter()
        .map(|r| ScenarioExtreme {
            start: r.start,
            value: key(r),
        })
        .reduce(|best, next| {
            let better = match which {
                Extreme::Max => next.value > best.value,
                Extreme::Min => next.value < best.value,
            };
            if better {
                next
            } else {
                best
            }
        })
}

impl SummaryStatistics {
    /// 요약 통계를 여러 줄 문자열로 반환합니다.
    pub fn summary(&self) -> String {
        let fmt_extreme = |e: Option<ScenarioExtreme>| match e {
            Some(e) => format!("{} ({})", format_ratio_pct(e.value), e.start),
            None => "-".to_string(),
        };

        format!(
            "시나리오: {} | 일시투자 승: {} ({}) | 적립투자 승: {} ({})\n\
             평균 수익률: 일시투자 {} ± {} | 적립투자 {} ± {}\n\
             평균 수익률 차이: {} (중앙값 {})\n\
             일시투자 최고 {} / 최악 {}\n\
             적립투자 최고 {} / 최악 {}",
            self.scenario_count,
            self.win_counts.lump_sum,
            format_ratio_pct(self.lump_sum_win_rate),
            self.win_counts.dca,
            format_ratio_pct(self.dca_win_rate),
            format_ratio_pct(self.lump_sum.mean),
            format_ratio_pct(self.lump_sum.std_dev),
            format_ratio_pct(self.dca.mean),
            format_ratio_pct(self.dca.std_dev),
            format_ratio_pct(self.return_difference.mean),
            format_ratio_pct(self.return_difference.percentiles.p50),
            fmt_extreme(self.extremes.best_lump_sum),
            fmt_extreme(self.extremes.worst_lump_sum),
            fmt_extreme(self.extremes.best_dca),
            fmt_extreme(self.extremes.worst_dca),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::performance::Metrics;
    use chrono::NaiveDate;
    use rust_decimal::Decimal;

    fn result(month: u32, lump: f64, dca: f64) -> ScenarioResult {
        let lump_sum = Metrics {
            final_return: lump,
            ..Default::default()
        };
        let dca_metrics = Metrics {
            final_return: dca,
            ..Default::default()
        };
        let date = NaiveDate::from_ymd_opt(2000, month, 1).unwrap();

        ScenarioResult {
            start: YearMonth::new(2000, month).unwrap(),
            start_date: date,
            end_date: date,
            trading_days: 0,
            start_price: Decimal::ONE,
            end_price: Decimal::ONE,
            lump_sum,
            dca: dca_metrics,
            dca_average_price: Decimal::ZERO,
            dca_total_shares: Decimal::ZERO,
            winner: if lump > dca { StrategyKind::LumpSum } else { StrategyKind::Dca },
            return_difference: lump - dca,
            cagr_difference: 0.0,
            value_difference: Decimal::ZERO,
        }
    }

    #[test]
    fn test_empty_input() {
        let stats = aggregate(&[]);
        assert_eq!(stats, SummaryStatistics::default());
        assert!(stats.extremes.best_lump_sum.is_none());
    }

    #[test]
    fn test_win_counts_and_rates() {
        let results = vec![
            result(1, 0.5, 0.3),
            result(2, 0.1, 0.2),
            result(3, 0.4, 0.4),
            result(4, 0.9, 0.1),
        ];
        let stats = aggregate(&results);

        assert_eq!(stats.win_counts, WinCounts { lump_sum: 2, dca: 2 });
        assert_eq!(stats.win_counts.total(), stats.scenario_count);
        assert!((stats.lump_sum_win_rate + stats.dca_win_rate - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_distribution_and_extremes() {
        let results = vec![result(1, 0.2, 0.1), result(2, 0.4, 0.1), result(3, 0.4, 0.3)];
        let stats = aggregate(&results);

        assert!((stats.lump_sum.mean - (1.0 / 3.0)).abs() < 1e-12);
        assert!((stats.lump_sum.min - 0.2).abs() < 1e-12);
        assert!((stats.lump_sum.max - 0.4).abs() < 1e-12);
        assert!((stats.dca.percentiles.p50 - 0.1).abs() < 1e-12);

        // 동률이면 먼저 나온 시나리오
        let best = stats.extremes.best_lump_sum.unwrap();
        assert_eq!(best.start, YearMonth::new(2000, 2).unwrap());
        let worst_dca = stats.extremes.worst_dca.unwrap();
        assert_eq!(worst_dca.start, YearMonth::new(2000, 1).unwrap());
    }

    #[test]
    fn test_population_std() {
        let results = vec![result(1, 0.0, 0.0), result(2, 0.2, 0.0)];
        let stats = aggregate(&results);
        assert!((stats.lump_sum.std_dev - 0.1).abs() < 1e-12);
        assert_eq!(stats.dca.std_dev, 0.0);
    }
}
