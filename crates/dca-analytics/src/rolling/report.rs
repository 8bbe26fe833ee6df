//! 롤링 스윕 리포트.

use dca_core::{ScenarioConfig, YearMonth};
use serde::Serialize;

use super::aggregate::{aggregate, SummaryStatistics};
use super::scenario::{ScenarioFailure, ScenarioResult, ScenarioState};

/// 시나리오 하나의 최종 결과.
#[derive(Debug, Clone)]
pub(crate) enum ScenarioOutcome {
    Succeeded(Box<ScenarioResult>),
    Failed(ScenarioFailure),
    /// 취소로 시작되지 못함
    NotRun,
}

/// 롤링 스윕 결과 리포트.
///
/// 성공 결과와 실패 목록은 시작 월 순으로 정렬되어 있습니다.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SweepReport {
    /// 스윕 설정
    pub config: ScenarioConfig,
    /// 생성된 시나리오 수
    pub attempted: usize,
    /// 성공한 시나리오
    pub results: Vec<ScenarioResult>,
    /// 실패한 시나리오와 사유
    pub failures: Vec<ScenarioFailure>,
    /// 취소로 실행되지 않은 시나리오의 시작 월
    pub not_run: Vec<YearMonth>,
    /// 성공 시나리오 집계
    pub summary: SummaryStatistics,
}

impl SweepReport {
    pub(crate) fn from_outcomes(
        config: ScenarioConfig,
        mut outcomes: Vec<(YearMonth, ScenarioOutcome)>,
    ) -> Self {
        outcomes.sort_by_key(|(start, _)| *start);

        let attempted = outcomes.len();
        let mut results = Vec::new();
        let mut failures = Vec::new();
        let mut not_run = Vec::new();

        for (start, outcome) in outcomes {
            match outcome {
                ScenarioOutcome::Succeeded(result) => results.push(*result),
                ScenarioOutcome::Failed(failure) => failures.push(failure),
                ScenarioOutcome::NotRun => not_run.push(start),
            }
        }

        let summary = aggregate(&results);

        Self {
            config,
            attempted,
            results,
            failures,
            not_run,
            summary,
        }
    }

    pub fn success_count(&self) -> usize {
        self.results.len()
    }

    pub fn failure_count(&self) -> usize {
        self.failures.len()
    }

    pub fn not_run_count(&self) -> usize {
        self.not_run.len()
    }

    /// 취소 없이 모든 시나리오가 실행되었는지 확인합니다.
    pub fn is_complete(&self) -> bool {
        self.not_run.is_empty()
    }

    /// 특정 시작 월 시나리오의 최종 상태.
    pub fn state_of(&self, start: YearMonth) -> Option<ScenarioState> {
        if self.results.iter().any(|r| r.start == start) {
            return Some(ScenarioState::Succeeded);
        }
        if let Some(f) = self.failures.iter().find(|f| f.start == start) {
            return Some(ScenarioState::Failed(f.kind));
        }
        if self.not_run.contains(&start) {
            return Some(ScenarioState::Pending);
        }
        None
    }

    /// 성공률 (%).
    pub fn success_rate(&self) -> f64 {
        if self.attempted == 0 {
            0.0
        } else {
            (self.success_count() as f64 / self.attempted as f64) * 100.0
        }
    }

    /// 스윕 요약을 구조화 로그로 출력합니다.
    pub fn log_summary(&self) {
        tracing::info!(
            attempted = self.attempted,
            succeeded = self.success_count(),
            failed = self.failure_count(),
            not_run = self.not_run_count(),
            lump_sum_wins = self.summary.win_counts.lump_sum,
            dca_wins = self.summary.win_counts.dca,
            success_rate = %format!("{:.1}%", self.success_rate()),
            "롤링 분석 완료"
        );
    }

    /// 리포트를 여러 줄 문자열로 반환합니다.
    pub fn summary(&self) -> String {
        format!(
            "롤링 분석 결과 요약\n\
             ═══════════════════════════════════════\n\
             스윕: {} → {} (투자 기간 {}년, DCA {}개월)\n\
             시나리오: {} | 성공: {} | 실패: {} | 미실행: {}\n\
             ───────────────────────────────────────\n\
             {}\n\
             ═══════════════════════════════════════",
            self.config.sweep_start(),
            self.config.sweep_end(),
            self.config.horizon_years(),
            self.config.dca_installment_months(),
            self.attempted,
            self.success_count(),
            self.failure_count(),
            self.not_run_count(),
            self.summary.summary(),
        )
    }
}
