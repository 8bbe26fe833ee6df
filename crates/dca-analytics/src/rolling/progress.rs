//! 스윕 진행 상태 추적.
//!
//! 시나리오마다 상태 전이 이력을 기록합니다 (스레드 안전).
//! `spawn_blocking` 워커들이 같은 추적기를 공유합니다.

use std::collections::BTreeMap;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use dca_core::YearMonth;
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info, warn};

use super::scenario::ScenarioState;

/// 상태별 시나리오 수.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgressCounts {
    pub pending: usize,
    pub running: usize,
    pub succeeded: usize,
    pub failed: usize,
}

impl ProgressCounts {
    pub fn total(&self) -> usize {
        self.pending + self.running + self.succeeded + self.failed
    }

    pub fn completed(&self) -> usize {
        self.succeeded + self.failed
    }
}

/// 스윕 진행 추적기.
#[derive(Debug, Clone, Default)]
pub struct SweepProgress {
    inner: Arc<RwLock<ProgressInner>>,
}

#[derive(Debug, Default)]
struct ProgressInner {
    /// 시나리오별 상태 이력 (마지막이 현재 상태)
    history: BTreeMap<YearMonth, Vec<ScenarioState>>,
    completed: usize,
}

impl SweepProgress {
    pub fn new() -> Self {
        Self::default()
    }

    /// 시나리오 목록을 `Pending`으로 등록합니다. 이전 기록은 지워집니다.
    pub fn register(&self, starts: &[YearMonth]) {
        let mut inner = self.write();
        inner.history = starts
            .iter()
            .map(|start| (*start, vec![ScenarioState::Pending]))
            .collect();
        inner.completed = 0;
    }

    /// 상태를 전이합니다.
    ///
    /// 등록되지 않은 시나리오이거나 허용되지 않는 전이이면 기록하지 않고 `false`.
    pub fn transition(&self, start: YearMonth, next: ScenarioState) -> bool {
        let mut inner = self.write();
        let total = inner.history.len();

        let Some(states) = inner.history.get_mut(&start) else {
            warn!(start = %start, "등록되지 않은 시나리오");
            return false;
        };
        let current = states.last().copied().unwrap_or(ScenarioState::Pending);
        if !current.can_transition_to(next) {
            warn!(start = %start, from = ?current, to = ?next, "허용되지 않는 상태 전이");
            return false;
        }
        states.push(next);

        if next.is_terminal() {
            inner.completed += 1;
            log_progress(inner.completed, total);
        } else {
            debug!(start = %start, "시나리오 시작");
        }
        true
    }

    /// 현재 상태.
    pub fn state(&self, start: YearMonth) -> Option<ScenarioState> {
        self.read()
            .history
            .get(&start)
            .and_then(|states| states.last().copied())
    }

    /// 상태 전이 이력. 등록되지 않았으면 비어 있습니다.
    pub fn history(&self, start: YearMonth) -> Vec<ScenarioState> {
        self.read().history.get(&start).cloned().unwrap_or_default()
    }

    /// 상태별 시나리오 수.
    pub fn counts(&self) -> ProgressCounts {
        let inner = self.read();
        let mut counts = ProgressCounts::default();
        for state in inner.history.values().filter_map(|states| states.last()) {
            match state {
                ScenarioState::Pending => counts.pending += 1,
                ScenarioState::Running => counts.running += 1,
                ScenarioState::Succeeded => counts.succeeded += 1,
                ScenarioState::Failed(_) => counts.failed += 1,
            }
        }
        counts
    }

    fn read(&self) -> RwLockReadGuard<'_, ProgressInner> {
        match self.inner.read() {
            Ok(guard) => guard,
            Err(poisoned) => {
                error!("SweepProgress RwLock poisoned (read), recovering");
                poisoned.into_inner()
            }
        }
    }

    fn write(&self) -> RwLockWriteGuard<'_, ProgressInner> {
        match self.inner.write() {
            Ok(guard) => guard,
            Err(poisoned) => {
                error!("SweepProgress RwLock poisoned (write), recovering");
                poisoned.into_inner()
            }
        }
    }
}

/// 완료 수가 전체의 10% 단위를 넘을 때마다 info 로그.
fn log_progress(completed: usize, total: usize) {
    let step = (total / 10).max(1);
    if completed % step == 0 || completed == total {
        info!(
            completed,
            total,
            percent = %format!("{:.0}%", completed as f64 / total.max(1) as f64 * 100.0),
            "롤링 분석 진행"
        );
    } else {
        debug!(completed, total, "시나리오 완료");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rolling::scenario::FailureKind;

    fn ym(year: i32, month: u32) -> YearMonth {
        YearMonth::new(year, month).unwrap()
    }

    #[test]
    fn test_lifecycle_is_recorded() {
        let progress = SweepProgress::new();
        progress.register(&[ym(2000, 1), ym(2000, 2), ym(2000, 3)]);

        assert!(progress.transition(ym(2000, 1), ScenarioState::Running));
        assert!(progress.transition(ym(2000, 1), ScenarioState::Succeeded));
        assert!(progress.transition(ym(2000, 2), ScenarioState::Running));

        assert_eq!(
            progress.history(ym(2000, 1)),
            vec![
                ScenarioState::Pending,
                ScenarioState::Running,
                ScenarioState::Succeeded
            ]
        );
        assert_eq!(progress.state(ym(2000, 2)), Some(ScenarioState::Running));
        assert_eq!(progress.state(ym(2000, 3)), Some(ScenarioState::Pending));
        assert_eq!(
            progress.counts(),
            ProgressCounts {
                pending: 1,
                running: 1,
                succeeded: 1,
                failed: 0
            }
        );
    }

    #[test]
    fn test_illegal_transitions_are_rejected() {
        let progress = SweepProgress::new();
        progress.register(&[ym(2000, 1)]);

        // Pending에서 바로 종료 상태로 갈 수 없음
        assert!(!progress.transition(ym(2000, 1), ScenarioState::Succeeded));
        assert!(progress.transition(ym(2000, 1), ScenarioState::Running));
        assert!(progress.transition(
            ym(2000, 1),
            ScenarioState::Failed(FailureKind::WorkerPanicked)
        ));
        // 종료 상태 이후 전이 불가
        assert!(!progress.transition(ym(2000, 1), ScenarioState::Running));
        assert!(!progress.transition(ym(1999, 12), ScenarioState::Running));

        assert_eq!(progress.history(ym(2000, 1)).len(), 3);
        assert!(progress.history(ym(1999, 12)).is_empty());
        assert_eq!(progress.counts().completed(), 1);
    }

    #[test]
    fn test_register_resets_history() {
        let progress = SweepProgress::new();
        progress.register(&[ym(2000, 1)]);
        progress.transition(ym(2000, 1), ScenarioState::Running);

        progress.register(&[ym(2000, 1), ym(2000, 2)]);
        assert_eq!(progress.counts().pending, 2);
        assert_eq!(progress.counts().total(), 2);
    }
}
