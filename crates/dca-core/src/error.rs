//! 시뮬레이션 에러 타입.
//!
//! 이 모듈은 시뮬레이션 코어 전반에서 사용되는 에러 타입을 정의합니다.

use thiserror::Error;

use crate::domain::YearMonth;

/// 핵심 시뮬레이션 에러.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SimError {
    /// 설정 검증 실패
    #[error("설정 에러: {0}")]
    InvalidConfig(String),

    /// 가격 시계열 불변식 위반 (정렬, 중복, 비양수 종가)
    #[error("가격 시계열 에러: {0}")]
    InvalidSeries(String),

    /// 투자 시작 월에 거래일이 없음
    #[error("투자 시작 시점({0})에 거래일 데이터가 없습니다")]
    NoDataForStartPeriod(YearMonth),

    /// 시나리오 구간의 거래일 수가 최소 기준 미만
    #[error("데이터 부족: {start} 시작 구간 거래일 {actual}개 (최소 {required}개 필요)")]
    InsufficientHistory {
        start: YearMonth,
        actual: usize,
        required: usize,
    },
}

/// 시뮬레이션 작업을 위한 Result 타입.
pub type SimResult<T> = Result<T, SimError>;

impl SimError {
    /// 롤링 분석에서 개별 시나리오 실패로 처리되는 에러인지 확인합니다.
    ///
    /// 이 에러들은 스윕 전체를 중단시키지 않고 해당 시나리오만 제외합니다.
    pub fn is_scenario_failure(&self) -> bool {
        matches!(
            self,
            SimError::NoDataForStartPeriod(_) | SimError::InsufficientHistory { .. }
        )
    }

    /// 입력 데이터/설정 자체의 결함인지 확인합니다.
    pub fn is_input_defect(&self) -> bool {
        matches!(self, SimError::InvalidConfig(_) | SimError::InvalidSeries(_))
    }
}
