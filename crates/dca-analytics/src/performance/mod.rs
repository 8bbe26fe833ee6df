//! 성과 분석 모듈
//!
//! 전략 실행 결과의 성과를 측정하기 위한 도구를 제공합니다.
//!
//! # 모듈 구성
//!
//! - [`metrics`]: 성과 지표 계산 (CAGR, 최대낙폭, 샤프/소르티노, 승률 등)
//! - [`stats`]: 평균, 표준편차, 백분위수 헬퍼

pub mod metrics;
pub mod stats;

pub use metrics::*;
