//! # DCA Core
//!
//! 일시투자 vs 적립투자 시뮬레이션의 핵심 도메인 모델 및 타입을 제공합니다.
//!
//! 이 크레이트는 시뮬레이션 전반에서 사용되는 기본 타입을 제공합니다:
//! - 일별 가격 시계열 (`PriceSeries`)
//! - 연월 달력 타입 (`YearMonth`)
//! - 투자/시나리오 설정 값 객체
//! - 매수 거래 및 포트폴리오 원장
//! - 설정 관리
//! - 로깅 인프라

pub mod config;
pub mod domain;
pub mod error;
pub mod logging;
pub mod types;

pub use config::*;
pub use domain::*;
pub use error::*;
pub use logging::*;
pub use types::*;
