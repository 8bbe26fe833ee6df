//! CLI 도구 모음.
//!
//! 이 crate는 다음 기능을 제공합니다:
//! - 단일 시점 비교 (`backtest`)
//! - 롤링 분석 (`rolling`)
//! - 심볼 목록 (`symbols`)

pub mod commands;

pub use commands::*;
