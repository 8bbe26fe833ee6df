//! 시뮬레이션 전반에서 사용되는 공통 타입.

mod decimal;
pub mod serde_float;

pub use decimal::*;
