//! 시뮬레이션을 위한 도메인 모델.

mod calendar;
mod investment;
mod price;
mod trade;

pub use calendar::*;
pub use investment::*;
pub use price::*;
pub use trade::*;
