//! 배당 투자 시뮬레이션의 도메인 모델.

mod market;
mod portfolio;
mod statistics;

pub use market::*;
pub use portfolio::*;
pub use statistics::*;
