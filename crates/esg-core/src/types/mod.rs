//! 시뮬레이션 전반에서 사용되는 공통 타입.

mod instrument;

pub use instrument::*;
