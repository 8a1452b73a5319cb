//! CLI 명령어 구현 모듈.

pub mod bridge;
pub mod config;
pub mod fan;
pub mod output;
pub mod simulate;
