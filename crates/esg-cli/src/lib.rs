//! 배당 투자 시나리오 생성기 CLI.
//!
//! 이 crate는 다음 기능을 제공합니다:
//! - 단일 시드 시나리오 보고서
//! - Monte Carlo 분위 띠
//! - 이산 브라운 브리지 생성
//! - 유효 설정 출력

pub mod commands;
