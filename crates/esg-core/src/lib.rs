//! # ESG Core
//!
//! 배당 투자 시나리오 생성기의 핵심 구성요소를 제공합니다.
//!
//! 이 크레이트는 시뮬레이션 전반에서 사용되는 기본 타입을 제공합니다:
//! - 지연 평가되는 무한 프로세스(`Process`)와 조합자
//! - 시드 기반 난수 생성기 (LCG, 정규분포 변환)
//! - 랜덤 프로세스 라이브러리 (백색잡음, 평균회귀, 브라운 브리지, 다변량 정규)
//! - 증권, 포트폴리오, 거래 도메인 모델
//! - 설정 관리
//! - 로깅 인프라

pub mod config;
pub mod domain;
pub mod error;
pub mod logging;
pub mod process;
pub mod random;
pub mod stats;
pub mod types;

pub use config::*;
pub use domain::*;
pub use error::*;
pub use logging::*;
pub use process::{count, Process, ProcessIter};
pub use random::{
    lcg, mvnsims, random_discrete_bridge, random_mean_reverting, standard_white_noise,
    white_noise, Lcg, NormalSampler, Random, SEED_OFFSET_PER_IDX,
};
pub use stats::{correlation, sample_stats, SampleStats};
pub use types::*;
