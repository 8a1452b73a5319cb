//! 시드 기반 난수와 랜덤 프로세스.
//!
//! 모든 난수는 정수 시드에서 결정적으로 생성됩니다. 같은 시드는 비트 단위로
//! 동일한 프로세스를, 다른 시드는 통계적으로 독립인 프로세스를 만듭니다.
//!
//! # 구성
//!
//! - [`lcg`]: 선형 합동 생성기 (참조 생성기와 비트 단위 호환)
//! - [`normal`]: 극좌표 Box–Muller 정규분포 변환
//! - [`noise`]: 백색잡음, 평균회귀 프로세스
//! - [`bridge`]: 이산 브라운 브리지
//! - [`multivariate`]: 대칭 제곱근을 이용한 상관 다변량 정규 프로세스

pub mod bridge;
pub mod lcg;
pub mod multivariate;
pub mod noise;
pub mod normal;

use std::fmt;
use std::sync::Arc;

pub use bridge::random_discrete_bridge;
pub use lcg::{lcg, Lcg};
pub use multivariate::{mvnsims, symmetric_sqrt, Covariance, SEED_OFFSET_PER_IDX};
pub use noise::{random_mean_reverting, standard_white_noise, white_noise};
pub use normal::NormalSampler;

/// 시드에서 값을 만드는 순수 함수.
///
/// 같은 시드로 `pick`하면 항상 같은 값을 얻습니다. 전역 상태나 기본 시드는
/// 없으며, 시드는 항상 호출자가 명시합니다.
pub struct Random<T> {
    pick: Arc<dyn Fn(i64) -> T + Send + Sync>,
}

impl<T> Clone for Random<T> {
    fn clone(&self) -> Self {
        Self {
            pick: Arc::clone(&self.pick),
        }
    }
}

impl<T> fmt::Debug for Random<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Random").finish_non_exhaustive()
    }
}

impl<T: 'static> Random<T> {
    /// 시드 함수로 생성합니다.
    pub fn new<F>(pick: F) -> Self
    where
        F: Fn(i64) -> T + Send + Sync + 'static,
    {
        Self {
            pick: Arc::new(pick),
        }
    }

    /// 주어진 시드의 실현값을 반환합니다.
    pub fn pick(&self, seed: i64) -> T {
        (self.pick)(seed)
    }

    /// 실현값에 `f`를 적용합니다 (시드는 그대로 전달).
    pub fn map<R, F>(&self, f: F) -> Random<R>
    where
        R: 'static,
        F: Fn(T) -> R + Send + Sync + 'static,
    {
        let inner = self.clone();
        Random::new(move |seed| f(inner.pick(seed)))
    }

    /// 두 랜덤 값을 같은 시드로 실현하여 묶습니다.
    pub fn zip<U: 'static>(&self, other: &Random<U>) -> Random<(T, U)> {
        let (left, right) = (self.clone(), other.clone());
        Random::new(move |seed| (left.pick(seed), right.pick(seed)))
    }

    /// 시드에 고정 오프셋을 더해 실현합니다.
    pub fn offset(&self, offset: i64) -> Random<T> {
        let inner = self.clone();
        Random::new(move |seed| inner.pick(seed.wrapping_add(offset)))
    }
}
