//! 백색잡음과 평균회귀 프로세스.
//!
//! 백색잡음의 n번째 값은 마스터 LCG의 n번째 균등 난수로 *새 생성기*를 시드하여
//! 한 번 추출한 값입니다. 하나의 생성기를 n번 호출하지 않으므로 각 단계가 독립적으로
//! 재현 가능하고 임의 위치로 병렬 탐색할 수 있습니다.
//!
//! 알려진 한계: 단계별 생성기의 상태가 마스터 수열과 겹치므로 인접한 단계의 정규
//! 변량이 같은 균등 난수를 공유합니다. 저차원 몬테카를로에는 충분하지만 고차원
//! 또는 준난수(quasi-random) 용도에는 적합하지 않습니다.

use super::lcg::{lcg, Lcg};
use super::normal::NormalSampler;
use super::Random;
use crate::process::Process;

/// 평균 `mean`, 표준편차 `std`의 i.i.d. 정규 프로세스.
pub fn white_noise(mean: f64, std: f64) -> Random<Process<f64>> {
    Random::new(move |seed| {
        lcg(seed).map(move |step_seed| NormalSampler::new(Lcg::from_real(*step_seed), mean, std).sample())
    })
}

/// 표준 정규 백색잡음 (`white_noise(0, 1)`).
pub fn standard_white_noise() -> Random<Process<f64>> {
    white_noise(0.0, 1.0)
}

/// 이산 시간 평균회귀(Ornstein–Uhlenbeck) 프로세스.
///
/// `x[t+1] = x[t] + nu * (ltm - x[t]) + std_resid * e[t]`, `e`는 표준 백색잡음입니다.
///
/// 반환되는 프로세스의 첫 값은 `x_0`의 *다음* 값입니다. `x_0`는 결정적인 출발점이며
/// 랜덤 출력에 포함되지 않습니다. 즉, 결과는 `driver`가 아니라 `driver.evolve()`에
/// 해당합니다.
///
/// # 매개변수
///
/// * `x_0` - 프로세스의 현재 수준
/// * `ltm` - 장기 평균
/// * `nu` - 평균회귀 강도
/// * `std_resid` - 잔차 표준편차
pub fn random_mean_reverting(x_0: f64, ltm: f64, nu: f64, std_resid: f64) -> Random<Process<f64>> {
    standard_white_noise().map(move |driver| {
        Process::fold(x_0, &driver, move |prev, residual| {
            prev + nu * (ltm - prev) + std_resid * residual
        })
        .evolve()
    })
}
