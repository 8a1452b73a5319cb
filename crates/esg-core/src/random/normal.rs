//! 정규분포 변환.
//!
//! Marsaglia 극좌표 방식의 Box–Muller 변환으로, 시도마다 균등 난수 두 개를 소비하고
//! (`r = 0` 또는 `r > 1`이면 기각) 남은 한 개의 변량은 다음 호출을 위해 보관합니다.
//! 연산 순서까지 참조 구현(d3-random `randomNormal`)과 같아 비트 단위로 같은
//! 결과를 냅니다.

use super::lcg::Lcg;

/// 평균과 표준편차를 가진 정규분포 표본 추출기.
#[derive(Debug, Clone)]
pub struct NormalSampler {
    source: Lcg,
    mean: f64,
    std: f64,
    /// 이전 시도에서 남은 변량과 그 반지름 제곱
    spare: Option<(f64, f64)>,
}

impl NormalSampler {
    /// 균등 난수 생성기로 추출기를 생성합니다.
    pub fn new(source: Lcg, mean: f64, std: f64) -> Self {
        Self {
            source,
            mean,
            std,
            spare: None,
        }
    }

    /// 표준 정규분포 추출기를 생성합니다.
    pub fn standard(source: Lcg) -> Self {
        Self::new(source, 0.0, 1.0)
    }

    /// 다음 정규 변량을 추출합니다.
    pub fn sample(&mut self) -> f64 {
        let (y, r) = match self.spare.take() {
            Some(spare) => spare,
            None => loop {
                let x = self.source.next_unit() * 2.0 - 1.0;
                let y = self.source.next_unit() * 2.0 - 1.0;
                let r = x * x + y * y;
                if r != 0.0 && r <= 1.0 {
                    self.spare = Some((x, r));
                    break (y, r);
                }
            },
        };
        self.mean + self.std * y * (-2.0 * r.ln() / r).sqrt()
    }
}

impl Iterator for NormalSampler {
    type Item = f64;

    fn next(&mut self) -> Option<f64> {
        Some(self.sample())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stats::sample_stats;

    #[test]
    fn test_same_seed_same_draws() {
        let a: Vec<f64> = NormalSampler::standard(Lcg::new(42)).take(50).collect();
        let b: Vec<f64> = NormalSampler::standard(Lcg::new(42)).take(50).collect();
        assert_eq!(a, b);
    }

    #[test]
    fn test_spare_is_used_on_second_draw() {
        let mut sampler = NormalSampler::standard(Lcg::new(7));
        sampler.sample();
        assert!(sampler.spare.is_some());
        sampler.sample();
        assert!(sampler.spare.is_none());
    }

    #[test]
    fn test_moments_of_a_long_stream() {
        let draws: Vec<f64> = NormalSampler::new(Lcg::new(2024), 1.5, 0.5)
            .take(20_000)
            .collect();
        let stats = sample_stats(&draws);
        assert!((stats.mean - 1.5).abs() < 0.02);
        assert!((stats.std - 0.5).abs() < 0.02);
    }
}
