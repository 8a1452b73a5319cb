//! 이산 브라운 브리지.

use rand::Rng;
use tracing::debug;

use super::lcg::Lcg;
use super::normal::NormalSampler;
use crate::error::{EsgError, EsgResult};

/// 시드를 지정하지 않았을 때 사용하는 임의 시드의 상한 (미포함).
const UNSEEDED_RANGE: i64 = 1_000_000;

/// 양 끝점이 고정된 길이 `steps`의 이산 브라운 경로를 생성합니다.
///
/// 표준편차 `std`의 정규 증분 `steps - 1`개로 0에서 시작하는 랜덤워크를 만든 뒤,
/// 첫 값이 `start`, 마지막 값이 `end`가 되도록 선형 보정합니다.
/// 첫 값은 정확히 `start`이며 마지막 값은 부동소수점 오차 범위에서 `end`입니다.
///
/// `seed`가 `None`이면 `[0, 1_000_000)` 범위의 시드를 임의로 뽑습니다.
///
/// # Errors
///
/// `steps < 2`이면 양 끝점을 정의할 수 없으므로 [`EsgError::InvalidArgument`]를
/// 반환합니다.
pub fn random_discrete_bridge(
    steps: usize,
    start: f64,
    end: f64,
    std: f64,
    seed: Option<i64>,
) -> EsgResult<Vec<f64>> {
    if steps < 2 {
        return Err(EsgError::invalid_argument(format!(
            "bridge needs at least 2 points, got {}",
            steps
        )));
    }

    let seed = seed.unwrap_or_else(|| {
        let drawn = rand::thread_rng().gen_range(0..UNSEEDED_RANGE);
        debug!(seed = drawn, "bridge seed drawn");
        drawn
    });

    let increments = NormalSampler::new(Lcg::new(seed), 0.0, std).take(steps - 1);
    let mut levels = Vec::with_capacity(steps);
    levels.push(0.0);
    for increment in increments {
        let last = levels[levels.len() - 1];
        levels.push(last + increment);
    }

    let start_offset = start - levels[0];
    let slope = end - start_offset - levels[steps - 1];
    let span = (steps - 1) as f64;

    Ok(levels
        .iter()
        .enumerate()
        .map(|(i, v)| v + start_offset + slope * (i as f64 / span))
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    const FIXED_SEED: i64 = 9881239;

    #[test]
    fn test_endpoints_match() {
        let sample = random_discrete_bridge(100, -2.0, 2.0, 0.2, Some(FIXED_SEED)).unwrap();
        assert_eq!(sample[0], -2.0);
        assert!((sample[99] - 2.0).abs() < 1e-10);
    }

    #[test]
    fn test_generates_exactly_requested_points() {
        let sample = random_discrete_bridge(100, -2.0, 2.0, 0.2, Some(FIXED_SEED)).unwrap();
        assert_eq!(sample.len(), 100);
    }

    #[test]
    fn test_golden_path() {
        let sample = random_discrete_bridge(7, -2.0, 2.0, 0.2, Some(FIXED_SEED)).unwrap();
        let expected = [
            -2.0,
            -1.271420262599199,
            -0.5885040448117704,
            -0.02566586216310296,
            0.6244906893419837,
            1.1164715064455515,
            2.0,
        ];
        assert_eq!(sample.len(), expected.len());
        for (actual, expected) in sample.iter().zip(expected.iter()) {
            assert!((actual - expected).abs() < 1e-12, "{} != {}", actual, expected);
        }
    }

    #[test]
    fn test_two_points_is_straight_line() {
        let sample = random_discrete_bridge(2, 1.0, 3.0, 0.5, Some(1)).unwrap();
        assert_eq!(sample[0], 1.0);
        assert!((sample[1] - 3.0).abs() < 1e-12);
    }

    #[test]
    fn test_rejects_degenerate_length() {
        assert!(random_discrete_bridge(1, 0.0, 1.0, 0.2, Some(1)).is_err());
        assert!(random_discrete_bridge(0, 0.0, 1.0, 0.2, Some(1)).is_err());
    }

    #[test]
    fn test_unseeded_bridge_still_pins_endpoints() {
        let sample = random_discrete_bridge(10, 5.0, -5.0, 1.0, None).unwrap();
        assert_eq!(sample[0], 5.0);
        assert!((sample[9] + 5.0).abs() < 1e-10);
    }
}
