//! 표본 통계.

/// 표본의 평균과 모표준편차 (1/N).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SampleStats {
    pub mean: f64,
    pub std: f64,
}

/// 표본의 평균과 모표준편차를 계산합니다. 빈 표본은 NaN을 반환합니다.
pub fn sample_stats(sample: &[f64]) -> SampleStats {
    let n = sample.len() as f64;
    let mean = sample.iter().sum::<f64>() / n;
    let variance = sample.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n;
    SampleStats {
        mean,
        std: variance.sqrt(),
    }
}

/// 피어슨 상관계수.
///
/// 두 표본의 길이가 다르면 짧은 쪽에 맞춥니다.
pub fn correlation(sample_a: &[f64], sample_b: &[f64]) -> f64 {
    let n = sample_a.len().min(sample_b.len());
    let (a, b) = (&sample_a[..n], &sample_b[..n]);
    let stats_a = sample_stats(a);
    let stats_b = sample_stats(b);

    a.iter()
        .zip(b)
        .map(|(x, y)| (x - stats_a.mean) * (y - stats_b.mean) / (stats_a.std * stats_b.std))
        .sum::<f64>()
        / n as f64
}
