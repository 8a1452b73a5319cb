//! 상관된 다변량 정규 프로세스.
//!
//! 공분산 행렬의 대칭 제곱근 `S`(`S·S = Σ`)로 독립 표준 백색잡음을 섞습니다.
//! 콜레스키 분해 대신 대칭 제곱근을 쓰면 변수 순서에 따라 결과가 달라지지 않습니다.

use std::collections::BTreeMap;
use std::sync::Arc;

use nalgebra::DMatrix;

use super::noise::standard_white_noise;
use super::Random;
use crate::error::{EsgError, EsgResult};
use crate::process::Process;

/// 변수 이름으로 색인한 공분산 행렬.
pub type Covariance = BTreeMap<String, BTreeMap<String, f64>>;

/// 변수 색인마다 독립 잡음의 시드에 더하는 간격 (소수).
pub const SEED_OFFSET_PER_IDX: i64 = 27_644_437;

const SYMMETRY_TOLERANCE: f64 = 1e-12;

/// 대칭 양의 준정부호 행렬의 대칭 제곱근 `V·diag(√λ)·Vᵀ`.
///
/// 수치 오차로 생긴 음의 고유값은 0으로 잘라냅니다.
pub fn symmetric_sqrt(matrix: &DMatrix<f64>) -> DMatrix<f64> {
    if matrix.is_empty() {
        return matrix.clone();
    }
    let mut eigen = matrix.clone().symmetric_eigen();
    eigen.eigenvalues.apply(|lambda| *lambda = lambda.max(0.0).sqrt());
    eigen.recompose()
}

fn to_matrix(cov: &Covariance, keys: &[String]) -> EsgResult<DMatrix<f64>> {
    let entry = |row: &String, col: &String| -> EsgResult<f64> {
        cov.get(row)
            .and_then(|r| r.get(col))
            .copied()
            .filter(|v| v.is_finite())
            .ok_or_else(|| {
                EsgError::invalid_argument(format!(
                    "covariance entry ({}, {}) is missing or not finite",
                    row, col
                ))
            })
    };

    let n = keys.len();
    let mut matrix = DMatrix::zeros(n, n);
    for (i, row) in keys.iter().enumerate() {
        if cov[row].len() != n {
            return Err(EsgError::DimensionMismatch {
                expected: n,
                actual: cov[row].len(),
            });
        }
        for (j, col) in keys.iter().enumerate() {
            matrix[(i, j)] = entry(row, col)?;
        }
    }

    for i in 0..n {
        for j in (i + 1)..n {
            if (matrix[(i, j)] - matrix[(j, i)]).abs() > SYMMETRY_TOLERANCE {
                return Err(EsgError::invalid_argument(format!(
                    "covariance is not symmetric at ({}, {})",
                    keys[i], keys[j]
                )));
            }
        }
    }
    Ok(matrix)
}

/// 주어진 공분산을 갖는 다변량 표준 정규 프로세스 묶음.
///
/// 변수는 이름 순으로 정렬되며, `k`번째 변수의 독립 잡음은
/// `seed + k * SEED_OFFSET_PER_IDX`로 시드됩니다. 변수 `i`의 값은
/// `Σ_j S[j][i] · z_j`입니다.
///
/// # Errors
///
/// 항목이 빠졌거나 유한하지 않거나 행렬이 대칭이 아니면 에러를 반환합니다.
pub fn mvnsims(cov: &Covariance) -> EsgResult<Random<BTreeMap<String, Process<f64>>>> {
    let keys: Vec<String> = cov.keys().cloned().collect();
    let root = symmetric_sqrt(&to_matrix(cov, &keys)?);

    let loadings: Vec<Arc<[f64]>> = (0..keys.len())
        .map(|i| root.column(i).iter().copied().collect())
        .collect();

    Ok(Random::new(move |seed| {
        let independent: Vec<Process<f64>> = (0..keys.len())
            .map(|idx| standard_white_noise().pick(seed.wrapping_add(idx as i64 * SEED_OFFSET_PER_IDX)))
            .collect();
        let draws = Process::sequence(independent);

        keys.iter()
            .zip(loadings.iter())
            .map(|(key, column)| {
                let column = Arc::clone(column);
                let variable = draws.map(move |z| column.iter().zip(z).map(|(a, b)| a * b).sum::<f64>());
                (key.clone(), variable)
            })
            .collect()
    }))
}
