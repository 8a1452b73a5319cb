//! 여러 시드의 시나리오를 병렬로 평가해 포트폴리오 가치의 분위 띠(fan)를 만듭니다.
//!
//! 시드 `seed, seed + 1, ...`을 rayon으로 병렬 평가하고, 결과는 시드 순서로
//! 모으므로 스레드 수와 관계없이 같은 배치는 같은 결과를 냅니다.

use rayon::prelude::*;
use serde::Serialize;
use tracing::{debug, info};

use esg_core::{EsgError, EsgResult, RunConfig};

use crate::aggregation::{deflate, investment_process};
use crate::trajectory::SavingsTrajectory;

/// 기본 분위수.
const DEFAULT_PERCENTILES: [f64; 5] = [0.05, 0.25, 0.5, 0.75, 0.95];

/// Monte Carlo 배치 설정.
#[derive(Debug, Clone)]
pub struct MonteCarloConfig {
    pub trajectories: usize,
    pub horizon_months: usize,
    pub display_freq: usize,
    /// 첫 시나리오의 시드
    pub seed: i64,
    /// 가치를 물가지수로 나눠 실질 값으로 보고할지 여부
    pub adjust_for_inflation: bool,
    pub percentiles: Vec<f64>,
}

impl Default for MonteCarloConfig {
    fn default() -> Self {
        Self {
            trajectories: 100,
            horizon_months: 240,
            display_freq: 12,
            seed: 1,
            adjust_for_inflation: false,
            percentiles: DEFAULT_PERCENTILES.to_vec(),
        }
    }
}

impl From<&RunConfig> for MonteCarloConfig {
    fn from(run: &RunConfig) -> Self {
        Self {
            trajectories: run.trajectories,
            horizon_months: run.horizon_months,
            display_freq: run.display_freq,
            seed: run.seed,
            ..Default::default()
        }
    }
}

/// 한 분위수의 보고 시점별 가치.
#[derive(Debug, Clone, Serialize)]
pub struct PercentileBand {
    pub percentile: f64,
    pub values: Vec<f64>,
}

/// Monte Carlo 배치 결과.
#[derive(Debug, Clone, Serialize)]
pub struct FanChart {
    /// 보고 시점 (각 구간의 마지막 월)
    pub months: Vec<i64>,
    pub percentiles: Vec<PercentileBand>,
    /// 보고 시점별 평균 가치
    pub mean: Vec<f64>,
    /// 초기 상태가 유지될 때의 기대 가치
    pub theoretic: Vec<f64>,
    /// 시드 순서의 시나리오별 최종 가치
    pub final_values: Vec<f64>,
    /// 최종 가치가 초기 가치보다 작은 비율
    pub probability_of_loss: f64,
}

/// 시나리오 하나의 보고 시점별 가치.
fn trajectory_values(trajectory: &SavingsTrajectory, config: &MonteCarloConfig, seed: i64) -> EsgResult<Vec<f64>> {
    let realization = trajectory.pick(seed);
    let process = investment_process(
        config.display_freq,
        &realization.investments,
        &realization.sentiment,
        trajectory.market(),
    )?;

    let rows = process.materialize(config.horizon_months);
    let values: Vec<f64> = rows.iter().map(|row| row.outcome.statistics.fv).collect();
    if config.adjust_for_inflation {
        let cpi: Vec<f64> = rows.iter().map(|row| row.cpi).collect();
        deflate(&values, &cpi)
    } else {
        Ok(values)
    }
}

/// 정렬된 값에서 `p` 분위수 (`round(p·(n-1))`번째 값).
fn percentile_of_sorted(sorted: &[f64], p: f64) -> f64 {
    if sorted.is_empty() {
        return f64::NAN;
    }
    let idx = (p * (sorted.len() as f64 - 1.0)).round() as usize;
    sorted[idx.min(sorted.len() - 1)]
}

/// 시드 `config.seed..config.seed + trajectories`의 시나리오를 병렬로 평가합니다.
///
/// `on_trajectory`는 시나리오 하나가 끝날 때마다 (임의의 스레드에서) 호출됩니다.
///
/// # Errors
///
/// 시나리오 수나 보고 주기가 0이거나, 분위수가 `[0, 1]` 밖이거나, 기간이
/// 보고 주기보다 짧으면 [`EsgError::InvalidArgument`]를 반환합니다.
pub fn run_monte_carlo<F>(
    trajectory: &SavingsTrajectory,
    config: &MonteCarloConfig,
    on_trajectory: F,
) -> EsgResult<FanChart>
where
    F: Fn() + Send + Sync,
{
    if config.trajectories == 0 {
        return Err(EsgError::invalid_argument("trajectories must be positive"));
    }
    if config.display_freq == 0 {
        return Err(EsgError::invalid_argument("display_freq must be positive"));
    }
    if config.horizon_months < config.display_freq {
        return Err(EsgError::invalid_argument(
            "horizon_months must cover at least one reporting period",
        ));
    }
    if config.percentiles.iter().any(|p| !(0.0..=1.0).contains(p)) {
        return Err(EsgError::invalid_argument("percentiles must lie in [0, 1]"));
    }

    info!(
        trajectories = config.trajectories,
        horizon_months = config.horizon_months,
        seed = config.seed,
        strategy = trajectory.strategy_name(),
        "running Monte Carlo batch"
    );

    let paths: Vec<Vec<f64>> = (0..config.trajectories)
        .into_par_iter()
        .map(|k| {
            let values = trajectory_values(trajectory, config, config.seed.wrapping_add(k as i64));
            on_trajectory();
            values
        })
        .collect::<EsgResult<_>>()?;

    let rows = config.horizon_months / config.display_freq;
    let months: Vec<i64> = (1..=rows)
        .map(|r| (r * config.display_freq) as i64 - 1)
        .collect();

    let n = paths.len() as f64;
    let mut columns: Vec<Vec<f64>> = (0..rows)
        .map(|r| paths.iter().map(|path| path[r]).collect())
        .collect();

    let mean = columns.iter().map(|column| column.iter().sum::<f64>() / n).collect();
    for column in &mut columns {
        column.sort_by(f64::total_cmp);
    }
    let percentiles = config
        .percentiles
        .iter()
        .map(|&percentile| PercentileBand {
            percentile,
            values: columns
                .iter()
                .map(|column| percentile_of_sorted(column, percentile))
                .collect(),
        })
        .collect();

    let monthly_theoretic = trajectory.theoretic_value(config.horizon_months);
    let theoretic = months
        .iter()
        .map(|&month| monthly_theoretic[month as usize])
        .collect();

    let final_values: Vec<f64> = paths.iter().map(|path| path[rows - 1]).collect();
    let losses = final_values
        .iter()
        .filter(|&&value| value < trajectory.starting_pv())
        .count();
    let probability_of_loss = losses as f64 / n;

    debug!(probability_of_loss, "Monte Carlo batch finished");

    Ok(FanChart {
        months,
        percentiles,
        mean,
        theoretic,
        final_values,
        probability_of_loss,
    })
}
