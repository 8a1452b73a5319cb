//! Monte Carlo 분위 띠 보고서.

use anyhow::Result;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::info;

use esg_core::{simulation_span, SimulationConfig};
use esg_valuation::{run_monte_carlo, FanChart, MonteCarloConfig, SavingsTrajectory};

use super::output::{money, render, write_output, OutputFormat, Table};

/// fan 명령 설정.
#[derive(Debug)]
pub struct FanConfig {
    pub simulation: SimulationConfig,
    pub adjust_for_inflation: bool,
    pub format: OutputFormat,
    pub output: Option<String>,
    /// 진행률 표시 여부
    pub progress: bool,
}

fn progress_bar(total: usize, visible: bool) -> Result<ProgressBar> {
    if !visible {
        return Ok(ProgressBar::hidden());
    }
    let pb = ProgressBar::new(total as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({eta})")?
            .progress_chars("#>-"),
    );
    Ok(pb)
}

fn to_table(fan: &FanChart) -> Table {
    let mut headers = vec!["month".to_string()];
    headers.extend(fan.percentiles.iter().map(|band| format!("p{}", (band.percentile * 100.0).round())));
    headers.extend(["mean".to_string(), "theoretic".to_string()]);

    let mut table = Table::new(headers);
    for (r, month) in fan.months.iter().enumerate() {
        let mut row = vec![month.to_string()];
        row.extend(fan.percentiles.iter().map(|band| money(band.values[r])));
        row.push(money(fan.mean[r]));
        row.push(money(fan.theoretic[r]));
        table.push(row);
    }
    table
}

/// fan 명령 실행.
pub fn run_fan(config: FanConfig) -> Result<FanChart> {
    let run = &config.simulation.simulation;
    let span = simulation_span!("fan", run.seed, run.strategy);
    let _guard = span.enter();

    let trajectory = SavingsTrajectory::from_config(&config.simulation)?;
    let monte_carlo = MonteCarloConfig {
        adjust_for_inflation: config.adjust_for_inflation,
        ..MonteCarloConfig::from(run)
    };

    let pb = progress_bar(monte_carlo.trajectories, config.progress)?;
    let fan = run_monte_carlo(&trajectory, &monte_carlo, || pb.inc(1))?;
    pb.finish_and_clear();

    let content = render(config.format, &to_table(&fan), &fan)?;
    write_output(&content, config.output.as_deref())?;

    info!(
        trajectories = monte_carlo.trajectories,
        probability_of_loss = fan.probability_of_loss,
        "fan chart written"
    );
    Ok(fan)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fan_table_headers() {
        let mut simulation = SimulationConfig::default();
        simulation.simulation.trajectories = 4;
        simulation.simulation.horizon_months = 24;

        let trajectory = SavingsTrajectory::from_config(&simulation).unwrap();
        let fan = run_monte_carlo(&trajectory, &MonteCarloConfig::from(&simulation.simulation), || {}).unwrap();
        let table = to_table(&fan);

        assert_eq!(
            table.headers,
            vec!["month", "p5", "p25", "p50", "p75", "p95", "mean", "theoretic"]
        );
        assert_eq!(table.rows.len(), 2);
        assert_eq!(table.rows[1][0], "23");
    }
}
