//! 단일 시드 시나리오 보고서.

use anyhow::Result;
use serde::Serialize;
use std::collections::BTreeMap;
use tracing::info;

use esg_core::{simulation_span, InstrumentId, SimulationConfig};
use esg_valuation::{investment_process, ReportRow, SavingsTrajectory, Sentiments};

use super::output::{money, render, write_output, OutputFormat, Table};

/// simulate 명령 설정.
#[derive(Debug)]
pub struct SimulateConfig {
    pub simulation: SimulationConfig,
    /// 물가지수로 나눈 실질 값 열을 함께 보고
    pub adjust_for_inflation: bool,
    pub format: OutputFormat,
    pub output: Option<String>,
}

/// 보고 구간 요약.
#[derive(Debug, Clone, Serialize)]
pub struct PeriodSummary {
    pub month: i64,
    pub fv: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub real_fv: Option<f64>,
    pub theoretic: f64,
    pub dividends: f64,
    pub savings: f64,
    pub net_bought: f64,
    pub paid_out: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shortfall: Option<f64>,
    pub cpi: f64,
    pub discount_rates: BTreeMap<InstrumentId, f64>,
}

impl PeriodSummary {
    fn from_row(row: &ReportRow<Sentiments>, theoretic: f64, adjust_for_inflation: bool) -> Self {
        let statistics = &row.outcome.statistics;
        Self {
            month: row.month,
            fv: statistics.fv,
            real_fv: adjust_for_inflation.then(|| statistics.fv / row.cpi),
            theoretic,
            dividends: statistics.total_dividends,
            savings: statistics.external_cashflow,
            net_bought: statistics.net_bought_dollar(),
            paid_out: statistics.paid_out_dividends(),
            shortfall: statistics.shortfall,
            cpi: row.cpi,
            discount_rates: row
                .sentiment
                .iter()
                .map(|(id, sentiment)| (id.clone(), sentiment.discount_rate))
                .collect(),
        }
    }
}

/// 설정의 시드로 시나리오 하나를 실현해 보고 구간별 요약을 만듭니다.
pub fn summarize(config: &SimulationConfig, adjust_for_inflation: bool) -> Result<Vec<PeriodSummary>> {
    let run = &config.simulation;
    let trajectory = SavingsTrajectory::from_config(config)?;
    let realization = trajectory.pick(run.seed);
    let process = investment_process(
        run.display_freq,
        &realization.investments,
        &realization.sentiment,
        trajectory.market(),
    )?;
    let theoretic = trajectory.theoretic_value(run.horizon_months);

    Ok(process
        .materialize(run.horizon_months)
        .iter()
        .map(|row| PeriodSummary::from_row(row, theoretic[row.month as usize], adjust_for_inflation))
        .collect())
}

fn to_table(summaries: &[PeriodSummary], adjust_for_inflation: bool) -> Table {
    let mut headers = vec!["month", "fv"];
    if adjust_for_inflation {
        headers.push("real_fv");
    }
    headers.extend(["theoretic", "dividends", "savings", "net_bought", "paid_out", "shortfall"]);

    let mut table = Table::new(headers);
    for summary in summaries {
        let mut row = vec![summary.month.to_string(), money(summary.fv)];
        if let Some(real_fv) = summary.real_fv {
            row.push(money(real_fv));
        }
        row.extend([
            money(summary.theoretic),
            money(summary.dividends),
            money(summary.savings),
            money(summary.net_bought),
            money(summary.paid_out),
            summary.shortfall.map_or_else(|| "-".to_string(), money),
        ]);
        table.push(row);
    }
    table
}

/// simulate 명령 실행. 출력한 행 수를 반환합니다.
pub fn run_simulate(config: SimulateConfig) -> Result<usize> {
    let run = &config.simulation.simulation;
    let span = simulation_span!("simulate", run.seed, run.strategy);
    let _guard = span.enter();

    let summaries = summarize(&config.simulation, config.adjust_for_inflation)?;
    let table = to_table(&summaries, config.adjust_for_inflation);
    let content = render(config.format, &table, &summaries)?;
    write_output(&content, config.output.as_deref())?;

    info!(rows = summaries.len(), "simulation report written");
    Ok(summaries.len())
}
