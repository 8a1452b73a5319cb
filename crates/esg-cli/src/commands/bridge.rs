//! 이산 브라운 브리지 출력.

use anyhow::Result;
use serde::Serialize;
use tracing::info;

use esg_core::random_discrete_bridge;

use super::output::{render, write_output, OutputFormat, Table};

/// bridge 명령 설정.
#[derive(Debug)]
pub struct BridgeConfig {
    pub steps: usize,
    pub start: f64,
    pub end: f64,
    pub std: f64,
    pub seed: Option<i64>,
    pub format: OutputFormat,
    pub output: Option<String>,
}

#[derive(Debug, Serialize)]
struct BridgePoint {
    step: usize,
    value: f64,
}

/// bridge 명령 실행. 생성한 경로를 반환합니다.
pub fn run_bridge(config: BridgeConfig) -> Result<Vec<f64>> {
    let path = random_discrete_bridge(config.steps, config.start, config.end, config.std, config.seed)?;

    let points: Vec<BridgePoint> = path
        .iter()
        .enumerate()
        .map(|(step, &value)| BridgePoint { step, value })
        .collect();
    let mut table = Table::new(["step", "value"]);
    for point in &points {
        table.push(vec![point.step.to_string(), format!("{:.6}", point.value)]);
    }

    let content = render(config.format, &table, &points)?;
    write_output(&content, config.output.as_deref())?;

    info!(steps = config.steps, "bridge written");
    Ok(path)
}
