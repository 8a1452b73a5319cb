//! 배당 투자 시나리오 생성기 CLI.
//!
//! # 사용 예시
//!
//! ```bash
//! # 기본 설정으로 20년 시나리오 (연 단위 표)
//! esg simulate
//!
//! # 설정 파일, 시드 42, 10년, 분기 단위 CSV
//! esg simulate -c config/scenario.toml --seed 42 --years 10 --freq 3 --format csv
//!
//! # 500개 시나리오의 분위 띠
//! esg fan --trajectories 500 --format json -o fan.json
//!
//! # 0에서 1로 가는 50점 브리지
//! esg bridge -T 50 --start 0 --end 1 --std 0.1 --seed 7
//!
//! # 유효 설정 출력
//! esg config
//! ```

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use tracing::{error, info};

use esg_cli::commands::bridge::{run_bridge, BridgeConfig};
use esg_cli::commands::config::{load_config, print_config, RunOverrides};
use esg_cli::commands::fan::{run_fan, FanConfig};
use esg_cli::commands::output::OutputFormat;
use esg_cli::commands::simulate::{run_simulate, SimulateConfig};
use esg_core::{init_logging, init_logging_from_env, LogConfig, LoggingConfig, StrategyKind};

#[derive(Parser)]
#[command(name = "esg")]
#[command(about = "Dividend investment scenario generator - 적립식 배당 투자 시나리오", long_about = None)]
#[command(version)]
struct Cli {
    /// 설정 파일 (TOML). 없으면 기본값과 ESG__ 환경 변수를 사용
    #[arg(short, long, global = true)]
    config: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

/// 실행 설정 재정의와 출력 옵션.
#[derive(Args, Debug)]
struct RunArgs {
    /// 시나리오 시드
    #[arg(long)]
    seed: Option<i64>,

    /// 시뮬레이션 기간 (년)
    #[arg(long)]
    years: Option<usize>,

    /// 보고 주기 (월)
    #[arg(long)]
    freq: Option<usize>,

    /// 재투자 전략 (no_reinvestment, full_reinvestment, full_rebalancing)
    #[arg(long)]
    strategy: Option<StrategyKind>,

    /// 물가 조정된 실질 값으로 보고
    #[arg(long, default_value = "false")]
    real: bool,

    /// 출력 형식 (table, csv, json)
    #[arg(short, long, default_value = "table")]
    format: OutputFormat,

    /// 출력 파일 경로 (지정하지 않으면 stdout)
    #[arg(short, long)]
    output: Option<String>,
}

impl RunArgs {
    fn overrides(&self, trajectories: Option<usize>) -> RunOverrides {
        RunOverrides {
            seed: self.seed,
            years: self.years,
            freq: self.freq,
            trajectories,
            strategy: self.strategy,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// 시드 하나의 시나리오를 보고 주기별 표로 출력
    Simulate {
        #[command(flatten)]
        run: RunArgs,
    },

    /// 여러 시드의 Monte Carlo 분위 띠 출력
    Fan {
        /// 시나리오 수
        #[arg(long)]
        trajectories: Option<usize>,

        /// 진행률 표시 숨기기
        #[arg(long, default_value = "false")]
        quiet: bool,

        #[command(flatten)]
        run: RunArgs,
    },

    /// 이산 브라운 브리지 생성
    Bridge {
        /// 점 개수 (2 이상)
        #[arg(short = 'T', long)]
        steps: usize,

        /// 시작 값
        #[arg(long, allow_hyphen_values = true)]
        start: f64,

        /// 끝 값
        #[arg(long, allow_hyphen_values = true)]
        end: f64,

        /// 증분 표준편차
        #[arg(long)]
        std: f64,

        /// 시드 (지정하지 않으면 임의)
        #[arg(long)]
        seed: Option<i64>,

        /// 출력 형식 (table, csv, json)
        #[arg(short, long, default_value = "table")]
        format: OutputFormat,

        /// 출력 파일 경로
        #[arg(short, long)]
        output: Option<String>,
    },

    /// 유효 설정을 TOML로 출력
    Config,
}

fn init_tracing(config: Option<&LoggingConfig>) -> Result<()> {
    let result = match config {
        Some(logging) => init_logging(&LogConfig::from(logging)),
        None => init_logging_from_env(),
    };
    result.context("Failed to initialize logging")
}

fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    match cli.command {
        Commands::Simulate { run } => {
            let simulation = load_config(cli.config.as_deref(), &run.overrides(None))?;
            init_tracing(Some(&simulation.logging))?;

            let config = SimulateConfig {
                simulation,
                adjust_for_inflation: run.real,
                format: run.format,
                output: run.output,
            };
            match run_simulate(config) {
                Ok(rows) => info!("Simulation finished: {} rows", rows),
                Err(e) => {
                    error!("Simulation failed: {}", e);
                    return Err(e);
                }
            }
        }

        Commands::Fan {
            trajectories,
            quiet,
            run,
        } => {
            let simulation = load_config(cli.config.as_deref(), &run.overrides(trajectories))?;
            init_tracing(Some(&simulation.logging))?;

            let config = FanConfig {
                simulation,
                adjust_for_inflation: run.real,
                format: run.format,
                output: run.output,
                progress: !quiet,
            };
            match run_fan(config) {
                Ok(fan) => info!(
                    "Monte Carlo finished: {} trajectories, P(loss) = {:.3}",
                    fan.final_values.len(),
                    fan.probability_of_loss
                ),
                Err(e) => {
                    error!("Monte Carlo failed: {}", e);
                    return Err(e);
                }
            }
        }

        Commands::Bridge {
            steps,
            start,
            end,
            std,
            seed,
            format,
            output,
        } => {
            init_tracing(None)?;

            let config = BridgeConfig {
                steps,
                start,
                end,
                std,
                seed,
                format,
                output,
            };
            run_bridge(config)?;
        }

        Commands::Config => {
            let simulation = load_config(cli.config.as_deref(), &RunOverrides::default())?;
            print_config(&simulation)?;
        }
    }

    Ok(())
}
