//! 설정 로드와 명령행 재정의.

use anyhow::{Context, Result};
use tracing::debug;

use esg_core::{SimulationConfig, StrategyKind};

/// 명령행에서 설정 파일 값을 덮어쓰는 항목.
#[derive(Debug, Clone, Default)]
pub struct RunOverrides {
    pub seed: Option<i64>,
    pub years: Option<usize>,
    pub freq: Option<usize>,
    pub trajectories: Option<usize>,
    pub strategy: Option<StrategyKind>,
}

impl RunOverrides {
    /// 설정에 재정의를 적용하고 다시 검증합니다.
    pub fn apply(&self, config: &mut SimulationConfig) -> Result<()> {
        let run = &mut config.simulation;
        if let Some(seed) = self.seed {
            run.seed = seed;
        }
        if let Some(years) = self.years {
            run.horizon_months = years * 12;
        }
        if let Some(freq) = self.freq {
            run.display_freq = freq;
        }
        if let Some(trajectories) = self.trajectories {
            run.trajectories = trajectories;
        }
        if let Some(strategy) = self.strategy {
            run.strategy = strategy;
        }
        config.validate().context("Invalid command line override")?;
        Ok(())
    }
}

/// 설정 파일(없으면 기본값)과 `ESG__` 환경 변수에서 설정을 로드합니다.
pub fn load_config(path: Option<&str>, overrides: &RunOverrides) -> Result<SimulationConfig> {
    let mut config = match path {
        Some(path) => SimulationConfig::load(path)
            .with_context(|| format!("Failed to load config: {}", path))?,
        None => SimulationConfig::from_env().context("Failed to load config from environment")?,
    };
    overrides.apply(&mut config)?;
    debug!(simulation = ?config.simulation, "effective configuration");
    Ok(config)
}

/// 유효 설정을 TOML로 출력합니다.
pub fn print_config(config: &SimulationConfig) -> Result<()> {
    println!("{}", config.to_toml()?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_overrides_replace_run_settings() {
        let mut config = SimulationConfig::default();
        let overrides = RunOverrides {
            seed: Some(77),
            years: Some(5),
            freq: Some(3),
            trajectories: None,
            strategy: Some(StrategyKind::NoReinvestment),
        };
        overrides.apply(&mut config).unwrap();

        assert_eq!(config.simulation.seed, 77);
        assert_eq!(config.simulation.horizon_months, 60);
        assert_eq!(config.simulation.display_freq, 3);
        assert_eq!(config.simulation.trajectories, 100);
        assert_eq!(config.simulation.strategy, StrategyKind::NoReinvestment);
    }

    #[test]
    fn test_invalid_override_is_rejected() {
        let mut config = SimulationConfig::default();
        let overrides = RunOverrides {
            freq: Some(0),
            ..Default::default()
        };
        assert!(overrides.apply(&mut config).is_err());
    }
}
