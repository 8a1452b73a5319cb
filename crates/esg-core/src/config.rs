//! 설정 관리.
//!
//! 시뮬레이션 매개변수를 TOML 파일과 환경 변수(`ESG__` 접두사, `__` 구분자)에서
//! 로드합니다. 파일에 없는 항목은 기본값으로 채워집니다.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;

use crate::domain::{
    DividendParams, InvestmentParams, MarketParams, SavingsParams, SentimentParams,
};
use crate::error::{EsgError, EsgResult};
use crate::logging::LogFormat;

/// 시뮬레이션 전체 설정.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SimulationConfig {
    /// 시장 설정
    #[serde(default)]
    pub market: MarketParams,
    /// 투자 상품 목록
    #[serde(default = "default_instruments")]
    pub instruments: Vec<InvestmentParams>,
    /// 배당 실현 설정
    #[serde(default)]
    pub dividend: DividendParams,
    /// 적립 설정
    #[serde(default)]
    pub savings: SavingsParams,
    /// 시장 심리 설정
    #[serde(default)]
    pub sentiment: SentimentParams,
    /// 실행 설정
    #[serde(default)]
    pub simulation: RunConfig,
    /// 로깅 설정
    #[serde(default)]
    pub logging: LoggingConfig,
}

fn default_instruments() -> Vec<InvestmentParams> {
    vec![InvestmentParams::new("equity", 0.035, 0.01)]
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            market: MarketParams::default(),
            instruments: default_instruments(),
            dividend: DividendParams::default(),
            savings: SavingsParams::default(),
            sentiment: SentimentParams::default(),
            simulation: RunConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

/// 재투자 전략 선택.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StrategyKind {
    /// 배당을 모두 지급
    NoReinvestment,
    /// 배당을 같은 상품에 재투자
    FullReinvestment,
    /// 매 기간 현재 비중으로 재조정
    #[default]
    FullRebalancing,
}

impl fmt::Display for StrategyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StrategyKind::NoReinvestment => write!(f, "no_reinvestment"),
            StrategyKind::FullReinvestment => write!(f, "full_reinvestment"),
            StrategyKind::FullRebalancing => write!(f, "full_rebalancing"),
        }
    }
}

impl std::str::FromStr for StrategyKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().replace('-', "_").as_str() {
            "no_reinvestment" => Ok(Self::NoReinvestment),
            "full_reinvestment" => Ok(Self::FullReinvestment),
            "full_rebalancing" => Ok(Self::FullRebalancing),
            _ => Err(format!("Unknown strategy: {}", s)),
        }
    }
}

/// 실행 설정.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct RunConfig {
    /// 초기 투자액
    pub starting_pv: f64,
    /// 시뮬레이션 기간 (월)
    pub horizon_months: usize,
    /// 보고 주기 (월)
    pub display_freq: usize,
    /// 기본 시드
    pub seed: i64,
    /// 몬테카를로 경로 수
    pub trajectories: usize,
    /// 재투자 전략
    pub strategy: StrategyKind,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            starting_pv: 250_000.0,
            horizon_months: 240,
            display_freq: 12,
            seed: 1,
            trajectories: 100,
            strategy: StrategyKind::default(),
        }
    }
}

/// 로깅 설정.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// 로그 레벨 또는 `EnvFilter` 지시문
    pub level: String,
    pub format: LogFormat,
    pub span_events: bool,
    pub thread_ids: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::Pretty,
            span_events: false,
            thread_ids: false,
        }
    }
}

impl SimulationConfig {
    /// 파일과 환경 변수에서 설정을 로드합니다.
    pub fn load<P: AsRef<Path>>(path: P) -> EsgResult<Self> {
        let builder = config::Config::builder()
            .add_source(config::File::from(path.as_ref()))
            .add_source(Self::environment());
        Self::build(builder)
    }

    /// 기본값과 환경 변수만으로 설정을 로드합니다.
    pub fn from_env() -> EsgResult<Self> {
        Self::build(config::Config::builder().add_source(Self::environment()))
    }

    /// TOML 문자열에서 설정을 파싱합니다.
    pub fn from_toml_str(source: &str) -> EsgResult<Self> {
        let builder = config::Config::builder()
            .add_source(config::File::from_str(source, config::FileFormat::Toml));
        Self::build(builder)
    }

    fn environment() -> config::Environment {
        config::Environment::with_prefix("ESG")
            .prefix_separator("__")
            .separator("__")
            .try_parsing(true)
    }

    fn build(
        builder: config::ConfigBuilder<config::builder::DefaultState>,
    ) -> EsgResult<Self> {
        let config: Self = builder.build()?.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// 설정 값의 유효성을 검사합니다.
    pub fn validate(&self) -> EsgResult<()> {
        if self.instruments.is_empty() {
            return Err(EsgError::Config("at least one instrument is required".into()));
        }
        let mut ids: Vec<_> = self.instruments.iter().map(|i| &i.id).collect();
        ids.sort();
        if ids.windows(2).any(|w| w[0] == w[1]) {
            return Err(EsgError::Config("instrument ids must be unique".into()));
        }
        if self.instruments.iter().any(|i| !(i.weight >= 0.0) || !i.weight.is_finite()) {
            return Err(EsgError::Config("instrument weights must be finite and non-negative".into()));
        }
        if self.instruments.iter().map(|i| i.weight).sum::<f64>() <= 0.0 {
            return Err(EsgError::Config("instrument weights must not all be zero".into()));
        }
        if self.instruments.iter().any(|i| !(i.current_dividend_yield > 0.0)) {
            return Err(EsgError::Config("current dividend yield must be positive".into()));
        }
        if self.dividend.realized_dividend_annual_standard_deviation < 0.0 {
            return Err(EsgError::Config("dividend standard deviation must not be negative".into()));
        }
        if self.sentiment.log_excess_std < 0.0 {
            return Err(EsgError::Config("sentiment standard deviation must not be negative".into()));
        }
        if !(self.simulation.starting_pv > 0.0) {
            return Err(EsgError::Config("starting_pv must be positive".into()));
        }
        if self.simulation.display_freq == 0 {
            return Err(EsgError::Config("display_freq must be positive".into()));
        }
        if self.simulation.horizon_months == 0 {
            return Err(EsgError::Config("horizon_months must be positive".into()));
        }
        if self.simulation.trajectories == 0 {
            return Err(EsgError::Config("trajectories must be positive".into()));
        }
        Ok(())
    }

    /// 현재 설정을 TOML로 직렬화합니다.
    pub fn to_toml(&self) -> EsgResult<String> {
        Ok(toml::to_string_pretty(self)?)
    }
}
