//! tracing 구독자 초기화.
//!
//! 라이브러리는 시나리오를 구성할 때만 `debug!` 이벤트를 남기고 월별 값은
//! `trace!`로만 기록합니다. 로그는 stderr로 나가므로 stdout의 보고서와
//! 섞이지 않습니다.

use serde::{Deserialize, Serialize};
use tracing_subscriber::{
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
    EnvFilter, Layer, Registry,
};

use crate::config::LoggingConfig;
use crate::error::{EsgError, EsgResult};

/// 로그 출력 형식.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// 여러 줄, 색상 포함
    #[default]
    Pretty,
    /// 한 줄 JSON (로그 수집기용)
    Json,
    /// 한 줄 텍스트
    Compact,
}

impl std::str::FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "pretty" => Ok(Self::Pretty),
            "json" => Ok(Self::Json),
            "compact" => Ok(Self::Compact),
            other => Err(format!("Unknown log format: {}", other)),
        }
    }
}

/// 구독자 설정.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogConfig {
    /// `EnvFilter` 지시문 (예: "info", "esg_valuation=debug"). `RUST_LOG`가 우선합니다
    pub filter: String,
    pub format: LogFormat,
    /// span 생성/종료 이벤트 기록
    pub span_events: bool,
    /// 스레드 ID 기록 (병렬 몬테카를로)
    pub thread_ids: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self::new("info")
    }
}

impl LogConfig {
    pub fn new(filter: impl Into<String>) -> Self {
        Self {
            filter: filter.into(),
            format: LogFormat::Pretty,
            span_events: false,
            thread_ids: false,
        }
    }

    pub fn with_format(self, format: LogFormat) -> Self {
        Self { format, ..self }
    }

    /// `RUST_LOG`와 `LOG_FORMAT` 환경 변수에서 읽습니다.
    pub fn from_env() -> Self {
        let filter = std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into());
        let format = std::env::var("LOG_FORMAT")
            .ok()
            .and_then(|value| value.parse().ok())
            .unwrap_or_default();
        Self::new(filter).with_format(format)
    }
}

impl From<&LoggingConfig> for LogConfig {
    fn from(section: &LoggingConfig) -> Self {
        Self {
            filter: section.level.clone(),
            format: section.format,
            span_events: section.span_events,
            thread_ids: section.thread_ids,
        }
    }
}

fn fmt_layer(config: &LogConfig) -> Box<dyn Layer<Registry> + Send + Sync> {
    let span_events = if config.span_events {
        FmtSpan::NEW | FmtSpan::CLOSE
    } else {
        FmtSpan::NONE
    };
    let base = fmt::layer()
        .with_writer(std::io::stderr)
        .with_thread_ids(config.thread_ids)
        .with_span_events(span_events);

    match config.format {
        LogFormat::Pretty => base.pretty().boxed(),
        LogFormat::Json => base.json().boxed(),
        LogFormat::Compact => base.compact().boxed(),
    }
}

/// 전역 구독자를 설치합니다.
///
/// ```no_run
/// use esg_core::logging::{init_logging, LogConfig, LogFormat};
///
/// init_logging(&LogConfig::new("esg_valuation=debug").with_format(LogFormat::Json)).unwrap();
/// ```
///
/// # Errors
///
/// 필터 지시문이 잘못되었거나 구독자가 이미 설치되어 있으면
/// [`EsgError::Config`]를 반환합니다.
pub fn init_logging(config: &LogConfig) -> EsgResult<()> {
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(&config.filter)
            .map_err(|e| EsgError::Config(format!("invalid log filter '{}': {}", config.filter, e)))?,
    };

    tracing_subscriber::registry()
        .with(fmt_layer(config))
        .with(filter)
        .try_init()
        .map_err(|e| EsgError::Config(format!("logging already initialized: {}", e)))?;

    tracing::debug!(format = ?config.format, filter = %config.filter, "logging initialized");
    Ok(())
}

/// [`LogConfig::from_env`]로 구독자를 설치합니다.
pub fn init_logging_from_env() -> EsgResult<()> {
    init_logging(&LogConfig::from_env())
}

/// 시드(와 전략)를 필드로 가진 info span.
#[macro_export]
macro_rules! simulation_span {
    ($name:expr, $seed:expr) => {
        tracing::info_span!($name, seed = %$seed)
    };
    ($name:expr, $seed:expr, $strategy:expr) => {
        tracing::info_span!($name, seed = %$seed, strategy = %$strategy)
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_log_format() {
        assert_eq!("Json".parse::<LogFormat>(), Ok(LogFormat::Json));
        assert_eq!("compact".parse::<LogFormat>(), Ok(LogFormat::Compact));
        assert!("xml".parse::<LogFormat>().is_err());
    }

    #[test]
    fn test_config_section_maps_to_log_config() {
        let section = LoggingConfig {
            level: "esg_valuation=trace".into(),
            format: LogFormat::Compact,
            span_events: true,
            thread_ids: true,
        };
        let config = LogConfig::from(&section);
        assert_eq!(config.filter, "esg_valuation=trace");
        assert_eq!(config.format, LogFormat::Compact);
        assert!(config.span_events && config.thread_ids);
    }

    #[test]
    fn test_format_deserializes_lowercase() {
        let format: LogFormat = serde_json::from_str("\"json\"").unwrap();
        assert_eq!(format, LogFormat::Json);
        assert_eq!(serde_json::to_string(&LogFormat::Pretty).unwrap(), "\"pretty\"");
    }

    #[test]
    fn test_invalid_filter_is_a_config_error() {
        if std::env::var("RUST_LOG").is_ok() {
            return;
        }
        let err = init_logging(&LogConfig::new("esg=notalevel")).unwrap_err();
        assert!(err.is_configuration_error());
    }

    #[test]
    fn test_simulation_span_macro() {
        let span = crate::simulation_span!("trajectory", 42, "full_rebalancing");
        let _entered = span.enter();
    }
}
