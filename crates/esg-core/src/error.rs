//! 시나리오 생성기의 에러 타입.
//!
//! 설정 오용(잘못된 빈도, 길이 불일치 등)은 호출 지점에서 즉시 실패합니다.
//! 무한대 가격과 같은 도메인 경계 상황은 에러가 아니며 산술적으로 전파됩니다.

use thiserror::Error;

/// 핵심 시뮬레이션 에러.
#[derive(Debug, Error)]
pub enum EsgError {
    /// 잘못된 인자 (예: 양수가 아닌 샘플링 빈도)
    #[error("{0}")]
    InvalidArgument(String),

    /// 배열/행렬 차원 불일치
    #[error("차원 불일치: 기대값 {expected}, 실제값 {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    /// 설정 에러
    #[error("설정 에러: {0}")]
    Config(String),

    /// 직렬화 에러
    #[error("직렬화 에러: {0}")]
    Serialization(String),
}

/// 시뮬레이션 작업을 위한 Result 타입.
pub type EsgResult<T> = Result<T, EsgError>;

impl EsgError {
    /// 잘못된 인자 에러를 생성합니다.
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        EsgError::InvalidArgument(message.into())
    }

    /// 호출자의 설정 오류로 인한 에러인지 확인합니다.
    pub fn is_configuration_error(&self) -> bool {
        matches!(
            self,
            EsgError::InvalidArgument(_) | EsgError::DimensionMismatch { .. } | EsgError::Config(_)
        )
    }
}

impl From<serde_json::Error> for EsgError {
    fn from(err: serde_json::Error) -> Self {
        EsgError::Serialization(err.to_string())
    }
}

impl From<toml::ser::Error> for EsgError {
    fn from(err: toml::ser::Error) -> Self {
        EsgError::Serialization(err.to_string())
    }
}

impl From<config::ConfigError> for EsgError {
    fn from(err: config::ConfigError) -> Self {
        EsgError::Config(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_argument_message_is_verbatim() {
        let err = EsgError::invalid_argument("need positive frequency to sample, got 0");
        assert_eq!(err.to_string(), "need positive frequency to sample, got 0");
        assert!(err.is_configuration_error());
    }

    #[test]
    fn test_dimension_mismatch_display() {
        let err = EsgError::DimensionMismatch {
            expected: 12,
            actual: 10,
        };
        assert!(err.to_string().contains("12"));
        assert!(err.to_string().contains("10"));
    }

    #[test]
    fn test_serialization_is_not_configuration_error() {
        let err = EsgError::Serialization("bad".to_string());
        assert!(!err.is_configuration_error());
    }
}
