//! 투자 상품 식별자.

use serde::{Deserialize, Serialize};
use std::fmt;

/// 포트폴리오와 가격 맵의 키로 쓰이는 상품 식별자 (예: "equity", "bonds").
///
/// 정렬 가능한 키이므로 다중 상품 맵을 순회하는 순서가 항상 같습니다.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct InstrumentId(String);

impl InstrumentId {
    /// 새 식별자를 생성합니다.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// 문자열 표현을 반환합니다.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for InstrumentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for InstrumentId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for InstrumentId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_instrument_id_serializes_as_plain_string() {
        let id = InstrumentId::from("equity");
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"equity\"");
        let parsed: InstrumentId = serde_json::from_str("\"bonds\"").unwrap();
        assert_eq!(parsed.as_str(), "bonds");
    }

    #[test]
    fn test_ordering_is_lexicographic() {
        assert!(InstrumentId::from("a") < InstrumentId::from("b"));
        assert_eq!(InstrumentId::from("x").to_string(), "x");
    }
}
