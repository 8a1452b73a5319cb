//! 시장, 증권, 시장 심리와 입력 매개변수.
//!
//! 모든 비율은 연율 소수입니다 (예: 0.02 = 연 2%). 시간은 월 단위 정수입니다.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::types::InstrumentId;

/// 거시 경제 매개변수.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MarketParams {
    /// 연 인플레이션
    pub inflation: f64,
}

impl Default for MarketParams {
    fn default() -> Self {
        Self { inflation: 0.02 }
    }
}

/// 배당을 지급하는 증권.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Security {
    /// 현재 연간 배당 ($/주)
    pub current_annual_dividends: f64,
    /// 실질 배당 성장률
    pub real_dividend_growth: f64,
}

impl Security {
    /// 새 증권을 생성합니다.
    pub fn new(current_annual_dividends: f64, real_dividend_growth: f64) -> Self {
        Self {
            current_annual_dividends,
            real_dividend_growth,
        }
    }

    /// 월 배당 ($/주).
    pub fn monthly_dividend(&self) -> f64 {
        self.current_annual_dividends / 12.0
    }
}

/// 시장 심리. 시장이 요구하는 할인율로 표현합니다.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MarketSentiment {
    /// 연 할인율
    pub discount_rate: f64,
}

impl MarketSentiment {
    /// 새 시장 심리를 생성합니다.
    pub fn new(discount_rate: f64) -> Self {
        Self { discount_rate }
    }
}

/// 특정 시점의 증권 상태와 그 가격.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SecurityAtTime {
    /// 월 인덱스
    pub time: i64,
    pub security: Security,
    /// 배당 할인 모형 가격. 할인율이 성장률 이하이면 무한대
    pub price: f64,
}

/// 한 시점의 상품별 가격.
pub type Pricing = BTreeMap<InstrumentId, SecurityAtTime>;

/// 적립식 투자 매개변수.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SavingsParams {
    /// 월 투자액. 음수이면 인출
    pub monthly_investment: f64,
}

impl Default for SavingsParams {
    fn default() -> Self {
        Self {
            monthly_investment: 0.0,
        }
    }
}

/// 배당 실현 매개변수.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DividendParams {
    /// 실현 배당의 연간 표준편차 (현재 배당 수준 대비 비율)
    pub realized_dividend_annual_standard_deviation: f64,
}

impl Default for DividendParams {
    fn default() -> Self {
        Self {
            realized_dividend_annual_standard_deviation: 0.05,
        }
    }
}

/// 투자 상품 매개변수.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InvestmentParams {
    /// 상품 식별자
    pub id: InstrumentId,
    /// 현재 배당 수익률
    pub current_dividend_yield: f64,
    /// 실질 배당 성장률
    pub real_dividend_growth: f64,
    /// 초기 포트폴리오 비중. 전체 비중 합으로 정규화됩니다
    #[serde(default = "default_weight")]
    pub weight: f64,
}

fn default_weight() -> f64 {
    1.0
}

impl InvestmentParams {
    /// 비중 1의 상품 매개변수를 생성합니다.
    pub fn new(id: impl Into<InstrumentId>, current_dividend_yield: f64, real_dividend_growth: f64) -> Self {
        Self {
            id: id.into(),
            current_dividend_yield,
            real_dividend_growth,
            weight: default_weight(),
        }
    }

    /// 비중을 설정합니다.
    pub fn with_weight(mut self, weight: f64) -> Self {
        self.weight = weight;
        self
    }
}

/// 시장 심리 진화 매개변수.
///
/// 할인율에서 하한(명목 배당 성장률)을 뺀 초과분의 로그가 평균회귀합니다.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SentimentParams {
    /// 월별 평균회귀 강도
    #[serde(default = "default_reversion_strength")]
    pub reversion_strength: f64,
    /// 로그 초과분의 월별 잔차 표준편차
    #[serde(default = "default_log_excess_std")]
    pub log_excess_std: f64,
    /// 초과분의 장기 평균. 없으면 초기 초과분을 사용
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub long_term_excess: Option<f64>,
}

fn default_reversion_strength() -> f64 {
    0.1
}

fn default_log_excess_std() -> f64 {
    0.1
}

impl Default for SentimentParams {
    fn default() -> Self {
        Self {
            reversion_strength: default_reversion_strength(),
            log_excess_std: default_log_excess_std(),
            long_term_excess: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_monthly_dividend() {
        let security = Security::new(24.0, 0.01);
        assert_eq!(security.monthly_dividend(), 2.0);
    }

    #[test]
    fn test_investment_params_default_weight() {
        let params: InvestmentParams = serde_json::from_str(
            r#"{"id":"equity","current_dividend_yield":0.03,"real_dividend_growth":0.01}"#,
        )
        .unwrap();
        assert_eq!(params.weight, 1.0);
        assert_eq!(params.id, InstrumentId::from("equity"));
    }

    #[test]
    fn test_sentiment_params_defaults() {
        let params: SentimentParams = serde_json::from_str("{}").unwrap();
        assert_eq!(params, SentimentParams::default());
        assert_eq!(params.reversion_strength, 0.1);
    }
}
