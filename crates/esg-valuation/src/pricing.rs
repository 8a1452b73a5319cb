//! 배당 할인 모형 가격 평가.
//!
//! <https://www.investopedia.com/terms/g/gordongrowthmodel.asp>

use std::collections::BTreeMap;

use esg_core::{InstrumentId, MarketParams, MarketSentiment, Portfolio, Pricing, Security};

/// 고든 성장 모형 가격 `d / (r - g)`.
///
/// 할인율이 성장률 이하이면 가격은 양의 무한대입니다. 에러가 아니라 도메인의
/// 경계값이며 이후 계산에 그대로 전파됩니다.
pub fn price_via_gordon_equation(annual_dividends: f64, discount_rate: f64, dividend_growth: f64) -> f64 {
    if discount_rate <= dividend_growth {
        f64::INFINITY
    } else {
        annual_dividends / (discount_rate - dividend_growth)
    }
}

/// 명목 배당 성장률 (실질 성장률 + 인플레이션).
pub fn nominal_dividend_growth(security: &Security, market: &MarketParams) -> f64 {
    security.real_dividend_growth + market.inflation
}

/// 현재 배당 수익률.
pub fn current_yield(security: &Security, price: f64) -> f64 {
    security.current_annual_dividends / price
}

/// 주어진 가격이 내포하는 할인율 (수익률 + 명목 성장률).
///
/// [`price_ddm`]의 역함수입니다.
pub fn implied_sentiment(security: &Security, price: f64, market: &MarketParams) -> MarketSentiment {
    MarketSentiment::new(current_yield(security, price) + nominal_dividend_growth(security, market))
}

/// 명목 성장률을 사용한 배당 할인 모형 가격.
pub fn price_ddm(security: &Security, market: &MarketParams, sentiment: &MarketSentiment) -> f64 {
    price_via_gordon_equation(
        security.current_annual_dividends,
        sentiment.discount_rate,
        nominal_dividend_growth(security, market),
    )
}

/// 한 달 진화한 증권.
///
/// 배당은 명목 성장률의 월 환산 `(1 + g)^(1/12)`만큼 자라고, 실현 비율
/// `realized_dividend_ratio`가 곱해집니다.
pub fn evolve_security(market: &MarketParams, security: &Security, realized_dividend_ratio: f64) -> Security {
    Security {
        current_annual_dividends: realized_dividend_ratio
            * security.current_annual_dividends
            * (1.0 + nominal_dividend_growth(security, market)).powf(1.0 / 12.0),
        real_dividend_growth: security.real_dividend_growth,
    }
}

/// 포지션별 가치 (주식 수 × 가격).
///
/// 가격이 없는 상품의 가치는 NaN입니다.
pub fn price_positions(portfolio: &Portfolio, pricing: &Pricing) -> BTreeMap<InstrumentId, f64> {
    portfolio
        .iter()
        .map(|(id, allocation)| {
            let price = pricing.get(id).map_or(f64::NAN, |s| s.price);
            (id.clone(), allocation.number_of_shares * price)
        })
        .collect()
}

/// 포트폴리오 전체 가치.
pub fn portfolio_value(portfolio: &Portfolio, pricing: &Pricing) -> f64 {
    price_positions(portfolio, pricing).values().sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use esg_core::{Allocation, SecurityAtTime};

    #[test]
    fn test_gordon_equation() {
        let price = price_via_gordon_equation(1.0, 0.055, 0.003);
        assert!((price - 19.2307692308).abs() < 1e-9);
    }

    #[test]
    fn test_gordon_is_infinite_when_growth_reaches_discount_rate() {
        assert_eq!(price_via_gordon_equation(1.0, 0.05, 0.05), f64::INFINITY);
        assert_eq!(price_via_gordon_equation(1.0, 0.04, 0.05), f64::INFINITY);
    }

    #[test]
    fn test_price_ddm_uses_nominal_growth() {
        let security = Security::new(1.0, 0.003);
        let market = MarketParams { inflation: 0.02 };
        let price = price_ddm(&security, &market, &MarketSentiment::new(0.055));
        assert!((price - 31.25).abs() < 1e-9);
    }

    #[test]
    fn test_implied_sentiment_inverts_price() {
        let security = Security::new(3.5, 0.01);
        let market = MarketParams { inflation: 0.02 };
        let sentiment = implied_sentiment(&security, 100.0, &market);
        assert!((sentiment.discount_rate - 0.065).abs() < 1e-12);
        assert!((price_ddm(&security, &market, &sentiment) - 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_evolve_security_compounds_monthly() {
        let market = MarketParams { inflation: 0.02 };
        let mut security = Security::new(12.0, 0.01);
        for _ in 0..12 {
            security = evolve_security(&market, &security, 1.0);
        }
        assert!((security.current_annual_dividends - 12.0 * 1.03).abs() < 1e-9);
        assert_eq!(security.real_dividend_growth, 0.01);
    }

    #[test]
    fn test_realized_ratio_scales_dividends() {
        let market = MarketParams { inflation: 0.0 };
        let evolved = evolve_security(&market, &Security::new(10.0, 0.0), 1.1);
        assert!((evolved.current_annual_dividends - 11.0).abs() < 1e-12);
    }

    #[test]
    fn test_price_positions() {
        let id = InstrumentId::from("equity");
        let portfolio: Portfolio = [(id.clone(), Allocation::new(3.0))].into_iter().collect();
        let pricing: Pricing = [(
            id.clone(),
            SecurityAtTime {
                time: 0,
                security: Security::new(20.0, 0.0),
                price: 200.0,
            },
        )]
        .into_iter()
        .collect();

        assert_eq!(price_positions(&portfolio, &pricing)[&id], 600.0);
        assert_eq!(portfolio_value(&portfolio, &pricing), 600.0);
        assert!(portfolio_value(&portfolio, &Pricing::new()).is_nan());
    }
}
