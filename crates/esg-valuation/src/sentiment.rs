//! 시장 심리와 배당 실현의 랜덤 진화.

use tracing::debug;

use esg_core::{
    random_mean_reverting, white_noise, DividendParams, EsgError, EsgResult, MarketParams,
    MarketSentiment, Process, Random, Security, SentimentParams,
};

use crate::pricing::nominal_dividend_growth;

/// 평균회귀하는 시장 심리.
///
/// 할인율의 하한은 명목 배당 성장률입니다. 하한을 넘는 초과분의 로그
/// `x = ln(r - floor)`가 평균회귀 프로세스를 따르고, 할인율은 `floor + exp(x)`로
/// 복원되므로 할인율은 구조적으로 하한보다 큽니다. 따라서 가격은 항상 유한합니다.
///
/// 프로세스의 첫 값은 `initial`이며, 이후 값이 평균회귀 경로를 따릅니다.
///
/// # Errors
///
/// 초기 할인율이 하한 이하이거나 장기 초과분이 양수가 아니면
/// [`EsgError::InvalidArgument`]를 반환합니다.
pub fn reverting_sentiment(
    market: &MarketParams,
    security: &Security,
    initial: MarketSentiment,
    params: &SentimentParams,
) -> EsgResult<Random<Process<MarketSentiment>>> {
    let floor = nominal_dividend_growth(security, market);
    let initial_excess = initial.discount_rate - floor;
    if !(initial_excess > 0.0) {
        return Err(EsgError::invalid_argument(format!(
            "initial discount rate {} must exceed nominal dividend growth {}",
            initial.discount_rate, floor
        )));
    }
    let long_term_excess = params.long_term_excess.unwrap_or(initial_excess);
    if !(long_term_excess > 0.0) {
        return Err(EsgError::invalid_argument(format!(
            "long-term excess discount rate must be positive, got {}",
            long_term_excess
        )));
    }

    debug!(
        floor,
        initial_excess,
        long_term_excess,
        reversion = params.reversion_strength,
        "reverting sentiment"
    );

    let log_excess = random_mean_reverting(
        initial_excess.ln(),
        long_term_excess.ln(),
        params.reversion_strength,
        params.log_excess_std,
    );

    Ok(log_excess.map(move |path| {
        let evolving = path.map(move |x| MarketSentiment::new(floor + x.exp()));
        Process::new(initial, move || evolving.clone())
    }))
}

/// 실현 배당 비율 `exp(N(0, σ/√12))`.
///
/// `σ`는 연간 표준편차이며 월 단위로 환산합니다. 비율의 기댓값은 1보다 약간
/// 큽니다 (로그정규).
pub fn realized_dividend_ratio(params: &DividendParams) -> Random<Process<f64>> {
    let monthly_std = params.realized_dividend_annual_standard_deviation / 12.0_f64.sqrt();
    white_noise(0.0, monthly_std).map(|log_ratio| log_ratio.map(|x| x.exp()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn market() -> MarketParams {
        MarketParams { inflation: 0.02 }
    }

    fn security() -> Security {
        Security::new(3.5, 0.01)
    }

    #[test]
    fn test_first_value_is_initial_sentiment() {
        let initial = MarketSentiment::new(0.065);
        let sentiment =
            reverting_sentiment(&market(), &security(), initial, &SentimentParams::default()).unwrap();
        assert_eq!(*sentiment.pick(3).value(), initial);
    }

    #[test]
    fn test_sentiment_stays_above_floor() {
        let params = SentimentParams {
            log_excess_std: 0.5,
            ..Default::default()
        };
        let sentiment =
            reverting_sentiment(&market(), &security(), MarketSentiment::new(0.065), &params).unwrap();
        for seed in 0..20 {
            assert!(sentiment
                .pick(seed)
                .take(240)
                .iter()
                .all(|s| s.discount_rate > 0.03));
        }
    }

    #[test]
    fn test_rejects_initial_sentiment_at_floor() {
        let result = reverting_sentiment(
            &market(),
            &security(),
            MarketSentiment::new(0.03),
            &SentimentParams::default(),
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_zero_volatility_is_constant() {
        let params = SentimentParams {
            log_excess_std: 0.0,
            ..Default::default()
        };
        let sentiment =
            reverting_sentiment(&market(), &security(), MarketSentiment::new(0.065), &params).unwrap();
        for s in sentiment.pick(1).take(24) {
            assert!((s.discount_rate - 0.065).abs() < 1e-12);
        }
    }

    #[test]
    fn test_dividend_ratio_is_positive_and_deterministic() {
        let ratio = realized_dividend_ratio(&DividendParams::default());
        let first = ratio.pick(5123).take(100);
        assert!(first.iter().all(|r| *r > 0.0));
        assert_eq!(first, ratio.pick(5123).take(100));
    }

    #[test]
    fn test_zero_dividend_volatility_gives_unit_ratio() {
        let ratio = realized_dividend_ratio(&DividendParams {
            realized_dividend_annual_standard_deviation: 0.0,
        });
        assert!(ratio.pick(1).take(12).iter().all(|r| *r == 1.0));
    }
}
