//! 보고 주기 재표본.
//!
//! 월별 프로세스를 더 긴 보고 주기로 묶습니다. 기간 동안 쌓이는 값(배당,
//! 매수/매도, 외부 현금흐름, 부족분, 거래 목록)은 구간 합을, 시점 값(fv, 주식 수,
//! 포트폴리오, 시간, 다음 기간 가격)은 구간의 마지막 값을 취합니다.

use serde::Serialize;

use esg_core::{
    count, EsgError, EsgResult, InvestmentDecision, InvestmentOutcome, MarketParams, Outcome,
    Process, Statistics,
};

/// 연속된 기간의 결과를 하나로 합칩니다. 빈 목록은 기본값을 돌려줍니다.
pub fn aggregate_outcomes(outcomes: &[InvestmentOutcome]) -> InvestmentOutcome {
    let Some(last) = outcomes.last() else {
        return InvestmentOutcome::default();
    };

    let sum = |field: fn(&Statistics) -> f64| -> f64 {
        outcomes.iter().map(|o| field(&o.statistics)).sum()
    };
    let shortfalls: Vec<f64> = outcomes.iter().filter_map(|o| o.statistics.shortfall).collect();

    let statistics = Statistics {
        number_of_shares: last.statistics.number_of_shares.clone(),
        fv: last.statistics.fv,
        total_dividends: sum(|s| s.total_dividends),
        total_bought_dollar: sum(|s| s.total_bought_dollar),
        total_bought_num_shares: sum(|s| s.total_bought_num_shares),
        total_sold_dollar: sum(|s| s.total_sold_dollar),
        total_sold_num_shares: sum(|s| s.total_sold_num_shares),
        external_cashflow: sum(|s| s.external_cashflow),
        shortfall: if shortfalls.is_empty() {
            None
        } else {
            Some(shortfalls.iter().sum())
        },
    };

    let decision = InvestmentDecision {
        time: last.outcome.decision.time,
        transactions: outcomes
            .iter()
            .flat_map(|o| o.outcome.decision.transactions.iter().cloned())
            .collect(),
        target_value: last.outcome.decision.target_value,
    };

    InvestmentOutcome {
        time: last.time,
        outcome: Outcome {
            investment: last.outcome.investment.clone(),
            decision,
        },
        statistics,
        evolved: last.evolved.clone(),
    }
}

/// 보고 주기로 재표본된 시나리오.
#[derive(Debug, Clone)]
pub struct InvestmentProcess<S> {
    /// 보고 주기 (월)
    pub display_freq: usize,
    /// 각 보고 구간의 마지막 월 인덱스
    pub months_idx: Process<i64>,
    /// 구간별로 합친 투자 결과
    pub evolution: Process<InvestmentOutcome>,
    /// 구간 말 시장 심리
    pub sentiment_over_time: Process<S>,
    /// 구간 말 물가지수 `(1 + π/12)^month`
    pub cpi: Process<f64>,
}

/// 보고 표의 한 행.
#[derive(Debug, Clone, Serialize)]
pub struct ReportRow<S> {
    pub month: i64,
    pub outcome: InvestmentOutcome,
    pub sentiment: S,
    pub cpi: f64,
}

/// 월별 투자 결과와 시장 심리를 `display_freq`개월 단위로 재표본합니다.
///
/// # Errors
///
/// `display_freq`가 0이면 [`EsgError::InvalidArgument`]를 반환합니다.
pub fn investment_process<S>(
    display_freq: usize,
    investments: &Process<InvestmentOutcome>,
    sentiment: &Process<S>,
    market: &MarketParams,
) -> EsgResult<InvestmentProcess<S>>
where
    S: Clone + Send + Sync + 'static,
{
    let monthly_growth = 1.0 + market.inflation / 12.0;
    let monthly_cpi = count(0).map(move |month| monthly_growth.powf(*month as f64));

    Ok(InvestmentProcess {
        display_freq,
        months_idx: count(0).sample(display_freq)?,
        evolution: investments.aggregate(display_freq, aggregate_outcomes)?,
        sentiment_over_time: sentiment.sample(display_freq)?,
        cpi: monthly_cpi.sample(display_freq)?,
    })
}

impl<S: Clone + Send + Sync + 'static> InvestmentProcess<S> {
    /// `horizon_months` 동안의 보고 행을 구체화합니다 (`horizon_months / display_freq`행).
    pub fn materialize(&self, horizon_months: usize) -> Vec<ReportRow<S>> {
        let rows = horizon_months / self.display_freq;
        self.months_idx
            .iter()
            .zip(self.evolution.iter())
            .zip(self.sentiment_over_time.iter())
            .zip(self.cpi.iter())
            .take(rows)
            .map(|(((month, outcome), sentiment), cpi)| ReportRow {
                month,
                outcome,
                sentiment,
                cpi,
            })
            .collect()
    }
}

/// 명목 값 계열을 물가지수로 나눠 실질 값으로 바꿉니다.
///
/// # Errors
///
/// 두 계열의 길이가 다르면 [`EsgError::DimensionMismatch`]를 반환합니다.
pub fn deflate(values: &[f64], cpi: &[f64]) -> EsgResult<Vec<f64>> {
    if values.len() != cpi.len() {
        return Err(EsgError::DimensionMismatch {
            expected: values.len(),
            actual: cpi.len(),
        });
    }
    Ok(values.iter().zip(cpi).map(|(value, index)| value / index).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use esg_core::{Allocation, InstrumentId, Portfolio, Pricing, SavingsParams, Security, SecurityAtTime};

    use crate::engine::invest_over_time;
    use crate::strategy::{FullReinvestment, InvestCashflow, NoReinvestment};

    fn equity() -> InstrumentId {
        InstrumentId::from("equity")
    }

    fn growing_pricing() -> Process<Pricing> {
        count(0).map(|month| {
            [(
                equity(),
                SecurityAtTime {
                    time: *month,
                    security: Security::new(20.0 + *month as f64, 0.0),
                    price: 200.0 + 2.0 * *month as f64,
                },
            )]
            .into_iter()
            .collect()
        })
    }

    fn outcomes(strategy: Arc<dyn crate::strategy::Strategy>) -> Process<InvestmentOutcome> {
        let portfolio: Portfolio = [(equity(), Allocation::new(3.0))].into_iter().collect();
        invest_over_time(
            0,
            &Process::constant(SavingsParams {
                monthly_investment: 10.0,
            }),
            &growing_pricing(),
            portfolio,
            strategy,
        )
    }

    #[test]
    fn test_additive_fields_are_summed() {
        let monthly = outcomes(Arc::new(InvestCashflow::new(FullReinvestment)));
        let quarterly = investment_process(3, &monthly, &Process::constant(()), &MarketParams::default())
            .unwrap()
            .evolution;

        let months = monthly.take(12);
        let quarters = quarterly.take(4);
        for (quarter, window) in quarters.iter().zip(months.chunks(3)) {
            let dividends: f64 = window.iter().map(|o| o.statistics.total_dividends).sum();
            let bought: f64 = window.iter().map(|o| o.statistics.total_bought_dollar).sum();
            assert!((quarter.statistics.total_dividends - dividends).abs() < 1e-9);
            assert!((quarter.statistics.total_bought_dollar - bought).abs() < 1e-9);
            assert_eq!(quarter.statistics.external_cashflow, 30.0);
            let transactions: usize = window.iter().map(|o| o.outcome.decision.transactions.len()).sum();
            assert_eq!(quarter.outcome.decision.transactions.len(), transactions);
        }

        let total_monthly: f64 = months.iter().map(|o| o.statistics.total_dividends).sum();
        let total_quarterly: f64 = quarters.iter().map(|o| o.statistics.total_dividends).sum();
        assert!((total_monthly - total_quarterly).abs() < 1e-9);
    }

    #[test]
    fn test_snapshot_fields_take_the_last() {
        let monthly = outcomes(Arc::new(InvestCashflow::new(NoReinvestment)));
        let yearly = investment_process(12, &monthly, &Process::constant(()), &MarketParams::default())
            .unwrap();

        let first_year = yearly.evolution.value();
        let december = monthly.skip(11);
        assert_eq!(first_year.time, 11);
        assert_eq!(first_year.statistics.fv, december.value().statistics.fv);
        assert_eq!(first_year.outcome.investment, december.value().outcome.investment);
        assert_eq!(first_year.evolved, december.value().evolved);
        assert_eq!(*yearly.months_idx.value(), 11);
    }

    #[test]
    fn test_shortfall_is_none_without_targets() {
        let monthly = outcomes(Arc::new(NoReinvestment));
        let aggregated = aggregate_outcomes(&monthly.take(3));
        assert_eq!(aggregated.statistics.shortfall, None);
    }

    #[test]
    fn test_empty_window_is_default() {
        assert_eq!(aggregate_outcomes(&[]), InvestmentOutcome::default());
    }

    #[test]
    fn test_cpi_and_sentiment_are_sampled() {
        let market = MarketParams { inflation: 0.12 };
        let process = investment_process(
            12,
            &outcomes(Arc::new(NoReinvestment)),
            &count(100),
            &market,
        )
        .unwrap();

        assert!((process.cpi.value() - 1.01_f64.powi(11)).abs() < 1e-12);
        assert_eq!(process.sentiment_over_time.take(2), vec![111, 123]);
        assert_eq!(process.months_idx.take(3), vec![11, 23, 35]);
    }

    #[test]
    fn test_zero_display_freq_is_rejected() {
        let result = investment_process(
            0,
            &outcomes(Arc::new(NoReinvestment)),
            &Process::constant(()),
            &MarketParams::default(),
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_materialize_rows() {
        let process = investment_process(
            6,
            &outcomes(Arc::new(NoReinvestment)),
            &Process::constant(()),
            &MarketParams::default(),
        )
        .unwrap();
        let rows = process.materialize(40);
        assert_eq!(rows.len(), 6);
        assert_eq!(rows.iter().map(|r| r.month).collect::<Vec<_>>(), vec![5, 11, 17, 23, 29, 35]);
    }

    #[test]
    fn test_deflate() {
        let real = deflate(&[110.0, 121.0], &[1.1, 1.21]).unwrap();
        assert!((real[0] - 100.0).abs() < 1e-9);
        assert!((real[1] - 100.0).abs() < 1e-9);

        match deflate(&[1.0, 2.0, 3.0], &[1.0]) {
            Err(EsgError::DimensionMismatch { expected, actual }) => {
                assert_eq!((expected, actual), (3, 1));
            }
            other => panic!("unexpected {:?}", other),
        }
    }
}
