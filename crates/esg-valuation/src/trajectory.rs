//! 적립식 배당 투자 시나리오.
//!
//! [`SavingsTrajectory`]는 매개변수를 검증하고 초기 상태(상품별 가격 100,
//! 비중대로 나눈 초기 주식 수, 가격이 내포하는 시장 심리)를 준비합니다.
//! `pick(seed)`는 그 시드의 시장 심리와 투자 진화를 같은 보폭으로 돌려줍니다.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use tracing::debug;

use esg_core::{
    Allocation, DividendParams, EsgError, EsgResult, InstrumentId, InvestmentOutcome,
    InvestmentParams, MarketParams, MarketSentiment, Portfolio, Pricing, Process, Random,
    SavingsParams, Security, SentimentParams, SimulationConfig, SEED_OFFSET_PER_IDX,
};

use crate::engine::{combine_pricing, evaluate_security, inflation_adjusted_savings, invest_over_time};
use crate::pricing::{current_yield, implied_sentiment, nominal_dividend_growth};
use crate::sentiment::{realized_dividend_ratio, reverting_sentiment};
use crate::strategy::{strategy_for, Strategy};

/// 모든 상품의 초기 가격.
pub const INITIAL_PRICE: f64 = 100.0;

/// 시장 심리 잡음의 시드 오프셋.
const SENTIMENT_SEED: i64 = 0;
/// 배당 실현 잡음의 시드 오프셋.
const REALIZED_DIVIDEND_RATIO_SEED: i64 = 5123;

/// 상품별 시장 심리.
pub type Sentiments = BTreeMap<InstrumentId, MarketSentiment>;

/// 한 시드의 시나리오 실현값.
#[derive(Debug, Clone)]
pub struct TrajectoryRealization {
    /// 상품별 시장 심리
    pub sentiment: Process<Sentiments>,
    /// 상품별 가격
    pub pricing: Process<Pricing>,
    /// 기간별 투자 결과
    pub investments: Process<InvestmentOutcome>,
}

#[derive(Clone)]
struct InstrumentSetup {
    id: InstrumentId,
    security: Security,
    shares: f64,
    sentiment: Random<Process<MarketSentiment>>,
}

/// 적립식 배당 투자 시나리오 팩토리.
#[derive(Clone)]
pub struct SavingsTrajectory {
    starting_pv: f64,
    market: MarketParams,
    instruments: Vec<InstrumentSetup>,
    dividend_ratio: Random<Process<f64>>,
    savings: SavingsParams,
    strategy: Arc<dyn Strategy>,
}

impl fmt::Debug for SavingsTrajectory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SavingsTrajectory")
            .field("starting_pv", &self.starting_pv)
            .field("market", &self.market)
            .field("instruments", &self.instruments.iter().map(|i| &i.id).collect::<Vec<_>>())
            .field("savings", &self.savings)
            .field("strategy", &self.strategy.name())
            .finish_non_exhaustive()
    }
}

impl SavingsTrajectory {
    /// 시나리오를 준비합니다.
    ///
    /// # Errors
    ///
    /// 상품이 없거나 비중 합이 양수가 아니거나, 초기 시장 심리가 할인율 하한 이하이면
    /// (배당 수익률이 양수가 아니면) [`EsgError::InvalidArgument`]를 반환합니다.
    pub fn new(
        starting_pv: f64,
        market: MarketParams,
        instruments: &[InvestmentParams],
        dividend: &DividendParams,
        savings: SavingsParams,
        sentiment: &SentimentParams,
        strategy: Arc<dyn Strategy>,
    ) -> EsgResult<Self> {
        if instruments.is_empty() {
            return Err(EsgError::invalid_argument("at least one instrument is required"));
        }
        let total_weight: f64 = instruments.iter().map(|i| i.weight).sum();
        if !(total_weight > 0.0) {
            return Err(EsgError::invalid_argument(format!(
                "instrument weights must sum to a positive value, got {}",
                total_weight
            )));
        }

        let setups = instruments
            .iter()
            .map(|params| {
                let security = Security::new(
                    INITIAL_PRICE * params.current_dividend_yield,
                    params.real_dividend_growth,
                );
                let initial_sentiment = implied_sentiment(&security, INITIAL_PRICE, &market);
                Ok(InstrumentSetup {
                    id: params.id.clone(),
                    security,
                    shares: starting_pv * params.weight / total_weight / INITIAL_PRICE,
                    sentiment: reverting_sentiment(&market, &security, initial_sentiment, sentiment)?,
                })
            })
            .collect::<EsgResult<Vec<_>>>()?;

        debug!(
            starting_pv,
            instruments = setups.len(),
            strategy = strategy.name(),
            "savings trajectory prepared"
        );

        Ok(Self {
            starting_pv,
            market,
            instruments: setups,
            dividend_ratio: realized_dividend_ratio(dividend),
            savings,
            strategy,
        })
    }

    /// 설정 파일의 매개변수로 시나리오를 준비합니다.
    pub fn from_config(config: &SimulationConfig) -> EsgResult<Self> {
        Self::new(
            config.simulation.starting_pv,
            config.market,
            &config.instruments,
            &config.dividend,
            config.savings,
            &config.sentiment,
            strategy_for(config.simulation.strategy),
        )
    }

    /// 초기 투자액.
    pub fn starting_pv(&self) -> f64 {
        self.starting_pv
    }

    /// 전략 이름.
    pub fn strategy_name(&self) -> &str {
        self.strategy.name()
    }

    /// 시장 매개변수.
    pub fn market(&self) -> &MarketParams {
        &self.market
    }

    /// 상품별 초기 증권.
    pub fn initial_securities(&self) -> BTreeMap<InstrumentId, Security> {
        self.instruments
            .iter()
            .map(|i| (i.id.clone(), i.security))
            .collect()
    }

    /// 초기 포트폴리오.
    pub fn initial_portfolio(&self) -> Portfolio {
        self.instruments
            .iter()
            .map(|i| (i.id.clone(), Allocation::new(i.shares)))
            .collect()
    }

    /// 시드에서 실현값을 만드는 랜덤 변수.
    pub fn random(&self) -> Random<TrajectoryRealization> {
        let trajectory = self.clone();
        Random::new(move |seed| trajectory.pick(seed))
    }

    /// 시드의 시나리오를 실현합니다.
    ///
    /// `k`번째 상품의 시장 심리는 `seed + k·27644437`, 배당 실현은
    /// `seed + 5123 + k·27644437`로 시드됩니다.
    pub fn pick(&self, seed: i64) -> TrajectoryRealization {
        let mut sentiments = BTreeMap::new();
        let mut securities = BTreeMap::new();

        for (idx, instrument) in self.instruments.iter().enumerate() {
            let offset = idx as i64 * SEED_OFFSET_PER_IDX;
            let sentiment = instrument
                .sentiment
                .pick(seed.wrapping_add(SENTIMENT_SEED + offset));
            let ratio = self
                .dividend_ratio
                .pick(seed.wrapping_add(REALIZED_DIVIDEND_RATIO_SEED + offset));

            securities.insert(
                instrument.id.clone(),
                evaluate_security(self.market, &instrument.id, instrument.security, &sentiment, &ratio, 0),
            );
            sentiments.insert(instrument.id.clone(), sentiment);
        }

        let (ids, processes): (Vec<InstrumentId>, Vec<Process<MarketSentiment>>) =
            sentiments.into_iter().unzip();
        let sentiment = Process::sequence(processes)
            .map(move |values| ids.iter().cloned().zip(values.iter().copied()).collect());

        let pricing = combine_pricing(securities);
        let savings = inflation_adjusted_savings(&self.market, &self.savings);
        let investments = invest_over_time(
            0,
            &savings,
            &pricing,
            self.initial_portfolio(),
            Arc::clone(&self.strategy),
        );

        TrajectoryRealization {
            sentiment,
            pricing,
            investments,
        }
    }

    /// 초기 상태가 그대로 유지될 때의 기대 포트폴리오 가치 (월별, `months`개).
    ///
    /// 상품별 [`theoretic_investment_value`]의 합입니다.
    pub fn theoretic_value(&self, months: usize) -> Vec<f64> {
        let mut total = vec![0.0; months];
        for instrument in &self.instruments {
            let line = theoretic_investment_value(
                instrument.shares * INITIAL_PRICE,
                &self.market,
                &instrument.security,
                INITIAL_PRICE,
                months,
            );
            for (sum, value) in total.iter_mut().zip(line) {
                *sum += value;
            }
        }
        total
    }
}

/// 기대 수익률 `yield + 명목 성장률`로 월 복리 성장한 가치.
///
/// `i`번째 값은 `pv · (1 + r/12)^(i+1)`입니다.
pub fn theoretic_investment_value(
    pv: f64,
    market: &MarketParams,
    security: &Security,
    price: f64,
    months: usize,
) -> Vec<f64> {
    let expected_return = current_yield(security, price) + nominal_dividend_growth(security, market);
    let monthly = 1.0 + expected_return / 12.0;
    (0..months)
        .map(|i| pv * monthly.powf((i + 1) as f64))
        .collect()
}
