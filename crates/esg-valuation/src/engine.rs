//! 기간별 투자 진화.
//!
//! 증권 가격, 적립금, 전략을 묶어 매 기간의 [`InvestmentOutcome`]을 만드는
//! 프로세스를 구성합니다. 모든 함수는 순수하며 결과 프로세스는 끝이 없습니다.

use std::collections::BTreeMap;
use std::sync::Arc;

use tracing::{debug, trace};

use esg_core::{
    consolidate_investment, count, InstrumentId, InvestmentOutcome, MarketParams, MarketSentiment,
    Outcome, Portfolio, Pricing, Process, SavingsParams, Security, SecurityAtTime, Statistics,
    Transaction, TransactionTotals,
};

use crate::pricing::{evolve_security, portfolio_value, price_ddm};
use crate::strategy::{Strategy, StrategyContext};

/// 한 기간의 통계.
///
/// `fv`는 기간 말 포트폴리오를 다음 기간 가격으로 평가한 값이고, 외부
/// 현금흐름은 그 기간의 적립금입니다. 목표 가치가 있으면 부족분은
/// `target - fv`(목표에서 실제 가치를 뺀 값)입니다. 감당하지 못한 인출은
/// 음수 목표로 남으므로 부족분도 음수가 됩니다.
pub fn calculate_statistics(
    next_pricing: &Pricing,
    portfolio: &Portfolio,
    transactions: &[Transaction],
    savings: &SavingsParams,
    target_value: Option<f64>,
) -> Statistics {
    let fv = portfolio_value(portfolio, next_pricing);
    Statistics {
        number_of_shares: portfolio
            .iter()
            .map(|(id, allocation)| (id.clone(), allocation.number_of_shares))
            .collect(),
        fv,
        external_cashflow: savings.monthly_investment,
        shortfall: target_value.map(|target| target - fv),
        ..Default::default()
    }
    .with_totals(&TransactionTotals::from_transactions(transactions))
}

/// 한 증권의 가격 프로세스.
///
/// 배당은 실현 비율 프로세스에 따라 매달 진화하고, 가격은 같은 시점의 시장
/// 심리로 평가합니다. 첫 값은 `t0` 시점의 `initial`입니다.
pub fn evaluate_security(
    market: MarketParams,
    id: &InstrumentId,
    initial: Security,
    sentiment: &Process<MarketSentiment>,
    realized_dividend_ratio: &Process<f64>,
    t0: i64,
) -> Process<SecurityAtTime> {
    debug!(instrument = %id, t0, dividends = initial.current_annual_dividends, "evaluating security");

    let state = Process::fold((t0, initial), realized_dividend_ratio, move |(time, security), ratio| {
        (time + 1, evolve_security(&market, security, *ratio))
    });

    state
        .zip(sentiment)
        .map(move |((time, security), sentiment)| SecurityAtTime {
            time: *time,
            security: *security,
            price: price_ddm(security, &market, sentiment),
        })
}

/// 상품별 가격 프로세스를 하나의 [`Pricing`] 프로세스로 묶습니다.
pub fn combine_pricing(securities: BTreeMap<InstrumentId, Process<SecurityAtTime>>) -> Process<Pricing> {
    let (ids, processes): (Vec<InstrumentId>, Vec<Process<SecurityAtTime>>) = securities.into_iter().unzip();
    Process::sequence(processes).map(move |values| ids.iter().cloned().zip(values.iter().copied()).collect())
}

/// 인플레이션만큼 매달 늘어나는 적립금 `monthly · (1 + π/12)^t`.
pub fn inflation_adjusted_savings(market: &MarketParams, savings: &SavingsParams) -> Process<SavingsParams> {
    let monthly_growth = 1.0 + market.inflation / 12.0;
    let base = savings.monthly_investment;
    count(0).map(move |month| SavingsParams {
        monthly_investment: base * monthly_growth.powf(*month as f64),
    })
}

/// 시간에 따른 투자 진화.
///
/// 매 기간 전략이 현재 포트폴리오와 현재/다음 기간 가격을 보고 결정을 내리고,
/// 결정을 통합한 포트폴리오가 다음 기간의 출발점이 됩니다. 첫 기간은 호출
/// 시점에 평가되므로 프로세스를 만들 때 `decide`가 `t0`에 대해 한 번
/// 호출됩니다. 이후 기간은 다음 노드로 진행할 때 계산되며, 같은 노드에서
/// 다시 진행하면 전략이 다시 호출됩니다.
pub fn invest_over_time(
    t0: i64,
    savings: &Process<SavingsParams>,
    pricing: &Process<Pricing>,
    initial: Portfolio,
    strategy: Arc<dyn Strategy>,
) -> Process<InvestmentOutcome> {
    debug!(t0, strategy = strategy.name(), positions = initial.len(), "investing over time");

    let inputs = pricing.zip(&pricing.evolve()).zip(savings);
    let ((current, next), first_savings) = inputs.value();
    let first = invest_at_time(t0, &initial, current, next, first_savings, strategy.as_ref());

    Process::fold(first, &inputs.evolve(), move |previous, ((current, next), savings)| {
        invest_at_time(
            previous.time + 1,
            &previous.outcome.investment,
            current,
            next,
            savings,
            strategy.as_ref(),
        )
    })
}

fn invest_at_time(
    time: i64,
    portfolio: &Portfolio,
    pricing: &Pricing,
    next_pricing: &Pricing,
    savings: &SavingsParams,
    strategy: &dyn Strategy,
) -> InvestmentOutcome {
    let ctx = StrategyContext {
        time,
        portfolio,
        pricing,
        next_pricing,
        savings: savings.monthly_investment,
    };
    let decision = strategy.decide(&ctx);
    let investment = consolidate_investment(portfolio, &decision);
    let statistics = calculate_statistics(
        next_pricing,
        &investment,
        &decision.transactions,
        savings,
        decision.target_value,
    );
    trace!(time, fv = statistics.fv, dividends = statistics.total_dividends, "period invested");

    InvestmentOutcome {
        time,
        outcome: Outcome { investment, decision },
        statistics,
        evolved: next_pricing.clone(),
    }
}
