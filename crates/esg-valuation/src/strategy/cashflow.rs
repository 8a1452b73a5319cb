//! 외부 적립금 투자.

use esg_core::{consolidate_investment, InvestmentDecision, Transaction};

use super::{Strategy, StrategyContext};

/// 기본 전략의 결정 뒤에 그 기간의 적립금(또는 인출)을 반영합니다.
///
/// 적립금은 기본 결정이 반영된 포트폴리오의 다음 기간 가치 비중대로 나눠
/// 매수합니다. 그 가치가 0이면 가격이 있는 상품에 균등하게 나눕니다. 음수
/// 적립금은 같은 비중의 매도가 되며, 포트폴리오보다 큰 인출은 전량 매도 후
/// 모자란 금액을 목표 가치로 보고합니다.
#[derive(Debug, Clone, Copy, Default)]
pub struct InvestCashflow<S> {
    base: S,
}

impl<S: Strategy> InvestCashflow<S> {
    pub fn new(base: S) -> Self {
        Self { base }
    }
}

impl<S: Strategy> Strategy for InvestCashflow<S> {
    fn name(&self) -> &str {
        self.base.name()
    }

    fn decide(&self, ctx: &StrategyContext<'_>) -> InvestmentDecision {
        let mut decision = self.base.decide(ctx);
        if ctx.savings == 0.0 || ctx.next_pricing.is_empty() {
            return decision;
        }

        let after_base = consolidate_investment(ctx.portfolio, &decision);
        let positions: Vec<_> = ctx
            .next_pricing
            .iter()
            .map(|(id, security)| {
                let shares = after_base.get(id).map_or(0.0, |a| a.number_of_shares);
                (id, shares, security.price, shares * security.price)
            })
            .collect();
        let total: f64 = positions.iter().map(|(_, _, _, value)| value).sum();

        if ctx.savings > 0.0 {
            let equal_weight = 1.0 / positions.len() as f64;
            for (id, _, price, value) in &positions {
                let weight = if total > 0.0 { value / total } else { equal_weight };
                let amount = ctx.savings * weight;
                decision.transactions.push(Transaction::Bought {
                    instrument: (*id).clone(),
                    shares: amount / price,
                    cost: amount,
                });
            }
        } else if total > 0.0 {
            let fraction = (-ctx.savings / total).min(1.0);
            for (id, shares, _, value) in &positions {
                if *shares > 0.0 {
                    decision.transactions.push(Transaction::Sold {
                        instrument: (*id).clone(),
                        shares: shares * fraction,
                        proceeds: value * fraction,
                    });
                }
            }
        }

        decision.target_value = Some(total + ctx.savings);
        decision
    }
}
