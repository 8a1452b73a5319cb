//! 전체 재조정 전략.

use esg_core::{InvestmentDecision, Transaction};

use super::{Strategy, StrategyContext};
use crate::pricing::price_positions;

/// 매 기간 포트폴리오를 현재 비중대로 재조정합니다.
///
/// 목표 가치는 `배당 + 적립금 + Σ 다음 기간 가격으로 평가한 포지션`입니다. 각
/// 상품의 목표 가치는 현재 기간 가치 비중만큼이며, 다음 기간 가격으로 목표
/// 주식 수를 구해 그 차이를 거래합니다. 포트폴리오가 비어 있으면 가격이 있는
/// 상품에 균등하게 나눕니다.
///
/// 인출이 포트폴리오보다 크면 목표가 음수가 됩니다. 이때 포트폴리오를 모두
/// 매도하고, 결정의 목표 가치에는 음수 목표를 그대로 남겨 부족분으로 보고합니다.
#[derive(Debug, Clone, Copy, Default)]
pub struct FullRebalancing;

impl Strategy for FullRebalancing {
    fn name(&self) -> &str {
        "full_rebalancing"
    }

    fn decide(&self, ctx: &StrategyContext<'_>) -> InvestmentDecision {
        let dividends = ctx.dividend_transactions();
        let accrued: f64 = ctx.accrued_dividends().iter().map(|(_, amount)| amount).sum();

        let current_values = price_positions(ctx.portfolio, ctx.pricing);
        let present_value: f64 = current_values.values().sum();
        let next_value: f64 = price_positions(ctx.portfolio, ctx.next_pricing).values().sum();

        let target_value = accrued + ctx.savings + next_value;
        let investable = target_value.max(0.0);
        let equal_weight = 1.0 / ctx.next_pricing.len() as f64;

        let mut transactions = Vec::with_capacity(ctx.next_pricing.len() + dividends.len());
        for (id, security) in ctx.next_pricing {
            let weight = if present_value > 0.0 {
                current_values.get(id).copied().unwrap_or(0.0) / present_value
            } else {
                equal_weight
            };
            let held = ctx
                .portfolio
                .get(id)
                .map_or(0.0, |allocation| allocation.number_of_shares);
            let target_shares = weight * investable / security.price;
            let delta = target_shares - held;

            if delta > 0.0 {
                transactions.push(Transaction::buy(id.clone(), delta, security.price));
            } else if delta < 0.0 {
                transactions.push(Transaction::sell(id.clone(), -delta, security.price));
            }
        }
        transactions.extend(dividends);

        InvestmentDecision::new(ctx.time, transactions).with_target_value(target_value)
    }
}
