//! 배당 재투자 전략.

use esg_core::{InvestmentDecision, Transaction};

use super::{Strategy, StrategyContext};

/// 배당을 모두 지급하고 보유량을 유지합니다.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoReinvestment;

impl Strategy for NoReinvestment {
    fn name(&self) -> &str {
        "no_reinvestment"
    }

    fn decide(&self, ctx: &StrategyContext<'_>) -> InvestmentDecision {
        InvestmentDecision::new(ctx.time, ctx.dividend_transactions())
    }
}

/// 각 포지션의 배당을 다음 기간 가격으로 같은 상품에 재투자합니다.
#[derive(Debug, Clone, Copy, Default)]
pub struct FullReinvestment;

impl Strategy for FullReinvestment {
    fn name(&self) -> &str {
        "full_reinvestment"
    }

    fn decide(&self, ctx: &StrategyContext<'_>) -> InvestmentDecision {
        let mut transactions = Vec::new();
        for (id, dividend) in ctx.accrued_dividends() {
            let price = ctx.next_price(&id);
            transactions.push(Transaction::Bought {
                instrument: id.clone(),
                shares: dividend / price,
                cost: dividend,
            });
            transactions.push(Transaction::dividend(id, dividend));
        }
        InvestmentDecision::new(ctx.time, transactions)
    }
}

#[cfg(test)]
mod tests {
    use super::super::fixtures::*;
    use super::*;
    use esg_core::consolidate_investment;

    use crate::pricing::portfolio_value;

    #[test]
    fn test_no_reinvestment_pays_out_dividends() {
        let portfolio = portfolio(&[("equity", 3.0)]);
        let current = pricing(&[("equity", 20.0, 200.0)]);
        let ctx = StrategyContext {
            time: 0,
            portfolio: &portfolio,
            pricing: &current,
            next_pricing: &current,
            savings: 0.0,
        };

        let decision = NoReinvestment.decide(&ctx);
        assert_eq!(decision.transactions, vec![Transaction::dividend(equity(), 5.0)]);
        assert_eq!(consolidate_investment(&portfolio, &decision), portfolio);
    }

    #[test]
    fn test_full_reinvestment_buys_with_dividends() {
        let portfolio = portfolio(&[("equity", 3.0)]);
        let current = pricing(&[("equity", 20.0, 200.0)]);
        let ctx = StrategyContext {
            time: 0,
            portfolio: &portfolio,
            pricing: &current,
            next_pricing: &current,
            savings: 0.0,
        };

        let decision = FullReinvestment.decide(&ctx);
        assert_eq!(
            decision.transactions,
            vec![
                Transaction::Bought {
                    instrument: equity(),
                    shares: 0.025,
                    cost: 5.0,
                },
                Transaction::dividend(equity(), 5.0),
            ]
        );

        let consolidated = consolidate_investment(&portfolio, &decision);
        assert_eq!(consolidated[&equity()].number_of_shares, 3.025);
        assert_eq!(portfolio_value(&consolidated, &current), 605.0);
        assert!(decision.target_value.is_none());
    }

    #[test]
    fn test_full_reinvestment_uses_next_period_price() {
        let portfolio = portfolio(&[("equity", 3.0)]);
        let current = pricing(&[("equity", 20.0, 200.0)]);
        let next = pricing(&[("equity", 20.0, 250.0)]);
        let ctx = StrategyContext {
            time: 0,
            portfolio: &portfolio,
            pricing: &current,
            next_pricing: &next,
            savings: 0.0,
        };

        match &FullReinvestment.decide(&ctx).transactions[0] {
            Transaction::Bought { shares, .. } => assert!((shares - 0.02).abs() < 1e-15),
            other => panic!("unexpected transaction {:?}", other),
        }
    }
}
