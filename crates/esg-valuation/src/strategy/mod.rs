//! 재투자 전략.
//!
//! 전략은 한 기간의 상황(현재 포트폴리오, 현재/다음 기간 가격, 외부 현금흐름)을
//! 받아 그 기간의 [`InvestmentDecision`]을 돌려주는 순수 함수입니다. 결정의
//! 거래는 [`esg_core::consolidate_investment`]로 다음 포트폴리오에 반영됩니다.
//!
//! 클로저도 [`Strategy`]를 구현하므로 호출자가 임의의 전략을 넘길 수 있습니다.
//!
//! ```rust
//! use esg_core::InvestmentDecision;
//! use esg_valuation::strategy::{Strategy, StrategyContext};
//!
//! let hold = |ctx: &StrategyContext<'_>| InvestmentDecision::new(ctx.time, Vec::new());
//! assert_eq!(hold.name(), "custom");
//! ```

mod cashflow;
mod rebalancing;
mod reinvestment;

use std::sync::Arc;

use esg_core::{InstrumentId, InvestmentDecision, Portfolio, Pricing, StrategyKind, Transaction};

pub use cashflow::InvestCashflow;
pub use rebalancing::FullRebalancing;
pub use reinvestment::{FullReinvestment, NoReinvestment};

/// 전략이 결정을 내리는 데 필요한 한 기간의 상황.
#[derive(Debug, Clone, Copy)]
pub struct StrategyContext<'a> {
    /// 월 인덱스
    pub time: i64,
    /// 기간 초 포트폴리오
    pub portfolio: &'a Portfolio,
    /// 현재 기간 가격 (배당 계산에 사용)
    pub pricing: &'a Pricing,
    /// 다음 기간 가격 (거래 가격)
    pub next_pricing: &'a Pricing,
    /// 이 기간의 외부 투자액. 음수이면 인출
    pub savings: f64,
}

impl StrategyContext<'_> {
    /// 포지션별 이번 기간 배당 (주식 수 × 연 배당 / 12).
    pub fn accrued_dividends(&self) -> Vec<(InstrumentId, f64)> {
        self.portfolio
            .iter()
            .map(|(id, allocation)| {
                let annual = self
                    .pricing
                    .get(id)
                    .map_or(f64::NAN, |s| s.security.current_annual_dividends);
                (id.clone(), allocation.number_of_shares * annual / 12.0)
            })
            .collect()
    }

    /// 다음 기간의 거래 가격.
    pub fn next_price(&self, id: &InstrumentId) -> f64 {
        self.next_pricing.get(id).map_or(f64::NAN, |s| s.price)
    }

    /// 포지션별 배당 수령 거래.
    pub fn dividend_transactions(&self) -> Vec<Transaction> {
        self.accrued_dividends()
            .into_iter()
            .map(|(id, amount)| Transaction::dividend(id, amount))
            .collect()
    }
}

/// 한 기간의 투자 결정을 내리는 전략.
pub trait Strategy: Send + Sync {
    /// 로그와 보고서에 쓰이는 전략 이름.
    fn name(&self) -> &str {
        "custom"
    }

    /// 이 기간의 결정을 내립니다.
    fn decide(&self, ctx: &StrategyContext<'_>) -> InvestmentDecision;
}

impl<F> Strategy for F
where
    F: Fn(&StrategyContext<'_>) -> InvestmentDecision + Send + Sync,
{
    fn decide(&self, ctx: &StrategyContext<'_>) -> InvestmentDecision {
        self(ctx)
    }
}

/// 설정의 전략 선택에 해당하는 전략.
///
/// 재투자 전략은 적립금을 직접 다루지 않으므로 [`InvestCashflow`]로 감쌉니다.
/// 재조정 전략은 목표 가치에 적립금을 이미 포함합니다.
pub fn strategy_for(kind: StrategyKind) -> Arc<dyn Strategy> {
    match kind {
        StrategyKind::NoReinvestment => Arc::new(InvestCashflow::new(NoReinvestment)),
        StrategyKind::FullReinvestment => Arc::new(InvestCashflow::new(FullReinvestment)),
        StrategyKind::FullRebalancing => Arc::new(FullRebalancing),
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use esg_core::{Allocation, InstrumentId, Portfolio, Pricing, Security, SecurityAtTime};

    pub fn equity() -> InstrumentId {
        InstrumentId::from("equity")
    }

    pub fn pricing(entries: &[(&str, f64, f64)]) -> Pricing {
        entries
            .iter()
            .map(|(id, dividends, price)| {
                (
                    InstrumentId::from(*id),
                    SecurityAtTime {
                        time: 0,
                        security: Security::new(*dividends, 0.0),
                        price: *price,
                    },
                )
            })
            .collect()
    }

    pub fn portfolio(entries: &[(&str, f64)]) -> Portfolio {
        entries
            .iter()
            .map(|(id, shares)| (InstrumentId::from(*id), Allocation::new(*shares)))
            .collect()
    }
}
