//! 포트폴리오, 거래, 투자 결정.
//!
//! 포트폴리오는 변경되지 않습니다. 매 기간 이전 포트폴리오와 그 기간의 거래를
//! 통합하여 새 포트폴리오를 만듭니다 ([`consolidate_investment`]).

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::market::Pricing;
use super::statistics::Statistics;
use crate::types::InstrumentId;

/// 한 상품의 보유량.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Allocation {
    /// 보유 주식 수 (소수 가능)
    pub number_of_shares: f64,
}

impl Allocation {
    pub fn new(number_of_shares: f64) -> Self {
        Self { number_of_shares }
    }
}

/// 상품별 보유량.
pub type Portfolio = BTreeMap<InstrumentId, Allocation>;

/// 한 기간에 발생한 거래.
///
/// 주식 수와 금액은 모두 양수 크기로 기록합니다. 매도는 `Sold`로 구분합니다.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Transaction {
    /// 매수
    Bought {
        instrument: InstrumentId,
        shares: f64,
        cost: f64,
    },
    /// 매도
    Sold {
        instrument: InstrumentId,
        shares: f64,
        proceeds: f64,
    },
    /// 배당 수령
    Dividend {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        instrument: Option<InstrumentId>,
        amount: f64,
    },
}

impl Transaction {
    /// 가격 `price`로 `shares`주를 매수합니다.
    pub fn buy(instrument: InstrumentId, shares: f64, price: f64) -> Self {
        Transaction::Bought {
            instrument,
            shares,
            cost: shares * price,
        }
    }

    /// 가격 `price`로 `shares`주를 매도합니다.
    pub fn sell(instrument: InstrumentId, shares: f64, price: f64) -> Self {
        Transaction::Sold {
            instrument,
            shares,
            proceeds: shares * price,
        }
    }

    /// 상품의 배당 수령.
    pub fn dividend(instrument: InstrumentId, amount: f64) -> Self {
        Transaction::Dividend {
            instrument: Some(instrument),
            amount,
        }
    }

    /// 거래 대상 상품. 상품을 특정하지 않은 배당이면 `None`.
    pub fn instrument(&self) -> Option<&InstrumentId> {
        match self {
            Transaction::Bought { instrument, .. } | Transaction::Sold { instrument, .. } => {
                Some(instrument)
            }
            Transaction::Dividend { instrument, .. } => instrument.as_ref(),
        }
    }
}

/// 거래 목록의 합계.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct TransactionTotals {
    pub dividends: f64,
    pub bought_dollar: f64,
    pub bought_shares: f64,
    pub sold_dollar: f64,
    pub sold_shares: f64,
}

impl TransactionTotals {
    /// 거래 목록을 합산합니다.
    pub fn from_transactions(transactions: &[Transaction]) -> Self {
        transactions
            .iter()
            .fold(Self::default(), |mut totals, transaction| {
                match transaction {
                    Transaction::Bought { shares, cost, .. } => {
                        totals.bought_dollar += cost;
                        totals.bought_shares += shares;
                    }
                    Transaction::Sold {
                        shares, proceeds, ..
                    } => {
                        totals.sold_dollar += proceeds;
                        totals.sold_shares += shares;
                    }
                    Transaction::Dividend { amount, .. } => totals.dividends += amount,
                }
                totals
            })
    }
}

/// 한 기간의 투자 결정.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct InvestmentDecision {
    /// 월 인덱스
    pub time: i64,
    pub transactions: Vec<Transaction>,
    /// 목표 포트폴리오 가치. 설정되면 부족분(shortfall) 계산에 사용됩니다
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_value: Option<f64>,
}

impl InvestmentDecision {
    /// 거래 목록으로 결정을 생성합니다.
    pub fn new(time: i64, transactions: Vec<Transaction>) -> Self {
        Self {
            time,
            transactions,
            target_value: None,
        }
    }

    /// 목표 포트폴리오 가치를 설정합니다.
    pub fn with_target_value(mut self, target_value: f64) -> Self {
        self.target_value = Some(target_value);
        self
    }
}

/// 결정과 그 결과 포트폴리오.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Outcome {
    pub investment: Portfolio,
    pub decision: InvestmentDecision,
}

/// 한 기간의 전체 투자 결과.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct InvestmentOutcome {
    /// 월 인덱스
    pub time: i64,
    pub outcome: Outcome,
    pub statistics: Statistics,
    /// 다음 기간의 가격 (통계의 fv 평가에 사용)
    pub evolved: Pricing,
}

/// 이전 포트폴리오에 결정의 매수/매도를 반영한 새 포트폴리오.
///
/// 상품별로 `이전 주식 수 + Σ 매수 - Σ 매도`입니다. 배당은 보유량에 영향을
/// 주지 않습니다.
pub fn consolidate_investment(portfolio: &Portfolio, decision: &InvestmentDecision) -> Portfolio {
    let mut consolidated = portfolio.clone();
    for transaction in &decision.transactions {
        match transaction {
            Transaction::Bought {
                instrument, shares, ..
            } => {
                consolidated.entry(instrument.clone()).or_default().number_of_shares += shares;
            }
            Transaction::Sold {
                instrument, shares, ..
            } => {
                consolidated.entry(instrument.clone()).or_default().number_of_shares -= shares;
            }
            Transaction::Dividend { .. } => {}
        }
    }
    consolidated
}

#[cfg(test)]
mod tests {
    use super::*;

    fn equity() -> InstrumentId {
        InstrumentId::from("equity")
    }

    #[test]
    fn test_consolidate_adds_bought_and_removes_sold() {
        let portfolio: Portfolio = [(equity(), Allocation::new(3.0))].into_iter().collect();
        let decision = InvestmentDecision::new(
            0,
            vec![
                Transaction::buy(equity(), 0.5, 200.0),
                Transaction::dividend(equity(), 5.0),
                Transaction::sell(equity(), 0.25, 200.0),
            ],
        );

        let consolidated = consolidate_investment(&portfolio, &decision);
        assert_eq!(consolidated[&equity()].number_of_shares, 3.25);
        assert_eq!(portfolio[&equity()].number_of_shares, 3.0);
    }

    #[test]
    fn test_consolidate_opens_new_positions() {
        let decision = InvestmentDecision::new(0, vec![Transaction::buy("bonds".into(), 2.0, 10.0)]);
        let consolidated = consolidate_investment(&Portfolio::new(), &decision);
        assert_eq!(consolidated[&InstrumentId::from("bonds")].number_of_shares, 2.0);
    }

    #[test]
    fn test_totals() {
        let totals = TransactionTotals::from_transactions(&[
            Transaction::buy(equity(), 0.025, 200.0),
            Transaction::dividend(equity(), 5.0),
            Transaction::sell(equity(), 1.0, 100.0),
        ]);
        assert_eq!(totals.dividends, 5.0);
        assert_eq!(totals.bought_dollar, 5.0);
        assert_eq!(totals.bought_shares, 0.025);
        assert_eq!(totals.sold_dollar, 100.0);
        assert_eq!(totals.sold_shares, 1.0);
    }

    #[test]
    fn test_transaction_json_is_tagged() {
        let json = serde_json::to_value(Transaction::buy(equity(), 1.0, 2.0)).unwrap();
        assert_eq!(json["type"], "bought");
        assert_eq!(json["cost"], 2.0);
        assert_eq!(Transaction::dividend(equity(), 1.0).instrument(), Some(&equity()));
    }
}
