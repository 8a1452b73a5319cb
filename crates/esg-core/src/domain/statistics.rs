//! 기간별 투자 통계.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::portfolio::TransactionTotals;
use crate::types::InstrumentId;

/// 한 기간 (또는 재표본된 구간)의 투자 통계.
///
/// 합산 필드(배당, 매수/매도, 외부 현금흐름, 부족분)와 스냅샷 필드(주식 수, fv)로
/// 나뉩니다. 재표본 시 합산 필드는 구간 합을, 스냅샷 필드는 마지막 값을 취합니다.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Statistics {
    /// 기간 말 상품별 주식 수
    pub number_of_shares: BTreeMap<InstrumentId, f64>,
    /// 다음 기간 가격으로 평가한 포트폴리오 가치
    pub fv: f64,
    pub total_dividends: f64,
    pub total_bought_dollar: f64,
    pub total_bought_num_shares: f64,
    pub total_sold_dollar: f64,
    pub total_sold_num_shares: f64,
    /// 외부 투자(양수) 또는 인출(음수)
    pub external_cashflow: f64,
    /// 목표 가치 대비 부족분. 목표가 없는 전략이면 `None`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shortfall: Option<f64>,
}

impl Statistics {
    /// 거래 합계를 통계 필드에 옮깁니다.
    pub fn with_totals(mut self, totals: &TransactionTotals) -> Self {
        self.total_dividends = totals.dividends;
        self.total_bought_dollar = totals.bought_dollar;
        self.total_bought_num_shares = totals.bought_shares;
        self.total_sold_dollar = totals.sold_dollar;
        self.total_sold_num_shares = totals.sold_shares;
        self
    }

    /// 순매수 금액 (매수 - 매도).
    pub fn net_bought_dollar(&self) -> f64 {
        self.total_bought_dollar - self.total_sold_dollar
    }

    /// 재투자되지 않고 지급된 배당.
    pub fn paid_out_dividends(&self) -> f64 {
        self.total_dividends + self.external_cashflow - self.net_bought_dollar()
    }
}
