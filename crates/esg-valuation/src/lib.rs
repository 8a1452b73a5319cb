//! 배당 투자 평가 엔진.
//!
//! 이 크레이트는 다음을 제공합니다:
//! - 고든 성장 모형 기반 가격 평가
//! - 시장 심리와 배당 실현의 랜덤 진화
//! - 재투자 전략 (무재투자, 전액 재투자, 전체 재조정, 적립금 투자)
//! - 기간별 투자 진화와 통계
//! - 보고 주기 재표본
//! - 병렬 몬테카를로 실행
//!
//! # Re-exports
//!
//! - [`pricing`]: 가격 평가 함수
//! - [`strategy`]: [`Strategy`] 트레이트와 기본 전략
//! - [`trajectory`]: [`SavingsTrajectory`] 시나리오 팩토리
//! - [`monte_carlo`]: [`run_monte_carlo`] 팬 차트

pub mod aggregation;
pub mod engine;
pub mod monte_carlo;
pub mod pricing;
pub mod sentiment;
pub mod strategy;
pub mod trajectory;

pub use aggregation::{
    aggregate_outcomes, deflate, investment_process, InvestmentProcess, ReportRow,
};
pub use engine::{
    calculate_statistics, combine_pricing, evaluate_security, inflation_adjusted_savings,
    invest_over_time,
};
pub use monte_carlo::{run_monte_carlo, FanChart, MonteCarloConfig, PercentileBand};
pub use pricing::{
    current_yield, evolve_security, implied_sentiment, nominal_dividend_growth,
    portfolio_value, price_ddm, price_positions, price_via_gordon_equation,
};
pub use sentiment::{realized_dividend_ratio, reverting_sentiment};
pub use strategy::{
    strategy_for, FullRebalancing, FullReinvestment, InvestCashflow, NoReinvestment, Strategy,
    StrategyContext,
};
pub use trajectory::{
    theoretic_investment_value, Sentiments, SavingsTrajectory, TrajectoryRealization,
};
