use crate::statistic::time::Frequency;

/// Beta and Jensen's alpha against a benchmark.
pub mod beta;

/// Compound annual growth rate.
pub mod cagr;

/// Conditional value at risk (expected shortfall).
pub mod cvar;

/// Maximum peak-to-trough drawdown.
pub mod drawdown;

/// Sharpe ratio.
pub mod sharpe;

/// Sortino ratio.
pub mod sortino;

/// Annualised volatility.
pub mod volatility;

/// Per-period excess returns over the de-annualised risk-free rate.
pub fn excess_returns(
    returns: &[f64],
    risk_free_rate: f64,
    frequency: Frequency,
) -> impl Iterator<Item = f64> + '_ {
    let risk_free_per_period = risk_free_rate / frequency.periods_per_year();
    returns.iter().map(move |value| value - risk_free_per_period)
}
