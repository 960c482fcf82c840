// src/analytics/bs_analytic.rs
//! Closed-form reference prices under Black-Scholes
//!
//! # Mathematical Foundation
//!
//! Under the risk-neutral measure the underlying follows:
//! ```text
//! dS_t = r S_t dt + σ S_t dW_t
//! ```
//!
//! Vanilla prices use the Black-Scholes formulas. Barrier prices use the
//! Reiner-Rubinstein (1991) decomposition for a **continuously** monitored barrier with
//! no dividend and no rebate. The Monte Carlo engine monitors the barrier only on the
//! simulation grid, so these values are a reference, not the target of the estimator.

use crate::contract::{BarrierKind, ContractSpec, OptionKind};
use crate::math_utils::norm_cdf;

/// Black-Scholes European call option price
///
/// # Formula
/// ```text
/// C(S,K,r,σ,T) = S*Φ(d₁) - K*e^(-rT)*Φ(d₂)
/// d₁ = [ln(S/K) + (r + σ²/2)T] / (σ√T)
/// d₂ = d₁ - σ√T
/// ```
pub fn bs_call_price(s: f64, k: f64, r: f64, sigma: f64, t: f64) -> f64 {
    let d1 = ((s / k).ln() + (r + 0.5 * sigma * sigma) * t) / (sigma * t.sqrt());
    let d2 = d1 - sigma * t.sqrt();
    s * norm_cdf(d1) - k * (-r * t).exp() * norm_cdf(d2)
}

/// Black-Scholes European put option price
///
/// # Formula
/// ```text
/// P(S,K,r,σ,T) = K*e^(-rT)*Φ(-d₂) - S*Φ(-d₁)
/// ```
pub fn bs_put_price(s: f64, k: f64, r: f64, sigma: f64, t: f64) -> f64 {
    let d1 = ((s / k).ln() + (r + 0.5 * sigma * sigma) * t) / (sigma * t.sqrt());
    let d2 = d1 - sigma * t.sqrt();
    k * (-r * t).exp() * norm_cdf(-d2) - s * norm_cdf(-d1)
}

/// Vanilla price for either option kind; `sigma = 0` prices the deterministic forward
pub fn vanilla_price(option_kind: OptionKind, s: f64, k: f64, r: f64, sigma: f64, t: f64) -> f64 {
    if sigma == 0.0 {
        return (-r * t).exp() * option_kind.intrinsic(s * (r * t).exp(), k);
    }
    match option_kind {
        OptionKind::Call => bs_call_price(s, k, r, sigma, t),
        OptionKind::Put => bs_put_price(s, k, r, sigma, t),
    }
}

/// Vanilla price of the contract's option, ignoring the barrier
pub fn contract_vanilla_price(contract: &ContractSpec) -> f64 {
    vanilla_price(
        contract.option_kind(),
        contract.initial_price(),
        contract.strike(),
        contract.risk_free_rate(),
        contract.volatility(),
        contract.maturity_years(),
    )
}

/// Continuously monitored barrier option price (Reiner-Rubinstein, no rebate)
///
/// # Components
/// ```text
/// A = φS Φ(φx₁) - φK e^(-rT) Φ(φx₁ - φσ√T)
/// B = φS Φ(φx₂) - φK e^(-rT) Φ(φx₂ - φσ√T)
/// C = φS (H/S)^(2(μ+1)) Φ(ηy₁) - φK e^(-rT) (H/S)^(2μ) Φ(ηy₁ - ησ√T)
/// D = φS (H/S)^(2(μ+1)) Φ(ηy₂) - φK e^(-rT) (H/S)^(2μ) Φ(ηy₂ - ησ√T)
/// μ = (r - σ²/2) / σ²
/// ```
/// with `φ = +1` for calls, `-1` for puts, `η = +1` for down barriers, `-1` for up.
///
/// A contract whose initial price already sits on or beyond the barrier is resolved
/// immediately: knock-ins become the vanilla, knock-outs are worthless.
pub fn barrier_price_continuous(contract: &ContractSpec) -> f64 {
    let s = contract.initial_price();
    let k = contract.strike();
    let h = contract.barrier_level();
    let r = contract.risk_free_rate();
    let sigma = contract.volatility();
    let t = contract.maturity_years();
    let kind = contract.barrier_kind();
    let option = contract.option_kind();

    let breached_at_start = if kind.is_up() { s >= h } else { s <= h };
    if breached_at_start {
        return if kind.is_knock_in() {
            contract_vanilla_price(contract)
        } else {
            0.0
        };
    }

    let df = (-r * t).exp();

    if sigma == 0.0 {
        // monotone deterministic path: extremes are S0 and the forward
        let forward = s * (r * t).exp();
        let touched = if kind.is_up() {
            forward >= h
        } else {
            forward <= h
        };
        let vanilla = option.intrinsic(forward, k);
        return if touched == kind.is_knock_in() {
            df * vanilla
        } else {
            0.0
        };
    }

    let sigma_sqrt_t = sigma * t.sqrt();
    let mu = (r - 0.5 * sigma * sigma) / (sigma * sigma);
    let phi = match option {
        OptionKind::Call => 1.0,
        OptionKind::Put => -1.0,
    };
    let eta = if kind.is_up() { -1.0 } else { 1.0 };

    let x1 = (s / k).ln() / sigma_sqrt_t + (1.0 + mu) * sigma_sqrt_t;
    let x2 = (s / h).ln() / sigma_sqrt_t + (1.0 + mu) * sigma_sqrt_t;
    let y1 = (h * h / (s * k)).ln() / sigma_sqrt_t + (1.0 + mu) * sigma_sqrt_t;
    let y2 = (h / s).ln() / sigma_sqrt_t + (1.0 + mu) * sigma_sqrt_t;

    let ratio_a = (h / s).powf(2.0 * (mu + 1.0));
    let ratio_b = (h / s).powf(2.0 * mu);

    let a = phi * s * norm_cdf(phi * x1) - phi * k * df * norm_cdf(phi * x1 - phi * sigma_sqrt_t);
    let b = phi * s * norm_cdf(phi * x2) - phi * k * df * norm_cdf(phi * x2 - phi * sigma_sqrt_t);
    let c = phi * s * ratio_a * norm_cdf(eta * y1)
        - phi * k * df * ratio_b * norm_cdf(eta * y1 - eta * sigma_sqrt_t);
    let d = phi * s * ratio_a * norm_cdf(eta * y2)
        - phi * k * df * ratio_b * norm_cdf(eta * y2 - eta * sigma_sqrt_t);

    let price = match (kind, option) {
        (BarrierKind::DownAndIn, OptionKind::Call) if k >= h => c,
        (BarrierKind::DownAndIn, OptionKind::Call) => a - b + d,
        (BarrierKind::DownAndIn, OptionKind::Put) if k >= h => b - c + d,
        (BarrierKind::DownAndIn, OptionKind::Put) => a,

        (BarrierKind::UpAndIn, OptionKind::Call) if k >= h => a,
        (BarrierKind::UpAndIn, OptionKind::Call) => b - c + d,
        (BarrierKind::UpAndIn, OptionKind::Put) if k >= h => a - b + d,
        (BarrierKind::UpAndIn, OptionKind::Put) => c,

        (BarrierKind::DownAndOut, OptionKind::Call) if k >= h => a - c,
        (BarrierKind::DownAndOut, OptionKind::Call) => b - d,
        (BarrierKind::DownAndOut, OptionKind::Put) if k >= h => a - b + c - d,
        (BarrierKind::DownAndOut, OptionKind::Put) => 0.0,

        (BarrierKind::UpAndOut, OptionKind::Call) if k >= h => 0.0,
        (BarrierKind::UpAndOut, OptionKind::Call) => a - b + c - d,
        (BarrierKind::UpAndOut, OptionKind::Put) if k >= h => b - d,
        (BarrierKind::UpAndOut, OptionKind::Put) => a - c,
    };

    price.max(0.0)
}
