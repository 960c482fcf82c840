// src/models/gbm.rs
//! Risk-neutral Geometric Brownian Motion
//!
//! ```text
//! dS_t = r S_t dt + σ S_t dW_t
//! ```
//!
//! Paths are advanced with the exact solution over one step, not an Euler scheme:
//! ```text
//! S_{t+dt} = S_t * exp((r - σ²/2) dt + σ √dt Z),   Z ~ N(0,1)
//! ```
//! The step has no discretisation bias for constant `r` and `σ`.

use crate::contract::ContractSpec;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Gbm {
    pub s0: f64,
    pub r: f64,
    pub sigma: f64,
}

impl Gbm {
    pub fn new(s0: f64, r: f64, sigma: f64) -> Self {
        Gbm { s0, r, sigma }
    }

    pub fn from_contract(contract: &ContractSpec) -> Self {
        Gbm::new(
            contract.initial_price(),
            contract.risk_free_rate(),
            contract.volatility(),
        )
    }

    /// Precompute the per-step drift and diffusion for a fixed `dt`
    pub fn exact_step(&self, dt: f64) -> ExactStep {
        ExactStep {
            drift: (self.r - 0.5 * self.sigma * self.sigma) * dt,
            diffusion: self.sigma * dt.sqrt(),
        }
    }

    /// Deterministic forward `S0 * exp(r t)`
    pub fn forward(&self, t: f64) -> f64 {
        self.s0 * (self.r * t).exp()
    }
}

/// One exact GBM step with a fixed `dt`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExactStep {
    drift: f64,
    diffusion: f64,
}

impl ExactStep {
    /// Multiplicative log-return factor for a standard normal draw
    #[inline]
    pub fn factor(&self, normal_draw: f64) -> f64 {
        (self.drift + self.diffusion * normal_draw).exp()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_zero_volatility_factor_is_deterministic() {
        let step = Gbm::new(100.0, 0.05, 0.0).exact_step(0.02);
        assert_eq!(step.factor(-3.0), step.factor(2.5));
        assert_relative_eq!(step.factor(0.0), (0.05f64 * 0.02).exp(), max_relative = 1e-15);
    }

    #[test]
    fn test_factor_matches_closed_form() {
        let gbm = Gbm::new(100.0, 0.03, 0.25);
        let dt: f64 = 0.1;
        let z: f64 = 0.7;
        let expected = ((0.03 - 0.5 * 0.25 * 0.25) * dt + 0.25 * dt.sqrt() * z).exp();
        assert_relative_eq!(gbm.exact_step(dt).factor(z), expected, max_relative = 1e-14);
    }

    #[test]
    fn test_forward() {
        let gbm = Gbm::new(100.0, 0.05, 0.2);
        assert_relative_eq!(gbm.forward(1.0), 100.0 * 0.05f64.exp(), max_relative = 1e-15);
    }
}
