//! Barrier Option Payoffs
//!
//! # Definitions
//!
//! Each path is resolved in two independent steps:
//!
//! 1. **Activation**: up barriers are touched when `max(S_t) ≥ B`, down barriers when
//!    `min(S_t) ≤ B`. The scan includes `S_0`, so a contract that starts at or through
//!    its barrier is activated at time zero.
//! 2. **Vanilla payoff** on the terminal price: `max(S_T - K, 0)` for calls,
//!    `max(K - S_T, 0)` for puts.
//!
//! Knock-out contracts pay the vanilla payoff only if the barrier was never touched,
//! knock-in contracts only if it was.
//!
//! # Monitoring
//!
//! Activation is checked on the simulated points only. Crossings between two
//! observation dates are not detected, so discretely monitored prices sit above
//! (knock-out) or below (knock-in) their continuously monitored counterparts.

use crate::contract::{BarrierKind, ContractSpec, OptionKind};
use crate::mc::paths::PathBatch;
use ndarray::ArrayView1;
use rayon::prelude::*;

/// Per-path payoff of a single-barrier option
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Payoff {
    pub option_kind: OptionKind,
    pub barrier_kind: BarrierKind,
    pub strike: f64,
    pub barrier: f64,
}

impl Payoff {
    pub fn from_contract(contract: &ContractSpec) -> Self {
        Payoff {
            option_kind: contract.option_kind(),
            barrier_kind: contract.barrier_kind(),
            strike: contract.strike(),
            barrier: contract.barrier_level(),
        }
    }

    /// Whether the path touches the barrier (inclusive comparison)
    pub fn barrier_activated(&self, path: ArrayView1<'_, f64>) -> bool {
        if self.barrier_kind.is_up() {
            path.iter().any(|&price| price >= self.barrier)
        } else {
            path.iter().any(|&price| price <= self.barrier)
        }
    }

    /// Vanilla payoff on the terminal price
    #[inline]
    pub fn vanilla(&self, final_price: f64) -> f64 {
        self.option_kind.intrinsic(final_price, self.strike)
    }

    /// Combine activation and vanilla payoff according to the barrier kind
    #[inline]
    pub fn combine(&self, activated: bool, vanilla: f64) -> f64 {
        if activated == self.barrier_kind.is_knock_in() {
            vanilla
        } else {
            0.0
        }
    }

    /// Payoff of one complete path `[S_0, S_1, ..., S_T]`
    pub fn calculate(&self, path: ArrayView1<'_, f64>) -> f64 {
        let activated = self.barrier_activated(path);
        let final_price = path[path.len() - 1];
        self.combine(activated, self.vanilla(final_price))
    }
}

/// Non-negative payoffs, index-aligned with the path batch they were computed from
#[derive(Debug, Clone, PartialEq)]
pub struct PayoffVector(Vec<f64>);

impl PayoffVector {
    pub fn new(payoffs: Vec<f64>) -> Self {
        PayoffVector(payoffs)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.0
    }

    pub fn iter(&self) -> std::slice::Iter<'_, f64> {
        self.0.iter()
    }

    pub fn into_inner(self) -> Vec<f64> {
        self.0
    }
}

impl std::ops::Index<usize> for PayoffVector {
    type Output = f64;

    fn index(&self, i: usize) -> &f64 {
        &self.0[i]
    }
}

/// Evaluate `contract` on every path of `batch`
pub fn evaluate_payoffs(batch: &PathBatch, contract: &ContractSpec) -> PayoffVector {
    let payoff = Payoff::from_contract(contract);
    let values = (0..batch.num_paths())
        .into_par_iter()
        .map(|i| payoff.calculate(batch.path(i)))
        .collect();
    PayoffVector(values)
}

/// Plain vanilla payoffs (barrier ignored) on the terminal prices of `batch`
pub fn vanilla_payoffs(batch: &PathBatch, option_kind: OptionKind, strike: f64) -> PayoffVector {
    PayoffVector(
        batch
            .final_prices()
            .iter()
            .map(|&s_t| option_kind.intrinsic(s_t, strike))
            .collect(),
    )
}
