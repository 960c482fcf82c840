// src/mc/mc_engine.rs
use crate::contract::ContractSpec;
use crate::error::{SdeError, SdeResult};
use crate::math_utils::sample_mean_and_std_error;
use crate::mc::grid::SimulationGrid;
use crate::mc::paths::{fill_path, generate_paths, PathBatch};
use crate::mc::payoffs::{evaluate_payoffs, Payoff, PayoffVector};
use crate::models::gbm::Gbm;
use crate::rng::RngFactory;
use bitflags::bitflags;
use ndarray::Array1;
use rayon::prelude::*;
use tracing::{debug, warn};

bitflags! {
    /// Raw simulation outputs kept in a [`PricingResult`]
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct Retain: u32 {
        const NONE    = 0;
        const PATHS   = 1 << 0;
        const PAYOFFS = 1 << 1;
    }
}

#[derive(Debug, Clone)]
pub struct McConfig {
    pub steps: usize,
    pub paths: usize,
    /// `None` draws a base seed from the thread RNG; the drawn seed is reported back
    pub seed: Option<u64>,
    pub retain: Retain,
}

impl McConfig {
    /// Validate the Monte Carlo configuration
    pub fn validate(&self) -> SdeResult<()> {
        self.grid().map(|_| ())
    }

    pub fn grid(&self) -> SdeResult<SimulationGrid> {
        SimulationGrid::new(self.steps, self.paths)
    }
}

impl Default for McConfig {
    fn default() -> Self {
        McConfig {
            steps: 50,
            paths: 100_000,
            seed: None,
            retain: Retain::NONE,
        }
    }
}

/// Outcome of one pricing run
#[derive(Debug, Clone)]
pub struct PricingResult {
    price: f64,
    std_error: f64,
    discount_factor: f64,
    seed: u64,
    grid: SimulationGrid,
    paths: Option<PathBatch>,
    payoffs: Option<PayoffVector>,
}

impl PricingResult {
    /// Mean discounted payoff
    pub fn price(&self) -> f64 {
        self.price
    }

    /// Standard error of [`price`](Self::price)
    pub fn std_error(&self) -> f64 {
        self.std_error
    }

    /// Normal-approximation confidence interval, e.g. `z = 1.96` for 95%
    pub fn confidence_interval(&self, z: f64) -> (f64, f64) {
        (self.price - z * self.std_error, self.price + z * self.std_error)
    }

    pub fn discount_factor(&self) -> f64 {
        self.discount_factor
    }

    /// Base seed actually used, including the one drawn for unseeded runs
    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn grid(&self) -> SimulationGrid {
        self.grid
    }

    /// Simulated paths, present when [`Retain::PATHS`] was requested
    pub fn paths(&self) -> Option<&PathBatch> {
        self.paths.as_ref()
    }

    /// Undiscounted payoffs, present when [`Retain::PAYOFFS`] was requested
    pub fn payoffs(&self) -> Option<&PayoffVector> {
        self.payoffs.as_ref()
    }
}

/// Flat-rate discount factor `e^(-rT)`
pub fn discount_factor(contract: &ContractSpec) -> f64 {
    (-contract.risk_free_rate() * contract.maturity_years()).exp()
}

fn discounted_mean(payoffs: &PayoffVector, discount: f64) -> SdeResult<(f64, f64)> {
    let (mean_payoff, payoff_std_error) = sample_mean_and_std_error(payoffs.as_slice());
    let price = discount * mean_payoff;
    let std_error = discount * payoff_std_error;

    if !price.is_finite() {
        return Err(SdeError::NumericalInstability {
            method: "Monte Carlo".to_string(),
            reason: format!("Price estimate is not finite: {}", price),
        });
    }
    if !std_error.is_finite() {
        warn!(std_error, "standard error is not finite");
    }

    Ok((price, std_error))
}

/// Price estimate from already evaluated payoffs
///
/// The discount factor is applied once to the mean payoff, which equals the mean of
/// the individually discounted payoffs up to rounding.
pub fn price_from_payoffs(payoffs: &PayoffVector, contract: &ContractSpec) -> SdeResult<f64> {
    discounted_mean(payoffs, discount_factor(contract)).map(|(price, _)| price)
}

/// Simulate and evaluate every path without keeping the path batch
///
/// Each worker reuses one path buffer. Path `i` still draws from sub-stream `i`, so the
/// payoffs equal `evaluate_payoffs(&generate_paths(..), ..)` exactly.
pub fn simulate_payoffs(
    contract: &ContractSpec,
    grid: &SimulationGrid,
    factory: &RngFactory,
) -> PayoffVector {
    let gbm = Gbm::from_contract(contract);
    let step = gbm.exact_step(grid.dt(contract.maturity_years()));
    let payoff = Payoff::from_contract(contract);

    let values = (0..grid.num_paths())
        .into_par_iter()
        .map_init(
            || Array1::<f64>::zeros(grid.points_per_path()),
            |path, i| {
                let mut rng = factory.path_rng(i as u64);
                fill_path(path.view_mut(), gbm.s0, &step, &mut rng);
                payoff.calculate(path.view())
            },
        )
        .collect();

    PayoffVector::new(values)
}

/// Monte Carlo price of a European barrier option under GBM
///
/// # Algorithm
///
/// 1. Validate the grid (before any sampling)
/// 2. Simulate `paths` exact GBM paths of `steps` steps, one sub-stream per path
/// 3. Resolve barrier activation and vanilla payoff per path
/// 4. Return `e^(-rT) * mean(payoff)` with its standard error
///
/// # Errors
///
/// - [`SdeError::InvalidGrid`] for zero steps or paths
/// - [`SdeError::NumericalInstability`] if the estimate is not finite
pub fn mc_price_barrier_option(
    contract: &ContractSpec,
    cfg: &McConfig,
) -> SdeResult<PricingResult> {
    let grid = cfg.grid()?;
    let factory = RngFactory::from_seed(cfg.seed);

    debug!(
        option_kind = %contract.option_kind(),
        barrier_kind = %contract.barrier_kind(),
        steps = grid.steps(),
        paths = grid.num_paths(),
        seed = factory.base_seed(),
        seeded = cfg.seed.is_some(),
        "pricing barrier option"
    );

    let (paths, payoffs) = if cfg.retain.contains(Retain::PATHS) {
        let batch = generate_paths(contract, &grid, &factory);
        let payoffs = evaluate_payoffs(&batch, contract);
        (Some(batch), payoffs)
    } else {
        (None, simulate_payoffs(contract, &grid, &factory))
    };

    let discount = discount_factor(contract);
    let (price, std_error) = discounted_mean(&payoffs, discount)?;

    debug!(price, std_error, "barrier option priced");

    Ok(PricingResult {
        price,
        std_error,
        discount_factor: discount,
        seed: factory.base_seed(),
        grid,
        paths,
        payoffs: cfg.retain.contains(Retain::PAYOFFS).then_some(payoffs),
    })
}

/// Price estimate for `contract` on a `steps × num_paths` grid
pub fn price(
    contract: &ContractSpec,
    steps: usize,
    num_paths: usize,
    seed: Option<u64>,
) -> SdeResult<f64> {
    let cfg = McConfig {
        steps,
        paths: num_paths,
        seed,
        retain: Retain::NONE,
    };
    mc_price_barrier_option(contract, &cfg).map(|result| result.price())
}
