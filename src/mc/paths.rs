// src/mc/paths.rs
//! GBM path generation
//!
//! A batch is a `num_paths × (steps + 1)` row-major matrix. Column 0 holds the initial
//! price for every path; column `k` holds the price after `k` exact GBM steps.
//!
//! Rows are filled in parallel. Row `i` is owned by exactly one rayon task and draws
//! only from sub-stream `i` of the [`RngFactory`], so the batch is identical for a given
//! seed whatever the number of worker threads.

use crate::contract::ContractSpec;
use crate::mc::grid::SimulationGrid;
use crate::models::gbm::{ExactStep, Gbm};
use crate::rng::{self, RngFactory};
use ndarray::parallel::prelude::*;
use ndarray::{Array1, Array2, ArrayView1, ArrayViewMut1, Axis};
use rand::Rng;
use tracing::trace;

/// Simulated price paths, one per row
#[derive(Debug, Clone, PartialEq)]
pub struct PathBatch {
    prices: Array2<f64>,
    dt: f64,
}

impl PathBatch {
    pub fn num_paths(&self) -> usize {
        self.prices.nrows()
    }

    pub fn steps(&self) -> usize {
        self.prices.ncols() - 1
    }

    pub fn dt(&self) -> f64 {
        self.dt
    }

    /// Path `i`, from the initial price to maturity
    pub fn path(&self, i: usize) -> ArrayView1<'_, f64> {
        self.prices.row(i)
    }

    pub fn iter(&self) -> impl Iterator<Item = ArrayView1<'_, f64>> + '_ {
        self.prices.outer_iter()
    }

    /// Prices at maturity, index-aligned with the paths
    pub fn final_prices(&self) -> ArrayView1<'_, f64> {
        self.prices.column(self.steps())
    }

    /// Observation times `0, dt, ..., T`
    pub fn time_grid(&self) -> Array1<f64> {
        Array1::from_shape_fn(self.prices.ncols(), |k| k as f64 * self.dt)
    }

    pub fn as_array(&self) -> &Array2<f64> {
        &self.prices
    }
}

/// Write one path into `path`: the initial price, then one exact step per remaining point
pub fn fill_path<R: Rng + ?Sized>(
    mut path: ArrayViewMut1<'_, f64>,
    s0: f64,
    step: &ExactStep,
    rng: &mut R,
) {
    let mut points = path.iter_mut();
    if let Some(first) = points.next() {
        *first = s0;
    }

    let mut current_s = s0;
    for point in points {
        current_s *= step.factor(rng::get_normal_draw(rng));
        *point = current_s;
    }
}

/// Simulate `grid.num_paths()` GBM paths for `contract`
pub fn generate_paths(
    contract: &ContractSpec,
    grid: &SimulationGrid,
    factory: &RngFactory,
) -> PathBatch {
    let gbm = Gbm::from_contract(contract);
    let dt = grid.dt(contract.maturity_years());
    let step = gbm.exact_step(dt);

    trace!(
        num_paths = grid.num_paths(),
        steps = grid.steps(),
        dt,
        "generating GBM path batch"
    );

    let mut prices = Array2::<f64>::zeros((grid.num_paths(), grid.points_per_path()));
    prices
        .axis_iter_mut(Axis(0))
        .into_par_iter()
        .enumerate()
        .for_each(|(i, row)| {
            let mut rng = factory.path_rng(i as u64);
            fill_path(row, gbm.s0, &step, &mut rng);
        });

    PathBatch { prices, dt }
}
