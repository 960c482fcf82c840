// src/mc/grid.rs
use crate::error::{validation::validate_count, SdeError, SdeResult};

/// Time discretisation and path count of a simulation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SimulationGrid {
    steps: usize,
    num_paths: usize,
}

impl SimulationGrid {
    /// # Errors
    ///
    /// [`SdeError::InvalidGrid`] if either count is zero or the path buffer
    /// (`num_paths * (steps + 1)` prices) does not fit in memory addressing.
    pub fn new(steps: usize, num_paths: usize) -> SdeResult<Self> {
        validate_count("steps", steps)?;
        validate_count("num_paths", num_paths)?;

        steps
            .checked_add(1)
            .and_then(|points| points.checked_mul(num_paths))
            .filter(|&len| len <= isize::MAX as usize / std::mem::size_of::<f64>())
            .ok_or_else(|| SdeError::InvalidGrid {
                field: "num_paths".to_string(),
                reason: format!(
                    "{} paths of {} steps exceed the addressable buffer size",
                    num_paths, steps
                ),
            })?;

        Ok(Self { steps, num_paths })
    }

    pub fn steps(&self) -> usize {
        self.steps
    }

    pub fn num_paths(&self) -> usize {
        self.num_paths
    }

    /// Points per path, including the initial price
    pub fn points_per_path(&self) -> usize {
        self.steps + 1
    }

    /// Step size for a contract maturing at `maturity_years`
    pub fn dt(&self, maturity_years: f64) -> f64 {
        maturity_years / self.steps as f64
    }
}
