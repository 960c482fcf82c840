//! # barrier-mc: Monte Carlo Pricing of European Barrier Options
//!
//! Prices single-barrier European options (up/down, knock-in/knock-out, call/put) by
//! simulating the underlying under risk-neutral Geometric Brownian Motion.
//!
//! ## Key Features
//!
//! - **Exact GBM stepping**: log-normal increments, no Euler discretisation bias
//! - **Parallel and reproducible**: rayon across paths, one random sub-stream per path,
//!   identical results for a given seed on any number of threads
//! - **Typed contracts**: option and barrier kinds are enums, terms validated up front
//! - **Raw outputs on request**: path batch and payoff vector for reporting and plotting
//! - **Reference prices**: Black-Scholes vanilla and continuously monitored
//!   Reiner-Rubinstein barrier prices
//!
//! ## Quick Start
//!
//! ```rust
//! use barrier_mc::contract::{BarrierKind, ContractSpec, OptionKind};
//! use barrier_mc::mc::mc_engine::{mc_price_barrier_option, McConfig};
//!
//! let contract = ContractSpec::new(
//!     OptionKind::Call,
//!     BarrierKind::UpAndOut,
//!     100.0, // initial price
//!     100.0, // strike
//!     120.0, // barrier
//!     1.0,   // maturity in years
//!     0.2,   // volatility
//!     0.05,  // risk-free rate
//! )
//! .expect("Valid contract");
//!
//! let cfg = McConfig {
//!     steps: 50,
//!     paths: 10_000,
//!     seed: Some(42),
//!     ..Default::default()
//! };
//!
//! let result = mc_price_barrier_option(&contract, &cfg).expect("Valid configuration");
//! println!("Barrier price: {:.4} ± {:.4}", result.price(), result.std_error());
//! ```
//!
//! ## Barrier monitoring
//!
//! The barrier is checked on the simulated observation dates only. Increasing `steps`
//! moves the estimate toward the continuously monitored price.

pub mod analytics;
pub mod contract;
pub mod error;
pub mod math_utils;
pub mod mc;
pub mod models;
pub mod output;
pub mod rng;

pub use contract::{BarrierKind, ContractSpec, OptionKind};
pub use error::{SdeError, SdeResult};
pub use mc::mc_engine::{mc_price_barrier_option, price, McConfig, PricingResult, Retain};
