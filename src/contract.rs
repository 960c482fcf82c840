// src/contract.rs
//! Barrier option contract terms
//!
//! A [`ContractSpec`] is validated once, in [`ContractSpec::new`], and is immutable
//! afterwards. Every other part of the crate can therefore assume finite, positive
//! prices and a volatility in `[0, 1]`.

use crate::error::{validation::*, SdeError, SdeResult};
use serde::Serialize;
use std::fmt;
use std::str::FromStr;

/// Vanilla payoff applied at maturity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum OptionKind {
    /// max(S_T - K, 0)
    Call,
    /// max(K - S_T, 0)
    Put,
}

impl OptionKind {
    /// Intrinsic value of the option at `final_price`
    #[inline]
    pub fn intrinsic(self, final_price: f64, strike: f64) -> f64 {
        match self {
            OptionKind::Call => (final_price - strike).max(0.0),
            OptionKind::Put => (strike - final_price).max(0.0),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            OptionKind::Call => "call",
            OptionKind::Put => "put",
        }
    }
}

/// Direction of the barrier and whether touching it knocks the option in or out
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BarrierKind {
    UpAndOut,
    DownAndOut,
    UpAndIn,
    DownAndIn,
}

impl BarrierKind {
    pub const ALL: [BarrierKind; 4] = [
        BarrierKind::UpAndOut,
        BarrierKind::DownAndOut,
        BarrierKind::UpAndIn,
        BarrierKind::DownAndIn,
    ];

    /// Up barriers are monitored against the path maximum, down barriers against the minimum
    #[inline]
    pub fn is_up(self) -> bool {
        matches!(self, BarrierKind::UpAndOut | BarrierKind::UpAndIn)
    }

    /// Knock-in options pay only once the barrier has been touched
    #[inline]
    pub fn is_knock_in(self) -> bool {
        matches!(self, BarrierKind::UpAndIn | BarrierKind::DownAndIn)
    }

    /// The knock-in/knock-out counterpart with the same direction
    pub fn complement(self) -> BarrierKind {
        match self {
            BarrierKind::UpAndOut => BarrierKind::UpAndIn,
            BarrierKind::UpAndIn => BarrierKind::UpAndOut,
            BarrierKind::DownAndOut => BarrierKind::DownAndIn,
            BarrierKind::DownAndIn => BarrierKind::DownAndOut,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            BarrierKind::UpAndOut => "up_and_out",
            BarrierKind::DownAndOut => "down_and_out",
            BarrierKind::UpAndIn => "up_and_in",
            BarrierKind::DownAndIn => "down_and_in",
        }
    }

    /// Short label used in report titles, e.g. "Up & Out"
    pub fn label(self) -> &'static str {
        match self {
            BarrierKind::UpAndOut => "Up & Out",
            BarrierKind::DownAndOut => "Down & Out",
            BarrierKind::UpAndIn => "Up & In",
            BarrierKind::DownAndIn => "Down & In",
        }
    }
}

fn normalise_kind(s: &str) -> String {
    s.trim().to_ascii_lowercase().replace('-', "_")
}

impl FromStr for OptionKind {
    type Err = SdeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalise_kind(s).as_str() {
            "call" => Ok(OptionKind::Call),
            "put" => Ok(OptionKind::Put),
            _ => Err(SdeError::InvalidContract {
                field: "option_kind".to_string(),
                value: s.to_string(),
                constraint: "must be \"call\" or \"put\"".to_string(),
            }),
        }
    }
}

impl FromStr for BarrierKind {
    type Err = SdeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalise_kind(s).as_str() {
            "up_and_out" => Ok(BarrierKind::UpAndOut),
            "down_and_out" => Ok(BarrierKind::DownAndOut),
            "up_and_in" => Ok(BarrierKind::UpAndIn),
            "down_and_in" => Ok(BarrierKind::DownAndIn),
            _ => Err(SdeError::InvalidContract {
                field: "barrier_kind".to_string(),
                value: s.to_string(),
                constraint:
                    "must be one of \"up_and_out\", \"down_and_out\", \"up_and_in\", \"down_and_in\""
                        .to_string(),
            }),
        }
    }
}

impl fmt::Display for OptionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for BarrierKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Terms of a European single-barrier option
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ContractSpec {
    option_kind: OptionKind,
    barrier_kind: BarrierKind,
    initial_price: f64,
    strike: f64,
    barrier_level: f64,
    maturity_years: f64,
    volatility: f64,
    risk_free_rate: f64,
}

impl ContractSpec {
    /// Validate and build a contract
    ///
    /// # Errors
    ///
    /// Returns [`SdeError::InvalidContract`] when a price or time field is not finite and
    /// strictly positive, when `volatility` is outside `[0, 1]`, or when `risk_free_rate`
    /// is not finite. Values are never clamped.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        option_kind: OptionKind,
        barrier_kind: BarrierKind,
        initial_price: f64,
        strike: f64,
        barrier_level: f64,
        maturity_years: f64,
        volatility: f64,
        risk_free_rate: f64,
    ) -> SdeResult<Self> {
        validate_positive("initial_price", initial_price)?;
        validate_positive("strike", strike)?;
        validate_positive("barrier_level", barrier_level)?;
        validate_positive("maturity_years", maturity_years)?;
        validate_range("volatility", volatility, 0.0, 1.0)?;
        validate_finite("risk_free_rate", risk_free_rate)?;

        Ok(Self {
            option_kind,
            barrier_kind,
            initial_price,
            strike,
            barrier_level,
            maturity_years,
            volatility,
            risk_free_rate,
        })
    }

    /// Same contract with a different barrier kind
    pub fn with_barrier_kind(&self, barrier_kind: BarrierKind) -> Self {
        Self {
            barrier_kind,
            ..*self
        }
    }

    pub fn option_kind(&self) -> OptionKind {
        self.option_kind
    }

    pub fn barrier_kind(&self) -> BarrierKind {
        self.barrier_kind
    }

    pub fn initial_price(&self) -> f64 {
        self.initial_price
    }

    pub fn strike(&self) -> f64 {
        self.strike
    }

    pub fn barrier_level(&self) -> f64 {
        self.barrier_level
    }

    pub fn maturity_years(&self) -> f64 {
        self.maturity_years
    }

    pub fn volatility(&self) -> f64 {
        self.volatility
    }

    pub fn risk_free_rate(&self) -> f64 {
        self.risk_free_rate
    }

    /// Labelled contract fields for display
    pub fn describe(&self) -> Vec<(&'static str, String)> {
        vec![
            ("Option type", self.option_kind.to_string()),
            ("Barrier type", self.barrier_kind.to_string()),
            ("Initial price", self.initial_price.to_string()),
            ("Strike price", self.strike.to_string()),
            ("Barrier price", self.barrier_level.to_string()),
            ("Time to maturity (in years)", self.maturity_years.to_string()),
            ("Annual volatility", self.volatility.to_string()),
            ("Annual risk free rate", self.risk_free_rate.to_string()),
        ]
    }

    /// Chart/report title, e.g. "Up & Out Call, Strike 100, Barrier 120"
    pub fn title(&self) -> String {
        let option = match self.option_kind {
            OptionKind::Call => "Call",
            OptionKind::Put => "Put",
        };
        format!(
            "{} {}, Strike {}, Barrier {}",
            self.barrier_kind.label(),
            option,
            self.strike,
            self.barrier_level
        )
    }
}

impl fmt::Display for ContractSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Contract Specifications")?;
        writeln!(f, "{}", "-".repeat(71))?;
        for (label, value) in self.describe() {
            writeln!(f, "{:<32}{}", format!("{}:", label), value)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn up_and_out_call() -> ContractSpec {
        ContractSpec::new(
            OptionKind::Call,
            BarrierKind::UpAndOut,
            100.0,
            100.0,
            120.0,
            1.0,
            0.2,
            0.05,
        )
        .expect("valid contract")
    }

    #[test]
    fn test_valid_contract_keeps_fields() {
        let c = up_and_out_call();
        assert_eq!(c.option_kind(), OptionKind::Call);
        assert_eq!(c.barrier_kind(), BarrierKind::UpAndOut);
        assert_eq!(c.barrier_level(), 120.0);
        assert_eq!(c.risk_free_rate(), 0.05);
    }

    #[test]
    fn test_volatility_bounds() {
        let build = |vol: f64| {
            ContractSpec::new(
                OptionKind::Put,
                BarrierKind::DownAndIn,
                100.0,
                100.0,
                90.0,
                1.0,
                vol,
                0.01,
            )
        };
        assert!(build(0.0).is_ok());
        assert!(build(1.0).is_ok());
        assert!(matches!(
            build(1.2),
            Err(SdeError::InvalidContract { ref field, .. }) if field == "volatility"
        ));
        assert!(build(-0.1).is_err());
    }

    #[test]
    fn test_rejects_non_positive_prices_and_maturity() {
        let cases = [
            (0.0, 100.0, 120.0, 1.0, "initial_price"),
            (100.0, -1.0, 120.0, 1.0, "strike"),
            (100.0, 100.0, 0.0, 1.0, "barrier_level"),
            (100.0, 100.0, 120.0, 0.0, "maturity_years"),
            (f64::NAN, 100.0, 120.0, 1.0, "initial_price"),
        ];
        for (s0, k, b, t, expected) in cases {
            let err = ContractSpec::new(
                OptionKind::Call,
                BarrierKind::UpAndOut,
                s0,
                k,
                b,
                t,
                0.2,
                0.05,
            )
            .unwrap_err();
            match err {
                SdeError::InvalidContract { field, .. } => assert_eq!(field, expected),
                other => panic!("unexpected error {:?}", other),
            }
        }
    }

    #[test]
    fn test_negative_rate_is_allowed() {
        let c = ContractSpec::new(
            OptionKind::Call,
            BarrierKind::UpAndOut,
            100.0,
            100.0,
            120.0,
            1.0,
            0.2,
            -0.01,
        );
        assert!(c.is_ok());
    }

    #[test]
    fn test_kind_parsing() {
        assert_eq!("call".parse::<OptionKind>().unwrap(), OptionKind::Call);
        assert_eq!(" PUT ".parse::<OptionKind>().unwrap(), OptionKind::Put);
        assert_eq!(
            "down-and-in".parse::<BarrierKind>().unwrap(),
            BarrierKind::DownAndIn
        );
        assert!(matches!(
            "sideways_and_out".parse::<BarrierKind>(),
            Err(SdeError::InvalidContract { ref field, .. }) if field == "barrier_kind"
        ));
        assert!("straddle".parse::<OptionKind>().is_err());
    }

    #[test]
    fn test_complement_and_direction() {
        for kind in BarrierKind::ALL {
            assert_eq!(kind.complement().complement(), kind);
            assert_eq!(kind.complement().is_up(), kind.is_up());
            assert_ne!(kind.complement().is_knock_in(), kind.is_knock_in());
        }
    }

    #[test]
    fn test_with_barrier_kind_only_changes_kind() {
        let c = up_and_out_call();
        let d = c.with_barrier_kind(BarrierKind::UpAndIn);
        assert_eq!(d.barrier_kind(), BarrierKind::UpAndIn);
        assert_eq!(d.with_barrier_kind(BarrierKind::UpAndOut), c);
    }

    #[test]
    fn test_describe_and_display() {
        let c = up_and_out_call();
        let rows = c.describe();
        assert_eq!(rows.len(), 8);
        assert_eq!(rows[1], ("Barrier type", "up_and_out".to_string()));

        let text = c.to_string();
        assert!(text.contains("Contract Specifications"));
        assert!(text.contains("Barrier price:"));
        assert!(text.contains("120"));
        assert_eq!(c.title(), "Up & Out Call, Strike 100, Barrier 120");
    }

    #[test]
    fn test_serializes_kinds_as_snake_case() {
        let json = serde_json::to_value(up_and_out_call()).unwrap();
        assert_eq!(json["barrier_kind"], "up_and_out");
        assert_eq!(json["option_kind"], "call");
        assert_eq!(json["strike"], 100.0);
    }
}
