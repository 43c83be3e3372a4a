//! Configuration for repeated-run measurement.

use std::str::FromStr;

use crate::error::Error;

/// How the meter turns `n` runs into one record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Policy {
    /// One session brackets all `n` invocations; the wide measurement is
    /// divided by `n` into a per-iteration average. For cheap or
    /// high-frequency operations where per-run session overhead would
    /// dominate, or where only a mean is needed. Produces no confidence
    /// intervals.
    Global,
    /// `n` independent sessions, one per invocation, reduced to a mean and
    /// a 95% confidence half-width per field. Requires the `stats` feature.
    Confidence,
}

impl FromStr for Policy {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "global" => Ok(Policy::Global),
            "confidence" => Ok(Policy::Confidence),
            other => Err(Error::UnknownPolicy(other.to_string())),
        }
    }
}

impl std::fmt::Display for Policy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Policy::Global => write!(f, "global"),
            Policy::Confidence => write!(f, "confidence"),
        }
    }
}

/// Configuration options for [`EnergyMeter`](crate::EnergyMeter).
#[derive(Debug, Clone)]
pub struct Config {
    /// Times the wrapped operation runs per measurement (default: 1).
    /// A value of 0 is treated as 1 — the meter must return the wrapped
    /// operation's value, so at least one invocation always happens.
    pub iterations: usize,

    /// Aggregation policy (default: [`Policy::Global`]).
    pub policy: Policy,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            iterations: 1,
            policy: Policy::Global,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn policy_parses_known_names() {
        assert_eq!("global".parse::<Policy>().unwrap(), Policy::Global);
        assert_eq!("confidence".parse::<Policy>().unwrap(), Policy::Confidence);
    }

    #[test]
    fn unknown_policy_is_rejected() {
        let err = "bogus".parse::<Policy>().unwrap_err();
        assert!(matches!(err, Error::UnknownPolicy(name) if name == "bogus"));
    }

    #[test]
    fn policy_names_round_trip() {
        for policy in [Policy::Global, Policy::Confidence] {
            assert_eq!(policy.to_string().parse::<Policy>().unwrap(), policy);
        }
    }

    #[test]
    fn defaults_match_the_documented_surface() {
        let config = Config::default();
        assert_eq!(config.iterations, 1);
        assert_eq!(config.policy, Policy::Global);
    }
}
