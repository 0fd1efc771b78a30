//! Tunable engine parameters.
//!
//! All values are plain configuration (TOML-loadable); none are derived at
//! runtime. The completion threshold counts distinct vouches — validation
//! weights are captured for provenance and reporting, not for the
//! completion predicate.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Engine parameters with their shipped defaults.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PactParams {
    /// Distinct vouches required to complete a promise.
    #[serde(default = "default_vouch_threshold")]
    pub vouch_threshold: u32,

    /// Reputation awarded to the owner on completion.
    #[serde(default = "default_reputation_reward")]
    pub reputation_reward: i64,

    /// Coins awarded to the owner on completion.
    #[serde(default = "default_coin_reward")]
    pub coin_reward: i64,

    /// Signed reputation delta applied on failure. Negative: subtracts.
    #[serde(default = "default_penalty_offset")]
    pub penalty_offset: i64,

    /// Minimum length (characters) of an evidence report.
    #[serde(default = "default_min_evidence_len")]
    pub min_evidence_len: usize,

    /// Interval between deadline sweeps, in seconds.
    #[serde(default = "default_sweep_interval_secs")]
    pub sweep_interval_secs: u64,
}

fn default_vouch_threshold() -> u32 {
    3
}
fn default_reputation_reward() -> i64 {
    10
}
fn default_coin_reward() -> i64 {
    50
}
fn default_penalty_offset() -> i64 {
    -5
}
fn default_min_evidence_len() -> usize {
    10
}
fn default_sweep_interval_secs() -> u64 {
    60
}

impl Default for PactParams {
    fn default() -> Self {
        Self {
            vouch_threshold: default_vouch_threshold(),
            reputation_reward: default_reputation_reward(),
            coin_reward: default_coin_reward(),
            penalty_offset: default_penalty_offset(),
            min_evidence_len: default_min_evidence_len(),
            sweep_interval_secs: default_sweep_interval_secs(),
        }
    }
}

impl PactParams {
    /// Reject configurations the engine cannot operate under.
    pub fn validate(&self) -> Result<(), ParamsError> {
        if self.vouch_threshold == 0 {
            return Err(ParamsError::ZeroVouchThreshold);
        }
        if self.sweep_interval_secs == 0 {
            return Err(ParamsError::ZeroSweepInterval);
        }
        if self.min_evidence_len == 0 {
            return Err(ParamsError::ZeroEvidenceLength);
        }
        Ok(())
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParamsError {
    #[error("vouch_threshold must be at least 1")]
    ZeroVouchThreshold,

    #[error("sweep_interval_secs must be at least 1")]
    ZeroSweepInterval,

    #[error("min_evidence_len must be at least 1")]
    ZeroEvidenceLength,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_shipped_policy() {
        let p = PactParams::default();
        assert_eq!(p.vouch_threshold, 3);
        assert_eq!(p.reputation_reward, 10);
        assert_eq!(p.coin_reward, 50);
        assert_eq!(p.penalty_offset, -5);
        assert_eq!(p.min_evidence_len, 10);
        assert_eq!(p.sweep_interval_secs, 60);
        assert!(p.validate().is_ok());
    }

    #[test]
    fn zero_threshold_rejected() {
        let p = PactParams {
            vouch_threshold: 0,
            ..PactParams::default()
        };
        assert_eq!(p.validate(), Err(ParamsError::ZeroVouchThreshold));
    }

    #[test]
    fn zero_sweep_interval_rejected() {
        let p = PactParams {
            sweep_interval_secs: 0,
            ..PactParams::default()
        };
        assert_eq!(p.validate(), Err(ParamsError::ZeroSweepInterval));
    }

    #[test]
    fn missing_fields_fall_back_to_defaults() {
        let p: PactParams = serde_json::from_str(r#"{"vouch_threshold": 5}"#).unwrap();
        assert_eq!(p.vouch_threshold, 5);
        assert_eq!(p.coin_reward, 50);
        assert_eq!(p.sweep_interval_secs, 60);
    }
}
