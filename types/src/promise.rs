//! Promise records and their lifecycle status.

use crate::id::{PromiseId, UserId};
use crate::time::Timestamp;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Lifecycle status of a promise.
///
/// Legal edges: `Pending → PendingApproval` (owner submits evidence),
/// `PendingApproval → Completed` (vouch threshold crossed), and
/// `Pending | PendingApproval → Failed` (deadline elapsed).
/// `Completed` and `Failed` are terminal.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PromiseStatus {
    /// Announced, no evidence submitted yet.
    Pending,
    /// Evidence submitted, collecting vouches.
    PendingApproval,
    /// Vouch threshold reached before the deadline. Terminal.
    Completed,
    /// Deadline elapsed without completion. Terminal.
    Failed,
}

impl PromiseStatus {
    /// Whether no further status mutation is permitted.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::Failed)
    }

    /// Whether the deadline sweep may fail a promise in this status.
    pub fn is_expirable(&self) -> bool {
        matches!(self, Self::Pending | Self::PendingApproval)
    }

    /// Whether a vouch may be recorded in this status.
    ///
    /// Vouching is evidence-gated: a vouch endorses submitted proof.
    pub fn is_votable(&self) -> bool {
        matches!(self, Self::PendingApproval)
    }
}

impl fmt::Display for PromiseStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Pending => "pending",
            Self::PendingApproval => "pending_approval",
            Self::Completed => "completed",
            Self::Failed => "failed",
        };
        write!(f, "{s}")
    }
}

/// A user-declared commitment with a deadline and consequences.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PromiseRecord {
    pub id: PromiseId,
    pub owner: UserId,
    pub title: String,
    pub description: String,
    /// Self-declared reward, free text. Not enforced mechanically.
    pub reward: String,
    /// Self-declared penalty, free text. Not enforced mechanically.
    pub penalty: String,
    pub deadline: Timestamp,
    pub status: PromiseStatus,
    /// Set once, when the owner submits proof of completion.
    pub evidence_text: Option<String>,
    pub created_at: Timestamp,
    /// Optimistic-concurrency version, bumped on every committed write.
    pub version: u64,
}

/// The owner-supplied fields of a new promise.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PromiseDraft {
    pub title: String,
    pub description: String,
    pub reward: String,
    pub penalty: String,
    pub deadline: Timestamp,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn terminal_states() {
        assert!(PromiseStatus::Completed.is_terminal());
        assert!(PromiseStatus::Failed.is_terminal());
        assert!(!PromiseStatus::Pending.is_terminal());
        assert!(!PromiseStatus::PendingApproval.is_terminal());
    }

    #[test]
    fn only_non_terminal_states_are_expirable() {
        assert!(PromiseStatus::Pending.is_expirable());
        assert!(PromiseStatus::PendingApproval.is_expirable());
        assert!(!PromiseStatus::Completed.is_expirable());
        assert!(!PromiseStatus::Failed.is_expirable());
    }

    #[test]
    fn vouching_is_evidence_gated() {
        assert!(PromiseStatus::PendingApproval.is_votable());
        assert!(!PromiseStatus::Pending.is_votable());
        assert!(!PromiseStatus::Completed.is_votable());
        assert!(!PromiseStatus::Failed.is_votable());
    }
}
