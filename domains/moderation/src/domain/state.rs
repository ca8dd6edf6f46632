//! Report review state machine
//!
//! A report is reviewed exactly once: `pending` transitions to `dismissed`
//! or `reviewed` and every other state is terminal. Re-review (for example
//! correcting a mistaken dismiss) is deliberately unsupported; a new report
//! must be filed instead.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that can occur during state transitions
#[derive(Debug, Error, Clone, PartialEq)]
pub enum StateError {
    #[error("Invalid transition: cannot transition from {from} via {event}")]
    InvalidTransition { from: String, event: String },

    #[error("Terminal state: {0} is a terminal state and cannot transition")]
    TerminalState(String),
}

/// Report lifecycle states
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportStatus {
    Pending,
    Reviewed,
    Resolved,
    Dismissed,
}

impl ReportStatus {
    /// Check if this is a terminal state
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Reviewed | Self::Resolved | Self::Dismissed)
    }

    /// Get all valid next states from current state
    pub fn valid_transitions(&self) -> &'static [ReportStatus] {
        match self {
            Self::Pending => &[Self::Reviewed, Self::Dismissed],
            Self::Reviewed => &[],
            Self::Resolved => &[],
            Self::Dismissed => &[],
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Reviewed => "reviewed",
            Self::Resolved => "resolved",
            Self::Dismissed => "dismissed",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "pending" => Some(Self::Pending),
            "reviewed" => Some(Self::Reviewed),
            "resolved" => Some(Self::Resolved),
            "dismissed" => Some(Self::Dismissed),
            _ => None,
        }
    }
}

impl std::fmt::Display for ReportStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Events that trigger report state transitions
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ReportEvent {
    /// Admin dismisses the report without acting on the post
    Dismiss,
    /// Admin reviews the report with an action (delete post, ban user)
    Review,
}

impl std::fmt::Display for ReportEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Dismiss => write!(f, "dismiss"),
            Self::Review => write!(f, "review"),
        }
    }
}

/// Report state machine
pub struct ReportStateMachine;

impl ReportStateMachine {
    /// Attempt a state transition
    pub fn transition(
        current: ReportStatus,
        event: ReportEvent,
    ) -> Result<ReportStatus, StateError> {
        // Check for terminal state
        if current.is_terminal() {
            return Err(StateError::TerminalState(current.to_string()));
        }

        let next = match (&current, &event) {
            (ReportStatus::Pending, ReportEvent::Dismiss) => ReportStatus::Dismissed,
            (ReportStatus::Pending, ReportEvent::Review) => ReportStatus::Reviewed,

            // Invalid transitions
            _ => {
                return Err(StateError::InvalidTransition {
                    from: current.to_string(),
                    event: event.to_string(),
                });
            }
        };

        Ok(next)
    }

    /// Check if a transition is valid without performing it
    pub fn can_transition(current: ReportStatus, event: &ReportEvent) -> bool {
        Self::transition(current, *event).is_ok()
    }
}
