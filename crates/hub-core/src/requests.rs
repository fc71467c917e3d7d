//! Campaign request status pipeline and request codes.

use std::str::FromStr;

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::CoreError;

pub const REQUEST_CODE_PREFIX: &str = "HUB-REQ-";

/// Upper bound on targets in a single campaign submission.
pub const MAX_TARGETS_PER_CAMPAIGN: usize = 100;

const CODE_MIN: usize = 1000;
const CODE_SPAN: usize = 9000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RequestStatus {
    New,
    Contacted,
    Negotiating,
    Booked,
    Closed,
}

/// `TRANSITIONS[from][to]`, indexed in [`RequestStatus::ALL`] order.
///
/// The pipeline is driven by people, so every move is permitted, including
/// backwards and same-status moves.
const TRANSITIONS: [[bool; 5]; 5] = [[true; 5]; 5];

impl RequestStatus {
    pub const ALL: [RequestStatus; 5] = [
        RequestStatus::New,
        RequestStatus::Contacted,
        RequestStatus::Negotiating,
        RequestStatus::Booked,
        RequestStatus::Closed,
    ];

    /// Status given to every freshly created request.
    pub const INITIAL: RequestStatus = RequestStatus::New;

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            RequestStatus::New => "new",
            RequestStatus::Contacted => "contacted",
            RequestStatus::Negotiating => "negotiating",
            RequestStatus::Booked => "booked",
            RequestStatus::Closed => "closed",
        }
    }

    fn index(self) -> usize {
        match self {
            RequestStatus::New => 0,
            RequestStatus::Contacted => 1,
            RequestStatus::Negotiating => 2,
            RequestStatus::Booked => 3,
            RequestStatus::Closed => 4,
        }
    }

    #[must_use]
    pub fn can_transition_to(self, next: RequestStatus) -> bool {
        TRANSITIONS[self.index()][next.index()]
    }

    /// Statuses a request may currently hold for a move to `next` to be accepted.
    #[must_use]
    pub fn allowed_predecessors(next: RequestStatus) -> Vec<RequestStatus> {
        Self::ALL
            .into_iter()
            .filter(|from| from.can_transition_to(next))
            .collect()
    }
}

impl std::fmt::Display for RequestStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RequestStatus {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| CoreError::InvalidRequestStatus(s.to_owned()))
    }
}

/// Generates `count` request codes of the form `HUB-REQ-dddd`.
///
/// Codes are distinct within one call. Nothing prevents a code from repeating
/// across calls; codes are labels, not keys.
///
/// # Errors
///
/// Returns [`CoreError::TooManyTargets`] when `count` exceeds
/// [`MAX_TARGETS_PER_CAMPAIGN`].
pub fn generate_request_codes<R: Rng + ?Sized>(
    rng: &mut R,
    count: usize,
) -> Result<Vec<String>, CoreError> {
    if count > MAX_TARGETS_PER_CAMPAIGN {
        return Err(CoreError::TooManyTargets {
            requested: count,
            max: MAX_TARGETS_PER_CAMPAIGN,
        });
    }

    Ok(rand::seq::index::sample(rng, CODE_SPAN, count)
        .into_iter()
        .map(|offset| format!("{REQUEST_CODE_PREFIX}{}", CODE_MIN + offset))
        .collect())
}
