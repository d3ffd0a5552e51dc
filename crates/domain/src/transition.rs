//! Transition decision table and its outcome.

use serde::Serialize;

use crate::mode::Mode;
use crate::state::ApplianceState;

/// What the controller must do to move from the observed state to the target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    /// The appliance is already in the target mode.
    AlreadySatisfied,
    /// The appliance is in the opposite mode and must be switched.
    Switch,
    /// The state could not be determined; acting would be a guess.
    Indeterminate,
}

impl Decision {
    /// Look up the action for `target` given the observed `before` state.
    ///
    /// | target | before  | decision           |
    /// |--------|---------|--------------------|
    /// | Off    | Off     | `AlreadySatisfied` |
    /// | Off    | On      | `Switch`           |
    /// | On     | On      | `AlreadySatisfied` |
    /// | On     | Off     | `Switch`           |
    /// | any    | Unknown | `Indeterminate`    |
    #[must_use]
    pub fn for_target(target: Mode, before: ApplianceState) -> Self {
        match before {
            ApplianceState::Unknown => Self::Indeterminate,
            state if state.satisfies(target) => Self::AlreadySatisfied,
            _ => Self::Switch,
        }
    }
}

/// Result of a single transition attempt.
///
/// Only constructible through [`unchanged`](Self::unchanged),
/// [`switched`](Self::switched) and [`from_parts`](Self::from_parts), which
/// all uphold: an action implies the state moved from the opposite mode to
/// the target; no action implies the state was the target or unknown, and did
/// not change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TransitionOutcome {
    state_before: ApplianceState,
    state_after: ApplianceState,
    action_taken: bool,
}

impl TransitionOutcome {
    /// No interaction happened; the appliance stays in `state`.
    #[must_use]
    pub fn unchanged(state: ApplianceState) -> Self {
        Self {
            state_before: state,
            state_after: state,
            action_taken: false,
        }
    }

    /// The appliance was switched from the opposite mode to `target`.
    #[must_use]
    pub fn switched(target: Mode) -> Self {
        Self {
            state_before: target.opposite().into(),
            state_after: target.into(),
            action_taken: true,
        }
    }

    /// Rebuild an outcome reported by an out-of-process worker.
    ///
    /// Returns `None` when the reported triple violates the outcome invariant
    /// for `target`.
    #[must_use]
    pub fn from_parts(
        target: Mode,
        state_before: ApplianceState,
        state_after: ApplianceState,
        action_taken: bool,
    ) -> Option<Self> {
        let outcome = if action_taken {
            Self::switched(target)
        } else {
            if state_before != ApplianceState::Unknown && !state_before.satisfies(target) {
                return None;
            }
            Self::unchanged(state_before)
        };
        (outcome.state_before == state_before && outcome.state_after == state_after)
            .then_some(outcome)
    }

    #[must_use]
    pub fn state_before(&self) -> ApplianceState {
        self.state_before
    }

    #[must_use]
    pub fn state_after(&self) -> ApplianceState {
        self.state_after
    }

    #[must_use]
    pub fn action_taken(&self) -> bool {
        self.action_taken
    }

    /// The appliance state could not be determined, so nothing was done.
    #[must_use]
    pub fn is_indeterminate(&self) -> bool {
        self.state_after == ApplianceState::Unknown
    }
}
