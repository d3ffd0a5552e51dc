//! # okofen-domain
//!
//! Pure domain model for remotely switching a pellet boiler between its
//! automatic and stopped operating modes.
//!
//! ## Responsibilities
//! - Define the requested [`mode::Mode`] and the observed
//!   [`state::ApplianceState`]
//! - Derive the appliance state from ambiguous UI indicators
//!   ([`state::ObservedSignal`])
//! - Encode the transition decision table and the invariants of
//!   [`transition::TransitionOutcome`]
//! - Define the externally visible [`command::CommandResult`] contract
//! - Encode/decode the legacy worker summary line ([`summary`])
//!
//! ## Dependency rule
//! This crate has **no internal dependencies** and performs no IO.
//! All IO boundaries are expressed as traits in the `app` crate (ports).

pub mod command;
pub mod error;
pub mod mode;
pub mod state;
pub mod summary;
pub mod transition;
