//! # okofen-app
//!
//! Application layer: use-cases and **port definitions** (traits).
//!
//! ## Responsibilities
//! - Define **port traits** that adapters must implement (driven/outbound ports):
//!   - `ControlPanel`: observe mode indicators and operate the mode selector
//!   - `PanelSession` / `PanelDriver`: open, authenticate, navigate, close
//!   - `ModeRunner`: run one full session lifecycle for a target mode
//! - Define **driving/inbound** use-cases:
//!   - `ModeController`: infer the current mode and perform the transition
//!   - `SessionLifecycle`: login → navigate → transition → confirm → close
//!   - `CommandGateway`: single-flight, deadline-bounded command execution
//!
//! ## Dependency rule
//! Depends on `okofen-domain` only (plus `tokio` for the execution slot and
//! deadlines). Never imports adapter crates.

pub mod ports;
pub mod services;
pub mod transcript;

#[cfg(test)]
pub(crate) mod fake;
