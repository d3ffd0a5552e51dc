//! Application services: use-case implementations.
//!
//! Each service accepts port trait implementations via generic parameters
//! (constructor injection), keeping this layer decoupled from concrete adapters.

pub mod command_gateway;
pub mod execution_slot;
pub mod mode_controller;
pub mod session_lifecycle;
