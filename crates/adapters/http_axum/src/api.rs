//! JSON API handler modules.

pub mod commands;
pub mod health;
