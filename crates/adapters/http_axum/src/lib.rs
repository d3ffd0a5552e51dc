//! # okofen-adapter-http-axum
//!
//! HTTP adapter built on [axum](https://docs.rs/axum).
//!
//! ## Responsibilities
//! - Serve `GET /healthz` (no authentication)
//! - Serve `POST /on` and `POST /off` behind a shared bearer token
//! - Map [`CommandResult`](okofen_domain::command::CommandResult)s to HTTP
//!   status codes (200, 400, 429, 500, 504)
//!
//! ## Dependency rule
//! Depends on `okofen-app` (for the gateway and runner port) and
//! `okofen-domain` (for the response contract). Never leaks axum types into
//! the domain.

pub mod api;
pub mod auth;
pub mod router;
pub mod state;
