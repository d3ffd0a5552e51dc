//! Shared application state for axum handlers.

use std::path::PathBuf;
use std::sync::Arc;

use okofen_app::ports::ModeRunner;
use okofen_app::services::command_gateway::CommandGateway;

use crate::auth::BearerToken;

/// Application state shared across all axum handlers.
///
/// `Clone` is implemented manually so the runner type itself does not need to
/// be `Clone`: only the `Arc` wrappers are cloned.
pub struct AppState<R> {
    /// Single-flight command gateway.
    pub gateway: Arc<CommandGateway<R>>,
    /// Token required on command routes.
    pub token: BearerToken,
    /// Worker executable reported by the health probe, if commands run
    /// out of process.
    pub worker_path: Option<Arc<PathBuf>>,
}

impl<R> Clone for AppState<R> {
    fn clone(&self) -> Self {
        Self {
            gateway: Arc::clone(&self.gateway),
            token: self.token.clone(),
            worker_path: self.worker_path.clone(),
        }
    }
}

impl<R: ModeRunner> AppState<R> {
    /// Create a new application state.
    pub fn new(
        gateway: CommandGateway<R>,
        token: BearerToken,
        worker_path: Option<PathBuf>,
    ) -> Self {
        Self {
            gateway: Arc::new(gateway),
            token,
            worker_path: worker_path.map(Arc::new),
        }
    }
}
