//! `GET /healthz`: liveness probe.

use std::path::{Path, PathBuf};

use axum::Json;
use axum::extract::State;
use serde::Serialize;

use okofen_app::ports::ModeRunner;

use crate::state::AppState;

/// Health probe body.
#[derive(Debug, Serialize)]
pub struct HealthBody {
    pub ok: bool,
    /// Configured worker executable, `null` for in-process execution.
    pub script_path: Option<String>,
    pub script_readable: bool,
    pub timeout_s: u64,
}

/// `GET /healthz`
pub async fn healthz<R: ModeRunner>(State(state): State<AppState<R>>) -> Json<HealthBody> {
    let path = state.worker_path.as_deref().map(PathBuf::as_path);
    Json(HealthBody {
        ok: true,
        script_path: path.map(|p| p.display().to_string()),
        script_readable: path.is_some_and(is_readable_file),
        timeout_s: state.gateway.deadline().as_secs(),
    })
}

fn is_readable_file(path: &Path) -> bool {
    path.is_file() && std::fs::File::open(path).is_ok()
}
