//! `POST /on` and `POST /off`.

use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

use okofen_app::ports::ModeRunner;
use okofen_domain::command::{CommandResult, ErrorCode};

use crate::state::AppState;

/// Short body for requests refused before anything ran.
#[derive(Serialize)]
struct RejectionBody {
    ok: bool,
    error: ErrorCode,
    action: String,
}

/// Possible responses from the command endpoints.
pub enum CommandResponse {
    /// 200 with the full result.
    Completed(Json<CommandResult>),
    /// 400 or 429 with a short body; nothing ran.
    Rejected(StatusCode, ErrorCode, String),
    /// 500 or 504 with the full result, including diagnostics.
    Failed(StatusCode, Json<CommandResult>),
}

impl From<CommandResult> for CommandResponse {
    fn from(result: CommandResult) -> Self {
        match result.error_code {
            None if result.ok => Self::Completed(Json(result)),
            Some(code @ ErrorCode::Busy) => {
                Self::Rejected(StatusCode::TOO_MANY_REQUESTS, code, result.action)
            }
            Some(code @ ErrorCode::InvalidAction) => {
                Self::Rejected(StatusCode::BAD_REQUEST, code, result.action)
            }
            Some(ErrorCode::Timeout) => Self::Failed(StatusCode::GATEWAY_TIMEOUT, Json(result)),
            Some(ErrorCode::ScriptError) | None => {
                Self::Failed(StatusCode::INTERNAL_SERVER_ERROR, Json(result))
            }
        }
    }
}

impl IntoResponse for CommandResponse {
    fn into_response(self) -> Response {
        match self {
            Self::Completed(json) => json.into_response(),
            Self::Rejected(status, error, action) => (
                status,
                Json(RejectionBody {
                    ok: false,
                    error,
                    action,
                }),
            )
                .into_response(),
            Self::Failed(status, json) => (status, json).into_response(),
        }
    }
}

/// `POST /on`
pub async fn turn_on<R: ModeRunner>(State(state): State<AppState<R>>) -> CommandResponse {
    state.gateway.execute("on").await.into()
}

/// `POST /off`
pub async fn turn_off<R: ModeRunner>(State(state): State<AppState<R>>) -> CommandResponse {
    state.gateway.execute("off").await.into()
}
