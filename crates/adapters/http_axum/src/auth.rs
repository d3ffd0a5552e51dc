//! Bearer-token authentication for command routes.

use std::sync::Arc;

use axum::Json;
use axum::extract::{Request, State};
use axum::http::{StatusCode, header};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

/// Shared secret expected in `Authorization: Bearer <token>`.
#[derive(Clone)]
pub struct BearerToken(Arc<str>);

impl BearerToken {
    pub fn new(token: impl Into<Arc<str>>) -> Self {
        Self(token.into())
    }

    /// Compare against a presented token without short-circuiting on the
    /// first differing byte.
    fn matches(&self, presented: &str) -> bool {
        let expected = self.0.as_bytes();
        let presented = presented.as_bytes();
        expected.len() == presented.len()
            && expected
                .iter()
                .zip(presented)
                .fold(0u8, |acc, (a, b)| acc | (a ^ b))
                == 0
    }
}

impl std::fmt::Debug for BearerToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("BearerToken(***)")
    }
}

/// Why a request was refused at the HTTP boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthRejection {
    /// No `Authorization: Bearer` header.
    MissingBearer,
    /// A bearer token that does not match.
    InvalidToken,
}

#[derive(Serialize)]
struct RejectionBody {
    ok: bool,
    error: &'static str,
}

impl IntoResponse for AuthRejection {
    fn into_response(self) -> Response {
        let error = match self {
            Self::MissingBearer => "missing_bearer",
            Self::InvalidToken => "invalid_token",
        };
        (
            StatusCode::UNAUTHORIZED,
            Json(RejectionBody { ok: false, error }),
        )
            .into_response()
    }
}

/// Check the bearer token of `request` against `expected`.
///
/// # Errors
///
/// Returns the [`AuthRejection`] describing why the request is refused.
pub fn authorize(request: &Request, expected: &BearerToken) -> Result<(), AuthRejection> {
    let presented = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .ok_or(AuthRejection::MissingBearer)?;

    if expected.matches(presented.trim()) {
        Ok(())
    } else {
        Err(AuthRejection::InvalidToken)
    }
}

/// Middleware rejecting requests without a valid bearer token.
pub async fn require_bearer(
    State(token): State<BearerToken>,
    request: Request,
    next: Next,
) -> Response {
    match authorize(&request, &token) {
        Ok(()) => next.run(request).await,
        Err(rejection) => {
            tracing::warn!(
                reason = ?rejection,
                path = %request.uri().path(),
                "unauthorized request"
            );
            rejection.into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;

    fn request(authorization: Option<&str>) -> Request {
        let mut builder = Request::builder().uri("/on");
        if let Some(value) = authorization {
            builder = builder.header(header::AUTHORIZATION, value);
        }
        builder.body(Body::empty()).unwrap()
    }

    #[test]
    fn should_accept_matching_token() {
        let token = BearerToken::new("s3cret");
        assert_eq!(authorize(&request(Some("Bearer s3cret")), &token), Ok(()));
    }

    #[test]
    fn should_trim_presented_token() {
        let token = BearerToken::new("s3cret");
        assert_eq!(authorize(&request(Some("Bearer s3cret  ")), &token), Ok(()));
    }

    #[test]
    fn should_reject_missing_header() {
        let token = BearerToken::new("s3cret");
        assert_eq!(
            authorize(&request(None), &token),
            Err(AuthRejection::MissingBearer)
        );
    }

    #[test]
    fn should_reject_other_schemes() {
        let token = BearerToken::new("s3cret");
        assert_eq!(
            authorize(&request(Some("Basic czNjcmV0")), &token),
            Err(AuthRejection::MissingBearer)
        );
    }

    #[test]
    fn should_reject_wrong_token() {
        let token = BearerToken::new("s3cret");
        assert_eq!(
            authorize(&request(Some("Bearer s3cre")), &token),
            Err(AuthRejection::InvalidToken)
        );
        assert_eq!(
            authorize(&request(Some("Bearer s3cres")), &token),
            Err(AuthRejection::InvalidToken)
        );
    }

    #[test]
    fn should_redact_token_in_debug_output() {
        assert_eq!(format!("{:?}", BearerToken::new("s3cret")), "BearerToken(***)");
    }
}
