use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    Json,
};
use tracing::{info, warn};

use crate::models::auth::{LoginRequest, LoginResponse};
use crate::AppState;

/// POST /api/auth/login
///
/// Compares against the single shared passphrase. No session or token is
/// issued; the client keeps its own authenticated flag. A body that is
/// missing or unreadable counts as a wrong password.
pub async fn login(
    State(state): State<AppState>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> (StatusCode, Json<LoginResponse>) {
    let password = match payload {
        Ok(Json(request)) => request.password,
        Err(rejection) => {
            warn!(error = %rejection, "Login rejected: unreadable body");
            String::new()
        }
    };

    if !password.is_empty() && password_matches(&password, &state.config.app_password) {
        info!("Login successful");
        (
            StatusCode::OK,
            Json(LoginResponse {
                success: true,
                message: "Login successful".to_string(),
            }),
        )
    } else {
        warn!("Login rejected: invalid password");
        (
            StatusCode::UNAUTHORIZED,
            Json(LoginResponse {
                success: false,
                message: "Invalid password".to_string(),
            }),
        )
    }
}

/// Length-independent comparison so response timing does not reveal prefixes
fn password_matches(candidate: &str, expected: &str) -> bool {
    let candidate = candidate.as_bytes();
    let expected = expected.as_bytes();

    let mut diff = candidate.len() ^ expected.len();
    for (i, byte) in expected.iter().enumerate() {
        let other = candidate.get(i).copied().unwrap_or(0);
        diff |= (byte ^ other) as usize;
    }
    diff == 0
}
